/// One-shot eased entrance animation for the object's vertical position
use serde::{Deserialize, Serialize};

/// Length of an entrance run in milliseconds
pub const ENTRANCE_DURATION_MS: f32 = 2000.0;

/// Height every entrance run starts from
pub const ENTRANCE_START_Y: f32 = -5.0;

/// Easing curve mapping linear progress in `[0, 1]` to eased progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    QuadraticIn,
    #[default]
    QuadraticOut,
    QuadraticInOut,
}

impl Easing {
    pub fn apply(self, p: f32) -> f32 {
        match self {
            Easing::Linear => p,
            Easing::QuadraticIn => p * p,
            Easing::QuadraticOut => 1.0 - (1.0 - p) * (1.0 - p),
            Easing::QuadraticInOut => {
                if p < 0.5 {
                    2.0 * p * p
                } else {
                    1.0 - 2.0 * (1.0 - p) * (1.0 - p)
                }
            }
        }
    }
}

/// Where a run armed during another run starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RearmMode {
    /// Jump back to the fixed start height
    #[default]
    FromSentinel,
    /// Continue from the interrupted run's current value
    FromCurrent,
}

/// A single interpolation from `start` to `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRun {
    pub start: f32,
    pub target: f32,
    /// Milliseconds advanced so far
    pub elapsed: f32,
    pub duration: f32,
    pub easing: Easing,
}

impl AnimationRun {
    pub fn new(start: f32, target: f32, duration: f32, easing: Easing) -> Self {
        Self {
            start,
            target,
            elapsed: 0.0,
            duration,
            easing,
        }
    }

    /// Linear progress clamped to `[0, 1]`; non-positive durations count as done
    pub fn progress(&self) -> f32 {
        if self.duration.is_nan() || self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Interpolated value; exactly `target` once complete
    pub fn sample(&self) -> f32 {
        if self.is_complete() {
            return self.target;
        }
        let eased = self.easing.apply(self.progress());
        self.start + (self.target - self.start) * eased
    }

    fn advance(&mut self, delta_ms: f32) {
        self.elapsed += delta_ms;
        if self.duration > 0.0 && self.elapsed > self.duration {
            self.elapsed = self.duration;
        }
    }
}

/// Re-triggerable entrance animation.
///
/// Holds at most one run. Arming replaces whatever run is in flight.
#[derive(Debug, Clone)]
pub struct EntranceAnimator {
    start: f32,
    duration: f32,
    easing: Easing,
    rearm: RearmMode,
    run: Option<AnimationRun>,
    runs_started: u32,
}

impl EntranceAnimator {
    pub fn new(start: f32, duration: f32, easing: Easing) -> Self {
        Self {
            start,
            duration,
            easing,
            rearm: RearmMode::FromSentinel,
            run: None,
            runs_started: 0,
        }
    }

    pub fn with_rearm_mode(mut self, rearm: RearmMode) -> Self {
        self.rearm = rearm;
        self
    }

    /// Start a new run toward `target`, abandoning any run in flight
    pub fn arm(&mut self, target: f32) {
        let start = match (self.rearm, &self.run) {
            (RearmMode::FromCurrent, Some(run)) => run.sample(),
            _ => self.start,
        };
        if let Some(previous) = &self.run {
            if !previous.is_complete() {
                log::debug!(
                    "entrance run toward {} interrupted at {:.0}/{} ms",
                    previous.target,
                    previous.elapsed,
                    previous.duration
                );
            }
        }
        log::debug!("arming entrance run {} -> {} over {} ms", start, target, self.duration);
        self.run = Some(AnimationRun::new(start, target, self.duration, self.easing));
        self.runs_started += 1;
    }

    /// Advance the clock and return the current value.
    ///
    /// Returns `None` until the animator has been armed. Non-positive or NaN
    /// deltas leave the clock untouched and re-emit the current value.
    pub fn tick(&mut self, delta_ms: f32) -> Option<f32> {
        let run = self.run.as_mut()?;
        if delta_ms > 0.0 && !run.is_complete() {
            run.advance(delta_ms);
        }
        Some(run.sample())
    }

    pub fn value(&self) -> Option<f32> {
        self.run.as_ref().map(AnimationRun::sample)
    }

    pub fn current_run(&self) -> Option<&AnimationRun> {
        self.run.as_ref()
    }

    /// True while a run is still interpolating
    pub fn is_active(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.is_complete())
    }

    pub fn runs_started(&self) -> u32 {
        self.runs_started
    }
}

impl Default for EntranceAnimator {
    fn default() -> Self {
        Self::new(ENTRANCE_START_Y, ENTRANCE_DURATION_MS, Easing::QuadraticOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_quadratic_out_curve() {
        let easing = Easing::QuadraticOut;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(1.0), 1.0);
        assert!((easing.apply(0.5) - 0.75).abs() < EPS);

        let mut previous = 0.0;
        for step in 1..=100 {
            let eased = easing.apply(step as f32 / 100.0);
            assert!(eased >= previous);
            previous = eased;
        }
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::QuadraticIn,
            Easing::QuadraticOut,
            Easing::QuadraticInOut,
        ] {
            assert!(easing.apply(0.0).abs() < EPS, "{:?}", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < EPS, "{:?}", easing);
        }
        assert!((Easing::QuadraticInOut.apply(0.5) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_run_interpolates_from_start() {
        let mut animator = EntranceAnimator::default();
        animator.arm(3.0);
        assert_eq!(animator.tick(0.0), Some(-5.0));

        // Halfway: eased progress 0.75 of the 8 unit span
        let half = animator.tick(1000.0).unwrap();
        assert!((half - 1.0).abs() < EPS);
    }

    #[test]
    fn test_complete_run_yields_exact_target() {
        for duration in [0.0, 1.0, 16.0, 2000.0, 12345.0] {
            let mut animator = EntranceAnimator::new(-5.0, duration, Easing::QuadraticOut);
            animator.arm(0.3);
            assert_eq!(animator.tick(duration + 1.0), Some(0.3));
            assert!(!animator.is_active());
        }
    }

    #[test]
    fn test_completion_is_idempotent() {
        let mut animator = EntranceAnimator::default();
        animator.arm(2.0);
        assert_eq!(animator.tick(5000.0), Some(2.0));
        let settled = *animator.current_run().unwrap();
        for _ in 0..10 {
            assert_eq!(animator.tick(16.0), Some(2.0));
        }
        assert_eq!(animator.current_run(), Some(&settled));
    }

    #[test]
    fn test_non_positive_duration_completes_immediately() {
        let mut animator = EntranceAnimator::new(-5.0, -10.0, Easing::QuadraticOut);
        animator.arm(1.5);
        assert_eq!(animator.tick(0.0), Some(1.5));

        let mut animator = EntranceAnimator::new(-5.0, f32::NAN, Easing::Linear);
        animator.arm(1.5);
        assert_eq!(animator.tick(0.0), Some(1.5));
    }

    #[test]
    fn test_rearm_restarts_from_sentinel() {
        let mut animator = EntranceAnimator::default();
        animator.arm(0.0);
        animator.tick(1000.0);
        let interrupted = animator.value().unwrap();
        assert!(interrupted > -5.0);

        animator.arm(3.0);
        assert_eq!(animator.tick(0.0), Some(-5.0));
        assert_eq!(animator.current_run().unwrap().elapsed, 0.0);
        assert_eq!(animator.runs_started(), 2);
    }

    #[test]
    fn test_rearm_from_current_resumes() {
        let mut animator = EntranceAnimator::default().with_rearm_mode(RearmMode::FromCurrent);
        animator.arm(0.0);
        animator.tick(1000.0);
        let interrupted = animator.value().unwrap();

        animator.arm(3.0);
        assert_eq!(animator.tick(0.0), Some(interrupted));
    }

    #[test]
    fn test_negative_delta_reemits_value() {
        let mut animator = EntranceAnimator::default();
        assert_eq!(animator.tick(16.0), None);

        animator.arm(1.0);
        animator.tick(500.0);
        let value = animator.value().unwrap();
        assert_eq!(animator.tick(-30.0), Some(value));
        assert_eq!(animator.tick(f32::NAN), Some(value));
    }

    #[test]
    fn test_nan_target_propagates() {
        let mut animator = EntranceAnimator::default();
        animator.arm(f32::NAN);
        assert!(animator.tick(100.0).unwrap().is_nan());
    }
}
