/// Per-frame reconciliation of target state with the rendered object
use nalgebra::Vector3;

use crate::animation::EntranceAnimator;
use crate::state::TransformState;
use crate::transform::Transform;

/// Write access to a rendered object's transform.
///
/// Geometry and material stay with the host; only these fields are touched.
pub trait RenderHandle {
    fn set_position(&mut self, position: Vector3<f32>);
    fn set_rotation(&mut self, rotation: Vector3<f32>);
    fn set_scale(&mut self, scale: Vector3<f32>);
}

impl RenderHandle for Transform {
    fn set_position(&mut self, position: Vector3<f32>) {
        self.translation = position;
    }

    fn set_rotation(&mut self, rotation: Vector3<f32>) {
        self.rotation = rotation;
    }

    fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
    }
}

/// Drives the entrance animation and copies the remaining target
/// components onto a render handle once per frame.
#[derive(Debug, Clone)]
pub struct FrameSynchronizer {
    animator: EntranceAnimator,
    /// Target height the current run was armed for, compared bitwise
    observed_y: Option<u32>,
    frames_applied: u64,
}

impl FrameSynchronizer {
    pub fn new(animator: EntranceAnimator) -> Self {
        Self {
            animator,
            observed_y: None,
            frames_applied: 0,
        }
    }

    /// Run one frame.
    ///
    /// Returns the vertical value written, or `None` when no handle is
    /// available yet. Missing frames are not replayed once a handle appears.
    pub fn tick<H>(
        &mut self,
        delta_ms: f32,
        state: &TransformState,
        handle: Option<&mut H>,
    ) -> Option<f32>
    where
        H: RenderHandle + ?Sized,
    {
        let Some(handle) = handle else {
            log::trace!("render handle not ready, skipping frame");
            return None;
        };

        let target_y = state.position.y;
        if self.observed_y != Some(target_y.to_bits()) {
            self.observed_y = Some(target_y.to_bits());
            self.animator.arm(target_y);
        }

        let y = self.animator.tick(delta_ms).unwrap_or(target_y);

        handle.set_position(Vector3::new(state.position.x, y, state.position.z));
        handle.set_rotation(state.rotation);
        handle.set_scale(state.scale);

        self.frames_applied += 1;
        Some(y)
    }

    pub fn animator(&self) -> &EntranceAnimator {
        &self.animator
    }

    pub fn frames_applied(&self) -> u64 {
        self.frames_applied
    }
}

impl Default for FrameSynchronizer {
    fn default() -> Self {
        Self::new(EntranceAnimator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Channel;

    #[test]
    fn test_first_frame_starts_at_sentinel() {
        let mut sync = FrameSynchronizer::default();
        let mut object = Transform::identity();
        let state = TransformState::default();

        assert_eq!(sync.tick(0.0, &state, Some(&mut object)), Some(-5.0));
        assert_eq!(object.translation, Vector3::new(0.0, -5.0, 0.0));
        assert_eq!(sync.animator().runs_started(), 1);
    }

    #[test]
    fn test_direct_axes_skip_easing() {
        let mut sync = FrameSynchronizer::default();
        let mut object = Transform::identity();
        let mut state = TransformState::default();
        sync.tick(0.0, &state, Some(&mut object));

        state.replace_axis(Channel::Position, 0, 3.0);
        state.replace_axis(Channel::Position, 2, -1.5);
        state.replace_axis(Channel::Rotation, 1, 1.25);
        state.replace_axis(Channel::Scale, 2, 4.0);
        sync.tick(16.0, &state, Some(&mut object));

        assert_eq!(object.translation.x, 3.0);
        assert_eq!(object.translation.z, -1.5);
        assert_eq!(object.rotation, Vector3::new(0.0, 1.25, 0.0));
        assert_eq!(object.scale, Vector3::new(1.0, 1.0, 4.0));
        // Height is still easing toward 0
        assert!(object.translation.y < 0.0);
    }

    #[test]
    fn test_horizontal_edit_does_not_rearm() {
        let mut sync = FrameSynchronizer::default();
        let mut object = Transform::identity();
        let mut state = TransformState::default();
        sync.tick(0.0, &state, Some(&mut object));
        sync.tick(1000.0, &state, Some(&mut object));

        state.replace_axis(Channel::Position, 0, 2.0);
        sync.tick(16.0, &state, Some(&mut object));
        assert_eq!(sync.animator().runs_started(), 1);
    }

    #[test]
    fn test_missing_handle_is_noop() {
        let mut sync = FrameSynchronizer::default();
        let state = TransformState::default();

        assert_eq!(sync.tick::<Transform>(500.0, &state, None), None);
        assert_eq!(sync.tick::<Transform>(500.0, &state, None), None);
        assert_eq!(sync.frames_applied(), 0);
        assert_eq!(sync.animator().runs_started(), 0);

        // Handle arrives: run starts now, the skipped time is not replayed
        let mut object = Transform::identity();
        let y = sync.tick(16.0, &state, Some(&mut object)).unwrap();
        assert_eq!(sync.animator().current_run().unwrap().elapsed, 16.0);
        assert_eq!(object.translation.y, y);
        assert!(y < -4.0);
    }

    #[test]
    fn test_missing_handle_picks_up_latest_state() {
        let mut sync = FrameSynchronizer::default();
        let mut state = TransformState::default();
        state.replace_axis(Channel::Scale, 0, 2.0);
        sync.tick::<Transform>(16.0, &state, None);
        state.replace_axis(Channel::Scale, 0, 3.0);

        let mut object = Transform::identity();
        sync.tick(16.0, &state, Some(&mut object));
        assert_eq!(object.scale.x, 3.0);
    }

    #[test]
    fn test_nan_target_arms_once() {
        let mut sync = FrameSynchronizer::default();
        let mut object = Transform::identity();
        let mut state = TransformState::default();
        state.replace_axis(Channel::Position, 1, f32::NAN);

        for _ in 0..5 {
            sync.tick(16.0, &state, Some(&mut object));
        }
        assert_eq!(sync.animator().runs_started(), 1);
        assert!(object.translation.y.is_nan());
    }

    #[test]
    fn test_zero_delta_reemits_height() {
        let mut sync = FrameSynchronizer::default();
        let mut object = Transform::identity();
        let state = TransformState::default();
        sync.tick(0.0, &state, Some(&mut object));
        let y = sync.tick(700.0, &state, Some(&mut object)).unwrap();

        assert_eq!(sync.tick(0.0, &state, Some(&mut object)), Some(y));
        assert_eq!(sync.tick(-5.0, &state, Some(&mut object)), Some(y));
    }

    #[test]
    fn test_zero_delta_still_writes_direct_axes() {
        let mut sync = FrameSynchronizer::default();
        let mut object = Transform::identity();
        let mut state = TransformState::default();
        sync.tick(0.0, &state, Some(&mut object));
        let y = sync.tick(400.0, &state, Some(&mut object)).unwrap();

        state.replace_axis(Channel::Position, 0, -2.0);
        state.replace_axis(Channel::Rotation, 2, 0.5);
        state.replace_axis(Channel::Scale, 1, 3.0);
        assert_eq!(sync.tick(0.0, &state, Some(&mut object)), Some(y));
        assert_eq!(object.translation, Vector3::new(-2.0, y, 0.0));
        assert_eq!(object.rotation, Vector3::new(0.0, 0.0, 0.5));
        assert_eq!(object.scale, Vector3::new(1.0, 3.0, 1.0));

        state.replace_axis(Channel::Scale, 1, 0.5);
        assert_eq!(sync.tick(-16.0, &state, Some(&mut object)), Some(y));
        assert_eq!(object.scale.y, 0.5);
    }
}
