/// Target transform state edited by the control panel and the pointer tracker
use nalgebra::Vector3;
use std::cell::RefCell;
use std::rc::Rc;

/// One of the three editable transform vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Position,
    Rotation,
    Scale,
}

/// Desired transform of the displayed object plus the light position.
///
/// Every vector is replaced as a whole on edit; consumers compare values
/// to find out whether a target moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub position: Vector3<f32>,
    /// Euler angles in radians
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub light_position: Vector3<f32>,
}

impl TransformState {
    pub fn new() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            light_position: Vector3::zeros(),
        }
    }

    pub fn channel(&self, channel: Channel) -> Vector3<f32> {
        match channel {
            Channel::Position => self.position,
            Channel::Rotation => self.rotation,
            Channel::Scale => self.scale,
        }
    }

    /// Replace a whole channel vector
    pub fn set_channel(&mut self, channel: Channel, value: Vector3<f32>) {
        match channel {
            Channel::Position => self.position = value,
            Channel::Rotation => self.rotation = value,
            Channel::Scale => self.scale = value,
        }
    }

    /// Compose a new vector with one axis changed and store it.
    ///
    /// Values are stored as given; NaN and out-of-range inputs pass through.
    pub fn replace_axis(&mut self, channel: Channel, axis: usize, value: f32) {
        let current = self.channel(channel);
        let next = Vector3::from_fn(|i, _| if i == axis { value } else { current[i] });
        self.set_channel(channel, next);
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared between a host's event callbacks and its frame loop
pub type SharedState = Rc<RefCell<TransformState>>;

pub fn shared(state: TransformState) -> SharedState {
    Rc::new(RefCell::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = TransformState::default();
        assert_eq!(state.position, Vector3::zeros());
        assert_eq!(state.rotation, Vector3::zeros());
        assert_eq!(state.scale, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(state.light_position, Vector3::zeros());
    }

    #[test]
    fn test_replace_axis_keeps_other_axes() {
        let mut state = TransformState::default();
        state.replace_axis(Channel::Scale, 1, 2.5);
        assert_eq!(state.scale, Vector3::new(1.0, 2.5, 1.0));

        state.replace_axis(Channel::Position, 2, -4.0);
        assert_eq!(state.position, Vector3::new(0.0, 0.0, -4.0));
    }

    #[test]
    fn test_replace_axis_passes_through_out_of_range() {
        let mut state = TransformState::default();
        state.replace_axis(Channel::Scale, 0, -3.0);
        assert_eq!(state.scale.x, -3.0);

        state.replace_axis(Channel::Rotation, 0, f32::NAN);
        assert!(state.rotation.x.is_nan());
        assert_eq!(state.rotation.y, 0.0);
    }
}
