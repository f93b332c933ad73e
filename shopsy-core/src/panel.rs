/// Control panel adapter: nine bounded scalar controls bound to transform state
use std::f32::consts::TAU;

use crate::state::{Channel, TransformState};

pub const PANEL_TITLE: &str = "Model Controls";

/// Stable identifier of one editable scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
    ScaleX,
    ScaleY,
    ScaleZ,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::PositionX,
        Field::PositionY,
        Field::PositionZ,
        Field::RotationX,
        Field::RotationY,
        Field::RotationZ,
        Field::ScaleX,
        Field::ScaleY,
        Field::ScaleZ,
    ];

    pub fn channel(self) -> Channel {
        match self {
            Field::PositionX | Field::PositionY | Field::PositionZ => Channel::Position,
            Field::RotationX | Field::RotationY | Field::RotationZ => Channel::Rotation,
            Field::ScaleX | Field::ScaleY | Field::ScaleZ => Channel::Scale,
        }
    }

    pub fn axis(self) -> usize {
        match self {
            Field::PositionX | Field::RotationX | Field::ScaleX => 0,
            Field::PositionY | Field::RotationY | Field::ScaleY => 1,
            Field::PositionZ | Field::RotationZ | Field::ScaleZ => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::PositionX => "Position X",
            Field::PositionY => "Position Y",
            Field::PositionZ => "Position Z",
            Field::RotationX => "Rotation X",
            Field::RotationY => "Rotation Y",
            Field::RotationZ => "Rotation Z",
            Field::ScaleX => "Scale X",
            Field::ScaleY => "Scale Y",
            Field::ScaleZ => "Scale Z",
        }
    }

    pub fn from_label(label: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.label() == label)
    }

    /// Current value, read from the state at call time
    pub fn read(self, state: &TransformState) -> f32 {
        state.channel(self.channel())[self.axis()]
    }
}

/// Inclusive bounds of a control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp into the range. NaN passes through unchanged.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() || self.min > self.max {
            return value;
        }
        value.max(self.min).min(self.max)
    }
}

/// Bounds for each channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelRanges {
    pub position: Range,
    pub rotation: Range,
    pub scale: Range,
}

impl PanelRanges {
    pub fn for_channel(&self, channel: Channel) -> Range {
        match channel {
            Channel::Position => self.position,
            Channel::Rotation => self.rotation,
            Channel::Scale => self.scale,
        }
    }
}

impl Default for PanelRanges {
    fn default() -> Self {
        Self {
            position: Range::new(-5.0, 5.0),
            rotation: Range::new(0.0, TAU),
            scale: Range::new(0.0, 5.0),
        }
    }
}

/// Description of one control as handed to a panel backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlDescriptor {
    pub field: Field,
    pub label: &'static str,
    pub range: Range,
}

impl ControlDescriptor {
    pub fn current_value(&self, state: &TransformState) -> f32 {
        self.field.read(state)
    }

    /// Write an edit into `state`, returning the value actually stored
    pub fn apply(&self, value: f32, state: &mut TransformState) -> f32 {
        let value = self.range.clamp(value);
        state.replace_axis(self.field.channel(), self.field.axis(), value);
        value
    }
}

pub fn descriptors(ranges: &PanelRanges) -> Vec<ControlDescriptor> {
    Field::ALL
        .into_iter()
        .map(|field| ControlDescriptor {
            field,
            label: field.label(),
            range: ranges.for_channel(field.channel()),
        })
        .collect()
}

/// Widget layer that displays the controls.
///
/// `mount` is called once when the handle is created and `unmount` once
/// when it is released.
pub trait PanelBackend {
    fn mount(&mut self, title: &str, controls: &[ControlDescriptor], expanded: bool);
    fn unmount(&mut self);
}

/// Scoped ownership of a mounted control panel.
///
/// The control set is built once; edits go through [`ControlPanelHandle::apply`]
/// and never rebuild it.
pub struct ControlPanelHandle<B: PanelBackend> {
    backend: B,
    controls: Vec<ControlDescriptor>,
    expanded: bool,
    mounted: bool,
}

impl<B: PanelBackend> ControlPanelHandle<B> {
    pub fn mount(mut backend: B, ranges: &PanelRanges, expanded: bool) -> Self {
        let controls = descriptors(ranges);
        backend.mount(PANEL_TITLE, &controls, expanded);
        log::debug!("control panel mounted with {} controls", controls.len());
        Self {
            backend,
            controls,
            expanded,
            mounted: true,
        }
    }

    pub fn controls(&self) -> &[ControlDescriptor] {
        &self.controls
    }

    pub fn descriptor(&self, field: Field) -> Option<&ControlDescriptor> {
        self.controls.iter().find(|control| control.field == field)
    }

    pub fn current_value(&self, field: Field, state: &TransformState) -> f32 {
        field.read(state)
    }

    /// Apply an edit from the backend; returns the stored value
    pub fn apply(&self, field: Field, value: f32, state: &mut TransformState) -> Option<f32> {
        if !self.mounted {
            return None;
        }
        self.descriptor(field).map(|control| control.apply(value, state))
    }

    /// Whether the panel was mounted expanded
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Tear the panel down. Safe to call more than once.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.backend.unmount();
        log::debug!("control panel unmounted");
    }
}

impl<B: PanelBackend> Drop for ControlPanelHandle<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
