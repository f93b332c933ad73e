/// Keyboard-driven control panel drawn as a text overlay
use shopsy_core::panel::{ControlDescriptor, Field, PanelBackend};
use shopsy_core::TransformState;

/// Number of arrow presses to sweep a control across its range
const STEPS_PER_RANGE: f32 = 40.0;

/// Width of the slider bar in characters
const BAR_WIDTH: usize = 12;

#[derive(Debug, Default)]
pub struct TerminalPanel {
    title: String,
    controls: Vec<ControlDescriptor>,
    selected: usize,
    expanded: bool,
}

impl TerminalPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_field(&self) -> Option<Field> {
        self.controls.get(self.selected).map(|control| control.field)
    }

    pub fn select_next(&mut self) {
        if !self.controls.is_empty() {
            self.selected = (self.selected + 1) % self.controls.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.controls.is_empty() {
            self.selected = (self.selected + self.controls.len() - 1) % self.controls.len();
        }
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Value one step away from the current one in `direction`
    pub fn stepped_value(&self, state: &TransformState, direction: f32) -> Option<(Field, f32)> {
        let control = self.controls.get(self.selected)?;
        let step = (control.range.max - control.range.min) / STEPS_PER_RANGE;
        Some((control.field, control.current_value(state) + direction * step))
    }

    /// Overlay text, with values read from `state`
    pub fn lines(&self, state: &TransformState) -> Vec<String> {
        if self.controls.is_empty() {
            return Vec::new();
        }

        let marker = if self.expanded { "v" } else { ">" };
        let mut lines = vec![format!("{} {}", marker, self.title)];
        if !self.expanded {
            return lines;
        }

        for (index, control) in self.controls.iter().enumerate() {
            let value = control.current_value(state);
            let cursor = if index == self.selected { '>' } else { ' ' };
            lines.push(format!(
                "{} {:<10} [{}] {:>6.2}",
                cursor,
                control.label,
                slider(value, control.range.min, control.range.max),
                value
            ));
        }
        lines
    }
}

impl PanelBackend for TerminalPanel {
    fn mount(&mut self, title: &str, controls: &[ControlDescriptor], expanded: bool) {
        self.title = title.to_string();
        self.controls = controls.to_vec();
        self.selected = 0;
        self.expanded = expanded;
    }

    fn unmount(&mut self) {
        self.controls.clear();
    }
}

fn slider(value: f32, min: f32, max: f32) -> String {
    let span = max - min;
    let fraction = if span > 0.0 { ((value - min) / span).clamp(0.0, 1.0) } else { 0.0 };
    // NaN values leave the bar empty
    let filled = if fraction.is_nan() { 0 } else { (fraction * BAR_WIDTH as f32).round() as usize };
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
