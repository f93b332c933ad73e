/// Control panel built from DOM range inputs
use shopsy_core::panel::{ControlDescriptor, Field, PanelBackend};
use shopsy_core::{SharedState, TransformState};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement};

use crate::listener::EventListener;

/// Slider resolution
const INPUT_STEP: &str = "0.01";

pub fn format_value(value: f32) -> String {
    format!("{:.2}", value)
}

struct DomControl {
    field: Field,
    input: HtmlInputElement,
    output: Element,
}

pub struct DomPanel {
    document: Document,
    parent: Element,
    state: SharedState,
    root: Option<Element>,
    controls: Vec<DomControl>,
    listeners: Vec<EventListener>,
}

impl DomPanel {
    pub fn new(document: Document, parent: Element, state: SharedState) -> Self {
        Self {
            document,
            parent,
            state,
            root: None,
            controls: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Copy current state values into the inputs
    pub fn refresh(&self, state: &TransformState) {
        for control in &self.controls {
            let value = control.field.read(state);
            control.input.set_value_as_number(value as f64);
            control.output.set_text_content(Some(&format_value(value)));
        }
    }

    fn build(
        &mut self,
        title: &str,
        controls: &[ControlDescriptor],
        expanded: bool,
    ) -> Result<(), JsValue> {
        let root = self.document.create_element("details")?;
        root.set_class_name("model-controls");
        if expanded {
            root.set_attribute("open", "")?;
        }

        let summary = self.document.create_element("summary")?;
        summary.set_text_content(Some(title));
        root.append_child(&summary)?;

        let state = *self.state.borrow();
        for descriptor in controls {
            let row = self.document.create_element("label")?;
            row.set_text_content(Some(descriptor.label));

            let input = self.document.create_element("input")?.dyn_into::<HtmlInputElement>()?;
            input.set_type("range");
            input.set_min(&descriptor.range.min.to_string());
            input.set_max(&descriptor.range.max.to_string());
            input.set_step(INPUT_STEP);
            input.set_value_as_number(descriptor.current_value(&state) as f64);
            row.append_child(&input)?;

            let output = self.document.create_element("output")?;
            output.set_text_content(Some(&format_value(descriptor.current_value(&state))));
            row.append_child(&output)?;

            root.append_child(&row)?;

            let listener = {
                let descriptor = *descriptor;
                let state = self.state.clone();
                let input = input.clone();
                let output = output.clone();
                EventListener::new(&input.clone().into(), "input", move |_event| {
                    let Ok(mut state) = state.try_borrow_mut() else {
                        return;
                    };
                    let stored = descriptor.apply(input.value_as_number() as f32, &mut state);
                    output.set_text_content(Some(&format_value(stored)));
                })?
            };
            self.listeners.push(listener);
            self.controls.push(DomControl {
                field: descriptor.field,
                input,
                output,
            });
        }

        self.parent.append_child(&root)?;
        self.root = Some(root);
        Ok(())
    }
}

impl PanelBackend for DomPanel {
    fn mount(&mut self, title: &str, controls: &[ControlDescriptor], expanded: bool) {
        if let Err(err) = self.build(title, controls, expanded) {
            log::error!("failed to build control panel: {:?}", err);
        }
    }

    fn unmount(&mut self) {
        for listener in &mut self.listeners {
            listener.remove();
        }
        self.listeners.clear();
        self.controls.clear();
        if let Some(root) = self.root.take() {
            root.remove();
        }
    }
}
