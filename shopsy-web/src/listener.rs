/// DOM event listener tied to the lifetime of a Rust value
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget};

/// Registered listener; removed from its target exactly once, at the
/// latest when dropped.
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    closure: Option<Closure<dyn FnMut(Event)>>,
}

impl EventListener {
    pub fn new<F>(target: &EventTarget, event: &'static str, callback: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        log::debug!("listening for '{}'", event);

        Ok(Self {
            target: target.clone(),
            event,
            closure: Some(closure),
        })
    }

    /// Detach from the target. Returns `false` if already detached.
    pub fn remove(&mut self) -> bool {
        let Some(closure) = self.closure.take() else {
            return false;
        };
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, closure.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove '{}' listener: {:?}", self.event, err);
        }
        log::debug!("stopped listening for '{}'", self.event);
        true
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        self.remove();
    }
}
