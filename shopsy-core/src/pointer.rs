/// Pointer subscriptions and the pointer-driven light
use nalgebra::Vector3;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::state::{SharedState, TransformState};

/// Default half-extent of the light's travel on X and Y
pub const LIGHT_RANGE: f32 = 5.0;

/// Default distance of the light in front of the scene
pub const LIGHT_DEPTH: f32 = 5.0;

/// Pointer position together with the viewport size read at event time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub client_x: f32,
    pub client_y: f32,
    pub width: f32,
    pub height: f32,
}

impl PointerSample {
    pub fn new(client_x: f32, client_y: f32, width: f32, height: f32) -> Self {
        Self {
            client_x,
            client_y,
            width,
            height,
        }
    }

    /// Coordinates in `[-1, 1]`, X left to right and Y bottom to top
    pub fn normalized(&self) -> (f32, f32) {
        let x = (self.client_x / self.width) * 2.0 - 1.0;
        let y = -(self.client_y / self.height) * 2.0 + 1.0;
        (x, y)
    }
}

type Listener = Rc<RefCell<dyn FnMut(PointerSample)>>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Fan-out point for pointer-move events.
///
/// Hosts translate their native events into [`PointerSample`]s and call
/// [`PointerBus::dispatch`]; listeners hold a [`PointerSubscription`].
#[derive(Clone, Default)]
pub struct PointerBus {
    inner: Rc<RefCell<BusInner>>,
}

impl PointerBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> PointerSubscription
    where
        F: FnMut(PointerSample) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        inner.listeners.push((id, listener));
        log::debug!("pointer listener {} registered", id);

        PointerSubscription {
            bus: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Deliver a sample to every current listener
    pub fn dispatch(&self, sample: PointerSample) {
        // Snapshot so listeners may unsubscribe while being called
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            if let Ok(mut callback) = listener.try_borrow_mut() {
                (&mut *callback)(sample);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Registration on a [`PointerBus`], released on drop
pub struct PointerSubscription {
    bus: Weak<RefCell<BusInner>>,
    id: Option<u64>,
}

impl PointerSubscription {
    /// Remove the listener. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self) -> bool {
        let Some(id) = self.id.take() else {
            return false;
        };
        let Some(bus) = self.bus.upgrade() else {
            return false;
        };
        let mut inner = bus.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
        log::debug!("pointer listener {} released", id);
        inner.listeners.len() != before
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Maps pointer samples to a light position in front of the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerLightTracker {
    pub range: f32,
    pub depth: f32,
}

impl PointerLightTracker {
    pub fn new(range: f32, depth: f32) -> Self {
        Self { range, depth }
    }

    pub fn light_position(&self, sample: &PointerSample) -> Vector3<f32> {
        let (x, y) = sample.normalized();
        Vector3::new(x * self.range, y * self.range, self.depth)
    }

    pub fn apply(&self, sample: &PointerSample, state: &mut TransformState) {
        state.light_position = self.light_position(sample);
    }

    /// Subscribe to `bus`, writing every sample into `state`
    pub fn attach(self, bus: &PointerBus, state: SharedState) -> PointerSubscription {
        bus.subscribe(move |sample| {
            log::trace!("pointer at ({}, {})", sample.client_x, sample.client_y);
            if let Ok(mut state) = state.try_borrow_mut() {
                self.apply(&sample, &mut state);
            }
        })
    }
}

impl Default for PointerLightTracker {
    fn default() -> Self {
        Self::new(LIGHT_RANGE, LIGHT_DEPTH)
    }
}
