/// Shopsy Web - WASM host for the product viewer
///
/// JavaScript owns the `requestAnimationFrame` loop and calls
/// [`WebViewer::frame`] with the frame timestamp; everything else (pointer
/// tracking, the control panel, canvas drawing) lives here.

use shopsy_core::panel::Field;
use shopsy_core::{
    state, Camera, CheckerTexture, ControlPanelHandle, FrameSynchronizer, Mesh, PointLight,
    PointerBus, PointerSample, PointerSubscription, SharedState, Transform, TransformState,
    ViewerConfig,
};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent};

pub mod canvas;
pub mod dom_panel;
pub mod listener;

use canvas::{project_faces, CanvasRenderer};
use dom_panel::DomPanel;
use listener::EventListener;

/// Per-frame delta derived from successive animation-frame timestamps
#[derive(Debug, Default)]
struct FrameClock {
    last_timestamp: Option<f64>,
}

impl FrameClock {
    fn delta_ms(&mut self, timestamp_ms: f64) -> f32 {
        let delta = match self.last_timestamp {
            Some(last) => timestamp_ms - last,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        delta as f32
    }

    fn reset(&mut self) {
        self.last_timestamp = None;
    }
}

struct Mounted {
    canvas: CanvasRenderer,
    // Drop order: listener first, then the subscription it feeds
    _pointer_listener: EventListener,
    light_subscription: PointerSubscription,
    panel: ControlPanelHandle<DomPanel>,
}

#[wasm_bindgen]
pub struct WebViewer {
    config: ViewerConfig,
    state: SharedState,
    sync: FrameSynchronizer,
    mesh: Mesh,
    object: Option<Transform>,
    camera: Camera,
    texture: CheckerTexture,
    pointer: PointerBus,
    clock: FrameClock,
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl WebViewer {
    /// Create a viewer, optionally from a TOML config document
    #[wasm_bindgen(constructor)]
    pub fn new(config_toml: Option<String>) -> Result<WebViewer, JsValue> {
        let config = match config_toml {
            Some(text) => {
                ViewerConfig::from_toml_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => ViewerConfig::default(),
        };

        Ok(WebViewer {
            sync: FrameSynchronizer::new(config.animator()),
            camera: config.camera(800, 600),
            config,
            state: state::shared(TransformState::default()),
            mesh: Mesh::cube(2.0, 2),
            object: None,
            texture: CheckerTexture::default(),
            pointer: PointerBus::new(),
            clock: FrameClock::default(),
            mounted: None,
        })
    }

    /// Attach to the canvas with id `canvas_id`, start tracking the pointer
    /// and build the control panel next to the canvas
    pub fn mount(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        if self.mounted.is_some() {
            return Ok(());
        }

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{}'", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()?;
        let parent = canvas
            .parent_element()
            .ok_or_else(|| JsValue::from_str("canvas has no parent element"))?;

        self.reset_scene();
        let tracker = self.config.light_tracker();
        let light_subscription = tracker.attach(&self.pointer, self.state.clone());

        let pointer_listener = {
            let bus = self.pointer.clone();
            let window = window.clone();
            EventListener::new(&window.clone().into(), "pointermove", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                // Viewport size is read per event so resizes are picked up
                let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                bus.dispatch(PointerSample::new(
                    event.client_x() as f32,
                    event.client_y() as f32,
                    width as f32,
                    height as f32,
                ));
            })?
        };

        let panel = ControlPanelHandle::mount(
            DomPanel::new(document, parent, self.state.clone()),
            &self.config.panel_ranges(),
            self.config.panel.expanded,
        );

        self.mounted = Some(Mounted {
            canvas: CanvasRenderer::new(canvas)?,
            _pointer_listener: pointer_listener,
            light_subscription,
            panel,
        });
        self.object = Some(Transform::identity());
        log::info!("viewer mounted on #{}", canvas_id);
        Ok(())
    }

    /// Advance and draw one frame; `timestamp_ms` is the
    /// `requestAnimationFrame` timestamp
    pub fn frame(&mut self, timestamp_ms: f64) {
        let delta_ms = self.clock.delta_ms(timestamp_ms);
        let state = *self.state.borrow();
        self.sync.tick(delta_ms, &state, self.object.as_mut());

        let (Some(mounted), Some(object)) = (&self.mounted, &self.object) else {
            return;
        };
        let (width, height) = mounted.canvas.fit_to_display();
        self.camera.resize(width, height);
        let faces = project_faces(
            &self.mesh,
            &object.model_matrix(),
            &self.camera,
            &PointLight::new(state.light_position),
            &self.texture,
            width,
            height,
        );
        mounted.canvas.render(&faces);
    }

    /// Set a control by its label (e.g. "Position Y"); returns the stored value
    pub fn set_control(&mut self, label: &str, value: f32) -> Result<f32, JsValue> {
        let field = Field::from_label(label)
            .ok_or_else(|| JsValue::from_str(&format!("unknown control '{}'", label)))?;
        let mounted = self
            .mounted
            .as_ref()
            .ok_or_else(|| JsValue::from_str("viewer is not mounted"))?;

        let stored = {
            let mut state = self.state.borrow_mut();
            mounted.panel.apply(field, value, &mut state)
        };
        mounted.panel.backend().refresh(&self.state.borrow());
        stored.ok_or_else(|| JsValue::from_str("control panel is not mounted"))
    }

    #[wasm_bindgen(getter)]
    pub fn light_position(&self) -> Vec<f32> {
        self.state.borrow().light_position.iter().copied().collect()
    }

    #[wasm_bindgen(getter)]
    pub fn object_position(&self) -> Vec<f32> {
        self.object
            .map(|object| object.translation.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Remove listeners and the panel and drop the scene's object.
    /// Safe to call more than once.
    pub fn unmount(&mut self) {
        let Some(mut mounted) = self.mounted.take() else {
            return;
        };
        mounted._pointer_listener.remove();
        mounted.light_subscription.unsubscribe();
        mounted.panel.unmount();
        self.object = None;
        log::info!("viewer unmounted");
    }
}

impl WebViewer {
    /// Fresh target state and entrance animation for a new mount
    fn reset_scene(&mut self) {
        self.state = state::shared(TransformState::default());
        self.sync = FrameSynchronizer::new(self.config.animator());
        self.clock.reset();
    }
}

impl Drop for WebViewer {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_frame_clock_first_frame_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.delta_ms(1234.5), 0.0);
        assert_eq!(clock.delta_ms(1250.5), 16.0);
        clock.reset();
        assert_eq!(clock.delta_ms(5000.0), 0.0);
    }

    #[test]
    fn test_frame_clock_backwards_timestamp() {
        let mut clock = FrameClock::default();
        clock.delta_ms(100.0);
        assert!(clock.delta_ms(90.0) < 0.0);
    }

    #[test]
    fn test_unmounted_viewer_frames_are_noops() {
        let mut viewer = WebViewer::new(None).unwrap();
        viewer.frame(0.0);
        viewer.frame(16.0);
        assert!(viewer.object_position().is_empty());
        assert_eq!(viewer.sync.frames_applied(), 0);
    }

    #[test]
    fn test_remount_replays_entrance() {
        let mut viewer = WebViewer::new(None).unwrap();
        viewer.reset_scene();
        viewer.object = Some(Transform::identity());
        viewer.frame(0.0);
        viewer.frame(3000.0);
        assert_eq!(viewer.object_position(), vec![0.0, 0.0, 0.0]);

        viewer.state.borrow_mut().light_position = Vector3::new(1.0, 2.0, 5.0);
        viewer.state.borrow_mut().scale = Vector3::new(2.0, 2.0, 2.0);
        viewer.unmount();
        viewer.object = None;

        viewer.reset_scene();
        viewer.object = Some(Transform::identity());
        viewer.frame(10000.0);
        assert_eq!(viewer.object_position(), vec![0.0, -5.0, 0.0]);
        assert_eq!(viewer.sync.animator().runs_started(), 1);
        assert_eq!(viewer.light_position(), vec![0.0, 0.0, 0.0]);
        assert_eq!(viewer.state.borrow().scale, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_config_document_is_applied() {
        let viewer = WebViewer::new(Some("[entrance]\nduration_ms = 250".to_string())).unwrap();
        assert_eq!(viewer.config.entrance.duration_ms, 250.0);
    }
}
