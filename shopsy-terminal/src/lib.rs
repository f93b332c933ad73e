/// Terminal host for the product viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use shopsy_core::{
    state, Camera, CheckerTexture, ControlPanelHandle, FrameSynchronizer, Mesh, PointLight,
    PointerBus, PointerSample, PointerSubscription, SharedState, Transform, TransformState,
    ViewerConfig,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod panel;
pub mod renderer;

pub use panel::TerminalPanel;
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u32 = 2;

const KEY_HELP: &str = "Up/Down=Select Left/Right=Adjust Tab=Panel P=Projection Q=Quit";

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: Option<Mesh>,
    object: Option<Transform>,
    state: SharedState,
    sync: FrameSynchronizer,
    camera: Camera,
    renderer: AsciiRenderer,
    texture: CheckerTexture,
    pointer: PointerBus,
    light_subscription: PointerSubscription,
    panel: ControlPanelHandle<TerminalPanel>,
    running: bool,
    last_tick: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(config, width, height))
    }

    /// Build the app for a `width x height` cell viewport
    pub fn with_size(config: &ViewerConfig, width: u16, height: u16) -> Self {
        let state = state::shared(TransformState::default());
        let pointer = PointerBus::new();
        let light_subscription = config.light_tracker().attach(&pointer, state.clone());
        let panel = ControlPanelHandle::mount(
            TerminalPanel::new(),
            &config.panel_ranges(),
            config.panel.expanded,
        );

        Self {
            mesh: None,
            object: None,
            state,
            sync: FrameSynchronizer::new(config.animator()),
            camera: config.camera(width as u32, height as u32 * CELL_ASPECT),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            texture: CheckerTexture::default(),
            pointer,
            light_subscription,
            panel,
            running: true,
            last_tick: Instant::now(),
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    /// Attach the displayed model; frames before this only update state
    pub fn load_model(&mut self, mesh: Mesh) {
        log::info!("model loaded with {} triangles", mesh.triangles.len());
        self.mesh = Some(mesh);
        self.object = Some(Transform::identity());
    }

    pub fn state(&self) -> TransformState {
        *self.state.borrow()
    }

    pub fn object(&self) -> Option<&Transform> {
        self.object.as_ref()
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;

        let result = self.main_loop();

        // Cleanup
        self.shutdown();
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    /// Release the pointer listener and the panel. Safe to call twice.
    pub fn shutdown(&mut self) {
        self.running = false;
        self.light_subscription.unsubscribe();
        self.panel.unmount();
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        self.last_tick = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event)?;
            }

            let delta_ms = self.last_tick.elapsed().as_secs_f32() * 1000.0;
            self.last_tick = Instant::now();
            self.update(delta_ms);

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Moved | MouseEventKind::Drag(_),
                column,
                row,
                ..
            }) => {
                let (width, height) = terminal::size()?;
                self.pointer_moved(column, row, width, height);
            }
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
        Ok(())
    }

    /// Feed a pointer position in cells, with the viewport size at event time
    pub fn pointer_moved(&mut self, column: u16, row: u16, width: u16, height: u16) {
        self.pointer.dispatch(PointerSample::new(
            column as f32,
            row as f32,
            width as f32,
            height as f32,
        ));
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Up | KeyCode::Char('k') => self.panel.backend_mut().select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.panel.backend_mut().select_next(),
            KeyCode::Left | KeyCode::Char('h') => self.nudge_selected(-1.0),
            KeyCode::Right | KeyCode::Char('l') => self.nudge_selected(1.0),
            KeyCode::Tab => self.panel.backend_mut().toggle_expanded(),
            KeyCode::Char('p') => {
                self.camera.mode = self.camera.mode.toggled();
            }
            _ => {}
        }
    }

    fn nudge_selected(&mut self, direction: f32) {
        let mut state = self.state.borrow_mut();
        if let Some((field, value)) = self.panel.backend().stepped_value(&state, direction) {
            self.panel.apply(field, value, &mut state);
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.renderer.resize(width as usize, height as usize);
        self.camera.resize(width as u32, height as u32 * CELL_ASPECT);
    }

    /// Advance one frame by `delta_ms`
    pub fn update(&mut self, delta_ms: f32) {
        let state = *self.state.borrow();
        self.sync.tick(delta_ms, &state, self.object.as_mut());
    }

    fn render(&mut self) -> io::Result<()> {
        let state = *self.state.borrow();
        let light = PointLight::new(state.light_position);

        self.renderer.clear();
        if let (Some(mesh), Some(object)) = (&self.mesh, &self.object) {
            self.renderer
                .render_mesh(mesh, &object.model_matrix(), &self.camera, &light, &self.texture);
        }
        self.renderer.mark_light(&self.camera, &light);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Shopsy | FPS: {:.1} | {:?} | {}",
                self.fps, self.camera.mode, KEY_HELP
            )),
            ResetColor
        )?;

        for (offset, line) in self.panel.backend().lines(&state).iter().enumerate() {
            queue!(
                stdout,
                cursor::MoveTo(0, offset as u16 + 2),
                SetForegroundColor(Color::Green),
                Print(line),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn app() -> TerminalApp {
        TerminalApp::with_size(&ViewerConfig::default(), 80, 24)
    }

    #[test]
    fn test_frames_before_model_are_skipped() {
        let mut app = app();
        app.update(500.0);
        assert!(app.object().is_none());

        app.load_model(Mesh::cube(1.0, 1));
        app.update(0.0);
        assert_eq!(app.object().unwrap().translation.y, -5.0);
    }

    #[test]
    fn test_pointer_moves_light() {
        let mut app = app();
        app.pointer_moved(0, 0, 80, 24);
        assert_eq!(app.state().light_position, Vector3::new(-5.0, 5.0, 5.0));
        app.pointer_moved(40, 12, 80, 24);
        assert_eq!(app.state().light_position, Vector3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_arrow_keys_edit_selected_control() {
        let mut app = app();
        app.load_model(Mesh::cube(1.0, 1));
        app.update(0.0);

        app.handle_key(KeyCode::Right);
        assert!((app.state().position.x - 0.25).abs() < 1e-6);
        app.update(16.0);
        assert!((app.object().unwrap().translation.x - 0.25).abs() < 1e-6);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.state().position.z, -0.25);
    }

    #[test]
    fn test_scale_cannot_go_negative_from_keys() {
        let mut app = app();
        // Up from Position X wraps around to Scale Z, Scale Y, then Scale X
        for _ in 0..3 {
            app.handle_key(KeyCode::Up);
        }
        for _ in 0..100 {
            app.handle_key(KeyCode::Left);
        }
        assert_eq!(app.state().scale, Vector3::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_shutdown_releases_listener_once() {
        let mut app = app();
        app.shutdown();
        app.shutdown();
        app.pointer_moved(0, 0, 80, 24);
        assert_eq!(app.state().light_position, Vector3::zeros());
    }

    #[test]
    fn test_quit_key_stops_loop() {
        let mut app = app();
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.running);
    }
}
