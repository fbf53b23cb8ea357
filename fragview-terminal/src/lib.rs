/// Terminal front end: paints fragment scenes as ASCII art
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use fragview_core::{Camera, Fragments, ObjectContainer, RotationState, Transform};
use nalgebra::Matrix4;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod renderer;
pub mod scene;

pub use config::{ConfigError, SurfaceKind, ViewerConfig};
pub use renderer::AsciiRenderer;
pub use scene::build_scene;

// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 0.5;

/// Main application struct for terminal rendering
pub struct TerminalApp {
    scene: ObjectContainer,
    config: ViewerConfig,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f64,
    fragment_count: usize,
}

impl TerminalApp {
    pub fn new(scene: ObjectContainer, config: ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let [rx, ry, rz] = config.initial_rotation;

        Ok(Self {
            scene,
            config,
            rotation: RotationState::new(rx, ry, rz),
            camera: Self::camera_for(width, height),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            fragment_count: 0,
        })
    }

    fn camera_for(width: u16, height: u16) -> Camera {
        let mut camera = Camera::new(u32::from(width), u32::from(height));
        camera.aspect *= CELL_ASPECT;
        camera
    }

    /// Outer transform for the scene root at the current rotation
    pub fn scene_matrix(&self) -> Matrix4<f64> {
        let (w, h) = (self.renderer.width() as u32, self.renderer.height() as u32);
        self.camera.scene_matrix(w, h) * Transform::rotation_matrix(&self.rotation)
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.config.target_fps.max(1)));

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = f64::from(self.frame_count) / (now - self.last_frame).as_secs_f64();
                self.frame_count = 0;
                self.last_frame = now;
                log::trace!("{:.1} fps, {} fragments", self.fps, self.fragment_count);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, .. }) => self.handle_key(code),
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {width}x{height}");
                self.camera = Self::camera_for(width, height);
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.rotation.rotate(0.1, 0.0, 0.0);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.rotation.rotate(-0.1, 0.0, 0.0);
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.rotation.rotate(0.0, -0.1, 0.0);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.rotation.rotate(0.0, 0.1, 0.0);
            }
            KeyCode::Char('e') => {
                self.rotation.rotate(0.0, 0.0, 0.1);
            }
            KeyCode::Char('r') => {
                self.rotation.rotate(0.0, 0.0, -0.1);
            }
            _ => {}
        }
    }

    fn update(&mut self) {
        let [dx, dy, dz] = self.config.spin;
        self.rotation.rotate(dx, dy, dz);
    }

    fn render(&mut self) -> io::Result<()> {
        let m = self.scene_matrix();

        let mut fragments = Vec::new();
        self.scene.get_fragments(&m, &mut fragments);
        self.fragment_count = fragments.len();

        self.renderer.clear();
        self.renderer.paint(&fragments);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "fragview | FPS: {:.1} | fragments: {} | WASD/Arrows=Rotate E/R=Roll Q=Quit",
                self.fps, self.fragment_count
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
