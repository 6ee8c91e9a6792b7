/// Terminal viewer for meshes produced by lathe-core
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::debug;

pub mod camera;
pub mod renderer;
pub mod scene;

pub use camera::{Camera, Orientation};
pub use renderer::AsciiRenderer;
pub use scene::{DisplayMode, Scene, SceneConfig, SceneSet};

/// Rotation applied per key press, in radians
const ROTATE_STEP: f32 = 0.1;

/// Main application struct for terminal mesh viewing
pub struct TerminalApp {
    scenes: SceneSet,
    active: Scene,
    mode: DisplayMode,
    orientation: Orientation,
    auto_spin: bool,
    camera: Camera,
    renderer: AsciiRenderer,
    frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scenes: SceneSet, active: Scene, mode: DisplayMode, fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        // Top row is reserved for the status line
        let height = height.saturating_sub(1).max(1);

        let mut camera = Camera::new(width as u32, height as u32);
        camera.frame(1.0);

        Ok(Self {
            scenes,
            active,
            mode,
            orientation: Orientation::default(),
            auto_spin: true,
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            frame_time: Duration::from_millis(1000 / u64::from(fps.max(1))),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
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
        let mut previous = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.update(frame_start.duration_since(previous));
            previous = frame_start;

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                let height = height.saturating_sub(1).max(1);
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
                self.camera.resize(width as u32, height as u32);
                self.camera.frame(1.0);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char(key @ '1'..='4') => {
                if let Some(scene) = Scene::from_key(key) {
                    debug!(scene = scene.title(), "switched scene");
                    self.active = scene;
                }
            }
            KeyCode::Char('m') => {
                self.mode = self.mode.next();
            }
            KeyCode::Char(' ') => {
                self.auto_spin = !self.auto_spin;
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.orientation.rotate(ROTATE_STEP, 0.0);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.orientation.rotate(-ROTATE_STEP, 0.0);
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.orientation.rotate(0.0, -ROTATE_STEP);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.orientation.rotate(0.0, ROTATE_STEP);
            }
            _ => {}
        }
    }

    fn update(&mut self, delta: Duration) {
        if self.auto_spin {
            self.orientation.advance(delta.as_secs_f32());
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let scene = self.scenes.get(self.active);
        let model = self.orientation.model_matrix(&scene.center, scene.radius);

        self.renderer.clear();
        self.renderer
            .render_mesh(&scene.mesh, &model, &self.camera, self.mode);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Lathe | {} ({} tris) | {} | FPS: {:.1} | 1-4=Scene M=Mode WASD=Rotate Space=Spin Q=Quit",
                self.active.title(),
                scene.mesh.triangle_count(),
                self.mode.title(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
