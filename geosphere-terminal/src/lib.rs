/// Terminal host for the geosphere renderer
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use geosphere_core::{FrameDriver, RenderError, SphereConfig};
use nalgebra::Point2;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod input;
pub mod renderer;

pub use input::InputCollector;
pub use renderer::HalfBlockRenderer;

/// Rows reserved at the top for the status line
const STATUS_ROWS: u16 = 1;

/// Main application struct for terminal sphere rendering
pub struct TerminalApp {
    driver: FrameDriver,
    renderer: HalfBlockRenderer,
    input: InputCollector,
    title: String,
    canvas_size: (usize, usize),
    /// Where the canvas has been dragged to, in canvas pixels
    window_origin: Point2<i32>,
    target_frame_time: Duration,
    started: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &SphereConfig) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let canvas_size = (config.canvas.width, config.canvas.height);

        Ok(Self {
            driver: FrameDriver::new(config),
            renderer: Self::layout(cols, rows, canvas_size),
            input: InputCollector::new(),
            title: config.window.title.clone(),
            canvas_size,
            window_origin: Point2::origin(),
            target_frame_time: Duration::from_secs(1) / config.window.fps.max(1),
            started: Instant::now(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    fn layout(cols: u16, rows: u16, canvas_size: (usize, usize)) -> HalfBlockRenderer {
        let rows = rows.saturating_sub(STATUS_ROWS);
        HalfBlockRenderer::new(cols as usize, rows as usize, canvas_size.0, canvas_size.1)
    }

    pub fn run(&mut self) -> Result<(), RenderError> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> Result<(), RenderError> {
        info!(title = %self.title, "entering frame loop");

        loop {
            let frame_start = Instant::now();

            // Drain pending input
            while event::poll(Duration::from_millis(0))? {
                self.input.handle(&event::read()?);
            }
            if self.input.quit_requested() {
                break;
            }
            if let Some((cols, rows)) = self.input.take_resize() {
                debug!(cols, rows, "terminal resized");
                self.renderer = Self::layout(cols, rows, self.canvas_size);
                queue!(stdout(), terminal::Clear(ClearType::All))?;
            }

            // Update
            let frame_input = self.input.take(&self.renderer, self.window_origin);
            if let Some(window_move) = self.driver.update(&frame_input) {
                self.window_origin = window_move.origin;
            }

            // Render
            self.driver.draw(self.started.elapsed().as_secs_f64())?;
            self.present()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
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

    fn present(&self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, STATUS_ROWS))?;
        self.renderer
            .draw(&mut stdout, self.driver.canvas(), self.window_origin)?;

        let view = self.driver.view();
        let lod = self.driver.lod().unwrap_or_default();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "{} | FPS: {:.1} | Scale: {:.0} | LOD: {} | Controls: Wheel/+-=Zoom Arrows/AD=Spin Drag=Move Q=Quit",
                self.title, self.fps, view.scale, lod
            )),
            ResetColor
        )?;

        stdout.flush()
    }
}
