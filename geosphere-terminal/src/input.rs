/// Collects crossterm events between ticks into a `FrameInput`
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use geosphere_core::FrameInput;
use nalgebra::Point2;

use crate::renderer::HalfBlockRenderer;

/// Event accumulator; edges (press, release, scroll, keys) reset on `take`
#[derive(Debug, Default)]
pub struct InputCollector {
    cell: (u16, u16),
    /// Window origin when the left button went down; held fixed while dragging
    grab_origin: Option<Point2<i32>>,
    left_held: bool,
    left_pressed: bool,
    left_released: bool,
    scroll: f64,
    left_key: bool,
    right_key: bool,
    quit: bool,
    resized: Option<(u16, u16)>,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// New terminal size, if the terminal was resized since the last call
    pub fn take_resize(&mut self) -> Option<(u16, u16)> {
        self.resized.take()
    }

    pub fn handle(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => self.resized = Some((*cols, *rows)),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('a') | KeyCode::Left => self.left_key = true,
            KeyCode::Char('d') | KeyCode::Right => self.right_key = true,
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => self.scroll += 1.0,
            KeyCode::Char('-') | KeyCode::Down => self.scroll -= 1.0,
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        self.cell = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.left_pressed = true;
                self.left_held = true;
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.left_released = true;
                self.left_held = false;
            }
            MouseEventKind::Drag(MouseButton::Left) => self.left_held = true,
            MouseEventKind::ScrollUp => self.scroll += 1.0,
            MouseEventKind::ScrollDown => self.scroll -= 1.0,
            _ => {}
        }
    }

    /// Snapshot this tick's input and clear the edge-triggered parts.
    ///
    /// The terminal cursor does not move when the canvas pans, so while the
    /// button is held the pointer is measured against the origin from the
    /// press.
    pub fn take(&mut self, renderer: &HalfBlockRenderer, window_origin: Point2<i32>) -> FrameInput {
        if self.left_pressed {
            self.grab_origin = Some(window_origin);
        }
        let (col, row) = self.cell;
        let frame = self.grab_origin.unwrap_or(window_origin);
        let input = FrameInput {
            pointer: renderer.cell_to_canvas(col, row, frame),
            left_pressed: self.left_pressed,
            left_held: self.left_held,
            left_released: self.left_released,
            scroll: self.scroll,
            left_key: self.left_key,
            right_key: self.right_key,
            window_origin,
        };

        if !self.left_held {
            self.grab_origin = None;
        }
        self.left_pressed = false;
        self.left_released = false;
        self.scroll = 0.0;
        self.left_key = false;
        self.right_key = false;
        input
    }
}
