/// View state and the per-tick input that drives it
use nalgebra::{Point2, Vector2};

use crate::config::ViewConfig;
use crate::projection::Vec2;
use crate::transform::SpinState;

/// Input sampled by the host once per tick.
///
/// Positions are in window-relative canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub pointer: Point2<i32>,
    /// Left button went down this tick
    pub left_pressed: bool,
    pub left_held: bool,
    /// Left button went up this tick
    pub left_released: bool,
    /// Vertical wheel delta in notches, positive zooms in
    pub scroll: f64,
    pub left_key: bool,
    pub right_key: bool,
    /// Where the host window currently sits on screen
    pub window_origin: Point2<i32>,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            pointer: Point2::origin(),
            left_pressed: false,
            left_held: false,
            left_released: false,
            scroll: 0.0,
            left_key: false,
            right_key: false,
            window_origin: Point2::origin(),
        }
    }
}

/// New window origin requested by a drag; moving the window is up to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowMove {
    pub origin: Point2<i32>,
}

/// What one tick of input did to the view
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewUpdate {
    pub redraw: bool,
    pub window_move: Option<WindowMove>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    anchor: Point2<i32>,
    window: Point2<i32>,
}

/// Zoom, spin and drag state shared by every stage of a frame
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub scale: f64,
    pub spin: SpinState,
    pub tilt_ratio: f64,
    pub center: Vec2,
    min_scale: f64,
    zoom_step: f64,
    spin_speed: f64,
    drag: Option<Drag>,
}

impl ViewState {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            scale: config.initial_scale,
            spin: SpinState::zero(),
            tilt_ratio: config.tilt_ratio,
            center: config.center(),
            min_scale: config.min_scale,
            zoom_step: config.zoom_step,
            spin_speed: config.spin_speed,
            drag: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether a pointer position falls on the sphere's screen disc
    pub fn is_over_sphere(&self, pointer: Point2<i32>) -> bool {
        let radius = self.scale as i64;
        let dx = (pointer.x as i64).saturating_sub(self.center.x as i64);
        let dy = (pointer.y as i64).saturating_sub(self.center.y as i64);
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy)) <= radius.saturating_mul(radius)
    }

    /// Apply one tick of input: direction keys, zoom, idle spin, then drag
    pub fn apply_input(&mut self, input: &FrameInput) -> ViewUpdate {
        let mut update = ViewUpdate::default();

        if input.left_key {
            self.spin.direction = -1.0;
        }
        if input.right_key {
            self.spin.direction = 1.0;
        }

        if input.scroll != 0.0 {
            self.scale = (self.scale + input.scroll * self.zoom_step).max(self.min_scale);
            update.redraw = true;
        }

        if !self.is_dragging() {
            self.spin.advance(self.spin_speed);
            update.redraw = true;
        }

        if input.left_pressed && self.is_over_sphere(input.pointer) {
            self.drag = Some(Drag {
                anchor: input.pointer,
                window: input.window_origin,
            });
        }

        if input.left_held {
            if let Some(drag) = self.drag.as_mut() {
                if input.pointer != drag.anchor {
                    let delta: Vector2<i32> = input.pointer - drag.anchor;
                    let origin = drag.window + delta;
                    drag.anchor = input.pointer;
                    drag.window = origin;
                    update.window_move = Some(WindowMove { origin });
                }
            }
        }

        if input.left_released {
            self.drag = None;
        }

        update
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&ViewConfig::default())
    }
}
