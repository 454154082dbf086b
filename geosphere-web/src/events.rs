/// Browser pointer/wheel/key events folded into per-frame input
use geosphere_core::FrameInput;
use nalgebra::Point2;

#[derive(Debug, Default)]
pub struct PendingInput {
    pointer: Point2<i32>,
    left_held: bool,
    left_pressed: bool,
    left_released: bool,
    scroll: f64,
    left_key: bool,
    right_key: bool,
}

impl PendingInput {
    pub fn pointer_move(&mut self, x: i32, y: i32) {
        self.pointer = Point2::new(x, y);
    }

    pub fn pointer_down(&mut self, x: i32, y: i32) {
        self.pointer_move(x, y);
        self.left_pressed = true;
        self.left_held = true;
    }

    pub fn pointer_up(&mut self, x: i32, y: i32) {
        self.pointer_move(x, y);
        self.left_released = true;
        self.left_held = false;
    }

    /// Browser wheel delta; positive `delta_y` scrolls down, which zooms out
    pub fn wheel(&mut self, delta_y: f64) {
        if delta_y != 0.0 {
            self.scroll -= delta_y.signum();
        }
    }

    /// `KeyboardEvent.key` of a key that is down this frame
    pub fn key(&mut self, key: &str) {
        match key {
            "ArrowLeft" | "a" => self.left_key = true,
            "ArrowRight" | "d" => self.right_key = true,
            _ => {}
        }
    }

    pub fn take(&mut self, window_origin: Point2<i32>) -> FrameInput {
        let input = FrameInput {
            pointer: self.pointer,
            left_pressed: self.left_pressed,
            left_held: self.left_held,
            left_released: self.left_released,
            scroll: self.scroll,
            left_key: self.left_key,
            right_key: self.right_key,
            window_origin,
        };

        self.left_pressed = false;
        self.left_released = false;
        self.scroll = 0.0;
        self.left_key = false;
        self.right_key = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_direction() {
        let mut pending = PendingInput::default();
        pending.wheel(-120.0);
        pending.wheel(-3.0);
        pending.wheel(0.0);
        assert_eq!(pending.take(Point2::origin()).scroll, 2.0);

        pending.wheel(53.0);
        assert_eq!(pending.take(Point2::origin()).scroll, -1.0);
    }

    #[test]
    fn test_press_release_edges() {
        let mut pending = PendingInput::default();
        pending.pointer_down(300, 310);
        let input = pending.take(Point2::new(5, 6));
        assert!(input.left_pressed && input.left_held);
        assert_eq!(input.pointer, Point2::new(300, 310));
        assert_eq!(input.window_origin, Point2::new(5, 6));

        pending.pointer_move(320, 310);
        let input = pending.take(Point2::origin());
        assert!(!input.left_pressed && input.left_held);

        pending.pointer_up(320, 310);
        let input = pending.take(Point2::origin());
        assert!(input.left_released && !input.left_held);
    }

    #[test]
    fn test_arrow_keys() {
        let mut pending = PendingInput::default();
        pending.key("ArrowRight");
        pending.key("Enter");
        let input = pending.take(Point2::origin());
        assert!(input.right_key && !input.left_key);
        assert!(!pending.take(Point2::origin()).right_key);
    }
}
