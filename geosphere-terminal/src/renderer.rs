/// Truecolor half-block presenter for the offscreen canvas
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use geosphere_core::{Canvas, Rgba};
use nalgebra::Point2;
use std::io::Write;

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '▀';

/// Maps a canvas onto a grid of terminal cells, two pixel rows per cell
pub struct HalfBlockRenderer {
    cols: usize,
    rows: usize,
    /// Canvas pixels per terminal column (and per half row)
    step: usize,
}

impl HalfBlockRenderer {
    /// Fit a `canvas_width` × `canvas_height` canvas into `cols` × `rows` cells
    pub fn new(cols: usize, rows: usize, canvas_width: usize, canvas_height: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let step_x = canvas_width.div_ceil(cols);
        let step_y = canvas_height.div_ceil(rows * 2);
        Self {
            cols,
            rows,
            step: step_x.max(step_y).max(1),
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Window-relative canvas position under a terminal cell.
    ///
    /// `origin` is where the canvas has been dragged to, in canvas pixels.
    pub fn cell_to_canvas(&self, col: u16, row: u16, origin: Point2<i32>) -> Point2<i32> {
        let step = self.step as i32;
        let screen_x = col as i32 * step + step / 2;
        let screen_y = row as i32 * step * 2 + step;
        Point2::new(screen_x - origin.x, screen_y - origin.y)
    }

    fn sample(&self, canvas: &Canvas, screen_x: i64, screen_y: i64, origin: Point2<i32>) -> Color {
        match canvas.get(screen_x - origin.x as i64, screen_y - origin.y as i64) {
            Some(Rgba { a: 0, .. }) | None => Color::Reset,
            Some(p) => Color::Rgb {
                r: p.r,
                g: p.g,
                b: p.b,
            },
        }
    }

    /// Queue one full frame of cells, one line per row
    pub fn draw<W: Write>(
        &self,
        writer: &mut W,
        canvas: &Canvas,
        origin: Point2<i32>,
    ) -> std::io::Result<()> {
        let step = self.step as i64;
        let mut current = (Color::Reset, Color::Reset);
        writer.queue(ResetColor)?;

        for row in 0..self.rows as i64 {
            for col in 0..self.cols as i64 {
                let x = col * step;
                let top = self.sample(canvas, x, row * 2 * step, origin);
                let bottom = self.sample(canvas, x, (row * 2 + 1) * step, origin);

                if (top, bottom) != current {
                    writer.queue(SetForegroundColor(top))?;
                    writer.queue(SetBackgroundColor(bottom))?;
                    current = (top, bottom);
                }

                if top == Color::Reset && bottom == Color::Reset {
                    writer.queue(Print(' '))?;
                } else {
                    writer.queue(Print(HALF_BLOCK))?;
                }
            }
            writer.queue(ResetColor)?;
            current = (Color::Reset, Color::Reset);
            if row + 1 < self.rows as i64 {
                writer.queue(Print("\r\n"))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_fits_whole_canvas() {
        // 600 px across 100 columns → 6; 600 px down 40 rows (80 half rows) → 8
        let renderer = HalfBlockRenderer::new(100, 40, 600, 600);
        assert_eq!(renderer.step(), 8);
        assert!(renderer.cols() * renderer.step() >= 600);
        assert!(renderer.rows() * 2 * renderer.step() >= 600);
    }

    #[test]
    fn test_zero_sized_terminal() {
        let renderer = HalfBlockRenderer::new(0, 0, 600, 600);
        assert_eq!((renderer.cols(), renderer.rows()), (1, 1));
        assert_eq!(renderer.step(), 600);
    }

    #[test]
    fn test_cell_to_canvas_accounts_for_origin() {
        let renderer = HalfBlockRenderer::new(100, 40, 600, 600);
        let p = renderer.cell_to_canvas(10, 5, Point2::origin());
        assert_eq!(p, Point2::new(84, 88));

        let shifted = renderer.cell_to_canvas(10, 5, Point2::new(20, -8));
        assert_eq!(shifted, Point2::new(64, 96));
    }

    #[test]
    fn test_draw_emits_blocks_for_painted_pixels() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set(0, 0, Rgba::opaque(255, 0, 0));
        let renderer = HalfBlockRenderer::new(4, 2, 4, 4);
        assert_eq!(renderer.step(), 1);

        let mut out = Vec::new();
        renderer.draw(&mut out, &canvas, Point2::origin()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 1);
        assert_eq!(text.matches("\r\n").count(), 1);
    }

    #[test]
    fn test_draw_respects_origin() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set(0, 0, Rgba::opaque(0, 255, 0));
        let renderer = HalfBlockRenderer::new(4, 2, 4, 4);

        // Dragged fully off to the right: nothing left on screen
        let mut out = Vec::new();
        renderer.draw(&mut out, &canvas, Point2::new(10, 0)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 0);
    }
}
