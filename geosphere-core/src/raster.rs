/// Software rasterizer: pixel canvas, scanline triangle fill, outlines
use crate::projection::Vec2;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// Per-channel blend from `from` (t = 0) to `to` (t = 1); the result is opaque
pub fn lerp_color(from: Rgba, to: Rgba, t: f64) -> Rgba {
    let channel = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t) as u8;
    Rgba::opaque(
        channel(from.r, to.r),
        channel(from.g, to.g),
        channel(from.b, to.b),
    )
}

/// Face and outline colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub from: Rgba,
    pub to: Rgba,
    pub outline: Rgba,
    /// Gradient phase added per face index
    pub phase_step: f64,
}

impl Palette {
    /// Gradient color for a face at time `t`
    pub fn face_color(&self, face_index: usize, t: f64) -> Rgba {
        let blend = ((face_index as f64 * self.phase_step + t).sin() + 1.0) / 2.0;
        lerp_color(self.from, self.to, blend)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            from: Rgba::opaque(65, 105, 225),
            to: Rgba::opaque(147, 112, 219),
            outline: Rgba::WHITE,
            phase_step: 0.1,
        }
    }
}

/// x positions where the triangle's edges cross scanline `y`.
///
/// An edge counts when `y` lies in `[low, high)` of its endpoints' y values,
/// so a shared vertex is only counted by one of its two edges.
pub fn scanline_crossings(points: &[Vec2; 3], y: f64) -> impl Iterator<Item = f64> + '_ {
    (0..3).filter_map(move |i| {
        let a = points[i];
        let b = points[(i + 1) % 3];
        let crosses = (a.y <= y && b.y > y) || (b.y <= y && a.y > y);
        crosses.then(|| a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y))
    })
}

/// Fixed-size RGBA pixel buffer that the pipeline draws into
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let in_bounds = x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height;
        in_bounds.then(|| y as usize * self.width + x as usize)
    }

    pub fn get(&self, x: i64, y: i64) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set one pixel; writes outside the canvas are dropped
    pub fn set(&mut self, x: i64, y: i64, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Pixels packed as RGBA bytes, row-major
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| [p.r, p.g, p.b, p.a])
            .collect()
    }

    /// Scanline fill.
    ///
    /// Rows with anything other than exactly two edge crossings are skipped.
    pub fn fill_triangle(&mut self, points: &[Vec2; 3], color: Rgba) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let max_col = self.width as i64 - 1;
        let max_row = self.height as i64 - 1;

        let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min) as i64;
        let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max) as i64;
        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min) as i64;
        let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max) as i64;

        // Clip to canvas bounds
        let (min_x, max_x) = (min_x.max(0), max_x.min(max_col));
        let (min_y, max_y) = (min_y.max(0), max_y.min(max_row));
        if min_x > max_x {
            return;
        }

        for y in min_y..=max_y {
            let mut xs = [0.0; 3];
            let mut count = 0;
            for x in scanline_crossings(points, y as f64) {
                xs[count] = x;
                count += 1;
            }
            if count != 2 {
                continue;
            }

            let (left, right) = if xs[0] <= xs[1] {
                (xs[0], xs[1])
            } else {
                (xs[1], xs[0])
            };
            let start = (left as i64).max(0);
            let end = (right as i64).min(max_col);
            for x in start..=end {
                self.set(x, y, color);
            }
        }
    }

    /// Parametric line: `max(|dx|, |dy|)` steps, each sample floored to a pixel.
    ///
    /// Only the run of samples that can land on the canvas is walked, so a line
    /// from a huge zoom costs at most about one canvas side.
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs());
        let finite = [from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite());
        if !finite || !steps.is_finite() {
            return;
        }
        if steps == 0.0 {
            self.set(from.x.floor() as i64, from.y.floor() as i64, color);
            return;
        }

        let increment = delta / steps;
        let (mut first, mut last) = (0.0, steps.trunc());
        for (start, step, size) in [
            (from.x, increment.x, self.width as f64),
            (from.y, increment.y, self.height as f64),
        ] {
            if step == 0.0 {
                if start < 0.0 || start >= size {
                    return;
                }
                continue;
            }
            let (a, b) = (-start / step, (size - start) / step);
            first = f64::max(first, a.min(b).floor() - 1.0);
            last = f64::min(last, a.max(b).ceil() + 1.0);
        }
        if first > last {
            return;
        }

        for i in first as i64..=last as i64 {
            let p = from + increment * i as f64;
            self.set(p.x.floor() as i64, p.y.floor() as i64, color);
        }
    }

    /// Fill a face, then stroke its three edges on top
    pub fn fill_and_outline(&mut self, points: &[Vec2; 3], color: Rgba, outline: Rgba) {
        self.fill_triangle(points, color);
        for i in 0..3 {
            self.draw_line(points[i], points[(i + 1) % 3], outline);
        }
    }
}
