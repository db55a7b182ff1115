//! Pixel buffer and 2D rasterization primitives.
//!
//! Everything here works in integer screen space, where `(0, 0)` is the top-left pixel and `Y`
//! grows downward. Inputs may lie arbitrarily far outside of the buffer (a vertex right in front
//! of the camera projects to huge coordinates), so every primitive clips before touching pixels.

use alloc::{vec, vec::Vec};

use crate::{color::Color, ScreenPoint};

/// A `width × height` RGB pixel buffer, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        // chunks panics on 0
        self.pixels.chunks(self.width.max(1))
    }

    /// Tightly packed `RGBRGB...` bytes.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, Color::BLACK);
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn plot(&mut self, x: isize, y: isize, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    fn hline(&mut self, y: usize, x0: usize, x1: usize, color: Color) {
        let row = y * self.width;
        self.pixels[row + x0..row + x1].fill(color);
    }

    /// Fills a polygon using the even-odd rule.
    ///
    /// A pixel is covered when its center lies inside the polygon. Polygons with less than 3
    /// points cover nothing.
    pub fn fill_polygon(&mut self, points: &[ScreenPoint], color: Color, scratch: &mut Vec<f64>) {
        if points.len() < 3 || self.width == 0 || self.height == 0 {
            return;
        }

        let (min_y, max_y) = points
            .iter()
            .fold((i32::MAX, i32::MIN), |(mn, mx), p| (mn.min(p.y), mx.max(p.y)));

        let y_start = min_y.max(0) as usize;
        let y_end = (max_y as i64).min(self.height as i64 - 1);

        if y_end < y_start as i64 {
            return;
        }

        for y in y_start..=y_end as usize {
            let yc = y as f64 + 0.5;

            scratch.clear();

            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                let (ay, by) = (a.y as f64, b.y as f64);

                if (ay <= yc) != (by <= yc) {
                    let t = (yc - ay) / (by - ay);
                    scratch.push(a.x as f64 + t * (b.x as f64 - a.x as f64));
                }
            }

            scratch.sort_unstable_by(f64::total_cmp);

            for span in scratch.chunks_exact(2) {
                let x0 = libm::ceil(span[0] - 0.5).max(0.0);
                let x1 = libm::ceil(span[1] - 0.5).min(self.width as f64);
                if x1 > x0 {
                    self.hline(y, x0 as usize, x1 as usize, color);
                }
            }
        }
    }

    /// Strokes a closed polygon outline.
    pub fn stroke_polygon(&mut self, points: &[ScreenPoint], color: Color) {
        match points {
            [] => {}
            [p] => self.plot(p.x as isize, p.y as isize, color),
            _ => {
                for (i, a) in points.iter().enumerate() {
                    let b = points[(i + 1) % points.len()];
                    self.draw_line(*a, b, color);
                }
            }
        }
    }

    /// Draws a line segment, clipped to the buffer.
    pub fn draw_line(&mut self, a: ScreenPoint, b: ScreenPoint, color: Color) {
        let Some(((x0, y0), (x1, y1))) = clip_line(
            (a.x as f64, a.y as f64),
            (b.x as f64, b.y as f64),
            self.width,
            self.height,
        ) else {
            return;
        };

        let (x0, y0, x1, y1) = (
            libm::round(x0) as isize,
            libm::round(y0) as isize,
            libm::round(x1) as isize,
            libm::round(y1) as isize,
        );

        if y1.abs_diff(y0) < x1.abs_diff(x0) {
            if x0 > x1 {
                self.plot_line_low(x1, y1, x0, y0, color);
            } else {
                self.plot_line_low(x0, y0, x1, y1, color);
            }
        } else if y0 > y1 {
            self.plot_line_high(x1, y1, x0, y0, color);
        } else {
            self.plot_line_high(x0, y0, x1, y1, color);
        }
    }

    fn plot_line_low(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: Color) {
        let dx = x1 - x0;
        let mut dy = y1 - y0;
        let mut yi = 1;

        if dy < 0 {
            yi = -1;
            dy = -dy;
        }

        let mut d = (2 * dy) - dx;
        let mut y = y0;

        for x in x0..=x1 {
            self.plot(x, y, color);
            if d > 0 {
                y += yi;
                d += 2 * (dy - dx);
            } else {
                d += 2 * dy;
            }
        }
    }

    fn plot_line_high(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: Color) {
        let mut dx = x1 - x0;
        let dy = y1 - y0;
        let mut xi = 1;

        if dx < 0 {
            xi = -1;
            dx = -dx;
        }

        let mut d = (2 * dx) - dy;
        let mut x = x0;

        for y in y0..=y1 {
            self.plot(x, y, color);
            if d > 0 {
                x += xi;
                d += 2 * (dx - dy);
            } else {
                d += 2 * dx;
            }
        }
    }

    /// Fills an axis aligned rectangle with top-left corner at `(x, y)`.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x.saturating_add(w).max(0) as usize).min(self.width);
        let y1 = (y.saturating_add(h).max(0) as usize).min(self.height);

        if x1 <= x0 {
            return;
        }

        for row in y0..y1 {
            self.hline(row, x0, x1, color);
        }
    }

    /// Outlines an axis aligned rectangle. The outline lies on the rectangle's edge pixels.
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (r, b) = (x + w - 1, y + h - 1);
        self.stroke_polygon(
            &[
                ScreenPoint::new(x, y),
                ScreenPoint::new(r, y),
                ScreenPoint::new(r, b),
                ScreenPoint::new(x, b),
            ],
            color,
        );
    }
}

/// Liang–Barsky clipping against the pixel rectangle `[0, w - 1] × [0, h - 1]`.
fn clip_line(
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    w: usize,
    h: usize,
) -> Option<((f64, f64), (f64, f64))> {
    if w == 0 || h == 0 {
        return None;
    }

    let (dx, dy) = (x1 - x0, y1 - y0);
    let (max_x, max_y) = ((w - 1) as f64, (h - 1) as f64);

    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;

    for (p, q) in [(-dx, x0), (dx, max_x - x0), (-dy, y0), (dy, max_y - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }

    if t0 > t1 {
        return None;
    }

    Some((
        (x0 + t0 * dx, y0 + t0 * dy),
        (x0 + t1 * dx, y0 + t1 * dy),
    ))
}
