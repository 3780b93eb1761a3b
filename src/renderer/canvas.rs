//! Reusable backing surface for assembling dot rows and patterns
//!
//! One canvas is reused for every draw call. Each call asks for a region of
//! a given size; the canvas grows when the request does not fit and never
//! shrinks, and the requested region is cleared before use.

use glam::{Affine2, Vec2};

use super::pixels::{PixelBuffer, Rgba};

/// Side length of a fresh canvas
pub const INITIAL_CANVAS_SIZE: u32 = 100;

/// Growable scratch surface
#[derive(Debug, Clone)]
pub struct Canvas {
    buffer: PixelBuffer,
    region: (u32, u32),
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            buffer: PixelBuffer::new(INITIAL_CANVAS_SIZE, INITIAL_CANVAS_SIZE),
            region: (0, 0),
        }
    }

    /// Allocated size
    pub fn capacity(&self) -> (u32, u32) {
        (self.buffer.width(), self.buffer.height())
    }

    /// Size of the region handed out by the last `prepare`
    pub fn region(&self) -> (u32, u32) {
        self.region
    }

    /// Reserve and clear a `width` x `height` region at the origin
    pub fn prepare(&mut self, width: u32, height: u32) {
        let (cap_w, cap_h) = self.capacity();
        if cap_w < width || cap_h < height {
            let new_w = cap_w.max(width.saturating_mul(2));
            let new_h = cap_h.max(height.saturating_mul(2));
            log::debug!("Growing dot canvas {cap_w}x{cap_h} -> {new_w}x{new_h}");
            self.buffer = PixelBuffer::new(new_w, new_h);
        }

        self.region = (width, height);
        self.buffer.fill_rect(
            0.0,
            0.0,
            width as f32,
            height as f32,
            Rgba::TRANSPARENT,
        );
    }

    /// Fill a rectangle inside the current region
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let (rw, rh) = self.region;
        self.buffer.fill_rect_clipped(x, y, w, h, rw, rh, color);
    }

    /// Pixel of the current region, transparent outside it
    pub fn sample(&self, x: i32, y: i32) -> Rgba {
        let (rw, rh) = self.region;
        if x < 0 || y < 0 || x as u32 >= rw || y as u32 >= rh {
            return Rgba::TRANSPARENT;
        }
        self.buffer.get(x, y).unwrap_or(Rgba::TRANSPARENT)
    }

    /// Draw the current region onto `dst`, mapping canvas coordinates
    /// through `transform`.
    ///
    /// Every destination pixel inside the transformed bounds is mapped back
    /// into the canvas and sampled nearest-neighbour at its center.
    pub fn composite(&self, dst: &mut PixelBuffer, transform: Affine2) {
        let (rw, rh) = self.region;
        if rw == 0 || rh == 0 {
            return;
        }
        let size = Vec2::new(rw as f32, rh as f32);

        let corners = [
            Vec2::ZERO,
            Vec2::new(size.x, 0.0),
            Vec2::new(0.0, size.y),
            size,
        ]
        .map(|c| transform.transform_point2(c));
        let min = corners.iter().fold(Vec2::splat(f32::INFINITY), |a, &c| a.min(c));
        let max = corners
            .iter()
            .fold(Vec2::splat(f32::NEG_INFINITY), |a, &c| a.max(c));

        let x0 = min.x.floor().max(0.0) as i32;
        let y0 = min.y.floor().max(0.0) as i32;
        let x1 = max.x.ceil().min(dst.width() as f32) as i32;
        let y1 = max.y.ceil().min(dst.height() as f32) as i32;

        let inverse = transform.inverse();
        for py in y0..y1 {
            for px in x0..x1 {
                let local = inverse.transform_point2(Vec2::new(px as f32 + 0.5, py as f32 + 0.5));
                if local.x < 0.0 || local.y < 0.0 || local.x >= size.x || local.y >= size.y {
                    continue;
                }
                let src = self.sample(local.x as i32, local.y as i32);
                if src.a != 0 {
                    dst.blend(px, py, src);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_requests_keep_initial_capacity() {
        let mut canvas = Canvas::new();
        canvas.prepare(40, 15);
        assert_eq!(canvas.capacity(), (100, 100));
        assert_eq!(canvas.region(), (40, 15));
    }

    #[test]
    fn test_grows_by_doubling_without_shrinking() {
        let mut canvas = Canvas::new();
        canvas.prepare(300, 15);
        assert_eq!(canvas.capacity(), (600, 100));
        canvas.prepare(10, 150);
        assert_eq!(canvas.capacity(), (600, 300));
        canvas.prepare(5, 5);
        assert_eq!(canvas.capacity(), (600, 300));
    }

    #[test]
    fn test_prepare_clears_previous_content() {
        let mut canvas = Canvas::new();
        canvas.prepare(10, 10);
        canvas.fill_rect(0.0, 0.0, 10.0, 10.0, Rgba::BLACK);
        assert_eq!(canvas.sample(5, 5), Rgba::BLACK);

        canvas.prepare(20, 20);
        for y in 0..20 {
            for x in 0..20 {
                assert_eq!(canvas.sample(x, y), Rgba::TRANSPARENT);
            }
        }
    }

    #[test]
    fn test_fill_rect_clipped_to_region() {
        let mut canvas = Canvas::new();
        canvas.prepare(10, 5);
        canvas.fill_rect(0.0, 0.0, 50.0, 50.0, Rgba::BLACK);
        assert_eq!(canvas.sample(9, 4), Rgba::BLACK);
        assert_eq!(canvas.sample(10, 4), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_composite_translation() {
        let mut canvas = Canvas::new();
        canvas.prepare(3, 2);
        canvas.fill_rect(0.0, 0.0, 3.0, 2.0, Rgba::BLACK);

        let mut dst = PixelBuffer::new(10, 10);
        canvas.composite(&mut dst, Affine2::from_translation(Vec2::new(4.0, 5.0)));
        assert_eq!(dst.count(Rgba::BLACK), 6);
        assert_eq!(dst.get(4, 5), Some(Rgba::BLACK));
        assert_eq!(dst.get(6, 6), Some(Rgba::BLACK));
        assert_eq!(dst.get(7, 6), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_composite_quarter_turn() {
        let mut canvas = Canvas::new();
        canvas.prepare(4, 1);
        canvas.fill_rect(0.0, 0.0, 4.0, 1.0, Rgba::BLACK);

        // A horizontal 4x1 strip turned a quarter becomes a vertical 1x4 strip
        let mut dst = PixelBuffer::new(10, 10);
        let transform = Affine2::from_translation(Vec2::new(5.0, 2.0))
            * Affine2::from_angle(std::f32::consts::FRAC_PI_2);
        canvas.composite(&mut dst, transform);
        assert_eq!(dst.count(Rgba::BLACK), 4);
        for y in 2..6 {
            assert_eq!(dst.get(4, y), Some(Rgba::BLACK));
        }
    }
}
