//! Dot-matrix drawing primitives
//!
//! Everything on screen is made of square dots: dotted lines for the chamber
//! and partition, dot patterns for molecules, the demon and text. Both
//! primitives assemble their dots on the shared [`Canvas`] first and then
//! composite it onto the destination with a rotation and translation.

use glam::{Affine2, Vec2};

use super::canvas::Canvas;
use super::pixels::{PixelBuffer, Rgba};

/// Where dots sit relative to the path of a dotted line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DotAlignment {
    /// Dots straddle the path
    #[default]
    Center,
    /// Dots lie left of the path, looking from start to end
    LeftOfPath,
    /// Dots lie right of the path, looking from start to end
    RightOfPath,
}

impl DotAlignment {
    /// Perpendicular offset of the dot row for the given dot size
    pub fn offset(self, dot_size: f32) -> f32 {
        match self {
            DotAlignment::Center => -dot_size / 2.0,
            DotAlignment::LeftOfPath => -dot_size,
            DotAlignment::RightOfPath => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOptions {
    pub color: Rgba,
    pub dot_size: f32,
    /// Gap between consecutive dots
    pub interval: f32,
    pub alignment: DotAlignment,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            dot_size: 15.0,
            interval: 2.0,
            alignment: DotAlignment::Center,
        }
    }
}

/// Which point of a pattern is placed at the target position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    TopLeft,
    /// Geometric center, kept in place under rotation
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternOptions {
    pub color: Rgba,
    pub dot_size: f32,
    pub dot_interval: f32,
    /// Rotation in radians about the anchor
    pub rotation: f32,
    pub anchor: Anchor,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            dot_size: 15.0,
            dot_interval: 0.0,
            rotation: 0.0,
            anchor: Anchor::TopLeft,
        }
    }
}

/// Offsets of the dots along a line of the given length
pub fn line_dot_offsets(length: f32, dot_size: f32, interval: f32) -> impl Iterator<Item = f32> {
    let stride = dot_size + interval;
    (0u32..)
        .map(move |k| k as f32 * stride)
        .take_while(move |&x| x < length)
}

/// Canvas-to-screen transform for a dotted line from `from` to `to`
pub fn line_transform(from: Vec2, to: Vec2, options: &LineOptions) -> Affine2 {
    let delta = to - from;
    let angle = delta.y.atan2(delta.x);
    Affine2::from_translation(from)
        * Affine2::from_angle(angle)
        * Affine2::from_translation(Vec2::new(0.0, options.alignment.offset(options.dot_size)))
}

/// Extent of the canvas a pattern of `rows` x `cols` dots occupies
pub fn pattern_extent(rows: usize, cols: usize, dot_size: f32, interval: f32) -> Vec2 {
    let stride = dot_size + interval;
    Vec2::new(
        cols as f32 * stride - interval,
        rows as f32 * stride - interval,
    )
}

/// Canvas-to-screen transform for a pattern of the given extent
pub fn pattern_transform(at: Vec2, extent: Vec2, rotation: f32, anchor: Anchor) -> Affine2 {
    let placed = Affine2::from_translation(at) * Affine2::from_angle(rotation);
    match anchor {
        Anchor::TopLeft => placed,
        Anchor::Center => {
            // Pull the rotated half-diagonal back so the center stays at `at`
            let r = extent.length() / 2.0;
            let diagonal = extent.y.atan2(extent.x);
            let shift = -r * Vec2::new((rotation + diagonal).cos(), (rotation + diagonal).sin());
            Affine2::from_translation(shift) * placed
        }
    }
}

/// Rows x columns of a pattern grid.
///
/// # Panics
/// If the grid is empty or ragged.
pub fn pattern_dims<R: AsRef<[u8]>>(pattern: &[R]) -> (usize, usize) {
    assert!(!pattern.is_empty(), "dot pattern has no rows");
    let cols = pattern[0].as_ref().len();
    assert!(cols > 0, "dot pattern has no columns");
    assert!(
        pattern.iter().all(|row| row.as_ref().len() == cols),
        "dot pattern rows differ in length"
    );
    (pattern.len(), cols)
}

/// Draws dotted lines and patterns through one reusable canvas.
///
/// Not re-entrant: one draw call completes before the next starts.
#[derive(Debug, Default)]
pub struct DotRenderer {
    canvas: Canvas,
}

impl DotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Draw a line of square dots from `from` to `to`
    pub fn draw_dotted_line(
        &mut self,
        dst: &mut PixelBuffer,
        from: Vec2,
        to: Vec2,
        options: &LineOptions,
    ) {
        assert!(options.dot_size > 0.0, "dot size must be positive");
        assert!(options.interval >= 0.0, "dot interval must not be negative");

        let length = from.distance(to);
        let dot = options.dot_size;
        self.canvas.prepare(length.ceil() as u32, dot.ceil() as u32);
        for x in line_dot_offsets(length, dot, options.interval) {
            self.canvas.fill_rect(x, 0.0, dot, dot, options.color);
        }

        self.canvas
            .composite(dst, line_transform(from, to, options));
    }

    /// Draw a grid of dots; every non-zero cell becomes a dot.
    ///
    /// # Panics
    /// If the grid is empty or ragged, or the dot size is not positive.
    pub fn draw_dotted_pattern<R: AsRef<[u8]>>(
        &mut self,
        dst: &mut PixelBuffer,
        pattern: &[R],
        at: Vec2,
        options: &PatternOptions,
    ) {
        let (rows, cols) = pattern_dims(pattern);
        assert!(options.dot_size > 0.0, "dot size must be positive");
        assert!(options.dot_interval >= 0.0, "dot interval must not be negative");

        let dot = options.dot_size;
        let stride = dot + options.dot_interval;
        let extent = pattern_extent(rows, cols, dot, options.dot_interval);
        self.canvas
            .prepare(extent.x.ceil() as u32, extent.y.ceil() as u32);

        for (i, row) in pattern.iter().enumerate() {
            for (j, &cell) in row.as_ref().iter().enumerate() {
                if cell != 0 {
                    self.canvas.fill_rect(
                        j as f32 * stride,
                        i as f32 * stride,
                        dot,
                        dot,
                        options.color,
                    );
                }
            }
        }

        let transform = pattern_transform(at, extent, options.rotation, options.anchor);
        self.canvas.composite(dst, transform);
    }
}
