//! 5x7 dot-matrix font drawn through the dot pattern engine
//!
//! Each glyph occupies one advance of `size` pixels: seven dot rows tall,
//! sitting on the baseline, horizontally centered in its cell.

use glam::Vec2;

use super::dots::{DotRenderer, PatternOptions};
use super::pixels::{PixelBuffer, Rgba};

const GLYPH_COLS: usize = 5;
const GLYPH_ROWS: usize = 7;

/// A text face of a fixed nominal size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotFont {
    size: f32,
}

/// Large / medium / small faces used by the HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fonts {
    pub large: DotFont,
    pub medium: DotFont,
    pub small: DotFont,
}

impl Default for Fonts {
    fn default() -> Self {
        let medium = 24.0;
        Self {
            large: DotFont::new(medium * 1.5),
            medium: DotFont::new(medium),
            small: DotFont::new(medium / 2.0),
        }
    }
}

impl DotFont {
    pub fn new(size: f32) -> Self {
        Self { size }
    }

    /// Nominal size: glyph height and horizontal advance
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.size
    }

    /// Draw `text` with its first cell at `x` and its baseline at `baseline`
    pub fn draw(
        &self,
        dots: &mut DotRenderer,
        dst: &mut PixelBuffer,
        text: &str,
        x: f32,
        baseline: f32,
        color: Rgba,
    ) {
        let dot = self.size / GLYPH_ROWS as f32;
        let inset = (self.size - dot * GLYPH_COLS as f32) / 2.0;
        let options = PatternOptions {
            color,
            dot_size: dot,
            ..Default::default()
        };

        for (i, c) in text.chars().enumerate() {
            let Some(rows) = glyph(c) else { continue };
            let cells = glyph_cells(rows);
            let at = Vec2::new(x + i as f32 * self.size + inset, baseline - self.size);
            dots.draw_dotted_pattern(dst, &cells, at, &options);
        }
    }
}

/// Expand packed glyph rows (bit 4 = leftmost column) into a dot grid
fn glyph_cells(rows: [u8; GLYPH_ROWS]) -> [[u8; GLYPH_COLS]; GLYPH_ROWS] {
    rows.map(|bits| std::array::from_fn(|col| (bits >> (GLYPH_COLS - 1 - col)) & 1))
}

/// Packed rows for a character; None for blanks and unknown characters
fn glyph(c: char) -> Option<[u8; GLYPH_ROWS]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        '/' => [0b00000, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes() {
        let fonts = Fonts::default();
        assert_eq!(fonts.large.size(), 36.0);
        assert_eq!(fonts.medium.size(), 24.0);
        assert_eq!(fonts.small.size(), 12.0);
        assert_eq!(fonts.small.text_width("3/5"), 36.0);
    }

    #[test]
    fn test_glyph_cells_unpack() {
        let cells = glyph_cells(glyph('T').unwrap());
        assert_eq!(cells[0], [1, 1, 1, 1, 1]);
        assert_eq!(cells[6], [0, 0, 1, 0, 0]);
        assert_eq!(glyph('a'), glyph('A'));
        assert_eq!(glyph(' '), None);
    }

    #[test]
    fn test_draw_stays_in_cells() {
        let font = DotFont::new(14.0);
        let mut dots = DotRenderer::new();
        let mut dst = PixelBuffer::new(100, 40);
        font.draw(&mut dots, &mut dst, "I I", 0.0, 30.0, Rgba::BLACK);

        // Dots only in the first and third cells, above the baseline
        for y in 0..40 {
            for x in 0..100 {
                if dst.get(x, y) == Some(Rgba::BLACK) {
                    let cell = x / 14;
                    assert!(cell == 0 || cell == 2, "dot at {x},{y}");
                    assert!((16..30).contains(&y), "dot at {x},{y}");
                }
            }
        }
        assert!(dst.count(Rgba::BLACK) > 0);
    }
}
