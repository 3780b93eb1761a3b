//! RGBA pixel surface for software rendering

use bytemuck::{Pod, Zeroable};

/// 8-bit RGBA color, laid out for direct upload as RGBA8 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xff)
    }

    /// Composite `self` over `dst` (source-over)
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            0 => dst,
            0xff => self,
            a => {
                let a = a as u16;
                let out_a = a + dst.a as u16 * (255 - a) / 255;
                Rgba {
                    r: blend_channel(self.r, dst.r, a),
                    g: blend_channel(self.g, dst.g, a),
                    b: blend_channel(self.b, dst.b, a),
                    a: out_a.min(255) as u8,
                }
            }
        }
    }
}

/// Alpha blend a single channel, (x + 1 + (x >> 8)) >> 8 standing in for x / 255
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

/// Colors for game elements
pub mod colors {
    use super::Rgba;

    pub const BACKGROUND: Rgba = Rgba::rgb(0xf3, 0xf3, 0xf3);
    pub const FRAME: Rgba = Rgba::rgb(0xe3, 0xa3, 0x66);
    pub const DEMON: Rgba = Rgba::rgb(0xfa, 0x64, 0x81);
    pub const FAST_MOLECULE: Rgba = Rgba::rgb(0xfa, 0x25, 0x58);
    pub const SLOW_MOLECULE: Rgba = Rgba::rgb(0x7a, 0xa4, 0xff);
    pub const TEXT: Rgba = Rgba::BLACK;
}

/// A width x height grid of RGBA pixels
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Transparent buffer of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; (width * height) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Fill the whole buffer with one color
    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Pixel at (x, y), None if out of bounds
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Overwrite a pixel (bounds checked)
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Composite a color over a pixel (bounds checked)
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.over(self.pixels[i]);
        }
    }

    /// Overwrite every pixel whose center lies in the rectangle
    /// `[x, x + w) x [y, y + h)`, clipped to `clip_w` x `clip_h`
    pub fn fill_rect_clipped(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        clip_w: u32,
        clip_h: u32,
        color: Rgba,
    ) {
        let clip_w = clip_w.min(self.width) as f32;
        let clip_h = clip_h.min(self.height) as f32;
        let x0 = (x - 0.5).ceil().clamp(0.0, clip_w) as i32;
        let x1 = (x + w - 0.5).ceil().clamp(0.0, clip_w) as i32;
        let y0 = (y - 0.5).ceil().clamp(0.0, clip_h) as i32;
        let y1 = (y + h - 0.5).ceil().clamp(0.0, clip_h) as i32;

        for py in y0..y1 {
            let row = py as usize * self.width as usize;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    /// Overwrite every pixel whose center lies in `[x, x + w) x [y, y + h)`
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.fill_rect_clipped(x, y, w, h, self.width, self.height, color);
    }

    /// Number of pixels equal to `color`
    pub fn count(&self, color: Rgba) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA8 bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}
