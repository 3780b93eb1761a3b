//! Dot-matrix software renderer
//!
//! Everything is drawn on the CPU into an RGBA [`PixelBuffer`] which the
//! frontend uploads to the screen once per frame.

pub mod canvas;
pub mod dots;
pub mod font;
pub mod pixels;
pub mod scene;

pub use canvas::Canvas;
pub use dots::{Anchor, DotAlignment, DotRenderer, LineOptions, PatternOptions};
pub use font::{DotFont, Fonts};
pub use pixels::{PixelBuffer, Rgba, colors};
pub use scene::Scene;
