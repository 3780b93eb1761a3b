//! Per-mode frame composition
//!
//! Draws the chamber, the demon, the molecules and the HUD for the current
//! [`GameState`] onto a screen-sized [`PixelBuffer`].

use glam::Vec2;

use super::dots::{Anchor, DotAlignment, DotRenderer, LineOptions, PatternOptions};
use super::font::{DotFont, Fonts};
use super::pixels::{PixelBuffer, Rgba, colors};
use crate::consts::*;
use crate::sim::{GameMode, GameState, Gate, SpeedClass};

const MOLECULE_PATTERN: [[u8; 7]; 7] = [
    [0, 0, 1, 1, 1, 0, 0],
    [0, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 1, 1, 0],
    [0, 0, 1, 1, 1, 0, 0],
];

const DEMON_PATTERN: [[u8; 5]; 5] = [
    [1, 0, 0, 0, 1],
    [1, 1, 1, 1, 1],
    [1, 0, 1, 0, 1],
    [1, 1, 1, 1, 1],
    [1, 0, 1, 0, 1],
];

/// Molecules scattered over the title screen
const TITLE_MOLECULES: [(f32, f32, SpeedClass); 6] = [
    (70.0, 300.0, SpeedClass::Slow),
    (100.0, 100.0, SpeedClass::Slow),
    (200.0, 350.0, SpeedClass::Fast),
    (500.0, 200.0, SpeedClass::Fast),
    (550.0, 400.0, SpeedClass::Slow),
    (600.0, 90.0, SpeedClass::Fast),
];

const CREDITS: [&str; 3] = [
    "CREATOR: NAOKI TSUJIO",
    "FONT: 5X7 DOT MATRIX",
    "SOUND: PROCEDURAL TONES",
];

/// Radius of the molecule icons next to the sorted counts
const HUD_ICON_RADIUS: f32 = 7.0;

pub fn molecule_color(class: SpeedClass) -> Rgba {
    match class {
        SpeedClass::Fast => colors::FAST_MOLECULE,
        SpeedClass::Slow => colors::SLOW_MOLECULE,
    }
}

/// Screen compositor. Owns the dot renderer and its canvas cache.
#[derive(Debug, Default)]
pub struct Scene {
    dots: DotRenderer,
    fonts: Fonts,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dots(&self) -> &DotRenderer {
        &self.dots
    }

    /// Render one frame for the current state
    pub fn draw(&mut self, dst: &mut PixelBuffer, state: &GameState) {
        dst.fill(colors::BACKGROUND);
        self.draw_chamber(dst, &state.gate);

        match state.mode {
            GameMode::Title => {
                for (x, y, class) in TITLE_MOLECULES {
                    self.draw_molecule(dst, class, Vec2::new(x, y), MOLECULE_RADIUS);
                }

                self.draw_text_center(dst, "MAXWELL'S DEMON", 170.0, self.fonts.large);
                self.draw_text_center(dst, "CLICK TO START", 290.0, self.fonts.medium);
                let small = self.fonts.small;
                for (i, line) in CREDITS.iter().enumerate() {
                    let y = 400.0 + (i as f32 * small.size() * 1.8).trunc();
                    self.draw_text_center(dst, line, y, small);
                }
            }
            GameMode::LevelStart => {
                self.draw_play_field(dst, state);
                let banner = format!("LEVEL{}", state.level);
                self.draw_text_center(dst, &banner, 170.0, self.fonts.large);
            }
            GameMode::Playing => {
                self.draw_play_field(dst, state);
            }
            GameMode::Complete => {
                self.draw_play_field(dst, state);
                let medium = self.fonts.medium;
                self.draw_text_center(dst, "COMPLETED", 170.0, self.fonts.large);
                self.draw_text_center(dst, "YOUR RECORD IS", 275.0, medium);
                let record = format!("{} SECONDS!", state.elapsed_secs);
                self.draw_text_center(dst, &record, 275.0 + medium.size() * 2.0, medium);
            }
        }
    }

    /// Frame, partition and demon; drawn in every mode
    fn draw_chamber(&mut self, dst: &mut PixelBuffer, gate: &Gate) {
        let frame = LineOptions {
            color: colors::FRAME,
            dot_size: FRAME_THICKNESS,
            interval: 2.0,
            alignment: DotAlignment::RightOfPath,
        };
        let top_left = Vec2::new(FRAME_LEFT, FRAME_TOP);
        let bottom_left = Vec2::new(FRAME_LEFT, FRAME_BOTTOM);
        let bottom_right = Vec2::new(FRAME_RIGHT, FRAME_BOTTOM);
        let top_right = Vec2::new(FRAME_RIGHT, FRAME_TOP);
        self.dots.draw_dotted_line(dst, top_left, bottom_left, &frame);
        self.dots.draw_dotted_line(dst, bottom_left, bottom_right, &frame);
        self.dots.draw_dotted_line(dst, bottom_right, top_right, &frame);
        self.dots.draw_dotted_line(dst, top_right, top_left, &frame);

        let partition = LineOptions {
            alignment: DotAlignment::Center,
            ..frame
        };
        self.dots.draw_dotted_line(
            dst,
            Vec2::new(CENTER_X, FRAME_TOP),
            Vec2::new(CENTER_X, gate.top),
            &partition,
        );
        self.dots.draw_dotted_line(
            dst,
            Vec2::new(CENTER_X, FRAME_BOTTOM),
            Vec2::new(CENTER_X, gate.bottom),
            &partition,
        );

        // The demon hops above the slit while holding it open
        let mut demon_y = gate.top + SLIT_SIZE / 2.0;
        if gate.open {
            demon_y -= SLIT_SIZE;
        }
        let demon = PatternOptions {
            color: colors::DEMON,
            dot_size: (SLIT_SIZE - 10.0) / DEMON_PATTERN[0].len() as f32,
            anchor: Anchor::Center,
            ..Default::default()
        };
        self.dots
            .draw_dotted_pattern(dst, &DEMON_PATTERN, Vec2::new(CENTER_X, demon_y), &demon);
    }

    /// Counts, molecules, level and clock
    fn draw_play_field(&mut self, dst: &mut PixelBuffer, state: &GameState) {
        self.draw_sorted_counts(dst, state);
        for m in &state.molecules {
            self.draw_molecule(dst, m.class, m.pos, m.radius);
        }

        let small = self.fonts.small;
        let baseline = 20.0 + small.size();
        let level = format!("LV.{}", state.level);
        small.draw(&mut self.dots, dst, &level, FRAME_LEFT, baseline, colors::TEXT);

        let clock = state.elapsed_secs.to_string();
        let x = FRAME_RIGHT - small.text_width(&clock);
        small.draw(&mut self.dots, dst, &clock, x, baseline, colors::TEXT);
    }

    fn draw_sorted_counts(&mut self, dst: &mut PixelBuffer, state: &GameState) {
        let small = self.fonts.small;
        let y = FRAME_TOP + 20.0;
        let tally = &state.tally;

        let slow = format!("{}/{}", tally.slow_in_left, tally.target_slow_in_left);
        let fast = format!("{}/{}", tally.fast_in_right, tally.target_fast_in_right);
        let left_mid = (FRAME_LEFT + PARTITION_LEFT) / 2.0;
        let right_mid = (FRAME_RIGHT + PARTITION_RIGHT) / 2.0;
        let slow_x = (left_mid - small.text_width(&slow) / 2.0).trunc();
        let fast_x = (right_mid - small.text_width(&fast) / 2.0).trunc();

        small.draw(&mut self.dots, dst, &slow, slow_x, y, colors::TEXT);
        small.draw(&mut self.dots, dst, &fast, fast_x, y, colors::TEXT);

        let icon_y = y - small.size() / 2.0;
        self.draw_molecule(dst, SpeedClass::Slow, Vec2::new(slow_x - 15.0, icon_y), HUD_ICON_RADIUS);
        self.draw_molecule(dst, SpeedClass::Fast, Vec2::new(fast_x - 15.0, icon_y), HUD_ICON_RADIUS);
    }

    fn draw_molecule(&mut self, dst: &mut PixelBuffer, class: SpeedClass, center: Vec2, radius: f32) {
        let options = PatternOptions {
            color: molecule_color(class),
            dot_size: radius * 2.0 / MOLECULE_PATTERN.len() as f32,
            anchor: Anchor::Center,
            ..Default::default()
        };
        self.dots
            .draw_dotted_pattern(dst, &MOLECULE_PATTERN, center, &options);
    }

    /// Horizontally centered text on a background-colored plate
    fn draw_text_center(&mut self, dst: &mut PixelBuffer, text: &str, baseline: f32, font: DotFont) {
        let width = font.text_width(text);
        let x = ((SCREEN_WIDTH as f32 - width) / 2.0).trunc();
        dst.fill_rect(
            x,
            baseline - font.size() - 10.0,
            width,
            font.size() + 10.0,
            colors::BACKGROUND,
        );
        font.draw(&mut self.dots, dst, text, x, baseline, colors::TEXT);
    }
}
