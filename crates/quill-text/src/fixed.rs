use std::collections::HashMap;

use quill_core::Point;

use crate::FontFace;

/// A face with table-driven advances and box-shaped glyphs.
///
/// Needs no font files, which makes it the face of choice for headless
/// hosts and tests. Whitespace advances but draws nothing; every other
/// character fills its cell.
#[derive(Clone, Debug)]
pub struct FixedAdvanceFace {
    advance: f32,
    overrides: HashMap<char, f32>,
    line_height: f32,
}

impl FixedAdvanceFace {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            overrides: HashMap::new(),
            line_height,
        }
    }

    pub fn with_advance(mut self, c: char, advance: f32) -> Self {
        self.overrides.insert(c, advance);
        self
    }

    pub fn char_advance(&self, c: char) -> f32 {
        self.overrides.get(&c).copied().unwrap_or(self.advance)
    }
}

impl FontFace for FixedAdvanceFace {
    fn advance(&self, text: &str) -> f32 {
        text.chars().map(|c| self.char_advance(c)).sum()
    }

    fn ascent(&self) -> f32 {
        self.line_height * 0.8
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn draw(&self, text: &str, origin: Point, plot: &mut dyn FnMut(i32, i32, f32)) {
        let height = self.line_height.round() as i32;
        let mut x = origin.x as f32;
        for c in text.chars() {
            let adv = self.char_advance(c);
            if !c.is_whitespace() {
                let x0 = x.round() as i32;
                let x1 = (x + adv).round() as i32;
                for py in origin.y..origin.y + height {
                    for px in x0..x1 {
                        plot(px, py, 1.0);
                    }
                }
            }
            x += adv;
        }
    }
}
