use std::sync::Arc;

use quill_core::{Color, CompositeMode, PixelBuffer, Point, Size};
use quill_text::{FontFace, advance_width};

/// A single line of text drawn with one face and one color.
pub struct Label {
    pub text: String,
    pub color: Color,
    location: Point,
    face: Arc<dyn FontFace>,
}

impl Label {
    pub fn new(text: impl Into<String>, face: Arc<dyn FontFace>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
            location: Point::default(),
            face,
        }
    }

    pub fn preferred_size(&self) -> Size {
        Size::new(
            advance_width(&self.text, self.face.as_ref()),
            self.face.line_height().round() as i32,
        )
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn set_location(&mut self, p: Point) {
        self.location = p;
    }

    pub fn render(&self, target: &mut PixelBuffer) {
        if self.text.is_empty() || self.color.is_transparent() {
            return;
        }
        let color = self.color;
        self.face.draw(&self.text, self.location, &mut |x, y, coverage| {
            if coverage > 0.0 {
                target.blend(x, y, color.with_coverage(coverage), CompositeMode::SourceOver);
            }
        });
    }
}
