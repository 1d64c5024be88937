use std::sync::Arc;

use quill_core::{Clock, Color, CompositeMode, Duration, Instant, PixelBuffer, Point, Rect, Size};
use quill_text::FontFace;

#[derive(Clone, Debug)]
pub struct CaretOptions {
    width: i32,
    color: Color,
    blink_interval: Duration,
}

impl Default for CaretOptions {
    fn default() -> Self {
        Self {
            width: 2,
            color: Color::BLACK,
            blink_interval: Duration::from_millis(450),
        }
    }
}

impl CaretOptions {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn width(mut self, width: i32) -> Self {
        self.width = width.max(0);
        self
    }
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
    /// Duration of each visible and each hidden phase.
    pub fn blink_interval(mut self, interval: Duration) -> Self {
        self.blink_interval = interval;
        self
    }
}

/// Blinking insertion bar, one line of the face tall.
pub struct Caret {
    pub width: i32,
    color: Color,
    blink_interval: Duration,
    line_height: i32,
    location: Point,
    blink_start: Instant,
    clock: Arc<dyn Clock>,
}

impl Caret {
    pub fn new(opts: CaretOptions, face: &dyn FontFace, clock: Arc<dyn Clock>) -> Self {
        let blink_start = clock.now();
        Self {
            width: opts.width,
            color: opts.color,
            blink_interval: opts.blink_interval,
            line_height: face.line_height().round() as i32,
            location: Point::default(),
            blink_start,
            clock,
        }
    }

    pub fn preferred_size(&self) -> Size {
        Size::new(self.width, self.line_height)
    }

    /// Restarts the blink cycle in its visible phase.
    pub fn reset_blinking(&mut self) {
        self.blink_start = self.clock.now();
    }

    pub fn visible(&self) -> bool {
        let interval = self.blink_interval.as_millis().max(1);
        let elapsed = self
            .clock
            .now()
            .saturating_duration_since(self.blink_start)
            .as_millis();
        (elapsed / interval) % 2 == 0
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn set_location(&mut self, p: Point) {
        self.location = p;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn render(&self, target: &mut PixelBuffer) {
        if !self.visible() {
            return;
        }
        let bar = Rect::new(self.location.x, self.location.y, self.width, self.line_height);
        target.fill_rect(bar, self.color, CompositeMode::SourceOver);
    }
}
