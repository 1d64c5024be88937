//! Shared widget plumbing: geometry, disabled state, input eligibility, hover
//! tracking and the deferred draw queue.

use quill_core::{Color, CompositeMode, InputSource, MouseButton, PixelBuffer, Rect, Size};

pub type DeferredDraw = Box<dyn FnOnce(&mut PixelBuffer)>;

/// Draws that must land on top of everything rendered in the current pass
/// (overlays, outlines). Flushed by the host after the widget tree rendered.
#[derive(Default)]
pub struct DeferredQueue {
    pending: Vec<DeferredDraw>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, draw: impl FnOnce(&mut PixelBuffer) + 'static) {
        self.pending.push(Box::new(draw));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Runs queued draws in submission order.
    pub fn flush(&mut self, screen: &mut PixelBuffer) {
        for draw in self.pending.drain(..) {
            draw(screen);
        }
    }
}

#[derive(Clone, Debug)]
pub struct WidgetOptions {
    min_size: Size,
    disabled: bool,
    input_enabled: bool,
    debug_outline: Option<Color>,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            min_size: Size::default(),
            disabled: false,
            input_enabled: true,
            debug_outline: None,
        }
    }
}

impl WidgetOptions {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn min_size(mut self, width: i32, height: i32) -> Self {
        self.min_size = Size::new(width, height);
        self
    }
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
    /// Whether pointer presses inside the widget are delivered to it.
    pub fn input_enabled(mut self, enabled: bool) -> Self {
        self.input_enabled = enabled;
        self
    }
    /// Outline the widget's rect on top of the frame. Layout debugging aid.
    pub fn debug_outline(mut self, color: Color) -> Self {
        self.debug_outline = Some(color);
        self
    }
}

pub struct Widget {
    pub rect: Rect,
    pub disabled: bool,
    min_size: Size,
    input_enabled: bool,
    debug_outline: Option<Color>,
    hovered: bool,
}

impl Widget {
    pub fn new(opts: WidgetOptions) -> Self {
        Self {
            rect: Rect::default(),
            disabled: opts.disabled,
            min_size: opts.min_size,
            input_enabled: opts.input_enabled,
            debug_outline: opts.debug_outline,
            hovered: false,
        }
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// Input is delivered only to enabled, input-eligible widgets.
    pub fn effective_input_enabled(&self) -> bool {
        self.input_enabled && !self.disabled
    }

    /// `button` went down this frame with the pointer over this widget.
    pub fn just_pressed_inside(&self, input: &dyn InputSource, button: MouseButton) -> bool {
        self.effective_input_enabled()
            && input.mouse_just_pressed(button)
            && self.rect.contains(input.cursor_position())
    }

    pub fn render(&mut self, input: &dyn InputSource, deferred: &mut DeferredQueue) {
        let hovered = self.effective_input_enabled() && self.rect.contains(input.cursor_position());
        if hovered != self.hovered {
            log::trace!("widget {:?}: hovered={}", self.rect, hovered);
            self.hovered = hovered;
        }

        if let Some(color) = self.debug_outline {
            let rect = self.rect;
            deferred.push(move |screen| stroke_rect(screen, rect, color));
        }
    }
}

fn stroke_rect(screen: &mut PixelBuffer, rect: Rect, color: Color) {
    if rect.is_empty() {
        return;
    }
    let mode = CompositeMode::SourceOver;
    screen.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1), color, mode);
    screen.fill_rect(Rect::new(rect.x, rect.bottom() - 1, rect.w, 1), color, mode);
    screen.fill_rect(Rect::new(rect.x, rect.y + 1, 1, rect.h - 2), color, mode);
    screen.fill_rect(Rect::new(rect.right() - 1, rect.y + 1, 1, rect.h - 2), color, mode);
}
