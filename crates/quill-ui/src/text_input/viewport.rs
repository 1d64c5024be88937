use quill_core::{CompositeMode, Insets, PixelBuffer, Point, Rect};
use quill_text::{advance_width, char_prefix};

use super::TextInput;

/// Adjusts a horizontal scroll offset so the caret stays inside the content
/// area of `rect`.
///
/// `caret_x` is the caret position relative to the unscrolled text start. The
/// right edge is clamped before the left edge, so when the content area is
/// narrower than the caret the text start wins.
pub fn correct_scroll(
    scroll: i32,
    caret_x: i32,
    caret_width: i32,
    rect: Rect,
    padding: Insets,
) -> i32 {
    let mut scroll = scroll;

    let overflow =
        rect.x + padding.left + scroll + caret_x + caret_width + padding.right - rect.right();
    if overflow > 0 {
        scroll -= overflow;
    }

    let underflow = scroll + caret_x;
    if underflow < 0 {
        scroll -= underflow;
    }
    scroll
}

/// Top-left corner of the text's line box on screen.
pub fn text_origin(rect: Rect, padding: Insets, scroll: i32) -> Point {
    Point::new(rect.x + padding.left + scroll, rect.y + padding.top)
}

impl TextInput {
    pub(super) fn caret_x(&self) -> i32 {
        advance_width(char_prefix(&self.text, self.cursor), self.face.as_ref())
    }

    pub(super) fn draw_image(&self, screen: &mut PixelBuffer) {
        let Some(image) = &self.image else {
            return;
        };
        let slice = match (&image.disabled, self.widget.disabled) {
            (Some(disabled), true) => disabled,
            _ => &image.idle,
        };
        let rect = self.widget.rect;
        slice.draw(screen, rect.w, rect.h, rect.min(), CompositeMode::SourceOver);
    }

    /// Text and caret go into a screen-sized scratch buffer, which is then
    /// kept only where the mask covers the content area and blitted.
    pub(super) fn draw_text_and_caret(&mut self, screen: &mut PixelBuffer) {
        let (w, h) = (screen.width(), screen.height());
        self.render_buf.resize(w, h);
        self.render_buf.clear();
        self.masked_buf.resize(w, h);
        self.masked_buf.clear();

        let rect = self.widget.rect;
        let origin = text_origin(rect, self.padding, self.scroll_offset);
        let disabled = self.widget.disabled;
        let caret_x = self.caret_x();

        self.label.text.clone_from(&self.text);
        self.label.color = if disabled {
            self.color.disabled
        } else {
            self.color.idle
        };
        self.label.set_location(origin);
        self.label.render(&mut self.render_buf);

        self.caret.set_color(if disabled {
            self.color.disabled
        } else {
            self.color.caret
        });
        self.caret.set_location(origin.offset(caret_x, 0));
        self.caret.render(&mut self.render_buf);

        let content = self.padding.apply(rect);
        self.mask.draw(
            &mut self.masked_buf,
            content.w,
            content.h,
            content.min(),
            CompositeMode::Copy,
        );
        self.masked_buf
            .draw_buffer(&self.render_buf, Point::default(), CompositeMode::SourceIn);

        screen.draw_buffer(&self.masked_buf, Point::default(), CompositeMode::SourceOver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_past_right_edge_lands_on_inner_edge() {
        let rect = Rect::new(0, 0, 100, 20);
        let padding = Insets::uniform(5);
        let scroll = correct_scroll(0, 200, 2, rect, padding);
        assert_eq!(scroll, -112);

        let caret_right = text_origin(rect, padding, scroll).x + 200 + 2;
        assert_eq!(caret_right, rect.right() - padding.right);

        // already corrected: stable
        assert_eq!(correct_scroll(scroll, 200, 2, rect, padding), scroll);
    }

    #[test]
    fn caret_left_of_view_scrolls_back() {
        let rect = Rect::new(30, 0, 100, 20);
        let padding = Insets::uniform(5);
        assert_eq!(correct_scroll(-112, 0, 2, rect, padding), 0);
        assert_eq!(correct_scroll(-112, 50, 2, rect, padding), -50);
        assert_eq!(correct_scroll(-10, 50, 2, rect, padding), -10);
    }

    #[test]
    fn origin_includes_padding_and_scroll() {
        let origin = text_origin(Rect::new(10, 20, 50, 30), Insets::symmetric(4, 3), -7);
        assert_eq!(origin, Point::new(7, 23));
    }
}
