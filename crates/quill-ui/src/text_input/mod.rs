//! Single-line text entry.
//!
//! [`TextInput`] owns its content and a code-point cursor. Every frame,
//! [`TextInput::render`] samples input, drives the key-repeat state machine in
//! [`session`], keeps the caret scrolled into view and composites text and
//! caret through a mask so nothing spills outside the content area.
//!
//! ```rust
//! use std::sync::Arc;
//! use quill_core::*;
//! use quill_text::FixedAdvanceFace;
//! use quill_ui::*;
//!
//! let clock: Arc<dyn Clock> = Arc::new(TestClock::default());
//! let mut field = TextInput::new(
//!     TextInputOptions::new(Arc::new(FixedAdvanceFace::new(8.0, 16.0)))
//!         .padding(Insets::uniform(4))
//!         .validation(|s| s.chars().all(|c| c.is_ascii_digit()))
//!         .clock(clock.clone())
//!         .timers(Arc::new(ManualTimers::new(clock))),
//! );
//! field.set_location(Rect::new(0, 0, 120, 24));
//!
//! let mut input = FrameInput::new();
//! input.type_text("7");
//! field.update(&input);
//! input.begin_frame();
//! input.type_text("x");
//! field.update(&input);
//! assert_eq!(field.text(), "7");
//! ```

pub mod edit;
pub mod session;
pub mod viewport;

use std::sync::Arc;

use quill_core::{
    Clock, Color, Duration, InputSource, Insets, NineSlice, PixelBuffer, Point, Rect, Size,
    SystemClock, ThreadTimers, Timers,
};
use quill_text::{FontFace, char_len, index_at_offset};

use crate::caret::{Caret, CaretOptions};
use crate::label::Label;
use crate::layout::Locateable;
use crate::widget::{DeferredQueue, Widget, WidgetOptions};

use edit::{Command, clamp_cursor, insert_char};
pub use session::InputSession;

/// Delay before a held command key starts repeating.
pub const REPEAT_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(35);
pub const MIN_PREFERRED_WIDTH: i32 = 50;

pub type Validation = Box<dyn Fn(&str) -> bool>;

/// Background images. `disabled` falls back to `idle` when absent.
#[derive(Clone, Debug)]
pub struct TextInputImage {
    pub idle: NineSlice,
    pub disabled: Option<NineSlice>,
}

#[derive(Clone, Copy, Debug)]
pub struct TextInputColor {
    pub idle: Color,
    pub disabled: Color,
    pub caret: Color,
}

impl Default for TextInputColor {
    fn default() -> Self {
        Self {
            idle: Color::BLACK,
            disabled: Color::from_rgb(0x80, 0x80, 0x80),
            caret: Color::BLACK,
        }
    }
}

pub struct TextInputOptions {
    widget: WidgetOptions,
    caret: CaretOptions,
    image: Option<TextInputImage>,
    color: TextInputColor,
    padding: Insets,
    face: Arc<dyn FontFace>,
    repeat_interval: Duration,
    validation: Option<Validation>,
    clock: Option<Arc<dyn Clock>>,
    timers: Option<Arc<dyn Timers>>,
    mask: Option<NineSlice>,
}

impl TextInputOptions {
    pub fn new(face: Arc<dyn FontFace>) -> Self {
        Self {
            widget: WidgetOptions::default(),
            caret: CaretOptions::default(),
            image: None,
            color: TextInputColor::default(),
            padding: Insets::default(),
            face,
            repeat_interval: DEFAULT_REPEAT_INTERVAL,
            validation: None,
            clock: None,
            timers: None,
            mask: None,
        }
    }
    pub fn widget(mut self, opts: WidgetOptions) -> Self {
        self.widget = opts;
        self
    }
    pub fn caret(mut self, opts: CaretOptions) -> Self {
        self.caret = opts;
        self
    }
    pub fn image(mut self, image: TextInputImage) -> Self {
        self.image = Some(image);
        self
    }
    pub fn color(mut self, color: TextInputColor) -> Self {
        self.color = color;
        self
    }
    pub fn padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }
    pub fn face(mut self, face: Arc<dyn FontFace>) -> Self {
        self.face = face;
        self
    }
    pub fn repeat_interval(mut self, interval: Duration) -> Self {
        self.repeat_interval = interval;
        self
    }
    /// Gate for insertions: receives the full candidate text. Deletions are
    /// never validated.
    pub fn validation(mut self, f: impl Fn(&str) -> bool + 'static) -> Self {
        self.validation = Some(Box::new(f));
        self
    }
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }
    pub fn timers(mut self, timers: Arc<dyn Timers>) -> Self {
        self.timers = Some(timers);
        self
    }
    /// Shape that text and caret are clipped to, stretched over the padded
    /// content area. Only its alpha matters.
    pub fn mask(mut self, mask: NineSlice) -> Self {
        self.mask = Some(mask);
        self
    }
}

pub struct TextInput {
    text: String,
    cursor: usize,
    scroll_offset: i32,
    session: InputSession,

    widget: Widget,
    caret: Caret,
    label: Label,
    image: Option<TextInputImage>,
    color: TextInputColor,
    padding: Insets,
    face: Arc<dyn FontFace>,
    repeat_delay: Duration,
    repeat_interval: Duration,
    validation: Option<Validation>,
    timers: Arc<dyn Timers>,

    render_buf: PixelBuffer,
    masked_buf: PixelBuffer,
    mask: NineSlice,
}

impl TextInput {
    pub fn new(opts: TextInputOptions) -> Self {
        let clock: Arc<dyn Clock> = match opts.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let timers: Arc<dyn Timers> = match opts.timers {
            Some(timers) => timers,
            None => ThreadTimers::shared(),
        };
        let caret = Caret::new(
            opts.caret.color(opts.color.caret),
            opts.face.as_ref(),
            clock,
        );
        Self {
            text: String::new(),
            cursor: 0,
            scroll_offset: 0,
            session: InputSession::default(),
            widget: Widget::new(opts.widget),
            caret,
            label: Label::new("", opts.face.clone(), opts.color.idle),
            image: opts.image,
            color: opts.color,
            padding: opts.padding,
            face: opts.face,
            repeat_delay: REPEAT_DELAY,
            repeat_interval: opts.repeat_interval,
            validation: opts.validation,
            timers,
            render_buf: PixelBuffer::default(),
            masked_buf: PixelBuffer::default(),
            mask: opts
                .mask
                .unwrap_or_else(|| NineSlice::from_color(Color::from_rgb(0xFF, 0x00, 0xFF))),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the content. The cursor is clamped, not moved.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.clamp_cursor();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = clamp_cursor(cursor, char_len(&self.text));
        self.caret.reset_blinking();
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    pub fn session(&self) -> &InputSession {
        &self.session
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut Widget {
        &mut self.widget
    }

    pub fn caret(&self) -> &Caret {
        &self.caret
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.widget.disabled = disabled;
    }

    pub fn preferred_size(&self) -> Size {
        let min = self.widget.min_size();
        let caret = self.caret.preferred_size();
        Size::new(
            MIN_PREFERRED_WIDTH.max(min.width),
            (caret.height + self.padding.dy()).max(min.height),
        )
    }

    pub fn set_location(&mut self, rect: Rect) {
        self.widget.rect = rect;
    }

    /// Runs one frame of input handling and scroll correction without drawing.
    pub fn update(&mut self, input: &dyn InputSource) {
        self.timers.pump();
        self.clamp_cursor();

        if self.widget.disabled {
            if !matches!(self.session, InputSession::Idle { fresh: true }) {
                log::trace!("text input: disabled, dropping {:?}", self.session);
                self.session = InputSession::default();
            }
        } else {
            self.run_session(input);
        }

        self.scroll_offset = viewport::correct_scroll(
            self.scroll_offset,
            self.caret_x(),
            self.caret.width,
            self.widget.rect,
            self.padding,
        );
    }

    pub fn render(
        &mut self,
        screen: &mut PixelBuffer,
        input: &dyn InputSource,
        deferred: &mut DeferredQueue,
    ) {
        self.update(input);
        self.widget.render(input, deferred);
        self.draw_image(screen);
        self.draw_text_and_caret(screen);
    }

    fn clamp_cursor(&mut self) {
        let len = char_len(&self.text);
        if self.cursor > len {
            log::debug!("text input: cursor {} clamped to {len}", self.cursor);
            self.cursor = len;
        }
    }

    fn do_insert(&mut self, c: char) {
        let candidate = insert_char(&self.text, self.cursor, c);
        if let Some(validate) = &self.validation {
            if !validate(&candidate) {
                log::debug!("text input: rejected {c:?}");
                return;
            }
        }
        self.text = candidate;
        self.cursor += 1;
    }

    fn execute(&mut self, command: Command) {
        let edit = command.apply(&self.text, self.cursor);
        if let Some(text) = edit.text {
            self.text = text;
        }
        log::debug!("text input: {command:?} -> cursor {}", edit.cursor);
        self.cursor = edit.cursor;
        self.caret.reset_blinking();
    }

    fn do_go_xy(&mut self, p: Point) {
        let content = self.padding.apply(self.widget.rect);
        let x = p.x.clamp(content.x, content.right());
        self.cursor = index_at_offset(
            &self.text,
            self.face.as_ref(),
            x - self.scroll_offset - content.x,
        );
        self.caret.reset_blinking();
    }
}

impl Locateable for TextInput {
    fn preferred_size(&self) -> Size {
        TextInput::preferred_size(self)
    }

    fn set_location(&mut self, rect: Rect) {
        TextInput::set_location(self, rect);
    }
}
