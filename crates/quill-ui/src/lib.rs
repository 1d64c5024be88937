//! # Quill widgets
//!
//! Immediate-mode widgets drawn into a [`quill_core::PixelBuffer`] once per
//! frame. The centerpiece is [`TextInput`], a single-line text field with
//! OS-style key repeat, click-to-position, horizontal scrolling and a masked
//! composite that keeps text inside the field's shape.
//!
//! A frame looks like:
//!
//! 1. the host fills a [`quill_core::FrameInput`],
//! 2. each widget's `render` runs its input handling and draws,
//! 3. the host flushes the [`DeferredQueue`] on top.

pub mod caret;
pub mod label;
pub mod layout;
pub mod text_input;
pub mod widget;
mod tests;

pub use caret::{Caret, CaretOptions};
pub use label::Label;
pub use layout::{FillLayout, Layouter, Locateable};
pub use text_input::{
    InputSession, TextInput, TextInputColor, TextInputImage, TextInputOptions,
};
pub use widget::{DeferredDraw, DeferredQueue, Widget, WidgetOptions};
