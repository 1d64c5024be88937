//! # Quill core
//!
//! Shared building blocks for Quill widgets:
//!
//! - integer pixel geometry (`Point`, `Rect`, `Insets`),
//! - straight-alpha `Color`,
//! - injectable `Clock`s and one-shot `Timers`,
//! - per-frame input samples (`InputSource`, `FrameInput`),
//! - software surfaces (`PixelBuffer`, `NineSlice`) with Porter-Duff
//!   composite modes.
//!
//! Everything here is frame-local and single-threaded, except `Expiry`,
//! which is written from a timer context and read from the frame loop.

pub mod clock;
pub mod color;
pub mod geometry;
pub mod image;
pub mod input;
pub mod nine_slice;

pub use clock::*;
pub use color::*;
pub use geometry::*;
pub use image::*;
pub use input::*;
pub use nine_slice::*;

pub use web_time::{Duration, Instant};
