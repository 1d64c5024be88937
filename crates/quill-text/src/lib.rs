//! # Font metrics
//!
//! Widgets measure text through the [`FontFace`] trait and two free
//! functions built on it:
//!
//! - [`advance_width`]: horizontal extent of a string, rounded to whole pixels.
//! - [`index_at_offset`]: the code-point boundary nearest to a pixel offset.
//!
//! Indices are code points, not bytes and not grapheme clusters. Measuring is
//! the expensive primitive (it may shape the whole string), so the inverse
//! lookup binary-searches over prefixes instead of walking them.
//!
//! ```rust
//! use quill_text::*;
//!
//! let face = FixedAdvanceFace::new(10.0, 16.0);
//! assert_eq!(advance_width("ab", &face), 20);
//! assert_eq!(index_at_offset("ab", &face, 16), 2);
//! ```

pub mod error;
pub mod fixed;
pub mod glyph;
pub mod shaped;

pub use error::FontError;
pub use fixed::FixedAdvanceFace;
pub use glyph::GlyphFace;
pub use shaped::ShapedFace;

use quill_core::Point;

/// A font at a fixed pixel size.
pub trait FontFace: Send + Sync {
    /// Fractional horizontal advance of `text` laid out left to right on one line.
    fn advance(&self, text: &str) -> f32;

    /// Distance from the top of the line box to the baseline.
    fn ascent(&self) -> f32;

    fn line_height(&self) -> f32;

    /// Rasterizes `text` with the top-left corner of its line box at `origin`.
    /// `plot` receives screen pixels and a coverage in `[0, 1]`.
    fn draw(&self, text: &str, origin: Point, plot: &mut dyn FnMut(i32, i32, f32));
}

/// Number of code points in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The first `n` code points of `text` (all of it if shorter).
pub fn char_prefix(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

/// Advance of `text`, rounded to the nearest pixel.
pub fn advance_width(text: &str, face: &dyn FontFace) -> i32 {
    face.advance(text).round() as i32
}

/// Maps a horizontal offset (relative to the start of `text`) to the nearest
/// code-point boundary in `[0, char_len(text)]`.
///
/// Assumes advances never shrink as the prefix grows. Exact ties resolve to
/// the smaller index.
pub fn index_at_offset(text: &str, face: &dyn FontFace, x: i32) -> usize {
    let len = char_len(text);
    if len == 0 {
        return 0;
    }
    let width_at = |i: usize| advance_width(char_prefix(text, i), face);

    // Smallest boundary whose advance reaches x.
    let (mut lo, mut hi) = (0usize, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if width_at(mid) < x {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    if lo == 0 {
        return 0;
    }

    let before = width_at(lo - 1);
    let after = width_at(lo);
    if (x - before).abs() <= (after - x).abs() {
        lo - 1
    } else {
        lo
    }
}
