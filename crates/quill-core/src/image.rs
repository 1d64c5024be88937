//! Software RGBA surfaces and Porter-Duff compositing.
//!
//! This is the image-compositing primitive widgets draw into: the screen, and
//! any off-screen buffers used to clip content through a mask.

use crate::{Color, Point, Rect, Size};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositeMode {
    /// Source drawn over destination.
    #[default]
    SourceOver,
    /// Destination replaced by source, alpha included.
    Copy,
    /// Source kept only where destination is opaque.
    SourceIn,
}

/// Combines one source pixel with one destination pixel.
pub fn composite(src: Color, dst: Color, mode: CompositeMode) -> Color {
    match mode {
        CompositeMode::Copy => src,
        CompositeMode::SourceOver => {
            if src.3 == 255 {
                return src;
            }
            if src.3 == 0 {
                return dst;
            }
            let s = src.to_f32();
            let d = dst.to_f32();
            let out_a = s[3] + d[3] * (1.0 - s[3]);
            if out_a <= 0.0 {
                return Color::TRANSPARENT;
            }
            let mix = |sc: f32, dc: f32| (sc * s[3] + dc * d[3] * (1.0 - s[3])) / out_a;
            Color::from_f32([mix(s[0], d[0]), mix(s[1], d[1]), mix(s[2], d[2]), out_a])
        }
        CompositeMode::SourceIn => {
            let a = (src.3 as u32 * dst.3 as u32 + 127) / 255;
            if a == 0 {
                Color::TRANSPARENT
            } else {
                src.with_alpha(a as u8)
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as i32, self.height as i32)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Matches the buffer to the given size. Reallocates (and therefore
    /// clears) only when the size actually changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        *self = PixelBuffer::new(width, height);
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Color::TRANSPARENT);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Composites a single pixel. Out-of-bounds writes are dropped.
    pub fn blend(&mut self, x: i32, y: i32, color: Color, mode: CompositeMode) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = composite(color, self.pixels[i], mode);
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color, mode: CompositeMode) {
        let r = rect.intersect(&self.bounds());
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                self.blend(x, y, color, mode);
            }
        }
    }

    /// Composites all of `src` with its top-left corner at `at`.
    pub fn draw_buffer(&mut self, src: &PixelBuffer, at: Point, mode: CompositeMode) {
        let target = Rect::new(at.x, at.y, src.width as i32, src.height as i32)
            .intersect(&self.bounds());
        for y in target.y..target.bottom() {
            for x in target.x..target.right() {
                if let Some(c) = src.pixel(x - at.x, y - at.y) {
                    self.blend(x, y, c, mode);
                }
            }
        }
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_in_keeps_source_only_under_opaque_destination() {
        let red = Color::from_rgb(255, 0, 0);
        assert_eq!(composite(red, Color::WHITE, CompositeMode::SourceIn), red);
        assert_eq!(
            composite(red, Color::TRANSPARENT, CompositeMode::SourceIn),
            Color::TRANSPARENT
        );
        let half = composite(red, Color::WHITE.with_alpha(128), CompositeMode::SourceIn);
        assert_eq!(half, red.with_alpha(128));
    }

    #[test]
    fn source_over_blends_translucent_source() {
        let out = composite(
            Color::from_rgba(255, 255, 255, 128),
            Color::BLACK,
            CompositeMode::SourceOver,
        );
        assert_eq!(out.alpha(), 255);
        assert!((127..=129).contains(&out.0));
    }

    #[test]
    fn copy_replaces_alpha_too() {
        assert_eq!(
            composite(Color::TRANSPARENT, Color::WHITE, CompositeMode::Copy),
            Color::TRANSPARENT
        );
    }

    #[test]
    fn fill_rect_is_clipped_to_bounds() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill_rect(Rect::new(2, 2, 10, 10), Color::WHITE, CompositeMode::SourceOver);
        assert_eq!(buf.pixel(3, 3), Some(Color::WHITE));
        assert_eq!(buf.pixel(1, 1), Some(Color::TRANSPARENT));
        assert_eq!(buf.pixel(4, 4), None);
    }

    #[test]
    fn resize_only_reallocates_on_change() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.fill_rect(buf.bounds(), Color::WHITE, CompositeMode::Copy);
        buf.resize(2, 2);
        assert_eq!(buf.pixel(0, 0), Some(Color::WHITE));
        buf.resize(3, 2);
        assert_eq!(buf.pixel(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(buf.size(), Size::new(3, 2));
    }
}
