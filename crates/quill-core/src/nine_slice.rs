use crate::{Color, CompositeMode, PixelBuffer, Point};

/// An image cut into a 3x3 grid: corners keep their size, edges stretch along
/// one axis and the center stretches along both.
#[derive(Clone, Debug)]
pub struct NineSlice {
    source: PixelBuffer,
    widths: [u32; 3],
    heights: [u32; 3],
}

impl NineSlice {
    /// `widths` and `heights` are the column and row sizes of the grid. They
    /// must add up to the source dimensions.
    pub fn new(source: PixelBuffer, widths: [u32; 3], heights: [u32; 3]) -> Self {
        assert_eq!(
            widths.iter().sum::<u32>(),
            source.width(),
            "nine-slice columns must cover the source width"
        );
        assert_eq!(
            heights.iter().sum::<u32>(),
            source.height(),
            "nine-slice rows must cover the source height"
        );
        Self {
            source,
            widths,
            heights,
        }
    }

    /// A flat fill of a single color.
    pub fn from_color(color: Color) -> Self {
        let mut source = PixelBuffer::new(1, 1);
        source.blend(0, 0, color, CompositeMode::Copy);
        Self::new(source, [0, 1, 0], [0, 1, 0])
    }

    /// A filled rounded rectangle with anti-aliased corners of `radius` pixels.
    pub fn rounded(radius: u32, color: Color) -> Self {
        let side = radius * 2 + 1;
        let r = radius as f32;
        let mut source = PixelBuffer::new(side, side);
        for py in 0..side {
            for px in 0..side {
                let dx = corner_distance(px, radius);
                let dy = corner_distance(py, radius);
                let dist = (dx * dx + dy * dy).sqrt();
                let coverage = (r - dist + 0.5).clamp(0.0, 1.0);
                source.blend(
                    px as i32,
                    py as i32,
                    color.with_coverage(coverage),
                    CompositeMode::Copy,
                );
            }
        }
        Self::new(source, [radius, 1, radius], [radius, 1, radius])
    }

    /// Draws the image stretched to `width` x `height` with its top-left
    /// corner at `at`.
    pub fn draw(
        &self,
        target: &mut PixelBuffer,
        width: i32,
        height: i32,
        at: Point,
        mode: CompositeMode,
    ) {
        if width <= 0 || height <= 0 {
            return;
        }
        let cols: Vec<i32> = (0..width)
            .map(|x| map_axis(x, width, self.widths))
            .collect();
        for y in 0..height {
            let sy = map_axis(y, height, self.heights);
            for (x, sx) in cols.iter().enumerate() {
                if let Some(c) = self.source.pixel(*sx, sy) {
                    target.blend(at.x + x as i32, at.y + y, c, mode);
                }
            }
        }
    }
}

// Distance from a pixel center to the nearest corner-circle center, along one
// axis. Zero in the stretchable middle band.
fn corner_distance(p: u32, radius: u32) -> f32 {
    let center = p as f32 + 0.5;
    if p < radius {
        radius as f32 - center
    } else if p > radius {
        center - (radius + 1) as f32
    } else {
        0.0
    }
}

// Maps a destination coordinate along one axis to a source coordinate.
fn map_axis(d: i32, extent: i32, parts: [u32; 3]) -> i32 {
    let [lead, mid, trail] = parts.map(|p| p as i32);
    // Corners shrink evenly when the target is smaller than both of them.
    let lead_px = lead.min(extent / 2);
    let trail_px = trail.min(extent - lead_px);
    if d < lead_px {
        return d;
    }
    if d >= extent - trail_px {
        return lead + mid + trail - (extent - d);
    }
    let stretch = extent - lead_px - trail_px;
    if mid == 0 || stretch <= 0 {
        return lead.saturating_sub(1).max(0);
    }
    lead + (d - lead_px) * mid / stretch
}
