use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use fontdb::Database;
use quill_core::Point;

use crate::{FontError, FontFace};

/// Outline font measured and rasterized with ab_glyph. Advances include
/// pair kerning; no shaping is performed.
#[derive(Clone)]
pub struct GlyphFace {
    font: FontArc,
    scale: PxScale,
}

impl GlyphFace {
    pub fn new(font: FontArc, px: f32) -> Self {
        Self {
            font,
            scale: PxScale::from(px),
        }
    }

    pub fn from_bytes(bytes: Vec<u8>, px: f32) -> Result<Self, FontError> {
        let font = FontArc::try_from_vec(bytes).map_err(|_| FontError::InvalidFont)?;
        Ok(Self::new(font, px))
    }

    /// Loads the default sans-serif face from the system font database.
    pub fn from_system(px: f32) -> Result<Self, FontError> {
        let mut db = Database::new();
        db.load_system_fonts();

        let query = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            ..Default::default()
        };
        let id = db.query(&query).ok_or(FontError::NoSystemFont)?;

        let (source, _face_index) = db.face_source(id).ok_or(FontError::FaceNotFound)?;

        let bytes = match source {
            fontdb::Source::Binary(data) => {
                let bytes: &[u8] = data.as_ref().as_ref();
                bytes.to_vec()
            }
            fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
                std::fs::read(path)?
            }
        };
        log::debug!("glyph face: loaded system sans-serif ({} bytes)", bytes.len());
        Self::from_bytes(bytes, px)
    }

    // Pen positions of each glyph along the baseline, kerning applied.
    fn layout(&self, text: &str) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(self.scale);
        let mut out = Vec::with_capacity(text.len());
        let mut x = 0.0f32;
        let mut prev: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                x += scaled.kern(p, id);
            }
            out.push((id, x));
            x += scaled.h_advance(id);
            prev = Some(id);
        }
        (out, x)
    }
}

impl FontFace for GlyphFace {
    fn advance(&self, text: &str) -> f32 {
        self.layout(text).1
    }

    fn ascent(&self) -> f32 {
        self.font.as_scaled(self.scale).ascent()
    }

    fn line_height(&self) -> f32 {
        self.font.as_scaled(self.scale).height()
    }

    fn draw(&self, text: &str, origin: Point, plot: &mut dyn FnMut(i32, i32, f32)) {
        let baseline = origin.y as f32 + self.ascent();
        let (glyphs, _) = self.layout(text);
        for (id, x) in glyphs {
            let glyph = id.with_scale_and_position(self.scale, point(origin.x as f32 + x, baseline));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                let (bx, by) = (bounds.min.x as i32, bounds.min.y as i32);
                outlined.draw(|gx, gy, coverage| {
                    plot(bx + gx as i32, by + gy as i32, coverage);
                });
            }
        }
    }
}
