use cosmic_text::{Attrs, Buffer, Color as CtColor, FontSystem, Metrics, Shaping, SwashCache};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use quill_core::Point;

use crate::{FontError, FontFace};

struct Engine {
    fs: FontSystem,
    cache: SwashCache,
}

static ENGINE: OnceCell<Mutex<Engine>> = OnceCell::new();

fn engine() -> &'static Mutex<Engine> {
    ENGINE.get_or_init(|| {
        Mutex::new(Engine {
            fs: FontSystem::new(),
            cache: SwashCache::new(),
        })
    })
}

fn has_faces() -> bool {
    engine().lock().fs.db().faces().next().is_some()
}

/// System fonts shaped with cosmic-text (ligatures, fallback, kerning).
///
/// Every measurement shapes the string from scratch; the font system and
/// glyph cache are shared process-wide.
pub struct ShapedFace {
    px: f32,
    line_height: f32,
    ascent: f32,
}

impl ShapedFace {
    pub fn new(px: f32) -> Self {
        let line_height = px * 1.3;
        let ascent = {
            let mut eng = engine().lock();
            let buf = shape(&mut eng.fs, "M", px, line_height);
            buf.layout_runs()
                .next()
                .map(|run| run.line_y - run.line_top)
                .unwrap_or_else(|| {
                    log::warn!("shaped face: no layout run for reference glyph; estimating ascent");
                    px * 0.8
                })
        };
        Self {
            px,
            line_height,
            ascent,
        }
    }

    /// Like [`ShapedFace::new`], but fails when the font system found no
    /// faces at all, where every string would measure zero.
    pub fn from_system(px: f32) -> Result<Self, FontError> {
        if !has_faces() {
            return Err(FontError::NoSystemFont);
        }
        Ok(Self::new(px))
    }
}

// Shape a single-line string (no wrapping).
fn shape(fs: &mut FontSystem, text: &str, px: f32, line_height: f32) -> Buffer {
    let mut buf = Buffer::new(fs, Metrics::new(px, line_height));
    {
        let mut b = buf.borrow_with(fs);
        b.set_size(None, None);
        b.set_text(text, &Attrs::new(), Shaping::Advanced, None);
        b.shape_until_scroll(true);
    }
    buf
}

impl FontFace for ShapedFace {
    fn advance(&self, text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let mut eng = engine().lock();
        let buf = shape(&mut eng.fs, text, self.px, self.line_height);
        let mut x = 0.0f32;
        for run in buf.layout_runs() {
            for g in run.glyphs {
                x = x.max(g.x + g.w); // right edge in LTR
            }
        }
        x
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn draw(&self, text: &str, origin: Point, plot: &mut dyn FnMut(i32, i32, f32)) {
        if text.is_empty() {
            return;
        }
        let mut guard = engine().lock();
        let Engine { fs, cache } = &mut *guard;
        let buf = shape(fs, text, self.px, self.line_height);
        buf.draw(fs, cache, CtColor::rgb(0xFF, 0xFF, 0xFF), |x, y, w, h, color| {
            let coverage = color.a() as f32 / 255.0;
            for dy in 0..h as i32 {
                for dx in 0..w as i32 {
                    plot(origin.x + x + dx, origin.y + y + dy, coverage);
                }
            }
        });
    }
}
