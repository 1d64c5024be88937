use std::sync::Arc;

use quill_core::{Color, Insets, NineSlice, Rect};
use quill_platform::{DesktopConfig, run_desktop};
use quill_text::{FixedAdvanceFace, FontError, FontFace, GlyphFace, ShapedFace};
use quill_ui::{
    FillLayout, Layouter, TextInput, TextInputColor, TextInputImage, TextInputOptions,
    WidgetOptions,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let face = pick_face(18.0);

    let mut field = TextInput::new(
        TextInputOptions::new(face)
            .widget(WidgetOptions::new().min_size(300, 0))
            .padding(Insets::symmetric(8, 6))
            .image(TextInputImage {
                idle: NineSlice::rounded(6, Color::from_hex("#EDEDF2")),
                disabled: Some(NineSlice::rounded(6, Color::from_hex("#D0D0D0"))),
            })
            .color(TextInputColor {
                idle: Color::from_hex("#202024"),
                disabled: Color::from_hex("#808080"),
                caret: Color::from_hex("#3060E0"),
            })
            .mask(NineSlice::rounded(4, Color::WHITE))
            .validation(|s| s.chars().count() <= 64),
    );
    field.set_text("Type here");

    let layout = FillLayout::new(Insets::uniform(24));
    run_desktop(DesktopConfig::default(), move |screen, input, deferred| {
        let size = layout.preferred_size(&[&field]);
        layout.layout(&mut [&mut field], Rect::new(0, 0, screen.width() as i32, size.height));
        field.render(screen, input, deferred);
    })
}

// Prefers ab_glyph, then cosmic-text shaping, then box glyphs.
fn pick_face(px: f32) -> Arc<dyn FontFace> {
    let glyph_err: FontError = match GlyphFace::from_system(px) {
        Ok(face) => return Arc::new(face),
        Err(e) => e,
    };
    match ShapedFace::from_system(px) {
        Ok(face) => {
            log::warn!("{glyph_err}; measuring with shaped system fonts");
            Arc::new(face)
        }
        Err(e) => {
            log::warn!("{glyph_err}; {e}; falling back to box glyphs");
            Arc::new(FixedAdvanceFace::new(px / 2.0, px))
        }
    }
}
