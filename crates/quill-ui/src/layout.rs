use quill_core::{Insets, Rect, Size};

/// Anything a layouter can measure and place.
pub trait Locateable {
    fn preferred_size(&self) -> Size;
    fn set_location(&mut self, rect: Rect);
}

pub trait Layouter {
    fn preferred_size(&self, children: &[&dyn Locateable]) -> Size;
    fn layout(&self, children: &mut [&mut dyn Locateable], rect: Rect);
}

/// Stretches its single child over the container, minus padding.
#[derive(Clone, Copy, Debug, Default)]
pub struct FillLayout {
    pub padding: Insets,
}

impl FillLayout {
    pub fn new(padding: Insets) -> Self {
        Self { padding }
    }
}

impl Layouter for FillLayout {
    fn preferred_size(&self, children: &[&dyn Locateable]) -> Size {
        let child = children
            .first()
            .map(|c| c.preferred_size())
            .unwrap_or_default();
        Size::new(child.width + self.padding.dx(), child.height + self.padding.dy())
    }

    fn layout(&self, children: &mut [&mut dyn Locateable], rect: Rect) {
        debug_assert!(children.len() <= 1, "FillLayout places a single child");
        if let Some(child) = children.first_mut() {
            child.set_location(self.padding.apply(rect));
        }
    }
}
