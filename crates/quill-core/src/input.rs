use smallvec::SmallVec;

use crate::Point;

/// Keys the text input reacts to while held. Anything else reaches widgets
/// only as typed characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,   // Left mouse, touch
    Secondary, // Right mouse
    Tertiary,  // Middle mouse
}

/// One frame's worth of sampled input.
pub trait InputSource {
    /// Printable characters typed since the previous frame, in order.
    fn typed_chars(&self) -> &[char];
    fn key_pressed(&self, key: Key) -> bool;
    fn cursor_position(&self) -> Point;
    /// True only on the frame the button went down.
    fn mouse_just_pressed(&self, button: MouseButton) -> bool;
}

/// Plain snapshot implementation of [`InputSource`].
///
/// Platform adapters fill one of these per frame; tests build them directly.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    pub chars: SmallVec<[char; 4]>,
    pub held: SmallVec<[Key; 4]>,
    pub cursor: Point,
    pub just_pressed: SmallVec<[MouseButton; 2]>,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the per-frame edges (typed text, fresh clicks); held keys and the
    /// pointer position carry over.
    pub fn begin_frame(&mut self) {
        self.chars.clear();
        self.just_pressed.clear();
    }

    pub fn type_text(&mut self, text: &str) {
        self.chars
            .extend(text.chars().filter(|c| !c.is_control()));
    }

    pub fn press_key(&mut self, key: Key) {
        if !self.held.contains(&key) {
            self.held.push(key);
        }
    }

    pub fn release_key(&mut self, key: Key) {
        self.held.retain(|k| *k != key);
    }

    pub fn move_cursor(&mut self, p: Point) {
        self.cursor = p;
    }

    pub fn click(&mut self, button: MouseButton) {
        if !self.just_pressed.contains(&button) {
            self.just_pressed.push(button);
        }
    }
}

impl InputSource for FrameInput {
    fn typed_chars(&self) -> &[char] {
        &self.chars
    }

    fn key_pressed(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn cursor_position(&self) -> Point {
        self.cursor
    }

    fn mouse_just_pressed(&self, button: MouseButton) -> bool {
        self.just_pressed.contains(&button)
    }
}
