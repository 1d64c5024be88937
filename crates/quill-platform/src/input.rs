use quill_core::{FrameInput, Key, MouseButton, Point};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitButton, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// Accumulates winit window events into one [`FrameInput`] per frame.
///
/// Feed it every `WindowEvent`, read [`WinitInput::frame`] while rendering,
/// then call [`WinitInput::end_frame`] to drop the per-frame edges.
#[derive(Debug, Default)]
pub struct WinitInput {
    frame: FrameInput,
    modifiers: ModifiersState,
}

pub fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        _ => return None,
    })
}

pub fn map_button(button: WinitButton) -> Option<MouseButton> {
    match button {
        WinitButton::Left => Some(MouseButton::Primary),
        WinitButton::Right => Some(MouseButton::Secondary),
        WinitButton::Middle => Some(MouseButton::Tertiary),
        _ => None,
    }
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> &FrameInput {
        &self.frame
    }

    pub fn end_frame(&mut self) {
        self.frame.begin_frame();
    }

    /// Returns true when the event changed the input state.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let code = match event.physical_key {
                    PhysicalKey::Code(code) => Some(code),
                    PhysicalKey::Unidentified(_) => None,
                };
                self.key(code, event.state, event.text.as_deref());
                true
            }
            WindowEvent::ModifiersChanged(m) => {
                self.modifiers = m.state();
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(*position);
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_input(*state, *button);
                true
            }
            WindowEvent::Focused(false) => {
                // Releases are not delivered to an unfocused window.
                self.frame.held.clear();
                true
            }
            _ => false,
        }
    }

    pub fn key(&mut self, code: Option<KeyCode>, state: ElementState, text: Option<&str>) {
        if let Some(key) = code.and_then(map_key) {
            match state {
                ElementState::Pressed => self.frame.press_key(key),
                ElementState::Released => self.frame.release_key(key),
            }
        }

        let shortcut = self.modifiers.control_key()
            || self.modifiers.alt_key()
            || self.modifiers.super_key();
        if state == ElementState::Pressed && !shortcut {
            if let Some(text) = text {
                self.frame.type_text(text);
            }
        }
    }

    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.frame
            .move_cursor(Point::new(position.x.floor() as i32, position.y.floor() as i32));
    }

    pub fn mouse_input(&mut self, state: ElementState, button: WinitButton) {
        if state != ElementState::Pressed {
            return;
        }
        if let Some(b) = map_button(button) {
            self.frame.click(b);
        }
    }
}
