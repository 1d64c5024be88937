//! String-level editing primitives. Positions are code-point indices.

use quill_core::Key;
use quill_text::char_len;

fn byte_offset(text: &str, pos: usize) -> usize {
    text.char_indices()
        .nth(pos)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// `text` with `ch` spliced in before code point `pos`.
pub fn insert_char(text: &str, pos: usize, ch: char) -> String {
    assert!(pos <= char_len(text), "insert position {pos} out of range");
    let at = byte_offset(text, pos);
    let mut out = String::with_capacity(text.len() + ch.len_utf8());
    out.push_str(&text[..at]);
    out.push(ch);
    out.push_str(&text[at..]);
    out
}

/// `text` without the code point at `pos`.
pub fn remove_char(text: &str, pos: usize) -> String {
    assert!(pos < char_len(text), "remove position {pos} out of range");
    let at = byte_offset(text, pos);
    let next = byte_offset(text, pos + 1);
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..at]);
    out.push_str(&text[next..]);
    out
}

pub fn clamp_cursor(pos: usize, len: usize) -> usize {
    pos.min(len)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    GoLeft,
    GoRight,
    GoStart,
    GoEnd,
    Backspace,
    Delete,
}

/// Command keys in the order they are polled. When several are held, the
/// first one listed wins.
pub const KEY_COMMANDS: [(Key, Command); 6] = [
    (Key::Left, Command::GoLeft),
    (Key::Right, Command::GoRight),
    (Key::Home, Command::GoStart),
    (Key::End, Command::GoEnd),
    (Key::Backspace, Command::Backspace),
    (Key::Delete, Command::Delete),
];

/// Result of applying a [`Command`]. `text` is `None` when the content is
/// unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    pub text: Option<String>,
    pub cursor: usize,
}

impl Command {
    /// Applies the command at `cursor`. Commands at the edge of the text are
    /// no-ops, never errors.
    pub fn apply(self, text: &str, cursor: usize) -> Edit {
        let len = char_len(text);
        let cursor = clamp_cursor(cursor, len);
        let moved = |cursor| Edit { text: None, cursor };
        match self {
            Command::GoLeft => moved(cursor.saturating_sub(1)),
            Command::GoRight => moved((cursor + 1).min(len)),
            Command::GoStart => moved(0),
            Command::GoEnd => moved(len),
            Command::Backspace if cursor > 0 => Edit {
                text: Some(remove_char(text, cursor - 1)),
                cursor: cursor - 1,
            },
            Command::Delete if cursor < len => Edit {
                text: Some(remove_char(text, cursor)),
                cursor,
            },
            Command::Backspace | Command::Delete => moved(cursor),
        }
    }
}
