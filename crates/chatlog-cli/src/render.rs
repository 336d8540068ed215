//! Terminal rendering of session snapshots.

use chatlog_core::{Message, Role};
use chatlog_session::ChatState;
use std::io::{self, Write};

pub const EMPTY_STATE: &str = "No messages yet. Start a conversation!";

const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    id.char_indices()
        .nth(SHORT_ID_LEN)
        .map_or(id, |(idx, _)| &id[..idx])
}

pub fn count_label(n: usize) -> String {
    format!("{n} message{}", if n == 1 { "" } else { "s" })
}

pub fn format_message(msg: &Message) -> String {
    let edited = if msg.edited { " (edited)" } else { "" };
    format!("[{}] {}: {}{edited}", short_id(&msg.id), msg.role, msg.text)
}

/// Whole transcript followed by the message count.
pub fn render_full(state: &ChatState) -> String {
    let mut out = String::new();
    if state.is_empty() {
        out.push_str(EMPTY_STATE);
        out.push('\n');
    } else {
        for msg in &state.messages {
            out.push_str(&format_message(msg));
            out.push('\n');
        }
    }
    out.push_str(&format!("-- {} --\n", count_label(state.len())));
    out
}

/// Incremental terminal view fed from the session subscription.
///
/// Appends only print the new lines. Anything else (edit, delete, clear,
/// import) redraws the whole transcript.
pub struct TerminalView<W: Write> {
    out: W,
    shown: Vec<Message>,
    primed: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown: Vec::new(),
            primed: false,
        }
    }

    pub fn render(&mut self, state: &ChatState) -> io::Result<()> {
        let extends = self.primed
            && state.len() > self.shown.len()
            && state.messages[..self.shown.len()] == self.shown[..];

        if extends {
            for msg in &state.messages[self.shown.len()..] {
                writeln!(self.out, "{}", format_message(msg))?;
            }
        } else if state.messages != self.shown || !self.primed {
            write!(self.out, "{}", render_full(state))?;
        }

        self.shown.clone_from(&state.messages);
        self.primed = true;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Resolves a full id or an unambiguous prefix of one.
///
/// Only user messages can be edited or deleted, so bot messages never match.
pub fn resolve_id<'a>(messages: &'a [Message], input: &str) -> Option<&'a str> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let editable = messages.iter().filter(|m| m.role == Role::User);
    if let Some(exact) = editable.clone().find(|m| m.id == input) {
        return Some(&exact.id);
    }
    let mut matches = editable.filter(|m| m.id.starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(&only.id),
        _ => None,
    }
}
