//! Rope-backed text buffer and the caret line bookkeeping built on top of it.
//!
//! Offsets everywhere in this crate are character (Unicode scalar) offsets,
//! matching `ropey`'s char indexing. Only `'\n'` is a line break; callers
//! normalize CRLF / CR input with [`normalize_line_endings`] before building a
//! [`Buffer`].

use anyhow::{Context, Result};
use ropey::Rope;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

pub mod highlight;
pub mod source;

pub use highlight::{Caret, HighlightCache};
pub use source::TextSource;

/// A named text buffer backed by a `ropey::Rope`.
#[derive(Clone, Debug)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            name: name.into(),
        }
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Total number of lines. An empty buffer (and a buffer ending in `'\n'`)
    /// still counts its trailing empty line, so this is always >= 1.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Char offset of the first character of `line` (clamped to the last line).
    pub fn line_to_char(&self, line: usize) -> usize {
        let line = line.min(self.line_count() - 1);
        self.rope.line_to_char(line)
    }

    /// Line containing char offset `offset` (clamped to the buffer end).
    pub fn char_to_line(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.len_chars()))
    }

    /// Line content without its trailing newline.
    pub fn line_text(&self, line: usize) -> String {
        if line >= self.line_count() {
            return String::new();
        }
        let mut s = self.rope.line(line).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }

    /// Length in chars of `line` excluding the trailing newline.
    pub fn line_len_chars(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return 0;
        }
        let slice = self.rope.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Insert `text` at char offset `offset` (clamped). Returns the offset just
    /// past the inserted text.
    pub fn insert(&mut self, offset: usize, text: &str) -> usize {
        let at = offset.min(self.len_chars());
        self.rope.insert(at, text);
        at + text.chars().count()
    }

    /// Remove the char before `offset`. Returns the new caret offset.
    pub fn delete_before(&mut self, offset: usize) -> usize {
        let at = offset.min(self.len_chars());
        if at == 0 {
            return 0;
        }
        self.rope.remove(at - 1..at);
        at - 1
    }

    /// Remove the char at `offset`; no-op at the buffer end.
    pub fn delete_at(&mut self, offset: usize) {
        if offset < self.len_chars() {
            self.rope.remove(offset..offset + 1);
        }
    }

    /// Write the buffer contents to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut writer = std::io::BufWriter::new(file);
        self.rope
            .write_to(&mut writer)
            .and_then(|_| writer.flush())
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(target: "io", file = %path.display(), chars = self.len_chars(), "file_saved");
        Ok(())
    }
}

impl std::fmt::Display for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

/// Convert CRLF and lone CR line endings to LF. Borrows when nothing changes.
pub fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
