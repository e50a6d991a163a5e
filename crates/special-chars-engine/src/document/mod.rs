//! Document access.
//!
//! The engine never owns the text it decorates. It reads it through
//! [`TextSource`], which any text store can implement; [`RopeDocument`] is
//! the xi-rope backed implementation used by the front end and the tests.

mod rope;

use std::borrow::Cow;
use std::ops::Range;

pub use rope::{Edit, RopeDocument};

/// A piece of a document range: either text that contains no line break,
/// or a single line break of the given byte length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk<'a> {
    Text(Cow<'a, str>),
    LineBreak(usize),
}

impl Chunk<'_> {
    /// Length of the chunk in bytes.
    pub fn len(&self) -> usize {
        match self {
            Chunk::Text(text) => text.len(),
            Chunk::LineBreak(len) => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Byte bounds of one line, excluding its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub start: usize,
    pub end: usize,
}

/// Random access to a document's text.
pub trait TextSource {
    /// Document length in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Chunks covering `range` in order. Text chunks never contain a line
    /// break, so a match inside one cannot span lines.
    fn chunks(&self, range: Range<usize>) -> impl Iterator<Item = Chunk<'_>> + '_;

    /// The line containing `pos`.
    fn line_at(&self, pos: usize) -> Line;

    fn slice(&self, range: Range<usize>) -> Cow<'_, str>;

    /// The byte at `pos`, or `None` at or past the end.
    fn byte_at(&self, pos: usize) -> Option<u8>;
}

/// Visual column reached after `text`, expanding tabs to multiples of
/// `tab_size`.
pub fn column_for(text: &str, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    text.chars().fold(0, |col, c| {
        if c == '\t' {
            col + tab_size - col % tab_size
        } else {
            col + 1
        }
    })
}

/// Widens `range` so it starts in front of a `"\r"` directly before it and
/// never ends between the two bytes of a `"\r\n"`.
///
/// Whether a `"\r"` is decorated depends on the byte after it, so an edit
/// at `pos` can change the decoration at `pos - 1`.
pub fn snap_to_line_breaks<D: TextSource>(doc: &D, range: Range<usize>) -> Range<usize> {
    let mut start = range.start;
    let mut end = range.end;
    if start > 0 && doc.byte_at(start - 1) == Some(b'\r') {
        start -= 1;
    }
    if end > 0 && doc.byte_at(end - 1) == Some(b'\r') && doc.byte_at(end) == Some(b'\n') {
        end += 1;
    }
    start..end.max(start)
}

/// Length of the line terminator `line` ends with (`"\n"` or `"\r\n"`).
pub(crate) fn line_break_len(line: &str) -> usize {
    if line.ends_with("\r\n") {
        2
    } else if line.ends_with('\n') {
        1
    } else {
        0
    }
}
