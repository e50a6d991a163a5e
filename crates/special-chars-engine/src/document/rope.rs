use std::borrow::Cow;
use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use super::{Chunk, Line, TextSource, line_break_len};
use crate::changes::ChangeSet;

/// Edits that can be applied to a [`RopeDocument`].
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Insert { at: usize, text: String },
    Delete { range: Range<usize> },
    Replace { range: Range<usize>, text: String },
}

/// A document held in a single xi-rope buffer.
#[derive(Clone)]
pub struct RopeDocument {
    buffer: Rope,
}

impl Default for RopeDocument {
    fn default() -> Self {
        Self::new("")
    }
}

impl std::fmt::Debug for RopeDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RopeDocument")
            .field("len", &self.buffer.len())
            .finish()
    }
}

impl RopeDocument {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
        }
    }

    /// Create a document from raw bytes, which must be UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, std::str::Utf8Error> {
        Ok(Self::new(std::str::from_utf8(bytes)?))
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn rope(&self) -> &Rope {
        &self.buffer
    }

    /// Number of lines; a trailing newline starts an empty last line.
    pub fn line_count(&self) -> usize {
        self.buffer.line_of_offset(self.buffer.len()) + 1
    }

    /// Byte offset of the start of line `line`, or the document length past
    /// the last line.
    pub fn offset_of_line(&self, line: usize) -> usize {
        if line >= self.line_count() {
            self.buffer.len()
        } else {
            self.buffer.offset_of_line(line)
        }
    }

    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.buffer.line_of_offset(offset.min(self.buffer.len()))
    }

    /// Apply an edit and describe what changed.
    pub fn apply(&mut self, edit: Edit) -> ChangeSet {
        let delta = self.compile(&edit);
        self.apply_delta(&delta)
    }

    /// Apply a prebuilt delta and describe what changed.
    pub fn apply_delta(&mut self, delta: &Delta<RopeInfo>) -> ChangeSet {
        let changes = ChangeSet::from_delta(delta);
        self.buffer = delta.apply(&self.buffer);
        changes
    }

    fn compile(&self, edit: &Edit) -> Delta<RopeInfo> {
        let len = self.buffer.len();
        let clamp = |range: &Range<usize>| {
            let start = range.start.min(len);
            start..range.end.min(len).max(start)
        };

        let mut builder = Builder::new(len);
        match edit {
            Edit::Insert { at, text } => {
                let at = (*at).min(len);
                builder.replace(at..at, Rope::from(text.as_str()));
            }
            Edit::Delete { range } => {
                builder.delete(clamp(range));
            }
            Edit::Replace { range, text } => {
                builder.replace(clamp(range), Rope::from(text.as_str()));
            }
        }
        builder.build()
    }
}

impl From<&str> for RopeDocument {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl TextSource for RopeDocument {
    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn chunks(&self, range: Range<usize>) -> impl Iterator<Item = Chunk<'_>> + '_ {
        let end = range.end.min(self.buffer.len());
        let start = range.start.min(end);
        self.buffer
            .lines_raw(start..end)
            .flat_map(|line| split_line_break(line).into_iter().flatten())
    }

    fn line_at(&self, pos: usize) -> Line {
        let len = self.buffer.len();
        let pos = pos.min(len);
        let start = self.buffer.offset_of_line(self.buffer.line_of_offset(pos));
        let end = match self.buffer.lines_raw(start..len).next() {
            Some(line) => start + line.len() - line_break_len(&line),
            None => start,
        };
        Line { start, end }
    }

    fn slice(&self, range: Range<usize>) -> Cow<'_, str> {
        let len = self.buffer.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.buffer.slice_to_cow(start..end)
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        (pos < self.buffer.len()).then(|| self.buffer.byte_at(pos))
    }
}

/// Splits one raw line into its text and its terminator.
fn split_line_break(line: Cow<'_, str>) -> [Option<Chunk<'_>>; 2] {
    let break_len = line_break_len(&line);
    let text_len = line.len() - break_len;

    let text = match line {
        Cow::Borrowed(s) => Cow::Borrowed(&s[..text_len]),
        Cow::Owned(mut s) => {
            s.truncate(text_len);
            Cow::Owned(s)
        }
    };

    [
        (!text.is_empty()).then_some(Chunk::Text(text)),
        (break_len > 0).then_some(Chunk::LineBreak(break_len)),
    ]
}
