//! Finding special characters in a document range.

mod scan;

use std::ops::Range;

use regex::{Match, Regex};

use crate::decorations::Decoration;
use crate::document::{Chunk, TextSource, column_for};
use crate::error::EngineError;
use crate::options::SpecialCharOptions;

pub use scan::{ScanState, next_match};

/// Produces decorations for a document range.
pub trait Classify {
    /// Decorations for every match lying fully inside `range`, in order.
    fn classify<D: TextSource>(&self, doc: &D, range: Range<usize>) -> Vec<Decoration>;

    /// Whether tabs are decorated. When they are, a tab's width depends on
    /// everything before it on its line.
    fn replaces_tabs(&self) -> bool;
}

/// The regex-driven classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    pattern: Regex,
    replaces_tabs: bool,
    tab_size: usize,
    char_width: f32,
}

impl Classifier {
    pub fn new(options: &SpecialCharOptions) -> Result<Self, EngineError> {
        let pattern = options.compile()?;
        let replaces_tabs = pattern.is_match("\t");
        Ok(Self {
            pattern,
            replaces_tabs,
            tab_size: options.tab_size.max(1),
            char_width: options.char_width,
        })
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Pushes the decorations for one match in the chunk at `chunk_start`.
    ///
    /// A match led by a tab yields one decoration per character so every
    /// tab in a run gets its own width. A `"\r"` matched on its own is part
    /// of a line break when a `"\n"` follows it in the document, even if
    /// the scanned range stops between the two.
    fn decorate<D: TextSource>(
        &self,
        doc: &D,
        chunk_start: usize,
        m: &Match<'_>,
        found: &mut Vec<Decoration>,
    ) {
        let text = m.as_str();
        let from = chunk_start + m.start();
        let Some(first) = text.chars().next() else {
            return;
        };

        if first != '\t' {
            if text == "\r" && doc.byte_at(from + 1) == Some(b'\n') {
                return;
            }
            found.push(Decoration::special_char(from, chunk_start + m.end(), first));
            return;
        }

        let line = doc.line_at(from);
        let mut col = column_for(&doc.slice(line.start..from), self.tab_size);
        for (offset, ch) in text.char_indices() {
            let at = from + offset;
            if ch == '\t' {
                let cols = self.tab_size - col % self.tab_size;
                found.push(Decoration::tab(at, cols as f32 * self.char_width));
                col += cols;
            } else {
                found.push(Decoration::special_char(at, at + ch.len_utf8(), ch));
                col += 1;
            }
        }
    }
}

impl Classify for Classifier {
    fn classify<D: TextSource>(&self, doc: &D, range: Range<usize>) -> Vec<Decoration> {
        let mut found = Vec::new();
        let mut pos = range.start;

        for chunk in doc.chunks(range.clone()) {
            match chunk {
                Chunk::LineBreak(len) => pos += len,
                Chunk::Text(text) => {
                    let mut state = ScanState::default();
                    while let Some((m, next)) = next_match(&self.pattern, &text, state) {
                        state = next;
                        self.decorate(doc, pos, &m, &mut found);
                    }
                    pos += text.len();
                }
            }
        }

        log::trace!(
            "classified {}..{}: {} decorations",
            range.start,
            range.end,
            found.len()
        );
        found
    }

    fn replaces_tabs(&self) -> bool {
        self.replaces_tabs
    }
}
