use std::ops::Range;
use std::path::PathBuf;

use anyhow::Result;
use special_chars_engine::{
    ChangeSet, DecorationSet, Edit, RopeDocument, SpecialCharOptions, SpecialChars, TabMode,
    TextSource,
};

/// One line of the visible window.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleLine {
    /// Byte offset of the line start.
    pub start: usize,
    /// Line text without its terminator.
    pub text: String,
}

pub struct App {
    path: PathBuf,
    doc: RopeDocument,
    engine: SpecialChars,
    native_tabs: Option<usize>,
    top_line: usize,
    height: usize,
    caret: usize,
    dirty: bool,
    status: String,
}

impl App {
    pub fn new(
        path: PathBuf,
        doc: RopeDocument,
        options: &SpecialCharOptions,
        height: usize,
    ) -> Result<Self> {
        let height = height.max(1);
        let window = doc.offset_of_line(0)..doc.offset_of_line(height);
        let engine = SpecialChars::new(options, &doc, window)?;
        let native_tabs = (options.tab_mode == TabMode::Native).then_some(options.tab_size.max(1));

        Ok(Self {
            path,
            doc,
            engine,
            native_tabs,
            top_line: 0,
            height,
            caret: 0,
            dirty: false,
            status: String::new(),
        })
    }

    pub fn doc(&self) -> &RopeDocument {
        &self.doc
    }

    pub fn decorations(&self) -> &DecorationSet {
        self.engine.decorations()
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    /// Tab stop size when the viewer expands tabs itself.
    pub fn native_tabs(&self) -> Option<usize> {
        self.native_tabs
    }

    pub fn title(&self) -> String {
        let marker = if self.dirty { " [+]" } else { "" };
        format!("{}{marker}", self.path.display())
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Byte range of the visible lines, terminators included.
    pub fn window(&self) -> Range<usize> {
        self.doc.offset_of_line(self.top_line)..self.doc.offset_of_line(self.top_line + self.height)
    }

    pub fn visible_lines(&self) -> Vec<VisibleLine> {
        let last = self.doc.line_count().min(self.top_line + self.height);
        (self.top_line..last)
            .map(|line| {
                let start = self.doc.offset_of_line(line);
                let end = self.doc.line_at(start).end;
                VisibleLine {
                    start,
                    text: self.doc.slice(start..end).into_owned(),
                }
            })
            .collect()
    }

    pub fn set_height(&mut self, height: usize) -> Result<()> {
        let height = height.max(1);
        if height != self.height {
            self.height = height;
            self.refresh(&ChangeSet::empty())?;
        }
        Ok(())
    }

    pub fn scroll_by(&mut self, lines: isize) -> Result<()> {
        let max_top = self.doc.line_count().saturating_sub(1);
        let top = self.top_line.saturating_add_signed(lines).min(max_top);
        if top != self.top_line {
            self.top_line = top;
            self.refresh(&ChangeSet::empty())?;
        }
        Ok(())
    }

    pub fn page_down(&mut self) -> Result<()> {
        self.scroll_by(self.height as isize)
    }

    pub fn page_up(&mut self) -> Result<()> {
        self.scroll_by(-(self.height as isize))
    }

    pub fn caret_left(&mut self) -> Result<()> {
        self.caret = self.prev_boundary(self.caret);
        self.follow_caret()
    }

    pub fn caret_right(&mut self) -> Result<()> {
        self.caret = self.next_boundary(self.caret);
        self.follow_caret()
    }

    pub fn insert(&mut self, text: &str) -> Result<()> {
        let changes = self.doc.apply(Edit::Insert {
            at: self.caret,
            text: text.to_string(),
        });
        self.caret += text.len();
        self.dirty = true;
        self.follow_caret_without_refresh();
        self.refresh(&changes)
    }

    pub fn backspace(&mut self) -> Result<()> {
        let from = self.prev_boundary(self.caret);
        if from == self.caret {
            return Ok(());
        }
        let changes = self.doc.apply(Edit::Delete {
            range: from..self.caret,
        });
        self.caret = from;
        self.dirty = true;
        self.follow_caret_without_refresh();
        self.refresh(&changes)
    }

    pub fn save(&mut self) -> Result<()> {
        std::fs::write(&self.path, self.doc.text())?;
        self.dirty = false;
        self.status = format!("Saved {}", self.path.display());
        log::info!("saved {}", self.path.display());
        Ok(())
    }

    fn refresh(&mut self, changes: &ChangeSet) -> Result<()> {
        let window = self.window();
        let decorations = self.engine.update(&self.doc, changes, window)?;
        self.status = format!("{} special characters in view", decorations.len());
        Ok(())
    }

    fn follow_caret(&mut self) -> Result<()> {
        let top = self.top_line;
        self.follow_caret_without_refresh();
        if top != self.top_line {
            self.refresh(&ChangeSet::empty())?;
        }
        Ok(())
    }

    fn follow_caret_without_refresh(&mut self) {
        let line = self.doc.line_of_offset(self.caret);
        if line < self.top_line {
            self.top_line = line;
        } else if line >= self.top_line + self.height {
            self.top_line = line + 1 - self.height;
        }
    }

    /// Start of the character before `pos`; a line terminator counts as
    /// one character.
    fn prev_boundary(&self, pos: usize) -> usize {
        if pos == 0 {
            return 0;
        }
        let line = self.doc.line_at(pos);
        if pos <= line.start {
            return self.doc.line_at(pos - 1).end;
        }
        let before = self.doc.slice(line.start..pos);
        pos - before.chars().next_back().map_or(0, char::len_utf8)
    }

    /// End of the character at `pos`.
    fn next_boundary(&self, pos: usize) -> usize {
        let line = self.doc.line_at(pos);
        if pos >= line.end {
            return self.doc.offset_of_line(self.doc.line_of_offset(pos) + 1);
        }
        let after = self.doc.slice(pos..line.end);
        pos + after.chars().next().map_or(0, char::len_utf8)
    }
}
