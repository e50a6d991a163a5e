use std::ops::Range;

use crate::changes::{Assoc, ChangeSet};

/// The document range the decoration set currently describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coverage {
    pub from: usize,
    pub to: usize,
}

/// What it takes to move coverage onto a new window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportPlan {
    /// Coverage already equals the window.
    Unchanged,
    /// No overlap: classify the whole window and drop everything else.
    Replace(Range<usize>),
    /// Overlap: classify the exposed edges and drop entries outside `keep`.
    Extend {
        before: Option<Range<usize>>,
        after: Option<Range<usize>>,
        keep: Range<usize>,
    },
}

impl ViewportPlan {
    /// Ranges that need classifying under this plan, in document order.
    pub fn exposed(&self) -> Vec<Range<usize>> {
        match self {
            ViewportPlan::Unchanged => Vec::new(),
            ViewportPlan::Replace(window) => vec![window.clone()],
            ViewportPlan::Extend { before, after, .. } => {
                before.iter().chain(after.iter()).cloned().collect()
            }
        }
    }
}

impl Coverage {
    pub fn new(range: Range<usize>) -> Self {
        Self {
            from: range.start,
            to: range.end,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }

    pub fn plan(&self, window: &Range<usize>) -> ViewportPlan {
        if self.from == window.start && self.to == window.end {
            return ViewportPlan::Unchanged;
        }

        if self.from >= window.end || self.to <= window.start {
            return ViewportPlan::Replace(window.clone());
        }

        ViewportPlan::Extend {
            before: (window.start < self.from).then(|| window.start..self.from),
            after: (self.to < window.end).then(|| self.to..window.end),
            keep: window.clone(),
        }
    }

    /// Moves coverage through an edit. The left edge skips past text
    /// inserted at it and the right edge stays in front of such text, so
    /// coverage never claims text nobody has classified.
    pub fn map(&self, changes: &ChangeSet) -> Self {
        let from = changes.map_pos(self.from, Assoc::After);
        let to = changes.map_pos(self.to, Assoc::Before);
        Self {
            from,
            to: to.max(from),
        }
    }

    /// The part of `span` inside coverage, if any.
    pub fn clip(&self, span: &Range<usize>) -> Option<Range<usize>> {
        let from = span.start.max(self.from);
        let to = span.end.min(self.to);
        (from < to).then_some(from..to)
    }
}
