//! Folding an edit into an existing decoration set.
//!
//! Decorations and coverage are moved through the edit, then only the text
//! the edit touched (plus whatever lies within `merge_gap` of it) is
//! re-classified.

use std::ops::Range;

use crate::changes::ChangeSet;
use crate::classify::Classify;
use crate::decorations::DecorationSet;
use crate::document::{TextSource, snap_to_line_breaks};
use crate::error::DecorationError;
use crate::viewport::Coverage;

/// Result of folding one edit in.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub decorations: DecorationSet,
    pub coverage: Coverage,
    /// The clipped spans that were re-classified.
    pub rescanned: Vec<Range<usize>>,
}

/// Post-edit spans needing a re-scan, with nearby changes merged.
///
/// With `widen_to_line_end`, each change extends to the end of the line it
/// ends on: a tab's width depends on everything before it on its line.
/// Spans are then snapped so none splits a `"\r\n"` or skips a `"\r"`
/// just in front of it.
pub fn merge_spans<D: TextSource>(
    changes: &ChangeSet,
    doc: &D,
    widen_to_line_end: bool,
    merge_gap: usize,
) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();

    for change in changes.iter() {
        let to = if widen_to_line_end {
            doc.line_at(change.to_b).end.max(change.to_b)
        } else {
            change.to_b
        };
        let span = snap_to_line_breaks(doc, change.from_b..to);

        match spans.last_mut() {
            Some(current) if span.start <= current.end + merge_gap => {
                current.start = current.start.min(span.start);
                current.end = current.end.max(span.end);
            }
            _ => spans.push(span),
        }
    }

    spans
}

/// Moves `decorations` and `coverage` through `changes` and re-classifies
/// the changed text that is still covered.
pub fn reconcile<C: Classify, D: TextSource>(
    classifier: &C,
    doc: &D,
    decorations: &DecorationSet,
    coverage: Coverage,
    changes: &ChangeSet,
    merge_gap: usize,
) -> Result<Reconciled, DecorationError> {
    let mapped = decorations.map(changes);
    let coverage = coverage.map(changes);
    let spans = merge_spans(changes, doc, classifier.replaces_tabs(), merge_gap);

    let rescanned: Vec<Range<usize>> = spans.iter().filter_map(|s| coverage.clip(s)).collect();
    let added = rescanned
        .iter()
        .flat_map(|span| classifier.classify(doc, span.clone()))
        .collect();

    // Removal uses the unclipped spans so stale entries just outside
    // coverage cannot come back when the window grows over them
    let bounds = match (spans.first(), spans.last()) {
        (Some(first), Some(last)) => first.start..last.end,
        _ => 0..0,
    };
    let decorations = mapped.update(added, bounds, |from, _| {
        spans.iter().any(|s| s.start <= from && from < s.end)
    })?;

    log::debug!(
        "reconciled {} changes into {} spans, {} re-scanned",
        changes.len(),
        spans.len(),
        rescanned.len()
    );

    Ok(Reconciled {
        decorations,
        coverage,
        rescanned,
    })
}
