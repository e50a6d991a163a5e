use std::ops::Range;

use crate::changes::{ChangeSet, ChangedRange};
use crate::classify::{Classifier, Classify};
use crate::decorations::DecorationSet;
use crate::document::TextSource;
use crate::error::EngineError;
use crate::options::SpecialCharOptions;
use crate::reconcile::reconcile;
use crate::viewport::{Coverage, ViewportPlan};

/// Keeps a [`DecorationSet`] in step with a document and a window onto it.
///
/// The host reports every edit and every window move through
/// [`SpecialChars::update`] and renders [`SpecialChars::decorations`]
/// afterwards. Classification work is bounded by the window and by the
/// edited regions; the rest of the document is never scanned.
#[derive(Debug)]
pub struct SpecialChars<C: Classify = Classifier> {
    classifier: C,
    merge_gap: usize,
    decorations: DecorationSet,
    coverage: Coverage,
}

impl SpecialChars<Classifier> {
    /// Creates an engine and classifies the initial window.
    pub fn new<D: TextSource>(
        options: &SpecialCharOptions,
        doc: &D,
        window: Range<usize>,
    ) -> Result<Self, EngineError> {
        let classifier = Classifier::new(options)?;
        Self::with_classifier(classifier, options.merge_gap, doc, window)
    }
}

impl<C: Classify> SpecialChars<C> {
    pub fn with_classifier<D: TextSource>(
        classifier: C,
        merge_gap: usize,
        doc: &D,
        window: Range<usize>,
    ) -> Result<Self, EngineError> {
        let window = clamp_window(doc, window);
        let decorations = DecorationSet::from_sorted(classifier.classify(doc, window.clone()))?;

        log::debug!(
            "initial classification of {}..{}: {} decorations",
            window.start,
            window.end,
            decorations.len()
        );

        Ok(Self {
            classifier,
            merge_gap,
            decorations,
            coverage: Coverage::new(window),
        })
    }

    /// The current snapshot. Later updates never modify it.
    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    /// The range the current snapshot describes.
    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Folds an edit (possibly empty) into the decorations and moves
    /// coverage onto `window`. `doc` is the post-edit document.
    pub fn update<D: TextSource>(
        &mut self,
        doc: &D,
        changes: &ChangeSet,
        window: Range<usize>,
    ) -> Result<&DecorationSet, EngineError> {
        if !changes.is_empty() {
            let reconciled = reconcile(
                &self.classifier,
                doc,
                &self.decorations,
                self.coverage,
                changes,
                self.merge_gap,
            )
            .inspect_err(|e| log::error!("reconciling edit failed: {e}"))?;
            self.decorations = reconciled.decorations;
            self.coverage = reconciled.coverage;
        }

        self.update_for_viewport(doc, clamp_window(doc, window))?;
        Ok(&self.decorations)
    }

    /// Like [`SpecialChars::update`], validating raw changed ranges first.
    pub fn update_ranges<D: TextSource>(
        &mut self,
        doc: &D,
        ranges: Vec<ChangedRange>,
        window: Range<usize>,
    ) -> Result<&DecorationSet, EngineError> {
        let changes = ChangeSet::new(ranges)?;
        self.update(doc, &changes, window)
    }

    fn update_for_viewport<D: TextSource>(
        &mut self,
        doc: &D,
        window: Range<usize>,
    ) -> Result<(), EngineError> {
        let plan = self.coverage.plan(&window);
        let added = plan
            .exposed()
            .into_iter()
            .flat_map(|range| self.classifier.classify(doc, range))
            .collect();

        let decorations = match &plan {
            ViewportPlan::Unchanged => return Ok(()),
            ViewportPlan::Replace(_) => self.decorations.update(added, 0..usize::MAX, |_, _| true),
            ViewportPlan::Extend { keep, .. } => {
                self.decorations
                    .update(added, 0..usize::MAX, |from, to| from < keep.start || to > keep.end)
            }
        }
        .inspect_err(|e| log::error!("moving window to {}..{} failed: {e}", window.start, window.end))?;

        log::trace!(
            "window {}..{} -> {}..{}: {} decorations",
            self.coverage.from,
            self.coverage.to,
            window.start,
            window.end,
            decorations.len()
        );

        self.decorations = decorations;
        self.coverage = Coverage::new(window);
        Ok(())
    }
}

fn clamp_window<D: TextSource>(doc: &D, window: Range<usize>) -> Range<usize> {
    let end = window.end.min(doc.len());
    window.start.min(end)..end
}
