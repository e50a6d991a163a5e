//! The decoration set: an immutable, ordered collection of
//! "replace this range with this widget" entries.
//!
//! Every operation returns a new [`DecorationSet`] and leaves the receiver
//! untouched, so a snapshot handed to a renderer never changes under it.
//! Entries live in a shared sorted slice; lookups binary search on `from`.

use std::ops::Range;
use std::sync::Arc;

use crate::changes::{Assoc, ChangeSet};
use crate::error::DecorationError;

/// What a decorated range is replaced with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Replacement {
    /// A special character, rendered as a placeholder glyph.
    SpecialChar { ch: char },
    /// A tab rendered as a fixed-width block of `width` units.
    Tab { width: f32 },
}

/// One entry of a [`DecorationSet`]: `[from, to)` is replaced by
/// `replacement`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub replacement: Replacement,
}

impl Decoration {
    pub fn new(from: usize, to: usize, replacement: Replacement) -> Self {
        Self {
            from,
            to,
            replacement,
        }
    }

    pub fn special_char(from: usize, to: usize, ch: char) -> Self {
        Self::new(from, to, Replacement::SpecialChar { ch })
    }

    pub fn tab(from: usize, width: f32) -> Self {
        Self::new(from, from + 1, Replacement::Tab { width })
    }

    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }

    fn overlaps(&self, from: usize, to: usize) -> bool {
        self.from < to && self.to > from
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecorationSet {
    entries: Arc<[Decoration]>,
}

impl DecorationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a set from entries already in document order.
    pub fn from_sorted(entries: Vec<Decoration>) -> Result<Self, DecorationError> {
        check_sorted(&entries)?;
        Ok(Self {
            entries: entries.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Decoration] {
        &self.entries
    }

    /// Whether two sets are the same snapshot, not merely equal.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.entries, &b.entries)
    }

    /// Entries overlapping `[from, to)`.
    pub fn between(&self, from: usize, to: usize) -> &[Decoration] {
        let (start, end) = self.overlap_bounds(from, to);
        &self.entries[start..end]
    }

    /// Merges an ordered batch of entries into the set.
    ///
    /// Fails if the batch is unsorted, contains empty ranges, or overlaps an
    /// entry already present.
    pub fn insert(&self, added: Vec<Decoration>) -> Result<Self, DecorationError> {
        self.update(added, 0..0, |_, _| false)
    }

    /// Removes entries overlapping `bounds` for which `remove(from, to)`
    /// holds. Entries outside `bounds` are kept whatever the predicate says.
    pub fn remove_where(
        &self,
        bounds: Range<usize>,
        remove: impl FnMut(usize, usize) -> bool,
    ) -> Self {
        let mut kept = Vec::with_capacity(self.entries.len());
        self.retain_into(&mut kept, bounds, remove);
        self.reuse_or(kept)
    }

    /// Removal followed by insertion, as one step.
    ///
    /// When the result equals the receiver, the receiver's snapshot is
    /// returned so consumers can skip re-rendering.
    pub fn update(
        &self,
        added: Vec<Decoration>,
        bounds: Range<usize>,
        remove: impl FnMut(usize, usize) -> bool,
    ) -> Result<Self, DecorationError> {
        check_sorted(&added)?;

        let mut kept = Vec::with_capacity(self.entries.len());
        self.retain_into(&mut kept, bounds, remove);

        if added.is_empty() {
            return Ok(self.reuse_or(kept));
        }

        let mut merged = Vec::with_capacity(kept.len() + added.len());
        let mut kept = kept.into_iter().peekable();
        for deco in added {
            while let Some(existing) = kept.next_if(|e| e.from < deco.from) {
                if existing.to > deco.from {
                    return Err(overlap(&deco, &existing));
                }
                merged.push(existing);
            }
            if let Some(next) = kept.peek()
                && next.from < deco.to
            {
                return Err(overlap(&deco, next));
            }
            merged.push(deco);
        }
        merged.extend(kept);

        Ok(self.reuse_or(merged))
    }

    /// Translates every entry through an edit.
    ///
    /// Entries whose text the edit replaced, or that received an insertion
    /// strictly inside them, are dropped rather than shifted; the caller is
    /// expected to re-classify the changed regions.
    pub fn map(&self, changes: &ChangeSet) -> Self {
        if changes.is_empty() {
            return self.clone();
        }

        let mapped = self
            .entries
            .iter()
            .filter(|d| !changes.touches(d.from, d.to))
            .filter_map(|d| {
                let from = changes.map_pos(d.from, Assoc::After);
                let to = changes.map_pos(d.to, Assoc::Before);
                (from < to).then_some(Decoration::new(from, to, d.replacement))
            })
            .collect();

        Self { entries: mapped }
    }

    /// Index range of entries overlapping `[from, to)`.
    fn overlap_bounds(&self, from: usize, to: usize) -> (usize, usize) {
        // Entries are disjoint and sorted, so `to` is sorted too
        let start = self.entries.partition_point(|d| d.to <= from);
        let end = start + self.entries[start..].partition_point(|d| d.from < to);
        (start, end)
    }

    fn retain_into(
        &self,
        kept: &mut Vec<Decoration>,
        bounds: Range<usize>,
        mut remove: impl FnMut(usize, usize) -> bool,
    ) {
        let (start, end) = if bounds.start < bounds.end {
            self.overlap_bounds(bounds.start, bounds.end)
        } else {
            (self.entries.len(), self.entries.len())
        };

        kept.extend_from_slice(&self.entries[..start]);
        kept.extend(
            self.entries[start..end]
                .iter()
                .filter(|d| !(d.overlaps(bounds.start, bounds.end) && remove(d.from, d.to)))
                .copied(),
        );
        kept.extend_from_slice(&self.entries[end..]);
    }

    fn reuse_or(&self, entries: Vec<Decoration>) -> Self {
        if *self.entries == *entries {
            self.clone()
        } else {
            Self {
                entries: entries.into(),
            }
        }
    }
}

impl PartialEq for DecorationSet {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn check_sorted(entries: &[Decoration]) -> Result<(), DecorationError> {
    let mut prev: Option<&Decoration> = None;
    for d in entries {
        if d.from >= d.to {
            return Err(DecorationError::Empty {
                from: d.from,
                to: d.to,
            });
        }
        if let Some(p) = prev
            && d.from < p.to
        {
            return Err(DecorationError::Unsorted {
                from: d.from,
                to: d.to,
                prev_from: p.from,
                prev_to: p.to,
            });
        }
        prev = Some(d);
    }
    Ok(())
}

fn overlap(added: &Decoration, existing: &Decoration) -> DecorationError {
    DecorationError::Overlap {
        from: added.from,
        to: added.to,
        existing_from: existing.from,
        existing_to: existing.to,
    }
}
