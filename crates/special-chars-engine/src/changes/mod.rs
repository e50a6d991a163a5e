//! Edit descriptions.
//!
//! A [`ChangeSet`] lists the regions an edit replaced, in both the pre-edit
//! ("A") and post-edit ("B") coordinate spaces. Everything downstream of an
//! edit (decoration remapping, coverage remapping, re-scan spans) is derived
//! from it.

mod delta;

use crate::error::ChangeError;

/// One contiguous replacement: `[from_a, to_a)` of the old document became
/// `[from_b, to_b)` of the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedRange {
    pub from_a: usize,
    pub to_a: usize,
    pub from_b: usize,
    pub to_b: usize,
}

impl ChangedRange {
    pub fn new(from_a: usize, to_a: usize, from_b: usize, to_b: usize) -> Self {
        Self {
            from_a,
            to_a,
            from_b,
            to_b,
        }
    }

    /// Pure insertion of `len` bytes at `at`, as the first change of a set.
    pub fn insertion(at: usize, len: usize) -> Self {
        Self::new(at, at, at, at + len)
    }

    /// Pure deletion of `[from, to)`, as the first change of a set.
    pub fn deletion(from: usize, to: usize) -> Self {
        Self::new(from, to, from, from)
    }
}

/// Which side of an insertion a mapped position sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    /// Stay in front of text inserted exactly at the position.
    Before,
    /// Move past text inserted exactly at the position.
    After,
}

/// An ordered list of disjoint changed ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    ranges: Vec<ChangedRange>,
}

impl ChangeSet {
    /// The empty edit.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a change set, rejecting ranges that are inverted, overlap, come
    /// out of order, or disagree about the length of the unchanged text
    /// between them.
    pub fn new(ranges: Vec<ChangedRange>) -> Result<Self, ChangeError> {
        let mut prev_a = 0;
        let mut prev_b = 0;

        for (index, r) in ranges.iter().enumerate() {
            if r.from_a > r.to_a {
                return Err(ChangeError::Inverted {
                    index,
                    from: r.from_a,
                    to: r.to_a,
                });
            }
            if r.from_b > r.to_b {
                return Err(ChangeError::Inverted {
                    index,
                    from: r.from_b,
                    to: r.to_b,
                });
            }
            if r.from_a < prev_a || r.from_b < prev_b {
                return Err(ChangeError::OutOfOrder { index });
            }
            if r.from_a - prev_a != r.from_b - prev_b {
                return Err(ChangeError::Inconsistent { index });
            }
            prev_a = r.to_a;
            prev_b = r.to_b;
        }

        Ok(Self { ranges })
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangedRange> {
        self.ranges.iter()
    }

    pub fn ranges(&self) -> &[ChangedRange] {
        &self.ranges
    }

    /// Maps a pre-edit position into the post-edit document.
    ///
    /// Positions inside a replaced region collapse onto one of its edges:
    /// `Before` picks the start of the replacement, `After` its end. The end
    /// of a non-empty replaced region always maps to the end of the
    /// replacement, since the text after it survived.
    pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
        let mut mapped = pos;
        for r in &self.ranges {
            if pos < r.from_a {
                break;
            }
            if pos > r.to_a || (pos == r.to_a && r.from_a < r.to_a) {
                mapped = pos - r.to_a + r.to_b;
                continue;
            }
            return match assoc {
                Assoc::Before => r.from_b,
                Assoc::After => r.to_b,
            };
        }
        mapped
    }

    /// Whether the edit disturbs the interior of the pre-edit range
    /// `[from, to)`: it replaces any of its text, or inserts strictly inside
    /// it. Insertions exactly at either edge leave the range intact.
    pub fn touches(&self, from: usize, to: usize) -> bool {
        self.ranges.iter().take_while(|r| r.from_a <= to).any(|r| {
            if r.from_a == r.to_a {
                from < r.from_a && r.from_a < to
            } else {
                r.from_a < to && r.to_a > from
            }
        })
    }
}
