use xi_rope::delta::DeltaElement;
use xi_rope::{Delta, RopeInfo};

use super::{ChangeSet, ChangedRange};

impl ChangeSet {
    /// Derives the changed ranges described by an xi-rope delta.
    ///
    /// Gaps between `Copy` elements are deletions and `Insert` elements are
    /// insertions; a deletion immediately followed by an insertion fuses into
    /// a single replacement range.
    pub fn from_delta(delta: &Delta<RopeInfo>) -> Self {
        let mut ranges = Vec::new();
        // Position in the old and new document respectively
        let mut a = 0;
        let mut b = 0;
        // Start (in A and B) of an insertion run not yet flushed
        let mut pending: Option<(usize, usize)> = None;

        for el in &delta.els {
            match el {
                DeltaElement::Copy(from, to) => {
                    if *from > a || pending.is_some() {
                        let (from_a, from_b) = pending.take().unwrap_or((a, b));
                        ranges.push(ChangedRange::new(from_a, *from, from_b, b));
                    }
                    b += to - from;
                    a = *to;
                }
                DeltaElement::Insert(inserted) => {
                    pending.get_or_insert((a, b));
                    b += inserted.len();
                }
            }
        }

        if a < delta.base_len || pending.is_some() {
            let (from_a, from_b) = pending.unwrap_or((a, b));
            ranges.push(ChangedRange::new(from_a, delta.base_len, from_b, b));
        }

        Self { ranges }
    }
}
