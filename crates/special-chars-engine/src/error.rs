use thiserror::Error;

/// A malformed edit description.
///
/// The producer of an edit owes ordered, disjoint changed ranges. The engine
/// checks that contract up front instead of remapping positions through
/// garbage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeError {
    #[error("changed range {index} is inverted: [{from}, {to})")]
    Inverted { index: usize, from: usize, to: usize },

    #[error("changed range {index} starts before the end of the previous range")]
    OutOfOrder { index: usize },

    #[error("changed range {index} does not line up with the unchanged text before it")]
    Inconsistent { index: usize },
}

/// An insertion that would break the ordering invariants of a decoration set.
///
/// These are engine defects, not runtime conditions: reconciliation removes
/// every entry it replaces before inserting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecorationError {
    #[error("decoration [{from}, {to}) is empty")]
    Empty { from: usize, to: usize },

    #[error("decoration [{from}, {to}) is not sorted after [{prev_from}, {prev_to})")]
    Unsorted {
        from: usize,
        to: usize,
        prev_from: usize,
        prev_to: usize,
    },

    #[error("decoration [{from}, {to}) overlaps existing [{existing_from}, {existing_to})")]
    Overlap {
        from: usize,
        to: usize,
        existing_from: usize,
        existing_to: usize,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid special character pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid edit description: {0}")]
    Changes(#[from] ChangeError),

    #[error("Decoration set corrupted: {0}")]
    Decorations(#[from] DecorationError),
}
