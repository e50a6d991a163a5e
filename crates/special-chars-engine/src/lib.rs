pub mod changes;
pub mod classify;
pub mod decorations;
pub mod document;
pub mod engine;
pub mod error;
pub mod options;
pub mod reconcile;
pub mod render;
pub mod shared;
pub mod viewport;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use changes::{Assoc, ChangeSet, ChangedRange};
pub use classify::{Classifier, Classify};
pub use decorations::{Decoration, DecorationSet, Replacement};
pub use document::{
    Chunk, Edit, Line, RopeDocument, TextSource, column_for, snap_to_line_breaks,
};
pub use engine::SpecialChars;
pub use error::{ChangeError, DecorationError, EngineError};
pub use options::{BASE_PATTERN, SpecialCharOptions, TabMode};
pub use render::{DefaultRender, RenderSpecialChar, Segment, Widget};
pub use shared::SharedSpecialChars;
pub use viewport::{Coverage, ViewportPlan};
