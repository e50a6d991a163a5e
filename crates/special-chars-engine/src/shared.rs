use std::ops::Range;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::changes::ChangeSet;
use crate::classify::{Classifier, Classify};
use crate::decorations::DecorationSet;
use crate::document::TextSource;
use crate::engine::SpecialChars;
use crate::error::EngineError;

/// An engine that can be shared between an editing thread and render
/// threads.
///
/// Updates are serialised by a single lock around the engine. Each update
/// publishes its snapshot separately, so readers never wait for a
/// classification in progress.
#[derive(Debug)]
pub struct SharedSpecialChars<C: Classify = Classifier> {
    engine: Mutex<SpecialChars<C>>,
    published: RwLock<DecorationSet>,
}

impl<C: Classify> SharedSpecialChars<C> {
    pub fn new(engine: SpecialChars<C>) -> Arc<Self> {
        let published = RwLock::new(engine.decorations().clone());
        Arc::new(Self {
            engine: Mutex::new(engine),
            published,
        })
    }

    pub fn update<D: TextSource>(
        &self,
        doc: &D,
        changes: &ChangeSet,
        window: Range<usize>,
    ) -> Result<DecorationSet, EngineError> {
        let mut engine = self.engine.lock();
        let snapshot = engine.update(doc, changes, window)?.clone();
        *self.published.write() = snapshot.clone();
        Ok(snapshot)
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> DecorationSet {
        self.published.read().clone()
    }
}
