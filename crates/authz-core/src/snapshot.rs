//! Atomic publication of ruleset snapshots.
//!
//! Readers take an `Arc` to the current pipeline and keep it for as long
//! as they need. Publishing replaces the pointer; a snapshot already handed
//! out is never modified, so in-flight classifications finish on the rules
//! they started with.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::pipeline::ClassificationPipeline;

#[derive(Debug, Clone)]
pub struct RulesetHandle {
    current: Arc<RwLock<Arc<ClassificationPipeline>>>,
}

impl RulesetHandle {
    pub fn new(pipeline: ClassificationPipeline) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(pipeline))),
        }
    }

    /// The snapshot in effect right now.
    pub fn current(&self) -> Arc<ClassificationPipeline> {
        // The guarded value is a plain pointer swap, so a poisoned lock
        // still holds a complete snapshot.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the snapshot and return the previous one.
    pub fn publish(&self, pipeline: ClassificationPipeline) -> Arc<ClassificationPipeline> {
        let next = Arc::new(pipeline);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, Arc::clone(&next));
        drop(guard);
        info!(
            ruleset = %next.ruleset().name,
            fingerprint = %next.fingerprint(),
            previous = %previous.fingerprint(),
            "ruleset snapshot published"
        );
        previous
    }
}
