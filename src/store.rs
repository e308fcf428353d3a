//! Persistence of completed run summaries.

use std::collections::BTreeMap;

use crate::sim::summary::RunSummary;

/// Identifier assigned to a stored run.
pub type RunId = u64;

/// Storage backend for completed run summaries.
pub trait RunStore {
    /// Stores a summary and returns its assigned id.
    fn save(&mut self, summary: RunSummary) -> RunId;

    /// Looks up a stored summary by id.
    fn get(&self, id: RunId) -> Option<&RunSummary>;

    /// Returns all stored runs, ordered by id.
    fn all(&self) -> Vec<(RunId, &RunSummary)>;
}

/// In-memory store, suitable for a single process lifetime.
#[derive(Debug, Default)]
pub struct InMemoryRunStore {
    runs: BTreeMap<RunId, RunSummary>,
    next_id: RunId,
}

impl InMemoryRunStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunStore for InMemoryRunStore {
    fn save(&mut self, summary: RunSummary) -> RunId {
        self.next_id += 1;
        let id = self.next_id;
        self.runs.insert(id, summary);
        id
    }

    fn get(&self, id: RunId) -> Option<&RunSummary> {
        self.runs.get(&id)
    }

    fn all(&self) -> Vec<(RunId, &RunSummary)> {
        self.runs.iter().map(|(id, run)| (*id, run)).collect()
    }
}
