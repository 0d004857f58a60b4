//! Available-domain accumulator owned by the sweep orchestrator

use parking_lot::Mutex;

use crate::types::ProbeResult;

/// Domains judged available, in arrival order until [`finalize`](Self::finalize).
///
/// Appends are serialized through an internal lock, so a `&ResultSet` can be
/// shared between concurrent writers.
#[derive(Debug, Default)]
pub struct ResultSet {
    available: Mutex<Vec<String>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the candidate if the verdict is Available. Returns whether it was appended.
    pub fn record(&self, result: &ProbeResult) -> bool {
        if !result.is_available() {
            return false;
        }
        self.available.lock().push(result.candidate.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.available.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted, deduplicated list of available domains
    pub fn finalize(self) -> Vec<String> {
        let mut available = self.available.into_inner();
        available.sort_unstable();
        available.dedup();
        available
    }
}
