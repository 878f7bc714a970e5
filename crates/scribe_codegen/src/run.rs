use std::collections::HashSet;

use log::trace;
use scribe_model::QualifiedName;

use crate::resolver::ExternalAdapterBinding;

// -----------------------------------------------------------------------------
// GenerationRun

/// The accumulator owned by one generation run.
///
/// Holds the processed set of adapter qualified names already inspected and
/// the ordered collection of bindings produced so far. Creating a fresh
/// `GenerationRun` per pass is what isolates runs from each other: there is
/// no process-wide state, so stale entries from an earlier registry
/// generation can never suppress resolution in a later one.
///
/// Single-writer access is assumed throughout; the resolver is a
/// single-threaded, depth-first traversal.
#[derive(Debug, Default)]
pub struct GenerationRun {
    processed: HashSet<QualifiedName>,
    bindings: Vec<ExternalAdapterBinding>,
}

impl GenerationRun {
    /// A fresh run with empty state.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to mark an adapter name as processed.
    ///
    /// - Returns `true` if the name was not yet processed and is now marked.
    /// - Returns `false` if the name was already processed, leaving the run
    ///   unchanged.
    ///
    /// Callers must check this *before* doing any constructor inspection,
    /// not merely before recording results; marking happens up front so
    /// mutually-referential type graphs terminate.
    pub fn mark_processed(&mut self, adapter: &QualifiedName) -> bool {
        let first = self.processed.insert(adapter.clone());
        if !first {
            trace!("adapter `{adapter}` already processed in this run");
        }
        first
    }

    /// Whether an adapter name has been processed in this run.
    #[inline]
    pub fn is_processed(&self, adapter: &QualifiedName) -> bool {
        self.processed.contains(adapter)
    }

    /// Records a resolved binding.
    #[inline]
    pub(crate) fn push_binding(&mut self, binding: ExternalAdapterBinding) {
        self.bindings.push(binding);
    }

    /// The bindings accumulated so far, in resolution order.
    #[inline]
    pub fn bindings(&self) -> &[ExternalAdapterBinding] {
        &self.bindings
    }

    /// Consumes the run, yielding the accumulated bindings.
    #[inline]
    pub fn into_bindings(self) -> Vec<ExternalAdapterBinding> {
        self.bindings
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_processed_is_first_caller_wins() {
        let adapter = QualifiedName::parse("media.ClipAdapter").unwrap();
        let mut run = GenerationRun::new();

        assert!(!run.is_processed(&adapter));
        assert!(run.mark_processed(&adapter));
        assert!(!run.mark_processed(&adapter));
        assert!(run.is_processed(&adapter));
    }

    #[test]
    fn runs_are_isolated() {
        let adapter = QualifiedName::parse("media.ClipAdapter").unwrap();

        let mut first = GenerationRun::new();
        assert!(first.mark_processed(&adapter));

        // A later run starts clean regardless of what earlier runs saw.
        let mut second = GenerationRun::new();
        assert!(second.mark_processed(&adapter));
    }
}
