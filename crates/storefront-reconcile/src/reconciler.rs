//! Stateful reconciler holding the committed baseline.

use storefront_core::SectionDescriptor;
use tracing::debug;

use crate::change::{ChangeSummary, ReconciliationResult};
use crate::diff::diff;
use crate::error::Result;
use crate::snapshot::Snapshot;

/// Diffs each new section set against the previously committed one.
///
/// The baseline starts empty and is replaced in full by every successful
/// [`reconcile`](Self::reconcile). A rejected input leaves it untouched.
/// Mutation requires `&mut self`, so calls are serialized by construction; a
/// multi-threaded host wraps the reconciler in its own lock.
#[derive(Debug, Clone, Default)]
pub struct SnapshotReconciler {
    current: Snapshot,
    generation: u64,
}

impl SnapshotReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed baseline.
    #[inline]
    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    /// Number of committed reconciliations since construction or reset.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Diff `new_sections` against the baseline and commit them.
    pub fn reconcile(&mut self, new_sections: &[SectionDescriptor]) -> Result<ReconciliationResult> {
        let _span = tracing::debug_span!(
            "reconcile",
            generation = self.generation,
            sections = new_sections.len()
        )
        .entered();

        let next = Snapshot::from_sections(new_sections).inspect_err(|error| {
            debug!(%error, "Rejected section set, baseline unchanged");
        })?;
        Ok(self.commit(next))
    }

    /// Same as [`reconcile`](Self::reconcile) for a snapshot built elsewhere.
    ///
    /// The identities are checked again before anything is committed.
    pub fn reconcile_snapshot(&mut self, next: Snapshot) -> Result<ReconciliationResult> {
        let _span = tracing::debug_span!(
            "reconcile_snapshot",
            generation = self.generation,
            sections = next.section_count()
        )
        .entered();

        let next = Snapshot::checked(next.into_sections()).inspect_err(|error| {
            debug!(%error, "Rejected snapshot, baseline unchanged");
        })?;
        Ok(self.commit(next))
    }

    /// Drop the baseline back to empty without producing changes.
    pub fn reset(&mut self) {
        self.current = Snapshot::empty();
        self.generation = 0;
    }

    fn commit(&mut self, next: Snapshot) -> ReconciliationResult {
        let changes = diff(&self.current, &next);
        let summary = ChangeSummary::of(&changes);
        debug!(
            sections_removed = summary.sections_removed,
            sections_inserted = summary.sections_inserted,
            items_removed = summary.items_removed,
            items_inserted = summary.items_inserted,
            items_moved = summary.items_moved,
            "Reconciled snapshot"
        );

        self.current = next.clone();
        self.generation = self.generation.wrapping_add(1);
        ReconciliationResult {
            changes,
            snapshot: next,
        }
    }
}
