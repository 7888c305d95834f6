#![forbid(unsafe_code)]

//! Snapshot reconciliation for storefront sections.
//!
//! # Role
//! A host pushes the full ordered section set whenever its data changes.
//! [`SnapshotReconciler`] compares it with the previously committed set and
//! returns the structural [`Change`]s needed to get from one to the other,
//! then commits the new set as the baseline for the next call.
//!
//! # Pieces
//! - [`Snapshot`]: validated identities (unique sections, unique items per
//!   section).
//! - [`diff()`]: the pure keyed diff between two snapshots.
//! - [`replay()`]: applies a change list to a snapshot, the way a host applies
//!   it to its rendering surface.
//! - [`SnapshotReconciler`]: owns the baseline.

pub mod change;
pub mod diff;
pub mod error;
pub mod reconciler;
pub mod snapshot;

pub use change::{Change, ChangeSummary, ItemPath, ReconciliationResult, replay};
pub use diff::{diff, longest_increasing_subsequence};
pub use error::{ReconcileError, Result};
pub use reconciler::SnapshotReconciler;
pub use snapshot::{Snapshot, SnapshotSection};
