use storefront_core::{ItemId, SectionKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconcileError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("duplicate section identity {section} at positions {first} and {second}")]
    DuplicateSection {
        section: SectionKind,
        first: usize,
        second: usize,
    },

    #[error("duplicate item identity {item} in section {section} at positions {first} and {second}")]
    DuplicateItem {
        section: SectionKind,
        item: ItemId,
        first: usize,
        second: usize,
    },

    #[error("change cannot be replayed: {detail}")]
    Replay { detail: String },
}

impl ReconcileError {
    /// True for the input-contract violations that leave the reconciler untouched.
    #[must_use]
    pub fn is_duplicate_identity(&self) -> bool {
        matches!(
            self,
            Self::DuplicateSection { .. } | Self::DuplicateItem { .. }
        )
    }

    #[must_use]
    pub fn replay(detail: impl Into<String>) -> Self {
        Self::Replay {
            detail: detail.into(),
        }
    }
}
