//! Validated identity snapshots.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use storefront_core::{ItemId, SectionDescriptor, SectionKind};

use crate::error::{ReconcileError, Result};

/// Identities of one section and its items, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotSection {
    pub kind: SectionKind,
    pub items: Vec<ItemId>,
}

/// Full ordered description of sections and items at one point in time.
///
/// Section identities are unique, and item identities are unique within each
/// section. An item identity may appear in more than one section. Every
/// constructor, deserialization included, checks this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "UncheckedSnapshot")]
pub struct Snapshot {
    sections: Vec<SnapshotSection>,
}

/// Wire form of [`Snapshot`] before validation.
#[derive(Deserialize)]
struct UncheckedSnapshot {
    sections: Vec<SnapshotSection>,
}

impl TryFrom<UncheckedSnapshot> for Snapshot {
    type Error = ReconcileError;

    fn try_from(raw: UncheckedSnapshot) -> Result<Self> {
        Self::checked(raw.sections)
    }
}

impl Snapshot {
    /// The empty snapshot.
    pub const fn empty() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Capture and validate the identities of `sections`.
    pub fn from_sections(sections: &[SectionDescriptor]) -> Result<Self> {
        Self::from_parts(
            sections
                .iter()
                .map(|section| (section.kind().clone(), section.item_ids().collect())),
        )
    }

    /// Build from raw `(section, items)` pairs, validating uniqueness.
    pub fn from_parts<I>(parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (SectionKind, Vec<ItemId>)>,
    {
        Self::checked(
            parts
                .into_iter()
                .map(|(kind, items)| SnapshotSection { kind, items })
                .collect(),
        )
    }

    pub(crate) fn checked(sections: Vec<SnapshotSection>) -> Result<Self> {
        validate(&sections)?;
        Ok(Self { sections })
    }

    #[inline]
    pub fn sections(&self) -> &[SnapshotSection] {
        &self.sections
    }

    pub(crate) fn into_sections(self) -> Vec<SnapshotSection> {
        self.sections
    }

    #[inline]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Total items across all sections.
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Position of a section identity.
    pub fn section_index(&self, kind: &SectionKind) -> Option<usize> {
        self.sections.iter().position(|s| &s.kind == kind)
    }

    /// Items of a section, if present.
    pub fn items_of(&self, kind: &SectionKind) -> Option<&[ItemId]> {
        self.sections
            .iter()
            .find(|s| &s.kind == kind)
            .map(|s| s.items.as_slice())
    }
}

fn validate(sections: &[SnapshotSection]) -> Result<()> {
    let mut seen_sections: FxHashMap<&SectionKind, usize> = FxHashMap::default();
    for (index, section) in sections.iter().enumerate() {
        if let Some(&first) = seen_sections.get(&section.kind) {
            return Err(ReconcileError::DuplicateSection {
                section: section.kind.clone(),
                first,
                second: index,
            });
        }
        seen_sections.insert(&section.kind, index);

        let mut seen_items: FxHashMap<ItemId, usize> = FxHashMap::default();
        for (position, &item) in section.items.iter().enumerate() {
            if let Some(&first) = seen_items.get(&item) {
                return Err(ReconcileError::DuplicateItem {
                    section: section.kind.clone(),
                    item,
                    first,
                    second: position,
                });
            }
            seen_items.insert(item, position);
        }
    }
    Ok(())
}
