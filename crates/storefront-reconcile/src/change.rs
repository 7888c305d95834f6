//! Structural changes between two snapshots, and their replay.
//!
//! Coordinates follow batch-update rules: removals and move sources are
//! positions in the old snapshot, insertions and move targets are positions in
//! the new snapshot. A host applying a change list performs every removal
//! first, then every insertion, exactly as [`ReconciliationResult::replay`]
//! does.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use storefront_core::{ItemId, SectionKind};

use crate::error::{ReconcileError, Result};
use crate::snapshot::{Snapshot, SnapshotSection};

/// Position of an item: section index, then item index within the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemPath {
    pub section: usize,
    pub index: usize,
}

impl ItemPath {
    #[inline]
    pub const fn new(section: usize, index: usize) -> Self {
        Self { section, index }
    }
}

/// One structural operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Change {
    SectionRemoved {
        index: usize,
    },
    SectionInserted {
        index: usize,
        section: SectionKind,
    },
    ItemRemoved {
        at: ItemPath,
        id: ItemId,
    },
    ItemInserted {
        at: ItemPath,
        id: ItemId,
    },
    ItemMoved {
        from: ItemPath,
        to: ItemPath,
        id: ItemId,
    },
}

/// Counts per change kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub sections_removed: usize,
    pub sections_inserted: usize,
    pub items_removed: usize,
    pub items_inserted: usize,
    pub items_moved: usize,
}

impl ChangeSummary {
    pub fn of(changes: &[Change]) -> Self {
        let mut summary = Self::default();
        for change in changes {
            match change {
                Change::SectionRemoved { .. } => summary.sections_removed += 1,
                Change::SectionInserted { .. } => summary.sections_inserted += 1,
                Change::ItemRemoved { .. } => summary.items_removed += 1,
                Change::ItemInserted { .. } => summary.items_inserted += 1,
                Change::ItemMoved { .. } => summary.items_moved += 1,
            }
        }
        summary
    }
}

/// Ordered changes plus the snapshot they lead to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub changes: Vec<Change>,
    pub snapshot: Snapshot,
}

impl ReconciliationResult {
    /// True when the new snapshot is identical to the previous one.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn summary(&self) -> ChangeSummary {
        ChangeSummary::of(&self.changes)
    }

    /// Apply the changes to `previous`, producing the snapshot a host would
    /// display after applying them.
    pub fn replay(&self, previous: &Snapshot) -> Result<Snapshot> {
        replay(previous, &self.changes)
    }
}

/// Apply `changes` to `previous` with batch-update semantics.
///
/// The result is validated like any other snapshot, so a change list that
/// leads to a repeated identity fails with the matching duplicate error.
pub fn replay(previous: &Snapshot, changes: &[Change]) -> Result<Snapshot> {
    let old = previous.sections();

    let mut removed_sections: FxHashSet<usize> = FxHashSet::default();
    let mut vacated: FxHashSet<ItemPath> = FxHashSet::default();
    let mut inserted_sections: Vec<(usize, &SectionKind)> = Vec::new();
    let mut arrivals: BTreeMap<usize, Vec<(usize, ItemId)>> = BTreeMap::new();

    for change in changes {
        match change {
            Change::SectionRemoved { index } => {
                if *index >= old.len() {
                    return Err(ReconcileError::replay(format!(
                        "section removal at {index} but only {} sections",
                        old.len()
                    )));
                }
                removed_sections.insert(*index);
            }
            Change::SectionInserted { index, section } => {
                inserted_sections.push((*index, section));
            }
            Change::ItemRemoved { at, id } => {
                check_source(old, *at, *id)?;
                vacated.insert(*at);
            }
            Change::ItemInserted { at, id } => {
                arrivals.entry(at.section).or_default().push((at.index, *id));
            }
            Change::ItemMoved { from, to, id } => {
                check_source(old, *from, *id)?;
                vacated.insert(*from);
                arrivals.entry(to.section).or_default().push((to.index, *id));
            }
        }
    }

    let mut sections: Vec<SnapshotSection> = old
        .iter()
        .enumerate()
        .filter(|(index, _)| !removed_sections.contains(index))
        .map(|(section_index, section)| SnapshotSection {
            kind: section.kind.clone(),
            items: section
                .items
                .iter()
                .enumerate()
                .filter(|(index, _)| !vacated.contains(&ItemPath::new(section_index, *index)))
                .map(|(_, id)| *id)
                .collect(),
        })
        .collect();

    inserted_sections.sort_by_key(|(index, _)| *index);
    for (index, kind) in inserted_sections {
        if index > sections.len() {
            return Err(ReconcileError::replay(format!(
                "section insertion at {index} past end {}",
                sections.len()
            )));
        }
        sections.insert(
            index,
            SnapshotSection {
                kind: kind.clone(),
                items: Vec::new(),
            },
        );
    }

    for (section_index, mut items) in arrivals {
        let Some(section) = sections.get_mut(section_index) else {
            return Err(ReconcileError::replay(format!(
                "item insertion into missing section {section_index}"
            )));
        };
        items.sort_by_key(|(index, _)| *index);
        for (index, id) in items {
            if index > section.items.len() {
                return Err(ReconcileError::replay(format!(
                    "item insertion at {section_index}.{index} past end {}",
                    section.items.len()
                )));
            }
            section.items.insert(index, id);
        }
    }

    Snapshot::checked(sections)
}

fn check_source(old: &[SnapshotSection], at: ItemPath, id: ItemId) -> Result<()> {
    match old.get(at.section).and_then(|s| s.items.get(at.index)) {
        Some(found) if *found == id => Ok(()),
        Some(found) => Err(ReconcileError::replay(format!(
            "expected {id} at {}.{}, found {found}",
            at.section, at.index
        ))),
        None => Err(ReconcileError::replay(format!(
            "no item at {}.{}",
            at.section, at.index
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard(title: &str) -> SectionKind {
        SectionKind::Standard(title.into())
    }

    #[test]
    fn replay_of_nothing_is_identity() {
        let snapshot =
            Snapshot::from_parts([(standard("A"), vec![ItemId::app(1), ItemId::app(2)])])
                .expect("valid");
        assert_eq!(replay(&snapshot, &[]).expect("replay"), snapshot);
    }

    #[test]
    fn replay_applies_removals_before_insertions() {
        let old = Snapshot::from_parts([(
            standard("A"),
            vec![ItemId::app(1), ItemId::app(2), ItemId::app(3)],
        )])
        .expect("valid");
        let changes = [
            Change::ItemRemoved {
                at: ItemPath::new(0, 0),
                id: ItemId::app(1),
            },
            Change::ItemInserted {
                at: ItemPath::new(0, 2),
                id: ItemId::app(4),
            },
        ];
        let expected = Snapshot::from_parts([(
            standard("A"),
            vec![ItemId::app(2), ItemId::app(3), ItemId::app(4)],
        )])
        .expect("valid");
        assert_eq!(replay(&old, &changes).expect("replay"), expected);
    }

    #[test]
    fn replay_rejects_mismatched_source() {
        let old = Snapshot::from_parts([(standard("A"), vec![ItemId::app(1)])]).expect("valid");
        let changes = [Change::ItemRemoved {
            at: ItemPath::new(0, 0),
            id: ItemId::app(9),
        }];
        assert!(matches!(
            replay(&old, &changes),
            Err(ReconcileError::Replay { .. })
        ));
    }

    #[test]
    fn replay_rejects_out_of_range_insertion() {
        let changes = [Change::SectionInserted {
            index: 3,
            section: SectionKind::Promoted,
        }];
        assert!(replay(&Snapshot::empty(), &changes).is_err());
    }

    #[test]
    fn replay_rejects_repeated_item() {
        let old = Snapshot::from_parts([(standard("X"), vec![ItemId::app(1)])]).expect("valid");
        let changes = [Change::ItemInserted {
            at: ItemPath::new(0, 1),
            id: ItemId::app(1),
        }];
        assert_eq!(
            replay(&old, &changes),
            Err(ReconcileError::DuplicateItem {
                section: standard("X"),
                item: ItemId::app(1),
                first: 0,
                second: 1,
            })
        );
    }

    #[test]
    fn replay_rejects_repeated_section() {
        let old = Snapshot::from_parts([(SectionKind::Promoted, vec![])]).expect("valid");
        let changes = [Change::SectionInserted {
            index: 1,
            section: SectionKind::Promoted,
        }];
        assert!(matches!(
            replay(&old, &changes),
            Err(ReconcileError::DuplicateSection { .. })
        ));
    }

    #[test]
    fn summary_counts_each_kind() {
        let changes = vec![
            Change::SectionRemoved { index: 0 },
            Change::SectionInserted {
                index: 0,
                section: SectionKind::Promoted,
            },
            Change::ItemInserted {
                at: ItemPath::new(0, 0),
                id: ItemId::app(1),
            },
            Change::ItemInserted {
                at: ItemPath::new(0, 1),
                id: ItemId::app(2),
            },
        ];
        let summary = ChangeSummary::of(&changes);
        assert_eq!(summary.sections_removed, 1);
        assert_eq!(summary.sections_inserted, 1);
        assert_eq!(summary.items_inserted, 2);
        assert_eq!(summary.items_moved, 0);
    }

    #[test]
    fn changes_serialize_with_op_tag() {
        let change = Change::ItemMoved {
            from: ItemPath::new(0, 2),
            to: ItemPath::new(1, 0),
            id: ItemId::app(5),
        };
        let json = serde_json::to_value(&change).expect("serialize");
        assert_eq!(json["op"], "item_moved");
        assert_eq!(json["from"]["index"], 2);
        assert_eq!(json["id"]["tag"], "app");
    }
}
