//! Keyed ordered diff between two snapshots.
//!
//! Sections and items are matched by identity. Among the matches, a longest
//! increasing subsequence of old positions (taken in new order) picks the
//! elements that keep their relative order; with unique keys this is the same
//! alignment a longest-common-subsequence pass would produce.
//!
//! # Classification
//!
//! - A section outside the section LIS is reported as removed and inserted.
//! - An item whose section is retained and that is found in the old copy of
//!   that section stays put when it is in the item LIS and is moved otherwise.
//! - An item found in a different old section (or whose section was
//!   re-inserted) is a cross-section move. This only applies to identities
//!   that occur exactly once in both snapshots; anything else is an insertion.
//! - Old items of retained sections that nothing claims are removed. Items of
//!   removed sections go away with their section.
//!
//! # Emission order
//!
//! Section removals (descending), section insertions (ascending), then for
//! each new section in order: item removals (descending old index), item
//! insertions (ascending), item moves (ascending target index).

use rustc_hash::{FxHashMap, FxHashSet};
use storefront_core::{ItemId, SectionKind};

use crate::change::{Change, ItemPath};
use crate::snapshot::{Snapshot, SnapshotSection};

/// Indices into `seq` of one longest strictly increasing subsequence.
///
/// Patience sorting with predecessor links, O(n log n). Ties resolve towards
/// the earliest-ending candidate so the result is deterministic.
pub fn longest_increasing_subsequence(seq: &[usize]) -> Vec<usize> {
    if seq.is_empty() {
        return Vec::new();
    }

    // tails[k] = index into seq of the smallest tail of an increasing run of length k+1.
    let mut tails: Vec<usize> = Vec::with_capacity(seq.len());
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];

    for (i, &value) in seq.iter().enumerate() {
        let pos = tails.partition_point(|&t| seq[t] < value);
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }

    let mut out = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        out.push(i);
        cursor = prev[i];
    }
    out.reverse();
    out
}

/// Where a new item comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    /// Same retained section, old item index.
    Same(usize),
    /// Another old position.
    Moved(ItemPath),
    Inserted,
}

/// Section alignment: for each new section, the matched old index if it was
/// kept in place.
struct SectionAlignment {
    new_to_old: Vec<Option<usize>>,
    old_kept: Vec<bool>,
}

fn align_sections(old: &[SnapshotSection], new: &[SnapshotSection]) -> SectionAlignment {
    let old_index: FxHashMap<&SectionKind, usize> = old
        .iter()
        .enumerate()
        .map(|(i, s)| (&s.kind, i))
        .collect();

    let matched: Vec<Option<usize>> = new
        .iter()
        .map(|s| old_index.get(&s.kind).copied())
        .collect();

    let (positions, olds): (Vec<usize>, Vec<usize>) = matched
        .iter()
        .enumerate()
        .filter_map(|(new_i, m)| m.map(|old_i| (new_i, old_i)))
        .unzip();

    let mut new_to_old = vec![None; new.len()];
    let mut old_kept = vec![false; old.len()];
    for k in longest_increasing_subsequence(&olds) {
        new_to_old[positions[k]] = Some(olds[k]);
        old_kept[olds[k]] = true;
    }

    SectionAlignment {
        new_to_old,
        old_kept,
    }
}

fn count_occurrences(sections: &[SnapshotSection]) -> FxHashMap<ItemId, usize> {
    let mut counts: FxHashMap<ItemId, usize> = FxHashMap::default();
    for section in sections {
        for &id in &section.items {
            *counts.entry(id).or_default() += 1;
        }
    }
    counts
}

/// Compute the ordered change list that turns `old` into `new`.
pub fn diff(old: &Snapshot, new: &Snapshot) -> Vec<Change> {
    let old_sections = old.sections();
    let new_sections = new.sections();
    let alignment = align_sections(old_sections, new_sections);

    let mut changes = Vec::new();

    for index in (0..old_sections.len()).rev() {
        if !alignment.old_kept[index] {
            changes.push(Change::SectionRemoved { index });
        }
    }
    for (index, matched) in alignment.new_to_old.iter().enumerate() {
        if matched.is_none() {
            changes.push(Change::SectionInserted {
                index,
                section: new_sections[index].kind.clone(),
            });
        }
    }

    // Cross-section matching is limited to identities unique on both sides.
    let old_counts = count_occurrences(old_sections);
    let new_counts = count_occurrences(new_sections);
    let mut old_location: FxHashMap<ItemId, ItemPath> = FxHashMap::default();
    for (s, section) in old_sections.iter().enumerate() {
        for (i, &id) in section.items.iter().enumerate() {
            if old_counts.get(&id) == Some(&1) && new_counts.get(&id) == Some(&1) {
                old_location.insert(id, ItemPath::new(s, i));
            }
        }
    }

    let sources: Vec<Vec<Source>> = new_sections
        .iter()
        .zip(&alignment.new_to_old)
        .map(|(section, matched)| {
            let same: FxHashMap<ItemId, usize> = match matched {
                Some(old_s) => old_sections[*old_s]
                    .items
                    .iter()
                    .enumerate()
                    .map(|(i, &id)| (id, i))
                    .collect(),
                None => FxHashMap::default(),
            };
            section
                .items
                .iter()
                .map(|id| {
                    if let Some(&i) = same.get(id) {
                        Source::Same(i)
                    } else if let Some(&path) = old_location.get(id) {
                        Source::Moved(path)
                    } else {
                        Source::Inserted
                    }
                })
                .collect()
        })
        .collect();

    let mut claimed: FxHashSet<ItemPath> = FxHashSet::default();
    for (section_sources, matched) in sources.iter().zip(&alignment.new_to_old) {
        for source in section_sources {
            match (source, matched) {
                (Source::Same(i), Some(old_s)) => {
                    claimed.insert(ItemPath::new(*old_s, *i));
                }
                (Source::Moved(path), _) => {
                    claimed.insert(*path);
                }
                _ => {}
            }
        }
    }

    for (new_s, (section, section_sources)) in new_sections.iter().zip(&sources).enumerate() {
        let matched = alignment.new_to_old[new_s];

        if let Some(old_s) = matched {
            let old_items = &old_sections[old_s].items;
            for (i, &id) in old_items.iter().enumerate().rev() {
                let at = ItemPath::new(old_s, i);
                if !claimed.contains(&at) {
                    changes.push(Change::ItemRemoved { at, id });
                }
            }
        }

        for (j, (&id, source)) in section.items.iter().zip(section_sources).enumerate() {
            if *source == Source::Inserted {
                changes.push(Change::ItemInserted {
                    at: ItemPath::new(new_s, j),
                    id,
                });
            }
        }

        // Same-section matches outside the LIS are moves.
        let (same_positions, same_olds): (Vec<usize>, Vec<usize>) = section_sources
            .iter()
            .enumerate()
            .filter_map(|(j, source)| match source {
                Source::Same(i) => Some((j, *i)),
                _ => None,
            })
            .unzip();
        let mut stays = vec![false; section.items.len()];
        for k in longest_increasing_subsequence(&same_olds) {
            stays[same_positions[k]] = true;
        }

        for (j, (&id, source)) in section.items.iter().zip(section_sources).enumerate() {
            let from = match (source, matched) {
                (Source::Same(i), Some(old_s)) if !stays[j] => ItemPath::new(old_s, *i),
                (Source::Moved(path), _) => *path,
                _ => continue,
            };
            changes.push(Change::ItemMoved {
                from,
                to: ItemPath::new(new_s, j),
                id,
            });
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(parts: &[(&str, &[u64])]) -> Snapshot {
        Snapshot::from_parts(parts.iter().map(|(title, ids)| {
            (
                SectionKind::Standard((*title).to_string()),
                ids.iter().map(|&id| ItemId::app(id)).collect(),
            )
        }))
        .expect("valid snapshot")
    }

    fn lis_values(seq: &[usize]) -> Vec<usize> {
        longest_increasing_subsequence(seq)
            .into_iter()
            .map(|i| seq[i])
            .collect()
    }

    #[test]
    fn lis_basics() {
        assert!(longest_increasing_subsequence(&[]).is_empty());
        assert_eq!(lis_values(&[0, 1, 2, 3]), vec![0, 1, 2, 3]);
        assert_eq!(lis_values(&[3, 2, 1, 0]).len(), 1);
        assert_eq!(lis_values(&[2, 0, 1, 3]), vec![0, 1, 3]);
        assert_eq!(lis_values(&[1, 4, 2, 3, 0]), vec![1, 2, 3]);
    }

    #[test]
    fn identical_snapshots_produce_no_changes() {
        let a = snap(&[("A", &[1, 2, 3]), ("B", &[4, 5])]);
        assert!(diff(&a, &a).is_empty());
    }

    #[test]
    fn insertion_shift_is_not_a_move() {
        let old = snap(&[("A", &[1, 2, 3])]);
        let new = snap(&[("A", &[0, 1, 2, 3])]);
        assert_eq!(
            diff(&old, &new),
            vec![Change::ItemInserted {
                at: ItemPath::new(0, 0),
                id: ItemId::app(0),
            }]
        );
    }

    #[test]
    fn reorder_within_section_is_a_move() {
        let old = snap(&[("A", &[1, 2, 3])]);
        let new = snap(&[("A", &[3, 1, 2])]);
        assert_eq!(
            diff(&old, &new),
            vec![Change::ItemMoved {
                from: ItemPath::new(0, 2),
                to: ItemPath::new(0, 0),
                id: ItemId::app(3),
            }]
        );
    }

    #[test]
    fn cross_section_move() {
        let old = snap(&[("A", &[1, 2]), ("B", &[3])]);
        let new = snap(&[("A", &[1]), ("B", &[2, 3])]);
        assert_eq!(
            diff(&old, &new),
            vec![Change::ItemMoved {
                from: ItemPath::new(0, 1),
                to: ItemPath::new(1, 0),
                id: ItemId::app(2),
            }]
        );
    }

    #[test]
    fn shared_identity_falls_back_to_remove_and_insert() {
        // app#1 appears twice in the new snapshot, so it cannot be tracked
        // across sections.
        let old = snap(&[("A", &[1]), ("B", &[])]);
        let new = snap(&[("A", &[]), ("B", &[1]), ("C", &[1])]);
        assert_eq!(
            diff(&old, &new),
            vec![
                Change::SectionInserted {
                    index: 2,
                    section: SectionKind::Standard("C".into()),
                },
                Change::ItemRemoved {
                    at: ItemPath::new(0, 0),
                    id: ItemId::app(1),
                },
                Change::ItemInserted {
                    at: ItemPath::new(1, 0),
                    id: ItemId::app(1),
                },
                Change::ItemInserted {
                    at: ItemPath::new(2, 0),
                    id: ItemId::app(1),
                },
            ]
        );
    }

    #[test]
    fn section_swap_reinserts_one_section() {
        let old = snap(&[("A", &[1]), ("B", &[2])]);
        let new = snap(&[("B", &[2]), ("A", &[1])]);
        let changes = diff(&old, &new);
        assert_eq!(
            changes,
            vec![
                Change::SectionRemoved { index: 1 },
                Change::SectionInserted {
                    index: 0,
                    section: SectionKind::Standard("B".into()),
                },
                Change::ItemMoved {
                    from: ItemPath::new(1, 0),
                    to: ItemPath::new(0, 0),
                    id: ItemId::app(2),
                },
            ]
        );
    }

    #[test]
    fn removals_are_descending_and_emitted_before_insertions() {
        let old = snap(&[("A", &[1, 2, 3, 4])]);
        let new = snap(&[("A", &[2, 5, 4])]);
        assert_eq!(
            diff(&old, &new),
            vec![
                Change::ItemRemoved {
                    at: ItemPath::new(0, 2),
                    id: ItemId::app(3),
                },
                Change::ItemRemoved {
                    at: ItemPath::new(0, 0),
                    id: ItemId::app(1),
                },
                Change::ItemInserted {
                    at: ItemPath::new(0, 1),
                    id: ItemId::app(5),
                },
            ]
        );
    }

    #[test]
    fn removed_section_items_vanish_with_it() {
        let old = snap(&[("A", &[1, 2]), ("B", &[3])]);
        let new = snap(&[("B", &[3])]);
        assert_eq!(diff(&old, &new), vec![Change::SectionRemoved { index: 0 }]);
    }
}
