use proptest::prelude::*;
use storefront_core::{AppRecord, CategoryRecord, Item, SectionDescriptor, SectionKind};
use storefront_reconcile::{Change, Snapshot, SnapshotReconciler, diff, replay};

/// Section sets with unique section kinds and unique items per section.
/// Ids come from a small pool so sections share items and moves happen.
fn screen() -> impl Strategy<Value = Vec<SectionDescriptor>> {
    let kinds = prop::sample::subsequence(
        vec![
            SectionKind::Promoted,
            SectionKind::Standard("Popular".into()),
            SectionKind::Standard("Essentials".into()),
            SectionKind::Standard("Paid".into()),
            SectionKind::Categories,
        ],
        0..=5,
    )
    .prop_shuffle();

    kinds.prop_flat_map(|kinds| {
        let n = kinds.len();
        (
            Just(kinds),
            prop::collection::vec(
                prop::sample::subsequence((0u64..12).collect::<Vec<_>>(), 0..=8).prop_shuffle(),
                n,
            ),
        )
            .prop_map(|(kinds, ids)| {
                kinds
                    .into_iter()
                    .zip(ids)
                    .map(|(kind, ids)| {
                        let items: Vec<Item> = ids
                            .into_iter()
                            .map(|id| match kind {
                                SectionKind::Categories => {
                                    Item::from(CategoryRecord::new(id, format!("Category {id}"), "tag"))
                                }
                                _ => Item::from(AppRecord::new(id, format!("App {id}"), "app", 4.0)),
                            })
                            .collect();
                        SectionDescriptor::new(kind, items)
                    })
                    .collect()
            })
    })
}

fn is_descending(indices: &[usize]) -> bool {
    indices.windows(2).all(|w| w[0] > w[1])
}

fn is_ascending(indices: &[usize]) -> bool {
    indices.windows(2).all(|w| w[0] < w[1])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn repeating_input_is_a_no_op(a in screen()) {
        let mut reconciler = SnapshotReconciler::new();
        reconciler.reconcile(&a).expect("valid");
        prop_assert!(reconciler.reconcile(&a).expect("valid").is_empty());
    }

    #[test]
    fn changes_replay_to_the_new_snapshot(a in screen(), b in screen()) {
        let mut reconciler = SnapshotReconciler::new();
        reconciler.reconcile(&a).expect("valid");
        let previous = reconciler.snapshot().clone();
        let result = reconciler.reconcile(&b).expect("valid");

        prop_assert_eq!(&result.snapshot, &Snapshot::from_sections(&b).expect("valid"));
        prop_assert_eq!(result.replay(&previous).expect("replay"), result.snapshot);
    }

    #[test]
    fn round_trip_restores_original(a in screen(), b in screen()) {
        let mut reconciler = SnapshotReconciler::new();
        reconciler.reconcile(&a).expect("valid");
        let original = reconciler.snapshot().clone();

        let forward = reconciler.reconcile(&b).expect("valid");
        let back = reconciler.reconcile(&a).expect("valid");

        let via_b = replay(&original, &forward.changes).expect("forward replay");
        let restored = replay(&via_b, &back.changes).expect("backward replay");
        prop_assert_eq!(&restored, &original);
        prop_assert_eq!(reconciler.snapshot(), &original);
    }

    #[test]
    fn section_operations_are_ordered(a in screen(), b in screen()) {
        let old = Snapshot::from_sections(&a).expect("valid");
        let new = Snapshot::from_sections(&b).expect("valid");
        let changes = diff(&old, &new);

        let removed: Vec<usize> = changes.iter().filter_map(|c| match c {
            Change::SectionRemoved { index } => Some(*index),
            _ => None,
        }).collect();
        let inserted: Vec<usize> = changes.iter().filter_map(|c| match c {
            Change::SectionInserted { index, .. } => Some(*index),
            _ => None,
        }).collect();
        prop_assert!(is_descending(&removed));
        prop_assert!(is_ascending(&inserted));

        // Section operations come before every item operation.
        let first_item_op = changes.iter().position(|c| matches!(
            c,
            Change::ItemRemoved { .. } | Change::ItemInserted { .. } | Change::ItemMoved { .. }
        ));
        if let Some(first) = first_item_op {
            prop_assert_eq!(first, removed.len() + inserted.len());
        }
    }

    #[test]
    fn diff_is_deterministic(a in screen(), b in screen()) {
        let old = Snapshot::from_sections(&a).expect("valid");
        let new = Snapshot::from_sections(&b).expect("valid");
        prop_assert_eq!(diff(&old, &new), diff(&old, &new));
    }
}
