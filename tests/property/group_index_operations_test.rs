//! Property-based tests for the group index under arbitrary event orderings.
//!
//! For any interleaving of group and tab events, every recorded member sits
//! in the bucket its own ids name and each group lives in exactly one window.
//! Closed windows stay closed, and repeating an upsert changes nothing.

use std::collections::HashSet;

use proptest::prelude::*;

use tabkeeper::managers::group_index::GroupIndex;
use tabkeeper::types::group::{Color, GroupMetadata, TAB_GROUP_ID_NONE};
use tabkeeper::types::tab::Tab;

#[derive(Debug, Clone)]
enum IndexOp {
    UpsertGroup { window: i32, group: i32, color: usize },
    RemoveGroup { window: i32, group: i32 },
    UpsertTab { window: i32, group: i32, tab: i32, index: i32 },
    RemoveTab { window: i32, tab: i32 },
    RemoveWindow { window: i32 },
}

fn arb_group() -> impl Strategy<Value = i32> {
    prop_oneof![1 => Just(TAB_GROUP_ID_NONE), 4 => 1..5i32]
}

fn arb_op() -> impl Strategy<Value = IndexOp> {
    prop_oneof![
        3 => (1..4i32, 1..5i32, 0..8usize)
            .prop_map(|(window, group, color)| IndexOp::UpsertGroup { window, group, color }),
        1 => (1..4i32, 1..5i32).prop_map(|(window, group)| IndexOp::RemoveGroup { window, group }),
        6 => (1..4i32, arb_group(), 1..12i32, 0..6i32).prop_map(|(window, group, tab, index)| {
            IndexOp::UpsertTab { window, group, tab, index }
        }),
        2 => (1..4i32, 1..12i32).prop_map(|(window, tab)| IndexOp::RemoveTab { window, tab }),
        1 => (1..4i32).prop_map(|window| IndexOp::RemoveWindow { window }),
    ]
}

fn make_tab(window: i32, group: i32, tab: i32, index: i32) -> Tab {
    Tab {
        id: Some(tab),
        window_id: window,
        group_id: group,
        index,
        url: Some(format!("https://t/{}", tab)),
        title: None,
    }
}

fn apply(index: &mut GroupIndex, op: &IndexOp) {
    match *op {
        IndexOp::UpsertGroup { window, group, color } => {
            index.upsert_group(
                window,
                group,
                GroupMetadata {
                    title: Some(format!("g{}", group)),
                    color: Color::ALL[color],
                    window_id: window,
                    collapsed: false,
                },
            );
        }
        IndexOp::RemoveGroup { window, group } => {
            index.remove_group(window, group);
        }
        IndexOp::UpsertTab { window, group, tab, index: pos } => {
            index.upsert_tab(window, group, make_tab(window, group, tab, pos));
        }
        IndexOp::RemoveTab { window, tab } => {
            index.remove_tab(window, tab);
        }
        IndexOp::RemoveWindow { window } => {
            index.remove_window(window);
        }
    }
}

fn check_invariants(index: &GroupIndex) -> Result<(), TestCaseError> {
    let mut members = 0;
    let mut seen_groups = HashSet::new();
    for window in index.window_ids() {
        prop_assert!(!index.is_window_closed(window));
        for group in index.group_ids(window) {
            prop_assert_ne!(group, TAB_GROUP_ID_NONE);
            prop_assert!(seen_groups.insert(group), "group {} in two windows", group);
            prop_assert_eq!(index.locate_group(group), Some(window));
            let record = index.group(window, group).unwrap();
            for (tab_id, tab) in &record.members {
                prop_assert_eq!(tab.id, Some(*tab_id));
                prop_assert_eq!(tab.window_id, window);
                prop_assert_eq!(tab.group_id, group);
                prop_assert_eq!(index.locate_tab(*tab_id), Some((window, group)));
                members += 1;
            }
        }
    }
    prop_assert_eq!(members, index.tab_count());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn members_always_match_their_bucket(ops in prop::collection::vec(arb_op(), 1..80)) {
        let mut index = GroupIndex::new();
        let mut closed = HashSet::new();
        for op in &ops {
            apply(&mut index, op);
            if let IndexOp::RemoveWindow { window } = op {
                closed.insert(*window);
            }
            check_invariants(&index)?;
            for window in &closed {
                prop_assert!(index.snapshot(*window).is_empty());
            }
        }
    }

    #[test]
    fn repeated_upserts_are_idempotent(ops in prop::collection::vec(arb_op(), 1..60)) {
        let mut once = GroupIndex::new();
        let mut twice = GroupIndex::new();
        for op in &ops {
            apply(&mut once, op);
            apply(&mut twice, op);
            if matches!(op, IndexOp::UpsertGroup { .. } | IndexOp::UpsertTab { .. }) {
                apply(&mut twice, op);
            }
        }
        prop_assert_eq!(once.live_snapshot(), twice.live_snapshot());
        prop_assert_eq!(once.tab_count(), twice.tab_count());
    }
}
