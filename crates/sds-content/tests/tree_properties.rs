//! Property tests for the action tree: key stability, copy-on-write
//! isolation and round-tripping

use proptest::prelude::*;
use sds_content::{ContentUiWrapper, UiKey};
use sds_script::{Action, SiteScriptContent};
use sds_test_utils::sample_script;
use serde_json::json;

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    Remove(usize),
    Reorder(usize, usize),
    Toggle(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4).prop_map(Op::Add),
        any::<usize>().prop_map(Op::Remove),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Reorder(a, b)),
        any::<usize>().prop_map(Op::Toggle),
    ]
}

fn verb(n: u8) -> String {
    ["applyTheme", "joinHubSite", "setSiteLogo", "createSPList"][usize::from(n)].to_string()
}

/// Apply an op, never touching `pinned`
fn apply(wrapper: &ContentUiWrapper, op: &Op, pinned: &UiKey) -> ContentUiWrapper {
    let len = wrapper.actions().len();
    match op {
        Op::Add(n) => wrapper.add_action(Action::new(verb(*n))),
        Op::Remove(i) if len > 0 => {
            let key = wrapper.actions()[i % len].key().clone();
            if &key == pinned {
                wrapper.clone()
            } else {
                wrapper.remove_action(&key).unwrap()
            }
        }
        Op::Reorder(a, b) if len > 0 => wrapper.reorder_actions(a % len, b % len).unwrap(),
        Op::Toggle(i) if len > 0 => {
            let key = wrapper.actions()[i % len].key().clone();
            wrapper.toggle_editing(&key).unwrap()
        }
        _ => wrapper.clone(),
    }
}

fn content_strategy() -> impl Strategy<Value = SiteScriptContent> {
    let action = (0u8..4, "[a-z]{0,6}", proptest::option::of(0usize..3)).prop_map(|(n, value, subs)| {
        let mut action = Action::new(verb(n)).with_property("name", json!(value));
        if let Some(count) = subs {
            let children = (0..count)
                .map(|i| Action::new("setTitle").with_property("title", json!(i)))
                .collect();
            action = action.with_subactions(children);
        }
        action
    });
    proptest::collection::vec(action, 0..6)
        .prop_map(|actions| SiteScriptContent::empty().with_actions(actions))
}

proptest! {
    #[test]
    fn untouched_node_keeps_its_key(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let start = ContentUiWrapper::new(Some(&sample_script()));
        let pinned = start.actions()[1].key().clone();
        let pinned_action = start.actions()[1].action().clone();

        let end = ops.iter().fold(start, |w, op| apply(&w, op, &pinned));

        let node = end.find(&pinned).expect("pinned node survives");
        prop_assert_eq!(node.key(), &pinned);
        prop_assert_eq!(node.action(), &pinned_action);
    }

    #[test]
    fn keys_stay_unique(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let start = ContentUiWrapper::new(Some(&sample_script()));
        let pinned = UiKey::from("none");
        let end = ops.iter().fold(start, |w, op| apply(&w, op, &pinned));

        let mut seen = std::collections::HashSet::new();
        for node in end.actions() {
            prop_assert!(seen.insert(node.key().clone()));
            for sub in node.subactions().into_iter().flatten() {
                prop_assert!(seen.insert(sub.key().clone()));
            }
        }
    }

    #[test]
    fn operations_leave_input_untouched(op in op_strategy()) {
        let wrapper = ContentUiWrapper::new(Some(&sample_script()));
        let actions = wrapper.actions().clone();
        let editing = wrapper.editing_keys().clone();

        let _next = apply(&wrapper, &op, &UiKey::from("none"));
        let _sub = wrapper.add_sub_action(&actions[1].key().clone(), Action::new("setTitle")).unwrap();
        let _cleared = wrapper.clear_editing(None);

        prop_assert_eq!(wrapper.actions(), &actions);
        prop_assert_eq!(wrapper.editing_keys(), &editing);
    }

    #[test]
    fn round_trip_through_wrapper(content in content_strategy()) {
        let wrapper = ContentUiWrapper::new(Some(&content));
        prop_assert_eq!(wrapper.to_site_script_content(None), content.clone());

        let text = wrapper.to_json().unwrap();
        prop_assert_eq!(SiteScriptContent::from_json(&text).unwrap(), content);
    }
}
