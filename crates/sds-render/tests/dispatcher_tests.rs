//! Dispatcher behaviour against the fixture schema

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sds_render::{
    ChoiceOption, Control, CustomControl, CustomRenderInput, LabelResolver,
    PropertyRenderingDispatcher, RenderError, RenderedEditor,
};
use sds_schema::SchemaEngine;
use sds_script::Action;
use sds_test_utils::{action, fixture_engine, sample_script};
use serde_json::{json, Value};
use std::sync::Arc;

async fn dispatcher() -> PropertyRenderingDispatcher {
    PropertyRenderingDispatcher::new(fixture_engine().await)
}

fn list_action() -> Action {
    sample_script().actions[1].clone()
}

fn names(editors: &[RenderedEditor]) -> Vec<String> {
    editors
        .iter()
        .filter_map(RenderedEditor::as_property)
        .map(|e| e.name.clone())
        .collect()
}

fn picker(kind: &'static str) -> impl Fn(&CustomRenderInput<'_>) -> CustomControl + Send + Sync {
    move |input: &CustomRenderInput<'_>| {
        CustomControl::new(kind, input.label, input.value.cloned().unwrap_or(Value::Null))
    }
}

#[tokio::test]
async fn subactions_of_a_sub_action_is_a_structure_error() {
    let dispatcher = dispatcher().await;
    let parent = list_action();
    let child = parent.subactions().unwrap()[0].clone();

    let err = dispatcher.resolve_editor(&child, Some(&parent), "subactions").unwrap_err();
    assert!(matches!(err, RenderError::Structure(_)));
}

#[tokio::test]
async fn subactions_of_a_root_action_expand_per_sub_action() {
    let dispatcher = dispatcher().await;
    let editor = dispatcher.resolve_editor(&list_action(), None, "subactions").unwrap();

    let RenderedEditor::SubActions { actions } = editor else {
        panic!("expected sub-action editors");
    };
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].verb.as_str(), "setTitle");
    assert_eq!(names(&actions[0].editors), vec!["title"]);
    assert_eq!(actions[1].index, 1);
    assert_eq!(
        names(&actions[1].editors),
        vec!["name", "viewFields", "rowLimit", "isPaged"]
    );
}

#[tokio::test]
async fn unknown_verb_fails_resolution() {
    let dispatcher = dispatcher().await;
    let err = dispatcher
        .resolve_editor(&Action::new("bogus"), None, "anything")
        .unwrap_err();
    assert!(matches!(err, RenderError::SchemaResolution(_)));

    let parent = list_action();
    let err = dispatcher
        .resolve_editor(&Action::new("bogus"), Some(&parent), "anything")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "schema resolution failed for sub-action 'bogus' of 'createSPList'"
    );
}

#[tokio::test]
async fn unconfigured_engine_surfaces_schema_error() {
    let dispatcher = PropertyRenderingDispatcher::new(Arc::new(SchemaEngine::new()));
    let err = dispatcher
        .resolve_editor(&Action::new("applyTheme"), None, "themeName")
        .unwrap_err();
    assert!(matches!(err, RenderError::Schema(e) if e.is_not_configured()));
}

#[tokio::test]
async fn undeclared_property_renders_nothing() {
    let dispatcher = dispatcher().await;
    let editor = dispatcher
        .resolve_editor(&Action::new("applyTheme"), None, "notInSchema")
        .unwrap();
    assert_eq!(editor, RenderedEditor::Empty);
}

#[tokio::test]
async fn generic_editor_carries_required_and_title() {
    let dispatcher = dispatcher().await;
    let list = list_action();

    let editor = dispatcher.resolve_editor(&list, None, "listName").unwrap();
    let editor = editor.as_property().unwrap();
    assert_eq!(editor.label, "List name");
    assert!(editor.required);
    assert_eq!(editor.control, Control::Text { value: "Customers".to_string() });

    let editor = dispatcher.resolve_editor(&list, None, "hidden").unwrap();
    let editor = editor.as_property().unwrap();
    assert!(!editor.required);
    assert_eq!(editor.control, Control::Toggle { checked: false });
}

#[tokio::test]
async fn enum_controls_follow_arity_and_read_only() {
    let dispatcher = dispatcher().await;
    let regional = action(json!({ "verb": "setRegionalSettings", "timeZone": 4 }));

    let hour = dispatcher.resolve_editor(&regional, None, "hourFormat").unwrap();
    assert!(matches!(
        hour.as_property().unwrap().control,
        Control::Choice { ref options, selected: None } if options.len() == 2
    ));

    let calendar = dispatcher.resolve_editor(&regional, None, "calendar").unwrap();
    assert_eq!(
        calendar.as_property().unwrap().control,
        Control::Display { value: json!("gregorian") }
    );

    let locked = dispatcher
        .resolve_editor_with(&regional, None, "hourFormat", true)
        .unwrap();
    let locked = locked.as_property().unwrap();
    assert!(locked.read_only);
    assert!(matches!(locked.control, Control::Display { .. }));
}

#[tokio::test]
async fn custom_renderer_is_keyed_per_property() {
    let dispatcher = dispatcher().await;
    dispatcher
        .register_custom_renderer("createSPList", None, "templateType", picker("listTemplatePicker"), None)
        .unwrap();
    let list = list_action();

    let template = dispatcher.resolve_editor(&list, None, "templateType").unwrap();
    let template = template.as_property().unwrap();
    let Control::Custom { control } = &template.control else {
        panic!("expected custom control");
    };
    assert_eq!(control.kind, "listTemplatePicker");
    assert_eq!(control.label, "Template");
    assert_eq!(control.value, json!(100));
    assert!(template.required);

    let name = dispatcher.resolve_editor(&list, None, "listName").unwrap();
    assert!(matches!(name.as_property().unwrap().control, Control::Text { .. }));
}

#[tokio::test]
async fn last_registration_wins() {
    let dispatcher = dispatcher().await;
    dispatcher
        .register_custom_renderer("applyTheme", None, "themeName", picker("first"), None)
        .unwrap();
    dispatcher
        .register_custom_renderer("applyTheme", None, "themeName", picker("second"), None)
        .unwrap();
    assert_eq!(dispatcher.renderer_count(), 1);

    let editor = dispatcher
        .resolve_editor(&Action::new("applyTheme"), None, "themeName")
        .unwrap();
    let Control::Custom { control } = &editor.as_property().unwrap().control else {
        panic!("expected custom control");
    };
    assert_eq!(control.kind, "second");
}

#[tokio::test]
async fn sub_action_renderers_do_not_leak_to_root() {
    let dispatcher = dispatcher().await;
    dispatcher
        .register_custom_renderer("createSPList", Some("addSPView"), "name", picker("viewName"), None)
        .unwrap();
    let parent = list_action();
    let view = parent.subactions().unwrap()[1].clone();

    let editor = dispatcher.resolve_editor(&view, Some(&parent), "name").unwrap();
    assert!(matches!(editor.as_property().unwrap().control, Control::Custom { .. }));
    assert!(!dispatcher.has_custom_renderer("createSPList", None, "name"));
}

#[tokio::test]
async fn label_precedence_is_the_same_with_and_without_renderers() {
    let dispatcher = dispatcher().await;
    let resolver: LabelResolver = Arc::new(|property: &str| match property {
        "listName" => "Name of the list".to_string(),
        _ => String::new(),
    });
    dispatcher
        .register_custom_renderer(
            "createSPList",
            None,
            "templateType",
            picker("listTemplatePicker"),
            Some(resolver),
        )
        .unwrap();
    let list = list_action();

    let name = dispatcher.resolve_editor(&list, None, "listName").unwrap();
    assert_eq!(name.as_property().unwrap().label, "Name of the list");

    let template = dispatcher.resolve_editor(&list, None, "templateType").unwrap();
    assert_eq!(template.as_property().unwrap().label, "Template");

    let hidden = dispatcher.resolve_editor(&list, None, "hidden").unwrap();
    assert_eq!(hidden.as_property().unwrap().label, "Hidden");
}

#[tokio::test]
async fn action_editors_ignore_verb_and_subactions_by_default() {
    let dispatcher = dispatcher().await;
    let list = list_action();

    let editors = dispatcher.resolve_action_editors(&list, None, None).unwrap();
    assert_eq!(names(&editors), vec!["listName", "templateType", "hidden"]);

    let editors = dispatcher
        .resolve_action_editors(&list, None, Some(&["verb", "hidden"][..]))
        .unwrap();
    assert_eq!(editors.len(), 3);
    assert!(matches!(editors[2], RenderedEditor::SubActions { .. }));
}

#[tokio::test]
async fn property_changes_produce_new_actions() {
    let dispatcher = dispatcher().await;
    let list = list_action();

    let renamed = dispatcher
        .apply_property_change(&list, "listName", json!("Clients"))
        .unwrap();
    assert_eq!(renamed.property("listName"), Some(&json!("Clients")));
    assert_eq!(list.property("listName"), Some(&json!("Customers")));
    assert_eq!(renamed.subactions(), list.subactions());

    let err = dispatcher
        .apply_property_change(&list, "verb", json!(""))
        .unwrap_err();
    assert!(matches!(err, RenderError::Structure(_)));
}

#[tokio::test]
async fn sub_action_changes_replace_by_index() {
    let dispatcher = dispatcher().await;
    let list = list_action();
    let retitled = Action::new("setTitle").with_property("title", json!("Accounts"));

    let updated = dispatcher.apply_sub_action_change(&list, 0, retitled.clone()).unwrap();
    assert_eq!(updated.subactions().unwrap()[0], retitled);
    assert_eq!(updated.subactions().unwrap()[1], list.subactions().unwrap()[1]);

    let err = dispatcher.apply_sub_action_change(&list, 5, retitled).unwrap_err();
    assert!(matches!(err, RenderError::Structure(_)));
}

#[tokio::test]
async fn picker_options_survive_dispatch() {
    let dispatcher = dispatcher().await;
    let options = vec![ChoiceOption::new("Blue", "Contoso Blue")];
    dispatcher
        .register_custom_renderer(
            "applyTheme",
            None,
            "themeName",
            move |input: &CustomRenderInput<'_>| {
                CustomControl::new("themePicker", input.label, Value::Null).with_options(options.clone())
            },
            None,
        )
        .unwrap();

    let editor = dispatcher
        .resolve_editor(&Action::new("applyTheme"), None, "themeName")
        .unwrap();
    let Control::Custom { control } = &editor.as_property().unwrap().control else {
        panic!("expected custom control");
    };
    assert!(control.offers(&json!("Blue")));
}

proptest! {
    #[test]
    fn ignored_properties_never_render(mask in proptest::collection::vec(any::<bool>(), 3)) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let dispatcher = rt.block_on(dispatcher());
        let candidates = ["listName", "templateType", "hidden"];
        let mut ignored = vec!["verb", "subactions"];
        ignored.extend(candidates.iter().zip(&mask).filter(|(_, skip)| **skip).map(|(p, _)| *p));

        let editors = dispatcher.resolve_action_editors(&list_action(), None, Some(ignored.as_slice())).unwrap();
        let rendered = names(&editors);
        for name in &rendered {
            prop_assert!(!ignored.contains(&name.as_str()));
        }
        prop_assert_eq!(rendered.len(), mask.iter().filter(|skip| !**skip).count());
    }
}
