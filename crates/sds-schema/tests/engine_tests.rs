//! Schema engine behavior against the bundled and fixture schemas

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sds_schema::{SchemaEngine, SchemaError};
use sds_test_utils::{action, configured_engine, fixture_engine, AMBIGUOUS_SCHEMA};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn join_hub_site_validation_scenario() {
    let engine = configured_engine().await;

    assert!(engine
        .validate(r#"{"actions":[{"verb":"joinHubSite","hubSiteId":"abc"}]}"#)
        .unwrap());
    assert!(!engine
        .validate(r#"{"actions":[{"verb":"joinHubSite"}]}"#)
        .unwrap());

    let err = engine.validate("{not json").unwrap_err();
    assert!(matches!(err, SchemaError::MalformedJson(_)));
}

#[tokio::test]
async fn validation_report_lists_violations() {
    let engine = configured_engine().await;
    let report = engine
        .validate_report(r#"{"actions":[{"verb":"joinHubSite"}]}"#)
        .unwrap();
    assert!(!report.is_valid());

    let report = engine
        .validate_report(r#"{"$schema":"schema.json","actions":[],"bindata":{},"version":1}"#)
        .unwrap();
    assert!(report.is_valid());
}

#[tokio::test]
async fn bundled_schema_lists_every_action() {
    let engine = configured_engine().await;
    let verbs: Vec<String> = engine
        .get_available_actions()
        .unwrap()
        .into_iter()
        .map(|d| d.verb.to_string())
        .collect();

    assert_eq!(verbs.len(), 17);
    assert!(verbs.contains(&"createSPList".to_string()));
    assert!(verbs.contains(&"addPrincipalToGroup".to_string()));

    let subs = engine.get_available_sub_actions("createSPList").unwrap();
    assert!(subs.iter().any(|d| d.verb == "addSPView"));
    assert!(engine.get_available_sub_actions("joinHubSite").unwrap().is_empty());
}

#[tokio::test]
async fn new_action_from_bundled_schema() {
    let engine = configured_engine().await;

    let hub = engine.get_new_action_from_verb("joinHubSite").unwrap();
    assert_eq!(
        serde_json::to_value(&hub).unwrap(),
        json!({ "verb": "joinHubSite", "hubSiteId": "" })
    );

    let list = engine.get_new_action_from_verb("createSPList").unwrap();
    let value = serde_json::to_value(&list).unwrap();
    assert_eq!(value["templateType"], json!(100));
    assert_eq!(value["subactions"], json!([]));

    let err = engine.get_new_action_from_verb("launchRocket").unwrap_err();
    assert!(matches!(err, SchemaError::Resolution(_)));
}

#[tokio::test]
async fn new_sub_action_from_verb() {
    let engine = fixture_engine().await;
    let view = engine
        .get_new_sub_action_from_verb("createSPList", "addSPView")
        .unwrap();
    assert_eq!(
        serde_json::to_value(&view).unwrap(),
        json!({ "verb": "addSPView", "name": "", "viewFields": [] })
    );

    assert!(matches!(
        engine.get_new_sub_action_from_verb("applyTheme", "addSPView"),
        Err(SchemaError::Resolution(_))
    ));
}

#[tokio::test]
async fn ambiguous_case_insensitive_lookup() {
    let engine = SchemaEngine::new();
    engine.configure(Some(AMBIGUOUS_SCHEMA), false).await.unwrap();

    assert!(engine.get_action_schema("foo").unwrap().is_none());
    assert!(engine.get_action_schema("Foo").unwrap().is_some());

    let engine = fixture_engine().await;
    let schema = engine.get_action_schema("applytheme").unwrap().unwrap();
    assert_eq!(schema.title.as_deref(), Some("Apply a Theme"));
    assert!(engine
        .get_sub_action_schema("CREATESPLIST", "addspview")
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn titles_descriptions_and_summaries() {
    let engine = fixture_engine().await;
    let list = action(json!({
        "verb": "createSPList",
        "listName": "Customers",
        "templateType": 100,
        "subactions": [{ "verb": "setTitle", "title": "Clients" }, { "verb": "setTitle", "title": "x" }]
    }));

    assert_eq!(engine.get_action_title(&list, None).unwrap(), "Create a List");
    assert_eq!(engine.get_action_description(&list, None).unwrap(), "");

    let view = action(json!({ "verb": "addSPView" }));
    assert_eq!(
        engine.get_action_description(&view, Some(&list)).unwrap(),
        "Add a view to the list"
    );

    let unknown = action(json!({ "verb": "mystery" }));
    assert_eq!(engine.get_action_title(&unknown, None).unwrap(), "mystery");

    let rows = engine.get_properties_and_values(&list, None).unwrap();
    let rows: Vec<(String, serde_json::Value)> =
        rows.into_iter().map(|r| (r.property, r.value)).collect();
    assert_eq!(
        rows,
        vec![
            ("List name".to_string(), json!("Customers")),
            ("Template".to_string(), json!(100)),
            ("Hidden".to_string(), json!(null)),
            ("Sub actions".to_string(), json!("2 subactions")),
        ]
    );

    let nav = action(json!({ "verb": "configureNavigation", "settings": { "label": "Home" } }));
    let rows = engine.get_properties_and_values(&nav, None).unwrap();
    assert_eq!(rows[0].value, json!("Complex object"));
}

#[tokio::test]
async fn has_sub_actions_follows_schema() {
    let engine = fixture_engine().await;
    assert!(engine.has_sub_actions(&action(json!({ "verb": "createSPList" }))).unwrap());
    assert!(!engine.has_sub_actions(&action(json!({ "verb": "applyTheme" }))).unwrap());
    assert!(!engine.has_sub_actions(&action(json!({ "verb": "mystery" }))).unwrap());
}

#[tokio::test]
async fn forced_reconfigure_replaces_index() {
    let engine = fixture_engine().await;
    assert!(engine.get_action_schema("joinHubSite").unwrap().is_none());

    engine.configure(None, false).await.unwrap();
    assert!(engine.get_action_schema("joinHubSite").unwrap().is_none());

    engine.configure(None, true).await.unwrap();
    assert!(engine.get_action_schema("joinHubSite").unwrap().is_some());
}

#[tokio::test]
async fn failed_configuration_keeps_engine_unconfigured() {
    let engine = SchemaEngine::new();
    let err = engine
        .configure(Some(r#"{"properties":{"actions":{"type":"string"}}}"#), false)
        .await
        .unwrap_err();
    assert!(matches!(err, SchemaError::Configuration(_)));
    assert!(!engine.is_configured());
}

#[tokio::test]
async fn relative_source_without_base_url() {
    let engine = SchemaEngine::new();
    let err = engine.configure(Some("/schema.json"), false).await.unwrap_err();
    assert!(matches!(err, SchemaError::Configuration(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_configure_coalesces() {
    let engine = Arc::new(SchemaEngine::new());
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.configure(None, false).await })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }
    assert!(engine.is_configured());
    assert_eq!(engine.get_available_actions().unwrap().len(), 17);
}

#[tokio::test]
async fn default_value_idempotence() {
    let engine = configured_engine().await;
    for descriptor in engine.get_available_actions().unwrap() {
        let first = engine.get_new_action_from_verb(descriptor.verb.as_str()).unwrap();
        let second = engine.get_new_action_from_verb(descriptor.verb.as_str()).unwrap();
        assert_eq!(first, second);
    }
}

proptest! {
    #[test]
    fn unknown_verbs_never_resolve(verb in "[a-z]{1,8}zz") {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let engine = rt.block_on(fixture_engine());
        prop_assert!(engine.get_action_schema(&verb).unwrap().is_none());
        prop_assert!(
            matches!(
                engine.get_new_action_from_verb(&verb),
                Err(SchemaError::Resolution(_))
            ),
            "expected resolution error"
        );
    }
}
