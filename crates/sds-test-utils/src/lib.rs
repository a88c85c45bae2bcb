//! Testing utilities for the Site Designs Studio workspace
//!
//! Shared fixture schemas, sample scripts and configured engines.

#![allow(missing_docs)]

use sds_schema::SchemaEngine;
use sds_script::{Action, SiteScriptContent};
use serde_json::{json, Value};
use std::sync::Arc;

/// Small schema exercising every editor shape
pub const FIXTURE_SCHEMA: &str = r##"{
    "$schema": "http://json-schema.org/draft-06/schema#",
    "definitions": {
        "listSubactions": {
            "setTitle": {
                "type": "object",
                "title": "Set the Title",
                "properties": {
                    "verb": { "enum": ["setTitle"] },
                    "title": { "type": "string", "title": "Title" }
                },
                "required": ["verb", "title"],
                "additionalProperties": false
            },
            "addSPView": {
                "type": "object",
                "title": "Add a View",
                "description": "Add a view to the list",
                "properties": {
                    "verb": { "enum": ["addSPView"] },
                    "name": { "type": "string", "title": "Name" },
                    "viewFields": { "type": "array", "title": "Fields", "items": { "type": "string" } },
                    "rowLimit": { "type": "number", "title": "Row limit" },
                    "isPaged": { "type": "boolean", "title": "Paged" }
                },
                "required": ["verb", "name", "viewFields"],
                "additionalProperties": false
            }
        },
        "applyTheme": {
            "type": "object",
            "title": "Apply a Theme",
            "description": "Apply a theme to the site",
            "properties": {
                "verb": { "enum": ["applyTheme"] },
                "themeName": { "type": "string", "title": "Theme name" }
            },
            "required": ["verb", "themeName"],
            "additionalProperties": false
        },
        "createSPList": {
            "type": "object",
            "title": "Create a List",
            "properties": {
                "verb": { "enum": ["createSPList"] },
                "listName": { "type": "string", "title": "List name" },
                "templateType": { "title": "Template", "enum": [100, 101] },
                "hidden": { "type": "boolean", "title": "Hidden" },
                "subactions": {
                    "type": "array",
                    "title": "Sub actions",
                    "items": { "anyOf": [
                        { "type": "object", "$ref": "#/definitions/listSubactions/setTitle" },
                        { "type": "object", "$ref": "#/definitions/listSubactions/addSPView" }
                    ] }
                }
            },
            "required": ["verb", "listName", "templateType"],
            "additionalProperties": false
        },
        "setRegionalSettings": {
            "type": "object",
            "title": "Regional settings",
            "properties": {
                "verb": { "enum": ["setRegionalSettings"] },
                "timeZone": { "type": "number", "title": "Time zone" },
                "hourFormat": { "title": "Hour format", "enum": ["12", "24"] },
                "calendar": { "title": "Calendar", "enum": ["gregorian"] }
            },
            "required": ["verb", "timeZone"]
        },
        "configureNavigation": {
            "type": "object",
            "title": "Configure navigation",
            "properties": {
                "verb": { "enum": ["configureNavigation"] },
                "settings": {
                    "type": "object",
                    "title": "Settings",
                    "properties": {
                        "label": { "type": "string", "title": "Label" },
                        "visible": { "type": "boolean", "title": "Visible" },
                        "order": { "type": "number", "title": "Order" }
                    },
                    "required": ["label", "visible", "order"]
                }
            },
            "required": ["verb", "settings"]
        }
    },
    "type": "object",
    "properties": {
        "actions": {
            "type": "array",
            "items": { "anyOf": [
                { "type": "object", "$ref": "#/definitions/applyTheme" },
                { "type": "object", "$ref": "#/definitions/createSPList" },
                { "type": "object", "$ref": "#/definitions/setRegionalSettings" },
                { "type": "object", "$ref": "#/definitions/configureNavigation" }
            ] }
        },
        "bindata": { "type": "object" },
        "version": { "type": "number" }
    },
    "required": ["actions"]
}"##;

/// Schema declaring both `Foo` and `FOO`
pub const AMBIGUOUS_SCHEMA: &str = r#"{
    "properties": {
        "actions": {
            "type": "array",
            "items": { "anyOf": [
                { "type": "object", "title": "Foo", "properties": { "verb": { "enum": ["Foo"] } } },
                { "type": "object", "title": "FOO", "properties": { "verb": { "enum": ["FOO"] } } }
            ] }
        }
    }
}"#;

/// Sample script valid against [`FIXTURE_SCHEMA`]
pub fn sample_script_value() -> Value {
    json!({
        "$schema": "schema.json",
        "actions": [
            { "verb": "applyTheme", "themeName": "Contoso Blue" },
            {
                "verb": "createSPList",
                "listName": "Customers",
                "templateType": 100,
                "subactions": [
                    { "verb": "setTitle", "title": "Clients" },
                    { "verb": "addSPView", "name": "All", "viewFields": ["Title"] }
                ]
            },
            { "verb": "setRegionalSettings", "timeZone": 4 }
        ],
        "bindata": {},
        "version": 1
    })
}

/// Sample script as typed content
pub fn sample_script() -> SiteScriptContent {
    serde_json::from_value(sample_script_value()).unwrap()
}

/// Build an action from JSON
pub fn action(value: Value) -> Action {
    serde_json::from_value(value).unwrap()
}

/// Engine configured with the bundled site script schema
pub async fn configured_engine() -> Arc<SchemaEngine> {
    let engine = SchemaEngine::new();
    engine.configure(None, false).await.unwrap();
    Arc::new(engine)
}

/// Engine configured with [`FIXTURE_SCHEMA`]
pub async fn fixture_engine() -> Arc<SchemaEngine> {
    let engine = SchemaEngine::new();
    engine.configure(Some(FIXTURE_SCHEMA), false).await.unwrap();
    Arc::new(engine)
}
