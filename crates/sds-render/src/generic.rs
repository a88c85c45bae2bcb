//! Generic schema-driven editors
//!
//! Controls are derived purely from a resolved [`PropertySchema`], checked in
//! this order:
//!
//! 1. `enum` with more than one literal and editable → choice
//! 2. `enum` with at most one literal, or read-only → display
//! 3. `boolean` → toggle
//! 4. `array` → one row per item
//! 5. `object` → one field per declared property
//! 6. `number` / `integer` → numeric input
//! 7. anything else → text
//!
//! The value helpers below are the change paths of those controls. They never
//! mutate their inputs.

use crate::custom::CustomControl;
use sds_schema::{default_value, default_value_for, PropertySchema, SchemaType};
use serde::Serialize;
use serde_json::{Map, Value};

/// Editor of one property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyEditor {
    /// Property name, or row index inside arrays
    pub name: String,
    /// Display label
    pub label: String,
    /// Listed in the owning schema's `required`
    pub required: bool,
    /// Edits disabled
    pub read_only: bool,
    /// Rendered control
    pub control: Control,
}

impl PropertyEditor {
    /// With a different label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Rendered control of a property
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Control {
    /// Choice over enum literals; emits the selected literal
    Choice {
        /// Enum literals in schema order
        options: Vec<Value>,
        /// Current literal, if set
        selected: Option<Value>,
    },
    /// Display-only text
    Display {
        /// Shown value
        value: Value,
    },
    /// Two-state toggle
    Toggle {
        /// Current state
        checked: bool,
    },
    /// Repeating rows, one per array item
    Array {
        /// Row editors
        rows: Vec<PropertyEditor>,
    },
    /// Nested object fields
    Object {
        /// Field editors in schema order
        fields: Vec<PropertyEditor>,
    },
    /// Numeric input
    Number {
        /// Current value
        value: Value,
    },
    /// Plain text input
    Text {
        /// Current text
        value: String,
    },
    /// Control supplied by a registered custom renderer
    Custom {
        /// The custom control
        control: CustomControl,
    },
}

/// Flags applied to a property editor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorFlags {
    /// Listed in `required`
    pub required: bool,
    /// Edits disabled
    pub read_only: bool,
}

impl EditorFlags {
    /// Editable flags with the given required-ness
    #[inline]
    #[must_use]
    pub fn required(required: bool) -> Self {
        Self {
            required,
            read_only: false,
        }
    }

    /// With read-only flag
    #[inline]
    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// Render one property from its schema
///
/// A missing schema renders nothing. The label defaults to the schema title.
#[must_use]
pub fn render_property(
    name: &str,
    schema: Option<&PropertySchema>,
    value: Option<&Value>,
    flags: EditorFlags,
) -> Option<PropertyEditor> {
    let schema = schema?;
    Some(PropertyEditor {
        name: name.to_string(),
        label: schema.title.clone().unwrap_or_default(),
        required: flags.required,
        read_only: flags.read_only,
        control: control_for(schema, value, flags.read_only),
    })
}

/// Render the fields of an object schema, skipping `ignored`
#[must_use]
pub fn render_object(
    schema: &PropertySchema,
    object: Option<&Map<String, Value>>,
    ignored: &[&str],
    read_only: bool,
) -> Vec<PropertyEditor> {
    let Some(properties) = schema.properties() else {
        return Vec::new();
    };

    properties
        .iter()
        .filter(|(name, _)| !ignored.contains(&name.as_str()))
        .filter_map(|(name, property)| {
            let flags = EditorFlags::required(schema.is_required(name)).with_read_only(read_only);
            render_property(name, Some(property), object.and_then(|o| o.get(name)), flags)
        })
        .collect()
}

/// Render one row per array item
///
/// Nothing is rendered when the item schema is missing.
#[must_use]
pub fn render_rows(
    items: Option<&PropertySchema>,
    array: Option<&Value>,
    read_only: bool,
) -> Vec<PropertyEditor> {
    let Some(values) = array.and_then(Value::as_array) else {
        return Vec::new();
    };

    values
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let flags = EditorFlags::default().with_read_only(read_only);
            render_property(&index.to_string(), items, Some(item), flags)
                .map(|row| row.with_label(""))
        })
        .collect()
}

fn control_for(schema: &PropertySchema, value: Option<&Value>, read_only: bool) -> Control {
    let current = value.filter(|v| !v.is_null());

    if let Some(literals) = &schema.enumeration {
        if literals.len() > 1 && !read_only {
            return Control::Choice {
                options: literals.clone(),
                selected: current.cloned(),
            };
        }
        return Control::Display {
            value: current
                .or_else(|| literals.first())
                .cloned()
                .unwrap_or(Value::Null),
        };
    }

    match schema.effective_type() {
        Some(SchemaType::Boolean) => Control::Toggle {
            checked: current.and_then(Value::as_bool).unwrap_or(false),
        },
        Some(SchemaType::Array) => Control::Array {
            rows: render_rows(schema.items(), current, read_only),
        },
        Some(SchemaType::Object) => Control::Object {
            fields: render_object(schema, current.and_then(Value::as_object), &[], read_only),
        },
        Some(SchemaType::Number | SchemaType::Integer) => Control::Number {
            value: current.cloned().unwrap_or(Value::Null),
        },
        _ => Control::Text {
            value: display_text(current),
        },
    }
}

fn display_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Parse numeric input; anything that is not a finite number keeps `previous`
#[must_use]
pub fn parse_number(input: &str, previous: &Value) -> Value {
    let input = input.trim();
    if let Ok(integer) = input.parse::<i64>() {
        return Value::from(integer);
    }
    match input.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
        Some(number) => Value::Number(number),
        None => {
            tracing::debug!(input, "ignoring non-numeric input");
            previous.clone()
        }
    }
}

/// Coerce an incoming value for a number-typed property
#[must_use]
pub fn coerce_number(value: Value, previous: &Value) -> Value {
    match value {
        Value::Number(_) => value,
        Value::String(text) => parse_number(&text, previous),
        _ => previous.clone(),
    }
}

/// Object with one property replaced
///
/// Number-typed properties are coerced. Every other declared, non-ignored
/// property that is absent or `null` is backfilled with its default; `false`,
/// `0` and `""` are left alone.
#[must_use]
pub fn update_object_property(
    schema: &PropertySchema,
    object: &Value,
    property: &str,
    value: Value,
    ignored: &[&str],
) -> Value {
    let mut updated = object.as_object().cloned().unwrap_or_default();

    let value = match schema.property(property).and_then(PropertySchema::effective_type) {
        Some(SchemaType::Number | SchemaType::Integer) => {
            coerce_number(value, updated.get(property).unwrap_or(&Value::Null))
        }
        _ => value,
    };
    updated.insert(property.to_string(), value);

    if let Some(properties) = schema.properties() {
        for (name, declared) in properties {
            if ignored.contains(&name.as_str()) {
                continue;
            }
            if updated.get(name).map_or(true, Value::is_null) {
                updated.insert(name.clone(), default_value(declared));
            }
        }
    }

    Value::Object(updated)
}

/// Array with a default-valued row appended
#[must_use]
pub fn append_row(items: Option<&PropertySchema>, array: &Value) -> Value {
    let mut rows = array.as_array().cloned().unwrap_or_default();
    rows.push(default_value_for(items));
    Value::Array(rows)
}

/// Array without the row at `index`
#[must_use]
pub fn remove_row(array: &Value, index: usize) -> Value {
    match array.as_array() {
        Some(rows) => Value::Array(
            rows.iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, row)| row.clone())
                .collect(),
        ),
        None => array.clone(),
    }
}

/// Array with the row at `index` replaced
#[must_use]
pub fn update_row(array: &Value, index: usize, value: Value) -> Value {
    match array.as_array() {
        Some(rows) if index < rows.len() => {
            let mut rows = rows.clone();
            rows[index] = value;
            Value::Array(rows)
        }
        _ => array.clone(),
    }
}
