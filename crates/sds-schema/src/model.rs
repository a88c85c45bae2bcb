//! Typed property schemas
//!
//! Raw schema JSON is turned into [`PropertySchema`] trees once, while the
//! index is built. Every `$ref` is resolved away at that point, so consumers
//! never walk pointers again.

use crate::resolver::{self, RefError, MAX_REF_DEPTH};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// JSON-Schema primitive type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// Text
    String,
    /// Two-state flag
    Boolean,
    /// Floating point number
    Number,
    /// Whole number
    Integer,
    /// Nested object
    Object,
    /// Repeating list
    Array,
    /// Explicit null
    Null,
}

impl SchemaType {
    /// Parse a `type` keyword
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "null" => Some(Self::Null),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

/// Structural shape of a property schema
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Scalar value
    Leaf,
    /// Object with declared properties
    Object {
        /// Declared properties in document order
        properties: IndexMap<String, PropertySchema>,
        /// Mandatory property names
        required: Vec<String>,
    },
    /// Array of items
    Array {
        /// Item schema, if declared
        items: Option<Box<PropertySchema>>,
    },
    /// Alternatives (tagged unions such as sub-action lists)
    AnyOf(Vec<PropertySchema>),
}

/// Resolved schema of a property, action or sub-action
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    /// Declared `type`
    pub schema_type: Option<SchemaType>,
    /// Declared `enum` literals, in order
    pub enumeration: Option<Vec<Value>>,
    /// Display title
    pub title: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Structural shape
    pub shape: Shape,
}

impl PropertySchema {
    /// Leaf schema of the given type
    #[must_use]
    pub fn leaf(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            enumeration: None,
            title: None,
            description: None,
            shape: Shape::Leaf,
        }
    }

    /// With title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// With enum literals
    #[must_use]
    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enumeration = Some(values);
        self
    }

    /// Build from raw JSON, resolving every `$ref` against `document`
    pub fn from_value(document: &Value, raw: &Value) -> Result<Self, RefError> {
        Self::build(document, raw, 0)
    }

    fn build(document: &Value, raw: &Value, depth: usize) -> Result<Self, RefError> {
        if depth > MAX_REF_DEPTH {
            return Err(RefError::TooDeep(
                resolver::ref_pointer(raw).unwrap_or("<nested schema>").to_string(),
            ));
        }

        let schema = resolver::resolve(document, raw)?;
        let schema_type = schema
            .get("type")
            .or_else(|| raw.get("type"))
            .and_then(Value::as_str)
            .and_then(SchemaType::parse);
        let enumeration = schema.get("enum").and_then(Value::as_array).cloned();
        let title = schema.get("title").and_then(Value::as_str).map(str::to_string);
        let description = schema
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);

        let shape = if let Some(props) = schema.get("properties").and_then(Value::as_object) {
            let mut properties = IndexMap::with_capacity(props.len());
            for (name, child) in props {
                properties.insert(name.clone(), Self::build(document, child, depth + 1)?);
            }
            Shape::Object {
                properties,
                required: string_list(schema.get("required")),
            }
        } else if let Some(items) = schema.get("items") {
            Shape::Array {
                items: Some(Box::new(Self::build(document, items, depth + 1)?)),
            }
        } else if let Some(any_of) = schema.get("anyOf").and_then(Value::as_array) {
            let alternatives = any_of
                .iter()
                .map(|alt| Self::build(document, alt, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            Shape::AnyOf(alternatives)
        } else {
            match schema_type {
                Some(SchemaType::Object) => Shape::Object {
                    properties: IndexMap::new(),
                    required: string_list(schema.get("required")),
                },
                Some(SchemaType::Array) => Shape::Array { items: None },
                _ => Shape::Leaf,
            }
        };

        Ok(Self {
            schema_type,
            enumeration,
            title,
            description,
            shape,
        })
    }

    /// Declared properties (empty unless object-shaped)
    #[must_use]
    pub fn properties(&self) -> Option<&IndexMap<String, PropertySchema>> {
        match &self.shape {
            Shape::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }

    /// Schema of one declared property
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties().and_then(|props| props.get(name))
    }

    /// Whether a property is declared
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Mandatory property names
    #[must_use]
    pub fn required(&self) -> &[String] {
        match &self.shape {
            Shape::Object { required, .. } => required,
            _ => &[],
        }
    }

    /// Whether `name` is listed in `required`
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required().iter().any(|r| r == name)
    }

    /// Item schema of an array
    #[must_use]
    pub fn items(&self) -> Option<&PropertySchema> {
        match &self.shape {
            Shape::Array { items } => items.as_deref(),
            _ => None,
        }
    }

    /// Alternatives of an `anyOf` schema
    #[must_use]
    pub fn any_of(&self) -> &[PropertySchema] {
        match &self.shape {
            Shape::AnyOf(alternatives) => alternatives,
            _ => &[],
        }
    }

    /// Effective type: declared type, else inferred from the shape
    #[must_use]
    pub fn effective_type(&self) -> Option<SchemaType> {
        self.schema_type.or(match &self.shape {
            Shape::Object { .. } => Some(SchemaType::Object),
            Shape::Array { .. } => Some(SchemaType::Array),
            Shape::Leaf | Shape::AnyOf(_) => None,
        })
    }

    /// The single enum literal, when the enum has exactly one string entry
    #[must_use]
    pub fn single_literal(&self) -> Option<&str> {
        match self.enumeration.as_deref() {
            Some([Value::String(literal)]) => Some(literal.as_str()),
            _ => None,
        }
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
