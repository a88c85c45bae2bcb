//! Provisioning action
//!
//! An action is a JSON object with a `verb`, arbitrary verb-specific
//! properties and an optional `subactions` array. On the wire `verb` always
//! comes first and `subactions` last; the remaining properties keep their
//! insertion order.

use crate::error::{ScriptError, ScriptResult};
use crate::verb::Verb;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Name of the verb property
pub const VERB_PROPERTY: &str = "verb";

/// Name of the sub-actions property
pub const SUBACTIONS_PROPERTY: &str = "subactions";

/// One step of a site script
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    verb: Verb,
    properties: Map<String, Value>,
    subactions: Option<Vec<Action>>,
}

impl Action {
    /// Create an action with no properties
    #[inline]
    #[must_use]
    pub fn new(verb: impl Into<Verb>) -> Self {
        Self {
            verb: verb.into(),
            properties: Map::new(),
            subactions: None,
        }
    }

    /// With a verb-specific property
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// With sub-actions
    #[must_use]
    pub fn with_subactions(mut self, subactions: Vec<Action>) -> Self {
        self.subactions = Some(subactions);
        self
    }

    /// Action verb
    #[inline]
    #[must_use]
    pub fn verb(&self) -> &Verb {
        &self.verb
    }

    /// Verb-specific property (never `verb` or `subactions`)
    #[inline]
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Verb-specific properties in order
    #[inline]
    #[must_use]
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Sub-actions, if the action carries a `subactions` array
    #[inline]
    #[must_use]
    pub fn subactions(&self) -> Option<&[Action]> {
        self.subactions.as_deref()
    }

    /// Mutable sub-action list, created empty when absent
    pub fn subactions_mut(&mut self) -> &mut Vec<Action> {
        self.subactions.get_or_insert_with(Vec::new)
    }

    /// Drop the sub-action list
    pub fn take_subactions(&mut self) -> Option<Vec<Action>> {
        self.subactions.take()
    }

    /// Current value of any property as JSON, including `verb` and `subactions`
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<Value> {
        match name {
            VERB_PROPERTY => Some(Value::String(self.verb.to_string())),
            SUBACTIONS_PROPERTY => self
                .subactions
                .as_ref()
                .map(|subs| Value::Array(subs.iter().map(Action::to_value).collect())),
            _ => self.properties.get(name).cloned(),
        }
    }

    /// Set a property by name
    ///
    /// `verb` must be a non-empty string and `subactions` an array of actions
    /// (or `null` to drop it).
    pub fn set_value(&mut self, name: &str, value: Value) -> ScriptResult<()> {
        match name {
            VERB_PROPERTY => {
                let verb = value
                    .as_str()
                    .ok_or_else(|| ScriptError::invalid_action("verb must be a string"))?;
                self.verb = verb.parse()?;
            }
            SUBACTIONS_PROPERTY => {
                self.subactions = parse_subactions(value)?;
            }
            _ => {
                self.properties.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    /// Copy with one property replaced
    pub fn with_value(&self, name: &str, value: Value) -> ScriptResult<Self> {
        let mut updated = self.clone();
        updated.set_value(name, value)?;
        Ok(updated)
    }

    /// Remove a verb-specific property
    pub fn remove_property(&mut self, name: &str) -> Option<Value> {
        self.properties.shift_remove(name)
    }

    /// Action as a JSON object
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut object = Map::with_capacity(self.properties.len() + 2);
        object.insert(VERB_PROPERTY.to_string(), Value::String(self.verb.to_string()));
        for (name, value) in &self.properties {
            object.insert(name.clone(), value.clone());
        }
        if let Some(subactions) = &self.subactions {
            object.insert(
                SUBACTIONS_PROPERTY.to_string(),
                Value::Array(subactions.iter().map(Action::to_value).collect()),
            );
        }
        Value::Object(object)
    }
}

fn parse_subactions(value: Value) -> ScriptResult<Option<Vec<Action>>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => items
            .into_iter()
            .map(Action::try_from)
            .collect::<ScriptResult<Vec<_>>>()
            .map(Some),
        _ => Err(ScriptError::invalid_action("subactions must be an array")),
    }
}

impl TryFrom<Value> for Action {
    type Error = ScriptError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut object) = value else {
            return Err(ScriptError::invalid_action("action must be a JSON object"));
        };

        let verb = match object.shift_remove(VERB_PROPERTY) {
            Some(Value::String(verb)) => verb.parse::<Verb>()?,
            Some(_) => return Err(ScriptError::invalid_action("verb must be a string")),
            None => return Err(ScriptError::invalid_action("missing verb")),
        };

        let subactions = match object.shift_remove(SUBACTIONS_PROPERTY) {
            Some(Value::Null) => {
                return Err(ScriptError::invalid_action("subactions must be an array"))
            }
            Some(value) => parse_subactions(value)?,
            None => None,
        };

        Ok(Self {
            verb,
            properties: object,
            subactions,
        })
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.properties.len() + 1 + usize::from(self.subactions.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(VERB_PROPERTY, &self.verb)?;
        for (name, value) in &self.properties {
            map.serialize_entry(name, value)?;
        }
        if let Some(subactions) = &self.subactions {
            map.serialize_entry(SUBACTIONS_PROPERTY, subactions)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Action::try_from(value).map_err(D::Error::custom)
    }
}
