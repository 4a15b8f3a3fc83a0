//! Schema documents handed over by the schema extractor.
//!
//! A document either describes one anonymous type directly (its root carries
//! `type`, `properties`, ...) or a named set of types under `definitions`.
//! Requested names are resolved against `definitions` whenever the root
//! itself is not a type.

use crate::error::GenerateError;
use serde_json::{Map, Value};

/// Name under which a multi-type document is registered with the engine.
pub const ROOT_SCHEMA_NAME: &str = "Schema";

/// Keywords that make the root of a document a type of its own.
const TYPE_KEYWORDS: &[&str] = &[
    "type",
    "properties",
    "$ref",
    "anyOf",
    "oneOf",
    "allOf",
    "enum",
    "items",
    "const",
];

/// Whether a document validates one type or several named ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    /// One anonymous type; `definitions`, if any, are helpers of it.
    Single,
    /// Several named types under `definitions`.
    Multi,
}

/// The three conventional request channels validated by the Koa helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestField {
    Params,
    Query,
    Body,
}

/// Request fields in the order they are validated.
pub const REQUEST_FIELDS: [RequestField; 3] =
    [RequestField::Params, RequestField::Query, RequestField::Body];

impl RequestField {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestField::Params => "params",
            RequestField::Query => "query",
            RequestField::Body => "body",
        }
    }
}

/// Sub-schemas a type declares for each request field.
///
/// `None` means the type has no such property and the field is unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RequestFields<'a> {
    pub params: Option<&'a Value>,
    pub query: Option<&'a Value>,
    pub body: Option<&'a Value>,
}

impl<'a> RequestFields<'a> {
    pub fn get(&self, field: RequestField) -> Option<&'a Value> {
        match field {
            RequestField::Params => self.params,
            RequestField::Query => self.query,
            RequestField::Body => self.body,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_none() && self.query.is_none() && self.body.is_none()
    }
}

/// Registry key for a type, or for one of its request fields.
///
/// Both the emitted module and the Rust runtime look predicates up by these
/// keys: `Schema#/definitions/<type>` and
/// `Schema#/definitions/<type>/properties/<field>`.
pub fn registry_key(type_name: &str, field: Option<RequestField>) -> String {
    match field {
        Some(field) => format!(
            "{ROOT_SCHEMA_NAME}#/definitions/{type_name}/properties/{}",
            field.as_str()
        ),
        None => format!("{ROOT_SCHEMA_NAME}#/definitions/{type_name}"),
    }
}

/// A schema document; always a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    root: Value,
}

impl SchemaDocument {
    pub fn new(root: Value) -> Result<Self, GenerateError> {
        if root.is_object() {
            Ok(Self { root })
        } else {
            Err(GenerateError::InvalidDocument {
                found: json_kind(&root),
            })
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    pub fn definitions(&self) -> Option<&Map<String, Value>> {
        self.root.get("definitions").and_then(Value::as_object)
    }

    pub fn definition(&self, name: &str) -> Option<&Value> {
        self.definitions().and_then(|defs| defs.get(name))
    }

    /// Names under `definitions`, in document order.
    pub fn definition_names(&self) -> Vec<&str> {
        self.definitions()
            .map(|defs| defs.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether the root itself constrains values.
    pub fn describes_type(&self) -> bool {
        TYPE_KEYWORDS.iter().any(|kw| self.root.get(*kw).is_some())
    }

    /// Multi-type when the root constrains nothing itself and `definitions`
    /// has at least one entry; a one-entry collection is still a collection.
    pub fn shape(&self) -> DocumentShape {
        let definitions = self.definitions().map_or(0, Map::len);
        if definitions > 0 && !self.describes_type() {
            DocumentShape::Multi
        } else {
            DocumentShape::Single
        }
    }

    /// Whether the named definition declares a `properties` map.
    pub fn has_properties(&self, type_name: &str) -> bool {
        self.definition(type_name)
            .and_then(|def| def.get("properties"))
            .is_some_and(Value::is_object)
    }

    /// Request-field sub-schemas of a named definition.
    pub fn request_fields(&self, type_name: &str) -> RequestFields<'_> {
        let properties = self
            .definition(type_name)
            .and_then(|def| def.get("properties"))
            .and_then(Value::as_object);
        let Some(properties) = properties else {
            return RequestFields::default();
        };
        RequestFields {
            params: properties.get(RequestField::Params.as_str()),
            query: properties.get(RequestField::Query.as_str()),
            body: properties.get(RequestField::Body.as_str()),
        }
    }
}

impl TryFrom<Value> for SchemaDocument {
    type Error = GenerateError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
