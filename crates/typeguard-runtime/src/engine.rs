//! The validation engine registry.
//!
//! One [`Engine`] is built per schema document and owns every predicate
//! compiled from it, keyed the same way the emitted module keys them:
//!
//! - `Schema`: the document root
//! - `Schema#/definitions/<type>`: each named type (multi-type documents)
//! - `Schema#/definitions/<type>/properties/<field>`: each request field a
//!   type declares

use crate::error::RuntimeError;
use crate::predicate::Predicate;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use typeguard_codegen::{
    DocumentShape, EngineOptions, REQUEST_FIELDS, ROOT_SCHEMA_NAME, SchemaDocument, registry_key,
};

#[derive(Debug)]
pub struct Engine {
    shape: DocumentShape,
    type_names: Vec<String>,
    predicates: HashMap<String, Predicate>,
}

impl Engine {
    pub fn new(document: &SchemaDocument, options: &EngineOptions) -> Result<Self, RuntimeError> {
        if options.coerce_types() {
            return Err(RuntimeError::Unsupported {
                option: "coerceTypes".to_string(),
            });
        }
        let all_errors = options.all_errors();
        let shape = document.shape();
        let root = document.as_value();

        let mut predicates = HashMap::new();
        predicates.insert(
            ROOT_SCHEMA_NAME.to_string(),
            Predicate::compile(ROOT_SCHEMA_NAME, root, all_errors)?,
        );

        let mut type_names = Vec::new();
        if shape == DocumentShape::Multi {
            for type_name in document.definition_names() {
                let key = registry_key(type_name, None);
                let schema = pointer_schema(root, &["definitions", type_name]);
                predicates.insert(key.clone(), Predicate::compile(&key, &schema, all_errors)?);

                let fields = document.request_fields(type_name);
                for field in REQUEST_FIELDS {
                    if fields.get(field).is_none() {
                        continue;
                    }
                    let key = registry_key(type_name, Some(field));
                    let schema = pointer_schema(
                        root,
                        &["definitions", type_name, "properties", field.as_str()],
                    );
                    predicates.insert(key.clone(), Predicate::compile(&key, &schema, all_errors)?);
                }
                type_names.push(type_name.to_string());
            }
        }

        tracing::debug!(
            ?shape,
            predicates = predicates.len(),
            all_errors,
            "registered schema document"
        );

        Ok(Self {
            shape,
            type_names,
            predicates,
        })
    }

    pub fn shape(&self) -> DocumentShape {
        self.shape
    }

    /// Named types of a multi-type document; empty for a single type.
    pub fn type_names(&self) -> &[String] {
        &self.type_names
    }

    /// Look up a predicate by registry key.
    pub fn get_schema(&self, key: &str) -> Option<&Predicate> {
        self.predicates.get(key)
    }

    pub fn root(&self) -> Option<&Predicate> {
        self.get_schema(ROOT_SCHEMA_NAME)
    }
}

/// A schema that validates against the sub-schema at `segments` while keeping
/// the document's `definitions` resolvable for `$ref`s inside it.
///
/// Segments are JSON-pointer escaped, then percent-encoded so that names
/// such as `Partial<User>` form a valid URI fragment.
fn pointer_schema(root: &Value, segments: &[&str]) -> Value {
    let pointer: String = segments
        .iter()
        .map(|segment| {
            let escaped = segment.replace('~', "~0").replace('/', "~1");
            format!("/{}", urlencoding::encode(&escaped))
        })
        .collect();

    let mut schema = Map::new();
    for keyword in ["$schema", "definitions"] {
        if let Some(value) = root.get(keyword) {
            schema.insert(keyword.to_string(), value.clone());
        }
    }
    schema.insert("allOf".to_string(), json!([{ "$ref": format!("#{pointer}") }]));
    Value::Object(schema)
}
