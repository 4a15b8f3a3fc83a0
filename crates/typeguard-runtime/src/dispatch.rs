//! Validators resolved from an [`Engine`].
//!
//! [`Validators`] maps type names to predicates at call time, so any string
//! can be passed and unknown names fail with [`RuntimeError::NoValidator`].

use crate::engine::Engine;
use crate::error::RuntimeError;
use crate::format::{errors_text, filter_conditional, inspect};
use crate::predicate::Predicate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use typeguard_codegen::{DocumentShape, ROOT_SCHEMA_NAME, registry_key};

/// Type-name dispatch over a multi-type engine.
#[derive(Debug, Clone, Copy)]
pub struct Validators<'e> {
    engine: &'e Engine,
}

impl<'e> Validators<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Self { engine }
    }

    pub fn predicate(&self, type_name: &str) -> Result<&'e Predicate, RuntimeError> {
        let key = registry_key(type_name, None);
        match self.engine.get_schema(&key) {
            Some(predicate) => Ok(predicate),
            None => Err(RuntimeError::NoValidator { key }),
        }
    }

    pub fn is_valid(&self, type_name: &str, value: &Value) -> bool {
        self.predicate(type_name)
            .is_ok_and(|predicate| predicate.is_valid(value))
    }

    /// Validate `value` as `type_name`, handing it back unchanged on success.
    pub fn validate(&self, type_name: &str, value: Value) -> Result<Value, RuntimeError> {
        let predicate = self.predicate(type_name)?;
        match predicate.check(&value) {
            Ok(()) => Ok(value),
            Err(errors) => {
                let errors = filter_conditional(errors);
                let message = format!("Invalid {type_name}: {}", errors_text(&errors, type_name));
                tracing::debug!(type_name, errors = errors.len(), "validation failed");
                Err(RuntimeError::Invalid {
                    type_name: type_name.to_string(),
                    errors,
                    message,
                })
            }
        }
    }

    /// Validate, then deserialize into the Rust type the schema describes.
    pub fn validate_as<T: DeserializeOwned>(
        &self,
        type_name: &str,
        value: Value,
    ) -> Result<T, RuntimeError> {
        let value = self.validate(type_name, value)?;
        serde_json::from_value(value).map_err(|source| RuntimeError::Deserialize {
            type_name: type_name.to_string(),
            source,
        })
    }
}

/// Validator of one type, named after the type it checks.
///
/// On a single-type engine this is the document root; on a multi-type engine
/// it is the named definition.
#[derive(Debug, Clone)]
pub struct SingleValidator<'e> {
    type_name: String,
    predicate: &'e Predicate,
}

impl<'e> SingleValidator<'e> {
    pub fn new(engine: &'e Engine, type_name: impl Into<String>) -> Result<Self, RuntimeError> {
        let type_name = type_name.into();
        let key = match engine.shape() {
            DocumentShape::Single => ROOT_SCHEMA_NAME.to_string(),
            DocumentShape::Multi => registry_key(&type_name, None),
        };
        let predicate = engine
            .get_schema(&key)
            .ok_or(RuntimeError::NoValidator { key })?;
        Ok(Self {
            type_name,
            predicate,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.predicate.is_valid(value)
    }

    pub fn validate(&self, value: Value) -> Result<Value, RuntimeError> {
        match self.predicate.check(&value) {
            Ok(()) => Ok(value),
            Err(errors) => {
                let errors = filter_conditional(errors);
                let message = format!(
                    "{}\n\n{}",
                    errors_text(&errors, &self.type_name),
                    inspect(&value)
                );
                Err(RuntimeError::Invalid {
                    type_name: self.type_name.clone(),
                    errors,
                    message,
                })
            }
        }
    }

    pub fn validate_as<T: DeserializeOwned>(&self, value: Value) -> Result<T, RuntimeError> {
        let value = self.validate(value)?;
        serde_json::from_value(value).map_err(|source| RuntimeError::Deserialize {
            type_name: self.type_name.clone(),
            source,
        })
    }
}
