//! Compiled predicates and the error records they report.

use crate::error::RuntimeError;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Retrieve, Uri};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One structured validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    /// Schema keyword that failed (`required`, `type`, `if`, ...).
    pub keyword: String,
    /// JSON pointer into the validated value; empty for the value itself.
    pub data_path: String,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(
        keyword: impl Into<String>,
        data_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            data_path: data_path.into(),
            message: message.into(),
        }
    }

    fn from_error(error: &jsonschema::ValidationError<'_>) -> Self {
        let keyword = match keyword_of(&error.kind) {
            Some(keyword) => keyword.to_string(),
            // Fall back to the last schema path segment, e.g.
            // `/properties/age/minimum`.
            None => error
                .schema_path
                .to_string()
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string(),
        };
        Self::new(keyword, error.instance_path.to_string(), error.to_string())
    }
}

/// The keyword that failed, taken from the error kind rather than the schema
/// path: a `false` sub-schema under a property named `if` still reports
/// `false schema`.
fn keyword_of(kind: &ValidationErrorKind) -> Option<&'static str> {
    let keyword = match kind {
        ValidationErrorKind::FalseSchema => "false schema",
        ValidationErrorKind::AdditionalItems { .. } => "additionalItems",
        ValidationErrorKind::AdditionalProperties { .. } => "additionalProperties",
        ValidationErrorKind::AnyOf => "anyOf",
        ValidationErrorKind::Constant { .. } => "const",
        ValidationErrorKind::Contains => "contains",
        ValidationErrorKind::ContentEncoding { .. } => "contentEncoding",
        ValidationErrorKind::ContentMediaType { .. } => "contentMediaType",
        ValidationErrorKind::Enum { .. } => "enum",
        ValidationErrorKind::ExclusiveMaximum { .. } => "exclusiveMaximum",
        ValidationErrorKind::ExclusiveMinimum { .. } => "exclusiveMinimum",
        ValidationErrorKind::Format { .. } => "format",
        ValidationErrorKind::MaxItems { .. } => "maxItems",
        ValidationErrorKind::Maximum { .. } => "maximum",
        ValidationErrorKind::MaxLength { .. } => "maxLength",
        ValidationErrorKind::MaxProperties { .. } => "maxProperties",
        ValidationErrorKind::MinItems { .. } => "minItems",
        ValidationErrorKind::Minimum { .. } => "minimum",
        ValidationErrorKind::MinLength { .. } => "minLength",
        ValidationErrorKind::MinProperties { .. } => "minProperties",
        ValidationErrorKind::MultipleOf { .. } => "multipleOf",
        ValidationErrorKind::Not { .. } => "not",
        ValidationErrorKind::OneOfMultipleValid | ValidationErrorKind::OneOfNotValid => "oneOf",
        ValidationErrorKind::Pattern { .. } => "pattern",
        ValidationErrorKind::PropertyNames { .. } => "propertyNames",
        ValidationErrorKind::Required { .. } => "required",
        ValidationErrorKind::Type { .. } => "type",
        ValidationErrorKind::UnevaluatedItems { .. } => "unevaluatedItems",
        ValidationErrorKind::UnevaluatedProperties { .. } => "unevaluatedProperties",
        ValidationErrorKind::UniqueItems => "uniqueItems",
        _ => return None,
    };
    Some(keyword)
}

/// Refuses every external `$ref`; documents must be self-contained.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema `{}` cannot be retrieved", uri.as_str()).into())
    }
}

/// A compiled check of values against one schema.
pub struct Predicate {
    validator: jsonschema::Validator,
    all_errors: bool,
}

impl Predicate {
    pub(crate) fn compile(key: &str, schema: &Value, all_errors: bool) -> Result<Self, RuntimeError> {
        let validator = jsonschema::options()
            .with_retriever(OfflineRetriever)
            .build(schema)
            .map_err(|e| RuntimeError::Compile {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            validator,
            all_errors,
        })
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.validator.is_valid(value)
    }

    /// Check `value`, returning every error (or only the first one when the
    /// engine was built with `allErrors: false`).
    pub fn check(&self, value: &Value) -> Result<(), Vec<ErrorRecord>> {
        let records = self
            .validator
            .iter_errors(value)
            .map(|error| ErrorRecord::from_error(&error));
        let errors: Vec<ErrorRecord> = if self.all_errors {
            records.collect()
        } else {
            records.take(1).collect()
        };
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("all_errors", &self.all_errors)
            .finish_non_exhaustive()
    }
}
