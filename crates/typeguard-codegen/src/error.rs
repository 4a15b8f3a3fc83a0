//! Generation errors.
//!
//! Every variant is raised before any text is produced; a failed
//! generation never yields a partial module.

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("schema document must be a JSON object, found {found}")]
    InvalidDocument { found: &'static str },

    #[error("no type names requested")]
    MissingTypeNames,

    #[error("no import path given for the validated types")]
    MissingImportPath,

    #[error("import path {path:?} cannot be embedded in a single-quoted module specifier")]
    InvalidImportPath { path: String },

    #[error("`{name}` is not a valid TypeScript identifier")]
    InvalidTypeName { name: String },

    #[error(
        "type `{name}` is not defined in the schema document (available: {})",
        .available.join(", ")
    )]
    UnknownType {
        name: String,
        available: Vec<String>,
    },

    #[error(
        "a single-type schema document can only validate one type, got: {}",
        .names.join(", ")
    )]
    AmbiguousSingleType { names: Vec<String> },

    #[error("HTTP integration requires a schema document with multiple named definitions")]
    HttpIntegrationRequiresDefinitions,
}
