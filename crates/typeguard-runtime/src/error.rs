use crate::predicate::ErrorRecord;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to compile schema `{key}`: {reason}")]
    Compile { key: String, reason: String },

    #[error("validation engine option `{option}` is not supported")]
    Unsupported { option: String },

    #[error("No validator defined for {key}")]
    NoValidator { key: String },

    /// The value does not conform to its schema. `message` is the formatted,
    /// `if`-filtered error text.
    #[error("{message}")]
    Invalid {
        type_name: String,
        errors: Vec<ErrorRecord>,
        message: String,
    },

    #[error("validated value does not deserialize into `{type_name}`: {source}")]
    Deserialize {
        type_name: String,
        #[source]
        source: serde_json::Error,
    },
}
