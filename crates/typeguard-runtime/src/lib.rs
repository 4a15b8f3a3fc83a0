//! Rust runtime for typeguard validators.
//!
//! Performs in Rust what a module emitted by `typeguard-codegen` does in
//! TypeScript, on `serde_json::Value` inputs. Schema semantics come from the
//! [`jsonschema`] crate; this crate owns the registry, error-reporting policy
//! and dispatch around it.
//!
//! The engine is an explicit value rather than a module singleton: build one
//! [`Engine`] per schema document and hand it to every validator that needs
//! it.
//!
//! ```
//! use serde_json::json;
//! use typeguard_codegen::{EngineOptions, SchemaDocument};
//! use typeguard_runtime::{Engine, Validators};
//!
//! let document = SchemaDocument::new(json!({
//!     "definitions": {
//!         "Name": { "type": "string" },
//!         "Age": { "type": "integer", "minimum": 0 }
//!     }
//! }))
//! .unwrap();
//! let engine = Engine::new(&document, &EngineOptions::new()).unwrap();
//! let validators = Validators::new(&engine);
//!
//! assert_eq!(validators.validate("Age", json!(3)).unwrap(), json!(3));
//! assert!(validators.validate("Age", json!(-1)).is_err());
//! assert!(validators.validate("Height", json!(1)).is_err());
//! ```

pub mod dispatch;
pub mod engine;
pub mod error;
pub mod format;
pub mod predicate;
pub mod request;

pub use dispatch::{SingleValidator, Validators};
pub use engine::Engine;
pub use error::RuntimeError;
pub use format::{errors_text, filter_conditional, inspect};
pub use predicate::{ErrorRecord, Predicate};
pub use request::{
    BAD_REQUEST, JsonRequest, Rejection, RequestContext, RequestData, RequestGuard,
};
