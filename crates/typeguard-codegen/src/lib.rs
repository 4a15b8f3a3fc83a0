//! Runtime type-guard module generation from JSON schemas.
//!
//! `typeguard-codegen` turns a schema document (as produced by a TypeScript
//! schema extractor) into a standalone TypeScript module that validates
//! untyped values with Ajv and reports readable errors.
//!
//! # Architecture
//!
//! ```text
//! Inputs                    Assembler                 Output
//! ──────────────────    ─────────────────────    ──────────────────
//! SchemaDocument   ─┐                          ┌─> header + imports
//!                   ├─> shape detection ───────┼─> ajv instance
//! GenerationOptions─┘   (single / multi)       ├─> schema constant(s)
//!                                              ├─> validators
//!                                              └─> Koa request guards
//! ```
//!
//! The [`template`] module holds the pure text fragments; [`assemble`]
//! decides which fragments apply and in what order.
//!
//! # Example
//!
//! ```
//! use typeguard_codegen::{GenerationOptions, SchemaDocument, generate};
//!
//! let document = SchemaDocument::new(serde_json::json!({
//!     "type": "object",
//!     "properties": { "value": { "type": "string" } },
//!     "required": ["value"]
//! }))
//! .unwrap();
//!
//! let options = GenerationOptions::new("./Example", ["ExampleType"]);
//! let artifact = generate(&document, &options).unwrap();
//! assert!(artifact.text().contains("export const isExampleType"));
//! ```

pub mod assemble;
pub mod error;
pub mod options;
pub mod schema;
pub mod stringify;
pub mod template;

pub use assemble::{Artifact, generate};
pub use error::GenerateError;
pub use options::{CompilerOptions, EngineOptions, GenerationOptions, ImportStyle};
pub use schema::{
    DocumentShape, REQUEST_FIELDS, ROOT_SCHEMA_NAME, RequestField, RequestFields, SchemaDocument,
    registry_key,
};
