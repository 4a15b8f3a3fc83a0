//! Generation options.
//!
//! Hosts usually deserialize these from their own config (camelCase keys):
//!
//! ```json
//! {
//!   "typeNames": ["CreateUser", "Status"],
//!   "importPath": "./types",
//!   "emitHttpIntegration": true,
//!   "validationEngineOptions": { "useDefaults": true },
//!   "compilerOptions": { "esModuleInterop": true, "module": "esnext" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How the emitted module imports the validation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStyle {
    /// `import Ajv from 'ajv';`
    Default,
    /// `import Ajv = require('ajv');`
    Require,
}

/// The subset of the consumer's `compilerOptions` that decides how `ajv`
/// resolves when the emitted module is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
    pub allow_synthetic_default_imports: Option<bool>,
    pub es_module_interop: Option<bool>,
    pub module: Option<String>,
}

impl CompilerOptions {
    /// Extract compiler options from a parsed `tsconfig.json`.
    pub fn from_tsconfig(tsconfig: &Value) -> Result<Self, serde_json::Error> {
        match tsconfig.get("compilerOptions") {
            Some(options) => serde_json::from_value(options.clone()),
            None => Ok(Self::default()),
        }
    }

    pub fn import_style(&self) -> ImportStyle {
        // tsconfig module names are case-insensitive ("ESNext", "esnext").
        let module = self.module.as_deref().map(str::to_ascii_lowercase);
        let synthetic = self.allow_synthetic_default_imports.unwrap_or(false);
        let es_interop = self.es_module_interop.unwrap_or(false)
            && module.as_deref().is_some_and(|m| m.starts_with("es"));
        let system = module.as_deref() == Some("system");

        if synthetic || es_interop || system {
            ImportStyle::Default
        } else {
            ImportStyle::Require
        }
    }
}

/// Options passed to the engine constructor in the emitted module.
///
/// Caller-supplied values override the fixed defaults
/// `coerceTypes: false` and `allErrors: true`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EngineOptions {
    overrides: Map<String, Value>,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    /// Defaults overlaid with caller options.
    pub fn merged(&self) -> Map<String, Value> {
        let mut merged = Map::new();
        merged.insert("coerceTypes".into(), Value::Bool(false));
        merged.insert("allErrors".into(), Value::Bool(true));
        for (name, value) in &self.overrides {
            merged.insert(name.clone(), value.clone());
        }
        merged
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.merged().remove(name)
    }

    pub fn all_errors(&self) -> bool {
        self.get("allErrors")
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }

    pub fn coerce_types(&self) -> bool {
        // Ajv also accepts "array" here; anything truthy means coercion.
        match self.get("coerceTypes") {
            Some(Value::Bool(flag)) => flag,
            Some(Value::Null) | None => false,
            Some(_) => true,
        }
    }
}

/// Everything one generation run needs besides the schema document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationOptions {
    pub validation_engine_options: EngineOptions,
    pub compiler_options: CompilerOptions,
    pub emit_http_integration: bool,
    /// Types to emit validators for, in emission order.
    pub type_names: Vec<String>,
    /// Module specifier the validated types are imported from.
    pub import_path: String,
    /// Single-type documents only: import the type by name instead of as the
    /// default export.
    pub named_export: bool,
}

impl GenerationOptions {
    pub fn new<I, S>(import_path: impl Into<String>, type_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            import_path: import_path.into(),
            type_names: type_names.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_compiler_options(mut self, compiler_options: CompilerOptions) -> Self {
        self.compiler_options = compiler_options;
        self
    }

    pub fn with_engine_options(mut self, engine_options: EngineOptions) -> Self {
        self.validation_engine_options = engine_options;
        self
    }

    pub fn with_http_integration(mut self, enabled: bool) -> Self {
        self.emit_http_integration = enabled;
        self
    }

    pub fn with_named_export(mut self, named_export: bool) -> Self {
        self.named_export = named_export;
        self
    }

    /// Requested type names with duplicates removed, first occurrence wins.
    pub fn unique_type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.type_names.len());
        for name in &self.type_names {
            if !names.contains(&name.as_str()) {
                names.push(name.as_str());
            }
        }
        names
    }
}
