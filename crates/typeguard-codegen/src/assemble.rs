//! Module assembly.
//!
//! Picks the template fragments that apply to a document and concatenates
//! them in a fixed order:
//!
//! 1. header marker
//! 2. imports (inspect, engine, validated types)
//! 3. engine instance
//! 4. schema constant(s) and validator declarations
//! 5. Koa request helpers, when enabled
//!
//! All inputs are checked before the first fragment is produced.

use crate::error::GenerateError;
use crate::options::{GenerationOptions, ImportStyle};
use crate::schema::{DocumentShape, ROOT_SCHEMA_NAME, SchemaDocument};
use crate::template;
use std::fmt;

/// A generated validator module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    shape: DocumentShape,
    type_names: Vec<String>,
    text: String,
}

impl Artifact {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn shape(&self) -> DocumentShape {
        self.shape
    }

    /// Types the module validates, in emission order.
    pub fn type_names(&self) -> &[String] {
        &self.type_names
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Generate a validator module for `document`.
pub fn generate(
    document: &SchemaDocument,
    options: &GenerationOptions,
) -> Result<Artifact, GenerateError> {
    let assembler = Assembler::new(document, options)?;
    let text = assembler.emit();
    Ok(Artifact {
        shape: assembler.shape,
        type_names: assembler.type_names.iter().map(|s| s.to_string()).collect(),
        text,
    })
}

/// A checked generation request.
struct Assembler<'a> {
    document: &'a SchemaDocument,
    options: &'a GenerationOptions,
    shape: DocumentShape,
    type_names: Vec<&'a str>,
    import_style: ImportStyle,
}

impl<'a> Assembler<'a> {
    fn new(
        document: &'a SchemaDocument,
        options: &'a GenerationOptions,
    ) -> Result<Self, GenerateError> {
        let type_names = options.unique_type_names();
        if type_names.is_empty() {
            return Err(GenerateError::MissingTypeNames);
        }
        if options.import_path.trim().is_empty() {
            return Err(GenerateError::MissingImportPath);
        }
        if options
            .import_path
            .contains(['\'', '\\', '\n', '\r'])
        {
            return Err(GenerateError::InvalidImportPath {
                path: options.import_path.clone(),
            });
        }
        if let Some(name) = type_names.iter().find(|name| !is_identifier(name)) {
            return Err(GenerateError::InvalidTypeName {
                name: name.to_string(),
            });
        }

        let shape = document.shape();
        tracing::debug!(?shape, types = type_names.len(), "resolved document shape");

        match shape {
            DocumentShape::Single => {
                if type_names.len() > 1 {
                    return Err(GenerateError::AmbiguousSingleType {
                        names: type_names.iter().map(|s| s.to_string()).collect(),
                    });
                }
                if options.emit_http_integration {
                    return Err(GenerateError::HttpIntegrationRequiresDefinitions);
                }
            }
            DocumentShape::Multi => {
                if let Some(name) = type_names
                    .iter()
                    .find(|name| document.definition(name).is_none())
                {
                    return Err(GenerateError::UnknownType {
                        name: name.to_string(),
                        available: document
                            .definition_names()
                            .into_iter()
                            .map(String::from)
                            .collect(),
                    });
                }
            }
        }

        let import_style = options.compiler_options.import_style();
        tracing::debug!(?import_style, "selected engine import");

        Ok(Self {
            document,
            options,
            shape,
            type_names,
            import_style,
        })
    }

    fn emit(&self) -> String {
        let mut out: Vec<String> = vec![
            template::TSLINT_DISABLE.to_string(),
            template::GENERATED_COMMENT.to_string(),
            template::IMPORT_INSPECT.to_string(),
            template::import_engine(self.import_style).to_string(),
        ];
        match self.shape {
            DocumentShape::Single => self.emit_single(&mut out),
            DocumentShape::Multi => self.emit_multi(&mut out),
        }
        let mut text = out.join("\n");
        text.push('\n');
        text
    }

    fn emit_single(&self, out: &mut Vec<String>) {
        let type_name = self.type_names[0];
        let schema_name = format!("{type_name}Schema");
        tracing::trace!(type_name, "emitting single-type validator");

        out.push(template::import_type(
            type_name,
            &self.options.import_path,
            self.options.named_export,
        ));
        out.push(template::declare_engine(
            &self.options.validation_engine_options,
        ));
        out.push(template::export_named(&[type_name]));
        out.push(template::declare_schema(
            &schema_name,
            self.document.as_value(),
        ));
        out.push(template::DECLARE_VALIDATE_TYPE.to_string());
        out.push(template::validate_fn(type_name, &schema_name));
    }

    fn emit_multi(&self, out: &mut Vec<String>) {
        out.push(template::import_named_types(
            &self.type_names,
            &self.options.import_path,
        ));
        if self.options.emit_http_integration {
            out.push(template::DECLARE_KOA_CONTEXT.to_string());
        }
        out.push(template::declare_engine(
            &self.options.validation_engine_options,
        ));
        out.push(template::export_named(&self.type_names));
        out.push(template::declare_schema(
            ROOT_SCHEMA_NAME,
            self.document.as_value(),
        ));
        out.push(template::add_schema(ROOT_SCHEMA_NAME));
        out.push(template::DECLARE_VALIDATE_TYPE.to_string());

        for type_name in &self.type_names {
            tracing::trace!(type_name, "emitting predicate");
            out.push(template::lookup_predicate(type_name));
        }
        // Overloads must directly precede their implementation.
        for type_name in &self.type_names {
            out.push(template::validate_overload(type_name));
        }
        out.push(template::validate_implementation());

        if self.options.emit_http_integration {
            self.emit_http(out);
        }
    }

    fn emit_http(&self, out: &mut Vec<String>) {
        let typed = self
            .type_names
            .iter()
            .any(|name| self.document.has_properties(name));
        if typed {
            for type_name in &self.type_names {
                let fields = self.document.request_fields(type_name);
                out.push(template::validate_koa_request_overload(type_name, &fields));
            }
        }
        tracing::debug!(typed, "emitting Koa request helpers");
        out.push(template::VALIDATE_KOA_REQUEST_FALLBACK.to_string());
        out.push(template::validate_koa_request_implementation());
    }
}

/// TypeScript identifiers may use any Unicode letter, not just ASCII.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
