//! Text fragments of an emitted validator module.
//!
//! Every function here is a pure string transform; [`crate::assemble`]
//! decides which fragments apply and in what order.

use crate::options::{EngineOptions, ImportStyle};
use crate::schema::{REQUEST_FIELDS, ROOT_SCHEMA_NAME, RequestField, RequestFields, registry_key};
use crate::stringify::{stable_stringify, stable_stringify_pretty};
use serde_json::Value;

pub const TSLINT_DISABLE: &str = "/* tslint:disable */";
pub const GENERATED_COMMENT: &str = "// generated by typeguard";

pub const IMPORT_INSPECT: &str = "import inspect from 'util-inspect';";

pub const DECLARE_KOA_CONTEXT: &str = "export interface KoaContext {
  readonly request?: unknown; // {body?: unknown}
  readonly params?: unknown;
  readonly query?: unknown;
  throw(status: 400, message: string): unknown;
}";

pub const DECLARE_VALIDATE_TYPE: &str = "export type ValidateFunction<T> = ((data: unknown) => data is T) & Pick<Ajv.ValidateFunction, 'errors'>;";

pub const VALIDATE_KOA_REQUEST_FALLBACK: &str = "export function validateKoaRequest(typeName: string): (ctx: KoaContext) => {
  params: unknown,
  query: unknown,
  body: unknown,
};";

/// Drops Ajv's redundant branch-selection error for `if`/`then`/`else`.
const FILTER_CONDITIONAL: &str = ".filter((e: any) => e.keyword !== 'if')";

pub fn import_engine(style: ImportStyle) -> &'static str {
    match style {
        ImportStyle::Default => "import Ajv from 'ajv';",
        ImportStyle::Require => "import Ajv = require('ajv');",
    }
}

pub fn import_named_types(names: &[&str], relative_path: &str) -> String {
    format!("import {{{}}} from '{relative_path}';", names.join(", "))
}

pub fn import_default_type(name: &str, relative_path: &str) -> String {
    format!("import {name} from '{relative_path}';")
}

pub fn import_type(name: &str, relative_path: &str, named_export: bool) -> String {
    if named_export {
        import_named_types(&[name], relative_path)
    } else {
        import_default_type(name, relative_path)
    }
}

/// The module's engine instance plus the draft-06 meta-schema that
/// draft-07 schemas built from draft-06 constructs depend on.
pub fn declare_engine(options: &EngineOptions) -> String {
    let merged = Value::Object(options.merged());
    format!(
        "export const ajv = new Ajv({});

ajv.addMetaSchema(require('ajv/lib/refs/json-schema-draft-06.json'));",
        stable_stringify(&merged)
    )
}

pub fn export_named(names: &[&str]) -> String {
    format!("export {{{}}};", names.join(", "))
}

pub fn declare_schema(name: &str, schema: &Value) -> String {
    format!("export const {name} = {};", stable_stringify_pretty(schema))
}

pub fn add_schema(name: &str) -> String {
    format!("ajv.addSchema({name}, '{name}');")
}

pub fn validate_type(type_name: &str) -> String {
    format!("ValidateFunction<{type_name}>")
}

pub fn compile_schema(schema_name: &str, type_name: &str) -> String {
    format!("ajv.compile({schema_name}) as {}", validate_type(type_name))
}

/// Predicate and default `validate` export of a single-type module.
pub fn validate_fn(type_name: &str, schema_name: &str) -> String {
    format!(
        r#"export const is{type_name} = {compiled};
export default function validate(value: unknown): {type_name} {{
  if (is{type_name}(value)) {{
    return value;
  }} else {{
    throw new Error(
      ajv.errorsText(is{type_name}.errors!{FILTER_CONDITIONAL}, {{dataVar: '{type_name}'}}) +
      '\n\n' +
      inspect(value),
    );
  }}
}}"#,
        compiled = compile_schema(schema_name, type_name),
    )
}

/// Predicate of one type in a multi-type module, fetched from the registry.
pub fn lookup_predicate(type_name: &str) -> String {
    format!(
        "export const is{type_name} = ajv.getSchema('{}')! as {};",
        registry_key(type_name, None),
        validate_type(type_name)
    )
}

pub fn validate_overload(type_name: &str) -> String {
    format!("export function validate(typeName: '{type_name}'): (value: unknown) => {type_name};")
}

pub fn validate_implementation() -> String {
    format!(
        r#"export function validate(typeName: string): (value: unknown) => any {{
  const validator: any = ajv.getSchema(`{ROOT_SCHEMA_NAME}#/definitions/${{typeName}}`);
  return (value: unknown): any => {{
    if (!validator) {{
      throw new Error(`No validator defined for {ROOT_SCHEMA_NAME}#/definitions/${{typeName}}`);
    }}

    const valid = validator(value);

    if (!valid) {{
      throw new Error(
        'Invalid ' + typeName + ': ' + ajv.errorsText(validator.errors!{FILTER_CONDITIONAL}, {{dataVar: typeName}}),
      );
    }}

    return value as any;
  }};
}}"#
    )
}

fn request_field_type(type_name: &str, field: RequestField, fields: &RequestFields<'_>) -> String {
    match fields.get(field) {
        Some(_) => format!("{type_name}['{}']", field.as_str()),
        None => "unknown".to_string(),
    }
}

/// `validateKoaRequest` overload typed by the request fields `type_name`
/// declares; undeclared fields are `unknown`.
pub fn validate_koa_request_overload(type_name: &str, fields: &RequestFields<'_>) -> String {
    let members: Vec<String> = REQUEST_FIELDS
        .iter()
        .map(|&field| {
            format!(
                "  {}: {},",
                field.as_str(),
                request_field_type(type_name, field, fields)
            )
        })
        .collect();
    format!(
        "export function validateKoaRequest(typeName: '{type_name}'): (ctx: KoaContext) => {{\n{}\n}};",
        members.join("\n")
    )
}

/// Shared runtime of every `validateKoaRequest` overload.
pub fn validate_koa_request_implementation() -> String {
    let lookups: Vec<String> = REQUEST_FIELDS
        .iter()
        .map(|field| {
            let name = field.as_str();
            format!(
                "  const {name} = ajv.getSchema(`{ROOT_SCHEMA_NAME}#/definitions/${{typeName}}/properties/{name}`);"
            )
        })
        .collect();
    format!(
        r#"export function validateKoaRequest(typeName: string): (ctx: KoaContext) => {{
  params: any,
  query: any,
  body: any,
}} {{
{lookups}
  const validateProperty = (
    prop: string,
    validator: any,
    ctx: KoaContext,
  ): any => {{
    const data = prop === 'body' ? ctx.request && (ctx.request as any).body : (ctx as any)[prop];
    if (validator) {{
      const valid = validator(data);

      if (!valid) {{
        ctx.throw(
          400,
          'Invalid request: ' + ajv.errorsText(validator.errors!{FILTER_CONDITIONAL}, {{dataVar: prop}}) + '\n\n' + inspect({{params: ctx.params, query: ctx.query, body: ctx.request && (ctx.request as any).body}}),
        );
      }}
    }}
    return data;
  }};
  return (ctx) => {{
    return {{
      params: validateProperty('params', params, ctx),
      query: validateProperty('query', query, ctx),
      body: validateProperty('body', body, ctx),
    }};
  }};
}}"#,
        lookups = lookups.join("\n"),
    )
}
