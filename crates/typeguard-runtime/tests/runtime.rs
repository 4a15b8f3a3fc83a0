//! Integration tests for typeguard-runtime.

use serde::Deserialize;
use serde_json::{Value, json};
use typeguard_codegen::{EngineOptions, SchemaDocument};
use typeguard_runtime::{
    BAD_REQUEST, Engine, JsonRequest, RequestGuard, RuntimeError, SingleValidator, Validators,
};

fn load_fixture(name: &str) -> SchemaDocument {
    let path = format!("tests/fixtures/{}.json", name);
    let content =
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("fixture {} not found", name));
    let value: Value = serde_json::from_str(&content).expect("invalid JSON");
    SchemaDocument::new(value).expect("fixture is not an object")
}

fn engine(name: &str) -> Engine {
    Engine::new(&load_fixture(name), &EngineOptions::new()).unwrap()
}

// === Single type ===

#[test]
fn accepts_conforming_values_unchanged() {
    let engine = engine("example");
    let validator = SingleValidator::new(&engine, "ExampleType").unwrap();

    let value = json!({ "answer": 42, "value": "x" });
    assert_eq!(validator.validate(value.clone()).unwrap(), value);
    assert!(validator.is_valid(&value));
}

#[test]
fn rejects_missing_required_field() {
    let engine = engine("example");
    let validator = SingleValidator::new(&engine, "ExampleType").unwrap();

    let err = validator.validate(json!({ "answer": 42 })).unwrap_err();
    let RuntimeError::Invalid {
        type_name,
        errors,
        message,
    } = err
    else {
        panic!("expected an invalid value error");
    };
    assert_eq!(type_name, "ExampleType");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].keyword, "required");
    assert!(message.starts_with("ExampleType "));
    assert!(message.contains("value"));
    assert!(!message.contains("\"if\""));
    // Formatted errors, a blank line, then the offending value.
    assert!(message.ends_with("\n\n{\n  \"answer\": 42\n}"));
}

#[test]
fn deserializes_after_validation() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct ExampleType {
        answer: f64,
        value: String,
        email: Option<String>,
    }

    let engine = engine("example");
    let validator = SingleValidator::new(&engine, "ExampleType").unwrap();
    let parsed: ExampleType = validator
        .validate_as(json!({ "answer": 1.5, "value": "v" }))
        .unwrap();
    assert_eq!(
        parsed,
        ExampleType {
            answer: 1.5,
            value: "v".into(),
            email: None,
        }
    );
}

#[test]
fn first_error_only_when_all_errors_disabled() {
    let document = load_fixture("example");
    let options = EngineOptions::new().with("allErrors", false);
    let engine = Engine::new(&document, &options).unwrap();
    let validator = SingleValidator::new(&engine, "ExampleType").unwrap();

    let err = validator.validate(json!({})).unwrap_err();
    assert!(matches!(err, RuntimeError::Invalid { ref errors, .. } if errors.len() == 1));

    let engine = Engine::new(&document, &EngineOptions::new()).unwrap();
    let validator = SingleValidator::new(&engine, "ExampleType").unwrap();
    let err = validator.validate(json!({})).unwrap_err();
    assert!(matches!(err, RuntimeError::Invalid { ref errors, .. } if errors.len() == 2));
}

// === Multiple types ===

#[test]
fn dispatches_on_type_name() {
    let engine = engine("api");
    let validators = Validators::new(&engine);

    assert_eq!(
        validators.validate("Status", json!("active")).unwrap(),
        json!("active")
    );
    assert!(validators.validate("CreateUser", json!("active")).is_err());

    let request = json!({ "params": { "org": "acme" }, "body": { "name": "Ada" } });
    assert_eq!(
        validators.validate("CreateUser", request.clone()).unwrap(),
        request
    );
    assert!(validators.validate("Status", request).is_err());
}

#[test]
fn invalid_message_names_the_type() {
    let engine = engine("api");
    let validators = Validators::new(&engine);

    let err = validators.validate("Status", json!("paused")).unwrap_err();
    assert!(err.to_string().starts_with("Invalid Status: Status "));
}

#[test]
fn unknown_type_name_is_an_error() {
    let engine = engine("api");
    let validators = Validators::new(&engine);

    let err = validators.validate("Missing", json!({})).unwrap_err();
    assert!(matches!(err, RuntimeError::NoValidator { .. }));
    assert_eq!(
        err.to_string(),
        "No validator defined for Schema#/definitions/Missing"
    );
    assert!(!validators.is_valid("Missing", &json!({})));
}

#[test]
fn conditional_failures_report_the_branch_constraint() {
    let engine = engine("api");
    let validators = Validators::new(&engine);

    assert!(validators.is_valid("Shape", &json!({ "kind": "circle", "radius": 1 })));
    assert!(validators.is_valid("Shape", &json!({ "kind": "square", "side": 2 })));

    let err = validators
        .validate("Shape", json!({ "kind": "circle" }))
        .unwrap_err();
    let RuntimeError::Invalid { errors, message, .. } = err else {
        panic!("expected an invalid value error");
    };
    assert!(!errors.is_empty());
    assert!(errors.iter().all(|e| e.keyword != "if"));
    assert!(message.contains("radius"));
}

#[test]
fn one_definition_document_validates_by_name() {
    let document = SchemaDocument::new(json!({
        "definitions": { "A": { "type": "string" } }
    }))
    .unwrap();
    let engine = Engine::new(&document, &EngineOptions::new()).unwrap();
    let validators = Validators::new(&engine);

    assert_eq!(validators.validate("A", json!("x")).unwrap(), json!("x"));
    assert!(matches!(
        validators.validate("A", json!(42)),
        Err(RuntimeError::Invalid { .. })
    ));

    let validator = SingleValidator::new(&engine, "A").unwrap();
    assert!(validator.is_valid(&json!("x")));
    assert!(!validator.is_valid(&json!(42)));

    let err = SingleValidator::new(&engine, "Nope").unwrap_err();
    assert!(matches!(err, RuntimeError::NoValidator { ref key } if key == "Schema#/definitions/Nope"));
}

#[test]
fn false_property_named_if_is_reported() {
    let document = SchemaDocument::new(json!({
        "definitions": { "Flags": { "type": "object", "properties": { "if": false } } }
    }))
    .unwrap();
    let engine = Engine::new(&document, &EngineOptions::new()).unwrap();
    let validators = Validators::new(&engine);

    let err = validators.validate("Flags", json!({ "if": 1 })).unwrap_err();
    let RuntimeError::Invalid { errors, message, .. } = err else {
        panic!("expected an invalid value error");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].keyword, "false schema");
    assert!(message.starts_with("Invalid Flags: Flags.if "));
    assert!(!message.contains("No errors"));
}

#[test]
fn external_references_fail_at_registration() {
    let document = SchemaDocument::new(json!({
        "definitions": {
            "Remote": { "$ref": "https://example.invalid/schemas/remote.json" }
        }
    }))
    .unwrap();
    let err = Engine::new(&document, &EngineOptions::new()).unwrap_err();
    assert!(matches!(err, RuntimeError::Compile { .. }));
}

// === Request guard ===

#[test]
fn request_with_all_fields_valid_passes_through() {
    let engine = engine("api");
    let guard = RequestGuard::for_type(&engine, "CreateUser");

    let ctx = JsonRequest::new()
        .with_params(json!({ "org": "acme" }))
        .with_query(json!({ "page": "2" }))
        .with_body(json!({ "name": "Ada", "age": 36 }));
    let data = guard.guard(&ctx).unwrap();

    assert_eq!(data.params, Some(json!({ "org": "acme" })));
    assert_eq!(data.query, Some(json!({ "page": "2" })));
    assert_eq!(data.body, Some(json!({ "name": "Ada", "age": 36 })));
}

#[test]
fn invalid_body_is_rejected_with_400() {
    let engine = engine("api");
    let guard = RequestGuard::for_type(&engine, "CreateUser");

    let ctx = JsonRequest::new()
        .with_params(json!({ "org": "acme" }))
        .with_body(json!({ "age": -1 }));
    let rejection = guard.guard(&ctx).unwrap_err();

    assert_eq!(rejection.status, BAD_REQUEST);
    assert!(rejection.message.starts_with("Invalid request: body"));
    assert!(rejection.message.contains("name"));
    assert!(!rejection.message.contains("params "));
    // The dump shows every channel of the request.
    assert!(rejection.message.contains("\"org\": \"acme\""));
}

#[test]
fn invalid_params_are_rejected_first() {
    let engine = engine("api");
    let guard = RequestGuard::for_type(&engine, "CreateUser");

    let ctx = JsonRequest::new()
        .with_params(json!({}))
        .with_body(json!({}));
    let rejection = guard.guard(&ctx).unwrap_err();

    assert_eq!(rejection.status, 400);
    assert!(rejection.message.starts_with("Invalid request: params"));
}

#[test]
fn missing_channels_and_unknown_types_are_not_validated() {
    let engine = engine("api");

    let ctx = JsonRequest::new().with_query(json!({ "q": 1 }));
    let data = RequestGuard::for_type(&engine, "CreateUser").guard(&ctx).unwrap();
    assert_eq!(data.params, None);
    assert_eq!(data.body, None);
    assert_eq!(data.query, Some(json!({ "q": 1 })));

    let ctx = JsonRequest::new().with_body(json!("anything"));
    let data = RequestGuard::for_type(&engine, "Missing").guard(&ctx).unwrap();
    assert_eq!(data.body, Some(json!("anything")));
}

#[test]
fn request_context_from_json() {
    let ctx: JsonRequest = serde_json::from_value(json!({
        "request": { "body": { "name": "Ada" } },
        "params": { "org": "acme" }
    }))
    .unwrap();
    let engine = engine("api");
    let data = RequestGuard::for_type(&engine, "CreateUser").guard(&ctx).unwrap();
    assert_eq!(data.body, Some(json!({ "name": "Ada" })));
}

#[test]
fn engine_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();
}
