//! HTTP request guards.
//!
//! A guard validates the three conventional request channels (`params`,
//! `query` and the request `body`) against the sub-schemas a type declares
//! for them. Channels the type does not declare are passed through as-is.

use crate::engine::Engine;
use crate::format::{errors_text, filter_conditional, inspect};
use crate::predicate::Predicate;
use serde::Deserialize;
use serde_json::{Value, json};
use typeguard_codegen::{REQUEST_FIELDS, RequestField, registry_key};

/// Status passed to [`RequestContext::throw`] for every rejected request.
pub const BAD_REQUEST: u16 = 400;

/// A web framework's view of an incoming request.
pub trait RequestContext {
    type Error;

    fn params(&self) -> Option<&Value>;
    fn query(&self) -> Option<&Value>;
    /// The parsed request body, if any.
    fn body(&self) -> Option<&Value>;

    /// Build the error that aborts the request.
    fn throw(&self, status: u16, message: String) -> Self::Error;
}

/// Request channels extracted by a successful guard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestData {
    pub params: Option<Value>,
    pub query: Option<Value>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, Copy)]
pub struct RequestGuard<'e> {
    params: Option<&'e Predicate>,
    query: Option<&'e Predicate>,
    body: Option<&'e Predicate>,
}

impl<'e> RequestGuard<'e> {
    /// Resolve the sub-validators of `type_name`.
    ///
    /// Unknown types and undeclared channels resolve to no validator.
    pub fn for_type(engine: &'e Engine, type_name: &str) -> Self {
        let lookup = move |field| engine.get_schema(&registry_key(type_name, Some(field)));
        Self {
            params: lookup(RequestField::Params),
            query: lookup(RequestField::Query),
            body: lookup(RequestField::Body),
        }
    }

    fn validator(&self, field: RequestField) -> Option<&'e Predicate> {
        match field {
            RequestField::Params => self.params,
            RequestField::Query => self.query,
            RequestField::Body => self.body,
        }
    }

    /// Validate each present channel in order; the first failure is returned
    /// through `ctx.throw` with status 400.
    pub fn guard<C: RequestContext>(&self, ctx: &C) -> Result<RequestData, C::Error> {
        let mut data = RequestData::default();
        for field in REQUEST_FIELDS {
            let value = match field {
                RequestField::Params => ctx.params(),
                RequestField::Query => ctx.query(),
                RequestField::Body => ctx.body(),
            };
            if let (Some(validator), Some(value)) = (self.validator(field), value) {
                if let Err(errors) = validator.check(value) {
                    let errors = filter_conditional(errors);
                    tracing::debug!(field = field.as_str(), "request rejected");
                    let message = format!(
                        "Invalid request: {}\n\n{}",
                        errors_text(&errors, field.as_str()),
                        inspect(&json!({
                            "params": ctx.params(),
                            "query": ctx.query(),
                            "body": ctx.body(),
                        }))
                    );
                    return Err(ctx.throw(BAD_REQUEST, message));
                }
            }
            let slot = match field {
                RequestField::Params => &mut data.params,
                RequestField::Query => &mut data.query,
                RequestField::Body => &mut data.body,
            };
            *slot = value.cloned();
        }
        Ok(data)
    }
}

/// A request whose error carries the status and message, for hosts without
/// their own context type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct JsonRequest {
    pub request: Option<RequestPayload>,
    pub params: Option<Value>,
    pub query: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RequestPayload {
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct Rejection {
    pub status: u16,
    pub message: String,
}

impl JsonRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.request = Some(RequestPayload { body: Some(body) });
        self
    }
}

impl RequestContext for JsonRequest {
    type Error = Rejection;

    fn params(&self) -> Option<&Value> {
        self.params.as_ref()
    }

    fn query(&self) -> Option<&Value> {
        self.query.as_ref()
    }

    fn body(&self) -> Option<&Value> {
        self.request.as_ref().and_then(|request| request.body.as_ref())
    }

    fn throw(&self, status: u16, message: String) -> Rejection {
        Rejection { status, message }
    }
}
