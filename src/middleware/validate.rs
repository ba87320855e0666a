//! Validation stage: builds the `{ body, query, params, cookies }` candidate,
//! runs the route's schema against it and forwards the coerced request.
//!
//! ```rust,ignore
//! #[derive(Debug, Serialize, Deserialize, Validate)]
//! struct CreateChannel {
//!     #[validate(nested)]
//!     body: CreateChannelBody,
//! }
//!
//! let routes = Router::new()
//!     .route("/channels", post(create_channel))
//!     .validate(validate(ValidatorSchema::<CreateChannel>::new()));
//! ```
//!
//! Bodies are read as JSON. An empty body is presented to the schema as
//! `null`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    extract::{FromRequestParts, Query, RawPathParams, Request, State},
    http::{HeaderValue, header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use chatgate_core::{
    AppError, ErrorMessage, RequestCandidate, RequestSchema, SchemaError, merge_json,
};

/// Largest body the stage will buffer.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// The validation stage for one route.
#[derive(Clone)]
pub struct Validate {
    schema: Arc<dyn RequestSchema>,
    body_limit: usize,
}

impl Validate {
    pub fn new<S: RequestSchema>(schema: S) -> Self {
        Self {
            schema: Arc::new(schema),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}

impl fmt::Debug for Validate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validate")
            .field("body_limit", &self.body_limit)
            .finish_non_exhaustive()
    }
}

pub fn validate<S: RequestSchema>(schema: S) -> Validate {
    Validate::new(schema)
}

/// The candidate as the schema returned it, for handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput(pub RequestCandidate);

impl ValidatedInput {
    /// Deserializes the validated body into a handler DTO.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        Ok(serde_json::from_value(self.0.body.clone())?)
    }

    pub fn query(&self, key: &str) -> Option<&Value> {
        self.0.query.get(key)
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.0.params.get(key)
    }
}

impl<S> FromRequestParts<S> for ValidatedInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ValidatedInput>()
            .cloned()
            .ok_or_else(|| AppError::internal_error("ValidatedInput read on a route without validation"))
    }
}

pub async fn validate_middleware(
    State(stage): State<Validate>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let bytes = to_bytes(body, stage.body_limit).await.map_err(|err| {
        tracing::debug!(error = %err, "failed to read request body");
        AppError::validation(vec![ErrorMessage::new("body", "Request body is too large or could not be read")])
    })?;

    let original_body = parse_body(&bytes)?;

    let candidate = RequestCandidate {
        body: original_body.clone(),
        query: query_map(&parts),
        params: path_params(&mut parts).await,
        cookies: cookie_map(&parts),
    };

    let validated = match stage.schema.evaluate(candidate).await {
        Ok(validated) => validated,
        Err(SchemaError::Invalid(entries)) => {
            tracing::debug!(violations = entries.len(), "request failed validation");
            return Err(AppError::validation(entries));
        }
        Err(SchemaError::Fault(err)) => return Err(AppError::internal(err)),
    };

    let merged = merge_json(original_body.clone(), validated.body.clone());

    let body = if original_body.is_null() || merged == original_body {
        Body::from(bytes)
    } else {
        let rewritten = serde_json::to_vec(&merged)?;
        parts
            .headers
            .insert(header::CONTENT_LENGTH, HeaderValue::from(rewritten.len()));
        Body::from(rewritten)
    };

    parts.extensions.insert(ValidatedInput(validated));

    Ok(next.run(Request::from_parts(parts, body)).await)
}

fn parse_body(bytes: &[u8]) -> Result<Value, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(bytes).map_err(|err| {
        tracing::debug!(error = %err, "request body is not valid JSON");
        AppError::validation(vec![ErrorMessage::new("body", "Invalid JSON body")])
    })
}

fn query_map(parts: &Parts) -> Map<String, Value> {
    Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(query)| strings_to_map(query))
        .unwrap_or_default()
}

async fn path_params(parts: &mut Parts) -> Map<String, Value> {
    match RawPathParams::from_request_parts(parts, &()).await {
        Ok(params) => params
            .iter()
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect(),
        Err(_) => Map::new(),
    }
}

fn cookie_map(parts: &Parts) -> Map<String, Value> {
    CookieJar::from_headers(&parts.headers)
        .iter()
        .map(|cookie| {
            (
                cookie.name().to_string(),
                Value::String(cookie.value().to_string()),
            )
        })
        .collect()
}

fn strings_to_map(values: HashMap<String, String>) -> Map<String, Value> {
    values
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}
