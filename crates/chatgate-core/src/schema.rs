//! Request schemas evaluated by the validation stage.
//!
//! The pipeline only knows the [`RequestSchema`] capability: hand it the
//! composite [`RequestCandidate`] and get back either a (possibly coerced)
//! candidate or a list of field violations. [`ValidatorSchema`] adapts any
//! `validator::Validate` type into that capability.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::errors::ErrorMessage;

/// Everything a schema may look at: `{ body, query, params, cookies }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestCandidate {
    pub body: Value,
    pub query: Map<String, Value>,
    pub params: Map<String, Value>,
    pub cookies: Map<String, Value>,
}

impl RequestCandidate {
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "body": self.body,
            "query": self.query,
            "params": self.params,
            "cookies": self.cookies,
        })
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    /// The candidate does not satisfy the schema.
    #[error("request failed validation ({} violations)", .0.len())]
    Invalid(Vec<ErrorMessage>),
    /// The evaluator itself broke (a lookup store was unreachable, ...).
    #[error("schema evaluation failed: {0}")]
    Fault(anyhow::Error),
}

impl SchemaError {
    pub fn field(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid(vec![ErrorMessage::new(path, message)])
    }
}

#[async_trait]
pub trait RequestSchema: Send + Sync + 'static {
    async fn evaluate(&self, candidate: RequestCandidate) -> Result<RequestCandidate, SchemaError>;
}

#[async_trait]
impl<S> RequestSchema for Arc<S>
where
    S: RequestSchema + ?Sized,
{
    async fn evaluate(&self, candidate: RequestCandidate) -> Result<RequestCandidate, SchemaError> {
        (**self).evaluate(candidate).await
    }
}

/// Async check run after structural validation succeeded.
#[async_trait]
pub trait Refinement<T>: Send + Sync {
    async fn refine(&self, value: &T) -> Result<(), SchemaError>;
}

/// Schema backed by a `validator`-annotated type.
///
/// `T` mirrors the candidate layout, usually with `#[validate(nested)]`
/// members named `body`, `query`, `params` and `cookies`. Members `T` leaves
/// out are not checked. Whatever `T` serializes back to becomes the coerced
/// candidate, so serde defaults and conversions act as normalisation.
pub struct ValidatorSchema<T> {
    refinements: Vec<Arc<dyn Refinement<T>>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ValidatorSchema<T> {
    pub fn new() -> Self {
        Self {
            refinements: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn with_refinement<R>(mut self, refinement: R) -> Self
    where
        R: Refinement<T> + 'static,
    {
        self.refinements.push(Arc::new(refinement));
        self
    }
}

impl<T> Default for ValidatorSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ValidatorSchema<T> {
    fn clone(&self) -> Self {
        Self {
            refinements: self.refinements.clone(),
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T> RequestSchema for ValidatorSchema<T>
where
    T: DeserializeOwned + Serialize + Validate + Send + Sync + 'static,
{
    async fn evaluate(&self, candidate: RequestCandidate) -> Result<RequestCandidate, SchemaError> {
        let value: T = serde_path_to_error::deserialize(candidate.to_value())
            .map_err(|err| SchemaError::Invalid(vec![deserialize_error(&err)]))?;

        value
            .validate()
            .map_err(|errors| SchemaError::Invalid(flatten_errors(&errors)))?;

        for refinement in &self.refinements {
            refinement.refine(&value).await?;
        }

        let coerced = serde_json::to_value(&value).map_err(|e| SchemaError::Fault(e.into()))?;
        let out: RequestCandidate =
            serde_json::from_value(coerced).map_err(|e| SchemaError::Fault(e.into()))?;

        // Keys the schema does not model pass through as they came in.
        Ok(RequestCandidate {
            body: out.body,
            query: merge_map(candidate.query, out.query),
            params: merge_map(candidate.params, out.params),
            cookies: merge_map(candidate.cookies, out.cookies),
        })
    }
}

/// Turns a serde failure into a field entry located at the failing path
/// (`body.name`, `body.members[0].id`).
fn deserialize_error(err: &serde_path_to_error::Error<serde_json::Error>) -> ErrorMessage {
    let path = match err.path().to_string() {
        root if root == "." => String::new(),
        path => path,
    };
    let inner = err.inner().to_string();

    // A missing field fails at its parent; the field itself is only named
    // in serde's message.
    match missing_field(&inner) {
        Some(field) => ErrorMessage::new(join_path(&path, field), format!("{} is required", field)),
        None => ErrorMessage::new(path, inner),
    }
}

fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// Overlays `coerced` on `original`.
///
/// Objects merge key by key and arrays of equal length element by element,
/// so keys the schema never mentioned keep their original value at any
/// depth. A `null` the schema produced for an absent key is not added, and a
/// `null` in place of a value keeps the original.
pub fn merge_json(original: Value, coerced: Value) -> Value {
    match (original, coerced) {
        (Value::Object(original), Value::Object(coerced)) => {
            Value::Object(merge_map(original, coerced))
        }
        (Value::Array(original), Value::Array(coerced)) if original.len() == coerced.len() => {
            Value::Array(
                original
                    .into_iter()
                    .zip(coerced)
                    .map(|(original, coerced)| merge_json(original, coerced))
                    .collect(),
            )
        }
        (original, Value::Null) => original,
        (_, coerced) => coerced,
    }
}

/// [`merge_json`] for the members of one object.
pub fn merge_map(mut original: Map<String, Value>, coerced: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in coerced {
        if value.is_null() && !original.contains_key(&key) {
            continue;
        }
        let merged = match original.remove(&key) {
            Some(previous) => merge_json(previous, value),
            None => value,
        };
        original.insert(key, merged);
    }
    original
}

/// Flattens nested `validator` errors into dotted paths
/// (`body.email`, `body.members[2].id`), sorted by path.
pub fn flatten_errors(errors: &ValidationErrors) -> Vec<ErrorMessage> {
    let mut out = Vec::new();
    collect(String::new(), errors, &mut out);
    out.sort_by(|a, b| a.path.cmp(&b.path));
    out
}

fn collect(prefix: String, errors: &ValidationErrors, out: &mut Vec<ErrorMessage>) {
    for (field, kind) in errors.errors() {
        let path = if field == "__all__" {
            prefix.clone()
        } else if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push(ErrorMessage::new(path.clone(), message_for(field, error)));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

fn message_for(field: &str, error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|msg| msg.to_string())
        .unwrap_or_else(|| format!("{} is invalid", field))
}
