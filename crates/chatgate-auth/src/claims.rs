//! Identity claims carried by a verified credential.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

/// Decoded payload of a verified access token.
///
/// Only `sub` and `role` are interpreted by the pipeline. Every other field
/// the issuer put in the token is kept in `extra` so handlers can read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (subject claim). Older issuers call it `id` and may issue it
    /// as a number; it is kept as its decimal string.
    #[serde(alias = "id", deserialize_with = "string_or_number")]
    pub sub: String,
    /// Role used for route-level authorization
    pub role: String,
    /// Token issued-at timestamp (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    /// Token expiration timestamp (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn new(sub: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            role: role.into(),
            iat: None,
            exp: None,
            extra: Map::new(),
        }
    }

    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(subject) => Ok(subject),
        Value::Number(subject) => Ok(subject.to_string()),
        other => Err(de::Error::custom(format!(
            "subject must be a string or a number, got {}",
            other
        ))),
    }
}
