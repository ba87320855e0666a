//! Authorization stage: credential → verified claims → role check.
//!
//! ```rust,ignore
//! use crate::middleware::{PipelineExt, Stages, authorize};
//!
//! let admin_routes = Router::new()
//!     .route("/tenants", post(create_tenant))
//!     .stages(Stages::new().authorize(authorize(&state, ["admin", "super_admin"])));
//! ```
//!
//! On success the verified [`Claims`] are stored in the request extensions
//! as an [`IdentityContext`]; handlers read them with the [`Identity`]
//! extractor.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use chatgate_auth::{Claims, extract_credential, verify_token};
use chatgate_config::JwtConfig;
use chatgate_core::AppError;

use crate::middleware::role::RequiredRoles;
use crate::state::AppState;

pub const UNAUTHORIZED_MESSAGE: &str = "You are not authorized";

/// Verified claims attached to the in-flight request.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityContext(pub Claims);

/// The authorization stage for one route: secret + required roles.
#[derive(Debug, Clone)]
pub struct Authorize {
    jwt_config: JwtConfig,
    required_roles: RequiredRoles,
}

impl Authorize {
    pub fn new(jwt_config: JwtConfig, required_roles: RequiredRoles) -> Self {
        Self {
            jwt_config,
            required_roles,
        }
    }

    pub fn required_roles(&self) -> &RequiredRoles {
        &self.required_roles
    }

    /// Runs the stage against a raw `authorization` header value.
    ///
    /// Missing or unverifiable credentials fail with `Unauthorized`, a role
    /// outside the required set with `Forbidden`.
    pub fn check(&self, header_value: Option<&str>) -> Result<Claims, AppError> {
        let token = extract_credential(header_value).map_err(|err| {
            tracing::debug!(error = %err, "no credential presented");
            AppError::unauthorized(UNAUTHORIZED_MESSAGE)
        })?;

        let claims = verify_token(token, &self.jwt_config).map_err(|err| {
            tracing::warn!(error = %err, "credential verification failed");
            AppError::unauthorized(UNAUTHORIZED_MESSAGE)
        })?;

        self.required_roles.check(&claims)?;

        Ok(claims)
    }
}

/// Builds the authorization stage for a route.
///
/// An empty `roles` list admits any authenticated caller.
pub fn authorize<I, R>(state: &AppState, roles: I) -> Authorize
where
    I: IntoIterator<Item = R>,
    R: Into<String>,
{
    Authorize::new(state.jwt_config.clone(), RequiredRoles::new(roles))
}

pub async fn authorize_middleware(
    State(stage): State<Authorize>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = stage.check(header_value)?;

    req.extensions_mut().insert(IdentityContext(claims));

    Ok(next.run(req).await)
}

/// Extractor giving handlers the identity attached by the authorization stage.
///
/// Rejects with `Unauthorized` when the route was not wrapped by the stage.
/// Use `Option<Identity>` on routes where authentication is optional.
#[derive(Debug, Clone)]
pub struct Identity(pub Claims);

impl Identity {
    pub fn user_id(&self) -> &str {
        &self.0.sub
    }

    pub fn role(&self) -> &str {
        &self.0.role
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.0.role == role
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// Any additional claim the issuer put in the token.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.0.claim(name)
    }

    pub fn claims(&self) -> &Claims {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityContext>()
            .map(|ctx| Identity(ctx.0.clone()))
            .ok_or_else(|| AppError::unauthorized(UNAUTHORIZED_MESSAGE))
    }
}

impl<S> OptionalFromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<IdentityContext>()
            .map(|ctx| Identity(ctx.0.clone())))
    }
}
