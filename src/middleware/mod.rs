//! Request pipeline stages.
//!
//! A route is protected by wrapping it in stages that run, in order:
//!
//! 1. [`auth`]: credential extraction, verification and the role check
//! 2. [`validate`]: schema validation of `{ body, query, params, cookies }`
//! 3. the handler
//!
//! Each stage either forwards the request or short-circuits with an
//! [`AppError`](chatgate_core::AppError), which renders the uniform error
//! body. [`errors`] covers failures that happen outside any route.
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::{PipelineExt, Stages, authorize, validate};
//!
//! let channels = Router::new()
//!     .route("/channels", post(create_channel))
//!     .stages(
//!         Stages::new()
//!             .authorize(authorize(&state, ["admin"]))
//!             .validate(validate(ValidatorSchema::<CreateChannel>::new())),
//!     );
//! ```
//!
//! Stages are `route_layer`s, so they must be added after the routes they
//! protect and never run for unmatched paths.

pub mod auth;
pub mod errors;
pub mod role;
pub mod validate;

use axum::{Router, middleware, routing::MethodRouter};

pub use auth::{Authorize, Identity, IdentityContext, authorize};
pub use errors::{handle_panic, not_found};
pub use role::{RequiredRoles, check_any_role, check_role};
pub use validate::{Validate, ValidatedInput, validate};

/// The stages protecting one route, applied in pipeline order whatever order
/// they were declared in.
#[derive(Debug, Clone, Default)]
pub struct Stages {
    authorize: Option<Authorize>,
    validate: Option<Validate>,
}

impl Stages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authorize(mut self, stage: Authorize) -> Self {
        self.authorize = Some(stage);
        self
    }

    pub fn validate(mut self, stage: Validate) -> Self {
        self.validate = Some(stage);
        self
    }
}

/// Attaches pipeline stages to routers and method routers.
///
/// The last layer added runs first. Prefer [`PipelineExt::stages`]; when
/// calling [`PipelineExt::authorize`] and [`PipelineExt::validate`] directly,
/// call `validate` first.
pub trait PipelineExt: Sized {
    fn authorize(self, stage: Authorize) -> Self;

    fn validate(self, stage: Validate) -> Self;

    fn stages(self, stages: Stages) -> Self {
        let mut this = self;
        if let Some(stage) = stages.validate {
            this = this.validate(stage);
        }
        if let Some(stage) = stages.authorize {
            this = this.authorize(stage);
        }
        this
    }
}

impl<S> PipelineExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn authorize(self, stage: Authorize) -> Self {
        self.route_layer(middleware::from_fn_with_state(
            stage,
            auth::authorize_middleware,
        ))
    }

    fn validate(self, stage: Validate) -> Self {
        self.route_layer(middleware::from_fn_with_state(
            stage,
            validate::validate_middleware,
        ))
    }
}

impl<S> PipelineExt for MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn authorize(self, stage: Authorize) -> Self {
        self.route_layer(middleware::from_fn_with_state(
            stage,
            auth::authorize_middleware,
        ))
    }

    fn validate(self, stage: Validate) -> Self {
        self.route_layer(middleware::from_fn_with_state(
            stage,
            validate::validate_middleware,
        ))
    }
}
