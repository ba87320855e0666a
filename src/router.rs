use axum::{Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;

use crate::logging::logging_middleware;
use crate::middleware::{handle_panic, not_found};
use crate::routes::init_routes;
use crate::state::AppState;

/// Wraps `routes` with the pieces every request goes through: the 404
/// fallback, panic capture and request logging.
///
/// A known path called with an unrouted method is a 404 like any other
/// unmatched route.
pub fn compose(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(logging_middleware))
}

pub fn init_router(state: AppState) -> Router {
    compose(init_routes(&state), state)
}
