//! # Chatgate
//!
//! Request pipeline of a multi-tenant chat API. Every protected route runs
//! the same ordered stages before its handler:
//!
//! ```text
//! request ─► authorization ─► validation ─► handler
//!               │                 │
//!               └──── AppError ───┴──► { success: false, message, errorMessages }
//! ```
//!
//! - **Authorization**: reads the `authorization` header (`Bearer <jwt>` or a
//!   bare `<jwt>`), verifies it against the configured secret and checks the
//!   `role` claim against the route's required roles
//! - **Validation**: evaluates a schema against `{ body, query, params,
//!   cookies }` and forwards the coerced request
//! - **Errors**: every failure, unmatched route and panic renders the same
//!   JSON body with a status fixed by its kind
//!
//! ## Layout
//!
//! ```text
//! crates/
//! ├── chatgate-config/   # JwtConfig, ServerConfig loaded from env
//! ├── chatgate-core/     # AppError taxonomy, RequestSchema, ValidatorSchema
//! └── chatgate-auth/     # Claims, credential extraction, token verify/sign
//! src/
//! ├── middleware/        # authorize + validate stages, fallback, panics
//! ├── logging.rs         # tracing setup and request logging
//! ├── router.rs          # composes routes with the router-wide layers
//! ├── routes.rs          # /health and /api/v1/me
//! └── state.rs           # shared AppState
//! ```
//!
//! ## Environment Variables
//!
//! ```bash
//! JWT_SECRET=your-secure-secret-key   # required
//! JWT_LEEWAY_SECONDS=0
//! PORT=3000
//! LOG_LEVEL=info
//! LOG_FORMAT=json                     # optional
//! ```

pub mod logging;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;

// Re-export workspace crates for convenience
pub use chatgate_auth;
pub use chatgate_config;
pub use chatgate_core;
