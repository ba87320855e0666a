//! # Chatgate Core
//!
//! Core types shared by every stage of the chatgate request pipeline.
//!
//! - [`errors`]: the pipeline error taxonomy and its uniform HTTP rendering
//! - [`schema`]: the request-schema capability used by the validation stage
//!
//! # Example
//!
//! ```ignore
//! use chatgate_core::{AppError, ErrorMessage};
//!
//! let error = AppError::validation(vec![ErrorMessage::new("body.name", "name is required")]);
//! ```

pub mod errors;
pub mod schema;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorKind, ErrorMessage, ErrorResponse};
pub use schema::{
    Refinement, RequestCandidate, RequestSchema, SchemaError, ValidatorSchema, merge_json, merge_map,
};
