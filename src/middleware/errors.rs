//! Router-level error normalization: unmatched routes and panics.

use std::any::Any;

use axum::{
    extract::OriginalUri,
    response::{IntoResponse, Response},
};

use chatgate_core::AppError;

/// Router fallback. Reports the URL exactly as the client sent it.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(uri.to_string())
}

/// Panic handler for `CatchPanicLayer::custom`.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::internal_error(format!("panic in request pipeline: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chatgate_core::ErrorKind;

    #[test]
    fn test_panic_payloads_render_as_internal() {
        let payloads: Vec<Box<dyn Any + Send>> = vec![
            Box::new("boom"),
            Box::new(String::from("boom")),
            Box::new(42_u8),
        ];
        for payload in payloads {
            let response = handle_panic(payload);
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                response.extensions().get::<ErrorKind>(),
                Some(&ErrorKind::InternalError)
            );
        }
    }
}
