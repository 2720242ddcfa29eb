use async_graphql::*;

use folio::errors::{CoreError, CoreErrorKind};

/// Structured error builder for failures raised at the GraphQL edge
pub struct StructuredError;

impl StructuredError {
    /// Create a "bad request" error
    pub fn bad_request(message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "BAD_REQUEST");
        })
    }

    /// Create an "internal error"
    pub fn internal(message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "INTERNAL_ERROR");
        })
    }
}

fn error_code(kind: CoreErrorKind) -> &'static str {
    match kind {
        CoreErrorKind::NotFound => "NOT_FOUND",
        CoreErrorKind::Validation => "VALIDATION_FAILED",
        CoreErrorKind::Conflict => "CONFLICT",
        CoreErrorKind::Forbidden => "FORBIDDEN",
        CoreErrorKind::Unauthorized => "UNAUTHORIZED",
        CoreErrorKind::Unavailable => "SERVICE_ERROR",
        CoreErrorKind::Internal => "INTERNAL_ERROR",
    }
}

/// Maps an unexpected core failure onto a GraphQL error with a `code`
/// extension plus any structured fields the error carries.
pub fn core_error_to_graphql_error(error: CoreError) -> Error {
    tracing::error!("Resolver failed: {}", error);

    let code = error_code(error.kind());
    let fields = error.fields().cloned().unwrap_or_default();
    Error::new(error.message().to_string()).extend_with(move |_, e| {
        e.set("code", code);
        for (key, value) in &fields {
            e.set(key.as_str(), value.as_str());
        }
    })
}
