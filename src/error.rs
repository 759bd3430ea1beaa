//! Error taxonomy at the request boundary.
//!
//! Components return their own error enums (`ValidationError`, `AuthError`);
//! they are folded into `ApiError` here and translated to an HTTP status and
//! a `{"error", "kind"}` JSON body.

use std::fmt;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::auth::AuthError;
use crate::validation::ValidationError;

/// Message returned for any internal failure. Diagnostic detail is only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor";

/// Errors that can surface from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Required fields missing or the payload is unparseable.
    IncompleteData,
    /// Email present but malformed.
    InvalidEmailFormat,
    /// Email already bound to a live user.
    DuplicateEmail,
    /// No live user with the referenced id.
    NotFound,
    /// No token supplied.
    MissingToken,
    /// Token not on the allow-list.
    InvalidToken,
    /// Caller may never access the resource.
    Forbidden,
    /// Path exists but does not accept the method.
    MethodNotAllowed,
    /// No route matches the path.
    RouteNotFound,
    /// The service is temporarily offline.
    ServiceUnavailable,
    /// Unexpected failure. The detail is logged, never sent to the caller.
    Internal(String),
}

impl ApiError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IncompleteData => "incomplete_data",
            Self::InvalidEmailFormat => "invalid_email_format",
            Self::DuplicateEmail => "duplicate_email",
            Self::NotFound => "not_found",
            Self::MissingToken => "missing_token",
            Self::InvalidToken => "invalid_token",
            Self::Forbidden => "forbidden",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::RouteNotFound => "route_not_found",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Internal(_) => "internal",
        }
    }

    /// Transport status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::IncompleteData => StatusCode::BAD_REQUEST,
            Self::InvalidEmailFormat => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DuplicateEmail => StatusCode::CONFLICT,
            Self::NotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::MissingToken | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Create an internal error carrying a diagnostic detail.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompleteData => write!(f, "{}", ValidationError::IncompleteData),
            Self::InvalidEmailFormat => write!(f, "{}", ValidationError::InvalidEmailFormat),
            Self::DuplicateEmail => write!(f, "Usuario con ese email ya existe"),
            Self::NotFound => write!(f, "Usuario no encontrado"),
            Self::MissingToken => write!(f, "{}", AuthError::MissingToken),
            Self::InvalidToken => write!(f, "{}", AuthError::InvalidToken),
            Self::Forbidden => write!(f, "No tienes permisos para acceder a este recurso"),
            Self::MethodNotAllowed => write!(f, "Método HTTP no permitido en este endpoint"),
            Self::RouteNotFound => write!(f, "Recurso no encontrado"),
            Self::ServiceUnavailable => write!(f, "Servicio no disponible temporalmente"),
            Self::Internal(_) => write!(f, "{}", INTERNAL_ERROR_MESSAGE),
        }
    }
}

impl std::error::Error for ApiError {}

/// Result type for service operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::IncompleteData => Self::IncompleteData,
            ValidationError::InvalidEmailFormat => Self::InvalidEmailFormat,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => Self::MissingToken,
            AuthError::InvalidToken => Self::InvalidToken,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{:#}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!("Internal error: {}", detail);
        }

        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::IncompleteData.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidEmailFormat.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::DuplicateEmail.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_component_errors_convert() {
        assert_eq!(
            ApiError::from(ValidationError::InvalidEmailFormat),
            ApiError::InvalidEmailFormat
        );
        assert_eq!(ApiError::from(AuthError::MissingToken), ApiError::MissingToken);
        assert_eq!(ApiError::from(AuthError::InvalidToken).kind(), "invalid_token");
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err = ApiError::from(anyhow::anyhow!("connection pool exhausted"));
        assert_eq!(err.kind(), "internal");
        assert_eq!(err.to_string(), INTERNAL_ERROR_MESSAGE);
        assert!(!err.to_string().contains("pool"));
    }
}
