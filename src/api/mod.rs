// HTTP routing layer for the user service

use std::any::Any;
use std::time::Duration;

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, header::AUTHORIZATION},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::operations::{Operation, OperationRequest, Outcome, UserService};
use crate::types::UserId;
use crate::validation::parse_payload;


/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct ApiState {
    pub service: UserService,
    pub unavailable_delay: Duration,
}

impl ApiState {
    pub fn new(service: UserService, unavailable_delay: Duration) -> Self {
        Self {
            service,
            unavailable_delay,
        }
    }
}

pub fn create_router(state: ApiState) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/usuarios", post(create_user))
        .route(
            "/usuarios/{id}",
            get(read_user).put(update_user).delete(delete_user),
        )
        .route("/prohibido", get(forbidden))
        .route("/solo_get", get(only_get))
        .route("/error_interno", get(forced_error))
        .route("/servicio_no_disponible", get(service_unavailable))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed);

    with_middleware(router).with_state(state)
}

/// Tracing, CORS and panic recovery shared by every route.
fn with_middleware<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(CatchPanicLayer::custom(handle_panic)),
    )
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Outcome::Created(user) => serde_json::json!({
                "mensaje": "Usuario creado correctamente",
                "usuario": user,
            }),
            Outcome::Found(user) => serde_json::json!(user),
            Outcome::Updated(user) => serde_json::json!({
                "mensaje": "Usuario actualizado correctamente",
                "usuario": user,
            }),
            Outcome::Deleted(_) => serde_json::json!({
                "mensaje": "Usuario eliminado correctamente",
            }),
        };
        (status, Json(body)).into_response()
    }
}

/// Build an operation request carrying the raw `Authorization` header.
///
/// Header bytes that are not valid UTF-8 are decoded lossily, which can never
/// equal an allow-listed token.
fn operation_request(headers: &HeaderMap, operation: Operation) -> OperationRequest {
    OperationRequest {
        authorization: headers
            .get(AUTHORIZATION)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned()),
        operation,
    }
}

async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn create_user(State(state): State<ApiState>, body: Bytes) -> Result<Outcome, ApiError> {
    let operation = Operation::Create {
        payload: parse_payload(&body),
    };
    state
        .service
        .dispatch(OperationRequest::new(operation))
        .await
}

async fn read_user(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Outcome, ApiError> {
    let operation = Operation::Read {
        id: UserId::new(id),
    };
    state
        .service
        .dispatch(operation_request(&headers, operation))
        .await
}

async fn update_user(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Outcome, ApiError> {
    let operation = Operation::Update {
        id: UserId::new(id),
        payload: parse_payload(&body),
    };
    state
        .service
        .dispatch(operation_request(&headers, operation))
        .await
}

async fn delete_user(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Outcome, ApiError> {
    let operation = Operation::Delete {
        id: UserId::new(id),
    };
    state
        .service
        .dispatch(operation_request(&headers, operation))
        .await
}

async fn forbidden() -> ApiError {
    ApiError::Forbidden
}

async fn only_get() -> Json<Value> {
    Json(serde_json::json!({ "mensaje": "Método permitido" }))
}

async fn forced_error() -> Result<Json<Value>, ApiError> {
    Err(anyhow::anyhow!("Simulated server failure on /error_interno"))?
}

/// Stall for the configured delay, then report the service as offline.
async fn service_unavailable(State(state): State<ApiState>) -> ApiError {
    tokio::time::sleep(state.unavailable_delay).await;
    ApiError::ServiceUnavailable
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Render a handler panic as the generic internal error.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Internal(format!("panic: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_handle_panic_hides_detail() {
        let response = handle_panic(Box::new("secret internal state"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], crate::error::INTERNAL_ERROR_MESSAGE);
        assert_eq!(body["kind"], "internal");
        assert!(!String::from_utf8_lossy(&bytes).contains("secret"));
    }

    #[test]
    fn test_operation_request_keeps_header_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer admin_token".parse().unwrap());

        let request = operation_request(
            &headers,
            Operation::Read {
                id: UserId::new("x"),
            },
        );
        assert_eq!(request.authorization.as_deref(), Some("Bearer admin_token"));
    }

    #[test]
    fn test_outcome_status() {
        let user = crate::store::User {
            id: UserId::generate(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        };
        assert_eq!(
            Outcome::Created(user.clone()).into_response().status(),
            StatusCode::CREATED
        );
        assert_eq!(
            Outcome::Deleted(user.id).into_response().status(),
            StatusCode::OK
        );
    }
}
