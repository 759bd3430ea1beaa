//! User lifecycle operations.
//!
//! Each operation is a short linear sequence: authorize (protected operations
//! only), validate, then read or mutate the store. The first failing step
//! decides the error, and authorization always runs before anything that
//! could reveal whether a user exists.

use std::sync::Arc;

use http::StatusCode;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::auth::AuthGate;
use crate::error::{ApiError, ApiResult};
use crate::store::{User, UserStore};
use crate::types::UserId;
use crate::validation::{
    Payload, validate_creation_payload, validate_email, validate_update_payload,
};

/// A single request against the user resource.
#[derive(Debug, Clone)]
pub enum Operation {
    Create { payload: Option<Payload> },
    Read { id: UserId },
    Update { id: UserId, payload: Option<Payload> },
    Delete { id: UserId },
}

impl Operation {
    /// Whether the operation must pass the auth gate first.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Create { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Read { .. } => "read",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

/// An operation together with the caller's raw `Authorization` value.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    pub authorization: Option<String>,
    pub operation: Operation,
}

impl OperationRequest {
    pub fn new(operation: Operation) -> Self {
        Self {
            authorization: None,
            operation,
        }
    }

    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = Some(authorization.into());
        self
    }
}

/// Successful result of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(User),
    Found(User),
    Updated(User),
    Deleted(UserId),
}

impl Outcome {
    /// Status classification handed to the transport layer.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Created(_) => StatusCode::CREATED,
            Self::Found(_) | Self::Updated(_) | Self::Deleted(_) => StatusCode::OK,
        }
    }
}

/// Owner of the user store and the auth gate.
///
/// Cloning is cheap and every clone shares the same store.
#[derive(Debug, Clone, Default)]
pub struct UserService {
    store: Arc<RwLock<UserStore>>,
    gate: AuthGate,
}

impl UserService {
    /// Create a service with an empty store behind `gate`.
    pub fn new(gate: AuthGate) -> Self {
        Self {
            store: Arc::new(RwLock::new(UserStore::new())),
            gate,
        }
    }

    /// Run the auth gate when the operation needs it, then the operation.
    pub async fn dispatch(&self, request: OperationRequest) -> ApiResult<Outcome> {
        let OperationRequest {
            authorization,
            operation,
        } = request;

        if operation.requires_auth() {
            self.gate.authorize(authorization.as_deref())?;
        }
        debug!("Dispatching {} operation", operation.name());

        match operation {
            Operation::Create { payload } => {
                self.create(payload.as_ref()).await.map(Outcome::Created)
            }
            Operation::Read { id } => self.read(&id).await.map(Outcome::Found),
            Operation::Update { id, payload } => self
                .update(&id, payload.as_ref())
                .await
                .map(Outcome::Updated),
            Operation::Delete { id } => {
                self.delete(&id).await?;
                Ok(Outcome::Deleted(id))
            }
        }
    }

    /// Register a new user from a `{name, email}` payload.
    pub async fn create(&self, payload: Option<&Payload>) -> ApiResult<User> {
        let new_user = validate_creation_payload(payload)?;
        if !validate_email(&new_user.email) {
            return Err(ApiError::InvalidEmailFormat);
        }

        // Uniqueness check and insert happen under one write guard.
        let mut store = self.store.write().await;
        if store.exists_email(&new_user.email) {
            return Err(ApiError::DuplicateEmail);
        }

        let user = User {
            id: UserId::generate(),
            name: new_user.name,
            email: new_user.email,
        };
        store.insert(user.clone());
        info!("Created user {}", user.id);

        Ok(user)
    }

    /// Fetch a user by id.
    pub async fn read(&self, id: &UserId) -> ApiResult<User> {
        let store = self.store.read().await;
        store.get(id).cloned().ok_or(ApiError::NotFound)
    }

    /// Overwrite the supplied fields of an existing user.
    ///
    /// Email uniqueness is not re-checked here, so an update may give two
    /// users the same address.
    pub async fn update(&self, id: &UserId, payload: Option<&Payload>) -> ApiResult<User> {
        let mut store = self.store.write().await;
        if store.get(id).is_none() {
            return Err(ApiError::NotFound);
        }

        let update = validate_update_payload(payload)?;
        let user = store
            .update(id, update)
            .cloned()
            .ok_or(ApiError::NotFound)?;
        info!("Updated user {}", user.id);

        Ok(user)
    }

    /// Remove a user. Its id is never handed out again.
    pub async fn delete(&self, id: &UserId) -> ApiResult<()> {
        let mut store = self.store.write().await;
        if !store.delete(id) {
            return Err(ApiError::NotFound);
        }
        info!("Deleted user {}", id);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn user_count(&self) -> usize {
        self.store.read().await.len()
    }
}
