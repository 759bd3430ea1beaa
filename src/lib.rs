// Core modules
mod config;
pub mod error;
pub mod types;
pub mod validation;
pub mod store;
pub mod auth;
pub mod operations;

// HTTP surface
pub mod api;
pub mod server;

// Re-export key types and functions
pub use auth::{AuthError, AuthGate, TokenAllowList};
pub use config::{ServiceConfig, load_config, resolve_config_path};
pub use error::{ApiError, ApiResult};
pub use operations::{Operation, OperationRequest, Outcome, UserService};
pub use store::{User, UserStore, UserUpdate};
pub use types::{AuthToken, IdentityLabel, UserId};
pub use validation::{ValidationError, validate_creation_payload, validate_email};
