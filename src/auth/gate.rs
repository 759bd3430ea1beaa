//! Authorization check run before protected operations.

use std::fmt;

use tracing::{debug, warn};

use crate::auth::allow_list::TokenAllowList;
use crate::types::IdentityLabel;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header, or an empty one
    MissingToken,
    /// Header present but not on the allow-list
    InvalidToken,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken => write!(f, "No se envio token de autenticacion"),
            Self::InvalidToken => write!(f, "Token inválido"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Gate that admits requests carrying an allow-listed token.
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    allow_list: TokenAllowList,
}

impl AuthGate {
    /// Create a gate over the given allow-list.
    pub fn new(allow_list: TokenAllowList) -> Self {
        Self { allow_list }
    }

    /// Check the raw `Authorization` header value.
    ///
    /// The value is compared verbatim; a `Bearer ` prefix is not stripped.
    /// Returns the identity the token maps to.
    pub fn authorize(&self, authorization: Option<&str>) -> Result<IdentityLabel, AuthError> {
        let token = authorization
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        match self.allow_list.identity_for(token) {
            Some(identity) => {
                debug!("Request authorized as {}", identity);
                Ok(identity.clone())
            }
            None => {
                warn!("Rejected request with unrecognized token");
                Err(AuthError::InvalidToken)
            }
        }
    }
}
