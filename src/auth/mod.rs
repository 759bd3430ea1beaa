//! Token-based access gating.
//!
//! Protected operations are guarded by a static allow-list of tokens:
//!
//! - The raw `Authorization` header value must equal an allow-listed token
//!   verbatim (no `Bearer ` scheme is stripped)
//! - Every recognized token grants the same access
//! - Tokens never expire and are not configurable at runtime
//!
//! ## Usage
//!
//! ```ignore
//! let gate = AuthGate::new(TokenAllowList::builtin());
//! let identity = gate.authorize(headers.get("Authorization"))?;
//! ```

mod allow_list;
mod gate;

pub use allow_list::{BUILTIN_TOKENS, TokenAllowList};
pub use gate::{AuthError, AuthGate};
