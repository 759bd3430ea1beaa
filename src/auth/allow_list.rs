//! Compiled-in token table.

use std::collections::HashMap;

use crate::types::{AuthToken, IdentityLabel};

/// Tokens accepted by the default gate, paired with the identity they name.
pub const BUILTIN_TOKENS: &[(&str, &str)] = &[("admin_token", "admin")];

/// Fixed mapping from accepted tokens to identity labels.
#[derive(Debug, Clone)]
pub struct TokenAllowList {
    entries: HashMap<AuthToken, IdentityLabel>,
}

impl TokenAllowList {
    /// The allow-list shipped with the service.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_TOKENS.iter().copied())
    }

    /// Build an allow-list from `(token, identity)` pairs.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(token, label)| (AuthToken::new(token), IdentityLabel::new(label)))
                .collect(),
        }
    }

    /// Identity for `token`, if it is allow-listed. Exact, case-sensitive match.
    pub fn identity_for(&self, token: &str) -> Option<&IdentityLabel> {
        self.entries.get(token)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TokenAllowList {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_allow_list() {
        let list = TokenAllowList::builtin();
        assert_eq!(list.len(), 1);
        assert_eq!(
            list.identity_for("admin_token").map(IdentityLabel::as_str),
            Some("admin")
        );
    }

    #[test]
    fn test_lookup_is_exact() {
        let list = TokenAllowList::builtin();
        assert!(list.identity_for("Admin_Token").is_none());
        assert!(list.identity_for("Bearer admin_token").is_none());
        assert!(list.identity_for(" admin_token").is_none());
        assert!(list.identity_for("").is_none());
    }

    #[test]
    fn test_from_entries() {
        let list = TokenAllowList::from_entries([("t1", "alice"), ("t2", "bob")]);
        assert_eq!(list.identity_for("t2").map(|l| l.as_str()), Some("bob"));
        assert!(!list.is_empty());
    }
}
