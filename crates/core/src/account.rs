//! Account handles (`user@domain`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Human-readable account reference: local part plus home domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountHandle {
    pub local: String,
    pub domain: String,
}

impl AccountHandle {
    /// Builds a handle from a local part (`alice` or `@alice`) and a domain.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidHandle`] when either part is empty or contains
    /// characters that cannot appear in an `acct` URI.
    pub fn new(local: &str, domain: &str) -> Result<Self, CoreError> {
        let local = local.trim().trim_start_matches('@');
        let domain = domain.trim().trim_end_matches('/');
        if !is_valid_part(local) || !is_valid_part(domain) {
            return Err(CoreError::InvalidHandle(format!("{local}@{domain}")));
        }
        Ok(Self { local: local.to_owned(), domain: domain.to_lowercase() })
    }

    /// Parses `user`, `@user@domain` or `user@domain`; a bare `user` takes
    /// `default_domain`.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidHandle`] for malformed input.
    pub fn parse_with_default(raw: &str, default_domain: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim().trim_start_matches('@');
        match trimmed.split_once('@') {
            Some((local, domain)) => Self::new(local, domain),
            None => Self::new(trimmed, default_domain),
        }
    }
}

fn is_valid_part(part: &str) -> bool {
    !part.is_empty() && !part.contains(['@', '/', ' ', '?', '#'])
}

impl FromStr for AccountHandle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('@');
        let (local, domain) = trimmed
            .split_once('@')
            .ok_or_else(|| CoreError::InvalidHandle(s.to_owned()))?;
        Self::new(local, domain)
    }
}

impl fmt::Display for AccountHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_handle() {
        let h: AccountHandle = "@alice@Social.Example".parse().unwrap();
        assert_eq!(h.local, "alice");
        assert_eq!(h.domain, "social.example");
        assert_eq!(h.to_string(), "alice@social.example");
    }

    #[test]
    fn test_parse_without_leading_at() {
        let h: AccountHandle = "bob@example.org".parse().unwrap();
        assert_eq!(h.to_string(), "bob@example.org");
    }

    #[test]
    fn test_bare_local_part_requires_domain() {
        assert!("alice".parse::<AccountHandle>().is_err());
        let h = AccountHandle::parse_with_default("alice", "target.example").unwrap();
        assert_eq!(h.to_string(), "alice@target.example");
    }

    #[test]
    fn test_parse_with_default_keeps_explicit_domain() {
        let h = AccountHandle::parse_with_default("@carol@other.example", "target.example").unwrap();
        assert_eq!(h.domain, "other.example");
    }

    #[test]
    fn test_rejects_empty_parts() {
        assert!(AccountHandle::new("", "example.org").is_err());
        assert!(AccountHandle::new("alice", "").is_err());
        assert!("@@example.org".parse::<AccountHandle>().is_err());
    }

    #[test]
    fn test_rejects_extra_at_sign() {
        assert!("alice@example.org@evil.example".parse::<AccountHandle>().is_err());
    }
}
