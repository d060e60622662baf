//! Account records held in the local store.
//!
//! # Invariants
//! - `email` is the unique key of an account, compared case-insensitively.
//! - The remote mirror holds an independent, eventually-consistent copy of
//!   the same record; nothing here enforces agreement between the two.

use serde::{Deserialize, Serialize};

/// A registered account as persisted in the `users` collection.
///
/// Passwords are stored and compared as plain values; credential security is
/// explicitly out of scope for this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub hint: String,
}

impl Account {
    /// Whether this account is keyed by `email` (case-insensitive).
    pub fn has_email(&self, email: &str) -> bool {
        normalize_email(&self.email) == normalize_email(email)
    }

    /// Summary view safe to hand back to callers after login.
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// The slice of an account returned by a successful login. Never carries the
/// password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub name: String,
    pub email: String,
}

/// Canonical form of an email used as a lookup key: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn account(email: &str) -> Account {
        Account {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "pw1".to_string(),
            hint: String::new(),
        }
    }

    #[test]
    fn email_match_is_case_insensitive() {
        let acc = account("Ana@X.com");
        assert!(acc.has_email("ana@x.com"));
        assert!(acc.has_email("  ANA@X.COM "));
        assert!(!acc.has_email("other@x.com"));
    }

    #[test]
    fn summary_drops_credentials() {
        let json = serde_json::to_string(&account("a@x.com").summary()).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("pw1"));
    }

    #[test]
    fn hint_is_optional_in_persisted_state() {
        let acc: Account =
            serde_json::from_str(r#"{"name":"Ana","email":"a@x.com","password":"pw1"}"#).unwrap();
        assert_eq!(acc.hint, "");
    }

    proptest! {
        #[test]
        fn normalize_email_is_idempotent(email in "\\PC{0,40}") {
            let once = normalize_email(&email);
            prop_assert_eq!(normalize_email(&once), once);
        }
    }
}
