//! The authenticated principal.

use serde::{Deserialize, Serialize};

/// The authenticated user's identity as resolved from the backend account.
///
/// Immutable once constructed. An `Identity` only exists while a session is
/// active; the session store drops it on logout or a failed session check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Server-assigned account id.
    pub id: String,
    /// Display name given at registration.
    pub name: String,
    /// Email the account was registered with.
    pub email: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_serde_round_trip() {
        let identity = Identity::new("usr_1", "Alice", "alice@x.com");
        let json = serde_json::to_string(&identity).unwrap();
        let parsed: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, identity);
    }
}
