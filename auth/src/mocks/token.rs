//! Mock token service.

use crate::error::{AuthError, Result};
use crate::providers::{TokenIssuer, TokenVerifier};
use crate::state::Principal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Issues opaque tokens of the form `user-<id>-<username>` and remembers them.
///
/// Cloning shares the token table.
#[derive(Debug, Clone, Default)]
pub struct MockTokenService {
    tokens: Arc<Mutex<HashMap<String, Principal>>>,
}

impl MockTokenService {
    /// Create an empty token service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token without going through the trait; test convenience.
    #[must_use]
    pub fn token_for(&self, id: i64, username: &str) -> String {
        let token = format!("user-{id}-{username}");
        self.table().insert(token.clone(), Principal::new(id, username));
        token
    }

    /// The token table; a panic in another test thread does not lose it.
    fn table(&self) -> MutexGuard<'_, HashMap<String, Principal>> {
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenIssuer for MockTokenService {
    fn issue(&self, principal: &Principal) -> Result<String> {
        let token = format!("user-{}-{}", principal.id, principal.username);
        self.table().insert(token.clone(), principal.clone());
        Ok(token)
    }
}

impl TokenVerifier for MockTokenService {
    fn verify(&self, token: &str) -> Result<Principal> {
        self.table()
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::InvalidCredential("unknown token".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_tokens_verify() {
        let tokens = MockTokenService::new();
        let token = tokens.issue(&Principal::new(3, "ann")).unwrap();

        assert_eq!(token, "user-3-ann");
        assert_eq!(tokens.verify(&token).unwrap(), Principal::new(3, "ann"));
        assert!(tokens.verify("user-4-bob").is_err());
    }

    #[test]
    fn test_poisoned_table_keeps_working() {
        let tokens = MockTokenService::new();
        let before = tokens.token_for(1, "ann");

        let shared = tokens.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.tokens.lock().unwrap();
            panic!("holder panicked");
        })
        .join();
        assert!(tokens.tokens.is_poisoned());

        let after = tokens.token_for(5, "eve");
        assert_eq!(tokens.verify(&before).unwrap(), Principal::new(1, "ann"));
        assert_eq!(tokens.verify(&after).unwrap(), Principal::new(5, "eve"));
        assert_eq!(
            tokens.issue(&Principal::new(6, "fay")).unwrap(),
            "user-6-fay"
        );
    }
}
