//! Mock password hasher.

use crate::error::Result;
use crate::providers::PasswordHasher;

const PREFIX: &str = "plain:";

/// Stores passwords as `plain:<password>`. Fast and predictable.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash(&self, password: &str) -> Result<String> {
        Ok(format!("{PREFIX}{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        Ok(hash.strip_prefix(PREFIX) == Some(password))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let hash = PlainPasswordHasher.hash("secret123").unwrap();
        assert_eq!(hash, "plain:secret123");
        assert!(PlainPasswordHasher.verify("secret123", &hash).unwrap());
        assert!(!PlainPasswordHasher.verify("secret124", &hash).unwrap());
    }
}
