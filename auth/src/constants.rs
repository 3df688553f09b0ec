//! Authentication constants.

use std::time::Duration;

/// Scheme prefix of the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Default token lifetime: seven days.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttl_is_a_week() {
        assert_eq!(DEFAULT_TOKEN_TTL.as_secs(), 604_800);
    }
}
