//! Invitation token generation.

use rand::{distr::Alphanumeric, Rng};

/// 43 alphanumeric characters ≈ 256 bits of entropy (62^43).
pub const TOKEN_LEN: usize = 43;

/// Generate a fresh invitation token from the OS-seeded CSPRNG.
///
/// Pure generation: uniqueness is enforced by the store's unique
/// constraint on insert, not here. Alphanumeric output is URL-safe, so the
/// token can ride in a query parameter without extra encoding.
pub fn issue_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_length() {
        assert_eq!(issue_token().len(), TOKEN_LEN);
    }

    #[test]
    fn test_token_is_url_safe() {
        for _ in 0..100 {
            let token = issue_token();
            assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_tokens_are_pairwise_distinct() {
        let tokens: HashSet<String> = (0..1000).map(|_| issue_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }
}
