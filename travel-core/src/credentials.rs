//! Password checks for user accounts.
//!
//! Existing `users.csv` files keep passwords as plaintext and those keep
//! working. A stored value of the form `sha256$<salt>$<hex digest>` is
//! verified by hashing the salt followed by the candidate password.

use sha2::{Digest, Sha256};

const SHA256_SCHEME: &str = "sha256";

/// Produces a `sha256$<salt>$<digest>` credential for storing in `users.csv`
pub fn hash_password(password: &str, salt: &str) -> String {
    format!("{}${}${}", SHA256_SCHEME, salt, digest(salt, password))
}

/// Checks a candidate password against a stored credential
pub fn verify(stored: &str, candidate: &str) -> bool {
    match parse_hashed(stored) {
        Some((salt, expected)) => digest(salt, candidate).eq_ignore_ascii_case(expected),
        None => stored == candidate,
    }
}

fn parse_hashed(stored: &str) -> Option<(&str, &str)> {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(SHA256_SCHEME), Some(salt), Some(hash)) if !hash.is_empty() => Some((salt, hash)),
        _ => None,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_exact_match() {
        assert!(verify("p1", "p1"));
        assert!(!verify("p1", "P1"));
        assert!(!verify("p1", "p1 "));
        assert!(!verify("p1", ""));
    }

    #[test]
    fn test_hashed_roundtrip() {
        let stored = hash_password("s3cret", "pepper");
        assert!(stored.starts_with("sha256$pepper$"));
        assert!(verify(&stored, "s3cret"));
        assert!(!verify(&stored, "s3cret!"));
    }

    #[test]
    fn test_hashed_is_not_compared_as_plaintext() {
        let stored = hash_password("s3cret", "pepper");
        assert!(!verify(&stored, &stored));
    }

    #[test]
    fn test_dollar_in_plaintext_password() {
        // Not the sha256 scheme, so compared as-is
        assert!(verify("md5$x$y", "md5$x$y"));
        assert!(verify("sha256$only", "sha256$only"));
    }
}
