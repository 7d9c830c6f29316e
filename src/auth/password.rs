//! Salted password digests using bcrypt.
//!
//! Digests are stored in the modular crypt format (`$2b$<cost>$<salt+hash>`),
//! so the salt and work factor travel with the digest and `verify` needs no
//! extra parameters.

use crate::auth::AuthError;
use crate::config::ConfigError;

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;
/// bcrypt reads at most this many bytes of a password and ignores the rest.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Plaintext behind `dummy_digest`. Never a real credential.
const DUMMY_PASSWORD: &str = "staff-api-dummy-password";

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_digest: String,
}

impl PasswordHasher {
    /// Build a hasher with the given bcrypt work factor.
    ///
    /// A digest of a throwaway password is computed up front so that
    /// `verify_dummy` costs the same as a real verification at this cost.
    pub fn new(cost: u32) -> Result<Self, ConfigError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(ConfigError::InvalidValue {
                key: "PASSWORD_HASH_COST",
                value: cost.to_string(),
            });
        }

        let dummy_digest = bcrypt::hash(DUMMY_PASSWORD, cost).map_err(|e| {
            tracing::error!("Failed to prepare dummy password digest: {}", e);
            ConfigError::InvalidValue {
                key: "PASSWORD_HASH_COST",
                value: cost.to_string(),
            }
        })?;

        Ok(Self { cost, dummy_digest })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `plaintext` with a fresh random salt.
    ///
    /// Passwords over [`MAX_PASSWORD_BYTES`] are refused rather than
    /// silently truncated.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::Hashing(format!(
                "password exceeds {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        bcrypt::hash(plaintext, self.cost).map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            AuthError::Hashing(e.to_string())
        })
    }

    /// Check `plaintext` against a stored digest.
    ///
    /// A digest that cannot be parsed counts as a mismatch, and so does a
    /// plaintext too long to have been hashed.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return self.verify_dummy(plaintext);
        }
        match bcrypt::verify(plaintext, digest) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("Stored password digest could not be parsed: {}", e);
                false
            }
        }
    }

    /// Spend one verification's worth of work and report a mismatch.
    ///
    /// Used when the username is unknown so that the response time does not
    /// reveal whether the account exists.
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        let _ = bcrypt::verify(plaintext, &self.dummy_digest);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(MIN_COST).unwrap()
    }

    #[test]
    fn verifies_own_digest() {
        let hasher = hasher();
        let digest = hasher.hash("correct-pw").unwrap();
        assert!(hasher.verify("correct-pw", &digest));
        assert!(!hasher.verify("wrong-pw", &digest));
    }

    #[test]
    fn salts_every_digest() {
        let hasher = hasher();
        let first = hasher.hash("same-password").unwrap();
        let second = hasher.hash("same-password").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same-password", &first));
        assert!(hasher.verify("same-password", &second));
    }

    #[test]
    fn digest_never_contains_plaintext() {
        let digest = hasher().hash("visible-secret").unwrap();
        assert!(!digest.contains("visible-secret"));
        assert!(digest.starts_with("$2"));
    }

    #[test]
    fn malformed_digest_is_a_mismatch() {
        let hasher = hasher();
        assert!(!hasher.verify("anything", "not-a-bcrypt-digest"));
        assert!(!hasher.verify("anything", ""));
    }

    #[test]
    fn dummy_verification_always_fails() {
        let hasher = hasher();
        assert!(!hasher.verify_dummy(DUMMY_PASSWORD));
        assert!(!hasher.verify_dummy("anything"));
    }

    #[test]
    fn refuses_passwords_bcrypt_would_truncate() {
        let hasher = hasher();
        let longest = "a".repeat(MAX_PASSWORD_BYTES);
        assert!(hasher.hash(&longest).is_ok());

        let too_long = format!("{}REAL-SECRET", longest);
        assert!(matches!(hasher.hash(&too_long), Err(AuthError::Hashing(_))));
    }

    #[test]
    fn shared_prefix_does_not_verify() {
        let hasher = hasher();
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);
        let digest = hasher.hash(&prefix).unwrap();

        assert!(hasher.verify(&prefix, &digest));
        assert!(!hasher.verify(&format!("{}totally-different", prefix), &digest));
    }

    #[test]
    fn rejects_cost_out_of_range() {
        assert!(PasswordHasher::new(MIN_COST - 1).is_err());
        assert!(PasswordHasher::new(MAX_COST + 1).is_err());
    }
}
