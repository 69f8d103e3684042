//! Password hashing for user accounts.
//!
//! New and changed passwords are stored as Argon2id PHC strings. Accounts imported
//! from the old system hold BCrypt hashes or plaintext; those verify through their
//! own scheme and are flagged so the caller can re-hash them.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::AppConfig;
use crate::errors::ServiceError;

const PHC_PREFIX: &str = "$argon2";
const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// How a stored password value is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredFormat {
    Argon2,
    Bcrypt,
    Plaintext,
}

impl StoredFormat {
    pub fn of(stored: &str) -> Self {
        if stored.starts_with(PHC_PREFIX) {
            StoredFormat::Argon2
        } else if BCRYPT_PREFIXES.iter().any(|prefix| stored.starts_with(prefix)) {
            StoredFormat::Bcrypt
        } else {
            StoredFormat::Plaintext
        }
    }
}

/// Outcome of checking a password against a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Valid,
    /// Matched a BCrypt or plaintext legacy value; the stored value should be upgraded.
    ValidLegacy,
    Invalid,
}

impl PasswordCheck {
    pub fn is_valid(&self) -> bool {
        !matches!(self, PasswordCheck::Invalid)
    }
}

#[derive(Clone)]
pub struct PasswordEncoder {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for PasswordEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordEncoder").finish_non_exhaustive()
    }
}

impl PasswordEncoder {
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, ServiceError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| ServiceError::HashError(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        Self::new(
            config.password_hash_memory_kib,
            config.password_hash_iterations,
        )
    }

    /// Hashes `raw` into a PHC string with a fresh random salt
    pub fn hash(&self, raw: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::HashError(e.to_string()))
    }

    pub fn verify(&self, raw: &str, stored: &str) -> Result<PasswordCheck, ServiceError> {
        match StoredFormat::of(stored) {
            StoredFormat::Argon2 => self.verify_argon2(raw, stored),
            StoredFormat::Bcrypt => match bcrypt::verify(raw, stored) {
                Ok(true) => Ok(PasswordCheck::ValidLegacy),
                Ok(false) => Ok(PasswordCheck::Invalid),
                Err(e) => Err(ServiceError::HashError(e.to_string())),
            },
            StoredFormat::Plaintext => Ok(if !stored.is_empty() && raw == stored {
                PasswordCheck::ValidLegacy
            } else {
                PasswordCheck::Invalid
            }),
        }
    }

    fn verify_argon2(&self, raw: &str, stored: &str) -> Result<PasswordCheck, ServiceError> {
        let parsed =
            PasswordHash::new(stored).map_err(|e| ServiceError::HashError(e.to_string()))?;
        match self.argon2.verify_password(raw.as_bytes(), &parsed) {
            Ok(()) => Ok(PasswordCheck::Valid),
            Err(argon2::password_hash::Error::Password) => Ok(PasswordCheck::Invalid),
            Err(e) => Err(ServiceError::HashError(e.to_string())),
        }
    }
}

/// Stored values that are not Argon2 PHC strings came from the old system.
pub fn is_legacy(stored: &str) -> bool {
    StoredFormat::of(stored) != StoredFormat::Argon2
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn encoder() -> PasswordEncoder {
        PasswordEncoder::new(64, 1).unwrap()
    }

    #[test]
    fn hashes_are_salted_phc_strings() {
        let encoder = encoder();
        let first = encoder.hash("admin123").unwrap();
        let second = encoder.hash("admin123").unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(!is_legacy(&first));
    }

    #[test]
    fn verifies_hashed_passwords() {
        let encoder = encoder();
        let stored = encoder.hash("tech123").unwrap();
        assert_eq!(encoder.verify("tech123", &stored).unwrap(), PasswordCheck::Valid);
        assert_eq!(encoder.verify("nope", &stored).unwrap(), PasswordCheck::Invalid);
    }

    #[test]
    fn plaintext_values_verify_as_legacy() {
        let encoder = encoder();
        assert_matches!(encoder.verify("secret", "secret"), Ok(PasswordCheck::ValidLegacy));
        assert_matches!(encoder.verify("other", "secret"), Ok(PasswordCheck::Invalid));
        assert_matches!(encoder.verify("", ""), Ok(PasswordCheck::Invalid));
    }

    #[test]
    fn bcrypt_hashes_verify_as_legacy() {
        let encoder = encoder();
        let stored = bcrypt::hash("admin123", 4).unwrap();
        assert!(stored.starts_with("$2b$"));
        assert!(is_legacy(&stored));
        assert_eq!(StoredFormat::of(&stored), StoredFormat::Bcrypt);
        assert_matches!(encoder.verify("admin123", &stored), Ok(PasswordCheck::ValidLegacy));
        assert_matches!(encoder.verify("admin124", &stored), Ok(PasswordCheck::Invalid));

        // Spring's BCryptPasswordEncoder writes the $2a$ variant
        let spring = stored.replacen("$2b$", "$2a$", 1);
        assert_matches!(encoder.verify("admin123", &spring), Ok(PasswordCheck::ValidLegacy));
    }

    #[test]
    fn truncated_bcrypt_hash_is_an_error() {
        assert_matches!(
            encoder().verify("x", "$2a$10$short"),
            Err(ServiceError::HashError(_))
        );
    }

    #[test]
    fn unparseable_phc_string_is_an_error() {
        // Salt characters outside the B64 alphabet fail PHC parsing
        assert_matches!(
            encoder().verify("x", "$argon2id$v=19$m=64,t=1,p=1$!!!!!!$!!!!!!"),
            Err(ServiceError::HashError(_))
        );
    }

    #[test]
    fn phc_string_without_a_hash_never_matches() {
        assert_matches!(
            encoder().verify("x", "$argon2id$garbage"),
            Ok(PasswordCheck::Invalid)
        );
    }
}
