use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// How passwords are written to the `users.password` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PasswordScheme {
    /// Stored verbatim. Only for databases created by the legacy app.
    Plain,
    /// Lowercase hex SHA-256 of the UTF-8 password (64 chars).
    #[default]
    Sha256,
}

impl PasswordScheme {
    pub fn digest(self, raw: &str) -> String {
        match self {
            PasswordScheme::Plain => raw.to_string(),
            PasswordScheme::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(raw.as_bytes());
                hex::encode(hasher.finalize())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_digest_is_fixed_length_hex() {
        let d = PasswordScheme::Sha256.digest("hunter2");
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(
            PasswordScheme::Sha256.digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn plain_is_identity() {
        assert_eq!(PasswordScheme::Plain.digest("pw"), "pw");
    }

    #[test]
    fn digest_distinguishes_passwords() {
        for scheme in [PasswordScheme::Plain, PasswordScheme::Sha256] {
            let stored = scheme.digest("correct horse");
            assert_eq!(scheme.digest("correct horse"), stored);
            assert_ne!(scheme.digest("correct horsE"), stored);
            assert_ne!(scheme.digest(""), stored);
        }
    }
}
