use tracing::error;

/// bcrypt work factor used for new and upgraded hashes.
const HASH_COST: u32 = 10;

/// How a stored credential is represented on disk.
///
/// Accounts imported from before hashing was introduced still carry the raw
/// password; those are upgraded in place on the next successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredCredential<'a> {
    Hashed(&'a str),
    Plaintext(&'a str),
}

impl<'a> StoredCredential<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if raw.starts_with("$2b$") || raw.starts_with("$2a$") {
            StoredCredential::Hashed(raw)
        } else {
            StoredCredential::Plaintext(raw)
        }
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    bcrypt::hash(plain, HASH_COST).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    bcrypt::verify(plain, hash).map_err(|e| {
        error!(error = %e, "bcrypt verify error");
        anyhow::anyhow!(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn fresh_hashes_parse_as_hashed() {
        let hash = hash_password("pw").expect("hashing should succeed");
        assert!(matches!(
            StoredCredential::parse(&hash),
            StoredCredential::Hashed(_)
        ));
    }

    #[test]
    fn legacy_prefixes_parse_as_hashed() {
        assert!(matches!(
            StoredCredential::parse("$2a$10$abcdefghijklmnopqrstuv"),
            StoredCredential::Hashed(_)
        ));
        assert!(matches!(
            StoredCredential::parse("$2b$10$abcdefghijklmnopqrstuv"),
            StoredCredential::Hashed(_)
        ));
    }

    #[test]
    fn anything_else_parses_as_plaintext() {
        assert_eq!(
            StoredCredential::parse("hunter2"),
            StoredCredential::Plaintext("hunter2")
        );
        // Other modular-crypt schemes are not ours, treat them as plaintext
        // the way the original did.
        assert!(matches!(
            StoredCredential::parse("$argon2id$v=19$..."),
            StoredCredential::Plaintext(_)
        ));
    }
}
