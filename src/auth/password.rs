use argon2::{
    Argon2,
    password_hash::{
        Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

/// Salted argon2 hash in PHC string form.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, hashed: &str) -> Result<(), Error> {
    let parsed = PasswordHash::new(hashed)?;
    Argon2::default().verify_password(password.as_bytes(), &parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("admin123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("admin123", &hash).is_ok());
        assert!(verify_password("admin124", &hash).is_err());
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        assert_ne!(hash_password("secret").unwrap(), hash_password("secret").unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_panic() {
        assert!(verify_password("secret", "not-a-phc-string").is_err());
    }
}
