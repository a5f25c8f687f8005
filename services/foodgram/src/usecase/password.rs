//! Argon2 password hashing in PHC string format.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::FoodgramError;

pub fn hash_password(password: &str) -> Result<String, FoodgramError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| FoodgramError::Internal(anyhow::anyhow!("hash password: {e}")))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_verify_correct_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash));
    }

    #[test]
    fn should_reject_wrong_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(!verify_password("incorrect horse", &hash));
    }

    #[test]
    fn should_reject_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
