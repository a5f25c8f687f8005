//! Opaque token issuance and revocation.

use chrono::Utc;

use foodgram_domain::slug::generate_token_key;

use crate::domain::repository::{TokenRepository, UserRepository};
use crate::domain::types::AuthToken;
use crate::error::FoodgramError;
use crate::usecase::password::verify_password;

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<U: UserRepository, T: TokenRepository> {
    pub users: U,
    pub tokens: T,
}

impl<U: UserRepository, T: TokenRepository> LoginUseCase<U, T> {
    /// A user holds at most one token; repeated logins hand back the same key.
    pub async fn execute(&self, email: &str, password: &str) -> Result<AuthToken, FoodgramError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(FoodgramError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(FoodgramError::InvalidCredentials);
        }
        if let Some(token) = self.tokens.find_by_user(user.id).await? {
            return Ok(token);
        }
        let token = AuthToken {
            key: generate_token_key(),
            user_id: user.id,
            created_at: Utc::now(),
        };
        self.tokens.create(&token).await?;
        Ok(token)
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<T: TokenRepository> {
    pub tokens: T,
}

impl<T: TokenRepository> LogoutUseCase<T> {
    pub async fn execute(&self, key: &str) -> Result<(), FoodgramError> {
        let deleted = self.tokens.delete(key).await?;
        if !deleted {
            return Err(FoodgramError::Unauthorized);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::User;
    use crate::usecase::password::hash_password;
    use foodgram_domain::pagination::PageRequest;
    use foodgram_domain::slug::TOKEN_LEN;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct MockUsers {
        user: Option<User>,
    }

    impl UserRepository for MockUsers {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, FoodgramError> {
            Ok(self.user.clone())
        }
        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, FoodgramError> {
            Ok(self.user.clone())
        }
        async fn list(&self, _page: PageRequest) -> Result<Vec<User>, FoodgramError> {
            Ok(vec![])
        }
        async fn create(&self, _user: &User) -> Result<(), FoodgramError> {
            Ok(())
        }
        async fn update_profile(
            &self,
            _id: Uuid,
            _first_name: &str,
            _last_name: &str,
        ) -> Result<(), FoodgramError> {
            Ok(())
        }
        async fn set_avatar(&self, _id: Uuid, _avatar: Option<&str>) -> Result<(), FoodgramError> {
            Ok(())
        }
        async fn set_password_hash(&self, _id: Uuid, _hash: &str) -> Result<(), FoodgramError> {
            Ok(())
        }
    }

    struct MockTokens {
        existing: Option<AuthToken>,
        created: Mutex<Vec<AuthToken>>,
        delete_returns: bool,
    }

    impl TokenRepository for MockTokens {
        async fn find_user_by_key(&self, _key: &str) -> Result<Option<User>, FoodgramError> {
            Ok(None)
        }
        async fn find_by_user(&self, _user: Uuid) -> Result<Option<AuthToken>, FoodgramError> {
            Ok(self.existing.clone())
        }
        async fn create(&self, token: &AuthToken) -> Result<(), FoodgramError> {
            self.created.lock().unwrap().push(token.clone());
            Ok(())
        }
        async fn delete(&self, _key: &str) -> Result<bool, FoodgramError> {
            Ok(self.delete_returns)
        }
    }

    fn user_with_password(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "chef@example.com".into(),
            username: "chef".into(),
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            avatar: None,
            password_hash: hash_password(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn should_issue_token_on_first_login() {
        let user = user_with_password("s3cret");
        let user_id = user.id;
        let uc = LoginUseCase {
            users: MockUsers { user: Some(user) },
            tokens: MockTokens {
                existing: None,
                created: Mutex::new(vec![]),
                delete_returns: false,
            },
        };
        let token = uc.execute("chef@example.com", "s3cret").await.unwrap();
        assert_eq!(token.user_id, user_id);
        assert_eq!(token.key.len(), TOKEN_LEN);
        assert_eq!(uc.tokens.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_reuse_existing_token_on_repeated_login() {
        let user = user_with_password("s3cret");
        let existing = AuthToken {
            key: "k".repeat(TOKEN_LEN),
            user_id: user.id,
            created_at: Utc::now(),
        };
        let uc = LoginUseCase {
            users: MockUsers { user: Some(user) },
            tokens: MockTokens {
                existing: Some(existing.clone()),
                created: Mutex::new(vec![]),
                delete_returns: false,
            },
        };
        let token = uc.execute("chef@example.com", "s3cret").await.unwrap();
        assert_eq!(token.key, existing.key);
        assert!(uc.tokens.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_fail_login_with_wrong_password() {
        let uc = LoginUseCase {
            users: MockUsers {
                user: Some(user_with_password("s3cret")),
            },
            tokens: MockTokens {
                existing: None,
                created: Mutex::new(vec![]),
                delete_returns: false,
            },
        };
        let result = uc.execute("chef@example.com", "nope").await;
        assert!(matches!(result, Err(FoodgramError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn should_fail_login_for_unknown_email() {
        let uc = LoginUseCase {
            users: MockUsers { user: None },
            tokens: MockTokens {
                existing: None,
                created: Mutex::new(vec![]),
                delete_returns: false,
            },
        };
        let result = uc.execute("nobody@example.com", "s3cret").await;
        assert!(matches!(result, Err(FoodgramError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn should_fail_logout_for_unknown_key() {
        let uc = LogoutUseCase {
            tokens: MockTokens {
                existing: None,
                created: Mutex::new(vec![]),
                delete_returns: false,
            },
        };
        let result = uc.execute("missing-key").await;
        assert!(matches!(result, Err(FoodgramError::Unauthorized)));
    }
}
