//! User accounts: signup, profile, avatar, password change.

use chrono::Utc;
use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::FoodgramError;
use crate::usecase::password::{hash_password, verify_password};

fn require_field(field: &'static str, value: &str) -> Result<(), FoodgramError> {
    if value.trim().is_empty() {
        return Err(FoodgramError::Validation {
            field,
            message: "must not be empty".into(),
        });
    }
    Ok(())
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub struct CreateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CreateUserUseCase<U> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, FoodgramError> {
        require_field("email", &input.email)?;
        if !input.email.contains('@') {
            return Err(FoodgramError::Validation {
                field: "email",
                message: "must be an email address".into(),
            });
        }
        require_field("username", &input.username)?;
        require_field("first_name", &input.first_name)?;
        require_field("last_name", &input.last_name)?;
        require_field("password", &input.password)?;

        // Fast-path check; the store's unique constraint settles races.
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(FoodgramError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: input.email,
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            avatar: None,
            password_hash: hash_password(&input.password)?,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;
        Ok(user)
    }
}

// ── GetUser / ListUsers ──────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, FoodgramError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(FoodgramError::UserNotFound)
    }
}

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<User>, FoodgramError> {
        self.users.list(page).await
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        first_name: String,
        last_name: String,
    ) -> Result<User, FoodgramError> {
        require_field("first_name", &first_name)?;
        require_field("last_name", &last_name)?;
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(FoodgramError::UserNotFound)?;
        self.users
            .update_profile(user_id, &first_name, &last_name)
            .await?;
        user.first_name = first_name;
        user.last_name = last_name;
        Ok(user)
    }
}

// ── SetAvatar ────────────────────────────────────────────────────────────────

pub struct SetAvatarUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> SetAvatarUseCase<U> {
    /// `avatar` is the stored media path; `None` clears it.
    pub async fn execute(
        &self,
        user_id: Uuid,
        avatar: Option<String>,
    ) -> Result<Option<String>, FoodgramError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(FoodgramError::UserNotFound);
        }
        self.users.set_avatar(user_id, avatar.as_deref()).await?;
        Ok(avatar)
    }
}

// ── SetPassword ──────────────────────────────────────────────────────────────

pub struct SetPasswordUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> SetPasswordUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), FoodgramError> {
        require_field("new_password", new_password)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(FoodgramError::UserNotFound)?;
        if !verify_password(current_password, &user.password_hash) {
            return Err(FoodgramError::InvalidCredentials);
        }
        let hash = hash_password(new_password)?;
        self.users.set_password_hash(user_id, &hash).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct MockUsers {
        by_email: Option<User>,
        by_id: Option<User>,
        created: Mutex<Vec<User>>,
        password_hashes: Mutex<Vec<String>>,
    }

    impl MockUsers {
        fn empty() -> Self {
            Self {
                by_email: None,
                by_id: None,
                created: Mutex::new(vec![]),
                password_hashes: Mutex::new(vec![]),
            }
        }
    }

    fn sample_user(id: Uuid, password: &str) -> User {
        User {
            id,
            email: "chef@example.com".into(),
            username: "chef".into(),
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            avatar: None,
            password_hash: hash_password(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    impl UserRepository for MockUsers {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, FoodgramError> {
            Ok(self.by_id.clone())
        }
        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, FoodgramError> {
            Ok(self.by_email.clone())
        }
        async fn list(&self, _page: PageRequest) -> Result<Vec<User>, FoodgramError> {
            Ok(vec![])
        }
        async fn create(&self, user: &User) -> Result<(), FoodgramError> {
            self.created.lock().unwrap().push(user.clone());
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
        async fn set_password_hash(&self, _id: Uuid, hash: &str) -> Result<(), FoodgramError> {
            self.password_hashes.lock().unwrap().push(hash.into());
            Ok(())
        }
    }

    fn signup_input() -> CreateUserInput {
        CreateUserInput {
            email: "new@example.com".into(),
            username: "newcook".into(),
            first_name: "Bo".into(),
            last_name: "Kim".into(),
            password: "s3cret pass".into(),
        }
    }

    #[tokio::test]
    async fn should_create_user_and_store_a_hash_not_the_password() {
        let uc = CreateUserUseCase {
            users: MockUsers::empty(),
        };
        let user = uc.execute(signup_input()).await.unwrap();
        assert_eq!(user.email, "new@example.com");
        let created = uc.users.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_ne!(created[0].password_hash, "s3cret pass");
        assert!(verify_password("s3cret pass", &created[0].password_hash));
    }

    #[tokio::test]
    async fn should_fail_signup_when_email_taken() {
        let mut users = MockUsers::empty();
        users.by_email = Some(sample_user(Uuid::new_v4(), "other"));
        let uc = CreateUserUseCase { users };
        let result = uc.execute(signup_input()).await;
        assert!(matches!(result, Err(FoodgramError::EmailTaken)));
    }

    #[tokio::test]
    async fn should_reject_signup_without_at_sign() {
        let uc = CreateUserUseCase {
            users: MockUsers::empty(),
        };
        let mut input = signup_input();
        input.email = "not-an-email".into();
        let result = uc.execute(input).await;
        assert!(matches!(
            result,
            Err(FoodgramError::Validation { field: "email", .. })
        ));
    }

    #[tokio::test]
    async fn should_reject_signup_with_blank_username() {
        let uc = CreateUserUseCase {
            users: MockUsers::empty(),
        };
        let mut input = signup_input();
        input.username = "   ".into();
        let result = uc.execute(input).await;
        assert!(matches!(
            result,
            Err(FoodgramError::Validation {
                field: "username",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn should_change_password_with_correct_current() {
        let id = Uuid::new_v4();
        let mut users = MockUsers::empty();
        users.by_id = Some(sample_user(id, "old pass"));
        let uc = SetPasswordUseCase { users };
        uc.execute(id, "old pass", "new pass").await.unwrap();
        let hashes = uc.users.password_hashes.lock().unwrap();
        assert_eq!(hashes.len(), 1);
        assert!(verify_password("new pass", &hashes[0]));
    }

    #[tokio::test]
    async fn should_fail_password_change_with_wrong_current() {
        let id = Uuid::new_v4();
        let mut users = MockUsers::empty();
        users.by_id = Some(sample_user(id, "old pass"));
        let uc = SetPasswordUseCase { users };
        let result = uc.execute(id, "wrong", "new pass").await;
        assert!(matches!(result, Err(FoodgramError::InvalidCredentials)));
        assert!(uc.users.password_hashes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_update_profile_names() {
        let id = Uuid::new_v4();
        let mut users = MockUsers::empty();
        users.by_id = Some(sample_user(id, "pass"));
        let uc = UpdateProfileUseCase { users };
        let user = uc.execute(id, "Cleo".into(), "Park".into()).await.unwrap();
        assert_eq!(user.first_name, "Cleo");
        assert_eq!(user.last_name, "Park");
    }

    #[tokio::test]
    async fn should_clear_avatar() {
        let id = Uuid::new_v4();
        let mut users = MockUsers::empty();
        users.by_id = Some(sample_user(id, "pass"));
        let uc = SetAvatarUseCase { users };
        assert_eq!(uc.execute(id, None).await.unwrap(), None);
    }
}
