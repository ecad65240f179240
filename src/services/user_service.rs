use crate::models::{User, UserProfile};
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use crate::validation::{
    is_strong_password, is_valid_email, normalize_email, FieldError, FieldErrors,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("User already exists with this email")]
    EmailTaken,
    #[error("User not found")]
    UserNotFound,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Registers a user with default preferences. The email is normalized
    /// before the uniqueness check.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserServiceError> {
        let (email, name) = self.validate_registration(&request)?;

        let password_hash = self.hash_password(&request.password)?;

        match self
            .repository
            .create_user(&email, &password_hash, name)
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "User registered");
                Ok(user)
            }
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(&normalize_email(email)).await?)
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, UserServiceError> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserServiceError::UserNotFound)?;
        let preferences = self.repository.find_preferences(user_id).await?;

        Ok(UserProfile::new(user, preferences))
    }

    pub async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users(limit, offset).await?)
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), UserServiceError> {
        match self.repository.delete_user(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    fn validate_registration(
        &self,
        request: &CreateUserRequest,
    ) -> Result<(String, Option<String>), UserServiceError> {
        let mut errors = FieldErrors::new();

        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            errors.add("email", "Please provide a valid email");
        }

        if request.password.chars().count() < 8 {
            errors.add("password", "Password must be at least 8 characters long");
        } else if !is_strong_password(&request.password) {
            errors.add(
                "password",
                "Password must contain at least one uppercase letter, one lowercase letter, and one number",
            );
        }

        let name = match request.name.as_deref().map(str::trim) {
            Some(name) if name.chars().count() < 2 => {
                errors.add("name", "Name must be at least 2 characters long");
                None
            }
            Some(name) => Some(name.to_string()),
            None => None,
        };

        errors
            .finish((email, name))
            .map_err(UserServiceError::Validation)
    }

    fn hash_password(&self, password: &str) -> Result<String, UserServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserServiceError::HashingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user_repository::MockUserRepository;
    use mockall::predicate::*;

    fn stored_user(email: &str) -> User {
        User {
            id: "user-1".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: None,
            created_at: "2025-01-01T00:00:00.000Z".to_string(),
            updated_at: "2025-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_normalizes_email_and_hashes() {
        let mut mock_repo = MockUserRepository::new();

        let user = stored_user("test@example.com");
        mock_repo
            .expect_create_user()
            .withf(|email, hash, name| {
                email == "test@example.com" && hash.starts_with("$argon2") && name.is_none()
            })
            .times(1)
            .returning(move |_, _, _| {
                let user = user.clone();
                Box::pin(async move { Ok(user) })
            });

        let service = UserService::new(Arc::new(mock_repo));

        let request = CreateUserRequest {
            email: "  Test@Example.com ".to_string(),
            password: "Password123".to_string(),
            name: None,
        };

        let user = service.create_user(request).await.expect("Expected Ok result");
        assert_eq!(user.email, "test@example.com");
    }

    #[tokio::test]
    async fn test_create_user_collects_all_field_errors() {
        let mock_repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(mock_repo));

        let request = CreateUserRequest {
            email: "invalid-email".to_string(),
            password: "short".to_string(),
            name: Some(" a ".to_string()),
        };

        match service.create_user(request).await {
            Err(UserServiceError::Validation(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "password", "name"]);
            }
            other => panic!("expected validation error, got {:?}", other.map(|u| u.id)),
        }
    }

    #[tokio::test]
    async fn test_create_user_weak_password() {
        let mock_repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(mock_repo));

        let request = CreateUserRequest {
            email: "test@example.com".to_string(),
            password: "alllowercase1".to_string(),
            name: None,
        };

        match service.create_user(request).await {
            Err(UserServiceError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].message.contains("uppercase"));
            }
            _ => panic!("expected weak password rejection"),
        }
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_create_user()
            .times(1)
            .returning(|_, _, _| Box::pin(async move { Err(RepositoryError::AlreadyExists) }));

        let service = UserService::new(Arc::new(mock_repo));
        let request = CreateUserRequest {
            email: "taken@example.com".to_string(),
            password: "Password123".to_string(),
            name: None,
        };

        let result = service.create_user(request).await;
        assert!(matches!(result, Err(UserServiceError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_get_profile_missing_user() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .with(eq("gone"))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = UserService::new(Arc::new(mock_repo));
        let result = service.get_profile("gone").await;
        assert!(matches!(result, Err(UserServiceError::UserNotFound)));
    }
}
