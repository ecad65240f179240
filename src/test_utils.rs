pub mod test_helpers {
    use crate::db::{new_id, now_timestamp};
    use crate::services::completion_client::{
        CompletionClient, CompletionError, CompletionRequest,
    };
    use crate::services::TokenService;
    use crate::AppState;
    use async_trait::async_trait;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    pub const TEST_JWT_SECRET: &str = "test-jwt-secret-with-enough-length-0123";

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Insert a test user with hashed password and default preferences
    pub async fn insert_test_user(
        pool: &SqlitePool,
        email: &str,
        password: &str,
    ) -> Result<String, sqlx::Error> {
        use argon2::{
            password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
            Argon2,
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
            })?
            .to_string();

        let user_id = new_id();
        let now = now_timestamp();

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, created_at, updated_at) \
             VALUES (?, ?, ?, NULL, ?, ?)",
        )
        .bind(&user_id)
        .bind(email)
        .bind(&password_hash)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        sqlx::query(
            "INSERT INTO user_preferences (id, user_id, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(new_id())
        .bind(&user_id)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        Ok(user_id)
    }

    /// Insert a notification with a recorded CTR
    pub async fn insert_test_notification(
        pool: &SqlitePool,
        user_id: &str,
        title: &str,
        ctr: f64,
    ) -> Result<String, sqlx::Error> {
        let id = new_id();
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, title, description, ctr, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(title)
        .bind(format!("{} description", title))
        .bind(ctr)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        Ok(id)
    }

    /// Insert an analytics snapshot
    pub async fn insert_test_analytics(
        pool: &SqlitePool,
        user_id: &str,
        top_words: &[&str],
        avg_ctr: f64,
        created_at: &str,
    ) -> Result<String, sqlx::Error> {
        let id = new_id();
        let words = serde_json::to_string(top_words)
            .map_err(|e| sqlx::Error::Configuration(e.to_string().into()))?;

        sqlx::query(
            r#"
            INSERT INTO analytics (id, user_id, top_performing_words, avg_ctr, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(words)
        .bind(avg_ctr)
        .bind(created_at)
        .execute(pool)
        .await?;

        Ok(id)
    }

    /// Completion client that answers every call with a fixed reply and
    /// keeps the requests it saw.
    pub struct StaticCompletionClient {
        reply: Option<String>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl StaticCompletionClient {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn silent() -> Self {
            Self {
                reply: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests
                .lock()
                .map(|requests| requests.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl CompletionClient for StaticCompletionClient {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<Option<String>, CompletionError> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            Ok(self.reply.clone())
        }
    }

    pub fn test_token_service() -> TokenService {
        TokenService::new(TEST_JWT_SECRET, Duration::from_secs(3600))
            .expect("test token lifetime is in range")
    }

    /// Application state over `pool` with the given completion client.
    pub fn create_test_state(pool: SqlitePool, completion: Arc<dyn CompletionClient>) -> AppState {
        AppState::new(pool, test_token_service(), completion, "gpt-4")
    }
}

// Re-export commonly used test functions at module level for convenience
// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}

#[cfg(test)]
pub async fn create_test_user(
    pool: &sqlx::SqlitePool,
    email: &str,
    password: &str,
) -> Result<String, sqlx::Error> {
    test_helpers::insert_test_user(pool, email, password).await
}
