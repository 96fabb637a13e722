use crate::database::DbPool;
use crate::error::AppResult;
use crate::models::User;

#[derive(Clone)]
pub struct UserService {
    pool: DbPool,
}

impl UserService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// All user rows for the admin listing. The OTP columns are fetched but
    /// never serialized (see the serde attributes on `User`).
    pub async fn get_all_users(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }
}
