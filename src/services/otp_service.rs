use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::utils::generate_six_digit_code;
use chrono::{DateTime, Duration, Utc};

/// Validity window for an issued OTP. Short on purpose: the 6-digit space is
/// only 1e6 codes and the SMS channel is slow, so the window bounds
/// brute-force exposure.
pub const OTP_TTL_MINUTES: i64 = 2;

/// Owns the OTP columns on the user row: issuance, expiry, and single-use
/// consumption. At most one OTP is pending per user; issuing a new one
/// overwrites (and thereby invalidates) the previous one.
#[derive(Clone)]
pub struct OtpService {
    pool: DbPool,
}

impl OtpService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Generates a fresh code, stamps expiry, and persists both columns in
    /// one UPDATE. Returns the code so the caller can hand it to delivery.
    pub async fn issue(&self, user_id: i64) -> AppResult<String> {
        let code = generate_six_digit_code();
        let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);

        let result = sqlx::query("UPDATE users SET otp = ?, otp_expires_at = ? WHERE id = ?")
            .bind(&code)
            .bind(expires_at)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(code)
    }

    /// Checks the submitted code against the pending one. Expired codes are
    /// cleared on the spot so a stale-but-correct code can never be accepted
    /// by a later check that skips the expiry comparison.
    pub async fn verify(&self, user_id: i64, submitted: &str) -> AppResult<()> {
        let row: Option<(Option<String>, Option<DateTime<Utc>>)> =
            sqlx::query_as("SELECT otp, otp_expires_at FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        let (otp, otp_expires_at) =
            row.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let (Some(stored), Some(expires_at)) = (otp, otp_expires_at) else {
            return Err(AppError::OtpNotFound);
        };

        if Utc::now() > expires_at {
            self.clear(user_id, &stored).await?;
            return Err(AppError::OtpExpired);
        }

        if stored != submitted {
            return Err(AppError::OtpMismatch);
        }

        // Consumption is conditional on the stored value: if a concurrent
        // request superseded or already consumed this code between the read
        // above and here, zero rows match and the code is treated as gone.
        let cleared = self.clear(user_id, &stored).await?;
        if cleared == 0 {
            return Err(AppError::OtpNotFound);
        }

        Ok(())
    }

    async fn clear(&self, user_id: i64, expected_code: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE users SET otp = NULL, otp_expires_at = NULL WHERE id = ? AND otp = ?",
        )
        .bind(user_id)
        .bind(expected_code)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory_pool;

    async fn insert_user(pool: &DbPool, phone: &str) -> i64 {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO users (
                phone_number, name, email, created_at, last_login,
                is_active, profile_complete, email_verified, phone_verified, fi_connected
            ) VALUES (?, ?, ?, ?, ?, 1, 1, 0, 0, 0)
            "#,
        )
        .bind(phone)
        .bind("Test User")
        .bind("test@example.com")
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    async fn stored_otp(pool: &DbPool, user_id: i64) -> (Option<String>, Option<DateTime<Utc>>) {
        sqlx::query_as("SELECT otp, otp_expires_at FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_issue_persists_code_and_expiry_together() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "919876543210").await;
        let service = OtpService::new(pool.clone());

        let code = service.issue(user_id).await.unwrap();
        assert_eq!(code.len(), 6);

        let (otp, expires_at) = stored_otp(&pool, user_id).await;
        assert_eq!(otp.as_deref(), Some(code.as_str()));
        let expires_at = expires_at.unwrap();
        assert!(expires_at > Utc::now());
        assert!(expires_at <= Utc::now() + Duration::minutes(OTP_TTL_MINUTES));
    }

    #[tokio::test]
    async fn test_issue_for_unknown_user_fails() {
        let pool = memory_pool().await;
        let service = OtpService::new(pool);

        assert!(matches!(
            service.issue(42).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_succeeds_exactly_once() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "919876543210").await;
        let service = OtpService::new(pool.clone());

        let code = service.issue(user_id).await.unwrap();
        service.verify(user_id, &code).await.unwrap();

        let (otp, expires_at) = stored_otp(&pool, user_id).await;
        assert!(otp.is_none());
        assert!(expires_at.is_none());

        // Replaying the same code must not be accepted a second time.
        assert!(matches!(
            service.verify(user_id, &code).await,
            Err(AppError::OtpNotFound)
        ));
    }

    #[tokio::test]
    async fn test_reissue_invalidates_previous_code() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "919876543210").await;
        let service = OtpService::new(pool.clone());

        let first = service.issue(user_id).await.unwrap();
        let second = service.issue(user_id).await.unwrap();

        if first != second {
            assert!(matches!(
                service.verify(user_id, &first).await,
                Err(AppError::OtpMismatch)
            ));
        }
        service.verify(user_id, &second).await.unwrap();
    }

    #[tokio::test]
    async fn test_verify_mismatch_keeps_code_pending() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "919876543210").await;
        let service = OtpService::new(pool.clone());

        let code = service.issue(user_id).await.unwrap();
        let wrong = if code == "000000" { "000001" } else { "000000" };

        assert!(matches!(
            service.verify(user_id, wrong).await,
            Err(AppError::OtpMismatch)
        ));

        // The pending code survives a mismatch and still verifies.
        service.verify(user_id, &code).await.unwrap();
    }

    #[tokio::test]
    async fn test_verify_expired_clears_code() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "919876543210").await;
        let service = OtpService::new(pool.clone());

        let code = service.issue(user_id).await.unwrap();

        // Backdate the expiry past the window.
        let expired = Utc::now() - Duration::seconds(1);
        sqlx::query("UPDATE users SET otp_expires_at = ? WHERE id = ?")
            .bind(expired)
            .bind(user_id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(matches!(
            service.verify(user_id, &code).await,
            Err(AppError::OtpExpired)
        ));

        let (otp, expires_at) = stored_otp(&pool, user_id).await;
        assert!(otp.is_none());
        assert!(expires_at.is_none());

        // After the expiry path cleared the columns, the failure mode is
        // "no OTP pending", not "wrong code".
        assert!(matches!(
            service.verify(user_id, &code).await,
            Err(AppError::OtpNotFound)
        ));
    }

    #[tokio::test]
    async fn test_verify_without_pending_otp() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "919876543210").await;
        let service = OtpService::new(pool);

        assert!(matches!(
            service.verify(user_id, "123456").await,
            Err(AppError::OtpNotFound)
        ));
    }
}
