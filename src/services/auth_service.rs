use crate::config::{AppConfig, SmsConfig};
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::external::SmsSender;
use crate::models::*;
use crate::services::OtpService;
use crate::utils::*;
use chrono::Utc;
use std::sync::Arc;

/// Orchestrates the signup/login/verify flows: branches on the login flag,
/// drives the OTP lifecycle, and compensates when SMS delivery fails right
/// after a signup created the row.
#[derive(Clone)]
pub struct AuthService {
    pool: DbPool,
    otp_service: OtpService,
    sms_sender: Arc<dyn SmsSender>,
    country_code: String,
    default_dlt_te_id: String,
    debug_otp_echo: bool,
}

impl AuthService {
    pub fn new(
        pool: DbPool,
        sms_sender: Arc<dyn SmsSender>,
        sms_config: &SmsConfig,
        app_config: &AppConfig,
    ) -> Self {
        Self {
            otp_service: OtpService::new(pool.clone()),
            pool,
            sms_sender,
            country_code: sms_config.country_code.clone(),
            default_dlt_te_id: sms_config.default_dlt_te_id.clone(),
            debug_otp_echo: app_config.debug_otp_echo,
        }
    }

    /// Login or signup, then OTP issuance and delivery. The returned bool is
    /// true when a new user row was created (HTTP 201).
    pub async fn submit_user_data(
        &self,
        request: SubmitUserDataRequest,
    ) -> AppResult<(AuthFlowResponse, bool)> {
        let phone_number = request.phone_number.trim();
        if phone_number.is_empty() {
            return Err(AppError::ValidationError(
                "Phone number is required".to_string(),
            ));
        }
        validate_mobile_number(phone_number)?;

        let normalized_phone = normalize_phone(phone_number, &self.country_code);
        let is_login = request.is_login.unwrap_or(true);
        let dlt_te_id = request
            .dlt_te_id
            .unwrap_or_else(|| self.default_dlt_te_id.clone());

        log::info!("submit-user-data: phone={normalized_phone}, is_login={is_login}");

        let existing = self.find_by_phone(&normalized_phone).await?;

        if is_login {
            let user = existing.ok_or_else(|| {
                AppError::NotFound("User not found. Please sign up first.".to_string())
            })?;

            // A fresh login attempt resets the linked-account flag until the
            // new OTP is verified.
            sqlx::query("UPDATE users SET last_login = ?, fi_connected = 0 WHERE id = ?")
                .bind(Utc::now())
                .bind(user.id)
                .execute(&self.pool)
                .await?;

            let code = self.otp_service.issue(user.id).await?;

            if !self
                .sms_sender
                .send_otp(&normalized_phone, &code, &dlt_te_id)
                .await
            {
                // The pending OTP stays on the record; the next issue
                // supersedes it.
                return Err(AppError::DeliveryFailed);
            }

            Ok((
                AuthFlowResponse {
                    success: true,
                    message: "Login OTP sent successfully".to_string(),
                    user: Some(UserProfile::from(&user)),
                    debug_otp: self.echo(code),
                },
                false,
            ))
        } else {
            if existing.is_some() {
                return Err(AppError::Conflict(
                    "User already exists. Please login instead.".to_string(),
                ));
            }

            let user_data = request.user_data.unwrap_or_default();
            let name = user_data
                .name
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| {
                    AppError::ValidationError(
                        "Name and email are required for signup".to_string(),
                    )
                })?;
            let email = user_data
                .email
                .filter(|e| !e.trim().is_empty())
                .ok_or_else(|| {
                    AppError::ValidationError(
                        "Name and email are required for signup".to_string(),
                    )
                })?;
            validate_email(&email)?;

            let now = Utc::now();
            let user_id = sqlx::query(
                r#"
                INSERT INTO users (
                    phone_number, name, email, created_at, last_login,
                    is_active, profile_complete, email_verified, phone_verified, fi_connected
                ) VALUES (?, ?, ?, ?, ?, 1, 1, 0, 0, 0)
                "#,
            )
            .bind(&normalized_phone)
            .bind(&name)
            .bind(&email)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

            let code = self.otp_service.issue(user_id).await?;

            if !self
                .sms_sender
                .send_otp(&normalized_phone, &code, &dlt_te_id)
                .await
            {
                // Compensating delete: an account that can never receive its
                // OTP is unverifiable, so the row must not survive. The
                // delete itself is best-effort.
                if let Err(e) = sqlx::query("DELETE FROM users WHERE id = ?")
                    .bind(user_id)
                    .execute(&self.pool)
                    .await
                {
                    log::error!("Failed to delete user {user_id} after SMS failure: {e}");
                }
                return Err(AppError::DeliveryFailed);
            }

            log::info!("Created user {user_id} and sent OTP");

            Ok((
                AuthFlowResponse {
                    success: true,
                    message: "Signup OTP sent successfully".to_string(),
                    user: Some(UserProfile {
                        id: user_id,
                        name,
                        email,
                        phone_number: normalized_phone,
                        verified: None,
                    }),
                    debug_otp: self.echo(code),
                },
                true,
            ))
        }
    }

    /// Consumes the pending OTP; on success marks the phone verified, sets
    /// the linked-account flag, and stamps the verification time.
    pub async fn verify_otp(&self, request: VerifyOtpRequest) -> AppResult<AuthFlowResponse> {
        let phone_number = request.phone_number.trim();
        if phone_number.is_empty() || request.otp.is_empty() {
            return Err(AppError::ValidationError(
                "Phone number and OTP are required".to_string(),
            ));
        }
        validate_otp_format(&request.otp)?;

        let normalized_phone = normalize_phone(phone_number, &self.country_code);

        log::info!("verify-otp: phone={normalized_phone}");

        let user = self
            .find_by_phone(&normalized_phone)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.otp_service.verify(user.id, &request.otp).await?;

        sqlx::query(
            "UPDATE users SET fi_connected = 1, phone_verified = 1, last_verified_at = ? WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        log::info!("OTP verified successfully for user {}", user.id);

        let mut profile = UserProfile::from(&user);
        profile.verified = Some(true);

        Ok(AuthFlowResponse {
            success: true,
            message: "OTP verified successfully".to_string(),
            user: Some(profile),
            debug_otp: None,
        })
    }

    /// Issues a fresh OTP for an existing user, superseding any pending one.
    pub async fn resend_otp(&self, request: ResendOtpRequest) -> AppResult<AuthFlowResponse> {
        let phone_number = request.phone_number.trim();
        if phone_number.is_empty() {
            return Err(AppError::ValidationError(
                "Phone number is required".to_string(),
            ));
        }

        let normalized_phone = normalize_phone(phone_number, &self.country_code);
        let dlt_te_id = request
            .dlt_te_id
            .unwrap_or_else(|| self.default_dlt_te_id.clone());

        log::info!("resend-otp: phone={normalized_phone}");

        let user = self
            .find_by_phone(&normalized_phone)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let code = self.otp_service.issue(user.id).await?;

        if !self
            .sms_sender
            .send_otp(&normalized_phone, &code, &dlt_te_id)
            .await
        {
            return Err(AppError::DeliveryFailed);
        }

        Ok(AuthFlowResponse {
            success: true,
            message: "OTP resent successfully".to_string(),
            user: None,
            debug_otp: self.echo(code),
        })
    }

    async fn find_by_phone(&self, normalized_phone: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone_number = ?")
            .bind(normalized_phone)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    fn echo(&self, code: String) -> Option<String> {
        self.debug_otp_echo.then_some(code)
    }
}
