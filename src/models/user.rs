use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One row per normalized phone number. `otp`/`otp_expires_at` hold the
/// pending passcode and are always written together; they never appear in
/// serialized output.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub phone_number: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub is_active: bool,
    pub profile_complete: bool,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub fi_connected: bool,
    pub last_verified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing, default)]
    pub otp: Option<String>,
    #[serde(skip_serializing, default)]
    pub otp_expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UserData {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitUserDataRequest {
    #[schema(example = "9876543210")]
    pub phone_number: String,
    #[serde(default)]
    pub user_data: Option<UserData>,
    /// Defaults to true: an omitted flag means login.
    #[serde(default)]
    pub is_login: Option<bool>,
    #[serde(default, rename = "DLT_TE_ID")]
    pub dlt_te_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[schema(example = "9876543210")]
    pub phone_number: String,
    #[schema(example = "123456")]
    pub otp: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResendOtpRequest {
    #[schema(example = "9876543210")]
    pub phone_number: String,
    #[serde(default, rename = "DLT_TE_ID")]
    pub dlt_te_id: Option<String>,
}

/// Non-sensitive profile fields returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            verified: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthFlowResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    /// Present only when the debug echo flag is enabled in the config.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_otp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_fields_never_serialized() {
        let user = User {
            id: 1,
            phone_number: "919876543210".to_string(),
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            created_at: Utc::now(),
            last_login: Utc::now(),
            is_active: true,
            profile_complete: true,
            email_verified: false,
            phone_verified: false,
            fi_connected: false,
            last_verified_at: None,
            otp: Some("123456".to_string()),
            otp_expires_at: Some(Utc::now()),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("otp").is_none());
        assert!(json.get("otpExpiresAt").is_none());
        assert_eq!(json["phoneNumber"], "919876543210");
    }

    #[test]
    fn test_submit_request_field_names() {
        let body = serde_json::json!({
            "phoneNumber": "9876543210",
            "userData": {"name": "A", "email": "a@b.com"},
            "isLogin": false,
            "DLT_TE_ID": "1407160787155250027"
        });

        let request: SubmitUserDataRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.phone_number, "9876543210");
        assert_eq!(request.is_login, Some(false));
        assert_eq!(request.dlt_te_id.as_deref(), Some("1407160787155250027"));
        assert_eq!(request.user_data.unwrap().name.as_deref(), Some("A"));
    }

    #[test]
    fn test_debug_otp_omitted_when_absent() {
        let response = AuthFlowResponse {
            success: true,
            message: "Login OTP sent successfully".to_string(),
            user: None,
            debug_otp: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("debug_otp").is_none());
        assert!(json.get("user").is_none());
    }
}
