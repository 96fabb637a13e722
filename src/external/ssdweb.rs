use crate::config::SmsConfig;
use crate::utils::normalize_phone;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Seam for SMS delivery. Implementations must never panic or propagate
/// transport errors: the orchestrator only needs a yes/no to decide whether
/// to compensate.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_otp(&self, phone: &str, code: &str, dlt_te_id: &str) -> bool;
}

/// The provider's response schema is inconsistently documented; depending on
/// route and account it reports success through `type`, `status`, or an
/// `ErrorCode` of "000". All known shapes are modeled explicitly.
#[derive(Debug, Deserialize)]
pub struct SsdWebResponse {
    #[serde(rename = "type")]
    pub response_type: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "ErrorCode")]
    pub error_code: Option<String>,
    #[serde(rename = "ErrorMessage")]
    pub error_message: Option<String>,
    pub message: Option<String>,
}

impl SsdWebResponse {
    pub fn is_success(&self) -> bool {
        self.response_type.as_deref() == Some("success")
            || self.status.as_deref() == Some("success")
            || self.error_code.as_deref() == Some("000")
    }
}

#[derive(Clone)]
pub struct SsdWebClient {
    client: Client,
    config: SmsConfig,
}

impl SsdWebClient {
    pub fn new(config: SmsConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }
}

#[async_trait]
impl SmsSender for SsdWebClient {
    async fn send_otp(&self, phone: &str, code: &str, dlt_te_id: &str) -> bool {
        let mobile = normalize_phone(phone, &self.config.country_code);
        let message = format!(
            "Your ListNow account OTP is: {code}.\n Please DO NOT SHARE this OTP with anyone"
        );

        let params = [
            ("authkey", self.config.auth_key.as_str()),
            ("mobiles", mobile.as_str()),
            ("message", message.as_str()),
            ("sender", self.config.sender.as_str()),
            ("route", "4"),
            ("country", self.config.country_code.as_str()),
            ("DLT_TE_ID", dlt_te_id),
            ("response", "json"),
        ];

        let response = match self
            .client
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::error!("SMS request to {mobile} failed: {e}");
                return false;
            }
        };

        if !response.status().is_success() {
            log::error!(
                "SMS request to {mobile} failed with status {}",
                response.status()
            );
            return false;
        }

        match response.json::<SsdWebResponse>().await {
            Ok(body) if body.is_success() => {
                log::info!("OTP SMS sent successfully to {mobile}");
                true
            }
            Ok(body) => {
                log::error!("SMS provider rejected the message for {mobile}: {body:?}");
                false
            }
            Err(e) => {
                log::error!("Unparseable SMS provider response for {mobile}: {e}");
                false
            }
        }
    }
}

/// Test double that records every message and returns a fixed outcome.
#[cfg(test)]
pub struct MockSms {
    pub succeed: bool,
    pub sent: std::sync::Mutex<Vec<(String, String, String)>>,
}

#[cfg(test)]
impl MockSms {
    pub fn new(succeed: bool) -> Self {
        Self {
            succeed,
            sent: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl SmsSender for MockSms {
    async fn send_otp(&self, phone: &str, code: &str, dlt_te_id: &str) -> bool {
        self.sent.lock().unwrap().push((
            phone.to_string(),
            code.to_string(),
            dlt_te_id.to_string(),
        ));
        self.succeed
    }
}
