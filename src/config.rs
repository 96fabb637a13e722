use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub sms: SmsConfig,
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    pub auth_key: String,
    pub base_url: String,
    pub sender: String,
    pub country_code: String,
    pub default_dlt_te_id: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Echoes the issued OTP in API responses. Development only.
    #[serde(default)]
    pub debug_otp_echo: bool,
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str)
                    .map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // No config file: build entirely from environment variables.
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and no config.toml was found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    sms: SmsConfig {
                        auth_key: get_env("SSD_WEB_AUTH_KEY").unwrap_or_default(),
                        base_url: get_env("SSD_WEB_BASE_URL")
                            .unwrap_or_else(|| "http://sms.ssdweb.in/api/sendhttp.php".to_string()),
                        sender: get_env("SMS_SENDER").unwrap_or_else(|| "FRNTGR".to_string()),
                        country_code: get_env("SMS_COUNTRY_CODE")
                            .unwrap_or_else(|| "91".to_string()),
                        default_dlt_te_id: get_env("SMS_DEFAULT_DLT_TE_ID")
                            .unwrap_or_else(|| "1407160787155250027".to_string()),
                        timeout_secs: get_env_parse("SMS_TIMEOUT_SECS", 10u64),
                    },
                    app: AppConfig {
                        debug_otp_echo: get_env_parse("APP_DEBUG_OTP_ECHO", false),
                    },
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // Environment variable overrides apply even when the file exists.
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("SSD_WEB_AUTH_KEY") {
            config.sms.auth_key = v;
        }
        if let Ok(v) = env::var("SSD_WEB_BASE_URL") {
            config.sms.base_url = v;
        }
        if let Ok(v) = env::var("SMS_SENDER") {
            config.sms.sender = v;
        }
        if let Ok(v) = env::var("SMS_COUNTRY_CODE") {
            config.sms.country_code = v;
        }
        if let Ok(v) = env::var("SMS_DEFAULT_DLT_TE_ID") {
            config.sms.default_dlt_te_id = v;
        }
        if let Ok(v) = env::var("SMS_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            config.sms.timeout_secs = n;
        }
        if let Ok(v) = env::var("APP_DEBUG_OTP_ECHO")
            && let Ok(b) = v.parse()
        {
            config.app.debug_otp_echo = b;
        }

        Ok(config)
    }
}
