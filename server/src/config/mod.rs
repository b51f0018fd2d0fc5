use std::env;
use std::str::FromStr;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/sponsor_market";
const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_OTP_TTL_SECS: i64 = 600;
const MAX_OTP_TTL_SECS: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "Invalid STORE_BACKEND: {}. Must be one of: postgres, memory",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub store_backend: StoreBackend,
    pub port: u16,
    /// Bearer token for the admin routes. Admin routes reject everything when unset.
    pub admin_token: Option<String>,
    /// Mailbox for contact-form messages and new bid / rental alerts.
    pub admin_email: String,
    pub otp_ttl_secs: i64,
    pub notify_email_url: Option<String>,
    pub notify_sms_url: Option<String>,
    pub notify_api_key: Option<String>,
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match non_empty(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}

fn validate_otp_ttl(secs: i64) -> Result<i64, String> {
    if !(1..=MAX_OTP_TTL_SECS).contains(&secs) {
        return Err(format!(
            "OTP_TTL_SECS must be between 1 and {}, got {}",
            MAX_OTP_TTL_SECS, secs
        ));
    }
    Ok(secs)
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let store_backend = match non_empty("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StoreBackend::Postgres,
        };

        let database_max_connections = parsed("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if database_max_connections == 0 {
            return Err("DATABASE_MAX_CONNECTIONS must be greater than 0".to_string());
        }

        let otp_ttl_secs = validate_otp_ttl(parsed("OTP_TTL_SECS", DEFAULT_OTP_TTL_SECS)?)?;

        Ok(Self {
            database_url: non_empty("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections,
            store_backend,
            port: parsed("PORT", DEFAULT_PORT)?,
            admin_token: non_empty("ADMIN_TOKEN"),
            admin_email: non_empty("ADMIN_EMAIL")
                .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
            otp_ttl_secs,
            notify_email_url: non_empty("NOTIFY_EMAIL_URL"),
            notify_sms_url: non_empty("NOTIFY_SMS_URL"),
            notify_api_key: non_empty("NOTIFY_API_KEY"),
        })
    }

    pub fn otp_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.otp_ttl_secs)
    }

    pub fn has_notification_gateway(&self) -> bool {
        self.notify_email_url.is_some() || self.notify_sms_url.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            store_backend: StoreBackend::Memory,
            port: DEFAULT_PORT,
            admin_token: None,
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            otp_ttl_secs: DEFAULT_OTP_TTL_SECS,
            notify_email_url: None,
            notify_sms_url: None,
            notify_api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parsing() {
        assert_eq!("Postgres".parse::<StoreBackend>(), Ok(StoreBackend::Postgres));
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_otp_ttl_bounds() {
        assert_eq!(validate_otp_ttl(600), Ok(600));
        assert_eq!(validate_otp_ttl(MAX_OTP_TTL_SECS), Ok(MAX_OTP_TTL_SECS));
        assert!(validate_otp_ttl(0).is_err());
        assert!(validate_otp_ttl(MAX_OTP_TTL_SECS + 1).is_err());
        assert!(validate_otp_ttl(i64::MAX).is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.otp_ttl(), chrono::Duration::minutes(10));
        assert!(!config.has_notification_gateway());
        assert!(config.admin_token.is_none());
    }
}
