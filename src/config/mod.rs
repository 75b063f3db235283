use std::env;

use chrono::{FixedOffset, Offset, Utc};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub redis_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_access_token_expiry_secs: i64,
    pub jwt_refresh_token_expiry_secs: i64,
    pub frontend_url: String,
    pub default_member_password: String,
    pub business_utc_offset_secs: i32,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_access_token_expiry_secs: env::var("JWT_ACCESS_TOKEN_EXPIRY_SECS")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .unwrap_or(900),
            jwt_refresh_token_expiry_secs: env::var("JWT_REFRESH_TOKEN_EXPIRY_SECS")
                .unwrap_or_else(|_| "604800".to_string())
                .parse()
                .unwrap_or(604800),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            default_member_password: env::var("DEFAULT_MEMBER_PASSWORD")
                .unwrap_or_else(|_| "Member@123".to_string()),
            business_utc_offset_secs: env::var("BUSINESS_UTC_OFFSET_SECS")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .unwrap_or(0),
            tls_cert_path: env::var("TLS_CERT_PATH").ok(),
            tls_key_path: env::var("TLS_KEY_PATH").ok(),
        })
    }

    /// Offset used to decide what "today" means for the gym.
    ///
    /// Out-of-range values fall back to UTC.
    pub fn business_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.business_utc_offset_secs)
            .unwrap_or_else(|| Utc.fix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_offset(secs: i32) -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/gym".to_string(),
            database_max_connections: 5,
            redis_url: None,
            host: "127.0.0.1".to_string(),
            port: 5000,
            jwt_secret: "secret".to_string(),
            jwt_access_token_expiry_secs: 900,
            jwt_refresh_token_expiry_secs: 604800,
            frontend_url: "http://localhost:5173".to_string(),
            default_member_password: "Member@123".to_string(),
            business_utc_offset_secs: secs,
            tls_cert_path: None,
            tls_key_path: None,
        }
    }

    #[test]
    fn business_offset_uses_configured_seconds() {
        let offset = config_with_offset(19_800).business_offset();
        assert_eq!(offset.local_minus_utc(), 19_800);
    }

    #[test]
    fn business_offset_out_of_range_is_utc() {
        let offset = config_with_offset(200_000).business_offset();
        assert_eq!(offset.local_minus_utc(), 0);
    }
}
