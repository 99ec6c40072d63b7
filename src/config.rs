use std::{env, str::FromStr};

use rust_decimal::Decimal;
use secrecy::SecretString;

pub const DEFAULT_MASTER_ADMIN_EMAIL: &str = "admin@aerodelivery.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: SecretString,
    pub master_admin_email: String,
    pub master_admin_password: Option<SecretString>,
    pub delivery_fee: Decimal,
    pub cookie_secure: bool,
    /// Browser origins allowed to call the API with credentials. Empty means same-origin only.
    pub allowed_origins: Vec<String>,
    pub whatsapp: Option<WhatsAppConfig>,
}

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub api_url: String,
    pub api_token: SecretString,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let master_admin_email = env::var("MASTER_ADMIN_EMAIL")
            .map(|e| e.trim().to_lowercase())
            .unwrap_or_else(|_| DEFAULT_MASTER_ADMIN_EMAIL.to_string());
        let master_admin_password = env::var("MASTER_ADMIN_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty())
            .map(SecretString::from);
        let delivery_fee = match env::var("DELIVERY_FEE") {
            Ok(raw) => Decimal::from_str(raw.trim())
                .map_err(|e| anyhow::anyhow!("invalid DELIVERY_FEE {raw:?}: {e}"))?,
            Err(_) => default_delivery_fee(),
        };
        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE"))
            .unwrap_or(false);
        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();
        let whatsapp = match (env::var("WHATSAPP_API_URL"), env::var("WHATSAPP_API_TOKEN")) {
            (Ok(api_url), Ok(token)) if !api_url.is_empty() => Some(WhatsAppConfig {
                api_url,
                api_token: SecretString::from(token),
            }),
            _ => None,
        };

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret: SecretString::from(jwt_secret),
            master_admin_email,
            master_admin_password,
            delivery_fee,
            cookie_secure,
            allowed_origins,
            whatsapp,
        })
    }

    /// Settings for tests and tools that never open a listener.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            database_url: String::new(),
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: SecretString::from(jwt_secret.to_string()),
            master_admin_email: DEFAULT_MASTER_ADMIN_EMAIL.to_string(),
            master_admin_password: None,
            delivery_fee: default_delivery_fee(),
            cookie_secure: false,
            allowed_origins: Vec::new(),
            whatsapp: None,
        }
    }
}

pub fn default_delivery_fee() -> Decimal {
    Decimal::new(800, 2)
}

/// Comma-separated origins, e.g. `https://aerodelivery.com, http://localhost:5173`.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" https://aerodelivery.com/ ,, http://localhost:5173"),
            vec!["https://aerodelivery.com", "http://localhost:5173"]
        );
        assert!(parse_origins("").is_empty());
    }
}
