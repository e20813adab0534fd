use std::fmt;
use std::time::Duration;

/// Connection settings for the SharePoint content database.
#[derive(Debug, Clone)]
pub struct DbSettings {
    pub server: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub trust_cert: bool,
    pub timeout: Duration,
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db: DbSettings,
    pub site_url: String,
    pub app_name: String,
    pub bind_addr: String,
    pub session_key: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "Missing environment variable {key}"),
            ConfigError::Invalid { key, value } => write!(f, "Invalid value for {key}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup. `from_env` delegates here so
    /// parsing can be exercised without touching the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let port = match lookup("SHAREPOINT_DB_PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "SHAREPOINT_DB_PORT", value: v })?,
            None => 1433,
        };
        let timeout_secs = match lookup("SHAREPOINT_DB_TIMEOUT") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid { key: "SHAREPOINT_DB_TIMEOUT", value: v })?,
            None => 30,
        };
        let trust_cert = match lookup("SHAREPOINT_DB_TRUST_CERT") {
            Some(v) => parse_bool(&v)
                .ok_or(ConfigError::Invalid { key: "SHAREPOINT_DB_TRUST_CERT", value: v })?,
            None => true,
        };

        let db = DbSettings {
            server: required("SHAREPOINT_DB_SERVER")?,
            port,
            database: required("SHAREPOINT_DB_DATABASE")?,
            username: required("SHAREPOINT_DB_USERNAME")?,
            password: lookup("SHAREPOINT_DB_PASSWORD").unwrap_or_default(),
            trust_cert,
            timeout: Duration::from_secs(timeout_secs),
        };

        let site_url = required("SHAREPOINT_SITE_URL")?
            .trim_end_matches('/')
            .to_string();

        Ok(AppConfig {
            db,
            site_url,
            app_name: lookup("APP_NAME").unwrap_or_else(|| "SharePoint Dashboard".to_string()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            session_key: lookup("SESSION_KEY"),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("SHAREPOINT_DB_SERVER", "sql01"),
        ("SHAREPOINT_DB_DATABASE", "WSS_Content"),
        ("SHAREPOINT_DB_USERNAME", "reporter"),
        ("SHAREPOINT_SITE_URL", "http://portal/"),
    ];

    #[test]
    fn defaults_apply_when_optional_keys_absent() {
        let config = AppConfig::from_lookup(lookup_from(BASE)).unwrap();
        assert_eq!(config.db.port, 1433);
        assert_eq!(config.db.timeout, Duration::from_secs(30));
        assert!(config.db.trust_cert);
        assert_eq!(config.site_url, "http://portal");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert!(config.session_key.is_none());
    }

    #[test]
    fn missing_server_is_reported() {
        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "SHAREPOINT_DB_SERVER")
            .collect();
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SHAREPOINT_DB_SERVER")));
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut pairs = BASE.to_vec();
        pairs.push(("SHAREPOINT_DB_PORT", "not-a-port"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SHAREPOINT_DB_PORT", .. }));
    }

    #[test]
    fn trust_cert_accepts_common_spellings() {
        let mut pairs = BASE.to_vec();
        pairs.push(("SHAREPOINT_DB_TRUST_CERT", "no"));
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert!(!config.db.trust_cert);
    }
}
