use crate::utils::AppError;
use std::path::PathBuf;
use std::time::Duration;

const DAY_SECS: u64 = 24 * 60 * 60;
const MAX_SESSION_TTL_DAYS: i64 = 3650;

#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_days: i64,
}

#[derive(Debug, Clone)]
pub struct GoogleOAuthSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub max_age: Duration,
    pub sweep_interval: Duration,
    pub max_download_bytes: usize,
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub static_dir: PathBuf,
    pub client_url: Option<String>,
    pub production: bool,
    pub json_limit: usize,
    pub jwt: JwtSettings,
    pub google: GoogleOAuthSettings,
    pub cache: CacheSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let port = parse_num::<u16>("PORT", lookup("PORT"), 3001)?;
        let host = get("HOST", "0.0.0.0");

        let max_age_days = parse_num::<u64>("CACHE_MAX_AGE_DAYS", lookup("CACHE_MAX_AGE_DAYS"), 60)?;
        let sweep_secs = parse_num::<u64>(
            "CACHE_SWEEP_INTERVAL_SECS",
            lookup("CACHE_SWEEP_INTERVAL_SECS"),
            DAY_SECS,
        )?;
        let max_download_mb = parse_num::<usize>("CACHE_MAX_DOWNLOAD_MB", lookup("CACHE_MAX_DOWNLOAD_MB"), 100)?;
        if sweep_secs == 0 {
            return Err(AppError::ConfigError("CACHE_SWEEP_INTERVAL_SECS must be positive".into()));
        }
        let max_age_secs = max_age_days
            .checked_mul(DAY_SECS)
            .ok_or_else(|| AppError::ConfigError("CACHE_MAX_AGE_DAYS is too large".into()))?;
        let max_download_bytes = max_download_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| AppError::ConfigError("CACHE_MAX_DOWNLOAD_MB is too large".into()))?;
        let session_ttl_days = parse_num::<i64>("SESSION_TTL_DAYS", lookup("SESSION_TTL_DAYS"), 30)?;
        if !(1..=MAX_SESSION_TTL_DAYS).contains(&session_ttl_days) {
            return Err(AppError::ConfigError(format!(
                "SESSION_TTL_DAYS must be between 1 and {}",
                MAX_SESSION_TTL_DAYS
            )));
        }

        let redirect_uri = lookup("CALLBACK_URL")
            .unwrap_or_else(|| format!("http://localhost:{}/auth/google/callback", port));

        Ok(Self {
            host,
            port,
            data_dir: PathBuf::from(get("DATA_DIR", "Data")),
            cache_dir: PathBuf::from(get("CACHE_DIR", "CachedImages")),
            static_dir: PathBuf::from(get("STATIC_DIR", "client")),
            client_url: lookup("CLIENT_URL").filter(|u| !u.is_empty()),
            production: get("APP_ENV", "development") == "production",
            json_limit: parse_num::<usize>("JSON_LIMIT_BYTES", lookup("JSON_LIMIT_BYTES"), 2 * 1024 * 1024)?,
            jwt: JwtSettings {
                secret: get("JWT_SECRET", "default-secret-change-me"),
                issuer: get("JWT_ISSUER", "feed-mockup-service"),
                audience: get("JWT_AUDIENCE", "feed-mockup-web"),
                ttl_days: session_ttl_days,
            },
            google: GoogleOAuthSettings {
                client_id: lookup("GOOGLE_CLIENT_ID").filter(|v| !v.is_empty()),
                client_secret: lookup("GOOGLE_CLIENT_SECRET").filter(|v| !v.is_empty()),
                redirect_uri,
            },
            cache: CacheSettings {
                max_age: Duration::from_secs(max_age_secs),
                sweep_interval: Duration::from_secs(sweep_secs),
                max_download_bytes,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, AppError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::ConfigError(format!("{} has an invalid value: {:?}", key, value))),
    }
}

#[cfg(test)]
pub(crate) fn test_config(data_dir: &std::path::Path, cache_dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::from_lookup(|_| None).expect("defaults are valid");
    config.data_dir = data_dir.to_path_buf();
    config.cache_dir = cache_dir.to_path_buf();
    config.jwt.secret = "test-secret".to_string();
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.data_dir, PathBuf::from("Data"));
        assert_eq!(config.cache.max_age, Duration::from_secs(60 * DAY_SECS));
        assert_eq!(config.cache.sweep_interval, Duration::from_secs(DAY_SECS));
        assert_eq!(config.google.redirect_uri, "http://localhost:3001/auth/google/callback");
        assert!(!config.production);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("APP_ENV", "production"),
            ("CACHE_MAX_AGE_DAYS", "7"),
            ("CLIENT_URL", "https://mockups.example.com"),
            ("CALLBACK_URL", "https://mockups.example.com/auth/google/callback"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.production);
        assert_eq!(config.cache.max_age, Duration::from_secs(7 * DAY_SECS));
        assert_eq!(config.client_url.as_deref(), Some("https://mockups.example.com"));
        assert_eq!(config.google.redirect_uri, "https://mockups.example.com/auth/google/callback");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_zero_sweep_interval_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("CACHE_SWEEP_INTERVAL_SECS", "0")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_oversized_limits_are_rejected() {
        let huge = u64::MAX.to_string();
        for key in ["CACHE_MAX_AGE_DAYS", "CACHE_MAX_DOWNLOAD_MB"] {
            let err = AppConfig::from_lookup(lookup_from(&[(key, huge.as_str())])).unwrap_err();
            assert!(matches!(err, AppError::ConfigError(_)), "{} accepted", key);
        }
        for ttl in ["0", "-3", "99999999999"] {
            let err = AppConfig::from_lookup(lookup_from(&[("SESSION_TTL_DAYS", ttl)])).unwrap_err();
            assert!(matches!(err, AppError::ConfigError(_)), "ttl {} accepted", ttl);
        }
    }
}
