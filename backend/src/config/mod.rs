//! Runtime configuration, read once from the environment at startup.
//!
//! In production every identity, storage and service-account setting must be
//! present or startup fails. In development missing values fall back to local
//! defaults with a warning, and the CSRF origin check is switched off.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use log::{info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PROTECTED_PREFIXES: &[&str] = &[
    "/api/auth/me",
    "/api/user",
    "/api/student",
    "/api/professor",
    "/api/admin",
    "/api/courses",
    "/api/files",
    "/api/dashboard",
];

const DEV_SIGNING_KEY_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("cannot read service account file {path}: {source}")]
    ServiceAccountFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("service account is not valid JSON: {0}")]
    ServiceAccountJson(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("expected development or production, got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub api_key: String,
    pub project_id: String,
    pub app_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub identity: IdentityConfig,
    pub storage_bucket: PathBuf,
    pub storage_public_url: String,
    pub service_account: ServiceAccount,
    pub token_ttl_secs: i64,
    pub protected_prefixes: Vec<String>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Builds the configuration from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let env = Env { vars };
        let environment: Environment = env.parse_or("ALANT_ENV", Environment::Development)?;
        let dev = environment == Environment::Development;

        let host = env.get("ALANT_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = env.parse_or("ALANT_PORT", 8080u16)?;

        let identity = IdentityConfig {
            api_key: env.required("ALANT_AUTH_API_KEY", dev, "dev-api-key")?,
            project_id: env.required("ALANT_AUTH_PROJECT_ID", dev, "alant-dev")?,
            app_id: env.required("ALANT_AUTH_APP_ID", dev, "alant-dev-app")?,
        };
        let storage_bucket =
            PathBuf::from(env.required("ALANT_STORAGE_BUCKET", dev, "storage")?);
        let storage_public_url = env
            .get("ALANT_STORAGE_PUBLIC_URL")
            .unwrap_or_else(|| format!("http://{}:{}/storage", host, port));

        let service_account = match env.service_account()? {
            Some(account) => account,
            None if dev => {
                warn!("no service account configured, signing tokens with a per-process key");
                ServiceAccount {
                    project_id: identity.project_id.clone(),
                    client_email: "dev@localhost".to_string(),
                    private_key: random_signing_key(),
                }
            }
            None => return Err(ConfigError::Missing("ALANT_SERVICE_ACCOUNT")),
        };
        if service_account.private_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "ALANT_SERVICE_ACCOUNT",
                message: "private_key is empty".to_string(),
            });
        }

        let protected_prefixes = match env.get("ALANT_PROTECTED_PREFIXES") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_PROTECTED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        };

        let token_ttl_secs = env.parse_or("ALANT_TOKEN_TTL_SECS", 3600i64)?;
        if token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "ALANT_TOKEN_TTL_SECS",
                message: "must be positive".to_string(),
            });
        }
        let max_upload_mb = env.parse_or("ALANT_MAX_UPLOAD_MB", 25usize)?;

        let config = Config {
            environment,
            host,
            port,
            database_path: PathBuf::from(
                env.get("ALANT_DATABASE_PATH")
                    .unwrap_or_else(|| "alant.sqlite".to_string()),
            ),
            identity,
            storage_bucket,
            storage_public_url,
            service_account,
            token_ttl_secs,
            protected_prefixes,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        };
        info!(
            "configuration loaded: {:?} mode, project {}",
            config.environment, config.identity.project_id
        );
        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// Tokens signed with this key die with the process.
fn random_signing_key() -> String {
    let mut key = [0u8; DEV_SIGNING_KEY_BYTES];
    OsRng.fill_bytes(&mut key);
    hex::encode(key)
}

struct Env {
    vars: HashMap<String, String>,
}

impl Env {
    fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(
        &self,
        key: &'static str,
        dev: bool,
        dev_default: &str,
    ) -> Result<String, ConfigError> {
        match self.get(key) {
            Some(value) => Ok(value),
            None if dev => {
                warn!("{} not set, using development default '{}'", key, dev_default);
                Ok(dev_default.to_string())
            }
            None => Err(ConfigError::Missing(key)),
        }
    }

    fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                message: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    /// Inline JSON wins over a file path.
    fn service_account(&self) -> Result<Option<ServiceAccount>, ConfigError> {
        if let Some(json) = self.get("ALANT_SERVICE_ACCOUNT") {
            return Ok(Some(serde_json::from_str(&json)?));
        }
        if let Some(path) = self.get("ALANT_SERVICE_ACCOUNT_PATH") {
            let json = std::fs::read_to_string(&path)
                .map_err(|source| ConfigError::ServiceAccountFile { path, source })?;
            return Ok(Some(serde_json::from_str(&json)?));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const ACCOUNT: &str =
        r#"{"project_id":"alant","client_email":"svc@alant.iam","private_key":"k3y"}"#;

    #[test]
    fn development_mode_fills_in_defaults() {
        let config = Config::from_vars(HashMap::new()).expect("dev config");
        assert!(config.is_development());
        assert_eq!(config.bind_address(), ("127.0.0.1".to_string(), 8080));
        assert_eq!(config.service_account.private_key.len(), DEV_SIGNING_KEY_BYTES * 2);
        assert_eq!(config.protected_prefixes.len(), DEFAULT_PROTECTED_PREFIXES.len());
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
    }

    #[test]
    fn development_signing_keys_differ_per_load() {
        let first = Config::from_vars(HashMap::new()).expect("dev config");
        let second = Config::from_vars(HashMap::new()).expect("dev config");
        assert_ne!(
            first.service_account.private_key,
            second.service_account.private_key
        );
    }

    #[test]
    fn production_requires_identity_and_service_account() {
        let err = Config::from_vars(vars(&[("ALANT_ENV", "production")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ALANT_AUTH_API_KEY")));

        let err = Config::from_vars(vars(&[
            ("ALANT_ENV", "production"),
            ("ALANT_AUTH_API_KEY", "k"),
            ("ALANT_AUTH_PROJECT_ID", "p"),
            ("ALANT_AUTH_APP_ID", "a"),
            ("ALANT_STORAGE_BUCKET", "/var/lib/alant"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ALANT_SERVICE_ACCOUNT")));
    }

    #[test]
    fn production_with_inline_service_account() {
        let config = Config::from_vars(vars(&[
            ("ALANT_ENV", "production"),
            ("ALANT_AUTH_API_KEY", "k"),
            ("ALANT_AUTH_PROJECT_ID", "p"),
            ("ALANT_AUTH_APP_ID", "a"),
            ("ALANT_STORAGE_BUCKET", "/var/lib/alant"),
            ("ALANT_SERVICE_ACCOUNT", ACCOUNT),
            ("ALANT_PROTECTED_PREFIXES", "/api/a, /api/b,"),
        ]))
        .expect("config");
        assert!(!config.is_development());
        assert_eq!(config.service_account.private_key, "k3y");
        assert_eq!(config.protected_prefixes, vec!["/api/a", "/api/b"]);
    }

    #[test]
    fn service_account_can_come_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(ACCOUNT.as_bytes()).expect("write");
        let config = Config::from_vars(vars(&[(
            "ALANT_SERVICE_ACCOUNT_PATH",
            file.path().to_str().expect("utf-8 path"),
        )]))
        .expect("config");
        assert_eq!(config.service_account.client_email, "svc@alant.iam");
    }

    #[test]
    fn malformed_values_are_reported() {
        let err = Config::from_vars(vars(&[("ALANT_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "ALANT_PORT", .. }));

        let err = Config::from_vars(vars(&[("ALANT_SERVICE_ACCOUNT", "{")])).unwrap_err();
        assert!(matches!(err, ConfigError::ServiceAccountJson(_)));
    }
}
