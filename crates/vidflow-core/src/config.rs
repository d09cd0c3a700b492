//! Configuration module
//!
//! Configuration is read once at startup. Each component gets its own section: the
//! gateway needs a storage destination, the watcher needs a queue destination. A section
//! is only built (and its destination only required) when the configured role runs that
//! component. Any failure here is fatal; nothing in this module is consulted per request.

use std::env;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::storage_types::{QueueBackend, StorageBackend};

const SERVER_PORT: u16 = 3000;
const MAX_UPLOAD_BODY_MB: usize = 10;
const REDELIVERY_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_REGION: &str = "us-east-1";
const LOCAL_STORAGE_PATH: &str = "./data";

/// Which pipeline components this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRole {
    /// Upload gateway and ingestion watcher in one process
    All,
    Gateway,
    Watcher,
}

impl ServiceRole {
    pub fn runs_gateway(self) -> bool {
        matches!(self, ServiceRole::All | ServiceRole::Gateway)
    }

    pub fn runs_watcher(self) -> bool {
        matches!(self, ServiceRole::All | ServiceRole::Watcher)
    }
}

impl FromStr for ServiceRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ServiceRole::All),
            "gateway" => Ok(ServiceRole::Gateway),
            "watcher" => Ok(ServiceRole::Watcher),
            _ => Err(anyhow::anyhow!("Invalid service role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Settings shared by every role
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: LogFormat,
    pub max_upload_body_bytes: usize,
}

/// Upload gateway settings
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Storage destination identifier
    pub bucket_name: String,
    pub storage_backend: StorageBackend,
    pub s3_region: String,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: String,
}

/// Ingestion watcher settings
#[derive(Clone, Debug)]
pub struct WatcherConfig {
    /// Queue destination identifier (an SQS queue URL for the SQS backend)
    pub queue_url: String,
    pub queue_backend: QueueBackend,
    pub sqs_region: String,
    pub sqs_endpoint: Option<String>,
    pub redelivery_max_attempts: u32,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub role: ServiceRole,
    pub base: BaseConfig,
    pub gateway: Option<GatewayConfig>,
    pub watcher: Option<WatcherConfig>,
}

impl Config {
    /// Load from the process environment (and `.env`, when present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let role: ServiceRole = parse_or(&var, "SERVICE_ROLE", ServiceRole::All)?;

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_body_mb: usize = parse_or(&var, "MAX_UPLOAD_BODY_MB", MAX_UPLOAD_BODY_MB)?;
        let max_upload_body_bytes = max_upload_body_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| ConfigError::Invalid {
                var: "MAX_UPLOAD_BODY_MB",
                reason: format!("{} MB does not fit in the address space", max_upload_body_mb),
            })?;

        let base = BaseConfig {
            server_port: parse_or(&var, "PORT", SERVER_PORT)?,
            cors_origins,
            environment,
            log_format: parse_or(&var, "LOG_FORMAT", LogFormat::Pretty)?,
            max_upload_body_bytes,
        };

        let region = var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());

        let gateway = if role.runs_gateway() {
            Some(GatewayConfig {
                bucket_name: var("BUCKET_NAME").ok_or(ConfigError::Missing("BUCKET_NAME"))?,
                storage_backend: parse_or(&var, "STORAGE_BACKEND", StorageBackend::S3)?,
                s3_region: var("S3_REGION").unwrap_or_else(|| region.clone()),
                s3_endpoint: var("S3_ENDPOINT"),
                local_storage_path: var("LOCAL_STORAGE_PATH")
                    .unwrap_or_else(|| LOCAL_STORAGE_PATH.to_string()),
            })
        } else {
            None
        };

        let watcher = if role.runs_watcher() {
            Some(WatcherConfig {
                queue_url: var("QUEUE_URL").ok_or(ConfigError::Missing("QUEUE_URL"))?,
                queue_backend: parse_or(&var, "QUEUE_BACKEND", QueueBackend::Sqs)?,
                sqs_region: var("SQS_REGION").unwrap_or_else(|| region.clone()),
                sqs_endpoint: var("SQS_ENDPOINT"),
                redelivery_max_attempts: parse_or(
                    &var,
                    "REDELIVERY_MAX_ATTEMPTS",
                    REDELIVERY_MAX_ATTEMPTS,
                )?,
            })
        } else {
            None
        };

        let config = Config {
            role,
            base,
            gateway,
            watcher,
        };
        config.validate()?;
        Ok(config)
    }

    /// Cross-field checks that cannot be expressed while parsing single variables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(ConfigError::Invalid {
                var: "CORS_ORIGINS",
                reason: "'*' is not allowed in production; list explicit origins".to_string(),
            });
        }

        if self.base.max_upload_body_bytes == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_UPLOAD_BODY_MB",
                reason: "must be greater than 0".to_string(),
            });
        }

        if let Some(watcher) = &self.watcher {
            if watcher.redelivery_max_attempts == 0 {
                return Err(ConfigError::Invalid {
                    var: "REDELIVERY_MAX_ATTEMPTS",
                    reason: "must be at least 1".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.base.log_format
    }

    pub fn max_upload_body_bytes(&self) -> usize {
        self.base.max_upload_body_bytes
    }

    /// True when uploads land in local storage and the watcher runs in the same process,
    /// so object-created events are delivered in process.
    pub fn runs_local_pipeline(&self) -> bool {
        self.role == ServiceRole::All
            && self
                .gateway
                .as_ref()
                .is_some_and(|g| g.storage_backend == StorageBackend::Local)
    }
}

fn parse_or<T, V>(var: &V, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn all_role_requires_both_destinations() {
        assert_eq!(
            load(&[("QUEUE_URL", "https://sqs/q")]).unwrap_err(),
            ConfigError::Missing("BUCKET_NAME")
        );
        assert_eq!(
            load(&[("BUCKET_NAME", "videos")]).unwrap_err(),
            ConfigError::Missing("QUEUE_URL")
        );
    }

    #[test]
    fn single_role_only_requires_its_destination() {
        let gateway = load(&[("SERVICE_ROLE", "gateway"), ("BUCKET_NAME", "videos")]).unwrap();
        assert!(gateway.watcher.is_none());
        assert_eq!(gateway.gateway.unwrap().bucket_name, "videos");

        let watcher = load(&[("SERVICE_ROLE", "watcher"), ("QUEUE_URL", "q")]).unwrap();
        assert!(watcher.gateway.is_none());
        assert_eq!(watcher.watcher.unwrap().queue_url, "q");
    }

    #[test]
    fn blank_destination_counts_as_missing() {
        assert_eq!(
            load(&[("SERVICE_ROLE", "gateway"), ("BUCKET_NAME", "  ")]).unwrap_err(),
            ConfigError::Missing("BUCKET_NAME")
        );
    }

    #[test]
    fn defaults_are_applied() {
        let config = load(&[("BUCKET_NAME", "videos"), ("QUEUE_URL", "q")]).unwrap();
        assert_eq!(config.role, ServiceRole::All);
        assert_eq!(config.server_port(), 3000);
        assert_eq!(config.max_upload_body_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.log_format(), LogFormat::Pretty);
        let gateway = config.gateway.as_ref().unwrap();
        assert_eq!(gateway.storage_backend, StorageBackend::S3);
        assert_eq!(gateway.s3_region, "us-east-1");
        let watcher = config.watcher.as_ref().unwrap();
        assert_eq!(watcher.queue_backend, QueueBackend::Sqs);
        assert_eq!(watcher.redelivery_max_attempts, 5);
        assert!(!config.runs_local_pipeline());
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = load(&[
            ("BUCKET_NAME", "videos"),
            ("QUEUE_URL", "q"),
            ("STORAGE_BACKEND", "nfs"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "STORAGE_BACKEND", .. }));

        let err = load(&[("BUCKET_NAME", "videos"), ("QUEUE_URL", "q"), ("PORT", "http")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }

    #[test]
    fn oversized_body_limit_is_rejected_not_wrapped() {
        let huge = usize::MAX.to_string();
        let err = load(&[
            ("BUCKET_NAME", "videos"),
            ("QUEUE_URL", "q"),
            ("MAX_UPLOAD_BODY_MB", huge.as_str()),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "MAX_UPLOAD_BODY_MB", .. }));

        let zero = load(&[
            ("BUCKET_NAME", "videos"),
            ("QUEUE_URL", "q"),
            ("MAX_UPLOAD_BODY_MB", "0"),
        ])
        .unwrap_err();
        assert!(matches!(zero, ConfigError::Invalid { var: "MAX_UPLOAD_BODY_MB", .. }));
    }

    #[test]
    fn wildcard_cors_rejected_in_production() {
        let err = load(&[
            ("BUCKET_NAME", "videos"),
            ("QUEUE_URL", "q"),
            ("ENVIRONMENT", "production"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "CORS_ORIGINS", .. }));

        let config = load(&[
            ("BUCKET_NAME", "videos"),
            ("QUEUE_URL", "q"),
            ("APP_ENV", "prod"),
            ("CORS_ORIGINS", "https://upload.example.com, https://admin.example.com"),
        ])
        .unwrap();
        assert!(config.is_production());
        assert_eq!(config.cors_origins().len(), 2);
    }

    #[test]
    fn local_pipeline_needs_local_storage_and_both_components() {
        let config = load(&[
            ("BUCKET_NAME", "videos"),
            ("QUEUE_URL", "local-queue"),
            ("STORAGE_BACKEND", "local"),
            ("QUEUE_BACKEND", "memory"),
        ])
        .unwrap();
        assert!(config.runs_local_pipeline());

        let gateway_only = load(&[
            ("SERVICE_ROLE", "gateway"),
            ("BUCKET_NAME", "videos"),
            ("STORAGE_BACKEND", "local"),
        ])
        .unwrap();
        assert!(!gateway_only.runs_local_pipeline());
    }
}
