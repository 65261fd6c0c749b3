use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use uuid::Uuid;

use crate::workflows::leads::{AgencyId, StatusPolicy};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub leads: LeadsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            leads: LeadsConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Tenancy and CRM dials for the lead workflow.
#[derive(Debug, Clone)]
pub struct LeadsConfig {
    pub multi_tenant: bool,
    pub default_agency: Option<AgencyId>,
    pub status_vocabulary: Option<Vec<String>>,
}

impl Default for LeadsConfig {
    fn default() -> Self {
        Self {
            multi_tenant: true,
            default_agency: None,
            status_vocabulary: None,
        }
    }
}

impl LeadsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let multi_tenant = match env::var("LEADS_MULTI_TENANT") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                name: "LEADS_MULTI_TENANT",
            })?,
            Err(_) => true,
        };

        let default_agency = match env::var("LEADS_DEFAULT_AGENCY") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                Uuid::parse_str(raw.trim())
                    .map(AgencyId)
                    .map_err(|source| ConfigError::InvalidAgencyId { source })?,
            ),
            _ => None,
        };

        let status_vocabulary = env::var("CRM_STATUS_VOCABULARY").ok().and_then(|raw| {
            let entries: Vec<String> = raw
                .split('|')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect();
            (!entries.is_empty()).then_some(entries)
        });

        Ok(Self {
            multi_tenant,
            default_agency,
            status_vocabulary,
        })
    }

    pub fn status_policy(&self) -> StatusPolicy {
        match &self.status_vocabulary {
            Some(entries) => StatusPolicy::vocabulary(entries.iter().cloned()),
            None => StatusPolicy::Lenient,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { name: &'static str },
    InvalidAgencyId { source: uuid::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { name } => {
                write!(f, "{name} must be one of true/false/1/0/yes/no/on/off")
            }
            ConfigError::InvalidAgencyId { .. } => {
                write!(f, "LEADS_DEFAULT_AGENCY must be a UUID")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidFlag { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidAgencyId { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("LEADS_MULTI_TENANT");
        env::remove_var("LEADS_DEFAULT_AGENCY");
        env::remove_var("CRM_STATUS_VOCABULARY");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.leads.multi_tenant);
        assert!(config.leads.default_agency.is_none());
        assert_eq!(config.leads.status_policy(), StatusPolicy::Lenient);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_single_tenant_mode_and_vocabulary() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LEADS_MULTI_TENANT", "off");
        env::set_var(
            "LEADS_DEFAULT_AGENCY",
            "6f1c2c8e-52a4-4a4b-9a57-0d0a4f1f9c11",
        );
        env::set_var("CRM_STATUS_VOCABULARY", "À traiter | Contacté||Perdu / Abandon");

        let config = AppConfig::load().expect("config loads");
        assert!(!config.leads.multi_tenant);
        assert!(config.leads.default_agency.is_some());
        assert_eq!(
            config.leads.status_vocabulary,
            Some(vec![
                "À traiter".to_string(),
                "Contacté".to_string(),
                "Perdu / Abandon".to_string(),
            ])
        );
        reset_env();
    }

    #[test]
    fn rejects_unparseable_flag() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LEADS_MULTI_TENANT", "maybe");
        match AppConfig::load() {
            Err(ConfigError::InvalidFlag { name }) => assert_eq!(name, "LEADS_MULTI_TENANT"),
            other => panic!("expected flag error, got {other:?}"),
        }
        reset_env();
    }
}
