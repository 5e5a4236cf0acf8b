use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable '{0}'")]
    Missing(&'static str),

    #[error("Invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// One background job's schedule and output file.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSettings {
    pub interval: Duration,
    pub log_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobsConfig {
    pub enabled: bool,
    /// GraphQL endpoint polled by the heartbeat.
    pub graphql_url: String,
    pub heartbeat: JobSettings,
    pub low_stock: JobSettings,
    pub reminders: JobSettings,
    pub report: JobSettings,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jobs: JobsConfig,
}

impl AppConfig {
    /// Reads the process environment. `.env` is loaded by the caller.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_or(get("PORT"), "PORT", 8080)?;

        let graphql_url =
            get("GRAPHQL_URL").unwrap_or_else(|| format!("http://127.0.0.1:{}/graphql", port));
        let enabled: bool = parse_or(get("JOBS_ENABLED"), "JOBS_ENABLED", true)?;

        let job = |interval_var: &'static str,
                   default_secs: u64,
                   log_var: &'static str,
                   default_log: &str|
         -> Result<JobSettings, ConfigError> {
            let secs: u64 = parse_or(get(interval_var), interval_var, default_secs)?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    name: interval_var,
                    value: secs.to_string(),
                });
            }
            Ok(JobSettings {
                interval: Duration::from_secs(secs),
                log_path: get(log_var)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(default_log)),
            })
        };

        let jobs = JobsConfig {
            enabled,
            graphql_url,
            heartbeat: job(
                "HEARTBEAT_INTERVAL_SECS",
                5 * 60,
                "HEARTBEAT_LOG",
                "/tmp/crm_heartbeat_log.txt",
            )?,
            low_stock: job(
                "LOW_STOCK_INTERVAL_SECS",
                12 * 60 * 60,
                "LOW_STOCK_LOG",
                "/tmp/low_stock_updates_log.txt",
            )?,
            reminders: job(
                "REMINDER_INTERVAL_SECS",
                24 * 60 * 60,
                "REMINDER_LOG",
                "/tmp/order_reminders_log.txt",
            )?,
            report: job(
                "REPORT_INTERVAL_SECS",
                7 * 24 * 60 * 60,
                "REPORT_LOG",
                "/tmp/crm_report_log.txt",
            )?,
        };

        log::info!("Configuration loaded (host {}, port {})", host, port);

        Ok(Self {
            database_url,
            host,
            port,
            jobs,
        })
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let cfg = config(&[("DATABASE_URL", "postgres://localhost/crm")]).unwrap();

        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert!(cfg.jobs.enabled);
        assert_eq!(cfg.jobs.graphql_url, "http://127.0.0.1:8080/graphql");
        assert_eq!(cfg.jobs.heartbeat.interval, Duration::from_secs(300));
        assert_eq!(cfg.jobs.report.interval, Duration::from_secs(604_800));
        assert_eq!(
            cfg.jobs.low_stock.log_path,
            PathBuf::from("/tmp/low_stock_updates_log.txt")
        );
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = config(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn overrides_are_read() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://db/crm"),
            ("PORT", "9000"),
            ("JOBS_ENABLED", "false"),
            ("REMINDER_INTERVAL_SECS", "60"),
            ("REPORT_LOG", "/var/log/crm_report.txt"),
        ])
        .unwrap();

        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.jobs.graphql_url, "http://127.0.0.1:9000/graphql");
        assert!(!cfg.jobs.enabled);
        assert_eq!(cfg.jobs.reminders.interval, Duration::from_secs(60));
        assert_eq!(
            cfg.jobs.report.log_path,
            PathBuf::from("/var/log/crm_report.txt")
        );
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = config(&[("DATABASE_URL", "postgres://db/crm"), ("PORT", "eighty")])
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for PORT: 'eighty'");

        let err = config(&[
            ("DATABASE_URL", "postgres://db/crm"),
            ("HEARTBEAT_INTERVAL_SECS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "HEARTBEAT_INTERVAL_SECS",
                ..
            }
        ));
    }
}
