// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup (after an
//! optional `.env` file).
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8000` |
//! | `DATABASE_PATH` | redb database file | `data/pizza.redb` |
//! | `SECRET_KEY` | HMAC secret for signing tokens | Required |
//! | `ACCESS_TOKEN_TTL_SECS` | Access token lifetime | `900` |
//! | `REFRESH_TOKEN_TTL_SECS` | Refresh token lifetime | `2592000` |
//! | `ORDER_STATUS_TRANSITIONS` | `strict` or `permissive` | `strict` |
//! | `TLS_CERT_PATH` | PEM certificate chain, enables HTTPS | Optional |
//! | `TLS_KEY_PATH` | PEM private key, enables HTTPS | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{collections::HashMap, net::SocketAddr, path::PathBuf};

use crate::auth::tokens::{DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS};
use crate::orders::TransitionPolicy;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
pub const SECRET_KEY_ENV: &str = "SECRET_KEY";
pub const ACCESS_TOKEN_TTL_ENV: &str = "ACCESS_TOKEN_TTL_SECS";
pub const REFRESH_TOKEN_TTL_ENV: &str = "REFRESH_TOKEN_TTL_SECS";
pub const ORDER_STATUS_TRANSITIONS_ENV: &str = "ORDER_STATUS_TRANSITIONS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DATABASE_PATH: &str = "data/pizza.redb";

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    PartialTls,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, for development
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers
    Json,
}

/// PEM files for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Fully parsed runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub secret_key: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub transitions: TransitionPolicy,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Treat empty values like unset ones
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                value: raw,
                reason: "expected a port number",
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    name: HOST_ENV,
                    value: host.clone(),
                    reason: "expected an IP address",
                })?;

        let secret_key = get(SECRET_KEY_ENV).ok_or(ConfigError::Missing(SECRET_KEY_ENV))?;

        let access_token_ttl_secs =
            parse_ttl(get(ACCESS_TOKEN_TTL_ENV), ACCESS_TOKEN_TTL_ENV, DEFAULT_ACCESS_TTL_SECS)?;
        let refresh_token_ttl_secs = parse_ttl(
            get(REFRESH_TOKEN_TTL_ENV),
            REFRESH_TOKEN_TTL_ENV,
            DEFAULT_REFRESH_TTL_SECS,
        )?;

        let transitions = match get(ORDER_STATUS_TRANSITIONS_ENV) {
            Some(raw) => TransitionPolicy::parse(&raw).ok_or(ConfigError::Invalid {
                name: ORDER_STATUS_TRANSITIONS_ENV,
                value: raw,
                reason: "expected strict or permissive",
            })?,
            None => TransitionPolicy::default(),
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialTls),
        };

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            Some(v) if v == "pretty" => LogFormat::Pretty,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: v,
                    reason: "expected json or pretty",
                })
            }
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            database_path: get(DATABASE_PATH_ENV)
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
                .into(),
            secret_key,
            access_token_ttl_secs,
            refresh_token_ttl_secs,
            transitions,
            tls,
            log_format,
        })
    }

    /// Build from a fixed map of variables.
    pub fn from_map(vars: &HashMap<&str, &str>) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }
}

fn parse_ttl(raw: Option<String>, name: &'static str, default: i64) -> Result<i64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "expected a positive number of seconds",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_with_only_secret() {
        let vars = HashMap::from([(SECRET_KEY_ENV, "s3cret")]);
        let config = AppConfig::from_map(&vars).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8000".parse().unwrap());
        assert_eq!(config.database_path, PathBuf::from("data/pizza.redb"));
        assert_eq!(config.access_token_ttl_secs, 900);
        assert_eq!(config.refresh_token_ttl_secs, 2_592_000);
        assert_eq!(config.transitions, TransitionPolicy::Strict);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.tls.is_none());
    }

    #[test]
    fn secret_key_is_required() {
        let err = AppConfig::from_map(&HashMap::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(SECRET_KEY_ENV)));

        let blank = HashMap::from([(SECRET_KEY_ENV, "  ")]);
        assert!(matches!(
            AppConfig::from_map(&blank),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn overrides_are_parsed() {
        let vars = HashMap::from([
            (SECRET_KEY_ENV, "s3cret"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (ORDER_STATUS_TRANSITIONS_ENV, "permissive"),
            (LOG_FORMAT_ENV, "JSON"),
            (ACCESS_TOKEN_TTL_ENV, "60"),
        ]);
        let config = AppConfig::from_map(&vars).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.transitions, TransitionPolicy::Permissive);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.access_token_ttl_secs, 60);
    }

    #[test]
    fn invalid_values_are_reported() {
        let bad_port = HashMap::from([(SECRET_KEY_ENV, "s"), (PORT_ENV, "http")]);
        assert!(matches!(
            AppConfig::from_map(&bad_port),
            Err(ConfigError::Invalid { name: PORT_ENV, .. })
        ));

        let bad_ttl = HashMap::from([(SECRET_KEY_ENV, "s"), (REFRESH_TOKEN_TTL_ENV, "0")]);
        assert!(matches!(
            AppConfig::from_map(&bad_ttl),
            Err(ConfigError::Invalid { name: REFRESH_TOKEN_TTL_ENV, .. })
        ));

        let bad_policy = HashMap::from([(SECRET_KEY_ENV, "s"), (ORDER_STATUS_TRANSITIONS_ENV, "yolo")]);
        assert!(AppConfig::from_map(&bad_policy).is_err());
    }

    #[test]
    fn tls_paths_come_in_pairs() {
        let half = HashMap::from([(SECRET_KEY_ENV, "s"), (TLS_CERT_PATH_ENV, "cert.pem")]);
        assert!(matches!(
            AppConfig::from_map(&half),
            Err(ConfigError::PartialTls)
        ));

        let both = HashMap::from([
            (SECRET_KEY_ENV, "s"),
            (TLS_CERT_PATH_ENV, "cert.pem"),
            (TLS_KEY_PATH_ENV, "key.pem"),
        ]);
        let tls = AppConfig::from_map(&both).unwrap().tls.unwrap();
        assert_eq!(tls.cert, PathBuf::from("cert.pem"));
        assert_eq!(tls.key, PathBuf::from("key.pem"));
    }
}
