// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! [`AppConfig`] struct built from them once at startup. A `.env` file in the
//! working directory is honoured (loaded by `main` before [`AppConfig::from_env`]).
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH0_DOMAIN` | Auth0 tenant domain (issuer host, JWKS host) | Required |
//! | `API_AUDIENCE` | Expected JWT audience claim | Required |
//! | `ALGORITHMS` | Comma-separated accepted JWS algorithms | `RS256` |
//! | `DATABASE_URL` | Path of the redb database file | `casting.redb` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWKS_CACHE_TTL_SECS` | How long a fetched key set is trusted | `300` |
//! | `JWKS_TIMEOUT_SECS` | HTTP timeout for the key set fetch | `10` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";
pub const API_AUDIENCE_ENV: &str = "API_AUDIENCE";
pub const ALGORITHMS_ENV: &str = "ALGORITHMS";

/// Environment variable name for the database file path.
///
/// The name is kept from the connection-string convention; for the embedded
/// store it is a filesystem path, created on first start.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_TIMEOUT_ENV: &str = "JWKS_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_DATABASE_PATH: &str = "casting.redb";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_ALGORITHMS: &str = "RS256";
const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_JWKS_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Settings for token verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Issuer URL, always `https://{domain}/`.
    pub issuer: String,
    /// Key set endpoint, `https://{domain}/.well-known/jwks.json`.
    pub jwks_url: String,
    pub audience: String,
    pub algorithms: Vec<Algorithm>,
    pub jwks_cache_ttl: Duration,
    pub jwks_timeout: Duration,
}

impl AuthSettings {
    /// Build settings for an Auth0 tenant.
    ///
    /// `domain` may be a bare host (`tenant.eu.auth0.com`) or a URL with
    /// scheme and trailing slash; both normalise to the same issuer.
    pub fn for_domain(
        domain: &str,
        audience: impl Into<String>,
        algorithms: Vec<Algorithm>,
    ) -> Result<Self, ConfigError> {
        let trimmed = domain.trim().trim_end_matches('/');
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        let base = Url::parse(&with_scheme).map_err(|e| ConfigError::Invalid {
            name: AUTH0_DOMAIN_ENV,
            reason: e.to_string(),
        })?;
        let host = base.host_str().ok_or_else(|| ConfigError::Invalid {
            name: AUTH0_DOMAIN_ENV,
            reason: "domain has no host".to_string(),
        })?;
        let authority = match base.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let issuer = format!("{}://{authority}/", base.scheme());
        let jwks_url = format!("{issuer}.well-known/jwks.json");

        if algorithms.is_empty() {
            return Err(ConfigError::Invalid {
                name: ALGORITHMS_ENV,
                reason: "at least one algorithm is required".to_string(),
            });
        }

        Ok(Self {
            issuer,
            jwks_url,
            audience: audience.into(),
            algorithms,
            jwks_cache_ttl: Duration::from_secs(DEFAULT_JWKS_CACHE_TTL_SECS),
            jwks_timeout: Duration::from_secs(DEFAULT_JWKS_TIMEOUT_SECS),
        })
    }
}

/// Application configuration, read once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub auth: AuthSettings,
    pub database_path: String,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let domain = required(AUTH0_DOMAIN_ENV)?;
        let audience = required(API_AUDIENCE_ENV)?;
        let algorithms = parse_algorithms(
            &std::env::var(ALGORITHMS_ENV).unwrap_or_else(|_| DEFAULT_ALGORITHMS.to_string()),
        )?;

        let mut auth = AuthSettings::for_domain(&domain, audience, algorithms)?;
        auth.jwks_cache_ttl =
            Duration::from_secs(parse_or(JWKS_CACHE_TTL_ENV, DEFAULT_JWKS_CACHE_TTL_SECS)?);
        auth.jwks_timeout = Duration::from_secs(parse_or(JWKS_TIMEOUT_ENV, DEFAULT_JWKS_TIMEOUT_SECS)?);

        let database_path =
            std::env::var(DATABASE_URL_ENV).unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());

        let host = std::env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port: u16 = parse_or(PORT_ENV, DEFAULT_PORT)?;
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: HOST_ENV,
                reason: e.to_string(),
            })?;

        Ok(Self {
            auth,
            database_path,
            bind_addr,
        })
    }
}

/// Parse a comma- or space-separated algorithm list such as `RS256,RS384`.
pub fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|s| s.trim_matches(|c| c == '[' || c == ']' || c == '"' || c == '\''))
        .filter(|s| !s.is_empty())
        .map(|s| {
            Algorithm::from_str(s).map_err(|_| ConfigError::Invalid {
                name: ALGORITHMS_ENV,
                reason: format!("unknown algorithm {s}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if algorithms.is_empty() {
        return Err(ConfigError::Invalid {
            name: ALGORITHMS_ENV,
            reason: "at least one algorithm is required".to_string(),
        });
    }

    Ok(algorithms)
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
