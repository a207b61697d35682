//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use derive_more::{Display, Error};
use serde::Deserialize;
use service::{
    command::{authenticate_oidc_session, authorize_edition},
    domain::oidc,
    infra::idp,
};
use smart_default::SmartDefault;
use url::Url;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// [OpenID Connect] configuration.
    ///
    /// [OpenID Connect]: https://openid.net/specs/openid-connect-core-1_0.html
    #[serde(default)]
    pub oidc: Oidc,

    /// Launcher configuration.
    #[serde(default)]
    pub launcher: Launcher,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }

    /// Longest duration accepted by any setting.
    pub const MAX_DURATION: time::Duration =
        time::Duration::from_secs(100 * 365 * 24 * 60 * 60);

    /// Builds the [`service::Config`] out of this [`Config`].
    ///
    /// # Errors
    ///
    /// If [`Oidc::client_id`] is not set, or any duration exceeds
    /// [`Config::MAX_DURATION`].
    pub fn service(&self) -> Result<service::Config, InvalidConfig> {
        let Self {
            oidc: conf,
            launcher,
            log: _,
        } = self;

        let client_id = oidc::ClientId::new(conf.client_id.clone())
            .ok_or(InvalidConfig::MissingClientId)?;

        for (name, duration) in [
            ("oidc.request_timeout", Some(conf.request_timeout)),
            ("oidc.max_session_age", conf.max_session_age),
            ("launcher.access_token_ttl", Some(launcher.access_token_ttl)),
        ] {
            if duration.is_some_and(|d| d > Self::MAX_DURATION) {
                return Err(InvalidConfig::DurationOutOfRange(name));
            }
        }

        Ok(service::Config {
            oidc_client: oidc::Client { client_id },
            oidc_authorization_endpoint: None,
            authenticate_oidc_session: authenticate_oidc_session::Config {
                max_age: conf.max_session_age,
            },
            authorize_edition: authorize_edition::Config {
                access_token_ttl: launcher.access_token_ttl,
            },
        })
    }
}

/// Error of building a [`service::Config`] out of an invalid [`Config`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum InvalidConfig {
    /// [`Oidc::client_id`] is not set.
    #[display("`oidc.client_id` must be set")]
    MissingClientId,

    /// Duration setting exceeds [`Config::MAX_DURATION`].
    #[display("`{_0}` must not exceed 100 years")]
    DurationOutOfRange(#[error(not(source))] &'static str),
}

/// [OpenID Connect] configuration.
///
/// [OpenID Connect]: https://openid.net/specs/openid-connect-core-1_0.html
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Oidc {
    /// Client ID registered at the identity provider.
    pub client_id: String,

    /// Base URL of the identity provider API.
    #[default(idp::http::Config::default().base_url)]
    pub base_url: Url,

    /// Timeout of a single request to the identity provider.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub request_timeout: time::Duration,

    /// Maximum age of an operator session to be trusted.
    ///
    /// Sessions are trusted until their expiration if unset.
    #[serde(with = "humantime_serde")]
    pub max_session_age: Option<time::Duration>,
}

impl From<&Oidc> for idp::http::Config {
    fn from(value: &Oidc) -> Self {
        Self {
            base_url: value.base_url.clone(),
            request_timeout: value.request_timeout,
        }
    }
}

/// Launcher configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Launcher {
    /// Lifetime of an access token issued for a product key.
    #[default(time::Duration::from_secs(60 * 60 * 24))]
    #[serde(with = "humantime_serde")]
    pub access_token_ttl: time::Duration,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
