//! Service contains the credential and session logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use derive_more::Debug;
use url::Url;
#[cfg(test)]
use {serde_json as _, wiremock as _};

#[cfg(doc)]
use infra::{Database, IdentityProvider};

use self::domain::oidc;
pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [`oidc::Client`] operators are authenticated as.
    pub oidc_client: oidc::Client,

    /// Authorization endpoint of the [`IdentityProvider`] operators are
    /// redirected to, if known.
    pub oidc_authorization_endpoint: Option<Url>,

    /// [`command::AuthenticateOidcSession`] configuration.
    pub authenticate_oidc_session: command::authenticate_oidc_session::Config,

    /// [`command::AuthorizeEdition`] configuration.
    pub authorize_edition: command::authorize_edition::Config,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Idp> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`IdentityProvider`] of this [`Service`].
    identity_provider: Idp,
}

impl<Db, Idp> Service<Db, Idp> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, database: Db, identity_provider: Idp) -> Self {
        Self {
            config,
            database,
            identity_provider,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`IdentityProvider`] of this [`Service`].
    #[must_use]
    pub fn identity_provider(&self) -> &Idp {
        &self.identity_provider
    }
}
