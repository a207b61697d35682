//! [`IdentityProvider`]-related implementations.

#[cfg(feature = "http")]
pub mod http;

use derive_more::{Display, Error as StdError};

use crate::domain::oidc;

#[cfg(feature = "http")]
pub use self::http::Http;

/// Operation of an external [OpenID Connect] identity provider.
///
/// [OpenID Connect]: https://openid.net/specs/openid-connect-core-1_0.html
pub use common::Handler as IdentityProvider;

/// Operation exchanging an [`oidc::AuthorizationCode`] for an
/// [`oidc::Session`].
#[derive(Clone, Debug)]
pub struct ExchangeCode {
    /// [`oidc::Client`] the [`oidc::AuthorizationCode`] was issued to.
    pub client: oidc::Client,

    /// [`oidc::AuthorizationCode`] to exchange.
    pub code: oidc::AuthorizationCode,

    /// [`oidc::AuthState`] the authorization was started with.
    pub auth_state: oidc::AuthState,
}

/// Operation revoking the access token of an [`oidc::Session`].
#[derive(Clone, Debug)]
pub struct RevokeToken(pub oidc::Session);

/// Operation resolving the [`oidc::User`] an [`oidc::Session`] belongs to.
#[derive(Clone, Debug)]
pub struct GetMe(pub oidc::Session);

/// Operation listing the [`oidc::User`]s that are not deactivated, on behalf
/// of an [`oidc::Session`].
#[derive(Clone, Debug)]
pub struct GetUsers(pub oidc::Session);

/// [`IdentityProvider`] error.
#[derive(Clone, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// [`oidc::Client`] is not recognized.
    #[display("`IdentityProvider` rejected the client")]
    InvalidClient,

    /// Authorization code or its verifier is rejected.
    #[display("`IdentityProvider` rejected the credentials")]
    InvalidCredentials,

    /// Access token of an [`oidc::Session`] is not accepted anymore.
    #[display("`IdentityProvider` rejected the session")]
    InvalidSession,

    /// [`IdentityProvider`] cannot be reached.
    #[display("`IdentityProvider` is unreachable: {_0}")]
    Unreachable(#[error(not(source))] String),

    /// [`IdentityProvider`] failed to process a request.
    #[display("`IdentityProvider` is broken, responded with `{_0}` status")]
    Broken(#[error(not(source))] u16),

    /// [`IdentityProvider`] responded with an unexpected status.
    #[display("`IdentityProvider` responded with unexpected `{_0}` status")]
    UnexpectedStatus(#[error(not(source))] u16),

    /// [`IdentityProvider`] response cannot be decoded.
    #[display("Failed to decode `IdentityProvider` response: {_0}")]
    Decode(#[error(not(source))] String),
}

impl Error {
    /// Checks whether this [`Error`] means that the [`IdentityProvider`] is
    /// temporarily unable to serve requests.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Unreachable(..) | Self::Broken(..) => true,
            Self::InvalidClient
            | Self::InvalidCredentials
            | Self::InvalidSession
            | Self::UnexpectedStatus(..)
            | Self::Decode(..) => false,
        }
    }

    /// Checks whether this [`Error`] means that the [`IdentityProvider`]
    /// rejected the presented client, credentials or session.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::InvalidClient
            | Self::InvalidCredentials
            | Self::InvalidSession => true,
            Self::Unreachable(..)
            | Self::Broken(..)
            | Self::UnexpectedStatus(..)
            | Self::Decode(..) => false,
        }
    }
}
