//! [`Command`] for completing an [OpenID Connect] authorization.
//!
//! [OpenID Connect]: https://openid.net/specs/openid-connect-core-1_0.html

use derive_more::{Display, Error};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::oidc,
    infra::{idp, IdentityProvider},
    Service,
};

use super::Command;

/// [`Command`] for exchanging an [`oidc::AuthorizationCode`] received by the
/// callback for an [`oidc::Session`].
///
/// The [`IdentityProvider`] is asked once, without retries.
#[derive(Clone, Debug)]
pub struct HandleOidcCallback {
    /// [`oidc::AuthState`] the authorization was started with.
    pub auth_state: oidc::AuthState,

    /// [`oidc::AuthorizationCode`] received by the callback.
    pub code: oidc::AuthorizationCode,
}

impl<Db, Idp> Command<HandleOidcCallback> for Service<Db, Idp>
where
    Idp: IdentityProvider<
        idp::ExchangeCode,
        Ok = oidc::Session,
        Err = Traced<idp::Error>,
    >,
{
    type Ok = oidc::Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: HandleOidcCallback,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let HandleOidcCallback { auth_state, code } = cmd;

        self.identity_provider()
            .execute(idp::ExchangeCode {
                client: self.config().oidc_client.clone(),
                code,
                auth_state,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .inspect_err(|e| {
                if let E::IdentityProviderUnavailable(_) = e.as_ref() {
                    log::error!("{e}");
                }
            })
    }
}

/// Error of [`HandleOidcCallback`] [`Command`] execution.
#[derive(Debug, Display, Error)]
pub enum ExecutionError {
    /// [`oidc::AuthState`] or [`oidc::AuthorizationCode`] is rejected by the
    /// [`IdentityProvider`].
    #[display("Invalid authorization state or code")]
    InvalidAuthStateOrCode,

    /// [`IdentityProvider`] is unreachable or broken.
    #[display("`IdentityProvider` is unavailable: {_0}")]
    IdentityProviderUnavailable(idp::Error),

    /// [`IdentityProvider`] failed in an unexpected way.
    #[display("`IdentityProvider` failed: {_0}")]
    IdentityProvider(idp::Error),
}

impl From<idp::Error> for ExecutionError {
    fn from(e: idp::Error) -> Self {
        if e.is_rejection() {
            Self::InvalidAuthStateOrCode
        } else if e.is_unavailable() {
            Self::IdentityProviderUnavailable(e)
        } else {
            Self::IdentityProvider(e)
        }
    }
}
