//! [`Command`] for identifying the operator of an [`oidc::Session`].

use derive_more::{Display, Error};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::oidc,
    infra::{idp, IdentityProvider},
    Service,
};

use super::Command;

/// [`Command`] for resolving the [`oidc::User`] an [`oidc::Session`] belongs
/// to.
///
/// The [`oidc::Session`] is expected to be authenticated already, the
/// [`IdentityProvider`] is asked on every execution.
#[derive(Clone, Debug)]
pub struct GetOidcUser {
    /// [`oidc::Session`] to resolve the [`oidc::User`] of.
    pub session: oidc::Session,
}

impl<Db, Idp> Command<GetOidcUser> for Service<Db, Idp>
where
    Idp: IdentityProvider<
        idp::GetMe,
        Ok = oidc::User,
        Err = Traced<idp::Error>,
    >,
{
    type Ok = oidc::User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: GetOidcUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let GetOidcUser { session } = cmd;

        self.identity_provider()
            .execute(idp::GetMe(session))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .inspect_err(|e| {
                if let E::IdentityProviderUnavailable(_) = e.as_ref() {
                    log::error!("{e}");
                }
            })
    }
}

/// Error of [`GetOidcUser`] [`Command`] execution.
#[derive(Debug, Display, Error)]
pub enum ExecutionError {
    /// [`oidc::Session`] is not accepted by the [`IdentityProvider`].
    #[display("`oidc::Session` is rejected by the `IdentityProvider`")]
    InvalidSession,

    /// [`IdentityProvider`] is unreachable or broken.
    #[display("`IdentityProvider` is unavailable: {_0}")]
    IdentityProviderUnavailable(idp::Error),

    /// [`IdentityProvider`] failed in an unexpected way.
    #[display("`IdentityProvider` failed: {_0}")]
    IdentityProvider(idp::Error),
}

impl From<idp::Error> for ExecutionError {
    fn from(e: idp::Error) -> Self {
        match e {
            idp::Error::InvalidSession => Self::InvalidSession,
            e if e.is_unavailable() => Self::IdentityProviderUnavailable(e),
            e => Self::IdentityProvider(e),
        }
    }
}
