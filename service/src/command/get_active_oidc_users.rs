//! [`Command`] for listing the operators allowed to sign in.

use derive_more::{Display, Error};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::oidc,
    infra::{idp, IdentityProvider},
    Service,
};

use super::Command;

/// [`Command`] for listing the active [`oidc::User`]s, on behalf of an
/// authenticated [`oidc::Session`].
///
/// Suspended and deactivated [`oidc::User`]s are left out.
#[derive(Clone, Debug)]
pub struct GetActiveOidcUsers {
    /// [`oidc::Session`] to list the [`oidc::User`]s on behalf of.
    pub session: oidc::Session,
}

impl<Db, Idp> Command<GetActiveOidcUsers> for Service<Db, Idp>
where
    Idp: IdentityProvider<
        idp::GetUsers,
        Ok = Vec<oidc::User>,
        Err = Traced<idp::Error>,
    >,
{
    type Ok = Vec<oidc::User>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: GetActiveOidcUsers,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let GetActiveOidcUsers { session } = cmd;

        let mut users = self
            .identity_provider()
            .execute(idp::GetUsers(session))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .inspect_err(|e| {
                if let E::IdentityProviderUnavailable(_) = e.as_ref() {
                    log::error!("{e}");
                }
            })?;
        users.retain(oidc::User::is_active);

        Ok(users)
    }
}

/// Error of [`GetActiveOidcUsers`] [`Command`] execution.
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
