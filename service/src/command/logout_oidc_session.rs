//! [`Command`] for logging out an [`oidc::Session`].

use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::oidc,
    infra::{idp, IdentityProvider},
    Service,
};

use super::Command;

/// [`Command`] for revoking the access token of an [`oidc::Session`] at the
/// [`IdentityProvider`].
#[derive(Clone, Debug, From)]
pub struct LogoutOidcSession {
    /// [`oidc::Session`] to log out.
    pub session: oidc::Session,
}

impl<Db, Idp> Command<LogoutOidcSession> for Service<Db, Idp>
where
    Idp: IdentityProvider<
        idp::RevokeToken,
        Ok = (),
        Err = Traced<idp::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: LogoutOidcSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let LogoutOidcSession { session } = cmd;

        self.identity_provider()
            .execute(idp::RevokeToken(session))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`LogoutOidcSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`IdentityProvider`] failed to revoke the access token.
    #[display("`IdentityProvider` failed to revoke the token: {_0}")]
    IdentityProvider(idp::Error),
}
