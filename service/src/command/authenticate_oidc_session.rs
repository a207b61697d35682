//! [`Command`] for authenticating an [`oidc::Session`].

use std::time::Duration;

use common::DateTime;
use derive_more::{Display, Error};
use tracerr::Traced;

use crate::{domain::oidc, Service};

use super::Command;

/// [`AuthenticateOidcSession`] configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    /// Maximum age of an [`oidc::Session`] to be trusted, regardless of its
    /// expiration.
    ///
    /// [`None`] trusts an [`oidc::Session`] until it expires.
    pub max_age: Option<Duration>,
}

/// [`Command`] for checking that an [`oidc::Session`] is still valid.
///
/// Purely local: the identity provider is not asked.
#[derive(Clone, Copy, Debug)]
pub struct AuthenticateOidcSession<'s> {
    /// [`oidc::Session`] to authenticate.
    pub session: &'s oidc::Session,
}

impl<Db, Idp> Command<AuthenticateOidcSession<'_>> for Service<Db, Idp> {
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthenticateOidcSession<'_>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthenticateOidcSession { session } = cmd;
        let now = DateTime::now();

        if session.is_expired_at(now) {
            return Err(tracerr::new!(E::SessionExpired));
        }
        if let Some(max_age) = self.config().authenticate_oidc_session.max_age
        {
            // Windows reaching beyond the representable range never close.
            if session
                .created_at
                .checked_add(max_age)
                .is_some_and(|deadline| deadline.is_reached_at(now))
            {
                return Err(tracerr::new!(E::SessionExpired));
            }
        }

        Ok(())
    }
}

/// Error of [`AuthenticateOidcSession`] [`Command`] execution.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ExecutionError {
    /// [`oidc::Session`] is expired or too old to be trusted.
    #[display("`oidc::Session` is expired")]
    SessionExpired,
}
