//! [`Command`] for authorizing a [`LauncherSession`].

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::LauncherSession;
use crate::{
    domain::{launcher_session, Edition, ProductKey},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for resolving the [`ProductKey`] and the [`Edition`] behind an
/// access token of a [`LauncherSession`].
///
/// Checked on every request: nothing is cached, so a revoked [`ProductKey`]
/// invalidates all its [`LauncherSession`]s at once.
#[derive(Clone, Debug)]
pub struct AuthorizeLauncherSession {
    /// Access token presented by a launcher.
    pub access_token: String,
}

/// Output of [`AuthorizeLauncherSession`] [`Command`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Output {
    /// [`ProductKey`] the [`LauncherSession`] was issued for.
    pub product_key: ProductKey,

    /// [`Edition`] the [`ProductKey`] licenses.
    pub edition: Edition,
}

impl<Db, Idp> Command<AuthorizeLauncherSession> for Service<Db, Idp>
where
    Db: for<'t> Database<
        Select<
            By<
                Option<read::access_token::Info>,
                &'t launcher_session::AccessToken,
            >,
        >,
        Ok = Option<read::access_token::Info>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeLauncherSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let token = launcher_session::AccessToken::new(cmd.access_token)
            .ok_or(E::InvalidAccessToken)
            .map_err(tracerr::wrap!())?;

        let read::access_token::Info {
            session,
            product_key,
            edition,
        } = self
            .database()
            .execute(Select(By::new(&token)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InvalidAccessToken)
            .map_err(tracerr::wrap!())?;

        // Revocation takes precedence over expiration.
        if !product_key.is_active() {
            return Err(tracerr::new!(E::InvalidAccessToken));
        }
        if session.is_expired_at(DateTime::now()) {
            return Err(tracerr::new!(E::ExpiredAccessToken));
        }

        Ok(Output {
            product_key,
            edition,
        })
    }
}

/// Error of [`AuthorizeLauncherSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Presented access token is malformed, unknown or belongs to a revoked
    /// [`ProductKey`].
    #[display("Invalid access token")]
    InvalidAccessToken,

    /// [`LauncherSession`] of the presented access token is expired.
    #[display("Expired access token")]
    ExpiredAccessToken,
}
