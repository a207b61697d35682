//! [`Command`] for authorizing a launcher with a [`ProductKey`].

use std::time::Duration;

use common::{
    operations::{By, Insert, Select},
    secret, DateTime,
};
use derive_more::{Display, Error, From};
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Edition;
use crate::{
    domain::{launcher_session, product_key, LauncherSession, ProductKey},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`AuthorizeEdition`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Lifetime of an issued [`LauncherSession`].
    #[default(Duration::from_secs(24 * 60 * 60))]
    pub access_token_ttl: Duration,
}

/// [`Command`] for issuing a [`LauncherSession`] in exchange for an
/// active [`ProductKey`].
///
/// Every rejection is reported as [`ExecutionError::InvalidProductKey`],
/// so a caller cannot tell an unknown key from a revoked one.
#[derive(Clone, Debug)]
pub struct AuthorizeEdition {
    /// Key string presented by a launcher.
    pub key: String,
}

impl<Db, Idp> Command<AuthorizeEdition> for Service<Db, Idp>
where
    Db: for<'k> Database<
            Select<By<Option<ProductKey>, &'k product_key::Key>>,
            Ok = Option<ProductKey>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<LauncherSession>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = LauncherSession;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeEdition,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let key = product_key::Key::new(cmd.key)
            .ok_or(E::InvalidProductKey)
            .map_err(tracerr::wrap!())?;

        let product_key = self
            .database()
            .execute(Select(By::new(&key)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(ProductKey::is_active)
            .ok_or(E::InvalidProductKey)
            .map_err(tracerr::wrap!())?;

        let created_at = DateTime::now();
        let ttl = self.config().authorize_edition.access_token_ttl;
        let expires_at = created_at
            .checked_add(ttl)
            .ok_or(E::TtlOutOfRange(ttl))
            .map_err(tracerr::wrap!())?;
        let session = LauncherSession {
            id: launcher_session::Id::new(),
            product_key_id: product_key.id,
            access_token: launcher_session::AccessToken::generate()
                .map_err(tracerr::from_and_wrap!(=> E))?,
            expires_at: expires_at.coerce(),
            created_at: created_at.coerce(),
        };
        self.database()
            .execute(Insert(session.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::debug!(
            "`LauncherSession(id: {})` is issued for `ProductKey(id: {})`",
            session.id,
            product_key.id,
        );

        Ok(session)
    }
}

/// Error of [`AuthorizeEdition`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Presented key is malformed, unknown or revoked.
    #[display("Invalid product key")]
    InvalidProductKey,

    /// Configured lifetime moves the expiration out of the supported range.
    #[display("`access_token_ttl` of {_0:?} is out of range")]
    #[from(ignore)]
    TtlOutOfRange(#[error(not(source))] Duration),

    /// Entropy source is unavailable.
    #[display("Failed to generate an access token: {_0}")]
    RandomSourceUnavailable(secret::Unavailable),
}
