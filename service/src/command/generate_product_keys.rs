//! [`Command`] for generating [`ProductKey`]s.

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    secret, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{edition, product_key, Edition, ProductKey},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for generating a batch of new [`product_key::Status::Active`]
/// [`ProductKey`]s for an [`Edition`].
///
/// The batch is stored in a single transaction: either every [`ProductKey`]
/// is stored, or none.
#[derive(Clone, Copy, Debug)]
pub struct GenerateProductKeys {
    /// ID of the [`Edition`] to generate [`ProductKey`]s for.
    pub edition_id: edition::Id,

    /// Number of [`ProductKey`]s to generate.
    pub count: usize,
}

impl<Db, Idp> Command<GenerateProductKeys> for Service<Db, Idp>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Edition>, edition::Id>>,
            Ok = Option<Edition>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<Vec<ProductKey>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Vec<ProductKey>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: GenerateProductKeys,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let GenerateProductKeys { edition_id, count } = cmd;

        if count == 0 {
            return Err(tracerr::new!(E::InvalidCount));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        drop(
            tx.execute(Select(By::<Option<Edition>, _>::new(edition_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::EditionNotExists(edition_id))
                .map_err(tracerr::wrap!())?,
        );

        let created_at = DateTime::now().coerce();
        let keys = (0..count)
            .map(|_| {
                Ok(ProductKey {
                    id: product_key::Id::new(),
                    edition_id,
                    key: product_key::Key::generate()?,
                    status: product_key::Status::Active,
                    created_at,
                })
            })
            .collect::<Result<Vec<_>, secret::Unavailable>>()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Insert(keys.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "{count} `ProductKey`s are generated for `Edition(id: {edition_id})`",
        );

        Ok(keys)
    }
}

/// Error of [`GenerateProductKeys`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Edition`] doesn't exist.
    #[display("`Edition(id: {_0})` does not exist")]
    #[from(ignore)]
    EditionNotExists(#[error(not(source))] edition::Id),

    /// Requested number of [`ProductKey`]s is zero.
    #[display("At least one `ProductKey` must be requested")]
    InvalidCount,

    /// Entropy source is unavailable.
    #[display("Failed to generate a `ProductKey`: {_0}")]
    RandomSourceUnavailable(secret::Unavailable),
}
