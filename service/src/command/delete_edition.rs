//! [`Command`] for deleting an [`Edition`].

use common::operations::{
    By, Commit, Delete, Lock, LockHint, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{edition, product_key, Edition, ProductKey},
    infra::{
        database::{self, constraint},
        Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for deleting an [`Edition`] no [`ProductKey`] was ever
/// generated for.
///
/// [`ProductKey`]s are never deleted, so an [`Edition`] having any of them,
/// whatever their [`product_key::Status`], stays.
#[derive(Clone, Copy, Debug, From)]
pub struct DeleteEdition {
    /// ID of the [`Edition`] to delete.
    pub edition_id: edition::Id,
}

impl<Db, Idp> Command<DeleteEdition> for Service<Db, Idp>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Edition>, edition::Id>>,
            Ok = Option<Edition>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<Vec<ProductKey>, (edition::Id, Vec<product_key::Status>)>,
            >,
            Ok = Vec<ProductKey>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Edition, edition::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Edition, edition::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Edition;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteEdition) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteEdition { edition_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(edition_id), LockHint::ExclusiveRow))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let edition = tx
            .execute(Select(By::<Option<Edition>, _>::new(edition_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EditionNotExists(edition_id))
            .map_err(tracerr::wrap!())?;

        let keys = tx
            .execute(Select(By::<Vec<ProductKey>, _>::new((
                edition_id,
                product_key::Status::ALL.to_vec(),
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !keys.is_empty() {
            return Err(tracerr::new!(E::HasProductKeys(edition_id)));
        }

        tx.execute(Delete(By::<Edition, _>::new(edition_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Keys generated concurrently are only seen on commit.
        let committed = tx.execute(Commit).await;
        if let Err(e) = &committed {
            if e.as_ref()
                .is_foreign_key_violation(Some(constraint::PRODUCT_KEY_EDITION))
            {
                return Err(tracerr::new!(E::HasProductKeys(edition_id)));
            }
        }
        committed.map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`Edition(id: {edition_id})` is deleted");

        Ok(edition)
    }
}

/// Error of [`DeleteEdition`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Edition`] doesn't exist.
    #[display("`Edition(id: {_0})` does not exist")]
    #[from(ignore)]
    EditionNotExists(#[error(not(source))] edition::Id),

    /// [`Edition`] has [`ProductKey`]s.
    #[display("`Edition(id: {_0})` has `ProductKey`s")]
    #[from(ignore)]
    HasProductKeys(#[error(not(source))] edition::Id),
}
