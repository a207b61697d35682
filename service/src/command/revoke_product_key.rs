//! [`Command`] for revoking a [`ProductKey`].

use common::operations::{
    By, Commit, Lock, LockHint, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{product_key, ProductKey},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for revoking an active [`ProductKey`].
#[derive(Clone, Copy, Debug, From)]
pub struct RevokeProductKey {
    /// ID of the [`ProductKey`] to revoke.
    pub product_key_id: product_key::Id,
}

impl<Db, Idp> Command<RevokeProductKey> for Service<Db, Idp>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<ProductKey>, product_key::Id>>,
            Ok = Option<ProductKey>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<ProductKey, product_key::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<ProductKey>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ProductKey;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RevokeProductKey,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RevokeProductKey { product_key_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent status changes of the same `ProductKey`.
        tx.execute(Lock(By::new(product_key_id), LockHint::ExclusiveRow))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut key = tx
            .execute(Select(By::<Option<ProductKey>, _>::new(product_key_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProductKeyNotExists(product_key_id))
            .map_err(tracerr::wrap!())?;
        if !key.is_active() {
            return Err(tracerr::new!(E::AlreadyRevoked(product_key_id)));
        }

        key.status = product_key::Status::Inactive;
        tx.execute(Update(key.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`ProductKey(id: {product_key_id})` is revoked");

        Ok(key)
    }
}

/// Error of [`RevokeProductKey`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`ProductKey`] doesn't exist.
    #[display("`ProductKey(id: {_0})` does not exist")]
    #[from(ignore)]
    ProductKeyNotExists(#[error(not(source))] product_key::Id),

    /// [`ProductKey`] is revoked already.
    #[display("`ProductKey(id: {_0})` is already revoked")]
    #[from(ignore)]
    AlreadyRevoked(#[error(not(source))] product_key::Id),
}
