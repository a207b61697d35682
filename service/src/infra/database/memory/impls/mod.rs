//! [`Database`] implementations.

mod edition;
mod launcher_session;
mod product_key;

use common::operations::{By, Commit, Lock, Transact};
use tracerr::Traced;

use crate::infra::{database, Database};

use super::{Memory, NonTx, RowId, Tx};

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Memory(Tx::from_non_tx(&self.0)))
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await.map_err(tracerr::wrap!())
    }
}

impl<W, B> Database<Lock<By<W, B>>> for Memory<Tx>
where
    B: Into<RowId>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by, hint): Lock<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.lock(by.into_inner().into(), hint).await;
        Ok(())
    }
}
