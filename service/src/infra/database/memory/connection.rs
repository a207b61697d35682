//! [`Connection`] definitions.

use std::future::Future;

use tracerr::Traced;

use crate::infra::database;

use super::{NonTx, Tables, Tx, View};

/// Generic in-memory database connection.
pub trait Connection {
    /// Runs `f` over the rows visible to this [`Connection`].
    fn read<F, R>(&self, f: F) -> impl Future<Output = R>
    where
        F: FnOnce(View<'_>) -> R;

    /// Writes the rows produced by `f` with this [`Connection`].
    ///
    /// # Errors
    ///
    /// If the written rows violate any [`constraint`].
    ///
    /// [`constraint`]: database::constraint
    fn write<F>(
        &self,
        f: F,
    ) -> impl Future<Output = Result<(), Traced<database::Error>>>
    where
        F: FnOnce(&mut Tables);
}

impl Connection for NonTx {
    async fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(View<'_>) -> R,
    {
        self.storage.read(None, f).await
    }

    async fn write<F>(&self, f: F) -> Result<(), Traced<database::Error>>
    where
        F: FnOnce(&mut Tables),
    {
        let mut rows = Tables::default();
        f(&mut rows);
        self.storage.apply(rows).await.map_err(tracerr::wrap!())
    }
}

impl Connection for Tx {
    async fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(View<'_>) -> R,
    {
        let inner = self.inner.lock().await;
        self.storage.read(Some(&inner.pending), f).await
    }

    async fn write<F>(&self, f: F) -> Result<(), Traced<database::Error>>
    where
        F: FnOnce(&mut Tables),
    {
        f(&mut self.inner.lock().await.pending);
        Ok(())
    }
}
