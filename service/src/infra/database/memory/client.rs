//! [`Memory`] database clients.
//!
//! [`Memory`]: super::Memory

use std::{collections::HashMap, mem, sync::Arc};

use common::operations::LockHint;
use tokio::sync::{Mutex, OwnedRwLockReadGuard, OwnedRwLockWriteGuard};
use tracerr::Traced;

use crate::infra::database;

use super::{RowId, Storage, Tables};

/// Non-transactional in-memory database client.
///
/// Every write is applied immediately.
#[derive(Clone, Debug, Default)]
pub struct NonTx {
    /// [`Storage`] this client operates on.
    pub(crate) storage: Arc<Storage>,
}

/// Transactional in-memory database client.
///
/// Writes are buffered until [`Tx::commit()`] and discarded if it's never
/// called.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`Storage`] this client operates on.
    pub(crate) storage: Arc<Storage>,

    /// Inner state of this transaction.
    pub(crate) inner: Arc<Mutex<Inner>>,
}

/// Inner state of a [`Tx`] client.
#[derive(Debug, Default)]
pub(crate) struct Inner {
    /// Rows written and not committed yet.
    pub(crate) pending: Tables,

    /// Row locks held by this transaction.
    locks: HashMap<RowId, RowGuard>,
}

/// Guard of a held row lock.
#[derive(Debug)]
#[expect(dead_code, reason = "guards are only held until dropped")]
enum RowGuard {
    /// Shared lock.
    Shared(OwnedRwLockReadGuard<()>),

    /// Exclusive lock.
    Exclusive(OwnedRwLockWriteGuard<()>),
}

impl Tx {
    /// Starts a new [`Tx`] client from the provided [`NonTx`] one.
    #[must_use]
    pub fn from_non_tx(client: &NonTx) -> Self {
        Self {
            storage: Arc::clone(&client.storage),
            inner: Arc::default(),
        }
    }

    /// Locks the provided row with the provided [`LockHint`] until this [`Tx`]
    /// is committed or dropped.
    ///
    /// Waits for conflicting locks of other transactions to be released.
    pub async fn lock(&self, row: RowId, hint: LockHint) {
        let mut inner = self.inner.lock().await;
        match (inner.locks.get(&row), hint) {
            (_, LockHint::None)
            | (Some(RowGuard::Exclusive(_)), _)
            | (Some(RowGuard::Shared(_)), LockHint::SharedRow) => return,
            (Some(RowGuard::Shared(_)), LockHint::ExclusiveRow) => {
                drop(inner.locks.remove(&row));
            }
            (None, LockHint::SharedRow | LockHint::ExclusiveRow) => {}
        }

        let lock = self.storage.row_lock(row).await;
        let guard = match hint {
            LockHint::SharedRow => RowGuard::Shared(lock.read_owned().await),
            LockHint::ExclusiveRow => {
                RowGuard::Exclusive(lock.write_owned().await)
            }
            LockHint::None => return,
        };
        drop(inner.locks.insert(row, guard));
    }

    /// Commits this [`Tx`] client, releasing all its row locks.
    ///
    /// # Errors
    ///
    /// If the written rows violate any [`constraint`]. Nothing is committed
    /// in such case.
    ///
    /// [`constraint`]: database::constraint
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let mut inner = self.inner.lock().await;
        let pending = mem::take(&mut inner.pending);
        let res = self.storage.apply(pending).await;
        inner.locks.clear();
        self.storage.prune_row_locks().await;
        res.map_err(tracerr::wrap!())
    }
}
