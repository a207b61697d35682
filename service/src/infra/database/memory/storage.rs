//! Rows of a [`Memory`] database.
//!
//! [`Memory`]: super::Memory

use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
    sync::Arc,
};

use derive_more::From;
use tokio::sync::{Mutex, RwLock};
use tracerr::Traced;

use crate::{
    domain::{
        edition, launcher_session, product_key, Edition, LauncherSession,
        ProductKey,
    },
    infra::database::{self, constraint},
};

use super::Error;

/// Shared state of a [`Memory`] database.
///
/// [`Memory`]: super::Memory
#[derive(Debug, Default)]
pub struct Storage {
    /// Committed rows.
    tables: RwLock<Tables>,

    /// Locks of the rows locked at least once.
    row_locks: Mutex<HashMap<RowId, Arc<RwLock<()>>>>,
}

impl Storage {
    /// Runs `f` over the committed rows overlaid with the `pending` ones.
    pub(crate) async fn read<F, R>(&self, pending: Option<&Tables>, f: F) -> R
    where
        F: FnOnce(View<'_>) -> R,
    {
        let committed = self.tables.read().await;
        f(View {
            committed: &committed,
            pending,
        })
    }

    /// Atomically applies the `pending` rows.
    ///
    /// # Errors
    ///
    /// If the resulting rows violate any [`constraint`]. Nothing is applied in
    /// such case.
    pub(crate) async fn apply(
        &self,
        pending: Tables,
    ) -> Result<(), Traced<database::Error>> {
        let mut committed = self.tables.write().await;

        View {
            committed: &committed,
            pending: Some(&pending),
        }
        .check_constraints()
        .map_err(tracerr::wrap!())
        .map_err(tracerr::map_from)?;

        let Tables {
            editions,
            deleted_editions,
            product_keys,
            launcher_sessions,
        } = pending;
        for id in deleted_editions {
            drop(committed.editions.remove(&id));
        }
        committed.editions.extend(editions);
        committed.product_keys.extend(product_keys);
        committed.launcher_sessions.extend(launcher_sessions);

        Ok(())
    }

    /// Returns the lock of the provided row.
    ///
    /// Locks nobody holds anymore are forgotten along the way.
    pub(crate) async fn row_lock(&self, row: RowId) -> Arc<RwLock<()>> {
        let mut locks = self.row_locks.lock().await;
        locks.retain(|_, l| Arc::strong_count(l) > 1);
        Arc::clone(locks.entry(row).or_default())
    }

    /// Forgets the row locks nobody holds anymore.
    pub(crate) async fn prune_row_locks(&self) {
        self.row_locks
            .lock()
            .await
            .retain(|_, l| Arc::strong_count(l) > 1);
    }
}

/// Rows of every table, keyed by their IDs.
#[derive(Clone, Debug, Default)]
pub struct Tables {
    /// [`Edition`]s rows.
    pub(crate) editions: HashMap<edition::Id, Edition>,

    /// IDs of the deleted [`Edition`]s rows.
    pub(crate) deleted_editions: HashSet<edition::Id>,

    /// [`ProductKey`]s rows.
    pub(crate) product_keys: HashMap<product_key::Id, ProductKey>,

    /// [`LauncherSession`]s rows.
    pub(crate) launcher_sessions:
        HashMap<launcher_session::Id, LauncherSession>,
}

/// Lockable row of a [`Memory`] database.
///
/// [`Memory`]: super::Memory
#[derive(Clone, Copy, Debug, Eq, From, Hash, PartialEq)]
pub enum RowId {
    /// [`Edition`] row.
    Edition(edition::Id),

    /// [`ProductKey`] row.
    ProductKey(product_key::Id),
}

/// Committed rows as seen through the pending rows of a transaction.
#[derive(Clone, Copy, Debug)]
pub struct View<'t> {
    /// Committed rows.
    committed: &'t Tables,

    /// Rows written but not committed yet, if any.
    pending: Option<&'t Tables>,
}

impl<'t> View<'t> {
    /// Returns the [`Edition`] with the provided ID, if any.
    #[must_use]
    pub fn edition(self, id: edition::Id) -> Option<&'t Edition> {
        if let Some(pending) = self.pending {
            if let Some(e) = pending.editions.get(&id) {
                return Some(e);
            }
            if pending.deleted_editions.contains(&id) {
                return None;
            }
        }
        self.committed.editions.get(&id)
    }

    /// Returns every [`Edition`].
    pub fn editions(self) -> impl Iterator<Item = &'t Edition> {
        overlay(
            &self.committed.editions,
            self.pending.map(|p| &p.editions),
            self.pending.map(|p| &p.deleted_editions),
        )
    }

    /// Returns the [`ProductKey`] with the provided ID, if any.
    #[must_use]
    pub fn product_key(self, id: product_key::Id) -> Option<&'t ProductKey> {
        self.pending
            .and_then(|p| p.product_keys.get(&id))
            .or_else(|| self.committed.product_keys.get(&id))
    }

    /// Returns every [`ProductKey`].
    pub fn product_keys(self) -> impl Iterator<Item = &'t ProductKey> {
        overlay(
            &self.committed.product_keys,
            self.pending.map(|p| &p.product_keys),
            None,
        )
    }

    /// Returns every [`LauncherSession`].
    pub fn launcher_sessions(
        self,
    ) -> impl Iterator<Item = &'t LauncherSession> {
        overlay(
            &self.committed.launcher_sessions,
            self.pending.map(|p| &p.launcher_sessions),
            None,
        )
    }

    /// Checks the [`constraint`]s touched by the pending rows.
    fn check_constraints(self) -> Result<(), Error> {
        use Error as E;

        let Some(pending) = self.pending else {
            return Ok(());
        };

        if !pending.editions.is_empty()
            && !unique(self.editions(), Edition::name)
        {
            return Err(E::UniqueViolation(constraint::EDITION_NAME));
        }

        if !pending.deleted_editions.is_empty()
            && self
                .product_keys()
                .any(|k| self.edition(k.edition_id).is_none())
        {
            return Err(E::ForeignKeyViolation(
                constraint::PRODUCT_KEY_EDITION,
            ));
        }

        if !pending.product_keys.is_empty() {
            if pending
                .product_keys
                .values()
                .any(|k| self.edition(k.edition_id).is_none())
            {
                return Err(E::ForeignKeyViolation(
                    constraint::PRODUCT_KEY_EDITION,
                ));
            }
            if !unique(self.product_keys(), |k| &k.key) {
                return Err(E::UniqueViolation(constraint::PRODUCT_KEY));
            }
        }

        if !pending.launcher_sessions.is_empty() {
            if pending
                .launcher_sessions
                .values()
                .any(|s| self.product_key(s.product_key_id).is_none())
            {
                return Err(E::ForeignKeyViolation(
                    constraint::ACCESS_TOKEN_PRODUCT_KEY,
                ));
            }
            if !unique(self.launcher_sessions(), |s| &s.access_token) {
                return Err(E::UniqueViolation(constraint::ACCESS_TOKEN));
            }
        }

        Ok(())
    }
}

/// Iterates over the `committed` rows replaced by the `pending` ones, skipping
/// the `deleted` ones.
fn overlay<'t, K, V>(
    committed: &'t HashMap<K, V>,
    pending: Option<&'t HashMap<K, V>>,
    deleted: Option<&'t HashSet<K>>,
) -> impl Iterator<Item = &'t V>
where
    K: Eq + Hash,
{
    let shadowed = move |id: &K| {
        pending.is_some_and(|p| p.contains_key(id))
            || deleted.is_some_and(|d| d.contains(id))
    };
    pending.into_iter().flat_map(HashMap::values).chain(
        committed
            .iter()
            .filter(move |(id, _)| !shadowed(*id))
            .map(|(_, row)| row),
    )
}

/// Checks whether the `rows` have pairwise distinct `key`s.
fn unique<'t, T, K>(
    rows: impl Iterator<Item = &'t T>,
    key: impl Fn(&'t T) -> K,
) -> bool
where
    T: 't,
    K: Eq + Hash,
{
    let mut seen = HashSet::new();
    rows.map(key).all(|k| seen.insert(k))
}
