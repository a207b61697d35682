//! [`Query`] definitions.
//!
//! Plain lookups are expressed as [`Lookup`] aliases in the per-entity
//! modules, while [`Query`]s with their own rules get dedicated types.

pub mod edition;
pub mod editions;
pub mod product_key;
pub mod product_keys;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

pub use self::product_keys::ProductKeysByEdition;

/// Non-locking read of a `W` from the [`Database`], keyed by a `B`.
#[derive(Clone, Copy, Debug)]
pub struct Lookup<T>(T);

impl<W, B> Lookup<By<W, B>> {
    /// Looks up a `W` by the provided `key`.
    #[must_use]
    pub fn by(key: B) -> Self {
        Self(By::new(key))
    }
}

impl<W> Lookup<By<W, ()>> {
    /// Looks up every `W` stored.
    #[must_use]
    pub fn all() -> Self {
        Self::by(())
    }
}

impl<Db, Idp, W, B> Query<Lookup<By<W, B>>> for Service<Db, Idp>
where
    Db: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
{
    type Ok = W;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lookup(key): Lookup<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Select(key))
            .await
            .map_err(tracerr::wrap!())
    }
}
