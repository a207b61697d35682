//! [`ProductKey`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{edition, product_key, ProductKey},
    infra::{
        database::{self, memory::Connection},
        Database, Memory,
    },
};

impl<C> Database<Select<By<Option<ProductKey>, product_key::Id>>>
    for Memory<C>
where
    C: Connection,
{
    type Ok = Option<ProductKey>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<ProductKey>, product_key::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.read(|rows| rows.product_key(id).cloned()).await)
    }
}

impl<C> Database<Select<By<Option<ProductKey>, &product_key::Key>>>
    for Memory<C>
where
    C: Connection,
{
    type Ok = Option<ProductKey>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<ProductKey>, &product_key::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        Ok(self
            .read(|rows| rows.product_keys().find(|k| &k.key == key).cloned())
            .await)
    }
}

impl<C>
    Database<
        Select<By<Vec<ProductKey>, (edition::Id, Vec<product_key::Status>)>>,
    > for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<ProductKey>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<ProductKey>, (edition::Id, Vec<product_key::Status>)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (edition_id, statuses) = by.into_inner();

        let mut keys = self
            .read(|rows| {
                rows.product_keys()
                    .filter(|k| {
                        k.edition_id == edition_id
                            && statuses.contains(&k.status)
                    })
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await;
        keys.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.key.cmp(&b.key))
        });
        Ok(keys)
    }
}

impl<C> Database<Insert<Vec<ProductKey>>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(keys): Insert<Vec<ProductKey>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|rows| {
            rows.product_keys.extend(keys.into_iter().map(|k| (k.id, k)));
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<ProductKey>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(key): Update<ProductKey>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|rows| drop(rows.product_keys.insert(key.id, key)))
            .await
            .map_err(tracerr::wrap!())
    }
}
