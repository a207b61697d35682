//! [`Edition`]-related [`Database`] implementations.

use std::cmp::Reverse;

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;
use uuid::Uuid;

use crate::{
    domain::{edition, Edition},
    infra::{
        database::{self, memory::Connection},
        Database, Memory,
    },
};

impl<C> Database<Select<By<Option<Edition>, edition::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Edition>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Edition>, edition::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.read(|rows| rows.edition(id).cloned()).await)
    }
}

impl<C> Database<Select<By<Option<Edition>, &edition::Name>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Edition>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Edition>, &edition::Name>>,
    ) -> Result<Self::Ok, Self::Err> {
        let name = by.into_inner();
        Ok(self
            .read(|rows| rows.editions().find(|e| e.name() == name).cloned())
            .await)
    }
}

impl<C> Database<Select<By<Vec<Edition>, ()>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<Edition>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Edition>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut editions = self
            .read(|rows| rows.editions().cloned().collect::<Vec<_>>())
            .await;
        editions.sort_by_key(|e| (Reverse(e.created_at()), Uuid::from(e.id())));
        Ok(editions)
    }
}

impl<C> Database<Insert<Edition>> for Memory<C>
where
    C: Connection,
    Self: Database<Update<Edition>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(edition): Insert<Edition>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(edition)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Edition>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(edition): Update<Edition>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|rows| drop(rows.editions.insert(edition.id(), edition)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Delete<By<Edition, edition::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Edition, edition::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(|rows| {
            drop(rows.editions.remove(&id));
            drop(rows.deleted_editions.insert(id));
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
