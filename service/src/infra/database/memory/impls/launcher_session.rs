//! [`LauncherSession`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{launcher_session, LauncherSession},
    infra::{
        database::{self, memory::Connection},
        Database, Memory,
    },
    read,
};

impl<C> Database<Insert<LauncherSession>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(session): Insert<LauncherSession>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|rows| {
            drop(rows.launcher_sessions.insert(session.id, session));
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C>
    Database<
        Select<
            By<
                Option<read::access_token::Info>,
                &launcher_session::AccessToken,
            >,
        >,
    > for Memory<C>
where
    C: Connection,
{
    type Ok = Option<read::access_token::Info>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                Option<read::access_token::Info>,
                &launcher_session::AccessToken,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();
        Ok(self
            .read(|rows| {
                let session = rows
                    .launcher_sessions()
                    .find(|s| &s.access_token == token)?;
                let product_key = rows.product_key(session.product_key_id)?;
                let edition = rows.edition(product_key.edition_id)?;
                Some(read::access_token::Info {
                    session: session.clone(),
                    product_key: product_key.clone(),
                    edition: edition.clone(),
                })
            })
            .await)
    }
}
