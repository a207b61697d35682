//! [`Query`] collection related to the multiple [`ProductKey`]s.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{edition, product_key, Edition, ProductKey},
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] listing the [`ProductKey`]s of an [`Edition`], the oldest first.
#[derive(Clone, Copy, Debug)]
pub struct ProductKeysByEdition {
    /// ID of the [`Edition`] to list the [`ProductKey`]s of.
    pub edition_id: edition::Id,

    /// [`product_key::Status`] to filter by, if any.
    pub status: Option<product_key::Status>,
}

impl<Db, Idp> Query<ProductKeysByEdition> for Service<Db, Idp>
where
    Db: Database<
            Select<By<Option<Edition>, edition::Id>>,
            Ok = Option<Edition>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<Vec<ProductKey>, (edition::Id, Vec<product_key::Status>)>,
            >,
            Ok = Vec<ProductKey>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<ProductKey>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: ProductKeysByEdition,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ProductKeysByEdition { edition_id, status } = query;

        drop(
            self.database()
                .execute(Select(By::<Option<Edition>, _>::new(edition_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::EditionNotExists(edition_id))
                .map_err(tracerr::wrap!())?,
        );

        let statuses =
            status.map_or_else(|| product_key::Status::ALL.to_vec(), |s| vec![s]);
        self.database()
            .execute(Select(By::<Vec<ProductKey>, _>::new((
                edition_id, statuses,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`ProductKeysByEdition`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Edition`] doesn't exist.
    #[display("`Edition(id: {_0})` does not exist")]
    #[from(ignore)]
    EditionNotExists(#[error(not(source))] edition::Id),
}
