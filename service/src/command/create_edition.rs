//! [`Command`] for creating an [`Edition`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{edition, Edition},
    infra::{
        database::{self, constraint},
        Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Edition`].
#[derive(Clone, Debug)]
pub struct CreateEdition {
    /// [`edition::Name`] of a new [`Edition`].
    pub name: edition::Name,

    /// [`edition::QuestionnaireUrl`] of a new [`Edition`], if any.
    pub questionnaire_url: Option<edition::QuestionnaireUrl>,
}

impl<Db, Idp> Command<CreateEdition> for Service<Db, Idp>
where
    Db: for<'n> Database<
            Select<By<Option<Edition>, &'n edition::Name>>,
            Ok = Option<Edition>,
            Err = Traced<database::Error>,
        > + Database<Insert<Edition>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Edition;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateEdition) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateEdition {
            name,
            questionnaire_url,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::new(&name)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::NameOccupied(name)));
        }

        let edition = Edition::new(
            edition::Id::new(),
            name,
            questionnaire_url,
            DateTime::now().coerce(),
        );
        let inserted = self.database().execute(Insert(edition.clone())).await;
        if let Err(e) = &inserted {
            // Another `Edition` took the name after the check above.
            if e.as_ref().is_unique_violation(Some(constraint::EDITION_NAME)) {
                return Err(tracerr::new!(E::NameOccupied(
                    edition.name().clone()
                )));
            }
        }
        inserted.map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`Edition(id: {})` is created", edition.id());

        Ok(edition)
    }
}

/// Error of [`CreateEdition`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`edition::Name`] is already occupied by another [`Edition`].
    #[display("`{_0}` edition name is occupied")]
    #[from(ignore)]
    NameOccupied(#[error(not(source))] edition::Name),
}
