//! [`Command`] for updating an [`Edition`].

use common::operations::{
    By, Commit, Lock, LockHint, Select, Transact, Transacted, Update,
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

/// [`Command`] for replacing the [`edition::Name`] and the
/// [`edition::QuestionnaireUrl`] of an [`Edition`].
#[derive(Clone, Debug)]
pub struct UpdateEdition {
    /// ID of the [`Edition`] to update.
    pub edition_id: edition::Id,

    /// New [`edition::Name`] of the [`Edition`].
    pub name: edition::Name,

    /// New [`edition::QuestionnaireUrl`] of the [`Edition`], if any.
    pub questionnaire_url: Option<edition::QuestionnaireUrl>,
}

impl<Db, Idp> Command<UpdateEdition> for Service<Db, Idp>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Edition>, edition::Id>>,
            Ok = Option<Edition>,
            Err = Traced<database::Error>,
        > + for<'n> Database<
            Select<By<Option<Edition>, &'n edition::Name>>,
            Ok = Option<Edition>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Edition, edition::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Edition>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Edition;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateEdition) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateEdition {
            edition_id,
            name,
            questionnaire_url,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent updates of the same `Edition`.
        tx.execute(Lock(By::new(edition_id), LockHint::ExclusiveRow))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let current = tx
            .execute(Select(By::<Option<Edition>, _>::new(edition_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EditionNotExists(edition_id))
            .map_err(tracerr::wrap!())?;

        let namesake = tx
            .execute(Select(By::new(&name)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if namesake.is_some_and(|e| e.id() != edition_id) {
            return Err(tracerr::new!(E::NameOccupied(name)));
        }

        let edition = Edition::new(
            edition_id,
            name,
            questionnaire_url,
            current.created_at(),
        );
        if edition == current {
            return Ok(edition);
        }

        tx.execute(Update(edition.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let committed = tx.execute(Commit).await;
        if let Err(e) = &committed {
            if e.as_ref().is_unique_violation(Some(constraint::EDITION_NAME)) {
                return Err(tracerr::new!(E::NameOccupied(
                    edition.name().clone()
                )));
            }
        }
        committed.map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`Edition(id: {edition_id})` is updated");

        Ok(edition)
    }
}

/// Error of [`UpdateEdition`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Edition`] doesn't exist.
    #[display("`Edition(id: {_0})` does not exist")]
    #[from(ignore)]
    EditionNotExists(#[error(not(source))] edition::Id),

    /// [`edition::Name`] is already occupied by another [`Edition`].
    #[display("`{_0}` edition name is occupied")]
    #[from(ignore)]
    NameOccupied(#[error(not(source))] edition::Name),
}
