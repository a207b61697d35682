//! In-memory [`Database`] implementation.
//!
//! Transactions buffer their writes and apply them atomically on [`Commit`],
//! checking every [`constraint`] against the resulting rows. Row locks are
//! held until the transaction commits or is dropped.
//!
//! [`Commit`]: common::operations::Commit

pub mod client;
pub mod connection;
mod impls;
mod storage;

use derive_more::{Deref, Display, Error as StdError};

use crate::infra::database::constraint;
#[cfg(doc)]
use crate::infra::Database;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
    storage::{RowId, Storage, Tables, View},
};

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Default, Deref)]
pub struct Memory<C = NonTx>(C);

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// In-memory database [`Error`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Written rows violate a uniqueness [`constraint`].
    #[display("unique constraint `{_0}` is violated")]
    UniqueViolation(#[error(not(source))] &'static str),

    /// Written rows reference missing rows.
    #[display("foreign key constraint `{_0}` is violated")]
    ForeignKeyViolation(#[error(not(source))] &'static str),
}

impl Error {
    /// Checks if the error is a unique violation of the specified
    /// [`constraint`].
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        match self {
            Self::UniqueViolation(c) => constraint.map_or(true, |x| x == *c),
            Self::ForeignKeyViolation(..) => false,
        }
    }

    /// Checks if the error is a foreign key violation of the specified
    /// [`constraint`].
    #[must_use]
    pub fn is_foreign_key_violation(&self, constraint: Option<&str>) -> bool {
        match self {
            Self::ForeignKeyViolation(c) => {
                constraint.map_or(true, |x| x == *c)
            }
            Self::UniqueViolation(..) => false,
        }
    }
}
