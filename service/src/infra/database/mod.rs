//! [`Database`]-related implementations.

#[cfg(feature = "memory")]
pub mod memory;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "memory")]
pub use self::memory::Memory;

/// Database operation.
pub use common::Handler as Database;

pub mod constraint {
    //! Names of the uniqueness and reference constraints a [`Database`]
    //! enforces.
    //!
    //! [`Database`]: super::Database

    /// Every `Edition` has a distinct name.
    pub const EDITION_NAME: &str = "editions_name_key";

    /// Every `ProductKey` has a distinct key string.
    pub const PRODUCT_KEY: &str = "product_keys_key_key";

    /// Every `ProductKey` belongs to an existing `Edition`.
    pub const PRODUCT_KEY_EDITION: &str = "product_keys_edition_id_fkey";

    /// Every `LauncherSession` has a distinct access token.
    pub const ACCESS_TOKEN: &str = "launcher_sessions_access_token_key";

    /// Every `LauncherSession` belongs to an existing `ProductKey`.
    pub const ACCESS_TOKEN_PRODUCT_KEY: &str =
        "launcher_sessions_product_key_id_fkey";
}

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Memory`] error.
    #[cfg(feature = "memory")]
    #[display("`Memory` database error: {_0}")]
    Memory(memory::Error),
}

impl Error {
    /// Checks if the error is a unique violation of the specified constraint.
    ///
    /// Any unique violation matches if no `constraint` is specified.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        match *self {
            #[cfg(feature = "memory")]
            Self::Memory(ref e) => e.is_unique_violation(constraint),
        }
    }

    /// Checks if the error is a foreign key violation of the specified
    /// constraint.
    ///
    /// Any foreign key violation matches if no `constraint` is specified.
    #[must_use]
    pub fn is_foreign_key_violation(&self, constraint: Option<&str>) -> bool {
        match *self {
            #[cfg(feature = "memory")]
            Self::Memory(ref e) => e.is_foreign_key_violation(constraint),
        }
    }
}
