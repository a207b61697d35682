//! Infrastructure layer.

pub mod database;
pub mod idp;

#[cfg(feature = "memory")]
pub use self::database::{memory, Memory};
#[cfg(feature = "http")]
pub use self::idp::{http, Http};
pub use self::{database::Database, idp::IdentityProvider};
