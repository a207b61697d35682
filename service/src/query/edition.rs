//! [`Query`] collection related to a single [`Edition`].

use common::operations::By;

use crate::domain::{edition, Edition};
#[cfg(doc)]
use crate::Query;

use super::Lookup;

/// Queries an [`Edition`] by its [`edition::Id`].
pub type ById = Lookup<By<Option<Edition>, edition::Id>>;
