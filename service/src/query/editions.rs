//! [`Query`] collection related to the multiple [`Edition`]s.

use common::operations::By;

use crate::domain::Edition;
#[cfg(doc)]
use crate::Query;

use super::Lookup;

/// Queries all the [`Edition`]s, the most recently created first.
pub type All = Lookup<By<Vec<Edition>, ()>>;
