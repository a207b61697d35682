//! [`Query`] collection related to a single [`ProductKey`].

use common::operations::By;

use crate::domain::{product_key, ProductKey};
#[cfg(doc)]
use crate::Query;

use super::Lookup;

/// Queries a [`ProductKey`] by its [`product_key::Id`].
pub type ById = Lookup<By<Option<ProductKey>, product_key::Id>>;
