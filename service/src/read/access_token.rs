//! [`AccessToken`] read model definition.
//!
//! [`AccessToken`]: crate::domain::launcher_session::AccessToken

use crate::domain::{Edition, LauncherSession, ProductKey};

/// [`LauncherSession`] joined with everything its authorization depends on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Info {
    /// [`LauncherSession`] owning the access token.
    pub session: LauncherSession,

    /// [`ProductKey`] the [`LauncherSession`] was issued for.
    pub product_key: ProductKey,

    /// [`Edition`] the [`ProductKey`] licenses.
    pub edition: Edition,
}
