//! Domain definitions.

pub mod edition;
pub mod launcher_session;
pub mod oidc;
pub mod product_key;

pub use self::{
    edition::Edition, launcher_session::LauncherSession,
    product_key::ProductKey,
};
