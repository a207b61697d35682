//! [`Command`] definition.

pub mod activate_product_key;
pub mod authenticate_oidc_session;
pub mod authorize_edition;
pub mod authorize_launcher_session;
pub mod create_edition;
pub mod delete_edition;
pub mod generate_oidc_auth_state;
pub mod generate_product_keys;
pub mod get_active_oidc_users;
pub mod get_oidc_user;
pub mod handle_oidc_callback;
pub mod logout_oidc_session;
pub mod revoke_product_key;
pub mod update_edition;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    activate_product_key::ActivateProductKey,
    authenticate_oidc_session::AuthenticateOidcSession,
    authorize_edition::AuthorizeEdition,
    authorize_launcher_session::AuthorizeLauncherSession,
    create_edition::CreateEdition,
    delete_edition::DeleteEdition,
    generate_oidc_auth_state::GenerateOidcAuthState,
    generate_product_keys::GenerateProductKeys,
    get_active_oidc_users::GetActiveOidcUsers,
    get_oidc_user::GetOidcUser,
    handle_oidc_callback::HandleOidcCallback,
    logout_oidc_session::LogoutOidcSession,
    revoke_product_key::RevokeProductKey, update_edition::UpdateEdition,
};
