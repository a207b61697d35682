//! [`Command`] for starting an [OpenID Connect] authorization.
//!
//! [OpenID Connect]: https://openid.net/specs/openid-connect-core-1_0.html

use common::secret;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use url::Url;

use crate::{domain::oidc, Service};

use super::Command;

/// [`Command`] for starting an [OpenID Connect] authorization with a fresh
/// [`oidc::AuthState`].
///
/// [OpenID Connect]: https://openid.net/specs/openid-connect-core-1_0.html
#[derive(Clone, Copy, Debug, Default)]
pub struct GenerateOidcAuthState;

/// Output of [`GenerateOidcAuthState`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`oidc::Client`] the authorization is started for.
    pub client: oidc::Client,

    /// [`oidc::AuthState`] to be kept until the callback.
    pub auth_state: oidc::AuthState,

    /// [`oidc::CodeChallenge`] derived from the [`oidc::AuthState`].
    pub code_challenge: oidc::CodeChallenge,

    /// URL to redirect an operator to, if the authorization endpoint is
    /// configured.
    pub authorization_url: Option<Url>,
}

impl<Db, Idp> Command<GenerateOidcAuthState> for Service<Db, Idp> {
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        _: GenerateOidcAuthState,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let auth_state = oidc::AuthState {
            code_challenge_method: oidc::CodeChallengeMethod::Sha256,
            code_verifier: oidc::CodeVerifier::generate()
                .map_err(tracerr::from_and_wrap!(=> E))?,
        };
        let code_challenge = auth_state.code_challenge();
        let client = self.config().oidc_client.clone();

        let authorization_url =
            self.config().oidc_authorization_endpoint.clone().map(|mut url| {
                _ = url
                    .query_pairs_mut()
                    .append_pair("response_type", "code")
                    .append_pair("client_id", client.client_id.as_ref())
                    .append_pair("code_challenge", code_challenge.as_ref())
                    .append_pair(
                        "code_challenge_method",
                        &auth_state.code_challenge_method.to_string(),
                    );
                url
            });

        Ok(Output {
            client,
            auth_state,
            code_challenge,
            authorization_url,
        })
    }
}

/// Error of [`GenerateOidcAuthState`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Entropy source is unavailable.
    #[display("Failed to generate a code verifier: {_0}")]
    RandomSourceUnavailable(secret::Unavailable),
}
