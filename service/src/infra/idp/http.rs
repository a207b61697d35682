//! HTTP [`IdentityProvider`] implementation.

use std::time::Duration;

use common::DateTime;
use derive_more::{Display, Error, From};
use reqwest::StatusCode;
use secrecy::ExposeSecret as _;
use serde::{de::DeserializeOwned, Deserialize};
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;
use url::Url;
use uuid::Uuid;

use crate::{
    domain::oidc,
    infra::{
        idp::{self, ExchangeCode, GetMe, GetUsers, RevokeToken},
        IdentityProvider,
    },
};

/// [`Http`] configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Base URL the `oauth2` endpoints are resolved against.
    #[default(Url::parse("https://q.trap.jp/api/v3").expect("valid URL"))]
    pub base_url: Url,

    /// Timeout of a single request.
    #[default(Duration::from_secs(10))]
    pub request_timeout: Duration,
}

/// [`IdentityProvider`] speaking [OAuth 2.0] over HTTP.
///
/// [OAuth 2.0]: https://datatracker.ietf.org/doc/html/rfc6749
#[derive(Clone, Debug)]
pub struct Http {
    /// Client performing requests.
    client: reqwest::Client,

    /// Base URL of the endpoints.
    base_url: Url,
}

impl Http {
    /// Number of seconds a [`oidc::Session`] is considered expired before the
    /// identity provider expires its access token.
    const EXPIRATION_LEEWAY: Duration = Duration::from_secs(5);

    /// Creates a new [`Http`] identity provider with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the [`Config::base_url`] cannot have endpoints appended, or the
    /// HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, Traced<InitError>> {
        if config.base_url.cannot_be_a_base() {
            return Err(tracerr::new!(InitError::InvalidBaseUrl(
                config.base_url.clone()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> InitError))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Returns the authorization endpoint operators are redirected to.
    #[must_use]
    pub fn authorization_endpoint(&self) -> Url {
        self.endpoint(&["oauth2", "authorize"])
    }

    /// Performs a `GET` request to the endpoint at the provided `path` on
    /// behalf of the provided [`oidc::Session`], decoding its JSON response.
    async fn get_as<T: DeserializeOwned>(
        &self,
        path: &[&str],
        session: &oidc::Session,
    ) -> Result<T, Traced<idp::Error>> {
        use idp::Error as E;

        let token: &str = session.access_token.expose_secret().as_ref();
        let resp = self
            .client
            .get(self.endpoint(path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| tracerr::new!(E::Unreachable(e.to_string())))?;

        match resp.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => {
                return Err(tracerr::new!(E::InvalidSession));
            }
            s if s.is_server_error() => {
                log::warn!("`/{}` responded with `{s}`", path.join("/"));
                return Err(tracerr::new!(E::Broken(s.as_u16())));
            }
            s => return Err(tracerr::new!(E::UnexpectedStatus(s.as_u16()))),
        }

        resp.json::<T>()
            .await
            .map_err(|e| tracerr::new!(E::Decode(e.to_string())))
    }

    /// Resolves the endpoint at the provided path against the base URL.
    fn endpoint(&self, path: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            _ = segments.pop_if_empty().extend(path);
        }
        url
    }
}

impl IdentityProvider<ExchangeCode> for Http {
    type Ok = oidc::Session;
    type Err = Traced<idp::Error>;

    async fn execute(&self, op: ExchangeCode) -> Result<Self::Ok, Self::Err> {
        use idp::Error as E;

        let ExchangeCode {
            client,
            code,
            auth_state,
        } = op;
        let client_id: &str = client.client_id.as_ref();
        let code: &str = code.as_ref();
        let code_verifier: &str = auth_state.code_verifier.as_ref();

        let created_at = DateTime::now();
        let resp = self
            .client
            .post(self.endpoint(&["oauth2", "token"]))
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", client_id),
                ("code", code),
                ("code_verifier", code_verifier),
            ])
            .send()
            .await
            .map_err(|e| tracerr::new!(E::Unreachable(e.to_string())))?;

        match resp.status() {
            StatusCode::OK => {}
            StatusCode::BAD_REQUEST => {
                return Err(tracerr::new!(E::InvalidCredentials));
            }
            StatusCode::UNAUTHORIZED => {
                return Err(tracerr::new!(E::InvalidClient));
            }
            s if s.is_server_error() => {
                log::warn!("token endpoint responded with `{s}`");
                return Err(tracerr::new!(E::Broken(s.as_u16())));
            }
            s => return Err(tracerr::new!(E::UnexpectedStatus(s.as_u16()))),
        }

        let token = resp
            .json::<TokenResponse>()
            .await
            .map_err(|e| tracerr::new!(E::Decode(e.to_string())))?;

        let lifetime = Duration::from_secs(token.expires_in)
            .saturating_sub(Self::EXPIRATION_LEEWAY);
        let expires_at = created_at.checked_add(lifetime).ok_or_else(|| {
            tracerr::new!(E::Decode(format!(
                "`expires_in` of {}s is out of range",
                token.expires_in,
            )))
        })?;
        Ok(oidc::Session {
            access_token: oidc::AccessToken::new(token.access_token),
            created_at: created_at.coerce(),
            expires_at: expires_at.coerce(),
        })
    }
}

impl IdentityProvider<RevokeToken> for Http {
    type Ok = ();
    type Err = Traced<idp::Error>;

    async fn execute(
        &self,
        RevokeToken(session): RevokeToken,
    ) -> Result<Self::Ok, Self::Err> {
        use idp::Error as E;

        let token: &str = session.access_token.expose_secret().as_ref();

        let resp = self
            .client
            .post(self.endpoint(&["oauth2", "revoke"]))
            .form(&[("token", token)])
            .send()
            .await
            .map_err(|e| tracerr::new!(E::Unreachable(e.to_string())))?;

        match resp.status() {
            StatusCode::OK => Ok(()),
            s if s.is_server_error() => {
                log::warn!("revocation endpoint responded with `{s}`");
                Err(tracerr::new!(E::Broken(s.as_u16())))
            }
            s => Err(tracerr::new!(E::UnexpectedStatus(s.as_u16()))),
        }
    }
}

impl IdentityProvider<GetMe> for Http {
    type Ok = oidc::User;
    type Err = Traced<idp::Error>;

    async fn execute(
        &self,
        GetMe(session): GetMe,
    ) -> Result<Self::Ok, Self::Err> {
        self.get_as::<UserResponse>(&["users", "me"], &session)
            .await?
            .try_into()
            .map_err(tracerr::wrap!())
    }
}

impl IdentityProvider<GetUsers> for Http {
    type Ok = Vec<oidc::User>;
    type Err = Traced<idp::Error>;

    async fn execute(
        &self,
        GetUsers(session): GetUsers,
    ) -> Result<Self::Ok, Self::Err> {
        self.get_as::<Vec<UserResponse>>(&["users"], &session)
            .await?
            .into_iter()
            .map(oidc::User::try_from)
            .collect::<Result<_, _>>()
            .map_err(tracerr::wrap!())
    }
}

/// User representation returned by the `users` endpoints.
#[derive(Debug, Deserialize)]
struct UserResponse {
    /// ID of the user.
    id: Uuid,

    /// Name of the user.
    name: String,

    /// Raw [`oidc::UserStatus`] of the user.
    state: u8,
}

impl TryFrom<UserResponse> for oidc::User {
    type Error = idp::Error;

    fn try_from(resp: UserResponse) -> Result<Self, Self::Error> {
        use idp::Error as E;

        Ok(Self {
            id: resp.id.into(),
            name: oidc::UserName::new(resp.name)
                .ok_or_else(|| E::Decode("blank user name".into()))?,
            status: resp
                .state
                .try_into()
                .map_err(|e| E::Decode(format!("{e}")))?,
        })
    }
}

/// Successful response of the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    /// Issued bearer token.
    access_token: String,

    /// Number of seconds the `access_token` is valid for.
    expires_in: u64,
}

/// Error of initializing an [`Http`] identity provider.
#[derive(Debug, Display, Error, From)]
pub enum InitError {
    /// HTTP client failed to initialize.
    #[display("Failed to initialize HTTP client: {_0}")]
    Client(reqwest::Error),

    /// Base URL cannot have endpoints appended.
    #[display("`{_0}` cannot be a base URL")]
    #[from(ignore)]
    InvalidBaseUrl(#[error(not(source))] Url),
}
