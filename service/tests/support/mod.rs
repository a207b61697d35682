//! Helpers shared by the [`Service`] integration tests.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use std::{collections::VecDeque, sync::Mutex, time::Duration};

use common::DateTime;
use secrecy::ExposeSecret as _;
use service::{
    command::{authenticate_oidc_session, authorize_edition, CreateEdition},
    domain::{edition, oidc, Edition},
    infra::{idp, IdentityProvider, Memory},
    Command as _, Config, Service,
};
use tracerr::Traced;

/// [`Service`] backed by an in-memory database and a [`ScriptedIdp`].
pub type TestService = Service<Memory, ScriptedIdp>;

/// Client ID the tests authenticate as.
pub const CLIENT_ID: &str = "launcher-admin";

/// Returns the [`Config`] the tests run with.
pub fn config() -> Config {
    Config {
        oidc_client: oidc::Client {
            client_id: oidc::ClientId::new(CLIENT_ID).unwrap(),
        },
        oidc_authorization_endpoint: Some(
            "https://q.trap.jp/api/v3/oauth2/authorize".parse().unwrap(),
        ),
        authenticate_oidc_session: authenticate_oidc_session::Config::default(),
        authorize_edition: authorize_edition::Config::default(),
    }
}

/// Creates a new [`TestService`] with the default [`config()`].
pub fn service() -> TestService {
    service_with(config())
}

/// Creates a new [`TestService`] with the provided [`Config`].
pub fn service_with(config: Config) -> TestService {
    Service::new(config, Memory::new(), ScriptedIdp::default())
}

/// Creates an [`Edition`] with the provided `name`.
pub async fn edition(service: &TestService, name: &str) -> Edition {
    service
        .execute(CreateEdition {
            name: edition::Name::new(name).unwrap(),
            questionnaire_url: None,
        })
        .await
        .unwrap()
}

/// Creates an [`oidc::Session`] living for the provided `ttl`.
pub fn session(token: &str, ttl: Duration) -> oidc::Session {
    let now = DateTime::now();
    oidc::Session {
        access_token: oidc::AccessToken::new(token),
        created_at: now.coerce(),
        expires_at: (now + ttl).coerce(),
    }
}

/// [`IdentityProvider`] replaying scripted responses.
#[derive(Debug, Default)]
pub struct ScriptedIdp {
    /// Responses to the next [`idp::ExchangeCode`]s.
    exchanges: Mutex<VecDeque<Result<oidc::Session, idp::Error>>>,

    /// Codes the [`idp::ExchangeCode`]s were requested with.
    exchanged: Mutex<Vec<String>>,

    /// Response to the next [`idp::RevokeToken`].
    revocation: Mutex<Option<idp::Error>>,

    /// Tokens revoked so far.
    revoked: Mutex<Vec<String>>,

    /// Response to the next [`idp::GetMe`].
    me: Mutex<Option<Result<oidc::User, idp::Error>>>,

    /// Response to the next [`idp::GetUsers`].
    users: Mutex<Option<Result<Vec<oidc::User>, idp::Error>>>,
}

impl ScriptedIdp {
    /// Scripts the response to the next [`idp::ExchangeCode`].
    pub fn will_exchange(&self, res: Result<oidc::Session, idp::Error>) {
        self.exchanges.lock().unwrap().push_back(res);
    }

    /// Scripts the next [`idp::RevokeToken`] to fail with the provided
    /// error.
    pub fn will_fail_revocation(&self, err: idp::Error) {
        *self.revocation.lock().unwrap() = Some(err);
    }

    /// Scripts the response to the next [`idp::GetMe`].
    pub fn will_resolve_me(&self, res: Result<oidc::User, idp::Error>) {
        *self.me.lock().unwrap() = Some(res);
    }

    /// Scripts the response to the next [`idp::GetUsers`].
    pub fn will_list_users(&self, res: Result<Vec<oidc::User>, idp::Error>) {
        *self.users.lock().unwrap() = Some(res);
    }

    /// Returns the codes exchanged so far.
    pub fn exchanged(&self) -> Vec<String> {
        self.exchanged.lock().unwrap().clone()
    }

    /// Returns the tokens revoked so far.
    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }
}

impl IdentityProvider<idp::ExchangeCode> for ScriptedIdp {
    type Ok = oidc::Session;
    type Err = Traced<idp::Error>;

    async fn execute(
        &self,
        op: idp::ExchangeCode,
    ) -> Result<Self::Ok, Self::Err> {
        let code: &str = op.code.as_ref();
        self.exchanged.lock().unwrap().push(code.to_owned());

        self.exchanges
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(idp::Error::InvalidCredentials))
            .map_err(|e| tracerr::new!(e))
    }
}

impl IdentityProvider<idp::RevokeToken> for ScriptedIdp {
    type Ok = ();
    type Err = Traced<idp::Error>;

    async fn execute(
        &self,
        idp::RevokeToken(session): idp::RevokeToken,
    ) -> Result<Self::Ok, Self::Err> {
        if let Some(e) = self.revocation.lock().unwrap().take() {
            return Err(tracerr::new!(e));
        }

        let token: &str = session.access_token.expose_secret().as_ref();
        self.revoked.lock().unwrap().push(token.to_owned());
        Ok(())
    }
}

impl IdentityProvider<idp::GetMe> for ScriptedIdp {
    type Ok = oidc::User;
    type Err = Traced<idp::Error>;

    async fn execute(&self, _: idp::GetMe) -> Result<Self::Ok, Self::Err> {
        self.me
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(idp::Error::InvalidSession))
            .map_err(|e| tracerr::new!(e))
    }
}

impl IdentityProvider<idp::GetUsers> for ScriptedIdp {
    type Ok = Vec<oidc::User>;
    type Err = Traced<idp::Error>;

    async fn execute(&self, _: idp::GetUsers) -> Result<Self::Ok, Self::Err> {
        self.users
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(idp::Error::InvalidSession))
            .map_err(|e| tracerr::new!(e))
    }
}

/// Creates an [`oidc::User`] with the provided `name` and `status`.
pub fn user(name: &str, status: oidc::UserStatus) -> oidc::User {
    oidc::User {
        id: uuid::Uuid::new_v4().into(),
        name: oidc::UserName::new(name).unwrap(),
        status,
    }
}
