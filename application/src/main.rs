use std::{fmt, io, sync::OnceLock};

use application::{args, AsError, Args, Config, Service};
use common::DateTime;
use secrecy::ExposeSecret as _;
use service::{
    command::{
        GenerateOidcAuthState, GetActiveOidcUsers, GetOidcUser,
        HandleOidcCallback, LogoutOidcSession,
    },
    domain::oidc,
    infra::{Http, Memory},
    Command as _,
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    if start().await.is_err() {
        std::process::exit(1);
    }
}

async fn start() -> Result<(), ()> {
    let Args { config, command } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let config = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(config.log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let mut service_config = config.service().map_err(|e| {
        log::error!("invalid `Config`: {e}");
    })?;

    let idp = Http::new(&(&config.oidc).into()).map_err(|e| {
        log::error!("failed to initialize `Http` identity provider: {e}");
    })?;
    service_config.oidc_authorization_endpoint =
        Some(idp.authorization_endpoint());

    let service = Service::new(service_config, Memory::new(), idp);

    match command {
        args::Command::Oidc(cmd) => oidc(&service, cmd).await,
    }
}

async fn oidc(service: &Service, cmd: args::Oidc) -> Result<(), ()> {
    match cmd {
        args::Oidc::Authorize => {
            let out = service
                .execute(GenerateOidcAuthState)
                .await
                .map_err(report)?;

            let verifier: &str = out.auth_state.code_verifier.as_ref();
            let challenge: &str = out.code_challenge.as_ref();
            if let Some(url) = out.authorization_url {
                println!("authorization_url: {url}");
            }
            println!("code_verifier: {verifier}");
            println!("code_challenge: {challenge}");
        }
        args::Oidc::Callback { code, verifier } => {
            let auth_state = oidc::AuthState {
                code_challenge_method: oidc::CodeChallengeMethod::default(),
                code_verifier: oidc::CodeVerifier::new(verifier).ok_or_else(
                    || log::error!("`--verifier` is not a valid code verifier"),
                )?,
            };
            let code = oidc::AuthorizationCode::new(code)
                .ok_or_else(|| log::error!("`--code` must not be empty"))?;

            let session = service
                .execute(HandleOidcCallback { auth_state, code })
                .await
                .map_err(report)?;

            let token: &str = session.access_token.expose_secret().as_ref();
            println!("access_token: {token}");
            println!("expires_at: {}", session.expires_at);
        }
        args::Oidc::Me { token } => {
            let user = service
                .execute(GetOidcUser {
                    session: presented_session(token),
                })
                .await
                .map_err(report)?;

            println!("{}\t{}\t{}", user.id, user.name, user.status);
        }
        args::Oidc::Users { token } => {
            let users = service
                .execute(GetActiveOidcUsers {
                    session: presented_session(token),
                })
                .await
                .map_err(report)?;

            for user in users {
                println!("{}\t{}", user.id, user.name);
            }
        }
        args::Oidc::Logout { token } => {
            service
                .execute(LogoutOidcSession {
                    session: presented_session(token),
                })
                .await
                .map_err(report)?;

            log::info!("access token is revoked");
        }
    }
    Ok(())
}

/// Wraps an access token given on the command line into an [`oidc::Session`].
///
/// Its lifetime is unknown here, so it's left to the identity provider to
/// judge.
fn presented_session(token: String) -> oidc::Session {
    let now = DateTime::now();
    oidc::Session {
        access_token: oidc::AccessToken::new(token),
        created_at: now.coerce(),
        expires_at: now.coerce(),
    }
}

/// Logs the provided error, unless it's already logged as an internal one.
fn report<E: AsError + fmt::Display>(err: E) {
    let err = err.into_error();
    if !err.is_internal() {
        log::error!("{err}");
    }
}
