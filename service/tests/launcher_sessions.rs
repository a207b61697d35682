//! Tests of the launcher session issuer and validator.

mod support;

use std::time::Duration;

use service::{
    command::{
        authorize_edition, authorize_launcher_session, AuthorizeEdition,
        AuthorizeLauncherSession, GenerateProductKeys, RevokeProductKey,
    },
    domain::{launcher_session, product_key, ProductKey},
    query, Command as _, Query as _,
};

use self::support::{config, edition, service_with, TestService};

async fn active_key(service: &TestService) -> ProductKey {
    let e = edition(service, "Festival 2024").await;
    service
        .execute(GenerateProductKeys {
            edition_id: e.id(),
            count: 1,
        })
        .await
        .unwrap()
        .remove(0)
}

fn service_with_ttl(ttl: Duration) -> TestService {
    let mut config = config();
    config.authorize_edition = authorize_edition::Config {
        access_token_ttl: ttl,
    };
    service_with(config)
}

#[tokio::test]
async fn issued_token_authorizes_launcher() {
    let service = service_with_ttl(Duration::from_secs(60));
    let key = active_key(&service).await;

    let session = service
        .execute(AuthorizeEdition {
            key: key.key.to_string(),
        })
        .await
        .unwrap();
    let token: &str = session.access_token.as_ref();
    assert!(launcher_session::AccessToken::new(token).is_some());
    assert!(!session.is_expired_at(session.created_at));

    let out = service
        .execute(AuthorizeLauncherSession {
            access_token: token.to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(out.product_key, key);
    assert_eq!(out.edition.id(), key.edition_id);
}

#[tokio::test]
async fn every_authorization_issues_new_token() {
    let service = service_with_ttl(Duration::from_secs(60));
    let key = active_key(&service).await;

    let first = service
        .execute(AuthorizeEdition {
            key: key.key.to_string(),
        })
        .await
        .unwrap();
    let second = service
        .execute(AuthorizeEdition {
            key: key.key.to_string(),
        })
        .await
        .unwrap();

    assert_ne!(first.access_token, second.access_token);
    for s in [first, second] {
        assert!(service
            .execute(AuthorizeLauncherSession {
                access_token: s.access_token.to_string(),
            })
            .await
            .is_ok());
    }
}

#[tokio::test]
async fn expired_token_is_distinguished() {
    let service = service_with_ttl(Duration::ZERO);
    let key = active_key(&service).await;
    let session = service
        .execute(AuthorizeEdition {
            key: key.key.to_string(),
        })
        .await
        .unwrap();

    let err = service
        .execute(AuthorizeLauncherSession {
            access_token: session.access_token.to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        authorize_launcher_session::ExecutionError::ExpiredAccessToken,
    ));

    let stored = service
        .execute(query::product_key::ById::by(key.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, product_key::Status::Active);
}

#[tokio::test]
async fn revocation_wins_over_expiration() {
    let service = service_with_ttl(Duration::ZERO);
    let key = active_key(&service).await;
    let session = service
        .execute(AuthorizeEdition {
            key: key.key.to_string(),
        })
        .await
        .unwrap();
    _ = service
        .execute(RevokeProductKey {
            product_key_id: key.id,
        })
        .await
        .unwrap();

    let err = service
        .execute(AuthorizeLauncherSession {
            access_token: session.access_token.to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        authorize_launcher_session::ExecutionError::InvalidAccessToken,
    ));
}

#[tokio::test]
async fn unknown_or_malformed_token_is_invalid() {
    let service = service_with_ttl(Duration::from_secs(60));
    _ = active_key(&service).await;

    for token in [String::new(), "short".to_owned(), "a".repeat(64)] {
        let err = service
            .execute(AuthorizeLauncherSession {
                access_token: token,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            authorize_launcher_session::ExecutionError::InvalidAccessToken,
        ));
    }
}

#[tokio::test]
async fn unrepresentable_ttl_is_refused() {
    let service = service_with_ttl(Duration::MAX);
    let key = active_key(&service).await;

    let err = service
        .execute(AuthorizeEdition {
            key: key.key.to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_ref(),
        authorize_edition::ExecutionError::TtlOutOfRange(_),
    ));
}
