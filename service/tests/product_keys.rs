//! Tests of the product key lifecycle.

mod support;

use std::{collections::HashSet, time::Duration};

use common::DateTime;
use service::{
    command::{
        activate_product_key, authorize_edition, authorize_launcher_session,
        generate_product_keys, revoke_product_key, ActivateProductKey,
        AuthorizeEdition, AuthorizeLauncherSession, GenerateProductKeys,
        RevokeProductKey,
    },
    domain::{edition, product_key},
    query::{self, product_keys, ProductKeysByEdition},
    Command as _, Query as _,
};

use self::support::{edition, service};

#[tokio::test]
async fn generates_distinct_active_keys_bound_to_edition() {
    let service = service();
    let e = edition(&service, "Festival 2024").await;

    let keys = service
        .execute(GenerateProductKeys {
            edition_id: e.id(),
            count: 3,
        })
        .await
        .unwrap();

    assert_eq!(keys.len(), 3);
    let distinct = keys.iter().map(|k| &k.key).collect::<HashSet<_>>();
    assert_eq!(distinct.len(), 3);
    for k in &keys {
        assert_eq!(k.edition_id, e.id());
        assert!(k.is_active());
        let raw: &str = k.key.as_ref();
        assert!(product_key::Key::new(raw).is_some(), "{raw}");
    }

    let session = service
        .execute(AuthorizeEdition {
            key: keys[0].key.to_string(),
        })
        .await
        .unwrap();
    let expected = DateTime::now() + Duration::from_secs(24 * 60 * 60);
    let drift = expected.unix_timestamp() - session.expires_at.unix_timestamp();
    assert!(drift.abs() <= 1, "{drift}");
    assert_eq!(session.product_key_id, keys[0].id);
}

#[tokio::test]
async fn zero_count_is_rejected() {
    let service = service();
    let e = edition(&service, "Festival 2024").await;

    let err = service
        .execute(GenerateProductKeys {
            edition_id: e.id(),
            count: 0,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_ref(),
        generate_product_keys::ExecutionError::InvalidCount,
    ));
}

#[tokio::test]
async fn unknown_edition_is_rejected_without_creating_keys() {
    let service = service();
    let unknown = edition::Id::new();

    let err = service
        .execute(GenerateProductKeys {
            edition_id: unknown,
            count: 5,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_ref(),
        generate_product_keys::ExecutionError::EditionNotExists(id)
            if *id == unknown,
    ));
    assert!(service
        .execute(ProductKeysByEdition {
            edition_id: unknown,
            status: None,
        })
        .await
        .is_err());
}

#[tokio::test]
async fn revoked_key_cannot_authorize() {
    let service = service();
    let e = edition(&service, "Festival 2024").await;
    let keys = service
        .execute(GenerateProductKeys {
            edition_id: e.id(),
            count: 3,
        })
        .await
        .unwrap();

    let revoked = service
        .execute(RevokeProductKey {
            product_key_id: keys[0].id,
        })
        .await
        .unwrap();
    assert_eq!(revoked.status, product_key::Status::Inactive);

    let err = service
        .execute(AuthorizeEdition {
            key: keys[0].key.to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        authorize_edition::ExecutionError::InvalidProductKey,
    ));

    // Other keys of the same `Edition` are unaffected.
    assert!(service
        .execute(AuthorizeEdition {
            key: keys[1].key.to_string(),
        })
        .await
        .is_ok());
}

#[tokio::test]
async fn unknown_and_revoked_keys_fail_alike() {
    let service = service();
    let e = edition(&service, "Festival 2024").await;
    let keys = service
        .execute(GenerateProductKeys {
            edition_id: e.id(),
            count: 1,
        })
        .await
        .unwrap();
    _ = service
        .execute(RevokeProductKey {
            product_key_id: keys[0].id,
        })
        .await
        .unwrap();

    let mut rendered = Vec::new();
    for key in [
        keys[0].key.to_string(),
        "abcde-fghij-klmno-pqrst-uvwxy".to_owned(),
        "not a key".to_owned(),
    ] {
        let err = service.execute(AuthorizeEdition { key }).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            authorize_edition::ExecutionError::InvalidProductKey,
        ));
        rendered.push(err.as_ref().to_string());
    }
    rendered.dedup();
    assert_eq!(rendered.len(), 1);
}

#[tokio::test]
async fn repeated_transitions_fail_without_mutation() {
    let service = service();
    let e = edition(&service, "Festival 2024").await;
    let key = service
        .execute(GenerateProductKeys {
            edition_id: e.id(),
            count: 1,
        })
        .await
        .unwrap()
        .remove(0);

    let err = service
        .execute(ActivateProductKey {
            product_key_id: key.id,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        activate_product_key::ExecutionError::AlreadyActivated(id)
            if *id == key.id,
    ));

    _ = service
        .execute(RevokeProductKey {
            product_key_id: key.id,
        })
        .await
        .unwrap();
    let err = service
        .execute(RevokeProductKey {
            product_key_id: key.id,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        revoke_product_key::ExecutionError::AlreadyRevoked(id)
            if *id == key.id,
    ));

    let stored = service
        .execute(query::product_key::ById::by(key.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, product_key::Status::Inactive);
    assert_eq!(stored.key, key.key);
    assert_eq!(stored.created_at, key.created_at);

    let activated = service
        .execute(ActivateProductKey {
            product_key_id: key.id,
        })
        .await
        .unwrap();
    assert!(activated.is_active());
}

#[tokio::test]
async fn unknown_key_id_is_reported() {
    let service = service();
    let unknown = product_key::Id::new();

    let err = service
        .execute(RevokeProductKey {
            product_key_id: unknown,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        revoke_product_key::ExecutionError::ProductKeyNotExists(id)
            if *id == unknown,
    ));

    let err = service
        .execute(ActivateProductKey {
            product_key_id: unknown,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        activate_product_key::ExecutionError::ProductKeyNotExists(_),
    ));
}

#[tokio::test]
async fn revocation_propagates_to_issued_sessions() {
    let service = service();
    let e = edition(&service, "Festival 2024").await;
    let key = service
        .execute(GenerateProductKeys {
            edition_id: e.id(),
            count: 1,
        })
        .await
        .unwrap()
        .remove(0);
    let session = service
        .execute(AuthorizeEdition {
            key: key.key.to_string(),
        })
        .await
        .unwrap();

    let out = service
        .execute(AuthorizeLauncherSession {
            access_token: session.access_token.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(out.product_key.id, key.id);
    assert_eq!(out.edition.id(), e.id());

    _ = service
        .execute(RevokeProductKey {
            product_key_id: key.id,
        })
        .await
        .unwrap();

    for _ in 0..3 {
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
}

#[tokio::test]
async fn lists_keys_of_edition_by_status() {
    let service = service();
    let e = edition(&service, "Festival 2024").await;
    let other = edition(&service, "Festival 2025").await;
    let keys = service
        .execute(GenerateProductKeys {
            edition_id: e.id(),
            count: 4,
        })
        .await
        .unwrap();
    _ = service
        .execute(GenerateProductKeys {
            edition_id: other.id(),
            count: 2,
        })
        .await
        .unwrap();
    _ = service
        .execute(RevokeProductKey {
            product_key_id: keys[2].id,
        })
        .await
        .unwrap();

    let all = service
        .execute(ProductKeysByEdition {
            edition_id: e.id(),
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.iter().all(|k| k.edition_id == e.id()));

    let inactive = service
        .execute(ProductKeysByEdition {
            edition_id: e.id(),
            status: Some(product_key::Status::Inactive),
        })
        .await
        .unwrap();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].id, keys[2].id);

    let active = service
        .execute(ProductKeysByEdition {
            edition_id: e.id(),
            status: Some(product_key::Status::Active),
        })
        .await
        .unwrap();
    assert_eq!(active.len(), 3);

    let err = service
        .execute(ProductKeysByEdition {
            edition_id: edition::Id::new(),
            status: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        product_keys::ExecutionError::EditionNotExists(_),
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_revocations_succeed_once() {
    let service = service();
    let e = edition(&service, "Festival 2024").await;
    let key = service
        .execute(GenerateProductKeys {
            edition_id: e.id(),
            count: 1,
        })
        .await
        .unwrap()
        .remove(0);
    let revoke = || {
        service.execute(RevokeProductKey {
            product_key_id: key.id,
        })
    };

    let (a, b, c, d) = tokio::join!(revoke(), revoke(), revoke(), revoke());

    let mut succeeded = 0;
    for res in [a, b, c, d] {
        match res {
            Ok(k) => {
                assert_eq!(k.status, product_key::Status::Inactive);
                succeeded += 1;
            }
            Err(e) => assert!(
                matches!(
                    e.as_ref(),
                    revoke_product_key::ExecutionError::AlreadyRevoked(_),
                ),
                "{e}",
            ),
        }
    }
    assert_eq!(succeeded, 1);
}
