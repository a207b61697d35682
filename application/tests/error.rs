//! Tests of translating service errors into user-facing [`Error`]s.

use application::{AsError as _, Error};
use service::{
    command::{
        authorize_edition, authorize_launcher_session, create_edition,
        delete_edition, generate_product_keys, get_oidc_user,
        handle_oidc_callback, revoke_product_key,
    },
    domain::{edition, product_key},
    infra::{database, idp, memory},
    query::product_keys,
};

#[test]
fn invalid_product_key_is_uniform() {
    let err = authorize_edition::ExecutionError::InvalidProductKey.into_error();

    assert_eq!(err.code, "INVALID_PRODUCT_KEY");
    assert_eq!(err.status_code, http::StatusCode::UNAUTHORIZED);
    assert_eq!(err.message, "Invalid product key");
}

#[test]
fn expired_and_invalid_tokens_differ() {
    use authorize_launcher_session::ExecutionError as E;

    let invalid = E::InvalidAccessToken.into_error();
    let expired = E::ExpiredAccessToken.into_error();

    assert_eq!(invalid.code, "INVALID_ACCESS_TOKEN");
    assert_eq!(expired.code, "EXPIRED_ACCESS_TOKEN");
    assert_eq!(invalid.status_code, expired.status_code);
}

#[test]
fn missing_edition_is_invalid_edition() {
    let id = edition::Id::new();

    let generation =
        generate_product_keys::ExecutionError::EditionNotExists(id)
            .into_error();
    let listing = product_keys::ExecutionError::EditionNotExists(id).into_error();

    assert_eq!(generation.code, "INVALID_EDITION");
    assert_eq!(listing.code, "INVALID_EDITION");
    assert_eq!(
        generate_product_keys::ExecutionError::InvalidCount
            .into_error()
            .code,
        "INVALID_COUNT",
    );
}

#[test]
fn repeated_revocation_conflicts() {
    let err =
        revoke_product_key::ExecutionError::AlreadyRevoked(product_key::Id::new())
            .into_error();

    assert_eq!(err.code, "ALREADY_REVOKED");
    assert_eq!(err.status_code, http::StatusCode::CONFLICT);
}

#[test]
fn rejected_callback_is_not_internal() {
    let err = handle_oidc_callback::ExecutionError::from(
        idp::Error::InvalidCredentials,
    )
    .into_error();

    assert_eq!(err.code, "INVALID_AUTH_STATE_OR_CODE");
    assert!(!err.is_internal());
}

#[test]
fn edition_with_product_keys_conflicts() {
    let id = edition::Id::new();

    let missing =
        delete_edition::ExecutionError::EditionNotExists(id).into_error();
    let referenced =
        delete_edition::ExecutionError::HasProductKeys(id).into_error();

    assert_eq!(missing.code, "EDITION_NOT_EXISTS");
    assert_eq!(missing.status_code, http::StatusCode::NOT_FOUND);
    assert_eq!(referenced.code, "EDITION_HAS_PRODUCT_KEYS");
    assert_eq!(referenced.status_code, http::StatusCode::CONFLICT);
}

#[test]
fn rejected_session_is_unauthorized() {
    let err = get_oidc_user::ExecutionError::from(idp::Error::InvalidSession)
        .into_error();

    assert_eq!(err.code, "INVALID_SESSION");
    assert_eq!(err.status_code, http::StatusCode::UNAUTHORIZED);
}

#[test]
fn unrepresentable_ttl_is_internal() {
    let err = authorize_edition::ExecutionError::TtlOutOfRange(
        std::time::Duration::MAX,
    )
    .into_error();

    assert!(err.is_internal());
}

#[test]
fn infrastructure_failures_are_internal() {
    let unavailable = handle_oidc_callback::ExecutionError::from(
        idp::Error::Unreachable("connection refused".into()),
    )
    .into_error();
    let db = create_edition::ExecutionError::Db(database::Error::from(
        memory::Error::ForeignKeyViolation(
            database::constraint::PRODUCT_KEY_EDITION,
        ),
    ))
    .into_error();

    for err in [unavailable, db] {
        assert_eq!(err.code, "INTERNAL_SERVER_ERROR");
        assert!(err.is_internal());
    }
}

#[test]
fn traced_error_carries_trace() {
    let err: Error =
        tracerr::new!(generate_product_keys::ExecutionError::InvalidCount)
            .into_error();

    assert_eq!(err.code, "INVALID_COUNT");
    assert!(err.backtrace.is_some());
    assert!(err.to_string().starts_with("[INVALID_COUNT]: "));
}
