//! [OpenID Connect] definitions.
//!
//! Operators are authenticated against an external identity provider with
//! the authorization code flow protected by [PKCE].
//!
//! [OpenID Connect]: https://openid.net/specs/openid-connect-core-1_0.html
//! [PKCE]: https://datatracker.ietf.org/doc/html/rfc7636

use std::{fmt, sync::LazyLock};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
#[cfg(doc)]
use common::DateTime;
use common::{define_kind, secret, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret, SecretBox};
use sha2::{Digest as _, Sha256};
use uuid::Uuid;

/// Registered client of an identity provider.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Client {
    /// [`ClientId`] of this [`Client`].
    pub client_id: ClientId,
}

/// ID of a [`Client`] issued by an identity provider.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new [`ClientId`] if the given `id` is not blank.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        (!id.trim().is_empty()).then_some(Self(id))
    }
}

/// State of an authorization attempt, kept by the caller between redirecting
/// an operator to the identity provider and handling its callback.
#[derive(Clone, Debug)]
pub struct AuthState {
    /// [`CodeChallengeMethod`] the [`CodeChallenge`] was derived with.
    pub code_challenge_method: CodeChallengeMethod,

    /// [`CodeVerifier`] proving possession of the [`CodeChallenge`].
    pub code_verifier: CodeVerifier,
}

impl AuthState {
    /// Returns the [`CodeChallenge`] of this [`AuthState`].
    #[must_use]
    pub fn code_challenge(&self) -> CodeChallenge {
        self.code_verifier.code_challenge(self.code_challenge_method)
    }
}

/// Method of deriving a [`CodeChallenge`] from a [`CodeVerifier`].
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
pub enum CodeChallengeMethod {
    /// `BASE64URL-ENCODE(SHA256(ASCII(code_verifier)))`.
    #[default]
    #[display("S256")]
    Sha256,
}

/// High-entropy secret of an authorization attempt.
#[derive(AsRef, Clone, Eq, PartialEq)]
#[as_ref(str)]
pub struct CodeVerifier(String);

impl CodeVerifier {
    /// Length of a generated [`CodeVerifier`].
    pub const GENERATED_LEN: usize = 64;

    /// Generates a new random [`CodeVerifier`].
    ///
    /// # Errors
    ///
    /// If the entropy source is unavailable.
    pub fn generate() -> Result<Self, secret::Unavailable> {
        secret::alphanumeric(Self::GENERATED_LEN).map(Self)
    }

    /// Creates a new [`CodeVerifier`] if the given `verifier` is valid.
    #[must_use]
    pub fn new(verifier: impl Into<String>) -> Option<Self> {
        let verifier = verifier.into();
        Self::check(&verifier).then_some(Self(verifier))
    }

    /// Checks whether the given `verifier` is a valid [`CodeVerifier`].
    fn check(verifier: impl AsRef<str>) -> bool {
        /// Regular expression checking [`CodeVerifier`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[A-Za-z0-9\-._~]{43,128}$").expect("valid regex")
        });

        REGEX.is_match(verifier.as_ref())
    }

    /// Derives the [`CodeChallenge`] of this [`CodeVerifier`] with the
    /// provided [`CodeChallengeMethod`].
    #[must_use]
    pub fn code_challenge(&self, method: CodeChallengeMethod) -> CodeChallenge {
        match method {
            CodeChallengeMethod::Sha256 => CodeChallenge(
                URL_SAFE_NO_PAD.encode(Sha256::digest(self.0.as_bytes())),
            ),
        }
    }
}

impl fmt::Debug for CodeVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CodeVerifier([REDACTED])")
    }
}

/// Value sent to an identity provider in place of a [`CodeVerifier`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct CodeChallenge(String);

/// Authorization code issued by an identity provider to its callback.
#[derive(AsRef, Clone, Eq, PartialEq)]
#[as_ref(str)]
pub struct AuthorizationCode(String);

impl AuthorizationCode {
    /// Creates a new [`AuthorizationCode`] if the given `code` is not empty.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        (!code.is_empty()).then_some(Self(code))
    }
}

impl fmt::Debug for AuthorizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthorizationCode([REDACTED])")
    }
}

/// Bearer token issued by an identity provider.
#[derive(AsRef, Clone, Debug, Eq, PartialEq)]
#[as_ref(str)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new [`AccessToken`] out of the provided `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> SecretBox<Self> {
        SecretBox::new(Box::new(Self(token.into())))
    }
}

impl CloneableSecret for AccessToken {}
impl Zeroize for AccessToken {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Session of an operator authenticated by an identity provider.
///
/// Never refreshed: once expired or logged out, the operator authorizes
/// anew.
#[derive(Clone, Debug)]
pub struct Session {
    /// [`AccessToken`] of this [`Session`].
    pub access_token: SecretBox<AccessToken>,

    /// [`DateTime`] when this [`Session`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Session`] expires.
    ///
    /// Kept a few seconds ahead of the identity provider's own expiration,
    /// so a non-expired [`Session`] is still accepted by it.
    pub expires_at: ExpirationDateTime,
}

impl Session {
    /// Checks whether this [`Session`] is expired at the provided `now`.
    #[must_use]
    pub fn is_expired_at<Of: ?Sized>(&self, now: DateTimeOf<Of>) -> bool {
        self.expires_at.is_reached_at(now)
    }
}

/// [`DateTime`] when a [`Session`] was created.
pub type CreationDateTime = DateTimeOf<(Session, unit::Creation)>;

/// [`DateTime`] when a [`Session`] expires.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;

/// Operator account known to an identity provider.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    /// ID of this [`User`].
    pub id: UserId,

    /// Name of this [`User`].
    pub name: UserName,

    /// [`UserStatus`] of this [`User`].
    pub status: UserStatus,
}

impl User {
    /// Checks whether this [`User`] may sign in.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// ID of a [`User`] assigned by an identity provider.
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq)]
pub struct UserId(Uuid);

/// Name of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct UserName(String);

impl UserName {
    /// Creates a new [`UserName`] if the given `name` is not blank.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        (!name.trim().is_empty()).then_some(Self(name))
    }
}

define_kind! {
    #[doc = "Account state of a `User`."]
    enum UserStatus {
        #[doc = "Account is deactivated."]
        Deactivated = 0,

        #[doc = "Account is in use."]
        Active = 1,

        #[doc = "Account is suspended for a while."]
        Suspended = 2,
    }
}
