//! [`LauncherSession`] definitions.

use std::{fmt, str::FromStr};

#[cfg(doc)]
use common::DateTime;
use common::{secret, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::ProductKey;
use crate::domain::product_key;

/// Time-boxed session of a kiosk launcher, issued for a [`ProductKey`].
///
/// Read-only after creation and never renewed: a launcher re-authorizes
/// with its [`ProductKey`] once the session expires.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LauncherSession {
    /// ID of this [`LauncherSession`].
    pub id: Id,

    /// ID of the [`ProductKey`] this [`LauncherSession`] was issued for.
    pub product_key_id: product_key::Id,

    /// [`AccessToken`] of this [`LauncherSession`].
    pub access_token: AccessToken,

    /// [`DateTime`] when this [`LauncherSession`] expires.
    pub expires_at: ExpirationDateTime,

    /// [`DateTime`] when this [`LauncherSession`] was created.
    pub created_at: CreationDateTime,
}

impl LauncherSession {
    /// Checks whether this [`LauncherSession`] is expired at the provided
    /// `now`.
    #[must_use]
    pub fn is_expired_at<Of: ?Sized>(&self, now: DateTimeOf<Of>) -> bool {
        self.expires_at.is_reached_at(now)
    }
}

/// ID of a [`LauncherSession`].
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, Hash, Into, PartialEq,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Opaque bearer token of a [`LauncherSession`].
#[derive(AsRef, Clone, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct AccessToken(String);

impl AccessToken {
    /// Length of an [`AccessToken`].
    pub const LEN: usize = 64;

    /// Generates a new random [`AccessToken`].
    ///
    /// # Errors
    ///
    /// If the entropy source is unavailable.
    pub fn generate() -> Result<Self, secret::Unavailable> {
        secret::alphanumeric(Self::LEN).map(Self)
    }

    /// Creates a new [`AccessToken`] if the given `token` is valid.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        Self::check(&token).then_some(Self(token))
    }

    /// Checks whether the given `token` is a valid [`AccessToken`].
    fn check(token: impl AsRef<str>) -> bool {
        let token = token.as_ref();
        token.len() == Self::LEN
            && token.bytes().all(|b| b.is_ascii_alphanumeric())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

impl FromStr for AccessToken {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `AccessToken`")
    }
}

/// [`DateTime`] when a [`LauncherSession`] expires.
pub type ExpirationDateTime =
    DateTimeOf<(LauncherSession, unit::Expiration)>;

/// [`DateTime`] when a [`LauncherSession`] was created.
pub type CreationDateTime = DateTimeOf<(LauncherSession, unit::Creation)>;
