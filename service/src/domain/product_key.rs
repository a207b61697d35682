//! [`ProductKey`] definitions.

use std::{fmt, str::FromStr, sync::LazyLock};

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, secret, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use regex::Regex;
use uuid::Uuid;

use crate::domain::edition;
#[cfg(doc)]
use crate::domain::Edition;

/// License credential binding a kiosk launcher to an [`Edition`].
///
/// Never deleted: a compromised [`ProductKey`] is revoked by flipping its
/// [`Status`] to [`Status::Inactive`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProductKey {
    /// ID of this [`ProductKey`].
    pub id: Id,

    /// ID of the [`Edition`] this [`ProductKey`] licenses.
    pub edition_id: edition::Id,

    /// [`Key`] string of this [`ProductKey`].
    pub key: Key,

    /// [`Status`] of this [`ProductKey`].
    pub status: Status,

    /// [`DateTime`] when this [`ProductKey`] was created.
    pub created_at: CreationDateTime,
}

impl ProductKey {
    /// Checks whether this [`ProductKey`] is [`Status::Active`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

/// ID of a [`ProductKey`].
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

impl FromStr for Id {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Key string of a [`ProductKey`].
///
/// Five groups of five alphanumeric characters joined with `-`, for example
/// `a1B2c-3D4e5-F6g7H-8i9J0-kLmNo`.
#[derive(AsRef, Clone, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[as_ref(str)]
pub struct Key(String);

impl Key {
    /// Length of a [`Key`] string.
    pub const LEN: usize = 29;

    /// Number of characters in a single group of a [`Key`].
    const GROUP_LEN: usize = 5;

    /// Generates a new random [`Key`].
    ///
    /// # Errors
    ///
    /// If the entropy source is unavailable.
    pub fn generate() -> Result<Self, secret::Unavailable> {
        let raw = secret::alphanumeric(Self::LEN - 4)?;

        let mut key = String::with_capacity(Self::LEN);
        for (i, c) in raw.chars().enumerate() {
            if i > 0 && i % Self::GROUP_LEN == 0 {
                key.push('-');
            }
            key.push(c);
        }
        Ok(Self(key))
    }

    /// Creates a new [`Key`] if the given `key` is valid.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        Self::check(&key).then_some(Self(key))
    }

    /// Checks whether the given `key` is a valid [`Key`].
    fn check(key: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Key`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[A-Za-z0-9]{5}(-[A-Za-z0-9]{5}){4}$")
                .expect("valid regex")
        });

        REGEX.is_match(key.as_ref())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(*****-*****-*****-*****-*****)")
    }
}

impl FromStr for Key {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Key`")
    }
}

define_kind! {
    #[doc = "Status of a `ProductKey`."]
    enum Status {
        #[doc = "Launchers may authorize with the `ProductKey`."]
        Active = 1,

        #[doc = "`ProductKey` is revoked."]
        Inactive = 2,
    }
}

/// [`DateTime`] when a [`ProductKey`] was created.
pub type CreationDateTime = DateTimeOf<(ProductKey, unit::Creation)>;
