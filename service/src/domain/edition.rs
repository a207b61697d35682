//! [`Edition`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, Error, From, Into};
use url::Url;
use uuid::Uuid;

/// Named bundle of games a kiosk launcher is licensed for.
///
/// Immutable once built: an update constructs a new [`Edition`] with the
/// same [`Id`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Edition {
    /// ID of this [`Edition`].
    id: Id,

    /// [`Name`] of this [`Edition`].
    name: Name,

    /// [`QuestionnaireUrl`] of this [`Edition`], if any.
    questionnaire_url: Option<QuestionnaireUrl>,

    /// [`DateTime`] when this [`Edition`] was created.
    created_at: CreationDateTime,
}

impl Edition {
    /// Creates a new [`Edition`] out of the provided parts.
    #[must_use]
    pub fn new(
        id: Id,
        name: Name,
        questionnaire_url: Option<QuestionnaireUrl>,
        created_at: CreationDateTime,
    ) -> Self {
        Self {
            id,
            name,
            questionnaire_url,
            created_at,
        }
    }

    /// Returns ID of this [`Edition`].
    #[must_use]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns [`Name`] of this [`Edition`].
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns [`QuestionnaireUrl`] of this [`Edition`].
    ///
    /// # Errors
    ///
    /// With [`NoQuestionnaire`] if this [`Edition`] has no questionnaire.
    pub fn questionnaire_url(
        &self,
    ) -> Result<&QuestionnaireUrl, NoQuestionnaire> {
        self.questionnaire_url.as_ref().ok_or(NoQuestionnaire)
    }

    /// Returns [`DateTime`] when this [`Edition`] was created.
    #[must_use]
    pub fn created_at(&self) -> CreationDateTime {
        self.created_at
    }
}

/// ID of an [`Edition`].
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

/// Name of an [`Edition`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Maximum number of characters in a [`Name`].
    pub const MAX_LEN: usize = 32;

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name
            && !name.is_empty()
            && name.chars().count() <= Self::MAX_LEN
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// URL of a questionnaire shown by a launcher of an [`Edition`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
pub struct QuestionnaireUrl(Url);

impl QuestionnaireUrl {
    /// Creates a new [`QuestionnaireUrl`] if the given `url` is an absolute
    /// `http` or `https` one.
    #[must_use]
    pub fn new(url: Url) -> Option<Self> {
        matches!(url.scheme(), "http" | "https")
            .then_some(url)
            .filter(Url::has_host)
            .map(Self)
    }
}

impl FromStr for QuestionnaireUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Url::parse(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `QuestionnaireUrl`")
    }
}

/// Error of an [`Edition`] having no questionnaire.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Edition` has no questionnaire")]
pub struct NoQuestionnaire;

/// [`DateTime`] when an [`Edition`] was created.
pub type CreationDateTime = DateTimeOf<(Edition, unit::Creation)>;

#[cfg(test)]
mod tests {
    use common::DateTime;

    use super::{Edition, Id, Name, QuestionnaireUrl};

    #[test]
    fn name_is_bounded() {
        assert!(Name::new("Festival 2024").is_some());
        assert!(Name::new("あ".repeat(32)).is_some());

        assert!(Name::new("").is_none());
        assert!(Name::new(" padded ").is_none());
        assert!(Name::new("x".repeat(33)).is_none());
    }

    #[test]
    fn questionnaire_url_is_web_only() {
        assert!("https://forms.example.com/q/1"
            .parse::<QuestionnaireUrl>()
            .is_ok());
        assert!("http://example.com".parse::<QuestionnaireUrl>().is_ok());

        assert!("ftp://example.com".parse::<QuestionnaireUrl>().is_err());
        assert!("mailto:who@example.com"
            .parse::<QuestionnaireUrl>()
            .is_err());
        assert!("/relative".parse::<QuestionnaireUrl>().is_err());
    }

    #[test]
    fn absent_questionnaire_is_an_error() {
        let name = Name::new("Kiosk").unwrap();
        let without = Edition::new(
            Id::new(),
            name.clone(),
            None,
            DateTime::now().coerce(),
        );
        let url: QuestionnaireUrl = "https://example.com/q".parse().unwrap();
        let with = Edition::new(
            Id::new(),
            name,
            Some(url.clone()),
            DateTime::now().coerce(),
        );

        assert!(without.questionnaire_url().is_err());
        assert_eq!(with.questionnaire_url().unwrap(), &url);
    }
}
