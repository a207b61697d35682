//! [`Error`]-related definitions.

use std::fmt;

use common::secret;
use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::{command, infra::database, query};
use tracerr::{Trace, Traced};
use tracing as log;

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// User-facing [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Checks whether this [`Error`] is an internal server error.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.status_code.is_server_error()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    ///
    /// Types without a user-facing [`Error`] become an internal one and are
    /// logged.
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error().unwrap_or_else(|| {
            log::error!("{self}");
            Error::internal(&self)
        })
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for secret::Unavailable {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for command::generate_oidc_auth_state::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::RandomSourceUnavailable(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::handle_oidc_callback::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_AUTH_STATE_OR_CODE"]
                #[status = BAD_REQUEST]
                #[message = "Authorization state or code is rejected by the \
                             identity provider"]
                InvalidAuthStateOrCode,
            }
        }

        match self {
            Self::InvalidAuthStateOrCode => {
                Some(Error::InvalidAuthStateOrCode.into())
            }
            Self::IdentityProviderUnavailable(_)
            | Self::IdentityProvider(_) => None,
        }
    }
}

impl AsError for command::authenticate_oidc_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "SESSION_EXPIRED"]
                #[status = UNAUTHORIZED]
                #[message = "Session is expired, authorize again"]
                SessionExpired,
            }
        }

        match self {
            Self::SessionExpired => Some(Error::SessionExpired.into()),
        }
    }
}

impl AsError for command::logout_oidc_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::IdentityProvider(_) => None,
        }
    }
}

impl AsError for command::get_oidc_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_SESSION"]
                #[status = UNAUTHORIZED]
                #[message = "Session is rejected by the identity provider"]
                InvalidSession,
            }
        }

        match self {
            Self::InvalidSession => Some(Error::InvalidSession.into()),
            Self::IdentityProviderUnavailable(_)
            | Self::IdentityProvider(_) => None,
        }
    }
}

impl AsError for command::get_active_oidc_users::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_SESSION"]
                #[status = UNAUTHORIZED]
                #[message = "Session is rejected by the identity provider"]
                InvalidSession,
            }
        }

        match self {
            Self::InvalidSession => Some(Error::InvalidSession.into()),
            Self::IdentityProviderUnavailable(_)
            | Self::IdentityProvider(_) => None,
        }
    }
}

impl AsError for command::create_edition::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EDITION_NAME_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`Edition` name is occupied by another `Edition`"]
                NameOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NameOccupied(_) => Some(Error::NameOccupied.into()),
        }
    }
}

impl AsError for command::update_edition::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EDITION_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Edition` with the provided ID does not exist"]
                EditionNotExists,

                #[code = "EDITION_NAME_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`Edition` name is occupied by another `Edition`"]
                NameOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EditionNotExists(_) => Some(Error::EditionNotExists.into()),
            Self::NameOccupied(_) => Some(Error::NameOccupied.into()),
        }
    }
}

impl AsError for command::delete_edition::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EDITION_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Edition` with the provided ID does not exist"]
                EditionNotExists,

                #[code = "EDITION_HAS_PRODUCT_KEYS"]
                #[status = CONFLICT]
                #[message = "`Edition` has `ProductKey`s and cannot be deleted"]
                HasProductKeys,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EditionNotExists(_) => Some(Error::EditionNotExists.into()),
            Self::HasProductKeys(_) => Some(Error::HasProductKeys.into()),
        }
    }
}

impl AsError for command::generate_product_keys::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_COUNT"]
                #[status = BAD_REQUEST]
                #[message = "At least one `ProductKey` must be requested"]
                InvalidCount,

                #[code = "INVALID_EDITION"]
                #[status = BAD_REQUEST]
                #[message = "`Edition` with the provided ID does not exist"]
                InvalidEdition,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RandomSourceUnavailable(e) => e.try_as_error(),
            Self::InvalidCount => Some(Error::InvalidCount.into()),
            Self::EditionNotExists(_) => Some(Error::InvalidEdition.into()),
        }
    }
}

impl AsError for command::activate_product_key::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PRODUCT_KEY_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`ProductKey` with the provided ID does not exist"]
                ProductKeyNotExists,

                #[code = "ALREADY_ACTIVATED"]
                #[status = CONFLICT]
                #[message = "`ProductKey` is already active"]
                AlreadyActivated,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ProductKeyNotExists(_) => {
                Some(Error::ProductKeyNotExists.into())
            }
            Self::AlreadyActivated(_) => Some(Error::AlreadyActivated.into()),
        }
    }
}

impl AsError for command::revoke_product_key::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PRODUCT_KEY_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`ProductKey` with the provided ID does not exist"]
                ProductKeyNotExists,

                #[code = "ALREADY_REVOKED"]
                #[status = CONFLICT]
                #[message = "`ProductKey` is already revoked"]
                AlreadyRevoked,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ProductKeyNotExists(_) => {
                Some(Error::ProductKeyNotExists.into())
            }
            Self::AlreadyRevoked(_) => Some(Error::AlreadyRevoked.into()),
        }
    }
}

impl AsError for command::authorize_edition::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_PRODUCT_KEY"]
                #[status = UNAUTHORIZED]
                #[message = "Invalid product key"]
                InvalidProductKey,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RandomSourceUnavailable(e) => e.try_as_error(),
            Self::InvalidProductKey => Some(Error::InvalidProductKey.into()),
            Self::TtlOutOfRange(_) => None,
        }
    }
}

impl AsError for command::authorize_launcher_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_ACCESS_TOKEN"]
                #[status = UNAUTHORIZED]
                #[message = "Invalid access token"]
                InvalidAccessToken,

                #[code = "EXPIRED_ACCESS_TOKEN"]
                #[status = UNAUTHORIZED]
                #[message = "Access token is expired"]
                ExpiredAccessToken,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidAccessToken => Some(Error::InvalidAccessToken.into()),
            Self::ExpiredAccessToken => Some(Error::ExpiredAccessToken.into()),
        }
    }
}

impl AsError for query::product_keys::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_EDITION"]
                #[status = BAD_REQUEST]
                #[message = "`Edition` with the provided ID does not exist"]
                InvalidEdition,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EditionNotExists(_) => Some(Error::InvalidEdition.into()),
        }
    }
}
