//! Macros for defining kind enums.

use derive_more::{Display, Error};

/// Macro for defining a kind enum backed by a [`u8`] representation.
///
/// Decoding an unknown [`u8`] value fails with an [`UnknownKindValue`] rather
/// than falling back to some variant.
///
/// # Example
///
/// ```rust
/// use common::define_kind;
///
/// define_kind! {
///     #[doc = "Shape kind."]
///     enum Kind {
///         #[doc = "A cube"]
///         Cube = 1,
///
///         #[doc = "A sphere"]
///         Sphere = 2,
///     }
/// }
///
/// assert_eq!(Kind::ALL, [Kind::Cube, Kind::Sphere]);
/// assert_eq!(Kind::Sphere.u8(), 2);
/// assert_eq!(Kind::try_from(1), Ok(Kind::Cube));
/// assert!(Kind::try_from(0).is_err());
/// assert_eq!(Kind::Cube.to_string(), "CUBE");
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
        )]
        #[doc = $doc]
        #[repr(u8)]
        #[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant = $value,
            )*
        }

        impl $name {
            /// Every variant, in the declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Converts this into its [`u8`] representation.
            #[must_use]
            pub const fn u8(self) -> u8 {
                self as u8
            }
        }

        impl ::core::convert::TryFrom<u8> for $name {
            type Error = $crate::UnknownKindValue;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $(
                        v if Self::$variant.u8() == v => Ok(Self::$variant),
                    )*
                    value => Err($crate::UnknownKindValue {
                        kind: ::core::stringify!($name),
                        value,
                    }),
                }
            }
        }
    };
}

/// Error of decoding a kind enum from an unknown [`u8`] value.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("unknown `{kind}` value: {value}")]
pub struct UnknownKindValue {
    /// Name of the kind enum being decoded.
    pub kind: &'static str,

    /// Raw value that matches no variant.
    pub value: u8,
}
