//! Read entities definitions.

pub mod access_token;
