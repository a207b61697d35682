//! [`Args`] definitions.

use clap::{Parser, Subcommand};

/// Credential tooling of the launcher distribution platform.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// [`Command`] to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Command to run.
///
/// The built-in store lives only as long as a single process, so nothing
/// written by one invocation is seen by the next. Only the flows that are
/// complete against the identity provider alone are exposed.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authenticates an operator with the identity provider.
    #[command(subcommand)]
    Oidc(Oidc),
}

/// [OpenID Connect] command.
///
/// [OpenID Connect]: https://openid.net/specs/openid-connect-core-1_0.html
#[derive(Debug, Subcommand)]
pub enum Oidc {
    /// Starts an authorization, printing the URL to open and the verifier
    /// to keep until the callback.
    Authorize,

    /// Exchanges the code received by the callback for a session.
    Callback {
        /// Authorization code received by the callback.
        #[arg(long)]
        code: String,

        /// Code verifier printed by `authorize`.
        #[arg(long)]
        verifier: String,
    },

    /// Prints the operator the access token belongs to.
    Me {
        /// Access token printed by `callback`.
        #[arg(long)]
        token: String,
    },

    /// Lists the active users of the identity provider.
    Users {
        /// Access token printed by `callback`.
        #[arg(long)]
        token: String,
    },

    /// Revokes the access token of a session.
    Logout {
        /// Access token printed by `callback`.
        #[arg(long)]
        token: String,
    },
}
