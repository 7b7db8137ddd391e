use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI surface definition.
#[derive(Parser, Debug)]
#[command(
    name = "parity",
    about = "Local keystore for the parity auth token and signing key",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Keystore directory (overrides the config file; default `~/.parity`).
    #[arg(long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,
    /// Keystore file name inside the directory (default `keystore.json`).
    #[arg(long, global = true, value_name = "NAME")]
    pub file_name: Option<String>,
    /// Optional subcommand; defaults to `status` when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show what the keystore holds and whether the token is still valid.
    Status,
    /// Manage the auth token.
    #[command(subcommand)]
    Token(TokenCommand),
    /// Manage the private key.
    #[command(subcommand)]
    Key(KeyCommand),
    /// Print version and exit.
    Version,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TokenCommand {
    /// Store a new auth token (restarts the expiry window).
    Save { token: String },
    /// Print the stored token if it has not expired.
    Show,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum KeyCommand {
    /// Store a hex-encoded secp256k1 private key.
    Save { hex: String },
    /// Print the stored key (hex by default).
    Show {
        /// Print the derived address instead.
        #[arg(long, conflicts_with = "public")]
        address: bool,
        /// Print the uncompressed public key instead.
        #[arg(long)]
        public: bool,
    },
    /// Generate and store a fresh private key.
    Generate {
        /// Replace an existing key.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}
