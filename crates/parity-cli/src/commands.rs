use std::io::Write;

use chrono::DateTime;
use color_eyre::{eyre::bail, Result};
use parity_core::{clock::Clock, keys::PrivateKey};
use parity_keystore::{CredentialStore, KeystoreError, KeystoreStatus, TokenState};
use tracing::info;

use crate::cli::{Command, KeyCommand, TokenCommand};

/// Execute a keystore subcommand, writing user-facing output to `out`.
pub fn run<C: Clock>(
    command: Command,
    store: &mut CredentialStore<C>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Status => {
            let status = store.status()?;
            write_status(&status, out)?;
        }
        Command::Token(cmd) => token(cmd, store, out)?,
        Command::Key(cmd) => key(cmd, store, out)?,
        Command::Version | Command::Config(_) => {
            bail!("command does not operate on the keystore")
        }
    }
    Ok(())
}

fn token<C: Clock>(
    cmd: TokenCommand,
    store: &mut CredentialStore<C>,
    out: &mut impl Write,
) -> Result<()> {
    match cmd {
        TokenCommand::Save { token } => {
            store.reload()?;
            store.save_token(&token)?;
            info!(path = %store.path().display(), "token saved");
            writeln!(
                out,
                "Token saved (valid for {}s).",
                store.token_expiry_secs()
            )?;
        }
        TokenCommand::Show => {
            let token = store.load_token()?;
            writeln!(out, "{token}")?;
        }
    }
    Ok(())
}

fn key<C: Clock>(
    cmd: KeyCommand,
    store: &mut CredentialStore<C>,
    out: &mut impl Write,
) -> Result<()> {
    match cmd {
        KeyCommand::Save { hex } => {
            store.reload()?;
            store.save_private_key(&hex)?;
            let key = store.load_private_key()?;
            writeln!(out, "Private key saved for {}.", key.address())?;
        }
        KeyCommand::Show { address, public } => {
            if address {
                writeln!(out, "{}", store.load_private_key()?.address())?;
            } else if public {
                writeln!(out, "{}", store.load_private_key()?.public_key_hex())?;
            } else {
                writeln!(out, "{}", store.private_key_hex()?)?;
            }
        }
        KeyCommand::Generate { force } => {
            match store.private_key_hex() {
                Ok(_) if !force => {
                    bail!("a private key is already stored; pass --force to replace it")
                }
                Ok(_)
                | Err(KeystoreError::NoKeystore { .. })
                | Err(KeystoreError::NoPrivateKey) => {}
                Err(err) => return Err(err.into()),
            }
            let key = PrivateKey::generate();
            store.save_private_key(&key.to_hex())?;
            info!(path = %store.path().display(), "generated private key");
            writeln!(out, "Generated private key for {}.", key.address())?;
        }
    }
    Ok(())
}

fn write_status(status: &KeystoreStatus, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Keystore: {}", status.path.display())?;
    if !status.exists {
        writeln!(out, "Not configured yet. Save a token or key to create it.")?;
        return Ok(());
    }

    let created = status
        .token_created_at
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string());
    match status.token {
        TokenState::Missing => writeln!(out, "Token: none")?,
        TokenState::Valid { expires_in_secs } => writeln!(
            out,
            "Token: valid (saved {created}, expires in {expires_in_secs}s)"
        )?,
        TokenState::Expired { expired_for_secs } => writeln!(
            out,
            "Token: expired {expired_for_secs}s ago (saved {created})"
        )?,
    }
    let key_line = if status.has_private_key {
        "Private key: stored"
    } else {
        "Private key: none"
    };
    writeln!(out, "{key_line}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use parity_core::clock::FixedClock;
    use parity_keystore::KeystoreConfig;

    use super::*;

    const NOW: i64 = 1_700_000_000;
    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    fn store_in(dir: &std::path::Path, clock: FixedClock) -> CredentialStore<FixedClock> {
        let config = KeystoreConfig::default().with_dir(dir);
        CredentialStore::with_clock(&config, clock).expect("open store")
    }

    fn run_to_string(command: Command, store: &mut CredentialStore<FixedClock>) -> Result<String> {
        let mut out = Vec::new();
        run(command, store, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8 output"))
    }

    #[test]
    fn token_save_then_show() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(dir.path(), FixedClock::new(NOW));

        let saved = run_to_string(
            Command::Token(TokenCommand::Save {
                token: "abc123".into(),
            }),
            &mut store,
        )
        .expect("save");
        assert_eq!(saved, "Token saved (valid for 3600s).\n");

        let shown = run_to_string(Command::Token(TokenCommand::Show), &mut store).expect("show");
        assert_eq!(shown, "abc123\n");
    }

    #[test]
    fn separate_invocations_keep_both_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut first = store_in(dir.path(), FixedClock::new(NOW));
        run_to_string(
            Command::Key(KeyCommand::Save {
                hex: KEY_ONE.into(),
            }),
            &mut first,
        )
        .expect("save key");

        let mut second = store_in(dir.path(), FixedClock::new(NOW));
        run_to_string(
            Command::Token(TokenCommand::Save {
                token: "abc123".into(),
            }),
            &mut second,
        )
        .expect("save token");

        let mut third = store_in(dir.path(), FixedClock::new(NOW));
        let hex = run_to_string(
            Command::Key(KeyCommand::Show {
                address: false,
                public: false,
            }),
            &mut third,
        )
        .expect("show key");
        assert_eq!(hex.trim(), KEY_ONE);
        assert_eq!(third.load_token().expect("token"), "abc123");
    }

    #[test]
    fn key_show_address() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(dir.path(), FixedClock::new(NOW));
        store.save_private_key(KEY_ONE).expect("save key");

        let shown = run_to_string(
            Command::Key(KeyCommand::Show {
                address: true,
                public: false,
            }),
            &mut store,
        )
        .expect("show");
        assert_eq!(shown, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf\n");
    }

    #[test]
    fn generate_refuses_to_replace_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(dir.path(), FixedClock::new(NOW));
        store.save_private_key(KEY_ONE).expect("save key");

        let err = run_to_string(
            Command::Key(KeyCommand::Generate { force: false }),
            &mut store,
        );
        assert!(err.is_err());
        assert_eq!(store.private_key_hex().expect("hex"), KEY_ONE);

        run_to_string(
            Command::Key(KeyCommand::Generate { force: true }),
            &mut store,
        )
        .expect("forced generate");
        assert_ne!(store.private_key_hex().expect("hex"), KEY_ONE);
    }

    #[test]
    fn generate_on_empty_keystore() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(dir.path(), FixedClock::new(NOW));

        let out = run_to_string(
            Command::Key(KeyCommand::Generate { force: false }),
            &mut store,
        )
        .expect("generate");
        assert!(out.starts_with("Generated private key for 0x"));
        assert!(store.load_private_key().is_ok());
    }

    #[test]
    fn expired_token_surfaces_store_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let clock = FixedClock::new(NOW);
        let mut store = store_in(dir.path(), clock.clone());
        store.save_token("abc123").expect("save");
        clock.advance(3601);

        let err = run_to_string(Command::Token(TokenCommand::Show), &mut store)
            .expect_err("expired");
        assert!(matches!(
            err.downcast_ref::<KeystoreError>(),
            Some(KeystoreError::TokenExpired)
        ));
    }

    #[test]
    fn status_for_missing_keystore() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(dir.path(), FixedClock::new(NOW));

        let out = run_to_string(Command::Status, &mut store).expect("status");
        assert!(out.contains("Not configured yet"));
    }

    #[test]
    fn status_lists_token_and_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let clock = FixedClock::new(NOW);
        let mut store = store_in(dir.path(), clock.clone());
        store.save_token("abc123").expect("save");
        clock.advance(100);

        let out = run_to_string(Command::Status, &mut store).expect("status");
        assert!(out.contains("Token: valid (saved 2023-11-14T22:13:20+00:00, expires in 3500s)"));
        assert!(out.contains("Private key: none"));
    }
}
