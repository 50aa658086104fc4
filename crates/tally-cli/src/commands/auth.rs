//! Session command implementations (login, signup, logout, whoami)

use anyhow::Result;
use tally_core::auth::{CredentialVerifier, Session};
use tally_core::{Error, KeyValueStore};

pub fn cmd_login<S: KeyValueStore, V: CredentialVerifier>(
    session: &Session<S, V>,
    email: &str,
    password: &str,
) -> Result<()> {
    match session.login(email, password) {
        Ok(user) => {
            println!("✅ Signed in as {} ({})", user.name, user.email);
            Ok(())
        }
        Err(Error::Auth(msg)) => anyhow::bail!("{}", msg),
        Err(e) => Err(e.into()),
    }
}

pub fn cmd_signup<S: KeyValueStore, V: CredentialVerifier>(
    session: &Session<S, V>,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<()> {
    let user = session.signup(email, password, confirm_password)?;
    println!("✅ Account created. Signed in as {} ({})", user.name, user.email);
    Ok(())
}

pub fn cmd_logout<S: KeyValueStore, V: CredentialVerifier>(session: &Session<S, V>) -> Result<()> {
    let was_signed_in = session.is_authenticated();
    session.logout()?;
    if was_signed_in {
        println!("👋 Signed out");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

pub fn cmd_whoami<S: KeyValueStore, V: CredentialVerifier>(session: &Session<S, V>) -> Result<()> {
    match session.current_user() {
        Some(user) => {
            println!("{} <{}>", user.name, user.email);
            println!("   ID: {}", user.id);
        }
        None => {
            println!("Not signed in. Use:");
            println!("  tally login --email you@example.com --password password");
        }
    }
    Ok(())
}
