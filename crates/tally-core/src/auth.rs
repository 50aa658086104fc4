//! Local session handling (mocked sign-in)
//!
//! There is no account database: a [`CredentialVerifier`] decides whether a
//! login is accepted, and the session is two keys in the key-value medium
//! (`authToken` and `userData`). The expense store never looks at either.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{User, MSG_MISSING_FIELDS};
use crate::storage::{KeyValueStore, AUTH_TOKEN_KEY, USER_DATA_KEY};

/// The one password the mock verifier accepts
pub const MOCK_PASSWORD: &str = "password";

/// Minimum password length on signup
pub const MIN_PASSWORD_LEN: usize = 6;

/// Decides whether an email/password pair may sign in
pub trait CredentialVerifier {
    fn verify(&self, email: &str, password: &str) -> bool;
}

/// Accepts any email together with [`MOCK_PASSWORD`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MockVerifier;

impl CredentialVerifier for MockVerifier {
    fn verify(&self, _email: &str, password: &str) -> bool {
        password == MOCK_PASSWORD
    }
}

pub struct Session<S, V = MockVerifier> {
    storage: S,
    verifier: V,
}

impl<S: KeyValueStore> Session<S, MockVerifier> {
    pub fn new(storage: S) -> Self {
        Self::with_verifier(storage, MockVerifier)
    }
}

impl<S: KeyValueStore, V: CredentialVerifier> Session<S, V> {
    pub fn with_verifier(storage: S, verifier: V) -> Self {
        Self { storage, verifier }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(Error::Validation(MSG_MISSING_FIELDS.to_string()));
        }
        if !self.verifier.verify(email, password) {
            warn!(email, "Rejected login");
            return Err(Error::Auth("Invalid credentials".to_string()));
        }

        let user = User {
            id: "1".to_string(),
            email: email.to_string(),
            name: display_name(email),
        };
        self.start(&user)?;
        info!(email, "Logged in");
        Ok(user)
    }

    pub fn signup(&self, email: &str, password: &str, confirm_password: &str) -> Result<User> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() || confirm_password.is_empty() {
            return Err(Error::Validation(MSG_MISSING_FIELDS.to_string()));
        }
        if password != confirm_password {
            return Err(Error::Validation("Passwords do not match".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }

        let user = User {
            id: Utc::now().timestamp_millis().to_string(),
            email: email.to_string(),
            name: display_name(email),
        };
        self.start(&user)?;
        info!(email, "Signed up");
        Ok(user)
    }

    /// Forget the session; safe to call when nobody is signed in
    pub fn logout(&self) -> Result<()> {
        self.storage.remove(AUTH_TOKEN_KEY)?;
        self.storage.remove(USER_DATA_KEY)?;
        Ok(())
    }

    /// The signed-in user, if both session keys are present and readable
    pub fn current_user(&self) -> Option<User> {
        let token = self.storage.get(AUTH_TOKEN_KEY).ok().flatten()?;
        if token.is_empty() {
            return None;
        }
        let raw = self.storage.get(USER_DATA_KEY).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Stored user data is unreadable: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Store the user, then the token; a session is never left half written
    fn start(&self, user: &User) -> Result<()> {
        let token = format!("mock_jwt_token_{}", Utc::now().timestamp_millis());
        self.storage.set(USER_DATA_KEY, &serde_json::to_string(user)?)?;
        if let Err(e) = self.storage.set(AUTH_TOKEN_KEY, &token) {
            if let Err(cleanup) = self.storage.remove(USER_DATA_KEY) {
                warn!("Could not remove user data after failed login: {}", cleanup);
            }
            return Err(e);
        }
        Ok(())
    }
}

/// Part of the email before the `@`
fn display_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
