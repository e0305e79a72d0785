//! Authentication sessions and the password-grant auth client.
//!
//! The signed-in session is never ambient state. A [`SessionStore`] is
//! created by the caller and handed to whatever needs it, usually through
//! the [`SessionProvider`] trait so that consumers only see a read-only view.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::backend::{build_http_client, extract_error_message};
use crate::config::BackendConfig;
use crate::error::{DeskError, Result};

/// Path the sign-up confirmation email links back to.
pub const AUTH_CALLBACK_PATH: &str = "/auth/callback";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable user id.
    pub id: String,
    /// Email address, when the provider returns one.
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated session as returned by the token endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for authenticated requests.
    pub access_token: String,
    /// Token type, normally `bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Refresh token, if issued.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// The user this session belongs to.
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".into()
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Read-only access to the current session.
pub trait SessionProvider: Send + Sync + fmt::Debug {
    /// The current session, if signed in.
    fn current(&self) -> Option<Session>;

    /// Bearer token of the current session.
    fn access_token(&self) -> Option<String> {
        self.current().map(|session| session.access_token)
    }

    /// The signed-in user.
    fn user(&self) -> Option<User> {
        self.current().map(|session| session.user)
    }
}

/// Shared, optionally file-backed session holder.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// An empty, memory-only store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store persisted as JSON at `path`, loading any saved session.
    ///
    /// An unreadable or corrupt file is logged and treated as signed out.
    pub fn persisted(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(err) => {
                    tracing::warn!(error = %err, path = %path.display(), "ignoring corrupt session file");
                    None
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(error = %err, path = %path.display(), "failed to read session file");
                None
            }
        };
        Self {
            inner: Arc::new(RwLock::new(session)),
            path: Some(path),
        }
    }

    /// Where this store persists, if anywhere.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace the current session.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a file-backed store cannot be written. The
    /// in-memory session is updated regardless.
    pub fn set(&self, session: Session) -> Result<()> {
        let json = serde_json::to_string(&session)
            .map_err(|e| DeskError::MalformedResponse(e.to_string()))?;
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Forget the current session.
    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Some(path) = &self.path {
            if let Err(err) = std::fs::remove_file(path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(error = %err, "failed to remove session file");
                }
            }
        }
    }
}

impl SessionProvider for SessionStore {
    fn current(&self) -> Option<Session> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Result of a sign-up request.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// The account is active and a session was issued.
    SignedIn(Session),
    /// The account awaits email confirmation.
    ConfirmationSent(User),
}

/// Client for the hosted auth provider's password flow.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    store: SessionStore,
}

impl fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl AuthClient {
    /// Create a client that records sessions into `store`.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig, store: SessionStore) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config)?,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            store,
        })
    }

    /// The store sessions are written to.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Sign in with email and password and store the session.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Auth`] when the credentials are rejected and
    /// [`DeskError::Http`] on transport failure.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let response = self
            .http
            .post(&url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(map_auth_error(status, &body));
        }

        let session: Session = serde_json::from_str(&body)
            .map_err(|e| DeskError::MalformedResponse(format!("token response: {e}")))?;
        self.store.set(session.clone())?;
        tracing::info!(user = %session.user.id, "signed in");
        Ok(session)
    }

    /// Register a new account.
    ///
    /// `redirect_to` is where the confirmation link should land, typically
    /// `{app}/auth/callback`.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Auth`] when the provider refuses the sign-up.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> Result<SignUpOutcome> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let mut request = self.http.post(&url).header("apikey", &self.anon_key);
        if let Some(redirect) = redirect_to {
            request = request.query(&[("redirect_to", redirect)]);
        }
        let response = request.json(&Credentials { email, password }).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(map_auth_error(status, &body));
        }

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| DeskError::MalformedResponse(format!("signup response: {e}")))?;

        if value.get("access_token").is_some() {
            let session: Session = serde_json::from_value(value)
                .map_err(|e| DeskError::MalformedResponse(format!("signup session: {e}")))?;
            self.store.set(session.clone())?;
            return Ok(SignUpOutcome::SignedIn(session));
        }

        let user_value = match value.get("user") {
            Some(user) if user.is_object() => user.clone(),
            _ => value,
        };
        let user: User = serde_json::from_value(user_value)
            .map_err(|e| DeskError::MalformedResponse(format!("signup user: {e}")))?;
        tracing::info!(user = %user.id, "sign-up awaiting confirmation");
        Ok(SignUpOutcome::ConfirmationSent(user))
    }

    /// Sign out. The local session is cleared even if the remote call fails.
    ///
    /// # Errors
    ///
    /// Returns the remote error, if any, after clearing the session.
    pub async fn sign_out(&self) -> Result<()> {
        let Some(token) = self.store.access_token() else {
            return Ok(());
        };

        let url = format!("{}/auth/v1/logout", self.base_url);
        let outcome = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await;
        self.store.clear();

        let response = outcome?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_auth_error(status, &body));
        }
        tracing::info!("signed out");
        Ok(())
    }
}

/// Build the confirmation redirect for an app served at `app_base`.
pub fn callback_url(app_base: &str) -> String {
    format!("{}{AUTH_CALLBACK_PATH}", app_base.trim_end_matches('/'))
}

fn map_auth_error(status: reqwest::StatusCode, body: &str) -> DeskError {
    let message = extract_error_message(body);
    match status.as_u16() {
        400 | 401 | 403 | 422 => DeskError::Auth(message),
        code => DeskError::Http(format!("auth HTTP {code}: {message}")),
    }
}
