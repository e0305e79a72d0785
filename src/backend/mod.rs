//! Client for the hosted backend: remote functions and the REST store.
//!
//! # Function contract
//!
//! Every remote function is invoked as
//! `POST {base}/functions/v1/{name}` with a JSON body and must answer with an
//! envelope:
//!
//! ```text
//! { "data": <payload> }            success
//! { "error": <string | {message}> } failure (authoritative, even with data)
//! ```
//!
//! A body without a `data` field is a [`DeskError::MalformedResponse`];
//! payloads are never guessed at one level up or down.
//!
//! Requests carry the anonymous key as `apikey` and, when signed in, the
//! session token as the bearer. There is no retry.

pub mod categories;
pub mod generate;
pub mod news;
pub mod preferences;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::error::{DeskError, Result};
use crate::session::SessionProvider;

/// The envelope every remote function answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionResponse<T> {
    /// Payload on success.
    pub data: Option<T>,
    /// Error reported by the function.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl<T> FunctionResponse<T> {
    /// Resolve the envelope for function `name`.
    ///
    /// # Errors
    ///
    /// [`DeskError::Function`] when `error` is set, otherwise
    /// [`DeskError::MalformedResponse`] when `data` is missing.
    pub fn into_result(self, name: &str) -> Result<T> {
        if let Some(error) = self.error.filter(|e| !e.is_null()) {
            return Err(DeskError::Function {
                name: name.to_string(),
                message: error_value_message(&error),
            });
        }
        self.data.ok_or_else(|| {
            DeskError::MalformedResponse(format!("function {name} returned no data"))
        })
    }
}

/// Build the shared HTTP client with the configured timeout.
///
/// # Errors
///
/// Returns [`DeskError::Http`] if the TLS backend cannot be initialised.
pub fn build_http_client(config: &BackendConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| DeskError::Http(format!("failed to build HTTP client: {e}")))
}

/// Pull a human-readable message out of an error body.
///
/// Understands the shapes the auth provider, REST store and functions use:
/// `error_description`, `msg`, `message`, and `error` as a string or an
/// object with a `message`. Falls back to the raw body.
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error_description", "msg", "message"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(String::from))
                .or_else(|| v.get("error").map(error_value_message))
        })
        .unwrap_or_else(|| body.to_string())
}

fn error_value_message(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(s) => s.clone(),
        other => other
            .get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .unwrap_or_else(|| other.to_string()),
    }
}

/// Authenticated access to remote functions and REST tables.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: Arc<dyn SessionProvider>,
}

impl fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .field("signed_in", &self.session.current().is_some())
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a client reading the bearer token from `session`.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig, session: Arc<dyn SessionProvider>) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config)?,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            session,
        })
    }

    /// The session view requests are authorised with.
    pub fn session(&self) -> &Arc<dyn SessionProvider> {
        &self.session
    }

    fn bearer(&self) -> String {
        self.session
            .access_token()
            .unwrap_or_else(|| self.anon_key.clone())
    }

    fn authorised(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }

    /// Invoke remote function `name` with `body` and unwrap its envelope.
    ///
    /// # Errors
    ///
    /// [`DeskError::Http`] on transport failure or non-success status,
    /// [`DeskError::Function`] when the function reports an error, and
    /// [`DeskError::MalformedResponse`] when the envelope is wrong.
    pub async fn invoke<B, T>(&self, name: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/functions/v1/{name}", self.base_url);
        tracing::debug!(function = name, "invoking remote function");

        let response = self
            .authorised(self.http.post(&url))
            .json(body)
            .send()
            .await
            .map_err(|e| DeskError::Http(format!("function {name} request failed: {e}")))?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            // Functions put their error in the envelope even on failure codes.
            let message = extract_error_message(&text);
            return Err(DeskError::Function {
                name: name.to_string(),
                message: format!("HTTP {}: {message}", status.as_u16()),
            });
        }

        let envelope: FunctionResponse<T> = serde_json::from_str(&text).map_err(|e| {
            DeskError::MalformedResponse(format!("function {name} response: {e}"))
        })?;
        envelope.into_result(name)
    }

    /// `GET {base}/rest/v1/{table}` with PostgREST query parameters.
    ///
    /// # Errors
    ///
    /// [`DeskError::Http`] on transport failure or non-success status and
    /// [`DeskError::MalformedResponse`] if rows do not decode.
    pub async fn select<T>(&self, table: &str, query: &[(&str, &str)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/rest/v1/{table}", self.base_url);
        let response = self
            .authorised(self.http.get(&url))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(rest_error(table, status, &text));
        }
        serde_json::from_str(&text)
            .map_err(|e| DeskError::MalformedResponse(format!("{table} rows: {e}")))
    }

    /// Insert-or-merge `row` into `table`, resolving conflicts on
    /// `on_conflict`.
    ///
    /// # Errors
    ///
    /// [`DeskError::Http`] on transport failure or non-success status.
    pub async fn upsert<R>(&self, table: &str, row: &R, on_conflict: &str) -> Result<()>
    where
        R: Serialize + ?Sized,
    {
        let url = format!("{}/rest/v1/{table}", self.base_url);
        let response = self
            .authorised(self.http.post(&url))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(rest_error(table, status, &text));
        }
        Ok(())
    }
}

fn rest_error(table: &str, status: reqwest::StatusCode, body: &str) -> DeskError {
    let message = extract_error_message(body);
    match status.as_u16() {
        401 | 403 => DeskError::Auth(format!("{table}: {message}")),
        code => DeskError::Http(format!("{table} HTTP {code}: {message}")),
    }
}
