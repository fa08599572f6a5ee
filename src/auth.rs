//! Authentication provider client (hosted password-grant auth).
//!
//! Session changes here are what drive backend selection: a present
//! identity binds the session to the remote store, none binds it to the
//! local store. The caller re-initializes the collection manager on every
//! transition.

use serde::Deserialize;

use crate::error::{BinderError, Result};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The signed-in user, as far as this crate cares: a row-scoping id and the
/// bearer token the remote store authenticates with.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
    pub access_token: String,
}

// ---------------------------------------------------------------------------
// AuthClient
// ---------------------------------------------------------------------------

/// Client for the hosted auth endpoints (sign-up, password sign-in,
/// sign-out). Holds the current identity, if any.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    current: Option<Identity>,
}

#[derive(Deserialize)]
struct SessionResponse {
    access_token: Option<String>,
    user: Option<SessionUser>,
}

#[derive(Deserialize)]
struct SessionUser {
    id: String,
    email: Option<String>,
}

#[derive(Deserialize, Default)]
struct AuthErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    error: Option<String>,
}

impl AuthClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            current: None,
        }
    }

    /// The current identity, or `None` in guest mode.
    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    /// Sign in with email + password. On success the identity becomes
    /// current and is returned.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Identity> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let session = Self::parse_session(resp)
            .await?
            .ok_or_else(|| BinderError::Auth("sign-in returned no session".to_string()))?;
        self.current = Some(session.clone());
        Ok(session)
    }

    /// Create an account. Depending on the host's confirmation settings the
    /// response may or may not carry a session; when it does, the identity
    /// becomes current, otherwise the caller should prompt for sign-in
    /// after confirmation.
    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<Option<Identity>> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let session = Self::parse_session(resp).await?;
        if let Some(session) = &session {
            self.current = Some(session.clone());
        }
        Ok(session)
    }

    /// End the current session. The revocation call is best-effort — the
    /// local identity is cleared regardless.
    pub async fn sign_out(&mut self) {
        if let Some(identity) = self.current.take() {
            let url = format!("{}/auth/v1/logout", self.base_url);
            let result = self
                .http
                .post(&url)
                .header("apikey", &self.api_key)
                .bearer_auth(&identity.access_token)
                .send()
                .await;
            if let Err(e) = result {
                tracing::warn!(error = %e, "sign-out revocation failed");
            }
        }
    }

    /// Extract the identity from an auth response. `Ok(None)` when the host
    /// accepted the request but started no session (e.g. sign-up pending
    /// email confirmation).
    async fn parse_session(resp: reqwest::Response) -> Result<Option<Identity>> {
        if !resp.status().is_success() {
            let body: AuthErrorBody = resp.json().await.unwrap_or_default();
            let msg = body
                .error_description
                .or(body.msg)
                .or(body.error)
                .unwrap_or_else(|| "authentication rejected".to_string());
            return Err(BinderError::Auth(msg));
        }

        let session: SessionResponse = resp.json().await?;
        match (session.access_token, session.user) {
            (Some(token), Some(user)) => Ok(Some(Identity {
                user_id: user.id,
                email: user.email,
                access_token: token,
            })),
            _ => Ok(None),
        }
    }
}
