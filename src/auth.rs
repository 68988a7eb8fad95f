// src/auth.rs - Credential acquisition against the remote login endpoint

use serde::Serialize;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::client::{ApiContext, ContextObserver};
use crate::config::SuiteConfig;
use crate::error::{Result, SuiteError};
use crate::models::{AuthUser, TestData, TokenPair};

/// Overrides for a login exchange.
///
/// `LoginOptions::default()` uses the shared test account from
/// [`TestData::default`]. `expires_in_mins` is only sent when set; a
/// zero lifetime is never sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOptions {
    pub username: String,
    pub password: String,
    pub expires_in_mins: Option<NonZeroU32>,
}

impl Default for LoginOptions {
    fn default() -> Self {
        Self::from_test_data(&TestData::default())
    }
}

impl LoginOptions {
    pub fn from_test_data(data: &TestData) -> Self {
        Self {
            username: data.username.clone(),
            password: data.password.clone(),
            expires_in_mins: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Request a token lifetime. `0` clears it, leaving the server default.
    pub fn with_expires_in_mins(mut self, minutes: u32) -> Self {
        self.expires_in_mins = NonZeroU32::new(minutes);
        self
    }

    pub fn request(&self) -> LoginRequest<'_> {
        LoginRequest {
            username: &self.username,
            password: &self.password,
            expires_in_mins: self.expires_in_mins,
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_mins: Option<NonZeroU32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Exchanges credentials for a [`TokenPair`].
///
/// Each call opens its own [`ApiContext`] and releases it before returning,
/// whether the exchange succeeded or not.
#[derive(Clone)]
pub struct CredentialAcquirer {
    base_url: String,
    timeout: Duration,
    accept_invalid_certs: bool,
    observer: Option<Arc<dyn ContextObserver>>,
}

impl CredentialAcquirer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            observer: None,
        }
    }

    pub fn from_config(config: &SuiteConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.request_timeout(),
            accept_invalid_certs: config.accept_invalid_certs,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ContextObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Log in and return the access/refresh pair.
    ///
    /// # Errors
    /// * [`SuiteError::AuthenticationFailure`] for a non-2xx response, with
    ///   the status and body text.
    /// * [`SuiteError::ProtocolViolation`] for a 2xx response without both
    ///   tokens.
    /// * [`SuiteError::Transport`] when the request never completed.
    ///
    /// # Example
    /// ```rust,no_run
    /// use dummyjson_suite::auth::{CredentialAcquirer, LoginOptions};
    ///
    /// # async fn example() -> dummyjson_suite::Result<()> {
    /// let acquirer = CredentialAcquirer::new("https://dummyjson.com");
    /// let tokens = acquirer
    ///     .acquire(&LoginOptions::default().with_expires_in_mins(30))
    ///     .await?;
    /// assert!(!tokens.access_token.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn acquire(&self, options: &LoginOptions) -> Result<TokenPair> {
        let mut builder = ApiContext::builder(self.base_url.clone())
            .accept_invalid_certs(self.accept_invalid_certs)
            .timeout(self.timeout);
        if let Some(observer) = &self.observer {
            builder = builder.observer(observer.clone());
        }
        let ctx = builder.build()?;

        let result = login(&ctx, options).await;
        ctx.dispose();

        match &result {
            Ok(_) => info!(username = %options.username, "Acquired token pair"),
            Err(e) => warn!(username = %options.username, error = %e, "Token acquisition failed"),
        }
        result
    }
}

/// Acquire a token pair with the settings from `config`.
pub async fn get_access_token(config: &SuiteConfig, options: &LoginOptions) -> Result<TokenPair> {
    CredentialAcquirer::from_config(config).acquire(options).await
}

async fn login(ctx: &ApiContext, options: &LoginOptions) -> Result<TokenPair> {
    debug!(
        username = %options.username,
        expires_in_mins = ?options.expires_in_mins,
        "POST /auth/login"
    );
    let response = ctx.post_json("/auth/login", &options.request()).await?;
    if !response.ok() {
        return Err(SuiteError::AuthenticationFailure {
            status: response.status(),
            body: response.text(),
        });
    }

    let body: Value = response.json().map_err(|e| {
        SuiteError::ProtocolViolation(format!("/auth/login returned a non-JSON body: {}", e))
    })?;
    token_pair_from(&body, "/auth/login")
}

/// Exchange a refresh token for a new pair on an existing context.
pub async fn refresh_tokens(ctx: &ApiContext, refresh_token: &str) -> Result<TokenPair> {
    let response = ctx
        .post_json("/auth/refresh", &RefreshRequest { refresh_token })
        .await?;
    if !response.ok() {
        return Err(SuiteError::AuthenticationFailure {
            status: response.status(),
            body: response.text(),
        });
    }

    let body: Value = response.json().map_err(|e| {
        SuiteError::ProtocolViolation(format!("/auth/refresh returned a non-JSON body: {}", e))
    })?;
    token_pair_from(&body, "/auth/refresh")
}

/// `GET /auth/me` on a context that already carries a bearer token.
pub async fn current_user(ctx: &ApiContext) -> Result<AuthUser> {
    ctx.get("/auth/me").await?.expect_ok()?.json()
}

fn token_pair_from(body: &Value, endpoint: &str) -> Result<TokenPair> {
    let access_token = non_empty_str(body, "accessToken").ok_or_else(|| {
        SuiteError::ProtocolViolation(format!("No accessToken in {} response", endpoint))
    })?;
    let refresh_token = non_empty_str(body, "refreshToken").ok_or_else(|| {
        SuiteError::ProtocolViolation(format!("No refreshToken in {} response", endpoint))
    })?;

    Ok(TokenPair {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
    })
}

fn non_empty_str<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}
