// src/suite/auth.rs - @auth checks

use futures::future::BoxFuture;
use serde_json::Value;

use super::{Check, CheckContext, Fixture, Group};
use crate::auth::{current_user, refresh_tokens};
use crate::error::Result;
use crate::expect::{ensure, ensure_eq, expect_truthy};
use crate::models::LoginResponse;

pub fn public_group() -> Group {
    Group::new("public", "@auth", Fixture::PerTest)
        .check(Check::new("login returns tokens", login_returns_tokens).tag("@smoke"))
        .check(Check::new(
            "/auth/me unauthorized without or with invalid token",
            me_rejects_missing_or_bad_token,
        ))
        .check(Check::new("login supports expiresInMins", login_supports_expiry))
}

pub fn authenticated_group() -> Group {
    Group::new("authenticated", "@auth", Fixture::SharedAuth)
        .check(Check::new("/auth/me works with Bearer token", me_with_bearer).tag("@smoke"))
        .check(Check::new("/auth/refresh returns new tokens", refresh_returns_tokens).tag("@smoke"))
}

fn login_returns_tokens<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let options = cx.login_options();
        let login: LoginResponse = cx
            .api
            .post_json("/auth/login", &options.request())
            .await?
            .expect_ok()?
            .json()?;

        ensure(!login.username.is_empty(), "username is empty")?;
        let tokens = login.token_pair();
        ensure(!tokens.access_token.is_empty(), "accessToken is empty")?;
        ensure(!tokens.refresh_token.is_empty(), "refreshToken is empty")
    })
}

fn me_rejects_missing_or_bad_token<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let no_token = cx.api.get("/auth/me").await?;
        ensure_eq(no_token.status(), 401, "status without token")?;

        cx.api
            .get_with_headers("/auth/me", &[("Authorization", "Bearer not-a-token")])
            .await?
            .expect_status_in(&[401, 403])?;
        Ok(())
    })
}

fn login_supports_expiry<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let options = cx.login_options().with_expires_in_mins(30);
        let body: Value = cx
            .api
            .post_json("/auth/login", &options.request())
            .await?
            .expect_ok()?
            .json()?;
        expect_truthy(&body, "accessToken")
    })
}

fn me_with_bearer<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let me = current_user(cx.api).await?;
        ensure(!me.username.is_empty(), "username is empty")
    })
}

fn refresh_returns_tokens<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let tokens = cx.tokens()?;
        let fresh = refresh_tokens(cx.api, &tokens.refresh_token).await?;
        ensure(
            !fresh.access_token.is_empty() && !fresh.refresh_token.is_empty(),
            "refreshed tokens are empty",
        )
    })
}
