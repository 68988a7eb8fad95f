// src/suite/users.rs - @users checks

use futures::future::BoxFuture;
use serde_json::{json, Value};

use super::{Check, CheckContext, Fixture, Group};
use crate::error::Result;
use crate::expect::{
    ensure, ensure_eq, expect_array_field, expect_keys_contain, expect_number, expect_object_field,
    expect_sorted_natural, expect_string, expect_truthy, CaseSensitivity,
};
use crate::models::{Paginated, UsersList};
use crate::query::{ListQuery, SortOrder};

pub fn group() -> Group {
    Group::new("users", "@users", Fixture::PerTest)
        .check(Check::new("GET /users default pagination", default_pagination).tag("@smoke"))
        .check(Check::new("pagination & select", pagination_and_select))
        .check(Check::new("sort firstName asc", sort_first_name_asc))
        .check(Check::new("search John & filter hair.color=Brown", search_and_filter))
        .check(Check::new("GET /users/1 has rich schema", single_user_schema))
        .check(Check::new("/auth/login then /auth/me", login_then_me))
        .check(Check::new("create user is simulated", create_user).tag("@smoke"))
}

fn default_pagination<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let list: UsersList = cx.api.get("/users").await?.expect_ok()?.json()?;
        ensure_eq(list.limit(), 30, "limit")?;
        ensure_eq(list.skip(), 0, "skip")?;
        ensure(list.total() > 0, "total is 0")
    })
}

fn pagination_and_select<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let query = ListQuery::new().limit(5).skip(10).select(["firstName", "age"]);
        let body: Value = cx
            .api
            .get_with_query("/users", &query.to_pairs())
            .await?
            .expect_ok()?
            .json()?;

        ensure_eq(expect_number(&body, "limit")?, 5.0, "limit")?;
        ensure_eq(expect_number(&body, "skip")?, 10.0, "skip")?;
        for user in expect_array_field(&body, "users")? {
            expect_keys_contain(user, &["id", "firstName", "age"])?;
        }
        Ok(())
    })
}

fn sort_first_name_asc<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let query = ListQuery::new().sort_by("firstName", SortOrder::Asc).limit(20);
        let list: UsersList = cx
            .api
            .get_with_query("/users", &query.to_pairs())
            .await?
            .expect_ok()?
            .json()?;

        let names: Vec<&str> = list.users.iter().map(|u| u.first_name.as_str()).collect();
        expect_sorted_natural(&names, CaseSensitivity::Tertiary)
    })
}

fn search_and_filter<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        cx.api
            .get_with_query("/users/search", &[("q", "John")])
            .await?
            .expect_ok()?;
        cx.api
            .get_with_query("/users/filter", &[("key", "hair.color"), ("value", "Brown")])
            .await?
            .expect_ok()?;
        Ok(())
    })
}

fn single_user_schema<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let user: Value = cx.api.get("/users/1").await?.expect_ok()?.json()?;
        ensure_eq(expect_number(&user, "id")?, 1.0, "id")?;
        expect_object_field(&user, "address")?;
        expect_object_field(&user, "company")?;
        Ok(())
    })
}

fn login_then_me<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let options = cx.login_options();
        let login: Value = cx
            .api
            .post_json("/auth/login", &options.request())
            .await?
            .expect_ok()?
            .json()?;
        let bearer = format!("Bearer {}", expect_string(&login, "accessToken")?);

        cx.api
            .get_with_headers("/auth/me", &[("Authorization", bearer.as_str())])
            .await?
            .expect_ok()?;
        Ok(())
    })
}

fn create_user<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let created: Value = cx
            .api
            .post_json("/users/add", &json!({"firstName": "A", "lastName": "Tester"}))
            .await?
            .expect_ok()?
            .json()?;
        expect_truthy(&created, "id")
    })
}
