// src/suite/cross.rs - @cross checks spanning query edge cases, errors and latency

use futures::future::BoxFuture;
use reqwest::Method;
use serde_json::Value;
use tracing::info;

use super::{Check, CheckContext, Fixture, Group};
use crate::error::Result;
use crate::expect::{ensure, ensure_eq, expect_array_field, expect_keys_exactly};
use crate::latency::p95;
use crate::models::ProductsList;
use crate::query::ListQuery;

pub fn group() -> Group {
    Group::new("cross", "@cross", Fixture::PerTest)
        .check(Check::new(
            "select: mix valid/invalid fields keeps valid ones and stays 200",
            select_drops_unknown_fields,
        ))
        .check(Check::new("limits/skip edge handling", limit_skip_edges))
        .check(Check::new("invalid product id returns error", invalid_product_id))
        .check(Check::new("malformed JSON yields error", malformed_json))
        .check(Check::new("p95-ish latency under target for login & list", login_latency))
        .check(Check::new("categories slugs yield results", category_slugs))
}

fn select_drops_unknown_fields<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let query = ListQuery::new()
            .limit(5)
            .select(["id", "title", "price", "___notAField"]);
        let response = cx.api.get_with_query("/products", &query.to_pairs()).await?;
        ensure_eq(response.status(), 200, "status")?;

        let body: Value = response.json()?;
        for product in expect_array_field(&body, "products")? {
            expect_keys_exactly(product, &["id", "price", "title"])?;
        }
        Ok(())
    })
}

fn limit_skip_edges<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        cx.api
            .get_with_query("/products", &ListQuery::new().limit(0).to_pairs())
            .await?
            .expect_ok()?;
        cx.api
            .get_with_query("/products", &ListQuery::new().limit(10_000).to_pairs())
            .await?
            .expect_ok()?;
        cx.api
            .get_with_query("/products", &ListQuery::new().limit(10).skip(-5).to_pairs())
            .await?
            .expect_status_in(&[200, 400])?;
        Ok(())
    })
}

fn invalid_product_id<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        cx.api
            .get("/products/999999")
            .await?
            .expect_status_in(&[404, 400])?;
        Ok(())
    })
}

fn malformed_json<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let broken = r#"{ "title": "Bad JSON" "#.to_string();
        cx.api
            .fetch(Method::POST, "/products/add", Some(broken))
            .await?
            .expect_status_in(&[400, 422, 500])?;
        Ok(())
    })
}

fn login_latency<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let options = cx.login_options();
        let mut samples = Vec::with_capacity(cx.config.latency_samples);
        for _ in 0..cx.config.latency_samples {
            let response = cx.api.post_json("/auth/login", &options.request()).await?;
            samples.push(response.elapsed());
        }

        let budget = cx.config.latency_budget();
        let observed = p95(&samples).unwrap_or_default();
        info!(
            p95_ms = observed.as_millis() as u64,
            budget_ms = budget.as_millis() as u64,
            "Login latency"
        );
        ensure(
            observed < budget,
            format!("p95 {}ms is not under {}ms", observed.as_millis(), budget.as_millis()),
        )
    })
}

fn category_slugs<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let slugs: Vec<String> = cx
            .api
            .get("/products/category-list")
            .await?
            .expect_ok()?
            .json()?;

        for slug in slugs.iter().take(3) {
            let list: ProductsList = cx
                .api
                .get_segments(&["products", "category", slug.as_str()])
                .await?
                .expect_ok()?
                .json()?;
            ensure(
                list.products.iter().all(|p| p.category.is_empty() || p.category == *slug),
                format!("category '{}' returned products from other categories", slug),
            )?;
        }
        Ok(())
    })
}
