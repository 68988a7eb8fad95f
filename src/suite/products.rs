// src/suite/products.rs - @products checks

use futures::future::BoxFuture;
use serde_json::{json, Value};

use super::{expect_deleted, Check, CheckContext, Fixture, Group};
use crate::error::Result;
use crate::expect::{
    ensure, ensure_eq, expect_array_field, expect_keys_exactly, expect_number,
    expect_sorted_natural, expect_string, expect_truthy, CaseSensitivity,
};
use crate::models::{Category, Paginated, ProductsList};
use crate::query::{ListQuery, SortOrder};

pub fn group() -> Group {
    Group::new("products", "@products", Fixture::PerTest)
        .check(Check::new("GET /products default pagination", default_pagination).tag("@smoke"))
        .check(Check::new(
            "pagination + select fields; limit=0 returns all",
            pagination_select_and_unbounded,
        ))
        .check(Check::new("sorting by title asc", sort_title_asc))
        .check(Check::new("categories metadata and list", categories))
        .check(Check::new("products by category smartphones", by_category))
        .check(Check::new("product search q=phone", search))
        .check(Check::new("create product is simulated", create_product))
        .check(Check::new(
            "update product title is echoed back (not persisted)",
            update_product,
        ))
        .check(Check::new("delete product marks isDeleted=true", delete_product))
}

fn default_pagination<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let list: ProductsList = cx.api.get("/products").await?.expect_ok()?.json()?;
        ensure_eq(list.limit(), 30, "limit")?;
        ensure_eq(list.skip(), 0, "skip")?;
        ensure(list.total() > 0, "total is 0")
    })
}

fn pagination_select_and_unbounded<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let query = ListQuery::new().limit(10).skip(10).select(["title", "price"]);
        let page: Value = cx
            .api
            .get_with_query("/products", &query.to_pairs())
            .await?
            .expect_ok()?
            .json()?;

        ensure_eq(expect_number(&page, "limit")?, 10.0, "limit")?;
        ensure_eq(expect_number(&page, "skip")?, 10.0, "skip")?;
        let selected = expect_array_field(&page, "products")?;
        for product in selected {
            expect_keys_exactly(product, &["id", "price", "title"])?;
        }

        let all: ProductsList = cx
            .api
            .get_with_query("/products", &ListQuery::new().limit(0).to_pairs())
            .await?
            .expect_ok()?
            .json()?;
        ensure(
            all.items().len() >= selected.len(),
            format!(
                "limit=0 returned {} products, fewer than the {} on one page",
                all.items().len(),
                selected.len()
            ),
        )
    })
}

fn sort_title_asc<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let query = ListQuery::new().sort_by("title", SortOrder::Asc).limit(20);
        let list: ProductsList = cx
            .api
            .get_with_query("/products", &query.to_pairs())
            .await?
            .expect_ok()?
            .json()?;

        let titles: Vec<&str> = list.products.iter().map(|p| p.title.as_str()).collect();
        expect_sorted_natural(&titles, CaseSensitivity::Base)
    })
}

fn categories<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let detailed: Vec<Category> = cx
            .api
            .get("/products/categories")
            .await?
            .expect_ok()?
            .json()?;
        ensure(!detailed.is_empty(), "/products/categories is empty")?;

        let slugs: Vec<String> = cx
            .api
            .get("/products/category-list")
            .await?
            .expect_ok()?
            .json()?;
        ensure(!slugs.is_empty(), "/products/category-list is empty")
    })
}

fn by_category<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let list: ProductsList = cx
            .api
            .get("/products/category/smartphones")
            .await?
            .expect_ok()?
            .json()?;
        for product in list.items() {
            ensure_eq(product.category.as_str(), "smartphones", "category")?;
        }
        Ok(())
    })
}

fn search<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let list: ProductsList = cx
            .api
            .get_with_query("/products/search", &[("q", "phone")])
            .await?
            .expect_ok()?
            .json()?;
        ensure(list.total() > 0, "search for 'phone' found nothing")
    })
}

fn create_product<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let created: Value = cx
            .api
            .post_json(
                "/products/add",
                &json!({"title": "iPhone 15", "price": 99, "category": "stationery"}),
            )
            .await?
            .expect_ok()?
            .json()?;
        expect_truthy(&created, "id")?;
        ensure_eq(expect_string(&created, "title")?, "iPhone 15", "title")
    })
}

fn update_product<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let updated: Value = cx
            .api
            .put_json("/products/1", &json!({"title": "iPhone Galaxy +1"}))
            .await?
            .expect_ok()?
            .json()?;
        ensure_eq(expect_string(&updated, "title")?, "iPhone Galaxy +1", "title")
    })
}

fn delete_product<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        expect_deleted(cx.api.delete("/products/1").await?)?;
        Ok(())
    })
}
