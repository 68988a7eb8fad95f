// src/suite/carts.rs - @carts checks, including server totals cross-checks

use futures::future::BoxFuture;
use serde_json::{json, Value};
use tracing::debug;

use super::{expect_deleted, Check, CheckContext, Fixture, Group};
use crate::error::Result;
use crate::expect::{ensure, ensure_eq, expect_array_field, expect_number};
use crate::models::carts::CartLine;
use crate::models::{Cart, CartsList, Paginated};
use crate::totals::{recompute_cart_totals, LineItem};

pub fn group() -> Group {
    Group::new("carts", "@carts", Fixture::PerTest)
        .check(Check::new("GET /carts schema", list_schema).tag("@smoke"))
        .check(Check::new("GET /carts/1", single_cart))
        .check(Check::new("GET /carts/user/5", carts_by_user))
        .check(Check::new("POST /carts/add computes totals", add_computes_totals).tag("@smoke"))
        .check(Check::new("PUT /carts/1 merge behavior", merge_update))
        .check(Check::new("DELETE /carts/1 marks deleted", delete_cart))
        .check(Check::new("recompute server totals integrity", totals_integrity))
}

/// Compare the server's product and quantity counts with a local recomputation.
fn cross_check_totals(cart: &Cart) -> Result<()> {
    let items: Vec<LineItem> = cart.products.iter().map(LineItem::from).collect();
    let recomputed = recompute_cart_totals(&items);
    debug!(
        cart_id = cart.id,
        server_total = cart.total,
        recomputed_total = recomputed.total,
        server_discounted = cart.discounted_total,
        recomputed_discounted = recomputed.discounted_total,
        "Recomputed cart totals"
    );

    ensure_eq(cart.total_products, recomputed.total_products, "totalProducts")?;
    ensure_eq(cart.total_quantity, recomputed.total_quantity, "totalQuantity")
}

fn list_schema<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let body: Value = cx.api.get("/carts").await?.expect_ok()?.json()?;
        let carts = expect_array_field(&body, "carts")?;
        if let Some(first) = carts.first() {
            expect_array_field(first, "products")?;
            for field in ["total", "discountedTotal", "userId", "totalProducts", "totalQuantity"] {
                expect_number(first, field)?;
            }
        }
        Ok(())
    })
}

fn single_cart<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let cart: Cart = cx.api.get("/carts/1").await?.expect_ok()?.json()?;
        ensure_eq(cart.id, 1, "id")
    })
}

fn carts_by_user<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let list: CartsList = cx.api.get("/carts/user/5").await?.expect_ok()?.json()?;
        for cart in list.items() {
            ensure_eq(cart.user_id, 5, "userId")?;
        }
        Ok(())
    })
}

fn add_computes_totals<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let lines = vec![CartLine { id: 1, quantity: 2 }];
        let body = json!({"userId": 1, "products": lines});
        let cart: Cart = cx.api.post_json("/carts/add", &body).await?.expect_ok()?.json()?;
        ensure(cart.id != 0, "new cart has no id")?;
        cross_check_totals(&cart)
    })
}

fn merge_update<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let lines = vec![CartLine { id: 1, quantity: 1 }];
        let body = json!({"merge": true, "products": lines});
        let cart: Cart = cx.api.put_json("/carts/1", &body).await?.expect_ok()?.json()?;
        ensure(cart.total_products > 0, "merged cart has no products")
    })
}

fn delete_cart<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        expect_deleted(cx.api.delete("/carts/1").await?)?;
        Ok(())
    })
}

fn totals_integrity<'a>(cx: &'a CheckContext<'a>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let lines = vec![CartLine { id: 1, quantity: 1 }, CartLine { id: 2, quantity: 3 }];
        let body = json!({"userId": 2, "products": lines});
        let cart: Cart = cx.api.post_json("/carts/add", &body).await?.expect_ok()?.json()?;
        cross_check_totals(&cart)
    })
}
