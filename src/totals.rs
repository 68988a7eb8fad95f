// src/totals.rs - Cart totals recomputation used to cross-check server values

use serde::{Deserialize, Serialize};

use crate::models::carts::CartProduct;

/// One product entry within a cart.
///
/// Values are taken as-is from fixtures or response bodies. Negative or zero
/// prices and quantities are not rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub price: f64,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
}

impl LineItem {
    pub fn new(price: f64, quantity: i64) -> Self {
        Self {
            price,
            quantity,
            discount_percentage: None,
        }
    }

    pub fn with_discount(mut self, discount_percentage: f64) -> Self {
        self.discount_percentage = Some(discount_percentage);
        self
    }
}

impl From<&CartProduct> for LineItem {
    fn from(product: &CartProduct) -> Self {
        Self {
            price: product.price,
            quantity: product.quantity,
            discount_percentage: product.discount_percentage,
        }
    }
}

/// Aggregate cart metrics derived from a list of line items.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub total: f64,
    pub discounted_total: f64,
    pub total_products: usize,
    pub total_quantity: i64,
}

/// Recompute cart totals from line items.
///
/// `total_products` counts items, not quantities. Each line's discounted amount
/// is rounded to cents before it is added to `discounted_total`, so the result
/// can differ from rounding the discounted sum once.
///
/// # Example
/// ```rust
/// use dummyjson_suite::totals::{recompute_cart_totals, LineItem};
///
/// let totals = recompute_cart_totals(&[
///     LineItem::new(10.0, 2).with_discount(10.0),
///     LineItem::new(5.0, 3),
/// ]);
/// assert_eq!(totals.total, 35.0);
/// assert_eq!(totals.discounted_total, 33.0);
/// assert_eq!(totals.total_products, 2);
/// assert_eq!(totals.total_quantity, 5);
/// ```
pub fn recompute_cart_totals(items: &[LineItem]) -> CartTotals {
    let mut total = 0.0;
    let mut discounted_total = 0.0;
    let mut total_quantity = 0;

    for item in items {
        let line = item.price * item.quantity as f64;
        total += line;
        let discount = match item.discount_percentage {
            Some(pct) if pct != 0.0 => line * (pct / 100.0),
            _ => 0.0,
        };
        discounted_total += round_half_up_cents(line - discount);
        total_quantity += item.quantity;
    }

    CartTotals {
        total,
        discounted_total,
        total_products: items.len(),
        total_quantity,
    }
}

/// Round to two decimal places, halves going toward positive infinity.
pub fn round_half_up_cents(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}
