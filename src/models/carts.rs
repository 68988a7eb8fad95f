use serde::{Deserialize, Serialize};

use super::Paginated;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: i64,
    pub products: Vec<CartProduct>,
    pub total: f64,
    pub discounted_total: f64,
    pub user_id: i64,
    pub total_products: usize,
    pub total_quantity: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartsList {
    pub carts: Vec<Cart>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

impl Paginated for CartsList {
    type Item = Cart;

    fn items(&self) -> &[Cart] {
        &self.carts
    }

    fn total(&self) -> u64 {
        self.total
    }

    fn skip(&self) -> u64 {
        self.skip
    }

    fn limit(&self) -> u64 {
        self.limit
    }
}

/// Product reference sent to `/carts/add` and `PUT /carts/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: i64,
    pub quantity: i64,
}
