// src/models/mod.rs - Typed mirrors of the remote API's JSON shapes

pub mod auth;
pub mod carts;
pub mod products;
pub mod users;

use serde::{Deserialize, Serialize};

pub use auth::{AuthUser, LoginResponse, TestData, TokenPair};
pub use carts::{Cart, CartProduct, CartsList};
pub use products::{Category, Product, ProductsList};
pub use users::{User, UsersList};

/// Uniform list envelope: `{<resource>: T[], total, skip, limit}`.
pub trait Paginated {
    type Item;

    fn items(&self) -> &[Self::Item];
    fn total(&self) -> u64;
    fn skip(&self) -> u64;
    fn limit(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

/// Body returned by simulated deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResource {
    pub id: i64,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub deleted_on: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
