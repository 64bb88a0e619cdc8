use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog entry. Reference data, seeded out of band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
}

/// The mutable fields of a cart row: `count` units of `item_id` for `user_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemRelation {
    pub item_id: i64,
    pub user_id: i64,
    pub count: i32,
}

/// A cart row joined with its item, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartItemView {
    pub id: i64,
    pub count: i32,
    pub item: Item,
}
