use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::user::User;

/// A product record as owned by the durable store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: String,
    pub is_active: bool,
    pub is_deleted: bool,
    /// Owning user id.
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Product {
    /// Builds an unsaved, active product (id 0) owned by `user_id`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        stock: i32,
        category: impl Into<String>,
        user_id: i64,
    ) -> Self {
        let now = crate::time::now_utc();
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            price,
            stock,
            category: category.into(),
            is_active: true,
            is_deleted: false,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Visible in public listings.
    pub fn is_listed(&self) -> bool {
        self.is_active && !self.is_deleted
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Product representation returned by the API and stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Owner's display name; empty when the owner record is unavailable.
    pub user_name: String,
}

impl ProductView {
    pub fn new(product: &Product, owner: Option<&User>) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            category: product.category.clone(),
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
            user_name: owner.map(User::full_name).unwrap_or_default(),
        }
    }
}
