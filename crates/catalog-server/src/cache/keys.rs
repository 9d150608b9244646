//! Cache key conventions.
//!
//! Every list-shaped key starts with `products:` so a single
//! [`PRODUCTS_PATTERN`] removal clears them after any product write.

use std::borrow::Cow;

use catalog_storage::ProductFilter;

/// Matches every cached product listing.
pub const PRODUCTS_PATTERN: &str = "products:*";

/// `product:{id}`
pub fn product_key(id: i64) -> String {
    format!("product:{id}")
}

/// `products:all:{category}:{search}:{page}:{page_size}`, absent filters empty.
///
/// `%` and `:` inside the filter text are percent-encoded so distinct filters
/// never share a key.
pub fn products_list_key(filter: &ProductFilter) -> String {
    format!(
        "products:all:{}:{}:{}:{}",
        escape_segment(filter.category.as_deref().unwrap_or_default()),
        escape_segment(filter.search.as_deref().unwrap_or_default()),
        filter.page,
        filter.page_size
    )
}

fn escape_segment(value: &str) -> Cow<'_, str> {
    if !value.contains([':', '%']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        match c {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// `products:owner:{user_id}`
pub fn owner_products_key(user_id: i64) -> String {
    format!("products:owner:{user_id}")
}
