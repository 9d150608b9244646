//! Query types shared by storage backends.

use catalog_core::Product;
use serde::{Deserialize, Serialize};

/// First page number.
pub const DEFAULT_PAGE: u32 = 1;

/// Products per page when the caller does not say.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on the page size a caller can request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Category / free-text filter and paging for product listings.
///
/// Text filters are case-insensitive "contains" matches. Empty strings are
/// treated the same as absent filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductFilter {
    /// Builds a filter, dropping blank text filters and clamping paging into
    /// `page >= 1` and `1 <= page_size <= MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(
        category: Option<String>,
        search: Option<String>,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Self {
        Self {
            category: non_blank(category),
            search: non_blank(search),
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of matching rows skipped before this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize)
    }

    /// Whether `product` is listed and passes the text filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if !product.is_listed() {
            return false;
        }

        if let Some(category) = &self.category {
            if !contains_ignore_case(&product.category, category) {
                return false;
            }
        }

        if let Some(term) = &self.search {
            if !contains_ignore_case(&product.name, term)
                && !contains_ignore_case(&product.description, term)
            {
                return false;
            }
        }

        true
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(name: &str, description: &str, category: &str) -> Product {
        Product::new(name, description, Decimal::new(1999, 2), 5, category, 1)
    }

    #[test]
    fn test_default_filter_matches_listed_products() {
        let filter = ProductFilter::default();
        assert!(filter.matches(&product("Mouse", "Wireless", "Peripherals")));

        let mut hidden = product("Mouse", "Wireless", "Peripherals");
        hidden.is_active = false;
        assert!(!filter.matches(&hidden));

        let mut deleted = product("Mouse", "Wireless", "Peripherals");
        deleted.is_deleted = true;
        assert!(!filter.matches(&deleted));
    }

    #[test]
    fn test_category_filter_is_case_insensitive_contains() {
        let filter = ProductFilter::new(Some("PERIPH".into()), None, None, None);
        assert!(filter.matches(&product("Mouse", "", "Peripherals")));
        assert!(!filter.matches(&product("Desk", "", "Furniture")));
    }

    #[test]
    fn test_search_matches_name_or_description() {
        let filter = ProductFilter::new(None, Some("wire".into()), None, None);
        assert!(filter.matches(&product("Mouse", "Wireless", "Peripherals")));
        assert!(filter.matches(&product("Wire rack", "", "Storage")));
        assert!(!filter.matches(&product("Desk", "Oak", "Furniture")));
    }

    #[test]
    fn test_blank_filters_are_dropped() {
        let filter = ProductFilter::new(Some("  ".into()), Some(String::new()), None, None);
        assert_eq!(filter, ProductFilter::default());
    }

    #[test]
    fn test_paging_is_clamped() {
        let filter = ProductFilter::new(None, None, Some(0), Some(1_000));
        assert_eq!(filter.page, 1);
        assert_eq!(filter.page_size, MAX_PAGE_SIZE);
        assert_eq!(filter.offset(), 0);

        let filter = ProductFilter::new(None, None, Some(3), Some(0));
        assert_eq!(filter.page_size, 1);
        assert_eq!(filter.offset(), 2);
    }

    #[test]
    fn test_offset() {
        let filter = ProductFilter::new(None, None, Some(3), Some(10));
        assert_eq!(filter.offset(), 20);
    }
}
