//! Product queries (cache-aside) and commands (store first, then invalidate).

use std::collections::HashMap;
use std::sync::Arc;

use catalog_auth::Principal;
use catalog_core::{Failure, Outcome, Product, ProductView, User, now_utc};
use catalog_storage::{ProductFilter, ProductStorage, UserStorage};

use crate::cache::{
    CacheStore, PRODUCTS_PATTERN, owner_products_key, product_key, products_list_key,
};
use crate::config::CacheConfig;
use crate::validation::{CreateProductRequest, UpdateProductRequest};

const PRODUCT_NOT_FOUND: &str = "Product not found";

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductStorage>,
    users: Arc<dyn UserStorage>,
    cache: CacheStore,
    ttl: CacheConfig,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductStorage>,
        users: Arc<dyn UserStorage>,
        cache: CacheStore,
        ttl: CacheConfig,
    ) -> Self {
        Self {
            products,
            users,
            cache,
            ttl,
        }
    }

    pub async fn get(&self, id: i64) -> Outcome<ProductView> {
        let key = product_key(id);
        if let Some(view) = self.cache.get::<ProductView>(&key).await {
            return Ok(view);
        }

        let product = self.find_live(id).await?;
        let owner = self.users.find_by_id(product.user_id).await?;
        let view = ProductView::new(&product, owner.as_ref());

        self.cache.set(&key, &view, Some(self.ttl.product_ttl)).await;
        Ok(view)
    }

    /// Listed products matching `filter`, one page.
    pub async fn list(&self, filter: &ProductFilter) -> Outcome<Vec<ProductView>> {
        let key = products_list_key(filter);
        if let Some(views) = self.cache.get::<Vec<ProductView>>(&key).await {
            return Ok(views);
        }

        let products = self.products.list(filter).await?;
        let views = self.views(&products).await?;

        self.cache.set(&key, &views, Some(self.ttl.list_ttl)).await;
        Ok(views)
    }

    /// The caller's non-deleted products, active or not, newest first.
    pub async fn list_mine(&self, principal: &Principal) -> Outcome<Vec<ProductView>> {
        let key = owner_products_key(principal.user_id);
        if let Some(views) = self.cache.get::<Vec<ProductView>>(&key).await {
            return Ok(views);
        }

        let products = self.products.list_by_owner(principal.user_id).await?;
        let views = self.views(&products).await?;

        self.cache.set(&key, &views, Some(self.ttl.list_ttl)).await;
        Ok(views)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        req: CreateProductRequest,
    ) -> Outcome<ProductView> {
        req.validate()?;

        let Some(owner) = self.users.find_by_id(principal.user_id).await? else {
            return Err(Failure::unauthorized("User not found"));
        };

        let product = Product::new(
            req.name.trim(),
            req.description.trim(),
            req.price,
            req.stock,
            req.category.trim(),
            owner.id,
        );
        let product = self.products.add(product).await?;
        tracing::info!(product_id = product.id, user_id = owner.id, "product created");

        self.cache.remove_by_pattern(PRODUCTS_PATTERN).await;
        Ok(ProductView::new(&product, Some(&owner)))
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        req: UpdateProductRequest,
    ) -> Outcome<ProductView> {
        req.validate()?;

        let mut product = self.find_live(id).await?;
        if !product.is_owned_by(principal.user_id) {
            return Err(Failure::forbidden("You can only update your own products"));
        }

        product.name = req.name.trim().to_string();
        product.description = req.description.trim().to_string();
        product.price = req.price;
        product.stock = req.stock;
        product.category = req.category.trim().to_string();
        product.is_active = req.is_active;
        product.updated_at = now_utc();

        let product = self.products.update(product).await?;
        tracing::info!(product_id = id, user_id = principal.user_id, "product updated");

        self.invalidate(id).await;
        let owner = self.users.find_by_id(product.user_id).await?;
        Ok(ProductView::new(&product, owner.as_ref()))
    }

    /// Soft delete: the row stays in the store with `is_deleted` set.
    pub async fn delete(&self, principal: &Principal, id: i64) -> Outcome<()> {
        let mut product = self.find_live(id).await?;
        if !product.is_owned_by(principal.user_id) {
            return Err(Failure::forbidden("You can only delete your own products"));
        }

        product.is_deleted = true;
        product.updated_at = now_utc();
        self.products.update(product).await?;
        tracing::info!(product_id = id, user_id = principal.user_id, "product deleted");

        self.invalidate(id).await;
        Ok(())
    }

    async fn find_live(&self, id: i64) -> Outcome<Product> {
        match self.products.find_by_id(id).await? {
            Some(product) if !product.is_deleted => Ok(product),
            _ => Err(Failure::not_found(PRODUCT_NOT_FOUND)),
        }
    }

    async fn views(&self, products: &[Product]) -> Outcome<Vec<ProductView>> {
        let mut owners: HashMap<i64, Option<User>> = HashMap::new();
        let mut views = Vec::with_capacity(products.len());
        for product in products {
            if !owners.contains_key(&product.user_id) {
                let owner = self.users.find_by_id(product.user_id).await?;
                owners.insert(product.user_id, owner);
            }
            let owner = owners.get(&product.user_id).and_then(Option::as_ref);
            views.push(ProductView::new(product, owner));
        }
        Ok(views)
    }

    async fn invalidate(&self, id: i64) {
        self.cache.remove_by_pattern(PRODUCTS_PATTERN).await;
        self.cache.remove(&product_key(id)).await;
    }
}
