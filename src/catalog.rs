//! In-memory product catalog with a soft-delete lifecycle.
//!
//! The store is process-wide shared state; every operation targets exactly
//! one product and relies on the inner lock for single-record atomicity.
//! `update` and `soft_delete` see only non-trashed records (so both report
//! "not found" for a trashed id), while `restore` and `force_delete` search
//! the trash as well.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::domain::product::{Product, ProductDraft, ProductStatus};
use crate::{Result, StorefrontError};

#[derive(Clone, Copy, Debug)]
pub struct CatalogConfig {
    /// Actor id stamped on writes when no authenticated actor is supplied.
    pub fallback_actor_id: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            fallback_actor_id: 1,
        }
    }
}

pub struct CatalogStore {
    config: CatalogConfig,
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    products: BTreeMap<u64, Product>,
    next_id: u64,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(Inner::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Public catalog view: active and not soft-deleted.
    pub fn list_active(&self) -> Vec<Product> {
        self.read()
            .products
            .values()
            .filter(|p| p.is_listed())
            .cloned()
            .collect()
    }

    /// Administrative view: every record, trashed ones included.
    pub fn list_all_including_trashed(&self) -> Vec<Product> {
        self.read().products.values().cloned().collect()
    }

    /// Looks a product up through the public view only.
    pub fn find_active(&self, id: u64) -> Option<Product> {
        self.read()
            .products
            .get(&id)
            .filter(|p| p.is_listed())
            .cloned()
    }

    pub fn create(&self, draft: ProductDraft, actor: Option<u64>) -> Result<Product> {
        let valid = draft.validate().map_err(StorefrontError::Validation)?;

        let mut inner = self.write();
        inner.next_id += 1;
        let now = Utc::now();
        let product = Product {
            id: inner.next_id,
            name: valid.name,
            price: valid.price,
            image: valid.image,
            status: valid.status.unwrap_or_default(),
            created_by: actor.unwrap_or(self.config.fallback_actor_id),
            updated_by: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn update(&self, id: u64, draft: ProductDraft, actor: Option<u64>) -> Result<Product> {
        let valid = draft.validate().map_err(StorefrontError::Validation)?;

        let mut inner = self.write();
        let product = inner
            .products
            .get_mut(&id)
            .filter(|p| !p.is_trashed())
            .ok_or(StorefrontError::ProductNotFound)?;

        product.name = valid.name;
        product.price = valid.price;
        if valid.image.is_some() {
            product.image = valid.image;
        }
        if let Some(status) = valid.status {
            product.status = status;
        }
        product.updated_by = Some(actor.unwrap_or(self.config.fallback_actor_id));
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    /// Moves a product to the trash: stamps `deleted_at` and flips the status
    /// enum in the same write, as the model requires both signals.
    pub fn soft_delete(&self, id: u64) -> Result<()> {
        let mut inner = self.write();
        let product = inner
            .products
            .get_mut(&id)
            .filter(|p| !p.is_trashed())
            .ok_or(StorefrontError::ProductNotFound)?;

        let now = Utc::now();
        product.status = ProductStatus::Deleted;
        product.deleted_at = Some(now);
        product.updated_at = now;
        Ok(())
    }

    /// Clears the soft-delete timestamp. The status enum is deliberately left
    /// untouched, matching the observed lifecycle: a restored product keeps
    /// status "deleted" until an explicit update.
    pub fn restore(&self, id: u64) -> Result<()> {
        let mut inner = self.write();
        let product = inner
            .products
            .get_mut(&id)
            .ok_or(StorefrontError::ProductNotFound)?;
        if !product.is_trashed() {
            return Err(StorefrontError::NotTrashed);
        }
        product.deleted_at = None;
        product.updated_at = Utc::now();
        Ok(())
    }

    /// Permanently removes the record, trashed or not.
    pub fn force_delete(&self, id: u64) -> Result<()> {
        self.write()
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or(StorefrontError::ProductNotFound)
    }
}
