//! Storefront Core
//!
//! Session-cart storefront with a soft-delete product lifecycle.
//!
//! ## Features
//! - Product catalog with active/inactive/deleted lifecycle
//! - Soft delete, restore, and permanent delete for administrators
//! - Session-scoped shopping cart with price snapshots
//! - JSON-style boundary contracts for the presentation layer

use serde::Serialize;
use thiserror::Error;

pub mod catalog;
pub mod domain;
pub mod service;

pub use catalog::{CatalogConfig, CatalogStore};
pub use domain::cart::{CartLine, CartState};
pub use domain::product::{Product, ProductDraft, ProductStatus};

// =============================================================================
// Error Types
// =============================================================================

/// A single invalid field, reported back to the caller by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum StorefrontError {
    #[error("The given data was invalid.")]
    Validation(Vec<FieldError>),

    #[error("Product not found")]
    ProductNotFound,

    #[error("Product is not trashed")]
    NotTrashed,

    #[error("Product unavailable.")]
    Unavailable,

    #[error("Product not in cart")]
    NotInCart,
}

impl StorefrontError {
    /// HTTP-equivalent status signal for the boundary layer.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 422,
            Self::NotTrashed => 409,
            Self::ProductNotFound | Self::Unavailable | Self::NotInCart => 404,
        }
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
