//! Boundary operations for the presentation layer.
//!
//! Each function here matches one operation the routing layer calls into,
//! returning either a JSON-style success envelope or a [`StorefrontError`]
//! for the caller to turn into a status code and message.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogStore;
use crate::domain::cart::CartState;
use crate::domain::product::{Product, ProductDraft};
use crate::{Result, StorefrontError};

/// Create/update payload as the admin panel submits it.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductRequest {
    #[serde(default)]
    pub name: String,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub status: Option<String>,
    /// Authenticated actor, when the surrounding layer has one.
    pub actor_id: Option<u64>,
}

impl ProductRequest {
    fn into_draft(self) -> (ProductDraft, Option<u64>) {
        let draft = ProductDraft {
            name: self.name,
            price: self.price,
            image: self.image,
            status: self.status,
        };
        (draft, self.actor_id)
    }
}

/// Envelope for cart mutations; `cart_count` is only reported by add.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartResponse {
    pub status: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_count: Option<u32>,
    pub cart: CartState,
}

/// Envelope for admin product mutations.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductResponse {
    pub status: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

impl ProductResponse {
    fn ok(message: &'static str, product: Option<Product>) -> Self {
        Self {
            status: "success",
            message,
            product,
        }
    }
}

pub fn list_active_products(catalog: &CatalogStore) -> Vec<Product> {
    catalog.list_active()
}

pub fn list_all_products(catalog: &CatalogStore) -> Vec<Product> {
    catalog.list_all_including_trashed()
}

/// Adds one unit of a product, snapshotting its current name and price.
/// Fails with [`StorefrontError::Unavailable`] when the product is missing,
/// inactive, or trashed; the cart is untouched on failure.
pub fn add_to_cart(
    catalog: &CatalogStore,
    cart: &mut CartState,
    product_id: u64,
) -> Result<CartResponse> {
    let product = catalog
        .find_active(product_id)
        .ok_or(StorefrontError::Unavailable)?;
    cart.add(&product);
    Ok(CartResponse {
        status: "success",
        message: "Product added to cart",
        cart_count: Some(cart.item_count()),
        cart: cart.clone(),
    })
}

pub fn update_cart_quantity(
    cart: &mut CartState,
    product_id: u64,
    quantity: i64,
) -> Result<CartResponse> {
    cart.set_quantity(product_id, quantity)?;
    Ok(CartResponse {
        status: "success",
        message: "Cart updated",
        cart_count: None,
        cart: cart.clone(),
    })
}

pub fn remove_from_cart(cart: &mut CartState, product_id: u64) -> Result<CartResponse> {
    cart.remove(product_id)?;
    Ok(CartResponse {
        status: "success",
        message: "Product removed",
        cart_count: None,
        cart: cart.clone(),
    })
}

pub fn create_product(catalog: &CatalogStore, request: ProductRequest) -> Result<ProductResponse> {
    let (draft, actor) = request.into_draft();
    let product = catalog.create(draft, actor)?;
    Ok(ProductResponse::ok("Product created", Some(product)))
}

pub fn update_product(
    catalog: &CatalogStore,
    id: u64,
    request: ProductRequest,
) -> Result<ProductResponse> {
    let (draft, actor) = request.into_draft();
    let product = catalog.update(id, draft, actor)?;
    Ok(ProductResponse::ok("Product updated", Some(product)))
}

pub fn delete_product(catalog: &CatalogStore, id: u64) -> Result<ProductResponse> {
    catalog.soft_delete(id)?;
    Ok(ProductResponse::ok("Product moved to trash", None))
}

pub fn restore_product(catalog: &CatalogStore, id: u64) -> Result<ProductResponse> {
    catalog.restore(id)?;
    Ok(ProductResponse::ok("Product restored", None))
}

pub fn force_delete_product(catalog: &CatalogStore, id: u64) -> Result<ProductResponse> {
    catalog.force_delete(id)?;
    Ok(ProductResponse::ok("Product permanently deleted", None))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, price: Decimal) -> ProductRequest {
        ProductRequest {
            name: name.into(),
            price: Some(price),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_unavailable_product_leaves_cart_untouched() {
        let catalog = CatalogStore::new();
        let mut cart = CartState::new();

        let err = add_to_cart(&catalog, &mut cart, 1).unwrap_err();
        assert_eq!(err, StorefrontError::Unavailable);
        assert_eq!(err.http_status(), 404);
        assert!(cart.is_empty());

        // Inactive products are just as unavailable as missing ones.
        let mut inactive = request("Hidden", Decimal::ONE);
        inactive.status = Some("inactive".into());
        let created = create_product(&catalog, inactive).unwrap().product.unwrap();
        assert_eq!(
            add_to_cart(&catalog, &mut cart, created.id),
            Err(StorefrontError::Unavailable)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_reports_running_item_count() {
        let catalog = CatalogStore::new();
        let mut cart = CartState::new();
        let p = create_product(&catalog, request("Widget", Decimal::new(500, 2)))
            .unwrap()
            .product
            .unwrap();

        assert_eq!(add_to_cart(&catalog, &mut cart, p.id).unwrap().cart_count, Some(1));
        assert_eq!(add_to_cart(&catalog, &mut cart, p.id).unwrap().cart_count, Some(2));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_cart_total_survives_catalog_price_change() {
        let catalog = CatalogStore::new();
        let mut cart = CartState::new();
        let p = create_product(&catalog, request("Widget", Decimal::new(1000, 2)))
            .unwrap()
            .product
            .unwrap();
        add_to_cart(&catalog, &mut cart, p.id).unwrap();

        update_product(&catalog, p.id, request("Widget", Decimal::new(9900, 2))).unwrap();
        assert_eq!(cart.total(), Decimal::new(1000, 2));
    }

    #[test]
    fn test_storefront_end_to_end() {
        let catalog = CatalogStore::new();
        let mut cart = CartState::new();

        let laptop = create_product(&catalog, request("Laptop", Decimal::new(5500000, 2)))
            .unwrap()
            .product
            .unwrap();
        assert_eq!(laptop.price.to_string(), "55000.00");

        let added = add_to_cart(&catalog, &mut cart, laptop.id).unwrap();
        assert_eq!(added.cart_count, Some(1));
        assert_eq!(cart.total(), Decimal::new(5500000, 2));

        update_cart_quantity(&mut cart, laptop.id, 3).unwrap();
        assert_eq!(cart.total(), Decimal::new(16500000, 2));

        remove_from_cart(&mut cart, laptop.id).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_cart_errors_map_to_not_found() {
        let mut cart = CartState::new();
        assert_eq!(
            update_cart_quantity(&mut cart, 5, 2),
            Err(StorefrontError::NotInCart)
        );
        assert_eq!(remove_from_cart(&mut cart, 5), Err(StorefrontError::NotInCart));
        assert_eq!(StorefrontError::NotInCart.http_status(), 404);
    }

    #[test]
    fn test_validation_error_carries_field_messages() {
        let catalog = CatalogStore::new();
        let err = create_product(&catalog, ProductRequest::default()).unwrap_err();
        assert_eq!(err.http_status(), 422);
        match err {
            StorefrontError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.field == "name"));
                assert!(errors.iter().any(|e| e.field == "price"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
