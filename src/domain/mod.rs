//! Domain layer
pub mod cart;
pub mod product;

pub use cart::{CartLine, CartState};
pub use product::{Product, ProductDraft, ProductStatus};
