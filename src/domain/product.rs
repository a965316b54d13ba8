//! Product model and input validation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::FieldError;

/// Maximum accepted length for a product name.
pub const NAME_MAX_LEN: usize = 255;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Visible and purchasable.
    #[default]
    Active,
    /// Exists but hidden from the public catalog.
    Inactive,
    /// Marked as removed (set alongside the soft-delete timestamp).
    Deleted,
}

impl ProductStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    /// Always carried at 2 fractional digits.
    pub price: Decimal,
    pub image: Option<String>,
    pub status: ProductStatus,
    pub created_by: u64,
    pub updated_by: Option<u64>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Soft-deleted ("in the trash").
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// The single visibility predicate: the status enum and the soft-delete
    /// timestamp are redundant signals, so the check lives only here.
    pub fn is_listed(&self) -> bool {
        self.status == ProductStatus::Active && !self.is_trashed()
    }
}

/// Raw create/update input, before any constraint has been checked.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub status: Option<String>,
}

/// A draft that passed every constraint, with typed fields.
#[derive(Clone, Debug)]
pub struct ValidProduct {
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub status: Option<ProductStatus>,
}

impl ProductDraft {
    /// Checks every field and reports all failures at once.
    ///
    /// Constraints: name required and at most [`NAME_MAX_LEN`] characters,
    /// price required and non-negative, status (when given) one of the three
    /// enum values. Prices are rescaled to 2 fractional digits.
    pub fn validate(self) -> Result<ValidProduct, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.push(FieldError::new("name", "The name field is required."));
        } else if name.chars().count() > NAME_MAX_LEN {
            errors.push(FieldError::new(
                "name",
                format!(
                    "The name field must not be greater than {} characters.",
                    NAME_MAX_LEN
                ),
            ));
        }

        let price = match self.price {
            None => {
                errors.push(FieldError::new("price", "The price field is required."));
                Decimal::ZERO
            }
            Some(p) if p < Decimal::ZERO => {
                errors.push(FieldError::new("price", "The price field must be at least 0."));
                Decimal::ZERO
            }
            Some(mut p) => {
                p.rescale(2);
                p
            }
        };

        let status = match self.status.as_deref() {
            None => None,
            Some(raw) => match ProductStatus::parse(raw) {
                Some(status) => Some(status),
                None => {
                    errors.push(FieldError::new("status", "The selected status is invalid."));
                    None
                }
            },
        };

        if errors.is_empty() {
            Ok(ValidProduct {
                name,
                price,
                image: self.image,
                status,
            })
        } else {
            Err(errors)
        }
    }
}
