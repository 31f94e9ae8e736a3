use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier, assigned by the store
    #[schema(example = 1)]
    pub id: i64,
    /// Product name
    #[schema(example = "Desk lamp")]
    pub name: String,
    /// Product description
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price, serialized as a decimal string
    #[schema(value_type = String, example = "24.99")]
    pub price: Decimal,
}

impl Product {
    /// Build a stored record from a payload and the identity the store chose
    pub fn new(id: i64, input: NewProduct) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
        }
    }

    /// Replace every mutable field (full-record update)
    pub fn apply(&mut self, input: NewProduct) {
        self.name = input.name;
        self.description = input.description;
        self.price = input.price;
    }
}

/// Payload for creating or replacing a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewProduct {
    /// Optional on create (the store assigns one) and on update (defaults to
    /// the path id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[validate(
        length(max = 200, message = "Name must be at most 200 characters"),
        custom(function = "validate_name")
    )]
    #[schema(example = "Desk lamp")]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    /// Accepts a JSON number or a decimal string
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "24.99")]
    pub price: Decimal,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, description: Option<String>, price: Decimal) -> Self {
        Self {
            id: None,
            name: name.into(),
            description,
            price,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

impl From<Product> for NewProduct {
    fn from(product: Product) -> Self {
        Self {
            id: Some(product.id),
            name: product.name,
            description: product.description,
            price: product.price,
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Name must not be empty".into());
        return Err(err);
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        let mut err = ValidationError::new("negative");
        err.message = Some("Price must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Operations a backend can perform beyond get/create/update/delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RepositoryCapabilities {
    /// Whether the backend can enumerate all products
    pub list: bool,
}

impl RepositoryCapabilities {
    pub const ALL: RepositoryCapabilities = RepositoryCapabilities { list: true };
}

/// How strictly payloads are checked before they reach the repository
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ValidationMode {
    /// Non-blank name, non-negative price, bounded lengths
    #[default]
    Strict,
    /// Persist payloads as given
    Lenient,
}
