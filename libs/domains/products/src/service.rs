use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::ProductResult;
use crate::models::{NewProduct, Product, RepositoryCapabilities, ValidationMode};
use crate::repository::{ProductRepository, ensure_matching_id};

/// Service layer for Product business logic
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    validation: ValidationMode,
}

impl<R: ProductRepository> ProductService<R> {
    /// Service with strict payload validation
    pub fn new(repository: R) -> Self {
        Self::with_validation(repository, ValidationMode::Strict)
    }

    pub fn with_validation(repository: R, validation: ValidationMode) -> Self {
        Self {
            repository: Arc::new(repository),
            validation,
        }
    }

    pub fn validation_mode(&self) -> ValidationMode {
        self.validation
    }

    pub fn capabilities(&self) -> RepositoryCapabilities {
        self.repository.capabilities()
    }

    fn check(&self, input: &NewProduct) -> ProductResult<()> {
        match self.validation {
            ValidationMode::Strict => Ok(input.validate()?),
            ValidationMode::Lenient => Ok(()),
        }
    }

    /// List all products
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i64) -> ProductResult<Product> {
        self.repository.get_by_id(id).await
    }

    /// Create a new product with validation
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: NewProduct) -> ProductResult<Product> {
        self.check(&input)?;
        self.repository.create(input).await
    }

    /// Create a product from its field values
    pub async fn create(
        &self,
        name: impl Into<String>,
        description: Option<String>,
        price: Decimal,
    ) -> ProductResult<Product> {
        self.create_product(NewProduct::new(name, description, price))
            .await
    }

    /// Replace a product's fields
    ///
    /// An id mismatch between path and payload wins over field validation.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: i64, input: NewProduct) -> ProductResult<Product> {
        ensure_matching_id(id, &input)?;
        self.check(&input)?;
        self.repository.update(id, input).await
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> ProductResult<()> {
        self.repository.delete(id).await
    }

    /// Probe the backing store
    pub async fn health_check(&self) -> ProductResult<()> {
        self.repository.health_check().await
    }
}
