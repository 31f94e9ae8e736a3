use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product, RepositoryCapabilities};

/// Repository trait for Product persistence
///
/// Implementations can use different storage backends (process memory, an
/// external content repository, ...). Backends that cannot enumerate
/// products report it through [`capabilities`](Self::capabilities) and fail
/// [`list`](Self::list) with [`ProductError::Unsupported`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Operations this backend supports beyond single-record access
    fn capabilities(&self) -> RepositoryCapabilities;

    /// All products currently stored
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Get a product by ID
    async fn get_by_id(&self, id: i64) -> ProductResult<Product>;

    /// Store a new product and return it with its assigned ID
    async fn create(&self, input: NewProduct) -> ProductResult<Product>;

    /// Replace every mutable field of an existing product
    async fn update(&self, id: i64, input: NewProduct) -> ProductResult<Product>;

    /// Delete a product by ID
    async fn delete(&self, id: i64) -> ProductResult<()>;

    /// Verify the backend is reachable
    async fn health_check(&self) -> ProductResult<()> {
        Ok(())
    }
}

/// Update payloads may omit the id; when present it must match the path.
pub(crate) fn ensure_matching_id(id: i64, input: &NewProduct) -> ProductResult<()> {
    match input.id {
        Some(payload_id) if payload_id != id => Err(ProductError::Conflict(format!(
            "Payload id {} does not match path id {}",
            payload_id, id
        ))),
        _ => Ok(()),
    }
}

/// Two products used for local demos
pub fn demo_products() -> Vec<Product> {
    vec![
        Product {
            id: 1,
            name: "Product 1".to_string(),
            description: Some("Description 1".to_string()),
            price: Decimal::new(1000, 2),
        },
        Product {
            id: 2,
            name: "Product 2".to_string(),
            description: Some("Description 2".to_string()),
            price: Decimal::new(2000, 2),
        },
    ]
}

#[derive(Debug)]
struct Catalog {
    products: BTreeMap<i64, Product>,
    /// `None` once `i64::MAX` has been stored
    next_id: Option<i64>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            products: BTreeMap::new(),
            next_id: Some(1),
        }
    }
}

impl Catalog {
    fn insert(&mut self, product: Product) {
        self.next_id = match (self.next_id, product.id.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
        self.products.insert(product.id, product);
    }
}

/// In-memory implementation of ProductRepository (default store and tests)
///
/// Products and the id counter share one lock, so concurrent creates never
/// hand out the same id.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert products as-is, replacing any with the same id
    pub async fn seed(&self, products: impl IntoIterator<Item = Product>) {
        let mut catalog = self.catalog.write().await;
        for product in products {
            catalog.insert(product);
        }
    }

    pub async fn len(&self) -> usize {
        self.catalog.read().await.products.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.catalog.read().await.products.is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    fn capabilities(&self) -> RepositoryCapabilities {
        RepositoryCapabilities::ALL
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let catalog = self.catalog.read().await;
        Ok(catalog.products.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Product> {
        let catalog = self.catalog.read().await;
        catalog
            .products
            .get(&id)
            .cloned()
            .ok_or(ProductError::NotFound(id))
    }

    async fn create(&self, mut input: NewProduct) -> ProductResult<Product> {
        let mut catalog = self.catalog.write().await;

        let id = match input.id.take() {
            Some(id) if id <= 0 => {
                return Err(ProductError::InvalidArgument(format!(
                    "Product id must be positive, got {}",
                    id
                )));
            }
            Some(id) if catalog.products.contains_key(&id) => {
                return Err(ProductError::Conflict(format!(
                    "Product {} already exists",
                    id
                )));
            }
            Some(id) if id.checked_add(1).is_none() => {
                return Err(ProductError::InvalidArgument(format!(
                    "Product id {} is out of range",
                    id
                )));
            }
            Some(id) => id,
            None => catalog.next_id.ok_or_else(|| {
                ProductError::Conflict("No product ids left to assign".to_string())
            })?,
        };

        let product = Product::new(id, input);
        catalog.insert(product.clone());

        tracing::info!(product_id = id, "Created product");
        Ok(product)
    }

    async fn update(&self, id: i64, input: NewProduct) -> ProductResult<Product> {
        ensure_matching_id(id, &input)?;

        let mut catalog = self.catalog.write().await;
        let product = catalog
            .products
            .get_mut(&id)
            .ok_or(ProductError::NotFound(id))?;
        product.apply(input);
        let updated = product.clone();

        tracing::info!(product_id = id, "Updated product");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> ProductResult<()> {
        let mut catalog = self.catalog.write().await;
        catalog
            .products
            .remove(&id)
            .ok_or(ProductError::NotFound(id))?;

        tracing::info!(product_id = id, "Deleted product");
        Ok(())
    }
}
