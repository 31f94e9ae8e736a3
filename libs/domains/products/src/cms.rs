//! Product repository backed by an external content-management system.
//!
//! Each product is a [`ProductPage`] under a configured root page. The
//! content lifecycle (versions, publish actions, access levels) stays inside
//! this adapter; callers only ever see [`Product`] and [`ProductError`].

use async_trait::async_trait;
use cms_client::{
    AccessLevel, ContentError, ContentReference, ContentRepository, ProductPage, SaveAction,
};
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product, RepositoryCapabilities};
use crate::repository::{ProductRepository, ensure_matching_id};

/// Product store on top of a [`ContentRepository`].
///
/// Writes are saved with [`SaveAction::Publish`] and [`AccessLevel::NoAccess`]
/// and deletes are permanent. Updates are last-writer-wins.
pub struct CmsProductRepository<C: ContentRepository> {
    client: Arc<C>,
    root: ContentReference,
}

impl<C: ContentRepository> Clone for CmsProductRepository<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            root: self.root,
        }
    }
}

impl<C: ContentRepository> CmsProductRepository<C> {
    /// `root` is the page new products are created under
    pub fn new(client: C, root: ContentReference) -> Self {
        Self::from_shared(Arc::new(client), root)
    }

    pub fn from_shared(client: Arc<C>, root: ContentReference) -> Self {
        Self {
            client,
            root: root.to_unversioned(),
        }
    }

    /// Fetch the page for a product id, treating content outside the root as absent
    async fn page(&self, id: i64) -> ProductResult<ProductPage> {
        if id <= 0 {
            return Err(ProductError::NotFound(id));
        }
        let page = self
            .client
            .get(ContentReference::new(id))
            .await
            .map_err(|e| map_content_error(e, id))?;

        if page.parent_link.id != self.root.id {
            return Err(ProductError::NotFound(id));
        }
        Ok(page)
    }

    async fn publish(&self, page: ProductPage, id: i64) -> ProductResult<ContentReference> {
        self.client
            .save(page, SaveAction::Publish, AccessLevel::NoAccess)
            .await
            .map_err(|e| map_content_error(e, id))
    }
}

fn to_product(page: ProductPage) -> Product {
    Product {
        id: page.content_link.id,
        name: page.product_name,
        description: page.description,
        price: page.price,
    }
}

fn fill_page(page: &mut ProductPage, input: NewProduct) {
    page.page_name = input.name.clone();
    page.product_name = input.name;
    page.description = input.description;
    page.price = input.price;
}

/// Normalize content errors so no backend type crosses this boundary
fn map_content_error(err: ContentError, id: i64) -> ProductError {
    match err {
        ContentError::NotFound(_) | ContentError::InvalidReference(_) => {
            ProductError::NotFound(id)
        }
        ContentError::Unsupported(op) => ProductError::Unsupported(op),
        ContentError::AccessDenied(reference) => {
            ProductError::Backend(format!("Content repository denied access to {}", reference))
        }
        ContentError::Transport(msg) | ContentError::Backend(msg) => ProductError::Backend(msg),
    }
}

#[async_trait]
impl<C: ContentRepository + 'static> ProductRepository for CmsProductRepository<C> {
    fn capabilities(&self) -> RepositoryCapabilities {
        RepositoryCapabilities {
            list: self.client.supports_children(),
        }
    }

    #[instrument(skip(self), fields(root = %self.root))]
    async fn list(&self) -> ProductResult<Vec<Product>> {
        let pages = self
            .client
            .children(self.root)
            .await
            .map_err(|e| match e {
                ContentError::Unsupported(_) => ProductError::Unsupported("list"),
                ContentError::NotFound(root) => {
                    ProductError::Backend(format!("Root content {} does not exist", root))
                }
                other => map_content_error(other, self.root.id),
            })?;

        let mut products: Vec<Product> = pages.into_iter().map(to_product).collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> ProductResult<Product> {
        self.page(id).await.map(to_product)
    }

    #[instrument(skip(self, input))]
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        if let Some(id) = input.id {
            return Err(ProductError::InvalidArgument(format!(
                "Product ids are assigned by the content repository, got {}",
                id
            )));
        }

        let mut page = self.client.get_default(self.root);
        fill_page(&mut page, input.clone());

        let reference = self.publish(page, 0).await.map_err(|e| match e {
            ProductError::NotFound(_) => {
                ProductError::Backend(format!("Root content {} does not exist", self.root))
            }
            other => other,
        })?;

        tracing::info!(content_id = %reference, "Published product content");
        Ok(Product::new(reference.id, input))
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: i64, input: NewProduct) -> ProductResult<Product> {
        ensure_matching_id(id, &input)?;

        let mut page = self.page(id).await?;
        fill_page(&mut page, input.clone());
        let reference = self.publish(page, id).await?;

        tracing::info!(content_id = %reference, "Published product update");
        Ok(Product::new(id, input))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> ProductResult<()> {
        let page = self.page(id).await?;
        self.client
            .delete(page.content_link.to_unversioned(), true)
            .await
            .map_err(|e| map_content_error(e, id))?;

        tracing::info!(product_id = id, "Deleted product content");
        Ok(())
    }

    async fn health_check(&self) -> ProductResult<()> {
        self.client
            .ping()
            .await
            .map_err(|e| ProductError::Backend(e.to_string()))
    }
}
