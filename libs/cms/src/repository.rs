use async_trait::async_trait;

use crate::error::{ContentError, ContentResult};
use crate::models::{AccessLevel, ContentReference, ProductPage, SaveAction};

/// Content-management collaborator used by the CMS-backed product store.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Construct a fresh, unsaved page under `parent`. Nothing is persisted.
    fn get_default(&self, parent: ContentReference) -> ProductPage {
        ProductPage::new_default(parent)
    }

    /// Fetch content by reference.
    ///
    /// Without a version pin this returns the published version if one
    /// exists, otherwise the latest version.
    async fn get(&self, reference: ContentReference) -> ContentResult<ProductPage>;

    /// Persist a page and return its reference.
    ///
    /// A page with an empty `content_link` is created; otherwise a new version
    /// of the existing item is stored.
    async fn save(
        &self,
        page: ProductPage,
        action: SaveAction,
        access: AccessLevel,
    ) -> ContentResult<ContentReference>;

    /// Remove content. `force_delete` removes it permanently; otherwise it is
    /// moved to the wastebasket and no longer addressable through `get`.
    async fn delete(&self, reference: ContentReference, force_delete: bool) -> ContentResult<()>;

    /// Whether [`children`](Self::children) is implemented
    fn supports_children(&self) -> bool {
        false
    }

    /// Children of `parent`, each at the version `get` would return
    async fn children(&self, _parent: ContentReference) -> ContentResult<Vec<ProductPage>> {
        Err(ContentError::Unsupported("children"))
    }

    /// Reachability probe
    async fn ping(&self) -> ContentResult<()> {
        Ok(())
    }
}
