//! Process-local content repository with version history and a wastebasket.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{ContentError, ContentResult};
use crate::models::{AccessLevel, ContentReference, ProductPage, SaveAction, VersionStatus};
use crate::repository::ContentRepository;

/// Container the default store is created with
pub const DEFAULT_ROOT: ContentReference = ContentReference { id: 1, work_id: None };

#[derive(Debug)]
struct StoredItem {
    parent: ContentReference,
    versions: Vec<ProductPage>,
    in_wastebasket: bool,
}

impl StoredItem {
    /// Published version if any, otherwise the latest one
    fn current(&self) -> Option<&ProductPage> {
        self.versions
            .iter()
            .rev()
            .find(|v| v.status == VersionStatus::Published)
            .or_else(|| self.versions.last())
    }
}

#[derive(Debug)]
struct StoreState {
    containers: BTreeSet<i64>,
    items: BTreeMap<i64, StoredItem>,
    /// `None` once the id space is used up
    next_id: Option<i64>,
    next_work_id: i64,
}

impl StoreState {
    fn is_parent(&self, parent: ContentReference) -> bool {
        self.containers.contains(&parent.id)
            || self
                .items
                .get(&parent.id)
                .is_some_and(|item| !item.in_wastebasket)
    }

    fn live_item(&self, reference: ContentReference) -> ContentResult<&StoredItem> {
        self.items
            .get(&reference.id)
            .filter(|item| !item.in_wastebasket)
            .ok_or(ContentError::NotFound(reference))
    }

    fn descendants_of(&self, id: i64) -> Vec<i64> {
        let mut found = Vec::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            for (child_id, item) in &self.items {
                if item.parent.id == current {
                    found.push(*child_id);
                    pending.push(*child_id);
                }
            }
        }
        found
    }
}

/// In-memory [`ContentRepository`].
///
/// Every save appends a version with a store-wide work id. Publishing demotes
/// the previously published version. A non-forced delete moves the item to the
/// wastebasket, where it keeps its history but is no longer readable.
#[derive(Clone)]
pub struct InMemoryContentStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryContentStore {
    /// Store with the single container [`DEFAULT_ROOT`]
    pub fn new() -> Self {
        Self::with_containers([DEFAULT_ROOT])
    }

    /// Store with the given pre-existing container pages
    pub fn with_containers(containers: impl IntoIterator<Item = ContentReference>) -> Self {
        let containers: BTreeSet<i64> = containers.into_iter().map(|c| c.id).collect();
        let next_id = containers.last().map_or(Some(1), |max| max.checked_add(1));
        Self {
            state: Arc::new(RwLock::new(StoreState {
                containers,
                items: BTreeMap::new(),
                next_id,
                next_work_id: 1,
            })),
        }
    }

    /// Full version history of an item, oldest first (wastebasket included)
    pub async fn versions(&self, reference: ContentReference) -> Vec<ProductPage> {
        let state = self.state.read().await;
        state
            .items
            .get(&reference.id)
            .map(|item| item.versions.clone())
            .unwrap_or_default()
    }

    pub async fn is_in_wastebasket(&self, reference: ContentReference) -> bool {
        let state = self.state.read().await;
        state
            .items
            .get(&reference.id)
            .is_some_and(|item| item.in_wastebasket)
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_access(
    access: AccessLevel,
    action: SaveAction,
    reference: ContentReference,
) -> ContentResult<()> {
    let required = match action {
        SaveAction::Publish => AccessLevel::Publish,
        SaveAction::Save | SaveAction::CheckIn => AccessLevel::Edit,
    };
    if access == AccessLevel::NoAccess || access >= required {
        Ok(())
    } else {
        Err(ContentError::AccessDenied(reference))
    }
}

fn status_for(action: SaveAction) -> VersionStatus {
    match action {
        SaveAction::Save => VersionStatus::Draft,
        SaveAction::CheckIn => VersionStatus::CheckedIn,
        SaveAction::Publish => VersionStatus::Published,
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentStore {
    async fn get(&self, reference: ContentReference) -> ContentResult<ProductPage> {
        if reference.is_empty() {
            return Err(ContentError::InvalidReference(reference.to_string()));
        }

        let state = self.state.read().await;
        let item = state.live_item(reference)?;
        let page = match reference.work_id {
            Some(work_id) => item
                .versions
                .iter()
                .find(|v| v.content_link.work_id == Some(work_id)),
            None => item.current(),
        };
        page.cloned().ok_or(ContentError::NotFound(reference))
    }

    async fn save(
        &self,
        mut page: ProductPage,
        action: SaveAction,
        access: AccessLevel,
    ) -> ContentResult<ContentReference> {
        check_access(access, action, page.content_link)?;

        let mut state = self.state.write().await;
        let work_id = state.next_work_id;
        page.status = status_for(action);
        page.saved_at = Some(Utc::now());

        let id = if page.is_new() {
            if !state.is_parent(page.parent_link) {
                return Err(ContentError::NotFound(page.parent_link));
            }
            let id = state.next_id.ok_or_else(|| {
                ContentError::Backend("No content ids left to assign".to_string())
            })?;
            state.next_id = id.checked_add(1);
            page.content_link = ContentReference::with_version(id, work_id);
            state.items.insert(
                id,
                StoredItem {
                    parent: page.parent_link,
                    versions: vec![page],
                    in_wastebasket: false,
                },
            );
            id
        } else {
            let id = page.content_link.id;
            let item = state
                .items
                .get_mut(&id)
                .filter(|item| !item.in_wastebasket)
                .ok_or(ContentError::NotFound(page.content_link))?;
            if action == SaveAction::Publish {
                for version in &mut item.versions {
                    if version.status == VersionStatus::Published {
                        version.status = VersionStatus::PreviouslyPublished;
                    }
                }
            }
            page.parent_link = item.parent;
            page.content_link = ContentReference::with_version(id, work_id);
            item.versions.push(page);
            id
        };

        state.next_work_id += 1;
        let saved = ContentReference::with_version(id, work_id);
        debug!(content = %saved, %action, "Saved content version");
        Ok(saved)
    }

    async fn delete(&self, reference: ContentReference, force_delete: bool) -> ContentResult<()> {
        if reference.is_empty() {
            return Err(ContentError::InvalidReference(reference.to_string()));
        }

        let mut state = self.state.write().await;
        state.live_item(reference)?;

        let mut affected = state.descendants_of(reference.id);
        affected.push(reference.id);
        for id in affected {
            if force_delete {
                state.items.remove(&id);
            } else if let Some(item) = state.items.get_mut(&id) {
                item.in_wastebasket = true;
            }
        }

        debug!(content = %reference, force_delete, "Deleted content");
        Ok(())
    }

    fn supports_children(&self) -> bool {
        true
    }

    async fn children(&self, parent: ContentReference) -> ContentResult<Vec<ProductPage>> {
        let state = self.state.read().await;
        if !state.is_parent(parent) {
            return Err(ContentError::NotFound(parent));
        }

        Ok(state
            .items
            .values()
            .filter(|item| item.parent.id == parent.id && !item.in_wastebasket)
            .filter_map(|item| item.current().cloned())
            .collect())
    }
}
