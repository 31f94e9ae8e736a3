//! Content repository client.
//!
//! Products can live in an external content-management system whose storage
//! unit is a versioned, publishable page rather than a flat row. This crate
//! models that collaborator explicitly:
//!
//! - [`models`]: [`ContentReference`], [`SaveAction`], [`AccessLevel`],
//!   [`VersionStatus`] and the typed [`ProductPage`]
//! - [`repository`]: the [`ContentRepository`] trait (get, get-default, save
//!   with action, delete with permanence flag, optional child query)
//! - [`memory`]: a process-local versioned store (feature `memory`)
//! - [`http`]: a `reqwest` client for a remote content API (feature `http`)
//! - [`config`]: `CMS_*` environment configuration (feature `config`)
//!
//! # Features
//!
//! - `memory` (default) - [`InMemoryContentStore`]
//! - `http` (default) - [`HttpContentClient`]
//! - `config` - `core_config::FromEnv` for [`ContentApiConfig`]
//!
//! # Example
//!
//! ```ignore
//! use cms_client::{AccessLevel, ContentReference, ContentRepository, InMemoryContentStore, SaveAction};
//!
//! let store = InMemoryContentStore::new();
//! let mut page = store.get_default(ContentReference::new(1));
//! page.page_name = "Desk lamp".into();
//! let link = store.save(page, SaveAction::Publish, AccessLevel::NoAccess).await?;
//! let stored = store.get(link).await?;
//! ```

pub mod config;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "memory")]
pub mod memory;
pub mod models;
pub mod repository;

pub use config::ContentApiConfig;
pub use error::{ContentError, ContentResult};
#[cfg(feature = "http")]
pub use http::HttpContentClient;
#[cfg(feature = "memory")]
pub use memory::InMemoryContentStore;
pub use models::{AccessLevel, ContentReference, ProductPage, SaveAction, VersionStatus};
pub use repository::ContentRepository;
