//! Products Domain
//!
//! Product catalog with a repository boundary that tolerates very different
//! backing stores.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation (strict / lenient)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────────────────────────────┐
//! │ Repository  │  in-memory  │  CMS    │  ← Data access (trait + backends)
//! └──────┬──────────────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, payloads
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, InMemoryProductRepository, ProductService};
//!
//! let repository = InMemoryProductRepository::new();
//! let service = ProductService::new(repository);
//! let router = handlers::router(service);
//! ```
//!
//! With a content-management backend:
//!
//! ```rust,no_run
//! use cms_client::{ContentReference, InMemoryContentStore};
//! use domain_products::{CmsProductRepository, ProductService};
//!
//! let repository = CmsProductRepository::new(InMemoryContentStore::new(), ContentReference::new(1));
//! let service = ProductService::new(repository);
//! ```

pub mod cms;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use cms::CmsProductRepository;
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{NewProduct, Product, RepositoryCapabilities, ValidationMode};
pub use repository::{InMemoryProductRepository, ProductRepository, demo_products};
pub use service::ProductService;
