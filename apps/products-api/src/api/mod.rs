//! API routes module

pub mod health;

use axum::Router;
use axum_helpers::{create_router, health_router};
use domain_products::{ProductRepository, ProductService, handlers};
use std::io;

use crate::config::Config;
use crate::openapi::ApiDoc;

/// Routes nested under `/api`
pub fn routes<R: ProductRepository + Clone + 'static>(service: ProductService<R>) -> Router {
    Router::new().nest("/products", handlers::router(service))
}

/// Full application: documented API, middleware, liveness and readiness
pub fn app<R: ProductRepository + Clone + 'static>(
    config: &Config,
    service: ProductService<R>,
) -> io::Result<Router> {
    let router = create_router::<ApiDoc>(routes(service.clone()), &config.environment)?;
    Ok(router
        .merge(health_router(config.app))
        .merge(health::router(service)))
}
