//! Readiness endpoint

use axum::{Router, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use domain_products::{ProductRepository, ProductService};

async fn ready<R: ProductRepository>(service: ProductService<R>) -> impl IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "product_store",
        Box::pin(async { service.health_check().await.map_err(|e| e.to_string()) }),
    )];

    match run_health_checks(checks).await {
        Ok(ok) => ok,
        Err(unavailable) => unavailable,
    }
}

/// `/ready` probes the configured product store
pub fn router<R: ProductRepository + Clone + 'static>(service: ProductService<R>) -> Router {
    Router::new().route("/ready", get(move || ready(service.clone())))
}
