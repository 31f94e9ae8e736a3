//! Products API - REST server over a configurable product store

use axum_helpers::serve;
use cms_client::{HttpContentClient, InMemoryContentStore};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::{
    CmsProductRepository, InMemoryProductRepository, NewProduct, ProductRepository,
    ProductService, demo_products,
};
use tracing::info;

mod api;
mod config;
mod openapi;

use config::{Config, StoreBackend};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        store = %config.store,
        validation = %config.validation,
        "Starting Products API"
    );

    match config.store {
        StoreBackend::Memory => {
            let repository = InMemoryProductRepository::new();
            if config.seed_demo_data {
                repository.seed(demo_products()).await;
                info!("Seeded demo products");
            }
            run(&config, repository).await
        }
        StoreBackend::CmsMemory => {
            let store = InMemoryContentStore::with_containers([config.cms_root]);
            let repository = CmsProductRepository::new(store, config.cms_root);
            if config.seed_demo_data {
                for product in demo_products() {
                    repository
                        .create(NewProduct::new(product.name, product.description, product.price))
                        .await?;
                }
                info!("Seeded demo products");
            }
            run(&config, repository).await
        }
        StoreBackend::Cms => {
            let cms = config
                .cms
                .as_ref()
                .ok_or_else(|| eyre::eyre!("CMS_BASE_URL is required for STORE_BACKEND=cms"))?;
            info!(base_url = %cms.base_url, root = %cms.root, "Using remote content repository");

            let client = HttpContentClient::new(cms)?;
            run(&config, CmsProductRepository::new(client, cms.root)).await
        }
    }
}

async fn run<R: ProductRepository + Clone + 'static>(
    config: &Config,
    repository: R,
) -> eyre::Result<()> {
    let service = ProductService::with_validation(repository, config.validation);
    let capabilities = service.capabilities();
    if !capabilities.list {
        info!("Configured store cannot list products; GET /api/products will answer 501");
    }

    let app = api::app(config, service)?;

    serve(app, &config.server, async {
        info!("Shutting down: releasing product store");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
