//! Configuration for Products API

use cms_client::{ContentApiConfig, ContentReference, config::root_from_env};
use core_config::{AppInfo, FromEnv, app_info, env_parse_or, server::ServerConfig};
use domain_products::ValidationMode;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Where products are stored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum StoreBackend {
    /// Process-local catalog
    #[default]
    Memory,
    /// Content-repository adapter over a process-local content store
    CmsMemory,
    /// Content-repository adapter over a remote content API
    Cms,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub store: StoreBackend,
    pub validation: ValidationMode,
    pub seed_demo_data: bool,
    /// Page under which products live in either content-repository backend
    pub cms_root: ContentReference,
    /// Remote content API settings, loaded only for [`StoreBackend::Cms`]
    pub cms: Option<ContentApiConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let store: StoreBackend = env_parse_or("STORE_BACKEND", StoreBackend::default())?;
        let validation: ValidationMode =
            env_parse_or("PRODUCT_VALIDATION", ValidationMode::default())?;
        let seed_demo_data: bool = env_parse_or("SEED_DEMO_DATA", false)?;

        let cms = match store {
            StoreBackend::Cms => Some(ContentApiConfig::from_env()?),
            StoreBackend::Memory | StoreBackend::CmsMemory => None,
        };
        let cms_root = match &cms {
            Some(cms) => cms.root,
            None => root_from_env()?,
        };

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            store,
            validation,
            seed_demo_data,
            cms_root,
            cms,
        })
    }
}
