//! Application setup and router configuration.

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::adapters::{CmsEndpoints, HubSpotCmsClient, HubSpotCrmClient, HubSpotHttp, RetryPolicy};
use crate::config::ServerConfig;
use crate::domain::ports::{CmsClient, CrmClient};
use crate::server::middleware::require_api_key;
use crate::server::routes::{blog, deals, hubdb, pages};
use crate::utils::error::{PortalError, Result};

/// Shared, immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub crm: Arc<dyn CrmClient>,
    pub cms: Arc<dyn CmsClient>,
    pub shared_secret: Arc<str>,
}

impl AppState {
    pub fn new(crm: Arc<dyn CrmClient>, cms: Arc<dyn CmsClient>, shared_secret: &str) -> Self {
        Self {
            crm,
            cms,
            shared_secret: Arc::from(shared_secret),
        }
    }

    /// Builds the HubSpot clients from a validated configuration.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let missing = |field: &str| PortalError::MissingConfigError {
            field: field.to_string(),
        };
        let access_token = config.access_token().ok_or_else(|| missing("access_token"))?;
        let cms_token = config.cms_token().ok_or_else(|| missing("cms_token"))?;
        let shared_secret = config.shared_secret().ok_or_else(|| missing("shared_secret"))?;

        let retry = RetryPolicy::default().with_max_retries(config.max_retries);

        let crm_http = HubSpotHttp::new(access_token.to_string(), config.timeout(), retry.clone())?;
        let crm = HubSpotCrmClient::new(crm_http, &config.crm_base_url);

        let cms_http = HubSpotHttp::new(cms_token.to_string(), config.timeout(), retry)?;
        let cms = HubSpotCmsClient::new(
            cms_http,
            CmsEndpoints {
                posts_url: config.posts_url.clone(),
                tags_url: config.tags_url.clone(),
                hubdb_url: config.hubdb_url.clone(),
            },
        );

        Ok(Self::new(Arc::new(crm), Arc::new(cms), shared_secret))
    }
}

/// Build the Axum application router.
pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/get-deals-with-associations", get(deals::get_deals))
        .route("/hubdb/tables", get(hubdb::get_tables))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/", get(pages::index))
        .route("/index", get(pages::index))
        .route("/blog", get(blog::blog))
        .route(
            "/post/:post_id",
            get(blog::single_post).post(blog::single_post),
        )
        .route("/request-services", get(pages::request_services))
        .route("/shop", get(pages::products))
        .route("/products", get(pages::products))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
