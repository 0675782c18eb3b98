pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_range, validate_required_field, validate_secret, validate_socket_addr, validate_url,
    Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_CRM_URL: &str = "https://api.hubapi.com";
pub const DEFAULT_POSTS_URL: &str = "https://api.hubapi.com/cms/v3/blogs/posts";
pub const DEFAULT_TAGS_URL: &str = "https://api.hubapi.com/cms/v3/blogs/tags";
pub const DEFAULT_HUBDB_URL: &str = "https://api.hubapi.com/cms/v3/hubdb/tables";

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_crm_url() -> String {
    DEFAULT_CRM_URL.to_string()
}
fn default_posts_url() -> String {
    DEFAULT_POSTS_URL.to_string()
}
fn default_tags_url() -> String {
    DEFAULT_TAGS_URL.to_string()
}
fn default_hubdb_url() -> String {
    DEFAULT_HUBDB_URL.to_string()
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout() -> u64 {
    30
}

/// Process configuration. Read from flags/environment, or from a TOML file
/// of the same shape when `--config` is given.
#[derive(Clone, Serialize, Deserialize, Parser)]
#[command(name = "hubspot-portal")]
#[command(about = "Web portal over the HubSpot CRM and CMS APIs")]
pub struct ServerConfig {
    #[arg(long, env = "BIND_ADDRESS", default_value = DEFAULT_BIND)]
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Private app token for the CRM APIs
    #[arg(long, env = "HUBSPOT_ACCESS_TOKEN", hide_env_values = true)]
    #[serde(default)]
    pub access_token: Option<String>,

    /// Token for the CMS APIs; defaults to the access token
    #[arg(long, env = "HUBSPOT_API_TOKEN", hide_env_values = true)]
    #[serde(default)]
    pub cms_token: Option<String>,

    /// Value the Authorization header must equal on protected routes
    #[arg(long, env = "API_SHARED_SECRET", hide_env_values = true)]
    #[serde(default)]
    pub shared_secret: Option<String>,

    #[arg(long, env = "HUBSPOT_CRM_URL", default_value = DEFAULT_CRM_URL)]
    #[serde(default = "default_crm_url")]
    pub crm_base_url: String,

    #[arg(long, env = "HUBSPOT_POSTS_URL", default_value = DEFAULT_POSTS_URL)]
    #[serde(default = "default_posts_url")]
    pub posts_url: String,

    #[arg(long, env = "HUBSPOT_TAGS_URL", default_value = DEFAULT_TAGS_URL)]
    #[serde(default = "default_tags_url")]
    pub tags_url: String,

    #[arg(long, env = "HUBSPOT_HUBDB_URL", default_value = DEFAULT_HUBDB_URL)]
    #[serde(default = "default_hubdb_url")]
    pub hubdb_url: String,

    /// Retries on HTTP 429 before giving up
    #[arg(long, env = "HUBSPOT_MAX_RETRIES", default_value = "5")]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-request timeout towards HubSpot, in seconds
    #[arg(long, env = "HUBSPOT_TIMEOUT_SECONDS", default_value = "30")]
    #[serde(default = "default_timeout")]
    pub request_timeout: u64,

    /// Load settings from a TOML file instead of flags
    #[arg(long, env = "PORTAL_CONFIG")]
    #[serde(skip)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    #[serde(default)]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    #[serde(default)]
    pub json_logs: bool,
}

impl ServerConfig {
    /// Replaces the flag values with the TOML file named by `--config`, if
    /// any. Logging switches given on the command line are kept.
    pub fn resolve(self) -> Result<Self> {
        let Some(path) = self.config.clone() else {
            return Ok(self);
        };

        let mut loaded = Self::from_file(&path)?;
        loaded.config = Some(path);
        loaded.verbose |= self.verbose;
        loaded.json_logs |= self.json_logs;
        Ok(loaded)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn cms_token(&self) -> Option<&str> {
        self.cms_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.access_token())
    }

    pub fn shared_secret(&self) -> Option<&str> {
        self.shared_secret.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("ServerConfig")
            .field("bind", &self.bind)
            .field("access_token", &redact(&self.access_token))
            .field("cms_token", &redact(&self.cms_token))
            .field("shared_secret", &redact(&self.shared_secret))
            .field("crm_base_url", &self.crm_base_url)
            .field("posts_url", &self.posts_url)
            .field("tags_url", &self.tags_url)
            .field("hubdb_url", &self.hubdb_url)
            .field("max_retries", &self.max_retries)
            .field("request_timeout", &self.request_timeout)
            .field("config", &self.config)
            .finish()
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("bind", &self.bind)?;

        let access_token = validate_required_field("access_token", &self.access_token)?;
        validate_secret("access_token", access_token)?;
        let shared_secret = validate_required_field("shared_secret", &self.shared_secret)?;
        validate_secret("shared_secret", shared_secret)?;
        if let Some(cms_token) = self.cms_token.as_deref().filter(|t| !t.trim().is_empty()) {
            validate_secret("cms_token", cms_token)?;
        }

        validate_url("crm_base_url", &self.crm_base_url)?;
        validate_url("posts_url", &self.posts_url)?;
        validate_url("tags_url", &self.tags_url)?;
        validate_url("hubdb_url", &self.hubdb_url)?;

        validate_range("max_retries", self.max_retries, 0, 10)?;
        validate_range("request_timeout", self.request_timeout, 1, 300)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
