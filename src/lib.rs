pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use config::ServerConfig;
pub use core::deals::fetch_deals_with_associations;
pub use domain::model::{BlogPost, Deal, DealRecord, EnrichedDeal};
pub use server::{build_app, AppState};
pub use utils::error::{PortalError, Result};
