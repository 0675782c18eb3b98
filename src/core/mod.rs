pub mod blog;
pub mod cleaner;
pub mod deals;
pub mod enrichment;
pub mod hubdb;

pub use crate::domain::model::{DealRecord, EnrichedDeal};
pub use crate::domain::ports::{CmsClient, CrmClient};
pub use crate::utils::error::Result;
