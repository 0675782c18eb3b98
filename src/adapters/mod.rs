// Adapters layer: concrete HubSpot implementations of the domain ports.

pub mod cms;
pub mod crm;
pub mod http;

pub use cms::{CmsEndpoints, HubSpotCmsClient};
pub use crm::HubSpotCrmClient;
pub use http::{HubSpotHttp, RetryPolicy};
