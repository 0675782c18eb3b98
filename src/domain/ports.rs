use crate::domain::model::{Association, BlogPost, CrmObject, Deal, ObjectId, Owner, Tag};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// CRM object families the portal reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Deals,
    Contacts,
    Companies,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Deals => "deals",
            ObjectType::Contacts => "contacts",
            ObjectType::Companies => "companies",
        }
    }
}

/// Read-only view of the HubSpot CRM.
#[async_trait]
pub trait CrmClient: Send + Sync {
    async fn get_deals_page(&self, limit: usize) -> Result<Vec<Deal>>;

    async fn get_associations(
        &self,
        from: ObjectType,
        id: &ObjectId,
        to: ObjectType,
    ) -> Result<Vec<Association>>;

    async fn get_owner(&self, owner_id: &str) -> Result<Owner>;

    /// Callers must not pass an empty `ids` slice.
    async fn batch_read(
        &self,
        object_type: ObjectType,
        ids: &[ObjectId],
        properties: &[&str],
    ) -> Result<Vec<CrmObject>>;
}

/// Read-only view of the HubSpot CMS (blog and HubDB).
#[async_trait]
pub trait CmsClient: Send + Sync {
    /// Newest first.
    async fn list_posts(&self, limit: usize) -> Result<Vec<BlogPost>>;

    async fn get_post(&self, post_id: u64) -> Result<BlogPost>;

    async fn list_tags(&self) -> Result<Vec<Tag>>;

    async fn get_hubdb_rows(&self, table_id: &str) -> Result<Value>;
}
