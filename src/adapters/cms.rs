use crate::adapters::http::HubSpotHttp;
use crate::domain::model::{BlogPost, ResultsPage, Tag};
use crate::domain::ports::CmsClient;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Endpoints of the CMS v3 APIs. Kept separate because HubSpot serves blog
/// posts, tags and HubDB from unrelated roots.
#[derive(Debug, Clone)]
pub struct CmsEndpoints {
    pub posts_url: String,
    pub tags_url: String,
    pub hubdb_url: String,
}

#[derive(Debug, Clone)]
pub struct HubSpotCmsClient {
    http: HubSpotHttp,
    endpoints: CmsEndpoints,
}

impl HubSpotCmsClient {
    pub fn new(http: HubSpotHttp, endpoints: CmsEndpoints) -> Self {
        Self { http, endpoints }
    }

    fn url(base: &str, suffix: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), suffix)
    }
}

#[async_trait]
impl CmsClient for HubSpotCmsClient {
    async fn list_posts(&self, limit: usize) -> Result<Vec<BlogPost>> {
        let page: ResultsPage<BlogPost> = self
            .http
            .get_json(
                &self.endpoints.posts_url,
                &[
                    ("limit", limit.to_string()),
                    ("orderBy", "-created".to_string()),
                ],
            )
            .await?;
        tracing::debug!("Fetched {} blog posts", page.results.len());
        Ok(page.results)
    }

    async fn get_post(&self, post_id: u64) -> Result<BlogPost> {
        let url = Self::url(&self.endpoints.posts_url, &post_id.to_string());
        self.http.get_json(&url, &[]).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let page: ResultsPage<Tag> = self.http.get_json(&self.endpoints.tags_url, &[]).await?;
        Ok(page.results)
    }

    async fn get_hubdb_rows(&self, table_id: &str) -> Result<Value> {
        let url = Self::url(&self.endpoints.hubdb_url, &format!("{}/rows", table_id));
        self.http.get_json(&url, &[]).await
    }
}
