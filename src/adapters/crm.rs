use crate::adapters::http::HubSpotHttp;
use crate::domain::model::{Association, CrmObject, Deal, ObjectId, Owner, ResultsPage};
use crate::domain::ports::{CrmClient, ObjectType};
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use serde::Serialize;

#[derive(Serialize)]
struct BatchReadInput<'a> {
    properties: &'a [&'a str],
    inputs: Vec<BatchId<'a>>,
}

#[derive(Serialize)]
struct BatchId<'a> {
    id: &'a str,
}

/// HubSpot CRM over the public REST API (objects v3, associations v4, owners v3).
#[derive(Debug, Clone)]
pub struct HubSpotCrmClient {
    http: HubSpotHttp,
    base_url: String,
}

impl HubSpotCrmClient {
    pub fn new(http: HubSpotHttp, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CrmClient for HubSpotCrmClient {
    async fn get_deals_page(&self, limit: usize) -> Result<Vec<Deal>> {
        let url = format!("{}/crm/v3/objects/deals", self.base_url);
        let page: ResultsPage<Deal> = self
            .http
            .get_json(&url, &[("limit", limit.to_string())])
            .await?;
        tracing::debug!("Fetched {} deals", page.results.len());
        Ok(page.results)
    }

    async fn get_associations(
        &self,
        from: ObjectType,
        id: &ObjectId,
        to: ObjectType,
    ) -> Result<Vec<Association>> {
        let url = format!(
            "{}/crm/v4/objects/{}/{}/associations/{}",
            self.base_url,
            from.as_str(),
            id,
            to.as_str()
        );
        let page: ResultsPage<Association> = self.http.get_json(&url, &[]).await?;
        Ok(page.results)
    }

    async fn get_owner(&self, owner_id: &str) -> Result<Owner> {
        let url = format!("{}/crm/v3/owners/{}", self.base_url, owner_id);
        self.http
            .get_json(
                &url,
                &[
                    ("idProperty", "id".to_string()),
                    ("archived", "false".to_string()),
                ],
            )
            .await
    }

    async fn batch_read(
        &self,
        object_type: ObjectType,
        ids: &[ObjectId],
        properties: &[&str],
    ) -> Result<Vec<CrmObject>> {
        if ids.is_empty() {
            return Err(PortalError::ProcessingError {
                message: format!("refusing empty batch read of {}", object_type.as_str()),
            });
        }

        let url = format!(
            "{}/crm/v3/objects/{}/batch/read",
            self.base_url,
            object_type.as_str()
        );
        let body = BatchReadInput {
            properties,
            inputs: ids.iter().map(|id| BatchId { id: id.as_str() }).collect(),
        };
        let page: ResultsPage<CrmObject> = self.http.post_json(&url, &body).await?;
        Ok(page.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::RetryPolicy;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn client(server: &MockServer) -> HubSpotCrmClient {
        let http = HubSpotHttp::new(
            "pat-crm".to_string(),
            Duration::from_secs(5),
            RetryPolicy::default().with_max_retries(0),
        )
        .unwrap();
        HubSpotCrmClient::new(http, &server.base_url())
    }

    #[tokio::test]
    async fn test_get_deals_page() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/crm/v3/objects/deals")
                .query_param("limit", "25");
            then.status(200).json_body(json!({
                "results": [
                    {"id": "1", "properties": {"dealname": "A"}},
                    {"id": "2", "properties": {"dealname": "B"}}
                ],
                "paging": {"next": {"after": "2"}}
            }));
        });

        let deals = client(&server).get_deals_page(25).await.unwrap();

        api_mock.assert();
        assert_eq!(deals.len(), 2);
        assert_eq!(deals[1].id.as_str(), "2");
    }

    #[tokio::test]
    async fn test_get_associations_reads_target_ids() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/crm/v4/objects/deals/1/associations/contacts");
            then.status(200).json_body(json!({
                "results": [
                    {"toObjectId": 101, "associationTypes": []},
                    {"toObjectId": 102, "associationTypes": []}
                ]
            }));
        });

        let associations = client(&server)
            .get_associations(ObjectType::Deals, &ObjectId::new("1"), ObjectType::Contacts)
            .await
            .unwrap();

        api_mock.assert();
        let ids: Vec<&str> = associations.iter().map(|a| a.to_object_id.as_str()).collect();
        assert_eq!(ids, vec!["101", "102"]);
    }

    #[tokio::test]
    async fn test_get_owner() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/crm/v3/owners/9")
                .query_param("idProperty", "id")
                .query_param("archived", "false");
            then.status(200)
                .json_body(json!({"id": "9", "email": "owner@example.com"}));
        });

        let owner = client(&server).get_owner("9").await.unwrap();

        api_mock.assert();
        assert_eq!(owner.email.as_deref(), Some("owner@example.com"));
    }

    #[tokio::test]
    async fn test_batch_read_posts_ids_and_properties() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/crm/v3/objects/companies/batch/read")
                .json_body(json!({
                    "properties": ["name", "domain"],
                    "inputs": [{"id": "5"}, {"id": "6"}]
                }));
            then.status(200).json_body(json!({
                "status": "COMPLETE",
                "results": [
                    {"id": "5", "properties": {"name": "Acme", "domain": "acme.test"}},
                    {"id": "6", "properties": {"name": "Globex", "domain": null}}
                ]
            }));
        });

        let companies = client(&server)
            .batch_read(
                ObjectType::Companies,
                &[ObjectId::new("5"), ObjectId::new("6")],
                &["name", "domain"],
            )
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[1].property("domain"), None);
    }

    #[tokio::test]
    async fn test_batch_read_rejects_empty_ids_without_calling_api() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({"results": []}));
        });

        let result = client(&server)
            .batch_read(ObjectType::Contacts, &[], &["email"])
            .await;

        assert!(result.is_err());
        api_mock.assert_hits(0);
    }
}
