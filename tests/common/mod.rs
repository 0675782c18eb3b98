#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use httpmock::MockServer;
use hubspot_portal::adapters::{CmsEndpoints, HubSpotCmsClient, HubSpotCrmClient, HubSpotHttp, RetryPolicy};
use hubspot_portal::{build_app, AppState};
use tower::ServiceExt;

pub const SECRET: &str = "portal-secret";

fn http(token: &str) -> HubSpotHttp {
    HubSpotHttp::new(
        token.to_string(),
        Duration::from_secs(5),
        RetryPolicy::default().with_max_retries(0),
    )
    .unwrap()
}

/// Router wired to HubSpot clients that talk to the mock server.
pub fn app(server: &MockServer) -> Router {
    let crm = HubSpotCrmClient::new(http("pat-crm"), &server.base_url());
    let cms = HubSpotCmsClient::new(
        http("pat-cms"),
        CmsEndpoints {
            posts_url: server.url("/cms/v3/blogs/posts"),
            tags_url: server.url("/cms/v3/blogs/tags"),
            hubdb_url: server.url("/cms/v3/hubdb/tables"),
        },
    );
    build_app(AppState::new(Arc::new(crm), Arc::new(cms), SECRET))
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}
