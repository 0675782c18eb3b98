use crate::core::cleaner::clean_post_data;
use crate::domain::model::{BlogPost, ObjectId, Tag};
use crate::domain::ports::CmsClient;
use crate::utils::error::{PortalError, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Posts fetched per listing request; filtering and paging happen locally.
pub const BLOG_FETCH_LIMIT: usize = 100;
pub const POSTS_PER_PAGE: usize = 15;
pub const LATEST_POSTS: usize = 4;

pub const UNKNOWN_TAG: &str = "Unknown Tag";
pub const DATE_UNAVAILABLE: &str = "Date not available";

/// Query string of the blog listing. `page` stays textual so that a
/// malformed value falls back to the first page instead of rejecting the
/// request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub search: String,
}

impl BlogQuery {
    pub fn page_number(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }
}

/// Request-scoped tag id → name lookup.
#[derive(Debug, Clone, Default)]
pub struct TagMap {
    tags: Vec<Tag>,
    names: HashMap<ObjectId, String>,
}

impl TagMap {
    pub fn new(tags: Vec<Tag>) -> Self {
        let names = tags
            .iter()
            .map(|tag| (tag.id.clone(), tag.name.clone()))
            .collect();
        Self { tags, names }
    }

    pub fn name_of(&self, id: &ObjectId) -> &str {
        self.names.get(id).map(String::as_str).unwrap_or(UNKNOWN_TAG)
    }

    /// First tag, in API order, with exactly this name.
    pub fn id_for_name(&self, name: &str) -> Option<&ObjectId> {
        self.tags.iter().find(|tag| tag.name == name).map(|tag| &tag.id)
    }

    pub fn category_names(&self, post: &BlogPost) -> Vec<String> {
        post.tag_ids
            .iter()
            .map(|id| self.name_of(id).to_string())
            .collect()
    }

    pub fn into_tags(self) -> Vec<Tag> {
        self.tags
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub post: BlogPost,
    pub category_names: Vec<String>,
    pub formatted_publish_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogListing {
    pub posts: Vec<PostCard>,
    pub page: usize,
    pub has_next: bool,
    pub total_results: usize,
    pub tags: Vec<Tag>,
    pub selected_category: String,
    pub search_query: String,
    pub latest_posts: Vec<BlogPost>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: BlogPost,
    pub category_names: Vec<String>,
    pub created_date: String,
    pub latest_posts: Vec<BlogPost>,
}

/// `YYYY-MM-DD` from an ISO-8601 timestamp.
pub fn format_post_date(created: Option<&str>) -> String {
    let Some(created) = created.map(str::trim).filter(|c| !c.is_empty()) else {
        return DATE_UNAVAILABLE.to_string();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(created) {
        return parsed.format("%Y-%m-%d").to_string();
    }
    match NaiveDateTime::parse_from_str(created, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(parsed) => parsed.format("%Y-%m-%d").to_string(),
        Err(e) => {
            tracing::debug!("Unparseable post date {:?}: {}", created, e);
            DATE_UNAVAILABLE.to_string()
        }
    }
}

/// Filters, pages and decorates an already fetched batch of posts.
pub fn build_listing(posts: Vec<BlogPost>, tags: Vec<Tag>, query: &BlogQuery) -> BlogListing {
    let tag_map = TagMap::new(tags);
    let page = query.page_number();
    let latest_posts: Vec<BlogPost> = posts.iter().take(LATEST_POSTS).cloned().collect();

    let mut matching = posts;

    // 找不到對應名稱的分類時不過濾
    if !query.category.is_empty() {
        if let Some(category_id) = tag_map.id_for_name(&query.category) {
            matching.retain(|post| post.tag_ids.contains(category_id));
        }
    }

    if !query.search.is_empty() {
        let needle = query.search.to_lowercase();
        matching.retain(|post| post.title().to_lowercase().contains(&needle));
    }

    let total_results = matching.len();
    let has_next = page.saturating_mul(POSTS_PER_PAGE) < total_results;
    let start = (page - 1).saturating_mul(POSTS_PER_PAGE);

    let cards = matching
        .into_iter()
        .skip(start)
        .take(POSTS_PER_PAGE)
        .map(|post| PostCard {
            category_names: tag_map.category_names(&post),
            formatted_publish_date: format_post_date(post.created.as_deref()),
            post,
        })
        .collect();

    BlogListing {
        posts: cards,
        page,
        has_next,
        total_results,
        tags: tag_map.into_tags(),
        selected_category: query.category.clone(),
        search_query: query.search.clone(),
        latest_posts,
    }
}

pub async fn load_listing(cms: &dyn CmsClient, query: &BlogQuery) -> Result<BlogListing> {
    let posts = cms
        .list_posts(BLOG_FETCH_LIMIT)
        .await
        .map_err(|e| PortalError::upstream("Failed to fetch posts from HubSpot", e))?;
    let tags = cms
        .list_tags()
        .await
        .map_err(|e| PortalError::upstream("Failed to fetch tags from HubSpot", e))?;

    Ok(build_listing(posts, tags, query))
}

pub async fn load_post(cms: &dyn CmsClient, post_id: u64) -> Result<PostDetail> {
    let tags = cms
        .list_tags()
        .await
        .map_err(|e| PortalError::upstream("Failed to fetch tags from HubSpot", e))?;
    let tag_map = TagMap::new(tags);

    let post = cms
        .get_post(post_id)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                tracing::info!("Post {} does not exist", post_id);
            }
            PortalError::upstream("Failed to fetch post from HubSpot", e)
        })?;
    let post = clean_post_data(post);

    // 側欄的最新文章失敗時不影響主文
    let latest_posts = cms.list_posts(LATEST_POSTS).await.unwrap_or_else(|e| {
        tracing::warn!("⚠️ Latest posts unavailable: {}", e);
        Vec::new()
    });

    Ok(PostDetail {
        category_names: tag_map.category_names(&post),
        created_date: format_post_date(post.created.as_deref()),
        post,
        latest_posts,
    })
}
