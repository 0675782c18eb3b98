use axum::{
    extract::{Path, Query, State},
    response::Html,
};

use crate::core::blog::{load_listing, load_post, BlogQuery};
use crate::server::app::AppState;
use crate::server::views;
use crate::utils::error::{PortalError, Result};

/// Blog listing, filtered by category, searchable by post name, 15 per page.
pub async fn blog(State(state): State<AppState>, Query(query): Query<BlogQuery>) -> Result<Html<String>> {
    let listing = load_listing(state.cms.as_ref(), &query).await?;
    tracing::debug!(
        "Blog page {} -> {} of {} posts",
        listing.page,
        listing.posts.len(),
        listing.total_results
    );
    Ok(Html(views::blog_page(&listing)))
}

/// Single cleaned post. POST is accepted and behaves like GET.
pub async fn single_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Html<String>> {
    let post_id = parse_post_id(&post_id).ok_or(PortalError::NotFound)?;
    let detail = load_post(state.cms.as_ref(), post_id).await?;
    Ok(Html(views::post_page(&detail)))
}

/// Only plain decimal ids name a post; anything else is not a route match.
fn parse_post_id(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
