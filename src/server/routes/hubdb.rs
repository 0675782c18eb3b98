use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::core::hubdb::{fetch_hubdb_tables, parse_table_ids};
use crate::server::app::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HubDbQuery {
    /// Comma separated table ids
    #[serde(default)]
    pub ids: String,
}

pub async fn get_tables(
    State(state): State<AppState>,
    Query(query): Query<HubDbQuery>,
) -> Json<BTreeMap<String, Value>> {
    let table_ids = parse_table_ids(&query.ids);
    Json(fetch_hubdb_tables(state.cms.as_ref(), &table_ids).await)
}
