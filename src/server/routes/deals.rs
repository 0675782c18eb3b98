use axum::{extract::State, Json};

use crate::core::deals::fetch_deals_with_associations;
use crate::domain::model::DealRecord;
use crate::server::app::AppState;
use crate::utils::error::{PortalError, Result};

/// Deals with their contacts, companies and owner email.
pub async fn get_deals(State(state): State<AppState>) -> Result<Json<Vec<DealRecord>>> {
    let records = fetch_deals_with_associations(state.crm.as_ref())
        .await
        .map_err(|e| PortalError::upstream("Failed to fetch deals from HubSpot", e))?;
    Ok(Json(records))
}
