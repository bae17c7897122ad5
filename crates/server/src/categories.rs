//! Categories API endpoints.

use std::collections::BTreeMap;

use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

/// Handle requests for the full category tree.
///
/// Open to unauthenticated callers in every deployment mode.
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<BTreeMap<String, Vec<String>>>, ServerError> {
    let taxonomy = state.ledger.list_categories().await?;
    Ok(Json(taxonomy))
}
