//! Summary API endpoints

use api_types::summary::{SummaryQuery, SummaryRowView};
use axum::{Extension, Json, extract::State};
use ledger::Caller;

use crate::{ServerError, server::ServerState};

fn map_row(row: ledger::SummaryRow) -> SummaryRowView {
    SummaryRowView {
        category: row.category,
        subcategory: row.subcategory,
        total_amount: row.total_amount,
    }
}

/// Handle requests for per-category spending totals.
pub async fn get_summary(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<SummaryQuery>,
) -> Result<Json<Vec<SummaryRowView>>, ServerError> {
    let rows = state
        .ledger
        .summarize(
            &caller,
            &payload.start_date,
            &payload.end_date,
            payload.category.as_deref(),
            payload.subcategory.as_deref(),
        )
        .await?
        .into_iter()
        .map(map_row)
        .collect();

    Ok(Json(rows))
}
