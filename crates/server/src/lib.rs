use axum::{Json, http::StatusCode, response::IntoResponse};
use ledger::LedgerError;

use serde::Serialize;
pub use server::{AuthConfig, AuthMode, run, run_with_listener, spawn_with_listener};

mod categories;
mod expenses;
mod server;
mod summary;
mod user;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{ExpenseCreated, ExpenseList, ExpenseNew, ExpenseView};
    }

    pub mod summary {
        pub use api_types::summary::{SummaryQuery, SummaryRowView};
    }
}

pub enum ServerError {
    Ledger(LedgerError),
    Generic(String),
}

//TODO: Find a better solution
#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        LedgerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        LedgerError::UnknownCategory(_)
        | LedgerError::UnknownSubcategory { .. }
        | LedgerError::InvalidDate(_)
        | LedgerError::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => (status_for_ledger_error(&err), message_for_ledger_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_maps_to_401() {
        let res = ServerError::from(LedgerError::Unauthenticated("no session identity".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn unknown_taxonomy_maps_to_422() {
        let res =
            ServerError::from(LedgerError::UnknownCategory("Snacks".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(LedgerError::UnknownSubcategory {
            subcategory: "Transit".to_string(),
            category: "Food".to_string(),
        })
        .into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn malformed_input_maps_to_422() {
        let res = ServerError::from(LedgerError::InvalidDate("15/01/2024".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(LedgerError::InvalidAmount("-3 is not positive".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn database_failures_map_to_500_with_generic_body() {
        let res = ServerError::from(LedgerError::Database(sea_orm::DbErr::Custom(
            "secret detail".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
