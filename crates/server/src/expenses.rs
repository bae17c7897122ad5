//! Expenses API endpoints

use api_types::expense::{ExpenseCreated, ExpenseList, ExpenseNew, ExpenseView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use ledger::Caller;

use crate::{ServerError, server::ServerState};

fn map_expense(expense: ledger::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        expense_date: expense.expense_date,
        amount: expense.amount,
        category: expense.category,
        subcategory: expense.subcategory,
        note: expense.note,
    }
}

/// Record one expense against the taxonomy.
pub async fn add(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let id = state
        .ledger
        .add_expense(
            &caller,
            &payload.date,
            payload.amount,
            &payload.category,
            payload.subcategory.as_deref(),
            payload.note.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ExpenseCreated {
            status: "ok".to_string(),
            id,
        }),
    ))
}

/// List expenses inside an inclusive date range, oldest first.
pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseList>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state
        .ledger
        .list_expenses(&caller, &payload.start_date, &payload.end_date)
        .await?
        .into_iter()
        .map(map_expense)
        .collect();

    Ok(Json(expenses))
}
