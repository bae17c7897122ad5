//! Wire types shared by the HTTP server and its clients.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        /// `DD-MM-YYYY` or `YYYY-MM-DD`.
        pub date: String,
        pub amount: f64,
        pub category: String,
        pub subcategory: Option<String>,
        pub note: Option<String>,
    }

    /// Acknowledgement for a stored expense.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub status: String,
        pub id: i64,
    }

    /// Inclusive date range for listing.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseList {
        pub start_date: String,
        pub end_date: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: i64,
        pub expense_date: NaiveDate,
        pub amount: f64,
        pub category: String,
        pub subcategory: Option<String>,
        pub note: String,
    }
}

pub mod summary {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryQuery {
        pub start_date: String,
        pub end_date: String,
        /// Narrows to one category by exact name.
        pub category: Option<String>,
        /// Narrows to one subcategory by exact name.
        pub subcategory: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryRowView {
        pub category: String,
        pub subcategory: Option<String>,
        pub total_amount: f64,
    }
}
