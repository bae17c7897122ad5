//! The module contains the errors the ledger can return.
//!
//! The errors are:
//!
//! - [`Unauthenticated`] returned when an operation needs an identity and the
//!   caller has none usable.
//! - [`UnknownCategory`] and [`UnknownSubcategory`] returned when a write
//!   names a taxonomy entry that does not exist.
//! - [`InvalidDate`] and [`InvalidAmount`] returned for malformed input.
//!
//!  [`Unauthenticated`]: LedgerError::Unauthenticated
//!  [`UnknownCategory`]: LedgerError::UnknownCategory
//!  [`UnknownSubcategory`]: LedgerError::UnknownSubcategory
//!  [`InvalidDate`]: LedgerError::InvalidDate
//!  [`InvalidAmount`]: LedgerError::InvalidAmount
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Authentication failed: {0}")]
    Unauthenticated(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Unknown subcategory: {subcategory} for category {category}")]
    UnknownSubcategory {
        subcategory: String,
        category: String,
    },
    #[error("Invalid date: {0}. Use DD-MM-YYYY or YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unauthenticated(a), Self::Unauthenticated(b)) => a == b,
            (Self::UnknownCategory(a), Self::UnknownCategory(b)) => a == b,
            (
                Self::UnknownSubcategory {
                    subcategory: a_sub,
                    category: a_cat,
                },
                Self::UnknownSubcategory {
                    subcategory: b_sub,
                    category: b_cat,
                },
            ) => a_sub == b_sub && a_cat == b_cat,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
