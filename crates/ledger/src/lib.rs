//! Validated access layer for a personal expense ledger.
//!
//! The store keeps a two-level spending taxonomy (categories and their
//! subcategories) and the expenses recorded against it. Every operation
//! goes through [`Ledger`], which resolves the caller's identity, checks
//! dates and taxonomy names, and only then touches the database.

pub use dates::{parse_date, parse_range};
pub use error::LedgerError;
pub use expenses::Expense;
pub use identity::{Caller, IdentityMode};
pub use ops::{Ledger, LedgerBuilder, SummaryRow};

mod categories;
mod dates;
mod error;
mod expenses;
mod identity;
mod ops;
mod query;
mod subcategories;

type ResultLedger<T> = Result<T, LedgerError>;
