use sea_orm::DatabaseConnection;

use crate::{Caller, IdentityMode, ResultLedger};

mod expenses;
mod summary;
mod taxonomy;

pub use summary::SummaryRow;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The validated access layer over the expense store.
///
/// All four operations run through this struct: taxonomy listing, expense
/// recording, range listing and aggregation. Identity is resolved before
/// any other input is inspected.
#[derive(Debug)]
pub struct Ledger {
    database: DatabaseConnection,
    identity: IdentityMode,
    strict_amounts: bool,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    pub(crate) fn resolve_identity(&self, caller: &Caller) -> ResultLedger<Option<String>> {
        self.identity.resolve(caller)
    }
}

/// Callers routinely send `""` where they mean "not set".
fn normalize_optional_text(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
    identity: IdentityMode,
    strict_amounts: bool,
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Select how caller identity is resolved. Defaults to open.
    pub fn identity(mut self, mode: IdentityMode) -> LedgerBuilder {
        self.identity = mode;
        self
    }

    /// Reject non-positive amounts on write. Off by default, since stored
    /// data may legitimately contain zero or negative corrections.
    pub fn strict_amounts(mut self, enabled: bool) -> LedgerBuilder {
        self.strict_amounts = enabled;
        self
    }

    /// Construct `Ledger`
    pub fn build(self) -> Ledger {
        Ledger {
            database: self.database,
            identity: self.identity,
            strict_amounts: self.strict_amounts,
        }
    }
}
