use sea_orm::{ConnectionTrait, FromQueryResult, Statement, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::{Caller, ResultLedger, dates, query::FilterBuilder};

use super::{Ledger, normalize_optional_text, with_tx};

/// One aggregation row: total spent for a category/subcategory pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromQueryResult)]
pub struct SummaryRow {
    pub category: String,
    pub subcategory: Option<String>,
    pub total_amount: f64,
}

impl Ledger {
    /// Sums expenses in the inclusive date range per category/subcategory.
    ///
    /// The optional name filters narrow the aggregation by joining on the
    /// taxonomy names; they are not validated against the taxonomy, so an
    /// unknown name yields an empty result rather than an error. Rows come
    /// back biggest total first.
    pub async fn summarize(
        &self,
        caller: &Caller,
        start_date: &str,
        end_date: &str,
        category: Option<&str>,
        subcategory: Option<&str>,
    ) -> ResultLedger<Vec<SummaryRow>> {
        let owner = self.resolve_identity(caller)?;
        let (start, end) = dates::parse_range(start_date, end_date)?;
        let category = normalize_optional_text(category);
        let subcategory = normalize_optional_text(subcategory);

        let backend = self.database.get_database_backend();
        let mut filters = FilterBuilder::new(backend);
        filters.between("e.expense_date", start, end);
        if let Some(owner) = owner {
            filters.equals("e.owner", owner);
        }
        if let Some(category) = category {
            filters.equals("c.name", category);
        }
        if let Some(subcategory) = subcategory {
            filters.equals("s.name", subcategory);
        }

        let sql = format!(
            "SELECT c.name AS category, s.name AS subcategory, \
             SUM(e.amount) AS total_amount \
             FROM expenses e \
             JOIN categories c ON e.category_id = c.id \
             LEFT JOIN subcategories s ON e.subcategory_id = s.id \
             {} \
             GROUP BY c.name, s.name \
             ORDER BY total_amount DESC, category ASC, subcategory ASC",
            filters.where_sql()
        );

        with_tx!(self, |db_tx| {
            let rows = SummaryRow::find_by_statement(Statement::from_sql_and_values(
                backend,
                sql,
                filters.into_values(),
            ))
            .all(&db_tx)
            .await?;
            Ok(rows)
        })
    }
}
