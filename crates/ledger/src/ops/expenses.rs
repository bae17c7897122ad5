use sea_orm::{
    ActiveValue, JoinType, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};

use crate::{
    Caller, Expense, LedgerError, ResultLedger, categories, dates, expenses, subcategories,
};

use super::{Ledger, normalize_optional_text, with_tx};

trait ApplyOwnerFilter: QueryFilter + Sized {
    fn apply_owner_filter(self, owner: Option<&str>) -> Self;
}

impl<T> ApplyOwnerFilter for T
where
    T: QueryFilter + Sized,
{
    fn apply_owner_filter(mut self, owner: Option<&str>) -> Self {
        if let Some(owner) = owner {
            self = self.filter(expenses::Column::Owner.eq(owner));
        }
        self
    }
}

impl Ledger {
    /// Records one expense and returns its store-assigned id.
    ///
    /// The date accepts `DD-MM-YYYY` or `YYYY-MM-DD`; the category and
    /// optional subcategory must already exist in the taxonomy. Nothing is
    /// written unless every check passes.
    pub async fn add_expense(
        &self,
        caller: &Caller,
        date: &str,
        amount: f64,
        category: &str,
        subcategory: Option<&str>,
        note: Option<&str>,
    ) -> ResultLedger<i64> {
        let owner = self.resolve_identity(caller)?;
        let expense_date = dates::parse_date(date)?;
        if self.strict_amounts && amount <= 0.0 {
            return Err(LedgerError::InvalidAmount(format!(
                "{amount} is not positive"
            )));
        }
        let subcategory = normalize_optional_text(subcategory);
        let note = normalize_optional_text(note).unwrap_or_default().to_string();

        with_tx!(self, |db_tx| {
            let refs = self.resolve_taxonomy(&db_tx, category, subcategory).await?;

            let row = expenses::ActiveModel {
                id: ActiveValue::NotSet,
                owner: ActiveValue::Set(owner),
                expense_date: ActiveValue::Set(expense_date),
                amount: ActiveValue::Set(amount),
                category_id: ActiveValue::Set(refs.category_id),
                subcategory_id: ActiveValue::Set(refs.subcategory_id),
                note: ActiveValue::Set(note),
            };
            let inserted = row.insert(&db_tx).await?;
            Ok(inserted.id)
        })
    }

    /// Lists expenses with dates inside the inclusive range, oldest first.
    ///
    /// Under an identity-bearing mode only the caller's rows are returned;
    /// open deployments see everything.
    pub async fn list_expenses(
        &self,
        caller: &Caller,
        start_date: &str,
        end_date: &str,
    ) -> ResultLedger<Vec<Expense>> {
        let owner = self.resolve_identity(caller)?;
        let (start, end) = dates::parse_range(start_date, end_date)?;

        with_tx!(self, |db_tx| {
            let rows = expenses::Entity::find()
                .select_only()
                .column(expenses::Column::Id)
                .column(expenses::Column::ExpenseDate)
                .column(expenses::Column::Amount)
                .column_as(categories::Column::Name, "category")
                .column_as(subcategories::Column::Name, "subcategory")
                .column(expenses::Column::Note)
                .join(JoinType::InnerJoin, expenses::Relation::Categories.def())
                .join(JoinType::LeftJoin, expenses::Relation::Subcategories.def())
                .filter(expenses::Column::ExpenseDate.between(start, end))
                .apply_owner_filter(owner.as_deref())
                .order_by_asc(expenses::Column::ExpenseDate)
                .order_by_asc(expenses::Column::Id)
                .into_model::<Expense>()
                .all(&db_tx)
                .await?;
            Ok(rows)
        })
    }
}
