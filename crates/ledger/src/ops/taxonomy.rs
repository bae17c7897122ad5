use std::collections::BTreeMap;

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{LedgerError, ResultLedger, categories, subcategories};

use super::{Ledger, with_tx};

/// Taxonomy references a validated write stores instead of names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct TaxonomyRefs {
    pub(super) category_id: i32,
    pub(super) subcategory_id: Option<i32>,
}

impl Ledger {
    /// Resolves a category/subcategory name pair to row ids.
    ///
    /// Matching is exact and case sensitive. A subcategory is looked up
    /// only under the resolved category, so a name that exists elsewhere
    /// in the taxonomy is still a mismatch.
    pub(super) async fn resolve_taxonomy(
        &self,
        db_tx: &DatabaseTransaction,
        category: &str,
        subcategory: Option<&str>,
    ) -> ResultLedger<TaxonomyRefs> {
        let category_row = categories::Entity::find()
            .filter(categories::Column::Name.eq(category))
            .one(db_tx)
            .await?
            .ok_or_else(|| LedgerError::UnknownCategory(category.to_string()))?;

        let subcategory_id = match subcategory {
            None => None,
            Some(name) => {
                let row = subcategories::Entity::find()
                    .filter(subcategories::Column::CategoryId.eq(category_row.id))
                    .filter(subcategories::Column::Name.eq(name))
                    .one(db_tx)
                    .await?
                    .ok_or_else(|| LedgerError::UnknownSubcategory {
                        subcategory: name.to_string(),
                        category: category.to_string(),
                    })?;
                Some(row.id)
            }
        };

        Ok(TaxonomyRefs {
            category_id: category_row.id,
            subcategory_id,
        })
    }

    /// Lists the whole taxonomy as category name → subcategory names.
    ///
    /// Subcategory lists are name ordered; a category without
    /// subcategories maps to an empty list, it is not dropped.
    pub async fn list_categories(&self) -> ResultLedger<BTreeMap<String, Vec<String>>> {
        with_tx!(self, |db_tx| {
            let rows = categories::Entity::find()
                .find_with_related(subcategories::Entity)
                .order_by_asc(subcategories::Column::Name)
                .all(&db_tx)
                .await?;

            let mut taxonomy = BTreeMap::new();
            for (category, subcategories) in rows {
                let names = subcategories.into_iter().map(|sub| sub.name).collect();
                taxonomy.insert(category.name, names);
            }
            Ok(taxonomy)
        })
    }
}
