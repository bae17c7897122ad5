//! Expense rows and their read-side shape.
//!
//! Stored rows reference the taxonomy by id; the read shape carries the
//! resolved names instead, since the surrogate ids never leave the store
//! layer.

use chrono::NaiveDate;
use sea_orm::FromQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A stored expense with its taxonomy names resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromQueryResult)]
pub struct Expense {
    pub id: i64,
    pub expense_date: NaiveDate,
    pub amount: f64,
    pub category: String,
    pub subcategory: Option<String>,
    pub note: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// `None` for rows written by an open deployment.
    pub owner: Option<String>,
    pub expense_date: Date,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub category_id: i32,
    pub subcategory_id: Option<i32>,
    pub note: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::subcategories::Entity",
        from = "Column::SubcategoryId",
        to = "super::subcategories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Subcategories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::subcategories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subcategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
