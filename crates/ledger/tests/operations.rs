use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use serde_json::json;

use ledger::{Caller, IdentityMode, Ledger, LedgerError};
use migration::MigratorTrait;

async fn ledger_with_db(identity: IdentityMode) -> (Ledger, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for sql in [
        "INSERT INTO categories (id, name) VALUES (1, 'Food')",
        "INSERT INTO categories (id, name) VALUES (2, 'Transport')",
        "INSERT INTO categories (id, name) VALUES (3, 'Utilities')",
        "INSERT INTO subcategories (category_id, name) VALUES (1, 'Groceries')",
        "INSERT INTO subcategories (category_id, name) VALUES (1, 'Restaurants')",
        "INSERT INTO subcategories (category_id, name) VALUES (2, 'Fuel')",
        "INSERT INTO subcategories (category_id, name) VALUES (2, 'Transit')",
    ] {
        db.execute(Statement::from_string(backend, sql))
            .await
            .unwrap();
    }
    let ledger = Ledger::builder()
        .database(db.clone())
        .identity(identity)
        .build();
    (ledger, db)
}

async fn count_expenses(db: &DatabaseConnection) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT COUNT(*) AS n FROM expenses",
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}

fn bearer_caller(user: &str) -> Caller {
    let serde_json::Value::Object(claims) = json!({ "sub": user }) else {
        unreachable!()
    };
    Caller::with_claims(claims)
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn add_and_list_round_trip() {
    let (ledger, _db) = ledger_with_db(IdentityMode::Open).await;
    let caller = Caller::anonymous();

    let id = ledger
        .add_expense(
            &caller,
            "15-01-2024",
            42.5,
            "Food",
            Some("Groceries"),
            Some("weekly shop"),
        )
        .await
        .unwrap();

    let listed = ledger
        .list_expenses(&caller, "01-01-2024", "31-01-2024")
        .await
        .unwrap();

    assert_eq!(listed.len(), 1);
    let expense = &listed[0];
    assert_eq!(expense.id, id);
    assert_eq!(expense.expense_date, ymd(2024, 1, 15));
    assert_eq!(expense.amount, 42.5);
    assert_eq!(expense.category, "Food");
    assert_eq!(expense.subcategory.as_deref(), Some("Groceries"));
    assert_eq!(expense.note, "weekly shop");
}

#[tokio::test]
async fn list_range_is_inclusive_and_oldest_first() {
    let (ledger, _db) = ledger_with_db(IdentityMode::Open).await;
    let caller = Caller::anonymous();

    for date in ["10-03-2024", "01-03-2024", "31-03-2024", "01-04-2024"] {
        ledger
            .add_expense(&caller, date, 10.0, "Food", None, None)
            .await
            .unwrap();
    }

    let listed = ledger
        .list_expenses(&caller, "01-03-2024", "31-03-2024")
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = listed.iter().map(|e| e.expense_date).collect();
    assert_eq!(
        dates,
        vec![ymd(2024, 3, 1), ymd(2024, 3, 10), ymd(2024, 3, 31)]
    );
}

#[tokio::test]
async fn unknown_category_rejected_without_insert() {
    let (ledger, db) = ledger_with_db(IdentityMode::Open).await;
    let caller = Caller::anonymous();

    let err = ledger
        .add_expense(&caller, "15-01-2024", 5.0, "Snacks", None, None)
        .await
        .unwrap_err();

    assert_eq!(err, LedgerError::UnknownCategory("Snacks".to_string()));
    assert_eq!(count_expenses(&db).await, 0);
}

#[tokio::test]
async fn subcategory_must_belong_to_named_category() {
    let (ledger, db) = ledger_with_db(IdentityMode::Open).await;
    let caller = Caller::anonymous();

    // Transit exists, but under Transport.
    let err = ledger
        .add_expense(&caller, "15-01-2024", 5.0, "Food", Some("Transit"), None)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        LedgerError::UnknownSubcategory {
            subcategory: "Transit".to_string(),
            category: "Food".to_string(),
        }
    );
    assert_eq!(count_expenses(&db).await, 0);

    ledger
        .add_expense(&caller, "15-01-2024", 5.0, "Transport", Some("Transit"), None)
        .await
        .unwrap();
    assert_eq!(count_expenses(&db).await, 1);
}

#[tokio::test]
async fn case_must_match_exactly() {
    let (ledger, _db) = ledger_with_db(IdentityMode::Open).await;
    let caller = Caller::anonymous();

    let err = ledger
        .add_expense(&caller, "15-01-2024", 5.0, "food", None, None)
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::UnknownCategory("food".to_string()));
}

#[tokio::test]
async fn empty_subcategory_treated_as_absent() {
    let (ledger, _db) = ledger_with_db(IdentityMode::Open).await;
    let caller = Caller::anonymous();

    ledger
        .add_expense(&caller, "15-01-2024", 5.0, "Food", Some(""), None)
        .await
        .unwrap();

    let listed = ledger
        .list_expenses(&caller, "15-01-2024", "15-01-2024")
        .await
        .unwrap();
    assert_eq!(listed[0].subcategory, None);
    assert_eq!(listed[0].note, "");
}

#[tokio::test]
async fn malformed_dates_rejected_on_both_paths() {
    let (ledger, db) = ledger_with_db(IdentityMode::Open).await;
    let caller = Caller::anonymous();

    let err = ledger
        .add_expense(&caller, "15/01/2024", 5.0, "Food", None, None)
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::InvalidDate("15/01/2024".to_string()));
    assert_eq!(count_expenses(&db).await, 0);

    let err = ledger
        .list_expenses(&caller, "01-01-2024", "January")
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::InvalidDate("January".to_string()));

    let err = ledger
        .summarize(&caller, "2024-99-01", "31-12-2024", None, None)
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::InvalidDate("2024-99-01".to_string()));
}

#[tokio::test]
async fn ambiguous_dates_resolve_day_first() {
    let (ledger, _db) = ledger_with_db(IdentityMode::Open).await;
    let caller = Caller::anonymous();

    // Day-first reading: 1 February, not 2 January.
    ledger
        .add_expense(&caller, "01-02-2020", 5.0, "Food", None, None)
        .await
        .unwrap();

    let on_feb_first = ledger
        .list_expenses(&caller, "2020-02-01", "2020-02-01")
        .await
        .unwrap();
    assert_eq!(on_feb_first.len(), 1);

    let on_jan_second = ledger
        .list_expenses(&caller, "2020-01-02", "2020-01-02")
        .await
        .unwrap();
    assert!(on_jan_second.is_empty());
}

#[tokio::test]
async fn taxonomy_listing_keeps_empty_categories() {
    let (ledger, _db) = ledger_with_db(IdentityMode::Open).await;

    let taxonomy = ledger.list_categories().await.unwrap();

    assert_eq!(
        taxonomy.keys().collect::<Vec<_>>(),
        vec!["Food", "Transport", "Utilities"]
    );
    assert_eq!(taxonomy["Food"], vec!["Groceries", "Restaurants"]);
    assert_eq!(taxonomy["Transport"], vec!["Fuel", "Transit"]);
    assert!(taxonomy["Utilities"].is_empty());
}

#[tokio::test]
async fn summary_groups_sums_and_orders_by_total() {
    let (ledger, _db) = ledger_with_db(IdentityMode::Open).await;
    let caller = Caller::anonymous();

    for (date, amount, category, subcategory) in [
        ("05-01-2024", 30.0, "Food", Some("Groceries")),
        ("12-01-2024", 20.0, "Food", Some("Groceries")),
        ("15-01-2024", 30.0, "Food", Some("Restaurants")),
        ("20-01-2024", 80.0, "Transport", Some("Fuel")),
        ("25-01-2024", 30.0, "Transport", Some("Transit")),
    ] {
        ledger
            .add_expense(&caller, date, amount, category, subcategory, None)
            .await
            .unwrap();
    }

    let rows = ledger
        .summarize(&caller, "01-01-2024", "31-01-2024", None, None)
        .await
        .unwrap();

    let as_tuples: Vec<(&str, Option<&str>, f64)> = rows
        .iter()
        .map(|row| {
            (
                row.category.as_str(),
                row.subcategory.as_deref(),
                row.total_amount,
            )
        })
        .collect();

    // Biggest total first; ties break on category then subcategory name.
    assert_eq!(
        as_tuples,
        vec![
            ("Transport", Some("Fuel"), 80.0),
            ("Food", Some("Groceries"), 50.0),
            ("Food", Some("Restaurants"), 30.0),
            ("Transport", Some("Transit"), 30.0),
        ]
    );
}

#[tokio::test]
async fn summary_filters_narrow_without_validation() {
    let (ledger, _db) = ledger_with_db(IdentityMode::Open).await;
    let caller = Caller::anonymous();

    ledger
        .add_expense(&caller, "05-01-2024", 30.0, "Food", Some("Groceries"), None)
        .await
        .unwrap();
    ledger
        .add_expense(&caller, "06-01-2024", 80.0, "Transport", Some("Fuel"), None)
        .await
        .unwrap();

    let rows = ledger
        .summarize(&caller, "01-01-2024", "31-01-2024", Some("Food"), None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Food");
    assert_eq!(rows[0].total_amount, 30.0);

    let rows = ledger
        .summarize(
            &caller,
            "01-01-2024",
            "31-01-2024",
            None,
            Some("Groceries"),
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].subcategory.as_deref(), Some("Groceries"));

    // Unknown names are not an error on this path, just an empty result.
    let rows = ledger
        .summarize(&caller, "01-01-2024", "31-01-2024", Some("Snacks"), None)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn summary_groups_uncategorized_subcategory_rows() {
    let (ledger, _db) = ledger_with_db(IdentityMode::Open).await;
    let caller = Caller::anonymous();

    ledger
        .add_expense(&caller, "05-01-2024", 12.0, "Utilities", None, None)
        .await
        .unwrap();
    ledger
        .add_expense(&caller, "06-01-2024", 8.0, "Utilities", None, None)
        .await
        .unwrap();

    let rows = ledger
        .summarize(&caller, "01-01-2024", "31-01-2024", None, None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Utilities");
    assert_eq!(rows[0].subcategory, None);
    assert_eq!(rows[0].total_amount, 20.0);
}

#[tokio::test]
async fn session_mode_rejects_anonymous_callers() {
    let (ledger, db) = ledger_with_db(IdentityMode::Session).await;
    let caller = Caller::anonymous();

    let err = ledger
        .add_expense(&caller, "15-01-2024", 5.0, "Food", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Unauthenticated(_)));
    assert_eq!(count_expenses(&db).await, 0);

    assert!(matches!(
        ledger.list_expenses(&caller, "01-01-2024", "31-01-2024").await,
        Err(LedgerError::Unauthenticated(_))
    ));
    assert!(matches!(
        ledger
            .summarize(&caller, "01-01-2024", "31-01-2024", None, None)
            .await,
        Err(LedgerError::Unauthenticated(_))
    ));
}

#[tokio::test]
async fn identity_scopes_reads_to_the_caller() {
    let (ledger, _db) = ledger_with_db(IdentityMode::Session).await;
    let alice = Caller::with_session_user("alice");
    let bob = Caller::with_session_user("bob");

    ledger
        .add_expense(&alice, "10-01-2024", 25.0, "Food", Some("Groceries"), None)
        .await
        .unwrap();
    ledger
        .add_expense(&bob, "11-01-2024", 60.0, "Transport", Some("Fuel"), None)
        .await
        .unwrap();

    let alices = ledger
        .list_expenses(&alice, "01-01-2024", "31-01-2024")
        .await
        .unwrap();
    assert_eq!(alices.len(), 1);
    assert_eq!(alices[0].category, "Food");

    let bobs_summary = ledger
        .summarize(&bob, "01-01-2024", "31-01-2024", None, None)
        .await
        .unwrap();
    assert_eq!(bobs_summary.len(), 1);
    assert_eq!(bobs_summary[0].category, "Transport");
    assert_eq!(bobs_summary[0].total_amount, 60.0);
}

#[tokio::test]
async fn bearer_mode_uses_the_configured_claim() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(
        backend,
        "INSERT INTO categories (id, name) VALUES (1, 'Food')",
    ))
    .await
    .unwrap();

    let ledger = Ledger::builder()
        .database(db.clone())
        .identity(IdentityMode::BearerClaims {
            claim: "sub".to_string(),
        })
        .build();

    ledger
        .add_expense(
            &bearer_caller("alice"),
            "10-01-2024",
            25.0,
            "Food",
            None,
            None,
        )
        .await
        .unwrap();

    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT owner FROM expenses",
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.try_get::<Option<String>>("", "owner").unwrap().as_deref(), Some("alice"));

    // A token without the configured claim is unusable.
    let serde_json::Value::Object(claims) = json!({ "uid": "alice" }) else {
        unreachable!()
    };
    let err = ledger
        .add_expense(
            &Caller::with_claims(claims),
            "10-01-2024",
            5.0,
            "Food",
            None,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Unauthenticated(_)));
}

#[tokio::test]
async fn open_mode_stores_unowned_rows() {
    let (ledger, db) = ledger_with_db(IdentityMode::Open).await;

    ledger
        .add_expense(
            &Caller::anonymous(),
            "10-01-2024",
            25.0,
            "Food",
            None,
            None,
        )
        .await
        .unwrap();

    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT COUNT(*) AS n FROM expenses WHERE owner IS NULL",
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.try_get::<i64>("", "n").unwrap(), 1);
}

#[tokio::test]
async fn strict_amounts_rejects_non_positive_writes() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(
        backend,
        "INSERT INTO categories (id, name) VALUES (1, 'Food')",
    ))
    .await
    .unwrap();

    let strict = Ledger::builder()
        .database(db.clone())
        .strict_amounts(true)
        .build();
    let caller = Caller::anonymous();

    assert!(matches!(
        strict
            .add_expense(&caller, "10-01-2024", 0.0, "Food", None, None)
            .await,
        Err(LedgerError::InvalidAmount(_))
    ));
    assert!(matches!(
        strict
            .add_expense(&caller, "10-01-2024", -3.0, "Food", None, None)
            .await,
        Err(LedgerError::InvalidAmount(_))
    ));

    // The default keeps the historical behavior: corrections are allowed.
    let lenient = Ledger::builder().database(db.clone()).build();
    lenient
        .add_expense(&caller, "10-01-2024", -3.0, "Food", None, None)
        .await
        .unwrap();
}
