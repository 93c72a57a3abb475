//! Shared helpers for unit tests: in-memory store and reference data.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

use crate::db;
use crate::entities::{member, membership_type};

/// In-memory SQLite with every table created. A single pooled connection keeps
/// the whole test on one database.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = db::connect("sqlite::memory:", 1).await?;
    db::create_tables(&db).await?;
    Ok(db)
}

pub async fn create_test_member(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
) -> Result<member::Model, DbErr> {
    member::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_test_membership_type(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
) -> Result<membership_type::Model, DbErr> {
    membership_type::ActiveModel {
        name: Set(name.to_string()),
        price: Set(price),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}
