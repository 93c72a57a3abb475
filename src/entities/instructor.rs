use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::InstructorStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "instructors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    /// Unique across all instructors; the store enforces it as well as validation.
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub hire_date: Date,
    pub status: InstructorStatus,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
