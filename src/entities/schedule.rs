//! Opening hours for one day of the week.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::DayOfWeek;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// At most one row per day, active or not.
    #[sea_orm(unique)]
    pub day_of_week: DayOfWeek,
    pub opening_time: Time,
    pub closing_time: Time,
    pub is_active: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
