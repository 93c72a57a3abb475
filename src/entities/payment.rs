//! Payment entity. Rows are immutable once inserted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::PaymentMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub member_id: i64,
    pub membership_type_id: i64,
    pub amount: f64,
    pub payment_date: Date,
    pub payment_method: PaymentMethod,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
    #[sea_orm(
        belongs_to = "super::membership_type::Entity",
        from = "Column::MembershipTypeId",
        to = "super::membership_type::Column::Id"
    )]
    MembershipType,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl Related<super::membership_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MembershipType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
