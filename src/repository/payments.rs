use chrono::Utc;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Iterable, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use tracing::{debug, info, instrument};

use crate::entities::{MembershipType, Payment, member, membership_type, payment};
use crate::models::{PaymentInput, PaymentRecord};

pub struct PaymentRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PaymentRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Newest payment date first; payments on the same date by insertion time.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<PaymentRecord>, DbErr> {
        let payments = Self::joined()
            .order_by_desc(payment::Column::PaymentDate)
            .order_by_desc(payment::Column::CreatedAt)
            .order_by_desc(payment::Column::Id)
            .into_model::<PaymentRecord>()
            .all(self.db)
            .await?;
        debug!("Fetched {} payments", payments.len());
        Ok(payments)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<Option<PaymentRecord>, DbErr> {
        Self::joined()
            .filter(payment::Column::Id.eq(id))
            .into_model::<PaymentRecord>()
            .one(self.db)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_by_member(&self, member_id: i64) -> Result<Vec<PaymentRecord>, DbErr> {
        Self::joined()
            .filter(payment::Column::MemberId.eq(member_id))
            .order_by_desc(payment::Column::PaymentDate)
            .order_by_desc(payment::Column::CreatedAt)
            .into_model::<PaymentRecord>()
            .all(self.db)
            .await
    }

    /// Inserts the payment. Unknown member or membership type ids are rejected
    /// by the store's foreign keys.
    #[instrument(skip(self, input), fields(member_id = input.member_id))]
    pub async fn create(&self, input: PaymentInput) -> Result<i64, DbErr> {
        let model = payment::ActiveModel {
            id: NotSet,
            member_id: Set(input.member_id),
            membership_type_id: Set(input.membership_type_id),
            amount: Set(input.amount),
            payment_date: Set(input.payment_date),
            payment_method: Set(input.payment_method.unwrap_or_default()),
            notes: Set(input.notes),
            created_at: Set(Utc::now().naive_utc()),
        };
        let id = Payment::insert(model).exec(self.db).await?.last_insert_id;
        info!(id, amount = input.amount, "Registered payment");
        Ok(id)
    }

    /// Membership plans, cheapest first.
    #[instrument(skip(self))]
    pub async fn list_membership_types(&self) -> Result<Vec<membership_type::Model>, DbErr> {
        MembershipType::find()
            .order_by_asc(membership_type::Column::Price)
            .all(self.db)
            .await
    }

    #[instrument(skip(self))]
    pub async fn membership_type_exists(&self, id: i64) -> Result<bool, DbErr> {
        Ok(MembershipType::find_by_id(id).one(self.db).await?.is_some())
    }

    fn joined() -> Select<Payment> {
        Payment::find()
            .select_only()
            .columns(payment::Column::iter())
            .column_as(member::Column::Name, "member_name")
            .column_as(member::Column::Email, "member_email")
            .column_as(membership_type::Column::Name, "membership_type_name")
            .column_as(membership_type::Column::Price, "membership_price")
            .join(JoinType::InnerJoin, payment::Relation::Member.def())
            .join(JoinType::InnerJoin, payment::Relation::MembershipType.def())
    }
}
