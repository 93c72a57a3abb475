use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use tracing::instrument;

use crate::entities::{Member, member};

/// Read-only access to members, for the payment form.
pub struct MemberRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MemberRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<member::Model>, DbErr> {
        Member::find()
            .order_by_asc(member::Column::Name)
            .all(self.db)
            .await
    }

    #[instrument(skip(self))]
    pub async fn exists(&self, id: i64) -> Result<bool, DbErr> {
        Ok(Member::find_by_id(id).one(self.db).await?.is_some())
    }
}
