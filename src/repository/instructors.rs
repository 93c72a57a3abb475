use chrono::Utc;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::{debug, info, instrument};

use crate::entities::{Instructor, instructor};
use crate::models::InstructorInput;

pub struct InstructorRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> InstructorRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Most recently hired into the system first.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<instructor::Model>, DbErr> {
        let instructors = Instructor::find()
            .order_by_desc(instructor::Column::CreatedAt)
            .order_by_desc(instructor::Column::Id)
            .all(self.db)
            .await?;
        debug!("Fetched {} instructors", instructors.len());
        Ok(instructors)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<Option<instructor::Model>, DbErr> {
        Instructor::find_by_id(id).one(self.db).await
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: InstructorInput) -> Result<i64, DbErr> {
        let mut model = Self::active_model(input);
        model.created_at = Set(Utc::now().naive_utc());
        let id = Instructor::insert(model).exec(self.db).await?.last_insert_id;
        info!(id, "Created instructor");
        Ok(id)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: InstructorInput) -> Result<bool, DbErr> {
        let result = Instructor::update_many()
            .set(Self::active_model(input))
            .filter(instructor::Column::Id.eq(id))
            .exec(self.db)
            .await?;
        info!(id, rows = result.rows_affected, "Updated instructor");
        Ok(result.rows_affected > 0)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let result = Instructor::delete_by_id(id).exec(self.db).await?;
        info!(id, rows = result.rows_affected, "Deleted instructor");
        Ok(result.rows_affected > 0)
    }

    /// Whether another instructor already uses `email`. `exclude_id` skips the
    /// row being edited.
    #[instrument(skip(self))]
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> Result<bool, DbErr> {
        let mut query = Instructor::find().filter(instructor::Column::Email.eq(email));
        if let Some(id) = exclude_id {
            query = query.filter(instructor::Column::Id.ne(id));
        }
        Ok(query.count(self.db).await? > 0)
    }

    fn active_model(input: InstructorInput) -> instructor::ActiveModel {
        instructor::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            specialization: Set(input.specialization),
            hire_date: Set(input.hire_date),
            status: Set(input.status.unwrap_or_default()),
            created_at: NotSet,
        }
    }
}
