use chrono::Utc;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::{debug, info, instrument};

use crate::entities::{TrainingClass, training_class};
use crate::models::ClassInput;

pub struct ClassRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ClassRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// All classes, earliest start time first.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<training_class::Model>, DbErr> {
        let classes = TrainingClass::find()
            .order_by_asc(training_class::Column::ScheduleTime)
            .order_by_asc(training_class::Column::Id)
            .all(self.db)
            .await?;
        debug!("Fetched {} classes", classes.len());
        Ok(classes)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<Option<training_class::Model>, DbErr> {
        TrainingClass::find_by_id(id).one(self.db).await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ClassInput) -> Result<i64, DbErr> {
        let mut model = Self::active_model(input);
        model.created_at = Set(Utc::now().naive_utc());
        let id = TrainingClass::insert(model)
            .exec(self.db)
            .await?
            .last_insert_id;
        info!(id, "Created class");
        Ok(id)
    }

    /// Overwrites every mutable column. Returns `false` when no row has `id`.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: ClassInput) -> Result<bool, DbErr> {
        let result = TrainingClass::update_many()
            .set(Self::active_model(input))
            .filter(training_class::Column::Id.eq(id))
            .exec(self.db)
            .await?;
        info!(id, rows = result.rows_affected, "Updated class");
        Ok(result.rows_affected > 0)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let result = TrainingClass::delete_by_id(id).exec(self.db).await?;
        info!(id, rows = result.rows_affected, "Deleted class");
        Ok(result.rows_affected > 0)
    }

    fn active_model(input: ClassInput) -> training_class::ActiveModel {
        training_class::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            instructor: Set(input.instructor),
            schedule_time: Set(input.schedule_time),
            schedule_days: Set(input.schedule_days),
            capacity: Set(input.capacity),
            description: Set(input.description),
            created_at: NotSet,
        }
    }
}
