use chrono::Utc;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
};
use tracing::{debug, info, instrument};

use crate::entities::{Schedule, schedule};
use crate::models::{DayOfWeek, ScheduleInput, parse_time_of_day};

pub struct ScheduleRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ScheduleRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Every schedule, Monday through Sunday.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<schedule::Model>, DbErr> {
        let schedules = Schedule::find().all(self.db).await?;
        debug!("Fetched {} schedules", schedules.len());
        Ok(in_week_order(schedules))
    }

    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<schedule::Model>, DbErr> {
        let schedules = Schedule::find()
            .filter(schedule::Column::IsActive.eq(true))
            .all(self.db)
            .await?;
        Ok(in_week_order(schedules))
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<Option<schedule::Model>, DbErr> {
        Schedule::find_by_id(id).one(self.db).await
    }

    #[instrument(skip(self, input), fields(day = input.day_of_week.label()))]
    pub async fn create(&self, input: ScheduleInput) -> Result<i64, DbErr> {
        let mut model = Self::active_model(input);
        model.created_at = Set(Utc::now().naive_utc());
        let id = Schedule::insert(model).exec(self.db).await?.last_insert_id;
        info!(id, "Created schedule");
        Ok(id)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: ScheduleInput) -> Result<bool, DbErr> {
        let result = Schedule::update_many()
            .set(Self::active_model(input))
            .filter(schedule::Column::Id.eq(id))
            .exec(self.db)
            .await?;
        info!(id, rows = result.rows_affected, "Updated schedule");
        Ok(result.rows_affected > 0)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let result = Schedule::delete_by_id(id).exec(self.db).await?;
        info!(id, rows = result.rows_affected, "Deleted schedule");
        Ok(result.rows_affected > 0)
    }

    /// Whether another schedule already covers `day`, active or not.
    #[instrument(skip(self))]
    pub async fn day_exists(&self, day: DayOfWeek, exclude_id: Option<i64>) -> Result<bool, DbErr> {
        let mut query = Schedule::find().filter(schedule::Column::DayOfWeek.eq(day));
        if let Some(id) = exclude_id {
            query = query.filter(schedule::Column::Id.ne(id));
        }
        Ok(query.count(self.db).await? > 0)
    }

    /// Closing must fall strictly after opening on the same day. Unparsable
    /// times never form a valid range.
    pub fn is_valid_time_range(opening: &str, closing: &str) -> bool {
        match (parse_time_of_day(opening), parse_time_of_day(closing)) {
            (Some(opening), Some(closing)) => closing > opening,
            _ => false,
        }
    }

    fn active_model(input: ScheduleInput) -> schedule::ActiveModel {
        schedule::ActiveModel {
            id: NotSet,
            day_of_week: Set(input.day_of_week),
            opening_time: Set(input.opening_time),
            closing_time: Set(input.closing_time),
            is_active: Set(input.is_active.unwrap_or(true)),
            notes: Set(input.notes),
            created_at: NotSet,
        }
    }
}

fn in_week_order(mut schedules: Vec<schedule::Model>) -> Vec<schedule::Model> {
    schedules.sort_by_key(|s| s.day_of_week.number());
    schedules
}
