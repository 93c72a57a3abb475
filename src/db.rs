//! Connection setup and schema creation.
//!
//! Tables are generated from the entity definitions, so the unique and foreign key
//! constraints declared on the entities are what the store enforces.

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use tracing::{debug, info, instrument};

use crate::entities::{Instructor, Member, MembershipType, Payment, Schedule, TrainingClass};

#[instrument(skip(database_url))]
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    debug!("Opening database connection pool");
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!("Database connection established");
    Ok(db)
}

/// Creates every table that does not exist yet. Reference tables go first so the
/// payment foreign keys point at existing tables.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, Member).await?;
    create_table(db, MembershipType).await?;
    create_table(db, Instructor).await?;
    create_table(db, TrainingClass).await?;
    create_table(db, Schedule).await?;
    create_table(db, Payment).await?;
    info!("Database tables ensured");
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use sea_orm::{EntityTrait, QuerySelect};
    use tracing::span::{Attributes, Id};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    use super::*;

    /// Records `span.field` for every span opened while installed.
    #[derive(Clone, Default)]
    struct SpanFields(Arc<Mutex<Vec<String>>>);

    impl<S: tracing::Subscriber> Layer<S> for SpanFields {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
            let span = attrs.metadata().name();
            self.0
                .lock()
                .unwrap()
                .extend(attrs.fields().iter().map(|f| format!("{span}.{}", f.name())));
        }
    }

    #[tokio::test]
    async fn test_connect_span_omits_database_url() -> Result<(), DbErr> {
        let fields = SpanFields::default();
        let subscriber = tracing_subscriber::registry().with(fields.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        connect("sqlite::memory:", 1).await?;

        let recorded = fields.0.lock().unwrap();
        assert!(recorded.iter().any(|f| f == "connect.max_connections"));
        assert!(!recorded.iter().any(|f| f.ends_with("database_url")));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<(), DbErr> {
        let db = connect("sqlite::memory:", 1).await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let schedules = Schedule::find().limit(1).all(&db).await?;
        assert!(schedules.is_empty());
        Ok(())
    }
}
