mod certification;
mod reminder;
mod shared;

use crate::system::ISys;
pub use certification::ICertificationRepo;
use certification::{InMemoryCertificationRepo, PostgresCertificationRepo};
pub use reminder::IReminderRepo;
use reminder::{InMemoryReminderRepo, PostgresReminderRepo};
pub use shared::repo::DeleteResult;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub certifications: Arc<dyn ICertificationRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB RUNNING MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB RUNNING MIGRATIONS ... [done]");

        Ok(Self {
            certifications: Arc::new(PostgresCertificationRepo::new(pool.clone())),
            reminders: Arc::new(PostgresReminderRepo::new(pool)),
        })
    }

    pub fn create_inmemory(sys: Arc<dyn ISys>) -> Self {
        Self {
            certifications: Arc::new(InMemoryCertificationRepo::new(sys)),
            reminders: Arc::new(InMemoryReminderRepo::new()),
        }
    }
}
