use super::IReminderRepo;
use crate::repos::shared::repo::DeleteResult;
use certification_tracker_domain::{ReminderId, ScheduledReminder, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    certification_uid: Uuid,
    offset_days: i32,
    fire_at: i64,
    delivered: bool,
}

impl From<ReminderRaw> for ScheduledReminder {
    fn from(e: ReminderRaw) -> Self {
        Self {
            id: e.reminder_uid.into(),
            certification_id: e.certification_uid.into(),
            offset_days: e.offset_days.max(0) as u32,
            fire_at: e.fire_at,
            delivered: e.delivered,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn find_by_certification(
        &self,
        certification_id: &ID,
    ) -> anyhow::Result<Vec<ScheduledReminder>> {
        let reminders: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.certification_uid = $1
            ORDER BY r.fire_at ASC
            "#,
        )
        .bind(certification_id.inner())
        .fetch_all(&self.pool)
        .await?;
        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn find_undelivered_after(&self, timestamp: i64) -> anyhow::Result<Vec<ScheduledReminder>> {
        let reminders: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders AS r
            WHERE NOT r.delivered AND r.fire_at > $1
            ORDER BY r.fire_at ASC
            "#,
        )
        .bind(timestamp)
        .fetch_all(&self.pool)
        .await?;
        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn upsert(&self, reminder: &ScheduledReminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, certification_uid, offset_days, fire_at, delivered)
            VALUES($1, $2, $3, $4, $5)
            ON CONFLICT (reminder_uid) DO UPDATE
            SET offset_days = EXCLUDED.offset_days,
            fire_at = EXCLUDED.fire_at,
            delivered = EXCLUDED.delivered
            "#,
        )
        .bind(*reminder.id.inner_ref())
        .bind(reminder.certification_id.inner())
        .bind(reminder.offset_days as i32)
        .bind(reminder.fire_at)
        .bind(reminder.delivered)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to upsert reminder: {:?}. DB returned error: {:?}",
                reminder, e
            );
            e
        })?;
        Ok(())
    }

    async fn mark_delivered(
        &self,
        reminder_id: &ReminderId,
        fire_at: i64,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET delivered = TRUE
            WHERE reminder_uid = $1 AND fire_at = $2
            "#,
        )
        .bind(*reminder_id.inner_ref())
        .bind(fire_at)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, reminder_id: &ReminderId) -> anyhow::Result<Option<ScheduledReminder>> {
        let reminder: Option<ReminderRaw> = sqlx::query_as(
            r#"
            DELETE FROM reminders AS r
            WHERE r.reminder_uid = $1
            RETURNING *
            "#,
        )
        .bind(*reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(reminder.map(|r| r.into()))
    }

    async fn delete_by_certification(&self, certification_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM reminders AS r
            WHERE r.certification_uid = $1
            "#,
        )
        .bind(certification_id.inner())
        .execute(&self.pool)
        .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
