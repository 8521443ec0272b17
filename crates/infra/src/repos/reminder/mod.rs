mod inmemory;
mod postgres;

use crate::repos::shared::repo::DeleteResult;
use certification_tracker_domain::{ReminderId, ScheduledReminder, ID};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Reminders of the certification ordered by `fire_at`
    async fn find_by_certification(
        &self,
        certification_id: &ID,
    ) -> anyhow::Result<Vec<ScheduledReminder>>;
    /// Reminders that are not delivered yet and fire after `timestamp`
    async fn find_undelivered_after(&self, timestamp: i64) -> anyhow::Result<Vec<ScheduledReminder>>;
    /// Inserts the reminder or replaces the one with the same id
    async fn upsert(&self, reminder: &ScheduledReminder) -> anyhow::Result<()>;
    /// Marks the reminder as delivered, but only if it still fires at `fire_at`.
    /// A reminder that was recreated for another time is left undelivered.
    async fn mark_delivered(
        &self,
        reminder_id: &ReminderId,
        fire_at: i64,
    ) -> anyhow::Result<bool>;
    async fn delete(&self, reminder_id: &ReminderId) -> anyhow::Result<Option<ScheduledReminder>>;
    async fn delete_by_certification(&self, certification_id: &ID) -> anyhow::Result<DeleteResult>;
}

#[cfg(test)]
mod tests {
    use crate::{setup_context, TrackerContext};
    use certification_tracker_domain::{CertificationRecord, NewCertification, ScheduledReminder};

    async fn create_contexts() -> Vec<TrackerContext> {
        vec![TrackerContext::create_inmemory(), setup_context().await]
    }

    async fn insert_certification(ctx: &TrackerContext) -> CertificationRecord {
        let cert = CertificationRecord::new(NewCertification {
            name: "CISSP".into(),
            issuing_organization: "ISC2".into(),
            ..Default::default()
        })
        .unwrap();
        ctx.repos.certifications.insert(&cert).await.unwrap();
        cert
    }

    #[tokio::test]
    async fn upsert_find_and_delete() {
        for ctx in create_contexts().await {
            let cert = insert_certification(&ctx).await;
            let r1 = ScheduledReminder::new(&cert.id, 30, 3000);
            let mut r2 = ScheduledReminder::new(&cert.id, 7, 2000);

            assert!(ctx.repos.reminders.upsert(&r1).await.is_ok());
            assert!(ctx.repos.reminders.upsert(&r2).await.is_ok());

            // Upserting the same id replaces the reminder
            r2.fire_at = 1000;
            assert!(ctx.repos.reminders.upsert(&r2).await.is_ok());

            let reminders = ctx
                .repos
                .reminders
                .find_by_certification(&cert.id)
                .await
                .unwrap();
            assert_eq!(reminders, vec![r2.clone(), r1.clone()]);

            let deleted = ctx.repos.reminders.delete(&r2.id).await.unwrap();
            assert_eq!(deleted, Some(r2.clone()));
            assert_eq!(ctx.repos.reminders.delete(&r2.id).await.unwrap(), None);

            let res = ctx
                .repos
                .reminders
                .delete_by_certification(&cert.id)
                .await
                .unwrap();
            assert_eq!(res.deleted_count, 1);
            assert!(ctx
                .repos
                .reminders
                .find_by_certification(&cert.id)
                .await
                .unwrap()
                .is_empty());

            ctx.repos.certifications.delete(&cert.id).await;
        }
    }

    #[tokio::test]
    async fn mark_delivered() {
        for ctx in create_contexts().await {
            let cert = insert_certification(&ctx).await;
            let r1 = ScheduledReminder::new(&cert.id, 30, 3000);
            let r2 = ScheduledReminder::new(&cert.id, 7, 5000);
            ctx.repos.reminders.upsert(&r1).await.unwrap();
            ctx.repos.reminders.upsert(&r2).await.unwrap();

            // Recreated for another time since it was handed over for delivery
            assert!(!ctx.repos.reminders.mark_delivered(&r2.id, 4000).await.unwrap());
            assert!(ctx.repos.reminders.mark_delivered(&r1.id, 3000).await.unwrap());

            let undelivered = ctx
                .repos
                .reminders
                .find_undelivered_after(0)
                .await
                .unwrap()
                .into_iter()
                .filter(|r| r.certification_id == cert.id)
                .collect::<Vec<_>>();
            assert_eq!(undelivered, vec![r2.clone()]);

            let undelivered = ctx
                .repos
                .reminders
                .find_undelivered_after(5000)
                .await
                .unwrap()
                .into_iter()
                .filter(|r| r.certification_id == cert.id)
                .count();
            assert_eq!(undelivered, 0);

            ctx.repos.reminders.delete_by_certification(&cert.id).await.unwrap();
            assert!(!ctx.repos.reminders.mark_delivered(&r1.id, 3000).await.unwrap());
            ctx.repos.certifications.delete(&cert.id).await;
        }
    }
}
