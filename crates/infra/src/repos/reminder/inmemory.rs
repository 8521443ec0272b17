use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use certification_tracker_domain::{ReminderId, ScheduledReminder, ID};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<ScheduledReminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(vec![]),
        }
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn find_by_certification(
        &self,
        certification_id: &ID,
    ) -> anyhow::Result<Vec<ScheduledReminder>> {
        let mut reminders = find_by(&self.reminders, |reminder| {
            reminder.certification_id == *certification_id
        });
        reminders.sort_by_key(|reminder| reminder.fire_at);
        Ok(reminders)
    }

    async fn find_undelivered_after(&self, timestamp: i64) -> anyhow::Result<Vec<ScheduledReminder>> {
        let mut reminders = find_by(&self.reminders, |reminder| {
            !reminder.delivered && reminder.fire_at > timestamp
        });
        reminders.sort_by_key(|reminder| reminder.fire_at);
        Ok(reminders)
    }

    async fn upsert(&self, reminder: &ScheduledReminder) -> anyhow::Result<()> {
        upsert(reminder, &self.reminders);
        Ok(())
    }

    async fn mark_delivered(
        &self,
        reminder_id: &ReminderId,
        fire_at: i64,
    ) -> anyhow::Result<bool> {
        let updated = update_many(
            &self.reminders,
            |reminder| reminder.id == *reminder_id && reminder.fire_at == fire_at,
            |reminder| reminder.delivered = true,
        );
        Ok(updated > 0)
    }

    async fn delete(&self, reminder_id: &ReminderId) -> anyhow::Result<Option<ScheduledReminder>> {
        Ok(delete(reminder_id, &self.reminders))
    }

    async fn delete_by_certification(&self, certification_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = delete_by(&self.reminders, |reminder| {
            reminder.certification_id == *certification_id
        });
        Ok(res)
    }
}
