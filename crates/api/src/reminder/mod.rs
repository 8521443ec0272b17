pub mod deliver_due_reminders;
pub mod get_certification_reminders;
pub mod refresh_reminders;
pub mod restore_scheduled_reminders;
pub mod sync_certification_reminders;
