mod certification;
mod date;
mod reminder;
mod shared;
mod status;
mod template;

pub use certification::{
    CertificationChanges, CertificationRecord, InvalidRecord, NewCertification, ReminderOffsets,
    DEFAULT_REMINDER_OFFSETS, MAX_CEU, MAX_REMINDER_OFFSET_DAYS,
};
pub use date::{add_years, date_in_tz, format_date, start_of_day_millis, MILLIS_PER_DAY};
pub use reminder::{
    reconcile, target_reminders, ReminderDiff, ReminderId, ReminderPayload, ScheduledReminder,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use status::{classify, days_until, CertificationStatus, EXPIRING_SOON_THRESHOLD_DAYS};
pub use template::{
    all_templates, find_template, popular_templates, template_categories, templates_by_category,
    CertificationTemplate,
};
