use crate::{
    certification::CertificationRecord,
    date::{format_date, start_of_day_millis},
    shared::entity::{Entity, ID},
};
use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Identifies a `ScheduledReminder`. It is derived from the certification
/// and the offset, so computing the reminders of a certification twice
/// always yields the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReminderId(Uuid);

impl ReminderId {
    pub fn new(certification_id: &ID, offset_days: u32) -> Self {
        Self(Uuid::new_v5(
            certification_id.inner_ref(),
            offset_days.to_string().as_bytes(),
        ))
    }

    pub fn inner_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ReminderId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::fmt::Display for ReminderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `ScheduledReminder` represents a specific time before the expiration
/// of a `CertificationRecord` at which the owner should be notified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReminder {
    pub id: ReminderId,
    /// The `CertificationRecord` this `ScheduledReminder` belongs to
    pub certification_id: ID,
    /// Days before expiration
    pub offset_days: u32,
    /// The timestamp in millis at which the owner should be notified
    pub fire_at: i64,
    /// Set once the notification has been handed over for delivery
    pub delivered: bool,
}

impl ScheduledReminder {
    pub fn new(certification_id: &ID, offset_days: u32, fire_at: i64) -> Self {
        Self {
            id: ReminderId::new(certification_id, offset_days),
            certification_id: *certification_id,
            offset_days,
            fire_at,
            delivered: false,
        }
    }
}

impl Entity<ReminderId> for ScheduledReminder {
    fn id(&self) -> &ReminderId {
        &self.id
    }
}

/// The changes needed to bring the existing reminders of a certification
/// in line with what the certification currently asks for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderDiff {
    pub to_create: Vec<ScheduledReminder>,
    pub to_cancel: Vec<ReminderId>,
}

impl ReminderDiff {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_cancel.is_empty()
    }
}

/// Computes the reminders that should exist for the given certification.
/// Reminders that would fire at or before `now` are dropped rather than fired
/// late, so a dormant app does not produce a burst of stale notifications.
pub fn target_reminders(
    certification: &CertificationRecord,
    now: i64,
    tz: &Tz,
) -> Vec<ScheduledReminder> {
    let expiration_date = match certification.expiration_date {
        Some(date) if certification.is_active => date,
        _ => return Vec::new(),
    };

    let mut reminders = certification
        .reminder_offsets
        .iter()
        .filter_map(|offset| {
            // Offsets reaching before the first representable date can never fire
            let fire_date = expiration_date.checked_sub_signed(Duration::days(offset as i64))?;
            Some(ScheduledReminder::new(
                &certification.id,
                offset,
                start_of_day_millis(fire_date, tz),
            ))
        })
        .filter(|reminder| reminder.fire_at > now)
        .collect::<Vec<_>>();
    reminders.sort_by_key(|reminder| reminder.fire_at);
    reminders
}

/// Diffs the reminders a certification should have against the `existing` ones.
///
/// Reminders present in both are left alone, which makes reconciling
/// idempotent. When a reminder with the same id exists but fires at another
/// time, e.g. because the expiration date moved, it is cancelled and recreated.
pub fn reconcile(
    certification: &CertificationRecord,
    existing: &[ScheduledReminder],
    now: i64,
    tz: &Tz,
) -> ReminderDiff {
    let target = target_reminders(certification, now, tz);
    let target_by_id = target
        .iter()
        .map(|reminder| (reminder.id, reminder))
        .collect::<HashMap<_, _>>();
    let existing_by_id = existing
        .iter()
        .map(|reminder| (reminder.id, reminder))
        .collect::<HashMap<_, _>>();

    let to_cancel = existing
        .iter()
        .filter(|reminder| match target_by_id.get(&reminder.id) {
            Some(target) => target.fire_at != reminder.fire_at,
            None => true,
        })
        .map(|reminder| reminder.id)
        .collect();

    let to_create = target
        .iter()
        .filter(|reminder| match existing_by_id.get(&reminder.id) {
            Some(existing) => existing.fire_at != reminder.fire_at,
            None => true,
        })
        .cloned()
        .collect();

    ReminderDiff {
        to_create,
        to_cancel,
    }
}

/// The content of the notification that is delivered for a `ScheduledReminder`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPayload {
    pub reminder_id: ReminderId,
    pub certification_id: ID,
    pub title: String,
    pub body: String,
    pub days_before_expiration: u32,
    pub expiration_date: Option<String>,
    pub renewal_url: Option<String>,
}

impl ReminderPayload {
    pub fn new(certification: &CertificationRecord, reminder: &ScheduledReminder) -> Self {
        let body = match reminder.offset_days {
            0 => format!("Your {} certification expires today", certification.name),
            1 => format!("Your {} certification expires in 1 day", certification.name),
            days => format!(
                "Your {} certification expires in {} days",
                certification.name, days
            ),
        };
        Self {
            reminder_id: reminder.id,
            certification_id: certification.id,
            title: "Certification Expiring Soon".into(),
            body,
            days_before_expiration: reminder.offset_days,
            expiration_date: certification.expiration_date.as_ref().map(format_date),
            renewal_url: certification.renewal_url.clone(),
        }
    }
}
