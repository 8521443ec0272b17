mod channel;

pub use channel::{
    IDeliveryChannel, InMemoryDeliveryChannel, LogDeliveryChannel, WebhookDeliveryChannel,
};
use certification_tracker_domain::{ReminderId, ReminderPayload};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};
use tracing::{error, warn};

/// Delivers notifications at a given time.
///
/// Scheduling the same `ReminderId` twice replaces the first notification,
/// and cancelling an unknown `ReminderId` is not an error.
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn schedule_at(
        &self,
        reminder_id: &ReminderId,
        fire_at: i64,
        payload: &ReminderPayload,
    ) -> anyhow::Result<()>;
    /// Also applies to a notification that is being delivered right now:
    /// should that delivery fail it is not retried.
    async fn cancel(&self, reminder_id: &ReminderId) -> anyhow::Result<()>;
    /// Delivers every notification due at `now` and returns the ones that
    /// were delivered. Failed deliveries stay scheduled.
    async fn deliver_due(&self, now: i64) -> Vec<DeliveredNotification>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingNotification {
    pub reminder_id: ReminderId,
    pub fire_at: i64,
    pub payload: ReminderPayload,
}

/// Identifies the exact notification that went out, a `ReminderId` may
/// have been rescheduled for another time while it was being delivered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveredNotification {
    pub reminder_id: ReminderId,
    pub fire_at: i64,
}

#[derive(Default)]
struct NotifierState {
    pending: HashMap<ReminderId, PendingNotification>,
    in_flight: HashSet<ReminderId>,
    cancelled_in_flight: HashSet<ReminderId>,
}

/// Keeps scheduled notifications in process and hands them to a
/// `IDeliveryChannel` once they are due
pub struct LocalNotifier {
    state: Mutex<NotifierState>,
    channel: Arc<dyn IDeliveryChannel>,
}

impl LocalNotifier {
    pub fn new(channel: Arc<dyn IDeliveryChannel>) -> Self {
        Self {
            state: Mutex::new(NotifierState::default()),
            channel,
        }
    }

    pub fn pending(&self) -> Vec<PendingNotification> {
        let mut pending = self
            .state
            .lock()
            .unwrap()
            .pending
            .values()
            .cloned()
            .collect::<Vec<_>>();
        pending.sort_by_key(|n| n.fire_at);
        pending
    }

    fn take_due(&self, now: i64) -> Vec<PendingNotification> {
        let mut state = self.state.lock().unwrap();
        let due_ids = state
            .pending
            .values()
            .filter(|n| n.fire_at <= now)
            .map(|n| n.reminder_id)
            .collect::<Vec<_>>();
        let mut due = Vec::with_capacity(due_ids.len());
        for id in due_ids {
            if let Some(notification) = state.pending.remove(&id) {
                state.in_flight.insert(id);
                due.push(notification);
            }
        }
        due.sort_by_key(|n| n.fire_at);
        due
    }

    /// Returns whether the notification was cancelled while it was delivered
    fn finish_delivery(&self, notification: PendingNotification, delivered: bool) -> bool {
        let mut state = self.state.lock().unwrap();
        let id = notification.reminder_id;
        state.in_flight.remove(&id);
        let cancelled = state.cancelled_in_flight.remove(&id);
        if delivered || cancelled {
            return cancelled;
        }
        // It might have been rescheduled while delivering
        if state.pending.contains_key(&id) {
            warn!(
                "Reminder: {} was rescheduled during a failed delivery, keeping the new one",
                id
            );
        } else {
            state.pending.insert(id, notification);
        }
        cancelled
    }
}

#[async_trait::async_trait]
impl INotifier for LocalNotifier {
    async fn schedule_at(
        &self,
        reminder_id: &ReminderId,
        fire_at: i64,
        payload: &ReminderPayload,
    ) -> anyhow::Result<()> {
        self.state.lock().unwrap().pending.insert(
            *reminder_id,
            PendingNotification {
                reminder_id: *reminder_id,
                fire_at,
                payload: payload.clone(),
            },
        );
        Ok(())
    }

    async fn cancel(&self, reminder_id: &ReminderId) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.pending.remove(reminder_id);
        if state.in_flight.contains(reminder_id) {
            state.cancelled_in_flight.insert(*reminder_id);
        }
        Ok(())
    }

    async fn deliver_due(&self, now: i64) -> Vec<DeliveredNotification> {
        let mut delivered = Vec::new();
        for notification in self.take_due(now) {
            let res = self.channel.deliver(&notification.payload).await;
            let sent = DeliveredNotification {
                reminder_id: notification.reminder_id,
                fire_at: notification.fire_at,
            };
            match res {
                Ok(()) => {
                    self.finish_delivery(notification, true);
                    delivered.push(sent);
                }
                Err(e) => {
                    error!(
                        "Unable to deliver notification for reminder: {}. Err: {:?}",
                        sent.reminder_id, e
                    );
                    if self.finish_delivery(notification, false) {
                        warn!(
                            "Reminder: {} was cancelled during a failed delivery, dropping it",
                            sent.reminder_id
                        );
                    }
                }
            }
        }
        delivered
    }
}
