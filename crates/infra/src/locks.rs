use certification_tracker_domain::ID;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Hands out one async lock per certification so that reminder
/// reconciliations of the same certification never interleave,
/// while different certifications proceed concurrently.
#[derive(Default)]
pub struct CertificationLocks {
    locks: Mutex<HashMap<ID, Arc<AsyncMutex<()>>>>,
}

impl CertificationLocks {
    pub fn new() -> Self {
        Default::default()
    }

    pub async fn lock(&self, certification_id: &ID) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap();
            // Drop locks nobody is holding or waiting for
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(*certification_id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    pub fn len(&self) -> usize {
        self.locks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
