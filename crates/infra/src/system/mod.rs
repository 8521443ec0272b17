use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

// Mocking out time so that it is possible to run tests that depend on time.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// System that gets the real time and is used when not testing
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// System with a clock that only moves when told to
pub struct StaticTimeSys {
    timestamp_millis: AtomicI64,
}

impl StaticTimeSys {
    pub fn new(timestamp_millis: i64) -> Self {
        Self {
            timestamp_millis: AtomicI64::new(timestamp_millis),
        }
    }

    pub fn set_timestamp_millis(&self, timestamp_millis: i64) {
        self.timestamp_millis.store(timestamp_millis, Ordering::SeqCst);
    }

    pub fn advance_millis(&self, millis: i64) {
        self.timestamp_millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl ISys for StaticTimeSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.timestamp_millis.load(Ordering::SeqCst)
    }
}
