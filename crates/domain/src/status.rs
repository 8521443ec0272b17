use crate::date::date_in_tz;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Number of days before expiration at which a `CertificationRecord`
/// is considered to be expiring soon. Both ends are inclusive, so a
/// certification expiring today is still expiring soon and not expired.
pub const EXPIRING_SOON_THRESHOLD_DAYS: i64 = 30;

/// The lifecycle state of a `CertificationRecord` at a given point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "daysLeft", rename_all = "camelCase")]
pub enum CertificationStatus {
    /// Either never expires (`None`) or expires in more than
    /// `EXPIRING_SOON_THRESHOLD_DAYS` days
    Active(Option<i64>),
    ExpiringSoon(i64),
    Expired,
}

impl CertificationStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    pub fn is_expiring_soon(&self) -> bool {
        matches!(self, Self::ExpiringSoon(_))
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }

    pub fn days_left(&self) -> Option<i64> {
        match self {
            Self::Active(days_left) => *days_left,
            Self::ExpiringSoon(days_left) => Some(*days_left),
            Self::Expired => None,
        }
    }

    pub fn text(&self) -> String {
        match self {
            Self::Active(_) => "Active".into(),
            Self::ExpiringSoon(0) => "Expires today".into(),
            Self::ExpiringSoon(1) => "Expires in 1 day".into(),
            Self::ExpiringSoon(days) => format!("Expires in {} days", days),
            Self::Expired => "Expired".into(),
        }
    }
}

/// Calendar days from `today` until `expiration_date`. Negative once the
/// expiration date has passed, 0 for the whole expiration day.
pub fn days_until(today: NaiveDate, expiration_date: NaiveDate) -> i64 {
    (expiration_date - today).num_days()
}

/// Classifies a certification at the instant `now`. Days are counted on the
/// calendar of `tz`, so the time of day at which `now` falls never matters.
pub fn classify(now: i64, expiration_date: Option<NaiveDate>, tz: &Tz) -> CertificationStatus {
    let expiration_date = match expiration_date {
        Some(date) => date,
        None => return CertificationStatus::Active(None),
    };

    let days_left = days_until(date_in_tz(now, tz), expiration_date);
    if days_left < 0 {
        CertificationStatus::Expired
    } else if days_left <= EXPIRING_SOON_THRESHOLD_DAYS {
        CertificationStatus::ExpiringSoon(days_left)
    } else {
        CertificationStatus::Active(Some(days_left))
    }
}
