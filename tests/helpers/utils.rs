use certification_tracker_domain::NewCertification;
use chrono::{Duration, NaiveDate};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd(2024, 3, 1)
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub fn new_certification(name: &str, expires_in_days: Option<i64>) -> NewCertification {
    NewCertification {
        name: name.into(),
        issuing_organization: "CompTIA".into(),
        issue_date: Some(days_from_today(-365)),
        expiration_date: expires_in_days.map(days_from_today),
        ..Default::default()
    }
}
