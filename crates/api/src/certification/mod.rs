pub mod create_certification;
pub mod create_certification_from_template;
pub mod deactivate_certification;
pub mod delete_certification;
pub mod get_certification;
pub mod get_expiring_certifications;
pub mod list_certifications;
pub mod list_templates;
pub mod record_ceu;
mod subscribers;
pub mod update_certification;

use certification_tracker_domain::{CertificationRecord, CertificationStatus};
use chrono_tz::Tz;
use serde::Serialize;

/// A `CertificationRecord` together with what it looks like at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationWithStatus {
    pub certification: CertificationRecord,
    pub status: CertificationStatus,
    pub status_text: String,
    pub ceu_progress: f64,
}

impl CertificationWithStatus {
    pub fn new(certification: CertificationRecord, now: i64, tz: &Tz) -> Self {
        let status = certification.status(now, tz);
        Self {
            status_text: status.text(),
            ceu_progress: certification.ceu_progress(),
            status,
            certification,
        }
    }
}
