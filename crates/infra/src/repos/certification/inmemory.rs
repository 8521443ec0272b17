use super::{by_expiration, ICertificationRepo};
use crate::repos::shared::inmemory_repo::*;
use crate::system::ISys;
use certification_tracker_domain::{CertificationRecord, ID};
use chrono::NaiveDate;
use std::sync::Arc;

pub struct InMemoryCertificationRepo {
    certifications: std::sync::Mutex<Vec<CertificationRecord>>,
    sys: Arc<dyn ISys>,
}

impl InMemoryCertificationRepo {
    pub fn new(sys: Arc<dyn ISys>) -> Self {
        Self {
            certifications: std::sync::Mutex::new(Vec::new()),
            sys,
        }
    }
}

#[async_trait::async_trait]
impl ICertificationRepo for InMemoryCertificationRepo {
    async fn insert(&self, certification: &CertificationRecord) -> anyhow::Result<()> {
        let now = self.sys.get_timestamp_millis();
        let mut certification = certification.clone();
        certification.created = now;
        certification.updated = now;
        insert(&certification, &self.certifications);
        Ok(())
    }

    async fn save(&self, certification: &CertificationRecord) -> anyhow::Result<()> {
        let created = match find(&certification.id, &self.certifications) {
            Some(existing) => existing.created,
            None => {
                return Err(anyhow::Error::msg(format!(
                    "Certification: {} does not exist",
                    certification.id
                )))
            }
        };
        let mut certification = certification.clone();
        certification.created = created;
        certification.updated = self.sys.get_timestamp_millis();
        save(&certification, &self.certifications);
        Ok(())
    }

    async fn find(&self, certification_id: &ID) -> Option<CertificationRecord> {
        find(certification_id, &self.certifications)
    }

    async fn find_active(&self) -> anyhow::Result<Vec<CertificationRecord>> {
        let mut certifications = find_by(&self.certifications, |c| c.is_active);
        certifications.sort_by(by_expiration);
        Ok(certifications)
    }

    async fn find_expiring_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<CertificationRecord>> {
        let mut certifications = find_by(&self.certifications, |c| {
            c.is_active
                && c.expiration_date
                    .map(|date| date >= start && date <= end)
                    .unwrap_or(false)
        });
        certifications.sort_by(by_expiration);
        Ok(certifications)
    }

    async fn delete(&self, certification_id: &ID) -> Option<CertificationRecord> {
        delete(certification_id, &self.certifications)
    }
}
