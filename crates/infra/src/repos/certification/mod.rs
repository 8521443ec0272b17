mod inmemory;
mod postgres;

use certification_tracker_domain::{CertificationRecord, ID};
use chrono::NaiveDate;
pub use inmemory::InMemoryCertificationRepo;
pub use postgres::PostgresCertificationRepo;

#[async_trait::async_trait]
pub trait ICertificationRepo: Send + Sync {
    /// Stores a new certification, setting its `created` and `updated` timestamps
    async fn insert(&self, certification: &CertificationRecord) -> anyhow::Result<()>;
    /// Updates an existing certification, setting its `updated` timestamp
    async fn save(&self, certification: &CertificationRecord) -> anyhow::Result<()>;
    async fn find(&self, certification_id: &ID) -> Option<CertificationRecord>;
    /// Active certifications ordered by expiration date, never expiring ones last
    async fn find_active(&self) -> anyhow::Result<Vec<CertificationRecord>>;
    /// Active certifications expiring in the inclusive range
    async fn find_expiring_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<CertificationRecord>>;
    async fn delete(&self, certification_id: &ID) -> Option<CertificationRecord>;
}

/// Orders certifications the way `find_active` returns them
pub(crate) fn by_expiration(a: &CertificationRecord, b: &CertificationRecord) -> std::cmp::Ordering {
    match (a.expiration_date, b.expiration_date) {
        (Some(a_date), Some(b_date)) => a_date.cmp(&b_date).then(a.name.cmp(&b.name)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.name.cmp(&b.name),
    }
}
