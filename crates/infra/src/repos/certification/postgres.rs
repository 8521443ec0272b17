use super::ICertificationRepo;
use certification_tracker_domain::{CertificationRecord, ReminderOffsets, ID};
use chrono::NaiveDate;
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresCertificationRepo {
    pool: PgPool,
}

impl PostgresCertificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CertificationRaw {
    certification_uid: Uuid,
    name: String,
    issuing_organization: String,
    certification_number: Option<String>,
    issue_date: Option<NaiveDate>,
    expiration_date: Option<NaiveDate>,
    renewal_url: Option<String>,
    ceu_url: Option<String>,
    reminder_offsets: Vec<i32>,
    ceu_required: i32,
    ceu_earned: i32,
    is_active: bool,
    created: i64,
    updated: i64,
}

impl From<CertificationRaw> for CertificationRecord {
    fn from(e: CertificationRaw) -> Self {
        let offsets = e
            .reminder_offsets
            .into_iter()
            .map(i64::from)
            .collect::<Vec<_>>();
        Self {
            id: e.certification_uid.into(),
            name: e.name,
            issuing_organization: e.issuing_organization,
            certification_number: e.certification_number,
            issue_date: e.issue_date,
            expiration_date: e.expiration_date,
            renewal_url: e.renewal_url,
            ceu_url: e.ceu_url,
            // The table only accepts non negative offsets
            reminder_offsets: ReminderOffsets::new(&offsets).unwrap_or_default(),
            ceu_required: e.ceu_required.max(0) as u32,
            ceu_earned: e.ceu_earned.max(0) as u32,
            is_active: e.is_active,
            created: e.created,
            updated: e.updated,
        }
    }
}

fn offsets_to_raw(offsets: &ReminderOffsets) -> Vec<i32> {
    offsets.iter().map(|offset| offset as i32).collect()
}

const NOW_MILLIS: &str = "(EXTRACT(EPOCH FROM NOW()) * 1000)::BIGINT";

#[async_trait::async_trait]
impl ICertificationRepo for PostgresCertificationRepo {
    async fn insert(&self, certification: &CertificationRecord) -> anyhow::Result<()> {
        let query = format!(
            r#"
            INSERT INTO certifications
            (certification_uid, name, issuing_organization, certification_number, issue_date,
             expiration_date, renewal_url, ceu_url, reminder_offsets, ceu_required, ceu_earned,
             is_active, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, {now}, {now})
            "#,
            now = NOW_MILLIS
        );
        sqlx::query(&query)
            .bind(certification.id.inner())
            .bind(&certification.name)
            .bind(&certification.issuing_organization)
            .bind(&certification.certification_number)
            .bind(certification.issue_date)
            .bind(certification.expiration_date)
            .bind(&certification.renewal_url)
            .bind(&certification.ceu_url)
            .bind(offsets_to_raw(&certification.reminder_offsets))
            .bind(certification.ceu_required as i32)
            .bind(certification.ceu_earned as i32)
            .bind(certification.is_active)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Unable to insert certification: {:?}. DB returned error: {:?}",
                    certification, e
                );
                e
            })?;
        Ok(())
    }

    async fn save(&self, certification: &CertificationRecord) -> anyhow::Result<()> {
        let query = format!(
            r#"
            UPDATE certifications
            SET name = $2,
            issuing_organization = $3,
            certification_number = $4,
            issue_date = $5,
            expiration_date = $6,
            renewal_url = $7,
            ceu_url = $8,
            reminder_offsets = $9,
            ceu_required = $10,
            ceu_earned = $11,
            is_active = $12,
            updated = {now}
            WHERE certification_uid = $1
            "#,
            now = NOW_MILLIS
        );
        let res = sqlx::query(&query)
            .bind(certification.id.inner())
            .bind(&certification.name)
            .bind(&certification.issuing_organization)
            .bind(&certification.certification_number)
            .bind(certification.issue_date)
            .bind(certification.expiration_date)
            .bind(&certification.renewal_url)
            .bind(&certification.ceu_url)
            .bind(offsets_to_raw(&certification.reminder_offsets))
            .bind(certification.ceu_required as i32)
            .bind(certification.ceu_earned as i32)
            .bind(certification.is_active)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Unable to save certification: {:?}. DB returned error: {:?}",
                    certification, e
                );
                e
            })?;
        if res.rows_affected() == 0 {
            return Err(anyhow::Error::msg(format!(
                "Certification: {} does not exist",
                certification.id
            )));
        }
        Ok(())
    }

    async fn find(&self, certification_id: &ID) -> Option<CertificationRecord> {
        let res: Option<CertificationRaw> = sqlx::query_as(
            r#"
            SELECT * FROM certifications AS c
            WHERE c.certification_uid = $1
            "#,
        )
        .bind(certification_id.inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find certification with id: {:?} failed. DB returned error: {:?}",
                certification_id, e
            );
            e
        })
        .ok()?;
        res.map(|certification| certification.into())
    }

    async fn find_active(&self) -> anyhow::Result<Vec<CertificationRecord>> {
        let certifications: Vec<CertificationRaw> = sqlx::query_as(
            r#"
            SELECT * FROM certifications AS c
            WHERE c.is_active
            ORDER BY c.expiration_date ASC NULLS LAST, c.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(certifications.into_iter().map(|c| c.into()).collect())
    }

    async fn find_expiring_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<CertificationRecord>> {
        let certifications: Vec<CertificationRaw> = sqlx::query_as(
            r#"
            SELECT * FROM certifications AS c
            WHERE c.is_active AND c.expiration_date BETWEEN $1 AND $2
            ORDER BY c.expiration_date ASC, c.name ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(certifications.into_iter().map(|c| c.into()).collect())
    }

    async fn delete(&self, certification_id: &ID) -> Option<CertificationRecord> {
        let res: Option<CertificationRaw> = sqlx::query_as(
            r#"
            DELETE FROM certifications AS c
            WHERE c.certification_uid = $1
            RETURNING *
            "#,
        )
        .bind(certification_id.inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete certification with id: {:?} failed. DB returned error: {:?}",
                certification_id, e
            );
            e
        })
        .ok()?;
        res.map(|certification| certification.into())
    }
}
