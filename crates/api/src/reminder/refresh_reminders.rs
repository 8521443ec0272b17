use super::{
    deliver_due_reminders::DeliverDueRemindersUseCase,
    sync_certification_reminders::SyncCertificationRemindersUseCase,
};
use crate::{
    error::TrackerError,
    shared::usecase::{execute, UseCase},
};
use certification_tracker_infra::TrackerContext;
use futures::future;
use tracing::error;

/// Reconciles the reminders of every active certification.
///
/// Reminders are only reconciled when a certification changes, so this is
/// what cancels reminders whose time passed while nothing was delivering them.
#[derive(Debug)]
pub struct RefreshRemindersUseCase;

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for TrackerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::StoreUnavailable,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct RefreshSummary {
    /// Due reminders delivered before reconciling
    pub delivered: usize,
    pub synced: usize,
    pub failed: usize,
    pub created: usize,
    pub cancelled: usize,
}

#[async_trait::async_trait]
impl UseCase for RefreshRemindersUseCase {
    type Response = RefreshSummary;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        let mut summary = RefreshSummary::default();

        // Reconciling cancels every reminder firing before now, so whatever
        // is due has to be delivered first
        match execute(DeliverDueRemindersUseCase, ctx).await {
            Ok(delivered) => summary.delivered = delivered.len(),
            Err(e) => error!(
                "Unable to deliver due reminders before refreshing. Err: {:?}",
                e
            ),
        }

        let certifications = ctx.repos.certifications.find_active().await.map_err(|e| {
            error!("Unable to get active certifications. Err: {:?}", e);
            UseCaseError::StorageError
        })?;

        let results = future::join_all(certifications.iter().map(|certification| {
            execute(
                SyncCertificationRemindersUseCase {
                    certification_id: certification.id,
                },
                ctx,
            )
        }))
        .await;

        for res in results {
            match res {
                Ok(diff) => {
                    summary.synced += 1;
                    summary.created += diff.to_create.len();
                    summary.cancelled += diff.to_cancel.len();
                }
                Err(_) => summary.failed += 1,
            }
        }

        Ok(summary)
    }
}
