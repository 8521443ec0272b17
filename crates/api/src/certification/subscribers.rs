use super::{
    create_certification::CreateCertificationUseCase,
    create_certification_from_template::CreateCertificationFromTemplateUseCase,
    deactivate_certification::DeactivateCertificationUseCase,
    update_certification::UpdateCertificationUseCase,
};
use crate::{
    reminder::sync_certification_reminders::SyncCertificationRemindersUseCase,
    shared::usecase::{execute, Subscriber},
};
use certification_tracker_domain::CertificationRecord;
use certification_tracker_infra::TrackerContext;

async fn sync_reminders(certification: &CertificationRecord, ctx: &TrackerContext) {
    let sync_reminders = SyncCertificationRemindersUseCase {
        certification_id: certification.id,
    };

    // Sideeffect, ignore result. The refresh job retries failed syncs.
    let _ = execute(sync_reminders, ctx).await;
}

pub struct CreateRemindersOnCertificationCreated;

#[async_trait::async_trait]
impl Subscriber<CreateCertificationUseCase> for CreateRemindersOnCertificationCreated {
    async fn notify(&self, e: &CertificationRecord, ctx: &TrackerContext) {
        sync_reminders(e, ctx).await;
    }
}

#[async_trait::async_trait]
impl Subscriber<CreateCertificationFromTemplateUseCase> for CreateRemindersOnCertificationCreated {
    async fn notify(&self, e: &CertificationRecord, ctx: &TrackerContext) {
        sync_reminders(e, ctx).await;
    }
}

pub struct SyncRemindersOnCertificationUpdated;

#[async_trait::async_trait]
impl Subscriber<UpdateCertificationUseCase> for SyncRemindersOnCertificationUpdated {
    async fn notify(&self, e: &CertificationRecord, ctx: &TrackerContext) {
        sync_reminders(e, ctx).await;
    }
}

pub struct CancelRemindersOnCertificationDeactivated;

#[async_trait::async_trait]
impl Subscriber<DeactivateCertificationUseCase> for CancelRemindersOnCertificationDeactivated {
    async fn notify(&self, e: &CertificationRecord, ctx: &TrackerContext) {
        sync_reminders(e, ctx).await;
    }
}
