mod helpers;

use certification_tracker_api::{
    certification::{
        create_certification::CreateCertificationUseCase,
        create_certification_from_template::CreateCertificationFromTemplateUseCase,
        deactivate_certification::DeactivateCertificationUseCase,
        delete_certification::DeleteCertificationUseCase,
        get_certification::GetCertificationUseCase,
        list_certifications::{ListCertificationsUseCase, StatusFilter},
        update_certification::UpdateCertificationUseCase,
    },
    execute,
    reminder::get_certification_reminders::GetCertificationRemindersUseCase,
    TrackerError,
};
use certification_tracker_domain::{
    CertificationChanges, CertificationStatus, InvalidRecord, ReminderId, ID, MILLIS_PER_DAY,
};
use helpers::{
    setup::{spawn_app, NOW},
    utils::{days_from_today, new_certification},
};

#[tokio::test]
async fn test_create_and_get_certification() {
    let app = spawn_app().await;
    let cert = execute(
        CreateCertificationUseCase {
            certification: new_certification("Security+", Some(10)),
        },
        &app.ctx,
    )
    .await
    .expect("To create certification");

    let res = execute(
        GetCertificationUseCase {
            certification_id: cert.id,
        },
        &app.ctx,
    )
    .await
    .expect("To get certification");
    assert_eq!(res.status, CertificationStatus::ExpiringSoon(10));
    assert_eq!(res.status_text, "Expires in 10 days");

    // Only the 7 day reminder of the default offsets is still in the future
    let reminders = execute(
        GetCertificationRemindersUseCase {
            certification_id: cert.id,
        },
        &app.ctx,
    )
    .await
    .unwrap();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].id, ReminderId::new(&cert.id, 7));
    assert_eq!(reminders[0].fire_at, NOW + 3 * MILLIS_PER_DAY);
    assert_eq!(app.notifier.pending().len(), 1);

    app.application.stop();
}

#[tokio::test]
async fn test_certification_without_expiration_never_reminds() {
    let app = spawn_app().await;
    let cert = execute(
        CreateCertificationUseCase {
            certification: new_certification("Network+", None),
        },
        &app.ctx,
    )
    .await
    .unwrap();

    let res = execute(
        GetCertificationUseCase {
            certification_id: cert.id,
        },
        &app.ctx,
    )
    .await
    .unwrap();
    assert_eq!(res.status, CertificationStatus::Active(None));
    assert!(app.notifier.pending().is_empty());

    app.application.stop();
}

#[tokio::test]
async fn test_update_moves_reminders() {
    let app = spawn_app().await;
    let mut certification = new_certification("CySA+", Some(10));
    certification.reminder_offsets = Some(vec![14, 7, 1]);
    let cert = execute(CreateCertificationUseCase { certification }, &app.ctx)
        .await
        .unwrap();
    let fire_ats = app
        .notifier
        .pending()
        .iter()
        .map(|n| n.fire_at)
        .collect::<Vec<_>>();
    assert_eq!(
        fire_ats,
        vec![NOW + 3 * MILLIS_PER_DAY, NOW + 9 * MILLIS_PER_DAY]
    );

    execute(
        UpdateCertificationUseCase {
            certification_id: cert.id,
            changes: CertificationChanges {
                expiration_date: Some(Some(days_from_today(5))),
                reminder_offsets: Some(vec![90, 30, 1]),
                ..Default::default()
            },
        },
        &app.ctx,
    )
    .await
    .unwrap();

    let pending = app.notifier.pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].reminder_id, ReminderId::new(&cert.id, 1));
    assert_eq!(pending[0].fire_at, NOW + 4 * MILLIS_PER_DAY);

    app.application.stop();
}

#[tokio::test]
async fn test_deactivate_and_delete() {
    let app = spawn_app().await;
    let first = execute(
        CreateCertificationUseCase {
            certification: new_certification("A+", Some(100)),
        },
        &app.ctx,
    )
    .await
    .unwrap();
    let second = execute(
        CreateCertificationUseCase {
            certification: new_certification("Linux+", Some(200)),
        },
        &app.ctx,
    )
    .await
    .unwrap();
    assert_eq!(app.notifier.pending().len(), 8);

    execute(
        DeactivateCertificationUseCase {
            certification_id: first.id,
        },
        &app.ctx,
    )
    .await
    .unwrap();
    assert_eq!(app.notifier.pending().len(), 4);
    let listed = execute(ListCertificationsUseCase::default(), &app.ctx)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].certification.id, second.id);

    execute(
        DeleteCertificationUseCase {
            certification_id: second.id,
        },
        &app.ctx,
    )
    .await
    .unwrap();
    assert!(app.notifier.pending().is_empty());
    assert!(app
        .ctx
        .repos
        .reminders
        .find_by_certification(&second.id)
        .await
        .unwrap()
        .is_empty());

    app.application.stop();
}

#[tokio::test]
async fn test_create_from_template_and_filter() {
    let app = spawn_app().await;
    execute(
        CreateCertificationFromTemplateUseCase {
            template_id: "aws-saa".into(),
            issue_date: days_from_today(-1200),
            certification_number: None,
        },
        &app.ctx,
    )
    .await
    .unwrap();
    execute(
        CreateCertificationFromTemplateUseCase {
            template_id: "csm".into(),
            issue_date: days_from_today(-10),
            certification_number: None,
        },
        &app.ctx,
    )
    .await
    .unwrap();

    let expired = execute(
        ListCertificationsUseCase {
            status: Some(StatusFilter::Expired),
        },
        &app.ctx,
    )
    .await
    .unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].certification.issuing_organization, "Amazon Web Services");

    app.application.stop();
}

#[tokio::test]
async fn test_errors_map_to_tracker_errors() {
    let app = spawn_app().await;

    let err: TrackerError = execute(
        CreateCertificationUseCase {
            certification: new_certification("", Some(10)),
        },
        &app.ctx,
    )
    .await
    .unwrap_err()
    .into();
    assert_eq!(err, TrackerError::InvalidRecord(InvalidRecord::EmptyName));

    let err: TrackerError = execute(
        GetCertificationUseCase {
            certification_id: ID::new(),
        },
        &app.ctx,
    )
    .await
    .unwrap_err()
    .into();
    assert!(matches!(err, TrackerError::NotFound(_)));

    app.application.stop();
}

#[tokio::test]
async fn test_status_counts_calendar_days_whatever_the_time_of_day() {
    let app = spawn_app().await;
    let today = execute(
        CreateCertificationUseCase {
            certification: new_certification("A+", Some(0)),
        },
        &app.ctx,
    )
    .await
    .unwrap();
    let in_30_days = execute(
        CreateCertificationUseCase {
            certification: new_certification("Linux+", Some(30)),
        },
        &app.ctx,
    )
    .await
    .unwrap();

    let hour = 60 * 60 * 1000;
    for time_of_day in &[9 * hour, 24 * hour - 60 * 1000] {
        app.sys.set_timestamp_millis(NOW + time_of_day);
        let expiring = execute(
            ListCertificationsUseCase {
                status: Some(StatusFilter::ExpiringSoon),
            },
            &app.ctx,
        )
        .await
        .unwrap();
        assert_eq!(expiring.len(), 2);
        let status_of = |id: ID| {
            expiring
                .iter()
                .find(|c| c.certification.id == id)
                .map(|c| c.status)
        };
        assert_eq!(status_of(today.id), Some(CertificationStatus::ExpiringSoon(0)));
        assert_eq!(status_of(in_30_days.id), Some(CertificationStatus::ExpiringSoon(30)));
    }

    app.sys.set_timestamp_millis(NOW + MILLIS_PER_DAY);
    let expired = execute(
        ListCertificationsUseCase {
            status: Some(StatusFilter::Expired),
        },
        &app.ctx,
    )
    .await
    .unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].certification.id, today.id);

    app.application.stop();
}
