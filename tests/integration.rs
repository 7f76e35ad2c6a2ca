use chrono::{NaiveDate, NaiveDateTime};
use commdesk::store::{AnyStore, BackendConfig, InMemoryRequestStore, LatencyConfig, StoreConfig};
use commdesk::{
    Characteristic, CommdeskError, EvaluationInput, RequestFilter, RequestInput, RequestKind,
    RequestStatus, RequestStore, Requester, SatisfactionLevel, ScheduleRule, StatusUpdate,
};
use std::sync::Arc;

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    // March 2024: the 4th is a Monday
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn requester(id: &str) -> Requester {
    Requester {
        id: id.to_string(),
        name: format!("Servidor {}", id),
        email: format!("servidor{}@example.org", id),
    }
}

fn coverage_on(event: NaiveDateTime) -> RequestInput {
    let mut input = RequestInput::new(RequestKind::Coverage, "6299887766");
    input.event_date = Some(event);
    input.event_description = Some("Colação de grau".to_string());
    input.event_location = Some("Auditório central".to_string());
    input.manager_approved = Some(true);
    input
}

fn survey(satisfaction: SatisfactionLevel) -> EvaluationInput {
    EvaluationInput {
        on_time: true,
        met_expectations: true,
        satisfaction,
        characteristics: vec![Characteristic::Objective, Characteristic::Creative],
        other_characteristics: None,
    }
}

fn demo_store() -> AnyStore {
    AnyStore::from_config(&StoreConfig {
        backend: BackendConfig::InMemory {
            latency: LatencyConfig::none(),
            sample_data: true,
        },
    })
}

#[test_log::test(tokio::test)]
async fn test_full_lifecycle_from_submission_to_evaluation() {
    let store = demo_store();
    let rule = ScheduleRule::default();

    // Submitted Monday 08:00 for Tuesday 09:00: 25 hours ahead, inside hours
    let request = coverage_on(at(5, 9, 0))
        .submit(requester("77"), at(4, 8, 0), &rule, &store)
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::AwaitingService);
    assert_eq!(store.list().await.unwrap().len(), 6);

    let queue = store
        .list_filtered(&RequestFilter {
            status: Some(RequestStatus::AwaitingService),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(queue.iter().any(|r| r.id == request.id));

    let in_progress = request.resolve(StatusUpdate::InProgress, &store).await.unwrap();
    let completed = in_progress
        .resolve(
            StatusUpdate::Completed {
                completion_link: Some("https://example.org/galeria/colacao".to_string()),
                resolution_attachments: vec![],
            },
            &store,
        )
        .await
        .unwrap();
    assert_eq!(completed.status, RequestStatus::Completed);
    assert!(completed.awaits_evaluation());

    let evaluation = completed
        .clone()
        .evaluate(survey(SatisfactionLevel::Satisfied), &store)
        .await
        .unwrap();

    let stored = store.get(&completed.id).await.unwrap().unwrap();
    assert_eq!(stored.evaluation.as_ref(), Some(&evaluation));
    assert!(!stored.awaits_evaluation());

    let evaluated = store
        .list_filtered(&RequestFilter {
            evaluated: Some(true),
            kind: Some(RequestKind::Coverage),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(evaluated.len(), 1);
    assert_eq!(store.list_evaluations().await.unwrap(), vec![evaluation]);

    // The workflow refuses a second survey; the store would overwrite
    let err = stored
        .evaluate(survey(SatisfactionLevel::NotSatisfied), &store)
        .await
        .unwrap_err();
    assert!(matches!(err, CommdeskError::InvalidState(..)));

    let replaced = store
        .attach_evaluation(&completed.id, survey(SatisfactionLevel::NotSatisfied))
        .await
        .unwrap();
    let evaluations = store.list_evaluations().await.unwrap();
    assert_eq!(evaluations.len(), 1);
    assert_eq!(evaluations[0].id, replaced.id);
    assert_eq!(evaluations[0].satisfaction, SatisfactionLevel::NotSatisfied);
}

async fn submit_coverage(
    store: &InMemoryRequestStore,
    rule: &ScheduleRule,
    event: NaiveDateTime,
    now: NaiveDateTime,
) -> commdesk::Result<commdesk::Request> {
    coverage_on(event).submit(requester("1"), now, rule, store).await
}

#[test_log::test(tokio::test)]
async fn test_scheduling_rule_boundaries() {
    let store = InMemoryRequestStore::new(LatencyConfig::none());
    let rule = ScheduleRule::default();

    // Saturday
    let err = submit_coverage(&store, &rule, at(9, 10, 0), at(4, 8, 0))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("weekend"), "{err}");

    // Lunch break and the exclusive end of each window
    for event in [at(6, 12, 0), at(6, 18, 0), at(6, 13, 59)] {
        let err = submit_coverage(&store, &rule, event, at(4, 8, 0))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("business hours"), "{err}");
    }

    // Window starts are inclusive
    submit_coverage(&store, &rule, at(6, 8, 0), at(4, 8, 0)).await.unwrap();
    submit_coverage(&store, &rule, at(6, 14, 0), at(4, 8, 0)).await.unwrap();

    // Exactly twelve hours ahead passes, one minute less does not
    submit_coverage(&store, &rule, at(5, 8, 0), at(4, 20, 0)).await.unwrap();
    let err = submit_coverage(&store, &rule, at(5, 8, 0), at(4, 20, 1))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("12 hours"), "{err}");

    // Friday afternoon for Monday morning: the weekend counts as lead time
    submit_coverage(&store, &rule, at(11, 8, 0), at(8, 17, 0)).await.unwrap();

    assert_eq!(store.len(), 4);
}

#[test_log::test(tokio::test)]
async fn test_publicity_is_not_scheduled_but_form_is_checked() {
    let store = InMemoryRequestStore::new(LatencyConfig::none());
    let rule = ScheduleRule::default();

    let mut input = RequestInput::new(RequestKind::Publicity, "6299887766");
    input.manager_approved = Some(false);
    input.message = Some("Inscrições abertas".to_string());
    // Sunday night publication, submitted one minute before
    input.publication_date = Some(at(10, 23, 0));
    input
        .clone()
        .submit(requester("1"), at(10, 22, 59), &rule, &store)
        .await
        .unwrap();

    let mut unanswered = input.clone();
    unanswered.manager_approved = None;
    let err = unanswered
        .submit(requester("1"), at(10, 22, 59), &rule, &store)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let mut undated = input;
    undated.publication_date = None;
    assert!(
        undated
            .submit(requester("1"), at(10, 22, 59), &rule, &store)
            .await
            .unwrap_err()
            .is_validation()
    );

    assert_eq!(store.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_my_requests_and_withdrawal() {
    let store = demo_store();
    let rule = ScheduleRule::default();

    let mine = coverage_on(at(7, 15, 0))
        .submit(requester("9"), at(4, 8, 0), &rule, &store)
        .await
        .unwrap();

    let filter = RequestFilter {
        requester_id: Some("9".to_string()),
        ..Default::default()
    };
    assert_eq!(store.list_filtered(&filter).await.unwrap().len(), 1);

    mine.clone().withdraw(&store).await.unwrap();
    assert!(store.list_filtered(&filter).await.unwrap().is_empty());

    // Already gone
    let err = mine.withdraw(&store).await.unwrap_err();
    assert!(matches!(err, CommdeskError::RequestNotFound(_)));

    // Demo request "2" was rejected and cannot be withdrawn
    let rejected = store
        .get(&commdesk::RequestId::from("2"))
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(
        rejected.withdraw(&store).await.unwrap_err(),
        CommdeskError::InvalidState(..)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_updates_with_latency() {
    let store = Arc::new(InMemoryRequestStore::with_sample_data(LatencyConfig::default()));
    let id = commdesk::RequestId::from("4");

    let (first, second) = tokio::join!(
        store.update_status(&id, StatusUpdate::InProgress),
        store.update_status(
            &id,
            StatusUpdate::Completed {
                completion_link: Some("https://example.org/post".to_string()),
                resolution_attachments: vec![],
            },
        ),
    );
    assert!(first.unwrap().is_some());
    assert!(second.unwrap().is_some());

    // One write wins whole; the loser leaves no trace of its fields
    let stored = store.get(&id).await.unwrap().unwrap();
    match stored.status {
        RequestStatus::Completed => {
            assert_eq!(stored.completion_link.as_deref(), Some("https://example.org/post"))
        }
        RequestStatus::InProgress => assert_eq!(stored.completion_link, None),
        other => panic!("unexpected status: {other}"),
    }
}
