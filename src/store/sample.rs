//! Demonstration requests preloaded by the in-memory store on request.

use chrono::{NaiveDate, NaiveDateTime};

use crate::request::{
    Attachment, AttachmentId, Request, RequestId, RequestKind, RequestStatus, Requester,
};

const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.";

fn local(date: (i32, u32, u32), time: (u32, u32, u32)) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(date.0, date.1, date.2)?.and_hms_opt(time.0, time.1, time.2)
}

fn requester() -> Requester {
    Requester {
        id: "123".to_string(),
        name: "USUÁRIO 464578".to_string(),
        email: "usuario@example.org".to_string(),
    }
}

fn publicity(
    id: &str,
    status: RequestStatus,
    submitted: (u32, u32, u32, u32),
    manager_approved: bool,
) -> Option<Request> {
    let (day, hour, minute, second) = submitted;
    Some(Request {
        id: RequestId::from(id),
        kind: RequestKind::Publicity,
        status,
        submitted_at: local((2023, 11, day), (hour, minute, second))?.and_utc(),
        requester: requester(),
        phone_or_chat: "6299887766".to_string(),
        email: Some("usuario@example.org".to_string()),
        publication_date: local((2023, 11, 17), (16, 0, 0)),
        expected_handling_date: None,
        event_date: None,
        message: Some(LOREM.to_string()),
        material_type: None,
        target_audience: None,
        detail: None,
        event_description: None,
        event_location: None,
        participant_count: None,
        members_present: None,
        manager_approved,
        attachments: Vec::new(),
        resolution_attachments: None,
        rejection_reason: None,
        completion_link: None,
        evaluation: None,
    })
}

/// The five requests the demo starts with, one per status plus a second
/// request awaiting service.
pub(crate) fn sample_requests() -> Vec<Request> {
    let mut requests = Vec::new();

    if let Some(mut completed) = publicity("1", RequestStatus::Completed, (17, 18, 32, 1), true) {
        completed.publication_date = local((2023, 11, 21), (14, 21, 0));
        completed.message = Some(format!(
            "{} Praesent mattis sollicitudin elit, sed ultricies nulla tristique quis.",
            LOREM
        ));
        completed.attachments = vec![Attachment {
            id: AttachmentId::from("1"),
            name: "arquivo.jpg".to_string(),
            size: 614_000,
            url: "#".to_string(),
            created_at: completed.submitted_at,
        }];
        completed.resolution_attachments = Some(Vec::new());
        requests.push(completed);
    }

    if let Some(mut rejected) = publicity("2", RequestStatus::Rejected, (16, 20, 8, 26), true) {
        rejected.rejection_reason = Some("Informações insuficientes para divulgação".to_string());
        requests.push(rejected);
    }

    requests.extend(publicity("3", RequestStatus::InProgress, (16, 20, 9, 1), false));
    requests.extend(publicity("4", RequestStatus::AwaitingService, (16, 20, 8, 33), true));

    if let Some(mut artwork) = publicity("5", RequestStatus::AwaitingService, (16, 20, 8, 7), true) {
        artwork.kind = RequestKind::Artwork;
        artwork.phone_or_chat = "6299995555".to_string();
        artwork.publication_date = None;
        artwork.message = None;
        artwork.expected_handling_date = local((2023, 11, 23), (16, 26, 0));
        artwork.material_type = Some("Arte Para Instagram/mapas/diagramas/quadros".to_string());
        artwork.target_audience = Some("Aberto à Sociedade".to_string());
        artwork.detail = Some(LOREM.to_string());
        requests.push(artwork);
    }

    requests
}
