use commdesk::store::{RemoteConfig, RemoteRequestStore};
use commdesk::{CommdeskError, Method, MockHttpClient, Request, RequestStatus, StatusUpdate};
use serde_json::json;
use std::sync::Arc;

fn stored_request(status: &str) -> serde_json::Value {
    json!({
        "id": "r-100",
        "tipo": "Divulgação",
        "status": status,
        "dataSolicitacao": "2024-03-04T11:00:00.000Z",
        "solicitante": {"id": "7", "nome": "Servidor 7", "email": "servidor7@example.org"},
        "ramal": "4021",
        "dataPublicacao": "2024-03-08T10:00",
        "mensagem": "Semana acadêmica",
        "aprovadoGestor": true,
        "anexos": []
    })
}

fn store(mock: &MockHttpClient) -> RemoteRequestStore<MockHttpClient> {
    RemoteRequestStore::with_client(&RemoteConfig::default(), Arc::new(mock.clone()))
}

#[test_log::test(tokio::test)]
async fn test_resolve_over_http() {
    let mock = MockHttpClient::new();
    let mut completed = stored_request("Concluída");
    completed["linkConclusao"] = json!("https://example.org/noticias/semana");
    mock.respond(Method::Put, "/solicitacoes/r-100/status", 200, completed);
    let store = store(&mock);

    let request: Request = serde_json::from_value(stored_request("Em Andamento")).unwrap();
    let updated = request
        .resolve(
            StatusUpdate::Completed {
                completion_link: Some("https://example.org/noticias/semana".to_string()),
                resolution_attachments: vec![],
            },
            &store,
        )
        .await
        .unwrap();
    assert_eq!(updated.status, RequestStatus::Completed);

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].url,
        "http://localhost:3000/api/solicitacoes/r-100/status"
    );
    assert_eq!(calls[0].bearer, None);
    assert_eq!(
        calls[0].body,
        Some(json!({
            "status": "Concluída",
            "linkConclusao": "https://example.org/noticias/semana"
        }))
    );
}

#[test_log::test(tokio::test)]
async fn test_refused_transitions_never_reach_the_backend() {
    let mock = MockHttpClient::new();
    let store = store(&mock);
    let request: Request = serde_json::from_value(stored_request("Em Andamento")).unwrap();

    let err = request
        .clone()
        .resolve(StatusUpdate::Rejected { reason: None }, &store)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = request.withdraw(&store).await.unwrap_err();
    assert!(matches!(err, CommdeskError::InvalidState(..)));

    assert_eq!(mock.call_count(), 0);
}

#[test_log::test(tokio::test)]
async fn test_withdraw_of_vanished_request() {
    let mock = MockHttpClient::new();
    mock.respond_raw(Method::Delete, "/solicitacoes/r-100", 404, "");
    let store = store(&mock);

    let request: Request =
        serde_json::from_value(stored_request("Aguardando Atendimento")).unwrap();
    let err = request.withdraw(&store).await.unwrap_err();
    assert!(matches!(err, CommdeskError::RequestNotFound(_)));
}

#[test_log::test(tokio::test)]
async fn test_backend_failure_surfaces_message() {
    let mock = MockHttpClient::new();
    mock.respond(
        Method::Put,
        "/solicitacoes/r-100/status",
        409,
        json!({"message": "Solicitação já concluída"}),
    );
    let store = store(&mock);

    let request: Request = serde_json::from_value(stored_request("Em Andamento")).unwrap();
    let err = request
        .resolve(StatusUpdate::InProgress, &store)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Server error (409): Solicitação já concluída"
    );
}
