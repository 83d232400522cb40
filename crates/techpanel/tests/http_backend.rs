use std::time::Duration;

use serde_json::{json, Value};
use techpanel::{AdminClient, FormBackend, HttpBackend, ReplaceForm};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> AdminClient {
    AdminClient::new(server.uri(), Duration::from_secs(5))
}

#[tokio::test]
async fn get_success_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getData"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;

    let outcome = client(&server).send_get("/getData", "").await;
    assert!(outcome.success);
    assert_eq!(outcome.response, "hello");
    assert_eq!(outcome.status_code, 200);
    assert_eq!(outcome.status_text, "OK");
}

#[tokio::test]
async fn get_failure_formats_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/internal/admin"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let outcome = client(&server).send_get("/internal/admin", "").await;
    assert!(!outcome.success);
    assert_eq!(outcome.status_code, 404);
    assert_eq!(outcome.status_text, "Not Found");
    assert_eq!(outcome.response_body, "not found");
    assert_eq!(outcome.response, "404 (Not Found): not found");
}

#[tokio::test]
async fn non_200_success_codes_are_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let outcome = client(&server).send_get("/anything", "").await;
    assert!(!outcome.success);
    assert_eq!(outcome.response, "204 (No Content): ");
}

#[tokio::test]
async fn admin_command_encodes_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/internal/admin"))
        .and(query_param("token", "a b&c"))
        .and(query_param("command", "updateSelectData"))
        .respond_with(ResponseTemplate::new(200).set_body_string("updated"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server).admin_command("a b&c", "updateSelectData").await;
    assert!(outcome.success);
    assert_eq!(outcome.response, "updated");
}

#[tokio::test]
async fn post_success_has_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/postDeleteData"))
        .and(body_json(json!({"ID": 5, "initData": "session"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("ignored"))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(client(&server), "session");
    let outcome = backend.delete(5).await;
    assert!(outcome.success);
    assert_eq!(outcome.response, "");
}

#[tokio::test]
async fn post_failure_with_empty_body_uses_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = client(&server).send_post("/postSetData", &json!({})).await;
    assert!(!outcome.success);
    assert_eq!(outcome.response, "500 (Internal Server Error)");
}

#[tokio::test]
async fn post_failure_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("lesson-date is required"))
        .mount(&server)
        .await;

    let outcome = client(&server).send_post("/postSetData", &json!({})).await;
    assert!(!outcome.success);
    assert_eq!(outcome.response, "lesson-date is required");
}

#[tokio::test]
async fn submit_routes_by_id_and_adds_init_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(client(&server), "session");
    let new_form = ReplaceForm {
        group_number: "G-1".into(),
        ..Default::default()
    };
    let edited = ReplaceForm {
        id: Some(12),
        ..new_form.clone()
    };
    assert!(backend.submit(new_form).await.success);
    assert!(backend.submit(edited).await.success);

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);

    assert_eq!(requests[0].url.path(), "/postSetData");
    let first: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(first["group-number"], "G-1");
    assert_eq!(first["initData"], "session");
    assert!(first.get("ID").is_none());

    assert_eq!(requests[1].url.path(), "/postEditData");
    let second: Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(second["ID"], 12);
}

#[tokio::test]
async fn select_data_parses_pascal_case() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getData"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Teachers": ["Ivanova", "Petrov"],
            "Objects": ["Python"],
            "ReplacementFormats": ["Online"],
            "TransfermentFormats": [],
            "TeamLeaders": ["Smirnova"]
        })))
        .mount(&server)
        .await;

    let data = HttpBackend::new(client(&server), "").select_data().await.unwrap();
    assert_eq!(data.teachers, vec!["Ivanova", "Petrov"]);
    assert_eq!(data.options_for("subject"), ["Python".to_string()]);
    assert_eq!(data.team_leaders, vec!["Smirnova"]);
}

#[tokio::test]
async fn history_sends_init_data_and_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getHistoryData"))
        .and(query_param("initData", "user=1&hash=x"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let entries = HttpBackend::new(client(&server), "user=1&hash=x").history().await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn history_entries_keep_timing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getHistoryData"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "ID": 3,
            "group-number": "G-3",
            "subject": "Python",
            "creation-date": "2024-03-01",
            "creation-time": "10:15",
            "remaining-time": "1h 20m"
        }])))
        .mount(&server)
        .await;

    let entries = HttpBackend::new(client(&server), "").history().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].form.id, Some(3));
    assert_eq!(entries[0].form.subject, "Python");
    assert_eq!(entries[0].remaining_time, "1h 20m");
}

#[tokio::test]
async fn failed_select_data_is_a_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let err = HttpBackend::new(client(&server), "").select_data().await.unwrap_err();
    assert!(err.to_string().contains("503 (Service Unavailable): down"));
}
