//! Request envelope against a mock backend: timeouts, cancellation, status
//! policies, error normalization, and the session cookie.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use folio_admin::envelope::{ApiRequest, RequestBody};
use folio_admin::error::NO_RESPONSE_MESSAGE;
use folio_admin::{AdminConfig, ApiClient, ErrorClass, FormData, HttpMethod, RequestError, StatusPolicy};
use folio_core::cancel::DEFAULT_CANCEL_REASON;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{body_json, body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHORT: Duration = Duration::from_millis(100);

fn client(server: &MockServer) -> ApiClient {
    let config = AdminConfig::new(&server.uri()).unwrap().with_timeouts(SHORT, SHORT);
    ApiClient::new(&config).unwrap()
}

fn get(path: &str) -> ApiRequest {
    ApiRequest::new(HttpMethod::Get, path, SHORT)
}

#[tokio::test]
async fn data_envelope_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/hero/get-hero-content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "data": {"_id": "h1", "title": "Hello"}
        })))
        .mount(&server)
        .await;

    let response = client(&server)
        .execute(get("/api/v1/hero/get-hero-content"), &Default::default())
        .await
        .unwrap();
    let hero: Value = response.into_data().unwrap();

    assert_eq!(hero, json!({"_id": "h1", "title": "Hello"}));
}

#[tokio::test]
async fn bare_body_is_decoded_without_data_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/services/get-all-services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"_id": "s1"}, {"_id": "s2"}])))
        .mount(&server)
        .await;

    let response = client(&server)
        .execute(get("/api/v1/services/get-all-services"), &Default::default())
        .await
        .unwrap();
    let services: Vec<Value> = response.into_data().unwrap();

    assert_eq!(services.len(), 2);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let error = client(&server)
        .execute(get("/slow"), &Default::default())
        .await
        .unwrap_err();

    assert_eq!(error, RequestError::Timeout { after: SHORT });
    assert_eq!(error.class(), ErrorClass::Timeout);
}

#[tokio::test]
async fn cancel_handle_aborts_in_flight_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let api = client(&server);
    let request = ApiRequest::new(HttpMethod::Get, "/slow", Duration::from_secs(5));
    let (pending, handle) = api.send(request);
    let task = tokio::spawn(pending);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(handle.cancel());

    let error = task.await.unwrap().unwrap_err();
    assert_eq!(error.class(), ErrorClass::Cancelled);
    assert_eq!(error.normalize("Failed to load"), DEFAULT_CANCEL_REASON);
    assert!(!handle.cancel());
}

#[tokio::test]
async fn cancel_after_settlement_is_refused() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let (pending, handle) = client(&server).send(get("/fast"));
    let response = pending.await.unwrap();

    assert_eq!(response.status, 204);
    assert_eq!(response.body, Value::Null);
    assert!(!handle.cancel());
    assert!(!handle.cancel_with("too late"));
}

#[tokio::test]
async fn status_error_uses_body_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/get-projectp9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not found"})))
        .mount(&server)
        .await;

    let error = client(&server)
        .execute(get("/api/v1/projects/get-projectp9"), &Default::default())
        .await
        .unwrap_err();

    assert!(matches!(error, RequestError::Status { status: 404, .. }));
    assert_eq!(error.normalize("Failed to get project by id"), "Not found");
}

#[tokio::test]
async fn status_error_without_message_uses_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let error = client(&server)
        .execute(get("/broken"), &Default::default())
        .await
        .unwrap_err();

    assert_eq!(error.class(), ErrorClass::Status);
    assert_eq!(error.normalize("Failed to load"), "Internal Server Error");
}

#[tokio::test]
async fn client_errors_pass_lenient_policy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/conatct/send-message"))
        .and(body_json(json!({"name": "Ada"})))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"message": "Invalid email"})))
        .mount(&server)
        .await;

    let request = ApiRequest::new(HttpMethod::Post, "/api/v1/conatct/send-message", SHORT)
        .body(RequestBody::Json(json!({"name": "Ada"})))
        .policy(StatusPolicy::BelowServerError);
    let response = client(&server).execute(request, &Default::default()).await.unwrap();

    assert_eq!(response.status, 422);
    assert_eq!(response.message(), Some("Invalid email"));
}

#[tokio::test]
async fn server_errors_fail_lenient_policy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/conatct/send-message"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let request = ApiRequest::new(HttpMethod::Post, "/api/v1/conatct/send-message", SHORT)
        .body(RequestBody::Json(json!({})))
        .policy(StatusPolicy::BelowServerError);
    let error = client(&server).execute(request, &Default::default()).await.unwrap_err();

    assert!(matches!(error, RequestError::Status { status: 503, .. }));
}

#[tokio::test]
async fn unreachable_backend_reports_no_response() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = AdminConfig::new(&format!("http://127.0.0.1:{port}"))
        .unwrap()
        .with_timeouts(Duration::from_secs(2), Duration::from_secs(2));
    let api = ApiClient::new(&config).unwrap();

    let error = api
        .execute(
            ApiRequest::new(HttpMethod::Get, "/anything", Duration::from_secs(2)),
            &Default::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(error.class(), ErrorClass::Network);
    assert_eq!(error.normalize("Failed to load"), NO_RESPONSE_MESSAGE);
}

#[tokio::test]
async fn multipart_body_is_sent_as_form_data() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/education/update-education-detailse1"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"school\""))
        .and(body_string_contains("MIT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"_id": "e1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let request = ApiRequest::new(HttpMethod::Put, "/api/v1/education/update-education-detailse1", SHORT)
        .body(RequestBody::Multipart(FormData::new().text("school", "MIT")));
    let response = client(&server).execute(request, &Default::default()).await.unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn session_cookie_is_replayed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/admin/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc123; Path=/; HttpOnly")
                .set_body_json(json!({"data": {"user": {"_id": "u1"}}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/get-admin-user"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"user": {"_id": "u1"}}})))
        .mount(&server)
        .await;

    let api = client(&server);
    let login = ApiRequest::new(HttpMethod::Post, "/api/v1/admin/login", SHORT)
        .body(RequestBody::Json(json!({"email": "a@b.c", "password": "pw"})));
    api.execute(login, &Default::default()).await.unwrap();

    let whoami = api
        .clone()
        .execute(get("/api/v1/admin/get-admin-user"), &Default::default())
        .await
        .unwrap();

    assert_eq!(whoami.body["data"]["user"]["_id"], "u1");
}
