//! Store round trips against a mock backend.
//!
//! Each test dispatches a pending operation, lets the slice effect talk to
//! the mock, and checks the state after the settling action was reduced.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use folio_admin::inputs::{JsonBody, LoginInput};
use folio_admin::slices::auth::{self, AuthAction};
use folio_admin::slices::contact::{self, ContactAction};
use folio_admin::slices::education::EducationAction;
use folio_admin::slices::projects::{self, ProjectsAction};
use folio_admin::slices::services::{self, ServicesAction};
use folio_admin::{
    AdminAction, AdminConfig, AdminEnvironment, AdminStore, DispatchError, FormData, admin_store, dispatch,
};
use folio_core::{CancelSignal, Identified, Lifecycle, RecordId};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

fn store_for(server: &MockServer) -> AdminStore {
    let config = AdminConfig::new(&server.uri()).unwrap();
    admin_store(AdminEnvironment::from_config(&config).unwrap())
}

#[tokio::test]
async fn fetch_all_replaces_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/services/get-all-services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"_id": "s1", "title": "Audit"}, {"_id": "s2", "title": "Build"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    dispatch(&store, AdminAction::Services(ServicesAction::FetchAll(Lifecycle::start(()))), WAIT)
        .await
        .unwrap();

    let (count, loading, updated) = store
        .state(|s| {
            (
                s.services.services.len(),
                s.services.status.is_loading(services::keys::FETCH_ALL),
                s.services.status.last_updated.is_some(),
            )
        })
        .await;
    assert_eq!(count, 2);
    assert!(!loading);
    assert!(updated);

    store.shutdown(WAIT).await.unwrap();
}

#[tokio::test]
async fn delete_removes_the_matching_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/services/get-all-services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"_id": "s1"}, {"_id": "s2"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/services/delete-servicess2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    dispatch(&store, AdminAction::Services(ServicesAction::FetchAll(Lifecycle::start(()))), WAIT)
        .await
        .unwrap();
    dispatch(
        &store,
        AdminAction::Services(ServicesAction::Delete(Lifecycle::start(RecordId::from("s2")))),
        WAIT,
    )
    .await
    .unwrap();

    let remaining: Vec<String> = store
        .state(|s| {
            s.services
                .services
                .items()
                .iter()
                .filter_map(|service| service.id().map(ToString::to_string))
                .collect()
        })
        .await;
    assert_eq!(remaining, vec!["s1".to_string()]);
}

#[tokio::test]
async fn create_appends_the_returned_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/education/create-education-details"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"_id": "e1", "school": "MIT"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    dispatch(
        &store,
        AdminAction::Education(EducationAction::Create(Lifecycle::start(
            FormData::new().text("school", "MIT"),
        ))),
        WAIT,
    )
    .await
    .unwrap();

    let school = store
        .state(|s| s.education.education.items().first().and_then(|e| e.get("school")).cloned())
        .await;
    assert_eq!(school, Some(json!("MIT")));
}

#[tokio::test]
async fn rejection_is_recorded_and_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/get-all-projects"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "Database unavailable"})))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let outcome = dispatch(&store, AdminAction::Projects(ProjectsAction::FetchAll(Lifecycle::start(()))), WAIT).await;

    let (slice, key, message) = match outcome {
        Err(DispatchError::Rejected { slice, key, message }) => (slice, key, message),
        other => panic!("expected a rejection, got {other:?}"),
    };
    assert_eq!(slice, projects::SLICE);
    assert_eq!(key, projects::keys::FETCH_ALL);
    assert_eq!(message, "Database unavailable");

    let error = store.state(|s| s.projects.status.error.clone()).await.unwrap();
    assert_eq!(error.message, "Database unavailable");
    assert_eq!(error.action, projects::keys::FETCH_ALL);
    assert!(!store.state(|s| s.projects.status.is_loading(projects::keys::FETCH_ALL)).await);
}

#[tokio::test]
async fn login_then_session_check_uses_the_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/admin/login"))
        .and(body_json(json!({"email": "admin@example.com", "password": "hunter2"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "token=t1; Path=/; HttpOnly")
                .set_body_json(json!({"data": {"user": {"_id": "u1", "email": "admin@example.com"}}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/get-admin-user"))
        .and(wiremock::matchers::header("cookie", "token=t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"user": {"_id": "u1"}}})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    dispatch(
        &store,
        AdminAction::Auth(AuthAction::Login(Lifecycle::start(LoginInput {
            email: "admin@example.com".to_string(),
            password: "hunter2".to_string(),
        }))),
        WAIT,
    )
    .await
    .unwrap();
    dispatch(&store, AdminAction::Auth(AuthAction::CheckAuth(Lifecycle::start(()))), WAIT)
        .await
        .unwrap();

    let (authenticated, user) = store
        .state(|s| (s.auth.is_authenticated, s.auth.user.as_ref().and_then(|u| u.id().cloned())))
        .await;
    assert!(authenticated);
    assert_eq!(user, Some(RecordId::from("u1")));
}

#[tokio::test]
async fn failed_session_check_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/get-admin-user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized"})))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let outcome = dispatch(&store, AdminAction::Auth(AuthAction::CheckAuth(Lifecycle::start(()))), WAIT).await;

    assert!(matches!(outcome, Err(DispatchError::Rejected { key, .. }) if key == auth::keys::CHECK_AUTH));
    let (authenticated, error) = store
        .state(|s| (s.auth.is_authenticated, s.auth.status.error.clone()))
        .await;
    assert!(!authenticated);
    assert!(error.is_none());
}

#[tokio::test]
async fn contact_message_tolerates_client_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/conatct/send-message"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Missing subject"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    dispatch(
        &store,
        AdminAction::Contact(ContactAction::SendContactMessage(Lifecycle::start(JsonBody(
            json!({"name": "Ada", "email": "ada@example.com"}),
        )))),
        WAIT,
    )
    .await
    .unwrap();

    let (loading, error) = store
        .state(|s| {
            (
                s.contact.status.is_loading(contact::keys::SEND_CONTACT_MESSAGE),
                s.contact.status.error.clone(),
            )
        })
        .await;
    assert!(!loading);
    assert!(error.is_none());
}

#[tokio::test]
async fn caller_signal_cancels_the_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/services/get-all-services"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [{"_id": "s1"}]}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    let signal = CancelSignal::new();
    let pending = {
        let store = store.clone();
        let action = AdminAction::Services(ServicesAction::FetchAll(Lifecycle::start_with((), signal.clone())));
        tokio::spawn(async move { dispatch(&store, action, WAIT).await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(signal.cancel_with("view closed"));

    match pending.await.unwrap() {
        Err(DispatchError::Rejected { slice, key, message }) => {
            assert_eq!(slice, services::SLICE);
            assert_eq!(key, services::keys::FETCH_ALL);
            assert_eq!(message, "view closed");
        },
        other => panic!("expected a rejection, got {other:?}"),
    }

    let (loading, error, count) = store
        .state(|s| {
            (
                s.services.status.is_loading(services::keys::FETCH_ALL),
                s.services.status.error.clone(),
                s.services.services.len(),
            )
        })
        .await;
    assert!(!loading);
    assert_eq!(error.unwrap().message, "view closed");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn shutdown_lets_in_flight_operations_settle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/services/get-all-services"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [{"_id": "s1"}, {"_id": "s2"}]}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    store
        .send(AdminAction::Services(ServicesAction::FetchAll(Lifecycle::start(()))))
        .await
        .unwrap();
    assert!(store.state(|s| s.services.status.is_loading(services::keys::FETCH_ALL)).await);

    store.shutdown(WAIT).await.unwrap();

    let (loading, count) = store
        .state(|s| (s.services.status.is_loading(services::keys::FETCH_ALL), s.services.services.len()))
        .await;
    assert!(!loading);
    assert_eq!(count, 2);
}

#[tokio::test]
async fn single_contact_details_document_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/conatct/get-contact-details"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"_id": "c1", "email": "hello@example.com"}
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    dispatch(&store, AdminAction::Contact(ContactAction::GetContactDetails(Lifecycle::start(()))), WAIT)
        .await
        .unwrap();

    let email = store
        .state(|s| s.contact.contact.items().first().and_then(|c| c.get("email")).cloned())
        .await;
    assert_eq!(email, Some(json!("hello@example.com")));
}
