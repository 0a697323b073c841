//! HTTP contract tests for `ApiClient` against a wiremock backend.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use auction_desk_client::{
    ApiClient, ApiError, AttendeeApi, AttendeeStatus, AttendeeType, BidderNumber,
    CancelAttendeesPayload, ClientConfig, EventId, GuestId, GuestUpsert, RegistrationId,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{bearer_token, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ClientConfig::new(format!("{}/api", server.uri()))).unwrap()
}

fn payload() -> CancelAttendeesPayload {
    CancelAttendeesPayload {
        reason: Some("Event capacity reduced".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn test_assign_posts_number_and_reads_direct_assignment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/gala/guests/guest-a/bidder-number"))
        .and(body_json(json!({ "number": 150 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .assign_bidder_number(
            &EventId::new("gala"),
            &GuestId::new("guest-a"),
            BidderNumber::new(150).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.previous_holder(), None);
}

#[tokio::test]
async fn test_assign_reports_previous_holder_on_swap() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/gala/guests/guest-a/bidder-number"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "previous_holder_id": "guest-b" })),
        )
        .mount(&server)
        .await;

    let response = client_for(&server)
        .assign_bidder_number(
            &EventId::new("gala"),
            &GuestId::new("guest-a"),
            BidderNumber::new(150).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.previous_holder(), Some(&GuestId::new("guest-b")));
}

#[tokio::test]
async fn test_assign_accepts_empty_no_content_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .assign_bidder_number(
            &EventId::new("gala"),
            &GuestId::new("guest-a"),
            BidderNumber::new(999).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.previous_holder(), None);
}

#[tokio::test]
async fn test_backend_error_message_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "detail": "Event is closed" })),
        )
        .mount(&server)
        .await;

    let error = client_for(&server)
        .assign_bidder_number(
            &EventId::new("gala"),
            &GuestId::new("guest-a"),
            BidderNumber::new(150).unwrap(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        error,
        ApiError::Backend {
            status: 409,
            message: Some("Event is closed".to_string()),
        }
    );
}

#[tokio::test]
async fn test_backend_error_without_json_body_has_no_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .cancel_guest(&GuestId::new("guest-c"), &payload())
        .await
        .unwrap_err();

    assert_eq!(error.backend_message(), None);
    assert!(matches!(error, ApiError::Backend { status: 502, .. }));
}

#[tokio::test]
async fn test_cancel_registration_posts_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/registrations/reg-1/cancel"))
        .and(body_json(json!({ "reason": "Event capacity reduced" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .cancel_registration(&RegistrationId::new("reg-1"), &payload())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cancel_guest_sends_delete_with_payload() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/guests/guest-c"))
        .and(body_json(json!({ "reason": "Event capacity reduced" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .cancel_guest(&GuestId::new("guest-c"), &payload())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_attendees_parses_read_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/gala/attendees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "guest-a",
                "attendee_type": "registrant",
                "registration_id": "reg-1",
                "status": "confirmed",
                "bidder_number": 150
            },
            {
                "id": "guest-b",
                "attendee_type": "guest",
                "status": "canceled"
            }
        ])))
        .mount(&server)
        .await;

    let attendees = client_for(&server)
        .list_attendees(&EventId::new("gala"))
        .await
        .unwrap();

    assert_eq!(attendees.len(), 2);
    assert_eq!(attendees[0].attendee_type, AttendeeType::Registrant);
    assert_eq!(attendees[1].status, AttendeeStatus::Cancelled);
}

#[tokio::test]
async fn test_list_attendees_rejects_unexpected_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .list_attendees(&EventId::new("gala"))
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::ResponseParseFailed(_)));
}

#[tokio::test]
async fn test_guest_upserts_use_create_and_patch() {
    let server = MockServer::start().await;
    let guest = GuestUpsert {
        name: "Grace".to_string(),
        email: "grace@example.org".to_string(),
        bidder_number: Some(BidderNumber::new(321).unwrap()),
    };

    Mock::given(method("POST"))
        .and(path("/api/events/gala/guests"))
        .and(body_json(json!({
            "name": "Grace",
            "email": "grace@example.org",
            "bidder_number": 321
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/guests/guest-g"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.create_guest(&EventId::new("gala"), &guest).await.unwrap();
    client.update_guest(&GuestId::new("guest-g"), &guest).await.unwrap();
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .and(bearer_token("desk-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(
        ClientConfig::new(format!("{}/api", server.uri())).with_token("desk-token"),
    )
    .unwrap();
    client.health_check().await.unwrap();
}

#[tokio::test]
async fn test_slow_backend_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = ApiClient::new(
        ClientConfig::new(format!("{}/api", server.uri()))
            .with_timeout(Duration::from_millis(50)),
    )
    .unwrap();

    let error = client.health_check().await.unwrap_err();
    assert_eq!(error, ApiError::Timeout);
    assert_eq!(error.to_string(), "network timeout");
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_failure() {
    // Nothing listens on port 9 (discard) in the test environment
    let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:9/api")).unwrap();
    let error = client.health_check().await.unwrap_err();
    assert!(error.is_transport());
}
