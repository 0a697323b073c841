//! Desk commands end to end over HTTP against a wiremock backend.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use auction_desk::cli::Command;
use auction_desk::{DeskApp, DeskConfig, NoticeLevel};
use serde_json::json;
use std::path::PathBuf;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(server: &MockServer) -> DeskApp {
    let mut config = DeskConfig::default();
    config.api.base_url = format!("{}/api", server.uri());
    DeskApp::new(config).unwrap()
}

async fn mount_attendees(server: &MockServer, event: &str, attendees: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/events/{event}/attendees")))
        .respond_with(ResponseTemplate::new(200).set_body_json(attendees))
        .mount(server)
        .await;
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("auction-desk-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_assign_swap_raises_warning() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/gala/guests/guest-a/bidder-number"))
        .and(body_json(json!({ "number": 150 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "previous_holder_id": "guest-b" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let report = app_for(&server)
        .run(&Command::Assign {
            event: "gala".to_string(),
            guest: "guest-a".to_string(),
            number: "150".to_string(),
        })
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.notices.len(), 1);
    assert_eq!(report.notices[0].level, NoticeLevel::Warning);
    assert_eq!(
        report.notices[0].message,
        "Bidder number 150 assigned. It was held by guest-b, who has been given a different number"
    );
}

#[tokio::test]
async fn test_assign_out_of_range_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let report = app_for(&server)
        .run(&Command::Assign {
            event: "gala".to_string(),
            guest: "guest-a".to_string(),
            number: "1000".to_string(),
        })
        .await
        .unwrap();

    assert!(!report.success);
    assert_eq!(report.notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_assign_backend_rejection_shown_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/gala/guests/guest-a/bidder-number"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Guest is checked out" })),
        )
        .mount(&server)
        .await;

    let report = app_for(&server)
        .run(&Command::Assign {
            event: "gala".to_string(),
            guest: "guest-a".to_string(),
            number: "150".to_string(),
        })
        .await
        .unwrap();

    assert!(!report.success);
    assert_eq!(report.notices[0].message, "Guest is checked out");
}

#[tokio::test]
async fn test_cancel_reports_partial_failure() {
    let server = MockServer::start().await;
    mount_attendees(
        &server,
        "gala",
        json!([
            { "id": "r-1", "attendee_type": "registrant", "registration_id": "reg-1", "status": "confirmed" },
            { "id": "g-1", "attendee_type": "guest", "status": "confirmed" },
            { "id": "g-2", "attendee_type": "guest", "status": "confirmed" }
        ]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/registrations/reg-1/cancel"))
        .and(body_json(json!({ "reason": "Event full" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/guests/g-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/guests/g-2"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "detail": "Guest already checked in" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let report = app_for(&server)
        .run(&Command::Cancel {
            event: "gala".to_string(),
            reason: Some("Event full".to_string()),
            notes: None,
            attendees: vec![
                "r-1".to_string(),
                "g-1".to_string(),
                "g-2".to_string(),
                "ghost".to_string(),
            ],
        })
        .await
        .unwrap();

    assert!(!report.success);
    assert!(report.lines.contains(&"ghost: not an attendee of gala".to_string()));
    assert!(report.lines.contains(&"g-2: Guest already checked in".to_string()));
    assert_eq!(report.notices.len(), 1);
    assert_eq!(report.notices[0].level, NoticeLevel::Warning);
    assert_eq!(
        report.notices[0].message,
        "Cancelled 2 of 3 attendees. 1 failed: Guest already checked in"
    );
}

#[tokio::test]
async fn test_import_dry_run_reports_plan_only() {
    let server = MockServer::start().await;
    mount_attendees(
        &server,
        "gala",
        json!([
            { "id": "g-1", "attendee_type": "guest", "status": "confirmed",
              "name": "Ada Lovelace", "email": "ada@example.org", "bidder_number": 150 },
            { "id": "g-2", "attendee_type": "guest", "status": "confirmed",
              "name": "Alan Turing", "email": "alan@example.org", "bidder_number": 200 }
        ]),
    )
    .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let file = temp_file(
        "dry-run.json",
        &json!([
            { "name": "Ada Lovelace", "email": "ADA@example.org", "bidder_number": 150 },
            { "name": "Grace Hopper", "email": "grace@example.org", "bidder_number": "200" },
            { "name": "", "email": "nobody@example.org" }
        ])
        .to_string(),
    );

    let report = app_for(&server)
        .run(&Command::Import {
            event: "gala".to_string(),
            file: file.clone(),
            dry_run: true,
        })
        .await
        .unwrap();
    std::fs::remove_file(&file).unwrap();

    assert!(!report.success);
    assert!(report.lines.contains(&"line 3: Name is required".to_string()));
    assert!(report.lines.contains(&"line 1: g-1 unchanged".to_string()));
    assert!(report.lines.contains(
        &"line 2: create Grace Hopper <grace@example.org> with bidder number 200".to_string()
    ));
    assert!(report.lines.contains(
        &"line 2: bidder number 200 is held by g-2 and will be swapped".to_string()
    ));
    assert_eq!(
        report.notices[0].message,
        "Import plan: 1 to create, 0 to update, 1 unchanged, 1 rejected"
    );
}

#[tokio::test]
async fn test_import_warns_only_for_committed_swaps() {
    let server = MockServer::start().await;
    mount_attendees(
        &server,
        "gala",
        json!([
            { "id": "g-2", "attendee_type": "guest", "status": "confirmed",
              "name": "Alan Turing", "email": "alan@example.org", "bidder_number": 200 },
            { "id": "g-3", "attendee_type": "guest", "status": "confirmed",
              "name": "Edsger Dijkstra", "email": "edsger@example.org", "bidder_number": 300 }
        ]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/events/gala/guests"))
        .and(body_partial_json(json!({ "email": "grace@example.org" })))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "message": "Email blocked" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/events/gala/guests"))
        .and(body_partial_json(json!({ "email": "hedy@example.org" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let file = temp_file(
        "commit-swaps.json",
        &json!([
            { "name": "Grace Hopper", "email": "grace@example.org", "bidder_number": 200 },
            { "name": "Hedy Lamarr", "email": "hedy@example.org", "bidder_number": 300 }
        ])
        .to_string(),
    );

    let report = app_for(&server)
        .run(&Command::Import {
            event: "gala".to_string(),
            file: file.clone(),
            dry_run: false,
        })
        .await
        .unwrap();
    std::fs::remove_file(&file).unwrap();

    assert!(!report.success);
    assert!(report.lines.contains(&"line 1: Email blocked".to_string()));
    assert_eq!(report.notices.len(), 2);
    assert_eq!(report.notices[0].level, NoticeLevel::Warning);
    assert_eq!(report.notices[0].message, "Import: 1 succeeded, 1 failed: Email blocked");
    assert_eq!(
        report.notices[1].message,
        "1 bidder number(s) were taken from other attendees"
    );
}
