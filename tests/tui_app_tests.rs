use std::time::Duration;

use chrono::{TimeZone, Utc};
use deadlines::api::HttpDeadlineApi;
use deadlines::models::DeadlineId;
use deadlines::timescale::TimeScale;
use deadlines::tui::app::{App, DisplayItem, InputField, InputMode};
use serde_json::json;
use tokio::runtime::Handle;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn settle(app: &mut App<HttpDeadlineApi>) {
    for _ in 0..200 {
        app.drain_completions();
        if !app.is_busy() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    app.refresh_view(Utc::now());
}

async fn server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/deadline/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Old", "description": "done already", "endDate": "2001-01-01T00:00:00.000Z"},
            {"id": 2, "title": "Far", "description": "far away", "endDate": "2999-01-01T00:00:00.000Z"}
        ])))
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_initial_load_groups_by_scale() {
    let server = server().await;
    let mut app = App::new(HttpDeadlineApi::new(server.uri()), Handle::current());
    settle(&mut app).await;

    let headers: Vec<TimeScale> = app
        .display_items
        .iter()
        .filter_map(|item| match item {
            DisplayItem::ScaleHeader(scale, _) => Some(*scale),
            _ => None,
        })
        .collect();
    assert_eq!(headers, TimeScale::ALL.to_vec());
    assert_eq!(app.display_items[0], DisplayItem::ScaleHeader(TimeScale::Finished, 1));
    assert!(matches!(&app.display_items[1], DisplayItem::Deadline(d) if d.id == DeadlineId(1)));
    let empties = app.display_items.iter().filter(|i| **i == DisplayItem::Empty).count();
    assert_eq!(empties, 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_title_shows_notification_and_sends_nothing() {
    let server = server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut app = App::new(HttpDeadlineApi::new(server.uri()), Handle::current());
    settle(&mut app).await;

    app.start_add();
    assert_eq!(app.input_mode, InputMode::Adding);
    app.handle_input(); // empty title
    assert_eq!(app.input_field, InputField::Description);
    app.input_buffer = "something".into();
    app.handle_input();
    app.input_buffer = "tomorrow".into();
    app.handle_input();

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(
        app.notification.as_deref(),
        Some("Empty name: You must set a non-empty name first")
    );
    assert!(!app.is_busy());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_selected_after_confirmation() {
    let server = server().await;
    Mock::given(method("DELETE"))
        .and(path("/api/deadline/delete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = App::new(HttpDeadlineApi::new(server.uri()), Handle::current());
    settle(&mut app).await;

    app.state.select(Some(1));
    assert_eq!(app.selected_deadline().map(|d| d.id), Some(DeadlineId(1)));
    app.delete_selected();
    settle(&mut app).await;

    assert!(app.store.get(DeadlineId(1)).is_none());
    assert_eq!(app.display_items[0], DisplayItem::ScaleHeader(TimeScale::Finished, 0));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_update_changes_nothing() {
    let server = server().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut app = App::new(HttpDeadlineApi::new(server.uri()), Handle::current());
    settle(&mut app).await;
    let before = app.store.deadlines().to_vec();

    app.state.select(Some(1));
    app.start_edit();
    assert_eq!(app.input_mode, InputMode::Editing);
    assert_eq!(app.input_buffer, "Old");
    app.input_buffer = "Renamed".into();
    app.handle_input();
    app.handle_input();
    app.handle_input();
    settle(&mut app).await;

    assert_eq!(app.store.deadlines(), before.as_slice());
    assert_eq!(app.notification, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_title_only_edit_keeps_due_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/deadline/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "title": "Launch", "description": "ship it", "endDate": "2999-01-01T15:30:00.000Z"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/deadline/update"))
        .and(body_json(json!({
            "id": 7,
            "title": "Renamed",
            "description": "ship it",
            "endDate": "2999-01-01T15:30:00.000Z"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = App::new(HttpDeadlineApi::new(server.uri()), Handle::current());
    settle(&mut app).await;
    let before = app.store.get(DeadlineId(7)).unwrap().end_date;

    let row = app
        .display_items
        .iter()
        .position(|item| matches!(item, DisplayItem::Deadline(d) if d.id == DeadlineId(7)))
        .unwrap();
    app.state.select(Some(row));
    app.start_edit();
    app.input_buffer = "Renamed".into();
    app.handle_input();
    app.handle_input();
    app.handle_input();
    settle(&mut app).await;

    let after = app.store.get(DeadlineId(7)).unwrap();
    assert_eq!(after.title, "Renamed");
    assert_eq!(after.end_date, before);
    assert_eq!(after.end_date, Utc.with_ymd_and_hms(2999, 1, 1, 15, 30, 0).unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_second_delete_while_in_flight_is_ignored() {
    let server = server().await;
    Mock::given(method("DELETE"))
        .and(path("/api/deadline/delete"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = App::new(HttpDeadlineApi::new(server.uri()), Handle::current());
    settle(&mut app).await;

    app.state.select(Some(1));
    app.delete_selected();
    app.delete_selected();
    assert!(app.is_busy());

    tokio::time::sleep(Duration::from_millis(50)).await;
    app.drain_completions();
    assert!(app.is_busy());
    assert!(app.store.get(DeadlineId(1)).is_some());

    settle(&mut app).await;
    assert!(!app.is_busy());
    assert!(app.store.get(DeadlineId(1)).is_none());
}
