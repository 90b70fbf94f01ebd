use chrono::{Duration, Local, TimeZone, Utc};
use deadlines::error::ValidationError;
use deadlines::models::*;

#[test]
fn test_validation_order() {
    let when = Some(Utc::now());
    assert_eq!(
        DeadlineDraft::new("", "", None).validate().unwrap_err(),
        ValidationError::EmptyName
    );
    assert_eq!(
        DeadlineDraft::new("t", "", None).validate().unwrap_err(),
        ValidationError::EmptyDescription
    );
    assert_eq!(
        DeadlineDraft::new("t", "d", None).validate().unwrap_err(),
        ValidationError::InvalidDate
    );
    let valid = DeadlineDraft::new("t", "d", when).validate().unwrap();
    assert_eq!(valid.title(), "t");
    assert_eq!(valid.description(), "d");
}

#[test]
fn test_validation_messages() {
    assert_eq!(
        ValidationError::EmptyName.to_string(),
        "Empty name: You must set a non-empty name first"
    );
    assert_eq!(ValidationError::InvalidDate.title(), "Non-valid date");
}

#[test]
fn test_encode_date_is_zero_padded_local_day() {
    let date = Local
        .with_ymd_and_hms(2024, 3, 5, 23, 30, 0)
        .earliest()
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(encode_date_for_sending(date), "2024-03-05");

    let date = Local
        .with_ymd_and_hms(2024, 11, 25, 0, 15, 0)
        .earliest()
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(encode_date_for_sending(date), "2024-11-25");
}

#[test]
fn test_format_date_for_showing() {
    let date = Local
        .with_ymd_and_hms(2024, 6, 3, 12, 0, 0)
        .earliest()
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(format_date_for_showing(date), "Monday, 3rd of June, 2024");

    let date = Local
        .with_ymd_and_hms(2025, 1, 11, 12, 0, 0)
        .earliest()
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(format_date_for_showing(date), "Saturday, 11th of January, 2025");
}

#[test]
fn test_parse_due_quick_picks() {
    let now = Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap();
    assert_eq!(parse_due("today", now), Some(now));
    assert_eq!(parse_due("Tomorrow", now), Some(now + Duration::days(1)));
    assert_eq!(parse_due("3d", now), Some(now + Duration::days(3)));
    assert_eq!(parse_due("in 3 days", now), Some(now + Duration::days(3)));
    assert_eq!(parse_due("week", now), Some(now + Duration::days(7)));
    assert_eq!(parse_due("", now), None);
    assert_eq!(parse_due("someday", now), None);
}

#[test]
fn test_parse_due_oversized_offset_is_rejected() {
    let now = Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap();
    assert_eq!(parse_due("200000000000000d", now), None);
    assert_eq!(parse_due("in 9223372036854775807 days", now), None);
    assert_eq!(parse_due("100000000d", now), None);

    let draft = DeadlineDraft::new("t", "d", parse_due("200000000000000d", now));
    assert_eq!(draft.validate().unwrap_err(), ValidationError::InvalidDate);
}

#[test]
fn test_parse_due_calendar_date_is_local_midnight() {
    let now = Utc::now();
    let expected = Local
        .with_ymd_and_hms(2025, 6, 30, 0, 0, 0)
        .earliest()
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(parse_due("2025-06-30", now), Some(expected));
    assert_eq!(parse_due("2025-13-01", now), None);
}

#[test]
fn test_parse_end_date_formats() {
    let utc = Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap();
    assert_eq!(parse_end_date("2024-06-03T10:00:00.000Z"), Some(utc));
    assert_eq!(parse_end_date("2024-06-03T12:00:00+02:00"), Some(utc));

    let local = Local
        .with_ymd_and_hms(2024, 6, 3, 10, 0, 0)
        .earliest()
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(parse_end_date("2024-06-03T10:00:00"), Some(local));
    assert_eq!(parse_end_date("not a date"), None);
}

#[test]
fn test_deadline_wire_shape() {
    let deadline = Deadline {
        id: DeadlineId(5),
        title: "C".into(),
        description: "D".into(),
        end_date: Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap(),
    };
    let value = serde_json::to_value(&deadline).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"id": 5, "title": "C", "description": "D", "endDate": "2024-06-03T10:00:00.000Z"})
    );
}

#[test]
fn test_format_time_left() {
    let now = Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap();
    assert_eq!(format_time_left(now, now), "Finished");
    assert_eq!(format_time_left(now + Duration::hours(76), now), "3d 4h");
    assert_eq!(format_time_left(now + Duration::hours(5), now), "5h");
    assert_eq!(format_time_left(now + Duration::seconds(20), now), "1m");
}
