use crate::helpers::{
    add_service, add_shift, add_worker, assert_error, get_json_response_body,
    manager_session, shift_schema, PostgresTestApp,
};
use chrono::Duration;
use reqwest::StatusCode;
use salon_rota::domain::Role;
use serde_json::json;
use test_context::test_context;

#[test_context(PostgresTestApp)]
#[tokio::test]
async fn should_schedule_and_list_shifts(app: &mut PostgresTestApp) {
    let (_manager, employee) = manager_session(app).await;
    let colour = add_service(app, "Colour").await;

    let response = app
        .post_shift(&json!({
            "employeeId": employee.id.to_string(),
            "date": "2025-01-10",
            "startTime": "21:00",
            "endTime": "05:00",
            "shiftType": "Overtime",
            "notes": "Late colour appointments",
            "breakTime": { "start": "01:00", "end": "02:00", "durationMinutes": 60 },
            "services": [colour]
        }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = get_json_response_body(response).await;
    assert!(jsonschema::is_valid(&shift_schema(), &created));

    let shift_id = created["id"].as_str().unwrap().to_owned();
    let fetched = get_json_response_body(app.get_shift(&shift_id).await).await;
    assert_eq!(fetched, created);
    assert_eq!(fetched["isOvernight"], true);
    assert_eq!(fetched["durationHours"], 7.0);
    assert_eq!(fetched["breakTime"]["start"], "01:00");
    assert_eq!(fetched["services"][0]["name"], "Colour");

    add_shift(app, &employee, "2025-01-11", "09:00", "17:00").await;
    let colleague = add_worker(app, Role::Employee).await;
    add_shift(app, &colleague, "2025-01-10", "09:00", "17:00").await;

    let employee_id = employee.id.to_string();
    let response = app
        .get_shifts(&[
            ("employeeId", employee_id.as_str()),
            ("startDate", "2025-01-10"),
            ("endDate", "2025-01-10"),
        ])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = get_json_response_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], shift_id.as_str());
}

#[test_context(PostgresTestApp)]
#[tokio::test]
async fn should_reject_overlapping_shifts(app: &mut PostgresTestApp) {
    let (_manager, employee) = manager_session(app).await;
    add_shift(app, &employee, "2025-01-10", "09:00", "17:00").await;

    let response = app
        .post_shift(&json!({
            "employeeId": employee.id.to_string(),
            "date": "2025-01-10",
            "startTime": "16:00",
            "endTime": "20:00"
        }))
        .await;
    assert_error(response, StatusCode::BAD_REQUEST, "ShiftConflict").await;

    add_shift(app, &employee, "2025-01-10", "17:00", "20:00").await;
}

#[test_context(PostgresTestApp)]
#[tokio::test]
async fn should_run_the_clock_lifecycle(app: &mut PostgresTestApp) {
    let (manager, employee) = manager_session(app).await;
    let shift_id = add_shift(app, &employee, "2025-01-10", "09:00", "17:00").await;
    app.login_as(&employee);

    let response = app.put_clock(&shift_id, &json!({ "action": "out" })).await;
    assert_error(response, StatusCode::BAD_REQUEST, "NotClockedIn").await;

    let response = app
        .put_clock(&shift_id, &json!({ "action": "in", "location": "Front desk" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    app.clock.advance(Duration::minutes(10));
    let response = app.put_clock(&shift_id, &json!({ "action": "in" })).await;
    assert_error(response, StatusCode::BAD_REQUEST, "AlreadyClockedIn").await;

    let body = get_json_response_body(app.get_shift(&shift_id).await).await;
    assert_eq!(body["clockIn"]["time"], "2025-01-10T08:55:00Z");
    assert_eq!(body["clockIn"]["location"], "Front desk");

    app.clock.advance(Duration::hours(8));
    let response = app.put_clock(&shift_id, &json!({ "action": "out" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = get_json_response_body(response).await;
    assert_eq!(body["status"], "Completed");
    assert_eq!(body["clockOut"]["time"], "2025-01-10T17:05:00Z");

    let response = app.put_clock(&shift_id, &json!({ "action": "out" })).await;
    assert_error(response, StatusCode::BAD_REQUEST, "AlreadyClockedOut").await;

    app.login_as(&manager);
    let response = app.delete_shift(&shift_id).await;
    assert_error(response, StatusCode::BAD_REQUEST, "CannotDeleteCompleted").await;
    let response = app.get_shift(&shift_id).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[test_context(PostgresTestApp)]
#[tokio::test]
async fn should_reject_clock_out_at_clock_in_time(app: &mut PostgresTestApp) {
    let (_manager, employee) = manager_session(app).await;
    let shift_id = add_shift(app, &employee, "2025-01-10", "09:00", "17:00").await;
    app.login_as(&employee);

    let response = app.put_clock(&shift_id, &json!({ "action": "in" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.put_clock(&shift_id, &json!({ "action": "out" })).await;
    assert_error(response, StatusCode::BAD_REQUEST, "ValidationError").await;

    let body = get_json_response_body(app.get_shift(&shift_id).await).await;
    assert_eq!(body["status"], "Scheduled");
    assert!(body["clockOut"].is_null());
}

#[test_context(PostgresTestApp)]
#[tokio::test]
async fn should_apply_status_transitions(app: &mut PostgresTestApp) {
    let (_manager, employee) = manager_session(app).await;
    let cancelled = add_shift(app, &employee, "2025-01-10", "09:00", "13:00").await;
    let missed = add_shift(app, &employee, "2025-01-11", "09:00", "13:00").await;

    let response = app
        .put_shift(&cancelled, &json!({ "status": "Cancelled", "notes": "Closed" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = get_json_response_body(response).await;
    assert_eq!(body["status"], "Cancelled");
    assert_eq!(body["notes"], "Closed");

    let response = app.put_shift(&cancelled, &json!({ "status": "Scheduled" })).await;
    assert_error(response, StatusCode::BAD_REQUEST, "InvalidStatusTransition").await;

    add_shift(app, &employee, "2025-01-10", "10:00", "14:00").await;

    let response = app.put_shift(&missed, &json!({ "status": "No-Show" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.put_shift(&missed, &json!({ "status": "Completed" })).await;
    assert_error(response, StatusCode::BAD_REQUEST, "InvalidStatusTransition").await;

    let response = app.delete_shift(&cancelled).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.get_shift(&cancelled).await;
    assert_error(response, StatusCode::NOT_FOUND, "NotFound").await;
}
