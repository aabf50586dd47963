use crate::helpers::{
    add_service, add_shift, add_worker, assert_error, get_json_response_body,
    manager_session, shift_schema, TestApp,
};
use reqwest::StatusCode;
use salon_rota::domain::Role;
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_201_for_valid_requests(app: &mut TestApp) {
    let (manager, employee) = manager_session(app).await;
    let colour = add_service(app, "Colour").await;
    let schema = shift_schema();

    let requests = [
        json!({
            "employeeId": employee.id.to_string(),
            "date": "2025-01-10",
            "startTime": "09:00",
            "endTime": "17:00"
        }),
        json!({
            "employeeId": employee.id.to_string(),
            "date": "2025-01-11T00:00:00Z",
            "startTime": "22:00",
            "endTime": "06:00",
            "shiftType": "Overtime",
            "notes": "Late colour appointments",
            "breakTime": { "start": "01:00", "end": "01:30", "durationMinutes": 30 },
            "services": [colour]
        }),
    ];

    for request in requests.iter() {
        let response = app.post_shift(request).await;
        assert_eq!(
            response.status(),
            StatusCode::CREATED,
            "Failed to create new shift: {}",
            request
        );

        let body = get_json_response_body(response).await;
        assert!(
            jsonschema::is_valid(&schema, &body),
            "response does not match schema: {body}"
        );
        assert_eq!(body["employeeId"], employee.id.to_string());
        assert_eq!(body["assignedBy"], manager.id.to_string());
        assert_eq!(body["status"], "Scheduled");
        assert_eq!(body["startTime"], request["startTime"]);
        assert_eq!(body["endTime"], request["endTime"]);
        assert!(body["clockIn"].is_null());
    }

    let overnight = get_json_response_body(app.post_shift(&json!({
        "employeeId": employee.id.to_string(),
        "date": "2025-01-12",
        "startTime": "21:00",
        "endTime": "05:00",
        "breakTime": { "durationMinutes": 60 },
        "services": [colour]
    }))
    .await)
    .await;
    assert_eq!(overnight["date"], "2025-01-12");
    assert_eq!(overnight["isOvernight"], true);
    assert_eq!(overnight["durationHours"], 7.0);
    assert_eq!(overnight["shiftType"], "Regular");
    assert_eq!(overnight["services"][0]["name"], "Colour");
    assert_eq!(overnight["services"][0]["serviceId"], colour.as_str());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_overlapping_shift(app: &mut TestApp) {
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

    let colleague = add_worker(app, Role::Employee).await;
    add_shift(app, &colleague, "2025-01-10", "16:00", "20:00").await;
    add_shift(app, &employee, "2025-01-11", "16:00", "20:00").await;
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_book_only_one_of_concurrent_overlapping_shifts(app: &mut TestApp) {
    let (_manager, employee) = manager_session(app).await;
    let first = json!({
        "employeeId": employee.id.to_string(),
        "date": "2025-01-10",
        "startTime": "09:00",
        "endTime": "13:00"
    });
    let second = json!({
        "employeeId": employee.id.to_string(),
        "date": "2025-01-10",
        "startTime": "12:00",
        "endTime": "16:00"
    });

    let (a, b) = tokio::join!(app.post_shift(&first), app.post_shift(&second));
    let mut statuses = [a.status(), b.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_invalid_duration(app: &mut TestApp) {
    let (_manager, employee) = manager_session(app).await;

    let test_cases = [
        json!({ "startTime": "09:00", "endTime": "09:20" }),
        json!({ "startTime": "06:00", "endTime": "23:00" }),
        json!({ "startTime": "09:00", "endTime": "09:00" }),
        json!({
            "startTime": "09:00",
            "endTime": "10:00",
            "breakTime": { "durationMinutes": 90 }
        }),
        json!({
            "startTime": "09:00",
            "endTime": "10:00",
            "breakTime": { "durationMinutes": -5 }
        }),
    ];

    for mut test_case in test_cases {
        test_case["employeeId"] = json!(employee.id.to_string());
        test_case["date"] = json!("2025-01-10");
        let response = app.post_shift(&test_case).await;
        assert_error(response, StatusCode::BAD_REQUEST, "InvalidShiftDuration").await;
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_invalid_time_format(app: &mut TestApp) {
    let (_manager, employee) = manager_session(app).await;

    for (start, end) in [("24:00", "08:00"), ("9am", "17:00"), ("09:00", "17:60")] {
        let response = app
            .post_shift(&json!({
                "employeeId": employee.id.to_string(),
                "date": "2025-01-10",
                "startTime": start,
                "endTime": end
            }))
            .await;
        assert_error(response, StatusCode::BAD_REQUEST, "InvalidTimeFormat").await;
    }

    let response = app
        .post_shift(&json!({
            "employeeId": employee.id.to_string(),
            "date": "10/01/2025",
            "startTime": "09:00",
            "endTime": "17:00"
        }))
        .await;
    assert_error(response, StatusCode::BAD_REQUEST, "ValidationError").await;
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_unknown_references(app: &mut TestApp) {
    let (_manager, employee) = manager_session(app).await;

    let response = app
        .post_shift(&json!({
            "employeeId": uuid::Uuid::new_v4().to_string(),
            "date": "2025-01-10",
            "startTime": "09:00",
            "endTime": "17:00"
        }))
        .await;
    assert_error(response, StatusCode::NOT_FOUND, "NotFound").await;

    let response = app
        .post_shift(&json!({
            "employeeId": employee.id.to_string(),
            "date": "2025-01-10",
            "startTime": "09:00",
            "endTime": "17:00",
            "services": [uuid::Uuid::new_v4().to_string()]
        }))
        .await;
    assert_error(response, StatusCode::NOT_FOUND, "NotFound").await;

    assert!(app
        .shift_store
        .read()
        .await
        .get_active_shifts(&employee.id, chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
        .await
        .unwrap()
        .is_empty());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_422_if_malformed_request(app: &mut TestApp) {
    let (_manager, employee) = manager_session(app).await;
    let employee_id = employee.id.to_string();

    let test_cases = [
        json!({ "employeeId": &employee_id, "date": "2025-01-10", "startTime": "09:00" }),
        json!({ "employeeId": &employee_id, "date": "2025-01-10", "endTime": "17:00" }),
        json!({ "employeeId": &employee_id, "startTime": "09:00", "endTime": "17:00" }),
        json!({ "date": "2025-01-10", "startTime": "09:00", "endTime": "17:00" }),
        json!({ "employeeId": "not-a-uuid", "date": "2025-01-10", "startTime": "09:00", "endTime": "17:00" }),
        json!({
            "employeeId": &employee_id,
            "date": "2025-01-10",
            "startTime": "09:00",
            "endTime": "17:00",
            "shiftType": "Weekend"
        }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_shift(test_case).await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "Failed for input: {:?}",
            test_case
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_require_a_signed_in_manager(app: &mut TestApp) {
    let employee = add_worker(app, Role::Employee).await;
    let request = json!({
        "employeeId": employee.id.to_string(),
        "date": "2025-01-10",
        "startTime": "09:00",
        "endTime": "17:00"
    });

    let response = app.post_shift(&request).await;
    assert_error(response, StatusCode::BAD_REQUEST, "MissingToken").await;

    app.set_auth_cookie("invalid");
    let response = app.post_shift(&request).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "InvalidToken").await;

    app.login_as(&employee);
    let response = app.post_shift(&request).await;
    assert_error(response, StatusCode::FORBIDDEN, "Forbidden").await;
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_schedule_managers_on_the_floor(app: &mut TestApp) {
    let (manager, _employee) = manager_session(app).await;
    let colleague = add_worker(app, Role::Manager).await;

    let shift_id = add_shift(app, &manager, "2025-01-10", "09:00", "17:00").await;
    let body = get_json_response_body(app.get_shift(&shift_id).await).await;
    assert_eq!(body["employeeId"], manager.id.to_string());
    assert_eq!(body["assignedBy"], manager.id.to_string());

    add_shift(app, &colleague, "2025-01-10", "09:00", "17:00").await;
}
