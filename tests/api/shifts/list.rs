use crate::helpers::{
    add_shift, add_worker, assert_error, get_json_response_body, manager_session,
    TestApp,
};
use reqwest::StatusCode;
use salon_rota::domain::Role;
use serde_json::Value;
use test_context::test_context;

fn ids(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("response should be an array")
        .iter()
        .map(|shift| shift["id"].as_str().unwrap().to_owned())
        .collect()
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_list_shifts_in_date_order_with_filters(app: &mut TestApp) {
    let (_manager, employee) = manager_session(app).await;
    let colleague = add_worker(app, Role::Employee).await;
    let later = add_shift(app, &employee, "2025-01-12", "09:00", "17:00").await;
    let earlier = add_shift(app, &employee, "2025-01-10", "09:00", "17:00").await;
    let other = add_shift(app, &colleague, "2025-01-11", "09:00", "17:00").await;

    let body = get_json_response_body(app.get_shifts(&[]).await).await;
    assert_eq!(ids(&body), vec![earlier.clone(), other.clone(), later.clone()]);

    let employee_id = employee.id.to_string();
    let body = get_json_response_body(
        app.get_shifts(&[("employeeId", employee_id.as_str())]).await,
    )
    .await;
    assert_eq!(ids(&body), vec![earlier.clone(), later.clone()]);

    let body = get_json_response_body(
        app.get_shifts(&[("startDate", "2025-01-11"), ("endDate", "2025-01-11")])
            .await,
    )
    .await;
    assert_eq!(ids(&body), vec![other]);

    app.put_shift(&later, &serde_json::json!({ "status": "Cancelled" }))
        .await;
    let body = get_json_response_body(
        app.get_shifts(&[("status", "Cancelled")]).await,
    )
    .await;
    assert_eq!(ids(&body), vec![later]);

    let response = app
        .get_shifts(&[("startDate", "2025-02-01"), ("endDate", "2025-01-01")])
        .await;
    assert_error(response, StatusCode::BAD_REQUEST, "ValidationError").await;
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_limit_employees_to_their_own_shifts(app: &mut TestApp) {
    let (_manager, employee) = manager_session(app).await;
    let colleague = add_worker(app, Role::Employee).await;
    let own = add_shift(app, &employee, "2025-01-10", "09:00", "17:00").await;
    let theirs = add_shift(app, &colleague, "2025-01-10", "09:00", "17:00").await;

    app.login_as(&employee);

    let body = get_json_response_body(app.get_shifts(&[]).await).await;
    assert_eq!(ids(&body), vec![own.clone()]);

    let body = get_json_response_body(app.get_my_shifts().await).await;
    assert_eq!(ids(&body), vec![own]);

    let colleague_id = colleague.id.to_string();
    let response = app
        .get_shifts(&[("employeeId", colleague_id.as_str())])
        .await;
    assert_error(response, StatusCode::FORBIDDEN, "Forbidden").await;

    let response = app.get_shift(&theirs).await;
    assert_error(response, StatusCode::FORBIDDEN, "Forbidden").await;
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_only_own_shifts_for_managers_on_my(app: &mut TestApp) {
    let (manager, employee) = manager_session(app).await;
    add_shift(app, &employee, "2025-01-10", "09:00", "17:00").await;
    let own = add_shift(app, &manager, "2025-01-10", "09:00", "17:00").await;

    let response = app.get_my_shifts().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ids(&get_json_response_body(response).await), vec![own]);
}
