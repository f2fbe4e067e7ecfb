#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    response::Response,
};
use quote_tool::{
    PricingFactors, ProjectDetails, QuoteEngine, QuoteOutcome, QuoteRequest, RoleAssignment,
    http_api,
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

fn new_router() -> axum::Router {
    let state = http_api::AppState::new(QuoteEngine::default());
    http_api::router(state)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn read_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_and_roles_are_served() {
    let app = new_router();

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "ok");

    let response = app.oneshot(empty_request("GET", "/roles")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let roles = read_json(response).await;
    assert_eq!(roles.as_array().map(Vec::len), Some(13));
}

#[tokio::test]
async fn stateless_quote_prices_a_request() {
    let app = new_router();
    let request = json!({
        "project": {"name": "Stateless"},
        "factors": {"overhead_factor": 1.4, "margin_percent": 30, "client_type": "domestic", "discount_percent": 10},
        "team": [{"id": 1, "role": "Data Engineer", "count": 2, "hours": 100}]
    });

    let response = app
        .oneshot(json_request("POST", "/quote", request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let outcome: QuoteOutcome = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(outcome.totals.total_project_hours, 200);
    assert_eq!(outcome.totals.final_amount_after_discount.round(), 207_692.0);
    assert!(outcome.gate.is_open());
}

#[tokio::test]
async fn invalid_factors_are_a_bad_request() {
    let app = new_router();
    let response = app
        .oneshot(json_request(
            "PUT",
            "/session/factors",
            json!({"overhead_factor": 3.0, "margin_percent": 30}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "invalid_request");
}

#[tokio::test]
async fn session_rows_lifecycle() {
    let app = new_router();

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/session/rows"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let row: RoleAssignment = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(row.id, 2);
    assert!(row.role.is_none());

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/session/rows/1",
            json!({"role": "Data Scientist", "count": 1, "hours": 40}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["role"], "Data Scientist");

    // Same role on a second row.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/session/rows/2",
            json!({"role": "Data Scientist", "count": 1, "hours": 10}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/session/rows/99",
            json!({"role": "Project Manager"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["error"], "not_found");

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/session/rows/2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/session/rows/2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("GET", "/session/quote"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = read_json(response).await;
    assert_eq!(outcome["rows"].as_array().map(Vec::len), Some(1));
    assert_eq!(outcome["totals"]["total_project_hours"], 40);
}

#[tokio::test]
async fn reports_follow_the_export_gate() {
    let app = new_router();

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/session/reports"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(read_json(response).await["error"], "conflict");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/session/project",
            json!({"name": "Gatekeeper", "description": "HTTP session"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/session/rows/1",
            json!({"role": "Project Manager", "count": 1, "hours": 80}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/session/milestones"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let milestone = read_json(response).await;
    let id = milestone["id"].as_u64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/session/milestones/{id}"),
            json!({"percent": 60.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/session/reports"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/session/milestones/{id}"),
            json!({"percent": 100.0, "name": "Full delivery"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(empty_request("POST", "/session/reports"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bundle = read_json(response).await;
    assert_eq!(bundle["client"]["header"]["project_name"], "Gatekeeper");
    assert_eq!(bundle["client"]["milestones"][0]["name"], "Full delivery");
    assert_eq!(bundle["internal"]["total_project_hours"], 80);
}

#[tokio::test]
async fn milestone_percent_out_of_range_is_rejected() {
    let app = new_router();
    let response = app
        .clone()
        .oneshot(empty_request("POST", "/session/milestones"))
        .await
        .unwrap();
    let id = read_json(response).await["id"].as_u64().unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/session/milestones/{id}"),
            json!({"percent": 140.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

fn seeded_router() -> axum::Router {
    let mut request = QuoteRequest::new(
        ProjectDetails::new("Seeded", "Preloaded session"),
        PricingFactors::default(),
    );
    request.team.set_role(1, Some("DevOps Engineer")).unwrap();
    request.team.set_count(1, 2).unwrap();
    request.team.set_hours(1, 60).unwrap();
    let state = http_api::AppState::with_request(QuoteEngine::default(), request);
    http_api::router(state)
}

#[tokio::test]
async fn partial_row_update_keeps_other_fields() {
    let app = seeded_router();

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/session/rows/1", json!({"count": 3})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let row = read_json(response).await;
    assert_eq!(row["role"], "DevOps Engineer");
    assert_eq!(row["count"], 3);
    assert_eq!(row["hours"], 60);

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/session/rows/1", json!({"role": ""})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let row = read_json(response).await;
    assert!(row.get("role").is_none());
    assert_eq!(row["count"], 3);

    let response = app
        .oneshot(empty_request("GET", "/session"))
        .await
        .unwrap();
    let session = read_json(response).await;
    assert_eq!(session["project"]["name"], "Seeded");
    assert_eq!(session["team"][0]["hours"], 60);
}

#[tokio::test]
async fn adding_a_milestone_past_one_hundred_percent_conflicts() {
    let app = seeded_router();
    let response = app
        .clone()
        .oneshot(empty_request("POST", "/session/milestones"))
        .await
        .unwrap();
    let id = read_json(response).await["id"].as_u64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/session/milestones/{id}"),
            json!({"percent": 100.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(empty_request("POST", "/session/milestones"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(read_json(response).await["error"], "conflict");
}
