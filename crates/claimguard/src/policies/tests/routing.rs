use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::policies::router::{analyze_handler, AnalyzeRequest};
use crate::policies::PolicyService;

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn analyze_request(text: &str) -> AnalyzeRequest {
    AnalyzeRequest {
        owner: owner(),
        text: text.to_string(),
        filename: Some("upload.pdf".to_string()),
        page_count: Some(2),
        age: None,
        pre_existing_condition: None,
        policy_type: None,
    }
}

#[tokio::test]
async fn analyze_route_creates_policy() {
    let (service, repository) = build_service();
    let router = policy_router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/policies",
            json!({
                "owner": "alice",
                "text": HEALTH_POLICY,
                "filename": "health.pdf",
                "page_count": 3,
                "age": "62",
                "pre_existing_condition": "Thyroid",
                "policy_type": "health"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("id").and_then(Value::as_str).map(str::len),
        Some(16)
    );
    assert_eq!(payload.get("filename"), Some(&json!("health.pdf")));
    assert_eq!(payload.get("declared_type"), Some(&json!("health")));
    assert_eq!(payload.get("detected_type"), Some(&json!("Health Insurance")));
    assert_eq!(payload["risk_factors"][0]["factor"], json!("Age"));
    assert_eq!(payload["risk_factors"][1]["impact"], json!("Critical"));
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn analyze_route_rejects_bad_input() {
    let (service, repository) = build_service();
    let router = policy_router_with_service(service);

    for age in [json!(-3), json!("old"), json!(130)] {
        let response = router
            .clone()
            .oneshot(post_json(
                "/api/v1/policies",
                json!({ "owner": "alice", "text": HEALTH_POLICY, "age": age }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "age {age}");
        let payload = read_json_body(response).await;
        assert!(payload.get("error").and_then(Value::as_str).is_some());
    }

    let response = router
        .oneshot(post_json(
            "/api/v1/policies",
            json!({ "owner": "alice", "text": "   " }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn analyze_handler_maps_repository_failures() {
    let conflict = Arc::new(PolicyService::new(
        Arc::new(ConflictRepository),
        analysis_config(),
    ));
    let response = analyze_handler::<ConflictRepository>(
        State(conflict),
        axum::Json(analyze_request(HEALTH_POLICY)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let offline = Arc::new(PolicyService::new(
        Arc::new(UnavailableRepository),
        analysis_config(),
    ));
    let response = analyze_handler::<UnavailableRepository>(
        State(offline),
        axum::Json(analyze_request(HEALTH_POLICY)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("database offline"));
}

#[tokio::test]
async fn policy_route_is_scoped_to_owner() {
    let (service, _) = build_service();
    let ids = seed(&service, &owner(), &[HEALTH_POLICY]);
    let router = policy_router_with_service(service);

    let response = router
        .clone()
        .oneshot(get(&format!("/api/v1/policies/{}?owner=alice", ids[0])))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("id"), Some(&json!(ids[0].as_str())));

    let response = router
        .oneshot(get(&format!("/api/v1/policies/{}?owner=bob", ids[0])))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recent_route_honours_limit() {
    let (service, _) = build_service();
    let ids = seed(&service, &owner(), &[HEALTH_POLICY, CAR_POLICY]);
    let router = policy_router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/policies?owner=alice&limit=1"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let listed = payload.as_array().expect("array payload");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], json!(ids[1].as_str()));
    assert_eq!(listed[0]["policy_type"], json!("Health Insurance"));
}

#[tokio::test]
async fn simulate_route_returns_claim_split() {
    let (service, _) = build_service();
    let ids = seed(&service, &owner(), &[HEALTH_POLICY]);
    let router = policy_router_with_service(service);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/claims/simulate",
            json!({ "owner": "alice", "policy_id": ids[0].as_str(), "claim_amount": 100000 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["simulation"]["deductible_applied"], json!(25000.0));
    assert_eq!(payload["simulation"]["insurer_pays"], json!(60000.0));
    assert_eq!(payload["simulation"]["out_of_pocket"], json!(40000.0));

    let response = router
        .oneshot(post_json(
            "/api/v1/claims/simulate",
            json!({ "owner": "alice", "policy_id": ids[0].as_str(), "claim_amount": -1 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn comparison_route_requires_two_policies() {
    let (service, _) = build_service();
    let ids = seed(&service, &owner(), &[HEALTH_POLICY, CAR_POLICY]);
    let router = policy_router_with_service(service);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/comparisons",
            json!({ "owner": "alice", "policy_ids": [ids[0].as_str()] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(post_json(
            "/api/v1/comparisons",
            json!({ "owner": "alice", "policy_ids": [ids[0].as_str(), ids[1].as_str()] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["policies"].as_array().map(Vec::len), Some(2));
    assert!(payload["recommendation"]["reason"]
        .as_str()
        .unwrap_or_default()
        .starts_with("Lowest overall risk score ("));
}

#[tokio::test]
async fn stats_and_catalog_routes() {
    let (service, _) = build_service();
    seed(&service, &owner(), &[HEALTH_POLICY, CAR_POLICY]);
    let router = policy_router_with_service(service);

    let response = router
        .clone()
        .oneshot(get("/api/v1/stats?owner=alice"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total_analyzed"], json!(2));
    assert_eq!(payload["recent_activity"].as_array().map(Vec::len), Some(2));

    let response = router
        .clone()
        .oneshot(get("/api/v1/policy-types"))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["policy_types"].as_array().map(Vec::len), Some(6));

    let response = router
        .oneshot(post_json(
            "/api/v1/classify",
            json!({ "text": "Vehicle collision repair at the garage after a road accident" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["detected_type"], json!("Car Insurance"));
    assert_eq!(payload["candidates"][0]["confidence"], json!(100.0));
}
