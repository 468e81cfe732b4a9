use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::marketplace::professionals::domain::VerificationStatus;
use crate::marketplace::professionals::repository::{CampaignRepository, ProfessionalRepository};

#[tokio::test]
async fn register_route_accepts_payloads() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/professionals")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&submission()).expect("serialize submission"),
                ))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let payload = read_json_body(response).await;
    assert!(payload.get("professional_id").is_some());
    assert_eq!(payload.get("verification"), Some(&json!("pending")));
    assert_eq!(payload.get("level"), Some(&json!("bronze")));
}

#[tokio::test]
async fn register_route_rejects_malformed_zips() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let mut bad = submission();
    bad.base_zip = "94l03".to_string();

    let response = router
        .oneshot(
            Request::post("/api/v1/professionals")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&bad).expect("serialize")))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn profile_route_returns_404_for_unknown_ids() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/professionals/pro-999999")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_route_returns_ranked_views() {
    let (service, profiles, _, _) = build_service();
    profiles
        .insert(profile("pro-a", VerificationStatus::Verified, 720, 4.5))
        .expect("seed profile");
    profiles
        .insert(profile("pro-b", VerificationStatus::Pending, 900, 5.0))
        .expect("seed profile");
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/professionals/search?zip=94103")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let results = payload.as_array().expect("array payload");
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0].get("professional_id").and_then(Value::as_str),
        Some("pro-a")
    );
    assert_eq!(results[0].get("level"), Some(&json!("gold")));
}

#[tokio::test]
async fn moderation_requires_the_admin_token() {
    let (service, profiles, _, _) = build_service();
    profiles
        .insert(profile("pro-mod", VerificationStatus::Pending, 0, 0.0))
        .expect("seed profile");
    let router = router_with_service(service);

    let body = json!({ "status": "verified" });

    let denied = router
        .clone()
        .oneshot(
            Request::post("/api/v1/professionals/pro-mod/verification")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let allowed = router
        .oneshot(
            Request::post("/api/v1/professionals/pro-mod/verification")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(allowed.status(), StatusCode::OK);
    let payload = read_json_body(allowed).await;
    assert_eq!(payload.get("verification"), Some(&json!("verified")));
}

#[tokio::test]
async fn points_route_reports_the_transition() {
    let (service, profiles, _, _) = build_service();
    profiles
        .insert(profile("pro-points", VerificationStatus::Verified, 295, 4.0))
        .expect("seed profile");
    let router = router_with_service(service);

    let body = json!({ "amount": 10, "reason": "lead accepted" });
    let response = router
        .oneshot(
            Request::post("/api/v1/professionals/pro-points/points")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("points"), Some(&json!(305)));
    assert_eq!(payload.get("level"), Some(&json!("silver")));
    let transition = payload.get("transition").expect("transition reported");
    assert_eq!(transition.get("from"), Some(&json!("bronze")));
    assert_eq!(transition.get("to"), Some(&json!("silver")));
    assert_eq!(transition.get("direction"), Some(&json!("upgrade")));
}

#[tokio::test]
async fn payment_route_returns_the_subscription() {
    let (service, profiles, _, _) = build_service();
    profiles
        .insert(profile("pro-pay", VerificationStatus::Verified, 0, 0.0))
        .expect("seed profile");
    let router = router_with_service(service);

    let body = json!({ "method": "credit_card" });
    let response = router
        .oneshot(
            Request::post("/api/v1/professionals/pro-pay/subscription/payments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("plan"), Some(&json!("promo_startup")));
    assert_eq!(payload.get("last_payment_cents"), Some(&json!(18_000)));
    assert_eq!(payload.get("is_active"), Some(&json!(true)));
}

#[tokio::test]
async fn campaign_award_route_surfaces_closed_campaigns_as_conflict() {
    let (service, profiles, campaigns, _) = build_service();
    profiles
        .insert(profile("pro-camp", VerificationStatus::Verified, 0, 0.0))
        .expect("seed profile");
    campaigns
        .insert(campaign("camp-closed", 40, false))
        .expect("seed campaign");
    let router = router_with_service(service);

    let body = json!({ "professional_id": "pro-camp" });
    let response = router
        .oneshot(
            Request::post("/api/v1/campaigns/camp-closed/award")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}
