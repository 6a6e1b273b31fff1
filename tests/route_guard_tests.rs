// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route group gating tests.
//!
//! These tests verify that:
//! 1. Requests without a valid session are redirected to the login page
//! 2. Signed-in callers without the required role are redirected to the deny page
//! 3. Callers with an accepted role reach the handler

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use pta_portal::config::{Config, RedirectPolicy};
use pta_portal::models::Role;
use tower::ServiceExt;

mod common;

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}

#[tokio::test]
async fn test_cors_allows_only_exact_dev_hosts() {
    let (app, _) = common::create_test_app();

    for origin in [
        "http://localhost.attacker.example",
        "http://127.0.0.1.attacker.example",
        "http://localhost@attacker.example",
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none(),
            "{origin} was allowed"
        );
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}

#[tokio::test]
async fn test_no_session_redirects_to_login() {
    let (app, _) = common::create_test_app();

    for uri in ["/account/me", "/volunteer/overview", "/admin/integrations/storefront"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login", "{uri}");
    }
}

#[tokio::test]
async fn test_invalid_token_redirects_to_login() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/account/me")
                .header(header::AUTHORIZATION, "Bearer invalid.token.here")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_unprovisioned_profile_redirects_to_deny() {
    let (app, state) = common::create_test_app();
    let token = common::session_for(&state, "new-user");

    let response = app
        .oneshot(common::request_with_session(
            "GET",
            "/account/me",
            &token,
            Body::empty(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_volunteer_denied_from_admin_area() {
    let (app, state) = common::create_test_app();
    let token = common::sign_in_as(&state, "vol-1", Role::Volunteer).await;

    let response = app
        .clone()
        .oneshot(common::request_with_session(
            "GET",
            "/admin/integrations/storefront",
            &token,
            Body::empty(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = app
        .oneshot(common::request_with_session(
            "GET",
            "/volunteer/overview",
            &token,
            Body::empty(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::json_body(response).await;
    assert_eq!(body["role"], "volunteer");
    assert_eq!(body["can_manage_shifts"], false);
}

#[tokio::test]
async fn test_member_denied_from_volunteer_area() {
    let (app, state) = common::create_test_app();
    let token = common::sign_in_as(&state, "member-1", Role::Member).await;

    let response = app
        .oneshot(common::request_with_session(
            "GET",
            "/volunteer/overview",
            &token,
            Body::empty(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_me_reports_capabilities() {
    let (app, state) = common::create_test_app();
    let token = common::sign_in_as(&state, "admin-1", Role::Admin).await;

    let response = app
        .oneshot(common::request_with_session(
            "GET",
            "/account/me",
            &token,
            Body::empty(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["cache-control"], "no-store");

    let body = common::json_body(response).await;
    assert_eq!(body["subject_id"], "admin-1");
    assert_eq!(body["email"], "admin-1@example.org");
    assert_eq!(body["role"], "admin");
    assert_eq!(body["is_admin"], true);
    assert_eq!(body["is_volunteer"], true);
}

#[tokio::test]
async fn test_profile_update_keeps_role() {
    let (app, state) = common::create_test_app();
    let token = common::sign_in_as(&state, "member-1", Role::Member).await;

    let body = serde_json::json!({
        "display_name": "Pat Doe",
        "campus": "Lincoln Elementary",
        "role": "super_admin"
    });

    let response = app
        .oneshot(common::request_with_session(
            "PATCH",
            "/account/profile",
            &token,
            Body::from(body.to_string()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let stored = state.profiles.get_profile("member-1").await.unwrap().unwrap();
    assert_eq!(stored.display_name.as_deref(), Some("Pat Doe"));
    assert_eq!(stored.campus.as_deref(), Some("Lincoln Elementary"));
    assert_eq!(stored.role, Role::Member);
}

#[tokio::test]
async fn test_profile_update_validation() {
    let (app, state) = common::create_test_app();
    let token = common::sign_in_as(&state, "member-1", Role::Member).await;

    let body = serde_json::json!({ "display_name": "" });

    let response = app
        .oneshot(common::request_with_session(
            "PATCH",
            "/account/profile",
            &token,
            Body::from(body.to_string()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_configured_redirect_paths() {
    let mut config = Config::test_default();
    config.redirects = RedirectPolicy {
        login_path: "/sign-in".to_string(),
        deny_path: "/unauthorized".to_string(),
    };
    let (app, state) = common::create_test_app_with_config(config);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/account/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(location(&response), "/sign-in");

    let token = common::sign_in_as(&state, "member-1", Role::Member).await;
    let response = app
        .oneshot(common::request_with_session(
            "GET",
            "/admin/integrations/storefront",
            &token,
            Body::empty(),
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), "/unauthorized");
}

#[tokio::test]
async fn test_logout_clears_session_cookie() {
    let (app, state) = common::create_test_app();
    let token = common::sign_in_as(&state, "member-1", Role::Member).await;

    let response = app
        .oneshot(common::request_with_session(
            "POST",
            "/auth/logout",
            &token,
            Body::empty(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing Set-Cookie")
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("pta_session="));
    assert!(cookie.contains("Max-Age=0"));
}
