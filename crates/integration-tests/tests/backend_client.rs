//! Backend REST client against a stand-in backend server.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use brewline_core::{OwnerId, StoreId};
use brewline_storefront::backend::types::StoreRegistration;
use brewline_storefront::backend::{ApiError, BackendClient};
use brewline_storefront::config::BackendConfig;
use brewline_integration_tests::{TestApp, UNREACHABLE_BACKEND, spawn_backend};
use serde_json::{Value, json};

const OWNER_TOKEN: &str = "owner-token-7";

async fn email_check(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let taken = query.get("email").is_some_and(|email| email == "taken@brewline.kr");
    Json(json!({ "resultCode": "SUCCESS", "msg": "ok", "data": { "isDuplicate": taken } }))
}

async fn store_name_check(Query(query): Query<HashMap<String, String>>) -> Response {
    if query.get("storeName").is_some_and(|name| name == "브루라인 강남역점") {
        (
            StatusCode::CONFLICT,
            Json(json!({ "resultCode": "E4090", "msg": "duplicate", "data": null })),
        )
            .into_response()
    } else {
        Json(json!({ "resultCode": 200, "data": { "isDuplicate": false } })).into_response()
    }
}

async fn store_code_check() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "database is down").into_response()
}

async fn owner_login(Json(body): Json<Value>) -> Json<Value> {
    if body["password"] == "owner1234!" {
        Json(json!({
            "resultCode": 200,
            "msg": "success",
            "data": {
                "ownerId": 7,
                "name": "박지훈",
                "email": body["email"],
                "storeId": null,
                "accessToken": OWNER_TOKEN,
                "firstLogin": true
            }
        }))
    } else {
        Json(json!({ "resultCode": "E4010", "msg": "비밀번호가 일치하지 않습니다.", "data": null }))
    }
}

async fn register_store(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let expected = format!("Bearer {OWNER_TOKEN}");
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(expected.as_str());
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    assert!(body["storeCode"].is_string());
    Json(json!({ "resultCode": "SUCCESS", "data": { "storeId": 5 } })).into_response()
}

fn backend_router() -> Router {
    Router::new()
        .route("/user/email/check", get(email_check))
        .route("/owner/stores/check-name", get(store_name_check))
        .route("/owner/stores/check-code", get(store_code_check))
        .route("/owner/login", post(owner_login))
        .route("/owner/stores", post(register_store))
}

fn client(base_url: &str) -> BackendClient {
    BackendClient::new(&BackendConfig {
        base_url: base_url.parse().unwrap(),
        timeout: Duration::from_secs(2),
    })
    .unwrap()
}

#[tokio::test]
async fn duplicate_checks_read_envelope_and_conflict() {
    let backend = client(&spawn_backend(backend_router()).await);

    assert!(backend.check_email_duplicate("taken@brewline.kr").await.unwrap());
    assert!(!backend.check_email_duplicate("new@brewline.kr").await.unwrap());

    assert!(
        backend
            .check_store_name_duplicate("브루라인 강남역점")
            .await
            .unwrap()
    );
    assert!(
        !backend
            .check_store_name_duplicate("브루라인 판교점")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn http_errors_surface_status() {
    let backend = client(&spawn_backend(backend_router()).await);

    match backend.check_store_code_duplicate("PANGYO1").await {
        Err(ApiError::Status { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let backend = client(UNREACHABLE_BACKEND);
    assert!(matches!(
        backend.check_email_duplicate("a@brewline.kr").await,
        Err(ApiError::Http(_))
    ));
}

#[tokio::test]
async fn owner_login_and_store_registration() {
    let backend = client(&spawn_backend(backend_router()).await);

    let owner = backend
        .owner_login("owner@brewline.kr", "owner1234!")
        .await
        .unwrap();
    assert_eq!(owner.owner_id, OwnerId::new(7));
    assert_eq!(owner.store_id, None);
    assert!(owner.first_login);

    let registration = StoreRegistration {
        store_name: "브루라인 판교점".to_owned(),
        store_code: "PANGYO1".to_owned(),
        business_number: "123-45-67890".to_owned(),
        address: "경기 성남시 분당구".to_owned(),
        phone: "031-123-4567".to_owned(),
    };
    let registered = backend
        .register_store(&owner.access_token, &registration)
        .await
        .unwrap();
    assert_eq!(registered.store_id, StoreId::new(5));

    assert!(matches!(
        backend.register_store("wrong-token", &registration).await,
        Err(ApiError::Status { status: 401, .. })
    ));
}

#[tokio::test]
async fn rejected_envelope_carries_backend_message() {
    let backend = client(&spawn_backend(backend_router()).await);

    match backend.owner_login("owner@brewline.kr", "nope1234!").await {
        Err(err @ ApiError::Rejected { .. }) => {
            assert_eq!(err.user_message(), "비밀번호가 일치하지 않습니다.");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_check_api_wraps_backend_answer() {
    let mut app = TestApp::with_backend(&spawn_backend(backend_router()).await);

    let taken = app.get("/api/user/email/check?email=taken%40brewline.kr").await;
    assert_eq!(taken.status, StatusCode::OK);
    let body: Value = serde_json::from_str(&taken.body).unwrap();
    assert_eq!(body["resultCode"], "SUCCESS");
    assert_eq!(body["data"]["isDuplicate"], true);

    let invalid = app.get("/api/user/email/check?email=not-an-email").await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&invalid.body).unwrap();
    assert_eq!(body["resultCode"], "INVALID_PARAMETER");

    let down = app.get("/api/owner/stores/check-code?storeCode=PANGYO1").await;
    assert_eq!(down.status, StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_str(&down.body).unwrap();
    assert_eq!(body["resultCode"], "BACKEND_UNAVAILABLE");
}

#[tokio::test]
async fn signup_refuses_email_the_backend_knows() {
    let mut app = TestApp::with_backend(&spawn_backend(backend_router()).await);

    let refused = app
        .post_form(
            "/signup",
            "email=taken%40brewline.kr&password=brew1234%21&password_confirm=brew1234%21\
             &name=%EC%B5%9C%ED%95%98%EB%8A%98&phone=010-1234-5678",
        )
        .await;
    assert_eq!(refused.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!refused.body.contains("brew1234!"));

    let accepted = app
        .post_form(
            "/signup",
            "email=new%40brewline.kr&password=brew1234%21&password_confirm=brew1234%21\
             &name=%EC%B5%9C%ED%95%98%EB%8A%98&phone=010-1234-5678",
        )
        .await;
    assert_eq!(accepted.status, StatusCode::SEE_OTHER);
    assert_eq!(app.get("/account").await.status, StatusCode::OK);
}

#[tokio::test]
async fn signup_falls_back_when_backend_is_down() {
    let mut app = TestApp::new();
    let accepted = app
        .post_form(
            "/signup",
            "email=offline%40brewline.kr&password=brew1234%21&password_confirm=brew1234%21\
             &name=%EC%B5%9C%ED%95%98%EB%8A%98&phone=010-1234-5678",
        )
        .await;
    assert_eq!(accepted.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn owner_signs_in_and_registers_a_store() {
    let mut app = TestApp::with_backend(&spawn_backend(backend_router()).await);

    let signed_in = app
        .post_form("/owner/login", "email=owner%40brewline.kr&password=owner1234%21")
        .await;
    assert_eq!(signed_in.status, StatusCode::SEE_OTHER);
    assert_eq!(signed_in.location(), Some("/owner"));
    assert_eq!(app.get("/owner").await.status, StatusCode::OK);

    let registered = app
        .post_form(
            "/owner/stores/register",
            "store_name=%EB%B8%8C%EB%A3%A8%EB%9D%BC%EC%9D%B8+%ED%8C%90%EA%B5%90%EC%A0%90\
             &store_code=PANGYO1&business_number=123-45-67890\
             &address=%EA%B2%BD%EA%B8%B0+%EC%84%B1%EB%82%A8%EC%8B%9C&phone=031-123-4567",
        )
        .await;
    assert_eq!(registered.status, StatusCode::SEE_OTHER, "{}", registered.body);
    assert_eq!(registered.location(), Some("/owner"));

    let refused = app
        .post_form("/owner/login", "email=owner%40brewline.kr&password=nope1234%21")
        .await;
    assert_eq!(refused.status, StatusCode::UNAUTHORIZED);
    assert!(refused.body.contains("비밀번호가 일치하지 않습니다."));
}
