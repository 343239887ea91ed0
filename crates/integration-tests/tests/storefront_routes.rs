//! End-to-end requests through the storefront router.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use brewline_integration_tests::TestApp;

const CUSTOMER: (&str, &str) = ("customer@brewline.kr", "customer1234!");
const ADMIN: (&str, &str) = ("admin@brewline.kr", "admin1234!");

#[tokio::test]
async fn health_and_readiness() {
    let mut app = TestApp::new();

    let live = app.get("/health").await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body, "ok");

    let ready = app.get("/health/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let mut app = TestApp::new();
    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.header("x-request-id").is_some());
    assert_eq!(response.header("x-frame-options"), Some("DENY"));
    assert_eq!(response.header("cache-control"), Some("no-store, max-age=0"));
}

#[tokio::test]
async fn account_pages_send_visitors_to_login() {
    let mut app = TestApp::new();

    for path in ["/account", "/account/orders", "/checkout"] {
        let response = app.get(path).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{path}");
        assert_eq!(response.location(), Some("/login"), "{path}");
    }
}

#[tokio::test]
async fn owner_console_sends_visitors_to_owner_login() {
    let mut app = TestApp::new();
    let response = app.get("/owner").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/owner/login"));
}

#[tokio::test]
async fn admin_console_requires_admin_role() {
    let mut app = TestApp::new();
    app.login(CUSTOMER.0, CUSTOMER.1).await;

    let response = app.get("/admin").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let mut admin = TestApp::new();
    admin.login(ADMIN.0, ADMIN.1).await;
    assert_eq!(admin.get("/admin").await.status, StatusCode::OK);
    assert_eq!(admin.get("/admin/users").await.status, StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_re_renders_login() {
    let mut app = TestApp::new();
    let response = app
        .post_form("/login", "email=customer%40brewline.kr&password=wrong-pass1")
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.contains("customer@brewline.kr"));
}

#[tokio::test]
async fn session_survives_between_requests() {
    let mut app = TestApp::new();
    app.login(CUSTOMER.0, CUSTOMER.1).await;

    let account = app.get("/account").await;
    assert_eq!(account.status, StatusCode::OK);
    assert!(account.body.contains("김민지"));

    app.clear_cookies();
    assert_eq!(app.get("/account").await.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn selected_store_filters_menu_and_cart() {
    let mut app = TestApp::new();

    let menu = app.get("/menu").await;
    assert!(menu.body.contains("뉴욕 치즈 케이크"));

    let selected = app.post_form("/stores/select", "store_id=3").await;
    assert_eq!(selected.status, StatusCode::SEE_OTHER);
    assert_eq!(selected.location(), Some("/menu"));

    let menu = app.get("/menu").await;
    assert!(!menu.body.contains("뉴욕 치즈 케이크"));

    let refused = app.post_form("/cart/add", "menu_item_id=9").await;
    assert_eq!(refused.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn htmx_store_selection_redirects_through_header() {
    let mut app = TestApp::new();
    let response = app.htmx_post_form("/stores/select", "store_id=1").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-redirect"), Some("/menu"));
    assert!(response.header("hx-trigger").unwrap().contains("showToast"));
}

#[tokio::test]
async fn adding_to_cart_updates_count_and_triggers_event() {
    let mut app = TestApp::new();

    let added = app
        .post_form(
            "/cart/add",
            "menu_item_id=1&size=grande&extras=shot&extras=vanilla&quantity=2",
        )
        .await;
    assert_eq!(added.status, StatusCode::OK);
    assert!(added.header("hx-trigger").unwrap().contains("cart-updated"));
    assert!(added.body.contains('2'));

    let cart = app.get("/cart").await;
    assert_eq!(cart.status, StatusCode::OK);
    // (4500 + 500 + 500 + 300) * 2
    assert!(cart.body.contains("11,600원"));

    let unknown = app
        .post_form("/cart/add", "menu_item_id=1&size=trenta")
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);

    let zero = app.post_form("/cart/add", "menu_item_id=1&quantity=0").await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cart_line_quantity_is_capped() {
    let mut app = TestApp::new();

    let added = app.post_form("/cart/add", "menu_item_id=1&quantity=98").await;
    assert_eq!(added.status, StatusCode::OK);

    let merged_past_limit = app.post_form("/cart/add", "menu_item_id=1&quantity=2").await;
    assert_eq!(merged_past_limit.status, StatusCode::BAD_REQUEST);

    let oversized = app
        .post_form("/cart/add", "menu_item_id=1&quantity=4294967295")
        .await;
    assert_eq!(oversized.status, StatusCode::BAD_REQUEST);

    let count = app.htmx_get("/cart/count").await;
    assert!(count.body.contains("98"));
    // 4500 * 98
    assert!(app.get("/cart").await.body.contains("441,000원"));
}

#[tokio::test]
async fn checkout_applies_points_and_coupon_then_clears_cart() {
    let mut app = TestApp::new();
    app.login(CUSTOMER.0, CUSTOMER.1).await;
    app.post_form("/stores/select", "store_id=1").await;
    app.post_form("/cart/add", "menu_item_id=1&quantity=2").await;

    let page = app.get("/checkout").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("9,000원"));

    let placed = app
        .post_form(
            "/checkout",
            "payment_method=kakao_pay&points=3000&coupon_id=1",
        )
        .await;
    assert_eq!(placed.status, StatusCode::OK, "{}", placed.body);
    assert!(placed.body.contains("브루라인 강남역점"));
    assert!(placed.body.contains("6,000원"));
    assert!(placed.body.contains("3,000원"));

    let after = app.get("/checkout").await;
    assert_eq!(after.status, StatusCode::SEE_OTHER);
    assert_eq!(after.location(), Some("/cart"));
}

#[tokio::test]
async fn checkout_rejects_missing_payment_and_percentage_coupon() {
    let mut app = TestApp::new();
    app.login(CUSTOMER.0, CUSTOMER.1).await;
    app.post_form("/stores/select", "store_id=1").await;
    app.post_form("/cart/add", "menu_item_id=1&quantity=3").await;

    let missing = app.post_form("/checkout", "points=0").await;
    assert_eq!(missing.status, StatusCode::UNPROCESSABLE_ENTITY);

    let percentage = app
        .post_form("/checkout", "payment_method=card&points=0&coupon_id=3")
        .await;
    assert_eq!(percentage.status, StatusCode::BAD_REQUEST);

    // The cart is still there.
    assert_eq!(app.get("/checkout").await.status, StatusCode::OK);
}

#[tokio::test]
async fn logout_keeps_cart_but_signs_out() {
    let mut app = TestApp::new();
    app.login(CUSTOMER.0, CUSTOMER.1).await;
    app.post_form("/cart/add", "menu_item_id=2").await;

    let out = app.post_form("/logout", "").await;
    assert_eq!(out.status, StatusCode::SEE_OTHER);

    assert_eq!(app.get("/account").await.status, StatusCode::SEE_OTHER);
    let count = app.htmx_get("/cart/count").await;
    assert!(count.body.contains('1'));
}
