//! Integration test harness for Brewline.
//!
//! [`TestApp`] drives the real storefront router in-process with
//! `tower::ServiceExt::oneshot`, carrying the session cookie between requests
//! like a browser would. [`spawn_backend`] serves a stand-in backend REST API
//! on a random local port.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p brewline-integration-tests
//! ```

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use brewline_storefront::build_router;
use brewline_storefront::config::StorefrontConfig;
use brewline_storefront::middleware::session::SESSION_COOKIE_NAME;
use brewline_storefront::persistence::{MemoryKeyValueStore, SharedKeyValueStore};
use brewline_storefront::state::AppState;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

/// Backend address nothing listens on.
pub const UNREACHABLE_BACKEND: &str = "http://127.0.0.1:9";

/// Test configuration: no simulated latency, memory persistence.
///
/// # Panics
///
/// Panics if the built-in variables fail to parse.
#[must_use]
pub fn test_config(backend_url: &str) -> StorefrontConfig {
    let backend_url = backend_url.to_owned();
    StorefrontConfig::from_lookup(|key| match key {
        "STOREFRONT_BASE_URL" => Some("http://localhost:3000".to_owned()),
        "STOREFRONT_MOCK_LATENCY_MS" => Some("0".to_owned()),
        "BACKEND_API_URL" => Some(backend_url.clone()),
        "BACKEND_API_TIMEOUT_SECS" => Some("2".to_owned()),
        _ => None,
    })
    .expect("test configuration is valid")
}

/// A fully buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    /// A header as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// The storefront router plus one browser's cookie.
pub struct TestApp {
    router: Router,
    persistence: SharedKeyValueStore,
    cookie: Option<String>,
}

impl TestApp {
    /// App whose backend calls fail to connect.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(UNREACHABLE_BACKEND)
    }

    /// App talking to the backend at `backend_url`.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be built.
    #[must_use]
    pub fn with_backend(backend_url: &str) -> Self {
        let persistence: SharedKeyValueStore = Arc::new(MemoryKeyValueStore::new());
        let state = AppState::new(test_config(backend_url), Arc::clone(&persistence))
            .expect("application state builds");
        Self {
            router: build_router(state, MemoryStore::default()),
            persistence,
            cookie: None,
        }
    }

    /// The adapter client stores write through.
    #[must_use]
    pub const fn persistence(&self) -> &SharedKeyValueStore {
        &self.persistence
    }

    /// Forget the session cookie, as a new browser would.
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Request::get(path), Body::empty()).await
    }

    /// Same as [`get`](Self::get) but marked as an HTMX request.
    pub async fn htmx_get(&mut self, path: &str) -> TestResponse {
        self.send(Request::get(path).header("hx-request", "true"), Body::empty())
            .await
    }

    /// POST an urlencoded form body.
    pub async fn post_form(&mut self, path: &str, body: &str) -> TestResponse {
        let request = Request::post(path).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        self.send(request, Body::from(body.to_owned())).await
    }

    /// POST an urlencoded form body as an HTMX request.
    pub async fn htmx_post_form(&mut self, path: &str, body: &str) -> TestResponse {
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("hx-request", "true");
        self.send(request, Body::from(body.to_owned())).await
    }

    /// Sign in with one of the seeded accounts.
    ///
    /// # Panics
    ///
    /// Panics if the login is refused.
    pub async fn login(&mut self, email: &str, password: &str) {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("email", email)
            .append_pair("password", password)
            .finish();
        let response = self.post_form("/login", &body).await;
        assert_eq!(
            response.status,
            StatusCode::SEE_OTHER,
            "login failed: {}",
            response.body
        );
    }

    async fn send(&mut self, mut request: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = request.body(body).expect("request builds");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        self.remember_cookie(response.headers());

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn remember_cookie(&mut self, headers: &HeaderMap) {
        let prefix = format!("{SESSION_COOKIE_NAME}=");
        let session_cookie = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .find(|pair| pair.starts_with(&prefix));
        if let Some(pair) = session_cookie {
            self.cookie = Some(pair.to_owned());
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Serve `router` on a random local port and return its base URL.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local port");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{addr}")
}
