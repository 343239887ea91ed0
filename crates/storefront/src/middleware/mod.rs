//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (client scope cookie)
//! 5. Security headers
//!
//! Route guards and the HTMX toast header live here too.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod toast;

pub use auth::{AuthRejection, OptionalUser, RequireAdmin, RequireAuth, RequireOwner};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use toast::{HxTrigger, ToastKind};
