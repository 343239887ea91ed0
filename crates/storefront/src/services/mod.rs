//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Mock customer/admin sign-in and signup against the catalog
//! - `latency` - Simulated API delay for mock operations

pub mod auth;
pub mod latency;

pub use auth::{AuthError, AuthService};
pub use latency::SimulatedLatency;
