//! Session keys.
//!
//! The session holds only the browser's client scope. Everything else lives
//! in the persisted client stores.

/// Session keys.
pub mod keys {
    /// Key for the browser's [`ClientScope`](crate::persistence::ClientScope).
    pub const CLIENT_SCOPE: &str = "client_scope";
}
