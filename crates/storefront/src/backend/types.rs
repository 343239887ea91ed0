//! Wire types for the backend REST API.
//!
//! Every response is wrapped in an [`Envelope`]. Field names are camelCase on
//! the wire.

use serde::{Deserialize, Deserializer, Serialize};

use brewline_core::{OwnerId, StoreId};

/// Standard response wrapper: `{ "resultCode", "msg", "data" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// `"SUCCESS"`, `"200"`, or an error code. Some deployments send a number.
    #[serde(deserialize_with = "code_as_string")]
    pub result_code: String,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Success envelope, as the backend would send it.
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            result_code: "SUCCESS".to_owned(),
            msg: "success".to_owned(),
            data: Some(data),
        }
    }

    /// Error envelope without data.
    #[must_use]
    pub fn failure(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            result_code: code.into(),
            msg: msg.into(),
            data: None,
        }
    }

    /// Whether the backend reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.result_code.as_str(), "SUCCESS" | "200")
    }
}

fn code_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(i64),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Text(text) => text,
        Code::Number(number) => number.to_string(),
    })
}

/// Result of a uniqueness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCheck {
    pub is_duplicate: bool,
}

/// Owner login request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerLoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Owner login response data.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerLoginResponse {
    pub owner_id: OwnerId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub store_id: Option<StoreId>,
    pub access_token: String,
    #[serde(default)]
    pub first_login: bool,
}

impl std::fmt::Debug for OwnerLoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerLoginResponse")
            .field("owner_id", &self.owner_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("store_id", &self.store_id)
            .field("access_token", &"[REDACTED]")
            .field("first_login", &self.first_login)
            .finish()
    }
}

/// Store registration request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRegistration {
    pub store_name: String,
    pub store_code: String,
    pub business_number: String,
    pub address: String,
    pub phone: String,
}

/// Store registration response data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredStore {
    pub store_id: StoreId,
}
