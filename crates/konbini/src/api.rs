//! Request and response bodies exchanged with the service.
//!
//! Field names follow the service exactly, including the `ingridients`
//! spelling. Sealed values always travel as lowercase hex.

use konbini_auth::RefreshError;
use konbini_core::Proof;
use serde::{Deserialize, Serialize};

/// Endpoint path for renewing an access token (`PATCH`, refresh token as bearer).
pub const REFRESH_PATH: &str = "auth/refresh";
/// Endpoint path for creating a bundle (`POST`).
pub const PREPARE_PATH: &str = "bento/prepare";
/// Endpoint path for adding ingredients (`POST`).
pub const FILL_PATH: &str = "bento/add/ingridients";
/// Endpoint path for renaming an ingredient (`PATCH`).
pub const RENAME_PATH: &str = "bento/ingridient/rename";
/// Endpoint path for replacing an ingredient value (`PATCH`).
pub const RESEASON_PATH: &str = "bento/ingridient/reseason";

/// Path for fetching a bundle (`GET`), with the proof in the query string.
pub fn order_path(bento_id: &str, proof: &Proof) -> String {
    format!(
        "bento/order/{bento_id}?challenge={}&signature={}",
        proof.challenge, proof.signature
    )
}

/// Path for deleting a bundle (`DELETE`).
pub fn throw_path(bento_id: &str) -> String {
    format!("bento/throw/{bento_id}")
}

/// A named sealed value as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Hex-encoded sealed value.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareBundleRequest {
    pub name: String,
    /// SPKI PEM of the bundle's public key.
    pub pub_key: String,
    /// Left off the wire entirely when there is nothing to seal.
    #[serde(rename = "ingridients", default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillBundleRequest {
    pub bento_id: String,
    #[serde(rename = "ingridients")]
    pub ingredients: Vec<Ingredient>,
    #[serde(flatten)]
    pub proof: Proof,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameIngredientRequest {
    pub bento_id: String,
    #[serde(rename = "challenger")]
    pub proof: Proof,
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReseasonIngredientRequest {
    pub bento_id: String,
    #[serde(rename = "challenger")]
    pub proof: Proof,
    pub name: String,
    /// Hex-encoded sealed value.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBundleResponse {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "ingridients", default)]
    pub ingredients: Vec<Ingredient>,
}

/// Generic service reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Present on a successful prepare.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bento_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Interpret a reply from the refresh endpoint.
///
/// A 200 must carry a new access token; a 401 means the refresh token is no
/// good. Anything else is worth retrying.
pub fn read_refresh_response(status: u16, body: &[u8]) -> Result<String, RefreshError> {
    match status {
        200 => serde_json::from_slice::<RefreshResponse>(body)
            .map(|r| r.access_token)
            .map_err(|e| RefreshError::Transient(format!("unreadable refresh response: {e}"))),
        401 => Err(RefreshError::Rejected(describe(body))),
        other => Err(RefreshError::Transient(format!("status {other}: {}", describe(body)))),
    }
}

fn describe(body: &[u8]) -> String {
    match serde_json::from_slice::<ApiResponse>(body) {
        Ok(response) if !response.message.is_empty() => response.message,
        _ => String::from_utf8_lossy(body).into_owned(),
    }
}
