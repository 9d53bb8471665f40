//! Request and response types for the cloud-disk backend API.
//!
//! Field names follow the backend's snake_case JSON. Where the wire name is
//! terse (`list`, `count`, `expires`) the Rust field is renamed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Requests ─────────────────────────────────────────────────────────

/// Body of POST /api/users/login. `password` is already encoded.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub name: &'a str,
    pub password: String,
}

/// Body of POST /api/users/register.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: String,
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SendVerificationCodeRequest<'a> {
    pub email: &'a str,
}

/// Body of POST /api/users/password/update. Both passwords encoded.
#[derive(Debug, Serialize)]
pub struct ChangePasswordRequest<'a> {
    pub identity: &'a str,
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct UserDetailRequest<'a> {
    pub identity: &'a str,
}

/// Body of POST /api/file/user/list. `id` is the parent folder id (0 = root).
#[derive(Debug, Serialize)]
pub struct FileListRequest {
    pub id: i64,
    pub page: u32,
    pub size: u32,
}

#[derive(Debug, Serialize)]
pub struct CreateFolderRequest<'a> {
    pub parent_id: i64,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RenameRequest<'a> {
    pub identity: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MoveRequest<'a> {
    pub identity: &'a str,
    pub name: &'a str,
    pub parent_id: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteRequest<'a> {
    pub identity: &'a str,
}

/// Body of POST /api/file/url. `expires` is the link lifetime in seconds.
#[derive(Debug, Serialize)]
pub struct DownloadUrlRequest<'a> {
    pub repository_identity: &'a str,
    pub expires: i64,
}

/// Body of POST /api/share/create. The backend names the repository
/// identity plainly `identity`.
#[derive(Debug, Serialize)]
pub struct CreateShareRequest<'a> {
    pub identity: &'a str,
    pub expired_time: i64,
}

#[derive(Debug, Serialize)]
pub struct ShareUrlRequest<'a> {
    pub share_identity: &'a str,
    pub expires: i64,
}

#[derive(Debug, Serialize)]
pub struct SaveShareRequest<'a> {
    pub repository_identity: &'a str,
    pub parent_id: i64,
    pub name: &'a str,
}

// ── Responses ────────────────────────────────────────────────────────

/// Returned by login and registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResult {
    pub token: String,
    pub name: String,
}

/// Acknowledgement carrying an optional server message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessageAck {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetail {
    pub name: String,
    pub email: String,
}

/// One row of a folder listing (file or folder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: i64,
    pub identity: String,
    pub name: String,
    pub ext: String,
    pub size: i64,
    pub repository_identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl FileEntry {
    /// Folders have no backing repository object.
    pub fn is_folder(&self) -> bool {
        self.repository_identity.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileListPage {
    #[serde(rename = "list", default, deserialize_with = "null_as_empty")]
    pub entries: Vec<FileEntry>,
    #[serde(rename = "count")]
    pub total_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderCreated {
    pub id: i64,
    pub identity: String,
}

/// Presigned URL plus its lifetime as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadLink {
    pub url: String,
    #[serde(rename = "expires")]
    pub expires_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareCreated {
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareDetail {
    pub repository_identity: String,
    pub name: String,
    pub ext: String,
    pub size: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareSaved {
    pub identity: String,
}

/// Plain (non-enveloped) body of GET /health.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub ok: bool,
}

/// Plain body of GET /ready: `ready` or `degraded` plus per-dependency checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadyStatus {
    pub status: String,
    #[serde(default)]
    pub checks: BTreeMap<String, CheckResult>,
}

impl ReadyStatus {
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

/// The backend serializes an empty listing as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<FileEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<FileEntry>>::deserialize(deserializer)?.unwrap_or_default())
}
