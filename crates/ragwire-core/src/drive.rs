//! Google Drive connection, indexed-file, sync-status, and search-hit contracts.
//!
//! All fields use camelCase on the wire. Nullable fields are `Option`s that
//! encode as `null` and decode from either `null` or an absent key.

use serde::{Deserialize, Serialize};

use crate::check::{self, CheckPolicy, Violation};
use crate::codec::Contract;

/// A linked Google account.
///
/// Created when the OAuth link completes and removed on unlink. `connected`
/// goes false when the stored credentials stop validating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GDriveConnection {
    pub id: String,
    pub email: String,
    pub connected: bool,
}

impl Contract for GDriveConnection {
    const NAME: &'static str = "drive.connection";

    fn check(&self, _policy: &CheckPolicy) -> Vec<Violation> {
        let mut out = Vec::new();
        check::non_empty(&mut out, "id", &self.id);
        if !self.email.contains('@') {
            out.push(Violation::new(
                "email",
                format!("'{}' is not an email address", self.email),
            ));
        }
        out
    }
}

/// A remote Drive file known to the indexer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GDriveFile {
    pub id: String,
    /// Drive's own file identifier.
    pub file_id: String,
    pub name: String,
    pub mime_type: String,
    pub web_view_link: String,
    #[serde(default)]
    pub folder_path: Option<String>,
    /// True once the content has been split into searchable chunks.
    pub indexed: bool,
    #[serde(default)]
    pub modified_time: Option<String>,
}

impl Contract for GDriveFile {
    const NAME: &'static str = "drive.file";

    fn check(&self, policy: &CheckPolicy) -> Vec<Violation> {
        let mut out = Vec::new();
        check::non_empty(&mut out, "id", &self.id);
        check::non_empty(&mut out, "fileId", &self.file_id);
        check::timestamp(&mut out, "modifiedTime", self.modified_time.as_deref(), policy);
        out
    }
}

/// Lifecycle state of a Drive sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GDriveSyncState {
    Idle,
    Indexing,
    Indexed,
    Error,
}

impl GDriveSyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GDriveSyncState::Idle => "idle",
            GDriveSyncState::Indexing => "indexing",
            GDriveSyncState::Indexed => "indexed",
            GDriveSyncState::Error => "error",
        }
    }
}

/// Point-in-time progress of a Drive sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GDriveSyncStatus {
    pub files_count: u64,
    pub chunks_count: u64,
    pub status: GDriveSyncState,
    #[serde(default)]
    pub synced_at: Option<String>,
    /// Failure message; only set when `status` is [`GDriveSyncState::Error`].
    #[serde(default)]
    pub error: Option<String>,
}

impl GDriveSyncStatus {
    /// A sync that has never run.
    pub fn idle() -> Self {
        Self {
            files_count: 0,
            chunks_count: 0,
            status: GDriveSyncState::Idle,
            synced_at: None,
            error: None,
        }
    }

    /// A sync that stopped with `message`, keeping the counts reached so far.
    pub fn failed(files_count: u64, chunks_count: u64, message: impl Into<String>) -> Self {
        Self {
            files_count,
            chunks_count,
            status: GDriveSyncState::Error,
            synced_at: None,
            error: Some(message.into()),
        }
    }
}

impl Contract for GDriveSyncStatus {
    const NAME: &'static str = "drive.sync_status";

    fn check(&self, policy: &CheckPolicy) -> Vec<Violation> {
        let mut out = Vec::new();
        check::timestamp(&mut out, "syncedAt", self.synced_at.as_deref(), policy);
        if self.error.is_some() && self.status != GDriveSyncState::Error {
            out.push(Violation::new(
                "error",
                format!(
                    "error message present while status is '{}'",
                    self.status.as_str()
                ),
            ));
        }
        out
    }
}

/// Kind of document behind a Drive search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GDriveDocType {
    Gdoc,
    Pdf,
    Text,
    File,
}

/// A ranked Drive search hit. Higher `score` is more relevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GDriveSearchResult {
    pub doc_id: String,
    #[serde(rename = "type")]
    pub doc_type: GDriveDocType,
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub score: f64,
    pub mime_type: String,
    #[serde(default)]
    pub folder_path: Option<String>,
}

impl Contract for GDriveSearchResult {
    const NAME: &'static str = "drive.search_result";

    fn check(&self, policy: &CheckPolicy) -> Vec<Violation> {
        let mut out = Vec::new();
        check::non_empty(&mut out, "docId", &self.doc_id);
        check::score(&mut out, "score", self.score, policy);
        out
    }
}
