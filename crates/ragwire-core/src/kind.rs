//! Runtime registry of contract kinds.
//!
//! The CLI and HTTP service receive contract names as strings
//! (`drive.sync_status`, `rag.bundle`, ...). [`ContractKind`] maps those
//! names to the typed contracts and dispatches decoding, checking, and
//! ranking without the caller naming a Rust type.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::check::{CheckPolicy, Violation};
use crate::codec::{decode_value, to_value, Contract, ContractError};
use crate::rank::{self, Ranked};
use crate::{drive, rag, siftops};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    DriveConnection,
    DriveFile,
    DriveSyncStatus,
    DriveSearchResult,
    RagSearchResult,
    RagBundle,
    RagResponse,
    RagCitation,
    RagUser,
    SiftopsSearchResult,
    SiftopsBundle,
    SiftopsSyncStatus,
    SiftopsResponse,
    SiftopsCitation,
}

/// Result of decoding and checking a payload.
#[derive(Debug, Clone, Serialize)]
pub struct Checked {
    pub contract: &'static str,
    /// The payload re-encoded from its typed form: unknown keys dropped,
    /// absent nullable keys written as `null`.
    pub normalized: serde_json::Value,
    pub violations: Vec<Violation>,
}

impl Checked {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Summary row for listings.
#[derive(Debug, Clone, Serialize)]
pub struct KindInfo {
    pub name: &'static str,
    pub family: &'static str,
    pub description: &'static str,
    pub rankable: bool,
}

impl ContractKind {
    pub const ALL: [ContractKind; 14] = [
        ContractKind::DriveConnection,
        ContractKind::DriveFile,
        ContractKind::DriveSyncStatus,
        ContractKind::DriveSearchResult,
        ContractKind::RagSearchResult,
        ContractKind::RagBundle,
        ContractKind::RagResponse,
        ContractKind::RagCitation,
        ContractKind::RagUser,
        ContractKind::SiftopsSearchResult,
        ContractKind::SiftopsBundle,
        ContractKind::SiftopsSyncStatus,
        ContractKind::SiftopsResponse,
        ContractKind::SiftopsCitation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ContractKind::DriveConnection => drive::GDriveConnection::NAME,
            ContractKind::DriveFile => drive::GDriveFile::NAME,
            ContractKind::DriveSyncStatus => drive::GDriveSyncStatus::NAME,
            ContractKind::DriveSearchResult => drive::GDriveSearchResult::NAME,
            ContractKind::RagSearchResult => rag::SearchResult::NAME,
            ContractKind::RagBundle => rag::Bundle::NAME,
            ContractKind::RagResponse => rag::RagResponse::NAME,
            ContractKind::RagCitation => rag::Citation::NAME,
            ContractKind::RagUser => rag::User::NAME,
            ContractKind::SiftopsSearchResult => siftops::SearchResult::NAME,
            ContractKind::SiftopsBundle => siftops::Bundle::NAME,
            ContractKind::SiftopsSyncStatus => siftops::SyncStatus::NAME,
            ContractKind::SiftopsResponse => siftops::RagResponse::NAME,
            ContractKind::SiftopsCitation => siftops::Citation::NAME,
        }
    }

    pub fn family(&self) -> &'static str {
        let name = self.name();
        name.split_once('.').map(|(f, _)| f).unwrap_or(name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ContractKind::DriveConnection => "Linked Google account",
            ContractKind::DriveFile => "Drive file known to the indexer",
            ContractKind::DriveSyncStatus => "Drive sync progress (idle|indexing|indexed|error)",
            ContractKind::DriveSearchResult => "Ranked Drive hit (gdoc|pdf|text|file)",
            ContractKind::RagSearchResult => "Ranked hit addressed by location",
            ContractKind::RagBundle => "Ordered, lockable set of doc ids",
            ContractKind::RagResponse => "Generated answer with location citations",
            ContractKind::RagCitation => "Citation label, location, and excerpt",
            ContractKind::RagUser => "User id and access groups",
            ContractKind::SiftopsSearchResult => "Ranked siftops hit (post|page)",
            ContractKind::SiftopsBundle => "Ordered, lockable set of siftops doc ids",
            ContractKind::SiftopsSyncStatus => "siftops sync progress (idle|syncing|complete|error)",
            ContractKind::SiftopsResponse => "Generated answer with URL citations",
            ContractKind::SiftopsCitation => "Citation label, URL, title, and excerpt",
        }
    }

    /// Whether payloads of this kind are ranked search hits.
    pub fn is_search_result(&self) -> bool {
        matches!(
            self,
            ContractKind::DriveSearchResult
                | ContractKind::RagSearchResult
                | ContractKind::SiftopsSearchResult
        )
    }

    pub fn info(&self) -> KindInfo {
        KindInfo {
            name: self.name(),
            family: self.family(),
            description: self.description(),
            rankable: self.is_search_result(),
        }
    }

    /// Decode `value` as this kind, re-encode it, and run its checks.
    pub fn check_json(
        &self,
        value: serde_json::Value,
        policy: &CheckPolicy,
    ) -> Result<Checked, ContractError> {
        match self {
            ContractKind::DriveConnection => check_one::<drive::GDriveConnection>(value, policy),
            ContractKind::DriveFile => check_one::<drive::GDriveFile>(value, policy),
            ContractKind::DriveSyncStatus => check_one::<drive::GDriveSyncStatus>(value, policy),
            ContractKind::DriveSearchResult => {
                check_one::<drive::GDriveSearchResult>(value, policy)
            }
            ContractKind::RagSearchResult => check_one::<rag::SearchResult>(value, policy),
            ContractKind::RagBundle => check_one::<rag::Bundle>(value, policy),
            ContractKind::RagResponse => check_one::<rag::RagResponse>(value, policy),
            ContractKind::RagCitation => check_one::<rag::Citation>(value, policy),
            ContractKind::RagUser => check_one::<rag::User>(value, policy),
            ContractKind::SiftopsSearchResult => check_one::<siftops::SearchResult>(value, policy),
            ContractKind::SiftopsBundle => check_one::<siftops::Bundle>(value, policy),
            ContractKind::SiftopsSyncStatus => check_one::<siftops::SyncStatus>(value, policy),
            ContractKind::SiftopsResponse => check_one::<siftops::RagResponse>(value, policy),
            ContractKind::SiftopsCitation => check_one::<siftops::Citation>(value, policy),
        }
    }

    /// Like [`check_json`](Self::check_json) for a JSON array of this kind.
    ///
    /// Violation fields are prefixed with the element index, e.g. `[3].score`.
    pub fn check_json_many(
        &self,
        value: serde_json::Value,
        policy: &CheckPolicy,
    ) -> Result<Checked, ContractError> {
        match self {
            ContractKind::DriveConnection => check_many::<drive::GDriveConnection>(value, policy),
            ContractKind::DriveFile => check_many::<drive::GDriveFile>(value, policy),
            ContractKind::DriveSyncStatus => check_many::<drive::GDriveSyncStatus>(value, policy),
            ContractKind::DriveSearchResult => {
                check_many::<drive::GDriveSearchResult>(value, policy)
            }
            ContractKind::RagSearchResult => check_many::<rag::SearchResult>(value, policy),
            ContractKind::RagBundle => check_many::<rag::Bundle>(value, policy),
            ContractKind::RagResponse => check_many::<rag::RagResponse>(value, policy),
            ContractKind::RagCitation => check_many::<rag::Citation>(value, policy),
            ContractKind::RagUser => check_many::<rag::User>(value, policy),
            ContractKind::SiftopsSearchResult => {
                check_many::<siftops::SearchResult>(value, policy)
            }
            ContractKind::SiftopsBundle => check_many::<siftops::Bundle>(value, policy),
            ContractKind::SiftopsSyncStatus => check_many::<siftops::SyncStatus>(value, policy),
            ContractKind::SiftopsResponse => check_many::<siftops::RagResponse>(value, policy),
            ContractKind::SiftopsCitation => check_many::<siftops::Citation>(value, policy),
        }
    }

    /// Rank a JSON array of search hits of this kind.
    ///
    /// Fails with [`ContractError::NotRankable`] for kinds that are not
    /// search results.
    pub fn rank_json(
        &self,
        value: serde_json::Value,
        limit: Option<usize>,
        normalize: bool,
    ) -> Result<serde_json::Value, ContractError> {
        match self {
            ContractKind::DriveSearchResult => {
                rank_many::<drive::GDriveSearchResult>(value, limit, normalize)
            }
            ContractKind::RagSearchResult => {
                rank_many::<rag::SearchResult>(value, limit, normalize)
            }
            ContractKind::SiftopsSearchResult => {
                rank_many::<siftops::SearchResult>(value, limit, normalize)
            }
            other => Err(ContractError::NotRankable(other.name())),
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContractKind {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContractKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| ContractError::UnknownKind(s.to_string()))
    }
}

fn check_one<T: Contract>(
    value: serde_json::Value,
    policy: &CheckPolicy,
) -> Result<Checked, ContractError> {
    let typed: T = decode_value(value)?;
    let violations = typed.check(policy);
    if !violations.is_empty() {
        tracing::debug!(contract = T::NAME, count = violations.len(), "check violations");
    }
    Ok(Checked {
        contract: T::NAME,
        normalized: to_value(&typed)?,
        violations,
    })
}

fn check_many<T: Contract>(
    value: serde_json::Value,
    policy: &CheckPolicy,
) -> Result<Checked, ContractError> {
    let items: Vec<T> = serde_json::from_value(value).map_err(|source| {
        ContractError::Malformed {
            contract: T::NAME,
            source,
        }
    })?;

    let mut violations = Vec::new();
    let mut normalized = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        for v in item.check(policy) {
            violations.push(Violation::new(format!("[{}].{}", i, v.field), v.message));
        }
        normalized.push(to_value(item)?);
    }

    Ok(Checked {
        contract: T::NAME,
        normalized: serde_json::Value::Array(normalized),
        violations,
    })
}

fn rank_many<T: Contract + Ranked>(
    value: serde_json::Value,
    limit: Option<usize>,
    normalize: bool,
) -> Result<serde_json::Value, ContractError> {
    let mut hits: Vec<T> = serde_json::from_value(value).map_err(|source| {
        ContractError::Malformed {
            contract: T::NAME,
            source,
        }
    })?;

    if normalize {
        rank::normalize_scores(&mut hits);
    }
    let hits = match limit {
        Some(k) => rank::top_k(hits, k),
        None => {
            rank::rank(&mut hits);
            hits
        }
    };

    let ranked = hits.iter().map(to_value).collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::Value::Array(ranked))
}
