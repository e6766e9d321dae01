//! JSON codec for wire contracts.
//!
//! Every contract type implements [`Contract`], which ties it to a dotted
//! kind name (e.g. `drive.sync_status`) used in error messages and by the
//! [`kind`](crate::kind) registry. Decoding never validates semantics; it
//! only enforces field presence, field types, and closed enum sets. Semantic
//! checks live in [`check`](crate::check) and are opt-in.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::check::{CheckPolicy, Violation};

/// A serializable wire contract.
pub trait Contract: Serialize + DeserializeOwned {
    /// Dotted kind name, `<family>.<contract>`.
    const NAME: &'static str;

    /// Run consumer-side checks against `policy`.
    ///
    /// Contracts with nothing to check keep the default, which reports no
    /// violations.
    fn check(&self, _policy: &CheckPolicy) -> Vec<Violation> {
        Vec::new()
    }
}

/// Errors produced while decoding or encoding contracts.
#[derive(Debug, Error)]
pub enum ContractError {
    /// The payload does not match the contract shape: a required field is
    /// missing, a field has the wrong type, or an enum value is outside its
    /// literal set.
    #[error("malformed {contract} contract: {source}")]
    Malformed {
        contract: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {contract} contract: {source}")]
    Encode {
        contract: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// No contract is registered under this name.
    #[error("unknown contract kind: '{0}'")]
    UnknownKind(String),

    /// Ranking was requested for a contract that is not a search hit.
    #[error("{0} is not a search-result contract and cannot be ranked")]
    NotRankable(&'static str),
}

impl ContractError {
    /// The kind name the error refers to.
    pub fn contract(&self) -> &str {
        match self {
            ContractError::Malformed { contract, .. }
            | ContractError::Encode { contract, .. }
            | ContractError::NotRankable(contract) => *contract,
            ContractError::UnknownKind(name) => name.as_str(),
        }
    }
}

/// Decode a single contract from JSON text.
pub fn decode<T: Contract>(json: &str) -> Result<T, ContractError> {
    serde_json::from_str(json).map_err(|source| ContractError::Malformed {
        contract: T::NAME,
        source,
    })
}

/// Decode a single contract from an already-parsed JSON value.
pub fn decode_value<T: Contract>(value: serde_json::Value) -> Result<T, ContractError> {
    serde_json::from_value(value).map_err(|source| ContractError::Malformed {
        contract: T::NAME,
        source,
    })
}

/// Decode a JSON array of contracts.
pub fn decode_many<T: Contract>(json: &str) -> Result<Vec<T>, ContractError> {
    serde_json::from_str(json).map_err(|source| ContractError::Malformed {
        contract: T::NAME,
        source,
    })
}

/// Encode a contract as compact JSON.
pub fn encode<T: Contract>(value: &T) -> Result<String, ContractError> {
    serde_json::to_string(value).map_err(|source| ContractError::Encode {
        contract: T::NAME,
        source,
    })
}

/// Encode a contract as pretty-printed JSON.
pub fn encode_pretty<T: Contract>(value: &T) -> Result<String, ContractError> {
    serde_json::to_string_pretty(value).map_err(|source| ContractError::Encode {
        contract: T::NAME,
        source,
    })
}

pub(crate) fn to_value<T: Contract>(value: &T) -> Result<serde_json::Value, ContractError> {
    serde_json::to_value(value).map_err(|source| ContractError::Encode {
        contract: T::NAME,
        source,
    })
}
