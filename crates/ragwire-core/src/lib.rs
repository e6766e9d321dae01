//! # ragwire core
//!
//! Wire contracts for a document-indexing and retrieval-augmented generation
//! feature set, plus the small amount of logic consumers need around them.
//!
//! The contracts are grouped in three independent families:
//!
//! | Module | Family | Wire naming |
//! |--------|--------|-------------|
//! | [`drive`] | Google Drive connection, file, sync status, search hit | camelCase |
//! | [`rag`] | Generic search hit, bundle, RAG answer, user | snake_case `doc_id` |
//! | [`siftops`] | siftops search hit, bundle, sync status, RAG answer | camelCase |
//!
//! Supporting modules:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`codec`] | The [`Contract`](codec::Contract) trait, JSON decode/encode, [`ContractError`](codec::ContractError) |
//! | [`kind`] | Runtime registry of contract kinds by dotted name |
//! | [`check`] | Opt-in consumer-side checks (score bounds, timestamps, status/error consistency) |
//! | [`bundle`] | Guarded bundle mutations that respect `locked` |
//! | [`rank`] | Deterministic ordering and normalization of search hits |
//!
//! This crate has no async runtime, filesystem, or network dependencies.

pub mod bundle;
pub mod check;
pub mod codec;
pub mod drive;
pub mod kind;
pub mod rag;
pub mod rank;
pub mod siftops;

pub use codec::{decode, decode_many, decode_value, encode, encode_pretty, Contract, ContractError};
pub use kind::ContractKind;
