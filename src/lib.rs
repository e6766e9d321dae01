//! # ragwire
//!
//! Command-line and HTTP tooling around the wire contracts defined in
//! [`ragwire_core`]: Google Drive connection/sync/search metadata, generic
//! search hits, bundles, and RAG answers, and the siftops variants of the
//! same.
//!
//! ## Quick Start
//!
//! ```bash
//! ragwire kinds                                   # list contract kinds
//! ragwire check drive.sync_status status.json     # decode + check a payload
//! ragwire check rag.search_result hits.json --many
//! ragwire rank siftops.search_result hits.json --limit 5 --normalize
//! ragwire serve                                   # start the HTTP service
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`input`] | Payload reading from files or stdin |
//! | [`check_cmd`] | `ragwire check` |
//! | [`rank_cmd`] | `ragwire rank` |
//! | [`kinds`] | `ragwire kinds` |
//! | [`server`] | HTTP contract-checking service |

pub mod check_cmd;
pub mod config;
pub mod input;
pub mod kinds;
pub mod logging;
pub mod rank_cmd;
pub mod server;
