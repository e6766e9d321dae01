//! Guarded bundle mutation.
//!
//! A bundle's `locked` flag is plain data on the wire; nothing stops a
//! caller from editing the fields directly. [`BundleOps`] is the mutation
//! path that honors it: once a bundle is locked every edit fails with
//! [`BundleError::Locked`], and there is no way to unlock it again.

use thiserror::Error;

use crate::{rag, siftops};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleError {
    #[error("bundle {bundle} is locked")]
    Locked { bundle: String },

    #[error("bundle {bundle} already contains {doc}")]
    Duplicate { bundle: String, doc: String },

    #[error("bundle {bundle} does not contain {doc}")]
    NotFound { bundle: String, doc: String },

    #[error("index {index} out of range for bundle {bundle} with {len} docs")]
    OutOfRange {
        bundle: String,
        index: usize,
        len: usize,
    },
}

/// Lock-aware editing shared by [`rag::Bundle`] and [`siftops::Bundle`].
///
/// Implementors only expose their fields; the guarded operations are
/// provided.
pub trait BundleOps {
    fn bundle_id(&self) -> &str;
    fn doc_ids(&self) -> &[String];
    fn is_locked(&self) -> bool;

    #[doc(hidden)]
    fn doc_ids_mut(&mut self) -> &mut Vec<String>;
    #[doc(hidden)]
    fn set_locked(&mut self);

    /// Append `doc` to the end of the bundle.
    fn push_doc(&mut self, doc: impl Into<String>) -> Result<(), BundleError> {
        self.ensure_unlocked()?;
        let doc = doc.into();
        if self.doc_ids().contains(&doc) {
            return Err(BundleError::Duplicate {
                bundle: self.bundle_id().to_string(),
                doc,
            });
        }
        self.doc_ids_mut().push(doc);
        Ok(())
    }

    /// Remove `doc`, keeping the order of the rest.
    fn remove_doc(&mut self, doc: &str) -> Result<(), BundleError> {
        self.ensure_unlocked()?;
        let pos = self
            .doc_ids()
            .iter()
            .position(|d| d == doc)
            .ok_or_else(|| BundleError::NotFound {
                bundle: self.bundle_id().to_string(),
                doc: doc.to_string(),
            })?;
        self.doc_ids_mut().remove(pos);
        Ok(())
    }

    /// Move the doc at index `from` so it ends up at index `to`.
    fn move_doc(&mut self, from: usize, to: usize) -> Result<(), BundleError> {
        self.ensure_unlocked()?;
        let len = self.doc_ids().len();
        for index in [from, to] {
            if index >= len {
                return Err(BundleError::OutOfRange {
                    bundle: self.bundle_id().to_string(),
                    index,
                    len,
                });
            }
        }
        let docs = self.doc_ids_mut();
        let doc = docs.remove(from);
        docs.insert(to, doc);
        Ok(())
    }

    /// Lock the bundle. Locking an already locked bundle is a no-op.
    fn lock(&mut self) {
        if !self.is_locked() {
            tracing::debug!(bundle = self.bundle_id(), "locking bundle");
            self.set_locked();
        }
    }

    fn ensure_unlocked(&self) -> Result<(), BundleError> {
        if self.is_locked() {
            tracing::warn!(bundle = self.bundle_id(), "rejected edit of locked bundle");
            return Err(BundleError::Locked {
                bundle: self.bundle_id().to_string(),
            });
        }
        Ok(())
    }
}

impl BundleOps for rag::Bundle {
    fn bundle_id(&self) -> &str {
        &self.id
    }
    fn doc_ids(&self) -> &[String] {
        &self.docs
    }
    fn is_locked(&self) -> bool {
        self.locked
    }
    fn doc_ids_mut(&mut self) -> &mut Vec<String> {
        &mut self.docs
    }
    fn set_locked(&mut self) {
        self.locked = true;
    }
}

impl BundleOps for siftops::Bundle {
    fn bundle_id(&self) -> &str {
        &self.bundle_id
    }
    fn doc_ids(&self) -> &[String] {
        &self.doc_ids
    }
    fn is_locked(&self) -> bool {
        self.locked
    }
    fn doc_ids_mut(&mut self) -> &mut Vec<String> {
        &mut self.doc_ids
    }
    fn set_locked(&mut self) {
        self.locked = true;
    }
}
