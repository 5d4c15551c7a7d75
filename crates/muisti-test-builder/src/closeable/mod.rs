//! Closeable resource tracking
//!
//! Every resource a builder creates is registered here together with the
//! action that undoes it. At the end of a test the registry closes the pending
//! handles in registration order. Explicit deletes deregister their handle so
//! nothing is deleted twice.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::builder::BuilderError;

/// Identity of a tracked resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    GroupContentVersion(Uuid),
    StoredFile(String),
    OutputFile(PathBuf),
    /// Resources registered by callers with their own close action
    Custom(String),
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKey::GroupContentVersion(id) => write!(f, "group content version {}", id),
            ResourceKey::StoredFile(id) => write!(f, "stored file {}", id),
            ResourceKey::OutputFile(path) => write!(f, "output file {}", path.display()),
            ResourceKey::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// A created resource plus the action that removes it again
pub trait Closeable {
    /// Identity used to find this handle after an explicit delete
    fn key(&self) -> ResourceKey;

    /// Undo the creation of the resource
    fn close(self: Box<Self>) -> Result<(), BuilderError>;
}

/// Closeable backed by a closure
pub struct CloseableFn<F> {
    key: ResourceKey,
    action: F,
}

impl<F> CloseableFn<F>
where
    F: FnOnce() -> Result<(), BuilderError>,
{
    pub fn new(key: ResourceKey, action: F) -> Self {
        Self { key, action }
    }
}

impl<F> Closeable for CloseableFn<F>
where
    F: FnOnce() -> Result<(), BuilderError>,
{
    fn key(&self) -> ResourceKey {
        self.key.clone()
    }

    fn close(self: Box<Self>) -> Result<(), BuilderError> {
        (self.action)()
    }
}

/// A close action that failed during teardown
#[derive(Debug, Error)]
#[error("{resource}: {error}")]
pub struct CloseFailure {
    pub resource: ResourceKey,
    #[source]
    pub error: BuilderError,
}

/// Every close action that failed during one teardown
#[derive(Debug, Error)]
#[error("Failed to close {} resource(s): {}", .failures.len(), join(.failures))]
pub struct TeardownError {
    pub failures: Vec<CloseFailure>,
}

fn join(failures: &[CloseFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Ordered collection of pending closeable handles
#[derive(Default)]
pub struct CloseableRegistry {
    entries: Vec<Box<dyn Closeable>>,
}

impl fmt::Debug for CloseableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

impl CloseableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handle; it will be closed after every earlier one
    pub fn register(&mut self, closeable: Box<dyn Closeable>) {
        trace!(resource = %closeable.key(), "Registered closeable");
        self.entries.push(closeable);
    }

    /// Drop every handle whose key matches, without closing it
    ///
    /// Returns the number of handles removed.
    pub fn remove_where<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&ResourceKey) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|entry| !predicate(&entry.key()));
        let removed = before - self.entries.len();

        trace!(removed, remaining = self.entries.len(), "Deregistered closeables");
        removed
    }

    /// Close every handle in registration order, then clear the registry
    ///
    /// A failing close does not stop the remaining ones; all failures are
    /// returned together.
    pub fn close_all(&mut self) -> Result<(), TeardownError> {
        let entries = std::mem::take(&mut self.entries);
        let total = entries.len();
        let mut failures = Vec::new();

        for entry in entries {
            let resource = entry.key();
            match entry.close() {
                Ok(()) => debug!(%resource, "Closed resource"),
                Err(error) => {
                    warn!(%resource, %error, "Failed to close resource");
                    failures.push(CloseFailure { resource, error });
                }
            }
        }

        debug!(total, failed = failures.len(), "Teardown finished");

        if failures.is_empty() {
            Ok(())
        } else {
            Err(TeardownError { failures })
        }
    }

    /// Keys of the pending handles, in close order
    pub fn keys(&self) -> Vec<ResourceKey> {
        self.entries.iter().map(|entry| entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
