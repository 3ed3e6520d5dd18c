//! Policy check rejecting conversions that target an object's own storage
//! version.

use crate::{Result, StorageVersionConflictSnafu};

/// The direction a conversion request moves in between schema generations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum Direction {
    /// From the typed object into the unstructured form of the storage
    /// version.
    #[strum(serialize = "to")]
    To,

    /// From the unstructured form of the storage version into the typed
    /// object.
    #[strum(serialize = "from")]
    From,
}

/// Declares which schema version a resource kind is persisted in.
///
/// Exactly one version per kind is the storage version at any time. The
/// declaration is static configuration supplied at construction, never
/// computed from the objects passing through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageVersionPolicy {
    kind: String,
    storage_version: String,
}

impl StorageVersionPolicy {
    pub fn new(kind: impl Into<String>, storage_version: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            storage_version: storage_version.into(),
        }
    }

    /// The resource kind this policy applies to.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The version objects of this kind are persisted in.
    pub fn storage_version(&self) -> &str {
        &self.storage_version
    }
}

/// Per-kind guard deciding whether a conversion request may proceed.
///
/// An object already encoded in its kind's storage version has nothing to
/// convert to or from; letting such a request silently succeed as a no-op
/// would mask caller logic errors, so it is always rejected.
#[derive(Clone, Debug)]
pub struct StorageVersionGuard {
    policy: StorageVersionPolicy,
}

impl StorageVersionGuard {
    pub fn new(policy: StorageVersionPolicy) -> Self {
        Self { policy }
    }

    /// Checks a conversion request of an object at `api_version` moving in
    /// `direction`.
    ///
    /// Returns [`ConversionError::StorageVersionConflict`] if the object
    /// is already at the declared storage version, otherwise the request
    /// is cleared for delegation to the version converter.
    ///
    /// [`ConversionError::StorageVersionConflict`]: crate::ConversionError::StorageVersionConflict
    pub fn check(&self, direction: Direction, api_version: &str) -> Result<()> {
        if api_version == self.policy.storage_version {
            return StorageVersionConflictSnafu {
                kind: self.policy.kind.as_str(),
                api_version,
                direction,
            }
            .fail();
        }

        Ok(())
    }

    pub fn policy(&self) -> &StorageVersionPolicy {
        &self.policy
    }
}
