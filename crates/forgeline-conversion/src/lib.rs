//! Conversion layer between the schema generations of a versioned API
//! object.
//!
//! A resource kind exists in exactly two schema generations at a time: a
//! legacy version kept for backward compatibility and the storage version
//! all other versions convert to and from. This crate implements the
//! mechanics around that conversion: the projection between typed values
//! and their schema-less (unstructured) form, the per-version-pair
//! converter which delegates field-level mapping to an injected
//! [`SpecMapper`], and the guard which rejects requests that target an
//! object's own storage version.
//!
//! The usual entry point is a [`KindConverter`], one per resource kind:
//!
//! ```
//! use forgeline_conversion::{
//!     Conversion, KindConverter, MappingError, Resource, SpecMapper, UnstructuredObject,
//! };
//! # use serde::{Deserialize, Serialize};
//! # #[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
//! # struct LegacySpec { steps: Vec<String> }
//! # #[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
//! # struct StorageSpec { steps: Vec<String> }
//! # struct Mapper;
//! # impl SpecMapper for Mapper {
//! #     type Legacy = LegacySpec;
//! #     type Storage = StorageSpec;
//! #     fn spec_to_storage(&self, legacy: &LegacySpec) -> Result<StorageSpec, MappingError> {
//! #         Ok(StorageSpec { steps: legacy.steps.clone() })
//! #     }
//! #     fn spec_to_legacy(&self, storage: &StorageSpec) -> Result<LegacySpec, MappingError> {
//! #         Ok(LegacySpec { steps: storage.steps.clone() })
//! #     }
//! # }
//!
//! let converter = KindConverter::new(
//!     "ClusterBuildStrategy",
//!     "build.forgeline.dev/v1alpha1",
//!     "build.forgeline.dev/v1beta1",
//!     Box::new(Mapper),
//! );
//!
//! let object = Resource::new(
//!     "ClusterBuildStrategy",
//!     "build.forgeline.dev/v1alpha1",
//!     LegacySpec { steps: vec!["step1".to_owned()] },
//! );
//!
//! let mut output = UnstructuredObject::new();
//! converter
//!     .convert_to(&object, &mut output)
//!     .expect("legacy objects must convert to the storage version");
//! ```
//!
//! Conversion is synchronous, stateless and free of side effects; failures
//! are emitted as [`tracing`] events and returned, never recovered from or
//! retried.

use snafu::Snafu;

pub mod convert;
pub mod guard;
pub mod resource;
pub mod unstructured;

pub use crate::{
    convert::{Conversion, DynSpecMapper, KindConverter, MappingError, SpecMapper, VersionConverter},
    guard::{Direction, StorageVersionGuard, StorageVersionPolicy},
    resource::Resource,
    unstructured::{CodecError, UnstructuredObject},
};

/// A result type alias with the [`ConversionError`] type as the default
/// error type.
pub type Result<T, E = ConversionError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum ConversionError {
    #[snafu(display(
        "\"{api_version}\" is the current storage version of kind \"{kind}\", nothing to convert {direction}"
    ))]
    StorageVersionConflict {
        kind: String,
        api_version: String,
        direction: Direction,
    },

    #[snafu(display("failed to encode the converted \"{kind}\" object into its unstructured form"))]
    EncodeObject { source: CodecError, kind: String },

    #[snafu(display("failed to decode the unstructured \"{kind}\" object sent for conversion"))]
    DecodeObject { source: CodecError, kind: String },

    #[snafu(display("failed to map the \"{kind}\" spec between schema versions"))]
    MapSpec { source: MappingError, kind: String },
}
