//! Versioned API types for Forgeline build strategies.
//!
//! A build strategy describes the container steps a build executes, either
//! namespaced (`BuildStrategy`) or cluster-scoped (`ClusterBuildStrategy`).
//! Two schema generations exist: [`v1alpha1`] is the legacy generation kept
//! for backward compatibility, [`v1beta1`] is the storage version every
//! strategy is persisted in. The [`convert`] module wires both generations
//! into the conversion core.

pub mod convert;
pub mod v1alpha1;
pub mod v1beta1;

/// The API group all build-strategy resources belong to.
pub const GROUP: &str = "build.forgeline.dev";

/// Kind of the namespaced build-strategy resource.
pub const KIND_BUILD_STRATEGY: &str = "BuildStrategy";

/// Kind of the cluster-scoped build-strategy resource.
pub const KIND_CLUSTER_BUILD_STRATEGY: &str = "ClusterBuildStrategy";
