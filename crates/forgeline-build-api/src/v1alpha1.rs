//! The legacy schema generation of the build-strategy resources.

use const_format::concatcp;
use forgeline_conversion::Resource;
use serde::{Deserialize, Serialize};

use crate::GROUP;

/// The `apiVersion` literal of this schema generation.
pub const API_VERSION: &str = concatcp!(GROUP, "/v1alpha1");

/// A namespaced build strategy in the legacy schema.
pub type BuildStrategy = Resource<BuildStrategySpec>;

/// A cluster-scoped build strategy in the legacy schema.
pub type ClusterBuildStrategy = Resource<BuildStrategySpec>;

/// Defines the container steps and customizable parameters of a build
/// strategy.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStrategySpec {
    /// The steps executed in order to perform a build.
    pub build_steps: Vec<BuildStep>,

    /// Parameters a build referencing this strategy can set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
}

/// A single container-based step of a build strategy.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStep {
    pub name: String,

    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
}

/// A value a build referencing this strategy can customize.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}
