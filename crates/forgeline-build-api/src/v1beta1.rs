//! The storage schema generation of the build-strategy resources.

use const_format::concatcp;
use forgeline_conversion::Resource;
use serde::{Deserialize, Serialize};

use crate::GROUP;

/// The `apiVersion` literal of this schema generation.
pub const API_VERSION: &str = concatcp!(GROUP, "/v1beta1");

/// A namespaced build strategy in the storage schema.
pub type BuildStrategy = Resource<BuildStrategySpec>;

/// A cluster-scoped build strategy in the storage schema.
pub type ClusterBuildStrategy = Resource<BuildStrategySpec>;

/// Defines the container steps and customizable parameters of a build
/// strategy.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStrategySpec {
    /// The steps executed in order to perform a build. Carried as
    /// `buildSteps` in the legacy schema.
    pub steps: Vec<Step>,

    /// Parameters a build referencing this strategy can set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,

    /// Constraints applied to the build pod running this strategy. The
    /// legacy schema cannot express this section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<StrategySecurityContext>,
}

/// A single container-based step of a build strategy.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
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

/// User and group the strategy steps run as.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategySecurityContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_user: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_group: Option<i64>,
}
