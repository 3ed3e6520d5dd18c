//! Wires the build-strategy schema generations into the conversion core.

use forgeline_conversion::{KindConverter, MappingError, SpecMapper};

use crate::{KIND_BUILD_STRATEGY, KIND_CLUSTER_BUILD_STRATEGY, v1alpha1, v1beta1};

/// The conversion entry point for build-strategy kinds.
pub type BuildStrategyConverter =
    KindConverter<v1alpha1::BuildStrategySpec, v1beta1::BuildStrategySpec>;

/// Field mapper between the legacy and storage build-strategy specs.
///
/// The step lists carry the same schema under different names, `buildSteps`
/// in the legacy generation and `steps` in the storage generation.
/// Parameters map field by field. The storage-only `securityContext`
/// section has no legacy counterpart and is dropped when mapping back; it
/// is the one field excluded from the round-trip guarantee.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildStrategyMapper;

impl SpecMapper for BuildStrategyMapper {
    type Legacy = v1alpha1::BuildStrategySpec;
    type Storage = v1beta1::BuildStrategySpec;

    fn spec_to_storage(&self, legacy: &Self::Legacy) -> Result<Self::Storage, MappingError> {
        Ok(v1beta1::BuildStrategySpec {
            steps: legacy.build_steps.iter().map(step_to_storage).collect(),
            parameters: legacy
                .parameters
                .as_ref()
                .map(|parameters| parameters.iter().map(parameter_to_storage).collect()),
            // The legacy schema has no security context to carry over.
            security_context: None,
        })
    }

    fn spec_to_legacy(&self, storage: &Self::Storage) -> Result<Self::Legacy, MappingError> {
        // The storage-only securityContext section is dropped here.
        Ok(v1alpha1::BuildStrategySpec {
            build_steps: storage.steps.iter().map(step_to_legacy).collect(),
            parameters: storage
                .parameters
                .as_ref()
                .map(|parameters| parameters.iter().map(parameter_to_legacy).collect()),
        })
    }
}

fn step_to_storage(step: &v1alpha1::BuildStep) -> v1beta1::Step {
    v1beta1::Step {
        name: step.name.clone(),
        image: step.image.clone(),
        command: step.command.clone(),
        args: step.args.clone(),
        working_dir: step.working_dir.clone(),
    }
}

fn step_to_legacy(step: &v1beta1::Step) -> v1alpha1::BuildStep {
    v1alpha1::BuildStep {
        name: step.name.clone(),
        image: step.image.clone(),
        command: step.command.clone(),
        args: step.args.clone(),
        working_dir: step.working_dir.clone(),
    }
}

fn parameter_to_storage(parameter: &v1alpha1::Parameter) -> v1beta1::Parameter {
    v1beta1::Parameter {
        name: parameter.name.clone(),
        description: parameter.description.clone(),
        default: parameter.default.clone(),
    }
}

fn parameter_to_legacy(parameter: &v1beta1::Parameter) -> v1alpha1::Parameter {
    v1alpha1::Parameter {
        name: parameter.name.clone(),
        description: parameter.description.clone(),
        default: parameter.default.clone(),
    }
}

/// Returns the conversion entry point for the namespaced build-strategy
/// kind.
pub fn build_strategy_converter() -> BuildStrategyConverter {
    KindConverter::new(
        KIND_BUILD_STRATEGY,
        v1alpha1::API_VERSION,
        v1beta1::API_VERSION,
        Box::new(BuildStrategyMapper),
    )
}

/// Returns the conversion entry point for the cluster-scoped build-strategy
/// kind.
pub fn cluster_build_strategy_converter() -> BuildStrategyConverter {
    KindConverter::new(
        KIND_CLUSTER_BUILD_STRATEGY,
        v1alpha1::API_VERSION,
        v1beta1::API_VERSION,
        Box::new(BuildStrategyMapper),
    )
}
