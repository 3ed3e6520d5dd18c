//! The typed envelope shared by every schema generation of a resource.

use serde::{Deserialize, Serialize};

// Re-export the metadata types the envelope is built from. Consumers of
// this crate require them to construct resources and would otherwise need
// to keep their own kube and k8s-openapi versions in sync with ours.
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
pub use kube::core::TypeMeta;

/// A versioned API object.
///
/// The envelope is identical across schema generations: the type identity
/// (`apiVersion` and `kind`), the identity metadata (name, namespace,
/// labels, and so on) and a version-specific `spec`. Conversion only ever
/// reshapes the spec; `kind` and the identity metadata are copied
/// verbatim, and `apiVersion` is set to the target version as the result
/// of a successful conversion.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Resource<S> {
    #[serde(flatten)]
    pub types: TypeMeta,

    #[serde(default)]
    pub metadata: ObjectMeta,

    pub spec: S,
}

impl<S> Resource<S> {
    /// Creates a resource of the given kind and version with empty
    /// identity metadata.
    pub fn new(kind: impl Into<String>, api_version: impl Into<String>, spec: S) -> Self {
        Self {
            types: TypeMeta {
                api_version: api_version.into(),
                kind: kind.into(),
            },
            metadata: ObjectMeta::default(),
            spec,
        }
    }

    /// The schema version this object is currently encoded in.
    pub fn api_version(&self) -> &str {
        &self.types.api_version
    }

    /// The resource type, stable across all schema versions.
    pub fn kind(&self) -> &str {
        &self.types.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_meta_serializes_flattened() {
        let resource = Resource::new("BuildStrategy", "build.forgeline.dev/v1alpha1", ());
        let value = serde_json::to_value(&resource).expect("resources must serialize");

        assert_eq!(value["apiVersion"], "build.forgeline.dev/v1alpha1");
        assert_eq!(value["kind"], "BuildStrategy");
    }
}
