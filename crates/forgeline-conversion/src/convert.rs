//! Conversion between the legacy typed form of a resource and the
//! unstructured form of its storage version.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use snafu::{ResultExt, Snafu};

use crate::{
    DecodeObjectSnafu, EncodeObjectSnafu, MapSpecSnafu, Result,
    guard::{Direction, StorageVersionGuard, StorageVersionPolicy},
    resource::{Resource, TypeMeta},
    unstructured::{self, UnstructuredObject},
};

/// Field-level mapping between the legacy and storage generations of a
/// resource spec.
///
/// Implementations are supplied per kind and injected into the
/// [`VersionConverter`]; the converter itself never contains field
/// knowledge. Both operations must be pure and must not mutate their
/// input. Fields only one generation can express are outside the
/// round-trip guarantee and must be documented on the implementation.
pub trait SpecMapper {
    type Legacy;
    type Storage;

    /// Maps a legacy spec into its storage-version equivalent.
    fn spec_to_storage(&self, legacy: &Self::Legacy) -> Result<Self::Storage, MappingError>;

    /// Maps a storage-version spec back into its legacy equivalent.
    fn spec_to_legacy(&self, storage: &Self::Storage) -> Result<Self::Legacy, MappingError>;
}

/// A boxed [`SpecMapper`], as injected into a [`VersionConverter`].
pub type DynSpecMapper<L, S> = Box<dyn SpecMapper<Legacy = L, Storage = S> + Send + Sync>;

/// Error raised by a [`SpecMapper`] implementation.
#[derive(Debug, Snafu)]
#[snafu(display("failed to map the spec field \"{field}\": {reason}"))]
pub struct MappingError {
    field: String,
    reason: String,
}

impl MappingError {
    /// Creates an error naming the offending spec field and why it could
    /// not be mapped.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Converts objects of a single resource kind between its legacy typed
/// form and the unstructured form of its storage version.
///
/// Both directions assume they have already been authorized to run; the
/// converter never inspects version identity on its own. That check is the
/// [`StorageVersionGuard`]'s job, and [`KindConverter`] combines the two.
pub struct VersionConverter<L, S> {
    legacy_version: String,
    storage_version: String,
    mapper: DynSpecMapper<L, S>,
}

impl<L, S> VersionConverter<L, S>
where
    L: Serialize + DeserializeOwned,
    S: Serialize + DeserializeOwned,
{
    pub fn new(
        legacy_version: impl Into<String>,
        storage_version: impl Into<String>,
        mapper: DynSpecMapper<L, S>,
    ) -> Self {
        Self {
            legacy_version: legacy_version.into(),
            storage_version: storage_version.into(),
            mapper,
        }
    }

    /// Converts a legacy typed object into the unstructured form of the
    /// storage version, writing the encoding into `output`.
    ///
    /// The kind and identity metadata are copied verbatim and the encoded
    /// object carries the storage version literal as its `apiVersion`. On
    /// error, `output` is left in its pre-call state.
    pub fn convert_to(&self, legacy: &Resource<L>, output: &mut UnstructuredObject) -> Result<()> {
        let kind = legacy.kind();

        let spec = self
            .mapper
            .spec_to_storage(&legacy.spec)
            .context(MapSpecSnafu { kind })?;

        let storage = Resource {
            types: TypeMeta {
                api_version: self.storage_version.clone(),
                kind: kind.to_owned(),
            },
            metadata: legacy.metadata.clone(),
            spec,
        };

        *output = unstructured::encode(&storage).context(EncodeObjectSnafu { kind })?;

        Ok(())
    }

    /// Converts an unstructured storage-version object into the legacy
    /// typed form, writing the result into `legacy`.
    ///
    /// The kind and identity metadata are copied verbatim and `legacy`
    /// carries the legacy version literal as its `apiVersion` afterwards.
    /// On error, `legacy` is left in its pre-call state.
    pub fn convert_from(&self, input: &UnstructuredObject, legacy: &mut Resource<L>) -> Result<()> {
        let storage: Resource<S> = unstructured::decode(input).context(DecodeObjectSnafu {
            kind: object_kind(input),
        })?;

        let spec = self
            .mapper
            .spec_to_legacy(&storage.spec)
            .context(MapSpecSnafu {
                kind: storage.kind(),
            })?;

        legacy.types = TypeMeta {
            api_version: self.legacy_version.clone(),
            kind: storage.types.kind,
        };
        legacy.metadata = storage.metadata;
        legacy.spec = spec;

        Ok(())
    }

    /// The version literal of the legacy schema generation.
    pub fn legacy_version(&self) -> &str {
        &self.legacy_version
    }

    /// The version literal of the storage schema generation.
    pub fn storage_version(&self) -> &str {
        &self.storage_version
    }
}

/// Conversion capability the webhook transport dispatches to for a
/// registered resource kind.
///
/// The transport owns request-lifecycle concerns and supplies both the
/// typed value and the unstructured container; implementations populate
/// the caller-owned output in place and stay free of any cross-call state.
pub trait Conversion<L> {
    /// Converts a typed object into the unstructured form of its kind's
    /// storage version.
    fn convert_to(&self, object: &Resource<L>, output: &mut UnstructuredObject) -> Result<()>;

    /// Populates a typed object from the unstructured form of its kind's
    /// storage version.
    fn convert_from(&self, input: &UnstructuredObject, object: &mut Resource<L>) -> Result<()>;
}

/// Ready-to-use conversion entry point for a single resource kind.
///
/// Combines the per-kind [`StorageVersionGuard`] with the
/// [`VersionConverter`] for the kind's version pair: requests on objects
/// already at the storage version are rejected, everything else is
/// delegated. Values are stateless and can be shared across concurrent
/// requests without coordination.
pub struct KindConverter<L, S> {
    guard: StorageVersionGuard,
    converter: VersionConverter<L, S>,
}

impl<L, S> KindConverter<L, S>
where
    L: Serialize + DeserializeOwned,
    S: Serialize + DeserializeOwned,
{
    pub fn new(
        kind: impl Into<String>,
        legacy_version: impl Into<String>,
        storage_version: impl Into<String>,
        mapper: DynSpecMapper<L, S>,
    ) -> Self {
        let storage_version = storage_version.into();

        Self {
            guard: StorageVersionGuard::new(StorageVersionPolicy::new(
                kind,
                storage_version.as_str(),
            )),
            converter: VersionConverter::new(legacy_version, storage_version, mapper),
        }
    }

    /// The storage-version policy this converter guards with.
    pub fn policy(&self) -> &StorageVersionPolicy {
        self.guard.policy()
    }
}

impl<L, S> Conversion<L> for KindConverter<L, S>
where
    L: Serialize + DeserializeOwned,
    S: Serialize + DeserializeOwned,
{
    #[tracing::instrument(
        skip_all,
        fields(
            k8s.crd.conversion.kind = self.policy().kind(),
            k8s.crd.conversion.api_version = object.api_version(),
        )
    )]
    fn convert_to(&self, object: &Resource<L>, output: &mut UnstructuredObject) -> Result<()> {
        self.guard.check(Direction::To, object.api_version())?;

        self.converter
            .convert_to(object, output)
            .inspect_err(|error| {
                tracing::error!(
                    %error,
                    source_version = object.api_version(),
                    target_version = self.converter.storage_version(),
                    "failed to convert object to its storage version"
                );
            })?;

        tracing::debug!("successfully converted object to its storage version");

        Ok(())
    }

    #[tracing::instrument(
        skip_all,
        fields(
            k8s.crd.conversion.kind = self.policy().kind(),
            k8s.crd.conversion.api_version = object.api_version(),
        )
    )]
    fn convert_from(&self, input: &UnstructuredObject, object: &mut Resource<L>) -> Result<()> {
        self.guard.check(Direction::From, object.api_version())?;

        self.converter
            .convert_from(input, object)
            .inspect_err(|error| {
                tracing::error!(
                    %error,
                    source_version = self.converter.storage_version(),
                    target_version = self.converter.legacy_version(),
                    "failed to convert object from its storage version"
                );
            })?;

        tracing::debug!("successfully converted object from its storage version");

        Ok(())
    }
}

fn object_kind(object: &UnstructuredObject) -> String {
    object
        .get("kind")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;
    use crate::ConversionError;

    const KIND: &str = "TestStrategy";
    const LEGACY_VERSION: &str = "test.forgeline.dev/v1alpha1";
    const STORAGE_VERSION: &str = "test.forgeline.dev/v1beta1";

    #[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct LegacySpec {
        build_steps: Vec<String>,
    }

    #[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct StorageSpec {
        steps: Vec<String>,
    }

    struct RenamingMapper;

    impl SpecMapper for RenamingMapper {
        type Legacy = LegacySpec;
        type Storage = StorageSpec;

        fn spec_to_storage(&self, legacy: &LegacySpec) -> Result<StorageSpec, MappingError> {
            Ok(StorageSpec {
                steps: legacy.build_steps.clone(),
            })
        }

        fn spec_to_legacy(&self, storage: &StorageSpec) -> Result<LegacySpec, MappingError> {
            Ok(LegacySpec {
                build_steps: storage.steps.clone(),
            })
        }
    }

    struct FailingMapper;

    impl SpecMapper for FailingMapper {
        type Legacy = LegacySpec;
        type Storage = StorageSpec;

        fn spec_to_storage(&self, _legacy: &LegacySpec) -> Result<StorageSpec, MappingError> {
            Err(MappingError::new("buildSteps", "unmappable between schemas"))
        }

        fn spec_to_legacy(&self, _storage: &StorageSpec) -> Result<LegacySpec, MappingError> {
            Err(MappingError::new("steps", "unmappable between schemas"))
        }
    }

    fn converter() -> KindConverter<LegacySpec, StorageSpec> {
        KindConverter::new(
            KIND,
            LEGACY_VERSION,
            STORAGE_VERSION,
            Box::new(RenamingMapper),
        )
    }

    fn legacy_object() -> Resource<LegacySpec> {
        let mut object = Resource::new(
            KIND,
            LEGACY_VERSION,
            LegacySpec {
                build_steps: vec!["step1".to_owned()],
            },
        );
        object.metadata.name = Some("docker-build".to_owned());
        object.metadata.namespace = Some("ns1".to_owned());
        object
    }

    #[test]
    fn convert_to_produces_the_storage_encoding() {
        let object = legacy_object();
        let mut output = UnstructuredObject::new();

        converter()
            .convert_to(&object, &mut output)
            .expect("legacy objects must convert to the storage version");

        assert_eq!(
            Value::Object(output),
            json!({
                "apiVersion": STORAGE_VERSION,
                "kind": KIND,
                "metadata": { "name": "docker-build", "namespace": "ns1" },
                "spec": { "steps": ["step1"] },
            })
        );
    }

    #[test]
    fn convert_from_inverts_convert_to() {
        let original = legacy_object();
        let converter = converter();

        let mut unstructured = UnstructuredObject::new();
        converter
            .convert_to(&original, &mut unstructured)
            .expect("legacy objects must convert to the storage version");

        let mut roundtripped = Resource::new(KIND, "", LegacySpec::default());
        converter
            .convert_from(&unstructured, &mut roundtripped)
            .expect("storage encodings must convert back to the legacy version");

        assert_eq!(roundtripped, original);
    }

    #[test]
    fn objects_at_the_storage_version_are_rejected() {
        let mut object = legacy_object();
        object.types.api_version = STORAGE_VERSION.to_owned();

        let mut output = UnstructuredObject::new();
        let err = converter()
            .convert_to(&object, &mut output)
            .expect_err("objects already at the storage version have nothing to convert to");

        assert!(matches!(
            err,
            ConversionError::StorageVersionConflict { .. }
        ));
        assert!(output.is_empty(), "rejected conversions must not touch the output");

        let err = converter()
            .convert_from(&UnstructuredObject::new(), &mut object)
            .expect_err("objects already at the storage version have nothing to convert from");

        assert!(matches!(
            err,
            ConversionError::StorageVersionConflict { .. }
        ));
    }

    #[test]
    fn mapping_failures_leave_the_output_untouched() {
        let converter: KindConverter<LegacySpec, StorageSpec> = KindConverter::new(
            KIND,
            LEGACY_VERSION,
            STORAGE_VERSION,
            Box::new(FailingMapper),
        );

        let mut output = UnstructuredObject::new();
        let err = converter
            .convert_to(&legacy_object(), &mut output)
            .expect_err("mapper failures must abort the conversion");

        assert!(matches!(err, ConversionError::MapSpec { .. }));
        assert!(output.is_empty(), "failed conversions must not touch the output");
    }

    #[test]
    fn malformed_input_leaves_the_object_untouched() {
        let mut input = UnstructuredObject::new();
        input.insert("apiVersion".to_owned(), json!(STORAGE_VERSION));
        input.insert("kind".to_owned(), json!(KIND));
        input.insert("spec".to_owned(), json!({ "steps": "not-a-sequence" }));

        let mut object = legacy_object();
        let before = object.clone();

        let err = converter()
            .convert_from(&input, &mut object)
            .expect_err("malformed unstructured input must be rejected");

        assert!(matches!(
            err,
            ConversionError::DecodeObject { source: crate::CodecError::Decode { ref path, .. }, .. }
                if path == "spec.steps"
        ));
        assert_eq!(object, before, "failed conversions must not touch the object");
    }

    #[test]
    fn mapping_errors_name_the_offending_field() {
        let err = MappingError::new("buildSteps", "unmappable between schemas");

        assert_eq!(
            err.to_string(),
            "failed to map the spec field \"buildSteps\": unmappable between schemas"
        );
    }
}
