use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::name::{PackagePath, QualifiedName};

// -----------------------------------------------------------------------------
// Error

/// A serialized descriptor contradicted a derived-field rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DescriptorError {
    #[error("adapter `{adapter}` contradicts the derived name `{expected}` for `{name}`")]
    MismatchedAdapter {
        name: QualifiedName,
        adapter: QualifiedName,
        expected: QualifiedName,
    },
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// One known, in-scope data type.
///
/// Constructed once per distinct type encountered during a build and
/// immutable afterwards. The adapter name is derived eagerly by the
/// [mangling rule](QualifiedName::adapter_name), so every consumer sees the
/// same derived name.
///
/// Abstract types are tracked but never receive a generated adapter; the
/// registry generator excludes them from dispatch.
///
/// Deserialization re-derives the adapter name: a payload may omit the
/// `adapter` field, but one that contradicts the mangling rule is rejected
/// with [`DescriptorError::MismatchedAdapter`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTypeDescriptor")]
pub struct TypeDescriptor {
    name: QualifiedName,
    adapter: QualifiedName,
    is_abstract: bool,
}

/// Wire form of [`TypeDescriptor`]; the adapter name is re-derived on the
/// way in.
#[derive(Deserialize)]
struct RawTypeDescriptor {
    name: QualifiedName,
    #[serde(default)]
    adapter: Option<QualifiedName>,
    #[serde(default)]
    is_abstract: bool,
}

impl TryFrom<RawTypeDescriptor> for TypeDescriptor {
    type Error = DescriptorError;

    fn try_from(raw: RawTypeDescriptor) -> Result<Self, Self::Error> {
        let expected = raw.name.adapter_name();
        if let Some(adapter) = raw.adapter {
            if adapter != expected {
                return Err(DescriptorError::MismatchedAdapter {
                    name: raw.name,
                    adapter,
                    expected,
                });
            }
        }
        Ok(Self {
            name: raw.name,
            adapter: expected,
            is_abstract: raw.is_abstract,
        })
    }
}

impl TypeDescriptor {
    /// Describes a concrete known type.
    pub fn new(name: QualifiedName) -> Self {
        let adapter = name.adapter_name();
        Self { name, adapter, is_abstract: false }
    }

    /// Marks the described type abstract.
    #[inline]
    pub fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// The type's qualified name.
    #[inline]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// The type's declaring package.
    #[inline]
    pub fn package(&self) -> PackagePath {
        self.name.package()
    }

    /// The qualified name of the type's generated adapter.
    #[inline]
    pub fn adapter(&self) -> &QualifiedName {
        &self.adapter
    }

    /// Whether the type is abstract.
    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }
}

// -----------------------------------------------------------------------------
// SubFactoryDescriptor

/// One generated per-package adapter factory.
///
/// Created by the surrounding build system after each package's per-type
/// codegen completes; the registry generator consumes these read-only. The
/// representative type exists to recover the package identity at runtime —
/// any concrete type of the package will do.
///
/// A payload may omit the `factory` field; the mangled name is re-derived
/// from the representative's package. A present `factory` is kept verbatim,
/// mirroring [`with_factory`](Self::with_factory).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSubFactoryDescriptor")]
pub struct SubFactoryDescriptor {
    representative: TypeDescriptor,
    factory: QualifiedName,
}

/// Wire form of [`SubFactoryDescriptor`].
#[derive(Deserialize)]
struct RawSubFactoryDescriptor {
    representative: TypeDescriptor,
    #[serde(default)]
    factory: Option<QualifiedName>,
}

impl From<RawSubFactoryDescriptor> for SubFactoryDescriptor {
    fn from(raw: RawSubFactoryDescriptor) -> Self {
        let factory = raw
            .factory
            .unwrap_or_else(|| raw.representative.package().factory_name());
        Self { representative: raw.representative, factory }
    }
}

impl SubFactoryDescriptor {
    /// Describes the generated factory for the representative's package,
    /// named by the [mangling rule](PackagePath::factory_name).
    pub fn new(representative: TypeDescriptor) -> Self {
        let factory = representative.package().factory_name();
        Self { representative, factory }
    }

    /// Overrides the generated factory's qualified name.
    #[inline]
    pub fn with_factory(mut self, factory: QualifiedName) -> Self {
        self.factory = factory;
        self
    }

    /// The representative known type.
    #[inline]
    pub fn representative(&self) -> &TypeDescriptor {
        &self.representative
    }

    /// The package this factory covers.
    #[inline]
    pub fn package(&self) -> PackagePath {
        self.representative.package()
    }

    /// The generated factory's qualified name.
    #[inline]
    pub fn factory(&self) -> &QualifiedName {
        &self.factory
    }
}

// -----------------------------------------------------------------------------
// Tests
