use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, warn};
use scribe_model::{PackagePath, QualifiedName, SubFactoryDescriptor, TypeDescriptor};

use crate::dispatcher::{AdapterFactory, Dispatcher};

// -----------------------------------------------------------------------------
// RegistryGenerator

/// Builds the top-level registry specification for one build.
///
/// Invoked once per build with the complete known-type set and, after
/// per-package codegen completes, the ordered list of generated
/// sub-factories. Abstract types never receive a generated adapter, so they
/// are dropped on construction and can never occupy a dispatch slot.
#[derive(Debug, Default)]
pub struct RegistryGenerator {
    known: HashMap<QualifiedName, TypeDescriptor>,
    sub_factories: Vec<SubFactoryDescriptor>,
}

impl RegistryGenerator {
    /// Collects the known-type set, excluding abstract types.
    pub fn new(known_types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let known = known_types
            .into_iter()
            .filter(|desc| !desc.is_abstract())
            .map(|desc| (desc.name().clone(), desc))
            .collect::<HashMap<_, _>>();
        debug!("registry generator over {} known types", known.len());
        Self { known, sub_factories: Vec::new() }
    }

    /// Supplies the generated per-package sub-factories.
    ///
    /// Index assignment follows this list's order, so the caller fixes the
    /// ordering policy (typically sorted by qualified name) and two runs
    /// over the same list produce identical assignments.
    #[inline]
    pub fn set_sub_factories(&mut self, sub_factories: Vec<SubFactoryDescriptor>) {
        self.sub_factories = sub_factories;
    }

    /// Looks up a non-abstract known type by qualified name.
    #[inline]
    pub fn known_type(&self, name: &QualifiedName) -> Option<&TypeDescriptor> {
        self.known.get(name)
    }

    /// The number of non-abstract known types.
    #[inline]
    pub fn known_len(&self) -> usize {
        self.known.len()
    }

    /// Produces the dispatch specification for the current sub-factory
    /// list.
    pub fn registry_spec(&self) -> RegistrySpec {
        RegistrySpec::from_sub_factories(self.sub_factories.clone())
    }
}

// -----------------------------------------------------------------------------
// RegistrySpec

/// The specification of the generated top-level dispatch object.
///
/// Holds the ordered sub-factory list and the package→index map; the
/// generated object adds a same-length slot array for lazily-created
/// sub-factory instances. Indices are dense, zero-based, and assigned in
/// list order, and both structures are built in a single pass over the same
/// list — a mapped index out of slot bounds is structurally impossible.
///
/// # Examples
///
/// ```
/// use scribe_codegen::RegistryGenerator;
/// use scribe_model::{QualifiedName, SubFactoryDescriptor, TypeDescriptor};
///
/// let clip = TypeDescriptor::new(QualifiedName::parse("media.Clip").unwrap());
/// let track = TypeDescriptor::new(QualifiedName::parse("audio.Track").unwrap());
///
/// let mut generator = RegistryGenerator::new([clip.clone(), track.clone()]);
/// generator.set_sub_factories(vec![
///     SubFactoryDescriptor::new(track),
///     SubFactoryDescriptor::new(clip),
/// ]);
///
/// let spec = generator.registry_spec();
/// assert_eq!(spec.index_of(&"audio".parse().unwrap()), Some(0));
/// assert_eq!(spec.index_of(&"media".parse().unwrap()), Some(1));
/// assert_eq!(spec.index_of(&"video".parse().unwrap()), None);
/// ```
#[derive(Clone, Debug)]
pub struct RegistrySpec {
    sub_factories: Vec<SubFactoryDescriptor>,
    package_index: IndexMap<PackagePath, usize>,
}

impl RegistrySpec {
    fn from_sub_factories(sub_factories: Vec<SubFactoryDescriptor>) -> Self {
        let mut package_index = IndexMap::with_capacity(sub_factories.len());
        for (index, sub) in sub_factories.iter().enumerate() {
            if package_index.insert(sub.package(), index).is_some() {
                // One factory per package is the input contract; keep the
                // later entry, matching plain map insertion.
                warn!("package `{}` has more than one sub-factory", sub.package());
            }
        }
        Self { sub_factories, package_index }
    }

    /// The number of dispatch slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.sub_factories.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sub_factories.is_empty()
    }

    /// The sub-factories in index order.
    #[inline]
    pub fn sub_factories(&self) -> &[SubFactoryDescriptor] {
        &self.sub_factories
    }

    /// The slot index assigned to a package, if the package is covered.
    #[inline]
    pub fn index_of(&self, package: &PackagePath) -> Option<usize> {
        self.package_index.get(package).copied()
    }

    /// Iterates the package→index entries in index-assignment order.
    #[inline]
    pub fn packages(&self) -> impl Iterator<Item = (&PackagePath, usize)> {
        self.package_index.iter().map(|(pkg, &index)| (pkg, index))
    }

    /// A runtime dispatcher implementing this specification's `create`
    /// semantics, instantiating sub-factories through `instantiate`.
    ///
    /// This is the testable model of the generated object; the emitted code
    /// behaves identically with instantiation fixed to the recorded factory
    /// names.
    #[inline]
    pub fn dispatcher<F, I>(&self, instantiate: I) -> Dispatcher<'_, F, I>
    where
        F: AdapterFactory,
        I: Fn(&SubFactoryDescriptor) -> F,
    {
        Dispatcher::new(self, instantiate)
    }
}

// -----------------------------------------------------------------------------
// Tests
