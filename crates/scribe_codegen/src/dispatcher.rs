use std::cell::OnceCell;

use scribe_model::{PackagePath, QualifiedName, SubFactoryDescriptor};

use crate::registry::RegistrySpec;

// -----------------------------------------------------------------------------
// AdapterFactory

/// A per-package adapter factory: creates an adapter for a requested type,
/// or `None` when the type is not covered.
pub trait AdapterFactory {
    type Adapter;

    fn create(&self, request: &QualifiedName) -> Option<Self::Adapter>;
}

// -----------------------------------------------------------------------------
// Dispatcher

/// The runtime model of the generated top-level dispatch object.
///
/// Dispatch resolves the requested type's declaring package through the
/// [`RegistrySpec`]'s package→index map and memoizes one sub-factory
/// instance per slot. Memoization is confined to this object's own state;
/// independent dispatchers over the same specification instantiate
/// independently.
///
/// Single-threaded by design, matching the build-time execution model.
pub struct Dispatcher<'s, F, I> {
    spec: &'s RegistrySpec,
    slots: Vec<OnceCell<F>>,
    instantiate: I,
}

impl<'s, F, I> Dispatcher<'s, F, I>
where
    F: AdapterFactory,
    I: Fn(&SubFactoryDescriptor) -> F,
{
    pub(crate) fn new(spec: &'s RegistrySpec, instantiate: I) -> Self {
        let slots = (0..spec.len()).map(|_| OnceCell::new()).collect();
        Self { spec, slots, instantiate }
    }

    /// Hands out an adapter for the requested type.
    ///
    /// - The requested type's package is resolved against the map; an
    ///   uncovered package returns `None` without touching any slot.
    /// - A covered package's slot is filled on first demand, exactly once,
    ///   and reused afterwards.
    /// - Adapter creation is delegated to the resolved sub-factory and its
    ///   result returned unchanged.
    pub fn create(&self, request: &QualifiedName) -> Option<F::Adapter> {
        let index = self.spec.index_of(&request.package())?;
        // Dense, single-pass index assignment keeps this in bounds.
        debug_assert!(index < self.slots.len());

        let factory = self.slots[index]
            .get_or_init(|| (self.instantiate)(&self.spec.sub_factories()[index]));
        factory.create(request)
    }

    /// Whether the slot for a package has been populated.
    #[inline]
    pub fn is_instantiated(&self, package: &PackagePath) -> bool {
        self.spec
            .index_of(package)
            .is_some_and(|index| self.slots[index].get().is_some())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use scribe_model::TypeDescriptor;

    use crate::registry::RegistryGenerator;

    use super::*;

    /// Counts its own constructions and answers every request with the
    /// requested name.
    struct CountingFactory {
        package: PackagePath,
    }

    impl AdapterFactory for CountingFactory {
        type Adapter = String;

        fn create(&self, request: &QualifiedName) -> Option<String> {
            (request.package() == self.package).then(|| request.as_str().to_owned())
        }
    }

    fn name(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    fn spec_for(packages: &[&str]) -> RegistrySpec {
        let mut generator = RegistryGenerator::new([]);
        generator.set_sub_factories(
            packages
                .iter()
                .map(|pkg| {
                    SubFactoryDescriptor::new(TypeDescriptor::new(
                        PackagePath::parse(pkg).unwrap().join("Repr").unwrap(),
                    ))
                })
                .collect(),
        );
        generator.registry_spec()
    }

    #[test]
    fn each_sub_factory_instantiates_at_most_once() {
        let spec = spec_for(&["pkg.a", "pkg.b"]);
        let instantiations = Rc::new(Cell::new(0usize));

        let counter = Rc::clone(&instantiations);
        let dispatcher = spec.dispatcher(move |sub| {
            counter.set(counter.get() + 1);
            CountingFactory { package: sub.package() }
        });

        assert_eq!(dispatcher.create(&name("pkg.a.Foo")), Some("pkg.a.Foo".to_owned()));
        assert_eq!(dispatcher.create(&name("pkg.a.Bar")), Some("pkg.a.Bar".to_owned()));
        assert_eq!(dispatcher.create(&name("pkg.a.Foo")), Some("pkg.a.Foo".to_owned()));

        assert_eq!(instantiations.get(), 1);
        assert!(dispatcher.is_instantiated(&"pkg.a".parse().unwrap()));
        assert!(!dispatcher.is_instantiated(&"pkg.b".parse().unwrap()));
    }

    #[test]
    fn unknown_package_returns_none_without_instantiating() {
        let spec = spec_for(&["pkg.a"]);
        let instantiations = Rc::new(Cell::new(0usize));

        let counter = Rc::clone(&instantiations);
        let dispatcher = spec.dispatcher(move |sub| {
            counter.set(counter.get() + 1);
            CountingFactory { package: sub.package() }
        });

        assert_eq!(dispatcher.create(&name("other.Foo")), None);
        assert_eq!(instantiations.get(), 0);
    }

    #[test]
    fn delegated_result_is_returned_unchanged() {
        // The sub-factory's own miss propagates as the dispatcher's miss.
        struct NeverFactory;
        impl AdapterFactory for NeverFactory {
            type Adapter = String;
            fn create(&self, _: &QualifiedName) -> Option<String> {
                None
            }
        }

        let spec = spec_for(&["pkg.a"]);
        let dispatcher = spec.dispatcher(|_| NeverFactory);
        assert_eq!(dispatcher.create(&name("pkg.a.Foo")), None);
        // The slot was still populated; only the delegate declined.
        assert!(dispatcher.is_instantiated(&"pkg.a".parse().unwrap()));
    }

    #[test]
    fn independent_dispatchers_do_not_share_slots() {
        let spec = spec_for(&["pkg.a"]);

        let first = spec.dispatcher(|sub| CountingFactory { package: sub.package() });
        let second = spec.dispatcher(|sub| CountingFactory { package: sub.package() });

        first.create(&name("pkg.a.Foo"));
        assert!(first.is_instantiated(&"pkg.a".parse().unwrap()));
        assert!(!second.is_instantiated(&"pkg.a".parse().unwrap()));
    }
}
