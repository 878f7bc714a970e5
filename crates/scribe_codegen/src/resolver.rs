use log::{debug, trace};
use scribe_model::{ConstructorSig, QualifiedName, SymbolEnv, TypeRef};

use crate::run::GenerationRun;

// -----------------------------------------------------------------------------
// ExternalAdapterBinding

/// The resolved pairing of an external type with one adapter constructor.
///
/// Created at most once per distinct adapter name and constructor per
/// generation run, and never mutated afterwards. Carries everything the
/// per-type emitter needs to print an instantiation expression: the target
/// adapter, the constructor's parameter list, and (derived from it) whether
/// a fresh companion factory must be constructed inline and how many
/// caller-resolved dependencies are forwarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalAdapterBinding {
    external_type: QualifiedName,
    adapter: QualifiedName,
    constructor: ConstructorSig,
}

impl ExternalAdapterBinding {
    pub(crate) fn new(
        external_type: QualifiedName,
        adapter: QualifiedName,
        constructor: ConstructorSig,
    ) -> Self {
        Self { external_type, adapter, constructor }
    }

    /// The external type this binding serializes.
    #[inline]
    pub fn external_type(&self) -> &QualifiedName {
        &self.external_type
    }

    /// The generated adapter's qualified name.
    #[inline]
    pub fn adapter(&self) -> &QualifiedName {
        &self.adapter
    }

    /// The chosen constructor's signature.
    #[inline]
    pub fn constructor(&self) -> &ConstructorSig {
        &self.constructor
    }

    /// The companion-factory parameter type (the constructor's second
    /// parameter, by convention).
    #[inline]
    pub fn companion_factory(&self) -> Option<&TypeRef> {
        self.constructor.param(1)
    }

    /// How many already-resolved adapter dependencies of the calling type
    /// the instantiation expression forwards positionally.
    ///
    /// Zero for the two-parameter variant; the resolver never invents these
    /// arguments, it only fixes their count and order.
    #[inline]
    pub fn forwarded_deps(&self) -> usize {
        self.constructor.arity().saturating_sub(2)
    }
}

// -----------------------------------------------------------------------------
// Constructor selection

/// Selects the constructor variants meant for cross-package consumption.
///
/// A constructor qualifies when it has at least the context and
/// companion-factory parameters, and its second parameter is *not* the
/// enclosing factory's own type — that variant exists for intra-package use
/// and must never be bound externally.
///
/// Pure over the signature list; all qualifying variants are returned in
/// declaration order. An empty result is not an error: the adapter simply
/// yields no binding.
pub fn select_constructors<'a>(
    constructors: &'a [ConstructorSig],
    enclosing_factory: &QualifiedName,
) -> impl Iterator<Item = &'a ConstructorSig> + use<'a> {
    let enclosing = enclosing_factory.clone();
    constructors.iter().filter(move |sig| {
        let Some(second) = sig.param(1) else {
            return false;
        };
        second.name() != Some(&enclosing)
    })
}

// -----------------------------------------------------------------------------
// Traversal

/// Resolves external adapters reachable from one type reference.
///
/// Depth-first over the type-argument tree:
///
/// - primitives are leaves; nothing to resolve, nothing to recurse into;
/// - a declared type that has opted in has its adapter name mangled and,
///   if that name is new to this [`GenerationRun`], its adapter declaration
///   is looked up and every [selected](select_constructors) constructor
///   recorded as a binding — an adapter the environment cannot resolve is
///   silently skipped, since its generation may simply not be available at
///   this point in the build;
/// - type arguments are always recursed into, whether or not the node
///   itself produced a binding: a non-opted-in generic wrapper may still
///   carry opted-in arguments.
///
/// The processed set is consulted before any constructor inspection and
/// marked before recursing, so a type reachable via multiple generic paths
/// is inspected once and self-referential graphs terminate.
pub fn collect_external_adapters<E>(
    env: &E,
    enclosing_factory: &QualifiedName,
    ty: &TypeRef,
    run: &mut GenerationRun,
) where
    E: SymbolEnv + ?Sized,
{
    let TypeRef::Declared { name, args } = ty else {
        return;
    };

    if env.is_opted_in(name) {
        let adapter = name.adapter_name();
        if run.mark_processed(&adapter) {
            match env.resolve(&adapter) {
                Some(decl) => {
                    for sig in select_constructors(decl.constructors(), enclosing_factory) {
                        debug!(
                            "binding `{name}` to `{adapter}` ({} params)",
                            sig.arity()
                        );
                        run.push_binding(ExternalAdapterBinding::new(
                            name.clone(),
                            adapter.clone(),
                            sig.clone(),
                        ));
                    }
                }
                None => trace!("adapter `{adapter}` not found; skipping"),
            }
        }
    }

    for arg in args {
        collect_external_adapters(env, enclosing_factory, arg, run);
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use scribe_model::{AdapterDecl, MapEnv, Primitive};

    use super::*;

    fn name(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    fn declared(s: &str) -> TypeRef {
        TypeRef::declared(name(s))
    }

    fn context_param() -> TypeRef {
        declared("runtime.Context")
    }

    fn factory() -> QualifiedName {
        name("media.AdapterFactory")
    }

    /// Opts `type_name` in and declares its adapter with the given
    /// constructor signatures.
    fn declare(env: &mut MapEnv, type_name: &str, constructors: Vec<ConstructorSig>) {
        let type_name = name(type_name);
        env.opt_in(type_name.clone());
        env.declare(AdapterDecl::new(type_name.adapter_name(), constructors));
    }

    fn cross_package_ctor(companion: &str) -> ConstructorSig {
        ConstructorSig::new(vec![context_param(), declared(companion)])
    }

    #[test]
    fn primitives_resolve_to_nothing() {
        let env = MapEnv::new();
        let mut run = GenerationRun::new();
        collect_external_adapters(&env, &factory(), &Primitive::I64.into(), &mut run);
        assert!(run.bindings().is_empty());
    }

    #[test]
    fn opted_in_type_yields_one_binding() {
        let mut env = MapEnv::new();
        declare(&mut env, "ext.Foo", vec![cross_package_ctor("ext.AdapterFactory")]);

        let mut run = GenerationRun::new();
        collect_external_adapters(&env, &factory(), &declared("ext.Foo"), &mut run);

        let [binding] = run.bindings() else {
            panic!("expected exactly one binding, got {:?}", run.bindings());
        };
        assert_eq!(binding.external_type(), &name("ext.Foo"));
        assert_eq!(binding.adapter(), &name("ext.FooAdapter"));
        assert_eq!(binding.forwarded_deps(), 0);
    }

    #[test]
    fn non_opted_in_type_is_skipped() {
        let mut env = MapEnv::new();
        // Declared but never opted in.
        env.declare(AdapterDecl::new(
            name("ext.FooAdapter"),
            vec![cross_package_ctor("ext.AdapterFactory")],
        ));

        let mut run = GenerationRun::new();
        collect_external_adapters(&env, &factory(), &declared("ext.Foo"), &mut run);
        assert!(run.bindings().is_empty());
    }

    #[test]
    fn missing_adapter_is_skipped_silently() {
        let mut env = MapEnv::new();
        // Opted in, but no adapter generated yet.
        env.opt_in(name("ext.Foo"));

        let mut run = GenerationRun::new();
        collect_external_adapters(&env, &factory(), &declared("ext.Foo"), &mut run);
        assert!(run.bindings().is_empty());
        // The name still counts as processed; later paths will not retry.
        assert!(run.is_processed(&name("ext.FooAdapter")));
    }

    #[test]
    fn non_opted_in_wrapper_still_recurses_into_arguments() {
        let mut env = MapEnv::new();
        declare(&mut env, "ext.Foo", vec![cross_package_ctor("ext.AdapterFactory")]);

        // `collections.List` itself is not opted in.
        let list = TypeRef::parameterized(name("collections.List"), vec![declared("ext.Foo")]);

        let mut run = GenerationRun::new();
        collect_external_adapters(&env, &factory(), &list, &mut run);
        assert_eq!(run.bindings().len(), 1);
    }

    #[test]
    fn duplicate_paths_deduplicate_to_one_binding() {
        let mut env = MapEnv::new();
        declare(&mut env, "ext.Foo", vec![cross_package_ctor("ext.AdapterFactory")]);

        let map = TypeRef::parameterized(
            name("collections.Map"),
            vec![Primitive::Str.into(), declared("ext.Foo")],
        );
        let list = TypeRef::parameterized(name("collections.List"), vec![declared("ext.Foo")]);

        let mut run = GenerationRun::new();
        collect_external_adapters(&env, &factory(), &map, &mut run);
        collect_external_adapters(&env, &factory(), &list, &mut run);

        assert_eq!(run.bindings().len(), 1);
    }

    #[test]
    fn self_referential_graph_terminates_with_one_binding() {
        let mut env = MapEnv::new();
        declare(&mut env, "graph.Node", vec![cross_package_ctor("graph.AdapterFactory")]);

        // Node containing List<Node>.
        let node_list = TypeRef::parameterized(
            name("collections.List"),
            vec![declared("graph.Node")],
        );
        let node = TypeRef::parameterized(name("graph.Node"), vec![node_list]);

        let mut run = GenerationRun::new();
        collect_external_adapters(&env, &factory(), &node, &mut run);

        assert_eq!(run.bindings().len(), 1);
    }

    #[test]
    fn self_factory_constructor_is_excluded() {
        let enclosing = factory();
        let mut env = MapEnv::new();
        declare(
            &mut env,
            "ext.Foo",
            vec![
                // Intra-package variant: second parameter is the enclosing
                // factory itself.
                ConstructorSig::new(vec![context_param(), TypeRef::declared(enclosing.clone())]),
                cross_package_ctor("ext.AdapterFactory"),
            ],
        );

        let mut run = GenerationRun::new();
        collect_external_adapters(&env, &enclosing, &declared("ext.Foo"), &mut run);

        let [binding] = run.bindings() else {
            panic!("expected exactly one binding");
        };
        assert_eq!(
            binding.companion_factory().and_then(TypeRef::name),
            Some(&name("ext.AdapterFactory"))
        );
    }

    #[test]
    fn one_parameter_constructor_never_qualifies() {
        let mut env = MapEnv::new();
        declare(
            &mut env,
            "ext.Foo",
            vec![ConstructorSig::new(vec![context_param()])],
        );

        let mut run = GenerationRun::new();
        collect_external_adapters(&env, &factory(), &declared("ext.Foo"), &mut run);
        assert!(run.bindings().is_empty());
    }

    #[test]
    fn every_qualifying_constructor_is_recorded() {
        let mut env = MapEnv::new();
        declare(
            &mut env,
            "ext.Foo",
            vec![
                cross_package_ctor("ext.AdapterFactory"),
                ConstructorSig::new(vec![
                    context_param(),
                    declared("ext.AdapterFactory"),
                    declared("ext.BarAdapter"),
                ]),
            ],
        );

        let mut run = GenerationRun::new();
        collect_external_adapters(&env, &factory(), &declared("ext.Foo"), &mut run);

        assert_eq!(run.bindings().len(), 2);
        assert_eq!(run.bindings()[0].forwarded_deps(), 0);
        assert_eq!(run.bindings()[1].forwarded_deps(), 1);
    }
}
