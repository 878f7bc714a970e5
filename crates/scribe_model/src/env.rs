use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::name::QualifiedName;
use crate::signature::ConstructorSig;

// -----------------------------------------------------------------------------
// AdapterDecl

/// A located external adapter declaration: the adapter's qualified name and
/// the signatures of its constructors.
///
/// This is all the resolver needs from a declaration to pick a constructor
/// variant; how the surrounding system obtained it is not its concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterDecl {
    name: QualifiedName,
    constructors: Vec<ConstructorSig>,
}

impl AdapterDecl {
    /// A declaration with the given constructor signatures, in declaration
    /// order.
    #[inline]
    pub fn new(name: QualifiedName, constructors: Vec<ConstructorSig>) -> Self {
        Self { name, constructors }
    }

    /// The adapter's qualified name.
    #[inline]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// The adapter's constructor signatures, in declaration order.
    #[inline]
    pub fn constructors(&self) -> &[ConstructorSig] {
        &self.constructors
    }
}

// -----------------------------------------------------------------------------
// SymbolEnv

/// The build-time symbol environment the surrounding compiler integration
/// supplies.
///
/// Both queries are synchronous and side-effect free. A failed
/// [`resolve`](SymbolEnv::resolve) is not an error condition — it means the
/// external type's generation is not yet available, and the resolver skips
/// that node.
pub trait SymbolEnv {
    /// Locates a generated adapter declaration by qualified name.
    fn resolve(&self, name: &QualifiedName) -> Option<&AdapterDecl>;

    /// Whether the declared type with the given name has opted in to
    /// adapter generation.
    fn is_opted_in(&self, name: &QualifiedName) -> bool;
}

// -----------------------------------------------------------------------------
// MapEnv

/// An in-memory [`SymbolEnv`] built from explicit declarations.
///
/// Serves tests and front ends that collect declarations themselves before
/// invoking the codegen pass.
///
/// # Examples
///
/// ```
/// use scribe_model::{AdapterDecl, MapEnv, QualifiedName, SymbolEnv};
///
/// let clip = QualifiedName::parse("media.Clip").unwrap();
///
/// let mut env = MapEnv::new();
/// env.opt_in(clip.clone());
/// env.declare(AdapterDecl::new(clip.adapter_name(), vec![]));
///
/// assert!(env.is_opted_in(&clip));
/// assert!(env.resolve(&clip.adapter_name()).is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    decls: HashMap<QualifiedName, AdapterDecl>,
    opted_in: HashSet<QualifiedName>,
}

impl MapEnv {
    /// An empty environment.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a declared type as opted in to adapter generation.
    #[inline]
    pub fn opt_in(&mut self, name: QualifiedName) {
        self.opted_in.insert(name);
    }

    /// Registers an adapter declaration, keyed by its own name.
    ///
    /// A later declaration with the same name replaces the earlier one.
    #[inline]
    pub fn declare(&mut self, decl: AdapterDecl) {
        self.decls.insert(decl.name().clone(), decl);
    }
}

impl SymbolEnv for MapEnv {
    #[inline]
    fn resolve(&self, name: &QualifiedName) -> Option<&AdapterDecl> {
        self.decls.get(name)
    }

    #[inline]
    fn is_opted_in(&self, name: &QualifiedName) -> bool {
        self.opted_in.contains(name)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    #[test]
    fn resolve_misses_are_not_errors() {
        let env = MapEnv::new();
        assert!(env.resolve(&name("media.ClipAdapter")).is_none());
        assert!(!env.is_opted_in(&name("media.Clip")));
    }

    #[test]
    fn redeclaration_replaces() {
        let adapter = name("media.ClipAdapter");
        let mut env = MapEnv::new();
        env.declare(AdapterDecl::new(adapter.clone(), vec![]));
        env.declare(AdapterDecl::new(
            adapter.clone(),
            vec![ConstructorSig::new(vec![])],
        ));
        assert_eq!(env.resolve(&adapter).unwrap().constructors().len(), 1);
    }
}
