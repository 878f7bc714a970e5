use serde::{Deserialize, Serialize};

use crate::type_ref::TypeRef;

// -----------------------------------------------------------------------------
// ConstructorSig

/// The positional parameter types of one adapter constructor.
///
/// Constructor shape selection in the resolver is a pure function over
/// these signatures, independent of how they were obtained; tests fabricate
/// them directly.
///
/// By convention a generated adapter constructor takes a serialization
/// context handle first and a companion-factory handle second, followed by
/// any already-resolved adapter dependencies of the constructed type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorSig {
    params: Vec<TypeRef>,
}

impl ConstructorSig {
    /// A signature with the given positional parameter types.
    #[inline]
    pub fn new(params: Vec<TypeRef>) -> Self {
        Self { params }
    }

    /// The number of parameters.
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// The parameter type at `index`, if present.
    #[inline]
    pub fn param(&self, index: usize) -> Option<&TypeRef> {
        self.params.get(index)
    }

    /// All parameter types, in declaration order.
    #[inline]
    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Primitive, QualifiedName};

    #[test]
    fn positional_access() {
        let sig = ConstructorSig::new(vec![
            TypeRef::declared(QualifiedName::parse("runtime.Context").unwrap()),
            Primitive::I32.into(),
        ]);
        assert_eq!(sig.arity(), 2);
        assert_eq!(sig.param(1), Some(&TypeRef::from(Primitive::I32)));
        assert!(sig.param(2).is_none());
    }
}
