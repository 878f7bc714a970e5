use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::QualifiedName;

// -----------------------------------------------------------------------------
// Primitive

/// The closed set of built-in types the serialization layer handles inline.
///
/// Primitives never need external adapters and never carry type arguments,
/// so resolution stops at them without recursing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Str,
}

impl Primitive {
    /// The primitive's source-level spelling.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Str => "str",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// TypeRef

/// An immutable reference to a type as it appears in a field or type
/// argument position.
///
/// The tree has two kinds: a [`Primitive`] leaf, or a declared type with
/// zero or more type arguments (`media.List<media.Clip>` is a declared
/// `media.List` with one argument). Traversals over the tree are total; no
/// dynamic type inspection is involved.
///
/// # Examples
///
/// ```
/// use scribe_model::{Primitive, QualifiedName, TypeRef};
///
/// let clip = TypeRef::declared(QualifiedName::parse("media.Clip").unwrap());
/// let list = TypeRef::parameterized(
///     QualifiedName::parse("collections.List").unwrap(),
///     vec![clip],
/// );
///
/// assert_eq!(list.args().len(), 1);
/// assert_eq!(list.to_string(), "collections.List<media.Clip>");
/// assert_eq!(TypeRef::from(Primitive::I32).to_string(), "i32");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// A built-in type; a traversal leaf.
    Primitive(Primitive),
    /// A declared (non-primitive) type, possibly parameterized.
    Declared {
        name: QualifiedName,
        args: Vec<TypeRef>,
    },
}

impl TypeRef {
    /// A declared type with no type arguments.
    #[inline]
    pub fn declared(name: QualifiedName) -> Self {
        Self::Declared { name, args: Vec::new() }
    }

    /// A declared type instantiated with the given type arguments.
    #[inline]
    pub fn parameterized(name: QualifiedName, args: Vec<TypeRef>) -> Self {
        Self::Declared { name, args }
    }

    /// Whether this reference is a primitive leaf.
    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// The declared type's qualified name; `None` for primitives.
    #[inline]
    pub fn name(&self) -> Option<&QualifiedName> {
        match self {
            Self::Primitive(_) => None,
            Self::Declared { name, .. } => Some(name),
        }
    }

    /// The type arguments, in declaration order; empty for primitives and
    /// unparameterized declared types.
    #[inline]
    pub fn args(&self) -> &[TypeRef] {
        match self {
            Self::Primitive(_) => &[],
            Self::Declared { args, .. } => args,
        }
    }
}

impl From<Primitive> for TypeRef {
    #[inline]
    fn from(value: Primitive) -> Self {
        Self::Primitive(value)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => p.fmt(f),
            Self::Declared { name, args } => {
                name.fmt(f)?;
                if let Some((first, rest)) = args.split_first() {
                    write!(f, "<{first}")?;
                    for arg in rest {
                        write!(f, ", {arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
