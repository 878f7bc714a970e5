#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod descriptor;
mod env;
mod name;
mod signature;
mod type_ref;

// -----------------------------------------------------------------------------
// Top-level exports

pub use descriptor::{DescriptorError, SubFactoryDescriptor, TypeDescriptor};
pub use env::{AdapterDecl, MapEnv, SymbolEnv};
pub use name::{ADAPTER_SUFFIX, FACTORY_IDENT, PackagePath, ParseNameError, QualifiedName};
pub use signature::ConstructorSig;
pub use type_ref::{Primitive, TypeRef};
