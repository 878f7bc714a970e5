#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod dispatcher;
mod emit;
mod error;
mod registry;
mod resolver;
mod run;

// -----------------------------------------------------------------------------
// Top-level exports

pub use dispatcher::{AdapterFactory, Dispatcher};
pub use emit::{EmitConfig, qualified_path, registry_tokens};
pub use error::EmitError;
pub use registry::{RegistryGenerator, RegistrySpec};
pub use resolver::{ExternalAdapterBinding, collect_external_adapters, select_constructors};
pub use run::GenerationRun;
