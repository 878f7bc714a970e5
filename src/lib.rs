#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use scribe_codegen as codegen;
pub use scribe_model as model;
