use scribe_model::QualifiedName;
use thiserror::Error;

// -----------------------------------------------------------------------------
// EmitError

/// Emission failed to turn a specification into printable Rust source.
///
/// These are the only hard errors in the crate: resolution and registry
/// construction degrade "not found" conditions to skips, but a name that
/// cannot print as Rust source would emit code that does not parse, so the
/// emitter refuses instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EmitError {
    #[error("`{0}` does not form a valid Rust path")]
    InvalidPath(QualifiedName),

    #[error("`{0}` is not a valid runtime crate path")]
    InvalidRuntimePath(String),

    #[error("`{0}` is not a valid identifier for the generated registry")]
    InvalidRegistryIdent(String),

    #[error("constructor bound to `{adapter}` has no companion-factory parameter type")]
    MissingCompanion { adapter: QualifiedName },

    #[error("`{adapter}` forwards {expected} dependencies, {actual} were supplied")]
    DependencyMismatch {
        adapter: QualifiedName,
        expected: usize,
        actual: usize,
    },
}
