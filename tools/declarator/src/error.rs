use thiserror::Error;
use xir_ir::{ScopeId, TypeId};

/// Synthesis was asked about an id that never went through interning.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum SynthesisError {
    #[error("type {0} is not in the type table")]
    UnknownType(TypeId),
    #[error("scope {0} is not in the nested-name-specifier table")]
    UnknownScope(ScopeId),
}
