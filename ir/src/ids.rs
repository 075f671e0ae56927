//! Identifiers for types and scopes.
//!
//! Ids are opaque strings. Builtin types use their reserved name (`int`, `unsigned`, ...) as
//! their id; every other type gets a kind letter followed by a counter (`P0003`). Scopes use
//! `N` plus a counter, with `global` reserved for the translation unit. Counters never rewind,
//! so an id's text is never handed out twice in one run.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const GLOBAL_SCOPE: &str = "global";

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(String);

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(String);

/// The letter that starts a minted type id.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum IdKind {
    Qualified = b'B',
    Pointer = b'P',
    Reference = b'R',
    MemberPointer = b'M',
    Array = b'A',
    Function = b'F',
    Struct = b'S',
    Union = b'U',
    Class = b'C',
    Enum = b'E',
    TemplateTypeParm = b'T',
    TemplateSpecialization = b'I',
    DependentName = b'D',
    PackExpansion = b'X',
    UnaryTransform = b'Y',
    Atomic = b'Z',
    Other = b'O',
}

impl IdKind {
    pub fn prefix(self) -> char {
        self as u8 as char
    }
}

impl TypeId {
    /// Wraps an existing id string, e.g. a reserved builtin name or an id read back from disk.
    pub fn new(id: impl Into<String>) -> TypeId {
        TypeId(id.into())
    }

    pub(crate) fn minted(kind: IdKind, counter: u64) -> TypeId {
        TypeId(format!("{}{counter:04}", kind.prefix()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ScopeId {
    pub fn new(id: impl Into<String>) -> ScopeId {
        ScopeId(id.into())
    }

    pub fn global() -> ScopeId {
        ScopeId(GLOBAL_SCOPE.into())
    }

    pub(crate) fn minted(counter: u64) -> ScopeId {
        ScopeId(format!("N{counter:04}"))
    }

    pub fn is_global(&self) -> bool {
        self.0 == GLOBAL_SCOPE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
