/*
 *  The xir intermediate representation of one C/C++ translation unit.
 *
 *  Intentions for this crate:
 *  - Types and scopes reference each other only through generated
 *    identifiers (`TypeId`, `ScopeId`), never through ownership, so
 *    self-referential types need no cycles in memory.
 *  - Code that builds the IR (interning) and code that reads it back
 *    (declarator synthesis, serialization) lives in other crates.
 *  - Invariant checks over the IR belong here.
 */

pub mod frames;
pub mod ids;
pub mod inheritance;
pub mod tables;
pub mod type_graph;
pub mod unit;

pub use frames::{ContainerKind, Declaration, DeclarationKind, Entry, FrameContainer};
pub use ids::{IdKind, ScopeId, TypeId};
pub use inheritance::{BaseClassRecord, InheritanceIndex};
pub use tables::{NnsKind, NnsNode, NnsTable, TypeTable};
pub use type_graph::*;
pub use unit::TranslationUnit;
