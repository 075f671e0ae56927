/*
 *  This file contains the data structures for the type graph:
 *  one `TypeNode` per interned canonical type.
 *
 *  Intentions for this file:
 *  - Nodes reference other types and scopes only by id.
 *  - Support code (id kinds, edge iteration, display) lives in
 *    `support.rs`, next to this file.
 *
 */

pub mod support;

use crate::ids::{ScopeId, TypeId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Qualifiers {
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_volatile: bool,
    #[serde(default)]
    pub is_restrict: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    LValue,
    RValue,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArraySize {
    /// `[N]`
    Fixed(u64),
    /// `[]`
    Incomplete,
    /// `[*]`, a variable length array whose bound is not carried into the IR.
    Variable,
    /// `[expr]` where `expr` depends on a template parameter.
    Dependent(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Struct,
    Union,
    Class,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Public,
    Protected,
    Private,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
    pub ret: TypeId,
    pub params: Vec<TypeId>,
    pub variadic: bool,
    // trailing cv-qualifiers of a member function
    pub quals: Qualifiers,
    pub ref_qualifier: Option<RefKind>,
    // false for K&R style `int f()` in C
    pub has_prototype: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BaseClass {
    pub ty: TypeId,
    pub access: Access,
    pub is_virtual: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub ty: TypeId,
}

/// A struct, union or class.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RecordType {
    pub tag: TagKind,
    /// `None` for anonymous records; a synthetic name is derived from the id when one is
    /// needed.
    pub name: Option<String>,
    /// The scope the record is declared in.
    pub scope: ScopeId,
    pub bases: Vec<BaseClass>,
    pub members: Vec<Member>,
    /// Present for class template specializations.
    pub template_args: Option<Vec<TemplateArg>>,
    /// False while only a forward declaration has been seen.
    pub complete: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: Option<String>,
    pub scope: ScopeId,
    pub scoped: bool,
    pub underlying: Option<TypeId>,
    pub enumerators: Vec<String>,
    pub complete: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TemplateArg {
    Type(TypeId),
    /// A non-type argument, rendered verbatim.
    Literal(String),
    /// A template template argument.
    Template(String),
    Pack(Vec<TemplateArg>),
    /// An argument form that cannot be reconstructed; holds the upstream kind.
    Unresolved(String),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeNode {
    /// A builtin type. The node's id is its reserved name; `spelling` is its C++ spelling.
    Reserved {
        spelling: String,
    },
    Qualified {
        unqualified: TypeId,
        quals: Qualifiers,
    },
    Pointer {
        pointee: TypeId,
    },
    Reference {
        referee: TypeId,
        ref_kind: RefKind,
    },
    MemberPointer {
        class: TypeId,
        pointee: TypeId,
    },
    Array {
        element: TypeId,
        size: ArraySize,
    },
    Function(FunctionType),
    Record(RecordType),
    Enum(EnumType),
    TemplateTypeParm {
        name: Option<String>,
        depth: u32,
        index: u32,
        pack: bool,
    },
    /// A dependent template-id such as `vector<T>` that does not name a record yet.
    TemplateSpecialization {
        name: String,
        scope: ScopeId,
        args: Vec<TemplateArg>,
    },
    /// `typename Qualifier::name`
    DependentName {
        qualifier: TypeId,
        name: String,
    },
    PackExpansion {
        pattern: TypeId,
    },
    /// A type trait transformation such as `__underlying_type(E)`.
    UnaryTransform {
        transform: String,
        base: TypeId,
    },
    Atomic {
        value: TypeId,
    },
    /// Anything without a declarator shape of its own.
    Other {
        description: String,
    },
}
