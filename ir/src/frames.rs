//! The ordered forest of per-frame containers. Every closed scope frame leaves one
//! [FrameContainer] behind, nested inside the container of the frame that enclosed it. The
//! container lists, in order, the type and scope definitions homed in that frame and the
//! declarations made there.

use crate::ids::{ScopeId, TypeId};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    TranslationUnit,
    Namespace,
    Class,
    Function,
    Block,
    Template,
}

impl ContainerKind {
    /// True for frames whose local names stop being nameable when the frame closes.
    pub fn evicts(self) -> bool {
        matches!(
            self,
            ContainerKind::Function | ContainerKind::Block | ContainerKind::Template
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Variable,
    Function,
    Typedef,
}

/// A named declaration whose type went through interning.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub ty: TypeId,
    pub kind: DeclarationKind,
    /// Parameter names of a function declaration; empty strings for unnamed parameters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum Entry {
    /// The definition of this type is homed here; the node itself lives in the type table.
    Type { id: TypeId },
    /// The point where the body of a record or enum was seen. Comes after the type's `Type`
    /// entry, possibly much later for a forward-declared type.
    Definition { id: TypeId },
    Scope { id: ScopeId },
    Decl(Declaration),
    Frame(FrameContainer),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FrameContainer {
    pub kind: ContainerKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// The scope this frame opened, if it corresponds to a declaration context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeId>,
    pub entries: Vec<Entry>,
}

impl FrameContainer {
    pub fn new(kind: ContainerKind, label: Option<String>, scope: Option<ScopeId>) -> Self {
        FrameContainer {
            kind,
            label,
            scope,
            entries: vec![],
        }
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Type ids homed directly in this container, in definition order.
    pub fn type_ids(&self) -> impl Iterator<Item = &TypeId> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Type { id } => Some(id),
            _ => None,
        })
    }

    /// Direct child containers.
    pub fn frames(&self) -> impl Iterator<Item = &FrameContainer> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Frame(frame) => Some(frame),
            _ => None,
        })
    }

    /// Every declaration in this container and its descendants, in source order.
    pub fn declarations(&self) -> Vec<&Declaration> {
        let mut out = vec![];
        self.walk(&mut |entry| {
            if let Entry::Decl(decl) = entry {
                out.push(decl);
            }
        });
        out
    }

    /// Every type id homed in this container or its descendants, in definition order.
    pub fn all_type_ids(&self) -> Vec<&TypeId> {
        let mut out = vec![];
        self.walk(&mut |entry| {
            if let Entry::Type { id } = entry {
                out.push(id);
            }
        });
        out
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Entry)) {
        for entry in &self.entries {
            visit(entry);
            if let Entry::Frame(frame) = entry {
                frame.walk(visit);
            }
        }
    }
}
