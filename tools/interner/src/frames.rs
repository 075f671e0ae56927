//! The scope-frame stack. Frame 0 is the translation unit and is never popped.

use crate::error::InternError;
use crate::scope_interner::ScopeKey;
use crate::type_interner::TypeKey;
use c_ast::{DeclRef, FrameKind};
use xir_ir::{ContainerKind, FrameContainer, ScopeId};

/// A lookup-map entry owned by a frame.
#[derive(Clone, Debug)]
pub(crate) enum Binding {
    Type(TypeKey),
    Scope(ScopeKey),
}

#[derive(Debug)]
pub(crate) struct Frame {
    /// `None` only for the translation unit frame.
    pub kind: Option<FrameKind>,
    /// The declaration whose body this frame is, used to home local records.
    pub context_decl: Option<DeclRef>,
    pub container: FrameContainer,
    pub bindings: Vec<Binding>,
}

pub(crate) fn container_kind(kind: FrameKind) -> ContainerKind {
    match kind {
        FrameKind::Namespace => ContainerKind::Namespace,
        FrameKind::Class => ContainerKind::Class,
        FrameKind::Function => ContainerKind::Function,
        FrameKind::Block => ContainerKind::Block,
        FrameKind::Template => ContainerKind::Template,
    }
}

#[derive(Debug)]
pub(crate) struct FrameStack {
    frames: Vec<Frame>,
}

impl FrameStack {
    pub fn new() -> FrameStack {
        FrameStack {
            frames: vec![Frame {
                kind: None,
                context_decl: None,
                container: FrameContainer::new(ContainerKind::TranslationUnit, None, None),
                bindings: vec![],
            }],
        }
    }

    /// Depth of the innermost open frame; 0 when only the translation unit is open.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn push(
        &mut self,
        kind: FrameKind,
        context_decl: Option<DeclRef>,
        label: Option<String>,
        scope: Option<ScopeId>,
    ) {
        self.frames.push(Frame {
            kind: Some(kind),
            context_decl,
            container: FrameContainer::new(container_kind(kind), label, scope),
            bindings: vec![],
        });
    }

    /// Pops the innermost frame, which must be of kind `kind`.
    pub fn pop(&mut self, kind: FrameKind) -> Result<Frame, InternError> {
        let top = match self.frames.last() {
            Some(Frame { kind: Some(top), .. }) => *top,
            _ => return Err(InternError::PopWithoutFrame { found: kind }),
        };
        if top != kind {
            return Err(InternError::FrameMismatch {
                expected: top,
                found: kind,
            });
        }
        self.frames
            .pop()
            .ok_or(InternError::PopWithoutFrame { found: kind })
    }

    pub fn top_mut(&mut self) -> &mut Frame {
        let depth = self.depth();
        &mut self.frames[depth]
    }

    pub fn get_mut(&mut self, depth: usize) -> &mut Frame {
        &mut self.frames[depth]
    }

    /// Depth of the innermost open frame of the given kind.
    pub fn innermost(&self, kind: FrameKind) -> Option<usize> {
        self.frames.iter().rposition(|f| f.kind == Some(kind))
    }

    /// Depth of the innermost open frame that is the body of `decl`.
    pub fn depth_of_decl(&self, decl: DeclRef) -> Option<usize> {
        self.frames
            .iter()
            .rposition(|f| f.context_decl == Some(decl))
    }

    /// Consumes the stack, returning the translation unit's container.
    pub fn into_root(mut self) -> Result<FrameContainer, InternError> {
        if self.frames.len() > 1 {
            return Err(InternError::UnclosedFrames(self.frames.len() - 1));
        }
        match self.frames.pop() {
            Some(root) => Ok(root.container),
            None => Err(InternError::UnclosedFrames(0)),
        }
    }
}
