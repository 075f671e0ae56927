//! Interning of types and declaration contexts.
//!
//! The [Interner] consumes the upstream event stream in order and assigns every distinct
//! canonical type a [TypeId] and every declaration context a [ScopeId], exactly once. Lookups
//! are memoized per frame: when a function, block or template frame closes, the lookup entries
//! it owns are evicted, so the same key seen again afterwards is minted a fresh id. Namespace
//! and class frames hand their entries to the enclosing frame instead.

mod error;
mod frames;
mod scope_interner;
mod type_interner;

pub use error::InternError;
pub use scope_interner::ScopeKey;
pub use type_interner::TypeKey;

use c_ast::{Decl, DeclContext, DeclKind, Event, FrameKind};
use frames::{Binding, FrameStack};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};
use xir_core::config::Config;
use xir_ir::{
    Declaration, DeclarationKind, Entry, InheritanceIndex, NnsTable, ScopeId, TranslationUnit,
    TypeId, TypeTable,
};

pub struct Interner {
    config: Arc<Config>,
    types: TypeTable,
    scopes: NnsTable,
    inheritance: InheritanceIndex,
    frames: FrameStack,
    type_lookup: HashMap<TypeKey, TypeId>,
    scope_lookup: HashMap<ScopeKey, ScopeId>,
    /// Depth of the frame each bound id is homed in.
    type_home: HashMap<TypeId, usize>,
    scope_home: HashMap<ScopeId, usize>,
}

impl Interner {
    pub fn new(config: Arc<Config>) -> Interner {
        Interner {
            config,
            types: TypeTable::new(),
            scopes: NnsTable::new(),
            inheritance: InheritanceIndex::new(),
            frames: FrameStack::new(),
            type_lookup: HashMap::new(),
            scope_lookup: HashMap::new(),
            type_home: HashMap::new(),
            scope_home: HashMap::new(),
        }
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn scopes(&self) -> &NnsTable {
        &self.scopes
    }

    pub fn inheritance(&self) -> &InheritanceIndex {
        &self.inheritance
    }

    /// Number of frames open above the translation unit.
    pub fn depth(&self) -> usize {
        self.frames.depth()
    }

    pub fn handle(&mut self, event: &Event) -> Result<(), InternError> {
        match event {
            Event::EnterScope {
                frame,
                context,
                label,
            } => self.enter_scope(*frame, context.as_ref(), label.clone()),
            Event::LeaveScope { frame } => self.leave_scope(*frame)?,
            Event::Decl { decl } => self.declare(decl),
            Event::Type { ty } => {
                self.intern_type(ty);
            }
        }
        Ok(())
    }

    /// Opens a frame. The scope of `context`, if any, is interned in the enclosing frame.
    pub fn enter_scope(
        &mut self,
        kind: FrameKind,
        context: Option<&DeclContext>,
        label: Option<String>,
    ) {
        let scope = context.map(|c| self.intern_scope(c));
        debug!(
            "Entering {kind:?} frame {} at depth {}",
            label.as_deref().unwrap_or(""),
            self.frames.depth() + 1
        );
        self.frames
            .push(kind, context.and_then(DeclContext::decl), label, scope);
    }

    /// Closes the innermost frame and moves its container into the enclosing frame's.
    pub fn leave_scope(&mut self, kind: FrameKind) -> Result<(), InternError> {
        let frame = self.frames.pop(kind)?;
        let parent = self.frames.depth();
        let count = frame.bindings.len();
        if frames::container_kind(kind).evicts() {
            for binding in frame.bindings {
                self.evict(binding);
            }
            debug!("Left {kind:?} frame, evicted {count} binding(s)");
        } else {
            for binding in &frame.bindings {
                self.rehome(binding, parent);
            }
            self.frames.top_mut().bindings.extend(frame.bindings);
            debug!("Left {kind:?} frame, handed {count} binding(s) to depth {parent}");
        }
        self.frames
            .top_mut()
            .container
            .push(Entry::Frame(frame.container));
        Ok(())
    }

    fn evict(&mut self, binding: Binding) {
        match binding {
            Binding::Type(key) => {
                if let Some(id) = self.type_lookup.remove(&key) {
                    trace!("Evicted {id}");
                    self.type_home.remove(&id);
                }
            }
            Binding::Scope(key) => {
                if let Some(id) = self.scope_lookup.remove(&key) {
                    trace!("Evicted {id}");
                    self.scope_home.remove(&id);
                }
            }
        }
    }

    fn rehome(&mut self, binding: &Binding, depth: usize) {
        match binding {
            Binding::Type(key) => {
                if let Some(id) = self.type_lookup.get(key) {
                    self.type_home.insert(id.clone(), depth);
                }
            }
            Binding::Scope(key) => {
                if let Some(id) = self.scope_lookup.get(key) {
                    self.scope_home.insert(id.clone(), depth);
                }
            }
        }
    }

    /// Interns the types a declaration mentions and records named declarations in the current
    /// frame.
    pub fn declare(&mut self, decl: &Decl) {
        let (ty, kind, params) = match &decl.kind {
            DeclKind::Record { .. } | DeclKind::Enum { .. } | DeclKind::TemplateTypeParm { .. } => {
                self.define(decl);
                return;
            }
            DeclKind::Typedef { underlying } => {
                (self.intern_type(underlying), DeclarationKind::Typedef, vec![])
            }
            DeclKind::Var { ty } => (self.intern_type(ty), DeclarationKind::Variable, vec![]),
            DeclKind::Function { ty, params } => {
                let names = params.iter().map(|p| p.clone().unwrap_or_default()).collect();
                (self.intern_type(ty), DeclarationKind::Function, names)
            }
            DeclKind::Other { description } => {
                trace!("Skipping {description} declaration {}", decl.id);
                return;
            }
        };
        let Some(name) = decl.name.clone() else {
            trace!("Skipping unnamed declaration {}", decl.id);
            return;
        };
        self.frames.top_mut().container.push(Entry::Decl(Declaration {
            name,
            ty,
            kind,
            params,
        }));
    }

    /// Checks that every frame was closed and returns the interned translation unit.
    pub fn finish(self) -> Result<TranslationUnit, InternError> {
        let root = self.frames.into_root()?;
        Ok(TranslationUnit {
            types: self.types,
            scopes: self.scopes,
            inheritance: self.inheritance,
            root,
        })
    }
}

/// Interns a whole event stream.
pub fn intern_events(
    config: Arc<Config>,
    events: impl IntoIterator<Item = Event>,
) -> Result<TranslationUnit, InternError> {
    let mut interner = Interner::new(config);
    for event in events {
        interner.handle(&event)?;
    }
    let unit = interner.finish()?;
    debug!(
        "Interned {} types and {} scopes",
        unit.types.len(),
        unit.scopes.len()
    );
    Ok(unit)
}

#[cfg(test)]
mod tests;
