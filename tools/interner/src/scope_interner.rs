//! ScopeInterner: declaration contexts to scope ids, with the same frame discipline as types.

use crate::Interner;
use crate::frames::Binding;
use c_ast::{DeclContext, DeclRef};
use tracing::{trace, warn};
use xir_ir::{Entry, NnsKind, NnsNode, ScopeId};

/// The identity of an interned scope.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ScopeKey {
    Decl(DeclRef),
    /// A context without a declaration of its own, keyed by its description and parent.
    Other(String, ScopeId),
}

impl Interner {
    /// Interns `context` and its parents, outermost first, and returns its scope id.
    pub fn intern_scope(&mut self, context: &DeclContext) -> ScopeId {
        let key = match context {
            DeclContext::TranslationUnit => return ScopeId::global(),
            DeclContext::Namespace { decl, .. }
            | DeclContext::Record { decl, .. }
            | DeclContext::Function { decl, .. } => ScopeKey::Decl(*decl),
            DeclContext::Other {
                description,
                parent,
            } => {
                let parent = self.intern_scope(parent);
                ScopeKey::Other(description.clone(), parent)
            }
        };
        if let Some(id) = self.scope_lookup.get(&key) {
            return id.clone();
        }

        let (kind, parent, home) = match context {
            DeclContext::Namespace { name, parent, .. } => (
                NnsKind::Namespace { name: name.clone() },
                self.intern_scope(parent),
                self.context_depth(parent),
            ),
            DeclContext::Record { .. } => {
                let Some(record) = context.record_type() else {
                    return ScopeId::global();
                };
                // Interning the class also interns the enclosing scopes.
                let class = self.intern_type(&record);
                if let Some(id) = self.scope_lookup.get(&key) {
                    return id.clone();
                }
                let parent = match context.parent() {
                    Some(parent) => self.intern_scope(parent),
                    None => ScopeId::global(),
                };
                let home = self.home_of(&class);
                (NnsKind::Class { class }, parent, home)
            }
            DeclContext::Function { name, parent, .. } => (
                NnsKind::Local {
                    function: name.clone(),
                },
                self.intern_scope(parent),
                self.context_depth(parent),
            ),
            DeclContext::Other {
                description,
                parent,
            } => {
                warn!("Unsupported declaration context {description}");
                (
                    NnsKind::Other {
                        description: description.clone(),
                    },
                    self.intern_scope(parent),
                    self.context_depth(parent),
                )
            }
            DeclContext::TranslationUnit => return ScopeId::global(),
        };

        let home = home.min(self.frames.depth());
        let id = self.scopes.reserve();
        trace!("Interned scope {id} = {kind:?} in {parent}");
        self.scopes.add(&id, NnsNode {
            kind,
            parent: Some(parent),
        });
        self.scope_lookup.insert(key.clone(), id.clone());
        self.scope_home.insert(id.clone(), home);
        let frame = self.frames.get_mut(home);
        frame.bindings.push(Binding::Scope(key));
        frame.container.push(Entry::Scope { id: id.clone() });
        id
    }
}
