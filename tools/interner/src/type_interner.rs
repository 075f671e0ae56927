//! TypeInterner: canonical types to type ids.
//!
//! Keys are built from the ids of already-interned components, so a composite type is interned
//! post-order and compared in constant depth. Records and enums are keyed by their declaration
//! and bound *before* their members are interned, which is what lets `struct Node { Node *next; }`
//! resolve `Node` to its own pending id instead of recursing.

use crate::Interner;
use crate::frames::Binding;
use c_ast::{CanonicalType, Decl, DeclContext, DeclKind, DeclRef, TemplateArgument};
use tracing::{debug, trace, warn};
use xir_ir::{
    ArraySize, BaseClass, EnumType, Entry, FunctionType, IdKind, Member, Qualifiers, RecordType,
    RefKind, TemplateArg, TypeId, TypeNode,
};

/// The identity of an interned type.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeKey {
    Qualified(TypeId, Qualifiers),
    Pointer(TypeId),
    Reference(TypeId, RefKind),
    MemberPointer { class: TypeId, pointee: TypeId },
    Array(TypeId, ArraySize),
    Function(FunctionType),
    Record(DeclRef),
    Enum(DeclRef),
    TemplateParm { depth: u32, index: u32, pack: bool },
    TemplateSpecialization { name: String, scope: xir_ir::ScopeId, args: Vec<TemplateArg> },
    DependentName(TypeId, String),
    PackExpansion(TypeId),
    UnaryTransform(String, TypeId),
    Atomic(TypeId),
    Other(String),
}

impl Interner {
    /// Interns `ty` and returns its id. Idempotent while the key stays bound.
    pub fn intern_type(&mut self, ty: &CanonicalType) -> TypeId {
        let (quals, unqualified) = ty.split_qualifiers();
        if quals.is_empty() {
            return self.intern_unqualified(unqualified);
        }
        if let Some(array) = unqualified.with_element_qualifiers(quals) {
            return self.intern_unqualified(&array);
        }
        let base = self.intern_unqualified(unqualified);
        let home = self.home_of(&base);
        self.intern_node(
            TypeKey::Qualified(base.clone(), quals),
            IdKind::Qualified,
            home,
            TypeNode::Qualified {
                unqualified: base,
                quals,
            },
        )
    }

    fn intern_unqualified(&mut self, ty: &CanonicalType) -> TypeId {
        match ty {
            CanonicalType::Builtin { name } => {
                let reserved = self.config.reserved_name(name);
                self.types.add_reserved(&reserved, name)
            }
            CanonicalType::Pointer { pointee } => {
                let pointee = self.intern_type(pointee);
                let home = self.home_of(&pointee);
                self.intern_node(
                    TypeKey::Pointer(pointee.clone()),
                    IdKind::Pointer,
                    home,
                    TypeNode::Pointer { pointee },
                )
            }
            CanonicalType::LValueReference { referee } => {
                self.intern_reference(referee, RefKind::LValue)
            }
            CanonicalType::RValueReference { referee } => {
                self.intern_reference(referee, RefKind::RValue)
            }
            CanonicalType::MemberPointer { class, pointee } => {
                let class = self.intern_type(class);
                let pointee = self.intern_type(pointee);
                let home = self.home_of(&class).max(self.home_of(&pointee));
                self.intern_node(
                    TypeKey::MemberPointer {
                        class: class.clone(),
                        pointee: pointee.clone(),
                    },
                    IdKind::MemberPointer,
                    home,
                    TypeNode::MemberPointer { class, pointee },
                )
            }
            CanonicalType::ConstantArray { element, size } => {
                self.intern_array(element, ArraySize::Fixed(*size))
            }
            CanonicalType::IncompleteArray { element } => {
                self.intern_array(element, ArraySize::Incomplete)
            }
            CanonicalType::VariableArray { element } => {
                self.intern_array(element, ArraySize::Variable)
            }
            CanonicalType::DependentSizedArray { element, size } => {
                self.intern_array(element, ArraySize::Dependent(size.clone()))
            }
            CanonicalType::Function {
                ret,
                params,
                variadic,
                quals,
                ref_qualifier,
                has_prototype,
            } => {
                let ret = self.intern_type(ret);
                let params: Vec<_> = params.iter().map(|p| self.intern_type(p)).collect();
                let home = params
                    .iter()
                    .map(|p| self.home_of(p))
                    .fold(self.home_of(&ret), usize::max);
                let function = FunctionType {
                    ret,
                    params,
                    variadic: *variadic,
                    quals: *quals,
                    ref_qualifier: *ref_qualifier,
                    has_prototype: *has_prototype,
                };
                self.intern_node(
                    TypeKey::Function(function.clone()),
                    IdKind::Function,
                    home,
                    TypeNode::Function(function),
                )
            }
            CanonicalType::Record {
                decl,
                tag,
                name,
                context,
                template_args,
            } => {
                let key = TypeKey::Record(*decl);
                if let Some(id) = self.type_lookup.get(&key) {
                    return id.clone();
                }
                let scope = self.intern_scope(context);
                let args = template_args
                    .as_ref()
                    .map(|args| self.intern_template_args(args));
                // Interning the scope or the arguments may have reached this record already.
                if let Some(id) = self.type_lookup.get(&key) {
                    return id.clone();
                }
                let home = args
                    .iter()
                    .flatten()
                    .map(|arg| self.arg_home(arg))
                    .fold(self.context_depth(context), usize::max);
                self.intern_node(
                    key,
                    tag.id_kind(),
                    home,
                    TypeNode::Record(RecordType {
                        tag: *tag,
                        name: name.clone(),
                        scope,
                        bases: vec![],
                        members: vec![],
                        template_args: args,
                        complete: false,
                    }),
                )
            }
            CanonicalType::Enum {
                decl,
                name,
                context,
            } => {
                let key = TypeKey::Enum(*decl);
                if let Some(id) = self.type_lookup.get(&key) {
                    return id.clone();
                }
                let scope = self.intern_scope(context);
                let home = self.context_depth(context);
                self.intern_node(
                    key,
                    IdKind::Enum,
                    home,
                    TypeNode::Enum(EnumType {
                        name: name.clone(),
                        scope,
                        scoped: false,
                        underlying: None,
                        enumerators: vec![],
                        complete: false,
                    }),
                )
            }
            CanonicalType::TemplateTypeParm {
                depth,
                index,
                pack,
                name,
            } => {
                // Template parameters live exactly as long as the innermost template frame.
                let home = self
                    .frames
                    .innermost(c_ast::FrameKind::Template)
                    .unwrap_or_else(|| self.frames.depth());
                self.intern_node(
                    TypeKey::TemplateParm {
                        depth: *depth,
                        index: *index,
                        pack: *pack,
                    },
                    IdKind::TemplateTypeParm,
                    home,
                    TypeNode::TemplateTypeParm {
                        name: name.clone(),
                        depth: *depth,
                        index: *index,
                        pack: *pack,
                    },
                )
            }
            CanonicalType::TemplateSpecialization {
                name,
                context,
                args,
            } => {
                let scope = self.intern_scope(context);
                let args = self.intern_template_args(args);
                let home = args
                    .iter()
                    .map(|arg| self.arg_home(arg))
                    .fold(self.context_depth(context), usize::max);
                self.intern_node(
                    TypeKey::TemplateSpecialization {
                        name: name.clone(),
                        scope: scope.clone(),
                        args: args.clone(),
                    },
                    IdKind::TemplateSpecialization,
                    home,
                    TypeNode::TemplateSpecialization {
                        name: name.clone(),
                        scope,
                        args,
                    },
                )
            }
            CanonicalType::DependentName { qualifier, name } => {
                let qualifier = self.intern_type(qualifier);
                let home = self.home_of(&qualifier);
                self.intern_node(
                    TypeKey::DependentName(qualifier.clone(), name.clone()),
                    IdKind::DependentName,
                    home,
                    TypeNode::DependentName {
                        qualifier,
                        name: name.clone(),
                    },
                )
            }
            CanonicalType::PackExpansion { pattern } => {
                let pattern = self.intern_type(pattern);
                let home = self.home_of(&pattern);
                self.intern_node(
                    TypeKey::PackExpansion(pattern.clone()),
                    IdKind::PackExpansion,
                    home,
                    TypeNode::PackExpansion { pattern },
                )
            }
            CanonicalType::UnaryTransform { transform, base } => {
                let base = self.intern_type(base);
                let home = self.home_of(&base);
                self.intern_node(
                    TypeKey::UnaryTransform(transform.clone(), base.clone()),
                    IdKind::UnaryTransform,
                    home,
                    TypeNode::UnaryTransform {
                        transform: transform.clone(),
                        base,
                    },
                )
            }
            CanonicalType::Atomic { value } => {
                let value = self.intern_type(value);
                let home = self.home_of(&value);
                self.intern_node(
                    TypeKey::Atomic(value.clone()),
                    IdKind::Atomic,
                    home,
                    TypeNode::Atomic { value },
                )
            }
            CanonicalType::Other { description } => {
                warn!("Unsupported type {description}; it will print as a placeholder");
                self.intern_node(
                    TypeKey::Other(description.clone()),
                    IdKind::Other,
                    0,
                    TypeNode::Other {
                        description: description.clone(),
                    },
                )
            }
            CanonicalType::Qualified { .. }
            | CanonicalType::Typedef { .. }
            | CanonicalType::Elaborated { .. }
            | CanonicalType::Paren { .. }
            | CanonicalType::Decayed { .. } => self.intern_type(ty),
        }
    }

    fn intern_reference(&mut self, referee: &CanonicalType, ref_kind: RefKind) -> TypeId {
        let referee = self.intern_type(referee);
        let home = self.home_of(&referee);
        self.intern_node(
            TypeKey::Reference(referee.clone(), ref_kind),
            IdKind::Reference,
            home,
            TypeNode::Reference { referee, ref_kind },
        )
    }

    fn intern_array(&mut self, element: &CanonicalType, size: ArraySize) -> TypeId {
        let element = self.intern_type(element);
        let home = self.home_of(&element);
        self.intern_node(
            TypeKey::Array(element.clone(), size.clone()),
            IdKind::Array,
            home,
            TypeNode::Array { element, size },
        )
    }

    fn intern_template_args(&mut self, args: &[TemplateArgument]) -> Vec<TemplateArg> {
        args.iter()
            .map(|arg| match arg {
                TemplateArgument::Type { ty } => TemplateArg::Type(self.intern_type(ty)),
                TemplateArgument::Integral { value } => TemplateArg::Literal(value.clone()),
                TemplateArgument::Expression { text } => TemplateArg::Literal(text.clone()),
                TemplateArgument::Template { name } => TemplateArg::Template(name.clone()),
                TemplateArgument::Pack { args } => TemplateArg::Pack(self.intern_template_args(args)),
                TemplateArgument::Null => {
                    warn!("Unresolved template argument");
                    TemplateArg::Unresolved("null".into())
                }
            })
            .collect()
    }

    /// Returns the id bound to `key`, or mints one for `node` and homes it at `home`.
    fn intern_node(&mut self, key: TypeKey, kind: IdKind, home: usize, node: TypeNode) -> TypeId {
        if let Some(id) = self.type_lookup.get(&key) {
            return id.clone();
        }
        let home = home.min(self.frames.depth());
        let id = self.types.reserve(kind);
        trace!("Interned {id} = {node} at depth {home}");
        self.types.add(&id, node);
        self.type_lookup.insert(key.clone(), id.clone());
        self.type_home.insert(id.clone(), home);
        let frame = self.frames.get_mut(home);
        frame.bindings.push(Binding::Type(key));
        frame.container.push(Entry::Type { id: id.clone() });
        id
    }

    /// Records in `id`'s home frame that its body is complete from here on.
    fn mark_definition(&mut self, id: &TypeId) {
        let home = self.home_of(id).min(self.frames.depth());
        self.frames
            .get_mut(home)
            .container
            .push(Entry::Definition { id: id.clone() });
    }

    /// Depth of the frame `id` is homed in. Reserved builtins and evicted ids count as global.
    pub(crate) fn home_of(&self, id: &TypeId) -> usize {
        self.type_home.get(id).copied().unwrap_or(0)
    }

    fn arg_home(&self, arg: &TemplateArg) -> usize {
        match arg {
            TemplateArg::Type(id) => self.home_of(id),
            TemplateArg::Pack(args) => args.iter().map(|a| self.arg_home(a)).max().unwrap_or(0),
            TemplateArg::Literal(_) | TemplateArg::Template(_) | TemplateArg::Unresolved(_) => 0,
        }
    }

    /// Depth of the innermost open frame that is the body of `context` or one of its parents.
    pub(crate) fn context_depth(&self, context: &DeclContext) -> usize {
        let mut current = Some(context);
        while let Some(ctx) = current {
            if let Some(depth) = ctx.decl().and_then(|d| self.frames.depth_of_decl(d)) {
                return depth;
            }
            current = ctx.parent();
        }
        0
    }

    /// Interns the type a record, enum or template parameter declaration introduces, and
    /// completes records and enums when the declaration carries their body.
    pub(crate) fn define(&mut self, decl: &Decl) {
        let Some(ty) = decl.declared_type() else {
            return;
        };
        let id = self.intern_type(&ty);
        match &decl.kind {
            DeclKind::Record {
                tag,
                members: Some(fields),
                bases,
                ..
            } => {
                if matches!(self.types.get(&id), Some(TypeNode::Record(r)) if r.complete) {
                    debug!("Ignoring redefinition of {id}");
                    return;
                }
                let bases: Vec<BaseClass> = bases
                    .iter()
                    .map(|spec| BaseClass {
                        ty: self.intern_type(&spec.ty),
                        access: spec.access.unwrap_or(tag.default_access()),
                        is_virtual: spec.is_virtual,
                    })
                    .collect();
                for base in &bases {
                    self.inheritance.record_base(
                        id.clone(),
                        base.ty.clone(),
                        base.access,
                        base.is_virtual,
                    );
                }
                let members: Vec<Member> = fields
                    .iter()
                    .map(|field| Member {
                        name: field.name.clone(),
                        ty: self.intern_type(&field.ty),
                    })
                    .collect();
                if let Some(TypeNode::Record(record)) = self.types.get_mut(&id) {
                    record.bases = bases;
                    record.members = members;
                    record.complete = true;
                    debug!("Completed {id} with {} member(s)", record.members.len());
                }
                self.mark_definition(&id);
            }
            DeclKind::Enum {
                scoped,
                underlying,
                enumerators: Some(enumerators),
            } => {
                let underlying = underlying.as_ref().map(|u| self.intern_type(u));
                if let Some(TypeNode::Enum(e)) = self.types.get_mut(&id) {
                    if e.complete {
                        debug!("Ignoring redefinition of {id}");
                        return;
                    }
                    e.scoped = *scoped;
                    e.underlying = underlying;
                    e.enumerators = enumerators.clone();
                    e.complete = true;
                    debug!("Completed {id} with {} enumerator(s)", e.enumerators.len());
                }
                self.mark_definition(&id);
            }
            _ => {}
        }
    }
}
