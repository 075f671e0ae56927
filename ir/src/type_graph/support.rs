/*
 *  This file contains support functions for the type graph.
 *
 */

use crate::ids::{IdKind, TypeId};
use crate::type_graph::*;
use std::fmt;

impl Qualifiers {
    pub const CONST: Qualifiers = Qualifiers {
        is_const: true,
        is_volatile: false,
        is_restrict: false,
    };
    pub const VOLATILE: Qualifiers = Qualifiers {
        is_const: false,
        is_volatile: true,
        is_restrict: false,
    };

    pub fn new(is_const: bool, is_volatile: bool, is_restrict: bool) -> Self {
        Self {
            is_const,
            is_volatile,
            is_restrict,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.is_const || self.is_volatile || self.is_restrict)
    }

    /// Qualifiers observed on either side.
    pub fn union(self, other: Qualifiers) -> Qualifiers {
        Qualifiers {
            is_const: self.is_const || other.is_const,
            is_volatile: self.is_volatile || other.is_volatile,
            is_restrict: self.is_restrict || other.is_restrict,
        }
    }
}

impl TagKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TagKind::Struct => "struct",
            TagKind::Union => "union",
            TagKind::Class => "class",
        }
    }

    /// Access of a base specifier written without one.
    pub fn default_access(self) -> Access {
        match self {
            TagKind::Class => Access::Private,
            TagKind::Struct | TagKind::Union => Access::Public,
        }
    }

    pub fn id_kind(self) -> IdKind {
        match self {
            TagKind::Struct => IdKind::Struct,
            TagKind::Union => IdKind::Union,
            TagKind::Class => IdKind::Class,
        }
    }
}

impl Access {
    pub fn keyword(self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
        }
    }
}

impl RefKind {
    pub fn token(self) -> &'static str {
        match self {
            RefKind::LValue => "&",
            RefKind::RValue => "&&",
        }
    }
}

impl TypeNode {
    /// The letter minted ids of this node start with. Reserved nodes use their name instead,
    /// and return `None`.
    pub fn id_kind(&self) -> Option<IdKind> {
        Some(match self {
            TypeNode::Reserved { .. } => return None,
            TypeNode::Qualified { .. } => IdKind::Qualified,
            TypeNode::Pointer { .. } => IdKind::Pointer,
            TypeNode::Reference { .. } => IdKind::Reference,
            TypeNode::MemberPointer { .. } => IdKind::MemberPointer,
            TypeNode::Array { .. } => IdKind::Array,
            TypeNode::Function(_) => IdKind::Function,
            TypeNode::Record(r) => r.tag.id_kind(),
            TypeNode::Enum(_) => IdKind::Enum,
            TypeNode::TemplateTypeParm { .. } => IdKind::TemplateTypeParm,
            TypeNode::TemplateSpecialization { .. } => IdKind::TemplateSpecialization,
            TypeNode::DependentName { .. } => IdKind::DependentName,
            TypeNode::PackExpansion { .. } => IdKind::PackExpansion,
            TypeNode::UnaryTransform { .. } => IdKind::UnaryTransform,
            TypeNode::Atomic { .. } => IdKind::Atomic,
            TypeNode::Other { .. } => IdKind::Other,
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeNode::Reserved { .. } => "reserved",
            TypeNode::Qualified { .. } => "qualified",
            TypeNode::Pointer { .. } => "pointer",
            TypeNode::Reference { .. } => "reference",
            TypeNode::MemberPointer { .. } => "member_pointer",
            TypeNode::Array { .. } => "array",
            TypeNode::Function(_) => "function",
            TypeNode::Record(r) => r.tag.keyword(),
            TypeNode::Enum(_) => "enum",
            TypeNode::TemplateTypeParm { .. } => "template_type_parm",
            TypeNode::TemplateSpecialization { .. } => "template_specialization",
            TypeNode::DependentName { .. } => "dependent_name",
            TypeNode::PackExpansion { .. } => "pack_expansion",
            TypeNode::UnaryTransform { .. } => "unary_transform",
            TypeNode::Atomic { .. } => "atomic",
            TypeNode::Other { .. } => "other",
        }
    }

    /// True for the kinds whose declarator wraps the inner fragment in `*`/`&`.
    pub fn is_pointer_like(&self) -> bool {
        matches!(
            self,
            TypeNode::Pointer { .. } | TypeNode::Reference { .. } | TypeNode::MemberPointer { .. }
        )
    }

    /// Every type id this node refers to, in declaration order.
    pub fn referenced_types(&self) -> Vec<&TypeId> {
        fn arg_types<'a>(args: &'a [TemplateArg], out: &mut Vec<&'a TypeId>) {
            for arg in args {
                match arg {
                    TemplateArg::Type(id) => out.push(id),
                    TemplateArg::Pack(inner) => arg_types(inner, out),
                    TemplateArg::Literal(_)
                    | TemplateArg::Template(_)
                    | TemplateArg::Unresolved(_) => {}
                }
            }
        }

        let mut out = Vec::new();
        match self {
            TypeNode::Reserved { .. }
            | TypeNode::TemplateTypeParm { .. }
            | TypeNode::Other { .. } => {}
            TypeNode::Qualified { unqualified, .. } => out.push(unqualified),
            TypeNode::Pointer { pointee } => out.push(pointee),
            TypeNode::Reference { referee, .. } => out.push(referee),
            TypeNode::MemberPointer { class, pointee } => {
                out.push(class);
                out.push(pointee);
            }
            TypeNode::Array { element, .. } => out.push(element),
            TypeNode::Function(f) => {
                out.push(&f.ret);
                out.extend(f.params.iter());
            }
            TypeNode::Record(r) => {
                out.extend(r.bases.iter().map(|b| &b.ty));
                out.extend(r.members.iter().map(|m| &m.ty));
                if let Some(args) = &r.template_args {
                    arg_types(args, &mut out);
                }
            }
            TypeNode::Enum(e) => out.extend(e.underlying.iter()),
            TypeNode::TemplateSpecialization { args, .. } => arg_types(args, &mut out),
            TypeNode::DependentName { qualifier, .. } => out.push(qualifier),
            TypeNode::PackExpansion { pattern } => out.push(pattern),
            TypeNode::UnaryTransform { base, .. } => out.push(base),
            TypeNode::Atomic { value } => out.push(value),
        }
        out
    }
}

/*
 *
 *  Display...
 *
 */

impl fmt::Display for Qualifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = if self.is_const { "const " } else { "" };
        let r = if self.is_restrict { "restrict " } else { "" };
        let v = if self.is_volatile { "volatile " } else { "" };
        write!(f, "{c}{r}{v}")
    }
}

impl fmt::Display for ArraySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArraySize::Fixed(n) => write!(f, "{n}"),
            ArraySize::Incomplete => Ok(()),
            ArraySize::Variable => write!(f, "*"),
            ArraySize::Dependent(expr) => write!(f, "{expr}"),
        }
    }
}

impl fmt::Display for TemplateArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateArg::Type(id) => write!(f, "{id}"),
            TemplateArg::Literal(s) | TemplateArg::Template(s) => write!(f, "{s}"),
            TemplateArg::Pack(args) => {
                let args: Vec<_> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "pack({})", args.join(", "))
            }
            TemplateArg::Unresolved(kind) => write!(f, "unresolved({kind})"),
        }
    }
}

/// A one-line summary of the node, with referenced types shown by id.
impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Reserved { spelling } => write!(f, "reserved {spelling}"),
            TypeNode::Qualified { unqualified, quals } => write!(f, "{quals}{unqualified}"),
            TypeNode::Pointer { pointee } => write!(f, "pointer to {pointee}"),
            TypeNode::Reference { referee, ref_kind } => {
                write!(f, "{} reference to {referee}", ref_kind.token())
            }
            TypeNode::MemberPointer { class, pointee } => {
                write!(f, "pointer to member of {class} of type {pointee}")
            }
            TypeNode::Array { element, size } => write!(f, "array [{size}] of {element}"),
            TypeNode::Function(ft) => {
                let ps: Vec<_> = ft.params.iter().map(|p| p.to_string()).collect();
                let va = if ft.variadic { ", ..." } else { "" };
                write!(f, "function ({}{va}) {}-> {}", ps.join(", "), ft.quals, ft.ret)
            }
            TypeNode::Record(r) => {
                let name = r.name.as_deref().unwrap_or("<anonymous>");
                let state = if r.complete { "" } else { " (incomplete)" };
                write!(f, "{} {name} in {}{state}", r.tag.keyword(), r.scope)
            }
            TypeNode::Enum(e) => {
                let name = e.name.as_deref().unwrap_or("<anonymous>");
                write!(f, "enum {name} in {}", e.scope)
            }
            TypeNode::TemplateTypeParm {
                name, depth, index, ..
            } => match name {
                Some(name) => write!(f, "template parameter {name}"),
                None => write!(f, "template parameter {depth}-{index}"),
            },
            TypeNode::TemplateSpecialization { name, args, .. } => {
                let args: Vec<_> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{name}<{}>", args.join(", "))
            }
            TypeNode::DependentName { qualifier, name } => write!(f, "typename {qualifier}::{name}"),
            TypeNode::PackExpansion { pattern } => write!(f, "{pattern}..."),
            TypeNode::UnaryTransform { transform, base } => write!(f, "{transform}({base})"),
            TypeNode::Atomic { value } => write!(f, "_Atomic({value})"),
            TypeNode::Other { description } => write!(f, "other ({description})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ScopeId;

    #[test]
    fn qualifier_union() {
        let cv = Qualifiers::CONST.union(Qualifiers::VOLATILE);
        assert!(cv.is_const && cv.is_volatile && !cv.is_restrict);
        assert!(Qualifiers::default().is_empty());
        assert_eq!(cv.to_string(), "const volatile ");
    }

    #[test]
    fn record_edges_cover_bases_members_and_args() {
        let node = TypeNode::Record(RecordType {
            tag: TagKind::Class,
            name: Some("Box".into()),
            scope: ScopeId::global(),
            bases: vec![BaseClass {
                ty: TypeId::new("C0001"),
                access: Access::Public,
                is_virtual: false,
            }],
            members: vec![Member {
                name: "value".into(),
                ty: TypeId::new("int"),
            }],
            template_args: Some(vec![
                TemplateArg::Literal("3".into()),
                TemplateArg::Pack(vec![TemplateArg::Type(TypeId::new("char"))]),
            ]),
            complete: true,
        });
        let edges: Vec<_> = node.referenced_types().into_iter().map(|t| t.as_str()).collect();
        assert_eq!(edges, ["C0001", "int", "char"]);
        assert_eq!(node.id_kind(), Some(IdKind::Class));
        assert_eq!(TagKind::Class.default_access(), Access::Private);
        assert_eq!(TagKind::Struct.default_access(), Access::Public);
    }
}
