use crate::DeclRef;
use crate::types::{CanonicalType, TemplateArgument};
use serde::{Deserialize, Serialize};
use xir_ir::{Access, TagKind};

/// The semantic context a declaration lives in, innermost first.
/// Clang Docs: https://clang.llvm.org/doxygen/classclang_1_1DeclContext.html
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclContext {
    #[default]
    TranslationUnit,
    Namespace {
        decl: DeclRef,
        /// `None` for an anonymous namespace.
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        parent: Box<DeclContext>,
    },
    Record {
        decl: DeclRef,
        tag: TagKind,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        parent: Box<DeclContext>,
    },
    Function {
        decl: DeclRef,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        parent: Box<DeclContext>,
    },
    /// Linkage specifications, blocks, lambdas and the like.
    Other {
        description: String,
        #[serde(default)]
        parent: Box<DeclContext>,
    },
}

impl DeclContext {
    pub fn parent(&self) -> Option<&DeclContext> {
        match self {
            DeclContext::TranslationUnit => None,
            DeclContext::Namespace { parent, .. }
            | DeclContext::Record { parent, .. }
            | DeclContext::Function { parent, .. }
            | DeclContext::Other { parent, .. } => Some(parent),
        }
    }

    pub fn decl(&self) -> Option<DeclRef> {
        match self {
            DeclContext::Namespace { decl, .. }
            | DeclContext::Record { decl, .. }
            | DeclContext::Function { decl, .. } => Some(*decl),
            DeclContext::TranslationUnit | DeclContext::Other { .. } => None,
        }
    }

    /// The type of the record this context is the body of.
    pub fn record_type(&self) -> Option<CanonicalType> {
        match self {
            DeclContext::Record {
                decl,
                tag,
                name,
                parent,
            } => Some(CanonicalType::Record {
                decl: *decl,
                tag: *tag,
                name: name.clone(),
                context: (**parent).clone(),
                template_args: None,
            }),
            _ => None,
        }
    }

    pub fn namespace(decl: DeclRef, name: &str, parent: DeclContext) -> DeclContext {
        DeclContext::Namespace {
            decl,
            name: Some(name.into()),
            parent: Box::new(parent),
        }
    }

    pub fn record(decl: DeclRef, tag: TagKind, name: &str, parent: DeclContext) -> DeclContext {
        DeclContext::Record {
            decl,
            tag,
            name: Some(name.into()),
            parent: Box::new(parent),
        }
    }
}

/// A data member of a record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Empty for an anonymous member such as an unnamed bit-field or an inline anonymous union.
    #[serde(default)]
    pub name: String,
    pub ty: CanonicalType,
}

/// One base specifier of a class. Clang Docs:
/// https://clang.llvm.org/doxygen/classclang_1_1CXXBaseSpecifier.html
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseSpec {
    pub ty: CanonicalType,
    /// `None` when no access was written; the default then depends on the derived class's tag.
    #[serde(default)]
    pub access: Option<Access>,
    #[serde(default)]
    pub is_virtual: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclKind {
    /// Clang Docs: https://clang.llvm.org/doxygen/classclang_1_1CXXRecordDecl.html
    Record {
        tag: TagKind,
        /// `None` for a forward declaration.
        #[serde(default)]
        members: Option<Vec<Field>>,
        #[serde(default)]
        bases: Vec<BaseSpec>,
        #[serde(default)]
        template_args: Option<Vec<TemplateArgument>>,
    },
    Enum {
        #[serde(default)]
        scoped: bool,
        #[serde(default)]
        underlying: Option<CanonicalType>,
        /// `None` for an opaque declaration.
        #[serde(default)]
        enumerators: Option<Vec<String>>,
    },
    Typedef { underlying: CanonicalType },
    Var { ty: CanonicalType },
    Function {
        ty: CanonicalType,
        /// Parameter names in order; `None` for unnamed parameters.
        #[serde(default)]
        params: Vec<Option<String>>,
    },
    TemplateTypeParm {
        depth: u32,
        index: u32,
        #[serde(default)]
        pack: bool,
    },
    /// Every other declaration (not relevant to interning at the moment).
    Other { description: String },
}

/// A declaration, in source order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decl {
    pub id: DeclRef,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub context: DeclContext,
    pub kind: DeclKind,
}

impl Decl {
    /// The type this declaration introduces, for records and enums.
    pub fn declared_type(&self) -> Option<CanonicalType> {
        match &self.kind {
            DeclKind::Record {
                tag, template_args, ..
            } => Some(CanonicalType::Record {
                decl: self.id,
                tag: *tag,
                name: self.name.clone(),
                context: self.context.clone(),
                template_args: template_args.clone(),
            }),
            DeclKind::Enum { .. } => Some(CanonicalType::Enum {
                decl: self.id,
                name: self.name.clone(),
                context: self.context.clone(),
            }),
            DeclKind::TemplateTypeParm { depth, index, pack } => {
                Some(CanonicalType::TemplateTypeParm {
                    depth: *depth,
                    index: *index,
                    pack: *pack,
                    name: self.name.clone(),
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl_ref;

    #[test]
    fn context_chain() {
        let a = DeclContext::namespace(decl_ref("0x1").unwrap(), "A", DeclContext::TranslationUnit);
        let b = DeclContext::record(decl_ref("0x2").unwrap(), TagKind::Class, "B", a.clone());
        assert_eq!(b.parent(), Some(&a));
        assert_eq!(a.parent(), Some(&DeclContext::TranslationUnit));
        assert_eq!(DeclContext::TranslationUnit.parent(), None);
        let Some(CanonicalType::Record { name, context, .. }) = b.record_type() else {
            panic!("record context without a record type");
        };
        assert_eq!(name.as_deref(), Some("B"));
        assert_eq!(context, a);
    }

    #[test]
    fn forward_declaration_has_no_members() {
        let decl: Decl = serde_json::from_str(
            r#"{ "id": "0xa", "name": "Node", "kind": { "kind": "record", "tag": "struct" } }"#,
        )
        .unwrap();
        assert!(matches!(decl.kind, DeclKind::Record { members: None, .. }));
        assert_eq!(decl.context, DeclContext::TranslationUnit);
        assert_eq!(decl.declared_type().and_then(|t| t.decl()), Some(decl.id));
    }
}
