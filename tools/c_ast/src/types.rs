use crate::DeclRef;
use crate::decls::DeclContext;
use serde::{Deserialize, Serialize};
use xir_ir::{Qualifiers, RefKind, TagKind};

/// A type as the upstream parser reports it.
///
/// Besides the canonical forms this also carries the sugar clang keeps around
/// (`Typedef`, `Elaborated`, `Paren`, `Decayed`). Sugar never reaches the IR: it is stripped by
/// [CanonicalType::split_qualifiers].
/// Clang Docs on Type: https://clang.llvm.org/doxygen/classclang_1_1Type.html
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CanonicalType {
    /// A builtin type, named by its C++ spelling (`unsigned int`, `long double`, ...).
    Builtin { name: String },
    Qualified {
        quals: Qualifiers,
        ty: Box<CanonicalType>,
    },
    Pointer { pointee: Box<CanonicalType> },
    #[serde(rename = "lvalue_reference")]
    LValueReference { referee: Box<CanonicalType> },
    #[serde(rename = "rvalue_reference")]
    RValueReference { referee: Box<CanonicalType> },
    MemberPointer {
        class: Box<CanonicalType>,
        pointee: Box<CanonicalType>,
    },
    ConstantArray {
        element: Box<CanonicalType>,
        size: u64,
    },
    IncompleteArray { element: Box<CanonicalType> },
    VariableArray { element: Box<CanonicalType> },
    /// An array whose bound depends on a template parameter; `size` is the bound as written.
    DependentSizedArray {
        element: Box<CanonicalType>,
        size: String,
    },
    /// Clang Docs: https://clang.llvm.org/doxygen/classclang_1_1FunctionProtoType.html
    Function {
        ret: Box<CanonicalType>,
        #[serde(default)]
        params: Vec<CanonicalType>,
        #[serde(default)]
        variadic: bool,
        /// Trailing cv-qualifiers of a member function.
        #[serde(default)]
        quals: Qualifiers,
        #[serde(default)]
        ref_qualifier: Option<RefKind>,
        /// False for an unprototyped C declaration such as `int f()`.
        #[serde(default = "yes")]
        has_prototype: bool,
    },
    Record {
        decl: DeclRef,
        tag: TagKind,
        #[serde(default)]
        name: Option<String>,
        /// Where the record is declared.
        #[serde(default)]
        context: DeclContext,
        /// Present for class template specializations.
        #[serde(default)]
        template_args: Option<Vec<TemplateArgument>>,
    },
    Enum {
        decl: DeclRef,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        context: DeclContext,
    },
    TemplateTypeParm {
        depth: u32,
        index: u32,
        #[serde(default)]
        pack: bool,
        #[serde(default)]
        name: Option<String>,
    },
    /// A template-id that does not resolve to a record yet, e.g. `vector<T>` inside a template.
    TemplateSpecialization {
        name: String,
        #[serde(default)]
        context: DeclContext,
        #[serde(default)]
        args: Vec<TemplateArgument>,
    },
    /// `typename Qualifier::name`
    DependentName {
        qualifier: Box<CanonicalType>,
        name: String,
    },
    PackExpansion { pattern: Box<CanonicalType> },
    /// e.g. `__underlying_type(T)`
    UnaryTransform {
        transform: String,
        base: Box<CanonicalType>,
    },
    Atomic { value: Box<CanonicalType> },
    Typedef {
        name: String,
        aliased: Box<CanonicalType>,
    },
    Elaborated { named: Box<CanonicalType> },
    Paren { inner: Box<CanonicalType> },
    /// An array or function parameter type adjusted to a pointer.
    Decayed {
        original: Box<CanonicalType>,
        decayed: Box<CanonicalType>,
    },
    /// Every other type class (vector types, `typeof`, ...).
    Other { description: String },
}

fn yes() -> bool {
    true
}

/// A template argument. Clang Docs:
/// https://clang.llvm.org/doxygen/classclang_1_1TemplateArgument.html
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateArgument {
    Type { ty: CanonicalType },
    Integral { value: String },
    Expression { text: String },
    Template { name: String },
    Pack { args: Vec<TemplateArgument> },
    /// An argument clang could not resolve.
    Null,
}

impl CanonicalType {
    pub fn builtin(name: &str) -> CanonicalType {
        CanonicalType::Builtin { name: name.into() }
    }

    pub fn pointer(pointee: CanonicalType) -> CanonicalType {
        CanonicalType::Pointer {
            pointee: Box::new(pointee),
        }
    }

    pub fn lvalue_ref(referee: CanonicalType) -> CanonicalType {
        CanonicalType::LValueReference {
            referee: Box::new(referee),
        }
    }

    pub fn rvalue_ref(referee: CanonicalType) -> CanonicalType {
        CanonicalType::RValueReference {
            referee: Box::new(referee),
        }
    }

    pub fn qualified(quals: Qualifiers, ty: CanonicalType) -> CanonicalType {
        CanonicalType::Qualified {
            quals,
            ty: Box::new(ty),
        }
    }

    pub fn array(element: CanonicalType, size: u64) -> CanonicalType {
        CanonicalType::ConstantArray {
            element: Box::new(element),
            size,
        }
    }

    /// A prototyped, non-variadic function type.
    pub fn function(ret: CanonicalType, params: Vec<CanonicalType>) -> CanonicalType {
        CanonicalType::Function {
            ret: Box::new(ret),
            params,
            variadic: false,
            quals: Qualifiers::default(),
            ref_qualifier: None,
            has_prototype: true,
        }
    }

    pub fn record(decl: DeclRef, tag: TagKind, name: &str, context: DeclContext) -> CanonicalType {
        CanonicalType::Record {
            decl,
            tag,
            name: Some(name.into()),
            context,
            template_args: None,
        }
    }

    pub fn template_parm(depth: u32, index: u32, name: &str) -> CanonicalType {
        CanonicalType::TemplateTypeParm {
            depth,
            index,
            pack: false,
            name: Some(name.into()),
        }
    }

    pub fn typedef(name: &str, aliased: CanonicalType) -> CanonicalType {
        CanonicalType::Typedef {
            name: name.into(),
            aliased: Box::new(aliased),
        }
    }

    /// True for the variants that only carry spelling and vanish under canonicalization.
    pub fn is_sugar(&self) -> bool {
        matches!(
            self,
            CanonicalType::Typedef { .. }
                | CanonicalType::Elaborated { .. }
                | CanonicalType::Paren { .. }
                | CanonicalType::Decayed { .. }
        )
    }

    /// Strips sugar and collects the qualifiers found on the way down, returning them together
    /// with the unqualified canonical type underneath.
    ///
    /// `typedef const int ci; volatile ci` yields `(const volatile, int)`.
    pub fn split_qualifiers(&self) -> (Qualifiers, &CanonicalType) {
        let mut quals = Qualifiers::default();
        let mut ty = self;
        loop {
            ty = match ty {
                CanonicalType::Qualified { quals: q, ty } => {
                    quals = quals.union(*q);
                    ty
                }
                CanonicalType::Typedef { aliased, .. } => aliased,
                CanonicalType::Elaborated { named } => named,
                CanonicalType::Paren { inner } => inner,
                CanonicalType::Decayed { decayed, .. } => decayed,
                _ => return (quals, ty),
            }
        }
    }

    /// For an array type, the same array with `quals` applied to its element type; `None` for
    /// every other type. cv-qualifiers on an array always belong to its elements.
    pub fn with_element_qualifiers(&self, quals: Qualifiers) -> Option<CanonicalType> {
        let qualify = |element: &CanonicalType| Box::new(CanonicalType::qualified(quals, element.clone()));
        Some(match self {
            CanonicalType::ConstantArray { element, size } => CanonicalType::ConstantArray {
                element: qualify(element),
                size: *size,
            },
            CanonicalType::IncompleteArray { element } => CanonicalType::IncompleteArray {
                element: qualify(element),
            },
            CanonicalType::VariableArray { element } => CanonicalType::VariableArray {
                element: qualify(element),
            },
            CanonicalType::DependentSizedArray { element, size } => {
                CanonicalType::DependentSizedArray {
                    element: qualify(element),
                    size: size.clone(),
                }
            }
            _ => return None,
        })
    }

    /// The declaration behind a record or enum type.
    pub fn decl(&self) -> Option<DeclRef> {
        match self.split_qualifiers().1 {
            CanonicalType::Record { decl, .. } | CanonicalType::Enum { decl, .. } => Some(*decl),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            CanonicalType::Builtin { .. } => "builtin",
            CanonicalType::Qualified { .. } => "qualified",
            CanonicalType::Pointer { .. } => "pointer",
            CanonicalType::LValueReference { .. } => "lvalue_reference",
            CanonicalType::RValueReference { .. } => "rvalue_reference",
            CanonicalType::MemberPointer { .. } => "member_pointer",
            CanonicalType::ConstantArray { .. } => "constant_array",
            CanonicalType::IncompleteArray { .. } => "incomplete_array",
            CanonicalType::VariableArray { .. } => "variable_array",
            CanonicalType::DependentSizedArray { .. } => "dependent_sized_array",
            CanonicalType::Function { .. } => "function",
            CanonicalType::Record { .. } => "record",
            CanonicalType::Enum { .. } => "enum",
            CanonicalType::TemplateTypeParm { .. } => "template_type_parm",
            CanonicalType::TemplateSpecialization { .. } => "template_specialization",
            CanonicalType::DependentName { .. } => "dependent_name",
            CanonicalType::PackExpansion { .. } => "pack_expansion",
            CanonicalType::UnaryTransform { .. } => "unary_transform",
            CanonicalType::Atomic { .. } => "atomic",
            CanonicalType::Typedef { .. } => "typedef",
            CanonicalType::Elaborated { .. } => "elaborated",
            CanonicalType::Paren { .. } => "paren",
            CanonicalType::Decayed { .. } => "decayed",
            CanonicalType::Other { .. } => "other",
        }
    }
}
