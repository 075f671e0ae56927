use super::*;
use c_ast::{BaseSpec, CanonicalType as Ty, DeclRef, Field, TemplateArgument, decl_ref};
use xir_ir::{Access, ArraySize, ContainerKind, NnsKind, Qualifiers, TagKind, TemplateArg, TypeNode};

fn d(n: u64) -> DeclRef {
    decl_ref(&format!("{n:#x}")).unwrap()
}

fn interner() -> Interner {
    Interner::new(Arc::new(Config::mock()))
}

fn int() -> Ty {
    Ty::builtin("int")
}

fn record(n: u64, tag: TagKind, name: &str, context: DeclContext) -> Ty {
    Ty::record(d(n), tag, name, context)
}

fn record_decl(
    n: u64,
    tag: TagKind,
    name: &str,
    context: DeclContext,
    members: Option<Vec<Field>>,
    bases: Vec<BaseSpec>,
) -> Decl {
    Decl {
        id: d(n),
        name: Some(name.into()),
        context,
        kind: DeclKind::Record {
            tag,
            members,
            bases,
            template_args: None,
        },
    }
}

fn var(n: u64, name: &str, ty: Ty) -> Event {
    Event::Decl {
        decl: Decl {
            id: d(n),
            name: Some(name.into()),
            context: DeclContext::TranslationUnit,
            kind: DeclKind::Var { ty },
        },
    }
}

fn field(name: &str, ty: Ty) -> Field {
    Field {
        name: name.into(),
        ty,
    }
}

#[test]
fn interning_is_idempotent() {
    let mut interner = interner();
    let p = interner.intern_type(&Ty::pointer(int()));
    let count = interner.types().len();
    assert_eq!(interner.intern_type(&Ty::pointer(int())), p);
    // A typedef names the same canonical type.
    let myint = Ty::typedef("myint", int());
    assert_eq!(interner.intern_type(&Ty::pointer(myint)), p);
    assert_eq!(interner.types().len(), count);
    assert_eq!(p.as_str(), "P0001");
}

#[test]
fn builtins_use_reserved_names() {
    let mut interner = interner();
    let id = interner.intern_type(&Ty::builtin("unsigned int"));
    assert_eq!(id.as_str(), "unsigned");
    assert_eq!(interner.types()[&id], TypeNode::Reserved {
        spelling: "unsigned int".into()
    });
    assert_eq!(interner.intern_type(&Ty::builtin("long long")).as_str(), "long_long");
}

#[test]
fn qualifiers_wrap_the_unqualified_type() {
    let mut interner = interner();
    let ci = interner.intern_type(&Ty::qualified(Qualifiers::CONST, int()));
    assert_eq!(ci.as_str(), "B0001");
    assert_eq!(interner.types()[&ci], TypeNode::Qualified {
        unqualified: TypeId::new("int"),
        quals: Qualifiers::CONST,
    });

    // `volatile ci` where `typedef const int ci;`
    let cv = Ty::qualified(
        Qualifiers::VOLATILE,
        Ty::typedef("ci", Ty::qualified(Qualifiers::CONST, int())),
    );
    let cv = interner.intern_type(&cv);
    assert_ne!(cv, ci);
    let TypeNode::Qualified { quals, .. } = &interner.types()[&cv] else {
        panic!("expected a qualified node");
    };
    assert!(quals.is_const && quals.is_volatile);
    assert_eq!(
        interner.intern_type(&Ty::qualified(Qualifiers::CONST, int())),
        ci
    );
}

#[test]
fn array_qualifiers_move_to_the_element() {
    let mut interner = interner();
    // `typedef int A[3]; const A x;` and `const int y[3];` name the same type.
    let via_typedef = interner.intern_type(&Ty::qualified(
        Qualifiers::CONST,
        Ty::typedef("A", Ty::array(int(), 3)),
    ));
    let direct = interner.intern_type(&Ty::array(Ty::qualified(Qualifiers::CONST, int()), 3));
    assert_eq!(via_typedef, direct);
    assert_eq!(via_typedef.as_str(), "A0002");
    assert_eq!(interner.types()[&via_typedef], TypeNode::Array {
        element: TypeId::new("B0001"),
        size: ArraySize::Fixed(3),
    });
    // `int`, `const int` and the array; no unqualified `int[3]` was minted on the way.
    assert_eq!(interner.types().len(), 3);

    // Nested arrays push the qualifiers all the way down.
    let matrix = interner.intern_type(&Ty::qualified(
        Qualifiers::VOLATILE,
        Ty::array(Ty::array(int(), 2), 4),
    ));
    let TypeNode::Array { element: row, .. } = &interner.types()[&matrix] else {
        panic!("expected an array");
    };
    let TypeNode::Array { element: cell, .. } = &interner.types()[row] else {
        panic!("expected an array of arrays");
    };
    assert_eq!(interner.types()[cell], TypeNode::Qualified {
        unqualified: TypeId::new("int"),
        quals: Qualifiers::VOLATILE,
    });
}

#[test]
fn sugar_wrapped_composites_share_one_node() {
    let mut interner = interner();
    let handler = Ty::pointer(Ty::function(Ty::builtin("void"), vec![int()]));
    let plain = interner.intern_type(&handler);
    let count = interner.types().len();

    let wrapped = Ty::Elaborated {
        named: Box::new(Ty::typedef(
            "handler_t",
            Ty::Paren {
                inner: Box::new(handler.clone()),
            },
        )),
    };
    assert_eq!(interner.intern_type(&wrapped), plain);
    // `void g(int a[3])` decays to `int *`.
    let decayed = Ty::Decayed {
        original: Box::new(Ty::array(int(), 3)),
        decayed: Box::new(Ty::pointer(int())),
    };
    let pointer = interner.intern_type(&Ty::pointer(int()));
    assert_eq!(interner.intern_type(&decayed), pointer);
    assert_eq!(interner.types().len(), count + 1);
}

#[test]
fn self_referential_struct_terminates() {
    let mut interner = interner();
    let node = record(1, TagKind::Struct, "Node", DeclContext::TranslationUnit);
    interner.declare(&record_decl(
        1,
        TagKind::Struct,
        "Node",
        DeclContext::TranslationUnit,
        Some(vec![field("next", Ty::pointer(node.clone()))]),
        vec![],
    ));

    let node_id = interner.intern_type(&node);
    assert_eq!(node_id.as_str(), "S0001");
    let TypeNode::Record(r) = &interner.types()[&node_id] else {
        panic!("expected a record");
    };
    assert!(r.complete);
    let next = &r.members[0].ty;
    assert_eq!(interner.types()[next], TypeNode::Pointer {
        pointee: node_id.clone()
    });
}

#[test]
fn forward_declared_records_are_completed() {
    let s = record(7, TagKind::Struct, "S", DeclContext::TranslationUnit);
    let mut interner = interner();
    interner.handle(&var(8, "p", Ty::pointer(s.clone()))).unwrap();
    let id = interner.intern_type(&s);
    assert!(matches!(&interner.types()[&id], TypeNode::Record(r) if !r.complete));

    interner.declare(&record_decl(
        7,
        TagKind::Struct,
        "S",
        DeclContext::TranslationUnit,
        Some(vec![field("x", int())]),
        vec![],
    ));
    let TypeNode::Record(r) = &interner.types()[&id] else {
        panic!("expected a record");
    };
    assert!(r.complete);
    assert_eq!(r.members[0].name, "x");
    assert_eq!(r.members[0].ty.as_str(), "int");

    // The body is recorded where it was seen, after the declaration that first named S.
    let entries = &interner.frames.get_mut(0).container.entries;
    let position = |wanted: fn(&Entry) -> bool| entries.iter().position(wanted);
    let named = position(|e| matches!(e, Entry::Decl(decl) if decl.name == "p")).unwrap();
    let defined = position(|e| matches!(e, Entry::Definition { .. })).unwrap();
    assert!(named < defined);
    assert!(matches!(&entries[defined], Entry::Definition { id: def } if *def == id));
}

#[test]
fn template_parameters_are_evicted_with_their_frame() {
    let mut interner = interner();
    interner.enter_scope(FrameKind::Template, None, Some("f".into()));
    let t = interner.intern_type(&Ty::template_parm(0, 0, "T"));
    let int_ptr = interner.intern_type(&Ty::pointer(int()));
    let t_ptr = interner.intern_type(&Ty::pointer(Ty::template_parm(0, 0, "T")));
    assert_eq!(interner.intern_type(&Ty::template_parm(0, 0, "T")), t);
    interner.leave_scope(FrameKind::Template).unwrap();

    interner.enter_scope(FrameKind::Template, None, Some("g".into()));
    let t2 = interner.intern_type(&Ty::template_parm(0, 0, "T"));
    assert_ne!(t2, t);
    assert_eq!(t2.as_str(), "T0004");
    assert_eq!(interner.intern_type(&Ty::pointer(int())), int_ptr);
    assert_ne!(
        interner.intern_type(&Ty::pointer(Ty::template_parm(0, 0, "T"))),
        t_ptr
    );
    interner.leave_scope(FrameKind::Template).unwrap();

    // The evicted nodes are still in the table.
    assert!(interner.types().get(&t).is_some());
    let unit = interner.finish().unwrap();
    let first = unit.root.frames().next().unwrap();
    assert_eq!(first.kind, ContainerKind::Template);
    let homed: Vec<_> = first.type_ids().map(|t| t.as_str()).collect();
    assert_eq!(homed, ["T0001", "P0003"]);
    assert_eq!(
        unit.root.type_ids().map(|t| t.as_str()).collect::<Vec<_>>(),
        ["P0002"]
    );
}

#[test]
fn namespace_frames_keep_their_bindings() {
    let ns = DeclContext::namespace(d(1), "A", DeclContext::TranslationUnit);
    let x = record(2, TagKind::Struct, "X", ns.clone());
    let mut interner = interner();
    interner.enter_scope(FrameKind::Namespace, Some(&ns), Some("A".into()));
    interner.declare(&record_decl(2, TagKind::Struct, "X", ns.clone(), Some(vec![]), vec![]));
    let inside = interner.intern_type(&x);
    interner.leave_scope(FrameKind::Namespace).unwrap();
    assert_eq!(interner.intern_type(&x), inside);
    assert_eq!(interner.depth(), 0);
}

#[test]
fn local_records_are_evicted_with_their_function() {
    let f = DeclContext::Function {
        decl: d(1),
        name: Some("f".into()),
        parent: Box::new(DeclContext::TranslationUnit),
    };
    let local = record(2, TagKind::Struct, "L", f.clone());
    let mut interner = interner();
    interner.enter_scope(FrameKind::Function, Some(&f), Some("f".into()));
    interner.enter_scope(FrameKind::Block, None, None);
    let inside = interner.intern_type(&local);
    interner.leave_scope(FrameKind::Block).unwrap();
    // Homed in the function frame, not the block.
    assert_eq!(interner.intern_type(&local), inside);
    interner.leave_scope(FrameKind::Function).unwrap();
    assert_ne!(interner.intern_type(&local), inside);

    let scope = match &interner.types()[&inside] {
        TypeNode::Record(r) => r.scope.clone(),
        other => panic!("expected a record, got {other}"),
    };
    assert_eq!(interner.scopes()[&scope].kind, NnsKind::Local {
        function: Some("f".into())
    });
}

#[test]
fn nested_class_scopes_chain_to_global() {
    let a = DeclContext::namespace(d(1), "A", DeclContext::TranslationUnit);
    let b = DeclContext::record(d(2), TagKind::Class, "B", a.clone());
    let mut interner = interner();
    let b_scope = interner.intern_scope(&b);
    let a_scope = interner.scopes().parent_of(&b_scope).unwrap().clone();
    assert_eq!(interner.scopes()[&a_scope].kind, NnsKind::Namespace {
        name: Some("A".into())
    });
    assert_eq!(interner.scopes().parent_of(&a_scope), Some(&ScopeId::global()));
    let NnsKind::Class { class } = &interner.scopes()[&b_scope].kind else {
        panic!("expected a class scope");
    };
    assert_eq!(class.as_str(), "C0001");
    assert_eq!(interner.intern_scope(&b), b_scope);
    assert_eq!(interner.intern_scope(&DeclContext::TranslationUnit), ScopeId::global());
}

#[test]
fn bases_are_recorded_in_order() {
    let tu = DeclContext::TranslationUnit;
    let b1 = record(1, TagKind::Struct, "B1", tu.clone());
    let b2 = record(2, TagKind::Class, "B2", tu.clone());
    let derived = record_decl(
        3,
        TagKind::Class,
        "D",
        tu.clone(),
        Some(vec![]),
        vec![
            BaseSpec {
                ty: b1,
                access: None,
                is_virtual: false,
            },
            BaseSpec {
                ty: b2,
                access: Some(Access::Protected),
                is_virtual: true,
            },
        ],
    );
    let mut interner = interner();
    interner.declare(&derived);
    interner.declare(&derived);

    let d_id = interner.intern_type(&record(3, TagKind::Class, "D", tu));
    let bases = interner.inheritance().bases_of(&d_id);
    assert_eq!(bases.len(), 2);
    assert_eq!(interner.inheritance().len(), 2);
    assert_eq!(bases[0].access, Access::Private);
    assert!(!bases[0].is_virtual);
    assert_eq!(bases[1].access, Access::Protected);
    assert!(bases[1].is_virtual);
    let TypeNode::Record(r) = &interner.types()[&d_id] else {
        panic!("expected a record");
    };
    assert_eq!(r.bases[0].ty, bases[0].base);
}

#[test]
fn template_arguments_are_interned() {
    let mut interner = interner();
    let vector = Ty::Record {
        decl: d(9),
        tag: TagKind::Class,
        name: Some("vector".into()),
        context: DeclContext::TranslationUnit,
        template_args: Some(vec![
            TemplateArgument::Type { ty: int() },
            TemplateArgument::Integral { value: "3".into() },
            TemplateArgument::Null,
        ]),
    };
    let id = interner.intern_type(&vector);
    let TypeNode::Record(r) = &interner.types()[&id] else {
        panic!("expected a record");
    };
    assert_eq!(
        r.template_args,
        Some(vec![
            TemplateArg::Type(TypeId::new("int")),
            TemplateArg::Literal("3".into()),
            TemplateArg::Unresolved("null".into()),
        ])
    );
}

#[test]
fn enums_are_completed() {
    let mut interner = interner();
    interner.declare(&Decl {
        id: d(4),
        name: Some("Color".into()),
        context: DeclContext::TranslationUnit,
        kind: DeclKind::Enum {
            scoped: true,
            underlying: Some(Ty::builtin("unsigned int")),
            enumerators: Some(vec!["Red".into(), "Green".into()]),
        },
    });
    let (id, node) = interner.types().iter().next().unwrap();
    assert_eq!(id.as_str(), "E0001");
    let TypeNode::Enum(e) = node else {
        panic!("expected an enum");
    };
    assert!(e.complete && e.scoped);
    assert_eq!(e.underlying, Some(TypeId::new("unsigned")));
    assert_eq!(e.enumerators, ["Red", "Green"]);
}

#[test]
fn declarations_land_in_their_frame() {
    let ns = DeclContext::namespace(d(1), "A", DeclContext::TranslationUnit);
    let events = vec![
        var(2, "a", int()),
        Event::EnterScope {
            frame: FrameKind::Namespace,
            context: Some(ns),
            label: Some("A".into()),
        },
        Event::Decl {
            decl: Decl {
                id: d(3),
                name: Some("f".into()),
                context: DeclContext::TranslationUnit,
                kind: DeclKind::Function {
                    ty: Ty::function(int(), vec![int(), Ty::builtin("char")]),
                    params: vec![Some("x".into()), None],
                },
            },
        },
        Event::LeaveScope {
            frame: FrameKind::Namespace,
        },
        Event::Type {
            ty: Ty::pointer(Ty::builtin("char")),
        },
    ];
    let unit = intern_events(Arc::new(Config::mock()), events).unwrap();
    let decls = unit.root.declarations();
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0].name, "a");
    assert_eq!(decls[1].kind, DeclarationKind::Function);
    assert_eq!(decls[1].params, ["x", ""]);
    assert!(matches!(unit.types[&decls[1].ty], TypeNode::Function(_)));
    let namespace = unit.root.frames().next().unwrap();
    assert_eq!(namespace.label.as_deref(), Some("A"));
    assert_eq!(namespace.scope.as_ref().map(|s| s.as_str()), Some("N0001"));
    assert!(unit.problems().is_empty());
}

#[test]
fn identical_streams_intern_identically() {
    let events = || {
        vec![
            Event::EnterScope {
                frame: FrameKind::Template,
                context: None,
                label: None,
            },
            var(1, "t", Ty::pointer(Ty::template_parm(0, 0, "T"))),
            Event::LeaveScope {
                frame: FrameKind::Template,
            },
            var(2, "a", Ty::array(Ty::pointer(int()), 3)),
        ]
    };
    let first = intern_events(Arc::new(Config::mock()), events()).unwrap();
    let second = intern_events(Arc::new(Config::mock()), events()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn malformed_frame_sequences_are_errors() {
    let mut interner = interner();
    assert_eq!(
        interner.leave_scope(FrameKind::Block),
        Err(InternError::PopWithoutFrame {
            found: FrameKind::Block
        })
    );
    interner.enter_scope(FrameKind::Function, None, None);
    assert_eq!(
        interner.leave_scope(FrameKind::Class),
        Err(InternError::FrameMismatch {
            expected: FrameKind::Function,
            found: FrameKind::Class,
        })
    );
    assert_eq!(interner.finish(), Err(InternError::UnclosedFrames(1)));

    let events = [Event::EnterScope {
        frame: FrameKind::Namespace,
        context: None,
        label: None,
    }];
    assert_eq!(
        intern_events(Arc::new(Config::mock()), events),
        Err(InternError::UnclosedFrames(1))
    );
}
