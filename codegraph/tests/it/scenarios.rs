// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! The six end-to-end scenarios (S1-S6): static shadowing, prototype rekind plus the adjuster,
//! struct/field, typedef collapse, macro-vs-function disambiguation, and duplicate definition.

use codegraph::ast::Expr;
use codegraph::ast::FieldDecl;
use codegraph::ast::Storage;
use codegraph::ast::TopLevel;
use codegraph::ast::TypeRef;
use codegraph::config::Config;
use codegraph::graph::NodeKind;

use crate::support;

/// S1 — Static shadowing: two files each define a file-local `static int x` and a function that
/// reads it back; the two `x`s must end up as distinct gensymmed nodes with no cross-file edge.
#[test]
fn s1_static_shadowing_produces_distinct_gensyms_with_no_cross_file_edge() {
    let a = support::unit(vec![
        support::global("x", Storage::Static, Some(Expr::IntLiteral(0))),
        support::func("f", Storage::Default, vec![support::ret_ident("x")]),
    ]);
    let b = support::unit(vec![
        support::global("x", Storage::Static, Some(Expr::IntLiteral(1))),
        support::func("g", Storage::Default, vec![support::ret_ident("x")]),
    ]);
    let (graph, _stats, _root) = support::build(&[("a.c", a), ("b.c", b)], Config::default());

    let f = graph.get_node("f", NodeKind::Function).unwrap();
    let g = graph.get_node("g", NodeKind::Function).unwrap();
    let x1 = graph.get_node("x__1", NodeKind::Global).expect("first static x should be gensymmed");
    let x2 = graph.get_node("x__2", NodeKind::Global).expect("second static x should be gensymmed");
    assert_ne!(x1, x2);

    assert!(graph.outgoing_uses(f).any(|h| h == x1));
    assert!(!graph.outgoing_uses(f).any(|h| h == x2), "f must not see b.c's x");
    assert!(graph.outgoing_uses(g).any(|h| h == x2));
    assert!(!graph.outgoing_uses(g).any(|h| h == x1), "g must not see a.c's x");
}

/// S2 — Prototype rekind: with the adjuster off, a caller of a prototyped-but-undefined function
/// resolves straight to the prototype. With the adjuster on and a definition arriving later, both
/// the definition-to-declaration edge and the caller's edge to the declaration are present.
#[test]
fn s2_prototype_rekind_without_adjuster() {
    let a_h = support::unit(vec![TopLevel::FunctionProto {
        name: support::name("f"),
        storage: Storage::Default,
        return_type: support::void_type(),
        params: Vec::new(),
    }]);
    let b_c = support::unit(vec![
        TopLevel::Include { path: "a.h".to_string() },
        support::func("caller", Storage::Default, vec![support::call_stmt("f")]),
    ]);
    let (graph, _stats, _root) = support::build(&[("a.h", a_h), ("b.c", b_c)], Config::default());

    let caller = graph.get_node("caller", NodeKind::Function).unwrap();
    let f_proto = graph.get_node("f", NodeKind::Prototype).unwrap();
    assert!(graph.outgoing_uses(caller).any(|h| h == f_proto));
    assert!(graph.get_node("f", NodeKind::Function).is_none(), "f has no definition in this scenario");
}

#[test]
fn s2_prototype_rekind_with_adjuster_and_a_later_definition() {
    let a_h = support::unit(vec![TopLevel::FunctionProto {
        name: support::name("f"),
        storage: Storage::Default,
        return_type: support::void_type(),
        params: Vec::new(),
    }]);
    let b_c = support::unit(vec![
        TopLevel::Include { path: "a.h".to_string() },
        support::func("caller", Storage::Default, vec![support::call_stmt("f")]),
    ]);
    let a_c = support::unit(vec![support::func("f", Storage::Default, vec![])]);

    let config = Config {
        propagate_deps_def_to_decl: true,
        ..Config::default()
    };
    let (graph, _stats, _root) = support::build(&[("a.h", a_h), ("b.c", b_c), ("a.c", a_c)], config);

    let caller = graph.get_node("caller", NodeKind::Function).unwrap();
    let f_def = graph.get_node("f", NodeKind::Function).unwrap();
    let f_proto = graph.get_node("f", NodeKind::Prototype).unwrap();

    assert!(graph.outgoing_uses(f_def).any(|h| h == f_proto), "def -> decl edge");
    assert!(graph.outgoing_uses(caller).any(|h| h == f_proto), "caller -> decl edge");
}

/// S3 — Struct/field: a struct definition produces a `Type` node and one `Field` node per named
/// member, each `Has`-parented by the struct's `Type` node.
#[test]
fn s3_struct_definition_produces_type_and_field_nodes() {
    let t_h = support::unit(vec![TopLevel::StructDef {
        name: support::name("P"),
        fields: vec![
            FieldDecl {
                name: Some(support::name("x")),
                ty: support::int_type(),
            },
            FieldDecl {
                name: Some(support::name("y")),
                ty: support::int_type(),
            },
        ],
    }]);
    let (graph, _stats, _root) = support::build(&[("t.h", t_h)], Config::default());

    let s_p = graph.get_node("S__P", NodeKind::Type).unwrap();
    let x = graph.get_node("S__P.x", NodeKind::Field).unwrap();
    let y = graph.get_node("S__P.y", NodeKind::Field).unwrap();
    assert_eq!(graph.has_parent(x), Some(s_p));
    assert_eq!(graph.has_parent(y), Some(s_p));
    let children: Vec<_> = graph.children(s_p).collect();
    assert!(children.contains(&x));
    assert!(children.contains(&y));
}

/// S4 — Typedef collapse: a pointer to a typedef'd struct either collapses straight to the
/// struct's `Type` node (`typedefs_dependencies = false`) or stays on the typedef alias itself
/// (`typedefs_dependencies = true`).
#[test]
fn s4_typedef_collapses_to_struct_when_typedefs_dependencies_is_off() {
    let t_h = support::unit(vec![
        TopLevel::StructDef {
            name: support::name("P"),
            fields: Vec::new(),
        },
        TopLevel::Typedef {
            name: support::name("T"),
            target: TypeRef::Struct(support::name("P")),
        },
    ]);
    let use_c = support::unit(vec![
        TopLevel::Include { path: "t.h".to_string() },
        support::func(
            "f",
            Storage::Default,
            vec![codegraph::ast::Stmt::VarDecl {
                name: support::name("p"),
                storage: Storage::Default,
                ty: TypeRef::Pointer(Box::new(TypeRef::Typedef(support::name("T")))),
                initializer: None,
            }],
        ),
    ]);
    let config = Config {
        typedefs_dependencies: false,
        ..Config::default()
    };
    let (graph, _stats, _root) = support::build(&[("t.h", t_h), ("use.c", use_c)], config);

    let f = graph.get_node("f", NodeKind::Function).unwrap();
    let s_p = graph.get_node("S__P", NodeKind::Type).unwrap();
    assert!(graph.outgoing_uses(f).any(|h| h == s_p));
    assert!(graph.get_node("T__T", NodeKind::Type).map_or(true, |t| !graph.outgoing_uses(f).any(|h| h == t)));
}

#[test]
fn s4_typedef_stays_on_the_alias_when_typedefs_dependencies_is_on() {
    let t_h = support::unit(vec![
        TopLevel::StructDef {
            name: support::name("P"),
            fields: Vec::new(),
        },
        TopLevel::Typedef {
            name: support::name("T"),
            target: TypeRef::Struct(support::name("P")),
        },
    ]);
    let use_c = support::unit(vec![
        TopLevel::Include { path: "t.h".to_string() },
        support::func(
            "f",
            Storage::Default,
            vec![codegraph::ast::Stmt::VarDecl {
                name: support::name("p"),
                storage: Storage::Default,
                ty: TypeRef::Pointer(Box::new(TypeRef::Typedef(support::name("T")))),
                initializer: None,
            }],
        ),
    ]);
    let config = Config {
        typedefs_dependencies: true,
        ..Config::default()
    };
    let (graph, _stats, _root) = support::build(&[("t.h", t_h), ("use.c", use_c)], config);

    let f = graph.get_node("f", NodeKind::Function).unwrap();
    let t_t = graph.get_node("T__T", NodeKind::Type).unwrap();
    assert!(graph.outgoing_uses(f).any(|h| h == t_t));
}

/// S5 — Macro vs function disambiguation: an all-uppercase call target resolves as a `Macro`; a
/// lowercase one resolves as a `Function` (or, lacking a definition, rekinds to `Prototype`).
#[test]
fn s5_macro_and_function_calls_in_the_same_expression_resolve_to_distinct_kinds() {
    let m_h = support::unit(vec![TopLevel::MacroDefine {
        name: support::name("DO"),
        params: vec![support::name("x")],
        body: Expr::Ident(support::name("x")),
    }]);
    let u_c = support::unit(vec![
        TopLevel::Include { path: "m.h".to_string() },
        support::func(
            "g",
            Storage::Default,
            vec![codegraph::ast::Stmt::Return(Some(Expr::Binary {
                left: Box::new(Expr::Call {
                    callee: Box::new(Expr::Ident(support::name("DO"))),
                    args: vec![Expr::Ident(support::name("y"))],
                }),
                right: Box::new(Expr::Call {
                    callee: Box::new(Expr::Ident(support::name("f"))),
                    args: vec![Expr::Ident(support::name("y"))],
                }),
            }))],
        ),
        TopLevel::FunctionProto {
            name: support::name("f"),
            storage: Storage::Default,
            return_type: support::int_type(),
            params: Vec::new(),
        },
    ]);
    let (graph, _stats, _root) = support::build(&[("m.h", m_h), ("u.c", u_c)], Config::default());

    let g = graph.get_node("g", NodeKind::Function).unwrap();
    let do_macro = graph.get_node("DO", NodeKind::Macro).unwrap();
    let f_proto = graph.get_node("f", NodeKind::Prototype).unwrap();
    assert!(graph.outgoing_uses(g).any(|h| h == do_macro));
    assert!(graph.outgoing_uses(g).any(|h| h == f_proto));
}

/// S6 — Duplicate definition: two non-static definitions of the same function name across files
/// both end up marked dupe, and a caller's reference to that name is dropped rather than linked.
#[test]
fn s6_duplicate_definitions_suppress_caller_edges() {
    let a = support::unit(vec![support::func("shared", Storage::Default, vec![])]);
    let b = support::unit(vec![support::func("shared", Storage::Default, vec![])]);
    let c = support::unit(vec![support::func("caller", Storage::Default, vec![support::call_stmt("shared")])]);
    let (graph, stats, _root) = support::build(&[("a.c", a), ("b.c", b), ("c.c", c)], Config::default());

    assert_eq!(stats.dupes_by_kind.count(), 1);
    let shared = graph.get_node("shared", NodeKind::Function).unwrap();
    let caller = graph.get_node("caller", NodeKind::Function).unwrap();
    assert!(!graph.outgoing_uses(caller).any(|h| h == shared), "dupe target must not gain use edges");
    assert_eq!(stats.dropped_dupe_edges, 1);
}
