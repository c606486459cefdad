// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! The universal invariants of §8, checked against the public surface a build hands back: every
//! non-root node has exactly one `Has`-parent, every definition's recorded position names the
//! file it was actually found in, and rebuilding identical inputs is deterministic modulo gensym
//! counter values.

use pretty_assertions::assert_eq;

use codegraph::ast::Expr;
use codegraph::ast::Storage;
use codegraph::config::Config;
use codegraph::graph::NodeKind;

use crate::support;

fn sample_files() -> Vec<(&'static str, codegraph::ast::TranslationUnit)> {
    vec![
        (
            "a.c",
            support::unit(vec![
                support::global("x", Storage::Static, Some(Expr::IntLiteral(0))),
                support::func("f", Storage::Default, vec![support::ret_ident("x")]),
            ]),
        ),
        (
            "b.c",
            support::unit(vec![support::func("g", Storage::Default, vec![support::call_stmt("f")])]),
        ),
    ]
}

#[test]
fn every_non_root_node_has_exactly_one_has_parent() {
    let (graph, _stats, _root) = support::build(&sample_files(), Config::default());
    for node in graph.iter_nodes() {
        if node == graph.root() {
            continue;
        }
        assert!(
            graph.has_parent(node).is_some(),
            "node {:?} ({}) has no Has-parent",
            node,
            graph.node(node)
        );
    }
}

#[test]
fn definitions_reachable_from_a_file_record_that_file_as_their_position() {
    let (graph, _stats, _root) = support::build(&sample_files(), Config::default());
    let a = graph.get_node("a.c", NodeKind::File).unwrap();

    fn check_subtree(graph: &codegraph::graph::GraphStore, file: codegraph::arena::Handle<codegraph::graph::Node>, node: codegraph::arena::Handle<codegraph::graph::Node>) {
        if let Some(info) = graph.info(node) {
            if let Some(pos) = info.pos.clone() {
                assert_eq!(pos.file, file, "definition {} has a position pointing at the wrong file", graph.node(node));
            }
        }
        for child in graph.children(node) {
            check_subtree(graph, file, child);
        }
    }

    check_subtree(&graph, a, a);
}

#[test]
fn pass1_introduces_no_use_edges_before_pass2_runs() {
    // Indirect check: a definition-only build (no function bodies to walk) should produce a
    // graph with zero use edges anywhere, since nothing in Pass 2 had anything to resolve.
    let unit = support::unit(vec![support::global("count", Storage::Default, Some(Expr::IntLiteral(0)))]);
    let (graph, _stats, _root) = support::build(&[("a.c", unit)], Config::default());
    for node in graph.iter_nodes() {
        assert!(graph.outgoing_uses(node).next().is_none(), "unexpected use edge from {}", graph.node(node));
    }
}

#[test]
fn rebuilding_identical_inputs_yields_the_same_node_kind_population() {
    let (graph_a, stats_a, _root_a) = support::build(&sample_files(), Config::default());
    let (graph_b, stats_b, _root_b) = support::build(&sample_files(), Config::default());

    assert_eq!(stats_a.files_processed, stats_b.files_processed);

    let count = |graph: &codegraph::graph::GraphStore, kind: NodeKind| graph.iter_nodes().filter(|&h| graph.node(h).kind == kind).count();
    let kinds = [NodeKind::Function, NodeKind::Global, NodeKind::File, NodeKind::Dir];
    let counts_a: Vec<usize> = kinds.iter().map(|&k| count(&graph_a, k)).collect();
    let counts_b: Vec<usize> = kinds.iter().map(|&k| count(&graph_b, k)).collect();
    assert_eq!(counts_a, counts_b, "node counts by kind should match across identical rebuilds");
}

#[test]
fn a_function_parameter_name_never_produces_a_use_edge() {
    let unit = support::unit(vec![
        support::global("value", Storage::Default, Some(Expr::IntLiteral(0))),
        codegraph::ast::TopLevel::FunctionDef {
            name: support::name("identity"),
            storage: Storage::Default,
            return_type: support::int_type(),
            params: vec![codegraph::ast::Param {
                name: support::name("value"),
                ty: support::int_type(),
            }],
            body: codegraph::ast::Block {
                stmts: vec![support::ret_ident("value")],
            },
        },
    ]);
    let (graph, _stats, _root) = support::build(&[("a.c", unit)], Config::default());

    let identity = graph.get_node("identity", NodeKind::Function).unwrap();
    let value_global = graph.get_node("value", NodeKind::Global).unwrap();
    assert!(
        !graph.outgoing_uses(identity).any(|h| h == value_global),
        "a parameter shadowing a global must not be treated as a reference to it"
    );
}

#[test]
fn a_header_with_an_initialized_global_produces_global_not_extern() {
    let header = support::unit(vec![support::global("count", Storage::Default, Some(Expr::IntLiteral(0)))]);
    let (graph, _stats, _root) = support::build(&[("t.h", header)], Config::default());
    assert!(graph.get_node("count", NodeKind::Global).is_some());
    assert!(graph.get_node("count", NodeKind::GlobalExtern).is_none());
}

#[test]
fn a_header_with_an_uninitialized_non_extern_global_produces_extern() {
    let header = support::unit(vec![support::global("count", Storage::Default, None)]);
    let (graph, _stats, _root) = support::build(&[("t.h", header)], Config::default());
    assert!(graph.get_node("count", NodeKind::GlobalExtern).is_some());
    assert!(graph.get_node("count", NodeKind::Global).is_none());
}
