// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! Exercises the `UseHook` observer (§4.7): a caller-supplied hook sees every use edge Pass 2
//! emits, with the `in_assign` flag set correctly, and a build with no hook registered behaves
//! exactly like one with the default `NoopHook`.

use std::sync::Arc;
use std::sync::Mutex;

use codegraph::arena::Handle;
use codegraph::ast::Expr;
use codegraph::ast::Storage;
use codegraph::builder::Builder;
use codegraph::config::Config;
use codegraph::error::BuildError;
use codegraph::graph::GraphStore;
use codegraph::graph::Node;
use codegraph::hooks::UseContext;
use codegraph::hooks::UseHook;
use codegraph::NoCancellation;

use crate::support;

#[derive(Default)]
struct RecordingHook {
    seen: Arc<Mutex<Vec<(bool, Handle<Node>, Handle<Node>)>>>,
}

impl UseHook for RecordingHook {
    fn on_use_edge(&mut self, context: UseContext, in_assign: bool, src: Handle<Node>, dst: Handle<Node>, _graph: &GraphStore) {
        assert_eq!(context, UseContext::NoContext, "the base walker never emits call-arg/assign-rhs context");
        self.seen.lock().unwrap().push((in_assign, src, dst));
    }
}

#[test]
fn hook_fires_once_per_use_edge_with_in_assign_set_correctly() {
    let unit = support::unit(vec![
        support::global("count", Storage::Default, Some(Expr::IntLiteral(0))),
        support::func(
            "bump",
            Storage::Default,
            vec![codegraph::ast::Stmt::Expr(Expr::Assign {
                target: Box::new(Expr::Ident(support::name("count"))),
                value: Box::new(Expr::Ident(support::name("count"))),
            })],
        ),
    ]);

    let root = tempfile::tempdir().unwrap();
    let file = root.path().join("a.c");
    let units = std::collections::HashMap::from([(file.clone(), unit)]);
    let parse = move |path: &std::path::Path, _show_errors: bool| -> Result<codegraph::ast::TranslationUnit, BuildError> {
        Ok(units.get(path).unwrap().clone())
    };

    let seen = Arc::new(Mutex::new(Vec::new()));
    let hook = Box::new(RecordingHook { seen: seen.clone() });
    let mut builder = Builder::new(root.path(), vec![file], false, Config::default()).with_hook(hook);
    let (graph, _stats) = builder.build(&parse, &NoCancellation).expect("build should succeed");

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 2, "one use edge for each occurrence of `count` in the assignment");

    let count = graph.get_node("count", codegraph::graph::NodeKind::Global).unwrap();
    let read_is_recorded = seen.iter().any(|&(in_assign, _, dst)| dst == count && !in_assign);
    let write_is_recorded = seen.iter().any(|&(in_assign, _, dst)| dst == count && in_assign);
    assert!(read_is_recorded, "the RHS read of `count` should fire with in_assign = false");
    assert!(write_is_recorded, "the LHS write of `count` should fire with in_assign = true");
}

#[test]
fn a_build_with_no_hook_registered_still_produces_the_same_use_edges() {
    let unit = support::unit(vec![
        support::global("count", Storage::Default, Some(Expr::IntLiteral(0))),
        support::func("reader", Storage::Default, vec![support::ret_ident("count")]),
    ]);
    let (graph, _stats, _root) = support::build(&[("a.c", unit)], Config::default());

    let reader = graph.get_node("reader", codegraph::graph::NodeKind::Function).unwrap();
    let count = graph.get_node("count", codegraph::graph::NodeKind::Global).unwrap();
    assert!(graph.outgoing_uses(reader).any(|h| h == count));
}
