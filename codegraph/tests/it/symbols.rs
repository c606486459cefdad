// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

use codegraph::ast::TypeRef;
use codegraph::graph::GraphStore;
use codegraph::graph::NodeKind;
use codegraph::symbols::SymbolTable;
use codegraph::symbols::TypedefBind;

#[test]
fn rename_round_trips_within_a_file() {
    let mut graph = GraphStore::new();
    let mut symbols = SymbolTable::new();
    let file = graph.add_file("a.c");
    let renamed = graph.add_node(graph.gensym("helper"), NodeKind::Function);
    symbols.record_rename(file, "helper", renamed);
    assert_eq!(symbols.rename_lookup(file, "helper"), Some(renamed));
}

#[test]
fn rename_lookup_is_scoped_per_file() {
    let mut graph = GraphStore::new();
    let mut symbols = SymbolTable::new();
    let a = graph.add_file("a.c");
    let b = graph.add_file("b.c");
    let renamed = graph.add_node("helper__1", NodeKind::Function);
    symbols.record_rename(a, "helper", renamed);
    assert_eq!(symbols.rename_lookup(a, "helper"), Some(renamed));
    assert_eq!(symbols.rename_lookup(b, "helper"), None);
}

#[test]
fn typedef_first_binding_wins_on_conflict() {
    let mut graph = GraphStore::new();
    let mut symbols = SymbolTable::new();
    let int_ty = TypeRef::Builtin("int".to_string());
    let long_ty = TypeRef::Builtin("long".to_string());

    let (outcome, node) = symbols.bind_typedef("size_t", int_ty.clone(), || graph.add_node("T__size_t", NodeKind::Type));
    assert_eq!(outcome, TypedefBind::FirstBinding);

    let (outcome2, node2) = symbols.bind_typedef("size_t", long_ty, || {
        panic!("make_node must not run on a conflicting rebind")
    });
    assert_eq!(outcome2, TypedefBind::Conflict);
    assert_eq!(node, node2, "the first-bound node stays authoritative");
    assert_eq!(symbols.typedef_target("size_t"), Some(&int_ty));
}

#[test]
fn typedef_same_binding_is_harmless() {
    let mut graph = GraphStore::new();
    let mut symbols = SymbolTable::new();
    let int_ty = TypeRef::Builtin("int".to_string());

    symbols.bind_typedef("size_t", int_ty.clone(), || graph.add_node("T__size_t", NodeKind::Type));
    let (outcome, _) = symbols.bind_typedef("size_t", int_ty, || panic!("make_node must not run twice"));
    assert_eq!(outcome, TypedefBind::SameBinding);
}

#[test]
fn dupe_marking_is_idempotent_to_query() {
    let mut graph = GraphStore::new();
    let mut symbols = SymbolTable::new();
    let node = graph.add_node("f", NodeKind::Function);
    assert!(!symbols.is_dupe(node));
    assert!(symbols.mark_dupe(node));
    assert!(symbols.is_dupe(node));
    assert!(!symbols.mark_dupe(node), "marking twice reports already-present");
    assert!(symbols.is_dupe(node));
}

#[test]
fn fields_of_round_trips_recorded_field_names() {
    let mut symbols = SymbolTable::new();
    symbols.record_fields("S__point", vec!["x".to_string(), "y".to_string()]);
    assert_eq!(symbols.fields_of("S__point"), Some(&["x".to_string(), "y".to_string()][..]));
    assert_eq!(symbols.fields_of("S__missing"), None);
}
