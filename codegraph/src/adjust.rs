// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! The whole-graph touch-up pass that runs once both walkers are done (§4.6): optionally
//! propagating a definition's callers onto its matching declaration, then pruning the synthetic
//! sinks that ended up with no edges at all.

use crate::arena::Handle;
use crate::config::Config;
use crate::graph::EdgeLabel;
use crate::graph::GraphStore;
use crate::graph::Node;
use crate::graph::NodeKind;

/// For every declaration node with a matching definition, binds the two together and makes the
/// definition's callers visible through the declaration too (§4.6):
///
/// 1. Add a `Use` edge `def -> decl`, so the declaration is no longer an orphan `remove_empty`
///    would prune.
/// 2. For every predecessor `u` of `def` (every node with a `Use` edge into it), add `u -> decl`,
///    so a consumer that only ever navigates by declaration (the common case for a function used
///    from another translation unit) still sees who calls it.
///
/// A no-op when the config flag is off. Safe to run more than once: [`GraphStore::add_edge`] on
/// `Use` dedups, so re-running against an already-adjusted graph adds nothing new.
pub fn run(graph: &mut GraphStore, config: &Config) {
    if config.propagate_deps_def_to_decl {
        propagate_by_exact_name(graph, NodeKind::Function, NodeKind::Prototype);
        propagate_by_exact_name(graph, NodeKind::Global, NodeKind::GlobalExtern);
        propagate_typedef_to_struct_or_union(graph);
    }
    graph.remove_empty(&NodeKind::SINKS);
}

/// Binds every `(def_kind, decl_kind)` pair that share the same node name (functions/prototypes,
/// globals/externs).
fn propagate_by_exact_name(graph: &mut GraphStore, def_kind: NodeKind, decl_kind: NodeKind) {
    let decls: Vec<_> = graph
        .iter_nodes()
        .filter(|h| graph.node(*h).kind == decl_kind)
        .collect();
    for decl in decls {
        let name = graph.node(decl).name.clone();
        if let Some(def) = graph.get_node(&name, def_kind) {
            bind_decl_to_def(graph, def, decl);
        }
    }
}

/// Binds a `T__x` typedef declaration to the `S__x` / `U__x` struct or union it names, when one
/// exists (§4.6 "typedef type T__x ... struct tag S__x").
fn propagate_typedef_to_struct_or_union(graph: &mut GraphStore) {
    let decls: Vec<_> = graph
        .iter_nodes()
        .filter(|h| graph.node(*h).kind == NodeKind::Type && graph.node(*h).name.starts_with("T__"))
        .collect();
    for decl in decls {
        let suffix = graph.node(decl).name["T__".len()..].to_string();
        let def = graph
            .get_node(&format!("S__{}", suffix), NodeKind::Type)
            .or_else(|| graph.get_node(&format!("U__{}", suffix), NodeKind::Type));
        if let Some(def) = def {
            bind_decl_to_def(graph, def, decl);
        }
    }
}

fn bind_decl_to_def(graph: &mut GraphStore, def: Handle<Node>, decl: Handle<Node>) {
    let callers = graph.predecessors(def, EdgeLabel::Use);
    graph.add_edge(def, decl, EdgeLabel::Use);
    for caller in callers {
        graph.add_edge(caller, decl, EdgeLabel::Use);
    }
}
