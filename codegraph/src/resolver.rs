// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! Name resolution for use edges: the `add_use_edge` operation of §4.3, including the "rekind"
//! fallback and the various silent-drop cases.
//!
//! Locals suppression (§4.3 "Locals tracking") is *not* handled here — it is the use walker's
//! job to not call [`add_use_edge`] at all for a name that shadows a local, since that isn't a
//! property of the name/kind pair being looked up but of the walker's current scope.

use crate::builder::BuildLog;
use crate::error::BuildError;
use crate::graph::EdgeLabel;
use crate::graph::GraphStore;
use crate::graph::Node;
use crate::graph::NodeKind;
use crate::hooks::UseContext;
use crate::hooks::UseHook;
use crate::symbols::SymbolTable;
use crate::arena::Handle;

/// Vendor-specific tagging macros that look like identifier references but never denote a real
/// definition (§4.3 step 2).
const FALSE_POSITIVE_TOKENS: [&str; 2] = ["USED", "SET"];

/// The marker a file's path can carry to indicate it is an external stub, whose unresolved
/// references should never be logged (§4.3 step 6, §7).
const EXTERNAL_MARKER: &str = "EXTERNAL";

/// Tries an adjacent kind when an exact `(name, kind)` lookup fails (§4.3 step 5). Further
/// rekind rules (constant<->macro, tag<->typedef) are reserved extension points per §9 open
/// question iii and are intentionally not implemented.
fn rekind(kind: NodeKind) -> Option<NodeKind> {
    match kind {
        NodeKind::Function => Some(NodeKind::Prototype),
        NodeKind::Global => Some(NodeKind::GlobalExtern),
        _ => None,
    }
}

/// Emits a `Use` edge from `current` to the node named `target_name` of kind `kind`, following
/// the resolution algorithm of §4.3. Returns `Err` only for the fatal "missing source endpoint"
/// case (§7); every other miss is handled by dropping the edge, optionally with a log line.
pub fn add_use_edge(
    graph: &mut GraphStore,
    symbols: &mut SymbolTable,
    hook: &mut dyn UseHook,
    log: &mut BuildLog,
    current: Handle<Node>,
    current_file_path: &str,
    target_name: &str,
    kind: NodeKind,
    in_assign: bool,
) -> Result<(), BuildError> {
    // Step 3: the current node must already be in the graph. Every `current` we hand to the
    // walker comes from a handle the graph itself produced, so the only way this can fail is if
    // it was pruned by `remove_empty` — which only ever prunes sinks, never a walker's `current`.
    // We still check explicitly because §7 calls this out as a distinct, fatal failure mode.
    if graph.is_removed(current) {
        return Err(BuildError::MissingSourceEndpoint {
            file: current_file_path.to_string(),
        });
    }

    // Step 1 (current half): a dupe-marked definition never accumulates further edges.
    if symbols.is_dupe(current) {
        log.dropped_dupe_edge(&graph.node(current).name, target_name);
        return Ok(());
    }

    // Step 2: known false-positive tokens are dropped with no diagnostic at all.
    if FALSE_POSITIVE_TOKENS.contains(&target_name) {
        return Ok(());
    }

    // Step 4: exact (name, kind) match.
    if let Some(target) = graph.get_node(target_name, kind) {
        return emit_or_drop_for_dupe(graph, symbols, hook, log, current, target, in_assign);
    }

    // Step 5: rekind to an adjacent kind and retry.
    if let Some(rekind_kind) = rekind(kind) {
        if let Some(target) = graph.get_node(target_name, rekind_kind) {
            return emit_or_drop_for_dupe(graph, symbols, hook, log, current, target, in_assign);
        }
    }

    // Step 6: stub files never get a "not found" diagnostic.
    if current_file_path.contains(EXTERNAL_MARKER) {
        return Ok(());
    }

    // Step 7.
    log.lookup_failure(target_name, kind);
    Ok(())
}

/// Step 1 (target half) plus step 4/5's actual emission: if the resolved node is itself a dupe,
/// drop silently (the dupe's own definition already logged the collision); otherwise add the
/// edge and fire the hook.
fn emit_or_drop_for_dupe(
    graph: &mut GraphStore,
    symbols: &mut SymbolTable,
    hook: &mut dyn UseHook,
    log: &mut BuildLog,
    current: Handle<Node>,
    target: Handle<Node>,
    in_assign: bool,
) -> Result<(), BuildError> {
    if symbols.is_dupe(target) {
        log.dropped_dupe_edge(&graph.node(current).name, &graph.node(target).name);
        return Ok(());
    }
    graph.add_edge(current, target, EdgeLabel::Use);
    hook.on_use_edge(UseContext::NoContext, in_assign, current, target, graph);
    Ok(())
}
