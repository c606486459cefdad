// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! Pass 1: the definition walker (§4.4). Creates one node per top-level form, wires it to its
//! containing node with a `Has` edge, and populates the symbol tables Pass 2 will read. This pass
//! never looks inside a function body, macro body, or initializer — those are Pass 2's job
//! (§4.5) — it only descends into the immediate children of a struct/union/enum definition.

use lsp_positions::Span;

use crate::arena::Handle;
use crate::ast::describe_type;
use crate::ast::FileKind;
use crate::ast::FieldDecl;
use crate::ast::Name;
use crate::ast::Storage;
use crate::ast::TopLevel;
use crate::ast::TranslationUnit;
use crate::ast::TypeRef;
use crate::builder::BuildLog;
use crate::copious_debugging;
use crate::env::Phase;
use crate::env::WalkEnv;
use crate::graph::EdgeLabel;
use crate::graph::GraphStore;
use crate::graph::Node;
use crate::graph::NodeInfo;
use crate::graph::NodeKind;
use crate::graph::SourcePos;
use crate::symbols::SymbolTable;
use crate::symbols::TypedefBind;

/// How a duplicate at the chosen `(name, kind)` should be handled (§4.4 "Duplicate handling").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DupPolicy {
    /// Log a `DUPE entity` line and mark the node dupe (Function, Global, Constructor, Type,
    /// Field).
    LogAndMark,
    /// Mark dupe with no diagnostic: expected and common (Prototype, GlobalExtern).
    SilentMark,
}

pub fn run_pass1(
    graph: &mut GraphStore,
    symbols: &mut SymbolTable,
    log: &mut BuildLog,
    file: Handle<Node>,
    file_path: &str,
    file_kind: FileKind,
    unit: &TranslationUnit,
) {
    let env = WalkEnv::for_file(Phase::Defs, file, file_path.to_string(), file_kind);
    for top in &unit.toplevels {
        walk_toplevel(graph, symbols, log, &env, top);
    }
}

fn walk_toplevel(
    graph: &mut GraphStore,
    symbols: &mut SymbolTable,
    log: &mut BuildLog,
    env: &WalkEnv,
    top: &TopLevel,
) {
    match top {
        TopLevel::Include { .. } => {
            // No node, no edge (§4.4).
        }
        TopLevel::ConstantDefine { name, .. } => {
            define_simple(graph, symbols, log, env, name, NodeKind::Constant, DupPolicy::LogAndMark, None);
        }
        TopLevel::MacroDefine { name, params, .. } => {
            let sig = format!("macro({})", params.len());
            define_simple(graph, symbols, log, env, name, NodeKind::Macro, DupPolicy::LogAndMark, Some(sig));
        }
        TopLevel::FunctionDef {
            name,
            storage,
            return_type,
            params,
            ..
        } => {
            let renamed = should_rename_function(env.file_kind, *storage, &name.text);
            let sig = describe_type(return_type) + "(" + &params.len().to_string() + " params)";
            define_renameable(
                graph,
                symbols,
                log,
                env,
                name,
                NodeKind::Function,
                DupPolicy::LogAndMark,
                renamed,
                Some(sig),
            );
        }
        TopLevel::FunctionProto {
            name,
            storage,
            return_type,
            params,
        } => {
            if *storage == Storage::Static && env.file_kind == FileKind::Source {
                // The definition's rename will not agree with an un-renamed prototype name, so
                // emitting the prototype would create a phantom node (§4.4).
                copious_debugging!("skipping static prototype {}", name.text);
                return;
            }
            let sig = describe_type(return_type) + "(" + &params.len().to_string() + " params)";
            define_simple(
                graph,
                symbols,
                log,
                env,
                name,
                NodeKind::Prototype,
                DupPolicy::SilentMark,
                Some(sig),
            );
        }
        TopLevel::GlobalVar {
            name,
            storage,
            ty,
            initializer,
        } => {
            let (kind, policy) = global_kind(env.file_kind, *storage, initializer.is_some(), log, name);
            let renamed = *storage == Storage::Static && env.file_kind == FileKind::Source;
            define_renameable(graph, symbols, log, env, name, kind, policy, renamed, Some(describe_type(ty)));
        }
        TopLevel::StructDef { name, fields } => {
            define_struct_or_union(graph, symbols, log, env, name, fields, "S__");
        }
        TopLevel::UnionDef { name, fields } => {
            define_struct_or_union(graph, symbols, log, env, name, fields, "U__");
        }
        TopLevel::EnumDef { name, enumerators } => {
            let tag_name = format!("E__{}", name.text);
            let existed = graph.has_node(&tag_name, NodeKind::Type);
            let type_handle = graph.add_node(tag_name.clone(), NodeKind::Type);
            if existed {
                dispatch_duplicate(graph, symbols, log, env, NodeKind::Type, type_handle, DupPolicy::LogAndMark);
            } else {
                graph.add_edge(env.current, type_handle, EdgeLabel::Has);
                attach(graph, type_handle, env, &name.span, None);
            }
            let parent_is_dupe = symbols.is_dupe(type_handle);
            for enumerator in enumerators {
                let renamed = env.file_kind == FileKind::Source;
                let final_name = if renamed {
                    let g = graph.gensym(&enumerator.name.text);
                    g
                } else {
                    enumerator.name.text.clone()
                };
                let child_existed = graph.has_node(&final_name, NodeKind::Constructor);
                let child = graph.add_node(final_name.clone(), NodeKind::Constructor);
                if renamed {
                    symbols.record_rename(env.file, &enumerator.name.text, child);
                }
                if parent_is_dupe {
                    symbols.mark_dupe(child);
                    if !child_existed {
                        graph.add_edge(type_handle, child, EdgeLabel::Has);
                        attach(graph, child, env, &enumerator.name.span, None);
                    }
                } else if child_existed {
                    dispatch_duplicate(graph, symbols, log, env, NodeKind::Constructor, child, DupPolicy::LogAndMark);
                } else {
                    graph.add_edge(type_handle, child, EdgeLabel::Has);
                    attach(graph, child, env, &enumerator.name.span, None);
                }
            }
        }
        TopLevel::Typedef { name, target } => {
            let tag_name = format!("T__{}", name.text);
            let target = target.clone();
            let (outcome, node) = {
                let tag_name = tag_name.clone();
                symbols.bind_typedef(&name.text, target, || graph.add_node(tag_name, NodeKind::Type))
            };
            match outcome {
                TypedefBind::FirstBinding => {
                    graph.add_edge(env.current, node, EdgeLabel::Has);
                    attach(graph, node, env, &name.span, None);
                }
                TypedefBind::SameBinding => {
                    // Silent (§4.4): harmless re-declaration, no new node or edge.
                }
                TypedefBind::Conflict => {
                    log.typedef_conflict(&name.text);
                }
            }
        }
    }
}

fn should_rename_function(file_kind: FileKind, storage: Storage, name: &str) -> bool {
    file_kind == FileKind::Source && (storage == Storage::Static || name == "main")
}

fn global_kind(
    file_kind: FileKind,
    storage: Storage,
    has_initializer: bool,
    log: &mut BuildLog,
    name: &Name,
) -> (NodeKind, DupPolicy) {
    let kind = crate::ast::global_node_kind(storage, file_kind, has_initializer);
    if storage == Storage::Default && file_kind == FileKind::Header && has_initializer {
        log.global_definition_in_header(&name.text);
    }
    let policy = match kind {
        NodeKind::GlobalExtern => DupPolicy::SilentMark,
        _ => DupPolicy::LogAndMark,
    };
    (kind, policy)
}

fn define_struct_or_union(
    graph: &mut GraphStore,
    symbols: &mut SymbolTable,
    log: &mut BuildLog,
    env: &WalkEnv,
    name: &Name,
    fields: &[FieldDecl],
    prefix: &str,
) {
    let tag_name = format!("{}{}", prefix, name.text);
    let existed = graph.has_node(&tag_name, NodeKind::Type);
    let type_handle = graph.add_node(tag_name.clone(), NodeKind::Type);
    if existed {
        dispatch_duplicate(graph, symbols, log, env, NodeKind::Type, type_handle, DupPolicy::LogAndMark);
    } else {
        graph.add_edge(env.current, type_handle, EdgeLabel::Has);
        attach(graph, type_handle, env, &name.span, None);
    }
    let parent_is_dupe = symbols.is_dupe(type_handle);

    let mut field_names = Vec::new();
    for field in fields {
        let field_name = match &field.name {
            // Anonymous fields: only their type would be descended into, and this AST has no
            // inline nested struct/union bodies to descend into, so there is nothing further to
            // create (§4.4, §9 open question ii).
            None => continue,
            Some(n) => n,
        };
        field_names.push(field_name.text.clone());
        let full_name = format!("{}.{}", tag_name, field_name.text);
        let child_existed = graph.has_node(&full_name, NodeKind::Field);
        let child = graph.add_node(full_name, NodeKind::Field);
        let sig = describe_type(&field.ty);
        if parent_is_dupe {
            symbols.mark_dupe(child);
            if !child_existed {
                graph.add_edge(type_handle, child, EdgeLabel::Has);
                attach(graph, child, env, &field_name.span, Some(sig));
            }
        } else if child_existed {
            dispatch_duplicate(graph, symbols, log, env, NodeKind::Field, child, DupPolicy::LogAndMark);
        } else {
            graph.add_edge(type_handle, child, EdgeLabel::Has);
            attach(graph, child, env, &field_name.span, Some(sig));
        }
    }
    symbols.record_fields(&tag_name, field_names);
}

/// Defines a node that is never subject to static-scope renaming (constants, macros,
/// prototypes).
#[allow(clippy::too_many_arguments)]
fn define_simple(
    graph: &mut GraphStore,
    symbols: &mut SymbolTable,
    log: &mut BuildLog,
    env: &WalkEnv,
    name: &Name,
    kind: NodeKind,
    policy: DupPolicy,
    type_signature: Option<String>,
) {
    define_renameable(graph, symbols, log, env, name, kind, policy, false, type_signature);
}

/// Defines a node that may be subject to static-scope renaming (functions, globals, enum
/// constructors handled separately above since they are children rather than toplevels).
#[allow(clippy::too_many_arguments)]
fn define_renameable(
    graph: &mut GraphStore,
    symbols: &mut SymbolTable,
    log: &mut BuildLog,
    env: &WalkEnv,
    name: &Name,
    kind: NodeKind,
    policy: DupPolicy,
    rename: bool,
    type_signature: Option<String>,
) {
    let final_name = if rename {
        graph.gensym(&name.text)
    } else {
        name.text.clone()
    };
    let existed = graph.has_node(&final_name, kind);
    let handle = graph.add_node(final_name, kind);
    if rename {
        symbols.record_rename(env.file, &name.text, handle);
    }
    if existed {
        dispatch_duplicate(graph, symbols, log, env, kind, handle, policy);
        return;
    }
    graph.add_edge(env.current, handle, EdgeLabel::Has);
    attach(graph, handle, env, &name.span, type_signature);
    if rename {
        graph.info_mut(handle).flags.renamed = true;
    }
}

fn attach(graph: &mut GraphStore, handle: Handle<Node>, env: &WalkEnv, span: &Span, type_signature: Option<String>) {
    graph.attach_info(
        handle,
        NodeInfo {
            pos: Some(SourcePos {
                file: env.file,
                span: span.clone(),
            }),
            type_signature,
            flags: Default::default(),
        },
    );
}

fn dispatch_duplicate(
    graph: &GraphStore,
    symbols: &mut SymbolTable,
    log: &mut BuildLog,
    env: &WalkEnv,
    kind: NodeKind,
    existing: Handle<Node>,
    policy: DupPolicy,
) {
    symbols.mark_dupe(existing);
    if env.file_path.contains("EXTERNAL") {
        return;
    }
    if policy == DupPolicy::LogAndMark {
        let original_path = graph
            .info(existing)
            .and_then(|i| i.pos.clone())
            .map(|p| graph.node(p.file).name.clone())
            .unwrap_or_else(|| "<unknown>".to_string());
        log.dupe_entity(&graph.node(existing).name, kind, &original_path, &env.file_path);
    }
}
