// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! The side tables Pass 1 populates and Pass 2 reads back: per-file rename maps, the global
//! typedef table, the struct/union field-name table, and the dupe registry (§4.2).

use std::collections::HashMap;

use crate::arena::Handle;
use crate::arena::HandleSet;
use crate::arena::SupplementalArena;
use crate::ast::TypeRef;
use crate::graph::Node;

/// The outcome of trying to bind a typedef name (§4.2, §4.4): the first binding for a name
/// always wins; a later, structurally different binding is a conflict that keeps the old value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedefBind {
    /// This is the first time this name has been bound.
    FirstBinding,
    /// The name was already bound to a structurally identical type; harmless.
    SameBinding,
    /// The name was already bound to a different type; the old binding is kept.
    Conflict,
}

/// Per-file and global symbol tables (§4.2).
#[derive(Default)]
pub struct SymbolTable {
    /// Original source name -> renamed graph node, one map per file.
    rename: SupplementalArena<Node, HashMap<String, Handle<Node>>>,
    /// typedef name -> bound type, plus the node created for its first binding.
    typedefs: HashMap<String, (TypeRef, Handle<Node>)>,
    /// `S__foo` / `U__foo` -> ordered field names, for future field-access resolution (§9 open
    /// question i; not yet consumed by the use walker, but populated so that extension is
    /// additive rather than requiring a second traversal).
    fields: HashMap<String, Vec<String>>,
    dupes: HandleSet<Node>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Records that `original_name` in `file` was renamed to the given node (§4.2). Pass 1 calls
    /// this when it renames a definition; Pass 2 calls [`SymbolTable::rename_lookup`] with the
    /// same `(file, original_name)` pair to resolve intra-file references to it.
    pub fn record_rename(&mut self, file: Handle<Node>, original_name: &str, renamed: Handle<Node>) {
        self.rename
            .get_mut_or_default(file)
            .insert(original_name.to_string(), renamed);
    }

    pub fn rename_lookup(&self, file: Handle<Node>, original_name: &str) -> Option<Handle<Node>> {
        self.rename.get(file).and_then(|m| m.get(original_name)).copied()
    }

    /// Binds a typedef name to its target type, creating the `T__name` node on the first
    /// binding. Returns which of the three outcomes in [`TypedefBind`] occurred, and the handle
    /// of the node that should be used to represent this typedef going forward (always the
    /// first-bound node).
    pub fn bind_typedef(
        &mut self,
        name: &str,
        target: TypeRef,
        make_node: impl FnOnce() -> Handle<Node>,
    ) -> (TypedefBind, Handle<Node>) {
        if let Some((existing_target, existing_node)) = self.typedefs.get(name) {
            return if *existing_target == target {
                (TypedefBind::SameBinding, *existing_node)
            } else {
                (TypedefBind::Conflict, *existing_node)
            };
        }
        let node = make_node();
        self.typedefs.insert(name.to_string(), (target, node));
        (TypedefBind::FirstBinding, node)
    }

    pub fn typedef_target(&self, name: &str) -> Option<&TypeRef> {
        self.typedefs.get(name).map(|(ty, _)| ty)
    }

    pub fn typedef_node(&self, name: &str) -> Option<Handle<Node>> {
        self.typedefs.get(name).map(|(_, node)| *node)
    }

    pub fn record_fields(&mut self, tag_name: &str, field_names: Vec<String>) {
        self.fields.insert(tag_name.to_string(), field_names);
    }

    pub fn fields_of(&self, tag_name: &str) -> Option<&[String]> {
        self.fields.get(tag_name).map(|v| v.as_slice())
    }

    /// Marks a node as a duplicate. Returns `true` if it was not already marked.
    pub fn mark_dupe(&mut self, node: Handle<Node>) -> bool {
        self.dupes.insert(node)
    }

    pub fn is_dupe(&self, node: Handle<Node>) -> bool {
        self.dupes.contains(node)
    }
}
