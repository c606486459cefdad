// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! The code graph itself: nodes, containment and use edges, and the bookkeeping the two passes
//! share (§3, §4.1).
//!
//! Nodes live in an [`Arena`]; node identity for lookup purposes is the pair `(name, kind)`,
//! indexed in `node_index` so that [`GraphStore::add_node`] can be idempotent (§4.1: "second add
//! on an existing node is a no-op at the store level"). Containment (`Has`) and use (`Use`) edges
//! are each kept as small adjacency lists hung off the node via [`SupplementalArena`], the same
//! pattern the teacher uses for `StackGraph::outgoing_edges`.

use std::fmt;
use std::path::Path;

use fxhash::FxHashMap;
use lsp_positions::Span;
use smallvec::SmallVec;

use crate::arena::Arena;
use crate::arena::Handle;
use crate::arena::SupplementalArena;

/// The kind of a graph node (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Dir,
    File,
    Function,
    Prototype,
    Global,
    GlobalExtern,
    Type,
    Field,
    Constructor,
    Constant,
    Macro,
    /// Synthetic sink for an unresolved reference.
    NotFound,
    /// Synthetic sink for a name that collided across translation units.
    Dupe,
    /// Synthetic sink for a parse problem.
    Pb,
}

impl NodeKind {
    /// The three synthetic sink kinds removed by `remove_empty` once the build completes (§4.6).
    pub const SINKS: [NodeKind; 3] = [NodeKind::NotFound, NodeKind::Dupe, NodeKind::Pb];

    pub fn is_sink(self) -> bool {
        matches!(self, NodeKind::NotFound | NodeKind::Dupe | NodeKind::Pb)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The direction of an edge (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeLabel {
    /// Containment: parent -> child.
    Has,
    /// Reference: referrer -> referent.
    Use,
}

/// A node in the code graph: a name paired with its kind.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.kind)
    }
}

/// A source position anchored to the file node it belongs to, used for invariant checking
/// (every definition's `pos.file` must equal the file it was found in, §3 invariant 4).
#[derive(Debug, Clone)]
pub struct SourcePos {
    pub file: Handle<Node>,
    pub span: Span,
}

/// Property flags attached to a node, alongside its [`SourcePos`] and serialized type (§3 "Node
/// info").
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeFlags {
    /// Set when this node's source name was rewritten via `gensym` (§4.2).
    pub renamed: bool,
}

/// Everything attached to a real node besides its name and kind.
#[derive(Debug, Clone, Default)]
pub struct NodeInfo {
    pub pos: Option<SourcePos>,
    /// The node's type, serialized by the caller (§6 `Meta_ast.serialize`); this crate treats it
    /// as an opaque string.
    pub type_signature: Option<String>,
    pub flags: NodeFlags,
}

#[derive(Default)]
struct EdgeSets {
    has_children: SupplementalArena<Node, SmallVec<[Handle<Node>; 4]>>,
    has_parent: SupplementalArena<Node, Handle<Node>>,
    use_out: SupplementalArena<Node, SmallVec<[Handle<Node>; 4]>>,
    use_in: SupplementalArena<Node, SmallVec<[Handle<Node>; 4]>>,
}

/// The graph store: owns every node and edge created during a build (§4.1).
pub struct GraphStore {
    nodes: Arena<Node>,
    node_index: FxHashMap<(String, NodeKind), Handle<Node>>,
    node_info: SupplementalArena<Node, NodeInfo>,
    edges: EdgeSets,
    removed: std::collections::HashSet<Handle<Node>>,
    root: Handle<Node>,
    sinks: FxHashMap<NodeKind, Handle<Node>>,
    gensym_counter: u32,
}

impl GraphStore {
    pub fn new() -> GraphStore {
        let mut nodes = Arena::new();
        let root = nodes.add(Node {
            name: "<root>".to_string(),
            kind: NodeKind::Root,
        });
        let mut node_index = FxHashMap::default();
        node_index.insert(("<root>".to_string(), NodeKind::Root), root);
        GraphStore {
            nodes,
            node_index,
            node_info: SupplementalArena::new(),
            edges: EdgeSets::default(),
            removed: std::collections::HashSet::new(),
            root,
            sinks: FxHashMap::default(),
            gensym_counter: 0,
        }
    }

    pub fn root(&self) -> Handle<Node> {
        self.root
    }

    pub fn node(&self, handle: Handle<Node>) -> &Node {
        self.nodes.get(handle)
    }

    pub fn has_node(&self, name: &str, kind: NodeKind) -> bool {
        self.node_index.contains_key(&(name.to_string(), kind))
    }

    pub fn get_node(&self, name: &str, kind: NodeKind) -> Option<Handle<Node>> {
        self.node_index.get(&(name.to_string(), kind)).copied()
    }

    /// Idempotent: a second `add_node` for the same `(name, kind)` returns the existing handle
    /// rather than creating a new node (§4.1). Callers that need to detect the duplicate (the
    /// definition walker, §4.4) must call [`GraphStore::has_node`] first.
    pub fn add_node(&mut self, name: impl Into<String>, kind: NodeKind) -> Handle<Node> {
        let name = name.into();
        if let Some(existing) = self.node_index.get(&(name.clone(), kind)) {
            return *existing;
        }
        let handle = self.nodes.add(Node {
            name: name.clone(),
            kind,
        });
        self.node_index.insert((name, kind), handle);
        handle
    }

    /// Returns the singleton sink node of the given kind, creating it on first use.
    pub fn sink(&mut self, kind: NodeKind) -> Handle<Node> {
        debug_assert!(kind.is_sink());
        if let Some(handle) = self.sinks.get(&kind) {
            return *handle;
        }
        let name = match kind {
            NodeKind::NotFound => "<not-found>",
            NodeKind::Dupe => "<dupe>",
            NodeKind::Pb => "<pb>",
            _ => unreachable!("sink() called with non-sink kind"),
        };
        let handle = self.add_node(name, kind);
        self.sinks.insert(kind, handle);
        handle
    }

    pub fn attach_info(&mut self, node: Handle<Node>, info: NodeInfo) {
        self.node_info.set(node, info);
    }

    pub fn info(&self, node: Handle<Node>) -> Option<&NodeInfo> {
        self.node_info.get(node)
    }

    pub fn info_mut(&mut self, node: Handle<Node>) -> &mut NodeInfo {
        self.node_info.get_mut_or_default(node)
    }

    /// Adds an edge between two nodes already present in the graph (§4.1). `Has` edges also
    /// record the reverse "parent of" link used to enforce "exactly one `Has` parent" (§3
    /// invariant 1); the second `add_edge(_, child, Has)` call for an already-parented child is a
    /// logic error in the walker and will panic in debug builds.
    pub fn add_edge(&mut self, src: Handle<Node>, dst: Handle<Node>, label: EdgeLabel) {
        match label {
            EdgeLabel::Has => {
                debug_assert!(
                    self.edges.has_parent.get(dst).is_none(),
                    "node already has a Has-parent"
                );
                self.edges.has_parent.set(dst, src);
                self.edges.has_children.get_mut_or_default(src).push(dst);
            }
            EdgeLabel::Use => {
                let out = self.edges.use_out.get_mut_or_default(src);
                if !out.contains(&dst) {
                    out.push(dst);
                }
                let in_ = self.edges.use_in.get_mut_or_default(dst);
                if !in_.contains(&src) {
                    in_.push(src);
                }
            }
        }
    }

    pub fn has_parent(&self, node: Handle<Node>) -> Option<Handle<Node>> {
        self.edges.has_parent.get(node).copied()
    }

    pub fn children(&self, node: Handle<Node>) -> impl Iterator<Item = Handle<Node>> + '_ {
        self.edges
            .has_children
            .get(node)
            .into_iter()
            .flat_map(|v| v.iter().copied())
    }

    pub fn outgoing_uses(&self, node: Handle<Node>) -> impl Iterator<Item = Handle<Node>> + '_ {
        self.edges.use_out.get(node).into_iter().flat_map(|v| v.iter().copied())
    }

    /// Enumerates the effective callers/users of `node` (§4.1, used by the adjuster).
    pub fn predecessors(&self, node: Handle<Node>, label: EdgeLabel) -> Vec<Handle<Node>> {
        match label {
            EdgeLabel::Has => self.has_parent(node).into_iter().collect(),
            EdgeLabel::Use => self
                .edges
                .use_in
                .get(node)
                .map(|v| v.to_vec())
                .unwrap_or_default(),
        }
    }

    fn edge_count(&self, node: Handle<Node>) -> usize {
        let has_out = self.edges.has_children.get(node).map(|v| v.len()).unwrap_or(0);
        let has_in = self.has_parent(node).is_some() as usize;
        let use_out = self.edges.use_out.get(node).map(|v| v.len()).unwrap_or(0);
        let use_in = self.edges.use_in.get(node).map(|v| v.len()).unwrap_or(0);
        has_out + has_in + use_out + use_in
    }

    /// Deletes a listed sink node if and only if it has zero incident edges of any label (§4.1,
    /// §4.6). Idempotent: calling this again after nodes are already removed is a no-op.
    pub fn remove_empty(&mut self, kinds: &[NodeKind]) {
        for kind in kinds {
            if let Some(handle) = self.sinks.get(kind).copied() {
                if self.edge_count(handle) == 0 {
                    self.removed.insert(handle);
                    self.sinks.remove(kind);
                    self.node_index.remove(&(self.nodes.get(handle).name.clone(), *kind));
                }
            }
        }
    }

    pub fn is_removed(&self, node: Handle<Node>) -> bool {
        self.removed.contains(&node)
    }

    /// Iterates every node still present in the graph (i.e. not pruned by `remove_empty`).
    pub fn iter_nodes(&self) -> impl Iterator<Item = Handle<Node>> + '_ {
        self.nodes.iter_handles().filter(move |h| !self.is_removed(*h))
    }

    /// Generates a process-unique (per-`GraphStore`) suffix for a name (§4.1, §4.2, §5 "Gensym
    /// counter must be reset between independent builds" — resetting is just constructing a new
    /// `GraphStore`).
    pub fn gensym(&mut self, s: &str) -> String {
        self.gensym_counter += 1;
        format!("{}__{}", s, self.gensym_counter)
    }

    /// For a repository-relative path `a/b/c/f`, ensures `Dir` nodes exist for `a`, `a/b`, and
    /// `a/b/c`, each `Has`-parented by the previous one (or by the root for `a`), and returns the
    /// handle of the innermost directory (§4.1).
    pub fn create_intermediate_dirs(&mut self, path: &str) -> Handle<Node> {
        let mut parent = self.root;
        let components: Vec<&str> = path.split('/').collect();
        if components.len() <= 1 {
            return parent;
        }
        let mut prefix = String::new();
        for component in &components[..components.len() - 1] {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(component);
            let existed = self.has_node(&prefix, NodeKind::Dir);
            let dir = self.add_node(prefix.clone(), NodeKind::Dir);
            if !existed {
                self.add_edge(parent, dir, EdgeLabel::Has);
            }
            parent = dir;
        }
        parent
    }

    /// Adds a `File` node for `path` (a repository-relative path, §3 invariant 4), creating any
    /// missing intermediate `Dir` nodes first.
    pub fn add_file(&mut self, path: &str) -> Handle<Node> {
        if let Some(existing) = self.get_node(path, NodeKind::File) {
            return existing;
        }
        let parent = self.create_intermediate_dirs(path);
        let file = self.add_node(path, NodeKind::File);
        self.add_edge(parent, file, EdgeLabel::Has);
        file
    }

    pub fn file_path(path: &Path, root: &Path) -> String {
        path.strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        GraphStore::new()
    }
}

