// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! The shape of a parsed C translation unit, as the builder expects to receive it from an
//! external parser.
//!
//! The parser itself is out of scope for this crate (see the module-level docs in [`crate`]):
//! this module only fixes the contract at that boundary. It is deliberately shallow — a sum type
//! per syntactic category, walked by mutually recursive `walk_*` functions in [`crate::defs`] and
//! [`crate::uses`] — covering exactly the constructs named by the definition and use walkers and
//! nothing more. There is no preprocessor expansion, no full C grammar (e.g. no distinction
//! between the many declarator forms a real parser would produce), and no attempt to model
//! semantic validity; a well-formed `TranslationUnit` is whatever the external parser decides to
//! hand over.

use lsp_positions::Span;

/// Where a translation unit came from, and whether it is a header or a source file (§6 "File
/// kind detection").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Header,
    Source,
}

impl FileKind {
    /// `.h` is a header; everything else, including unrecognized extensions, falls back to
    /// `Source` per §6.
    pub fn of(path: &std::path::Path) -> FileKind {
        match path.extension().and_then(|e| e.to_str()) {
            Some("h") => FileKind::Header,
            _ => FileKind::Source,
        }
    }
}

/// A storage class as it appears on a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Default,
    Static,
    Extern,
}

/// A single parsed translation unit, handed to the builder for both passes.
#[derive(Debug, Clone, Default)]
pub struct TranslationUnit {
    pub toplevels: Vec<TopLevel>,
}

/// A named identifier occurrence, paired with its source position — the `name -> (string,
/// source_position)` half of §6's `Ast.str_of_name` collaborator contract.
#[derive(Debug, Clone)]
pub struct Name {
    pub text: String,
    pub span: Span,
}

impl Name {
    pub fn new(text: impl Into<String>, span: Span) -> Name {
        Name {
            text: text.into(),
            span,
        }
    }
}

// Two names are the same identifier for structural-equality purposes (typedef conflict
// detection, §4.2) regardless of where each occurrence sits in its source file.
impl PartialEq for Name {
    fn eq(&self, other: &Name) -> bool {
        self.text == other.text
    }
}
impl Eq for Name {}

/// A reference to a C type, as it appears in a declaration, cast, or parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A builtin type (`int`, `char *`, ...) with no named tag to depend on.
    Builtin(String),
    /// `struct foo`
    Struct(Name),
    /// `union foo`
    Union(Name),
    /// `enum foo`
    Enum(Name),
    /// A typedef name used as a type.
    Typedef(Name),
    /// `T *`
    Pointer(Box<TypeRef>),
    /// An array of the given element type.
    Array(Box<TypeRef>),
}

/// One field of a struct or union.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// `None` for an anonymous field (e.g. an anonymous nested struct/union); see §4.4 "An
    /// unnamed field means the engine only descends into its type".
    pub name: Option<Name>,
    pub ty: TypeRef,
}

/// One parameter of a function definition or prototype; also used to seed the locals list for
/// §4.3/§4.5.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: Name,
    pub ty: TypeRef,
}

/// A single enumerator inside an `enum` definition.
#[derive(Debug, Clone)]
pub struct Enumerator {
    pub name: Name,
}

/// A top-level form inside a translation unit.
#[derive(Debug, Clone)]
pub enum TopLevel {
    /// `#define NAME value` — an object-like macro with no parameters.
    ConstantDefine { name: Name, value: Expr },
    /// `#define NAME(params) body` — a function-like macro.
    MacroDefine {
        name: Name,
        params: Vec<Name>,
        body: Expr,
    },
    FunctionDef {
        name: Name,
        storage: Storage,
        return_type: TypeRef,
        params: Vec<Param>,
        body: Block,
    },
    FunctionProto {
        name: Name,
        storage: Storage,
        return_type: TypeRef,
        params: Vec<Param>,
    },
    GlobalVar {
        name: Name,
        storage: Storage,
        ty: TypeRef,
        initializer: Option<Expr>,
    },
    StructDef {
        name: Name,
        fields: Vec<FieldDecl>,
    },
    UnionDef {
        name: Name,
        fields: Vec<FieldDecl>,
    },
    EnumDef {
        name: Name,
        enumerators: Vec<Enumerator>,
    },
    Typedef {
        name: Name,
        target: TypeRef,
    },
    /// `#include ...` — carried through only so a caller can see it went by; it creates no node
    /// and no edge (§4.4).
    Include { path: String },
}

/// A statement. Statements never emit use edges themselves; they exist only to reach the
/// expressions (and nested declarations) they contain (§4.5).
#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    /// A block-scoped local variable declaration.
    VarDecl {
        name: Name,
        storage: Storage,
        ty: TypeRef,
        initializer: Option<Expr>,
    },
    Block(Block),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
}

#[derive(Debug, Clone, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

/// An expression. The walker classifies bare identifiers and call targets according to §4.5's
/// heuristics rather than carrying that classification here, since a real parser wouldn't know
/// it either.
#[derive(Debug, Clone)]
pub enum Expr {
    Ident(Name),
    IntLiteral(i64),
    StringLiteral(String),
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `e.f` (`via_pointer = false`) or `e->f` (`via_pointer = true`).
    Member {
        target: Box<Expr>,
        field: Name,
        via_pointer: bool,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary(Box<Expr>),
    Cast {
        ty: TypeRef,
        value: Box<Expr>,
    },
    /// A use of a type outside of a cast, e.g. `sizeof(T)`.
    SizeofType(TypeRef),
}

/// The `NodeKind` a global variable declaration becomes, per §4.4's storage/file-kind/initializer
/// table. Pure (no logging, no dupe policy) so both the definition walker and the use walker can
/// agree on which node a `GlobalVar` resolves to without duplicating the decision.
pub fn global_node_kind(storage: Storage, file_kind: FileKind, has_initializer: bool) -> NodeKind {
    use crate::graph::NodeKind;
    match (storage, file_kind, has_initializer) {
        (Storage::Extern, _, _) => NodeKind::GlobalExtern,
        (Storage::Default, FileKind::Header, true) => NodeKind::Global,
        (Storage::Default, FileKind::Header, false) => NodeKind::GlobalExtern,
        (Storage::Static, _, _) => NodeKind::Global,
        (Storage::Default, FileKind::Source, _) => NodeKind::Global,
    }
}

/// The name of the `Type` node a type reference depends on, unwrapping pointers and arrays down
/// to their named base. `None` for builtins, which have nothing to depend on.
pub fn type_ref_tag_name(ty: &TypeRef) -> Option<String> {
    match ty {
        TypeRef::Builtin(_) => None,
        TypeRef::Struct(name) => Some(format!("S__{}", name.text)),
        TypeRef::Union(name) => Some(format!("U__{}", name.text)),
        TypeRef::Enum(name) => Some(format!("E__{}", name.text)),
        TypeRef::Typedef(name) => Some(format!("T__{}", name.text)),
        TypeRef::Pointer(inner) | TypeRef::Array(inner) => type_ref_tag_name(inner),
    }
}

/// Renders a type as a short, human-readable signature string, standing in for the external
/// `Meta_ast.serialize` collaborator named in §6 — this crate both produces and consumes its own
/// ASTs in tests, so it serializes its own types rather than delegating to a real parser binding.
pub fn describe_type(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Builtin(name) => name.clone(),
        TypeRef::Struct(name) => format!("struct {}", name.text),
        TypeRef::Union(name) => format!("union {}", name.text),
        TypeRef::Enum(name) => format!("enum {}", name.text),
        TypeRef::Typedef(name) => name.text.clone(),
        TypeRef::Pointer(inner) => format!("{}*", describe_type(inner)),
        TypeRef::Array(inner) => format!("{}[]", describe_type(inner)),
    }
}
