// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! Pass 2: the use walker (§4.5). Re-traverses every translation unit, this time descending into
//! function and macro bodies, to resolve each identifier and type reference it finds against the
//! tables Pass 1 built, emitting a `Use` edge for every one that resolves.
//!
//! Field access (`e.f`, `e->f`) only recurses into `e`; resolving which struct's `f` is meant
//! would need type inference this crate does not do (§9 open question i), so [`symbols::fields_of`]
//! is populated but not yet consulted here.

use crate::arena::Handle;
use crate::ast::global_node_kind;
use crate::ast::type_ref_tag_name;
use crate::ast::Block;
use crate::ast::Expr;
use crate::ast::FileKind;
use crate::ast::Name;
use crate::ast::Stmt;
use crate::ast::Storage;
use crate::ast::TopLevel;
use crate::ast::TranslationUnit;
use crate::ast::TypeRef;
use crate::builder::BuildLog;
use crate::config::Config;
use crate::env::Phase;
use crate::env::WalkEnv;
use crate::error::BuildError;
use crate::graph::GraphStore;
use crate::graph::Node;
use crate::graph::NodeKind;
use crate::hooks::UseHook;
use crate::resolver;
use crate::symbols::SymbolTable;

/// A bare name made entirely of uppercase letters, digits, and underscores (with at least one
/// uppercase letter) is treated as a macro or constant reference rather than a variable or
/// function reference (§4.5 "looks like macro").
fn looks_like_macro(name: &str) -> bool {
    let has_upper = name.chars().any(|c| c.is_ascii_uppercase());
    has_upper && name.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Follows a typedef chain down to its first non-typedef target when `typedefs_dependencies` is
/// off (§9 open question iv), so a use of a typedef'd name depends on the real underlying type
/// rather than on the typedef alias itself. Guards against a pathological chain with a depth
/// limit rather than a visited set, since typedef bindings are immutable once first-bound and a
/// genuine cycle cannot arise from well-formed input.
fn resolve_type_dependency(symbols: &SymbolTable, ty: &TypeRef, config: &Config) -> Option<String> {
    let mut current = ty.clone();
    for _ in 0..32 {
        match &current {
            TypeRef::Typedef(name) if !config.typedefs_dependencies => match symbols.typedef_target(&name.text) {
                Some(target) => current = target.clone(),
                None => return Some(format!("T__{}", name.text)),
            },
            TypeRef::Pointer(inner) | TypeRef::Array(inner) => current = inner.as_ref().clone(),
            _ => return type_ref_tag_name(&current),
        }
    }
    type_ref_tag_name(&current)
}

pub fn run_pass2(
    graph: &mut GraphStore,
    symbols: &mut SymbolTable,
    hook: &mut dyn UseHook,
    log: &mut BuildLog,
    config: &Config,
    file: Handle<Node>,
    file_path: &str,
    file_kind: FileKind,
    unit: &TranslationUnit,
) -> Result<(), BuildError> {
    let mut pass = Pass2 {
        graph,
        symbols,
        hook,
        log,
        config,
    };
    let env = WalkEnv::for_file(Phase::Uses, file, file_path.to_string(), file_kind);
    for top in &unit.toplevels {
        pass.walk_toplevel(&env, top)?;
    }
    Ok(())
}

struct Pass2<'a> {
    graph: &'a mut GraphStore,
    symbols: &'a mut SymbolTable,
    hook: &'a mut dyn UseHook,
    log: &'a mut BuildLog,
    config: &'a Config,
}

impl<'a> Pass2<'a> {
    fn use_edge(&mut self, env: &WalkEnv, target_name: &str, kind: NodeKind) -> Result<(), BuildError> {
        resolver::add_use_edge(
            self.graph,
            self.symbols,
            self.hook,
            self.log,
            env.current,
            &env.file_path,
            target_name,
            kind,
            env.in_assign,
        )
    }

    fn maybe_use_type(&mut self, env: &WalkEnv, ty: &TypeRef) -> Result<(), BuildError> {
        if !self.config.types_dependencies {
            return Ok(());
        }
        if let Some(tag) = resolve_type_dependency(self.symbols, ty, self.config) {
            self.use_edge(env, &tag, NodeKind::Type)?;
        }
        Ok(())
    }

    /// Looks up the node a toplevel's own name resolves to, following a per-file rename if one
    /// was recorded for it (§4.2).
    fn own_node(&self, env: &WalkEnv, name: &str, kind: NodeKind) -> Option<Handle<Node>> {
        self.symbols
            .rename_lookup(env.file, name)
            .or_else(|| self.graph.get_node(name, kind))
    }

    /// If `name` was renamed by Pass 1 within the current file (a file-local static or `main`,
    /// §4.2), returns the renamed node's actual graph name and kind so the caller can look it up
    /// directly instead of the pre-rename source text, which no longer names any node.
    fn resolve_own_file_rename(&self, env: &WalkEnv, name: &str) -> Option<(String, NodeKind)> {
        self.symbols
            .rename_lookup(env.file, name)
            .map(|handle| (self.graph.node(handle).name.clone(), self.graph.node(handle).kind))
    }

    fn pick_ident_kind(&self, name: &str) -> NodeKind {
        if self.graph.get_node(name, NodeKind::Global).is_some() || self.graph.get_node(name, NodeKind::GlobalExtern).is_some() {
            return NodeKind::Global;
        }
        if self.graph.get_node(name, NodeKind::Function).is_some() || self.graph.get_node(name, NodeKind::Prototype).is_some() {
            return NodeKind::Function;
        }
        if self.graph.get_node(name, NodeKind::Constructor).is_some() {
            return NodeKind::Constructor;
        }
        NodeKind::Global
    }

    fn walk_ident(&mut self, env: &WalkEnv, name: &Name) -> Result<(), BuildError> {
        if env.is_local(&name.text) {
            return Ok(());
        }
        if let Some((renamed_name, renamed_kind)) = self.resolve_own_file_rename(env, &name.text) {
            return self.use_edge(env, &renamed_name, renamed_kind);
        }
        let kind = if looks_like_macro(&name.text) {
            NodeKind::Constant
        } else {
            self.pick_ident_kind(&name.text)
        };
        self.use_edge(env, &name.text, kind)
    }

    fn walk_expr(&mut self, env: &WalkEnv, expr: &Expr) -> Result<(), BuildError> {
        match expr {
            Expr::Ident(name) => self.walk_ident(env, name)?,
            Expr::IntLiteral(_) | Expr::StringLiteral(_) => {}
            Expr::Call { callee, args } => {
                match callee.as_ref() {
                    Expr::Ident(name) if !env.is_local(&name.text) => {
                        if let Some((renamed_name, renamed_kind)) = self.resolve_own_file_rename(env, &name.text) {
                            self.use_edge(env, &renamed_name, renamed_kind)?;
                        } else {
                            let kind = if looks_like_macro(&name.text) {
                                NodeKind::Macro
                            } else {
                                NodeKind::Function
                            };
                            self.use_edge(env, &name.text, kind)?;
                        }
                    }
                    other => self.walk_expr(env, other)?,
                }
                for arg in args {
                    self.walk_expr(env, arg)?;
                }
            }
            Expr::Member { target, .. } => self.walk_expr(env, target)?,
            Expr::Assign { target, value } => {
                self.walk_expr(env, value)?;
                let write_env = env.with_in_assign(true);
                self.walk_expr(&write_env, target)?;
            }
            Expr::Binary { left, right } => {
                self.walk_expr(env, left)?;
                self.walk_expr(env, right)?;
            }
            Expr::Unary(inner) => self.walk_expr(env, inner)?,
            Expr::Cast { ty, value } => {
                self.maybe_use_type(env, ty)?;
                self.walk_expr(env, value)?;
            }
            Expr::SizeofType(ty) => self.maybe_use_type(env, ty)?,
        }
        Ok(())
    }

    fn walk_stmt(&mut self, env: &mut WalkEnv, stmt: &Stmt) -> Result<(), BuildError> {
        match stmt {
            Stmt::Expr(e) => self.walk_expr(env, e)?,
            Stmt::VarDecl {
                name,
                storage,
                ty,
                initializer,
            } => {
                self.maybe_use_type(env, ty)?;
                if let Some(init) = initializer {
                    self.walk_expr(env, init)?;
                }
                if *storage == Storage::Extern {
                    // A local `extern` declaration names an external entity rather than
                    // introducing a new local (§4.3 "Locals tracking").
                    self.use_edge(env, &name.text, NodeKind::Global)?;
                } else {
                    env.locals.push(name.text.clone());
                }
            }
            Stmt::Block(block) => self.walk_block(env, block)?,
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.walk_expr(env, cond)?;
                self.walk_stmt(env, then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.walk_stmt(env, else_branch)?;
                }
            }
            Stmt::While { cond, body } => {
                self.walk_expr(env, cond)?;
                self.walk_stmt(env, body)?;
            }
            Stmt::For { init, cond, step, body } => {
                let mark = env.locals.len();
                if let Some(init) = init {
                    self.walk_stmt(env, init)?;
                }
                if let Some(cond) = cond {
                    self.walk_expr(env, cond)?;
                }
                if let Some(step) = step {
                    self.walk_expr(env, step)?;
                }
                self.walk_stmt(env, body)?;
                env.locals.truncate(mark);
            }
            Stmt::Return(value) => {
                if let Some(value) = value {
                    self.walk_expr(env, value)?;
                }
            }
        }
        Ok(())
    }

    fn walk_block(&mut self, env: &mut WalkEnv, block: &Block) -> Result<(), BuildError> {
        let mark = env.locals.len();
        for stmt in &block.stmts {
            self.walk_stmt(env, stmt)?;
        }
        env.locals.truncate(mark);
        Ok(())
    }

    fn walk_toplevel(&mut self, env: &WalkEnv, top: &TopLevel) -> Result<(), BuildError> {
        match top {
            TopLevel::Include { .. } => {}
            TopLevel::ConstantDefine { name, value } => {
                if let Some(node) = self.own_node(env, &name.text, NodeKind::Constant) {
                    if self.symbols.is_dupe(node) {
                        return Ok(());
                    }
                    let env = env.with_current(node);
                    self.walk_expr(&env, value)?;
                }
            }
            TopLevel::MacroDefine { name, params, body } => {
                if let Some(node) = self.own_node(env, &name.text, NodeKind::Macro) {
                    if self.symbols.is_dupe(node) {
                        return Ok(());
                    }
                    let mut env = env.with_current(node);
                    env.locals = params.iter().map(|p| p.text.clone()).collect();
                    self.walk_expr(&env, body)?;
                }
            }
            TopLevel::FunctionDef {
                name,
                storage,
                return_type,
                params,
                body,
            } => {
                let own_name = if *storage == Storage::Static && env.file_kind == FileKind::Source
                    || (name.text == "main" && env.file_kind == FileKind::Source)
                {
                    match self.symbols.rename_lookup(env.file, &name.text) {
                        Some(handle) => handle,
                        None => return Ok(()),
                    }
                } else {
                    match self.graph.get_node(&name.text, NodeKind::Function) {
                        Some(handle) => handle,
                        None => return Ok(()),
                    }
                };
                if self.symbols.is_dupe(own_name) {
                    return Ok(());
                }
                let mut env = env.with_current(own_name);
                self.maybe_use_type(&env, return_type)?;
                for param in params {
                    self.maybe_use_type(&env, &param.ty)?;
                    env.locals.push(param.name.text.clone());
                }
                self.walk_block(&mut env, body)?;
            }
            TopLevel::FunctionProto {
                name,
                storage,
                return_type,
                params,
            } => {
                if *storage == Storage::Static && env.file_kind == FileKind::Source {
                    return Ok(());
                }
                let own_name = match self.graph.get_node(&name.text, NodeKind::Prototype) {
                    Some(handle) => handle,
                    None => return Ok(()),
                };
                if self.symbols.is_dupe(own_name) {
                    return Ok(());
                }
                let env = env.with_current(own_name);
                self.maybe_use_type(&env, return_type)?;
                for param in params {
                    self.maybe_use_type(&env, &param.ty)?;
                }
            }
            TopLevel::GlobalVar {
                name,
                storage,
                ty,
                initializer,
            } => {
                let kind = global_node_kind(*storage, env.file_kind, initializer.is_some());
                let own_name = match self.own_node(env, &name.text, kind) {
                    Some(handle) => handle,
                    None => return Ok(()),
                };
                if self.symbols.is_dupe(own_name) {
                    return Ok(());
                }
                let env = env.with_current(own_name);
                self.maybe_use_type(&env, ty)?;
                if let Some(init) = initializer {
                    self.walk_expr(&env, init)?;
                }
            }
            TopLevel::StructDef { name, fields } => self.walk_struct_or_union(env, &format!("S__{}", name.text), fields)?,
            TopLevel::UnionDef { name, fields } => self.walk_struct_or_union(env, &format!("U__{}", name.text), fields)?,
            TopLevel::EnumDef { .. } => {
                // Enumerators carry no type of their own to depend on (§4.5).
            }
            TopLevel::Typedef { name, target } => {
                if let Some(node) = self.symbols.typedef_node(&name.text) {
                    if self.symbols.is_dupe(node) {
                        return Ok(());
                    }
                    let env = env.with_current(node);
                    self.maybe_use_type(&env, target)?;
                }
            }
        }
        Ok(())
    }

    fn walk_struct_or_union(
        &mut self,
        env: &WalkEnv,
        tag_name: &str,
        fields: &[crate::ast::FieldDecl],
    ) -> Result<(), BuildError> {
        if !self.config.fields_dependencies {
            return Ok(());
        }
        let Some(type_node) = self.graph.get_node(tag_name, NodeKind::Type) else {
            return Ok(());
        };
        if self.symbols.is_dupe(type_node) {
            return Ok(());
        }
        for field in fields {
            let Some(field_name) = &field.name else {
                continue;
            };
            let full_name = format!("{}.{}", tag_name, field_name.text);
            if let Some(field_node) = self.graph.get_node(&full_name, NodeKind::Field) {
                if self.symbols.is_dupe(field_node) {
                    continue;
                }
                let env = env.with_current(field_node);
                self.maybe_use_type(&env, &field.ty)?;
            }
        }
        Ok(())
    }
}
