// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! The small, cheaply-cloned environment threaded through both walkers (§9 "Environment
//! threading"). `current` changes every time a child scope is entered; `locals` is extended for
//! the duration of a function/macro body and restored afterwards.

use crate::arena::Handle;
use crate::ast::FileKind;
use crate::graph::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Defs,
    Uses,
}

#[derive(Debug, Clone)]
pub struct WalkEnv {
    pub phase: Phase,
    pub file: Handle<Node>,
    pub file_path: String,
    pub file_kind: FileKind,
    /// The node that new `Has` children (Pass 1) or new `Use` edges (Pass 2) are attached to.
    pub current: Handle<Node>,
    /// Names currently in scope as parameters or block locals (§4.3 "Locals tracking").
    pub locals: Vec<String>,
    pub in_assign: bool,
}

impl WalkEnv {
    pub fn for_file(phase: Phase, file: Handle<Node>, file_path: String, file_kind: FileKind) -> WalkEnv {
        WalkEnv {
            phase,
            file,
            file_path,
            file_kind,
            current: file,
            locals: Vec::new(),
            in_assign: false,
        }
    }

    /// Returns a copy of this environment with `current` replaced, for descending into a newly
    /// created definition.
    pub fn with_current(&self, current: Handle<Node>) -> WalkEnv {
        WalkEnv {
            current,
            ..self.clone()
        }
    }

    pub fn is_local(&self, name: &str) -> bool {
        self.locals.iter().any(|l| l == name)
    }

    /// Returns a copy of this environment with `in_assign` replaced, for walking the write side
    /// of an assignment (§4.7 "in_assign").
    pub fn with_in_assign(&self, in_assign: bool) -> WalkEnv {
        WalkEnv {
            in_assign,
            ..self.clone()
        }
    }
}
