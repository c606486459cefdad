// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! The observer hook fired whenever Pass 2 emits a use edge (§4.7).

use crate::arena::Handle;
use crate::graph::GraphStore;
use crate::graph::Node;

/// Why a use edge is being emitted. `NoContext` is what the base walker produces; a caller that
/// wants call-argument or assignment-rhs granularity (§4.7 "no-ctx by default; extensions may
/// include call-arg, assignment-rhs, etc.") can extend this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseContext {
    NoContext,
}

/// Observes every use edge as Pass 2 creates it (§4.7). The default [`NoopHook`] does nothing;
/// embedding tools implement this trait to build their own indexes (e.g. a prolog-fact emitter)
/// without the builder needing to know about them.
pub trait UseHook {
    fn on_use_edge(
        &mut self,
        context: UseContext,
        in_assign: bool,
        src: Handle<Node>,
        dst: Handle<Node>,
        graph: &GraphStore,
    );
}

/// The default hook: does nothing.
pub struct NoopHook;

impl UseHook for NoopHook {
    fn on_use_edge(
        &mut self,
        _context: UseContext,
        _in_assign: bool,
        _src: Handle<Node>,
        _dst: Handle<Node>,
        _graph: &GraphStore,
    ) {
    }
}
