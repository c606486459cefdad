// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! A static cross-reference engine core for C.
//!
//! Given a set of already-parsed translation units (see [`ast`] for the contract this crate
//! expects from its parser), [`builder::Builder`] produces a [`graph::GraphStore`]: a labelled
//! directed multigraph of source entities — files, directories, functions, prototypes, globals,
//! types, fields, enum constructors, macros, and constants — connected by containment (`Has`) and
//! use (`Use`) edges.
//!
//! The build is a two-pass traversal (§4 of the design): [`defs`] creates every definition node
//! and wires containment, [`uses`] re-traverses to add use edges by resolving identifier and
//! member-access occurrences against the tables [`symbols`] populated in the first pass, and
//! [`adjust`] performs the small set of whole-graph touch-ups (declaration/definition dependency
//! propagation, sink pruning) that only make sense once both passes are complete.
//!
//! Parsing C source, the on-disk graph format, a query UI, and emitting the graph as Prolog facts
//! are all out of scope here; this crate only builds the in-memory graph and hands it back.

pub mod adjust;
pub mod arena;
pub mod ast;
pub mod builder;
pub mod config;
#[macro_use]
mod debugging;
pub mod env;
pub mod error;
pub mod graph;
pub mod hooks;
mod defs;
mod resolver;
pub mod stats;
pub mod symbols;
mod uses;

use std::time::Duration;
use std::time::Instant;

/// Lets a long-running build be interrupted between files (§5, §7). Checked once per translation
/// unit by [`builder::Builder::build`], the same granularity the teacher checks cancellation at
/// between path-finding steps.
pub trait CancellationFlag {
    fn check(&self, at: &'static str) -> Result<(), CancellationError>;
}

/// Never cancels; the default for one-shot builds and for every test in this crate.
pub struct NoCancellation;

impl CancellationFlag for NoCancellation {
    fn check(&self, _at: &'static str) -> Result<(), CancellationError> {
        Ok(())
    }
}

/// Cancels once `limit` has elapsed since construction.
pub struct CancelAfterDuration {
    limit: Duration,
    start: Instant,
}

impl CancelAfterDuration {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            start: Instant::now(),
        }
    }
}

impl CancellationFlag for CancelAfterDuration {
    fn check(&self, at: &'static str) -> Result<(), CancellationError> {
        if self.start.elapsed() > self.limit {
            return Err(CancellationError(at));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("cancelled at \"{0}\"")]
pub struct CancellationError(pub &'static str);
