// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! The driver that runs a full build (§2 "control flow"): list the given files, run Pass 1 over
//! all of them, then Pass 2 over all of them, then the adjuster, then sink pruning, handing the
//! finished [`GraphStore`] back to whatever external persistence the embedder wants to use.
//!
//! Parsing is an external collaborator (§6): [`Builder::build`] takes a `parse` callback rather
//! than owning a C parser itself.

use std::fs::File;
use std::io::BufWriter;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;

use crate::adjust;
use crate::arena::Handle;
use crate::ast::FileKind;
use crate::ast::TranslationUnit;
use crate::config::Config;
use crate::defs;
use crate::error::BuildError;
use crate::graph::GraphStore;
use crate::graph::Node;
use crate::graph::NodeKind;
use crate::hooks::NoopHook;
use crate::hooks::UseHook;
use crate::stats::BuildStats;
use crate::symbols::SymbolTable;
use crate::uses;
use crate::CancellationFlag;

/// The collaborator hook a caller supplies to parse a single file (§6 `parse(file, show_errors) ->
/// AST`). `show_errors` mirrors the original's flag for whether the parser itself should print
/// diagnostics as it works; this crate never inspects it, only forwards it.
pub type ParseFn<'a> = dyn Fn(&Path, bool) -> Result<TranslationUnit, BuildError> + 'a;

/// The on-disk diagnostics log the spec requires verbatim: `{root}/pfff.log`, one line per
/// diagnostic, flushed after every write so the log survives a crash mid-build (§5, §6, §7).
/// Also accumulates the [`BuildStats`] counters a caller can inspect without re-reading the file.
pub struct BuildLog {
    writer: BufWriter<File>,
    stats: BuildStats,
}

impl BuildLog {
    /// Opens (truncating) `{root}/pfff.log` (§6).
    pub fn open(root: &Path) -> Result<BuildLog, BuildError> {
        let path = root.join("pfff.log");
        let file = File::create(&path)?;
        Ok(BuildLog {
            writer: BufWriter::new(file),
            stats: BuildStats::new(),
        })
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn into_stats(self) -> BuildStats {
        self.stats
    }

    /// Writes one line and flushes immediately (§5 "must be flushed on every write so diagnostics
    /// survive a crash"). A failure to write the log is not itself fatal to the build — the
    /// diagnostic has already done its job once it reached the `log` facade below — so this
    /// swallows the I/O error rather than threading a `Result` through every call site in the two
    /// walkers.
    fn line(&mut self, line: &str) {
        let _ = writeln!(self.writer, "{}", line);
        let _ = self.writer.flush();
    }

    pub fn dupe_entity(&mut self, name: &str, kind: NodeKind, original_path: &str, duplicate_path: &str) {
        self.stats.dupes_by_kind.record(kind);
        let line = format!(
            "DUPE entity: {} ({}) originally defined in {}, duplicate in {}",
            name, kind, original_path, duplicate_path
        );
        log::warn!("{}", line);
        self.line(&line);
    }

    pub fn typedef_conflict(&mut self, name: &str) {
        self.stats.typedef_conflicts += 1;
        let line = format!("Typedef conflict on {}: keeping first binding", name);
        log::warn!("{}", line);
        self.line(&line);
    }

    pub fn global_definition_in_header(&mut self, name: &str) {
        self.stats.globals_in_header += 1;
        let line = format!("Global definition in header: {} (consider moving to a source file)", name);
        log::info!("{}", line);
        self.line(&line);
    }

    pub fn lookup_failure(&mut self, name: &str, kind: NodeKind) {
        self.stats.lookup_failures_by_kind.record(kind);
        let line = format!("Lookup failure on {} ({})", name, kind);
        log::warn!("{}", line);
        self.line(&line);
    }

    pub fn dropped_dupe_edge(&mut self, from: &str, to: &str) {
        self.stats.dropped_dupe_edges += 1;
        let line = format!("Dropped use edge {} -> {}: endpoint is a duplicate", from, to);
        log::debug!("{}", line);
        self.line(&line);
    }

    fn parse_failure(&mut self, file_path: &str, error: &BuildError) {
        let line = format!("Parse failure in {}: {}", file_path, error);
        log::error!("{}", line);
        self.line(&line);
    }
}

/// Drives a complete build over a fixed set of files (§6 inputs: `root`, `files`, `verbose`,
/// `config`).
pub struct Builder {
    root: PathBuf,
    files: Vec<PathBuf>,
    verbose: bool,
    config: Config,
    hook: Box<dyn UseHook>,
}

impl Builder {
    pub fn new(root: impl Into<PathBuf>, files: Vec<PathBuf>, verbose: bool, config: Config) -> Builder {
        Builder {
            root: root.into(),
            files,
            verbose,
            config,
            hook: Box::new(NoopHook),
        }
    }

    /// Registers the observer that fires on every use edge Pass 2 emits (§4.7). Replaces the
    /// builder's default no-op hook.
    pub fn with_hook(mut self, hook: Box<dyn UseHook>) -> Builder {
        self.hook = hook;
        self
    }

    /// Runs both passes, then the adjuster, over every file, in the order fixed by §2 and §5:
    /// Pass 1 over all files, then Pass 2 over all files, then the adjuster. `cancellation` is
    /// checked once per file in each pass (§5 "checked once per translation unit").
    pub fn build(
        &mut self,
        parse: &ParseFn,
        cancellation: &dyn CancellationFlag,
    ) -> Result<(GraphStore, BuildStats), BuildError> {
        let mut graph = GraphStore::new();
        let mut symbols = SymbolTable::new();
        let mut log = BuildLog::open(&self.root)?;

        let mut units: Vec<(Handle<Node>, String, FileKind, TranslationUnit)> = Vec::with_capacity(self.files.len());
        for path in &self.files {
            cancellation.check("pass1")?;
            let file_path = GraphStore::file_path(path, &self.root);
            let file_kind = FileKind::of(path);
            if self.verbose {
                log::info!("pass1: {}", file_path);
            }
            let unit = match parse(path, true) {
                Ok(unit) => unit,
                Err(BuildError::Cancelled(e)) => return Err(BuildError::Cancelled(e)),
                Err(e) => {
                    log.parse_failure(&file_path, &e);
                    return Err(e);
                }
            };
            let file = graph.add_file(&file_path);
            defs::run_pass1(&mut graph, &mut symbols, &mut log, file, &file_path, file_kind, &unit);
            units.push((file, file_path, file_kind, unit));
        }
        log.stats.files_processed = units.len();

        for (file, file_path, file_kind, unit) in &units {
            cancellation.check("pass2")?;
            if self.verbose {
                log::info!("pass2: {}", file_path);
            }
            uses::run_pass2(
                &mut graph,
                &mut symbols,
                self.hook.as_mut(),
                &mut log,
                &self.config,
                *file,
                file_path,
                *file_kind,
                unit,
            )?;
        }

        adjust::run(&mut graph, &self.config);

        Ok((graph, log.into_stats()))
    }
}
