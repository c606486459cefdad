// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! Error handling (§7, SPEC_FULL.md "ambient stack").
//!
//! Most of §7's table is handled by logging a diagnostic and continuing — see
//! [`crate::builder::BuildLog`]. Only the two fatal rows (parse failure/timeout, and a missing
//! source endpoint) surface as a `Result::Err` of [`BuildError`], the way the teacher's
//! `CancellationError` is the one error type that actually propagates out of path-finding while
//! everything else is folded into a `StorageError` variant or simply logged.

use crate::CancellationError;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The external parser raised an error for this file (§7 "Parse failure"). Deduplicated per
    /// file by the builder before being logged and rethrown.
    #[error("failed to parse {file}: {source}")]
    ParseFailure {
        file: String,
        #[source]
        source: anyhow::Error,
    },

    /// The external parser (or the builder's own cancellation check) signalled a timeout; this
    /// propagates unchanged (§5, §7).
    #[error(transparent)]
    Cancelled(#[from] CancellationError),

    /// `current` was not already present in the graph when a use edge's source was looked up
    /// (§4.3 step 3, §7 "Missing source endpoint"). This is a programmer error in the walker, not
    /// a property of the input source, so it is fatal for the file rather than logged.
    #[error("source node for current position is missing from the graph in {file}")]
    MissingSourceEndpoint { file: String },

    /// Opening or writing `pfff.log` failed.
    #[error("failed to write build log: {0}")]
    Log(#[from] std::io::Error),
}
