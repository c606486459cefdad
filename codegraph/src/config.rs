// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! Build configuration (§6).

/// Feature toggles for a single build (§6). The CLI driver that owns the actual config file
/// format is out of scope for this crate; when the `serde` feature is enabled, `Config` can be
/// deserialized directly from whatever that driver loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Config {
    /// Emit `Use` edges from a type to the tags/typedefs it references (§4.5). Default `true`.
    pub types_dependencies: bool,
    /// Gates whether a struct/union field's own type produces a `Use` edge (§4.5, walked
    /// alongside `types_dependencies`). Distinct from record-access (`e.f`) resolution, which is
    /// unimplemented regardless of this flag (§9 open question i). Default `true`.
    pub fields_dependencies: bool,
    /// When `false`, a reference to a typedef name is rewritten to its expansion target's tag
    /// before the use edge is emitted (§4.5). Default `false`.
    pub typedefs_dependencies: bool,
    /// Run the adjuster after Pass 2 (§4.6). Default `false`.
    pub propagate_deps_def_to_decl: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            types_dependencies: true,
            fields_dependencies: true,
            typedefs_dependencies: false,
            propagate_deps_def_to_decl: false,
        }
    }
}
