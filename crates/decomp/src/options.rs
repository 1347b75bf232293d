// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode options handed to the per-field operations.

/// Options consulted by [`Field::render_value`](crate::Field::render_value)
/// and [`decompose`](crate::decompose()).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Omit nullable members that are absent (`None`, `Value::Null`) and
    /// container members with zero length, independent of `omitempty`.
    pub omit_nil: bool,
}

impl Options {
    /// Options with every switch off.
    #[must_use]
    pub const fn new() -> Self {
        Self { omit_nil: false }
    }

    /// Set [`Options::omit_nil`].
    #[must_use]
    pub const fn with_omit_nil(mut self, omit_nil: bool) -> Self {
        self.omit_nil = omit_nil;
        self
    }
}
