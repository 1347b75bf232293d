// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # decomp - compile-once field tables for record encoding
//!
//! Given a record type, `decomp` builds (once, behind a process-wide cache) a
//! [`Decomposer`]: six sorted tables of [`Field`] descriptors that let an
//! encoder read, test and render each member without inspecting the type
//! again on the hot path.
//!
//! ## Quick Start
//!
//! ```rust
//! use decomp::{get_decomposer, Appended, Record};
//!
//! #[derive(Record)]
//! struct Person {
//!     #[record(tag = "name,omitempty")]
//!     pub name: String,
//!     pub age: u32,
//! }
//!
//! let ada = Person { name: "Ada".into(), age: 36 };
//! let dc = get_decomposer(&ada);
//!
//! let mut buf = Vec::new();
//! for field in dc.out_tag() {
//!     if field.is_hidden() {
//!         continue;
//!     }
//!     if let Appended::Deferred(_) = field.append(&mut buf, &ada, false, field.is_embedded()) {
//!         unreachable!("strings and integers have fillers");
//!     }
//! }
//! assert_eq!(buf, b"age:36,name:\"Ada\",");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |  get_decomposer(&value)      process-wide TypeCache (one Mutex)     |
//! +---------------------------------------------------------------------+
//! |  Decomposer::compile         six tables: by_tag/by_name/by_low      |
//! |                                          out_tag/out_name/out_low   |
//! +---------------------------------------------------------------------+
//! |  field compiler              embedding flattening, directives       |
//! +---------------------------------------------------------------------+
//! |  kind dispatch tables        reader / empty / fill per Kind         |
//! +---------------------------------------------------------------------+
//! |  reflect                     Shape, Member, Typed, Reflect, Record  |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`reflect`] - static record shapes and the dynamic member view
//! - [`decompose`] - field compiler, tables, cache and per-field operations
//! - [`value`] - the generic [`Value`] returned by extractors
//! - [`text`] - key, string and number rendering
//! - [`options`] - caller-supplied encode options

// Allow the derive macro to work inside this crate's tests
extern crate self as decomp;

/// Field compiler, field tables, type cache and per-field operations.
pub mod decompose;
/// Caller-supplied encode options.
pub mod options;
/// Static record shapes and the dynamic member view.
pub mod reflect;
/// Key, string and number rendering helpers.
pub mod text;
/// Generic value returned by field extractors.
pub mod value;

pub use decomp_codegen::Record;
pub use decompose::{
    cache_stats, decompose, get_decomposer, Appended, Decomposer, Field, Filter, LookupStats,
    Naming, Rendered, Table, TypeCache,
};
pub use options::Options;
pub use reflect::{Kind, Member, Record, Reflect, Shape, Typed};
pub use value::Value;
