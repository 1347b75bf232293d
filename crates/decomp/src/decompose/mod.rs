// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type field tables.
//!
//! A [`Decomposer`] is compiled once per concrete record type and holds six
//! field tables, each sorted ascending by key:
//!
//! | Table | Key | Hidden members |
//! |-------|-----|----------------|
//! | `by_tag` | directive key, else identifier | dropped |
//! | `by_name` | identifier | dropped |
//! | `by_low` | identifier, first char lower-cased | dropped |
//! | `out_tag` | directive key, else identifier | kept |
//! | `out_name` | identifier | kept |
//! | `out_low` | identifier, first char lower-cased | kept |
//!
//! Lookup tables (`by_*`) hold one field per key; when members collide on a
//! key the first declared one wins. Output tables keep every public member.
//!
//! Decomposers are handed out by [`get_decomposer`], which compiles under a
//! single process-wide lock and never evicts.

mod cache;
mod compiler;
mod dispatch;
mod field;

pub use cache::{LookupStats, TypeCache};
pub use compiler::{compile_fields, Directive, Filter, KeyDirective, Naming, SKIP_MARKER};
pub use dispatch::{empty_for, fill_for, reader_for, EmptyFn, FillFn, OffsetReader};
pub use field::{Appended, Field, Rendered};

use crate::options::Options;
use crate::reflect::{Record, Shape};
use crate::value::Value;
use std::any::TypeId;
use std::sync::{Arc, OnceLock};

static DECOMPOSERS: OnceLock<TypeCache> = OnceLock::new();

/// One of a decomposer's six tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    ByTag,
    ByName,
    ByLow,
    OutTag,
    OutName,
    OutLow,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::ByTag,
        Table::ByName,
        Table::ByLow,
        Table::OutTag,
        Table::OutName,
        Table::OutLow,
    ];

    /// Naming mode and filter the table is built with.
    pub const fn mode(self) -> (Naming, Filter) {
        match self {
            Table::ByTag => (Naming::Tag, Filter::SkipHidden),
            Table::ByName => (Naming::Name, Filter::SkipHidden),
            Table::ByLow => (Naming::Low, Filter::SkipHidden),
            Table::OutTag => (Naming::Tag, Filter::IncludeAll),
            Table::OutName => (Naming::Name, Filter::IncludeAll),
            Table::OutLow => (Naming::Low, Filter::IncludeAll),
        }
    }

    pub const fn is_lookup(self) -> bool {
        matches!(self, Table::ByTag | Table::ByName | Table::ByLow)
    }
}

/// Compiled field tables of one record type.
#[derive(Debug)]
pub struct Decomposer {
    pub type_name: &'static str,
    pub type_id: TypeId,
    tables: [Vec<Field>; 6],
}

impl Decomposer {
    /// Build all six tables for `shape`.
    pub fn compile(shape: &'static Shape) -> Self {
        let tables = Table::ALL.map(|table| build_table(shape, table));
        Self {
            type_name: shape.type_name,
            type_id: shape.type_id(),
            tables,
        }
    }

    pub fn table(&self, table: Table) -> &[Field] {
        &self.tables[table as usize]
    }

    /// Binary search one table by key.
    pub fn find(&self, table: Table, key: &str) -> Option<&Field> {
        let fields = self.table(table);
        fields
            .binary_search_by(|f| f.key.as_str().cmp(key))
            .ok()
            .map(|i| &fields[i])
    }

    pub fn by_tag(&self) -> &[Field] {
        self.table(Table::ByTag)
    }

    pub fn by_name(&self) -> &[Field] {
        self.table(Table::ByName)
    }

    pub fn by_low(&self) -> &[Field] {
        self.table(Table::ByLow)
    }

    /// Every public member keyed by directive, for output.
    ///
    /// Members hidden by a bare `"-"` directive are included; encoders must
    /// skip fields whose [`Field::is_hidden`] is set, as [`decompose`] does.
    pub fn out_tag(&self) -> &[Field] {
        self.table(Table::OutTag)
    }

    /// As [`Decomposer::out_tag`], keyed by identifier. Includes hidden members.
    pub fn out_name(&self) -> &[Field] {
        self.table(Table::OutName)
    }

    /// As [`Decomposer::out_tag`], keyed by lower-cased identifier. Includes
    /// hidden members.
    pub fn out_low(&self) -> &[Field] {
        self.table(Table::OutLow)
    }
}

fn build_table(shape: &'static Shape, table: Table) -> Vec<Field> {
    let (naming, filter) = table.mode();
    let mut fields = compile_fields(shape, naming, filter);
    // Stable: colliding keys keep compile order, i.e. reverse declaration order.
    fields.sort_by(|a, b| a.key.cmp(&b.key));
    if !table.is_lookup() {
        return fields;
    }

    // Keep the last of each run of equal keys: the first declared member.
    let mut unique: Vec<Field> = Vec::with_capacity(fields.len());
    for field in fields {
        match unique.last_mut() {
            Some(last) if last.key == field.key => {
                log::trace!(
                    "[Decomposer::compile] {} {:?}: key {:?} shadowed",
                    shape.type_name,
                    table,
                    field.key
                );
                *last = field;
            }
            _ => unique.push(field),
        }
    }
    unique
}

/// Decomposer for the concrete type of `value`, compiled on first request.
pub fn get_decomposer(value: &dyn Record) -> Arc<Decomposer> {
    DECOMPOSERS.get_or_init(TypeCache::new).get_or_compile(value)
}

/// Hit/miss counters of the process-wide cache.
pub fn cache_stats() -> LookupStats {
    DECOMPOSERS.get().map(TypeCache::stats).unwrap_or_default()
}

/// Generic object built from the `out_tag` table of `record`'s type.
///
/// Members hidden by a skip directive are left out, `omitempty` and
/// [`Options::omit_nil`] decide omission, text-forced members come out as
/// strings. Nested records recurse through their own `to_value`.
pub fn decompose(record: &dyn Record, options: &Options) -> Value {
    let dc = get_decomposer(record);
    let mut members = Vec::with_capacity(dc.out_tag().len());
    for field in dc.out_tag() {
        if field.is_hidden() {
            continue;
        }
        let (value, omit) = field.value(record, options.omit_nil, field.is_embedded());
        if !omit {
            members.push((field.key.clone(), value));
        }
    }
    Value::Object(members)
}
