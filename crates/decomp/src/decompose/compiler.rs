// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field compiler: walks a record shape and produces flat `Field` lists.

use super::dispatch;
use super::field::Field;
use crate::reflect::{Member, Shape};
use crate::text;

/// Marker that hides a member when it is the whole directive.
pub const SKIP_MARKER: &str = "-";

/// Which name becomes a field's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Naming {
    /// Naming directive when present, identifier otherwise.
    Tag,
    /// Declared identifier.
    Name,
    /// Declared identifier with its first character lower-cased.
    Low,
}

/// Whether members hidden by a bare skip directive are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Drop hidden members (lookup tables).
    SkipHidden,
    /// Keep every public member (output tables).
    IncludeAll,
}

/// Key part of a naming directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirective<'a> {
    /// Empty first element: keep the identifier.
    Identifier,
    /// Skip marker alone: hide the member.
    Hidden,
    /// Explicit key. A skip marker followed by modifiers lands here too, with
    /// the marker itself as the key.
    Literal(&'a str),
}

/// Parsed `key,modifier,...` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    pub key: KeyDirective<'a>,
    pub omit_empty: bool,
    pub as_string: bool,
}

impl<'a> Directive<'a> {
    /// Parse a directive; an empty one carries no instructions.
    pub fn parse(tag: &'a str) -> Option<Self> {
        if tag.is_empty() {
            return None;
        }
        let mut parts = tag.split(',');
        let first = parts.next().unwrap_or("");
        let modifiers: Vec<&str> = parts.collect();

        let key = match first {
            "" => KeyDirective::Identifier,
            SKIP_MARKER if modifiers.is_empty() => KeyDirective::Hidden,
            other => KeyDirective::Literal(other),
        };

        let mut directive = Self {
            key,
            omit_empty: false,
            as_string: false,
        };
        for modifier in modifiers {
            match modifier {
                "omitempty" => directive.omit_empty = true,
                "string" => directive.as_string = true,
                _ => {}
            }
        }
        Some(directive)
    }
}

/// Compile the fields of `shape` in reverse declaration order.
///
/// Embedded members are flattened: their fields get the embedding member's
/// index prepended to the access path and lose the direct-offset reader.
pub fn compile_fields(shape: &'static Shape, naming: Naming, filter: Filter) -> Vec<Field> {
    let owner = shape.type_id();
    let mut fields = Vec::with_capacity(shape.members.len());

    for (index, member) in shape.members.iter().enumerate().rev() {
        if !member.public {
            log::trace!(
                "[compile_fields] {}.{} skipped: not public",
                shape.type_name,
                member.ident
            );
            continue;
        }

        if let Some(embedded) = member.embedded {
            for mut field in compile_fields(embedded(), naming, filter) {
                field.embed_under(index);
                fields.push(field);
            }
            continue;
        }

        let directive = member.tag.and_then(Directive::parse);
        let hidden = directive.is_some_and(|d| d.key == KeyDirective::Hidden);
        if hidden && filter == Filter::SkipHidden {
            log::trace!(
                "[compile_fields] {}.{} skipped: hidden by directive",
                shape.type_name,
                member.ident
            );
            continue;
        }

        let mut field = Field::new(member, index, owner, base_key(member, naming));
        field.hidden = hidden;

        if naming == Naming::Tag {
            if let Some(directive) = directive {
                if let KeyDirective::Literal(key) = directive.key {
                    field.key = key.to_string();
                }
                if directive.omit_empty {
                    field.empty = dispatch::empty_for(field.kind);
                }
                field.as_string = directive.as_string;
            }
        }

        finalize(&mut field);
        fields.push(field);
    }

    fields
}

fn base_key(member: &Member, naming: Naming) -> String {
    match naming {
        Naming::Tag | Naming::Name => member.ident.to_string(),
        Naming::Low => lower_first(member.ident),
    }
}

fn lower_first(ident: &str) -> String {
    let mut chars = ident.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Select reader and filler, precompute the key bytes.
fn finalize(field: &mut Field) {
    if field.offset.is_some() {
        field.read = dispatch::reader_for(field.kind);
    }
    field.fill = dispatch::fill_for(field.kind);

    field.key_bytes.clear();
    text::append_key(&mut field.key_bytes, &field.key);
    field.key_bytes.push(b':');
}
