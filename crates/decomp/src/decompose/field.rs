// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compiled field descriptor and the per-instance operations built on it.

use super::dispatch::{EmptyFn, FillFn, OffsetReader};
use crate::options::Options;
use crate::reflect::{Kind, Member, Record, Reflect};
use crate::value::Value;
use std::any::TypeId;
use std::fmt;

/// Stand-in for a member the access path cannot reach.
static MISSING: Value = Value::Null;

/// One compiled leaf member of a record type.
pub struct Field {
    /// Declared type of the member, as written.
    pub type_name: &'static str,
    /// Resolved output key.
    pub key: String,
    pub kind: Kind,
    /// Record type the access path starts from.
    pub(crate) owner: TypeId,
    /// Member indices from the owner down to the leaf.
    pub(crate) index: Vec<usize>,
    /// Verified byte offset of the leaf within `owner`.
    pub(crate) offset: Option<usize>,
    pub(crate) read: Option<OffsetReader>,
    pub(crate) empty: Option<EmptyFn>,
    pub(crate) fill: Option<FillFn>,
    pub(crate) as_string: bool,
    /// Bare skip directive; only present in output tables.
    pub(crate) hidden: bool,
    /// Rendered key followed by `:`.
    pub(crate) key_bytes: Vec<u8>,
}

/// Outcome of [`Field::append`].
#[derive(Debug, Clone, PartialEq)]
pub enum Appended {
    /// Nothing was written.
    Omitted,
    /// Key, value and trailing `,` were written.
    Written,
    /// Only the key was written; the caller renders the value and the
    /// trailing separator.
    Deferred(Value),
}

/// Member value as handed out by [`Field::render_value`].
pub enum Rendered<'a> {
    /// The member itself.
    Member(&'a dyn Reflect),
    /// Text-forced rendering of the member.
    Text(String),
}

impl Rendered<'_> {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Member(member) => member.to_value(),
            Self::Text(text) => Value::String(text.clone()),
        }
    }
}

impl fmt::Debug for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member(member) => f
                .debug_tuple("Member")
                .field(&member.to_value())
                .finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
        }
    }
}

impl Field {
    pub(crate) fn new(member: &Member, index: usize, owner: TypeId, key: String) -> Self {
        Self {
            type_name: member.type_name,
            key,
            kind: member.kind,
            owner,
            index: vec![index],
            offset: member.offset(),
            read: None,
            empty: None,
            fill: None,
            as_string: false,
            hidden: false,
            key_bytes: Vec::new(),
        }
    }

    /// Re-root a field compiled for an embedded record under its embedding
    /// member. Offsets do not survive the flattening, so the direct reader goes.
    pub(crate) fn embed_under(&mut self, index: usize) {
        self.index.insert(0, index);
        self.read = None;
    }

    /// Member indices from the owning record down to this leaf.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Reached through at least one embedded record.
    pub fn is_embedded(&self) -> bool {
        self.index.len() > 1
    }

    /// Direct-offset reader available.
    pub fn has_direct_read(&self) -> bool {
        self.read.is_some()
    }

    /// `omitempty` predicate installed.
    pub fn omits_empty(&self) -> bool {
        self.empty.is_some()
    }

    /// Specialized filler available.
    pub fn has_fill(&self) -> bool {
        self.fill.is_some()
    }

    /// Rendered as quoted text regardless of kind.
    pub fn as_string(&self) -> bool {
        self.as_string
    }

    /// Hidden by a bare skip directive (only seen in output tables).
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Precomputed key plus `:` separator.
    pub fn key_bytes(&self) -> &[u8] {
        &self.key_bytes
    }

    /// Walk the access path.
    pub fn member<'a>(&self, record: &'a dyn Record) -> Option<&'a dyn Reflect> {
        let (&last, path) = self.index.split_last()?;
        let mut current = record;
        for &i in path {
            current = current.member(i)?.as_record()?;
        }
        current.member(last)
    }

    fn member_or_missing<'a>(&self, record: &'a dyn Record) -> &'a dyn Reflect {
        self.member(record).unwrap_or(&MISSING)
    }

    /// Value through the direct reader when allowed, structurally otherwise.
    ///
    /// The direct read needs `record` to expose itself, not some other
    /// object, as an instance of the field's owner type.
    fn extract(&self, record: &dyn Record, member: &dyn Reflect, via_embedding: bool) -> Value {
        if let (Some(read), Some(offset), false) = (self.read, self.offset, via_embedding) {
            let any = record.as_any();
            let base = std::ptr::from_ref(any).cast::<u8>();
            let same_object = std::ptr::eq(base, std::ptr::from_ref(record).cast::<u8>());
            if same_object && any.type_id() == self.owner {
                // SAFETY: `base` points at a live `owner` instance (checked through
                // the very reference it comes from) and `offset` is the verified
                // offset of a member whose primitive kind selected `read`.
                return unsafe { read(base.add(offset)) };
            }
        }
        member.to_value()
    }

    fn is_empty(&self, member: &dyn Reflect) -> bool {
        self.empty.is_some_and(|empty| empty(member))
    }

    /// Field value and whether it should be omitted.
    ///
    /// Omitted when the `omitempty` predicate fires, or when `omit_nil` is set
    /// and the value is null. `via_embedding` bypasses the direct reader.
    pub fn value(&self, record: &dyn Record, omit_nil: bool, via_embedding: bool) -> (Value, bool) {
        let member = self.member_or_missing(record);
        let mut value = self.extract(record, member, via_embedding);
        let omit = self.is_empty(member) || (omit_nil && value.is_null());
        if self.as_string && !omit {
            value = Value::String(value.to_string());
        }
        (value, omit)
    }

    /// Field value as a structural view, and whether it should be omitted.
    ///
    /// With `options.omit_nil`, pointer-like members are omitted when absent and
    /// containers when empty, whatever the `omitempty` policy says.
    pub fn render_value<'a>(&self, record: &'a dyn Record, options: &Options) -> (Rendered<'a>, bool) {
        let member = self.member_or_missing(record);
        let mut omit = self.is_empty(member);
        if options.omit_nil {
            match self.kind {
                Kind::Ptr | Kind::Dynamic => omit = member.is_nil(),
                Kind::Map | Kind::Slice | Kind::Array => omit = member.reflect_len() == Some(0),
                _ => {}
            }
        }
        if self.as_string && !omit {
            return (Rendered::Text(member.to_value().to_string()), omit);
        }
        (Rendered::Member(member), omit)
    }

    /// Fused extract, omit and render.
    ///
    /// Hidden fields are not consulted here: callers walking an output table
    /// skip them through [`Field::is_hidden`].
    ///
    /// When a filler exists the key, value and trailing `,` are written and
    /// [`Appended::Written`] is returned. Without one only the key is written
    /// and the raw value comes back in [`Appended::Deferred`].
    pub fn append(
        &self,
        buf: &mut Vec<u8>,
        record: &dyn Record,
        omit_nil: bool,
        via_embedding: bool,
    ) -> Appended {
        let member = self.member_or_missing(record);
        let value = self.extract(record, member, via_embedding);
        if self.is_empty(member) || (omit_nil && value.is_null()) {
            return Appended::Omitted;
        }
        buf.extend_from_slice(&self.key_bytes);
        let Some(fill) = self.fill else {
            return Appended::Deferred(value);
        };
        if self.as_string && self.kind != Kind::String {
            buf.push(b'"');
            fill(buf, &value);
            buf.push(b'"');
        } else {
            fill(buf, &value);
        }
        buf.push(b',');
        Appended::Written
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("type_name", &self.type_name)
            .field("index", &self.index)
            .field("direct_read", &self.read.is_some())
            .field("omit_empty", &self.empty.is_some())
            .field("fill", &self.fill.is_some())
            .field("as_string", &self.as_string)
            .field("hidden", &self.hidden)
            .finish()
    }
}
