// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Static record shapes and the dynamic member view.
//!
//! A record type describes itself with a `'static` [`Shape`] (usually emitted
//! by `#[derive(Record)]`). The shape lists every declared member in order,
//! with its visibility, [`Kind`], naming directive, embedding link and a
//! compile-time verified byte offset. Instances are walked structurally
//! through [`Record::member`], which hands out `&dyn Reflect` views.

use crate::value::Value;
use std::any::{Any, TypeId};

mod impls;

/// Member kind classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    /// `Option<T>`, `Box<T>`, `Arc<T>`.
    Ptr,
    /// The generic [`Value`].
    Dynamic,
    /// `Vec<T>`.
    Slice,
    /// `[T; N]`.
    Array,
    /// String-keyed `HashMap` / `BTreeMap`.
    Map,
    /// Nested record.
    Record,
    Other,
}

impl Kind {
    /// Fixed-size scalar readable straight out of the owning record's memory.
    pub const fn is_primitive(self) -> bool {
        self.is_numeric() || matches!(self, Self::Bool)
    }

    /// Integer or floating point of any width.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::Isize
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::Usize
                | Self::F32
                | Self::F64
        )
    }
}

/// Compile-time kind of a type.
///
/// # Safety
///
/// A primitive `KIND` (see [`Kind::is_primitive`]) licenses reading the
/// member's bytes as exactly that primitive. Implementors must only report a
/// primitive kind for the matching Rust primitive (`Kind::I32` for `i32`, ...).
pub unsafe trait Typed {
    const KIND: Kind;
}

/// Dynamic view of one member value.
pub trait Reflect: Any {
    fn as_any(&self) -> &dyn Any;

    fn reflect_kind(&self) -> Kind;

    /// Convert into the generic value representation.
    fn to_value(&self) -> Value;

    /// Absent pointer-like value (`None`, `Value::Null`).
    fn is_nil(&self) -> bool {
        false
    }

    /// Element count for text, sequences and maps.
    fn reflect_len(&self) -> Option<usize> {
        None
    }

    fn as_record(&self) -> Option<&dyn Record> {
        None
    }
}

/// A record type with a static shape and structural member access.
pub trait Record: Reflect {
    fn shape() -> &'static Shape
    where
        Self: Sized;

    /// Shape of the concrete type behind `self`.
    fn record_shape(&self) -> &'static Shape;

    /// Member by declaration index.
    fn member(&self, index: usize) -> Option<&dyn Reflect>;
}

/// Static description of a record type.
///
/// Shapes cannot be assembled in safe code: the pairing of a type identity
/// with offset-carrying members is what licenses direct-offset reads.
///
/// ```compile_fail
/// use decomp::Shape;
///
/// fn forge() -> Shape {
///     Shape::new("Forged", std::any::TypeId::of::<u8>, &[])
/// }
/// ```
///
/// ```compile_fail
/// use decomp::Shape;
///
/// fn forge() -> Shape {
///     Shape { type_name: "Forged", type_id: std::any::TypeId::of::<u8>, members: &[] }
/// }
/// ```
#[derive(Debug)]
pub struct Shape {
    pub type_name: &'static str,
    type_id: fn() -> TypeId,
    pub members: &'static [Member],
}

impl Shape {
    /// # Safety
    ///
    /// `type_id` must return the identity of the type `members` describe:
    /// every member carrying an offset (see [`Member::with_offset`]) must be a
    /// field of that type, at that offset, of the member's primitive kind.
    pub const unsafe fn new(
        type_name: &'static str,
        type_id: fn() -> TypeId,
        members: &'static [Member],
    ) -> Self {
        Self {
            type_name,
            type_id,
            members,
        }
    }

    /// Identity of the described type.
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Member by identifier.
    pub fn member(&self, ident: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.ident == ident)
    }
}

/// One declared member of a record type.
#[derive(Debug, Clone, Copy)]
pub struct Member {
    /// Declared identifier.
    pub ident: &'static str,
    /// Declared `pub`.
    pub public: bool,
    pub kind: Kind,
    /// Declared type, as written.
    pub type_name: &'static str,
    /// Naming directive, e.g. `"name,omitempty"`.
    pub tag: Option<&'static str>,
    /// Shape of the embedded record when the member is flattened into its owner.
    pub embedded: Option<fn() -> &'static Shape>,
    offset: Option<usize>,
}

impl Member {
    pub const fn new(ident: &'static str, public: bool, kind: Kind, type_name: &'static str) -> Self {
        Self {
            ident,
            public,
            kind,
            type_name,
            tag: None,
            embedded: None,
            offset: None,
        }
    }

    /// Attach the member's byte offset within its owner.
    ///
    /// # Safety
    ///
    /// `offset` must be `core::mem::offset_of!(Owner, member)` for the member
    /// this descriptor was built for, and `kind` must be that member's
    /// `<T as Typed>::KIND`.
    #[must_use]
    pub const unsafe fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub const fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    #[must_use]
    pub const fn with_embedded(mut self, shape: fn() -> &'static Shape) -> Self {
        self.embedded = Some(shape);
        self
    }

    /// Verified byte offset, if one was attached.
    pub const fn offset(&self) -> Option<usize> {
        self.offset
    }
}

#[cfg(test)]
mod tests;
