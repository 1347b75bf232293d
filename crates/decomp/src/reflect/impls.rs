// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `Typed` / `Reflect` implementations for std types.

use super::{Kind, Record, Reflect, Typed};
use crate::value::Value;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            // SAFETY: the reported kind is exactly this primitive.
            unsafe impl Typed for $ty {
                const KIND: Kind = Kind::$kind;
            }

            impl Reflect for $ty {
                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn reflect_kind(&self) -> Kind {
                    Kind::$kind
                }

                fn to_value(&self) -> Value {
                    Value::$kind(*self)
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

// SAFETY: text is not a primitive kind.
unsafe impl Typed for String {
    const KIND: Kind = Kind::String;
}

impl Reflect for String {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn reflect_kind(&self) -> Kind {
        Kind::String
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn reflect_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

// SAFETY: text is not a primitive kind.
unsafe impl Typed for &'static str {
    const KIND: Kind = Kind::String;
}

impl Reflect for &'static str {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn reflect_kind(&self) -> Kind {
        Kind::String
    }

    fn to_value(&self) -> Value {
        Value::String((*self).to_string())
    }

    fn reflect_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

// SAFETY: char renders as text.
unsafe impl Typed for char {
    const KIND: Kind = Kind::String;
}

impl Reflect for char {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn reflect_kind(&self) -> Kind {
        Kind::String
    }

    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }

    fn reflect_len(&self) -> Option<usize> {
        Some(1)
    }
}

// SAFETY: pointer-like kinds are never read by offset.
unsafe impl<T> Typed for Option<T> {
    const KIND: Kind = Kind::Ptr;
}

impl<T: Reflect> Reflect for Option<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn reflect_kind(&self) -> Kind {
        Kind::Ptr
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, |v| v.to_value())
    }

    fn is_nil(&self) -> bool {
        self.is_none()
    }

    fn as_record(&self) -> Option<&dyn Record> {
        self.as_ref().and_then(|v| v.as_record())
    }
}

macro_rules! impl_pointer {
    ($($ptr:ident),*) => {
        $(
            // SAFETY: pointer-like kinds are never read by offset.
            unsafe impl<T: ?Sized> Typed for $ptr<T> {
                const KIND: Kind = Kind::Ptr;
            }

            impl<T: Reflect> Reflect for $ptr<T> {
                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn reflect_kind(&self) -> Kind {
                    Kind::Ptr
                }

                fn to_value(&self) -> Value {
                    (**self).to_value()
                }

                fn as_record(&self) -> Option<&dyn Record> {
                    (**self).as_record()
                }
            }
        )*
    };
}

impl_pointer!(Box, Arc);

// SAFETY: sequences are never read by offset.
unsafe impl<T> Typed for Vec<T> {
    const KIND: Kind = Kind::Slice;
}

impl<T: Reflect> Reflect for Vec<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn reflect_kind(&self) -> Kind {
        Kind::Slice
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(|v| v.to_value()).collect())
    }

    fn reflect_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

// SAFETY: arrays are never read by offset.
unsafe impl<T, const N: usize> Typed for [T; N] {
    const KIND: Kind = Kind::Array;
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn reflect_kind(&self) -> Kind {
        Kind::Array
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(|v| v.to_value()).collect())
    }

    fn reflect_len(&self) -> Option<usize> {
        Some(N)
    }
}

// SAFETY: maps are never read by offset.
unsafe impl<V> Typed for HashMap<String, V> {
    const KIND: Kind = Kind::Map;
}

impl<V: Reflect> Reflect for HashMap<String, V> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn reflect_kind(&self) -> Kind {
        Kind::Map
    }

    fn to_value(&self) -> Value {
        // Hash order is not stable, emit sorted by key.
        let mut members: Vec<(String, Value)> =
            self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect();
        members.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Object(members)
    }

    fn reflect_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

// SAFETY: maps are never read by offset.
unsafe impl<V> Typed for BTreeMap<String, V> {
    const KIND: Kind = Kind::Map;
}

impl<V: Reflect> Reflect for BTreeMap<String, V> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn reflect_kind(&self) -> Kind {
        Kind::Map
    }

    fn to_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }

    fn reflect_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

// SAFETY: dynamic values are never read by offset.
unsafe impl Typed for Value {
    const KIND: Kind = Kind::Dynamic;
}

impl Reflect for Value {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn reflect_kind(&self) -> Kind {
        Kind::Dynamic
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn is_nil(&self) -> bool {
        self.is_null()
    }
}
