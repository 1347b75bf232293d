// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic value returned by field extractors.

use crate::text;
use std::fmt;

/// A member value with its concrete width preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    String(String),
    Array(Vec<Value>),
    /// Members in output order.
    Object(Vec<(String, Value)>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Any signed or unsigned integer that fits in `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::I8(v) => Some(i64::from(v)),
            Self::I16(v) => Some(i64::from(v)),
            Self::I32(v) => Some(i64::from(v)),
            Self::I64(v) => Some(v),
            Self::Isize(v) => i64::try_from(v).ok(),
            Self::U8(v) => Some(i64::from(v)),
            Self::U16(v) => Some(i64::from(v)),
            Self::U32(v) => Some(i64::from(v)),
            Self::U64(v) => i64::try_from(v).ok(),
            Self::Usize(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::F32(v) => Some(f64::from(v)),
            Self::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Object member by key (first match).
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(members) => members.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Plain text form used when a member is forced to render as a string:
/// numbers as their output digits, strings unquoted, containers in compact
/// output syntax.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::Isize(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::Usize(v) => write!(f, "{v}"),
            Self::F32(v) => {
                let mut buf = Vec::new();
                text::append_f32(&mut buf, *v);
                f.write_str(&String::from_utf8_lossy(&buf))
            }
            Self::F64(v) => {
                let mut buf = Vec::new();
                text::append_f64(&mut buf, *v);
                f.write_str(&String::from_utf8_lossy(&buf))
            }
            Self::String(v) => f.write_str(v),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(members) => {
                f.write_str("{")?;
                for (i, (key, item)) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{key}:{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
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
    String => String,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths_are_preserved() {
        assert_eq!(Value::from(7i8), Value::I8(7));
        assert_eq!(Value::from(7u64), Value::U64(7));
        assert_ne!(Value::from(7i32), Value::from(7i64));
        assert_eq!(Value::from(7u16).as_i64(), Some(7));
        assert_eq!(Value::from(u64::MAX).as_i64(), None);
    }

    #[test]
    fn test_display_for_text_forcing() {
        assert_eq!(Value::from(42i32).to_string(), "42");
        assert_eq!(Value::from(-3i64).to_string(), "-3");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(2.5f64).to_string(), "2.5");
        assert_eq!(Value::from(1e7f64).to_string(), "1e+07");
        assert_eq!(Value::from("Ada").to_string(), "Ada");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(vec![1u8, 2, 3]).to_string(), "[1,2,3]");
    }

    #[test]
    fn test_object_get() {
        let v = Value::Object(vec![
            ("a".to_string(), Value::from(1i32)),
            ("b".to_string(), Value::Null),
        ]);
        assert_eq!(v.get("a"), Some(&Value::I32(1)));
        assert_eq!(v.get("b").map(Value::is_null), Some(true));
        assert!(v.get("c").is_none());
        assert_eq!(v.to_string(), "{a:1,b:null}");
    }

    #[test]
    fn test_option_conversion() {
        assert!(Value::from(None::<i32>).is_null());
        assert_eq!(Value::from(Some("x")), Value::String("x".into()));
    }
}
