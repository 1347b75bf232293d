// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Kind dispatch tables.
//!
//! Each [`Kind`] maps, once per field at compile time, to up to three plain
//! functions: a direct-offset reader, an emptiness predicate and a buffer
//! filler. The encode path calls whatever was selected and never matches on
//! the kind again.

use crate::reflect::{Kind, Reflect};
use crate::text;
use crate::value::Value;

/// Reads a primitive member at `ptr` (owner base + verified offset).
pub type OffsetReader = unsafe fn(*const u8) -> Value;

/// Reports whether a member value counts as empty for `omitempty`.
pub type EmptyFn = fn(&dyn Reflect) -> bool;

/// Appends the rendered value.
pub type FillFn = fn(&mut Vec<u8>, &Value);

macro_rules! primitive_fns {
    ($($ty:ty => $kind:ident, $read:ident, $empty:ident, $fill:ident, $append:expr;)*) => {
        $(
            /// # Safety
            ///
            /// `ptr` must point at a live, aligned value of this primitive.
            unsafe fn $read(ptr: *const u8) -> Value {
                // SAFETY: upheld by the caller.
                Value::$kind(unsafe { ptr.cast::<$ty>().read() })
            }

            fn $empty(member: &dyn Reflect) -> bool {
                member
                    .as_any()
                    .downcast_ref::<$ty>()
                    .is_some_and(|v| *v == <$ty>::default())
            }

            fn $fill(buf: &mut Vec<u8>, value: &Value) {
                if let Value::$kind(v) = value {
                    $append(buf, *v);
                }
            }
        )*

        /// Direct-offset reader for primitive kinds.
        pub fn reader_for(kind: Kind) -> Option<OffsetReader> {
            match kind {
                $(Kind::$kind => Some($read as OffsetReader),)*
                _ => None,
            }
        }

        fn primitive_empty(kind: Kind) -> Option<EmptyFn> {
            match kind {
                $(Kind::$kind => Some($empty as EmptyFn),)*
                _ => None,
            }
        }

        fn primitive_fill(kind: Kind) -> Option<FillFn> {
            match kind {
                $(Kind::$kind => Some($fill as FillFn),)*
                _ => None,
            }
        }
    };
}

primitive_fns! {
    i8 => I8, i8_read, i8_empty, i8_fill, text::append_int;
    i16 => I16, i16_read, i16_empty, i16_fill, text::append_int;
    i32 => I32, i32_read, i32_empty, i32_fill, text::append_int;
    i64 => I64, i64_read, i64_empty, i64_fill, text::append_int;
    isize => Isize, isize_read, isize_empty, isize_fill, text::append_int;
    u8 => U8, u8_read, u8_empty, u8_fill, text::append_int;
    u16 => U16, u16_read, u16_empty, u16_fill, text::append_int;
    u32 => U32, u32_read, u32_empty, u32_fill, text::append_int;
    u64 => U64, u64_read, u64_empty, u64_fill, text::append_int;
    usize => Usize, usize_read, usize_empty, usize_fill, text::append_int;
    f32 => F32, f32_read, f32_empty, f32_fill, text::append_f32;
    f64 => F64, f64_read, f64_empty, f64_fill, text::append_f64;
    bool => Bool, bool_read, bool_empty, bool_fill, append_bool;
}

fn append_bool(buf: &mut Vec<u8>, v: bool) {
    let text: &[u8] = if v { b"true" } else { b"false" };
    buf.extend_from_slice(text);
}

fn string_fill(buf: &mut Vec<u8>, value: &Value) {
    if let Value::String(s) = value {
        text::append_json_string(buf, s);
    }
}

fn len_empty(member: &dyn Reflect) -> bool {
    member.reflect_len() == Some(0)
}

fn nil_empty(member: &dyn Reflect) -> bool {
    member.is_nil()
}

/// `omitempty` predicate: false, zero, zero length or absent.
pub fn empty_for(kind: Kind) -> Option<EmptyFn> {
    match kind {
        Kind::String | Kind::Slice | Kind::Array | Kind::Map => Some(len_empty as EmptyFn),
        Kind::Ptr | Kind::Dynamic => Some(nil_empty as EmptyFn),
        _ => primitive_empty(kind),
    }
}

/// Specialized renderer; `None` leaves the value to the caller.
pub fn fill_for(kind: Kind) -> Option<FillFn> {
    match kind {
        Kind::String => Some(string_fill as FillFn),
        _ => primitive_fill(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(kind: Kind, value: Value) -> String {
        let mut buf = Vec::new();
        let f = fill_for(kind).expect("filler");
        f(&mut buf, &value);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_fillers() {
        assert_eq!(fill(Kind::Bool, Value::Bool(true)), "true");
        assert_eq!(fill(Kind::Bool, Value::Bool(false)), "false");
        assert_eq!(fill(Kind::I32, Value::I32(-42)), "-42");
        assert_eq!(fill(Kind::U64, Value::U64(u64::MAX)), "18446744073709551615");
        assert_eq!(fill(Kind::I8, Value::I8(0)), "0");
        assert_eq!(fill(Kind::F64, Value::F64(2.5)), "2.5");
        assert_eq!(fill(Kind::F32, Value::F32(0.1)), "0.1");
        assert_eq!(fill(Kind::String, Value::String("a\"b".into())), "\"a\\\"b\"");
    }

    #[test]
    fn test_no_filler_for_composites() {
        for kind in [
            Kind::Ptr,
            Kind::Dynamic,
            Kind::Slice,
            Kind::Array,
            Kind::Map,
            Kind::Record,
            Kind::Other,
        ] {
            assert!(fill_for(kind).is_none(), "{kind:?}");
            assert!(reader_for(kind).is_none(), "{kind:?}");
        }
        assert!(reader_for(Kind::String).is_none());
        assert!(fill_for(Kind::String).is_some());
    }

    #[test]
    fn test_empty_predicates() {
        fn empty(kind: Kind, v: &dyn Reflect) -> bool {
            empty_for(kind).expect("predicate")(v)
        }

        assert!(empty(Kind::Bool, &false));
        assert!(!empty(Kind::Bool, &true));
        assert!(empty(Kind::I64, &0i64));
        assert!(!empty(Kind::I64, &-1i64));
        assert!(empty(Kind::U8, &0u8));
        assert!(empty(Kind::F64, &0.0f64));
        assert!(!empty(Kind::F32, &0.5f32));
        assert!(empty(Kind::String, &String::new()));
        assert!(!empty(Kind::String, &"x".to_string()));
        assert!(empty(Kind::Slice, &Vec::<i32>::new()));
        assert!(!empty(Kind::Slice, &vec![1]));
        assert!(empty(Kind::Array, &[0u8; 0]));
        assert!(empty(Kind::Ptr, &None::<i32>));
        assert!(!empty(Kind::Ptr, &Some(0i32)));
        assert!(empty(Kind::Dynamic, &Value::Null));

        assert!(empty_for(Kind::Record).is_none());
        assert!(empty_for(Kind::Other).is_none());
    }

    #[test]
    fn test_readers_match_values() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..200 {
            let n = rng.i64(..);
            let read = reader_for(Kind::I64).expect("reader");
            // SAFETY: pointer to a live i64.
            let v = unsafe { read(std::ptr::from_ref(&n).cast()) };
            assert_eq!(v, Value::I64(n));

            let x = rng.u16(..);
            let read = reader_for(Kind::U16).expect("reader");
            // SAFETY: pointer to a live u16.
            let v = unsafe { read(std::ptr::from_ref(&x).cast()) };
            assert_eq!(v, Value::U16(x));

            let mut buf = Vec::new();
            fill_for(Kind::I64).expect("filler")(&mut buf, &Value::I64(n));
            assert_eq!(buf, n.to_string().into_bytes());
        }
    }
}
