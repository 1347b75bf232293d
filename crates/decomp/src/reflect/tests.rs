// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tests for record shapes and the member view.

use super::*;
use crate::Record;
use std::collections::BTreeMap;

#[derive(Record)]
struct Sample {
    pub flag: bool,
    pub count: i32,
    #[record(tag = "ratio,omitempty")]
    pub ratio: f64,
    pub label: String,
    pub maybe: Option<u8>,
    pub items: Vec<u16>,
    pub attrs: BTreeMap<String, i64>,
    secret: u64,
}

#[derive(Record)]
struct Inner {
    pub x: i32,
}

#[derive(Record)]
struct Outer {
    #[record(embed)]
    pub inner: Inner,
    pub y: i32,
}

fn sample() -> Sample {
    Sample {
        flag: true,
        count: -7,
        ratio: 0.5,
        label: "abc".into(),
        maybe: None,
        items: vec![1, 2],
        attrs: BTreeMap::new(),
        secret: 99,
    }
}

#[test]
fn test_shape_members() {
    let shape = Sample::shape();
    assert_eq!(shape.type_name, "Sample");
    assert_eq!(shape.type_id(), TypeId::of::<Sample>());
    assert_eq!(shape.members.len(), 8);

    let kinds: Vec<Kind> = shape.members.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        [
            Kind::Bool,
            Kind::I32,
            Kind::F64,
            Kind::String,
            Kind::Ptr,
            Kind::Slice,
            Kind::Map,
            Kind::U64,
        ]
    );

    let ratio = shape.member("ratio").expect("ratio");
    assert_eq!(ratio.tag, Some("ratio,omitempty"));
    assert_eq!(ratio.type_name, "f64");
    assert!(ratio.public);

    let secret = shape.member("secret").expect("secret");
    assert!(!secret.public);
    assert_eq!(shape.member("items").map(|m| m.type_name), Some("Vec<u16>"));
}

#[test]
fn test_offsets_are_verified_layout() {
    let shape = Sample::shape();
    assert_eq!(
        shape.member("count").and_then(Member::offset),
        Some(std::mem::offset_of!(Sample, count))
    );
    assert_eq!(
        shape.member("ratio").and_then(Member::offset),
        Some(std::mem::offset_of!(Sample, ratio))
    );
}

#[test]
fn test_manual_member_has_no_offset() {
    let member = Member::new("X", true, Kind::I32, "i32").with_tag("x");
    assert_eq!(member.offset(), None);
    assert_eq!(member.tag, Some("x"));
    assert!(member.embedded.is_none());
}

#[test]
fn test_member_access() {
    let s = sample();
    let record: &dyn Record = &s;
    assert_eq!(record.member(1).map(|m| m.to_value()), Some(Value::I32(-7)));
    assert_eq!(
        record.member(3).map(|m| m.to_value()),
        Some(Value::String("abc".into()))
    );
    assert!(record.member(4).is_some_and(|m| m.is_nil()));
    assert_eq!(record.member(5).and_then(|m| m.reflect_len()), Some(2));
    assert_eq!(record.member(7).map(|m| m.to_value()), Some(Value::U64(99)));
    assert!(record.member(8).is_none());
}

#[test]
fn test_embedded_link() {
    let shape = Outer::shape();
    let inner = shape.member("inner").expect("inner");
    assert_eq!(inner.kind, Kind::Record);
    let embedded = inner.embedded.expect("embedded shape");
    assert_eq!(embedded().type_name, "Inner");

    let outer = Outer {
        inner: Inner { x: 3 },
        y: 4,
    };
    let nested = outer
        .member(0)
        .and_then(|m| m.as_record())
        .and_then(|r| r.member(0))
        .map(|m| m.to_value());
    assert_eq!(nested, Some(Value::I32(3)));
}

#[test]
fn test_kind_classification() {
    assert!(Kind::Bool.is_primitive());
    assert!(Kind::F32.is_primitive());
    assert!(Kind::Usize.is_numeric());
    assert!(!Kind::Bool.is_numeric());
    assert!(!Kind::String.is_primitive());
    assert!(!Kind::Ptr.is_primitive());
    assert_eq!(<Option<String> as Typed>::KIND, Kind::Ptr);
    assert_eq!(<[u8; 4] as Typed>::KIND, Kind::Array);
    assert_eq!(<Value as Typed>::KIND, Kind::Dynamic);
    assert_eq!(<Inner as Typed>::KIND, Kind::Record);
}

#[test]
fn test_pointer_views() {
    let boxed: Box<i32> = Box::new(5);
    assert_eq!(boxed.reflect_kind(), Kind::Ptr);
    assert_eq!(boxed.to_value(), Value::I32(5));
    assert!(!boxed.is_nil());

    let none: Option<String> = None;
    assert!(none.is_nil());
    assert_eq!(none.to_value(), Value::Null);

    let some_record = Some(Inner { x: 1 });
    assert!(some_record.as_record().is_some());
}
