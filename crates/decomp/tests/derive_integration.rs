// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// End-to-end checks of #[derive(Record)] through the public API: compile a
// decomposer, walk its output table the way an encoder does and compare the
// produced bytes.

#![allow(clippy::float_cmp)]
#![allow(clippy::missing_panics_doc)]

use decomp::{
    cache_stats, decompose, get_decomposer, Appended, Kind, Options, Record, Reflect, Table, Value,
};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Record)]
struct Audit {
    #[record(tag = "created,omitempty")]
    pub created: i64,
    #[record(tag = "by,omitempty")]
    pub by: String,
}

#[derive(Record)]
struct Account {
    #[record(embed)]
    pub audit: Audit,
    #[record(tag = "id,string")]
    pub id: u64,
    #[record(tag = "name")]
    pub name: String,
    #[record(tag = "balance")]
    pub balance: f64,
    #[record(tag = "active")]
    pub active: bool,
    #[record(tag = "labels,omitempty")]
    pub labels: BTreeMap<String, String>,
    #[record(tag = "-")]
    pub password: String,
    #[record(tag = "parent")]
    pub parent: Option<Box<Audit>>,
    cached: u32,
}

fn account() -> Account {
    Account {
        audit: Audit {
            created: 1_700_000_000,
            by: "ops".into(),
        },
        id: 9,
        name: "Ada \"the first\"".into(),
        balance: 12.5,
        active: true,
        labels: BTreeMap::new(),
        password: "hunter2".into(),
        parent: None,
        cached: 0,
    }
}

/// Renders a record the way a minimal encoder would: fillers where present,
/// deferred values through their display form.
fn encode(record: &dyn Record, options: &Options) -> String {
    let dc = get_decomposer(record);
    let mut buf = Vec::new();
    for field in dc.out_tag() {
        if field.is_hidden() {
            continue;
        }
        if let Appended::Deferred(value) =
            field.append(&mut buf, record, options.omit_nil, field.is_embedded())
        {
            buf.extend_from_slice(value.to_string().as_bytes());
            buf.push(b',');
        }
    }
    String::from_utf8(buf).expect("utf8")
}

#[test]
fn encodes_flattened_record() {
    let acc = account();
    assert_eq!(
        encode(&acc, &Options::default()),
        "active:true,balance:12.5,by:\"ops\",created:1700000000,id:\"9\",\
         name:\"Ada \\\"the first\\\"\",parent:null,"
    );
    assert_eq!(acc.cached, 0);
}

#[test]
fn omit_nil_drops_absent_pointer() {
    let acc = account();
    let out = encode(&acc, &Options::new().with_omit_nil(true));
    assert!(!out.contains("parent"));
    assert!(out.starts_with("active:true,"));
}

#[test]
fn embedded_omitempty_applies() {
    let mut acc = account();
    acc.audit = Audit {
        created: 0,
        by: String::new(),
    };
    let out = encode(&acc, &Options::default());
    assert!(!out.contains("created"));
    assert!(!out.contains("by:"));
}

#[test]
fn decompose_matches_table_walk() {
    let mut acc = account();
    acc.labels.insert("tier".into(), "gold".into());
    acc.parent = Some(Box::new(Audit {
        created: 1,
        by: String::new(),
    }));

    let value = decompose(&acc, &Options::default());
    assert_eq!(value.get("id"), Some(&Value::String("9".into())));
    assert_eq!(value.get("balance").and_then(Value::as_f64), Some(12.5));
    assert_eq!(value.get("password"), None);
    assert_eq!(
        value.get("labels"),
        Some(&Value::Object(vec![("tier".into(), Value::String("gold".into()))]))
    );
    assert_eq!(
        value.get("parent"),
        Some(&Value::Object(vec![("created".into(), Value::I64(1))]))
    );
    assert_eq!(acc.to_value(), value);
}

#[test]
fn lookup_tables_are_searchable() {
    let acc = account();
    let dc = get_decomposer(&acc);

    let by = dc.find(Table::ByTag, "by").expect("embedded key");
    assert_eq!(by.index(), [0, 1]);
    assert_eq!(by.kind, Kind::String);
    assert_eq!(by.type_name, "String");

    assert!(dc.find(Table::ByTag, "-").is_none());
    assert!(dc.find(Table::ByName, "password").is_none());
    assert!(dc.find(Table::OutName, "password").is_some_and(|f| f.is_hidden()));
    assert!(dc.find(Table::ByLow, "cached").is_none());
    assert!(dc.find(Table::ByName, "labels").is_some());
}

#[test]
fn process_wide_cache_reuses_decomposers() {
    let first = get_decomposer(&account());
    let before = cache_stats();
    let second = get_decomposer(&account());
    assert!(Arc::ptr_eq(&first, &second));
    assert!(cache_stats().hits > before.hits);
}

#[test]
fn member_view_exposes_kinds() {
    let acc = account();
    assert_eq!(acc.reflect_kind(), Kind::Record);
    let shape = Account::shape();
    assert_eq!(shape.type_name, "Account");
    assert_eq!(shape.member("parent").map(|m| m.kind), Some(Kind::Ptr));
    assert_eq!(shape.member("cached").map(|m| m.public), Some(false));
}
