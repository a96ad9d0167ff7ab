//! Behavioural properties of the schema engine, exercised against value
//! trees in the gateway's JSON form.

use sborcodec_core::{s, EnumValue, Integer, Schema, SborErrorKind, SborKind, SborValue};
use serde_json::json;
use std::collections::BTreeMap;

fn tree(raw: serde_json::Value) -> SborValue {
    serde_json::from_value(raw).unwrap_or_else(|e| panic!("bad value tree: {e}"))
}

// ─── Idempotence ──────────────────────────────────────────────────────────────

#[test]
fn parsing_twice_gives_identical_results() {
    let schema = s::structure((("name", s::string()), ("count", s::number())));
    let ok = tree(json!({
        "kind": "Tuple",
        "fields": [
            { "kind": "String", "field_name": "name", "value": "x" },
            { "kind": "U32", "field_name": "count", "value": "12" }
        ]
    }));
    assert_eq!(schema.safe_parse(&ok), schema.safe_parse(&ok));

    let bad = tree(json!({ "kind": "Tuple", "fields": [] }));
    assert_eq!(schema.safe_parse(&bad), schema.safe_parse(&bad));
}

// ─── Kind gating ──────────────────────────────────────────────────────────────

fn one_of_each_kind() -> Vec<SborValue> {
    vec![
        SborValue::bool(true),
        SborValue::integer(SborKind::I8, "1").unwrap(),
        SborValue::integer(SborKind::I64, "1").unwrap(),
        SborValue::integer(SborKind::U128, "1").unwrap(),
        SborValue::string("s"),
        SborValue::bytes("00"),
        SborValue::decimal("1"),
        SborValue::precise_decimal("1"),
        SborValue::reference("resource_rdx1"),
        SborValue::own("internal_vault_rdx1"),
        SborValue::non_fungible_local_id("#1#"),
        SborValue::array(SborKind::U8, vec![]),
        SborValue::map(SborKind::U8, SborKind::U8, vec![]),
        SborValue::tuple(vec![]),
        SborValue::enumeration(0, "None", vec![]),
    ]
}

fn assert_gated<S: Schema>(name: &str, schema: S) {
    for value in one_of_each_kind() {
        if schema.kinds().contains(value.kind()) {
            continue;
        }
        let err = schema.safe_parse(&value).err().unwrap_or_else(|| {
            panic!("{name} accepted a {} node", value.kind());
        });
        assert_eq!(err.kind, SborErrorKind::WrongKind, "{name} on {}", value.kind());
        assert!(err.path.is_empty());
    }
}

#[test]
fn every_leaf_rejects_foreign_kinds_uniformly() {
    assert_gated("bool", s::bool());
    assert_gated("string", s::string());
    assert_gated("bytes", s::bytes());
    assert_gated("number", s::number());
    assert_gated("decimal", s::decimal());
    assert_gated("address", s::address());
    assert_gated("internal_address", s::internal_address());
    assert_gated("non_fungible_local_id", s::non_fungible_local_id());
    assert_gated("instant", s::instant());
}

// ─── Struct strictness ────────────────────────────────────────────────────────

#[test]
fn strict_struct_names_the_missing_field_and_permissive_allows_it() {
    let value = tree(json!({
        "kind": "Tuple",
        "fields": [{ "kind": "String", "field_name": "foo", "value": "hello" }]
    }));

    let strict = s::structure((("foo", s::string()), ("bar", s::string())));
    let err = strict.safe_parse(&value).unwrap_err();
    assert_eq!(err.kind, SborErrorKind::MissingFields);
    assert!(err.message.contains("bar"));
    assert!(!err.message.contains("foo"));

    let permissive = s::structure_allowing_missing((("foo", s::string()), ("bar", s::string())));
    let (foo, bar) = permissive.safe_parse(&value).unwrap();
    assert_eq!(foo.as_deref(), Some("hello"));
    assert!(bar.is_none());
}

// ─── Tuple arity ──────────────────────────────────────────────────────────────

#[test]
fn tuple_arity_must_match_exactly() {
    let schema = s::tuple((s::string(), s::bool()));
    let three = tree(json!({
        "kind": "Tuple",
        "fields": [
            { "kind": "String", "value": "a" },
            { "kind": "Bool", "value": true },
            { "kind": "Bool", "value": false }
        ]
    }));
    assert_eq!(schema.safe_parse(&three).unwrap_err().kind, SborErrorKind::ArityMismatch);

    let two = tree(json!({
        "kind": "Tuple",
        "fields": [
            { "kind": "String", "value": "a" },
            { "kind": "Bool", "value": true }
        ]
    }));
    assert_eq!(schema.safe_parse(&two).unwrap(), ("a".to_string(), true));
}

// ─── Variant dispatch ─────────────────────────────────────────────────────────

#[test]
fn variant_dispatch_and_unit_asymmetry() {
    let schema = s::enumeration(vec![
        s::unit("Empty"),
        s::variant("StructBased", s::structure((("name", s::string()),)).map(|(name,)| name)),
    ]);

    let struct_based = tree(json!({
        "kind": "Enum",
        "variant_id": 1,
        "variant_name": "StructBased",
        "fields": [{ "kind": "String", "field_name": "name", "value": "daan" }]
    }));
    let parsed = schema.safe_parse(&struct_based).unwrap();
    assert_eq!(parsed, EnumValue::with_value("StructBased", "daan".to_string()));
    assert_eq!(
        serde_json::to_value(&parsed).unwrap(),
        json!({ "variant": "StructBased", "value": "daan" })
    );

    let empty = tree(json!({
        "kind": "Enum",
        "variant_id": "0",
        "variant_name": "Empty",
        "fields": []
    }));
    let parsed = schema.safe_parse(&empty).unwrap();
    assert_eq!(serde_json::to_value(&parsed).unwrap(), json!({ "variant": "Empty" }));
}

// ─── Numeric range ────────────────────────────────────────────────────────────

#[test]
fn u8_range_is_enforced() {
    let over = tree(json!({ "kind": "U8", "value": "256" }));
    assert_eq!(s::number().safe_parse(&over).unwrap_err().kind, SborErrorKind::OutOfRange);

    let max = tree(json!({ "kind": "U8", "value": "255" }));
    assert_eq!(s::number().safe_parse(&max).unwrap(), Integer::U8(255));
}

// ─── Nesting ──────────────────────────────────────────────────────────────────

#[test]
fn array_of_tuples_preserves_order() {
    let schema = s::array(s::tuple((s::string(), s::number())));
    let value = tree(json!({
        "kind": "Array",
        "element_kind": "Tuple",
        "elements": [
            { "kind": "Tuple", "fields": [{ "kind": "String", "value": "a" }, { "kind": "U8", "value": "1" }] },
            { "kind": "Tuple", "fields": [{ "kind": "String", "value": "b" }, { "kind": "U8", "value": "2" }] }
        ]
    }));
    let parsed = schema.safe_parse(&value).unwrap();
    assert_eq!(
        parsed,
        vec![("a".to_string(), Integer::U8(1)), ("b".to_string(), Integer::U8(2))]
    );
}

#[test]
fn nested_failure_identifies_exact_location() {
    let item = s::enumeration(vec![
        s::unit("Empty"),
        s::variant("StructBased", s::structure((("name", s::string()),)).map(|(name,)| name)),
    ]);
    let schema = s::structure((("items", s::array(item)),));
    let mut elements = vec![json!({ "kind": "Enum", "variant_id": 0, "variant_name": "Empty", "fields": [] }); 3];
    elements.push(json!({
        "kind": "Enum",
        "variant_id": 1,
        "variant_name": "StructBased",
        "fields": [{ "kind": "U8", "field_name": "name", "value": "1" }]
    }));
    let value = tree(json!({
        "kind": "Tuple",
        "fields": [{ "kind": "Array", "field_name": "items", "element_kind": "Enum", "elements": elements }]
    }));
    let err = schema.safe_parse(&value).unwrap_err();
    assert_eq!(err.path, vec!["items", "3", "StructBased", "name"]);
    assert_eq!(err.to_string(), "expected String, got U8 at `items.3.StructBased.name`");
}

// ─── Map ──────────────────────────────────────────────────────────────────────

#[test]
fn map_output_is_independent_of_entry_order() {
    let schema = s::map(s::string(), s::string());
    let entry = |k: &str, v: &str| {
        json!({ "key": { "kind": "String", "value": k }, "value": { "kind": "String", "value": v } })
    };
    let forward = tree(json!({
        "kind": "Map", "key_kind": "String", "value_kind": "String",
        "entries": [entry("k1", "v1"), entry("k2", "v2")]
    }));
    let reversed = tree(json!({
        "kind": "Map", "key_kind": "String", "value_kind": "String",
        "entries": [entry("k2", "v2"), entry("k1", "v1")]
    }));

    let a: BTreeMap<_, _> = schema.safe_parse(&forward).unwrap().into_iter().collect();
    let b: BTreeMap<_, _> = schema.safe_parse(&reversed).unwrap().into_iter().collect();
    assert_eq!(a, b);
    assert_eq!(a["k1"], "v1");
    assert_eq!(a["k2"], "v2");
}
