//! Serde round-trips of the pure-data runtime state: values, heap
//! contents, and namespaces. Code descriptors carry function pointers and
//! are intentionally outside the serializable surface.

use pyrite::{Heap, Interns, Runtime, Value};

/// Immediate values round-trip through JSON unchanged.
#[test]
fn values_round_trip() {
    for v in [Value::None, Value::Ellipsis, Value::Bool(true), Value::Int(-7)] {
        let json = serde_json::to_string(&v).expect("value serializes");
        let back: Value = serde_json::from_str(&json).expect("value deserializes");
        assert_eq!(back, v, "round-trip must preserve {v:?}");
    }
}

/// A populated heap survives a serialize/deserialize cycle with identical
/// object counts and contents.
#[test]
fn heap_round_trip() {
    let mut rt = Runtime::new();
    let s = rt.new_str("hello");
    let inner = rt.new_tuple(vec![Value::Int(1), s]);
    let list = rt.new_list(vec![inner, Value::Bool(false)]);
    let dict = rt.new_dict();
    let key = rt.new_str("k");
    rt.store_subscr(dict, key, list).unwrap();

    let before = rt.heap().stats();
    let json = serde_json::to_string(rt.heap()).expect("heap serializes");
    let restored: Heap = serde_json::from_str(&json).expect("heap deserializes");

    assert_eq!(restored.stats(), before, "object counts by type survive");
    assert_eq!(restored.len(), rt.heap().len());
}

/// The dynamic interner region round-trips; static regions need no state.
#[test]
fn interns_round_trip() {
    let mut interns = Interns::new();
    let q1 = interns.intern("alpha_beta");
    let q2 = interns.intern("gamma_delta");

    let json = serde_json::to_string(&interns).expect("interns serialize");
    let restored: Interns = serde_json::from_str(&json).expect("interns deserialize");

    assert_eq!(restored.get(q1), "alpha_beta");
    assert_eq!(restored.get(q2), "gamma_delta");
    assert_eq!(restored.len(), 2);
}
