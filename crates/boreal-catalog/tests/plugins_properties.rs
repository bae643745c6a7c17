//! Property tests for the plugins unescape chain.
//!
//! The chain must invert both escape styles the feed produces: doubled
//! quotes and backslash-escaped quotes, each wrapped in one extra pair
//! of quote characters. Generated documents are shaped like real plugin
//! payloads: a container at the top level, leaf strings on a quote-free
//! alphabet. A quote inside a value would have been re-escaped by the
//! feed in yet another layer the chain does not model.

use proptest::prelude::*;
use serde_json::Value;

use boreal_catalog::decode_plugins;

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| Value::from(i64::from(n))),
        "[a-z0-9 _-]{1,12}".prop_map(Value::String),
    ]
}

fn json_node() -> BoxedStrategy<Value> {
    json_leaf()
        .prop_recursive(3, 24, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z][a-z0-9_]{0,8}", inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
        .boxed()
}

fn json_document() -> impl Strategy<Value = Value> {
    let node = json_node();
    prop_oneof![
        prop::collection::vec(node.clone(), 0..4).prop_map(Value::Array),
        prop::collection::btree_map("[a-z][a-z0-9_]{0,8}", node, 0..4)
            .prop_map(|map| Value::Object(map.into_iter().collect())),
    ]
}

proptest! {
    #[test]
    fn doubled_quote_payloads_round_trip(document in json_document()) {
        let text = serde_json::to_string(&document).unwrap();
        let wrapped = format!("\"{}\"", text.replace('"', "\"\""));
        let decoded = decode_plugins(&wrapped).unwrap();
        prop_assert_eq!(decoded, document);
    }

    #[test]
    fn backslash_escaped_payloads_round_trip(document in json_document()) {
        let text = serde_json::to_string(&document).unwrap();
        let wrapped = format!("\"{}\"", text.replace('"', "\\\""));
        let decoded = decode_plugins(&wrapped).unwrap();
        prop_assert_eq!(decoded, document);
    }

    #[test]
    fn decoding_never_panics(raw in "\\PC{0,64}") {
        let _ = decode_plugins(&raw);
    }
}
