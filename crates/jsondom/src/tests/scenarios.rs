//! End-to-end behavior: ownership, erase contracts, document lifetime,
//! and the dumper/creator agreement.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::{
    parse, ArrayCreator, DumpStyle, JsonDoc, JsonStr, JsonValue, Null, ObjectCreator, ValueKind,
};

#[test]
fn parse_then_dump_is_identity_for_compact_text() {
    let text = r#"{"name":"mitzi","scores":[1,2.5,-3e2],"tags":{"a":null,"b":true}}"#;
    assert_eq!(parse(text).unwrap().dump(), text);
}

#[test]
fn reparsing_either_style_gives_an_equal_tree() {
    let original = parse(r#"{"deep":[{"x":1},{"y":[true,null]}],"s":"a\nb"}"#).unwrap();
    let compact_text = original.dump();
    let compact = parse(&compact_text).unwrap();
    let mut pretty_text = String::new();
    original
        .write_json(&mut pretty_text, DumpStyle::Pretty)
        .unwrap();
    let pretty = parse(&pretty_text).unwrap();
    assert_eq!(original, compact);
    assert_eq!(original, pretty);
}

#[test]
fn parsing_borrows_and_ownership_is_opt_in() {
    let text = String::from(r#"{"plain":"no escapes","esc":"a\tb","n":12.5}"#);
    let mut v = parse(&text).unwrap();

    // Plain strings, keys and number texts borrow the input.
    assert!(v.refers_to_external_memory());
    assert!(!v.is_full_owner());
    // The escaped string was decoded into its own allocation.
    assert_eq!(v["esc"].get_string(""), "a\tb");

    v.take_ownership();
    assert!(v.is_full_owner());
    assert_eq!(v.dump(), text);
}

#[test]
fn ownership_matrix_over_constructors() {
    let backing = String::from("borrowed text");

    let borrowed = JsonValue::from(backing.as_str());
    assert!(borrowed.refers_to_external_memory());

    let owned = JsonValue::from(String::from("owned text"));
    assert!(owned.is_full_owner());

    for scalar in [JsonValue::Null, JsonValue::from(true), JsonValue::from(7)] {
        assert!(scalar.is_full_owner());
    }

    // A container is a full owner only when every reachable string is.
    let mut mixed = JsonValue::Null;
    mixed["a"] = JsonValue::from(1);
    assert!(mixed.is_full_owner());
    mixed["b"] = JsonValue::from(backing.as_str());
    assert!(mixed.refers_to_external_memory());
}

#[test]
fn clones_are_independent_and_fully_owned() {
    let text = String::from(r#"{"k":["v1","v2"]}"#);
    let original = parse(&text).unwrap();
    let mut copy = original.clone();
    assert!(copy.is_full_owner());

    copy["k"].push("v3");
    copy["added"] = JsonValue::from(true);
    assert_eq!(original["k"].len(), 2);
    assert!(original["added"].is_null());
    assert_ne!(original, copy);
}

#[test]
fn objects_hold_exactly_one_member_per_key() {
    let mut v = parse(r#"{"k":"first","other":0}"#).unwrap();
    v["k"] = JsonValue::from("second");
    v["k"] = JsonValue::from("third");
    assert_eq!(v.len(), 2);
    assert_eq!(v["k"].get_string(""), "third");
    assert_eq!(v.dump(), r#"{"k":"third","other":0}"#);
}

#[test]
fn erase_matrix_over_every_kind() {
    let samples = || {
        vec![
            JsonValue::Null,
            JsonValue::from(true),
            JsonValue::from(3),
            JsonValue::from("text"),
        ]
    };

    // Keyed erase touches only objects.
    for mut v in samples() {
        assert_eq!(v.remove("any"), 0);
    }
    let mut arr = JsonValue::from_iter([1, 2]);
    assert_eq!(arr.remove("any"), 0);
    assert_eq!(arr.len(), 2);

    // Positional erase touches only arrays; on objects it is a no-op.
    for mut v in samples() {
        assert_eq!(v.remove_index(0), 0);
    }
    let mut obj = parse(r#"{"a":1,"b":2}"#).unwrap();
    assert_eq!(obj.remove_index(0), 0);
    assert_eq!(obj.len(), 2);
    assert_eq!(obj.remove("a"), 1);
    assert_eq!(obj.remove("a"), 0);
    assert_eq!(arr.remove_index(1), 1);
    assert_eq!(arr.dump(), "[1]");
}

#[test]
fn insertion_order_survives_removal() {
    let mut v = parse(r#"{"a":1,"b":2,"c":3,"d":4}"#).unwrap();
    v.remove("b");
    v["e"] = JsonValue::from(5);
    assert_eq!(v.dump(), r#"{"a":1,"c":3,"d":4,"e":5}"#);
    // Lookups after the shift still hit the right members.
    assert_eq!(v["c"].get_int(0), 3);
    assert_eq!(v["d"].get_int(0), 4);
}

#[test]
fn doc_decouples_tree_from_input() {
    let root;
    {
        let transient = String::from(r#"{"kept":"alive","by":["the","doc"]}"#);
        let mut doc = JsonDoc::new();
        doc.parse(&transient).unwrap();
        assert!(doc.refers_to_external_memory());
        root = doc.into_root();
    }
    assert_eq!(root["kept"].get_string(""), "alive");
    assert_eq!(root["by"][1].get_string(""), "doc");
}

#[test]
fn creator_and_dumper_agree_byte_for_byte() {
    // The same logical document, built through the tree and through the
    // streaming creator.
    let mut tree = JsonValue::Null;
    tree["id"] = JsonValue::from(17);
    tree["name"] = JsonValue::from("line\nbreak");
    tree["ratio"] = JsonValue::from(2.0);
    tree["flags"] = JsonValue::from_iter([true, false]);
    tree["nothing"] = JsonValue::Null;

    let mut creator = ObjectCreator::new();
    creator.append_value("id", 17);
    creator.append_value("name", "line\nbreak");
    creator.append_value("ratio", 2.0);
    {
        let mut flags = creator.append_array("flags");
        flags.append_value(true);
        flags.append_value(false);
    }
    creator.append_value("nothing", Null);

    assert_eq!(tree.dump(), creator.as_str());
    assert_eq!(parse(creator.as_str()).unwrap(), tree);
}

#[test]
fn creator_output_feeds_the_parser() {
    let mut arr = ArrayCreator::new();
    arr.extend(0..5);
    {
        let mut obj = arr.append_object();
        obj.append_value("nested", "yes");
    }
    let v = parse(arr.as_str()).unwrap();
    assert_eq!(v.len(), 6);
    assert_eq!(v[5]["nested"].get_string(""), "yes");
}

#[test]
fn size_as_matrix() {
    let v = parse(r#"{"arr":[1,2,3],"s":"abcd","n":1,"t":true,"z":null}"#).unwrap();
    assert_eq!(v.size_as(ValueKind::Object), 5);
    assert_eq!(v.size_as(ValueKind::Array), 0);
    assert_eq!(v["arr"].size_as(ValueKind::Array), 3);
    assert_eq!(v["s"].size_as(ValueKind::String), 4);
    assert_eq!(v["n"].size_as(ValueKind::Number), 1);
    assert_eq!(v["t"].size_as(ValueKind::Bool), 1);
    assert_eq!(v["z"].size_as(ValueKind::Null), 1);
    assert!(v["missing"].empty_as(ValueKind::Object));
}

#[test]
fn keys_match_by_decoded_text() {
    let v = parse(r#"{"slash\/key":1,"tab\tkey":2,"back\\key":3}"#).unwrap();
    assert_eq!(v["slash/key"].get_int(0), 1);
    assert_eq!(v["tab\tkey"].get_int(0), 2);
    assert_eq!(v[r"back\key"].get_int(0), 3);
    let keys: Vec<&str> = match &v {
        JsonValue::Object(o) => o.keys().map(JsonStr::as_str).collect(),
        _ => unreachable!(),
    };
    assert_eq!(keys, ["slash/key", "tab\tkey", r"back\key"]);
}

#[test]
fn deep_documents_within_the_limit_parse() {
    let mut text = String::new();
    for _ in 0..60 {
        text.push_str("{\"a\":");
    }
    text.push('1');
    for _ in 0..60 {
        text.push('}');
    }
    let v = parse(&text).unwrap();
    let mut cursor = &v;
    for _ in 0..60 {
        cursor = &cursor["a"];
    }
    assert_eq!(cursor.get_int(0), 1);
}
