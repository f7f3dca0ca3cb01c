use std::collections::{BTreeMap, HashMap};

use standard_objects::{
    Array, Collection, Object, Opaque, Pair, SharedCollection, StandardError, Value, ValueKind,
};

const PKG: &str = "standard";
const DETAIL_NAME: &str = "Ordered containers";
const DETAIL_DESCRIPTION: &str = "Standard objects, redesigned.";
const VERSION: f64 = 1.5;
const YEAR: i32 = 2020;

fn detail_collection() -> Collection {
    Collection::new()
        .with("name", DETAIL_NAME)
        .with("description", DETAIL_DESCRIPTION)
}

/// `pkg`, `detail`, `version`, `year`, `isPublic`, in that insertion order.
fn test_collection() -> Collection {
    Collection::new()
        .with("pkg", PKG)
        .with("detail", detail_collection())
        .with("version", VERSION)
        .with("year", YEAR)
        .with("isPublic", true)
}

fn detail_str() -> String {
    format!(r#"{{"name":"{DETAIL_NAME}","description":"{DETAIL_DESCRIPTION}"}}"#)
}

fn test_collection_str() -> String {
    format!(
        r#"{{"pkg":"{PKG}","detail":{},"version":{VERSION},"year":{YEAR},"isPublic":true}}"#,
        detail_str()
    )
}

/// The same data in lexicographic key order.
fn test_collection_sorted_str() -> String {
    format!(
        r#"{{"detail":{{"description":"{DETAIL_DESCRIPTION}","name":"{DETAIL_NAME}"}},"isPublic":true,"pkg":"{PKG}","version":{VERSION},"year":{YEAR}}}"#
    )
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn new_is_empty() {
    let collection = Collection::new();
    assert_eq!(collection.len(), 0);
    assert!(collection.is_empty());
    assert_eq!(collection.to_string(), "{}");
}

#[test]
fn chained_set_builds_in_insertion_order() {
    let collection = test_collection();
    assert_eq!(collection.len(), 5);
    assert_eq!(collection.to_string(), test_collection_str());
}

#[test]
fn from_json_str_sorts_keys() {
    let collection = Collection::from_json_str(&test_collection_str()).unwrap();
    assert_eq!(collection.len(), 5);
    assert_eq!(collection.to_string(), test_collection_sorted_str());
}

#[test]
fn from_json_str_converts_nested_objects_to_collections() {
    let collection = Collection::from_json_str(r#"{"outer":{"z":1,"a":{"k":true}}}"#).unwrap();
    let outer = collection.get("outer").and_then(Value::as_collection).unwrap();
    assert_eq!(outer.keys(), ["a", "z"]);
    assert_eq!(outer.kind_of("a"), Some(ValueKind::Collection));
}

#[test]
fn from_json_str_keeps_objects_inside_arrays_unconverted() {
    let collection = Collection::from_json_str(r#"{"items":[{"a":1}]}"#).unwrap();
    let items = collection.get("items").and_then(Value::as_array).unwrap();
    assert_eq!(items.kind_of(0), Some(ValueKind::Object));
}

#[test]
fn from_json_str_scenario() {
    let collection = Collection::from_json_str(r#"{"b":1,"a":2}"#).unwrap();
    assert_eq!(collection.keys(), ["a", "b"]);
    assert_eq!(collection.get("a"), Some(&Value::Int(2)));
}

#[test]
fn from_json_str_rejects_malformed_json() {
    let err = Collection::from_json_str(r#"{"a":"#).unwrap_err();
    assert!(matches!(err, StandardError::Json(_)), "got {err:?}");
}

#[test]
fn from_json_str_rejects_non_object_documents() {
    let err = Collection::from_json_str("[1,2,3]").unwrap_err();
    assert!(matches!(err, StandardError::Json(_)), "got {err:?}");
}

#[test]
fn from_map_sorts_keys_and_converts_nested_maps() {
    let detail: HashMap<String, Value> = HashMap::from([
        ("name".to_string(), Value::from(DETAIL_NAME)),
        ("description".to_string(), Value::from(DETAIL_DESCRIPTION)),
    ]);
    let source: HashMap<&str, Value> = HashMap::from([
        ("pkg", Value::from(PKG)),
        ("detail", Value::from(detail)),
        ("version", Value::from(VERSION)),
        ("year", Value::from(YEAR)),
        ("isPublic", Value::from(true)),
    ]);

    let collection = Collection::from_map(source);
    assert_eq!(collection.len(), 5);
    assert_eq!(collection.to_string(), test_collection_sorted_str());
    assert_eq!(collection.kind_of("detail"), Some(ValueKind::Collection));
}

#[test]
fn from_map_accepts_typed_maps() {
    let source = BTreeMap::from([("beta", 2u8), ("alpha", 1u8)]);
    let collection = Collection::from_map(source);
    assert_eq!(collection.keys(), ["alpha", "beta"]);
    assert_eq!(collection.get("beta"), Some(&Value::Uint(2)));
}

#[test]
fn from_map_does_not_alias_the_source() {
    let mut nested = Object::new();
    nested.set("k", 1);
    let mut source: HashMap<String, Value> = HashMap::new();
    source.insert("nested".to_string(), Value::Object(nested));

    let collection = Collection::from_map(source.clone());
    source
        .get_mut("nested")
        .and_then(Value::as_object_mut)
        .unwrap()
        .set("k", 2);

    let converted = collection.get("nested").and_then(Value::as_collection).unwrap();
    assert_eq!(converted.get("k"), Some(&Value::Int(1)));
}

#[test]
fn from_value_accepts_maps_and_collections() {
    let object: Object = [("b", 1), ("a", 2)].into_iter().collect();
    let from_object = Collection::from_value(Value::Object(object)).unwrap();
    assert_eq!(from_object.keys(), ["a", "b"]);

    let from_collection = Collection::try_from(Value::Collection(test_collection())).unwrap();
    assert_eq!(from_collection, test_collection());
}

#[test]
fn from_value_rejects_non_maps() {
    let err = Collection::from_value(Value::from(vec![1, 2])).unwrap_err();
    assert!(
        matches!(err, StandardError::NonMap { found: ValueKind::Array }),
        "got {err:?}"
    );
    assert_eq!(err.to_string(), "expected a map-shaped value, found array");

    let err = Collection::from_json_value(serde_json::json!("text")).unwrap_err();
    assert!(matches!(err, StandardError::NonMap { found: ValueKind::String }));
}

#[test]
fn from_iterator_keeps_iteration_order() {
    let collection: Collection = vec![("z", 1), ("a", 2), ("z", 3)].into_iter().collect();
    assert_eq!(collection.keys(), ["z", "a"]);
    assert_eq!(collection.get("z"), Some(&Value::Int(3)));
}

#[test]
fn extend_uses_set_semantics() {
    let mut collection = Collection::new().with("a", 1).with("b", 2);
    collection.extend([("a", 10), ("c", 3)]);
    assert_eq!(collection.keys(), ["a", "b", "c"]);
    assert_eq!(collection.get("a"), Some(&Value::Int(10)));
}

// ============================================================================
// Mutators
// ============================================================================

#[test]
fn add_appends_and_replaces_at_end() {
    let mut collection = Collection::new();

    collection.add("alpha", "checked");
    assert_eq!(collection.to_string(), r#"{"alpha":"checked"}"#);

    // Same key does not double up.
    collection.add("alpha", "checked");
    assert_eq!(collection.to_string(), r#"{"alpha":"checked"}"#);

    collection.add("child", Collection::new());
    assert_eq!(collection.to_string(), r#"{"alpha":"checked","child":{}}"#);

    collection.add("retry", 1);
    assert_eq!(
        collection.to_string(),
        r#"{"alpha":"checked","child":{},"retry":1}"#
    );

    // Re-adding moves the key to the end.
    collection.add("child", Collection::new().with("test", "beta"));
    assert_eq!(
        collection.to_string(),
        r#"{"alpha":"checked","retry":1,"child":{"test":"beta"}}"#
    );
}

#[test]
fn set_appends_and_updates_in_place() {
    let mut collection = Collection::new();

    collection.set("alpha", "checked");
    assert_eq!(collection.to_string(), r#"{"alpha":"checked"}"#);

    collection.set("alpha", "checked");
    assert_eq!(collection.to_string(), r#"{"alpha":"checked"}"#);

    collection.set("child", Collection::new());
    collection.set("retry", 1);
    assert_eq!(
        collection.to_string(),
        r#"{"alpha":"checked","child":{},"retry":1}"#
    );

    // Re-setting keeps the original position.
    collection.set("child", Collection::new().with("test", "beta"));
    assert_eq!(
        collection.to_string(),
        r#"{"alpha":"checked","child":{"test":"beta"},"retry":1}"#
    );
}

#[test]
fn add_and_set_diverge_on_existing_keys() {
    let mut added = Collection::new().with("a", 1).with("b", 2);
    added.add("a", 3);
    assert_eq!(added.keys(), ["b", "a"]);

    let mut set = Collection::new().with("a", 1).with("b", 2);
    set.set("a", 3);
    assert_eq!(set.keys(), ["a", "b"]);

    assert_eq!(added.get("a"), set.get("a"));
}

#[test]
fn mutators_chain_on_the_same_instance() {
    let mut collection = Collection::new();
    let chained: *const Collection = collection.set("a", 1).add("b", 2).delete("a").clear();
    assert!(std::ptr::eq(chained, &collection));
}

#[test]
fn nested_child_is_edited_through_its_parent() {
    let mut collection = Collection::new().with("child", Collection::new()).with("retry", 1);
    collection
        .get_mut("child")
        .and_then(Value::as_collection_mut)
        .unwrap()
        .add("test", "beta");
    assert_eq!(
        collection.to_string(),
        r#"{"child":{"test":"beta"},"retry":1}"#
    );
}

#[test]
fn shared_child_added_after_insertion_is_visible_in_parent() {
    let child = SharedCollection::new();
    let mut parent = Collection::new();
    parent.add("child", child.clone()).add("retry", 1);

    child.add("test", "beta");
    assert_eq!(
        parent.to_string(),
        r#"{"child":{"test":"beta"},"retry":1}"#
    );
    assert_eq!(parent.kind_of("child"), Some(ValueKind::Collection));
}

#[test]
fn shared_child_set_after_insertion_is_visible_in_parent() {
    let child = SharedCollection::new();
    let mut parent = Collection::new();
    parent.set("child", child.clone()).set("retry", 1);

    child.set("test", "beta").set("test", "gamma");
    assert_eq!(
        parent.to_string(),
        r#"{"child":{"test":"gamma"},"retry":1}"#
    );
    assert_eq!(parent.to_json().unwrap(), parent.to_string());
}

#[test]
fn shared_child_edited_through_parent_is_visible_outside() {
    let child = SharedCollection::from(Collection::new().with("a", 1));
    let parent = Collection::new().with("child", child.clone());

    parent
        .get("child")
        .and_then(Value::as_shared)
        .unwrap()
        .delete("a")
        .set("b", 2);
    assert_eq!(child.borrow().keys(), ["b"]);
    assert!(parent.get("child").and_then(Value::as_shared).unwrap().ptr_eq(&child));
}

#[test]
fn owned_copy_of_a_shared_child_is_detached() {
    let child = SharedCollection::new();
    child.set("a", 1);
    let owned = Collection::try_from(Value::from(child.clone())).unwrap();

    child.clear();
    assert_eq!(owned.keys(), ["a"]);
    assert!(child.borrow().is_empty());
    assert_eq!(child.snapshot(), Collection::new());
}

#[test]
fn delete_removes_existing_key() {
    let mut collection = detail_collection();
    collection.delete("description");
    assert_eq!(collection.len(), 1);
    assert_eq!(
        collection.to_string(),
        format!(r#"{{"name":"{DETAIL_NAME}"}}"#)
    );
}

#[test]
fn delete_missing_key_is_a_no_op() {
    let mut collection = detail_collection();
    collection.delete("missing");
    assert_eq!(collection, detail_collection());
}

#[test]
fn clear_empties_the_collection() {
    let mut collection = test_collection();
    collection.clear();
    assert_eq!(collection.len(), 0);
    assert!(collection.keys().is_empty());
    assert_eq!(collection.to_string(), "{}");

    collection.clear();
    assert_eq!(collection.len(), 0);
}

// ============================================================================
// Accessors
// ============================================================================

#[test]
fn get_returns_value_or_none() {
    let collection = test_collection();
    assert_eq!(collection.get("invalid"), None);
    assert_eq!(
        collection.get("detail"),
        Some(&Value::Collection(detail_collection()))
    );
    assert_eq!(collection.get("pkg").and_then(Value::as_str), Some(PKG));
}

#[test]
fn has_reports_presence() {
    let collection = test_collection();
    assert!(!collection.has("invalid"));
    assert!(collection.has("detail"));
}

#[test]
fn has_all_requires_every_key() {
    let collection = test_collection();
    assert!(!collection.has_all(&["invalid", "detail"]));
    assert!(collection.has_all(&["detail", "pkg"]));
    assert!(collection.has_all(&[]));
}

#[test]
fn has_some_requires_any_key() {
    let collection = test_collection();
    assert!(!collection.has_some(&["invalid", "not-exist"]));
    assert!(collection.has_some(&["invalid", "detail"]));
    assert!(collection.has_some(&["detail", "pkg"]));
    assert!(!collection.has_some(&[]));
}

#[test]
fn index_of_follows_insertion_order() {
    let collection = test_collection();
    assert_eq!(collection.index_of("invalid"), None);
    assert_eq!(collection.index_of("detail"), Some(1));
    assert_eq!(collection.index_of("isPublic"), Some(4));
}

#[test]
fn keys_and_values_are_parallel() {
    let collection = test_collection();
    assert_eq!(
        collection.keys(),
        ["pkg", "detail", "version", "year", "isPublic"]
    );

    let expected = [
        Value::from(PKG),
        Value::Collection(detail_collection()),
        Value::Float(VERSION),
        Value::Int(2020),
        Value::Bool(true),
    ];
    let values: Vec<Value> = collection.values().into_iter().cloned().collect();
    assert_eq!(values, expected);
}

#[test]
fn pair_of_exposes_key_and_value() {
    let collection = test_collection();
    assert_eq!(collection.pair_of("pkg"), Some(&Pair::new("pkg", PKG)));
    assert_eq!(
        collection.pair_of("version"),
        Some(&Pair::new("version", VERSION))
    );

    let pair = collection.pair_of("year").unwrap();
    assert_eq!(pair.key(), "year");
    assert_eq!(pair.value(), &Value::Int(2020));
    assert_eq!(collection.pair_of("missing"), None);
}

#[test]
fn for_each_visits_in_insertion_order() {
    let collection = test_collection();
    let mut rendered = String::new();
    collection.for_each(|key, value| rendered.push_str(&format!("{key}:{value}\n")));
    assert_eq!(
        rendered,
        format!(
            "pkg:{PKG}\ndetail:{}\nversion:{VERSION}\nyear:{YEAR}\nisPublic:true\n",
            detail_str()
        )
    );
}

#[test]
fn iter_yields_pairs_in_order() {
    let collection = test_collection();
    let keys: Vec<&str> = (&collection).into_iter().map(Pair::key).collect();
    assert_eq!(keys, collection.keys());
}

#[test]
fn kinds_report_each_value_kind() {
    let collection = test_collection();
    assert_eq!(collection.kind_of("pkg"), Some(ValueKind::String));
    assert_eq!(collection.kind_of("missing"), None);

    let kinds = collection.kinds();
    assert_eq!(kinds.len(), collection.len());
    assert_eq!(kinds["version"], ValueKind::Float);
    assert_eq!(kinds["year"], ValueKind::Int);
    assert_eq!(kinds["isPublic"], ValueKind::Bool);
}

// ============================================================================
// Text and JSON forms
// ============================================================================

#[test]
fn display_scenario() {
    let mut collection = Collection::new();
    collection
        .set("pkg", "standard")
        .set("detail", Collection::new().with("name", "X"))
        .set("isPublic", true);
    assert_eq!(
        collection.to_string(),
        r#"{"pkg":"standard","detail":{"name":"X"},"isPublic":true}"#
    );
}

#[test]
fn display_escapes_strings_and_renders_nested_containers() {
    let collection = Collection::new()
        .with("quote", r#"say "hi""#)
        .with("list", Array::from_values([Value::from(1), Value::from("a")]))
        .with("none", Value::Null);
    assert_eq!(
        collection.to_string(),
        r#"{"quote":"say \"hi\"","list":[1,"a"],"none":null}"#
    );
}

#[test]
fn display_is_not_strict_json_for_non_finite_and_opaque_values() {
    let collection = Collection::new()
        .with("nan", f64::NAN)
        .with("handle", Opaque::new(42u8));
    assert_eq!(collection.to_string(), r#"{"nan":NaN,"handle":<opaque u8>}"#);
}

#[test]
fn to_json_preserves_insertion_order() {
    let collection = Collection::new().with("b", 1).with("a", "x");
    assert_eq!(collection.to_json().unwrap(), r#"{"b":1,"a":"x"}"#);
}

#[test]
fn to_json_rejects_values_without_json_form() {
    let err = Collection::new().with("nan", f64::NAN).to_json().unwrap_err();
    assert!(matches!(err, StandardError::Json(_)), "got {err:?}");

    let err = Collection::new()
        .with("handle", Opaque::new(()))
        .to_json()
        .unwrap_err();
    assert!(matches!(err, StandardError::Json(_)), "got {err:?}");
}

#[test]
fn deserialize_sorts_keys() {
    let collection: Collection = serde_json::from_str(r#"{"b":{"y":1,"x":2},"a":null}"#).unwrap();
    assert_eq!(collection.keys(), ["a", "b"]);
    assert_eq!(collection.get("a"), Some(&Value::Null));
    let nested = collection.get("b").and_then(Value::as_collection).unwrap();
    assert_eq!(nested.keys(), ["x", "y"]);
}
