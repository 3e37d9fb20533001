#![cfg(test)]

use genmsg_compiler::{
    compile_messages,
    error::GenError,
    parser::parse_message,
    types::{MessageRef, SchemaSet},
    verifier::verify_schema_set,
};

fn schema_set(sources: &[(&str, &str, &str)]) -> SchemaSet {
    sources
        .iter()
        .map(|(ns, name, text)| parse_message(ns, name, text, name).expect("parse_message failed"))
        .collect()
}

#[test]
fn test_dependency_order() {
    let set = schema_set(&[
        ("nav", "Route", "Leg[] legs\n"),
        ("nav", "Leg", "geo/Point start\ngeo/Point end\n"),
        ("geo", "Point", "float64 x\n"),
    ]);

    let order = verify_schema_set(&set).expect("verify_schema_set failed");
    let order: Vec<String> = order.iter().map(MessageRef::to_string).collect();
    assert_eq!(order, ["geo/Point", "nav/Leg", "nav/Route"]);
}

#[test]
fn test_recursive_types() {
    let err = compile_messages(&[
        ("demo", "Tree", "Node root\n"),
        ("demo", "Node", "uint8 value\nTree[] children\n"),
    ])
    .unwrap_err();
    match err {
        GenError::RecursiveType(cycle) => assert_eq!(cycle, "demo/Tree -> demo/Node -> demo/Tree"),
        other => panic!("unexpected error: {}", other),
    }

    let err = compile_messages(&[("demo", "Itself", "Itself[] more\n")]).unwrap_err();
    assert!(matches!(err, GenError::RecursiveType(_)), "{}", err);
}

#[test]
fn test_unresolved_nested_type() {
    let err = compile_messages(&[("demo", "Holder", "uint8 id\nMissing thing\n")]).unwrap_err();
    match err {
        GenError::UnsupportedType { message, field, type_name } => {
            assert_eq!(message, "demo/Holder");
            assert_eq!(field, "thing");
            assert_eq!(type_name, "demo/Missing");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_malformed_messages() {
    let err = compile_messages(&[("demo", "Empty", "# nothing but constants\nint32 ANSWER=42\n")]).unwrap_err();
    assert!(matches!(err, GenError::EmptyMessage(ref m) if m == "demo/Empty"), "{}", err);

    let err = compile_messages(&[("demo", "Twice", "uint8 a\nuint16 a\n")]).unwrap_err();
    assert!(matches!(err, GenError::DuplicateField { ref field, .. } if field == "a"), "{}", err);
}

#[test]
fn test_first_schema_wins() {
    let mut set = SchemaSet::new();
    assert!(set.insert(parse_message("demo", "A", "uint8 first\n", "a").expect("parse")));
    assert!(!set.insert(parse_message("demo", "A", "uint8 second\n", "b").expect("parse")));
    assert_eq!(set.len(), 1);
    let kept = set.get(&MessageRef::new("demo", "A")).expect("present");
    assert_eq!(kept.fields[0].name, "first");
}
