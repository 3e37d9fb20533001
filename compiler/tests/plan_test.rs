#![cfg(test)]

use genmsg_compiler::{
    compile_message, compile_messages,
    dispatch::Arity,
    error::GenError,
    plan::{plan_encoder, plan_field, span_alignment, AlignmentCursor, Step},
    registry::PrimitiveKind,
    types::{FieldSpec, MessageRef, MessageSchema, TypeRef},
};

const MIXED: &str = r#"
bool flag
float64 value
uint16[3] triple
string name
int32[] counts
string[] tags
"#;

fn prim(kind: PrimitiveKind) -> TypeRef {
    TypeRef::Primitive(kind)
}

#[test]
fn test_single_bool() {
    let set = compile_message("demo", "Flag", "bool flag\n").expect("compile_message failed");

    assert_eq!(set.symbol, "demo__flag");
    assert_eq!(set.wire_type_name, "demo::msg::dds_::Flag_");
    assert!(set.partials.is_empty());

    let full = &set.full;
    assert!(full.is_full());
    assert_eq!(full.name, "encode");
    assert_eq!(full.prologue, vec![Step::Header { len: 4 }]);
    assert_eq!(full.fields.len(), 1);
    assert_eq!(full.fields[0].steps, vec![Step::Write { kind: PrimitiveKind::Bool }]);
    assert_eq!(full.trailing_alignment(), AlignmentCursor(1));
}

#[test]
fn test_guard_after_bool() {
    let set = compile_message("demo", "Pair", "bool flag\nuint32 count\n").expect("compile_message failed");

    let count = &set.full.fields[1];
    assert_eq!(count.steps, vec![Step::Pad { align: 4 }, Step::Write { kind: PrimitiveKind::UInt32 }]);
    assert_eq!(count.align_after, AlignmentCursor(4));
}

#[test]
fn test_guard_elided_after_header() {
    // The header leaves the cursor 4-aligned
    let set = compile_message("demo", "Count", "uint32 count\nint8[] samples\n").expect("compile_message failed");

    assert_eq!(set.full.fields[0].steps, vec![Step::Write { kind: PrimitiveKind::UInt32 }]);
    assert_eq!(
        set.full.fields[1].steps,
        vec![Step::WriteCount, Step::WriteBulk { kind: PrimitiveKind::Int8 }]
    );
    assert_eq!(set.full.fields[1].align_after, AlignmentCursor(1));
}

#[test]
fn test_mixed_plan() {
    let set = compile_message("demo", "Mixed", MIXED).expect("compile_message failed");
    let fields = &set.full.fields;

    assert_eq!(fields[0].steps, vec![Step::Write { kind: PrimitiveKind::Bool }]);
    assert_eq!(fields[0].align_after, AlignmentCursor(1));

    assert_eq!(fields[1].steps, vec![Step::Pad { align: 8 }, Step::Write { kind: PrimitiveKind::Float64 }]);
    assert_eq!(fields[1].align_after, AlignmentCursor(8));

    // Three 2-byte elements entered at 8 leave a 2-aligned cursor
    assert_eq!(fields[2].steps, vec![Step::WriteArray { kind: PrimitiveKind::UInt16, len: 3 }]);
    assert_eq!(fields[2].align_after, AlignmentCursor(2));

    assert_eq!(fields[3].steps, vec![Step::Write { kind: PrimitiveKind::String }]);
    assert_eq!(fields[3].align_after, AlignmentCursor(1));

    assert_eq!(
        fields[4].steps,
        vec![Step::Pad { align: 4 }, Step::WriteCount, Step::WriteBulk { kind: PrimitiveKind::Int32 }]
    );
    assert_eq!(fields[4].align_after, AlignmentCursor(4));

    assert_eq!(fields[5].steps, vec![Step::WriteCount, Step::StringLoop { len: None }]);
    assert_eq!(fields[5].align_after, AlignmentCursor(1));
}

#[test]
fn test_fixed_array_alignment() {
    let doubles = FieldSpec::fixed("d", prim(PrimitiveKind::Float64), 2);
    let plan = plan_field(&doubles, AlignmentCursor(4));
    assert_eq!(plan.steps[0], Step::Pad { align: 8 });
    assert_eq!(plan.align_after, AlignmentCursor(8));

    // An odd number of bytes says nothing past 1
    let bytes = FieldSpec::fixed("b", prim(PrimitiveKind::UInt8), 3);
    let plan = plan_field(&bytes, AlignmentCursor(8));
    assert_eq!(plan.steps, vec![Step::WriteArray { kind: PrimitiveKind::UInt8, len: 3 }]);
    assert_eq!(plan.align_after, AlignmentCursor(1));

    // Entering alignment bounds the claim
    let words = FieldSpec::fixed("w", prim(PrimitiveKind::UInt8), 8);
    assert_eq!(plan_field(&words, AlignmentCursor(2)).align_after, AlignmentCursor(2));

    let strings = FieldSpec::fixed("s", prim(PrimitiveKind::String), 2);
    let plan = plan_field(&strings, AlignmentCursor(8));
    assert_eq!(plan.steps, vec![Step::StringLoop { len: Some(2) }]);
    assert_eq!(plan.align_after, AlignmentCursor::UNKNOWN);
}

#[test]
fn test_sequence_of_wide_elements() {
    // Elements follow a 4-aligned count, so only 4 is known afterwards
    let seq = FieldSpec::sequence("v", prim(PrimitiveKind::Float64));
    let plan = plan_field(&seq, AlignmentCursor(1));
    assert_eq!(
        plan.steps,
        vec![Step::Pad { align: 4 }, Step::WriteCount, Step::WriteBulk { kind: PrimitiveKind::Float64 }]
    );
    assert_eq!(plan.align_after, AlignmentCursor(4));
}

#[test]
fn test_span_alignment() {
    assert_eq!(span_alignment(0), 8);
    assert_eq!(span_alignment(24), 8);
    assert_eq!(span_alignment(12), 4);
    assert_eq!(span_alignment(6), 2);
    assert_eq!(span_alignment(7), 1);
}

#[test]
fn test_nested_plan() {
    let (_, catalog) = compile_messages(&[
        ("geo", "Point", "float64 x\nfloat64 y\n"),
        ("geo", "Path", "uint8 id\nPoint start\nPoint[2] ends\nPoint[] rest\nuint32 tail\n"),
    ])
    .expect("compile_messages failed");

    let path = catalog.get(&MessageRef::new("geo", "Path")).expect("Path planned");
    let fields = &path.full.fields;
    let point = MessageRef::new("geo", "Point");

    for (field, arity) in [(1, Arity::Single), (2, Arity::Fixed(2)), (3, Arity::Sequence)] {
        assert_eq!(
            fields[field].steps,
            vec![Step::Delegate { message: point.clone(), symbol: "geo__point".to_string(), arity }]
        );
        assert_eq!(fields[field].align_after, AlignmentCursor::UNKNOWN);
    }

    // Nothing is known after a nested value
    assert_eq!(fields[4].steps, vec![Step::Pad { align: 4 }, Step::Write { kind: PrimitiveKind::UInt32 }]);

    // Nested types are planned before the types that contain them
    let order: Vec<String> = catalog.iter().map(|s| s.message.to_string()).collect();
    assert_eq!(order, ["geo/Point", "geo/Path"]);
}

#[test]
fn test_partial_encoders() {
    let set = compile_message("demo", "Mixed", MIXED).expect("compile_message failed");

    let names: Vec<&str> = set.partials.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        ["encode_until_value", "encode_until_triple", "encode_until_name", "encode_until_counts", "encode_until_tags"]
    );

    // Each partial plan is the full plan truncated before its field
    for (cut, partial) in set.partials.iter().enumerate().map(|(i, p)| (i + 1, p)) {
        assert_eq!(partial.until.as_deref(), Some(set.full.fields[cut].field.as_str()));
        assert_eq!(partial.prologue, set.full.prologue);
        assert_eq!(partial.fields[..], set.full.fields[..cut]);
    }

    assert!(set.partial("tags").is_some());
    assert!(set.partial("flag").is_none());
    assert_eq!(set.encoders().count(), 6);
}

#[test]
fn test_invalid_cuts() {
    let schema = MessageSchema::new(
        "demo",
        "Two",
        vec![
            FieldSpec::scalar("a", prim(PrimitiveKind::UInt8)),
            FieldSpec::scalar("b", prim(PrimitiveKind::UInt8)),
        ],
    );

    assert!(plan_encoder(&schema, Some(1)).is_ok());
    assert!(matches!(plan_encoder(&schema, Some(0)), Err(GenError::InvalidCut { index: 0, len: 2, .. })));
    assert!(matches!(plan_encoder(&schema, Some(2)), Err(GenError::InvalidCut { index: 2, len: 2, .. })));

    let empty = MessageSchema::new("demo", "Empty", Vec::new());
    assert!(matches!(plan_encoder(&empty, None), Err(GenError::EmptyMessage(_))));
}

#[test]
fn test_plan_is_deterministic() {
    let a = compile_message("demo", "Mixed", MIXED).expect("compile_message failed");
    let b = compile_message("demo", "Mixed", MIXED).expect("compile_message failed");
    assert_eq!(a, b);
}
