#![cfg(test)]

use genmsg_compiler::{
    error::GenError,
    naming::{partial_encoder_name, struct_symbol, uncamelcase, wire_type_name},
    parser::{parse_message, resolve_type_tag},
    registry::{PrimitiveKind, Strategy},
    types::{MessageRef, TypeRef},
};

#[test]
fn test_parse_message() {
    let input = r#"
    # A device status report.
    uint8 MODE_IDLE=0
    string GREETING=hello # world

    Header header
    bool active          # trailing comment
    float64[3] position
    int8[] samples
    string<=16 label
    uint32[<=8] recent
    geometry_msgs/Point target
    Point local
    int32 retries 5
    "#;

    let schema = parse_message("demo_msgs", "Status", input, "Status.msg").expect("parse_message failed");

    // Check constants
    assert_eq!(schema.constants.len(), 2);
    assert_eq!(schema.constants[0].kind, PrimitiveKind::UInt8);
    assert_eq!(schema.constants[0].name, "MODE_IDLE");
    assert_eq!(schema.constants[0].value, "0");
    assert_eq!(schema.constants[1].kind, PrimitiveKind::String);
    assert_eq!(schema.constants[1].value, "hello # world");

    // Check fields, in declaration order
    let names: Vec<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        ["header", "active", "position", "samples", "label", "recent", "target", "local", "retries"]
    );

    let header = &schema.fields[0];
    assert_eq!(header.type_, TypeRef::Message(MessageRef::new("std_msgs", "Header")));
    assert!(!header.is_array);

    let position = &schema.fields[2];
    assert_eq!(position.type_, TypeRef::Primitive(PrimitiveKind::Float64));
    assert!(position.is_array);
    assert_eq!(position.array_size, Some(3));

    let samples = &schema.fields[3];
    assert!(samples.is_array);
    assert_eq!(samples.array_size, None);

    let label = &schema.fields[4];
    assert_eq!(label.type_, TypeRef::Primitive(PrimitiveKind::String));
    assert!(!label.is_array);

    let recent = &schema.fields[5];
    assert!(recent.is_array);
    assert_eq!(recent.array_size, None);
    assert_eq!(recent.upper_bound, Some(8));

    assert_eq!(schema.fields[6].type_, TypeRef::Message(MessageRef::new("geometry_msgs", "Point")));
    assert_eq!(schema.fields[7].type_, TypeRef::Message(MessageRef::new("demo_msgs", "Point")));

    // Default values are accepted and ignored
    assert_eq!(schema.fields[8].type_, TypeRef::Primitive(PrimitiveKind::Int32));
    assert_eq!(schema.fields[8].line, 14);
}

#[test]
fn test_parse_rejects_unknown_type() {
    let err = parse_message("demo_msgs", "Bad", "complex128 z\n", "Bad.msg").unwrap_err();
    match err {
        GenError::UnsupportedType { message, field, type_name } => {
            assert_eq!(message, "demo_msgs/Bad");
            assert_eq!(field, "z");
            assert_eq!(type_name, "complex128");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_parse_rejects_malformed_lines() {
    let err = parse_message("demo_msgs", "Bad", "bool ok\nint32[0] empty\n", "Bad.msg").unwrap_err();
    assert!(matches!(err, GenError::Parse { line: 2, .. }), "{}", err);

    let err = parse_message("demo_msgs", "Bad", "just_one_token\n", "Bad.msg").unwrap_err();
    assert!(matches!(err, GenError::Parse { line: 1, .. }), "{}", err);

    let err = parse_message("demo_msgs", "Bad", "int32<=4 bounded\n", "Bad.msg").unwrap_err();
    assert!(matches!(err, GenError::Parse { line: 1, .. }), "{}", err);
}

#[test]
fn test_resolve_type_tag() {
    assert_eq!(resolve_type_tag("uint64", "pkg"), Some(TypeRef::Primitive(PrimitiveKind::UInt64)));
    assert_eq!(resolve_type_tag("Header", "pkg"), Some(TypeRef::Message(MessageRef::new("std_msgs", "Header"))));
    assert_eq!(resolve_type_tag("Pose", "pkg"), Some(TypeRef::Message(MessageRef::new("pkg", "Pose"))));
    assert_eq!(resolve_type_tag("other/Pose", "pkg"), Some(TypeRef::Message(MessageRef::new("other", "Pose"))));
    assert_eq!(resolve_type_tag("wstring", "pkg"), None);
}

#[test]
fn test_registry() {
    assert_eq!(PrimitiveKind::from_tag("float32"), Some(PrimitiveKind::Float32));
    assert_eq!(PrimitiveKind::from_tag("time"), None);

    // Every fixed-width primitive is aligned to its own width
    for tag in ["bool", "byte", "char", "int8", "uint8", "int16", "uint16", "int32", "uint32", "int64", "uint64", "float32", "float64"] {
        let kind = PrimitiveKind::from_tag(tag).expect("registered");
        assert_eq!(kind.tag(), tag);
        assert_eq!(kind.width(), Some(kind.alignment()), "{}", tag);
    }

    assert_eq!(PrimitiveKind::Bool.strategy(), Strategy::Boolean);
    assert_eq!(PrimitiveKind::Int16.strategy(), Strategy::FixedWidth { width: 2 });
    assert_eq!(PrimitiveKind::String.strategy(), Strategy::LengthPrefixed);
    assert_eq!(PrimitiveKind::String.width(), None);
    assert_eq!(PrimitiveKind::String.alignment(), 1);
    assert!(PrimitiveKind::Char.is_signed());
    assert!(!PrimitiveKind::Byte.is_signed());
}

#[test]
fn test_uncamelcase() {
    assert_eq!(uncamelcase("NavSatStatus"), "nav_sat_status");
    assert_eq!(uncamelcase("UInt32MultiArray"), "u_int32_multi_array");
    assert_eq!(uncamelcase("MultiDOFJointState"), "multi_dof_joint_state");
    assert_eq!(uncamelcase("Point"), "point");
    assert_eq!(uncamelcase("TF2Error"), "tf2_error");
    assert_eq!(uncamelcase("nav_sat_status"), "nav_sat_status");
    assert_eq!(uncamelcase(""), "");

    // A run of capitals with nothing after it stays one word
    assert_eq!(uncamelcase("IMU"), "imu");
    assert_eq!(uncamelcase("GPS"), "gps");
    assert_eq!(uncamelcase("GPSFix"), "gps_fix");
}

#[test]
fn test_uncamelcase_idempotent() {
    for name in ["NavSatStatus", "UInt32MultiArray", "MultiDOFJointState", "TF2Error", "IMU", "GPSFix", "Point"] {
        let once = uncamelcase(name);
        assert_eq!(uncamelcase(&once), once, "{}", name);
        assert_eq!(uncamelcase(name), once, "{}", name);
    }
}

#[test]
fn test_constant_values_match_their_type() {
    let ok = "int32 A=-5\nuint8 B=255\nfloat32 C=1.5e3\nfloat64 D=2\nbool E=True\nchar F=65\nstring G=anything # goes\nuint8 x\n";
    let schema = parse_message("demo", "Consts", ok, "Consts.msg").expect("parse_message failed");
    assert_eq!(schema.constants.len(), 7);

    for (line, text) in [
        (1, "int32 X=abc\n"),
        (1, "uint8 X=256\n"),
        (1, "uint16 X=-1\n"),
        (1, "int8 X=+1\n"),
        (1, "float64 X=inf\n"),
        (1, "float64 X=.5\n"),
        (1, "float32 X=1e40\n"),
        (1, "bool X=yes\n"),
        (2, "uint8 ok\nint64 X=1.0\n"),
    ] {
        let err = parse_message("demo", "Bad", text, "Bad.msg").unwrap_err();
        match err {
            GenError::Parse { line: at, ref msg, .. } => {
                assert_eq!(at, line, "{}", text);
                assert!(msg.contains("Constant X"), "{}", msg);
            }
            other => panic!("unexpected error for {:?}: {}", text, other),
        }
    }
}

#[test]
fn test_symbols() {
    assert_eq!(struct_symbol("sensor_msgs", "NavSatStatus"), "sensor_msgs__nav_sat_status");
    assert_eq!(wire_type_name("sensor_msgs", "NavSatStatus"), "sensor_msgs::msg::dds_::NavSatStatus_");
    assert_eq!(partial_encoder_name("status"), "encode_until_status");
}
