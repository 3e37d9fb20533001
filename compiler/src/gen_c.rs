use std::path::PathBuf;

use crate::{
    compiler::GeneratedFile,
    dispatch::Arity,
    naming::{struct_symbol, uncamelcase},
    plan::{EncoderCatalog, EncoderPlan, EncoderSet, Step, COUNT_ALIGNMENT},
    registry::{PrimitiveKind, Strategy},
    types::{ConstantSpec, FieldSpec, MessageSchema, SchemaSet, TypeRef},
    utils::{quote, unquote},
};

/// Include path of a message type's header, `<pkg>/<normalized_name>.h`.
pub fn header_path(namespace: &str, type_name: &str) -> String {
    format!("{}/{}.h", namespace, uncamelcase(type_name))
}

fn c_type(field: &FieldSpec) -> String {
    match field.type_ {
        TypeRef::Primitive(kind) => kind.info().c_type.to_string(),
        TypeRef::Message(ref m)  => format!("struct {}", struct_symbol(&m.namespace, &m.type_name)),
    }
}

fn constant_literal(constant: &ConstantSpec) -> String {
    let value = constant.value.trim();
    match constant.kind {
        PrimitiveKind::Bool => {
            if matches!(value.to_ascii_lowercase().as_str(), "true" | "1") {
                "1".to_string()
            } else {
                "0".to_string()
            }
        }
        PrimitiveKind::String => quote(unquote(value)),
        _ => format!("({})", value),
    }
}

fn serialize_name(plan: &EncoderPlan) -> String {
    match plan.until {
        None => format!("serialize_{}", plan.symbol),
        Some(ref field) => format!("serialize_{}__until_{}", plan.symbol, field),
    }
}

fn signature(plan: &EncoderPlan) -> String {
    format!(
        "int32_t {}(const void *_msg, uint8_t *_buf, uint32_t _buf_size)",
        serialize_name(plan)
    )
}

/// Emits `<pkg>/<name>.h` and `src/<symbol>.c` for every message.
pub fn compile_schema_to_c(schemas: &SchemaSet, catalog: &EncoderCatalog) -> Vec<GeneratedFile> {
    let mut files = Vec::new();
    for set in catalog.iter() {
        let Some(schema) = schemas.get(&set.message) else {
            continue;
        };
        files.push(GeneratedFile {
            path:     PathBuf::from(header_path(&schema.namespace, &schema.name)),
            contents: generate_header(schema, set),
        });
        files.push(GeneratedFile {
            path:     PathBuf::from("src").join(format!("{}.c", set.symbol)),
            contents: generate_source(schema, set),
        });
    }
    files
}

/// The layout record, constants and encoder prototypes of one message.
pub fn generate_header(schema: &MessageSchema, set: &EncoderSet) -> String {
    let guard = format!("GENMSG_{}_H", set.symbol).to_uppercase();
    let mut out: Vec<String> = Vec::new();

    out.push(format!("/* Generated by genmsg from {}/{}.msg. Do not edit. */", schema.namespace, schema.name));
    out.push(format!("#ifndef {}", guard));
    out.push(format!("#define {}", guard));
    out.push("".to_string());
    out.push("#include <stdint.h>".to_string());
    out.push("#include <stdbool.h>".to_string());
    out.push("#include \"freertps/type.h\"".to_string());

    let mut includes: Vec<String> = Vec::new();
    for field in &schema.fields {
        if let TypeRef::Message(ref m) = field.type_ {
            let include = header_path(&m.namespace, &m.type_name);
            if !includes.contains(&include) {
                includes.push(include);
            }
        }
    }
    for include in &includes {
        out.push(format!("#include \"{}\"", include));
    }
    out.push("".to_string());

    if !schema.constants.is_empty() {
        for constant in &schema.constants {
            out.push(format!(
                "#define {}__{} {}",
                set.symbol.to_uppercase(),
                constant.name,
                constant_literal(constant)
            ));
        }
        out.push("".to_string());
    }

    // Member order mirrors the field list; sequences carry their count first.
    out.push(format!("typedef struct {}", set.symbol));
    out.push("{".to_string());
    for field in &schema.fields {
        let ty = c_type(field);
        match (field.is_array, field.array_size) {
            (false, _) => out.push(format!("  {} {};", ty, field.name)),
            (true, Some(n)) => out.push(format!("  {} {}[{}];", ty, field.name, n)),
            (true, None) => {
                out.push(format!("  uint32_t {};", field.size_member()));
                out.push(format!("  {} *{};", ty, field.name));
            }
        }
    }
    out.push(format!("}} {}_t;", set.symbol));
    out.push("".to_string());

    out.push(format!("extern const struct freertps_type {}__type;", set.symbol));
    out.push("".to_string());
    for plan in set.encoders() {
        out.push(format!("{};", signature(plan)));
    }
    out.push("".to_string());
    out.push("#endif".to_string());

    out.join("\n") + "\n"
}

/// The encoder routines and the type metadata record of one message.
pub fn generate_source(schema: &MessageSchema, set: &EncoderSet) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push(format!("/* Generated by genmsg from {}/{}.msg. Do not edit. */", schema.namespace, schema.name));
    out.push("#include \"freertps/type.h\"".to_string());
    out.push("#include <string.h>".to_string());
    out.push(format!("#include \"{}\"", header_path(&schema.namespace, &schema.name)));
    out.push("".to_string());
    out.push("#define GENMSG_RESERVE(n) \\".to_string());
    out.push("  do { if ((uint64_t)(_end - _wpos) < (uint64_t)(n)) return -1; } while (0)".to_string());
    out.push("#define GENMSG_ALIGN(a) \\".to_string());
    out.push("  do { \\".to_string());
    out.push("    uint32_t _pad = (uint32_t)(((a) - ((uintptr_t)(_wpos - _buf) & ((a) - 1))) & ((a) - 1)); \\".to_string());
    out.push("    GENMSG_RESERVE(_pad); \\".to_string());
    out.push("    memset(_wpos, 0, _pad); \\".to_string());
    out.push("    _wpos += _pad; \\".to_string());
    out.push("  } while (0)".to_string());
    out.push("".to_string());

    for plan in set.encoders() {
        out.extend(encoder_function(schema, plan));
        out.push("".to_string());
    }

    out.push(format!("const struct freertps_type {}__type =", set.symbol));
    out.push("{".to_string());
    out.push(format!("  .rtps_typename = {},", quote(&set.wire_type_name)));
    out.push(format!("  .serialize = {}", serialize_name(&set.full)));
    out.push("};".to_string());

    out.join("\n") + "\n"
}

fn encoder_function(schema: &MessageSchema, plan: &EncoderPlan) -> Vec<String> {
    let mut lines = vec![
        signature(plan),
        "{".to_string(),
        format!("  const struct {0} *p = (const struct {0} *)_msg;", plan.symbol),
        "  uint8_t *_wpos = _buf;".to_string(),
        "  uint8_t * const _end = _buf + _buf_size;".to_string(),
    ];

    for step in &plan.prologue {
        lines.extend(render_step(step, None));
    }
    for field_plan in &plan.fields {
        let field = schema.fields.iter().find(|f| f.name == field_plan.field);
        for step in &field_plan.steps {
            lines.extend(render_step(step, field));
        }
    }

    lines.push("  return (int32_t)(_wpos - _buf);".to_string());
    lines.push("}".to_string());
    lines
}

/// Statements writing one value, `value` being a C lvalue expression.
fn write_value(kind: PrimitiveKind, value: &str, indent: &str) -> Vec<String> {
    match kind.strategy() {
        Strategy::Boolean => vec![
            format!("{}GENMSG_RESERVE(1);", indent),
            format!("{}*_wpos++ = {} ? 1 : 0;", indent, value),
        ],
        Strategy::FixedWidth { width } => vec![
            format!("{}GENMSG_RESERVE({});", indent, width),
            format!("{}memcpy(_wpos, &{}, {});", indent, value, width),
            format!("{}_wpos += {};", indent, width),
        ],
        Strategy::LengthPrefixed => vec![
            format!("{}{{", indent),
            format!("{}  uint32_t _len = (uint32_t)strlen({}) + 1;", indent, value),
            format!("{}  GENMSG_RESERVE(4 + (uint64_t)_len);", indent),
            format!("{}  memcpy(_wpos, &_len, 4);", indent),
            format!("{}  _wpos += 4;", indent),
            format!("{}  memcpy(_wpos, {}, _len);", indent, value),
            format!("{}  _wpos += _len;", indent),
            format!("{}}}", indent),
        ],
    }
}

fn render_step(step: &Step, field: Option<&FieldSpec>) -> Vec<String> {
    let name = field.map_or("", |f| f.name.as_str());
    let member = format!("p->{}", name);
    let size_member = format!("p->{}_size", name);

    match step {
        Step::Header { len } => vec![
            format!("  GENMSG_RESERVE({});", len),
            format!("  memset(_wpos, 0, {});", len),
            format!("  _wpos += {};", len),
        ],
        Step::Pad { align } => vec![format!("  GENMSG_ALIGN({});", align)],
        Step::Write { kind } => write_value(*kind, &member, "  "),
        Step::WriteArray { kind, len } => match kind.strategy() {
            Strategy::FixedWidth { width } => vec![
                format!("  GENMSG_RESERVE({} * {});", len, width),
                format!("  memcpy(_wpos, {}, {} * {});", member, len, width),
                format!("  _wpos += {} * {};", len, width),
            ],
            _ => element_loop(name, &len.to_string(), write_value(*kind, &format!("{}[_{}_idx]", member, name), "    ")),
        },
        Step::WriteCount => vec![
            "  GENMSG_RESERVE(4);".to_string(),
            format!("  memcpy(_wpos, &{}, 4);", size_member),
            "  _wpos += 4;".to_string(),
        ],
        Step::WriteBulk { kind } => match kind.strategy() {
            Strategy::FixedWidth { width } => vec![
                format!("  GENMSG_RESERVE((uint64_t){} * {});", size_member, width),
                format!("  memcpy(_wpos, {}, (size_t){} * {});", member, size_member, width),
                format!("  _wpos += (size_t){} * {};", size_member, width),
            ],
            _ => element_loop(name, &size_member, write_value(*kind, &format!("{}[_{}_idx]", member, name), "    ")),
        },
        Step::StringLoop { len } => {
            let count = len.map_or_else(|| size_member.clone(), |n| n.to_string());
            let mut body = vec![format!("    GENMSG_ALIGN({});", COUNT_ALIGNMENT)];
            body.extend(write_value(PrimitiveKind::String, &format!("{}[_{}_idx]", member, name), "    "));
            element_loop(name, &count, body)
        }
        Step::Delegate { symbol, arity, .. } => {
            let call = |target: String, indent: &str| {
                vec![
                    format!("{}{{", indent),
                    format!(
                        "{}  int32_t _n = serialize_{}(&{}, _wpos, (uint32_t)(_end - _wpos));",
                        indent, symbol, target
                    ),
                    format!("{}  if (_n < 0) return -1;", indent),
                    format!("{}  _wpos += _n;", indent),
                    format!("{}}}", indent),
                ]
            };
            match arity {
                Arity::Single => call(member.clone(), "  "),
                Arity::Fixed(n) => element_loop(name, &n.to_string(), call(format!("{}[_{}_idx]", member, name), "    ")),
                Arity::Sequence => element_loop(name, &size_member, call(format!("{}[_{}_idx]", member, name), "    ")),
            }
        }
    }
}

fn element_loop(name: &str, count: &str, body: Vec<String>) -> Vec<String> {
    let mut lines = vec![
        format!("  for (uint32_t _{0}_idx = 0; _{0}_idx < {1}; _{0}_idx++)", name, count),
        "  {".to_string(),
    ];
    lines.extend(body);
    lines.push("  }".to_string());
    lines
}
