use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::{
    compiler::GeneratedFile,
    dispatch::Arity,
    naming::{escape_rust_keyword, uncamelcase},
    plan::{EncoderCatalog, EncoderPlan, EncoderSet, Step, COUNT_ALIGNMENT},
    registry::PrimitiveKind,
    types::{ConstantSpec, FieldSpec, MessageSchema, SchemaSet, TypeRef},
    utils::{quote, unquote},
};

/// Maps a field's schema type to its Rust type.
/// Nested messages are addressed from the message's own module, two levels
/// below the generated root.
fn map_type(field: &FieldSpec) -> String {
    let element = match field.type_ {
        TypeRef::Primitive(kind) => kind.info().rust_type.to_string(),
        TypeRef::Message(ref m)  => format!("super::super::{}::{}", escape_rust_keyword(&m.namespace), m.type_name),
    };
    match (field.is_array, field.array_size) {
        (false, _)      => element,
        (true, Some(n)) => format!("[{}; {}]", element, n),
        (true, None)    => format!("Vec<{}>", element),
    }
}

/// Rust literal for a constant's value.
fn constant_literal(constant: &ConstantSpec) -> String {
    let value = constant.value.trim();
    match constant.kind {
        PrimitiveKind::Bool => {
            if matches!(value.to_ascii_lowercase().as_str(), "true" | "1") {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }
        PrimitiveKind::String => quote(unquote(value)),
        kind if kind.is_float() => {
            if value.contains(|c| matches!(c, '.' | 'e' | 'E')) {
                value.to_string()
            } else {
                format!("{}.0", value)
            }
        }
        _ => value.to_string(),
    }
}

fn constant_type(constant: &ConstantSpec) -> &'static str {
    match constant.kind {
        PrimitiveKind::String => "&'static str",
        kind                  => kind.info().rust_type,
    }
}

/// Module name of a message type, its normalized name with keywords escaped.
pub fn module_name(schema: &MessageSchema) -> String {
    escape_rust_keyword(&uncamelcase(&schema.name))
}

/// Module name of a package.
pub fn package_module(namespace: &str) -> String {
    escape_rust_keyword(namespace)
}

/// Emits one module per message, a `mod.rs` per package and a root `mod.rs`.
pub fn compile_schema_to_rust(schemas: &SchemaSet, catalog: &EncoderCatalog) -> Vec<GeneratedFile> {
    let mut files = Vec::new();
    let mut packages: BTreeMap<String, Vec<(String, &str)>> = BTreeMap::new();

    for set in catalog.iter() {
        let Some(schema) = schemas.get(&set.message) else {
            continue;
        };
        let module = module_name(schema);
        files.push(GeneratedFile {
            path:     PathBuf::from(package_module(&schema.namespace)).join(format!("{}.rs", module)),
            contents: generate_message(schema, set),
        });
        packages
            .entry(package_module(&schema.namespace))
            .or_default()
            .push((module, schema.name.as_str()));
    }

    let mut root = vec!["// Generated by genmsg. Do not edit.".to_string(), "".to_string()];
    for (package, mut modules) in packages {
        modules.sort();
        let mut lines = vec!["// Generated by genmsg. Do not edit.".to_string(), "".to_string()];
        for (module, _) in &modules {
            lines.push(format!("mod {};", module));
        }
        lines.push("".to_string());
        for (module, type_name) in &modules {
            lines.push(format!("pub use {}::{};", module, type_name));
        }
        files.push(GeneratedFile {
            path:     PathBuf::from(&package).join("mod.rs"),
            contents: lines.join("\n") + "\n",
        });
        root.push(format!("pub mod {};", package));
    }
    files.push(GeneratedFile {
        path:     PathBuf::from("mod.rs"),
        contents: root.join("\n") + "\n",
    });

    files
}

/// Generates the module of one message type: the struct, its `Default` and
/// `Encode` implementations, and the partial encoders.
pub fn generate_message(schema: &MessageSchema, set: &EncoderSet) -> String {
    let name = &schema.name;
    let mut out: Vec<String> = Vec::new();

    out.push(format!("// Generated by genmsg from {}/{}.msg. Do not edit.", schema.namespace, name));
    out.push("".to_string());
    out.push("#![allow(dead_code)]".to_string());
    out.push("".to_string());
    out.push("use genmsg::{Encode, WireError, WireWriter};".to_string());
    out.push("".to_string());

    // Layout: one member per field, in schema order.
    out.push("#[derive(Debug, Clone, PartialEq)]".to_string());
    out.push(format!("pub struct {} {{", name));
    for field in &schema.fields {
        out.push(format!("    pub {}: {},", escape_rust_keyword(&field.name), map_type(field)));
    }
    out.push("}".to_string());
    out.push("".to_string());

    out.push(format!("impl Default for {} {{", name));
    out.push("    fn default() -> Self {".to_string());
    out.push(format!("        {} {{", name));
    for field in &schema.fields {
        let init = if field.array_size.is_some() {
            "std::array::from_fn(|_| Default::default())"
        } else {
            "Default::default()"
        };
        out.push(format!("            {}: {},", escape_rust_keyword(&field.name), init));
    }
    out.push("        }".to_string());
    out.push("    }".to_string());
    out.push("}".to_string());

    if !schema.constants.is_empty() || !set.partials.is_empty() {
        out.push("".to_string());
        out.push(format!("impl {} {{", name));
        for constant in &schema.constants {
            out.push(format!(
                "    pub const {}: {} = {};",
                constant.name,
                constant_type(constant),
                constant_literal(constant)
            ));
        }
        for (i, partial) in set.partials.iter().enumerate() {
            if i > 0 || !schema.constants.is_empty() {
                out.push("".to_string());
            }
            if let Some(ref until) = partial.until {
                out.push(format!("    /// Encodes every field before `{}`.", until));
            }
            out.push(format!(
                "    pub fn {}(&self, buf: &mut [u8]) -> Result<usize, WireError> {{",
                partial.name
            ));
            out.extend(encoder_body(partial));
            out.push("    }".to_string());
        }
        out.push("}".to_string());
    }

    out.push("".to_string());
    out.push(format!("impl Encode for {} {{", name));
    out.push(format!("    const TYPE_NAME: &'static str = {};", quote(&set.wire_type_name)));
    out.push("".to_string());
    out.push("    fn encode(&self, buf: &mut [u8]) -> Result<usize, WireError> {".to_string());
    out.extend(encoder_body(&set.full));
    out.push("    }".to_string());
    out.push("}".to_string());

    out.join("\n") + "\n"
}

/// Body lines of one encoder method, indented for an `impl` block.
fn encoder_body(plan: &EncoderPlan) -> Vec<String> {
    let mut lines = vec!["        let mut w = WireWriter::new(buf);".to_string()];

    for step in &plan.prologue {
        lines.extend(render_step(step, ""));
    }
    for field_plan in &plan.fields {
        let member = format!("self.{}", escape_rust_keyword(&field_plan.field));
        for step in &field_plan.steps {
            lines.extend(render_step(step, &member));
        }
    }

    lines.push("        Ok(w.position())".to_string());
    lines
}

fn render_step(step: &Step, member: &str) -> Vec<String> {
    const I: &str = "        ";
    match step {
        Step::Header { .. } => vec![format!("{}w.write_header()?;", I)],
        Step::Pad { align } => vec![format!("{}w.align({})?;", I, align)],
        Step::Write { kind } if kind.is_string() => vec![format!("{}w.write_string(&{})?;", I, member)],
        Step::Write { .. } => vec![format!("{}w.write({})?;", I, member)],
        Step::WriteArray { .. } | Step::WriteBulk { .. } => vec![format!("{}w.write_array(&{}[..])?;", I, member)],
        Step::WriteCount => vec![format!("{}w.write_count({}.len())?;", I, member)],
        Step::StringLoop { .. } => vec![
            format!("{}for item in {}.iter() {{", I, member),
            format!("{}    w.align({})?;", I, COUNT_ALIGNMENT),
            format!("{}    w.write_string(item)?;", I),
            format!("{}}}", I),
        ],
        Step::Delegate { arity: Arity::Single, .. } => {
            vec![format!("{}{}.encode_nested(&mut w)?;", I, member)]
        }
        Step::Delegate { .. } => {
            vec![
                format!("{}for item in {}.iter() {{", I, member),
                format!("{}    item.encode_nested(&mut w)?;", I),
                format!("{}}}", I),
            ]
        }
    }
}
