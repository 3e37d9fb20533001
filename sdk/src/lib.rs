//! genmsg
//!
//! Runtime support for generated message encoders, plus the generator entry
//! points for build scripts.
//!
//! - `Encode`, `WireWriter`, `WireError` used by generated Rust modules
//! - `generate` / `GenerateOptions` to emit encoders from `.msg` trees
//! - JSON helpers over encoder plans and the plan interpreter

pub use genmsg_compiler::error::GenError;
pub use genmsg_compiler::{generate, GenerateOptions, GenerationReport, Language};
pub use genmsg_schema::{Encode, Value, WireError, WirePrimitive, WireWriter, HEADER_LEN};

use genmsg_compiler::{value_from_json, EncoderCatalog, EncoderSet, Interpreter, MessageRef};

/// Pretty-printed JSON of a message's full and partial encoder plans.
pub fn plan_to_json(set: &EncoderSet) -> Result<String, GenError> {
    Ok(serde_json::to_string_pretty(set)?)
}

/// Encode a JSON document as `message` using the plans in `catalog`.
///
/// With `until` set, runs the partial encoder that stops before that field.
pub fn encode_json(
    catalog: &EncoderCatalog,
    message: &MessageRef,
    json: &str,
    until: Option<&str>,
    capacity: usize,
) -> Result<Vec<u8>, GenError> {
    let parsed: serde_json::Value = serde_json::from_str(json)?;
    let value = value_from_json(&parsed)?;

    let interpreter = Interpreter::new(catalog);
    let mut buf = vec![0u8; capacity];
    let encoded = match until {
        Some(field) => interpreter.encode_until(message, field, &value, &mut buf)?,
        None => interpreter.encode_full(message, &value, &mut buf)?,
    };
    buf.truncate(encoded.len);
    Ok(buf)
}

pub mod error {
    pub use genmsg_compiler::error::GenError;
    pub use genmsg_compiler::interp::EvalError;
    pub use genmsg_schema::WireError;
}

pub mod schema {
    pub use genmsg_compiler::types::{ConstantSpec, FieldSpec, MessageRef, MessageSchema, SchemaSet, TypeRef};
}
