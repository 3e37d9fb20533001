//! Executes encoder plans against dynamic [`Value`]s.
//!
//! The interpreter writes through the same [`WireWriter`] the generated Rust
//! encoders use, so its output is the reference encoding for a plan. It also
//! records where every field ended, which is what the alignment claims of a
//! plan are checked against.

use genmsg_schema::{Value, WireError, WireWriter};
use serde::Serialize;
use thiserror::Error;

use crate::{
    dispatch::Arity,
    plan::{EncoderCatalog, EncoderPlan, Step, COUNT_ALIGNMENT},
    registry::PrimitiveKind,
    types::MessageRef,
};

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Missing field {field} in {message}")]
    MissingField { message: String, field: String },

    #[error("Field {field} of {message}: expected {expected}, found {found}")]
    TypeMismatch {
        message:  String,
        field:    String,
        expected: &'static str,
        found:    &'static str,
    },

    #[error("Field {field} of {message}: value does not fit {kind}")]
    OutOfRange {
        message: String,
        field:   String,
        kind:    &'static str,
    },

    #[error("Field {field} of {message}: expected {expected} elements, found {found}")]
    LengthMismatch {
        message:  String,
        field:    String,
        expected: usize,
        found:    usize,
    },

    #[error("No encoder for {0}")]
    UnknownEncoder(String),

    #[error("No partial encoder of {message} stops before {field}")]
    UnknownCut { message: String, field: String },

    #[error("JSON null is not a message value")]
    NullValue,

    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Where a field's encoding ended and what the plan claimed about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMark {
    pub field:       String,
    pub end_offset:  usize,
    pub align_after: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Encoded {
    /// Bytes written, header included.
    pub len:   usize,
    pub marks: Vec<FieldMark>,
}

struct Ctx<'p> {
    message: &'p MessageRef,
    field:   &'p str,
}

impl Ctx<'_> {
    fn mismatch(&self, expected: &'static str, found: &Value) -> EvalError {
        EvalError::TypeMismatch {
            message:  self.message.to_string(),
            field:    self.field.to_string(),
            expected,
            found:    found.kind(),
        }
    }

    fn numeric(&self, kind: PrimitiveKind, found: &Value) -> EvalError {
        match found {
            Value::Int(_) | Value::UInt(_) | Value::Float(_) | Value::Bool(_) => EvalError::OutOfRange {
                message: self.message.to_string(),
                field:   self.field.to_string(),
                kind:    kind.tag(),
            },
            other => self.mismatch(kind.tag(), other),
        }
    }

    fn elements<'v>(&self, value: &'v Value, expected: Option<usize>) -> Result<&'v [Value], EvalError> {
        let items = value.as_array().ok_or_else(|| self.mismatch("array", value))?;
        match expected {
            Some(n) if n != items.len() => Err(EvalError::LengthMismatch {
                message:  self.message.to_string(),
                field:    self.field.to_string(),
                expected: n,
                found:    items.len(),
            }),
            _ => Ok(items),
        }
    }
}

pub struct Interpreter<'a> {
    catalog: &'a EncoderCatalog,
}

impl<'a> Interpreter<'a> {
    pub fn new(catalog: &'a EncoderCatalog) -> Self {
        Interpreter { catalog }
    }

    /// Encode `value` with the full encoder of `message`.
    pub fn encode_full(&self, message: &MessageRef, value: &Value, buf: &mut [u8]) -> Result<Encoded, EvalError> {
        let set = self
            .catalog
            .get(message)
            .ok_or_else(|| EvalError::UnknownEncoder(message.to_string()))?;
        self.encode(&set.full, value, buf)
    }

    /// Encode `value` with the partial encoder of `message` that stops before
    /// `field`.
    pub fn encode_until(&self, message: &MessageRef, field: &str, value: &Value, buf: &mut [u8]) -> Result<Encoded, EvalError> {
        let set = self
            .catalog
            .get(message)
            .ok_or_else(|| EvalError::UnknownEncoder(message.to_string()))?;
        let plan = set.partial(field).ok_or_else(|| EvalError::UnknownCut {
            message: message.to_string(),
            field:   field.to_string(),
        })?;
        self.encode(plan, value, buf)
    }

    /// Execute `plan` for `value` into `buf`.
    pub fn encode(&self, plan: &EncoderPlan, value: &Value, buf: &mut [u8]) -> Result<Encoded, EvalError> {
        let mut w = WireWriter::new(buf);
        let mut marks = Vec::with_capacity(plan.fields.len());

        let prologue = Ctx { message: &plan.message, field: "" };
        for step in &plan.prologue {
            self.run_step(&prologue, step, value, &mut w)?;
        }

        for field_plan in &plan.fields {
            let ctx = Ctx { message: &plan.message, field: &field_plan.field };
            let field_value = value.get(&field_plan.field).ok_or_else(|| EvalError::MissingField {
                message: plan.message.to_string(),
                field:   field_plan.field.clone(),
            })?;
            for step in &field_plan.steps {
                self.run_step(&ctx, step, field_value, &mut w)?;
            }
            marks.push(FieldMark {
                field:       field_plan.field.clone(),
                end_offset:  w.position(),
                align_after: field_plan.align_after.get(),
            });
        }

        Ok(Encoded { len: w.position(), marks })
    }

    fn run_step(&self, ctx: &Ctx<'_>, step: &Step, value: &Value, w: &mut WireWriter<'_>) -> Result<(), EvalError> {
        match step {
            Step::Header { len } => {
                for _ in 0..*len {
                    w.write(0u8)?;
                }
            }
            Step::Pad { align } => {
                w.align(*align)?;
            }
            Step::Write { kind } => write_primitive(ctx, *kind, value, w)?,
            Step::WriteArray { kind, len } => {
                for item in ctx.elements(value, Some(*len))? {
                    write_primitive(ctx, *kind, item, w)?;
                }
            }
            Step::WriteCount => {
                w.write_count(ctx.elements(value, None)?.len())?;
            }
            Step::WriteBulk { kind } => {
                for item in ctx.elements(value, None)? {
                    write_primitive(ctx, *kind, item, w)?;
                }
            }
            Step::StringLoop { len } => {
                for item in ctx.elements(value, *len)? {
                    w.align(COUNT_ALIGNMENT)?;
                    let s = item.as_str().ok_or_else(|| ctx.mismatch("string", item))?;
                    w.write_string(s)?;
                }
            }
            Step::Delegate { message, arity, .. } => match arity {
                Arity::Single => self.delegate(message, value, w)?,
                Arity::Fixed(n) => {
                    for item in ctx.elements(value, Some(*n))? {
                        self.delegate(message, item, w)?;
                    }
                }
                Arity::Sequence => {
                    for item in ctx.elements(value, None)? {
                        self.delegate(message, item, w)?;
                    }
                }
            },
        }
        Ok(())
    }

    /// Run the nested type's full encoder in the remaining buffer and advance
    /// past whatever it wrote.
    fn delegate(&self, message: &MessageRef, value: &Value, w: &mut WireWriter<'_>) -> Result<(), EvalError> {
        let written = self.encode_full(message, value, w.remaining_mut())?.len;
        w.advance(written)?;
        Ok(())
    }
}

fn write_primitive(ctx: &Ctx<'_>, kind: PrimitiveKind, value: &Value, w: &mut WireWriter<'_>) -> Result<(), EvalError> {
    fn unsigned<T: TryFrom<u64>>(ctx: &Ctx<'_>, kind: PrimitiveKind, value: &Value) -> Result<T, EvalError> {
        value
            .as_u64()
            .and_then(|v| T::try_from(v).ok())
            .ok_or_else(|| ctx.numeric(kind, value))
    }

    fn signed<T: TryFrom<i64>>(ctx: &Ctx<'_>, kind: PrimitiveKind, value: &Value) -> Result<T, EvalError> {
        value
            .as_i64()
            .and_then(|v| T::try_from(v).ok())
            .ok_or_else(|| ctx.numeric(kind, value))
    }

    match kind {
        PrimitiveKind::Bool => {
            let v = value.as_bool().ok_or_else(|| ctx.mismatch("bool", value))?;
            w.write(v)?;
        }
        PrimitiveKind::Byte | PrimitiveKind::UInt8 => w.write(unsigned::<u8>(ctx, kind, value)?)?,
        PrimitiveKind::Char | PrimitiveKind::Int8  => w.write(signed::<i8>(ctx, kind, value)?)?,
        PrimitiveKind::UInt16 => w.write(unsigned::<u16>(ctx, kind, value)?)?,
        PrimitiveKind::Int16  => w.write(signed::<i16>(ctx, kind, value)?)?,
        PrimitiveKind::UInt32 => w.write(unsigned::<u32>(ctx, kind, value)?)?,
        PrimitiveKind::Int32  => w.write(signed::<i32>(ctx, kind, value)?)?,
        PrimitiveKind::UInt64 => w.write(unsigned::<u64>(ctx, kind, value)?)?,
        PrimitiveKind::Int64  => w.write(signed::<i64>(ctx, kind, value)?)?,
        PrimitiveKind::Float32 => {
            let v = value.as_f64().ok_or_else(|| ctx.mismatch("float32", value))?;
            w.write(v as f32)?;
        }
        PrimitiveKind::Float64 => {
            let v = value.as_f64().ok_or_else(|| ctx.mismatch("float64", value))?;
            w.write(v)?;
        }
        PrimitiveKind::String => {
            let s = value.as_str().ok_or_else(|| ctx.mismatch("string", value))?;
            w.write_string(s)?;
        }
    }
    Ok(())
}

/// Convert parsed JSON into a [`Value`]. Integers keep their sign class,
/// other numbers become floats.
pub fn value_from_json(json: &serde_json::Value) -> Result<Value, EvalError> {
    use serde_json::Value as Json;

    Ok(match json {
        Json::Null => return Err(EvalError::NullValue),
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => {
            if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::Array(items.iter().map(value_from_json).collect::<Result<_, _>>()?),
        Json::Object(fields) => {
            let mut out = std::collections::BTreeMap::new();
            for (k, v) in fields {
                out.insert(k.clone(), value_from_json(v)?);
            }
            Value::Object(out)
        }
    })
}
