use crate::{
    error::GenError,
    registry::PrimitiveKind,
    types::{ConstantSpec, FieldSpec, MessageRef, MessageSchema, TypeRef},
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref CONSTANT: Regex = Regex::new(
        r"^([A-Za-z][A-Za-z0-9_]*)(?:<=\d+)?\s+([A-Za-z][A-Za-z0-9_]*)\s*=\s*(.*)$"
    ).unwrap();
    static ref FIELD: Regex = Regex::new(
        r"^([A-Za-z][A-Za-z0-9_]*(?:/[A-Za-z][A-Za-z0-9_]*)?)(?:<=(\d+))?(\[(<=)?(\d*)\])?\s+([A-Za-z][A-Za-z0-9_]*)(?:\s+(.+))?$"
    ).unwrap();
}

/// Package that unqualified `Header` fields refer to.
const HEADER_PACKAGE: &str = "std_msgs";

/// Parse the text of a `.msg` file declaring `namespace/name`.
///
/// `file` only labels diagnostics.
pub fn parse_message(namespace: &str, name: &str, text: &str, file: &str) -> Result<MessageSchema, GenError> {
    let message = MessageRef::new(namespace, name);
    let mut schema = MessageSchema::new(namespace, name, Vec::new());

    let parse_error = |line: usize, msg: String| GenError::Parse {
        file: file.to_string(),
        line,
        msg,
    };

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Constants first: string constant values run to the end of the line,
        // comment markers included.
        if let Some(caps) = CONSTANT.captures(trimmed) {
            let tag = &caps[1];
            let kind = PrimitiveKind::from_tag(tag).ok_or_else(|| GenError::UnsupportedType {
                message:   message.to_string(),
                field:     caps[2].to_string(),
                type_name: tag.to_string(),
            })?;
            let value = if kind.is_string() {
                caps[3].trim().to_string()
            } else {
                strip_comment(&caps[3]).trim().to_string()
            };
            if value.is_empty() {
                return Err(parse_error(line_no, format!("Constant {} has no value", &caps[2])));
            }
            check_constant(kind, &value)
                .map_err(|msg| parse_error(line_no, format!("Constant {}: {}", &caps[2], msg)))?;
            schema.constants.push(ConstantSpec {
                kind,
                name: caps[2].to_string(),
                value,
            });
            continue;
        }

        let line = strip_comment(trimmed).trim();
        if line.is_empty() {
            continue;
        }
        let caps = FIELD
            .captures(line)
            .ok_or_else(|| parse_error(line_no, format!("Expected a field or constant declaration, found {:?}", line)))?;

        let tag = &caps[1];
        let field_name = &caps[6];
        let type_ = resolve_type_tag(tag, namespace).ok_or_else(|| GenError::UnsupportedType {
            message:   message.to_string(),
            field:     field_name.to_string(),
            type_name: tag.to_string(),
        })?;

        if caps.get(2).is_some() && type_ != TypeRef::Primitive(PrimitiveKind::String) {
            return Err(parse_error(line_no, format!("Only strings can be bounded, found {}", tag)));
        }

        let mut field = FieldSpec::scalar(field_name, type_);
        field.line = line_no;

        if caps.get(3).is_some() {
            let bounded = caps.get(4).is_some();
            let digits = caps.get(5).map_or("", |m| m.as_str());
            field.is_array = true;
            match (bounded, digits.is_empty()) {
                (false, true) => {}
                (false, false) => {
                    let size = parse_size(digits).map_err(|msg| parse_error(line_no, msg))?;
                    field.array_size = Some(size);
                }
                (true, false) => {
                    let bound = parse_size(digits).map_err(|msg| parse_error(line_no, msg))?;
                    field.upper_bound = Some(bound);
                }
                (true, true) => {
                    return Err(parse_error(line_no, "Bounded sequence is missing its bound".to_string()));
                }
            }
        }

        if let Some(default) = caps.get(7) {
            debug!(message = %message, field = field_name, default = default.as_str(), "ignoring default value");
        }

        schema.fields.push(field);
    }

    Ok(schema)
}

/// Map a type tag as written in a `.msg` file to a type reference.
///
/// Unqualified capitalized names refer to the declaring package. Lowercase
/// tags that are not registered primitives have no meaning and yield `None`.
pub fn resolve_type_tag(tag: &str, namespace: &str) -> Option<TypeRef> {
    if let Some(kind) = PrimitiveKind::from_tag(tag) {
        return Some(TypeRef::Primitive(kind));
    }
    if tag.contains('/') {
        return MessageRef::parse(tag).map(TypeRef::Message);
    }
    if tag == "Header" {
        return Some(TypeRef::Message(MessageRef::new(HEADER_PACKAGE, tag)));
    }
    if tag.starts_with(|c: char| c.is_ascii_uppercase()) {
        return Some(TypeRef::Message(MessageRef::new(namespace, tag)));
    }
    None
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

/// Checks that a constant's literal is a value of its declared kind.
fn check_constant(kind: PrimitiveKind, value: &str) -> Result<(), String> {
    fn parses<T: std::str::FromStr>(value: &str) -> bool {
        !value.starts_with('+') && value.parse::<T>().is_ok()
    }

    let ok = match kind {
        PrimitiveKind::Bool => matches!(value.to_ascii_lowercase().as_str(), "true" | "false" | "1" | "0"),
        PrimitiveKind::Byte | PrimitiveKind::UInt8 => parses::<u8>(value),
        PrimitiveKind::Char | PrimitiveKind::Int8  => parses::<i8>(value),
        PrimitiveKind::UInt16 => parses::<u16>(value),
        PrimitiveKind::Int16  => parses::<i16>(value),
        PrimitiveKind::UInt32 => parses::<u32>(value),
        PrimitiveKind::Int32  => parses::<i32>(value),
        PrimitiveKind::UInt64 => parses::<u64>(value),
        PrimitiveKind::Int64  => parses::<i64>(value),
        PrimitiveKind::Float32 | PrimitiveKind::Float64 => {
            // Literal digits first: `inf`, `NaN` and `.5` parse but are not literals.
            value.trim_start_matches('-').starts_with(|c: char| c.is_ascii_digit())
                && value.parse::<f64>().map_or(false, f64::is_finite)
                && (kind == PrimitiveKind::Float64 || value.parse::<f32>().map_or(false, f32::is_finite))
        }
        PrimitiveKind::String => true,
    };
    if ok {
        Ok(())
    } else {
        Err(format!("{:?} is not a valid {} value", value, kind.tag()))
    }
}

fn parse_size(digits: &str) -> Result<usize, String> {
    match digits.parse::<usize>() {
        Ok(0) => Err("Array size must be positive".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid array size {:?}", digits)),
    }
}
