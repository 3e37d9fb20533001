use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;

/// Primitive field types understood by the encoder planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Bool,
    Byte,
    Char,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    String,
}

/// How a primitive value is laid down on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strategy {
    /// One byte, 1 or 0.
    Boolean,
    /// Raw native bytes of the given width, aligned to that width.
    FixedWidth { width: usize },
    /// Unaligned 32-bit length including the terminating NUL, then the bytes.
    LengthPrefixed,
}

#[derive(Debug)]
pub struct PrimitiveInfo {
    pub kind:      PrimitiveKind,
    pub tag:       &'static str,
    pub alignment: usize,
    pub strategy:  Strategy,
    pub rust_type: &'static str,
    pub c_type:    &'static str,
}

const fn fixed(kind: PrimitiveKind, tag: &'static str, width: usize, rust_type: &'static str, c_type: &'static str) -> PrimitiveInfo {
    PrimitiveInfo { kind, tag, alignment: width, strategy: Strategy::FixedWidth { width }, rust_type, c_type }
}

/// Indexed by `PrimitiveKind as usize`.
pub static PRIMITIVES: [PrimitiveInfo; 14] = [
    PrimitiveInfo {
        kind:      PrimitiveKind::Bool,
        tag:       "bool",
        alignment: 1,
        strategy:  Strategy::Boolean,
        rust_type: "bool",
        c_type:    "bool",
    },
    fixed(PrimitiveKind::Byte,    "byte",    1, "u8",  "uint8_t"),
    fixed(PrimitiveKind::Char,    "char",    1, "i8",  "int8_t"),
    fixed(PrimitiveKind::Int8,    "int8",    1, "i8",  "int8_t"),
    fixed(PrimitiveKind::UInt8,   "uint8",   1, "u8",  "uint8_t"),
    fixed(PrimitiveKind::Int16,   "int16",   2, "i16", "int16_t"),
    fixed(PrimitiveKind::UInt16,  "uint16",  2, "u16", "uint16_t"),
    fixed(PrimitiveKind::Int32,   "int32",   4, "i32", "int32_t"),
    fixed(PrimitiveKind::UInt32,  "uint32",  4, "u32", "uint32_t"),
    fixed(PrimitiveKind::Int64,   "int64",   8, "i64", "int64_t"),
    fixed(PrimitiveKind::UInt64,  "uint64",  8, "u64", "uint64_t"),
    fixed(PrimitiveKind::Float32, "float32", 4, "f32", "float"),
    fixed(PrimitiveKind::Float64, "float64", 8, "f64", "double"),
    PrimitiveInfo {
        kind:      PrimitiveKind::String,
        tag:       "string",
        alignment: 1,
        strategy:  Strategy::LengthPrefixed,
        rust_type: "String",
        c_type:    "char *",
    },
];

lazy_static! {
    static ref BY_TAG: HashMap<&'static str, PrimitiveKind> =
        PRIMITIVES.iter().map(|p| (p.tag, p.kind)).collect();
}

impl PrimitiveKind {
    /// Look up a schema type tag. Returns `None` for anything that is not a
    /// registered primitive.
    pub fn from_tag(tag: &str) -> Option<PrimitiveKind> {
        BY_TAG.get(tag).copied()
    }

    pub fn info(self) -> &'static PrimitiveInfo {
        &PRIMITIVES[self as usize]
    }

    pub fn tag(self) -> &'static str {
        self.info().tag
    }

    /// Byte multiple the wire cursor must satisfy before the value is written.
    pub fn alignment(self) -> usize {
        self.info().alignment
    }

    pub fn strategy(self) -> Strategy {
        self.info().strategy
    }

    /// Wire width of one element, `None` for strings.
    pub fn width(self) -> Option<usize> {
        match self.strategy() {
            Strategy::Boolean               => Some(1),
            Strategy::FixedWidth { width }  => Some(width),
            Strategy::LengthPrefixed        => None,
        }
    }

    pub fn is_string(self) -> bool {
        self.strategy() == Strategy::LengthPrefixed
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::Float32 | PrimitiveKind::Float64)
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Char | PrimitiveKind::Int8 | PrimitiveKind::Int16 | PrimitiveKind::Int32 | PrimitiveKind::Int64
        )
    }
}
