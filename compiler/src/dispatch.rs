use serde::Serialize;

use crate::{
    naming::struct_symbol,
    registry::PrimitiveKind,
    types::{FieldSpec, MessageRef, TypeRef},
};

/// How many nested values a message-typed field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    Single,
    Fixed(usize),
    Sequence,
}

/// Which encoding routine a field goes through.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Primitive(PrimitiveKind),
    PrimitiveArray { kind: PrimitiveKind, len: usize },
    PrimitiveSequence(PrimitiveKind),
    Nested {
        message: MessageRef,
        /// Canonical symbol of the nested type's encoder.
        symbol:  String,
        arity:   Arity,
    },
}

/// Classify a field by primitive-ness, array-ness and whether the array
/// length is fixed.
pub fn classify(field: &FieldSpec) -> Dispatch {
    match field.type_ {
        TypeRef::Primitive(kind) => match (field.is_array, field.array_size) {
            (false, _)      => Dispatch::Primitive(kind),
            (true, Some(n)) => Dispatch::PrimitiveArray { kind, len: n },
            (true, None)    => Dispatch::PrimitiveSequence(kind),
        },
        TypeRef::Message(ref message) => Dispatch::Nested {
            message: message.clone(),
            symbol:  struct_symbol(&message.namespace, &message.type_name),
            arity:   match (field.is_array, field.array_size) {
                (false, _)      => Arity::Single,
                (true, Some(n)) => Arity::Fixed(n),
                (true, None)    => Arity::Sequence,
            },
        },
    }
}
