//! Alignment propagation and encoder-set construction.
//!
//! A plan is the language-neutral form of one generated encoder: an ordered
//! list of steps per field, together with the alignment the wire cursor is
//! statically known to have after each field. Back ends only render plans;
//! every padding decision is made here.

use genmsg_schema::HEADER_LEN;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::{
    dispatch::{classify, Arity, Dispatch},
    error::GenError,
    naming::{partial_encoder_name, struct_symbol, wire_type_name},
    registry::PrimitiveKind,
    types::{FieldSpec, MessageRef, MessageSchema},
};

/// Largest alignment the planner ever claims.
pub const MAX_ALIGNMENT: usize = 8;

/// Alignment sequence counts and per-element string lengths are padded to.
pub const COUNT_ALIGNMENT: usize = 4;

/// Name of the encoder that covers every field.
pub const FULL_ENCODER_NAME: &str = "encode";

/// The largest alignment the wire cursor is statically known to satisfy.
///
/// Claims may be lower than the truth (costing a runtime check) but never
/// higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AlignmentCursor(pub usize);

impl AlignmentCursor {
    /// Nothing is known on entry to an encoder.
    pub const UNKNOWN: AlignmentCursor = AlignmentCursor(1);

    pub fn get(self) -> usize {
        self.0
    }

    /// Whether a value needing `alignment` can be written without a guard.
    pub fn satisfies(self, alignment: usize) -> bool {
        self.0 >= alignment
    }
}

/// Largest power of two dividing `bytes`, capped at [`MAX_ALIGNMENT`].
pub fn span_alignment(bytes: usize) -> usize {
    if bytes % 8 == 0 {
        8
    } else if bytes % 4 == 0 {
        4
    } else if bytes % 2 == 0 {
        2
    } else {
        1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Fixed-size zeroed header in front of the first field.
    Header { len: usize },
    /// Runtime guard: pad with zeros until the cursor is a multiple of `align`.
    Pad { align: usize },
    /// One primitive value.
    Write { kind: PrimitiveKind },
    /// A fixed-length array of fixed-width values, packed without padding.
    WriteArray { kind: PrimitiveKind, len: usize },
    /// The 32-bit element count of a sequence, taken from its runtime length.
    WriteCount,
    /// Every element of a sequence of fixed-width values in one copy.
    WriteBulk { kind: PrimitiveKind },
    /// Strings one by one, each guarded to [`COUNT_ALIGNMENT`] and written
    /// length first. `len` is `None` for sequences.
    StringLoop { len: Option<usize> },
    /// Call the nested type's full encoder once per element.
    Delegate {
        message: MessageRef,
        symbol:  String,
        arity:   Arity,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldPlan {
    pub field:       String,
    pub steps:       Vec<Step>,
    /// Alignment known to hold right after the field.
    pub align_after: AlignmentCursor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncoderPlan {
    pub message:  MessageRef,
    pub symbol:   String,
    /// `encode` or `encode_until_<field>`.
    pub name:     String,
    /// Field the encoder stops before, `None` for the full encoder.
    pub until:    Option<String>,
    pub prologue: Vec<Step>,
    pub fields:   Vec<FieldPlan>,
}

impl EncoderPlan {
    pub fn is_full(&self) -> bool {
        self.until.is_none()
    }

    /// Alignment known to hold when the encoder returns.
    pub fn trailing_alignment(&self) -> AlignmentCursor {
        self.fields
            .last()
            .map(|f| f.align_after)
            .unwrap_or(AlignmentCursor(HEADER_LEN))
    }

    /// Every step in emission order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.prologue
            .iter()
            .chain(self.fields.iter().flat_map(|f| f.steps.iter()))
    }
}

/// The full encoder and every partial encoder of one message type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncoderSet {
    pub message:        MessageRef,
    pub symbol:         String,
    pub wire_type_name: String,
    pub full:           EncoderPlan,
    /// One per field index `1..N`, in field order.
    pub partials:       Vec<EncoderPlan>,
}

impl EncoderSet {
    /// Every encoder, full first.
    pub fn encoders(&self) -> impl Iterator<Item = &EncoderPlan> {
        std::iter::once(&self.full).chain(self.partials.iter())
    }

    /// The partial encoder that stops before `field`.
    pub fn partial(&self, field: &str) -> Option<&EncoderPlan> {
        self.partials.iter().find(|p| p.until.as_deref() == Some(field))
    }
}

/// Every encoder set of a generation run, keyed by message type and kept in
/// the order they were built.
#[derive(Debug, Default)]
pub struct EncoderCatalog {
    sets:  HashMap<MessageRef, EncoderSet>,
    order: Vec<MessageRef>,
}

impl EncoderCatalog {
    pub fn new() -> Self {
        EncoderCatalog::default()
    }

    /// Add `set`, replacing any earlier set for the same message type.
    pub fn insert(&mut self, set: EncoderSet) {
        let key = set.message.clone();
        if self.sets.insert(key.clone(), set).is_none() {
            self.order.push(key);
        }
    }

    pub fn get(&self, message: &MessageRef) -> Option<&EncoderSet> {
        self.sets.get(message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EncoderSet> {
        self.order.iter().filter_map(|key| self.sets.get(key))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn guard(entering: AlignmentCursor, alignment: usize, steps: &mut Vec<Step>) {
    if entering.satisfies(alignment) {
        debug!(alignment, known = entering.get(), "guard elided");
    } else {
        steps.push(Step::Pad { align: alignment });
    }
}

/// Emit the steps for one field entered with `entering` alignment.
pub fn plan_field(field: &FieldSpec, entering: AlignmentCursor) -> FieldPlan {
    let mut steps = Vec::new();

    let align_after = match classify(field) {
        Dispatch::Primitive(kind) => {
            guard(entering, kind.alignment(), &mut steps);
            steps.push(Step::Write { kind });
            AlignmentCursor(kind.alignment())
        }
        Dispatch::PrimitiveArray { kind, len } => match kind.width() {
            Some(width) => {
                guard(entering, kind.alignment(), &mut steps);
                steps.push(Step::WriteArray { kind, len });
                // The array starts at a multiple of the larger of the two
                // alignments and spans width * len bytes.
                let start = entering.get().max(kind.alignment());
                AlignmentCursor(start.min(span_alignment(width * len)))
            }
            None => {
                steps.push(Step::StringLoop { len: Some(len) });
                AlignmentCursor::UNKNOWN
            }
        },
        Dispatch::PrimitiveSequence(kind) => {
            guard(entering, COUNT_ALIGNMENT, &mut steps);
            steps.push(Step::WriteCount);
            if kind.is_string() {
                steps.push(Step::StringLoop { len: None });
                AlignmentCursor::UNKNOWN
            } else {
                // The bulk copy starts right after a 4-aligned count.
                steps.push(Step::WriteBulk { kind });
                AlignmentCursor(kind.alignment().min(COUNT_ALIGNMENT))
            }
        }
        Dispatch::Nested { message, symbol, arity } => {
            steps.push(Step::Delegate { message, symbol, arity });
            // The nested encoder's trailing alignment is not visible here.
            AlignmentCursor::UNKNOWN
        }
    };

    debug!(field = %field.name, entering = entering.get(), after = align_after.get(), "planned field");

    FieldPlan {
        field: field.name.clone(),
        steps,
        align_after,
    }
}

/// Run alignment propagation across `fields` in order. Returns the per-field
/// plans and the alignment after the last field.
pub fn plan_fields(fields: &[FieldSpec], entering: AlignmentCursor) -> (Vec<FieldPlan>, AlignmentCursor) {
    let mut align = entering;
    let mut plans = Vec::with_capacity(fields.len());
    for field in fields {
        let plan = plan_field(field, align);
        align = plan.align_after;
        plans.push(plan);
    }
    (plans, align)
}

/// Plan one encoder of `schema`: the full encoder when `cut` is `None`,
/// otherwise the partial encoder covering fields `0..cut`.
///
/// `cut` must lie in `1..fields.len()`.
pub fn plan_encoder(schema: &MessageSchema, cut: Option<usize>) -> Result<EncoderPlan, GenError> {
    let message = schema.message_ref();
    let len = schema.fields.len();
    if len == 0 {
        return Err(GenError::EmptyMessage(message.to_string()));
    }

    let (end, name, until) = match cut {
        None => (len, FULL_ENCODER_NAME.to_string(), None),
        Some(index) if index >= 1 && index < len => {
            let field = &schema.fields[index].name;
            (index, partial_encoder_name(field), Some(field.clone()))
        }
        Some(index) => {
            return Err(GenError::InvalidCut {
                message: message.to_string(),
                index,
                len,
            })
        }
    };

    // Every encoder opens with the fixed header, after which the cursor is
    // known to be aligned to its length.
    let prologue = vec![Step::Header { len: HEADER_LEN }];
    let (fields, _) = plan_fields(&schema.fields[..end], AlignmentCursor(HEADER_LEN));

    Ok(EncoderPlan {
        symbol: struct_symbol(&schema.namespace, &schema.name),
        message,
        name,
        until,
        prologue,
        fields,
    })
}

/// Build the full encoder and one partial encoder per field index `1..N`.
/// Each partial encoder is planned from scratch.
pub fn build_encoder_set(schema: &MessageSchema) -> Result<EncoderSet, GenError> {
    let full = plan_encoder(schema, None)?;
    let mut partials = Vec::with_capacity(schema.fields.len().saturating_sub(1));
    for cut in 1..schema.fields.len() {
        partials.push(plan_encoder(schema, Some(cut))?);
    }

    Ok(EncoderSet {
        message:        schema.message_ref(),
        symbol:         struct_symbol(&schema.namespace, &schema.name),
        wire_type_name: wire_type_name(&schema.namespace, &schema.name),
        full,
        partials,
    })
}
