use std::collections::{HashMap, HashSet};
use crate::{
    error::GenError,
    types::{MessageRef, MessageSchema, SchemaSet, TypeRef},
};

/// Checks a single message: it has fields, the field names are unique and
/// every nested reference resolves within `set`.
pub fn verify_message(schema: &MessageSchema, set: &SchemaSet) -> Result<(), GenError> {
    let message = schema.message_ref();

    if schema.fields.is_empty() {
        return Err(GenError::EmptyMessage(message.to_string()));
    }

    let mut seen = HashSet::new();
    for field in &schema.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(GenError::DuplicateField {
                message: message.to_string(),
                field:   field.name.clone(),
            });
        }
        if let TypeRef::Message(ref nested) = field.type_ {
            if !set.contains(nested) {
                return Err(GenError::UnsupportedType {
                    message:   message.to_string(),
                    field:     field.name.clone(),
                    type_name: nested.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Verifies every message in `set` and returns the message types ordered so
/// that each type comes after every type it nests.
///
/// Fails before anything is generated if any message is malformed or if
/// message types reference each other in a cycle.
pub fn verify_schema_set(set: &SchemaSet) -> Result<Vec<MessageRef>, GenError> {
    // 1) Per-message checks
    for schema in set.iter() {
        verify_message(schema, set)?;
    }

    // 2) Depth-first walk of the nesting graph: rejects cycles and records
    //    dependencies before dependents.
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    fn visit(
        key: &MessageRef,
        set: &SchemaSet,
        state: &mut HashMap<MessageRef, Mark>,
        path: &mut Vec<MessageRef>,
        order: &mut Vec<MessageRef>,
    ) -> Result<(), GenError> {
        match state.get(key) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = path.iter().position(|p| p == key).unwrap_or(0);
                let cycle: Vec<String> = path[start..]
                    .iter()
                    .chain(std::iter::once(key))
                    .map(|m| m.to_string())
                    .collect();
                return Err(GenError::RecursiveType(cycle.join(" -> ")));
            }
            None => {}
        }

        let Some(schema) = set.get(key) else {
            return Ok(());
        };

        state.insert(key.clone(), Mark::Visiting);
        path.push(key.clone());
        for field in &schema.fields {
            if let TypeRef::Message(ref nested) = field.type_ {
                visit(nested, set, state, path, order)?;
            }
        }
        path.pop();
        state.insert(key.clone(), Mark::Done);
        order.push(key.clone());
        Ok(())
    }

    let mut state = HashMap::new();
    let mut path = Vec::new();
    let mut order = Vec::with_capacity(set.len());
    for schema in set.iter() {
        visit(&schema.message_ref(), set, &mut state, &mut path, &mut order)?;
    }

    Ok(order)
}
