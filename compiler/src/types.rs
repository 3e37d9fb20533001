use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::registry::PrimitiveKind;

/// Identity of a message type: the package it lives in and its type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MessageRef {
    pub namespace: String,
    pub type_name: String,
}

impl MessageRef {
    pub fn new(namespace: impl Into<String>, type_name: impl Into<String>) -> Self {
        MessageRef {
            namespace: namespace.into(),
            type_name: type_name.into(),
        }
    }

    /// Parse `pkg/Name`. Returns `None` when either half is missing.
    pub fn parse(text: &str) -> Option<Self> {
        let (namespace, type_name) = text.split_once('/')?;
        if namespace.is_empty() || type_name.is_empty() || type_name.contains('/') {
            return None;
        }
        Some(MessageRef::new(namespace, type_name))
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.type_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    Message(MessageRef),
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(kind) => f.write_str(kind.tag()),
            TypeRef::Message(msg)    => write!(f, "{}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name:        String,
    pub type_:       TypeRef,
    pub is_array:    bool,
    /// Present for fixed-length arrays.
    pub array_size:  Option<usize>,
    /// Declared `<=N` bound of a bounded sequence. Not enforced on the wire.
    pub upper_bound: Option<usize>,
    pub line:        usize,
}

impl FieldSpec {
    pub fn scalar(name: &str, type_: TypeRef) -> Self {
        FieldSpec {
            name:        name.to_string(),
            type_,
            is_array:    false,
            array_size:  None,
            upper_bound: None,
            line:        0,
        }
    }

    pub fn fixed(name: &str, type_: TypeRef, len: usize) -> Self {
        FieldSpec {
            is_array:   true,
            array_size: Some(len),
            ..FieldSpec::scalar(name, type_)
        }
    }

    pub fn sequence(name: &str, type_: TypeRef) -> Self {
        FieldSpec {
            is_array: true,
            ..FieldSpec::scalar(name, type_)
        }
    }

    /// Name of the runtime count member that accompanies a sequence.
    pub fn size_member(&self) -> String {
        format!("{}_size", self.name)
    }
}

/// A `TYPE NAME=VALUE` declaration. Carried into the layout, never encoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstantSpec {
    pub kind:  PrimitiveKind,
    pub name:  String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageSchema {
    pub namespace: String,
    pub name:      String,
    pub fields:    Vec<FieldSpec>,
    pub constants: Vec<ConstantSpec>,
}

impl MessageSchema {
    pub fn new(namespace: &str, name: &str, fields: Vec<FieldSpec>) -> Self {
        MessageSchema {
            namespace: namespace.to_string(),
            name:      name.to_string(),
            fields,
            constants: Vec::new(),
        }
    }

    pub fn message_ref(&self) -> MessageRef {
        MessageRef::new(&self.namespace, &self.name)
    }
}

/// Every message type of a generation run, in load order.
#[derive(Debug, Default)]
pub struct SchemaSet {
    messages: Vec<MessageSchema>,
    index:    HashMap<MessageRef, usize>,
}

impl SchemaSet {
    pub fn new() -> Self {
        SchemaSet::default()
    }

    /// Add `schema` unless a message with the same identity is already
    /// present. Returns whether it was added.
    pub fn insert(&mut self, schema: MessageSchema) -> bool {
        let key = schema.message_ref();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.messages.len());
        self.messages.push(schema);
        true
    }

    pub fn get(&self, key: &MessageRef) -> Option<&MessageSchema> {
        self.index.get(key).map(|&i| &self.messages[i])
    }

    pub fn contains(&self, key: &MessageRef) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageSchema> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl FromIterator<MessageSchema> for SchemaSet {
    fn from_iter<I: IntoIterator<Item = MessageSchema>>(iter: I) -> Self {
        let mut set = SchemaSet::new();
        for schema in iter {
            set.insert(schema);
        }
        set
    }
}
