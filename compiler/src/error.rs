use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("I/O error on {}: {source}", path.display())]
    IoAt {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {file} at line {line}: {msg}")]
    Parse {
        file: String,
        line: usize,
        msg:  String,
    },

    #[error("Unsupported type {type_name} for field {field} of {message}")]
    UnsupportedType {
        message:   String,
        field:     String,
        type_name: String,
    },

    #[error("Message {0} has no fields")]
    EmptyMessage(String),

    #[error("Cannot cut {message} before field index {index}; partial encoders start at index 1 and end before {len}")]
    InvalidCut {
        message: String,
        index:   usize,
        len:     usize,
    },

    #[error("Field {field} is declared twice in {message}")]
    DuplicateField {
        message: String,
        field:   String,
    },

    #[error("Recursive nesting is not allowed: {0}")]
    RecursiveType(String),

    #[error("Unknown message type {0}")]
    UnknownMessage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Eval(#[from] crate::interp::EvalError),
}
