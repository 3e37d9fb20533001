//! genmsg-compiler
//!
//! This crate implements:
//!  1) A parser and loader for `.msg` interface definitions,
//!  2) A schema verifier (empty messages, duplicate fields, unresolved and recursive types),
//!  3) Alignment propagation into per-message encoder plans (`plan`),
//!  4) Rust and C back ends rendering those plans,
//!  5) An interpreter that runs a plan against dynamic values, and
//!  6) Error types (`GenError`, `EvalError`).

pub mod error;
pub mod types;
pub mod utils;
pub mod naming;
pub mod registry;
pub mod parser;
pub mod config;
pub mod loader;
pub mod verifier;
pub mod dispatch;
pub mod plan;
pub mod interp;
pub mod compiler;
pub mod gen_rust;
pub mod gen_c;

pub use compiler::{build_catalog, compile_message, compile_messages, generate, GeneratedFile, GenerationReport};
pub use config::{GenerateOptions, Language};
pub use error::GenError;
pub use interp::{value_from_json, EvalError, Interpreter};
pub use plan::{build_encoder_set, plan_encoder, EncoderCatalog, EncoderPlan, EncoderSet};
pub use types::{FieldSpec, MessageRef, MessageSchema, SchemaSet, TypeRef};
