use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::{
    config::{GenerateOptions, Language},
    error::GenError,
    gen_c::compile_schema_to_c,
    gen_rust::compile_schema_to_rust,
    loader::load_schemas,
    parser::parse_message,
    plan::{build_encoder_set, EncoderCatalog, EncoderSet},
    types::SchemaSet,
    verifier::verify_schema_set,
};

/// One emitted file, its path relative to the output root.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub path:     PathBuf,
    pub contents: String,
}

/// What a generation run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub language: Language,
    pub messages: usize,
    pub encoders: usize,
    /// Absolute paths of every file written.
    pub files:    Vec<PathBuf>,
}

/// Verify `schemas` and build the encoder set of every message, nested types
/// before the types that contain them.
pub fn build_catalog(schemas: &SchemaSet) -> Result<EncoderCatalog, GenError> {
    let order = verify_schema_set(schemas)?;

    let mut catalog = EncoderCatalog::new();
    for key in &order {
        let schema = schemas
            .get(key)
            .ok_or_else(|| GenError::UnknownMessage(key.to_string()))?;
        let set = build_encoder_set(schema)?;
        info!(message = %key, partials = set.partials.len(), "built encoder set");
        catalog.insert(set);
    }
    Ok(catalog)
}

/// Render every encoder set of `catalog` for `language`.
pub fn render(schemas: &SchemaSet, catalog: &EncoderCatalog, language: Language) -> Vec<GeneratedFile> {
    match language {
        Language::Rust => compile_schema_to_rust(schemas, catalog),
        Language::C    => compile_schema_to_c(schemas, catalog),
    }
}

/// Load, verify, plan and emit every message type under the configured
/// schema roots.
///
/// Nothing is written unless every message type verifies and plans.
pub fn generate(options: &GenerateOptions) -> Result<GenerationReport, GenError> {
    // 1) Load
    let schemas = load_schemas(&options.schema_search_roots)?;
    info!(messages = schemas.len(), roots = options.schema_search_roots.len(), "loaded schemas");

    // 2) Verify and plan
    let catalog = build_catalog(&schemas)?;
    let encoders = catalog.iter().map(|set| 1 + set.partials.len()).sum();

    // 3) Render and write
    let files = render(&schemas, &catalog, options.language);
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = options.output_root.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| GenError::IoAt {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &file.contents).map_err(|source| GenError::IoAt {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote");
        written.push(path);
    }

    Ok(GenerationReport {
        language: options.language,
        messages: catalog.len(),
        encoders,
        files:    written,
    })
}

/// Parse `.msg` sources given as `(namespace, name, text)` and plan them.
/// Nothing touches the filesystem.
pub fn compile_messages(sources: &[(&str, &str, &str)]) -> Result<(SchemaSet, EncoderCatalog), GenError> {
    let mut schemas = SchemaSet::new();
    for (namespace, name, text) in sources {
        let file = format!("{}/{}.msg", namespace, name);
        schemas.insert(parse_message(namespace, name, text, &file)?);
    }
    let catalog = build_catalog(&schemas)?;
    Ok((schemas, catalog))
}

/// Plan a single message with no nested types.
pub fn compile_message(namespace: &str, name: &str, text: &str) -> Result<EncoderSet, GenError> {
    let (_, catalog) = compile_messages(&[(namespace, name, text)])?;
    let set = catalog
        .iter()
        .next()
        .cloned()
        .ok_or_else(|| GenError::UnknownMessage(format!("{}/{}", namespace, name)));
    set
}
