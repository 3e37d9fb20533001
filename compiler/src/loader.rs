use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{
    error::GenError,
    parser::parse_message,
    types::{MessageSchema, SchemaSet},
};

const MSG_DIR: &str = "msg";
const MSG_EXTENSION: &str = "msg";

/// Load every `<root>/<package>/msg/*.msg` file under `roots`.
///
/// Packages and files are visited in sorted order so repeated runs see the
/// same set in the same order. When a type appears under several roots the
/// first root wins.
pub fn load_schemas(roots: &[PathBuf]) -> Result<SchemaSet, GenError> {
    let mut set = SchemaSet::new();

    for root in roots {
        debug!(root = %root.display(), "scanning schema root");
        for package_dir in sorted_entries(root)? {
            if !package_dir.is_dir() {
                continue;
            }
            let msg_dir = package_dir.join(MSG_DIR);
            if !msg_dir.is_dir() {
                continue;
            }
            let Some(namespace) = file_name(&package_dir) else {
                continue;
            };

            for path in sorted_entries(&msg_dir)? {
                if path.extension().and_then(|e| e.to_str()) != Some(MSG_EXTENSION) {
                    continue;
                }
                let schema = load_message_file(&path, &namespace)?;
                let key = schema.message_ref();
                if !set.insert(schema) {
                    warn!(message = %key, path = %path.display(), "shadowed by an earlier schema root");
                }
            }
        }
    }

    Ok(set)
}

/// Parse one `.msg` file. The type name is the file stem.
pub fn load_message_file(path: &Path, namespace: &str) -> Result<MessageSchema, GenError> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| GenError::Parse {
            file: path.display().to_string(),
            line: 0,
            msg:  "File name is not a valid type name".to_string(),
        })?;
    let text = fs::read_to_string(path).map_err(|source| GenError::IoAt {
        path: path.to_path_buf(),
        source,
    })?;
    parse_message(namespace, name, &text, &path.display().to_string())
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, GenError> {
    let io_error = |source| GenError::IoAt {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        entries.push(entry.map_err(io_error)?.path());
    }
    entries.sort();
    Ok(entries)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().and_then(|s| s.to_str()).map(str::to_string)
}
