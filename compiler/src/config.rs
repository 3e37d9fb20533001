use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Target language of the emitted encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Language {
    #[default]
    Rust,
    C,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Language::Rust),
            "c"           => Ok(Language::C),
            other         => Err(format!("unknown language {:?}, expected \"rust\" or \"c\"", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::Rust => "rust",
            Language::C    => "c",
        })
    }
}

/// Everything a generation run needs to know about its surroundings.
///
/// Nothing in the compiler consults the process environment; callers resolve
/// install locations themselves and pass them in here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateOptions {
    /// Directories laid out as `<root>/<package>/msg/<Type>.msg`. Earlier roots
    /// shadow later ones.
    pub schema_search_roots: Vec<PathBuf>,
    /// Directory that receives the generated tree.
    pub output_root:         PathBuf,
    pub language:            Language,
}

impl GenerateOptions {
    pub fn new(schema_search_roots: Vec<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        GenerateOptions {
            schema_search_roots,
            output_root: output_root.into(),
            language:    Language::default(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}
