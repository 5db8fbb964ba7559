//! Grammars bundled with the workspace.
//!
//! The registry accepts any Tree-sitter [`tree_sitter::Language`] under any
//! name. [`BuiltinGrammar`] enumerates the grammars linked into this crate so
//! callers can load them by name or detect them from a script's path.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// Grammars linked into the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuiltinGrammar {
    /// Bash and POSIX-like shell scripts.
    #[default]
    Bash,
    /// Python scripts.
    Python,
    /// Rust sources.
    Rust,
    /// TypeScript sources, including TSX.
    TypeScript,
}

impl BuiltinGrammar {
    /// Detects the grammar from a file extension.
    ///
    /// Returns `None` if the extension is not recognised.
    ///
    /// # Examples
    ///
    /// ```
    /// use priv8_syntax::BuiltinGrammar;
    ///
    /// assert_eq!(BuiltinGrammar::from_extension("sh"), Some(BuiltinGrammar::Bash));
    /// assert_eq!(BuiltinGrammar::from_extension("json"), None);
    /// ```
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let normalised = ext.to_ascii_lowercase();
        match normalised.as_str() {
            "sh" | "bash" | "zsh" | "ksh" => Some(Self::Bash),
            "py" | "pyi" => Some(Self::Python),
            "rs" => Some(Self::Rust),
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            _ => None,
        }
    }

    /// Detects the grammar from a file path by examining its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Returns the Tree-sitter grammar handle.
    #[must_use]
    pub fn language(self) -> tree_sitter::Language {
        match self {
            Self::Bash => tree_sitter_bash::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            // TSX is a superset, so `.tsx` files parse as well.
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Returns the registry name this grammar is loaded under.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Python => "python",
            Self::Rust => "rust",
            Self::TypeScript => "typescript",
        }
    }

    /// Returns all bundled grammars.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Bash, Self::Python, Self::Rust, Self::TypeScript]
    }
}

impl fmt::Display for BuiltinGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error raised when a grammar name is not one of the bundled grammars.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown grammar: '{0}'")]
pub struct GrammarNameError(String);

impl GrammarNameError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for BuiltinGrammar {
    type Err = GrammarNameError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "bash" | "sh" | "shell" => Ok(Self::Bash),
            "python" | "py" => Ok(Self::Python),
            "rust" | "rs" => Ok(Self::Rust),
            "typescript" | "ts" => Ok(Self::TypeScript),
            other => Err(GrammarNameError(other.to_owned())),
        }
    }
}
