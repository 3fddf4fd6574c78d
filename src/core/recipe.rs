//! Recipe descriptor.
//!
//! A recipe is a `conanfile.py`. recipe-ci never executes it; a small
//! scanner reads the class-level assignments it needs:
//!
//! ```python
//! class ZlibConan(ConanFile):
//!     name = "zlib"
//!     version = "1.2.11"
//!     options = {"shared": [True, False], "fPIC": [True, False]}
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::layout::DirectoryStructure;

/// Error reading or scanning a recipe.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("recipe does not declare `{field}`")]
    MissingField { field: &'static str },

    #[error("failed to read recipe {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What recipe-ci knows about a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDescriptor {
    name: String,
    version: Option<String>,
    options: BTreeSet<String>,
    structure: DirectoryStructure,
    source: String,
}

impl RecipeDescriptor {
    /// Scan recipe text.
    ///
    /// `name` is required. `version` is optional because recipes in
    /// multi-version layouts receive it from the environment.
    pub fn parse(source: &str) -> Result<Self, RecipeError> {
        let name = find_assignment(source, "name").ok_or(RecipeError::MissingField { field: "name" })?;
        let version = find_assignment(source, "version");
        let options = find_options(source).unwrap_or_default();

        Ok(RecipeDescriptor {
            name,
            version,
            options,
            structure: DirectoryStructure::SingleRecipe,
            source: source.to_string(),
        })
    }

    /// Read and scan a recipe file.
    pub fn load(path: &Path) -> Result<Self, RecipeError> {
        let source = std::fs::read_to_string(path).map_err(|source| RecipeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let recipe = Self::parse(&source)?;
        tracing::debug!(
            "read recipe `{}` ({}) from {}",
            recipe.name,
            recipe.version.as_deref().unwrap_or("no version"),
            path.display()
        );
        Ok(recipe)
    }

    /// Set the directory structure the recipe was found in.
    pub fn with_structure(mut self, structure: DirectoryStructure) -> Self {
        self.structure = structure;
        self
    }

    /// Package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Package version, if the recipe declares one.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Package version, failing if the recipe does not declare one.
    pub fn require_version(&self) -> Result<&str, RecipeError> {
        self.version()
            .ok_or(RecipeError::MissingField { field: "version" })
    }

    /// Names declared in the `options` block.
    pub fn options(&self) -> &BTreeSet<String> {
        &self.options
    }

    /// Whether the `options` block declares the given option.
    pub fn has_option(&self, option: &str) -> bool {
        self.options.contains(option)
    }

    /// Whether the recipe declares a `shared` option.
    pub fn is_shared(&self) -> bool {
        self.has_option("shared")
    }

    /// Directory structure the recipe lives in.
    pub fn structure(&self) -> DirectoryStructure {
        self.structure
    }

    /// Full recipe text.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Strip `key` followed by `=` (but not `==`) from the start of a line.
fn strip_assignment<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.trim_start().strip_prefix(key)?;
    if !rest.starts_with(|c: char| c == '=' || c.is_whitespace()) {
        return None;
    }
    let rest = rest.trim_start().strip_prefix('=')?;
    if rest.starts_with('=') {
        return None;
    }
    Some(rest.trim_start())
}

/// Find the first `key = "value"` assignment with a single-token value.
fn find_assignment(source: &str, key: &str) -> Option<String> {
    source.lines().find_map(|line| {
        let rest = strip_assignment(line, key)?;
        let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let body = &rest[1..];
        let end = body.find(quote)?;
        let value = &body[..end];
        if value.chars().any(char::is_whitespace) {
            return None;
        }
        Some(value.to_string())
    })
}

/// Collect the keys of the `options = {...}` dictionary.
///
/// Returns `None` when the recipe has no `options` assignment or its value
/// is not a dictionary literal. An unterminated block yields the keys seen
/// before end of input.
fn find_options(source: &str) -> Option<BTreeSet<String>> {
    let mut offset = 0;
    let mut block_start = None;
    for line in source.split_inclusive('\n') {
        if let Some(rest) = strip_assignment(line, "options") {
            block_start = Some(offset + line.len() - rest.len());
            break;
        }
        offset += line.len();
    }

    let body = source[block_start?..].strip_prefix('{')?;
    Some(dict_keys(body))
}

/// Scan a dictionary body (after the opening brace) for top-level keys.
fn dict_keys(body: &str) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    let mut depth = 1usize;
    let mut last_string: Option<String> = None;
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                let mut literal = String::new();
                while let Some(n) = chars.next() {
                    if n == '\\' {
                        chars.next();
                        continue;
                    }
                    if n == c {
                        break;
                    }
                    literal.push(n);
                }
                last_string = Some(literal);
                continue;
            }
            '#' => {
                for n in chars.by_ref() {
                    if n == '\n' {
                        break;
                    }
                }
                continue;
            }
            ':' if depth == 1 => {
                if let Some(key) = last_string.take() {
                    keys.insert(key);
                }
            }
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            c if c.is_whitespace() => continue,
            _ => {}
        }
        last_string = None;
    }

    keys
}
