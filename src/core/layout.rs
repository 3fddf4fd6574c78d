//! Repository layout detection.
//!
//! Three layouts are recognized:
//!
//! ```text
//! single recipe          one recipe, many versions     multi-recipe (CCI)
//! ./conanfile.py         ./config.yml                  ./recipes/<name>/config.yml
//!                        ./<folder>/conanfile.py       ./recipes/<name>/<folder>/conanfile.py
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::util::context::RECIPE_FILE;

/// Name of the custom build script that takes over the whole build.
pub const CUSTOM_BUILD_SCRIPT: &str = "build.py";

/// Error detecting the repository layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("no recipe found in {}", dir.display())]
    NoRecipe { dir: PathBuf },
}

/// How recipes are arranged in the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryStructure {
    /// `conanfile.py` at the repository root
    SingleRecipe,
    /// `config.yml` at the root mapping versions to recipe folders
    OneRecipeManyVersions,
    /// `recipes/<name>/...`, the conan-center-index layout
    Cci,
}

impl DirectoryStructure {
    /// Detect the layout of the repository rooted at `root`.
    pub fn detect(root: &Path) -> Result<Self, LayoutError> {
        let structure = if root.join(RECIPE_FILE).is_file() {
            DirectoryStructure::SingleRecipe
        } else if root.join("config.yml").is_file() {
            DirectoryStructure::OneRecipeManyVersions
        } else if root.join("recipes").is_dir() {
            DirectoryStructure::Cci
        } else {
            return Err(LayoutError::NoRecipe {
                dir: root.to_path_buf(),
            });
        };

        tracing::debug!("detected {} layout in {}", structure, root.display());
        Ok(structure)
    }

    /// Whether the layout holds several versions of a recipe.
    ///
    /// Such repositories build from their default branch, so the stable
    /// branch pattern defaults to `main`.
    pub fn is_multi_version(&self) -> bool {
        matches!(
            self,
            DirectoryStructure::OneRecipeManyVersions | DirectoryStructure::Cci
        )
    }
}

impl fmt::Display for DirectoryStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryStructure::SingleRecipe => write!(f, "single-recipe"),
            DirectoryStructure::OneRecipeManyVersions => write!(f, "one-recipe-many-versions"),
            DirectoryStructure::Cci => write!(f, "multi-recipe"),
        }
    }
}

/// Find a custom build script next to the recipe.
pub fn custom_build_script(recipe_dir: &Path) -> Option<PathBuf> {
    let script = recipe_dir.join(CUSTOM_BUILD_SCRIPT);
    script.is_file().then_some(script)
}
