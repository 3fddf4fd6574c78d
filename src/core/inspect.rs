//! Recipe classification.
//!
//! A recipe falls into exactly one of three shapes. The checks form a
//! cascade: installer is tested first and ends inspection, then
//! unconditional header-only, and only plain libraries are examined for
//! the `header_only` option and for being C-only.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::recipe::RecipeDescriptor;

/// Removes the compiler from the package id: the package ships executables
/// that work with any compiler.
static DROPS_COMPILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*del\s+self\.info\.settings\.compiler\s*$").expect("valid regex")
});

static INCLUDES_BUILD_SETTINGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"self\.info\.include_build_settings\(\s*\)").expect("valid regex")
});

static HEADER_ONLY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"self\.info\.header_only\(\s*\)").expect("valid regex"));

/// Removes the C++ standard library setting: the package is plain C.
static DROPS_LIBCXX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"del\s+self\.settings\.compiler\.libcxx|self\.settings\.rm_safe\(\s*["']compiler\.libcxx["']\s*\)|self\.settings\.compiler\.rm_safe\(\s*["']libcxx["']\s*\)"#,
    )
    .expect("valid regex")
});

/// Name of the option that makes a library header-only on demand.
pub const HEADER_ONLY_OPTION: &str = "header_only";

/// Build shape of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Packages executables; nothing else is inspected
    Installer,
    /// Always header-only
    HeaderOnly,
    /// A compiled library
    Library {
        /// Declares a `header_only` option
        conditional_header_only: bool,
        /// Written in C, no C++ runtime involved
        pure_c: bool,
    },
}

impl Classification {
    pub fn is_installer(&self) -> bool {
        matches!(self, Classification::Installer)
    }

    pub fn is_unconditional_header_only(&self) -> bool {
        matches!(self, Classification::HeaderOnly)
    }

    pub fn is_conditional_header_only(&self) -> bool {
        matches!(
            self,
            Classification::Library {
                conditional_header_only: true,
                ..
            }
        )
    }

    pub fn is_pure_c(&self) -> bool {
        matches!(self, Classification::Library { pure_c: true, .. })
    }

    /// Whether the recipe builds without a compiler matrix.
    ///
    /// Installers and header-only packages produce a single package.
    pub fn is_single_configuration(&self) -> bool {
        matches!(self, Classification::Installer | Classification::HeaderOnly)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Installer => write!(f, "installer"),
            Classification::HeaderOnly => write!(f, "header-only"),
            Classification::Library {
                conditional_header_only,
                pure_c,
            } => {
                write!(f, "library")?;
                if *conditional_header_only {
                    write!(f, ", optionally header-only")?;
                }
                if *pure_c {
                    write!(f, ", C-only")?;
                }
                Ok(())
            }
        }
    }
}

fn is_installer(recipe: &RecipeDescriptor) -> bool {
    let source = recipe.source();
    INCLUDES_BUILD_SETTINGS.is_match(source)
        || (DROPS_COMPILER.is_match(source) && !HEADER_ONLY_ID.is_match(source))
}

fn is_unconditional_header_only(recipe: &RecipeDescriptor) -> bool {
    HEADER_ONLY_ID.is_match(recipe.source()) && !recipe.has_option(HEADER_ONLY_OPTION)
}

fn is_conditional_header_only(recipe: &RecipeDescriptor) -> bool {
    recipe.has_option(HEADER_ONLY_OPTION)
}

fn is_pure_c(recipe: &RecipeDescriptor) -> bool {
    DROPS_LIBCXX.is_match(recipe.source())
}

/// Classify a recipe, logging each step of the cascade.
pub fn classify(recipe: &RecipeDescriptor) -> Classification {
    let installer = is_installer(recipe);
    tracing::info!("Is the package an installer for executable(s)? {}", installer);
    if installer {
        return Classification::Installer;
    }

    let header_only = is_unconditional_header_only(recipe);
    tracing::info!("Is the package header only? {}", header_only);
    if header_only {
        return Classification::HeaderOnly;
    }

    let conditional_header_only = is_conditional_header_only(recipe);
    tracing::info!(
        "Is the package conditionally header only ('header_only' option)? {}",
        conditional_header_only
    );

    let pure_c = is_pure_c(recipe);
    tracing::info!("Is the package C-only? {}", pure_c);

    Classification::Library {
        conditional_header_only,
        pure_c,
    }
}
