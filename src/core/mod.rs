//! Core recipe model.
//!
//! This module contains what is known about a recipe before anything runs:
//! - The recipe descriptor scanned from `conanfile.py`
//! - The repository layout it was found in
//! - Its classification (installer, header-only, library)

pub mod inspect;
pub mod layout;
pub mod recipe;

pub use inspect::{classify, Classification};
pub use layout::{custom_build_script, DirectoryStructure, LayoutError};
pub use recipe::{RecipeDescriptor, RecipeError};
