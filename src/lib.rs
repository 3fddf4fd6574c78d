//! recipe-ci - Recipe autodetection and CI environment preparation for
//! multi-configuration package builds
//!
//! This crate provides the library behind the `recipe-ci` binary:
//! recipe inspection, build configuration resolution, and per-job
//! environment preparation for CI platforms.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for recipe-ci unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a mock command executor, a recording package
/// builder, and recipe fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{classify, Classification, DirectoryStructure, RecipeDescriptor};
pub use builder::{MultiPackager, PackageBuilder};
pub use ops::{prepare_env, run_autodetect, ResolvedConfig, Resolver};
pub use util::context::GlobalContext;
