//! External package builder.
//!
//! The resolved configuration is handed to a multi-configuration package
//! builder that runs the actual build matrix and uploads the results.

pub mod multi_packager;

use anyhow::Result;

use crate::ops::resolve::ResolvedConfig;
use crate::util::env::EnvSnapshot;

pub use multi_packager::{builder_env, MultiPackager};

/// A builder that runs the build matrix for a resolved configuration.
pub trait PackageBuilder {
    /// Build (and possibly upload) the package.
    ///
    /// `env` is the environment the build runs in.
    fn run(&mut self, config: &ResolvedConfig, env: &EnvSnapshot) -> Result<()>;
}
