//! High-level operations.
//!
//! This module contains the implementation of recipe-ci commands.

pub mod autodetect;
pub mod options;
pub mod prepare_env;
pub mod resolve;

pub use autodetect::{resolve_recipe, run_autodetect, AutodetectOptions, Outcome};
pub use options::{format_options, parse_option_list, OptionMap, OptionsError};
pub use prepare_env::{prepare_env, Platform, PrepareEnvError, PLATFORMS};
pub use resolve::{BuildStrategy, Remote, ResolveError, ResolvedConfig, Resolver};
