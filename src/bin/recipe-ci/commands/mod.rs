//! Command implementations

pub mod autodetect;
pub mod completions;
pub mod inspect;
pub mod prepare_env;
pub mod resolve;
