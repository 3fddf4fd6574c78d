//! Package option lists.
//!
//! Options travel between CI steps as a comma-separated list of
//! `package:option=value` entries, for example
//! `zlib:shared=True,openssl:no_asm=False`.

use std::collections::BTreeMap;

use thiserror::Error;

/// Options by package, then by option name.
pub type OptionMap = BTreeMap<String, BTreeMap<String, String>>;

/// Error parsing an option entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("option `{entry}` has no value (expected `package:option=value`)")]
    MissingValue { entry: String },

    #[error("option `{entry}` has no package (expected `package:option=value`)")]
    MissingPackage { entry: String },
}

/// Parse a list of `package:option=value` entries into a mapping.
///
/// Later entries for the same package and option win.
pub fn parse_option_list<S: AsRef<str>>(entries: &[S]) -> Result<OptionMap, OptionsError> {
    let mut options = OptionMap::new();

    for entry in entries {
        let entry = entry.as_ref().trim();
        if entry.is_empty() {
            continue;
        }

        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| OptionsError::MissingValue {
                entry: entry.to_string(),
            })?;
        let (package, option) = key
            .split_once(':')
            .filter(|(package, option)| !package.is_empty() && !option.is_empty())
            .ok_or_else(|| OptionsError::MissingPackage {
                entry: entry.to_string(),
            })?;

        options
            .entry(package.trim().to_string())
            .or_default()
            .insert(option.trim().to_string(), value.trim().to_string());
    }

    Ok(options)
}

/// Serialize options back into the comma-separated list form.
pub fn format_options(options: &OptionMap) -> String {
    options
        .iter()
        .flat_map(|(package, package_options)| {
            package_options
                .iter()
                .map(move |(option, value)| format!("{}:{}={}", package, option, value))
        })
        .collect::<Vec<_>>()
        .join(",")
}
