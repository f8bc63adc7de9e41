//! Loading of gameplay rule overrides from TOML files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use rewind_core::Rules;

/// Reads the rules at `path`, falling back to the defaults when no file is
/// given. Keys missing from the file keep their default values.
pub(crate) fn load(path: Option<&Path>) -> Result<Rules> {
    let Some(path) = path else {
        return Ok(Rules::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid rules file {}", path.display()))
}

fn parse(text: &str) -> Result<Rules, toml::de::Error> {
    toml::from_str(text)
}
