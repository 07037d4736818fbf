//! TOML mapping documents.
use super::MappingEntry;
use crate::error::ConfigError;

/// Parse a TOML document whose top-level keys are targets and whose string
/// values are sources.
///
/// Order follows the document.  TOML has no null, so every key has a value;
/// an empty string counts as no source.
///
/// # Errors
///
/// Returns a [`ConfigError`] naming `file` if the content is not TOML or a
/// value is not a string.
pub fn parse(content: &str, file: &str) -> Result<Vec<MappingEntry>, ConfigError> {
    let table: toml::Table = toml::from_str(content).map_err(|e| ConfigError::InvalidSyntax {
        file: file.to_string(),
        message: e.message().to_string(),
    })?;

    table
        .into_iter()
        .map(|(target, value)| match value {
            toml::Value::String(source) if source.is_empty() => {
                Err(ConfigError::SourceNotGiven {
                    file: file.to_string(),
                    target,
                })
            }
            toml::Value::String(source) => Ok(MappingEntry::new(target, source)),
            other => Err(ConfigError::InvalidEntry {
                file: file.to_string(),
                key: target,
                message: format!("source must be a string, found {}", other.type_str()),
            }),
        })
        .collect()
}
