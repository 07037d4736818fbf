//! YAML mapping documents.
use serde_yaml::Value;

use super::MappingEntry;
use crate::error::ConfigError;

/// Parse a YAML document whose top level maps targets to sources.
///
/// An empty document (or one holding only comments or `~`) has no entries.
/// Keys and values may be strings or numbers; a key with no value is
/// [`ConfigError::SourceNotGiven`].
///
/// # Errors
///
/// Returns a [`ConfigError`] naming `file` if the content is not YAML, the
/// top level is not a mapping, or an entry is malformed.
pub fn parse(content: &str, file: &str) -> Result<Vec<MappingEntry>, ConfigError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidSyntax {
        file: file.to_string(),
        message: e.to_string(),
    })?;

    let mapping = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(ConfigError::InvalidSyntax {
                file: file.to_string(),
                message: format!(
                    "expected a mapping of target: source, found {}",
                    kind(&other)
                ),
            });
        }
    };

    mapping
        .into_iter()
        .map(|(key, value)| entry(&key, &value, file))
        .collect()
}

fn entry(key: &Value, value: &Value, file: &str) -> Result<MappingEntry, ConfigError> {
    let target = scalar_text(key)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ConfigError::InvalidEntry {
            file: file.to_string(),
            key: render(key),
            message: "target must be a non-empty string".to_string(),
        })?;

    match value {
        Value::Null => Err(ConfigError::SourceNotGiven {
            file: file.to_string(),
            target,
        }),
        Value::String(s) if s.is_empty() => Err(ConfigError::SourceNotGiven {
            file: file.to_string(),
            target,
        }),
        _ => {
            let Some(source) = scalar_text(value) else {
                return Err(ConfigError::InvalidEntry {
                    file: file.to_string(),
                    key: target,
                    message: format!("source must be a string, found {}", kind(value)),
                });
            };
            Ok(MappingEntry::new(target, source))
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn render(value: &Value) -> String {
    serde_yaml::to_string(value).map_or_else(
        |_| kind(value).to_string(),
        |s| s.trim_end().to_string(),
    )
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
