//! Per-level parser configuration.
//!
//! Only presentation metadata lives here; the binding schema itself is
//! declared through [`Parser`](crate::Parser) calls.

use std::ffi::OsStr;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Program name and description shown in usage summaries.
///
/// Subcommand levels derive their own config from the parent, extending the
/// program path with the subcommand name.
///
/// # Examples
///
/// ```
/// use argbind_core::ParserConfig;
///
/// let config = ParserConfig::new("calc").with_description("Tiny calculator");
/// assert_eq!(config.program.as_deref(), Some("calc"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Program path used in the usage line (e.g. `calc` or `calc add`).
    #[serde(default)]
    pub program: Option<String>,
    /// One-paragraph description printed under the usage line.
    #[serde(default)]
    pub description: Option<String>,
}

impl ParserConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: Some(program.into()),
            description: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Config for the subcommand `name` below this level.
    pub(crate) fn child(&self, name: &str, description: Option<&str>) -> Self {
        let program = match &self.program {
            Some(parent) => format!("{parent} {name}"),
            None => name.to_string(),
        };
        Self {
            program: Some(program),
            description: description.map(String::from),
        }
    }

    /// Fills a missing program name from `argv[0]`'s file name.
    pub(crate) fn or_program_from(mut self, argv0: Option<&OsStr>) -> Self {
        if self.program.is_none() {
            self.program = argv0.map(|arg| {
                Path::new(arg)
                    .file_name()
                    .unwrap_or(arg)
                    .to_string_lossy()
                    .into_owned()
            });
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_extends_program_path() {
        let root = ParserConfig::new("calc").with_description("Calculator");
        let child = root.child("add", Some("Add two numbers"));
        assert_eq!(child.program.as_deref(), Some("calc add"));
        assert_eq!(child.description.as_deref(), Some("Add two numbers"));

        let grandchild = child.child("fast", None);
        assert_eq!(grandchild.program.as_deref(), Some("calc add fast"));
        assert_eq!(grandchild.description, None);
    }

    #[test]
    fn test_program_from_argv0() {
        let config = ParserConfig::default().or_program_from(Some(OsStr::new("/usr/local/bin/calc")));
        assert_eq!(config.program.as_deref(), Some("calc"));

        let explicit = ParserConfig::new("mine").or_program_from(Some(OsStr::new("/bin/other")));
        assert_eq!(explicit.program.as_deref(), Some("mine"));
    }

    #[test]
    fn test_deserializes_partial_config() {
        let config: ParserConfig = serde_json::from_str(r#"{"program": "tool"}"#).unwrap();
        assert_eq!(config, ParserConfig::new("tool"));
    }
}
