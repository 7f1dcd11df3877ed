//! Injected language profile: block marker, keyword set, indent unit.
//!
//! Auto-indent and indentation-block expansion read only this profile,
//! so a host can make the engine colon-blocked (Python-style) or
//! brace-blocked (C-style) without touching the engine itself.
//! Profiles persist as YAML alongside the host's other configuration.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Block and comment conventions for the language being edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageProfile {
    /// Profile identifier (e.g., "colon-blocks")
    #[serde(default = "default_name")]
    pub name: String,
    /// Token that opens an indentation block when a line ends with it
    pub block_marker: String,
    /// Keywords whose lines open a block even without the marker check
    #[serde(default)]
    pub block_keywords: Vec<String>,
    /// One unit of indentation, inserted on Tab and block-opening Enter
    pub indent_unit: String,
    /// Line comment introducer; delimiters after it are ignored by the scanner
    pub line_comment: String,
}

fn default_name() -> String {
    "colon-blocks".to_string()
}

impl LanguageProfile {
    /// Colon-terminated headers with Python-style keywords
    pub fn colon_blocks() -> Self {
        Self {
            name: "colon-blocks".to_string(),
            block_marker: ":".to_string(),
            block_keywords: [
                "class", "def", "if", "elif", "else", "for", "while", "try", "except",
                "finally", "with",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            indent_unit: "    ".to_string(),
            line_comment: "#".to_string(),
        }
    }

    /// Brace-terminated headers with C/Rust-style keywords
    pub fn brace_blocks() -> Self {
        Self {
            name: "brace-blocks".to_string(),
            block_marker: "{".to_string(),
            block_keywords: [
                "fn", "if", "else", "for", "while", "loop", "match", "impl", "struct",
                "enum", "trait",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            indent_unit: "    ".to_string(),
            line_comment: "//".to_string(),
        }
    }

    /// Last character of the block marker, for caret-on-marker checks
    pub fn marker_char(&self) -> Option<char> {
        self.block_marker.chars().last()
    }

    /// Check if a line (stripped) ends with the block marker
    pub fn line_ends_with_marker(&self, line: &str) -> bool {
        let stripped = line.trim();
        !stripped.is_empty() && stripped.ends_with(&self.block_marker)
    }

    /// Whether a newline inserted after this line should indent one unit
    /// deeper: the stripped line ends with the marker or starts with a
    /// block keyword.
    pub fn line_opens_block(&self, line: &str) -> bool {
        let stripped = line.trim();
        if stripped.is_empty() {
            return false;
        }
        if stripped.ends_with(&self.block_marker) {
            return true;
        }
        let first = stripped
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .next()
            .unwrap_or("");
        self.block_keywords.iter().any(|k| k == first)
    }

    /// Load a profile from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read profile at {}", path.display()))?;
        let profile = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse profile at {}", path.display()))?;
        Ok(profile)
    }

    /// Save a profile to a YAML file, creating parent directories
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(self).context("failed to serialize profile")?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write profile to {}", path.display()))?;
        Ok(())
    }
}

impl Default for LanguageProfile {
    fn default() -> Self {
        Self::colon_blocks()
    }
}
