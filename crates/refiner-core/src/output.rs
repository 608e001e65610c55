//! Enhanced prompt output and file export.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{RefinerError, Result};

/// Framing of the enhanced prompt.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    /// File extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => ".md",
            OutputFormat::Json => ".json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "text/markdown",
            OutputFormat::Json => "application/json",
        }
    }
}

/// The final prompt produced by an enhance call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedPrompt {
    #[serde(rename = "enhancedPrompt")]
    pub enhanced_text: String,
    pub format: OutputFormat,
}

impl EnhancedPrompt {
    /// Packages the text as a downloadable artifact named `<basename><ext>`.
    pub fn to_artifact(&self, basename: &str) -> Result<ExportArtifact> {
        ExportArtifact::new(basename, self.format, self.enhanced_text.clone())
    }
}

/// A file ready to be written or offered for download.
///
/// The content is the gateway's text, unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub content: String,
}

impl ExportArtifact {
    pub fn new(basename: &str, format: OutputFormat, content: String) -> Result<Self> {
        let basename = basename.trim();
        if basename.is_empty() {
            return Err(RefinerError::validation("Export file name must not be empty"));
        }
        if basename.contains(['/', '\\']) || basename == "." || basename == ".." {
            return Err(RefinerError::validation(format!(
                "Export file name '{basename}' must not contain path separators"
            )));
        }

        Ok(Self {
            file_name: format!("{basename}{}", format.extension()),
            mime_type: format.mime_type().to_string(),
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_artifact() {
        let prompt = EnhancedPrompt {
            enhanced_text: "# Task\nWrite a haiku".into(),
            format: OutputFormat::Markdown,
        };
        let artifact = prompt.to_artifact("enhanced-prompt").unwrap();
        assert_eq!(artifact.file_name, "enhanced-prompt.md");
        assert_eq!(artifact.mime_type, "text/markdown");
        assert_eq!(artifact.content, prompt.enhanced_text);
    }

    #[test]
    fn test_json_artifact() {
        let artifact =
            ExportArtifact::new("prompt", OutputFormat::Json, "{\"task\":\"x\"}".into()).unwrap();
        assert_eq!(artifact.file_name, "prompt.json");
        assert_eq!(artifact.mime_type, "application/json");
    }

    #[test]
    fn test_rejects_bad_basenames() {
        for name in ["", "  ", "../x", "a/b", ".."] {
            assert!(ExportArtifact::new(name, OutputFormat::Json, String::new()).is_err());
        }
    }

    #[test]
    fn test_format_wire_names() {
        assert_eq!(serde_json::to_string(&OutputFormat::Markdown).unwrap(), "\"markdown\"");
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    }
}
