// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

/// Errors raised while loading or checking renderer options.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("invalid {field}: '{value}'")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("options file is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Caller-supplied identifiers for the generated unit set. Every output
/// unit of one render shares these; the renderer is the single source of
/// truth for how they appear in generated code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Class or struct name of the generated scanner.
    pub class_name: String,

    /// Namespace (or identifier prefix, for backends without namespaces).
    pub namespace: String,

    /// Base name of the emitted files, without extension.
    pub base_file_name: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            class_name: "LexicalAnalyzer".to_string(),
            namespace: "Lexgen".to_string(),
            base_file_name: "LexicalAnalyzer".to_string(),
        }
    }
}

impl RenderOptions {
    /// Load options from a TOML document; absent fields fall back to the
    /// defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, OptionsError> {
        #[derive(Deserialize)]
        struct Partial {
            class_name: Option<String>,
            namespace: Option<String>,
            base_file_name: Option<String>,
        }
        let partial: Partial = toml::from_str(text)?;
        let defaults = Self::default();
        let class_name = partial.class_name.unwrap_or(defaults.class_name);
        Ok(Self {
            namespace: partial.namespace.unwrap_or(defaults.namespace),
            // The file name tracks the class name unless set explicitly
            base_file_name: partial.base_file_name.unwrap_or_else(|| class_name.clone()),
            class_name,
        })
    }

    /// Check identifier syntax for every field. Backends additionally
    /// reject their own reserved keywords.
    pub fn validate(&self) -> Result<(), OptionsError> {
        for (field, value) in [
            ("class name", &self.class_name),
            ("namespace", &self.namespace),
            ("base file name", &self.base_file_name),
        ] {
            if !lexgen_ir::token_table::is_identifier(value) {
                return Err(OptionsError::InvalidIdentifier {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Runtime-configurable emission preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitPreferences {
    /// Whether to emit the demo driver unit alongside the scanner.
    pub include_demo: bool,

    /// Whether to log per-placeholder render details.
    pub log_render_details: bool,
}

impl Default for EmitPreferences {
    fn default() -> Self {
        Self {
            include_demo: env::var("LEXGEN_INCLUDE_DEMO")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_render_details: env::var("LEXGEN_LOG_RENDER_DETAILS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn default_file_name_tracks_class_name() {
        let options = RenderOptions::from_toml_str("class_name = \"MyLexer\"").unwrap();
        assert_eq!(options.class_name, "MyLexer");
        assert_eq!(options.base_file_name, "MyLexer");
        assert_eq!(options.namespace, "Lexgen");
    }

    #[test]
    fn explicit_file_name_wins() {
        let options =
            RenderOptions::from_toml_str("class_name = \"MyLexer\"\nbase_file_name = \"scan\"")
                .unwrap();
        assert_eq!(options.base_file_name, "scan");
    }

    #[test]
    fn validate_rejects_non_identifiers() {
        let mut options = RenderOptions::default();
        options.namespace = "9bad".to_string();
        assert_matches!(
            options.validate(),
            Err(OptionsError::InvalidIdentifier { field: "namespace", .. })
        );
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert_matches!(
            RenderOptions::from_toml_str("class_name = "),
            Err(OptionsError::Toml(_))
        );
    }
}
