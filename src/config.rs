//! Preview configuration: every endpoint the generated document references, plus optional
//! registry overrides. All values are fixed for the lifetime of a run.

use crate::error::{Error, Result};
use crate::syntax::is_identifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration for preview generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// CDN root for scoped primitives and unknown packages (always ends with `/`)
    pub cdn_root: String,
    /// Module serving every `@/components/ui/*` primitive
    pub shared_ui_endpoint: String,
    /// Utility-CSS framework script
    pub tailwind_url: String,
    /// Web-font stylesheet
    pub font_stylesheet_url: String,
    /// In-browser JSX/TypeScript compiler
    pub babel_url: String,
    /// `id` of the element the component is mounted into
    pub mount_id: String,
    /// Component name used when the default export does not provide one
    pub fallback_entry: String,
    /// Extra specifier → URL pairs, consulted before the built-in registry
    pub packages: BTreeMap<String, String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            cdn_root: String::from("https://esm.sh/"),
            shared_ui_endpoint: String::from(
                "https://esm.sh/@shadcn-preview/ui@0.4.0?deps=react@18.3.1,react-dom@18.3.1",
            ),
            tailwind_url: String::from("https://cdn.tailwindcss.com"),
            font_stylesheet_url: String::from(
                "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap",
            ),
            babel_url: String::from("https://unpkg.com/@babel/standalone@7.26.2/babel.min.js"),
            mount_id: String::from("root"),
            fallback_entry: String::from("App"),
            packages: BTreeMap::new(),
        }
    }
}

impl PreviewConfig {
    /// Parse a JSON config; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn normalize(&mut self) {
        if !self.cdn_root.ends_with('/') {
            self.cdn_root.push('/');
        }
    }

    /// Check that every endpoint is an absolute URL and that the names spliced into
    /// generated code are plain identifiers.
    pub fn validate(&self) -> Result<()> {
        let endpoints = [
            ("cdn_root", &self.cdn_root),
            ("shared_ui_endpoint", &self.shared_ui_endpoint),
            ("tailwind_url", &self.tailwind_url),
            ("font_stylesheet_url", &self.font_stylesheet_url),
            ("babel_url", &self.babel_url),
        ];
        for (field, value) in endpoints {
            url::Url::parse(value).map_err(|source| Error::InvalidEndpoint {
                field,
                value: value.clone(),
                source,
            })?;
        }
        for (specifier, value) in &self.packages {
            url::Url::parse(value).map_err(|source| Error::InvalidEndpoint {
                field: "packages",
                value: format!("{} = {}", specifier, value),
                source,
            })?;
        }
        if !is_identifier(&self.fallback_entry) {
            return Err(Error::InvalidIdentifier {
                field: "fallback_entry",
                value: self.fallback_entry.clone(),
            });
        }
        let mount_id_ok = !self.mount_id.is_empty()
            && self
                .mount_id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !mount_id_ok {
            return Err(Error::InvalidIdentifier {
                field: "mount_id",
                value: self.mount_id.clone(),
            });
        }
        Ok(())
    }

    /// Registry lookup honoring configured overrides.
    pub fn package_url(&self, specifier: &str) -> Option<String> {
        self.packages
            .get(specifier)
            .cloned()
            .or_else(|| crate::registry::lookup(specifier).map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        assert!(PreviewConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PreviewConfig::from_json(
            r#"{"cdn_root": "https://cdn.example.com/npm", "packages": {"left-pad": "https://cdn.example.com/left-pad.js"}}"#,
        )
        .unwrap();
        assert_eq!(config.cdn_root, "https://cdn.example.com/npm/");
        assert_eq!(config.mount_id, "root");
        assert_eq!(
            config.package_url("left-pad").as_deref(),
            Some("https://cdn.example.com/left-pad.js")
        );
        assert_eq!(
            config.package_url("react").as_deref(),
            Some("https://esm.sh/react@18.3.1")
        );
    }

    #[test]
    fn test_override_wins_over_registry() {
        let mut config = PreviewConfig::default();
        config
            .packages
            .insert("react".into(), "https://cdn.example.com/react.js".into());
        assert_eq!(
            config.package_url("react").as_deref(),
            Some("https://cdn.example.com/react.js")
        );
    }

    #[test]
    fn test_rejects_relative_endpoint() {
        let result = PreviewConfig::from_json(r#"{"babel_url": "/babel.js"}"#);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("babel_url"));
    }

    #[test]
    fn test_rejects_bad_fallback_entry() {
        let result = PreviewConfig::from_json(r#"{"fallback_entry": "my-app"}"#);
        assert!(matches!(result, Err(Error::InvalidIdentifier { field: "fallback_entry", .. })));
    }

    #[test]
    fn test_rejects_bad_mount_id() {
        let result = PreviewConfig::from_json(r#"{"mount_id": "root\"><script>"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preview.json");
        fs::write(&path, r#"{"mount_id": "app"}"#).unwrap();
        let config = PreviewConfig::load(&path).unwrap();
        assert_eq!(config.mount_id, "app");

        let missing = PreviewConfig::load(dir.path().join("missing.json"));
        assert!(missing.unwrap_err().to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_invalid_json() {
        let result = PreviewConfig::from_json("{not json");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }
}
