//! Authoring-convention detection.
//!
//! Purely heuristic and only used for display; resolution never depends on the tag.

use crate::resolve::{is_absolute_url, SHARED_UI_PREFIX};
use crate::syntax::Module;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Bare package imports (`react`, `lucide-react`); the default.
    Claude,
    /// Imports already written as CDN URLs.
    Gemini,
    /// Imports shared primitives through the `@/components/ui/` alias.
    V0,
    /// A complete HTML document.
    Html,
}

impl Platform {
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Claude => "Claude Artifact",
            Platform::Gemini => "Gemini Canvas",
            Platform::V0 => "v0",
            Platform::Html => "HTML",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// True when the text opens with `<!doctype`, ignoring case, leading whitespace and a BOM.
pub fn is_markup(source: &str) -> bool {
    let trimmed = source.trim_start_matches('\u{feff}').trim_start();
    trimmed
        .get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"))
}

/// Classify by import sources: any absolute URL wins over any shared-UI alias.
pub fn platform_for<'s>(specifiers: impl IntoIterator<Item = &'s str>) -> Platform {
    let mut platform = Platform::Claude;
    for specifier in specifiers {
        if is_absolute_url(specifier) {
            return Platform::Gemini;
        }
        if specifier.starts_with(SHARED_UI_PREFIX) {
            platform = Platform::V0;
        }
    }
    platform
}

/// Detect the convention of a raw snippet.
pub fn detect(source: &str) -> Platform {
    if is_markup(source) {
        return Platform::Html;
    }
    let module = Module::parse(source);
    let imports = module.imports();
    platform_for(imports.iter().map(|i| i.specifier.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_detection() {
        assert!(is_markup("<!DOCTYPE html><html></html>"));
        assert!(is_markup("\n  <!doctype html>"));
        assert!(is_markup("\u{feff}<!DocType html>"));
        assert!(!is_markup("<html></html>"));
        assert!(!is_markup("const a = '<!doctype html>'"));
        assert!(!is_markup("<!doc"));
        assert_eq!(detect("<!doctype html><p>hi</p>"), Platform::Html);
    }

    #[test]
    fn test_url_imports_are_gemini() {
        let src = "import { Button } from '@/components/ui/button';\nimport React from 'https://esm.sh/react@18';";
        assert_eq!(detect(src), Platform::Gemini);
    }

    #[test]
    fn test_shared_ui_alias_is_v0() {
        let src = "import { Card } from \"@/components/ui/card\"\nimport { cn } from \"@/lib/utils\"";
        assert_eq!(detect(src), Platform::V0);
    }

    #[test]
    fn test_default_is_claude() {
        assert_eq!(detect("import React from 'react';"), Platform::Claude);
        assert_eq!(detect(""), Platform::Claude);
        assert_eq!(detect("const x = 'https://example.com';"), Platform::Claude);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Platform::V0.to_string(), "v0");
        assert_eq!(Platform::Claude.label(), "Claude Artifact");
    }
}
