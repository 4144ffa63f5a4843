//! The normalization pipeline: detect → resolve → transform → synthesize.
//!
//! Every step is a pure function of the snippet and the configuration. Nothing is cached
//! between runs, so callers may run previews concurrently and simply keep the latest result.

use crate::config::PreviewConfig;
use crate::detect::{is_markup, platform_for, Platform};
use crate::diagnostic::Diagnostic;
use crate::document::{synthesize, PreviewDocument};
use crate::resolve::{resolve_imports, ResolutionTable};
use crate::transform::{transform, Analysis, EntryPoint, ExportShape};
use serde::Serialize;
use tracing::{info, info_span};

/// Everything known about a snippet after normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizationResult {
    /// Transformed code (the raw text for markup input)
    pub code: String,
    pub resolution_table: ResolutionTable,
    pub is_markup: bool,
    pub uses_shared_ui_kit: bool,
    pub has_unresolved_packages: bool,
    /// Unknown packages, in order of first appearance
    pub unresolved_package_names: Vec<String>,
    pub platform: Platform,
    /// Component the document mounts; `None` for markup
    pub entry: Option<EntryPoint>,
    pub diagnostics: Vec<Diagnostic>,
}

impl NormalizationResult {
    fn markup(source: &str) -> Self {
        Self {
            code: source.to_string(),
            resolution_table: ResolutionTable::new(),
            is_markup: true,
            uses_shared_ui_kit: false,
            has_unresolved_packages: false,
            unresolved_package_names: Vec::new(),
            platform: Platform::Html,
            entry: None,
            diagnostics: Vec::new(),
        }
    }

    /// True when the mounted name came from the fallback rather than the snippet.
    pub fn uses_fallback_entry(&self) -> bool {
        self.entry.as_ref().is_some_and(|e| {
            matches!(e.shape, ExportShape::Unrecognized | ExportShape::Missing)
        })
    }
}

/// A normalized snippet together with its document.
#[derive(Debug, Clone)]
pub struct Preview {
    pub result: NormalizationResult,
    pub document: PreviewDocument,
}

/// Normalize a snippet. Never fails: problems are reported through flags and diagnostics.
pub fn normalize(source: &str, config: &PreviewConfig) -> NormalizationResult {
    let _span = info_span!("normalize", bytes = source.len()).entered();

    if is_markup(source) {
        info!("Markup input, passing through");
        return NormalizationResult::markup(source);
    }

    let analysis = Analysis::new(source);
    let platform = platform_for(analysis.specifiers());
    let resolved = resolve_imports(analysis.specifiers(), config);
    let transformed = transform(&analysis, &resolved.table, config);

    let mut diagnostics = resolved.diagnostics;
    diagnostics.extend(transformed.diagnostics);

    info!(
        platform = %platform,
        imports = resolved.table.len(),
        unresolved = resolved.unresolved_package_names.len(),
        entry = %transformed.entry.name,
        "Normalized snippet"
    );

    NormalizationResult {
        code: transformed.code,
        has_unresolved_packages: !resolved.unresolved_package_names.is_empty(),
        resolution_table: resolved.table,
        is_markup: false,
        uses_shared_ui_kit: resolved.uses_shared_ui_kit,
        unresolved_package_names: resolved.unresolved_package_names,
        platform,
        entry: Some(transformed.entry),
        diagnostics,
    }
}

/// Normalize and synthesize in one step.
pub fn build_preview(source: &str, config: &PreviewConfig) -> Preview {
    let result = normalize(source, config);
    let document = synthesize(&result, config);
    Preview { result, document }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Resolution;

    #[test]
    fn test_markup_result() {
        let result = normalize("<!DOCTYPE html><p>x</p>", &PreviewConfig::default());
        assert!(result.is_markup);
        assert!(result.resolution_table.is_empty());
        assert_eq!(result.platform, Platform::Html);
        assert_eq!(result.entry, None);
    }

    #[test]
    fn test_v0_snippet() {
        let src = r#"import { Button } from "@/components/ui/button"
import { Card, CardContent } from "@/components/ui/card"
import { cn } from "@/lib/utils"

export default function Component() {
  return (
    <Card className={cn("p-4", "shadow")}>
      <CardContent><Button>Go</Button></CardContent>
    </Card>
  )
}"#;
        let config = PreviewConfig::default();
        let result = normalize(src, &config);
        assert_eq!(result.platform, Platform::V0);
        assert!(result.uses_shared_ui_kit);
        assert!(!result.has_unresolved_packages);
        assert_eq!(
            result.resolution_table.get("@/components/ui/card"),
            Some(&Resolution::Url(config.shared_ui_endpoint.clone()))
        );
        assert_eq!(
            result.resolution_table.get("@/lib/utils"),
            Some(&Resolution::InlineSubstitute)
        );
        assert_eq!(result.entry.as_ref().map(|e| e.name.as_str()), Some("Component"));
        assert!(!result.uses_fallback_entry());
    }

    #[test]
    fn test_unresolved_flags() {
        let src = "import confetti from 'canvas-confetti-xyz';\nexport default function App() { return null }";
        let result = normalize(src, &PreviewConfig::default());
        assert!(result.has_unresolved_packages);
        assert_eq!(result.unresolved_package_names, vec!["canvas-confetti-xyz"]);
        assert!(result.code.contains("'https://esm.sh/canvas-confetti-xyz'"));
    }

    #[test]
    fn test_build_preview() {
        let preview = build_preview(
            "export default () => <div />",
            &PreviewConfig::default(),
        );
        assert!(preview.result.uses_fallback_entry());
        assert!(preview.document.as_str().starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_serializes_result() {
        let result = normalize("import x from 'zzz-unknown';", &PreviewConfig::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["platform"], "claude");
        assert_eq!(json["resolution_table"]["zzz-unknown"]["kind"], "url");
        assert_eq!(json["unresolved_package_names"][0], "zzz-unknown");
        assert_eq!(json["entry"]["shape"], "missing");
    }
}
