//! Import resolution.
//!
//! Every unique specifier is classified by the first matching rule:
//!
//! 1. absolute URL → kept as is
//! 2. relative path (`./`, `../`) → skipped, there is no filesystem
//! 3. the `@/lib/utils` shim → replaced by an inline definition
//! 4. `@/components/ui/*` → the shared UI-kit endpoint
//! 5. `@radix-ui/*` → CDN URL with React peers pinned
//! 6. registry hit (configured overrides first)
//! 7. any other local alias → skipped
//! 8. bare package name → best-effort CDN URL, reported as unresolved

use crate::config::PreviewConfig;
use crate::diagnostic::Diagnostic;
use crate::registry::REACT_PEER_DEPS;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const UTILITY_SHIM: &str = "@/lib/utils";
pub const SHARED_UI_PREFIX: &str = "@/components/ui/";
pub const SCOPED_PRIMITIVES_PREFIX: &str = "@radix-ui/";

const LOCAL_ALIAS_PREFIXES: &[&str] = &["@/", "~/", "~", "#", "/"];
const URL_SCHEMES: &[&str] = &["http", "https", "data", "blob"];

/// How a specifier is served in the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum Resolution {
    /// Already an absolute URL; left exactly as written.
    Identity,
    /// Rewritten to this URL.
    Url(String),
    /// Import removed; a local definition is inlined instead.
    InlineSubstitute,
}

/// Which rule produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    AbsoluteUrl,
    UtilityShim,
    SharedUiKit,
    ScopedPrimitives,
    Registry,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Resolved(Rule, Resolution),
    Skipped(Diagnostic),
}

/// Specifier → resolution. Keys are unique and iterate in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolutionTable {
    entries: BTreeMap<String, Resolution>,
}

impl ResolutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, specifier: impl Into<String>, resolution: Resolution) {
        self.entries.insert(specifier.into(), resolution);
    }

    pub fn get(&self, specifier: &str) -> Option<&Resolution> {
        self.entries.get(specifier)
    }

    pub fn contains(&self, specifier: &str) -> bool {
        self.entries.contains_key(specifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resolution)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Specifiers rewritten to a different URL, i.e. everything but identity and inline
    /// entries.
    pub fn rewrites(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(k, v)| match v {
            Resolution::Url(url) => Some((k.as_str(), url.as_str())),
            _ => None,
        })
    }

    pub fn uses_inline_substitute(&self) -> bool {
        self.entries
            .values()
            .any(|v| matches!(v, Resolution::InlineSubstitute))
    }

    /// The table in import-map form: `{"imports": {specifier: url}}`.
    pub fn import_map(&self) -> serde_json::Value {
        let imports: serde_json::Map<String, serde_json::Value> = self
            .rewrites()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        serde_json::json!({ "imports": imports })
    }
}

/// Result of resolving every import of a snippet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub table: ResolutionTable,
    pub uses_shared_ui_kit: bool,
    /// Unknown packages in order of first appearance.
    pub unresolved_package_names: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolved {
    pub fn has_unresolved_packages(&self) -> bool {
        !self.unresolved_package_names.is_empty()
    }
}

/// `http(s)`, `data` and `blob` URLs count as already resolved.
pub fn is_absolute_url(specifier: &str) -> bool {
    match url::Url::parse(specifier) {
        Ok(url) => URL_SCHEMES.contains(&url.scheme()),
        Err(_) => false,
    }
}

/// A plain package name: `name` or `@scope/name`, no further path segments.
pub fn is_bare_package(specifier: &str) -> bool {
    fn valid_segment(segment: &str) -> bool {
        !segment.is_empty()
            && !segment.starts_with('.')
            && segment
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
    }
    match specifier.strip_prefix('@') {
        Some(scoped) => match scoped.split_once('/') {
            Some((scope, name)) => valid_segment(scope) && valid_segment(name),
            None => false,
        },
        None => valid_segment(specifier),
    }
}

/// Apply the precedence rules to one specifier.
pub fn classify(specifier: &str, config: &PreviewConfig) -> Classification {
    if is_absolute_url(specifier) {
        return Classification::Resolved(Rule::AbsoluteUrl, Resolution::Identity);
    }
    if specifier.starts_with('.') {
        return Classification::Skipped(Diagnostic::RelativeImport {
            specifier: specifier.to_string(),
        });
    }
    if specifier == UTILITY_SHIM {
        return Classification::Resolved(Rule::UtilityShim, Resolution::InlineSubstitute);
    }
    if specifier.starts_with(SHARED_UI_PREFIX) {
        return Classification::Resolved(
            Rule::SharedUiKit,
            Resolution::Url(config.shared_ui_endpoint.clone()),
        );
    }
    if specifier.starts_with(SCOPED_PRIMITIVES_PREFIX) {
        let url = format!("{}{}?{}", config.cdn_root, specifier, REACT_PEER_DEPS);
        return Classification::Resolved(Rule::ScopedPrimitives, Resolution::Url(url));
    }
    if let Some(url) = config.package_url(specifier) {
        return Classification::Resolved(Rule::Registry, Resolution::Url(url));
    }
    if LOCAL_ALIAS_PREFIXES.iter().any(|p| specifier.starts_with(p)) {
        return Classification::Skipped(Diagnostic::LocalAlias {
            specifier: specifier.to_string(),
        });
    }
    if is_bare_package(specifier) {
        let url = format!("{}{}", config.cdn_root, specifier);
        return Classification::Resolved(Rule::Fallback, Resolution::Url(url));
    }
    Classification::Skipped(Diagnostic::UnsupportedSpecifier {
        specifier: specifier.to_string(),
    })
}

/// Resolve every specifier; duplicates are classified once.
pub fn resolve_imports<'s>(
    specifiers: impl IntoIterator<Item = &'s str>,
    config: &PreviewConfig,
) -> Resolved {
    let mut resolved = Resolved::default();
    let mut seen: Vec<&str> = Vec::new();

    for specifier in specifiers {
        if seen.contains(&specifier) {
            continue;
        }
        seen.push(specifier);

        match classify(specifier, config) {
            Classification::Resolved(rule, resolution) => {
                debug!(specifier, ?rule, ?resolution, "Resolved import");
                match (&rule, &resolution) {
                    (Rule::SharedUiKit, _) => resolved.uses_shared_ui_kit = true,
                    (Rule::Fallback, Resolution::Url(url)) => {
                        warn!(specifier, url = %url, "Unknown package, guessing CDN URL");
                        resolved.unresolved_package_names.push(specifier.to_string());
                        resolved.diagnostics.push(Diagnostic::UnresolvedPackage {
                            specifier: specifier.to_string(),
                            guessed_url: url.clone(),
                        });
                    }
                    _ => {}
                }
                resolved.table.insert(specifier, resolution);
            }
            Classification::Skipped(diagnostic) => {
                warn!(specifier, "{}", diagnostic);
                resolved.diagnostics.push(diagnostic);
            }
        }
    }
    resolved
}
