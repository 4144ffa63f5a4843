//! Non-fatal findings collected while normalizing a snippet.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// `./x` or `../x`: there is no filesystem behind the preview, so it stays unresolved.
    RelativeImport { specifier: String },
    /// A project-local alias such as `@/hooks/x` or `~/x`.
    LocalAlias { specifier: String },
    /// Neither a URL, an alias nor a plain package name (e.g. a deep subpath or `node:fs`).
    UnsupportedSpecifier { specifier: String },
    /// Not in the registry; mapped to a guessed CDN URL.
    UnresolvedPackage { specifier: String, guessed_url: String },
    /// The default export has a shape that does not name a component.
    UnrecognizedDefaultExport { fallback: String },
    /// No default export and no manual mount call to take the component from.
    MissingDefaultExport { fallback: String },
    /// The auto-mount stanza references a name with no top-level declaration.
    MissingEntryDeclaration { name: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RelativeImport { specifier } => {
                write!(f, "relative import '{}' cannot be resolved in a preview", specifier)
            }
            Self::LocalAlias { specifier } => {
                write!(f, "local alias '{}' is not available in a preview", specifier)
            }
            Self::UnsupportedSpecifier { specifier } => {
                write!(f, "unsupported module specifier '{}'", specifier)
            }
            Self::UnresolvedPackage {
                specifier,
                guessed_url,
            } => write!(f, "unknown package '{}', guessing {}", specifier, guessed_url),
            Self::UnrecognizedDefaultExport { fallback } => write!(
                f,
                "default export is not a named function, anonymous function or identifier; mounting '{}'",
                fallback
            ),
            Self::MissingDefaultExport { fallback } => {
                write!(f, "no default export found; mounting '{}'", fallback)
            }
            Self::MissingEntryDeclaration { name } => {
                write!(f, "entry point '{}' is not declared at top level", name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_kind_tag() {
        let diag = Diagnostic::RelativeImport {
            specifier: "./Card".into(),
        };
        assert_eq!(
            serde_json::to_value(&diag).unwrap(),
            serde_json::json!({"kind": "relative_import", "specifier": "./Card"})
        );
        assert!(diag.to_string().contains("./Card"));
    }
}
