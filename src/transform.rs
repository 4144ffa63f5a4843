//! Code transformation: rewrites module sources, inlines the class-name helper, turns the
//! default export into a mountable entry point and appends the auto-mount stanza.
//!
//! All changes are computed as byte-range edits against the original text and applied in one
//! pass, so untouched code keeps its exact formatting.

use crate::config::PreviewConfig;
use crate::diagnostic::Diagnostic;
use crate::resolve::{Resolution, ResolutionTable, UTILITY_SHIM};
use crate::syntax::{DefaultExport, ImportDecl, ImportKind, Module, MountStatement};
use serde::Serialize;
use std::ops::Range;
use tracing::debug;

/// First line of every generated mount stanza.
pub const MOUNT_MARKER: &str = "// preview:auto-mount";

/// Name the inline class-name helper is bound to unless the import renames it.
pub const CLASS_JOINER_NAME: &str = "cn";

/// How the entry point was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportShape {
    /// `export default function Name`
    NamedDeclaration,
    /// `export default function (...)`, given the fallback name
    AnonymousFunction,
    /// `export default Name`
    Identifier,
    /// No default export; taken from a manual mount call
    MountedComponent,
    /// Default export of some other shape; fallback name used
    Unrecognized,
    /// No default export at all; fallback name used
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryPoint {
    pub name: String,
    pub shape: ExportShape,
}

/// A parsed snippet with its live imports, ready for resolution and rewriting.
pub struct Analysis<'a> {
    module: Module<'a>,
    mounts: Vec<MountStatement>,
    imports: Vec<ImportDecl>,
}

impl<'a> Analysis<'a> {
    pub fn new(source: &'a str) -> Self {
        let module = Module::parse(source);
        let mounts = module.mount_statements();
        // References inside mount statements disappear with them
        let imports = module
            .imports()
            .into_iter()
            .filter(|decl| !mounts.iter().any(|m| contains(&m.span, &decl.source_span)))
            .collect();
        Self {
            module,
            mounts,
            imports,
        }
    }

    pub fn module(&self) -> &Module<'a> {
        &self.module
    }

    pub fn imports(&self) -> &[ImportDecl] {
        &self.imports
    }

    pub fn mounts(&self) -> &[MountStatement] {
        &self.mounts
    }

    /// Import sources in order of appearance, duplicates included.
    pub fn specifiers(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(|decl| decl.specifier.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub code: String,
    pub entry: EntryPoint,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    range: Range<usize>,
    text: String,
}

impl Edit {
    fn remove(range: Range<usize>) -> Self {
        Self {
            range,
            text: String::new(),
        }
    }

    fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            range: at..at,
            text: text.into(),
        }
    }
}

fn contains(outer: &Range<usize>, inner: &Range<usize>) -> bool {
    outer.start <= inner.start && inner.end <= outer.end
}

/// Widens a statement span to whole lines when nothing else shares them.
fn full_lines(src: &str, span: Range<usize>) -> Range<usize> {
    let line_start = src[..span.start].rfind('\n').map_or(0, |i| i + 1);
    let start = if src[line_start..span.start].trim().is_empty() {
        line_start
    } else {
        span.start
    };
    let rest = &src[span.end..];
    let end = match rest.find('\n') {
        Some(i) if rest[..i].trim().is_empty() => span.end + i + 1,
        None if rest.trim().is_empty() => src.len(),
        _ => span.end,
    };
    start..end
}

/// Extends a removal to the marker comment line directly above it.
fn with_marker_line(src: &str, range: Range<usize>) -> Range<usize> {
    if range.start == 0 || !src[..range.start].ends_with('\n') {
        return range;
    }
    let above_end = range.start - 1;
    let above_start = src[..above_end].rfind('\n').map_or(0, |i| i + 1);
    if src[above_start..above_end].trim() == MOUNT_MARKER {
        above_start..range.end
    } else {
        range
    }
}

/// The fallback name, or the first `{fallback}N` that nothing in the module binds yet.
fn unbound_name(module: &Module<'_>, fallback: &str) -> String {
    if !module.binds(fallback) {
        return fallback.to_string();
    }
    (2..usize::MAX)
        .map(|n| format!("{}{}", fallback, n))
        .find(|candidate| !module.binds(candidate))
        .unwrap_or_else(|| fallback.to_string())
}

/// Offset just past the line containing `pos`.
fn line_end(src: &str, pos: usize) -> usize {
    src[pos..].find('\n').map_or(src.len(), |i| pos + i + 1)
}

fn apply_edits(src: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| {
        b.range
            .start
            .cmp(&a.range.start)
            .then(b.range.end.cmp(&a.range.end))
    });
    let mut out = src.to_string();
    let mut floor = src.len();
    for edit in edits {
        if edit.range.end > floor {
            debug!(range = ?edit.range, "Skipping overlapping edit");
            continue;
        }
        out.replace_range(edit.range.clone(), &edit.text);
        floor = edit.range.start;
    }
    out
}

/// The one-line class-name joiner substituted for the utility-shim import.
pub fn class_joiner_definition(name: &str) -> String {
    format!(
        "const {} = (...classes) => classes.flat(99).filter(Boolean).join(\" \");",
        name
    )
}

/// Local name the shim import binds `cn` to (`import { cn as cx } ...` binds `cx`).
fn shim_binding(module: &Module<'_>, decl: &ImportDecl) -> String {
    let toks: Vec<&str> = module
        .tokens()
        .iter()
        .filter(|t| contains(&decl.statement_span, &t.span))
        .map(|t| module.text(t))
        .collect();
    toks.windows(3)
        .find(|w| w[0] == CLASS_JOINER_NAME && w[1] == "as")
        .map_or_else(|| CLASS_JOINER_NAME.to_string(), |w| w[2].to_string())
}

/// The stanza that mounts `entry` into the element with `mount_id`, if that element exists.
pub fn mount_stanza(entry: &str, mount_id: &str) -> String {
    let id = serde_json::Value::String(mount_id.to_string()).to_string();
    format!(
        r#"{marker}
{{
  const mountNode = document.getElementById({id});
  if (mountNode) {{
    Promise.all([import("react"), import("react-dom/client")]).then(([React, ReactDOMClient]) => {{
      try {{
        ReactDOMClient.createRoot(mountNode).render(React.createElement({entry}));
      }} catch (error) {{
        console.error("[preview] Failed to mount <{entry}>:", error);
      }}
    }});
  }}
}}
"#,
        marker = MOUNT_MARKER,
        id = id,
        entry = entry,
    )
}

/// Rewrite a snippet against its resolution table.
pub fn transform(
    analysis: &Analysis<'_>,
    table: &ResolutionTable,
    config: &PreviewConfig,
) -> Transformed {
    let module = analysis.module();
    let src = module.source();
    let mut edits = Vec::new();
    let mut diagnostics = Vec::new();

    // Manual mounting would render the component twice
    let removed: Vec<Range<usize>> = analysis
        .mounts()
        .iter()
        .map(|m| with_marker_line(src, full_lines(src, m.span.clone())))
        .collect();
    edits.extend(removed.iter().cloned().map(Edit::remove));

    // Module sources
    for decl in analysis.imports() {
        if let Some(Resolution::Url(url)) = table.get(&decl.specifier) {
            let quote = &src[decl.source_span.start..decl.source_span.start + 1];
            edits.push(Edit {
                range: decl.source_span.clone(),
                text: format!("{}{}{}", quote, url, quote),
            });
        }
    }

    // Utility shim: drop its imports, define the helper after the last import left standing
    let is_shim = |decl: &ImportDecl| {
        decl.kind != ImportKind::Dynamic
            && decl.specifier == UTILITY_SHIM
            && matches!(table.get(UTILITY_SHIM), Some(Resolution::InlineSubstitute))
    };
    let shim_imports: Vec<&ImportDecl> = analysis.imports().iter().filter(|d| is_shim(d)).collect();
    if let Some(first_shim) = shim_imports.first() {
        let binding = shim_binding(module, first_shim);
        for decl in &shim_imports {
            edits.push(Edit::remove(full_lines(src, decl.statement_span.clone())));
        }
        let last_surviving = analysis
            .imports()
            .iter()
            .filter(|d| d.kind != ImportKind::Dynamic && !is_shim(d))
            .map(|d| d.statement_span.end)
            .max();
        let definition = class_joiner_definition(&binding);
        let edit = match last_surviving {
            Some(end) => {
                let at = line_end(src, end);
                if at == src.len() && !src.ends_with('\n') {
                    Edit::insert(at, format!("\n{}\n", definition))
                } else {
                    Edit::insert(at, format!("{}\n", definition))
                }
            }
            None => Edit::insert(0, format!("{}\n", definition)),
        };
        edits.push(edit);
    }

    // Entry point
    let fallback = config.fallback_entry.clone();
    let entry = match module.default_export() {
        Some(DefaultExport::NamedDeclaration { name, modifier }) => {
            edits.push(Edit::remove(modifier));
            EntryPoint {
                name,
                shape: ExportShape::NamedDeclaration,
            }
        }
        Some(DefaultExport::AnonymousFunction { modifier, name_at }) => {
            let name = unbound_name(module, &fallback);
            edits.push(Edit::remove(modifier));
            edits.push(Edit::insert(name_at, format!(" {}", name)));
            EntryPoint {
                name,
                shape: ExportShape::AnonymousFunction,
            }
        }
        Some(DefaultExport::Identifier { name, statement }) => {
            edits.push(Edit::remove(full_lines(src, statement)));
            EntryPoint {
                name,
                shape: ExportShape::Identifier,
            }
        }
        Some(DefaultExport::Expression { .. }) => {
            diagnostics.push(Diagnostic::UnrecognizedDefaultExport {
                fallback: fallback.clone(),
            });
            EntryPoint {
                name: fallback.clone(),
                shape: ExportShape::Unrecognized,
            }
        }
        None => match analysis.mounts().iter().find_map(|m| m.component.clone()) {
            Some(name) => EntryPoint {
                name,
                shape: ExportShape::MountedComponent,
            },
            None => {
                diagnostics.push(Diagnostic::MissingDefaultExport {
                    fallback: fallback.clone(),
                });
                EntryPoint {
                    name: fallback.clone(),
                    shape: ExportShape::Missing,
                }
            }
        },
    };

    let declared = entry.shape == ExportShape::AnonymousFunction || module.binds(&entry.name);
    if !declared {
        diagnostics.push(Diagnostic::MissingEntryDeclaration {
            name: entry.name.clone(),
        });
    }

    // Rewrites inside removed statements would overlap their removal
    edits.retain(|edit| {
        edit.text.is_empty()
            || edit.range.is_empty()
            || !removed.iter().any(|r| contains(r, &edit.range))
    });

    let rewritten = apply_edits(src, edits);
    let body = rewritten.trim_end();
    let body = body.strip_suffix(MOUNT_MARKER).unwrap_or(body).trim_end();

    let mut code = String::with_capacity(body.len() + 512);
    code.push_str(body);
    if !body.is_empty() {
        code.push_str("\n\n");
    }
    code.push_str(&mount_stanza(&entry.name, &config.mount_id));

    debug!(entry = %entry.name, shape = ?entry.shape, "Transformed snippet");
    Transformed {
        code,
        entry,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_imports;

    fn run(src: &str) -> Transformed {
        let config = PreviewConfig::default();
        let analysis = Analysis::new(src);
        let resolved = resolve_imports(analysis.specifiers(), &config);
        transform(&analysis, &resolved.table, &config)
    }

    #[test]
    fn test_full_lines() {
        let src = "a;\n  import x from 'y';\nb;";
        let start = src.find("import").unwrap();
        let end = src.find(";\nb").unwrap() + 1;
        assert_eq!(&src[full_lines(src, start..end)], "  import x from 'y';\n");

        let shared = "a; import x from 'y'; b;";
        let start = shared.find("import").unwrap();
        assert_eq!(full_lines(shared, start..start + 19), start..start + 19);
    }

    #[test]
    fn test_apply_edits_removal_before_insertion() {
        let src = "one\ntwo\nthree\n";
        let edits = vec![Edit::insert(4, "NEW\n"), Edit::remove(4..8)];
        assert_eq!(apply_edits(src, edits), "one\nNEW\nthree\n");
    }

    #[test]
    fn test_rewrites_keep_quote_style() {
        let out = run("import React from 'react';\nimport { Zap } from \"lucide-react\";\nexport default function App() { return <Zap /> }");
        assert!(out.code.contains("from 'https://esm.sh/react@18.3.1'"));
        assert!(out
            .code
            .contains("from \"https://esm.sh/lucide-react@0.460.0?deps=react@18.3.1\""));
        assert!(!out.code.contains("'react'"));
    }

    #[test]
    fn test_relative_imports_untouched() {
        let out = run("import Card from './Card';\nexport default Card;");
        assert!(out.code.contains("import Card from './Card';"));
        assert_eq!(out.entry.name, "Card");
    }

    #[test]
    fn test_utility_shim_inlined_after_last_import() {
        let src = "import React from 'react';\nimport { cn } from '@/lib/utils';\nimport { Button } from '@/components/ui/button';\n\nexport default function Page() {\n  return <Button className={cn('a', false && 'b')} />;\n}\n";
        let out = run(src);
        assert!(!out.code.contains("@/lib/utils"));
        assert_eq!(out.code.matches("const cn = ").count(), 1);
        let lines: Vec<&str> = out.code.lines().collect();
        let def = lines.iter().position(|l| l.starts_with("const cn = ")).unwrap();
        assert!(lines[def - 1].starts_with("import { Button }"));
        assert!(lines[..def].iter().all(|l| !l.contains("@/lib/utils")));
    }

    #[test]
    fn test_utility_shim_alias_binding() {
        let out = run("import { cn as cx } from '@/lib/utils'\nexport default () => null");
        assert!(out.code.starts_with("const cx = (...classes)"));
    }

    #[test]
    fn test_utility_shim_without_other_imports_at_eof() {
        let out = run("import React from 'react'; import { cn } from \"@/lib/utils\"");
        assert_eq!(out.code.matches("const cn = ").count(), 1);
        assert!(!out.code.contains("@/lib/utils"));
    }

    #[test]
    fn test_named_function_export() {
        let out = run("export default function Dashboard() {\n  return <div />;\n}\n");
        assert_eq!(
            out.entry,
            EntryPoint {
                name: "Dashboard".into(),
                shape: ExportShape::NamedDeclaration
            }
        );
        assert!(out.code.starts_with("function Dashboard() {"));
        assert!(out.code.contains("React.createElement(Dashboard)"));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_anonymous_function_export() {
        let out = run("export default function () {\n  return <div />;\n}\n");
        assert_eq!(out.entry.shape, ExportShape::AnonymousFunction);
        assert!(out.code.starts_with("function App () {"));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_identifier_export() {
        let out = run("const Widget = () => <p>hi</p>;\n\nexport default Widget;\n");
        assert_eq!(out.entry.shape, ExportShape::Identifier);
        assert_eq!(out.entry.name, "Widget");
        assert!(!out.code.contains("export default"));
    }

    #[test]
    fn test_arrow_default_export_is_degraded() {
        let out = run("export default () => <div>inline</div>;");
        assert_eq!(out.entry.shape, ExportShape::Unrecognized);
        assert_eq!(out.entry.name, "App");
        assert!(out.code.contains("export default () =>"));
        assert!(out.diagnostics.contains(&Diagnostic::UnrecognizedDefaultExport {
            fallback: "App".into()
        }));
        assert!(out.diagnostics.contains(&Diagnostic::MissingEntryDeclaration {
            name: "App".into()
        }));
    }

    #[test]
    fn test_strips_manual_mounting() {
        let src = "import ReactDOM from 'react-dom/client';\nfunction App() { return <div /> }\nconst root = ReactDOM.createRoot(document.getElementById('root'));\nroot.render(<App />);\n";
        let out = run(src);
        assert_eq!(out.entry.shape, ExportShape::MountedComponent);
        assert_eq!(out.entry.name, "App");
        assert!(!out.code.contains("root.render"));
        assert_eq!(out.code.matches("createRoot(").count(), 1);
    }

    #[test]
    fn test_missing_export_falls_back() {
        let out = run("const x = 1;");
        assert_eq!(out.entry.shape, ExportShape::Missing);
        assert_eq!(out.entry.name, "App");
        assert!(out.diagnostics.contains(&Diagnostic::MissingDefaultExport {
            fallback: "App".into()
        }));
    }

    #[test]
    fn test_stanza_is_replaced_not_duplicated() {
        let first = run("import React from 'react';\nexport default function App() { return null }");
        let second = run(&first.code);
        assert_eq!(second.code, first.code);
        assert_eq!(second.code.matches(MOUNT_MARKER).count(), 1);
        assert_eq!(second.entry.name, "App");
    }

    #[test]
    fn test_anonymous_export_avoids_taken_name() {
        let out = run("const App = 1;\nimport App2 from './App2';\nexport default function () { return null }");
        assert_eq!(
            out.entry,
            EntryPoint {
                name: "App3".into(),
                shape: ExportShape::AnonymousFunction
            }
        );
        assert!(out.code.contains("const App = 1;\n"));
        assert!(out.code.contains("function App3 () { return null }"));
        assert!(!out.code.contains("function App "));
        assert!(out.code.contains("React.createElement(App3)"));
        assert!(!out
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::MissingEntryDeclaration { .. })));
    }

    #[test]
    fn test_imported_entry_counts_as_declared() {
        let out = run("import App from './App';\nexport default App;");
        assert_eq!(out.entry.name, "App");
        assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    }

    #[test]
    fn test_export_list_default() {
        let out = run("function Panel() { return null }\nexport { Panel as default };\n");
        assert_eq!(
            out.entry,
            EntryPoint {
                name: "Panel".into(),
                shape: ExportShape::Identifier
            }
        );
        assert!(!out.code.contains("export {"));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_class_joiner_ignores_shadowed_globals() {
        let definition = class_joiner_definition("cn");
        assert!(!definition.contains("Infinity"));
        assert!(definition.contains(".flat(99)"));
    }

    #[test]
    fn test_marker_removed_with_stanza_followed_by_code() {
        let first = run("export default function App() { return null }");
        let edited = format!("{}const note = 1;\n", first.code);
        let second = run(&edited);
        assert_eq!(second.code.matches(MOUNT_MARKER).count(), 1);
        assert_eq!(second.code.matches("createElement(App)").count(), 1);
        assert!(second.code.contains("function App() { return null }\n\nconst note = 1;"));
        assert!(second.code.ends_with(&mount_stanza("App", "root")));
    }

    #[test]
    fn test_mount_stanza_escapes_id() {
        let stanza = mount_stanza("App", "root");
        assert!(stanza.contains("document.getElementById(\"root\")"));
        assert!(stanza.starts_with(MOUNT_MARKER));
    }
}
