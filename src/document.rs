//! Document synthesis: wraps a normalized snippet into one standalone HTML page.

use crate::config::PreviewConfig;
use crate::pipeline::NormalizationResult;
use crate::registry::RUNTIME_SPECIFIERS;
use crate::resolve::Resolution;
use crate::sanitize::{escape_attribute, escape_script_body, json_for_script};
use base64::Engine;
use sha2::{Digest, Sha256};

/// Suppresses in-frame navigation: `#…`, empty and `javascript:` links do nothing, links to
/// other origins open in a new browsing context.
const LINK_INTERCEPTOR: &str = r##"document.addEventListener("click", (event) => {
  const anchor = event.target instanceof Element ? event.target.closest("a") : null;
  if (!anchor) return;
  const href = (anchor.getAttribute("href") || "").trim();
  if (href === "" || href.startsWith("#") || href.toLowerCase().startsWith("javascript:")) {
    event.preventDefault();
    return;
  }
  if (/^https?:\/\//i.test(href)) {
    event.preventDefault();
    window.open(href, "_blank", "noopener,noreferrer");
  }
}, true);"##;

/// Renders the first uncaught error or rejection as a dismissible overlay; later errors are
/// ignored until it is dismissed.
const ERROR_OVERLAY: &str = r#"(() => {
  let shown = false;
  const show = (message, line) => {
    if (shown) return;
    shown = true;
    const render = () => {
      const overlay = document.createElement("div");
      overlay.setAttribute("role", "alert");
      overlay.style.cssText = "position:fixed;left:16px;right:16px;bottom:16px;z-index:2147483647;padding:12px 40px 12px 16px;border-radius:8px;background:#7f1d1d;color:#fee2e2;font:13px/1.5 ui-monospace,monospace;white-space:pre-wrap;box-shadow:0 10px 30px rgba(0,0,0,.4)";
      overlay.textContent = line ? `${message} (line ${line})` : String(message);
      const close = document.createElement("button");
      close.type = "button";
      close.textContent = "×";
      close.setAttribute("aria-label", "Dismiss");
      close.style.cssText = "position:absolute;top:6px;right:10px;background:none;border:0;color:inherit;font-size:18px;cursor:pointer";
      close.addEventListener("click", () => {
        overlay.remove();
        shown = false;
      });
      overlay.appendChild(close);
      document.body.appendChild(overlay);
    };
    if (document.body) render();
    else document.addEventListener("DOMContentLoaded", render, { once: true });
  };
  window.addEventListener("error", (event) => {
    show(event.message || (event.error && event.error.message) || "Unknown error", event.lineno);
  });
  window.addEventListener("unhandledrejection", (event) => {
    const reason = event.reason;
    show((reason && reason.message) || String(reason), reason && reason.lineNumber);
  });
})();"#;

/// Final HTML for the sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    html: String,
}

impl PreviewDocument {
    pub fn new(html: String) -> Self {
        Self { html }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    /// Hex SHA-256 of the document, for telling renders apart.
    pub fn digest(&self) -> String {
        let hash = Sha256::digest(self.html.as_bytes());
        hash.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// `data:` URL form, for surfaces that take a URL instead of inline source.
    pub fn to_data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(self.html.as_bytes());
        format!("data:text/html;charset=utf-8;base64,{}", encoded)
    }
}

/// Import map for the document: the table's rewrites plus the modules the scaffold itself
/// loads (JSX runtime, mount stanza) when the snippet did not pin them.
pub fn import_map(result: &NormalizationResult, config: &PreviewConfig) -> serde_json::Value {
    let mut map = result.resolution_table.import_map();
    if let Some(imports) = map["imports"].as_object_mut() {
        for specifier in RUNTIME_SPECIFIERS {
            let pinned = matches!(
                result.resolution_table.get(specifier),
                Some(Resolution::Url(_)) | Some(Resolution::Identity)
            );
            if pinned {
                continue;
            }
            if let Some(url) = config.package_url(specifier) {
                imports.insert(specifier.to_string(), serde_json::Value::String(url));
            }
        }
    }
    map
}

/// Build the document. Markup input is returned exactly as given.
pub fn synthesize(result: &NormalizationResult, config: &PreviewConfig) -> PreviewDocument {
    if result.is_markup {
        return PreviewDocument::new(result.code.clone());
    }

    let import_map = json_for_script(&import_map(result, config));
    let code = escape_script_body(&result.code);
    let mount_id = escape_attribute(&config.mount_id);
    let tailwind = escape_attribute(&config.tailwind_url);
    let font = escape_attribute(&config.font_stylesheet_url);
    let babel = escape_attribute(&config.babel_url);

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<title>Preview</title>
<script src="{tailwind}"></script>
<link rel="preconnect" href="https://fonts.googleapis.com" />
<link rel="stylesheet" href="{font}" />
<style>body {{ margin: 0; font-family: 'Inter', system-ui, sans-serif; }}</style>
<script type="importmap">
{import_map}
</script>
<script>
{interceptor}
</script>
<script>
{overlay}
</script>
</head>
<body>
<div id="{mount_id}"></div>
<script type="text/babel" data-type="module" data-presets="preview">
{code}
</script>
<script src="{babel}"></script>
<script>
Babel.registerPreset("preview", {{
  presets: [
    [Babel.availablePresets["typescript"], {{ isTSX: true, allExtensions: true }}],
    [Babel.availablePresets["react"], {{ runtime: "automatic" }}],
  ],
}});
</script>
</body>
</html>
"#,
        tailwind = tailwind,
        font = font,
        import_map = import_map,
        interceptor = LINK_INTERCEPTOR,
        overlay = ERROR_OVERLAY,
        mount_id = mount_id,
        code = code,
        babel = babel,
    );
    PreviewDocument::new(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::normalize;

    fn render(src: &str) -> PreviewDocument {
        let config = PreviewConfig::default();
        synthesize(&normalize(src, &config), &config)
    }

    #[test]
    fn test_markup_passthrough() {
        let src = "<!doctype html>\n<html><body><script>alert('</script>')</script></body></html>";
        assert_eq!(render(src).as_str(), src);
    }

    #[test]
    fn test_section_order() {
        let doc = render("import React from 'react';\nexport default function App() { return <h1>Hi</h1> }");
        let html = doc.as_str();
        let positions: Vec<usize> = [
            "cdn.tailwindcss.com",
            "fonts.googleapis.com/css2",
            r#"<script type="importmap">"#,
            "closest(\"a\")",
            "unhandledrejection",
            r#"<div id="root"></div>"#,
            r#"<script type="text/babel""#,
            "@babel/standalone",
            "registerPreset",
        ]
        .iter()
        .map(|needle| html.find(needle).unwrap_or_else(|| panic!("missing {}", needle)))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);
    }

    #[test]
    fn test_import_map_is_valid_json_with_runtime() {
        let doc = render("import { Zap } from 'lucide-react';\nexport default function App() { return <Zap /> }");
        let html = doc.as_str();
        let start = html.find(r#"<script type="importmap">"#).unwrap() + r#"<script type="importmap">"#.len();
        let end = start + html[start..].find("</script>").unwrap();
        let map: serde_json::Value = serde_json::from_str(html[start..end].trim()).unwrap();
        let imports = map["imports"].as_object().unwrap();
        assert!(imports.contains_key("lucide-react"));
        assert!(imports.contains_key("react"));
        assert!(imports.contains_key("react/jsx-runtime"));
        assert!(imports.contains_key("react-dom/client"));
    }

    #[test]
    fn test_runtime_entry_not_overridden() {
        let config = PreviewConfig::default();
        let mut result = normalize("export default function App() { return null }", &config);
        result
            .resolution_table
            .insert("react", Resolution::Url("https://cdn.example.com/react.js".into()));
        let map = import_map(&result, &config);
        assert_eq!(map["imports"]["react"], "https://cdn.example.com/react.js");
    }

    #[test]
    fn test_embedded_code_cannot_close_script() {
        let doc = render("export default function App() { return <p>{\"</script><b>x</b>\"}</p> }");
        let html = doc.as_str();
        let body_start = html.find(r#"data-presets="preview">"#).unwrap();
        let body_end = body_start + html[body_start..].find("</script>").unwrap();
        assert!(html[body_start..body_end].contains("<\\/script>"));
        assert!(html[body_start..body_end].contains("createElement(App)"));
    }

    #[test]
    fn test_link_interceptor_embedded_whole() {
        let doc = render("export default function App() { return <a href=\"#top\">top</a> }");
        let html = doc.as_str();
        assert!(html.contains(LINK_INTERCEPTOR));
        assert!(LINK_INTERCEPTOR.contains(r##"href.startsWith("#")"##));
        assert!(LINK_INTERCEPTOR.ends_with("}, true);"));
        assert!(ERROR_OVERLAY.ends_with("})();"));
    }

    #[test]
    fn test_digest_and_data_url() {
        let doc = PreviewDocument::new("<p>hi</p>".into());
        assert_eq!(doc.digest().len(), 64);
        assert_eq!(doc.digest(), PreviewDocument::new("<p>hi</p>".into()).digest());
        assert_ne!(doc.digest(), PreviewDocument::new("<p>ho</p>".into()).digest());
        assert_eq!(
            doc.to_data_url(),
            "data:text/html;charset=utf-8;base64,PHA+aGk8L3A+"
        );
    }
}
