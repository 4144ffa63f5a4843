//! # Snippet Preview
//!
//! Turns a code snippet copied out of an AI chat (Claude artifacts, Gemini canvases, v0
//! components) or a full HTML page into one standalone document that renders in a sandboxed
//! iframe.
//!
//! ## Pipeline
//!
//! - **Detect**: markup passes through untouched; code is attributed to a platform by its imports
//! - **Resolve**: every import specifier gets a CDN URL, stays as-is, or is inlined
//! - **Transform**: specifiers are rewritten, `cn` is inlined, manual mounts are replaced by one
//!   generated mount stanza for the default export
//! - **Synthesize**: the code is wrapped with an import map, Tailwind, Babel and an error overlay
//!
//! Nothing in the pipeline performs I/O or fails. Problems surface as flags and
//! [`Diagnostic`]s on the [`NormalizationResult`].
//!
//! ## Usage
//!
//! ```rust
//! use snippet_preview::{build_preview, Platform, PreviewConfig};
//!
//! let config = PreviewConfig::default();
//! let preview = build_preview(
//!     "import { Zap } from 'lucide-react';\nexport default function App() { return <Zap /> }",
//!     &config,
//! );
//!
//! assert_eq!(preview.result.platform, Platform::Claude);
//! assert!(!preview.result.has_unresolved_packages);
//! assert!(preview.document.as_str().contains("createElement(App)"));
//! ```

mod config;
mod detect;
mod diagnostic;
mod document;
mod error;
mod pipeline;
pub mod protocol;
pub mod registry;
mod resolve;
mod sanitize;
pub mod syntax;
mod transform;

pub use config::PreviewConfig;
pub use detect::{detect, is_markup, Platform};
pub use diagnostic::Diagnostic;
pub use document::{import_map, synthesize, PreviewDocument};
pub use error::{Error, Result};
pub use pipeline::{build_preview, normalize, NormalizationResult, Preview};
pub use resolve::{classify, resolve_imports, Classification, Resolution, ResolutionTable, Resolved, Rule};
pub use transform::{transform, Analysis, EntryPoint, ExportShape, Transformed, MOUNT_MARKER};
