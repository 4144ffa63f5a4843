//! Static specifier → URL registry for the libraries AI-generated components commonly use.
//!
//! Everything React-flavoured is pinned against the same React build through esm.sh's `deps`
//! parameter so that a snippet never ends up with two copies of React.

use std::collections::HashMap;
use std::sync::LazyLock;

pub const REACT_VERSION: &str = "18.3.1";

/// esm.sh query pinning React peer dependencies.
pub const REACT_PEER_DEPS: &str = "deps=react@18.3.1,react-dom@18.3.1";

/// Packages the document scaffold itself imports (JSX runtime and the mount stanza).
pub const RUNTIME_SPECIFIERS: &[&str] = &["react", "react/jsx-runtime", "react-dom/client"];

const ENTRIES: &[(&str, &str)] = &[
    // React core
    ("react", "https://esm.sh/react@18.3.1"),
    ("react/jsx-runtime", "https://esm.sh/react@18.3.1/jsx-runtime"),
    ("react-dom", "https://esm.sh/react-dom@18.3.1?deps=react@18.3.1"),
    ("react-dom/client", "https://esm.sh/react-dom@18.3.1/client?deps=react@18.3.1"),
    // UI
    ("lucide-react", "https://esm.sh/lucide-react@0.460.0?deps=react@18.3.1"),
    ("framer-motion", "https://esm.sh/framer-motion@11.11.17?deps=react@18.3.1,react-dom@18.3.1"),
    ("motion/react", "https://esm.sh/motion@11.11.17/react?deps=react@18.3.1,react-dom@18.3.1"),
    ("recharts", "https://esm.sh/recharts@2.13.3?deps=react@18.3.1,react-dom@18.3.1"),
    ("react-router-dom", "https://esm.sh/react-router-dom@6.28.0?deps=react@18.3.1,react-dom@18.3.1"),
    ("@headlessui/react", "https://esm.sh/@headlessui/react@2.2.0?deps=react@18.3.1,react-dom@18.3.1"),
    ("@heroicons/react/24/outline", "https://esm.sh/@heroicons/react@2.2.0/24/outline?deps=react@18.3.1"),
    ("@heroicons/react/24/solid", "https://esm.sh/@heroicons/react@2.2.0/24/solid?deps=react@18.3.1"),
    ("react-icons", "https://esm.sh/react-icons@5.3.0?deps=react@18.3.1"),
    ("sonner", "https://esm.sh/sonner@1.7.0?deps=react@18.3.1,react-dom@18.3.1"),
    ("@tanstack/react-query", "https://esm.sh/@tanstack/react-query@5.61.0?deps=react@18.3.1"),
    ("zustand", "https://esm.sh/zustand@5.0.1?deps=react@18.3.1"),
    // Class-name utilities
    ("clsx", "https://esm.sh/clsx@2.1.1"),
    ("classnames", "https://esm.sh/classnames@2.5.1"),
    ("tailwind-merge", "https://esm.sh/tailwind-merge@2.5.4"),
    ("class-variance-authority", "https://esm.sh/class-variance-authority@0.7.1"),
    // Data and utilities
    ("lodash", "https://esm.sh/lodash-es@4.17.21"),
    ("lodash-es", "https://esm.sh/lodash-es@4.17.21"),
    ("date-fns", "https://esm.sh/date-fns@4.1.0"),
    ("dayjs", "https://esm.sh/dayjs@1.11.13"),
    ("uuid", "https://esm.sh/uuid@11.0.3"),
    ("axios", "https://esm.sh/axios@1.7.7"),
    ("zod", "https://esm.sh/zod@3.23.8"),
    ("papaparse", "https://esm.sh/papaparse@5.4.1"),
    ("mathjs", "https://esm.sh/mathjs@13.2.2"),
    // Visualization
    ("d3", "https://esm.sh/d3@7.9.0"),
    ("chart.js", "https://esm.sh/chart.js@4.4.6"),
    ("three", "https://esm.sh/three@0.170.0"),
];

static REGISTRY: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ENTRIES.iter().copied().collect());

/// Looks up the pinned URL for an exact specifier.
pub fn lookup(specifier: &str) -> Option<&'static str> {
    REGISTRY.get(specifier).copied()
}

pub fn len() -> usize {
    REGISTRY.len()
}
