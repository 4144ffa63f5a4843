//! Minimal JavaScript/JSX/TypeScript scanner.
//!
//! The snippet is split into tokens where string literals, template literals, regular
//! expressions and whole JSX elements are single opaque tokens, then grouped into top-level
//! statements. No expression tree is built: [`Module`] only recognizes the declaration shapes
//! the pipeline needs (imports, re-exports, the default export, top-level bindings and manual
//! mount calls), independent of whitespace and line-break style.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Str,
    Template,
    Regex,
    Number,
    Jsx,
    Punct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
    /// A line terminator (or a comment containing one) precedes this token.
    pub line_break_before: bool,
}

/// Keywords after which an expression (and so a regex or JSX literal) may start.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await", "default",
];

/// Keywords that continue the previous statement even on a new line.
const CONTINUATION_KEYWORDS: &[&str] = &[
    "else", "catch", "finally", "from", "as", "instanceof", "in", "of", "extends", "implements",
];

const MULTI_CHAR_PUNCT: &[&str] = &[
    "...", "===", "!==", "=>", "++", "--", "==", "!=", "&&", "||", "??", "?.", "<=", ">=", "**",
];

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

fn is_jsx_name_byte(b: u8) -> bool {
    is_ident_continue(b) || matches!(b, b'.' | b':' | b'-')
}

/// Whether `name` is usable as a plain JavaScript binding name.
pub fn is_identifier(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        Some(&first) if is_ident_start(first) => bytes[1..].iter().all(|&b| is_ident_continue(b)),
        _ => false,
    }
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        let mut lexer = Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        };
        if src.starts_with('\u{feff}') {
            lexer.pos = '\u{feff}'.len_utf8();
        }
        if src[lexer.pos..].starts_with("#!") {
            lexer.skip_line();
        }
        lexer
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
    }

    fn skip_line(&mut self) {
        self.eat_while(|b| b != b'\n');
    }

    /// Skips whitespace and comments, reporting whether a line break was crossed.
    fn skip_trivia(&mut self) -> bool {
        let mut line_break = false;
        while let Some(b) = self.peek() {
            match b {
                b'\n' => {
                    line_break = true;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => self.pos += 1,
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line(),
                b'/' if self.peek_at(1) == Some(b'*') => {
                    let body_start = self.pos + 2;
                    let end = self.src[body_start..]
                        .find("*/")
                        .map_or(self.src.len(), |i| body_start + i + 2);
                    line_break |= self.src[self.pos..end].contains('\n');
                    self.pos = end;
                }
                _ => break,
            }
        }
        line_break
    }

    fn next_token(&mut self, expression_allowed: bool) -> Option<(TokenKind, Range<usize>)> {
        let start = self.pos;
        let b = self.peek()?;
        let kind = match b {
            b'#' if self.peek_at(1).is_some_and(is_ident_start) => {
                self.pos += 1;
                self.eat_while(is_ident_continue);
                TokenKind::Ident
            }
            _ if is_ident_start(b) => {
                self.eat_while(is_ident_continue);
                TokenKind::Ident
            }
            _ if b.is_ascii_digit()
                || (b == b'.' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit())) =>
            {
                self.lex_number();
                TokenKind::Number
            }
            b'\'' | b'"' => {
                self.lex_string(b);
                TokenKind::Str
            }
            b'`' => {
                self.lex_template();
                TokenKind::Template
            }
            b'/' if expression_allowed => {
                self.lex_regex();
                TokenKind::Regex
            }
            b'<' if expression_allowed
                && self
                    .peek_at(1)
                    .is_some_and(|n| is_ident_start(n) || n == b'>')
                && self.lex_jsx_element() =>
            {
                TokenKind::Jsx
            }
            _ => {
                let rest = &self.src[self.pos..];
                let len = MULTI_CHAR_PUNCT
                    .iter()
                    .find(|p| rest.starts_with(**p))
                    .map_or(1, |p| p.len());
                self.pos += len;
                TokenKind::Punct
            }
        };
        Some((kind, start..self.pos))
    }

    fn lex_number(&mut self) {
        while let Some(b) = self.peek() {
            if matches!(b, b'e' | b'E') && matches!(self.peek_at(1), Some(b'+' | b'-')) {
                self.pos += 2;
            } else if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn lex_string(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(b) = self.peek() {
            match b {
                b'\\' => self.pos += 2,
                b'\n' => return,
                _ if b == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    fn lex_template(&mut self) {
        self.pos += 1;
        while let Some(b) = self.peek() {
            match b {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return;
                }
                b'$' if self.peek_at(1) == Some(b'{') => {
                    self.pos += 2;
                    self.skip_balanced();
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    fn lex_regex(&mut self) {
        self.pos += 1;
        let mut in_class = false;
        while let Some(b) = self.peek() {
            match b {
                b'\\' => self.pos += 2,
                b'[' => {
                    in_class = true;
                    self.pos += 1;
                }
                b']' => {
                    in_class = false;
                    self.pos += 1;
                }
                b'/' if !in_class => {
                    self.pos += 1;
                    break;
                }
                b'\n' => break,
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
        self.eat_while(is_ident_continue);
    }

    /// Consumes tokens up to and including the `}` that closes the current expression hole.
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        let mut prev: Option<(TokenKind, Range<usize>)> = None;
        loop {
            self.skip_trivia();
            let allowed = prev
                .as_ref()
                .map_or(true, |(kind, span)| allows_expression_after(*kind, &self.src[span.clone()]));
            let Some((kind, span)) = self.next_token(allowed) else {
                return;
            };
            if kind == TokenKind::Punct {
                match &self.src[span.clone()] {
                    "{" => depth += 1,
                    "}" if depth == 0 => return,
                    "}" => depth -= 1,
                    _ => {}
                }
            }
            prev = Some((kind, span));
        }
    }

    /// Lexes a JSX element or fragment starting at `<`. Returns `false` (with the position
    /// restored) when the `<` opens a TypeScript generic parameter list instead.
    fn lex_jsx_element(&mut self) -> bool {
        let start = self.pos;
        self.pos += 1;
        if self.peek() == Some(b'>') {
            self.pos += 1;
            self.lex_jsx_children();
            return true;
        }
        self.eat_while(is_jsx_name_byte);
        let after_name = self.pos;
        self.eat_while(|b| b == b' ' || b == b'\t');
        let rest = &self.src[self.pos..];
        if rest.starts_with(',') || rest.starts_with("extends ") {
            self.pos = start;
            return false;
        }
        self.pos = after_name;

        loop {
            self.eat_while(|b| b.is_ascii_whitespace());
            let Some(b) = self.peek() else {
                return true;
            };
            match b {
                b'/' if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    return true;
                }
                b'>' => {
                    self.pos += 1;
                    self.lex_jsx_children();
                    return true;
                }
                b'{' => {
                    self.pos += 1;
                    self.skip_balanced();
                }
                b'"' | b'\'' => {
                    self.pos += 1;
                    self.eat_while(|c| c != b);
                    self.pos = (self.pos + 1).min(self.bytes.len());
                }
                b'<' => {
                    if !self.lex_jsx_element() {
                        self.pos += 1;
                    }
                }
                _ if is_jsx_name_byte(b) => self.eat_while(is_jsx_name_byte),
                _ => self.pos += 1,
            }
        }
    }

    fn lex_jsx_children(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'<' if self.peek_at(1) == Some(b'/') => {
                    self.eat_while(|c| c != b'>');
                    self.pos = (self.pos + 1).min(self.bytes.len());
                    return;
                }
                b'<' => {
                    if !self.lex_jsx_element() {
                        self.pos += 1;
                    }
                }
                b'{' => {
                    self.pos += 1;
                    self.skip_balanced();
                }
                _ => self.pos += 1,
            }
        }
    }
}

fn allows_expression_after(kind: TokenKind, text: &str) -> bool {
    match kind {
        TokenKind::Ident => EXPRESSION_KEYWORDS.contains(&text),
        TokenKind::Punct => !matches!(text, ")" | "]" | "}" | "++" | "--"),
        _ => false,
    }
}

/// Tokenizes a whole snippet.
pub fn tokenize(src: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(src);
    let mut tokens: Vec<Token> = Vec::new();
    loop {
        let line_break_before = lexer.skip_trivia();
        let allowed = tokens
            .last()
            .map_or(true, |t| allows_expression_after(t.kind, &src[t.span.clone()]));
        let Some((kind, span)) = lexer.next_token(allowed) else {
            break;
        };
        tokens.push(Token {
            kind,
            span,
            line_break_before,
        });
    }
    tokens
}

/// A top-level statement: a run of tokens plus the source bytes it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub tokens: Range<usize>,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import x from "m"` / `import type { X } from "m"`
    Static,
    /// `import "m"`
    SideEffect,
    /// `export { x } from "m"` / `export * from "m"`
    ReExport,
    /// `import("m")`
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub kind: ImportKind,
    /// The module string as written, without quotes.
    pub specifier: String,
    /// Span of the string literal, quotes included.
    pub source_span: Range<usize>,
    /// Span of the whole statement (the literal itself for dynamic imports).
    pub statement_span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultExport {
    /// `export default function Name` or `export default class Name`.
    NamedDeclaration { name: String, modifier: Range<usize> },
    /// `export default function (...)`; `name_at` is where a binding name fits.
    AnonymousFunction { modifier: Range<usize>, name_at: usize },
    /// `export default Name;` or `export { Name as default };`
    Identifier { name: String, statement: Range<usize> },
    /// Any other expression, e.g. an arrow function or a call.
    Expression { statement: Range<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub statement: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountStatement {
    pub span: Range<usize>,
    /// Component handed to the render call, when it can be read off the statement.
    pub component: Option<String>,
}

/// Token stream of a snippet grouped into top-level statements.
pub struct Module<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    statements: Vec<Statement>,
}

impl<'a> Module<'a> {
    pub fn parse(src: &'a str) -> Self {
        let tokens = tokenize(src);
        let statements = split_statements(src, &tokens);
        Self {
            src,
            tokens,
            statements,
        }
    }

    pub fn source(&self) -> &'a str {
        self.src
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn text(&self, token: &Token) -> &'a str {
        &self.src[token.span.clone()]
    }

    fn statement_tokens(&self, stmt: &Statement) -> &[Token] {
        &self.tokens[stmt.tokens.clone()]
    }

    fn is(&self, token: Option<&Token>, text: &str) -> bool {
        token.is_some_and(|t| self.text(t) == text)
    }

    /// Contents of a terminated string literal token.
    fn string_value(&self, token: &Token) -> Option<&'a str> {
        if token.kind != TokenKind::Str {
            return None;
        }
        let raw = self.text(token);
        let quote = raw.chars().next()?;
        if raw.len() < 2 || !raw.ends_with(quote) {
            return None;
        }
        Some(&raw[1..raw.len() - 1])
    }

    fn import_from(
        &self,
        kind: ImportKind,
        literal: &Token,
        statement_span: Range<usize>,
    ) -> Option<ImportDecl> {
        let specifier = self.string_value(literal)?;
        Some(ImportDecl {
            kind,
            specifier: specifier.to_string(),
            source_span: literal.span.clone(),
            statement_span,
        })
    }

    /// Finds `from "<literal>"` inside a statement.
    fn from_clause<'t>(&self, toks: &'t [Token]) -> Option<&'t Token> {
        toks.windows(2)
            .find(|w| {
                w[0].kind == TokenKind::Ident
                    && self.text(&w[0]) == "from"
                    && w[1].kind == TokenKind::Str
            })
            .map(|w| &w[1])
    }

    /// Every module reference in source order: import declarations, re-exports and literal
    /// dynamic imports.
    pub fn imports(&self) -> Vec<ImportDecl> {
        let mut imports = Vec::new();
        for stmt in &self.statements {
            let toks = self.statement_tokens(stmt);
            let first = toks.first().map(|t| self.text(t));
            let second = toks.get(1);
            match first {
                Some("import") if !self.is(second, "(") && !self.is(second, ".") => {
                    let decl = match second {
                        Some(lit) if lit.kind == TokenKind::Str => {
                            self.import_from(ImportKind::SideEffect, lit, stmt.span.clone())
                        }
                        _ => self
                            .from_clause(toks)
                            .and_then(|lit| self.import_from(ImportKind::Static, lit, stmt.span.clone())),
                    };
                    imports.extend(decl);
                }
                Some("export")
                    if self.is(second, "*") || self.is(second, "{") || self.is(second, "type") =>
                {
                    let decl = self
                        .from_clause(toks)
                        .and_then(|lit| self.import_from(ImportKind::ReExport, lit, stmt.span.clone()));
                    imports.extend(decl);
                }
                _ => {}
            }
        }

        for (i, window) in self.tokens.windows(3).enumerate() {
            let preceded_by_dot = i > 0 && self.text(&self.tokens[i - 1]) == ".";
            if self.text(&window[0]) == "import"
                && self.text(&window[1]) == "("
                && window[2].kind == TokenKind::Str
                && !preceded_by_dot
            {
                imports.extend(self.import_from(ImportKind::Dynamic, &window[2], window[2].span.clone()));
            }
        }
        imports.sort_by_key(|decl| decl.source_span.start);
        imports
    }

    /// The first `export default` statement, classified by shape.
    pub fn default_export(&self) -> Option<DefaultExport> {
        self.statements.iter().find_map(|stmt| {
            let toks = self.statement_tokens(stmt);
            if self.is(toks.first(), "export") && self.is(toks.get(1), "{") {
                return self.default_in_export_list(toks, stmt);
            }
            if toks.len() < 3 || self.text(&toks[0]) != "export" || self.text(&toks[1]) != "default" {
                return None;
            }
            let rest = &toks[2..];
            let modifier = toks[0].span.start..rest[0].span.start;

            let keyword_idx = match self.text(&rest[0]) {
                "async" if self.is(rest.get(1), "function") => Some(1),
                "function" | "class" => Some(0),
                _ => None,
            };
            if let Some(k) = keyword_idx {
                let mut name_idx = k + 1;
                if self.is(rest.get(name_idx), "*") {
                    name_idx += 1;
                }
                let is_class = self.text(&rest[k]) == "class";
                return Some(match rest.get(name_idx) {
                    Some(t)
                        if t.kind == TokenKind::Ident
                            && !(is_class && matches!(self.text(t), "extends" | "implements")) =>
                    {
                        DefaultExport::NamedDeclaration {
                            name: self.text(t).to_string(),
                            modifier,
                        }
                    }
                    _ => DefaultExport::AnonymousFunction {
                        modifier,
                        name_at: rest[name_idx - 1].span.end,
                    },
                });
            }

            let is_bare_ident = rest[0].kind == TokenKind::Ident
                && !EXPRESSION_KEYWORDS.contains(&self.text(&rest[0]))
                && (rest.len() == 1 || (rest.len() == 2 && self.text(&rest[1]) == ";"));
            if is_bare_ident {
                Some(DefaultExport::Identifier {
                    name: self.text(&rest[0]).to_string(),
                    statement: stmt.span.clone(),
                })
            } else {
                Some(DefaultExport::Expression {
                    statement: stmt.span.clone(),
                })
            }
        })
    }

    /// `export { Name as default }` without a `from` clause.
    fn default_in_export_list(&self, toks: &[Token], stmt: &Statement) -> Option<DefaultExport> {
        if self.from_clause(toks).is_some() {
            return None;
        }
        toks.windows(3).find_map(|w| {
            (w[0].kind == TokenKind::Ident
                && self.text(&w[1]) == "as"
                && self.text(&w[2]) == "default")
                .then(|| DefaultExport::Identifier {
                    name: self.text(&w[0]).to_string(),
                    statement: stmt.span.clone(),
                })
        })
    }

    /// Local names bound by import declarations: default, namespace and named bindings.
    pub fn import_bindings(&self) -> Vec<&'a str> {
        let mut names = Vec::new();
        for stmt in &self.statements {
            let toks = self.statement_tokens(stmt);
            let second = toks.get(1);
            if !self.is(toks.first(), "import")
                || self.is(second, "(")
                || self.is(second, ".")
                || second.is_some_and(|t| t.kind == TokenKind::Str)
            {
                continue;
            }
            let clause_end = toks
                .iter()
                .position(|t| t.kind == TokenKind::Ident && self.text(t) == "from")
                .unwrap_or(toks.len());
            // Each binding is the last identifier of its comma-separated group
            for group in toks[1..clause_end]
                .split(|t| t.kind == TokenKind::Punct && matches!(self.text(t), "," | "{" | "}"))
            {
                if let Some(last) = group.iter().rev().find(|t| t.kind == TokenKind::Ident) {
                    names.push(self.text(last));
                }
            }
        }
        names
    }

    /// True when a top-level declaration or an import binds `name`.
    pub fn binds(&self, name: &str) -> bool {
        self.declaration_count(name) > 0 || self.import_bindings().contains(&name)
    }

    /// Names bound at top level by `function`, `class`, `const`, `let` or `var`, including
    /// exported forms.
    pub fn declarations(&self) -> Vec<Declaration> {
        let mut decls = Vec::new();
        for stmt in &self.statements {
            let mut toks = self.statement_tokens(stmt);
            if toks.first().is_some_and(|t| self.text(t) == "export") {
                toks = &toks[1..];
                if toks.first().is_some_and(|t| self.text(t) == "default") {
                    toks = &toks[1..];
                }
            }
            if toks.first().is_some_and(|t| self.text(t) == "async") {
                toks = &toks[1..];
            }
            let name = match toks.first().map(|t| self.text(t)) {
                Some("function") => {
                    let idx = if self.is(toks.get(1), "*") { 2 } else { 1 };
                    toks.get(idx)
                }
                Some("class" | "const" | "let" | "var") => toks.get(1),
                _ => None,
            };
            if let Some(name) = name.filter(|t| t.kind == TokenKind::Ident) {
                decls.push(Declaration {
                    name: self.text(name).to_string(),
                    statement: stmt.span.clone(),
                });
            }
        }
        decls
    }

    /// How many top-level declarations bind `name`.
    pub fn declaration_count(&self, name: &str) -> usize {
        self.declarations().iter().filter(|d| d.name == name).count()
    }

    /// Top-level statements that mount a component by hand: `createRoot(...)`,
    /// `hydrateRoot(...)`, `ReactDOM.render(...)`, a bare `render(...)` call, or
    /// `root.render(...)` on a root bound by an earlier statement.
    pub fn mount_statements(&self) -> Vec<MountStatement> {
        let mut roots: Vec<&str> = Vec::new();
        let mut mounts = Vec::new();
        for stmt in &self.statements {
            let toks = self.statement_tokens(stmt);
            let Some(first) = toks.first().map(|t| self.text(t)) else {
                continue;
            };
            match first {
                "import" | "export" | "function" | "class" | "async" | "interface" | "type"
                | "enum" => continue,
                "const" | "let" | "var" => {
                    let binds_root = toks.len() > 3
                        && toks[1].kind == TokenKind::Ident
                        && self.text(&toks[2]) == "="
                        && self.creates_root_at_top(&toks[3..]);
                    if binds_root {
                        roots.push(self.text(&toks[1]));
                        mounts.push(MountStatement {
                            span: stmt.span.clone(),
                            component: self.mounted_component(toks),
                        });
                    }
                }
                _ => {
                    if self.calls_mount(toks, &roots) {
                        mounts.push(MountStatement {
                            span: stmt.span.clone(),
                            component: self.mounted_component(toks),
                        });
                    }
                }
            }
        }
        mounts
    }

    fn creates_root_at_top(&self, toks: &[Token]) -> bool {
        let mut depth = 0usize;
        for pair in toks.windows(2) {
            match self.text(&pair[0]) {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                "createRoot" | "hydrateRoot" if depth == 0 && self.text(&pair[1]) == "(" => {
                    return true
                }
                _ => {}
            }
        }
        false
    }

    fn calls_mount(&self, toks: &[Token], roots: &[&str]) -> bool {
        if toks.len() >= 2 && self.text(&toks[0]) == "render" && self.text(&toks[1]) == "(" {
            return true;
        }
        let pairs = toks.windows(2).any(|w| {
            matches!(self.text(&w[0]), "createRoot" | "hydrateRoot") && self.text(&w[1]) == "("
        });
        pairs
            || toks.windows(4).any(|w| {
                let receiver = self.text(&w[0]);
                (receiver == "ReactDOM" || roots.contains(&receiver))
                    && self.text(&w[1]) == "."
                    && matches!(self.text(&w[2]), "render" | "hydrate")
                    && self.text(&w[3]) == "("
            })
    }

    fn mounted_component(&self, toks: &[Token]) -> Option<String> {
        let from_create_element = toks.windows(3).find_map(|w| {
            (self.text(&w[0]) == "createElement"
                && self.text(&w[1]) == "("
                && w[2].kind == TokenKind::Ident)
                .then(|| self.text(&w[2]).to_string())
        });
        from_create_element.or_else(|| {
            toks.iter()
                .filter(|t| t.kind == TokenKind::Jsx)
                .find_map(|t| jsx_component_name(self.text(t)))
        })
    }
}

/// Outermost component name of a JSX element, skipping `React.StrictMode`-style wrappers
/// and fragments.
fn jsx_component_name(jsx: &str) -> Option<String> {
    let mut rest = jsx;
    while let Some(idx) = rest.find('<') {
        rest = &rest[idx + 1..];
        let name: String = rest
            .bytes()
            .take_while(|b| is_ident_continue(*b) || *b == b'.')
            .map(char::from)
            .collect();
        let is_component = name.chars().next().is_some_and(|c| c.is_ascii_uppercase());
        let is_wrapper = name.ends_with("StrictMode") || name.ends_with("Fragment");
        if is_component && !is_wrapper && is_identifier(&name) {
            return Some(name);
        }
    }
    None
}

fn ends_expression(src: &str, token: &Token) -> bool {
    match token.kind {
        TokenKind::Punct => matches!(&src[token.span.clone()], ")" | "]" | "}" | "++" | "--"),
        _ => true,
    }
}

fn starts_statement(src: &str, token: &Token) -> bool {
    match token.kind {
        TokenKind::Punct => false,
        TokenKind::Ident => !CONTINUATION_KEYWORDS.contains(&&src[token.span.clone()]),
        _ => true,
    }
}

/// `}` followed by `{` on a new line: the second brace opens a block statement.
fn opens_block_after_block(src: &str, prev: &Token, token: &Token) -> bool {
    prev.kind == TokenKind::Punct
        && token.kind == TokenKind::Punct
        && &src[prev.span.clone()] == "}"
        && &src[token.span.clone()] == "{"
}

/// Groups tokens into top-level statements. A statement ends at a `;` outside brackets, or
/// where automatic semicolon insertion would apply: a line break between a token that can end
/// an expression and one that can only begin a new statement.
pub fn split_statements(src: &str, tokens: &[Token]) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut start: Option<usize> = None;
    let mut depth = 0usize;

    let close = |from: usize, to: usize, statements: &mut Vec<Statement>| {
        if from < to {
            statements.push(Statement {
                tokens: from..to,
                span: tokens[from].span.start..tokens[to - 1].span.end,
            });
        }
    };

    for (i, token) in tokens.iter().enumerate() {
        if let Some(s) = start {
            if depth == 0
                && token.line_break_before
                && ends_expression(src, &tokens[i - 1])
                && (starts_statement(src, token) || opens_block_after_block(src, &tokens[i - 1], token))
            {
                close(s, i, &mut statements);
                start = None;
            }
        }

        let text = &src[token.span.clone()];
        if token.kind == TokenKind::Punct {
            match text {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                _ => {}
            }
        }

        if start.is_none() {
            if token.kind == TokenKind::Punct && text == ";" {
                continue;
            }
            start = Some(i);
        }

        if depth == 0 && token.kind == TokenKind::Punct && text == ";" {
            if let Some(s) = start.take() {
                close(s, i + 1, &mut statements);
            }
        }
    }
    if let Some(s) = start {
        close(s, tokens.len(), &mut statements);
    }
    statements
}
