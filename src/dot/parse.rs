//! Parser for the DOT subset consumed by the map builder.
//!
//! Handles `graph`/`digraph` headers, node statements with attribute lists,
//! edge statements including chains (`a -> b -> c`), quoted identifiers and
//! values, and the usual comment forms. `graph [..]`, `node [..]` and
//! `edge [..]` default-attribute statements are recognized and skipped —
//! defaults never mattered for map input files. Subgraphs are rejected
//! rather than half-parsed.

use std::collections::HashMap;

use super::ast::{DotGraph, Edge, EdgeOp, Node};

/// Error produced when the input is not parseable DOT.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self { line, message: message.into() }
    }
}

/// Parse DOT text into a [`DotGraph`].
///
/// Accepts a braced graph body with or without a `strict` prefix; a bare
/// statement list without a header is also accepted.
///
/// # Errors
///
/// Returns a [`ParseError`] with the offending line on malformed input.
pub fn parse(input: &str) -> Result<DotGraph, ParseError> {
    let tokens = tokenize(input)?;
    Parser { tokens, pos: 0 }.run()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Ident(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Equals,
    Comma,
    Semi,
    Edge(EdgeOp),
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Tok::Ident(s) => format!("`{s}`"),
            Tok::LBrace => "`{`".to_owned(),
            Tok::RBrace => "`}`".to_owned(),
            Tok::LBracket => "`[`".to_owned(),
            Tok::RBracket => "`]`".to_owned(),
            Tok::Equals => "`=`".to_owned(),
            Tok::Comma => "`,`".to_owned(),
            Tok::Semi => "`;`".to_owned(),
            Tok::Edge(EdgeOp::Directed) => "`->`".to_owned(),
            Tok::Edge(EdgeOp::Undirected) => "`--`".to_owned(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

fn tokenize(input: &str) -> Result<Vec<(Tok, usize)>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\n' => {
                line += 1;
                i += 1;
            }
            _ if c.is_whitespace() => i += 1,
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                let start = line;
                i += 2;
                loop {
                    match chars.get(i) {
                        None => return Err(ParseError::new(start, "unterminated block comment")),
                        Some('*') if chars.get(i + 1) == Some(&'/') => {
                            i += 2;
                            break;
                        }
                        Some('\n') => {
                            line += 1;
                            i += 1;
                        }
                        Some(_) => i += 1,
                    }
                }
            }
            '"' => {
                let start = line;
                i += 1;
                let mut value = String::new();
                loop {
                    match chars.get(i) {
                        None => return Err(ParseError::new(start, "unterminated quoted string")),
                        Some('"') => {
                            i += 1;
                            break;
                        }
                        Some('\\') if chars.get(i + 1).is_some() => {
                            value.push(chars[i + 1]);
                            i += 2;
                        }
                        Some(&ch) => {
                            if ch == '\n' {
                                line += 1;
                            }
                            value.push(ch);
                            i += 1;
                        }
                    }
                }
                tokens.push((Tok::Ident(value), start));
            }
            '-' => {
                let tok = match chars.get(i + 1) {
                    Some('>') => Tok::Edge(EdgeOp::Directed),
                    Some('-') => Tok::Edge(EdgeOp::Undirected),
                    _ => return Err(ParseError::new(line, "stray `-` (expected `->` or `--`)")),
                };
                tokens.push((tok, line));
                i += 2;
            }
            '{' | '}' | '[' | ']' | '=' | ',' | ';' => {
                let tok = match c {
                    '{' => Tok::LBrace,
                    '}' => Tok::RBrace,
                    '[' => Tok::LBracket,
                    ']' => Tok::RBracket,
                    '=' => Tok::Equals,
                    ',' => Tok::Comma,
                    _ => Tok::Semi,
                };
                tokens.push((tok, line));
                i += 1;
            }
            _ if is_ident_char(c) => {
                let mut value = String::new();
                while i < chars.len() && is_ident_char(chars[i]) {
                    value.push(chars[i]);
                    i += 1;
                }
                tokens.push((Tok::Ident(value), line));
            }
            _ => return Err(ParseError::new(line, format!("unexpected character `{c}`"))),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Tok, usize)>,
    pos: usize,
}

impl Parser {
    fn run(mut self) -> Result<DotGraph, ParseError> {
        let mut graph = DotGraph::default();

        if let Some(Tok::Ident(word)) = self.peek()
            && word.eq_ignore_ascii_case("strict")
        {
            self.pos += 1;
        }

        let mut braced = false;
        if let Some(Tok::Ident(word)) = self.peek()
            && (word.eq_ignore_ascii_case("graph") || word.eq_ignore_ascii_case("digraph"))
        {
            self.pos += 1;
            if let Some(Tok::Ident(name)) = self.peek() {
                graph.name = Some(name.clone());
                self.pos += 1;
            }
            self.expect(&Tok::LBrace)?;
            braced = true;
        }

        loop {
            match self.peek() {
                None => {
                    if braced {
                        let line = self.last_line();
                        return Err(ParseError::new(line, "missing closing `}`"));
                    }
                    break;
                }
                Some(Tok::Semi) => self.pos += 1,
                Some(Tok::RBrace) => {
                    let line = self.line();
                    if !braced {
                        return Err(ParseError::new(line, "unexpected `}`"));
                    }
                    self.pos += 1;
                    if let Some(tok) = self.peek() {
                        return Err(ParseError::new(self.line(), format!("trailing {} after `}}`", tok.describe())));
                    }
                    break;
                }
                Some(Tok::Ident(_)) => self.statement(&mut graph)?,
                Some(tok) => {
                    let message = format!("unexpected {}", tok.describe());
                    return Err(ParseError::new(self.line(), message));
                }
            }
        }

        Ok(graph)
    }

    /// Parse one node or edge statement, or skip a default-attribute statement.
    fn statement(&mut self, graph: &mut DotGraph) -> Result<(), ParseError> {
        let (first, line) = self.expect_ident()?;

        if first.eq_ignore_ascii_case("subgraph") {
            return Err(ParseError::new(line, "subgraph statements are not supported"));
        }

        let is_default_target = first.eq_ignore_ascii_case("graph")
            || first.eq_ignore_ascii_case("node")
            || first.eq_ignore_ascii_case("edge");
        if is_default_target && self.peek() == Some(&Tok::LBracket) {
            self.attr_list()?;
            return Ok(());
        }

        let mut chain = vec![first];
        let mut ops = Vec::new();
        while let Some(Tok::Edge(op)) = self.peek() {
            ops.push(*op);
            self.pos += 1;
            let (next, _) = self.expect_ident()?;
            chain.push(next);
        }

        let mut attrs = HashMap::new();
        while self.peek() == Some(&Tok::LBracket) {
            attrs.extend(self.attr_list()?);
        }

        if chain.len() == 1 {
            let id = chain.remove(0);
            merge_node(graph, id, attrs);
        } else {
            for id in &chain {
                ensure_node(graph, id);
            }
            for (i, op) in ops.into_iter().enumerate() {
                graph.edges.push(Edge {
                    from: chain[i].clone(),
                    to: chain[i + 1].clone(),
                    op,
                    attrs: attrs.clone(),
                });
            }
        }

        Ok(())
    }

    /// Parse a bracketed `[key=value, ...]` list.
    fn attr_list(&mut self) -> Result<HashMap<String, String>, ParseError> {
        self.expect(&Tok::LBracket)?;
        let mut attrs = HashMap::new();

        loop {
            match self.peek() {
                Some(Tok::RBracket) => {
                    self.pos += 1;
                    return Ok(attrs);
                }
                Some(Tok::Comma | Tok::Semi) => self.pos += 1,
                Some(Tok::Ident(_)) => {
                    let (key, _) = self.expect_ident()?;
                    self.expect(&Tok::Equals)?;
                    let (value, _) = self.expect_ident()?;
                    attrs.insert(key, value);
                }
                Some(tok) => {
                    let message = format!("unexpected {} in attribute list", tok.describe());
                    return Err(ParseError::new(self.line(), message));
                }
                None => return Err(ParseError::new(self.last_line(), "missing closing `]`")),
            }
        }
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    fn line(&self) -> usize {
        self.tokens.get(self.pos).map_or_else(|| self.last_line(), |(_, line)| *line)
    }

    fn last_line(&self) -> usize {
        self.tokens.last().map_or(1, |(_, line)| *line)
    }

    fn expect(&mut self, want: &Tok) -> Result<(), ParseError> {
        match self.peek() {
            Some(tok) if tok == want => {
                self.pos += 1;
                Ok(())
            }
            Some(tok) => {
                let message = format!("expected {}, found {}", want.describe(), tok.describe());
                Err(ParseError::new(self.line(), message))
            }
            None => Err(ParseError::new(self.last_line(), format!("expected {}", want.describe()))),
        }
    }

    fn expect_ident(&mut self) -> Result<(String, usize), ParseError> {
        match self.tokens.get(self.pos) {
            Some((Tok::Ident(value), line)) => {
                let out = (value.clone(), *line);
                self.pos += 1;
                Ok(out)
            }
            Some((tok, line)) => Err(ParseError::new(*line, format!("expected identifier, found {}", tok.describe()))),
            None => Err(ParseError::new(self.last_line(), "expected identifier")),
        }
    }
}

/// Add a node or merge attributes into an existing one. Later values win
/// per key, matching how repeated DOT statements behave.
fn merge_node(graph: &mut DotGraph, id: String, attrs: HashMap<String, String>) {
    if let Some(node) = graph.nodes.iter_mut().find(|n| n.id == id) {
        node.attrs.extend(attrs);
    } else {
        graph.nodes.push(Node { id, attrs });
    }
}

/// Register an edge endpoint that has no node statement of its own.
fn ensure_node(graph: &mut DotGraph, id: &str) {
    if !graph.nodes.iter().any(|n| n.id == id) {
        graph.nodes.push(Node { id: id.to_owned(), attrs: HashMap::new() });
    }
}
