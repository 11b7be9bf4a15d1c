//! Output syntax tree.
//!
//! A deliberately small owned structure: every token of the input appears
//! exactly once as a leaf, in order, so the children of a node tile its
//! span. Error nodes carry the [`SyntaxError`] that produced them.

use std::fmt::Write as _;

use grit_diagnostic::{Diagnostic, ErrorCode};
use grit_ir::{Language, Span, SyntaxKind, Token, TokenList};

/// Payload of an error node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub code: ErrorCode,
    pub message: String,
    /// Text of the primary label, describing what was found.
    pub label: String,
}

/// A child of a [`SyntaxNode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Token(Token),
}

impl SyntaxElement {
    pub fn span(&self) -> Span {
        match self {
            SyntaxElement::Node(node) => node.span,
            SyntaxElement::Token(token) => token.span,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        match self {
            SyntaxElement::Node(node) => node.kind,
            SyntaxElement::Token(token) => token.kind,
        }
    }

    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Token(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxNode {
    kind: SyntaxKind,
    span: Span,
    error: Option<Box<SyntaxError>>,
    children: Vec<SyntaxElement>,
}

impl SyntaxNode {
    pub(crate) fn new(
        kind: SyntaxKind,
        span: Span,
        error: Option<Box<SyntaxError>>,
        children: Vec<SyntaxElement>,
    ) -> Self {
        SyntaxNode {
            kind,
            span,
            error,
            children,
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn error(&self) -> Option<&SyntaxError> {
        self.error.as_deref()
    }

    pub fn children(&self) -> &[SyntaxElement] {
        &self.children
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(SyntaxElement::as_node)
    }

    /// Nesting depth counting nodes only: a node without child nodes has
    /// depth 1.
    pub fn depth(&self) -> usize {
        1 + self.child_nodes().map(SyntaxNode::depth).max().unwrap_or(0)
    }

    /// This node and every node below it, in pre-order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Diagnostics for every error node in the tree, in source order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.descendants()
            .filter_map(|node| {
                node.error().map(|error| {
                    Diagnostic::error(error.code)
                        .with_message(error.message.clone())
                        .with_label(node.span, error.label.clone())
                })
            })
            .collect()
    }

    /// Indented debug rendering, one element per line.
    ///
    /// ```text
    /// ROOT@0..5
    ///   NAME@0..1
    ///     IDENT@0..1 "a"
    ///   WS@1..2 " "
    ///   <error>@2..2 "expected: IDENT"
    /// ```
    pub fn dump(&self, tokens: &TokenList, language: &dyn Language) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0, tokens, language);
        out
    }

    fn dump_into(&self, out: &mut String, indent: usize, tokens: &TokenList, language: &dyn Language) {
        let _ = write!(out, "{:indent$}{}@{}", "", language.kind_name(self.kind), self.span);
        if let Some(error) = &self.error {
            let _ = write!(out, " {:?}", error.message);
        }
        out.push('\n');
        for child in &self.children {
            match child {
                SyntaxElement::Node(node) => node.dump_into(out, indent + 2, tokens, language),
                SyntaxElement::Token(token) => {
                    let text = tokens.source().get(token.span.to_range()).unwrap_or("");
                    let _ = writeln!(
                        out,
                        "{:width$}{}@{} {:?}",
                        "",
                        language.kind_name(token.kind),
                        token.span,
                        text,
                        width = indent + 2
                    );
                }
            }
        }
    }
}

/// Pre-order iterator returned by [`SyntaxNode::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().filter_map(SyntaxElement::as_node));
        Some(node)
    }
}

#[cfg(test)]
mod tests;
