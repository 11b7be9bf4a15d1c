//! A toy statement language for exercising the runtime end to end.
//!
//! ```text
//! file        ::= stmt*
//! stmt        ::= let_stmt | simple_stmt
//! let_stmt    ::= 'let' IDENT '=' expr ';'   {pin=1 recoverWhile=stmt_recover}
//! simple_stmt ::= IDENT ';'                  {pin=1 recoverWhile=stmt_recover name="<statement>"}
//! stmt_recover ::= !('let' | IDENT)
//! expr        ::= term ('+' term)*
//! term        ::= IDENT | NUMBER | paren
//! paren       ::= '(' expr ')'               {pin=1}
//! name        ::= IDENT
//! ```
//!
//! The rule functions are written the way a parser generator would emit
//! them. Tests that need a one-off shape define their own rules next to
//! the test.

use grit_ir::{KindTable, Span, SyntaxKind, Token, TokenList};
use logos::Logos;

use crate::{Modifiers, ParseOutput, Parser, ParserConfig, Rule};

pub(crate) const WS: SyntaxKind = SyntaxKind(2);
pub(crate) const IDENT: SyntaxKind = SyntaxKind(3);
pub(crate) const NUMBER: SyntaxKind = SyntaxKind(4);
pub(crate) const LET: SyntaxKind = SyntaxKind(5);
pub(crate) const PLUS: SyntaxKind = SyntaxKind(6);
pub(crate) const DOT: SyntaxKind = SyntaxKind(7);
pub(crate) const L_PAREN: SyntaxKind = SyntaxKind(8);
pub(crate) const R_PAREN: SyntaxKind = SyntaxKind(9);
pub(crate) const SEMI: SyntaxKind = SyntaxKind(10);
pub(crate) const EQ: SyntaxKind = SyntaxKind(11);
pub(crate) const BAD: SyntaxKind = SyntaxKind(12);

pub(crate) const FILE: SyntaxKind = SyntaxKind(20);
pub(crate) const STMT: SyntaxKind = SyntaxKind(21);
pub(crate) const LET_STMT: SyntaxKind = SyntaxKind(22);
pub(crate) const EXPR: SyntaxKind = SyntaxKind(23);
pub(crate) const NAME: SyntaxKind = SyntaxKind(24);
pub(crate) const PAREN: SyntaxKind = SyntaxKind(25);
pub(crate) const FIELD: SyntaxKind = SyntaxKind(26);
pub(crate) const LIST: SyntaxKind = SyntaxKind(27);

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum Tok {
    #[regex(r"[ \t\r\n]+")]
    Ws,
    #[token("let")]
    Let,
    #[regex("[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex("[0-9]+")]
    Number,
    #[token("+")]
    Plus,
    #[token(".")]
    Dot,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semi,
    #[token("=")]
    Eq,
}

impl Tok {
    fn kind(self) -> SyntaxKind {
        match self {
            Tok::Ws => WS,
            Tok::Let => LET,
            Tok::Ident => IDENT,
            Tok::Number => NUMBER,
            Tok::Plus => PLUS,
            Tok::Dot => DOT,
            Tok::LParen => L_PAREN,
            Tok::RParen => R_PAREN,
            Tok::Semi => SEMI,
            Tok::Eq => EQ,
        }
    }
}

/// Lex `source`, whitespace included. Unknown characters become `BAD`.
pub(crate) fn lex(source: &str) -> TokenList {
    let tokens = Tok::lexer(source)
        .spanned()
        .map(|(token, range)| {
            let kind = token.map_or(BAD, Tok::kind);
            Token::new(kind, Span::new(offset(range.start), offset(range.end)))
        })
        .collect();
    TokenList::new(source, tokens)
}

fn offset(at: usize) -> u32 {
    u32::try_from(at).unwrap_or(u32::MAX)
}

pub(crate) fn language() -> KindTable {
    KindTable::new()
        .kind(WS, "WS")
        .kind(IDENT, "IDENT")
        .kind(NUMBER, "NUMBER")
        .kind(LET, "let")
        .kind(PLUS, "+")
        .kind(DOT, ".")
        .kind(L_PAREN, "(")
        .kind(R_PAREN, ")")
        .kind(SEMI, ";")
        .kind(EQ, "=")
        .kind(BAD, "BAD")
        .kind(FILE, "FILE")
        .kind(STMT, "STMT")
        .kind(LET_STMT, "LET_STMT")
        .kind(EXPR, "EXPR")
        .kind(NAME, "NAME")
        .kind(PAREN, "PAREN")
        .kind(FIELD, "FIELD")
        .kind(LIST, "LIST")
        .trivia(WS)
        .extends([EXPR, NAME, PAREN, FIELD])
        .delimiters(L_PAREN, R_PAREN)
}

/// A finished parse together with the tokens it ran over.
pub(crate) struct Parsed {
    pub tokens: TokenList,
    pub output: ParseOutput,
}

impl Parsed {
    pub fn dump(&self) -> String {
        self.output.tree.dump(&self.tokens, &language())
    }

    /// Diagnostic messages in report order.
    pub fn messages(&self) -> Vec<&str> {
        self.output
            .diagnostics
            .iter()
            .map(|diagnostic| diagnostic.message.as_str())
            .collect()
    }
}

/// Parse `source` under a `FILE` root with default limits.
pub(crate) fn parse_source(source: &str, rule: &dyn Rule) -> Parsed {
    let tokens = lex(source);
    let language = language();
    let output = Parser::new(&tokens, &language)
        .with_config(ParserConfig::default())
        .parse(FILE, rule);
    Parsed { tokens, output }
}

pub(crate) fn file(p: &mut Parser<'_>, l: u32) -> bool {
    p.guarded(l, "file", |p, l| {
        loop {
            let c = p.current_position();
            if !stmt(p, l + 1) {
                break;
            }
            if !p.empty_element_parsed_guard("file", c) {
                break;
            }
        }
        true
    })
}

pub(crate) fn stmt(p: &mut Parser<'_>, l: u32) -> bool {
    p.guarded(l, "stmt", |p, l| {
        let m = p.enter_section_simple();
        let mut r = let_stmt(p, l + 1);
        if !r {
            r = simple_stmt(p, l + 1);
        }
        p.exit_section_simple(m, None, r);
        r
    })
}

pub(crate) fn let_stmt(p: &mut Parser<'_>, l: u32) -> bool {
    p.guarded(l, "let_stmt", |p, l| {
        let m = p.enter_section(l, Modifiers::NONE, Some(LET_STMT), None);
        let mut r = p.consume_token(LET);
        let pinned = r;
        if r {
            let head = p.consume_token(IDENT) && p.consume_token(EQ);
            r = p.report_error(head);
        }
        if r {
            let value = expr(p, l + 1);
            r = p.report_error(value);
        }
        r = pinned && p.consume_token(SEMI) && r;
        p.exit_section(l, m, None, r, pinned, Some(&stmt_recover as &dyn Rule));
        r || pinned
    })
}

pub(crate) fn simple_stmt(p: &mut Parser<'_>, l: u32) -> bool {
    p.guarded(l, "simple_stmt", |p, l| {
        let m = p.enter_section(l, Modifiers::NONE, Some(STMT), Some("<statement>"));
        let mut r = p.consume_token(IDENT);
        let pinned = r;
        r = r && p.consume_token(SEMI);
        p.exit_section(l, m, None, r, pinned, Some(&stmt_recover as &dyn Rule));
        r || pinned
    })
}

pub(crate) fn stmt_recover(p: &mut Parser<'_>, l: u32) -> bool {
    p.guarded(l, "stmt_recover", |p, l| {
        let m = p.enter_section(l, Modifiers::NOT, None, None);
        let r = !(p.consume_token(LET) || p.consume_token(IDENT));
        p.exit_section(l, m, None, r, false, None);
        r
    })
}

pub(crate) fn expr(p: &mut Parser<'_>, l: u32) -> bool {
    p.guarded(l, "expr", |p, l| {
        let m = p.enter_section_simple();
        let mut r = term(p, l + 1);
        r = r && expr_tail(p, l + 1);
        p.exit_section_simple(m, Some(EXPR), r);
        r
    })
}

// ('+' term)*
fn expr_tail(p: &mut Parser<'_>, l: u32) -> bool {
    p.guarded(l, "expr_tail", |p, l| {
        loop {
            let c = p.current_position();
            if !expr_tail_0(p, l + 1) {
                break;
            }
            if !p.empty_element_parsed_guard("expr_tail", c) {
                break;
            }
        }
        true
    })
}

// '+' term
fn expr_tail_0(p: &mut Parser<'_>, l: u32) -> bool {
    p.guarded(l, "expr_tail_0", |p, l| {
        let m = p.enter_section(l, Modifiers::NONE, None, None);
        let mut r = p.consume_token(PLUS);
        let pinned = r;
        r = r && term(p, l + 1);
        p.exit_section(l, m, None, r, pinned, None);
        r || pinned
    })
}

fn term(p: &mut Parser<'_>, l: u32) -> bool {
    p.guarded(l, "term", |p, l| {
        let m = p.enter_section_simple();
        let mut r = p.consume_token(IDENT);
        if !r {
            r = p.consume_token(NUMBER);
        }
        if !r {
            r = paren(p, l + 1);
        }
        p.exit_section_simple(m, None, r);
        r
    })
}

fn paren(p: &mut Parser<'_>, l: u32) -> bool {
    p.guarded(l, "paren", |p, l| {
        let m = p.enter_section(l, Modifiers::NONE, Some(PAREN), None);
        let mut r = p.consume_token(L_PAREN);
        let pinned = r;
        if r {
            let inner = expr(p, l + 1);
            r = p.report_error(inner);
        }
        r = pinned && p.consume_token(R_PAREN) && r;
        p.exit_section(l, m, None, r, pinned, None);
        r || pinned
    })
}

pub(crate) fn name(p: &mut Parser<'_>, l: u32) -> bool {
    p.guarded(l, "name", |p, _l| {
        let m = p.enter_section_simple();
        let r = p.consume_token(IDENT);
        p.exit_section_simple(m, Some(NAME), r);
        r
    })
}
