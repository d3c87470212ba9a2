//! Recursive-descent parser and the AST it builds.
//!
//! Grammar (EBNF, precedence ascending):
//!
//! ```text
//! regex      := union
//! union      := concat ('|' concat)*
//! concat     := repeat repeat*
//! repeat     := atom ( '*' | '+' | '?' | '{' bounds '}' )?
//! bounds     := NUMBER                 -- exactly N
//!             | NUMBER ','              -- at least N
//!             | NUMBER ',' NUMBER       -- N to M inclusive
//!             | ',' NUMBER              -- at most N (min = 0)
//! atom       := SYMBOL | ESCAPED_SYMBOL | CLASS_SYMBOL
//!             | '(' regex ')'
//!             | '[' class_body ']'
//! class_body := class_item+
//! class_item := symbol ('-' symbol)?    -- range or single symbol
//! ```

use itertools::Itertools;

use crate::diagnostics::{Log, Span};
use crate::error::{LexError, ParseError};
use crate::lexer::{Lexer, TokenKind};
use crate::nfa::{self, Component, NfaBuilder};
use crate::symbol::{ClassSymbol, Symbol};

/// Sentinel for an unbounded repetition upper bound, replacing the source's
/// integer sentinel with the natural `Option<u32>` rendering.
pub type Bound = Option<u32>;

/// A node of the regex AST. A sealed tagged variant in place of the
/// source's RTTI/vtable class hierarchy: matching `Ast` exhaustively is
/// the "isa" predicate and the downcast at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    Symbol(Symbol),
    ClassSymbol(ClassSymbol),
    /// Pure grouping, no capture.
    Group(Box<Ast>),
    /// Repetition with inclusive bounds; `max = None` means unbounded.
    Range(Box<Ast>, u32, Bound),
    Concat(Box<Ast>, Box<Ast>),
    Union(Box<Ast>, Box<Ast>),
    /// Inclusive range inside a character class.
    CharRange(u8, u8),
    /// Bracketed class containing symbols/class-symbols/char-ranges.
    CharClass(Vec<Ast>),
}

impl Ast {
    /// Lowers this node to a Thompson fragment, recursing into children
    /// first (post-order, matching the source's emit dispatch).
    pub fn emit(&self, b: &mut NfaBuilder) -> Component {
        match self {
            Ast::Symbol(sym) => nfa::symbol(b, *sym),
            Ast::ClassSymbol(class) => emit_symbols(b, class.expand()),
            Ast::Group(child) => child.emit(b),
            Ast::Range(child, min, max) => {
                let body = child.emit(b);
                match max {
                    None if *min == 0 => nfa::repeat(b, body),
                    None => nfa::repeat_min(b, body, *min),
                    Some(m) if m == min => nfa::repeat_exact(b, body, *m),
                    Some(m) => nfa::repeat_min_max(b, body, *min, *m),
                }
            }
            Ast::Concat(left, right) => {
                let l = left.emit(b);
                let r = right.emit(b);
                nfa::concat(b, l, r)
            }
            Ast::Union(left, right) => {
                let l = left.emit(b);
                let r = right.emit(b);
                nfa::union(b, l, r)
            }
            Ast::CharRange(from, to) => emit_symbols(b, (*from..=*to).map(Symbol::byte)),
            Ast::CharClass(items) => {
                let symbols = items.iter().flat_map(|item| class_item_symbols(item)).unique();
                emit_symbols(b, symbols)
            }
        }
    }

    /// Pretty-prints the tree with two-space indentation per level.
    pub fn pretty_print(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0);
        out
    }

    fn write_pretty(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        match self {
            Ast::Symbol(sym) => out.push_str(&format!("{pad}Symbol({sym})\n")),
            Ast::ClassSymbol(class) => out.push_str(&format!("{pad}ClassSymbol({class})\n")),
            Ast::Group(child) => {
                out.push_str(&format!("{pad}Group\n"));
                child.write_pretty(out, indent + 1);
            }
            Ast::Range(child, min, max) => {
                match max {
                    Some(m) => out.push_str(&format!("{pad}Range({min}..={m})\n")),
                    None => out.push_str(&format!("{pad}Range({min}..)\n")),
                }
                child.write_pretty(out, indent + 1);
            }
            Ast::Concat(left, right) => {
                out.push_str(&format!("{pad}Concat\n"));
                left.write_pretty(out, indent + 1);
                right.write_pretty(out, indent + 1);
            }
            Ast::Union(left, right) => {
                out.push_str(&format!("{pad}Union\n"));
                left.write_pretty(out, indent + 1);
                right.write_pretty(out, indent + 1);
            }
            Ast::CharRange(from, to) => {
                out.push_str(&format!("{pad}CharRange({}..={})\n", Symbol::byte(*from), Symbol::byte(*to)));
            }
            Ast::CharClass(items) => {
                out.push_str(&format!("{pad}CharClass\n"));
                for item in items {
                    item.write_pretty(out, indent + 1);
                }
            }
        }
    }
}

fn emit_symbols(b: &mut NfaBuilder, symbols: impl IntoIterator<Item = Symbol>) -> Component {
    let parts: Vec<Component> = symbols.into_iter().map(|sym| nfa::symbol(b, sym)).collect();
    nfa::union_many(b, parts)
}

/// Flattens a class item (symbol, class-symbol, or char-range) to its
/// constituent byte symbols, for deduplication before emission.
fn class_item_symbols(item: &Ast) -> Vec<Symbol> {
    match item {
        Ast::Symbol(sym) => vec![*sym],
        Ast::ClassSymbol(class) => class.expand(),
        Ast::CharRange(from, to) => (*from..=*to).map(Symbol::byte).collect(),
        other => unreachable!("class item cannot be a {other:?}"),
    }
}

/// A leaf token eligible as a `class_item` endpoint: an ordinary byte or a
/// named class. Only a byte endpoint can participate in a `-` range.
enum Leaf {
    Byte(u8),
    Class(ClassSymbol),
}

/// Recursive-descent parser consuming a [`Lexer`]'s token stream.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Parser { lexer }
    }

    pub fn log(&self) -> &Log {
        self.lexer.log()
    }

    pub fn log_mut(&mut self) -> &mut Log {
        self.lexer.log_mut()
    }

    /// Parses the whole input and hands back the resulting log regardless
    /// of success, so diagnostics accumulated before a fatal error are not
    /// lost.
    pub fn parse(mut self) -> (Result<Ast, ParseError>, Log) {
        let result = self.parse_regex();
        let result = result.and_then(|ast| {
            if self.lexer.peek_is(TokenKind::End) {
                Ok(ast)
            } else {
                Err(self.syntax_error("end of input"))
            }
        });
        (result, self.lexer.into_log())
    }

    fn current_lex_error(&self) -> Option<LexError> {
        use crate::lexer::LexStatus::*;
        let span = self.lexer.peek_span();
        match self.lexer.status() {
            Success | Warning => None,
            UnrecognizedToken => Some(LexError::UnrecognizedToken { span }),
            UnrecognizedSymbol => Some(LexError::UnrecognizedSymbol { span }),
            UnknownError => Some(LexError::Unknown { span }),
        }
    }

    fn syntax_error(&mut self, expected: &'static str) -> ParseError {
        if let Some(lex_err) = self.current_lex_error() {
            return ParseError::Lex(lex_err);
        }
        let span = self.lexer.peek_span();
        let source = self.lexer.source().to_string();
        let message = format!("unexpected token, expected {expected}");
        self.lexer.log_mut().report_error(&source, span, &message);
        ParseError::Syntax { span, expected }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), ParseError> {
        if self.lexer.peek_is(kind) {
            self.lexer.consume();
            Ok(())
        } else {
            Err(self.syntax_error(expected))
        }
    }

    fn parse_regex(&mut self) -> Result<Ast, ParseError> {
        self.parse_union()
    }

    fn parse_union(&mut self) -> Result<Ast, ParseError> {
        let mut node = self.parse_concat()?;
        while self.lexer.peek_is(TokenKind::Union) {
            self.lexer.consume();
            let rhs = self.parse_concat()?;
            node = Ast::Union(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn at_atom_start(&self) -> bool {
        matches!(
            self.lexer.peek().kind(),
            TokenKind::BasicSymbol
                | TokenKind::EscapedSymbol
                | TokenKind::ClassSymbol
                | TokenKind::LParen
                | TokenKind::LBracket
        )
    }

    fn parse_concat(&mut self) -> Result<Ast, ParseError> {
        let mut node = self.parse_repeat()?;
        while self.at_atom_start() {
            let rhs = self.parse_repeat()?;
            node = Ast::Concat(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_repeat(&mut self) -> Result<Ast, ParseError> {
        let atom = self.parse_atom()?;
        match self.lexer.peek().kind() {
            TokenKind::Asterisk => {
                self.lexer.consume();
                Ok(Ast::Range(Box::new(atom), 0, None))
            }
            TokenKind::Plus => {
                self.lexer.consume();
                Ok(Ast::Range(Box::new(atom), 1, None))
            }
            TokenKind::Question => {
                self.lexer.consume();
                Ok(Ast::Range(Box::new(atom), 0, Some(1)))
            }
            TokenKind::LBrace => {
                self.lexer.consume();
                let (min, max) = self.parse_bounds()?;
                self.expect(TokenKind::RBrace, "'}'")?;
                Ok(Ast::Range(Box::new(atom), min, max))
            }
            _ => Ok(atom),
        }
    }

    fn parse_bounds(&mut self) -> Result<(u32, Bound), ParseError> {
        let span_start = self.lexer.peek_span();
        if self.lexer.peek_is(TokenKind::Comma) {
            self.lexer.consume();
            let m = self.expect_number()?;
            return Ok((0, Some(m)));
        }
        let n = self.expect_number()?;
        if !self.lexer.peek_is(TokenKind::Comma) {
            return Ok((n, Some(n)));
        }
        self.lexer.consume();
        if self.lexer.peek_is(TokenKind::RBrace) {
            return Ok((n, None));
        }
        let m = self.expect_number()?;
        if n > m {
            let span = Span::new(span_start.begin, self.lexer.peek_span().end);
            return Err(ParseError::InvalidBounds { span, min: n, max: m });
        }
        Ok((n, Some(m)))
    }

    fn expect_number(&mut self) -> Result<u32, ParseError> {
        let Some(n) = self.lexer.peek().number() else {
            return Err(self.syntax_error("a number"));
        };
        self.lexer.consume();
        Ok(n)
    }

    fn parse_atom(&mut self) -> Result<Ast, ParseError> {
        match self.lexer.peek().kind() {
            TokenKind::BasicSymbol | TokenKind::EscapedSymbol => {
                let b = self
                    .lexer
                    .peek()
                    .basic_symbol()
                    .unwrap_or_else(|| unreachable!("BasicSymbol/EscapedSymbol always carries a byte"));
                self.lexer.consume();
                Ok(Ast::Symbol(Symbol::byte(b)))
            }
            TokenKind::ClassSymbol => {
                let class = self
                    .lexer
                    .peek()
                    .class_symbol()
                    .unwrap_or_else(|| unreachable!("ClassSymbol always carries a class payload"));
                self.lexer.consume();
                Ok(Ast::ClassSymbol(class))
            }
            TokenKind::LParen => {
                self.lexer.consume();
                let inner = self.parse_regex()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(Ast::Group(Box::new(inner)))
            }
            TokenKind::LBracket => {
                self.lexer.consume();
                let items = self.parse_class_body()?;
                self.expect(TokenKind::RBracket, "']'")?;
                Ok(Ast::CharClass(items))
            }
            _ => Err(self.syntax_error("an atom")),
        }
    }

    fn parse_class_body(&mut self) -> Result<Vec<Ast>, ParseError> {
        let span_start = self.lexer.peek_span();
        let mut items = Vec::new();
        while !self.lexer.peek_is(TokenKind::RBracket) && !self.lexer.peek_is(TokenKind::End) {
            items.push(self.parse_class_item()?);
        }
        if items.is_empty() {
            let span = Span::new(span_start.begin, self.lexer.peek_span().end);
            return Err(ParseError::EmptyClass { span });
        }
        Ok(items)
    }

    fn parse_class_leaf(&mut self) -> Result<Leaf, ParseError> {
        match self.lexer.peek().kind() {
            TokenKind::BasicSymbol | TokenKind::EscapedSymbol => {
                let b = self
                    .lexer
                    .peek()
                    .basic_symbol()
                    .unwrap_or_else(|| unreachable!("BasicSymbol/EscapedSymbol always carries a byte"));
                self.lexer.consume();
                Ok(Leaf::Byte(b))
            }
            TokenKind::ClassSymbol => {
                let class = self
                    .lexer
                    .peek()
                    .class_symbol()
                    .unwrap_or_else(|| unreachable!("ClassSymbol always carries a class payload"));
                self.lexer.consume();
                Ok(Leaf::Class(class))
            }
            _ => Err(self.syntax_error("a character class member")),
        }
    }

    fn parse_class_item(&mut self) -> Result<Ast, ParseError> {
        let left = self.parse_class_leaf()?;
        if self.lexer.peek_is(TokenKind::Minus) {
            let Leaf::Byte(from) = left else {
                return Err(self.syntax_error("a single character before '-' (not a named class)"));
            };
            self.lexer.consume();
            let right = self.parse_class_leaf()?;
            let Leaf::Byte(to) = right else {
                return Err(self.syntax_error("a single character after '-' (not a named class)"));
            };
            Ok(Ast::CharRange(from, to))
        } else {
            match left {
                Leaf::Byte(b) => Ok(Ast::Symbol(Symbol::byte(b))),
                Leaf::Class(c) => Ok(Ast::ClassSymbol(c)),
            }
        }
    }
}
