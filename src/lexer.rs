//! Context-sensitive tokenisation of the regex string.
//!
//! The lexer is a single-token-lookahead, mode-switching scanner over three
//! mutually exclusive modes ([`Mode::General`], [`Mode::Class`], [`Mode::Range`]).
//! It always has a current "peek" token; [`Lexer::consume`] advances it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use bon::Builder;

use crate::diagnostics::{Log, LogConfig, Span};
use crate::error::LexError;
use crate::symbol::ClassSymbol;

/// The kind of a lexical token, independent of any payload it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    BasicSymbol,
    EscapedSymbol,
    ClassSymbol,
    Number,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Asterisk,
    Plus,
    Question,
    Comma,
    Union,
    Minus,
    End,
}

/// The payload a token carries, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Payload {
    None,
    Char(u8),
    Number(u32),
    Class(ClassSymbol),
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct TokenData {
    kind: TokenKind,
    payload: Payload,
}

/// A canonicalised token handle. Two lookups of the same `(kind, payload)`
/// pair, from the same lexer, return `Token`s that are `Rc::ptr_eq` — this is
/// the source's pointer-identity canonicalisation contract, carried over
/// without unsafe code.
#[derive(Debug, Clone)]
pub struct Token(Rc<TokenData>);

impl Token {
    pub fn kind(&self) -> TokenKind {
        self.0.kind
    }

    pub fn payload(&self) -> Payload {
        self.0.payload
    }

    pub fn basic_symbol(&self) -> Option<u8> {
        match self.0.payload {
            Payload::Char(c) => Some(c),
            _ => None,
        }
    }

    pub fn number(&self) -> Option<u32> {
        match self.0.payload {
            Payload::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn class_symbol(&self) -> Option<ClassSymbol> {
        match self.0.payload {
            Payload::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Identity comparison, mirroring the source's pointer-equality contract.
    pub fn is_same_handle(&self, other: &Token) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.0.kind == other.0.kind && self.0.payload == other.0.payload
    }
}
impl Eq for Token {}

/// Lexer configuration: selects warning-vs-fatal behaviour for the three
/// recoverable lexical situations described in the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct LexerConfig {
    /// An unrecognised `\X` escape, or a trailing lone `\`, is skipped with a
    /// warning instead of terminating the lexer with `UnrecognizedToken`.
    #[builder(default = false)]
    pub ignore_unknown_escaped_sequence: bool,
    /// A non-printable byte is skipped with a warning instead of terminating
    /// the lexer with `UnrecognizedSymbol`.
    #[builder(default = false)]
    pub ignore_nonprintable_regex_symbol: bool,
    /// `)`, `{`, `}` appearing where they are not structurally valid are
    /// treated as their escaped-symbol equivalent (with a warning) instead of
    /// being passed through for the parser to reject.
    #[builder(default = false)]
    pub treat_unexpected_tokens_as_escaped: bool,
}

impl Default for LexerConfig {
    fn default() -> Self {
        LexerConfig::builder().build()
    }
}

/// Lexer status lattice (monotone except `Success <-> Warning`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexStatus {
    Success,
    Warning,
    UnrecognizedToken,
    UnrecognizedSymbol,
    UnknownError,
}

impl LexStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, LexStatus::Success | LexStatus::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    General,
    Class,
    Range,
}

/// A context-sensitive, mode-switching scanner over a regex's byte source.
pub struct Lexer<'a> {
    source: &'a [u8],
    curr: usize,
    status: LexStatus,
    mode: Mode,
    peek_token: Token,
    peek_span: Span,
    config: LexerConfig,
    interner: RefCell<HashMap<(TokenKind, Payload), Token>>,
    log: Log,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, config: LexerConfig, log_config: LogConfig) -> Self {
        let end_token = Self::intern_static(&RefCell::new(HashMap::new()), TokenKind::End, Payload::None);
        let mut lexer = Lexer {
            source: source.as_bytes(),
            curr: 0,
            status: LexStatus::Success,
            mode: Mode::General,
            peek_token: end_token,
            peek_span: Span::new(0, 0),
            config,
            interner: RefCell::new(HashMap::new()),
            log: Log::new(log_config),
        };
        lexer.consume();
        lexer
    }

    fn intern_static(
        interner: &RefCell<HashMap<(TokenKind, Payload), Token>>,
        kind: TokenKind,
        payload: Payload,
    ) -> Token {
        interner
            .borrow_mut()
            .entry((kind, payload))
            .or_insert_with(|| Token(Rc::new(TokenData { kind, payload })))
            .clone()
    }

    fn intern(&self, kind: TokenKind, payload: Payload) -> Token {
        Self::intern_static(&self.interner, kind, payload)
    }

    pub fn source(&self) -> &str {
        // Safe: `source` is only ever built from a `&str` in `new`.
        std::str::from_utf8(self.source).unwrap_or_default()
    }

    pub fn status(&self) -> LexStatus {
        self.status
    }

    pub fn peek(&self) -> &Token {
        &self.peek_token
    }

    pub fn peek_span(&self) -> Span {
        self.peek_span
    }

    pub fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind() == kind
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut Log {
        &mut self.log
    }

    /// Consumes the log, handing ownership to the caller (e.g. the parser,
    /// which continues pushing syntax diagnostics onto the same log).
    pub fn into_log(self) -> Log {
        self.log
    }

    fn is_printable(b: u8) -> bool {
        b.is_ascii_graphic() || b == b' '
    }

    fn byte_at(&self, pos: usize) -> u8 {
        self.source.get(pos).copied().unwrap_or(0)
    }

    fn set_token(&mut self, token: Token, curr: usize, begin: usize, end: usize) {
        self.peek_token = token;
        self.peek_span = Span::new(begin, end);
        self.curr = curr;
    }

    /// Advances the lookahead by one token. A no-op once the lexer has
    /// already produced `End` or reached a terminal error status.
    pub fn consume(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        if self.peek_token.kind() == TokenKind::End {
            return;
        }
        match self.mode {
            Mode::Class => self.class_ctx_next_tok(),
            Mode::Range => self.range_ctx_next_tok(),
            Mode::General => self.gen_ctx_next_tok(),
        }
    }

    /// Escape-sequence decode shared by general and class mode. Returns the
    /// token to install, or `None` if the caller already reported a terminal
    /// diagnostic (trailing backslash / unrecognized sequence with the
    /// "fail fast" config) and should stop.
    fn decode_escape(&mut self, start: usize, curr_after_backslash: usize, in_class: bool) -> Option<(Token, usize)> {
        let c = self.byte_at(curr_after_backslash);
        let curr = curr_after_backslash + 1;
        let literal = match c {
            b'\\' | b't' | b'n' | b'[' | b']' | b'(' | b')' | b'{' | b'}' | b'*' | b'+' | b'?' | b'|' => {
                Some(match c {
                    b't' => b'\t',
                    b'n' => b'\n',
                    other => other,
                })
            }
            b'-' if in_class => Some(b'-'),
            _ => None,
        };
        if let Some(literal) = literal {
            return Some((self.intern(TokenKind::EscapedSymbol, Payload::Char(literal)), curr));
        }
        match c {
            b's' => return Some((self.intern(TokenKind::ClassSymbol, Payload::Class(ClassSymbol::Whitespace)), curr)),
            b'd' => return Some((self.intern(TokenKind::ClassSymbol, Payload::Class(ClassSymbol::Digit)), curr)),
            b'w' => return Some((self.intern(TokenKind::ClassSymbol, Payload::Class(ClassSymbol::Word)), curr)),
            _ => {}
        }
        if curr_after_backslash >= self.source.len() {
            // trailing lone backslash
            if self.config.ignore_unknown_escaped_sequence {
                self.status = LexStatus::Warning;
                self.log.report_warning(
                    self.source(),
                    Span::new(start, curr - 1),
                    "No character following escape character! Ignoring.",
                );
                self.curr = curr;
            } else {
                self.status = LexStatus::UnrecognizedToken;
                self.log.report_error(
                    self.source(),
                    Span::new(start, curr - 1),
                    "No character following escape character!",
                );
            }
            return None;
        }
        if self.config.ignore_unknown_escaped_sequence {
            self.status = LexStatus::Warning;
            self.log
                .report_warning(self.source(), Span::new(start, curr), "Unrecognized escaped sequence. Ignoring.");
            self.curr = curr;
            None
        } else {
            self.status = LexStatus::UnrecognizedToken;
            self.log
                .report_error(self.source(), Span::new(start, curr), "Unrecognized escaped sequence!");
            None
        }
    }

    fn gen_ctx_next_tok(&mut self) {
        let start = self.curr;
        let mut curr = start + 1;
        let c = self.byte_at(start);

        if start >= self.source.len() {
            let tok = self.intern(TokenKind::End, Payload::None);
            self.set_token(tok, curr, start, curr);
            self.mode = Mode::General;
            return;
        }
        if c == b'\\' {
            if let Some((tok, new_curr)) = self.decode_escape(start, curr, false) {
                self.set_token(tok, new_curr, start, new_curr);
            } else if self.status == LexStatus::Warning {
                self.gen_ctx_next_tok();
            }
            return;
        }
        if Self::is_printable(c) {
            match c {
                b'[' => {
                    let tok = self.intern(TokenKind::LBracket, Payload::None);
                    self.set_token(tok, curr, start, curr);
                    self.mode = Mode::Class;
                }
                b']' => {
                    if self.config.treat_unexpected_tokens_as_escaped {
                        self.status = LexStatus::Warning;
                        self.log
                            .report_warning(self.source(), Span::new(start, curr), "Unexpected token. Treating as if escaped.");
                        let tok = self.intern(TokenKind::EscapedSymbol, Payload::Char(b']'));
                        self.set_token(tok, curr, start, curr);
                    } else {
                        let tok = self.intern(TokenKind::RBracket, Payload::None);
                        self.set_token(tok, curr, start, curr);
                    }
                }
                b'(' => {
                    let tok = self.intern(TokenKind::LParen, Payload::None);
                    self.set_token(tok, curr, start, curr);
                }
                b')' => {
                    let tok = self.intern(TokenKind::RParen, Payload::None);
                    self.set_token(tok, curr, start, curr);
                }
                b'{' => {
                    let tok = self.intern(TokenKind::LBrace, Payload::None);
                    self.set_token(tok, curr, start, curr);
                    self.mode = Mode::Range;
                }
                b'}' => {
                    if self.config.treat_unexpected_tokens_as_escaped {
                        self.status = LexStatus::Warning;
                        self.log
                            .report_warning(self.source(), Span::new(start, curr), "Unexpected token. Treating as if escaped.");
                        let tok = self.intern(TokenKind::EscapedSymbol, Payload::Char(b'}'));
                        self.set_token(tok, curr, start, curr);
                    } else {
                        let tok = self.intern(TokenKind::RBrace, Payload::None);
                        self.set_token(tok, curr, start, curr);
                    }
                }
                b'*' => {
                    let tok = self.intern(TokenKind::Asterisk, Payload::None);
                    self.set_token(tok, curr, start, curr);
                }
                b'+' => {
                    let tok = self.intern(TokenKind::Plus, Payload::None);
                    self.set_token(tok, curr, start, curr);
                }
                b'?' => {
                    let tok = self.intern(TokenKind::Question, Payload::None);
                    self.set_token(tok, curr, start, curr);
                }
                b'|' => {
                    let tok = self.intern(TokenKind::Union, Payload::None);
                    self.set_token(tok, curr, start, curr);
                }
                other => {
                    let tok = self.intern(TokenKind::BasicSymbol, Payload::Char(other));
                    self.set_token(tok, curr, start, curr);
                }
            }
        } else {
            curr = start + 1;
            if self.config.ignore_nonprintable_regex_symbol {
                self.status = LexStatus::Warning;
                self.log
                    .report_warning(self.source(), Span::new(start, curr), "Nonprintable character in regular expression. Ignoring.");
                self.curr = curr;
                self.gen_ctx_next_tok();
            } else {
                self.status = LexStatus::UnrecognizedSymbol;
                self.log
                    .report_error(self.source(), Span::new(start, curr), "Nonprintable character in regular expression.");
            }
        }
    }

    fn class_ctx_next_tok(&mut self) {
        let start = self.curr;
        let curr = start + 1;
        let c = self.byte_at(start);

        if start >= self.source.len() {
            let tok = self.intern(TokenKind::End, Payload::None);
            self.set_token(tok, curr, start, curr);
            self.mode = Mode::General;
            return;
        }
        if c == b'-' {
            let tok = self.intern(TokenKind::Minus, Payload::None);
            self.set_token(tok, curr, start, curr);
            return;
        }
        if c == b']' {
            let tok = self.intern(TokenKind::RBracket, Payload::None);
            self.set_token(tok, curr, start, curr);
            self.mode = Mode::General;
            return;
        }
        if c == b'\\' {
            if let Some((tok, new_curr)) = self.decode_escape(start, curr, true) {
                self.set_token(tok, new_curr, start, new_curr);
            } else if self.status == LexStatus::Warning {
                self.class_ctx_next_tok();
            }
            return;
        }
        if Self::is_printable(c) {
            match c {
                b'[' => {
                    let tok = self.intern(TokenKind::LBracket, Payload::None);
                    self.set_token(tok, curr, start, curr);
                }
                b'(' => {
                    let tok = self.intern(TokenKind::LParen, Payload::None);
                    self.set_token(tok, curr, start, curr);
                }
                b')' => {
                    if self.config.treat_unexpected_tokens_as_escaped {
                        self.status = LexStatus::Warning;
                        self.log.report_warning(
                            self.source(),
                            Span::new(start, curr),
                            "Unexpected token in character class. Treating as if escaped.",
                        );
                        let tok = self.intern(TokenKind::EscapedSymbol, Payload::Char(b')'));
                        self.set_token(tok, curr, start, curr);
                    } else {
                        let tok = self.intern(TokenKind::RParen, Payload::None);
                        self.set_token(tok, curr, start, curr);
                    }
                }
                b'{' => {
                    if self.config.treat_unexpected_tokens_as_escaped {
                        self.status = LexStatus::Warning;
                        self.log.report_warning(
                            self.source(),
                            Span::new(start, curr),
                            "Unexpected token in character class. Treating as if escaped.",
                        );
                        let tok = self.intern(TokenKind::EscapedSymbol, Payload::Char(b'{'));
                        self.set_token(tok, curr, start, curr);
                    } else {
                        let tok = self.intern(TokenKind::LBrace, Payload::None);
                        self.set_token(tok, curr, start, curr);
                    }
                }
                b'}' => {
                    if self.config.treat_unexpected_tokens_as_escaped {
                        self.status = LexStatus::Warning;
                        self.log.report_warning(
                            self.source(),
                            Span::new(start, curr),
                            "Unexpected token in character class. Treating as if escaped.",
                        );
                        let tok = self.intern(TokenKind::EscapedSymbol, Payload::Char(b'}'));
                        self.set_token(tok, curr, start, curr);
                    } else {
                        let tok = self.intern(TokenKind::RBrace, Payload::None);
                        self.set_token(tok, curr, start, curr);
                    }
                }
                b'*' => {
                    let tok = self.intern(TokenKind::Asterisk, Payload::None);
                    self.set_token(tok, curr, start, curr);
                }
                b'+' => {
                    let tok = self.intern(TokenKind::Plus, Payload::None);
                    self.set_token(tok, curr, start, curr);
                }
                b'?' => {
                    let tok = self.intern(TokenKind::Question, Payload::None);
                    self.set_token(tok, curr, start, curr);
                }
                b'|' => {
                    let tok = self.intern(TokenKind::Union, Payload::None);
                    self.set_token(tok, curr, start, curr);
                }
                other => {
                    let tok = self.intern(TokenKind::BasicSymbol, Payload::Char(other));
                    self.set_token(tok, curr, start, curr);
                }
            }
        } else if self.config.ignore_nonprintable_regex_symbol {
            self.status = LexStatus::Warning;
            self.log
                .report_warning(self.source(), Span::new(start, curr), "Nonprintable character in regular expression. Ignoring.");
            self.curr = curr;
            self.class_ctx_next_tok();
        } else {
            self.status = LexStatus::UnrecognizedSymbol;
            self.log
                .report_error(self.source(), Span::new(start, curr), "Nonprintable character in regular expression.");
        }
    }

    fn range_ctx_next_tok(&mut self) {
        let start = self.curr;
        let curr = start + 1;
        let c = self.byte_at(start);

        if start >= self.source.len() {
            let tok = self.intern(TokenKind::End, Payload::None);
            self.set_token(tok, curr, start, curr);
            self.mode = Mode::General;
            return;
        }
        if c == b'}' {
            let tok = self.intern(TokenKind::RBrace, Payload::None);
            self.set_token(tok, curr, start, curr);
            self.mode = Mode::General;
            return;
        }
        if c == b',' {
            let tok = self.intern(TokenKind::Comma, Payload::None);
            self.set_token(tok, curr, start, curr);
            return;
        }
        if c.is_ascii_digit() {
            let mut value: u32 = 0;
            let mut pos = start;
            while self.byte_at(pos).is_ascii_digit() {
                value = value * 10 + (self.byte_at(pos) - b'0') as u32;
                pos += 1;
            }
            let tok = self.intern(TokenKind::Number, Payload::Number(value));
            self.set_token(tok, pos, start, pos);
            return;
        }
        // any other character ends range mode and re-tokenises in general mode
        self.mode = Mode::General;
        self.gen_ctx_next_tok();
    }

    /// Collects the full token stream (kind, payload pairs) without spans,
    /// useful for lexer-parity tests. Stops once `End` has been produced.
    pub fn token_kinds(&mut self) -> Vec<TokenKind> {
        let mut out = Vec::new();
        loop {
            let kind = self.peek().kind();
            out.push(kind);
            if kind == TokenKind::End || self.status.is_terminal() {
                break;
            }
            self.consume();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Lexer<'_> {
        Lexer::new(src, LexerConfig::default(), LogConfig::default())
    }

    #[test]
    fn token_canonicalisation_same_handle() {
        let mut l = lex("aa");
        let t1 = l.peek().clone();
        l.consume();
        let t2 = l.peek().clone();
        assert!(t1.is_same_handle(&t2));
        assert_eq!(t1.basic_symbol(), Some(b'a'));
    }

    #[test]
    fn character_class_token_sequence() {
        let mut l = lex("[a-z_A-Z][a-zA-Z0-9_]*");
        let kinds = l.token_kinds();
        use TokenKind::*;
        assert_eq!(
            kinds,
            vec![
                LBracket, BasicSymbol, Minus, BasicSymbol, BasicSymbol, BasicSymbol, Minus, BasicSymbol, RBracket,
                LBracket, BasicSymbol, Minus, BasicSymbol, BasicSymbol, Minus, BasicSymbol, BasicSymbol, Minus,
                BasicSymbol, BasicSymbol, RBracket, Asterisk, End,
            ]
        );
    }

    #[test]
    fn range_mode_number_coalescing() {
        let mut l = lex("a{1,4}");
        let kinds = l.token_kinds();
        use TokenKind::*;
        assert_eq!(kinds, vec![BasicSymbol, LBrace, Number, Comma, Number, RBrace, End]);
    }

    #[test]
    fn range_mode_falls_back_to_general_on_non_digit() {
        let mut l = lex("a{x}");
        let kinds = l.token_kinds();
        use TokenKind::*;
        // '{' opens range mode; 'x' is not digit/','/'}' so range mode exits and
        // re-tokenises 'x' in general mode, then '}' is a bare structural token.
        assert_eq!(kinds, vec![BasicSymbol, LBrace, BasicSymbol, RBrace, End]);
    }

    #[test]
    fn unescaped_trailing_backslash_is_fatal_by_default() {
        let mut l = lex(r"a\");
        l.token_kinds();
        assert_eq!(l.status(), LexStatus::UnrecognizedToken);
    }

    #[test]
    fn ignore_unknown_escape_recovers_with_warning() {
        let cfg = LexerConfig::builder().ignore_unknown_escaped_sequence(true).build();
        let mut l = Lexer::new(r"\qa", cfg, LogConfig::default());
        let kinds = l.token_kinds();
        assert_eq!(l.status(), LexStatus::Warning);
        assert_eq!(kinds, vec![TokenKind::BasicSymbol, TokenKind::End]);
    }

    #[test]
    fn class_mode_keeps_structural_tokens_except_rparen_rbrace() {
        // Inside a class, '(' stays LParen (unlike ')'/'{'/'}').
        let mut l = lex("[(]");
        let kinds = l.token_kinds();
        use TokenKind::*;
        assert_eq!(kinds, vec![LBracket, LParen, RBracket, End]);
    }

    #[test]
    fn escaped_minus_inside_class() {
        let mut l = lex(r"[a\-z]");
        let mut payloads = vec![];
        loop {
            payloads.push((l.peek().kind(), l.peek().basic_symbol()));
            if l.peek().kind() == TokenKind::End {
                break;
            }
            l.consume();
        }
        assert!(payloads.contains(&(TokenKind::EscapedSymbol, Some(b'-'))));
    }

    #[test]
    fn builder_matches_equivalent_struct_literal() {
        let built = LexerConfig::builder()
            .ignore_unknown_escaped_sequence(true)
            .ignore_nonprintable_regex_symbol(true)
            .treat_unexpected_tokens_as_escaped(true)
            .build();
        let literal = LexerConfig {
            ignore_unknown_escaped_sequence: true,
            ignore_nonprintable_regex_symbol: true,
            treat_unexpected_tokens_as_escaped: true,
        };
        assert_eq!(built, literal);

        let built_defaults = LexerConfig::builder().build();
        assert_eq!(built_defaults, LexerConfig::default());
    }
}
