//! A regular-expression compiler front end: lexer, parser, Thompson NFA
//! construction and subset-construction DFA, with online and linear
//! simulators.
//!
//! ```
//! use rexnfa::Regex;
//!
//! let re = Regex::compile(r"(a|b)*abb").unwrap();
//! assert!(re.is_match(b"aabb"));
//! assert!(!re.is_match(b"aab"));
//! ```
//!
//! Out of scope: a CLI driver, a Graphviz emitter, and a DFA minimiser (see
//! the crate's design notes) — this crate exposes the compilation pipeline
//! and the two simulators it takes to drive it, and nothing that renders or
//! shells out.

pub mod dfa;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod nfa;
pub mod parser;
pub mod symbol;

use diagnostics::{Log, LogConfig};
use error::ParseError;
use lexer::{Lexer, LexerConfig};
use parser::Parser;

/// Everything that can go wrong compiling a pattern into a matcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Nfa(#[from] error::NfaError),
}

/// A compiled pattern, holding both the NFA and its determinised DFA.
///
/// Matching dispatches to the DFA (linear, one table lookup per byte); the
/// NFA is kept alongside for callers who want `accepts_nfa` directly, e.g.
/// to cross-check the two engines agree (see the end-to-end scenarios in
/// the module tests).
pub struct Regex {
    nfa: nfa::Nfa,
    dfa: dfa::Dfa,
}

impl Regex {
    /// Compiles `pattern` with default lexer/log configuration, discarding
    /// any accumulated diagnostics. Use [`Regex::compile_with`] to keep
    /// warnings, or to use non-default lexer behaviour.
    pub fn compile(pattern: &str) -> Result<Regex, CompileError> {
        let (regex, _log) = Self::compile_with(pattern, LexerConfig::default(), LogConfig::default())?;
        Ok(regex)
    }

    /// Compiles `pattern`, returning the accumulated diagnostic log
    /// alongside the result regardless of success or failure — a caller can
    /// inspect warnings even when compilation ultimately fails.
    pub fn compile_with(pattern: &str, lexer_config: LexerConfig, log_config: LogConfig) -> Result<(Regex, Log), CompileError> {
        let lexer = Lexer::new(pattern, lexer_config, log_config);
        let (ast, log) = Parser::new(lexer).parse();
        let ast = ast?;

        let mut builder = nfa::NfaBuilder::new();
        let component = ast.emit(&mut builder);
        let nfa = nfa::nfa_construct(builder, component)?;
        let dfa = dfa::subset_construction(&nfa);
        Ok((Regex { nfa, dfa }, log))
    }

    /// Matches the whole input against the DFA.
    pub fn is_match(&self, input: &[u8]) -> bool {
        self.dfa.accepts_bytes(input)
    }

    /// Matches the whole input against the NFA directly, bypassing the DFA.
    /// Exists for cross-checking the two engines; [`Regex::is_match`] is
    /// the faster path for ordinary use.
    pub fn is_match_nfa(&self, input: &[u8]) -> bool {
        self.nfa.accepts_bytes(input)
    }

    pub fn nfa(&self) -> &nfa::Nfa {
        &self.nfa
    }

    pub fn dfa(&self) -> &dfa::Dfa {
        &self.dfa
    }
}
