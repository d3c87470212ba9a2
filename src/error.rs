//! Closed error taxonomy for structural failures (see spec §7).
//!
//! These are distinct from the [`crate::diagnostics::Log`]: the log accumulates
//! *recoverable* lexical/syntactic warnings and errors that still let the lexer or
//! parser continue on a best-effort basis, while the error types here report
//! *structural* failures that abort the operation that raised them outright.

use crate::diagnostics::Span;
use crate::symbol::Symbol;

/// Failure modes reported by the lexer's terminal status codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unrecognized token at {span:?}")]
    UnrecognizedToken { span: Span },
    #[error("unrecognized symbol at {span:?}")]
    UnrecognizedSymbol { span: Span },
    #[error("unknown lexer error at {span:?}")]
    Unknown { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnrecognizedToken { span }
            | LexError::UnrecognizedSymbol { span }
            | LexError::Unknown { span } => *span,
        }
    }
}

/// Parser-level failures. A syntax error terminates parsing with no AST.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("unexpected token at {span:?}: expected {expected}")]
    Syntax { span: Span, expected: &'static str },
    #[error("invalid repetition bounds {{{min},{max}}} at {span:?}: min must not exceed max")]
    InvalidBounds { span: Span, min: u32, max: u32 },
    #[error("empty character class at {span:?}")]
    EmptyClass { span: Span },
}

/// Structural invariant violations raised by NFA construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NfaError {
    #[error("accepting state is not reachable from the start state")]
    UnreachableAccepting,
    #[error("attempted to mutate a state already owned by an NFA")]
    StateLocked,
    #[error("nfa_construct requires at least one accepting state")]
    NoAcceptingStates,
}

/// Structural invariant violations raised by DFA construction or mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DfaError {
    #[error("attempted to mutate a state already owned by a DFA")]
    StateLocked,
    #[error("conflicting transition on symbol {symbol} from an existing DFA state")]
    ConflictingTransition { symbol: Symbol },
    #[error("epsilon transitions are not permitted in a DFA")]
    EpsilonTransition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_messages_are_stable() {
        let span = Span::new(3, 5);
        assert_eq!(
            LexError::UnrecognizedToken { span }.to_string(),
            "unrecognized token at Span { begin: 3, end: 5 }"
        );
        assert_eq!(
            LexError::UnrecognizedSymbol { span }.to_string(),
            "unrecognized symbol at Span { begin: 3, end: 5 }"
        );
        assert_eq!(
            LexError::Unknown { span }.to_string(),
            "unknown lexer error at Span { begin: 3, end: 5 }"
        );
    }

    #[test]
    fn parse_error_messages_are_stable() {
        let span = Span::new(0, 1);
        assert_eq!(
            ParseError::Lex(LexError::Unknown { span }).to_string(),
            LexError::Unknown { span }.to_string()
        );
        assert_eq!(
            ParseError::Syntax { span, expected: "')'" }.to_string(),
            "unexpected token at Span { begin: 0, end: 1 }: expected ')'"
        );
        assert_eq!(
            ParseError::InvalidBounds { span, min: 3, max: 1 }.to_string(),
            "invalid repetition bounds {3,1} at Span { begin: 0, end: 1 }: min must not exceed max"
        );
        assert_eq!(
            ParseError::EmptyClass { span }.to_string(),
            "empty character class at Span { begin: 0, end: 1 }"
        );
    }

    #[test]
    fn nfa_error_messages_are_stable() {
        assert_eq!(
            NfaError::UnreachableAccepting.to_string(),
            "accepting state is not reachable from the start state"
        );
        assert_eq!(
            NfaError::StateLocked.to_string(),
            "attempted to mutate a state already owned by an NFA"
        );
        assert_eq!(
            NfaError::NoAcceptingStates.to_string(),
            "nfa_construct requires at least one accepting state"
        );
    }

    #[test]
    fn dfa_error_messages_are_stable() {
        assert_eq!(
            DfaError::StateLocked.to_string(),
            "attempted to mutate a state already owned by a DFA"
        );
        assert_eq!(
            DfaError::ConflictingTransition { symbol: Symbol::byte(b'a') }.to_string(),
            "conflicting transition on symbol a from an existing DFA state"
        );
        assert_eq!(
            DfaError::EpsilonTransition.to_string(),
            "epsilon transitions are not permitted in a DFA"
        );
    }

    #[test]
    fn every_variant_display_is_non_empty() {
        let span = Span::new(0, 0);
        let lex_errors = [
            LexError::UnrecognizedToken { span },
            LexError::UnrecognizedSymbol { span },
            LexError::Unknown { span },
        ];
        for e in &lex_errors {
            assert!(!e.to_string().is_empty());
        }

        let parse_errors = [
            ParseError::Lex(LexError::Unknown { span }),
            ParseError::Syntax { span, expected: "x" },
            ParseError::InvalidBounds { span, min: 0, max: 0 },
            ParseError::EmptyClass { span },
        ];
        for e in &parse_errors {
            assert!(!e.to_string().is_empty());
        }

        let nfa_errors = [
            NfaError::UnreachableAccepting,
            NfaError::StateLocked,
            NfaError::NoAcceptingStates,
        ];
        for e in &nfa_errors {
            assert!(!e.to_string().is_empty());
        }

        let dfa_errors = [
            DfaError::StateLocked,
            DfaError::ConflictingTransition { symbol: Symbol::byte(b'z') },
            DfaError::EpsilonTransition,
        ];
        for e in &dfa_errors {
            assert!(!e.to_string().is_empty());
        }
    }
}
