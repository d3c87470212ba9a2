//! Linear DFA simulator: one table lookup per symbol, no backtracking.
//!
//! A DFA has no explicit "dead" state allocated in the arena — the original
//! does not bother to materialize one either, since every unmapped symbol
//! goes nowhere reachable. Here the current position is an `Option<DfaStateId>`
//! that becomes, and stays, `None` the moment a transition is missing.

use crate::dfa::{Dfa, DfaStateId};
use crate::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimStatus {
    Running,
    Dead,
    Success,
    Failure,
}

/// Drives one [`Dfa`] forward one symbol at a time.
pub struct DfaSimulator<'a> {
    dfa: &'a Dfa,
    current: Option<DfaStateId>,
}

impl<'a> DfaSimulator<'a> {
    pub fn init(dfa: &'a Dfa) -> Self {
        DfaSimulator {
            dfa,
            current: Some(dfa.start()),
        }
    }

    pub fn status(&self) -> SimStatus {
        match self.current {
            Some(_) => SimStatus::Running,
            None => SimStatus::Dead,
        }
    }

    pub fn is_accepting(&self) -> bool {
        self.current.is_some_and(|id| self.dfa.is_accepting(id))
    }

    /// Follows the single transition on `sym`, going permanently to the
    /// implicit sink if none exists.
    pub fn step(&mut self, sym: Symbol) -> SimStatus {
        self.current = self.current.and_then(|id| self.dfa.state(id).transition(sym));
        self.status()
    }

    pub fn fini(self) -> SimStatus {
        if self.is_accepting() {
            SimStatus::Success
        } else {
            SimStatus::Failure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfa::subset_construction;
    use crate::nfa::{concat, nfa_construct, repeat, symbol, union, NfaBuilder};

    fn build_abb_star_union() -> Dfa {
        let mut b = NfaBuilder::new();
        let a1 = symbol(&mut b, Symbol::byte(b'a'));
        let b1 = symbol(&mut b, Symbol::byte(b'b'));
        let alt = union(&mut b, a1, b1);
        let star = repeat(&mut b, alt);
        let a2 = symbol(&mut b, Symbol::byte(b'a'));
        let b2 = symbol(&mut b, Symbol::byte(b'b'));
        let b3 = symbol(&mut b, Symbol::byte(b'b'));
        let tail = concat(&mut b, a2, concat(&mut b, b2, b3));
        let whole = concat(&mut b, star, tail);
        let nfa = nfa_construct(b, whole).unwrap();
        subset_construction(&nfa)
    }

    #[test]
    fn sink_state_is_permanent() {
        let dfa = build_abb_star_union();
        let mut sim = DfaSimulator::init(&dfa);
        assert_eq!(sim.step(Symbol::byte(b'x')), SimStatus::Dead);
        assert_eq!(sim.step(Symbol::byte(b'a')), SimStatus::Dead);
        assert_eq!(sim.status(), SimStatus::Dead);
        assert_eq!(sim.fini(), SimStatus::Failure);
    }

    #[test]
    fn accepts_matches_nfa() {
        let dfa = build_abb_star_union();
        assert!(dfa.accepts_bytes(b"abb"));
        assert!(dfa.accepts_bytes(b"aaabb"));
        assert!(!dfa.accepts_bytes(b""));
        assert!(!dfa.accepts_bytes(b"abba"));
    }
}
