//! Subset construction: NFA state-sets become single DFA states, grounded on
//! the source's `subset_construction` worklist and `dstate_add_transition`.
//!
//! Unlike [`crate::nfa`], a [`DfaState`] has at most one successor per
//! symbol and no ε transitions at all — both are structural invariants
//! enforced by [`DfaState::add_transition`], not just a construction
//! convention.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::cell::Cell;

use crate::error::DfaError;
use crate::nfa::{Nfa, NfaStateId};
use crate::symbol::Symbol;

pub mod simulator;

/// Index into a [`DfaBuilder`]'s state arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DfaStateId(usize);

/// A single DFA state: at most one successor per symbol. Mutators fail once
/// [`DfaState::is_locked`] becomes true, mirroring [`crate::nfa::NfaState`].
#[derive(Debug, Default)]
pub struct DfaState {
    transitions: std::cell::RefCell<HashMap<Symbol, DfaStateId>>,
    locked: Cell<bool>,
}

impl DfaState {
    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    /// Adds a single transition on `sym`. Rejects ε (a DFA has none),
    /// rejects mutating a locked state, and rejects redefining an existing
    /// symbol to a different target (a genuine conflict, not idempotent
    /// re-insertion).
    pub fn add_transition(&self, sym: Symbol, to: DfaStateId) -> Result<(), DfaError> {
        if sym.is_epsilon() {
            return Err(DfaError::EpsilonTransition);
        }
        if self.locked.get() {
            return Err(DfaError::StateLocked);
        }
        let mut transitions = self.transitions.borrow_mut();
        match transitions.get(&sym) {
            Some(&existing) if existing != to => Err(DfaError::ConflictingTransition { symbol: sym }),
            Some(_) => Ok(()),
            None => {
                transitions.insert(sym, to);
                Ok(())
            }
        }
    }

    pub fn transition(&self, sym: Symbol) -> Option<DfaStateId> {
        self.transitions.borrow().get(&sym).copied()
    }

    pub fn transition_symbols(&self) -> Vec<Symbol> {
        self.transitions.borrow().keys().copied().collect()
    }

    fn lock(&self) {
        self.locked.set(true);
    }
}

/// Owns [`DfaState`]s while subset construction runs.
#[derive(Debug, Default)]
pub struct DfaBuilder {
    arena: Vec<DfaState>,
}

impl DfaBuilder {
    pub fn new() -> Self {
        DfaBuilder::default()
    }

    pub fn fresh_state(&mut self) -> DfaStateId {
        let id = DfaStateId(self.arena.len());
        self.arena.push(DfaState::default());
        id
    }

    pub fn state(&self, id: DfaStateId) -> &DfaState {
        &self.arena[id.0]
    }
}

fn aggregate_dstates(arena: &[DfaState], start: DfaStateId, all: &mut HashSet<DfaStateId>) {
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if !all.insert(id) {
            continue;
        }
        for sym in arena[id.0].transition_symbols() {
            if let Some(to) = arena[id.0].transition(sym) {
                if !all.contains(&to) {
                    stack.push(to);
                }
            }
        }
    }
}

/// Locks every state reachable from `start` and assembles a [`Dfa`]. Private
/// and infallible: subset construction is structurally guaranteed to only
/// ever mark reachable states as accepting, unlike the general-purpose
/// fallible constructor the source's header sketches but never implements.
fn dfa_new(builder: DfaBuilder, start: DfaStateId, accepting: HashSet<DfaStateId>) -> Dfa {
    let DfaBuilder { arena } = builder;
    let mut all = HashSet::new();
    aggregate_dstates(&arena, start, &mut all);
    for &id in &all {
        arena[id.0].lock();
    }
    Dfa {
        states: arena,
        start,
        accepting,
    }
}

/// A locked, assembled DFA.
#[derive(Debug)]
pub struct Dfa {
    states: Vec<DfaState>,
    start: DfaStateId,
    accepting: HashSet<DfaStateId>,
}

impl Dfa {
    pub fn start(&self) -> DfaStateId {
        self.start
    }

    pub fn accepting(&self) -> &HashSet<DfaStateId> {
        &self.accepting
    }

    pub fn is_accepting(&self, id: DfaStateId) -> bool {
        self.accepting.contains(&id)
    }

    pub fn state(&self, id: DfaStateId) -> &DfaState {
        &self.states[id.0]
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn accepts(&self, input: impl IntoIterator<Item = Symbol>) -> bool {
        let mut sim = simulator::DfaSimulator::init(self);
        for sym in input {
            if sim.step(sym) == simulator::SimStatus::Dead {
                break;
            }
        }
        sim.fini() == simulator::SimStatus::Success
    }

    pub fn accepts_bytes(&self, input: &[u8]) -> bool {
        self.accepts(input.iter().map(|&b| Symbol::byte(b)))
    }
}

/// ε-closure of a whole set of NFA states: every state reachable from any
/// member via ε alone, members included.
fn epsilon_closure_set(nfa: &Nfa, states: &BTreeSet<NfaStateId>) -> BTreeSet<NfaStateId> {
    let mut closure: BTreeSet<NfaStateId> = states.clone();
    let mut stack: Vec<NfaStateId> = states.iter().copied().collect();
    while let Some(id) = stack.pop() {
        for succ in nfa.state(id).transitions_on(Symbol::EPSILON) {
            if closure.insert(succ) {
                stack.push(succ);
            }
        }
    }
    closure
}

/// Every NFA state reachable from `states` by a single transition on `sym`.
fn nfa_move(nfa: &Nfa, states: &BTreeSet<NfaStateId>, sym: Symbol) -> BTreeSet<NfaStateId> {
    states.iter().flat_map(|&id| nfa.state(id).transitions_on(sym)).collect()
}

/// Every non-ε symbol leaving any state in `states`.
fn nonepsilon_transition_symbols(nfa: &Nfa, states: &BTreeSet<NfaStateId>) -> BTreeSet<Symbol> {
    states
        .iter()
        .flat_map(|&id| nfa.state(id).transition_symbols())
        .filter(|sym| !sym.is_epsilon())
        .collect()
}

/// Determinizes `nfa` via the textbook worklist algorithm: each DFA state is
/// keyed by the `BTreeSet` of NFA states it aggregates, used directly as a
/// `HashMap` key (no separate canonicalisation step needed, since
/// `BTreeSet`'s `Ord`/`Hash` already agree on set equality).
pub fn subset_construction(nfa: &Nfa) -> Dfa {
    let mut builder = DfaBuilder::new();
    let start_set = epsilon_closure_set(nfa, &BTreeSet::from([nfa.start()]));

    let mut set_to_id: HashMap<BTreeSet<NfaStateId>, DfaStateId> = HashMap::new();
    let start_id = builder.fresh_state();
    set_to_id.insert(start_set.clone(), start_id);

    let mut accepting = HashSet::new();
    if start_set.iter().any(|id| nfa.is_accepting(*id)) {
        accepting.insert(start_id);
    }

    let mut worklist: VecDeque<BTreeSet<NfaStateId>> = VecDeque::new();
    worklist.push_back(start_set);

    while let Some(current_set) = worklist.pop_front() {
        let current_id = set_to_id[&current_set];
        for sym in nonepsilon_transition_symbols(nfa, &current_set) {
            let moved = nfa_move(nfa, &current_set, sym);
            if moved.is_empty() {
                continue;
            }
            let target_set = epsilon_closure_set(nfa, &moved);
            let target_id = *set_to_id.entry(target_set.clone()).or_insert_with(|| {
                let id = builder.fresh_state();
                if target_set.iter().any(|s| nfa.is_accepting(*s)) {
                    accepting.insert(id);
                }
                worklist.push_back(target_set.clone());
                id
            });
            builder.state(current_id).add_transition(sym, target_id).unwrap_or_else(|_| {
                unreachable!("subset construction never revisits a symbol already set on this state")
            });
        }
    }

    dfa_new(builder, start_id, accepting)
}
