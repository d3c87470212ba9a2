//! Thompson construction: symbol-indexed NFA states, the combinators that
//! assemble them from an AST, and the locked [`Nfa`] that owns the result.
//!
//! States live in a growable [`NfaBuilder`] arena while a pattern is being
//! built bottom-up. A [`Component`] never owns its states on its own — it is
//! just an (entry, exit) pair of ids into the builder's arena. Ownership only
//! transfers to an [`Nfa`] at [`nfa_construct`], which also assigns each
//! reachable state a dense `nfa_id` and locks it against further mutation.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use crate::error::NfaError;
use crate::symbol::Symbol;

pub mod simulator;

/// Index into an [`NfaBuilder`]'s state arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NfaStateId(usize);

/// A single NFA state: a symbol-indexed map to a *set* of successor states.
///
/// ε has no special slot; it is simply a transition keyed by
/// [`Symbol::EPSILON`]. All mutators fail once [`NfaState::is_locked`]
/// becomes true, which happens exactly once, at [`nfa_construct`].
#[derive(Debug, Default)]
pub struct NfaState {
    debug_tag: Option<&'static str>,
    transitions: RefCell<HashMap<Symbol, Vec<NfaStateId>>>,
    locked: Cell<bool>,
    nfa_id: Cell<Option<usize>>,
}

impl NfaState {
    pub fn tag(&self) -> Option<&'static str> {
        self.debug_tag
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    /// The dense index assigned by [`nfa_construct`]; `None` until then.
    pub fn nfa_id(&self) -> Option<usize> {
        self.nfa_id.get()
    }

    /// Adds `to` to the set of successors on `sym`, deduplicating repeat
    /// edges. Fails if this state is locked.
    pub fn add_transition(&self, sym: Symbol, to: NfaStateId) -> Result<(), NfaError> {
        if self.locked.get() {
            return Err(NfaError::StateLocked);
        }
        let mut transitions = self.transitions.borrow_mut();
        let successors = transitions.entry(sym).or_default();
        if !successors.contains(&to) {
            successors.push(to);
        }
        Ok(())
    }

    pub fn remove_transition(&self, sym: Symbol, to: NfaStateId) -> Result<bool, NfaError> {
        if self.locked.get() {
            return Err(NfaError::StateLocked);
        }
        let mut transitions = self.transitions.borrow_mut();
        let Some(successors) = transitions.get_mut(&sym) else {
            return Ok(false);
        };
        let before = successors.len();
        successors.retain(|&s| s != to);
        let removed = successors.len() != before;
        if successors.is_empty() {
            transitions.remove(&sym);
        }
        Ok(removed)
    }

    pub fn clear_transition_symbol(&self, sym: Symbol) -> Result<(), NfaError> {
        if self.locked.get() {
            return Err(NfaError::StateLocked);
        }
        self.transitions.borrow_mut().remove(&sym);
        Ok(())
    }

    pub fn clear_all_transitions(&self) -> Result<(), NfaError> {
        if self.locked.get() {
            return Err(NfaError::StateLocked);
        }
        self.transitions.borrow_mut().clear();
        Ok(())
    }

    pub fn transition_symbols(&self) -> Vec<Symbol> {
        self.transitions.borrow().keys().copied().collect()
    }

    pub fn transitions_on(&self, sym: Symbol) -> Vec<NfaStateId> {
        self.transitions.borrow().get(&sym).cloned().unwrap_or_default()
    }

    pub fn has_transition(&self, sym: Symbol, to: NfaStateId) -> bool {
        self.transitions.borrow().get(&sym).is_some_and(|set| set.contains(&to))
    }

    fn lock(&self) {
        self.locked.set(true);
    }
}

/// Owns states while a pattern is being built bottom-up, before
/// [`nfa_construct`] transfers ownership into a locked [`Nfa`].
#[derive(Debug, Default)]
pub struct NfaBuilder {
    arena: Vec<NfaState>,
}

impl NfaBuilder {
    pub fn new() -> Self {
        NfaBuilder::default()
    }

    pub fn fresh_state(&mut self) -> NfaStateId {
        let id = NfaStateId(self.arena.len());
        self.arena.push(NfaState::default());
        id
    }

    /// As [`NfaBuilder::fresh_state`], with a debug tag for
    /// [`NfaState::tag`]/display purposes.
    pub fn fresh_tagged_state(&mut self, tag: &'static str) -> NfaStateId {
        let id = NfaStateId(self.arena.len());
        self.arena.push(NfaState {
            debug_tag: Some(tag),
            ..NfaState::default()
        });
        id
    }

    pub fn state(&self, id: NfaStateId) -> &NfaState {
        &self.arena[id.0]
    }

    fn add_transition(&self, from: NfaStateId, sym: Symbol, to: NfaStateId) {
        self.state(from).add_transition(sym, to).unwrap_or_else(|_| {
            unreachable!("a freshly built component never touches a locked state")
        });
    }
}

/// A Thompson fragment: an (entry, exit) pair of not-yet-owned states.
/// Combinators consume components and return new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    pub entry: NfaStateId,
    pub exit: NfaStateId,
}

/// `s --sym--> e`: two fresh states joined by a single transition.
pub fn symbol(b: &mut NfaBuilder, sym: Symbol) -> Component {
    let entry = b.fresh_state();
    let exit = b.fresh_state();
    b.add_transition(entry, sym, exit);
    Component { entry, exit }
}

/// The `∅` fragment: accepts no string. Identity element for [`union_many`].
pub fn empty_set(b: &mut NfaBuilder) -> Component {
    let entry = b.fresh_state();
    let exit = b.fresh_state();
    Component { entry, exit }
}

/// The `ε` fragment: accepts only the empty string. Identity element for
/// [`concat_many`] and the `n = 0` case of [`repeat_exact`].
pub fn empty_string(b: &mut NfaBuilder) -> Component {
    let state = b.fresh_state();
    Component {
        entry: state,
        exit: state,
    }
}

/// Two fresh states `s, e`; ε from `s` to both entries, ε from both exits
/// to `e`.
pub fn union(b: &mut NfaBuilder, a: Component, c: Component) -> Component {
    let s = b.fresh_state();
    let e = b.fresh_state();
    b.add_transition(s, Symbol::EPSILON, a.entry);
    b.add_transition(s, Symbol::EPSILON, c.entry);
    b.add_transition(a.exit, Symbol::EPSILON, e);
    b.add_transition(c.exit, Symbol::EPSILON, e);
    Component { entry: s, exit: e }
}

/// ε from `a.exit` to `b.entry`. No fresh states: `a.exit` becomes an
/// internal state of the result.
pub fn concat(b: &mut NfaBuilder, a: Component, c: Component) -> Component {
    b.add_transition(a.exit, Symbol::EPSILON, c.entry);
    Component {
        entry: a.entry,
        exit: c.exit,
    }
}

/// Folds [`union`] over `components`, left to right, returning
/// [`empty_set`] on an empty iterator.
pub fn union_many(b: &mut NfaBuilder, components: impl IntoIterator<Item = Component>) -> Component {
    let mut iter = components.into_iter();
    match iter.next() {
        None => empty_set(b),
        Some(first) => iter.fold(first, |acc, next| union(b, acc, next)),
    }
}

/// Folds [`concat`] over `components`, left to right, returning
/// [`empty_string`] on an empty iterator.
pub fn concat_many(b: &mut NfaBuilder, components: impl IntoIterator<Item = Component>) -> Component {
    let mut iter = components.into_iter();
    match iter.next() {
        None => empty_string(b),
        Some(first) => iter.fold(first, |acc, next| concat(b, acc, next)),
    }
}

/// Kleene star. Fresh `s, e`; ε from `s` to both `e` and `a.entry`; ε from
/// `a.exit` to both `a.entry` and `e`.
pub fn repeat(b: &mut NfaBuilder, a: Component) -> Component {
    let s = b.fresh_state();
    let e = b.fresh_state();
    b.add_transition(s, Symbol::EPSILON, e);
    b.add_transition(s, Symbol::EPSILON, a.entry);
    b.add_transition(a.exit, Symbol::EPSILON, a.entry);
    b.add_transition(a.exit, Symbol::EPSILON, e);
    Component { entry: s, exit: e }
}

/// All states reachable from `start` by any transition (including ε),
/// `start` included. Order is unspecified but deterministic for a given
/// arena, and this is the same traversal [`clone_component`] uses to avoid
/// recursing forever on the cycles a [`repeat`] fragment introduces.
fn reachable_states(b: &NfaBuilder, start: NfaStateId) -> Vec<NfaStateId> {
    let mut seen = HashSet::new();
    let mut stack = vec![start];
    let mut order = Vec::new();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        order.push(id);
        let state = b.state(id);
        for sym in state.transition_symbols() {
            for to in state.transitions_on(sym) {
                if !seen.contains(&to) {
                    stack.push(to);
                }
            }
        }
    }
    order
}

/// Deep-copies every state reachable from `component.entry`, preserving
/// topology, via a translation map from original ids to their copies. This
/// is what makes bounded repetition possible: the body must be materialised
/// several independent times.
pub fn clone_component(b: &mut NfaBuilder, component: &Component) -> Component {
    let originals = reachable_states(b, component.entry);
    let translate: HashMap<NfaStateId, NfaStateId> = originals.iter().map(|&orig| (orig, b.fresh_state())).collect();
    for &orig in &originals {
        let copy = translate[&orig];
        let state = b.state(orig);
        for sym in state.transition_symbols() {
            for to in state.transitions_on(sym) {
                b.add_transition(copy, sym, translate[&to]);
            }
        }
    }
    Component {
        entry: translate[&component.entry],
        exit: translate[&component.exit],
    }
}

/// Exactly `n` repetitions. `n = 0` is the empty string; `n = 1` returns `a`
/// unchanged; otherwise `a` is cloned `n` times and concatenated.
pub fn repeat_exact(b: &mut NfaBuilder, a: Component, n: u32) -> Component {
    match n {
        0 => empty_string(b),
        1 => a,
        n => {
            let clones: Vec<Component> = (0..n).map(|_| clone_component(b, &a)).collect();
            concat_many(b, clones)
        }
    }
}

/// At least `n` repetitions. `n` clones of `a` concatenated, followed by a
/// star over the body — the final, unbounded copy reuses `a` itself rather
/// than cloning it again, since nothing else still needs `a` at that point.
pub fn repeat_min(b: &mut NfaBuilder, a: Component, n: u32) -> Component {
    if n == 0 {
        return repeat(b, a);
    }
    let mut parts: Vec<Component> = (0..n).map(|_| clone_component(b, &a)).collect();
    parts.push(repeat(b, a));
    concat_many(b, parts)
}

/// Between `n` and `m` (inclusive) repetitions: a union of
/// `repeat_exact(clone(a), k)` for every `k` in `(n, m]`, plus
/// `repeat_exact(a, n)` reusing `a` itself rather than cloning it again,
/// since nothing else still needs `a` at that point — same pattern as
/// `repeat_min`'s final arm.
pub fn repeat_min_max(b: &mut NfaBuilder, a: Component, n: u32, m: u32) -> Component {
    debug_assert!(n <= m, "caller must order bounds before calling repeat_min_max");
    let mut parts: Vec<Component> = (n + 1..=m).map(|k| repeat_exact(b, clone_component(b, &a), k)).collect();
    parts.push(repeat_exact(b, a, n));
    union_many(b, parts)
}

/// Assigns dense `nfa_id`s by depth-first traversal from `start`, recording
/// every reachable state in `all`.
fn aggregate_states(arena: &[NfaState], start: NfaStateId, all: &mut HashSet<NfaStateId>, uid: &mut usize) {
    if !all.insert(start) {
        return;
    }
    arena[start.0].nfa_id.set(Some(*uid));
    *uid += 1;
    let state = &arena[start.0];
    for sym in state.transition_symbols() {
        for to in state.transitions_on(sym) {
            if !all.contains(&to) {
                aggregate_states(arena, to, all, uid);
            }
        }
    }
}

/// A locked, assembled NFA: a start state, a set of accepting states, and
/// every state reachable from the start. Dropping the `Nfa` drops every
/// owned state regardless of lock — ordinary `Vec` drop glue, no explicit
/// "force free" step required.
#[derive(Debug)]
pub struct Nfa {
    states: Vec<NfaState>,
    start: NfaStateId,
    accepting: HashSet<NfaStateId>,
    dense_count: usize,
}

/// Aggregates every state reachable from `start`, locks it, and registers
/// `accepting` as the accepting set. Fails if any accepting state is
/// unreachable from `start`, or if `accepting` is empty.
pub fn nfa_new(builder: NfaBuilder, start: NfaStateId, accepting: Vec<NfaStateId>) -> Result<Nfa, NfaError> {
    if accepting.is_empty() {
        return Err(NfaError::NoAcceptingStates);
    }
    let NfaBuilder { arena } = builder;
    let mut all = HashSet::new();
    let mut uid = 0usize;
    aggregate_states(&arena, start, &mut all, &mut uid);
    if !accepting.iter().all(|s| all.contains(s)) {
        return Err(NfaError::UnreachableAccepting);
    }
    for &id in &all {
        arena[id.0].lock();
    }
    Ok(Nfa {
        states: arena,
        start,
        accepting: accepting.into_iter().collect(),
        dense_count: uid,
    })
}

/// Assembles an NFA from a single component: the entry becomes the start
/// state and the exit becomes the sole accepting state. Consumes both the
/// builder and the component — using either afterwards is a programming
/// error (there is nothing left to use; ownership has moved into the `Nfa`).
pub fn nfa_construct(builder: NfaBuilder, component: Component) -> Result<Nfa, NfaError> {
    nfa_new(builder, component.entry, vec![component.exit])
}

impl Nfa {
    pub fn start(&self) -> NfaStateId {
        self.start
    }

    pub fn accepting(&self) -> &HashSet<NfaStateId> {
        &self.accepting
    }

    pub fn is_accepting(&self, id: NfaStateId) -> bool {
        self.accepting.contains(&id)
    }

    pub fn state(&self, id: NfaStateId) -> &NfaState {
        &self.states[id.0]
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of states assigned a dense `nfa_id`; sizes the simulator's
    /// `already_on` bitmap.
    pub fn dense_state_count(&self) -> usize {
        self.dense_count
    }

    /// Runs the online simulator end to end against `input`.
    pub fn accepts(&self, input: impl IntoIterator<Item = Symbol>) -> bool {
        let mut sim = simulator::NfaSimulator::init(self);
        for sym in input {
            sim.step(sym);
        }
        sim.fini() == simulator::SimStatus::Success
    }

    pub fn accepts_bytes(&self, input: &[u8]) -> bool {
        self.accepts(input.iter().map(|&b| Symbol::byte(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepts_str(nfa: &Nfa, s: &str) -> bool {
        nfa.accepts_bytes(s.as_bytes())
    }

    #[test]
    fn symbol_matches_only_itself() {
        let mut b = NfaBuilder::new();
        let c = symbol(&mut b, Symbol::byte(b'a'));
        let nfa = nfa_construct(b, c).unwrap();
        assert!(accepts_str(&nfa, "a"));
        assert!(!accepts_str(&nfa, "b"));
        assert!(!accepts_str(&nfa, ""));
        assert!(!accepts_str(&nfa, "aa"));
    }

    #[test]
    fn concat_joins_in_order() {
        let mut b = NfaBuilder::new();
        let a = symbol(&mut b, Symbol::byte(b'a'));
        let bb = symbol(&mut b, Symbol::byte(b'b'));
        let c = concat(&mut b, a, bb);
        let nfa = nfa_construct(b, c).unwrap();
        assert!(accepts_str(&nfa, "ab"));
        assert!(!accepts_str(&nfa, "ba"));
        assert!(!accepts_str(&nfa, "a"));
    }

    #[test]
    fn union_accepts_either_branch() {
        let mut b = NfaBuilder::new();
        let a = symbol(&mut b, Symbol::byte(b'a'));
        let bb = symbol(&mut b, Symbol::byte(b'b'));
        let c = union(&mut b, a, bb);
        let nfa = nfa_construct(b, c).unwrap();
        assert!(accepts_str(&nfa, "a"));
        assert!(accepts_str(&nfa, "b"));
        assert!(!accepts_str(&nfa, "c"));
        assert!(!accepts_str(&nfa, "ab"));
    }

    #[test]
    fn repeat_matches_zero_or_more() {
        let mut b = NfaBuilder::new();
        let a = symbol(&mut b, Symbol::byte(b'a'));
        let c = repeat(&mut b, a);
        let nfa = nfa_construct(b, c).unwrap();
        assert!(accepts_str(&nfa, ""));
        assert!(accepts_str(&nfa, "a"));
        assert!(accepts_str(&nfa, "aaaaa"));
        assert!(!accepts_str(&nfa, "aaab"));
    }

    #[test]
    fn repeat_exact_zero_matches_only_empty_string() {
        let mut b = NfaBuilder::new();
        let a = symbol(&mut b, Symbol::byte(b'a'));
        let c = repeat_exact(&mut b, a, 0);
        let nfa = nfa_construct(b, c).unwrap();
        assert!(accepts_str(&nfa, ""));
        assert!(!accepts_str(&nfa, "a"));
    }

    #[test]
    fn repeat_exact_n() {
        let mut b = NfaBuilder::new();
        let a = symbol(&mut b, Symbol::byte(b'a'));
        let c = repeat_exact(&mut b, a, 3);
        let nfa = nfa_construct(b, c).unwrap();
        assert!(!accepts_str(&nfa, "aa"));
        assert!(accepts_str(&nfa, "aaa"));
        assert!(!accepts_str(&nfa, "aaaa"));
    }

    #[test]
    fn repeat_min_zero_is_repeat() {
        let mut b1 = NfaBuilder::new();
        let a1 = symbol(&mut b1, Symbol::byte(b'a'));
        let star = repeat(&mut b1, a1);
        let star_nfa = nfa_construct(b1, star).unwrap();

        let mut b2 = NfaBuilder::new();
        let a2 = symbol(&mut b2, Symbol::byte(b'a'));
        let min0 = repeat_min(&mut b2, a2, 0);
        let min0_nfa = nfa_construct(b2, min0).unwrap();

        for s in ["", "a", "aa", "aaaaa"] {
            assert_eq!(accepts_str(&star_nfa, s), accepts_str(&min0_nfa, s), "mismatch on {s:?}");
        }
    }

    #[test]
    fn repeat_min_requires_at_least_n() {
        let mut b = NfaBuilder::new();
        let a = symbol(&mut b, Symbol::byte(b'a'));
        let c = repeat_min(&mut b, a, 2);
        let nfa = nfa_construct(b, c).unwrap();
        assert!(!accepts_str(&nfa, ""));
        assert!(!accepts_str(&nfa, "a"));
        assert!(accepts_str(&nfa, "aa"));
        assert!(accepts_str(&nfa, "aaaaaa"));
    }

    #[test]
    fn repeat_min_max_n_n_is_repeat_exact() {
        let mut b1 = NfaBuilder::new();
        let a1 = symbol(&mut b1, Symbol::byte(b'a'));
        let exact = repeat_exact(&mut b1, a1, 3);
        let exact_nfa = nfa_construct(b1, exact).unwrap();

        let mut b2 = NfaBuilder::new();
        let a2 = symbol(&mut b2, Symbol::byte(b'a'));
        let minmax = repeat_min_max(&mut b2, a2, 3, 3);
        let minmax_nfa = nfa_construct(b2, minmax).unwrap();

        for s in ["aa", "aaa", "aaaa"] {
            assert_eq!(accepts_str(&exact_nfa, s), accepts_str(&minmax_nfa, s), "mismatch on {s:?}");
        }
    }

    #[test]
    fn repeat_min_max_range() {
        let mut b = NfaBuilder::new();
        let a = symbol(&mut b, Symbol::byte(b'a'));
        let c = repeat_min_max(&mut b, a, 2, 4);
        let nfa = nfa_construct(b, c).unwrap();
        assert!(!accepts_str(&nfa, "a"));
        assert!(accepts_str(&nfa, "aa"));
        assert!(accepts_str(&nfa, "aaa"));
        assert!(accepts_str(&nfa, "aaaa"));
        assert!(!accepts_str(&nfa, "aaaaa"));
    }

    #[test]
    fn union_with_empty_set_is_identity() {
        let mut b = NfaBuilder::new();
        let bee = symbol(&mut b, Symbol::byte(b'b'));
        let empty = empty_set(&mut b);
        let c = union(&mut b, empty, bee);
        let nfa = nfa_construct(b, c).unwrap();
        assert!(accepts_str(&nfa, "b"));
        assert!(!accepts_str(&nfa, ""));
    }

    #[test]
    fn concat_with_empty_string_is_identity() {
        let mut b = NfaBuilder::new();
        let a = symbol(&mut b, Symbol::byte(b'a'));
        let empty = empty_string(&mut b);
        let c = concat(&mut b, a, empty);
        let nfa = nfa_construct(b, c).unwrap();
        assert!(accepts_str(&nfa, "a"));
        assert!(!accepts_str(&nfa, ""));
    }

    #[test]
    fn union_many_and_concat_many_fold_correctly() {
        let mut b = NfaBuilder::new();
        let parts: Vec<Component> = [b'a', b'b', b'c'].into_iter().map(|c| symbol(&mut b, Symbol::byte(c))).collect();
        let any_of = union_many(&mut b, parts);
        let nfa = nfa_construct(b, any_of).unwrap();
        assert!(accepts_str(&nfa, "a"));
        assert!(accepts_str(&nfa, "b"));
        assert!(accepts_str(&nfa, "c"));
        assert!(!accepts_str(&nfa, "d"));

        let mut b2 = NfaBuilder::new();
        let parts2: Vec<Component> = [b'a', b'b', b'c'].into_iter().map(|c| symbol(&mut b2, Symbol::byte(c))).collect();
        let abc = concat_many(&mut b2, parts2);
        let nfa2 = nfa_construct(b2, abc).unwrap();
        assert!(accepts_str(&nfa2, "abc"));
        assert!(!accepts_str(&nfa2, "ab"));
    }

    #[test]
    fn empty_iterator_identities() {
        let mut b = NfaBuilder::new();
        let none: Vec<Component> = vec![];
        let unsatisfiable = union_many(&mut b, none);
        let nfa = nfa_construct(b, unsatisfiable).unwrap();
        assert!(!accepts_str(&nfa, ""));
        assert!(!accepts_str(&nfa, "a"));

        let mut b2 = NfaBuilder::new();
        let none2: Vec<Component> = vec![];
        let empty_lang = concat_many(&mut b2, none2);
        let nfa2 = nfa_construct(b2, empty_lang).unwrap();
        assert!(accepts_str(&nfa2, ""));
        assert!(!accepts_str(&nfa2, "a"));
    }

    #[test]
    fn unreachable_accepting_state_rejected() {
        let mut b = NfaBuilder::new();
        let start = b.fresh_state();
        let stray = b.fresh_state();
        let err = nfa_new(b, start, vec![stray]).unwrap_err();
        assert_eq!(err, NfaError::UnreachableAccepting);
    }

    #[test]
    fn no_accepting_states_rejected() {
        let mut b = NfaBuilder::new();
        let start = b.fresh_state();
        let err = nfa_new(b, start, vec![]).unwrap_err();
        assert_eq!(err, NfaError::NoAcceptingStates);
    }

    #[test]
    fn locked_state_rejects_every_mutator() {
        // A -a-> B -b-> C, matches "ab" per spec §8 scenario 6.
        let mut b = NfaBuilder::new();
        let a = b.fresh_state();
        let mid = b.fresh_state();
        let c = b.fresh_state();
        b.add_transition(a, Symbol::byte(b'a'), mid);
        b.add_transition(mid, Symbol::byte(b'b'), c);
        let nfa = nfa_new(b, a, vec![c]).unwrap();

        for &id in &[a, mid, c] {
            let state = nfa.state(id);
            assert!(state.is_locked());
            assert_eq!(state.add_transition(Symbol::byte(b'z'), a), Err(NfaError::StateLocked));
            assert_eq!(state.remove_transition(Symbol::byte(b'a'), mid), Err(NfaError::StateLocked));
            assert_eq!(state.clear_transition_symbol(Symbol::byte(b'a')), Err(NfaError::StateLocked));
            assert_eq!(state.clear_all_transitions(), Err(NfaError::StateLocked));
        }
        assert!(nfa.accepts_bytes(b"ab"));
    }

    #[test]
    fn clone_component_preserves_cyclic_topology() {
        // Cloning a starred fragment must terminate despite the ε self-loop.
        let mut b = NfaBuilder::new();
        let a = symbol(&mut b, Symbol::byte(b'a'));
        let star = repeat(&mut b, a);
        let clone = clone_component(&mut b, &star);
        let nfa = nfa_construct(b, clone).unwrap();
        assert!(accepts_str(&nfa, ""));
        assert!(accepts_str(&nfa, "aaa"));
    }
}
