//! Nondeterministic finite-word hyperautomata.
//!
//! An [`Nfh`] reads a tuple of `k` words, one per track, and binds each track
//! with a [`Quantifier`]. The automaton is validated once, when it is built,
//! and is immutable afterwards. The search engines in [`crate::run`] and
//! [`crate::membership`] borrow it read-only and never re-check its
//! invariants.
use std::{fmt, str::FromStr};

use bit_set::BitSet;
use indexmap::IndexSet;
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::EnumIs;

use crate::{
    symbol::{Letter, PADDING_TOKEN, Symbol},
    utils::{Error, HyResult, Malformation},
};

/// Dense index of a state inside an [`Nfh`]. States are numbered in
/// declaration order.
pub type StateId = u32;

/// Inline capacity for transition tuples. Automata rarely read more tracks.
pub(crate) const INLINE_TRACKS: usize = 4;

/// Quantifier binding one track of the automaton to the hyperword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Quantifier {
    /// Some word of the hyperword must be assigned to the track.
    Exists,
    /// Every word of the hyperword must be assigned to the track.
    ForAll,
}

impl Quantifier {
    pub fn to_str(self) -> &'static str {
        match self {
            Quantifier::Exists => "E",
            Quantifier::ForAll => "A",
        }
    }
}

impl FromStr for Quantifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "E" | "e" | "∃" | "exists" | "Exists" => Ok(Quantifier::Exists),
            "A" | "a" | "∀" | "forall" | "ForAll" | "for_all" => Ok(Quantifier::ForAll),
            other => Err(Error::InvalidQuantifier(other.to_string())),
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A single transition `source --(l_0, ..., l_{k-1})--> target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transition {
    pub source: StateId,
    pub letters: SmallVec<[Letter; INLINE_TRACKS]>,
    pub target: StateId,
}

impl Transition {
    /// Returns true if the transition reads padding on every track.
    pub fn is_idle(&self) -> bool {
        self.letters.iter().all(Letter::is_pad)
    }
}

/// A validated, immutable hyperautomaton.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        into = "crate::definition::NfhDefinition",
        try_from = "crate::definition::NfhDefinition"
    )
)]
pub struct Nfh {
    states: IndexSet<String>,
    initial: Vec<StateId>,
    initial_set: BitSet,
    accepting: BitSet,
    arity: usize,
    alphabet: IndexSet<Symbol>,
    transitions: Vec<Transition>,
    /// Transition indices grouped by source state, in declaration order.
    outgoing: Vec<SmallVec<[u32; 4]>>,
    quantifiers: Vec<Quantifier>,
}

impl Nfh {
    /// Builds and validates an automaton.
    ///
    /// Transitions are given as `(source, letters, target)` triples naming
    /// states by their declared names. Construction is atomic: either every
    /// invariant holds and an [`Nfh`] is returned, or the first violation is
    /// reported as [`Error::MalformedAutomaton`].
    pub fn new<S, I, A, T, L>(
        states: impl IntoIterator<Item = S>,
        initial: impl IntoIterator<Item = I>,
        accepting: impl IntoIterator<Item = A>,
        arity: usize,
        transitions: impl IntoIterator<Item = (T, L, T)>,
        quantifiers: impl IntoIterator<Item = Quantifier>,
        alphabet: impl IntoIterator<Item = Symbol>,
    ) -> HyResult<Self>
    where
        S: Into<String>,
        I: AsRef<str>,
        A: AsRef<str>,
        T: AsRef<str>,
        L: IntoIterator<Item = Letter>,
    {
        if arity == 0 {
            return Err(Malformation::ZeroArity.into());
        }

        let mut state_names = IndexSet::new();
        for state in states {
            let state = state.into();
            if state_names.contains(&state) {
                return Err(Malformation::DuplicateState(state).into());
            }
            state_names.insert(state);
        }
        if state_names.is_empty() {
            return Err(Malformation::EmptyStateSet.into());
        }
        let lookup = |name: &str| state_names.get_index_of(name).map(|i| i as StateId);

        let alphabet: IndexSet<Symbol> = alphabet.into_iter().collect();
        if let Some(symbol) = alphabet.iter().find(|s| s.is_padding_spelling()) {
            return Err(Malformation::PaddingInAlphabet(symbol.to_string()).into());
        }

        let quantifiers: Vec<Quantifier> = quantifiers.into_iter().collect();
        if quantifiers.len() != arity {
            return Err(Malformation::QuantifierPrefixLength {
                expected: arity,
                found: quantifiers.len(),
            }
            .into());
        }

        let mut initial_order = Vec::new();
        let mut initial_set = BitSet::with_capacity(state_names.len());
        for name in initial {
            let name = name.as_ref();
            let id = lookup(name)
                .ok_or_else(|| Malformation::UnknownInitialState(name.to_string()))?;
            if initial_set.insert(id as usize) {
                initial_order.push(id);
            }
        }
        if initial_order.is_empty() {
            return Err(Malformation::NoInitialState.into());
        }

        let mut accepting_set = BitSet::with_capacity(state_names.len());
        for name in accepting {
            let name = name.as_ref();
            let id = lookup(name)
                .ok_or_else(|| Malformation::UnknownAcceptingState(name.to_string()))?;
            accepting_set.insert(id as usize);
        }
        if accepting_set.is_empty() {
            return Err(Malformation::NoAcceptingState.into());
        }

        let mut delta = Vec::new();
        let mut outgoing = vec![SmallVec::new(); state_names.len()];
        let mut seen = std::collections::HashSet::new();
        for (index, (source, letters, target)) in transitions.into_iter().enumerate() {
            let source_id = lookup(source.as_ref()).ok_or_else(|| {
                Malformation::UnknownTransitionSource {
                    index,
                    state: source.as_ref().to_string(),
                }
            })?;
            let target_id = lookup(target.as_ref()).ok_or_else(|| {
                Malformation::UnknownTransitionTarget {
                    index,
                    state: target.as_ref().to_string(),
                }
            })?;
            let letters: SmallVec<[Letter; INLINE_TRACKS]> = letters.into_iter().collect();
            if letters.len() != arity {
                return Err(Malformation::TransitionArity {
                    index,
                    expected: arity,
                    found: letters.len(),
                }
                .into());
            }
            if let Some(symbol) = letters
                .iter()
                .filter_map(Letter::symbol)
                .find(|s| !alphabet.contains(*s))
            {
                return Err(Malformation::SymbolOutsideAlphabet {
                    index,
                    symbol: symbol.to_string(),
                }
                .into());
            }

            let transition = Transition {
                source: source_id,
                letters,
                target: target_id,
            };
            // The relation is a set: repeated triples add nothing.
            if seen.insert(transition.clone()) {
                outgoing[source_id as usize].push(delta.len() as u32);
                delta.push(transition);
            }
        }

        debug!(
            "Built NFH with {} states, {} transitions, arity {} and prefix {}",
            state_names.len(),
            delta.len(),
            arity,
            quantifiers
                .iter()
                .map(|q| q.to_str())
                .collect::<Vec<_>>()
                .join("")
        );

        Ok(Self {
            states: state_names,
            initial: initial_order,
            initial_set,
            accepting: accepting_set,
            arity,
            alphabet,
            transitions: delta,
            outgoing,
            quantifiers,
        })
    }

    /// Number of tracks `k`.
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// State names, indexed by [`StateId`].
    pub fn states(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.states.iter().map(String::as_str)
    }

    /// Returns the declared name of a state.
    ///
    /// # Panics
    /// Panics if `state` does not belong to this automaton.
    pub fn state_name(&self, state: StateId) -> &str {
        &self.states[state as usize]
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.get_index_of(name).map(|i| i as StateId)
    }

    /// Initial states, in declaration order.
    pub fn initial_states(&self) -> &[StateId] {
        &self.initial
    }

    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.accepting.iter().map(|i| i as StateId)
    }

    pub fn is_initial(&self, state: StateId) -> bool {
        self.initial_set.contains(state as usize)
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(state as usize)
    }

    pub fn alphabet(&self) -> impl ExactSizeIterator<Item = &Symbol> + '_ {
        self.alphabet.iter()
    }

    pub fn quantifiers(&self) -> &[Quantifier] {
        &self.quantifiers
    }

    /// All transitions, in declaration order with duplicates removed.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Transitions leaving `state`, in declaration order.
    pub fn transitions_from(&self, state: StateId) -> impl Iterator<Item = &Transition> + '_ {
        self.outgoing_indices(state)
            .iter()
            .map(|&idx| &self.transitions[idx as usize])
    }

    pub(crate) fn outgoing_indices(&self, state: StateId) -> &[u32] {
        self.outgoing
            .get(state as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Formats a transition with state names, e.g. `q0 --(a, #)--> q1`.
    pub fn fmt_transition<'a>(&'a self, transition: &'a Transition) -> impl fmt::Display + 'a {
        struct Fmt<'a> {
            nfh: &'a Nfh,
            transition: &'a Transition,
        }

        impl fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} --(", self.nfh.state_name(self.transition.source))?;
                for (idx, letter) in self.transition.letters.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", letter)?;
                }
                write!(f, ")--> {}", self.nfh.state_name(self.transition.target))
            }
        }

        Fmt {
            nfh: self,
            transition,
        }
    }
}

/// Lists the automaton in the `key: values` layout also accepted by the
/// definition loaders, with one `source letters... target` line per
/// transition under `delta:`.
impl fmt::Display for Nfh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
            items.collect::<Vec<_>>().join(" ")
        }

        writeln!(f, "k: {}", self.arity)?;
        writeln!(
            f,
            "alpha: {}",
            join(self.quantifiers.iter().map(|q| q.to_str()))
        )?;
        writeln!(f, "states: {}", join(self.states()))?;
        writeln!(
            f,
            "initial: {}",
            join(self.initial.iter().map(|&s| self.state_name(s)))
        )?;
        writeln!(
            f,
            "accepting: {}",
            join(self.accepting_states().map(|s| self.state_name(s)))
        )?;
        writeln!(f, "alphabet: {}", join(self.alphabet.iter().map(Symbol::as_str)))?;
        write!(f, "delta:")?;
        for transition in &self.transitions {
            write!(f, "\n{}", self.state_name(transition.source))?;
            for letter in &transition.letters {
                match letter {
                    Letter::Sym(symbol) => write!(f, " {}", symbol)?,
                    Letter::Pad => write!(f, " {}", PADDING_TOKEN)?,
                }
            }
            write!(f, " {}", self.state_name(transition.target))?;
        }
        Ok(())
    }
}

/// Incremental builder for [`Nfh`], convenient when the automaton is written
/// out by hand. Letters are given textually; `#` denotes padding.
///
/// ```rust
/// # use hyauto::nfh::{NfhBuilder, Quantifier};
/// let nfh = NfhBuilder::new()
///     .states(["q0", "q1"])
///     .initial(["q0"])
///     .accepting(["q1"])
///     .alphabet(["a", "b"])
///     .quantifiers([Quantifier::Exists, Quantifier::Exists])
///     .transition("q0", ["a", "b"], "q1")
///     .build()
///     .unwrap();
/// assert_eq!(nfh.arity(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NfhBuilder {
    states: Vec<String>,
    initial: Vec<String>,
    accepting: Vec<String>,
    arity: Option<usize>,
    alphabet: Vec<Symbol>,
    quantifiers: Vec<Quantifier>,
    transitions: Vec<(String, Vec<Letter>, String)>,
}

impl NfhBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states<'a>(mut self, states: impl IntoIterator<Item = &'a str>) -> Self {
        self.states.extend(states.into_iter().map(str::to_string));
        self
    }

    pub fn initial<'a>(mut self, states: impl IntoIterator<Item = &'a str>) -> Self {
        self.initial.extend(states.into_iter().map(str::to_string));
        self
    }

    pub fn accepting<'a>(mut self, states: impl IntoIterator<Item = &'a str>) -> Self {
        self.accepting.extend(states.into_iter().map(str::to_string));
        self
    }

    /// Sets the arity explicitly. Defaults to the length of the quantifier prefix.
    pub fn arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    pub fn alphabet<'a>(mut self, symbols: impl IntoIterator<Item = &'a str>) -> Self {
        self.alphabet.extend(symbols.into_iter().map(Symbol::new));
        self
    }

    pub fn quantifiers(mut self, quantifiers: impl IntoIterator<Item = Quantifier>) -> Self {
        self.quantifiers.extend(quantifiers);
        self
    }

    pub fn transition<'a>(
        mut self,
        source: &str,
        letters: impl IntoIterator<Item = &'a str>,
        target: &str,
    ) -> Self {
        self.transitions.push((
            source.to_string(),
            letters.into_iter().map(Letter::parse).collect(),
            target.to_string(),
        ));
        self
    }

    pub fn build(self) -> HyResult<Nfh> {
        let arity = self.arity.unwrap_or(self.quantifiers.len());
        Nfh::new(
            self.states,
            self.initial,
            self.accepting,
            arity,
            self.transitions,
            self.quantifiers,
            self.alphabet,
        )
    }
}
