use strum::{EnumIs, EnumTryAs};
use thiserror::Error;

/// Structural defects detected while building an [`crate::nfh::Nfh`].
///
/// Every variant names the invariant that was violated so that callers can
/// report the offending element without re-validating the automaton.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, Error)]
pub enum Malformation {
    /// The automaton declares no state at all.
    #[error("An automaton must declare at least one state.")]
    EmptyStateSet,

    /// The automaton reads zero tracks.
    #[error("An automaton must read at least one track (arity k >= 1).")]
    ZeroArity,

    /// No initial state was declared.
    #[error("An automaton must declare at least one initial state.")]
    NoInitialState,

    /// No accepting state was declared.
    #[error("An automaton must declare at least one accepting state.")]
    NoAcceptingState,

    /// The same state name appears twice in the state list.
    #[error("The state `{0}` is declared more than once.")]
    DuplicateState(String),

    /// An initial state is not part of the state set.
    #[error("The initial state `{0}` is not a declared state.")]
    UnknownInitialState(String),

    /// An accepting state is not part of the state set.
    #[error("The accepting state `{0}` is not a declared state.")]
    UnknownAcceptingState(String),

    /// A transition leaves a state that was never declared.
    #[error("Transition #{index} leaves the undeclared state `{state}`.")]
    UnknownTransitionSource { index: usize, state: String },

    /// A transition enters a state that was never declared.
    #[error("Transition #{index} enters the undeclared state `{state}`.")]
    UnknownTransitionTarget { index: usize, state: String },

    /// A transition tuple does not carry exactly one letter per track.
    #[error(
        "Transition #{index} reads a tuple of {found} letters but the automaton has arity {expected}."
    )]
    TransitionArity {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A transition reads a symbol that is neither padding nor part of the alphabet.
    #[error("Transition #{index} reads the symbol `{symbol}` which is not part of the alphabet.")]
    SymbolOutsideAlphabet { index: usize, symbol: String },

    /// The reserved padding token was listed as an alphabet symbol.
    #[error(
        "The padding token `{0}` is reserved and cannot be part of the alphabet. Use padding entries in transitions instead."
    )]
    PaddingInAlphabet(String),

    /// The quantifier prefix does not bind exactly one quantifier per track.
    #[error(
        "The quantifier prefix binds {found} tracks but the automaton has arity {expected}."
    )]
    QuantifierPrefixLength { expected: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs, Error)]
pub enum Error {
    /// The automaton violates a structural invariant. Construction failed atomically.
    #[error("Malformed automaton: {0}")]
    MalformedAutomaton(#[from] Malformation),

    /// A word tuple handed to the run search does not match the automaton arity.
    #[error(
        "The word tuple assigns {found} tracks but the automaton has arity {expected}. Exactly one word per track is required."
    )]
    ArityMismatch { expected: usize, found: usize },

    /// A search control asked the search to stop before a verdict was reached.
    #[error(
        "The search was interrupted by its control after exploring {explored} configurations. No verdict is available."
    )]
    SearchInterrupted { explored: usize },

    /// A textual quantifier could not be recognised.
    #[error("Unknown quantifier `{0}`. Expected one of `E`, `exists`, `A`, `forall`.")]
    InvalidQuantifier(String),

    /// A textual synchrony mode could not be recognised.
    #[error("Unknown synchrony mode `{0}`. Expected `sync` or `async`.")]
    InvalidMode(String),
}

pub type HyResult<T> = Result<T, Error>;
