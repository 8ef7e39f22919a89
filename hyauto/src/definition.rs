//! Plain-data definitions of automata and hyperwords.
//!
//! These types are what configuration files deserialize into. They carry no
//! invariants of their own: converting an [`NfhDefinition`] into an
//! [`Nfh`] runs the ordinary validating constructor.
//!
//! ```json
//! {
//!   "k": 2,
//!   "alpha": ["E", "E"],
//!   "states": ["q0", "q1"],
//!   "initial": ["q0"],
//!   "accepting": ["q1"],
//!   "alphabet": ["a", "b"],
//!   "delta": [["q0", ["a", "b"], "q1"]]
//! }
//! ```
use serde::{Deserialize, Serialize};

use crate::{
    nfh::{Nfh, Quantifier, StateId},
    run::SyncMode,
    symbol::{Letter, PADDING_TOKEN, Symbol},
    utils::{Error, HyResult},
    word::{Hyperword, Word},
};

/// One transition: source state, letters (`#` for padding), target state.
pub type TransitionDefinition = (String, Vec<String>, String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfhDefinition {
    pub k: usize,
    /// Quantifier prefix, e.g. `["A", "E"]`.
    #[serde(alias = "quantifiers")]
    pub alpha: Vec<String>,
    pub states: Vec<String>,
    #[serde(alias = "initial_states")]
    pub initial: Vec<String>,
    #[serde(alias = "accepting_states")]
    pub accepting: Vec<String>,
    pub alphabet: Vec<String>,
    #[serde(default)]
    pub delta: Vec<TransitionDefinition>,
    /// Preferred synchrony mode for this automaton, if the file names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl NfhDefinition {
    pub fn quantifiers(&self) -> HyResult<Vec<Quantifier>> {
        self.alpha.iter().map(|q| q.parse()).collect()
    }

    pub fn mode(&self) -> HyResult<Option<SyncMode>> {
        self.mode.as_deref().map(str::parse).transpose()
    }
}

impl TryFrom<NfhDefinition> for Nfh {
    type Error = Error;

    fn try_from(definition: NfhDefinition) -> Result<Self, Self::Error> {
        let quantifiers = definition.quantifiers()?;
        // Validated here as well so that a bad mode is reported on load.
        definition.mode()?;
        let transitions = definition
            .delta
            .into_iter()
            .map(|(source, letters, target)| {
                let letters: Vec<Letter> = letters.iter().map(|l| Letter::parse(l)).collect();
                (source, letters, target)
            });
        Nfh::new(
            definition.states,
            definition.initial,
            definition.accepting,
            definition.k,
            transitions,
            quantifiers,
            definition.alphabet.into_iter().map(Symbol::from),
        )
    }
}

impl From<Nfh> for NfhDefinition {
    fn from(nfh: Nfh) -> Self {
        NfhDefinition::from(&nfh)
    }
}

impl From<&Nfh> for NfhDefinition {
    fn from(nfh: &Nfh) -> Self {
        let name = |state: StateId| nfh.state_name(state).to_string();
        NfhDefinition {
            k: nfh.arity(),
            alpha: nfh
                .quantifiers()
                .iter()
                .map(|q| q.to_str().to_string())
                .collect(),
            states: nfh.states().map(str::to_string).collect(),
            initial: nfh.initial_states().iter().map(|&s| name(s)).collect(),
            accepting: nfh.accepting_states().map(name).collect(),
            alphabet: nfh.alphabet().map(|s| s.as_str().to_string()).collect(),
            delta: nfh
                .transitions()
                .iter()
                .map(|t| {
                    let letters = t
                        .letters
                        .iter()
                        .map(|l| match l {
                            Letter::Sym(symbol) => symbol.as_str().to_string(),
                            Letter::Pad => PADDING_TOKEN.to_string(),
                        })
                        .collect();
                    (name(t.source), letters, name(t.target))
                })
                .collect(),
            mode: None,
        }
    }
}

/// A word written either as a string (one symbol per character) or as an
/// explicit list of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordDefinition {
    Chars(String),
    Symbols(Vec<String>),
}

impl From<WordDefinition> for Word {
    fn from(definition: WordDefinition) -> Self {
        match definition {
            WordDefinition::Chars(text) => Word::from_chars(&text),
            WordDefinition::Symbols(symbols) => symbols.into_iter().map(Symbol::from).collect(),
        }
    }
}

/// A hyperword written either as a bare list of words or as `{ "words": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperwordDefinition {
    List(Vec<WordDefinition>),
    Object { words: Vec<WordDefinition> },
}

impl From<HyperwordDefinition> for Hyperword {
    fn from(definition: HyperwordDefinition) -> Self {
        let words = match definition {
            HyperwordDefinition::List(words) | HyperwordDefinition::Object { words } => words,
        };
        words.into_iter().map(Word::from).collect()
    }
}
