//! Run search for a fixed assignment of words to tracks.
//!
//! The search explores configurations `(state, cursors)` where `cursors[i]`
//! is the number of symbols already consumed from the word on track `i`.
//! Cursor vectors are bounded by the word lengths and the state set is
//! finite, so a search that never revisits a configuration always
//! terminates, even when the automaton has transitions that idle every
//! track.
//!
//! Exploration is breadth-first from all initial states at once. The first
//! accepting configuration dequeued therefore ends a run with the fewest
//! transitions, which is the run reported as a witness.
use std::{collections::VecDeque, fmt, str::FromStr};

use indexmap::IndexSet;
use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use strum::EnumIs;

use crate::{
    control::{SearchControl, Unbounded},
    nfh::{INLINE_TRACKS, Nfh, StateId, Transition},
    symbol::Letter,
    utils::{Error, HyResult},
    word::Word,
};

/// How tracks are paced against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SyncMode {
    /// Every step reads one letter from every track. A track offers its next
    /// symbol while it has one and padding once it is exhausted, and a
    /// transition fires only if it matches exactly what every track offers.
    #[default]
    Synchronous,
    /// A step advances the tracks whose letter is a symbol. Tracks read as
    /// padding stay where they are, so tracks progress at independent paces.
    /// Exhausted tracks can only be read as padding.
    Asynchronous,
}

impl SyncMode {
    pub fn to_str(self) -> &'static str {
        match self {
            SyncMode::Synchronous => "synchronous",
            SyncMode::Asynchronous => "asynchronous",
        }
    }
}

impl FromStr for SyncMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sync" | "synchronous" => Ok(SyncMode::Synchronous),
            "async" | "asynchronous" => Ok(SyncMode::Asynchronous),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A node of the run search: the current state and one cursor per track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Configuration {
    pub state: StateId,
    pub cursors: SmallVec<[u32; INLINE_TRACKS]>,
}

/// An accepting run: the configurations visited and the transitions taken
/// between them. `configurations().len() == steps() + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Run {
    mode: SyncMode,
    words: Vec<Word>,
    configurations: Vec<Configuration>,
    transitions: Vec<u32>,
}

impl Run {
    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// The word assigned to each track.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    /// Indices into [`Nfh::transitions`] of the transitions taken, in order.
    pub fn transition_indices(&self) -> &[u32] {
        &self.transitions
    }

    /// Resolves the transitions taken against the automaton that produced the run.
    pub fn transitions<'a>(&'a self, nfh: &'a Nfh) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions
            .iter()
            .map(move |&idx| &nfh.transitions()[idx as usize])
    }

    pub fn steps(&self) -> usize {
        self.transitions.len()
    }

    pub fn initial_configuration(&self) -> &Configuration {
        &self.configurations[0]
    }

    pub fn final_configuration(&self) -> &Configuration {
        &self.configurations[self.configurations.len() - 1]
    }

    /// Step-by-step listing of the run, resolving state names through `nfh`.
    ///
    /// ```text
    /// run (synchronous) on (ab, a):
    ///   step 1: q0 [0, 0] --(a, a)--> q1 [1, 1]
    ///   step 2: q1 [1, 1] --(b, #)--> q2 [2, 1]
    /// final: q2 [2, 1] (accepted)
    /// ```
    pub fn fmt<'a>(&'a self, nfh: &'a Nfh) -> impl fmt::Display + 'a {
        struct Fmt<'a> {
            run: &'a Run,
            nfh: &'a Nfh,
        }

        fn cursors(f: &mut fmt::Formatter<'_>, config: &Configuration) -> fmt::Result {
            f.write_str("[")?;
            for (idx, cursor) in config.cursors.iter().enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", cursor)?;
            }
            f.write_str("]")
        }

        impl fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "run ({}) on (", self.run.mode)?;
                for (idx, word) in self.run.words.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", word)?;
                }
                writeln!(f, "):")?;

                for (step, (window, transition)) in self
                    .run
                    .configurations
                    .windows(2)
                    .zip(self.run.transitions(self.nfh))
                    .enumerate()
                {
                    write!(
                        f,
                        "  step {}: {} ",
                        step + 1,
                        self.nfh.state_name(window[0].state)
                    )?;
                    cursors(f, &window[0])?;
                    f.write_str(" --(")?;
                    for (idx, letter) in transition.letters.iter().enumerate() {
                        if idx > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", letter)?;
                    }
                    write!(f, ")--> {} ", self.nfh.state_name(window[1].state))?;
                    cursors(f, &window[1])?;
                    writeln!(f)?;
                }

                let last = self.run.final_configuration();
                write!(f, "final: {} ", self.nfh.state_name(last.state))?;
                cursors(f, last)?;
                f.write_str(" (accepted)")
            }
        }

        Fmt { run: self, nfh }
    }
}

/// Result of one run search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// The shortest accepting run, if one exists.
    pub run: Option<Run>,
    /// Number of configurations expanded by this search.
    pub explored: usize,
}

impl RunOutcome {
    pub fn is_accepted(&self) -> bool {
        self.run.is_some()
    }
}

/// Decides whether an [`Nfh`] has an accepting run on a fixed tuple of words.
///
/// Each search owns its visited set; nothing is shared between calls, so a
/// single manager may be used for any number of word tuples.
#[derive(Debug, Clone, Copy)]
pub struct RunManager<'a> {
    nfh: &'a Nfh,
    mode: SyncMode,
}

impl<'a> RunManager<'a> {
    pub fn new(nfh: &'a Nfh, mode: SyncMode) -> Self {
        Self { nfh, mode }
    }

    pub fn nfh(&self) -> &'a Nfh {
        self.nfh
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Returns true if some run on `words` is accepting.
    pub fn is_accepted(&self, words: &[Word]) -> HyResult<bool> {
        Ok(self.search(words, &mut Unbounded)?.is_accepted())
    }

    /// Returns the shortest accepting run on `words`, if any.
    pub fn accepting_run(&self, words: &[Word]) -> HyResult<Option<Run>> {
        Ok(self.search(words, &mut Unbounded)?.run)
    }

    /// Full search with a caller-supplied control.
    pub fn search(
        &self,
        words: &[Word],
        control: &mut impl SearchControl,
    ) -> HyResult<RunOutcome> {
        let mut explored = 0;
        let run = self.search_counted(words, control, &mut explored)?;
        Ok(RunOutcome { run, explored })
    }

    /// Search core. `explored` is shared with the caller so that nested
    /// searches (one per quantifier leaf) report a cumulative count to the
    /// control.
    pub(crate) fn search_counted(
        &self,
        words: &[Word],
        control: &mut impl SearchControl,
        explored: &mut usize,
    ) -> HyResult<Option<Run>> {
        if words.len() != self.nfh.arity() {
            return Err(Error::ArityMismatch {
                expected: self.nfh.arity(),
                found: words.len(),
            });
        }

        let started_at = *explored;
        debug!(
            "Starting {} run search on word lengths {:?}",
            self.mode,
            words.iter().map(|w| w.len()).collect::<Vec<_>>()
        );

        // `visited` doubles as the node arena: a configuration's index is its node id.
        let mut visited: IndexSet<Configuration> = IndexSet::new();
        let mut parents: Vec<Option<(u32, u32)>> = Vec::new();
        let mut queue: VecDeque<usize> = VecDeque::new();

        for &state in self.nfh.initial_states() {
            let config = Configuration {
                state,
                cursors: smallvec![0; words.len()],
            };
            let (idx, inserted) = visited.insert_full(config);
            if inserted {
                parents.push(None);
                queue.push_back(idx);
            }
        }

        while let Some(idx) = queue.pop_front() {
            if !control.proceed(*explored) {
                debug!("Run search interrupted after {} configurations", *explored);
                return Err(Error::SearchInterrupted {
                    explored: *explored,
                });
            }
            *explored += 1;

            let config = &visited[idx];
            if self.is_final(config, words) {
                debug!(
                    "Accepting configuration found after exploring {} configurations",
                    *explored - started_at
                );
                return Ok(Some(self.rebuild(words, &visited, &parents, idx)));
            }
            trace!(
                "Expanding {} at cursors {:?}",
                self.nfh.state_name(config.state),
                config.cursors
            );

            let state = config.state;
            let cursors = config.cursors.clone();
            for &t_idx in self.nfh.outgoing_indices(state) {
                let transition = &self.nfh.transitions()[t_idx as usize];
                let Some(next_cursors) = self.advance(&cursors, transition, words) else {
                    continue;
                };
                let next = Configuration {
                    state: transition.target,
                    cursors: next_cursors,
                };
                let (next_idx, inserted) = visited.insert_full(next);
                if inserted {
                    parents.push(Some((idx as u32, t_idx)));
                    queue.push_back(next_idx);
                }
            }
        }

        debug!(
            "No accepting run: exhausted {} reachable configurations",
            *explored - started_at
        );
        Ok(None)
    }

    /// Accepting state and every track fully consumed.
    fn is_final(&self, config: &Configuration, words: &[Word]) -> bool {
        self.nfh.is_accepting(config.state)
            && config
                .cursors
                .iter()
                .zip(words)
                .all(|(&cursor, word)| cursor as usize == word.len())
    }

    /// Applies `transition` to `cursors`, returning the successor cursors or
    /// `None` if the transition does not match what the tracks offer.
    fn advance(
        &self,
        cursors: &[u32],
        transition: &Transition,
        words: &[Word],
    ) -> Option<SmallVec<[u32; INLINE_TRACKS]>> {
        let mut next: SmallVec<[u32; INLINE_TRACKS]> = SmallVec::from_slice(cursors);
        for (track, letter) in transition.letters.iter().enumerate() {
            let offered = words[track].get(cursors[track] as usize);
            match (letter, offered) {
                (Letter::Sym(expected), Some(found)) if expected == found => next[track] += 1,
                (Letter::Sym(_), _) => return None,
                (Letter::Pad, None) => {}
                (Letter::Pad, Some(_)) => {
                    if self.mode.is_synchronous() {
                        return None;
                    }
                }
            }
        }
        Some(next)
    }

    fn rebuild(
        &self,
        words: &[Word],
        visited: &IndexSet<Configuration>,
        parents: &[Option<(u32, u32)>],
        last: usize,
    ) -> Run {
        let mut configurations = vec![visited[last].clone()];
        let mut transitions = Vec::new();
        let mut cursor = last;
        while let Some((parent, transition)) = parents[cursor] {
            configurations.push(visited[parent as usize].clone());
            transitions.push(transition);
            cursor = parent as usize;
        }
        configurations.reverse();
        transitions.reverse();

        Run {
            mode: self.mode,
            words: words.to_vec(),
            configurations,
            transitions,
        }
    }
}
