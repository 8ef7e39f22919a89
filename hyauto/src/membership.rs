//! Quantifier resolution over a hyperword.
//!
//! Track `i` is bound by the `i`-th quantifier of the automaton's prefix.
//! The checker walks the prefix left to right, trying words of the hyperword
//! for each track in hyperword order, and hands every complete assignment to
//! a [`RunManager`]:
//!
//! - `Exists` succeeds on the first word whose sub-search succeeds and fails
//!   if there is none (in particular on an empty hyperword);
//! - `ForAll` fails on the first word whose sub-search fails and succeeds
//!   otherwise (vacuously on an empty hyperword).
use log::debug;

use crate::{
    control::{SearchControl, Unbounded},
    nfh::{Nfh, Quantifier},
    run::{Run, RunManager, SyncMode},
    utils::{Error, HyResult},
    word::{Hyperword, Word},
};

/// An accepting leaf of the quantifier search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    /// Word assigned to each track.
    pub assignment: Vec<Word>,
    /// The accepting run found for that assignment.
    pub run: Run,
}

/// Verdict of a membership check together with the runs supporting it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MembershipReport {
    pub accepted: bool,
    /// Empty when the hyperword is rejected. When accepted, holds every
    /// accepting leaf the search had to confirm: a single witness under a
    /// purely existential prefix, one per universal branch otherwise.
    pub witnesses: Vec<Witness>,
    /// Configurations expanded over all run searches.
    pub explored: usize,
}

/// Decides hyperword membership for an [`Nfh`].
#[derive(Debug, Clone, Copy)]
pub struct MembershipChecker<'a> {
    manager: RunManager<'a>,
}

impl<'a> MembershipChecker<'a> {
    pub fn new(nfh: &'a Nfh, mode: SyncMode) -> Self {
        Self {
            manager: RunManager::new(nfh, mode),
        }
    }

    pub fn nfh(&self) -> &'a Nfh {
        self.manager.nfh()
    }

    pub fn mode(&self) -> SyncMode {
        self.manager.mode()
    }

    /// Returns true if `hyperword` is accepted.
    pub fn check(&self, hyperword: &Hyperword) -> HyResult<bool> {
        Ok(self.check_with(hyperword, &mut Unbounded)?.accepted)
    }

    /// Like [`Self::check`] but also collects the accepting runs.
    pub fn check_with_witnesses(&self, hyperword: &Hyperword) -> HyResult<MembershipReport> {
        self.check_with(hyperword, &mut Unbounded)
    }

    /// Full check with a caller-supplied control, polled once per quantifier
    /// branch and once per expanded configuration.
    pub fn check_with(
        &self,
        hyperword: &Hyperword,
        control: &mut impl SearchControl,
    ) -> HyResult<MembershipReport> {
        debug!(
            "Checking membership of {} word(s) against prefix {}",
            hyperword.len(),
            self.nfh()
                .quantifiers()
                .iter()
                .map(|q| q.to_str())
                .collect::<String>()
        );

        let mut search = Search {
            manager: self.manager,
            hyperword,
            control,
            explored: 0,
            assignment: Vec::with_capacity(self.nfh().arity()),
            witnesses: Vec::new(),
        };
        let accepted = search.resolve()?;
        debug!(
            "Hyperword {} after {} configurations",
            if accepted { "accepted" } else { "rejected" },
            search.explored
        );

        let explored = search.explored;
        let witnesses = if accepted {
            search.witnesses
        } else {
            Vec::new()
        };
        Ok(MembershipReport {
            accepted,
            witnesses,
            explored,
        })
    }
}

/// Shorthand for a synchronous [`MembershipChecker::check`].
pub fn check_membership(nfh: &Nfh, hyperword: &Hyperword) -> HyResult<bool> {
    MembershipChecker::new(nfh, SyncMode::Synchronous).check(hyperword)
}

struct Search<'a, 'h, C> {
    manager: RunManager<'a>,
    hyperword: &'h Hyperword,
    control: &'h mut C,
    explored: usize,
    /// Words bound to tracks `0..assignment.len()`.
    assignment: Vec<Word>,
    witnesses: Vec<Witness>,
}

impl<C: SearchControl> Search<'_, '_, C> {
    fn resolve(&mut self) -> HyResult<bool> {
        let track = self.assignment.len();
        let Some(&quantifier) = self.manager.nfh().quantifiers().get(track) else {
            return self.leaf();
        };

        // Witnesses gathered under a branch that is later discarded must not
        // leak into the report.
        let mark = self.witnesses.len();
        let hyperword = self.hyperword;
        match quantifier {
            Quantifier::Exists => {
                for word in hyperword {
                    if self.branch(word)? {
                        debug!("Track {} (E): witness {}", track, word);
                        return Ok(true);
                    }
                    self.witnesses.truncate(mark);
                }
                debug!("Track {} (E): no witness among {} word(s)", track, hyperword.len());
                Ok(false)
            }
            Quantifier::ForAll => {
                for word in hyperword {
                    if !self.branch(word)? {
                        debug!("Track {} (A): counterexample {}", track, word);
                        self.witnesses.truncate(mark);
                        return Ok(false);
                    }
                }
                debug!("Track {} (A): all {} word(s) hold", track, hyperword.len());
                Ok(true)
            }
        }
    }

    fn branch(&mut self, word: &Word) -> HyResult<bool> {
        if !self.control.proceed(self.explored) {
            return Err(Error::SearchInterrupted {
                explored: self.explored,
            });
        }
        self.assignment.push(word.clone());
        let result = self.resolve();
        self.assignment.pop();
        result
    }

    fn leaf(&mut self) -> HyResult<bool> {
        let run = self
            .manager
            .search_counted(&self.assignment, &mut *self.control, &mut self.explored)?;
        match run {
            Some(run) => {
                self.witnesses.push(Witness {
                    assignment: self.assignment.clone(),
                    run,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
