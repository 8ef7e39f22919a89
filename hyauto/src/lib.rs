//! Hyauto: membership checking for nondeterministic finite-word hyperautomata.
//!
//! A hyperautomaton ([`nfh::Nfh`]) reads `k` words at once, one per track,
//! and binds each track with an existential or universal quantifier. A
//! hyperword (a finite set of words) is accepted when the quantifier prefix,
//! resolved over the hyperword, leads to word assignments on which the
//! automaton has accepting runs.
//!
//! The crate is organised bottom-up:
//!  - [`symbol`] and [`word`]: alphabet tokens, the padding sentinel, words and hyperwords.
//!  - [`nfh`]: the validated automaton and its transition index.
//!  - [`run`]: the configuration search deciding acceptance of one word tuple,
//!    in synchronous or asynchronous mode.
//!  - [`membership`]: the quantifier search lifting runs to hyperwords.
//!  - [`control`]: cooperative cancellation of both searches.
//!  - `definition` (feature `serde`): file formats for automata and hyperwords.
//!
//! Example
//! ```
//! use hyauto::prelude::*;
//!
//! let nfh = NfhBuilder::new()
//!     .states(["q0", "q1"])
//!     .initial(["q0"])
//!     .accepting(["q1"])
//!     .alphabet(["a", "b"])
//!     .quantifiers([Quantifier::Exists, Quantifier::Exists])
//!     .transition("q0", ["a", "b"], "q1")
//!     .build()
//!     .unwrap();
//!
//! let checker = MembershipChecker::new(&nfh, SyncMode::Synchronous);
//! assert!(checker.check(&Hyperword::from_strs(["a", "b"])).unwrap());
//! assert!(!checker.check(&Hyperword::from_strs(["a"])).unwrap());
//! ```

pub mod control;
#[cfg(feature = "serde")]
pub mod definition;
pub mod membership;
pub mod nfh;
pub mod run;
pub mod symbol;
pub mod utils;
pub mod word;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::control::{Deadline, NodeBudget, SearchControl, Unbounded};
    pub use crate::membership::{
        MembershipChecker, MembershipReport, Witness, check_membership,
    };
    pub use crate::nfh::{Nfh, NfhBuilder, Quantifier, StateId, Transition};
    pub use crate::run::{Configuration, Run, RunManager, RunOutcome, SyncMode};
    pub use crate::symbol::{Letter, PADDING_TOKEN, Symbol};
    pub use crate::utils::{Error, HyResult, Malformation};
    pub use crate::word::{Hyperword, Word};
}
