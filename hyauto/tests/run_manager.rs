use hyauto::prelude::*;

fn words(ws: &[&str]) -> Vec<Word> {
    ws.iter().map(|w| Word::from(*w)).collect()
}

fn exists(k: usize) -> Vec<Quantifier> {
    vec![Quantifier::Exists; k]
}

#[test]
fn single_synchronous_step_is_accepted() {
    let nfh = NfhBuilder::new()
        .states(["q0", "q1"])
        .initial(["q0"])
        .accepting(["q1"])
        .alphabet(["a", "b"])
        .quantifiers(exists(2))
        .transition("q0", ["a", "b"], "q1")
        .build()
        .unwrap();
    let manager = RunManager::new(&nfh, SyncMode::Synchronous);

    let run = manager
        .accepting_run(&words(&["a", "b"]))
        .unwrap()
        .expect("run should be accepted");
    assert_eq!(run.steps(), 1);
    assert_eq!(run.initial_configuration().cursors.as_slice(), &[0, 0]);
    assert_eq!(run.final_configuration().cursors.as_slice(), &[1, 1]);
    assert_eq!(run.final_configuration().state, nfh.state_id("q1").unwrap());

    assert!(!manager.is_accepted(&words(&["b", "a"])).unwrap());
}

#[test]
fn arity_mismatch_fails_fast() {
    let nfh = NfhBuilder::new()
        .states(["q0"])
        .initial(["q0"])
        .accepting(["q0"])
        .alphabet(["a"])
        .quantifiers(exists(2))
        .build()
        .unwrap();
    let err = RunManager::new(&nfh, SyncMode::Synchronous)
        .is_accepted(&words(&["a"]))
        .unwrap_err();
    assert_eq!(
        err,
        Error::ArityMismatch {
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn nondeterministic_branching_finds_accepting_branch() {
    let nfh = NfhBuilder::new()
        .states(["q0", "q1", "q2"])
        .initial(["q0"])
        .accepting(["q1"])
        .alphabet(["a", "b"])
        .quantifiers(exists(2))
        .transition("q0", ["a", "b"], "q2")
        .transition("q0", ["a", "b"], "q1")
        .build()
        .unwrap();
    assert!(
        RunManager::new(&nfh, SyncMode::Synchronous)
            .is_accepted(&words(&["a", "b"]))
            .unwrap()
    );
}

#[test]
fn synchronous_pads_shorter_tracks() {
    let nfh = NfhBuilder::new()
        .states(["q0", "q1", "q2"])
        .initial(["q0"])
        .accepting(["q2"])
        .alphabet(["a"])
        .quantifiers(exists(2))
        .transition("q0", ["a", "a"], "q1")
        .transition("q1", ["a", "#"], "q2")
        .build()
        .unwrap();
    let manager = RunManager::new(&nfh, SyncMode::Synchronous);

    let run = manager.accepting_run(&words(&["aa", "a"])).unwrap().unwrap();
    assert_eq!(run.steps(), 2);
    let letters: Vec<_> = run.transitions(&nfh).map(|t| t.letters.to_vec()).collect();
    assert_eq!(letters[1], vec![Letter::Sym(Symbol::new("a")), Letter::Pad]);
    assert_eq!(run.final_configuration().cursors.as_slice(), &[2, 1]);

    // Padding is not offered by a track that still has symbols.
    assert!(!manager.is_accepted(&words(&["aa", "aa"])).unwrap());
}

#[test]
fn synchronous_rejects_idling_a_live_track() {
    // Reads track 0 alone while track 1 still has a symbol.
    let nfh = NfhBuilder::new()
        .states(["q0", "q1"])
        .initial(["q0"])
        .accepting(["q1"])
        .alphabet(["a"])
        .quantifiers(exists(2))
        .transition("q0", ["a", "#"], "q0")
        .transition("q0", ["#", "a"], "q1")
        .build()
        .unwrap();

    let input = words(&["a", "a"]);
    assert!(
        !RunManager::new(&nfh, SyncMode::Synchronous)
            .is_accepted(&input)
            .unwrap()
    );
    assert!(
        RunManager::new(&nfh, SyncMode::Asynchronous)
            .is_accepted(&input)
            .unwrap()
    );
}

#[test]
fn trailing_padding_steps_are_allowed() {
    let nfh = NfhBuilder::new()
        .states(["q0", "q1"])
        .initial(["q0"])
        .accepting(["q1"])
        .alphabet(["a", "b", "c"])
        .quantifiers(exists(3))
        .transition("q0", ["a", "b", "c"], "q0")
        .transition("q0", ["#", "#", "#"], "q1")
        .build()
        .unwrap();
    let run = RunManager::new(&nfh, SyncMode::Synchronous)
        .accepting_run(&words(&["a", "b", "c"]))
        .unwrap()
        .unwrap();
    assert_eq!(run.steps(), 2);
    assert_eq!(run.configurations()[1].state, nfh.state_id("q0").unwrap());
    assert_eq!(run.final_configuration().state, nfh.state_id("q1").unwrap());
}

#[test]
fn k1_synchronous_matches_plain_automaton_acceptance() {
    let nfh = NfhBuilder::new()
        .states(["q0", "q1", "q2"])
        .initial(["q0"])
        .accepting(["q2"])
        .alphabet(["a", "b"])
        .quantifiers([Quantifier::ForAll])
        .transition("q0", ["a"], "q1")
        .transition("q1", ["b"], "q2")
        .build()
        .unwrap();
    let manager = RunManager::new(&nfh, SyncMode::Synchronous);
    assert!(manager.is_accepted(&words(&["ab"])).unwrap());
    assert!(!manager.is_accepted(&words(&["a"])).unwrap());
    assert!(!manager.is_accepted(&words(&["abb"])).unwrap());
    assert!(!manager.is_accepted(&words(&[""])).unwrap());
}

#[test]
fn empty_words_accept_only_through_initial_or_padding() {
    let plain = NfhBuilder::new()
        .states(["q0", "q1"])
        .initial(["q0"])
        .accepting(["q1"])
        .alphabet(["a"])
        .quantifiers(exists(2))
        .transition("q0", ["a", "a"], "q1")
        .build()
        .unwrap();
    let empty = words(&["", ""]);
    for mode in [SyncMode::Synchronous, SyncMode::Asynchronous] {
        assert!(!RunManager::new(&plain, mode).is_accepted(&empty).unwrap());
    }

    let padded = NfhBuilder::new()
        .states(["q0", "q1"])
        .initial(["q0"])
        .accepting(["q1"])
        .alphabet(["a"])
        .quantifiers(exists(2))
        .transition("q0", ["#", "#"], "q1")
        .build()
        .unwrap();
    for mode in [SyncMode::Synchronous, SyncMode::Asynchronous] {
        assert!(RunManager::new(&padded, mode).is_accepted(&empty).unwrap());
    }

    let initially_accepting = NfhBuilder::new()
        .states(["q0"])
        .initial(["q0"])
        .accepting(["q0"])
        .alphabet(["a"])
        .quantifiers(exists(1))
        .build()
        .unwrap();
    let run = RunManager::new(&initially_accepting, SyncMode::Asynchronous)
        .accepting_run(&words(&[""]))
        .unwrap()
        .unwrap();
    assert_eq!(run.steps(), 0);
}

#[test]
fn all_initial_states_are_explored() {
    let nfh = NfhBuilder::new()
        .states(["dead", "q0", "q1"])
        .initial(["dead", "q0"])
        .accepting(["q1"])
        .alphabet(["a"])
        .quantifiers(exists(1))
        .transition("q0", ["a"], "q1")
        .build()
        .unwrap();
    let run = RunManager::new(&nfh, SyncMode::Synchronous)
        .accepting_run(&words(&["a"]))
        .unwrap()
        .unwrap();
    assert_eq!(run.initial_configuration().state, nfh.state_id("q0").unwrap());
}

#[test]
fn idle_self_loops_terminate() {
    let nfh = NfhBuilder::new()
        .states(["q0", "q1", "q2"])
        .initial(["q0"])
        .accepting(["q2"])
        .alphabet(["a"])
        .quantifiers(exists(2))
        .transition("q0", ["#", "#"], "q0")
        .transition("q0", ["#", "#"], "q1")
        .transition("q1", ["#", "#"], "q0")
        .transition("q0", ["a", "#"], "q0")
        .build()
        .unwrap();

    for mode in [SyncMode::Synchronous, SyncMode::Asynchronous] {
        let outcome = RunManager::new(&nfh, mode)
            .search(&words(&["aaa", "a"]), &mut Unbounded)
            .unwrap();
        assert!(!outcome.is_accepted());
        // Bounded by |states| * (3 + 1) * (1 + 1) configurations.
        assert!(outcome.explored <= 3 * 4 * 2);
    }
}

#[test]
fn asynchronous_single_track_steps_interleave() {
    let nfh = NfhBuilder::new()
        .states(["q0", "q1"])
        .initial(["q0"])
        .accepting(["q1"])
        .alphabet(["a", "b"])
        .quantifiers(exists(2))
        .transition("q0", ["a", "#"], "q0")
        .transition("q0", ["#", "a"], "q0")
        .transition("q0", ["b", "b"], "q1")
        .build()
        .unwrap();
    let manager = RunManager::new(&nfh, SyncMode::Asynchronous);

    let run = manager
        .accepting_run(&words(&["ab", "ab"]))
        .unwrap()
        .expect("interleaving should succeed");
    assert_eq!(run.steps(), 3);
    assert_eq!(run.configurations()[2].cursors.as_slice(), &[1, 1]);
    assert_eq!(run.final_configuration().cursors.as_slice(), &[2, 2]);

    // Track 1 runs out before the joint `b` step.
    assert!(!manager.is_accepted(&words(&["ab", "a"])).unwrap());
    // Unbalanced prefixes are fine asynchronously.
    assert!(manager.is_accepted(&words(&["aaab", "ab"])).unwrap());
    assert!(
        !RunManager::new(&nfh, SyncMode::Synchronous)
            .is_accepted(&words(&["aaab", "ab"]))
            .unwrap()
    );
}

#[test]
fn asynchronous_multi_track_steps() {
    let nfh = NfhBuilder::new()
        .states(["q0", "q1"])
        .initial(["q0"])
        .accepting(["q1"])
        .alphabet(["a", "b"])
        .quantifiers(exists(3))
        .transition("q0", ["a", "a", "#"], "q0")
        .transition("q0", ["#", "#", "b"], "q1")
        .build()
        .unwrap();
    let manager = RunManager::new(&nfh, SyncMode::Asynchronous);
    assert!(manager.is_accepted(&words(&["aa", "aa", "b"])).unwrap());
    assert!(!manager.is_accepted(&words(&["aa", "a", "b"])).unwrap());
}

#[test]
fn asynchronous_runs_never_pass_word_ends() {
    let nfh = NfhBuilder::new()
        .states(["q0", "q1"])
        .initial(["q0"])
        .accepting(["q1"])
        .alphabet(["a", "b"])
        .quantifiers(exists(2))
        .transition("q0", ["a", "#"], "q0")
        .transition("q0", ["#", "b"], "q0")
        .transition("q0", ["#", "#"], "q1")
        .transition("q1", ["a", "b"], "q1")
        .build()
        .unwrap();
    let input = words(&["aaa", "bb"]);
    let run = RunManager::new(&nfh, SyncMode::Asynchronous)
        .accepting_run(&input)
        .unwrap()
        .unwrap();

    for (config, next) in run
        .configurations()
        .iter()
        .zip(run.configurations().iter().skip(1))
    {
        for track in 0..2 {
            assert!(config.cursors[track] as usize <= input[track].len());
            assert!(next.cursors[track] >= config.cursors[track]);
        }
    }
    for (transition, config) in run.transitions(&nfh).zip(run.configurations()) {
        for track in 0..2 {
            if config.cursors[track] as usize == input[track].len() {
                assert!(transition.letters[track].is_pad());
            }
        }
    }
}

#[test]
fn budget_interrupts_search() {
    let nfh = NfhBuilder::new()
        .states(["q0", "q1"])
        .initial(["q0"])
        .accepting(["q1"])
        .alphabet(["a"])
        .quantifiers(exists(1))
        .transition("q0", ["a"], "q0")
        .transition("q0", ["#"], "q1")
        .build()
        .unwrap();
    let manager = RunManager::new(&nfh, SyncMode::Synchronous);
    let long = words(&["aaaaaaaa"]);

    let err = manager.search(&long, &mut NodeBudget(3)).unwrap_err();
    assert_eq!(err, Error::SearchInterrupted { explored: 3 });

    let outcome = manager.search(&long, &mut NodeBudget(100)).unwrap();
    assert!(outcome.is_accepted());
    assert_eq!(outcome.explored, 10);
}

#[test]
fn run_listing_names_states() {
    let nfh = NfhBuilder::new()
        .states(["q0", "q1", "q2"])
        .initial(["q0"])
        .accepting(["q2"])
        .alphabet(["a", "b"])
        .quantifiers(exists(2))
        .transition("q0", ["a", "a"], "q1")
        .transition("q1", ["b", "#"], "q2")
        .build()
        .unwrap();
    let run = RunManager::new(&nfh, SyncMode::Synchronous)
        .accepting_run(&words(&["ab", "a"]))
        .unwrap()
        .unwrap();
    assert_eq!(
        run.fmt(&nfh).to_string(),
        "run (synchronous) on (ab, a):\n  step 1: q0 [0, 0] --(a, a)--> q1 [1, 1]\n  step 2: q1 [1, 1] --(b, #)--> q2 [2, 1]\nfinal: q2 [2, 1] (accepted)"
    );
}
