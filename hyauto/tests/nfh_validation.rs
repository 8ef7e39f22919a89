use hyauto::prelude::*;

fn two_track() -> NfhBuilder {
    NfhBuilder::new()
        .states(["q0", "q1"])
        .initial(["q0"])
        .accepting(["q1"])
        .alphabet(["a", "b"])
        .quantifiers([Quantifier::Exists, Quantifier::Exists])
}

fn malformation(result: HyResult<Nfh>) -> Malformation {
    match result {
        Err(Error::MalformedAutomaton(m)) => m,
        Err(other) => panic!("expected a malformed automaton, got {other}"),
        Ok(_) => panic!("expected construction to fail"),
    }
}

#[test]
fn well_formed_automaton_exposes_queries() {
    let nfh = two_track()
        .transition("q0", ["a", "b"], "q1")
        .transition("q0", ["#", "a"], "q0")
        .transition("q1", ["#", "#"], "q1")
        .build()
        .expect("automaton should be valid");

    assert_eq!(nfh.arity(), 2);
    assert_eq!(nfh.num_states(), 2);
    assert_eq!(nfh.states().collect::<Vec<_>>(), vec!["q0", "q1"]);

    let q0 = nfh.state_id("q0").unwrap();
    let q1 = nfh.state_id("q1").unwrap();
    assert!(nfh.is_initial(q0));
    assert!(!nfh.is_initial(q1));
    assert!(nfh.is_accepting(q1));
    assert!(!nfh.is_accepting(q0));
    assert_eq!(nfh.accepting_states().collect::<Vec<_>>(), vec![q1]);
    assert_eq!(nfh.quantifiers(), &[Quantifier::Exists, Quantifier::Exists]);

    let from_q0: Vec<_> = nfh.transitions_from(q0).collect();
    assert_eq!(from_q0.len(), 2);
    assert!(from_q0.iter().all(|t| t.source == q0));
    assert_eq!(from_q0[0].letters[0], Letter::Sym(Symbol::new("a")));
    assert!(from_q0[1].letters[0].is_pad());

    let from_q1: Vec<_> = nfh.transitions_from(q1).collect();
    assert_eq!(from_q1.len(), 1);
    assert!(from_q1[0].is_idle());
}

#[test]
fn duplicate_transitions_collapse() {
    let nfh = two_track()
        .transition("q0", ["a", "b"], "q1")
        .transition("q0", ["a", "b"], "q1")
        .build()
        .unwrap();
    assert_eq!(nfh.transitions().len(), 1);
}

#[test]
fn dangling_transition_state_is_rejected() {
    let err = malformation(two_track().transition("q0", ["a", "b"], "q7").build());
    assert_eq!(
        err,
        Malformation::UnknownTransitionTarget {
            index: 0,
            state: "q7".to_string()
        }
    );

    let err = malformation(two_track().transition("qx", ["a", "b"], "q1").build());
    assert!(err.is_unknown_transition_source());
}

#[test]
fn wrong_tuple_arity_is_rejected() {
    let err = malformation(
        two_track()
            .transition("q0", ["a", "b"], "q1")
            .transition("q0", ["a"], "q1")
            .build(),
    );
    assert_eq!(
        err,
        Malformation::TransitionArity {
            index: 1,
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn quantifier_prefix_must_match_arity() {
    let err = malformation(two_track().arity(3).build());
    assert_eq!(
        err,
        Malformation::QuantifierPrefixLength {
            expected: 3,
            found: 2
        }
    );
}

#[test]
fn symbol_outside_alphabet_is_rejected() {
    let err = malformation(two_track().transition("q0", ["a", "c"], "q1").build());
    assert_eq!(
        err,
        Malformation::SymbolOutsideAlphabet {
            index: 0,
            symbol: "c".to_string()
        }
    );
}

#[test]
fn padding_cannot_be_an_alphabet_symbol() {
    let err = malformation(two_track().alphabet(["#"]).build());
    assert!(err.is_padding_in_alphabet());
}

#[test]
fn empty_and_unknown_state_sets_are_rejected() {
    let err = malformation(
        NfhBuilder::new()
            .quantifiers([Quantifier::ForAll])
            .build(),
    );
    assert_eq!(err, Malformation::EmptyStateSet);

    let err = malformation(
        NfhBuilder::new()
            .states(["q0"])
            .accepting(["q0"])
            .quantifiers([Quantifier::ForAll])
            .build(),
    );
    assert_eq!(err, Malformation::NoInitialState);

    let err = malformation(
        NfhBuilder::new()
            .states(["q0"])
            .initial(["q0"])
            .quantifiers([Quantifier::ForAll])
            .build(),
    );
    assert_eq!(err, Malformation::NoAcceptingState);

    let err = malformation(two_track().initial(["q9"]).build());
    assert_eq!(err, Malformation::UnknownInitialState("q9".to_string()));

    let err = malformation(two_track().accepting(["q9"]).build());
    assert_eq!(err, Malformation::UnknownAcceptingState("q9".to_string()));

    let err = malformation(two_track().states(["q0"]).build());
    assert_eq!(err, Malformation::DuplicateState("q0".to_string()));
}

#[test]
fn zero_arity_is_rejected() {
    let err = malformation(NfhBuilder::new().states(["q0"]).initial(["q0"]).accepting(["q0"]).build());
    assert_eq!(err, Malformation::ZeroArity);
}

#[test]
fn explicit_constructor_matches_builder() {
    let nfh = Nfh::new(
        ["q0", "q1"],
        ["q0"],
        ["q1"],
        2,
        [("q0", vec![Letter::parse("a"), Letter::Pad], "q1")],
        [Quantifier::ForAll, Quantifier::Exists],
        ["a", "b"].map(Symbol::new),
    )
    .unwrap();
    assert_eq!(nfh.transitions().len(), 1);
    assert_eq!(
        nfh.fmt_transition(&nfh.transitions()[0]).to_string(),
        "q0 --(a, #)--> q1"
    );
}

#[test]
fn display_lists_definition_layout() {
    let nfh = two_track()
        .transition("q0", ["a", "#"], "q1")
        .build()
        .unwrap();
    let listing = nfh.to_string();
    assert_eq!(
        listing,
        "k: 2\nalpha: E E\nstates: q0 q1\ninitial: q0\naccepting: q1\nalphabet: a b\ndelta:\nq0 a # q1"
    );
}

#[test]
fn quantifiers_and_modes_parse_from_text() {
    assert_eq!("E".parse::<Quantifier>().unwrap(), Quantifier::Exists);
    assert_eq!("forall".parse::<Quantifier>().unwrap(), Quantifier::ForAll);
    assert!("X".parse::<Quantifier>().unwrap_err().is_invalid_quantifier());

    assert_eq!("async".parse::<SyncMode>().unwrap(), SyncMode::Asynchronous);
    assert_eq!("Synchronous".parse::<SyncMode>().unwrap(), SyncMode::Synchronous);
    assert!("lockstep".parse::<SyncMode>().unwrap_err().is_invalid_mode());
}
