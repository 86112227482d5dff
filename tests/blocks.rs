#[macro_use]
mod common;

use common::*;
use proofcheck::*;

fn q_by_modus_ponens(label: &str) -> ProofStep {
    ProofStep::justified(
        label,
        var!(Q),
        by("ModusPonens", &[theorem("P_Implies_Q"), HypDesig::Supposition]),
    )
}

fn p_implies_q() -> Library {
    library_with(&[("P_Implies_Q", Expr::if_then(var!(P), var!(Q)))])
}

#[test]
fn deduction_closes_its_block() {
    let library = p_implies_q();
    let mut checker = checker(&library);
    let report = checker.check_proof(&[ProofStep::block(
        var!(P),
        vec![q_by_modus_ponens("L1")],
        Expr::if_then(var!(P), var!(Q)),
    )]);
    assert!(report.is_success(), "{report}");
    assert_eq!(report.lines_verified, 2);

    let report = checker.check_proof(&[ProofStep::block(
        var!(P),
        vec![q_by_modus_ponens("L1")],
        Expr::if_then(var!(P), var!(R)),
    )]);
    assert_eq!(report.lines_verified, 1);
    assert_eq!(report.lines_failed, 1);
    assert_eq!(
        errors(&checker).last().map(String::as_str),
        Some("Could not verify deduction from supposition and intervening statements.")
    );
}

#[test]
fn inner_blocks_close_first() {
    let library = library_with(&[("R_Implies_S", Expr::if_then(var!(R), var!(S)))]);
    let mut checker = checker(&library);
    let inner = ProofStep::block(
        var!(R),
        vec![ProofStep::justified(
            "L1",
            var!(S),
            by("ModusPonens", &[theorem("R_Implies_S"), HypDesig::Supposition]),
        )],
        Expr::if_then(var!(R), var!(S)),
    );
    let report = checker.check_proof(&[ProofStep::block(
        var!(P),
        vec![inner],
        Expr::if_then(var!(P), Expr::if_then(var!(R), var!(S))),
    )]);
    assert!(report.is_success(), "{report}");
    assert_eq!(report.lines_verified, 3);
}

#[test]
fn inner_lines_do_not_leak_into_the_outer_block() {
    let library = library_with(&[("R_Implies_S", Expr::if_then(var!(R), var!(S)))]);
    let mut checker = checker(&library);
    let inner = ProofStep::block(
        var!(R),
        vec![ProofStep::justified(
            "L1",
            var!(S),
            by("ModusPonens", &[theorem("R_Implies_S"), HypDesig::Supposition]),
        )],
        Expr::if_then(var!(R), var!(S)),
    );
    let report = checker.check_proof(&[ProofStep::block(
        var!(P),
        vec![inner],
        Expr::if_then(var!(P), var!(S)),
    )]);
    assert_eq!(report.lines_failed, 1);
}

#[test]
fn deductions_need_an_open_supposition() {
    let library = Library::new();
    let mut checker = checker(&library);
    let report = checker.check_proof(&[ProofStep::deduce(Expr::if_then(var!(P), var!(Q)))]);
    assert_eq!(
        errors(&checker),
        ["Deduction does not match any open supposition."]
    );
    assert_eq!(report.lines_failed, 1);
}

#[test]
fn equalities_in_a_block_are_traced() {
    let library = library_with(&[
        ("A_Is_B", Expr::equals(var!(a), var!(b))),
        ("C_Is_B", Expr::equals(var!(c), var!(b))),
    ]);
    let mut checker = checker(&library);
    let report = checker.check_proof(&[ProofStep::block(
        var!(P),
        vec![
            ProofStep::justified(
                "L1",
                Expr::equals(var!(a), var!(b)),
                by("Equality", &[theorem("A_Is_B")]),
            ),
            ProofStep::justified(
                "L2",
                Expr::equals(var!(c), var!(b)),
                by("Equality", &[theorem("C_Is_B")]),
            ),
        ],
        Expr::if_then(var!(P), Expr::equals(var!(a), var!(c))),
    )]);
    assert!(report.is_success(), "{report}");

    let mut untraced = checker.with_config(CheckerConfig {
        trace_deductions: false,
        ..Default::default()
    });
    let report = untraced.check_proof(&[ProofStep::block(
        var!(P),
        vec![ProofStep::justified(
            "L1",
            Expr::equals(var!(a), var!(b)),
            by("Equality", &[theorem("A_Is_B")]),
        )],
        Expr::if_then(var!(P), Expr::equals(var!(b), var!(a))),
    )]);
    assert_eq!(report.lines_failed, 1, "{report}");
}

#[test]
fn the_previous_line_is_implied() {
    let library = p_implies_q();
    let mut checker = checker(&library);
    assert!(checker.check_step(&ProofStep::suppose(var!(P))));
    assert!(checker.check_step(&ProofStep::justified(
        "L1",
        var!(Q),
        by("ModusPonens", &[theorem("P_Implies_Q")]),
    )));
}

#[test]
fn failed_lines_stay_citable_unless_configured_otherwise() {
    let library = Library::new();
    let steps = [
        ProofStep::justified("L1", var!(Q), by("ModusPonens", &[])),
        ProofStep::justified("L2", var!(Q), by("Equality", &[line("L1")])),
    ];

    let mut lenient = checker(&library);
    let report = lenient.check_proof(&steps);
    assert_eq!((report.lines_verified, report.lines_failed), (1, 1));
    assert_eq!(lenient.history().len(), 2);

    let mut strict = checker(&library).with_config(CheckerConfig {
        keep_failed_lines: false,
        ..Default::default()
    });
    let report = strict.check_proof(&steps);
    assert_eq!(report.lines_failed, 2);
    assert_eq!(
        errors(&strict),
        [
            "Improper number of hypothesis designators.",
            "Could not find a line by the identifier L1 above the current line.",
        ]
    );
    assert!(strict.history().is_empty());
}

#[test]
fn one_line_reports_resolution_errors_once() {
    let library = Library::new();
    let mut checker = checker(&library);
    let report = checker.check_proof(&[ProofStep::justified(
        "L1",
        var!(Q),
        by("ModusPonens", &[line("L8"), line("L9")]),
    )]);
    assert_eq!(report.diagnostics, 2);
    assert_eq!(
        errors(&checker),
        [
            "Could not find a line by the identifier L8 above the current line.",
            "Could not find a line by the identifier L9 above the current line.",
        ]
    );
}

#[test]
fn goals_and_definitions_in_the_history() {
    let library = Library::new();
    let mut checker = checker(&library);
    let double = LocalDefinition {
        label: None,
        name: "Double".into(),
        body: Some(Expr::infix("*", Expr::int(2), var!(a))),
        base_case: None,
        span: DUMMY_SPAN.clone(),
    };
    let report = checker.check_proof(&[
        ProofStep::Goal(Goal {
            label: Some("G".into()),
            expr: var!(Q),
        }),
        ProofStep::Definition(double),
        ProofStep::justified(
            "L1",
            Expr::equals(
                Expr::call("f", [var!(Double)]),
                Expr::call("f", [Expr::infix("*", Expr::int(2), var!(a))]),
            ),
            by("Equality", &[line("Double")]),
        ),
        ProofStep::justified("L2", var!(Q), by("Equality", &[line("G")])),
    ]);
    assert_eq!(report.lines_verified, 1, "{report}");
    assert_eq!(
        errors(&checker),
        ["Cannot reference a goal as a justification."]
    );
}

#[test]
fn self_reference_states_memberships() {
    let library = Library::new();
    let mut checker = checker(&library);
    let report = checker.check_proof(&[
        ProofStep::justified(
            "L1",
            Expr::forall(
                [MathVarDecl::new("x", nat())],
                Expr::is_in(var!(x: N), var!(N)),
            ),
            by("Equality", &[HypDesig::SelfRef]),
        ),
        ProofStep::justified("L2", var!(P), by("Equality", &[HypDesig::SelfRef])),
    ]);
    assert_eq!(report.lines_verified, 1, "{report}");
    assert_eq!(errors(&checker), ["A reference could not be located."]);
}

#[test]
fn report_summarizes_the_unit() {
    let library = p_implies_q();
    let mut checker = checker(&library);
    let report = checker.check_proof(&[
        ProofStep::suppose(var!(P)),
        q_by_modus_ponens("L1"),
        ProofStep::justified(
            "L2",
            var!(R),
            by("ModusPonens", &[theorem("P_Implies_Q"), HypDesig::Supposition]),
        ),
        ProofStep::deduce(Expr::if_then(var!(P), var!(Q))),
    ]);
    assert_eq!(
        report.to_string(),
        "Checked 3 lines: 2 verified, 1 failed, 1 diagnostics\n  Modus Ponens: 1 failed\n"
    );

    // A new unit starts from an empty history.
    let report = checker.check_proof(&[ProofStep::justified(
        "L3",
        var!(Q),
        by("Equality", &[line("L1")]),
    )]);
    assert_eq!(report.lines_failed, 1);
}
