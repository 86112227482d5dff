use crate::*;

use super::RuleContext;

/// One hypothesis is `if T then C` with `C` matching the step and `T`
/// matching the other hypothesis, under a single binding set.
pub(super) fn modus_ponens(ctx: &RuleContext<'_>, step: &Expr, a: &Expr, b: &Expr) -> bool {
    let apply = |conditional: &Expr, antecedent: &Expr| {
        let Some((test, then)) = conditional.as_if() else {
            return false;
        };
        let mut bindings = Bindings::new();
        ctx.matcher
            .matches(step, then, MatchMode::TYPES, Some(&mut bindings))
            && validate(&bindings, ScopePolicy::Compatible)
            && ctx
                .matcher
                .matches(antecedent, test, MatchMode::TYPES, Some(&mut bindings))
            && validate(&bindings, ScopePolicy::Compatible)
    };
    apply(a, b) || apply(b, a)
}

pub(super) fn and_rule(ctx: &RuleContext<'_>, step: &Expr, a: &Expr, b: &Expr) -> bool {
    let Some((left, right)) = step.as_and(ctx.types) else {
        return false;
    };
    let pairing = |first: &Expr, second: &Expr| {
        let mut bindings = Bindings::new();
        ctx.matcher
            .matches(left, first, MatchMode::TYPES, Some(&mut bindings))
            && ctx
                .matcher
                .matches(right, second, MatchMode::TYPES, Some(&mut bindings))
            && validate(&bindings, ScopePolicy::Compatible)
    };
    pairing(a, b) || pairing(b, a)
}

pub(super) fn or_rule(ctx: &RuleContext<'_>, step: &Expr, hyp: &Expr) -> bool {
    step.as_or(ctx.types).is_some_and(|(left, right)| {
        ctx.matches_scoped(left, hyp, MatchMode::TYPES)
            || ctx.matches_scoped(right, hyp, MatchMode::TYPES)
    })
}

pub(super) fn contradiction(
    ctx: &RuleContext<'_>,
    step: &Expr,
    a: &Expr,
    b: &Expr,
) -> Result<(), CheckError> {
    if !step.is_false() {
        return Err(CheckError::ContradictionNotFalse);
    }
    if ctx.are_logical_opposites(a, b) {
        Ok(())
    } else {
        Err(Rule::Contradiction.not_applied())
    }
}

/// The hypothesis is absurd on its face: `false`, an equality between
/// opposites, or a disequality between non-opposites.
pub(super) fn reductio(ctx: &RuleContext<'_>, hyp: &Expr) -> bool {
    match hyp.as_equals() {
        Some((EqOp::Equal, left, right)) => ctx.are_logical_opposites(left, right),
        Some((EqOp::NotEqual, left, right)) => !ctx.are_logical_opposites(left, right),
        None => hyp.is_false(),
    }
}

/// From `A or B` and the opposite of one disjunct, conclude the other.
pub(super) fn alternative_elimination(
    ctx: &RuleContext<'_>,
    step: &Expr,
    a: &Expr,
    b: &Expr,
) -> bool {
    let eliminate = |disjunction: &Expr, denial: &Expr| {
        let Some((left, right)) = disjunction.as_or(ctx.types) else {
            return false;
        };
        let remains = |clause: &Expr| ctx.matcher.matches(step, clause, MatchMode::STRICT, None);
        (ctx.are_logical_opposites(left, denial) && remains(right))
            || (ctx.are_logical_opposites(right, denial) && remains(left))
    };
    eliminate(a, b) || eliminate(b, a)
}

/// From `if A then C` and `if B then C`, conclude `if A or B then C`.
pub(super) fn common_conclusion(ctx: &RuleContext<'_>, step: &Expr, a: &Expr, b: &Expr) -> bool {
    let (Some((test1, then1)), Some((test2, then2))) = (a.as_if(), b.as_if()) else {
        return false;
    };
    let Some((step_test, step_then)) = step.as_if() else {
        return false;
    };
    let Some((left, right)) = step_test.as_or(ctx.types) else {
        return false;
    };

    // Each hypothesis carries its own binding set across then- and test-clause.
    let mut b1 = Bindings::new();
    let mut b2 = Bindings::new();
    let m = &ctx.matcher;
    let mode = MatchMode::STRUCTURAL;
    if !(m.matches(step_then, then1, mode, Some(&mut b1))
        && validate(&b1, ScopePolicy::Compatible)
        && m.matches(step_then, then2, mode, Some(&mut b2))
        && validate(&b2, ScopePolicy::Compatible))
    {
        return false;
    }

    let extends = |candidate: &Expr, pattern: &Expr, bindings: &Bindings| {
        let mut bindings = bindings.clone();
        m.matches(candidate, pattern, mode, Some(&mut bindings))
            && validate(&bindings, ScopePolicy::Compatible)
    };
    // Whichever disjunct a test lines up with, it is checked against the
    // bindings of its own hypothesis.
    (extends(left, test1, &b1) && extends(right, test2, &b2))
        || (extends(left, test2, &b2) && extends(right, test1, &b1))
}

/// Excluded Middle takes no hypothesis: the step itself pairs a statement
/// with its opposite.
pub(super) fn excluded_middle(ctx: &RuleContext<'_>, step: &Expr) -> bool {
    step.as_and(ctx.types)
        .is_some_and(|(left, right)| ctx.are_logical_opposites(left, right))
}

/// The step matches a conjunct of the hypothesis, at any depth.
pub(super) fn conjunct_elimination(ctx: &RuleContext<'_>, step: &Expr, hyp: &Expr) -> bool {
    if let Some((left, right)) = hyp.as_and(ctx.types) {
        if ctx.matches_scoped(step, left, MatchMode::STRUCTURAL)
            || ctx.matches_scoped(step, right, MatchMode::STRUCTURAL)
        {
            return true;
        }
    }
    hyp.children()
        .iter()
        .any(|sub| conjunct_elimination(ctx, step, sub))
}
