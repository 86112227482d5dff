//! Equational rewriting used by the Equality rule and deduction tracing.

use crate::*;

/// Decides whether `rhs` is `lhs` with one sub-expression rewritten by the
/// equation `pattern_lhs = pattern_rhs`.
///
/// The rewrite position is found by descending through both sides in
/// parallel. At each level every sibling outside the descent path must be
/// strictly equal on both sides.
pub(crate) fn rewrites_to(
    m: &Matcher<'_>,
    lhs: &Expr,
    rhs: &Expr,
    pattern_lhs: &Expr,
    pattern_rhs: &Expr,
) -> bool {
    let mut bindings = Bindings::new();
    if m.matches(lhs, pattern_lhs, MatchMode::TYPES, Some(&mut bindings))
        && validate(&bindings, ScopePolicy::Compatible)
    {
        let frame = RhsFrame { lhs, pattern_lhs };
        if m.matches_rhs(rhs, pattern_rhs, frame, MatchMode::TYPES, Some(&mut bindings))
            && validate(&bindings, ScopePolicy::Compatible)
        {
            log::trace!("rewrite {lhs} ~> {rhs} by {pattern_lhs} = {pattern_rhs}");
            return true;
        }
    }

    if !lhs.shallow_eq(rhs) {
        return false;
    }
    let (ls, rs) = (lhs.children(), rhs.children());
    if ls.len() != rs.len() {
        return false;
    }
    (0..ls.len()).any(|i| {
        let rest_agree = ls
            .iter()
            .zip(rs.iter())
            .enumerate()
            .all(|(j, (l, r))| j == i || m.matches(l, r, MatchMode::STRICT, None));
        rest_agree && rewrites_to(m, ls[i], rs[i], pattern_lhs, pattern_rhs)
    })
}

/// Aligns the two sides of `step` node for node. Wherever they diverge, one
/// side must be the variable `name` and the other side must strictly match
/// `replacement`.
pub(crate) fn substitute(m: &Matcher<'_>, step: &Expr, name: Symbol, replacement: &Expr) -> bool {
    let Some((_, left, right)) = step.as_equals() else {
        return false;
    };
    let var = VarExpr {
        qualifier: None,
        name,
        quantifier: Quantifier::None,
        is_local: false,
    };
    let bindings = Bindings::seeded(var, replacement.ty.clone(), replacement.clone());
    let res = aligned(m, left, right, &bindings);
    log::trace!("substitute {name} := {replacement} in {step}: {res}");
    res
}

fn aligned(m: &Matcher<'_>, left: &Expr, right: &Expr, bindings: &Bindings) -> bool {
    if left.shallow_eq(right) {
        let (ls, rs) = (left.children(), right.children());
        if ls.len() == rs.len() {
            return ls
                .iter()
                .zip(rs.iter())
                .all(|(l, r)| aligned(m, l, r, bindings));
        }
    }
    let surrogate = |side: &Expr| side.as_var().and_then(|v| bindings.lookup(v.name)).cloned();
    match (surrogate(left), surrogate(right)) {
        (Some(s), _) if m.matches(right, &s, MatchMode::STRICT, None) => true,
        (_, Some(s)) => m.matches(left, &s, MatchMode::STRICT, None),
        _ => false,
    }
}

/// Strips set-builder wrappers, returning the innermost body.
pub(crate) fn unwrap_set(mut e: &Expr) -> &Expr {
    while let ExprKind::SetBuilder { body, .. } = &e.kind {
        e = &**body;
    }
    e
}
