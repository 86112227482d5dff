//! Definition of There Exists Unique.
//!
//! `unique u, P(u)` is interchangeable with the conjunction of
//! `exists x, P(x)` and `if P(y) and P(z) then y = z`, in either order.

use crate::*;

use super::RuleContext;

pub(super) fn verify(ctx: &RuleContext<'_>, step: &Expr, hyp: &Expr) -> Result<(), CheckError> {
    if unfolded_as(ctx, step, hyp)? || unfolded_as(ctx, hyp, step)? {
        Ok(())
    } else {
        Err(Rule::ThereExistsUnique.not_applied())
    }
}

/// `statement` quantifies a single unique variable and `conjunction` is its
/// unfolding.
fn unfolded_as(ctx: &RuleContext<'_>, statement: &Expr, conjunction: &Expr) -> Result<bool, CheckError> {
    let Some(u) = find_quantified_var(statement, Quantifier::Unique)? else {
        return Ok(false);
    };
    let Some((left, right)) = conjunction.as_and(ctx.types) else {
        return Ok(false);
    };
    Ok(unfolds(ctx, statement, u, left, right) || unfolds(ctx, statement, u, right, left))
}

/// The one variable name tagged with `quantifier` in `e`.
fn find_quantified_var(e: &Expr, quantifier: Quantifier) -> Result<Option<Symbol>, CheckError> {
    let mut names = HashSet::default();
    e.walk(
        &mut |e| {
            if let Some(v) = e.as_var() {
                if v.quantifier == quantifier {
                    names.insert(v.name);
                }
            }
        },
        &mut |_| {},
    );
    if names.len() > 1 {
        return Err(CheckError::MultipleQuantified(quantifier));
    }
    Ok(names.into_iter().next())
}

fn unfolds(
    ctx: &RuleContext<'_>,
    statement: &Expr,
    u: Symbol,
    existence: &Expr,
    uniqueness: &Expr,
) -> bool {
    if tagged_bindings(ctx, statement, existence, Quantifier::Exists).is_none() {
        return false;
    }
    let Some((test, then)) = uniqueness.as_if() else {
        return false;
    };
    let Some((first, second)) = test.as_and(ctx.types) else {
        return false;
    };
    let Some((EqOp::Equal, y, z)) = then.as_equals() else {
        return false;
    };
    let (Some(b1), Some(b2)) = (
        tagged_bindings(ctx, statement, first, Quantifier::Forall),
        tagged_bindings(ctx, statement, second, Quantifier::Forall),
    ) else {
        return false;
    };
    let stands_for_u = |bindings: &Bindings, side: &Expr| {
        side.as_var()
            .and_then(|v| bindings.lookup(v.name))
            .and_then(Expr::as_var)
            .is_some_and(|v| v.name == u)
    };
    (stands_for_u(&b1, y) && stands_for_u(&b2, z)) || (stands_for_u(&b1, z) && stands_for_u(&b2, y))
}

/// Matches `statement` against `pattern`, binding variables to variables
/// only. Every unique variable of `statement` must be picked up by a
/// variable bound with `bound`.
fn tagged_bindings(
    ctx: &RuleContext<'_>,
    statement: &Expr,
    pattern: &Expr,
    bound: Quantifier,
) -> Option<Bindings> {
    let mut bindings = Bindings::new();
    if !ctx
        .matcher
        .matches(statement, pattern, MatchMode::STRUCTURAL, Some(&mut bindings))
    {
        return None;
    }
    let ok = bindings.iter().all(|b| {
        b.expr
            .as_var()
            .is_some_and(|v| v.quantifier != Quantifier::Unique || b.var.quantifier == bound)
    });
    ok.then_some(bindings)
}
