use crate::*;

use super::RuleContext;

/// Generalization and instantiation: the step matches some sub-expression
/// of the hypothesis, and the bindings show the quantifier transition the
/// policy asks for.
pub(super) fn generalization(
    ctx: &RuleContext<'_>,
    step: &Expr,
    hyp: &Expr,
    policy: ScopePolicy,
) -> bool {
    let mut bindings = Bindings::new();
    if ctx
        .matcher
        .matches(step, hyp, MatchMode::TYPES, Some(&mut bindings))
        && validate(&bindings, policy)
    {
        return true;
    }
    hyp.children()
        .iter()
        .any(|sub| generalization(ctx, step, sub, policy))
}

/// Quantifier Distribution only re-tags: the hypothesis must match the step
/// as it stands.
pub(super) fn distribution(ctx: &RuleContext<'_>, step: &Expr, hyp: &Expr) -> bool {
    ctx.matches_scoped(hyp, step, MatchMode::STRUCTURAL)
}
