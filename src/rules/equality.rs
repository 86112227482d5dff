use crate::*;

use super::{check_is_in, RuleContext};

/// The Equality rule: a rewrite by a cited equation, a restatement of the
/// hypothesis, a membership it supports, or unfolding a named definition.
pub(super) fn verify(ctx: &RuleContext<'_>, step: &Expr, hyp: &Hypothesis) -> Result<(), CheckError> {
    if let (Some((EqOp::Equal, sl, sr)), Some((EqOp::Equal, hl, hr))) =
        (step.as_equals(), hyp.expr.as_equals())
    {
        let m = &ctx.matcher;
        if rewrites_to(m, sl, sr, hl, hr) || rewrites_to(m, sl, sr, hr, hl) {
            return Ok(());
        }
        // The hypothesis may itself restate the step.
        if ctx.matches_scoped(step, &hyp.expr, MatchMode::TYPES) {
            return Ok(());
        }
        return match hyp.name {
            Some(name) if substitute(m, step, name, &hyp.expr) => Ok(()),
            _ => Err(CheckError::TransformationUnverified),
        };
    }

    if ctx.matches_scoped(unwrap_set(step), unwrap_set(&hyp.expr), MatchMode::TYPES) {
        return Ok(());
    }
    if step.as_is_in(ctx.types).is_some() {
        return if check_is_in(ctx, step, Some(&hyp.expr))? {
            Ok(())
        } else {
            Err(CheckError::NotAMember)
        };
    }
    if step.as_equals().is_some() {
        return match hyp.name {
            Some(name) if substitute(&ctx.matcher, step, name, &hyp.expr) => Ok(()),
            _ => Err(CheckError::SubstitutionFailed),
        };
    }
    Err(CheckError::Unsupported)
}
