//! Checking the deduction that closes a supposition block.
//!
//! A deduction `if T then C` is accepted when `T` is borne out by the
//! block's assumption and `C` was established inside the block, either
//! stated outright or reached through a chain of the block's equalities.

use crate::*;

pub(crate) fn verify(
    ctx: &RuleContext<'_>,
    history: &ProofLineHistory,
    expr: &Expr,
    config: &CheckerConfig,
) -> Result<(), CheckError> {
    let Some((test, then)) = expr.as_if() else {
        return Err(CheckError::DeductionUnverified);
    };
    let (start, supposition) = history
        .open_supposition()
        .ok_or(CheckError::UnmatchedDeduction)?;
    let assumption = supposition.assumption.as_ref();
    log::debug!("checking deduction {expr} against the block at line {start}");

    if !check_if_part(ctx, test, assumption)? {
        log::debug!("{test} does not follow from the assumption");
        return Err(CheckError::DeductionUnverified);
    }

    let facts = history.block_facts(start);
    let traced = match then.as_equals() {
        Some((EqOp::Equal, left, right)) if config.trace_deductions => {
            let equalities = facts
                .iter()
                .filter_map(|f| match f.as_equals() {
                    Some((EqOp::Equal, l, r)) => Some((l, r)),
                    _ => None,
                })
                .collect::<Vec<_>>();
            Tracer::new(ctx, &equalities, config.max_trace_depth).connects(left, right)
        }
        _ => false,
    };
    if traced || found_in_block(ctx, then, assumption, &facts) {
        Ok(())
    } else {
        Err(CheckError::DeductionUnverified)
    }
}

/// Decides the test of a deduction against the assumption.
///
/// Conjunctions need both parts and disjunctions either part. Negations
/// are pushed inward by De Morgan's laws before the remaining leaves are
/// looked up.
fn check_if_part(
    ctx: &RuleContext<'_>,
    e: &Expr,
    assumption: Option<&Expr>,
) -> Result<bool, CheckError> {
    let types = ctx.types;
    if e.as_is_in(types).is_some() {
        return check_is_in(ctx, e, assumption);
    }
    if let Some((l, r)) = e.as_and(types) {
        return Ok(check_if_part(ctx, l, assumption)? && check_if_part(ctx, r, assumption)?);
    }
    if let Some((l, r)) = e.as_or(types) {
        return Ok(check_if_part(ctx, l, assumption)? || check_if_part(ctx, r, assumption)?);
    }
    if let Some(inner) = e.as_not(types) {
        let negated = |x: &Expr| Expr::not(x.clone()).with_type(e.ty.clone());
        if let Some((l, r)) = inner.as_and(types) {
            return Ok(check_if_part(ctx, &negated(l), assumption)?
                || check_if_part(ctx, &negated(r), assumption)?);
        }
        if let Some((l, r)) = inner.as_or(types) {
            return Ok(check_if_part(ctx, &negated(l), assumption)?
                && check_if_part(ctx, &negated(r), assumption)?);
        }
        if let Some(x) = inner.as_not(types) {
            return check_if_part(ctx, x, assumption);
        }
    }
    Ok(find_in_contents(ctx, e, assumption))
}

fn found_in_block(
    ctx: &RuleContext<'_>,
    then: &Expr,
    assumption: Option<&Expr>,
    facts: &[&Expr],
) -> bool {
    facts
        .iter()
        .copied()
        .chain(assumption)
        .any(|fact| ctx.matches_scoped(then, fact, MatchMode::TYPES))
}

/// Follows chains of equalities from one side of a conclusion to the other.
struct Tracer<'a, 'c> {
    ctx: &'a RuleContext<'c>,
    equalities: &'a [(&'a Expr, &'a Expr)],
    max_depth: usize,
    /// Equalities already used, and in which direction.
    visited: HashSet<(usize, bool)>,
}

impl<'a, 'c> Tracer<'a, 'c> {
    fn new(
        ctx: &'a RuleContext<'c>,
        equalities: &'a [(&'a Expr, &'a Expr)],
        max_depth: usize,
    ) -> Self {
        Self {
            ctx,
            equalities,
            max_depth,
            visited: HashSet::default(),
        }
    }

    fn connects(mut self, left: &Expr, right: &Expr) -> bool {
        if self.reaches(right, left, 0) {
            return true;
        }
        self.visited.clear();
        self.reaches(left, right, 0)
    }

    fn reaches(&mut self, target: &Expr, current: &Expr, depth: usize) -> bool {
        let (ctx, equalities) = (self.ctx, self.equalities);
        if ctx.matches_scoped(current, target, MatchMode::TYPES) {
            return true;
        }
        let m = &ctx.matcher;
        // A single rewrite inside `current` by one of the equalities.
        if equalities.iter().any(|&(l, r)| {
            rewrites_to(m, current, target, l, r) || rewrites_to(m, current, target, r, l)
        }) {
            return true;
        }
        if depth >= self.max_depth {
            log::debug!("gave up tracing {current} to {target} at depth {depth}");
            return false;
        }
        for (i, &(l, r)) in equalities.iter().enumerate() {
            let next = if ctx.matches_scoped(l, current, MatchMode::TYPES) {
                Some((r, (i, true)))
            } else if ctx.matches_scoped(r, current, MatchMode::TYPES) {
                Some((l, (i, false)))
            } else {
                None
            };
            if let Some((next, key)) = next {
                if self.visited.insert(key) && self.reaches(target, next, depth + 1) {
                    return true;
                }
            }
        }
        false
    }
}
