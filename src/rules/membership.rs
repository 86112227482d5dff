//! Deciding `x is_in S` from the library's types and the facts at hand.

use crate::*;

use super::RuleContext;

/// Decides the membership `e`, which must be an `is_in` expression.
///
/// `contents` is what may be searched for explicit evidence: the cited
/// hypothesis, or the assumption of the open supposition.
pub(crate) fn check_is_in(
    ctx: &RuleContext<'_>,
    e: &Expr,
    contents: Option<&Expr>,
) -> Result<bool, CheckError> {
    let Some((element, set)) = e.as_is_in(ctx.types) else {
        return Ok(false);
    };
    match &set.kind {
        ExprKind::Var(v) => {
            let fact = match ctx.resolver.locate_math_type(v.qualifier, v.name) {
                Ok(fact) => fact,
                Err(err) => {
                    log::debug!("{err}, searching for {e} instead");
                    return Ok(find_in_contents(ctx, e, contents));
                }
            };
            if !ctx.types.math_matches(&element.ty, &fact.ty) {
                return Ok(find_in_contents(ctx, e, contents));
            }
            let Some(obligation) = prepared_obligation(ctx, fact) else {
                return Ok(true);
            };
            if own_obligation_matches(ctx, &element.ty, &obligation) {
                return Ok(true);
            }
            let contents = contents.ok_or(CheckError::ReferenceNotFound)?;
            Ok(match &fact.exemplar {
                Some(exemplar) => satisfies(ctx, element, exemplar, &obligation, contents),
                None => find_in_contents(ctx, &obligation, Some(contents)),
            })
        }
        ExprKind::SetBuilder { var, body, .. } => {
            let contents = contents.ok_or(CheckError::ReferenceNotFound)?;
            let body = tag_occurrences((**body).clone(), var, Quantifier::None, ctx.types);
            Ok(satisfies(ctx, element, var, &body, contents))
        }
        _ => Err(CheckError::UnresolvableSet),
    }
}

/// Searches `contents` and all of its sub-expressions for `e`.
pub(crate) fn find_in_contents(ctx: &RuleContext<'_>, e: &Expr, contents: Option<&Expr>) -> bool {
    fn go(ctx: &RuleContext<'_>, e: &Expr, contents: &Expr) -> bool {
        ctx.matches_scoped(e, contents, MatchMode::TYPES)
            || contents.children().iter().any(|sub| go(ctx, e, sub))
    }
    contents.is_some_and(|contents| go(ctx, e, contents))
}

/// A type's obligation, normalized, with its exemplar marked as a local
/// variable so it can be bound.
fn prepared_obligation(ctx: &RuleContext<'_>, fact: &TypeFact) -> Option<Expr> {
    let obligation = normalize(fact.obligation.clone()?, ctx.types);
    Some(match &fact.exemplar {
        Some(exemplar) => tag_occurrences(obligation, exemplar, Quantifier::None, ctx.types),
        None => obligation,
    })
}

/// The element's own type already carries an equivalent obligation.
fn own_obligation_matches(ctx: &RuleContext<'_>, ty: &MathType, obligation: &Expr) -> bool {
    let MathType::Named { qualifier, name } = ty else {
        return false;
    };
    let Ok(own) = ctx.resolver.locate_math_type(*qualifier, *name) else {
        return false;
    };
    prepared_obligation(ctx, own)
        .is_some_and(|own| ctx.matches_scoped(&own, obligation, MatchMode::STRUCTURAL))
}

/// Some part of `contents` states `body` with `var` standing for `element`.
fn satisfies(
    ctx: &RuleContext<'_>,
    element: &Expr,
    var: &MathVarDecl,
    body: &Expr,
    contents: &Expr,
) -> bool {
    let seed = VarExpr {
        qualifier: None,
        name: var.name,
        quantifier: Quantifier::None,
        is_local: true,
    };
    let mut bindings = Bindings::seeded(seed, var.ty.clone(), element.clone());
    if ctx
        .matcher
        .matches(contents, body, MatchMode::STRICT, Some(&mut bindings))
        && validate(&bindings, ScopePolicy::Compatible)
    {
        return true;
    }
    contents
        .children()
        .iter()
        .any(|sub| satisfies(ctx, element, var, body, sub))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z() -> MathType {
        MathType::named("Z")
    }

    fn even_library() -> Library {
        let e = Expr::var("e").with_type(z());
        let k = Expr::var("k").with_type(z());
        let mut lib = Library::new();
        lib.add_type(
            None,
            "Even",
            TypeFact {
                ty: z(),
                exemplar: Some(MathVarDecl::new("e", z())),
                obligation: Some(Expr::exists(
                    [MathVarDecl::new("k", z())],
                    Expr::equals(e, Expr::infix("*", Expr::int(2), k)),
                )),
            },
        );
        lib
    }

    fn ctx(lib: &Library) -> RuleContext<'_> {
        RuleContext {
            matcher: Matcher::new(&StructuralTypes),
            types: &StructuralTypes,
            resolver: lib,
        }
    }

    fn even() -> Expr {
        Expr::var("Even").with_type(MathType::set_of(z()))
    }

    #[test]
    fn obligation_is_met_by_the_contents() {
        let lib = even_library();
        let ctx = ctx(&lib);
        let x = Expr::local_var("x").with_type(z());
        let claim = Expr::is_in(x.clone(), even());
        let witness = normalize(
            Expr::exists(
                [MathVarDecl::new("m", z())],
                Expr::equals(
                    x.clone(),
                    Expr::infix("*", Expr::int(2), Expr::var("m").with_type(z())),
                ),
            ),
            &StructuralTypes,
        );
        assert_eq!(check_is_in(&ctx, &claim, Some(&witness)), Ok(true));

        let unrelated = Expr::equals(x, Expr::int(3));
        assert_eq!(check_is_in(&ctx, &claim, Some(&unrelated)), Ok(false));
        assert_eq!(
            check_is_in(&ctx, &claim, None),
            Err(CheckError::ReferenceNotFound)
        );
    }

    #[test]
    fn unknown_types_fall_back_to_explicit_membership() {
        let lib = Library::new();
        let ctx = ctx(&lib);
        let claim = Expr::is_in(Expr::var("a"), Expr::var("S"));
        let contents = Expr::and(Expr::var("P"), claim.clone());
        assert_eq!(check_is_in(&ctx, &claim, Some(&contents)), Ok(true));
        assert_eq!(check_is_in(&ctx, &claim, Some(&Expr::var("P"))), Ok(false));
    }

    #[test]
    fn set_builder_membership_binds_the_element() {
        let lib = Library::new();
        let ctx = ctx(&lib);
        let set = Expr::set_builder(
            MathVarDecl::new("y", z()),
            None,
            Expr::infix(">", Expr::var("y").with_type(z()), Expr::int(0))
                .with_type(MathType::boolean()),
        );
        let a = Expr::var("a").with_type(z());
        let claim = Expr::is_in(a.clone(), set);
        let fact = Expr::infix(">", a, Expr::int(0)).with_type(MathType::boolean());
        assert_eq!(check_is_in(&ctx, &claim, Some(&fact)), Ok(true));
        let other = Expr::infix(">", Expr::var("b").with_type(z()), Expr::int(0));
        assert_eq!(check_is_in(&ctx, &claim, Some(&other)), Ok(false));
    }

    #[test]
    fn other_sets_cannot_be_resolved() {
        let lib = Library::new();
        let ctx = ctx(&lib);
        let claim = Expr::is_in(Expr::var("a"), Expr::call("f", [Expr::var("b")]));
        assert_eq!(
            check_is_in(&ctx, &claim, Some(&Expr::var("P"))),
            Err(CheckError::UnresolvableSet)
        );
    }
}
