//! Quantifier normalization.
//!
//! Every `Quantified` node is removed and the occurrences of its bound
//! variables are tagged with the quantifier instead. A variable occurrence
//! is bound by a declaration only if both the name and the math type agree,
//! so two variables that share a name but not a type stay distinct.
//!
//! A where-clause is folded into the body: `forall x where W, B` becomes
//! `if W then B`, and `exists x where W, B` becomes `W and B`.
//!
//! The transformation is pure and idempotent.

use crate::*;

pub fn normalize(expr: Expr, types: &dyn TypeOracle) -> Expr {
    let Expr { kind, ty, span } = expr;
    match kind {
        ExprKind::Quantified {
            quantifier,
            vars,
            where_clause,
            body,
        } => {
            let inner = match where_clause {
                None => *body,
                Some(w) if quantifier == Quantifier::Forall => Expr::if_then(*w, *body),
                Some(w) => Expr::and(*w, *body),
            };
            let tagged = vars.iter().fold(inner, |e, decl| {
                tag_occurrences(e, decl, quantifier, types)
            });
            // Inner quantifiers are normalized after the outer tagging so
            // that a shadowing declaration wins.
            normalize(tagged, types).with_span(span)
        }
        kind => Expr { kind, ty, span }.map_children(&mut |c| normalize(c, types)),
    }
}

/// Marks every occurrence of `decl` in `expr` as locally bound and tagged
/// with `quantifier`. Set-builders that redeclare the same name are left alone.
pub(crate) fn tag_occurrences(
    mut expr: Expr,
    decl: &MathVarDecl,
    quantifier: Quantifier,
    types: &dyn TypeOracle,
) -> Expr {
    match &mut expr.kind {
        ExprKind::Var(v) => {
            if v.qualifier.is_none()
                && v.name == decl.name
                && types.math_matches(&expr.ty, &decl.ty)
            {
                v.quantifier = quantifier;
                v.is_local = true;
            }
            expr
        }
        ExprKind::SetBuilder { var, .. } if var.name == decl.name => expr,
        _ => expr.map_children(&mut |c| tag_occurrences(c, decl, quantifier, types)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nat() -> MathType {
        MathType::named("N")
    }

    fn x() -> Expr {
        Expr::var("x").with_type(nat())
    }

    fn tag_of(e: &Expr) -> Vec<(String, Quantifier, bool)> {
        let mut out = vec![];
        e.walk(
            &mut |e| {
                if let Some(v) = e.as_var() {
                    out.push((v.name.to_string(), v.quantifier, v.is_local));
                }
            },
            &mut |_| {},
        );
        out
    }

    #[test]
    fn quantified_nodes_become_tags() {
        let e = Expr::forall(
            [MathVarDecl::new("x", nat())],
            Expr::equals(Expr::infix("+", x(), Expr::int(0)), x()),
        );
        let n = normalize(e, &StructuralTypes);
        assert_eq!(n.to_string(), "((x + 0) = x)");
        assert_eq!(
            tag_of(&n),
            vec![
                ("x".into(), Quantifier::Forall, true),
                ("x".into(), Quantifier::Forall, true)
            ]
        );
    }

    #[test]
    fn same_name_different_type_is_not_bound() {
        let z = Expr::var("x").with_type(MathType::named("Z"));
        let e = Expr::exists([MathVarDecl::new("x", nat())], Expr::equals(x(), z));
        let n = normalize(e, &StructuralTypes);
        let tags = tag_of(&n);
        assert_eq!(tags[0].1, Quantifier::Exists);
        assert_eq!(tags[1].1, Quantifier::None);
        assert!(!tags[1].2);
    }

    #[test]
    fn inner_quantifier_shadows_outer() {
        let e = Expr::forall(
            [MathVarDecl::new("x", nat())],
            Expr::and(x(), Expr::exists([MathVarDecl::new("x", nat())], x())),
        );
        let n = normalize(e, &StructuralTypes);
        let tags: Vec<_> = tag_of(&n).into_iter().map(|t| t.1).collect();
        assert_eq!(tags, vec![Quantifier::Forall, Quantifier::Exists]);
    }

    #[test]
    fn where_clauses_fold_into_body() {
        let w = Expr::infix(">", x(), Expr::int(0)).with_type(MathType::boolean());
        let forall = Expr::quantified(
            Quantifier::Forall,
            [MathVarDecl::new("x", nat())],
            Some(w.clone()),
            Expr::var("P"),
        );
        assert_eq!(
            normalize(forall, &StructuralTypes).to_string(),
            "(if (x > 0) then P)"
        );
        let exists = Expr::quantified(
            Quantifier::Exists,
            [MathVarDecl::new("x", nat())],
            Some(w),
            Expr::var("P"),
        );
        assert_eq!(
            normalize(exists, &StructuralTypes).to_string(),
            "((x > 0) and P)"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let e = Expr::forall(
            [MathVarDecl::new("x", nat())],
            Expr::or(
                Expr::exists([MathVarDecl::new("y", nat())], Expr::equals(x(), Expr::var("y"))),
                Expr::not(Expr::equals(x(), Expr::int(0))),
            ),
        );
        let once = normalize(e, &StructuralTypes);
        let twice = normalize(once.clone(), &StructuralTypes);
        assert_eq!(once, twice);
    }
}
