//! Turning hypothesis designators into the facts they name.

use crate::*;

/// A resolved hypothesis, normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Hypothesis {
    pub expr: Expr,
    /// The name the fact goes by, used by the Equality rule to substitute a
    /// definition for its name.
    pub name: Option<Symbol>,
}

impl Hypothesis {
    fn new(expr: Expr, name: Option<Symbol>) -> Self {
        Self { expr, name }
    }
}

/// Resolves everything but self references, which need the line itself.
pub(crate) fn resolve_designator(
    designator: &HypDesig,
    history: &ProofLineHistory,
    resolver: &dyn SymbolResolver,
    types: &dyn TypeOracle,
) -> Result<Hypothesis, CheckError> {
    match designator {
        HypDesig::Line(label) => {
            let entry = history
                .find_labeled(*label)
                .ok_or(CheckError::LineNotFound(*label))?;
            let expr = entry
                .unwrap_expr()?
                .ok_or(CheckError::ReferenceNotFound)?;
            let name = match entry {
                HistoryEntry::Definition(d) => d.name,
                _ => *label,
            };
            Ok(Hypothesis::new(expr.clone(), Some(name)))
        }
        HypDesig::Supposition => history
            .open_supposition()
            .and_then(|(_, s)| s.assumption.clone())
            .map(|e| Hypothesis::new(e, None))
            .ok_or(CheckError::ReferenceNotFound),
        HypDesig::Deduction => history
            .most_recent_deduction()
            .map(|d| Hypothesis::new(d.expr.clone(), None))
            .ok_or(CheckError::ReferenceNotFound),
        HypDesig::Theorem { kind, name } => {
            let fact = resolver
                .locate_theorem(*name)
                .ok()
                .filter(|fact| fact.kind == *kind)
                .ok_or(CheckError::TheoremNotFound(*name))?;
            let expr = normalize(fact.statement.clone(), types);
            Ok(Hypothesis::new(expr, Some(*name)))
        }
        HypDesig::Definition {
            qualifier,
            name,
            index,
        } => {
            let fact = resolver
                .locate_definition(*qualifier, *name)
                .map_err(|err| {
                    log::debug!("{err}");
                    CheckError::ReferenceNotFound
                })?;
            let expr = match index {
                Some(index) => {
                    let base_case = fact.base_case.as_ref().ok_or(CheckError::NotInductive)?;
                    if index.as_str() == "i" {
                        Some(base_case)
                    } else {
                        fact.body.as_ref()
                    }
                }
                None => fact.body.as_ref(),
            }
            .ok_or(CheckError::SingleInductiveCase)?;
            Ok(Hypothesis::new(
                normalize(expr.clone(), types),
                Some(*name),
            ))
        }
        HypDesig::SelfRef => Err(CheckError::ReferenceNotFound),
    }
}

/// The membership facts a quantified line states about its own variables:
/// `forall x: N, exists S: Set(N), ...` yields `x is_in N and S is_in Set(N)`.
pub(crate) fn self_reference(expr: &Expr) -> Option<Expr> {
    if !matches!(expr.kind, ExprKind::Quantified { .. }) {
        return None;
    }
    let mut decls = vec![];
    expr.walk(
        &mut |e| match &e.kind {
            ExprKind::Quantified { vars, .. } => decls.extend(vars.iter().cloned()),
            ExprKind::SetBuilder { var, .. } => decls.push(var.clone()),
            _ => {}
        },
        &mut |_| {},
    );
    let memberships = decls
        .iter()
        .map(membership)
        .collect::<Option<Vec<_>>>()?;
    memberships
        .into_iter()
        .rev()
        .reduce(|rest, m| Expr::and(m, rest))
        .map(|e| e.with_span(expr.span.clone()))
}

fn membership(decl: &MathVarDecl) -> Option<Expr> {
    let MathType::Named { qualifier, name } = &decl.ty else {
        return None;
    };
    let element = Expr::var(decl.name).with_type(decl.ty.clone());
    let set = Expr::new(ExprKind::Var(VarExpr {
        qualifier: *qualifier,
        name: *name,
        quantifier: Quantifier::None,
        is_local: false,
    }))
    .with_type(MathType::set_of(decl.ty.clone()));
    Some(Expr::is_in(element, set))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nat() -> MathType {
        MathType::named("N")
    }

    #[test]
    fn self_reference_chains_memberships() {
        let e = Expr::forall(
            [MathVarDecl::new("x", nat()), MathVarDecl::new("y", nat())],
            Expr::exists(
                [MathVarDecl::new("z", MathType::named("Z"))],
                Expr::var("P"),
            ),
        );
        let m = self_reference(&e).unwrap();
        assert_eq!(
            m.to_string(),
            "((x is_in N) and ((y is_in N) and (z is_in Z)))"
        );
        assert!(self_reference(&Expr::var("P")).is_none());
    }

    #[test]
    fn self_reference_needs_named_types() {
        let e = Expr::forall(
            [MathVarDecl::new("f", MathType::set_of(nat()))],
            Expr::var("P"),
        );
        assert!(self_reference(&e).is_none());
    }

    #[test]
    fn definitions_select_their_case() {
        let mut lib = Library::new();
        lib.add_definition(
            None,
            "fact",
            DefinitionFact {
                body: None,
                base_case: Some(Expr::var("base")),
            },
        );
        lib.add_definition(
            None,
            "double",
            DefinitionFact {
                body: Some(Expr::var("body")),
                base_case: None,
            },
        );
        let history = ProofLineHistory::new();
        let resolve = |d: HypDesig| resolve_designator(&d, &history, &lib, &StructuralTypes);

        let base = HypDesig::Definition {
            qualifier: None,
            name: "fact".into(),
            index: Some("i".into()),
        };
        assert_eq!(resolve(base).unwrap().expr, Expr::var("base"));
        assert_eq!(
            resolve(HypDesig::definition("fact")),
            Err(CheckError::SingleInductiveCase)
        );
        let indexed = HypDesig::Definition {
            qualifier: None,
            name: "double".into(),
            index: Some("i".into()),
        };
        assert_eq!(resolve(indexed), Err(CheckError::NotInductive));
        assert_eq!(
            resolve(HypDesig::line("L7")),
            Err(CheckError::LineNotFound("L7".into()))
        );
    }

    #[test]
    fn theorem_kind_must_agree() {
        let mut lib = Library::new();
        lib.add_theorem("Zero_Add", TheoremKind::Lemma, Expr::var("P"));
        let history = ProofLineHistory::new();
        let as_theorem = HypDesig::theorem("Zero_Add");
        assert_eq!(
            resolve_designator(&as_theorem, &history, &lib, &StructuralTypes),
            Err(CheckError::TheoremNotFound("Zero_Add".into()))
        );
        let as_lemma = HypDesig::Theorem {
            kind: TheoremKind::Lemma,
            name: "Zero_Add".into(),
        };
        let h = resolve_designator(&as_lemma, &history, &lib, &StructuralTypes).unwrap();
        assert_eq!(h.name, Some("Zero_Add".into()));
    }
}
