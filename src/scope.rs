//! Quantifier-scope validation of a binding set.

use crate::*;

/// Which quantifier transition a rule expects between the bound (pattern)
/// occurrence and the matched (candidate) occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePolicy {
    /// Each pair keeps its tag, or the bound variable is universal.
    Compatible,
    /// Generalization: some untagged reference becomes tagged with the
    /// quantifier in the step.
    Introduce(Quantifier),
    /// Instantiation: some reference tagged with the quantifier becomes
    /// untagged in the step.
    Eliminate(Quantifier),
}

pub fn validate(bindings: &Bindings, policy: ScopePolicy) -> bool {
    let res = match policy {
        ScopePolicy::Compatible => bindings.iter().all(compatible),
        ScopePolicy::Introduce(q) => transitions(bindings, Quantifier::None, q),
        ScopePolicy::Eliminate(q) => transitions(bindings, q, Quantifier::None),
    };
    log::trace!("validate {policy:?} over {} bindings: {res}", bindings.len());
    res
}

fn compatible(binding: &VariableBinding) -> bool {
    let bound = binding.var.quantifier;
    let ok = |matched: Quantifier| bound == Quantifier::Forall || bound == matched;
    match binding.expr.as_var() {
        Some(v) => ok(v.quantifier),
        None => {
            let mut all = true;
            binding.expr.walk(
                &mut |e| {
                    if let Some(v) = e.as_var() {
                        all &= ok(v.quantifier);
                    }
                },
                &mut |_| {},
            );
            all
        }
    }
}

/// Requires at least one variable pair going from `from` to `to`. Every
/// other variable pair must keep its tag, except that a universal bound
/// variable may always be instantiated.
fn transitions(bindings: &Bindings, from: Quantifier, to: Quantifier) -> bool {
    let mut witnessed = false;
    for binding in bindings.iter() {
        let bound = binding.var.quantifier;
        match binding.expr.as_var() {
            Some(v) => {
                let matched = v.quantifier;
                if bound == from && matched == to {
                    witnessed = true;
                } else if bound != matched && !(to == Quantifier::None && bound == Quantifier::None) {
                    return false;
                }
            }
            // Instantiating a universal with a compound term.
            None if to == Quantifier::None && from == Quantifier::Forall && bound == from => {
                witnessed = true;
            }
            None => {}
        }
    }
    witnessed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(name: &str, q: Quantifier) -> VarExpr {
        VarExpr {
            qualifier: None,
            name: name.into(),
            quantifier: q,
            is_local: true,
        }
    }

    fn binding(bound: Quantifier, expr: Expr) -> Bindings {
        Bindings::seeded(tagged("x", bound), MathType::Unknown, expr)
    }

    fn occurrence(q: Quantifier) -> Expr {
        Expr::new(ExprKind::Var(tagged("n", q)))
    }

    #[test]
    fn compatible_requires_forall_or_equal_tags() {
        use Quantifier::*;
        assert!(validate(&binding(Forall, occurrence(Exists)), ScopePolicy::Compatible));
        assert!(validate(&binding(Exists, occurrence(Exists)), ScopePolicy::Compatible));
        assert!(!validate(&binding(Exists, occurrence(None)), ScopePolicy::Compatible));
        let compound = Expr::infix("+", occurrence(None), occurrence(Exists));
        assert!(!validate(&binding(None, compound.clone()), ScopePolicy::Compatible));
        assert!(validate(&binding(Forall, compound), ScopePolicy::Compatible));
    }

    #[test]
    fn generalization_needs_a_witness() {
        use Quantifier::*;
        assert!(validate(
            &binding(None, occurrence(Forall)),
            ScopePolicy::Introduce(Forall)
        ));
        assert!(!validate(
            &binding(None, occurrence(None)),
            ScopePolicy::Introduce(Forall)
        ));
        assert!(!validate(
            &binding(None, occurrence(Exists)),
            ScopePolicy::Introduce(Forall)
        ));
    }

    #[test]
    fn instantiation_rejects_the_wrong_quantifier() {
        use Quantifier::*;
        assert!(validate(
            &binding(Forall, occurrence(None)),
            ScopePolicy::Eliminate(Forall)
        ));
        assert!(!validate(
            &binding(Exists, occurrence(None)),
            ScopePolicy::Eliminate(Forall)
        ));
        assert!(validate(
            &binding(Forall, Expr::infix("+", Expr::var("a"), Expr::int(1))),
            ScopePolicy::Eliminate(Forall)
        ));
        assert!(!validate(&Bindings::new(), ScopePolicy::Eliminate(Exists)));
    }
}
