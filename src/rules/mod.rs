//! The catalog of inference rules.
//!
//! Every rule receives the normalized justified expression and its
//! resolved hypotheses, and either accepts the line or says why not.

use crate::*;

use std::fmt::{self, Display};
use std::str::FromStr;

mod equality;
mod membership;
mod propositional;
mod quantifier;
mod unique;

pub(crate) use membership::{check_is_in, find_in_contents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    Equality,
    ModusPonens,
    AndRule,
    OrRule,
    Contradiction,
    ReductioAdAbsurdum,
    UniversalGeneralization,
    ExistentialGeneralization,
    UniversalInstantiation,
    ExistentialInstantiation,
    ConjunctElimination,
    ExcludedMiddle,
    AlternativeElimination,
    CommonConclusion,
    QuantifierDistribution,
    /// Only reachable through a definitional justification.
    ThereExistsUnique,
}

impl Rule {
    /// How many hypotheses the rule consumes.
    pub fn arity(self) -> usize {
        match self {
            Rule::ExcludedMiddle => 0,
            Rule::ModusPonens
            | Rule::AndRule
            | Rule::Contradiction
            | Rule::AlternativeElimination
            | Rule::CommonConclusion => 2,
            _ => 1,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Rule::Equality => "Equality",
            Rule::ModusPonens => "Modus Ponens",
            Rule::AndRule => "And Rule",
            Rule::OrRule => "Or Rule",
            Rule::Contradiction => "Contradiction",
            Rule::ReductioAdAbsurdum => "Reductio Ad Absurdum",
            Rule::UniversalGeneralization => "Universal Generalization",
            Rule::ExistentialGeneralization => "Existential Generalization",
            Rule::UniversalInstantiation => "Universal Instantiation",
            Rule::ExistentialInstantiation => "Existential Instantiation",
            Rule::ConjunctElimination => "Conjunct Elimination",
            Rule::ExcludedMiddle => "Excluded Middle",
            Rule::AlternativeElimination => "Alternative Elimination",
            Rule::CommonConclusion => "Common Conclusion",
            Rule::QuantifierDistribution => "Quantifier Distribution",
            Rule::ThereExistsUnique => "Definition of There Exists Unique",
        }
    }

    /// Picks the rule a justification asks for. A missing rule means
    /// Equality, and so does any definitional justification other than
    /// `ThereExistsUnique`.
    pub fn from_justification(justification: &Justification) -> Result<Rule, CheckError> {
        match justification.rule {
            Some(name) if justification.is_def => Ok(match name.as_str() {
                "ThereExistsUnique" => Rule::ThereExistsUnique,
                _ => Rule::Equality,
            }),
            Some(name) => name.as_str().parse(),
            None => Ok(Rule::Equality),
        }
    }

    fn not_applied(self) -> CheckError {
        CheckError::RuleNotApplied(self.display_name().to_string())
    }
}

impl FromStr for Rule {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Equality" => Rule::Equality,
            "ModusPonens" => Rule::ModusPonens,
            "AndRule" => Rule::AndRule,
            "OrRule" => Rule::OrRule,
            "Contradiction" => Rule::Contradiction,
            "ReductioAdAbsurdum" => Rule::ReductioAdAbsurdum,
            "UniversalGeneralization" => Rule::UniversalGeneralization,
            "ExistentialGeneralization" => Rule::ExistentialGeneralization,
            "UniversalInstantiation" => Rule::UniversalInstantiation,
            "ExistentialInstantiation" => Rule::ExistentialInstantiation,
            "ConjunctElimination" => Rule::ConjunctElimination,
            "ExcludedMiddle" => Rule::ExcludedMiddle,
            "AlternativeElimination" => Rule::AlternativeElimination,
            "CommonConclusion" => Rule::CommonConclusion,
            "QuantifierDistribution" => Rule::QuantifierDistribution,
            "ThereExistsUnique" => Rule::ThereExistsUnique,
            _ => return Err(CheckError::RuleNotApplied(s.to_string())),
        })
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What a rule may consult besides its inputs.
#[derive(Clone, Copy)]
pub(crate) struct RuleContext<'a> {
    pub matcher: Matcher<'a>,
    pub types: &'a dyn TypeOracle,
    pub resolver: &'a dyn SymbolResolver,
}

impl RuleContext<'_> {
    /// Matches and validates the binding set with [`ScopePolicy::Compatible`].
    pub(crate) fn matches_scoped(&self, candidate: &Expr, pattern: &Expr, mode: MatchMode) -> bool {
        let mut bindings = Bindings::new();
        self.matcher
            .matches(candidate, pattern, mode, Some(&mut bindings))
            && validate(&bindings, ScopePolicy::Compatible)
    }

    /// One side is the negation of the other, or they are `true` and `false`.
    pub(crate) fn are_logical_opposites(&self, a: &Expr, b: &Expr) -> bool {
        let negates = |not: &Expr, other: &Expr| {
            not.as_not(self.types)
                .is_some_and(|inner| self.matches_scoped(other, inner, MatchMode::STRICT))
        };
        negates(a, b)
            || negates(b, a)
            || (a.is_true() && b.is_false())
            || (a.is_false() && b.is_true())
    }
}

pub(crate) fn verify(
    ctx: &RuleContext<'_>,
    rule: Rule,
    step: &Expr,
    hyps: &[Hypothesis],
) -> Result<(), CheckError> {
    log::debug!("checking {step} by {rule}");
    let ok = match (rule, hyps) {
        (Rule::Equality, [h]) => return equality::verify(ctx, step, h),
        (Rule::ThereExistsUnique, [h]) => return unique::verify(ctx, step, &h.expr),
        (Rule::Contradiction, [a, b]) => {
            return propositional::contradiction(ctx, step, &a.expr, &b.expr)
        }
        (Rule::ModusPonens, [a, b]) => propositional::modus_ponens(ctx, step, &a.expr, &b.expr),
        (Rule::AndRule, [a, b]) => propositional::and_rule(ctx, step, &a.expr, &b.expr),
        (Rule::OrRule, [h]) => propositional::or_rule(ctx, step, &h.expr),
        (Rule::ReductioAdAbsurdum, [h]) => propositional::reductio(ctx, &h.expr),
        (Rule::AlternativeElimination, [a, b]) => {
            propositional::alternative_elimination(ctx, step, &a.expr, &b.expr)
        }
        (Rule::CommonConclusion, [a, b]) => {
            propositional::common_conclusion(ctx, step, &a.expr, &b.expr)
        }
        (Rule::ConjunctElimination, [h]) => propositional::conjunct_elimination(ctx, step, &h.expr),
        (Rule::ExcludedMiddle, []) => propositional::excluded_middle(ctx, step),
        (Rule::UniversalGeneralization, [h]) => quantifier::generalization(
            ctx,
            step,
            &h.expr,
            ScopePolicy::Introduce(Quantifier::Forall),
        ),
        (Rule::ExistentialGeneralization, [h]) => quantifier::generalization(
            ctx,
            step,
            &h.expr,
            ScopePolicy::Introduce(Quantifier::Exists),
        ),
        (Rule::UniversalInstantiation, [h]) => quantifier::generalization(
            ctx,
            step,
            &h.expr,
            ScopePolicy::Eliminate(Quantifier::Forall),
        ),
        (Rule::ExistentialInstantiation, [h]) => quantifier::generalization(
            ctx,
            step,
            &h.expr,
            ScopePolicy::Eliminate(Quantifier::Exists),
        ),
        (Rule::QuantifierDistribution, [h]) => quantifier::distribution(ctx, step, &h.expr),
        (rule, hyps) => {
            return Err(CheckError::HypothesisCount {
                expected: rule.arity(),
                found: hyps.len(),
            })
        }
    };
    if ok {
        Ok(())
    } else {
        Err(rule.not_applied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_names_parse() {
        assert_eq!("ModusPonens".parse::<Rule>(), Ok(Rule::ModusPonens));
        assert_eq!(
            "Modus_Ponens".parse::<Rule>().unwrap_err().to_string(),
            "Could not apply the rule Modus_Ponens to the proof expression."
        );
        assert_eq!(Rule::ExcludedMiddle.arity(), 0);
        assert_eq!(Rule::CommonConclusion.arity(), 2);
    }

    #[test]
    fn definitional_justifications_default_to_equality() {
        let j = Justification::by("ThereExistsUnique").definitional();
        assert_eq!(Rule::from_justification(&j), Ok(Rule::ThereExistsUnique));
        let j = Justification::by("Anything").definitional();
        assert_eq!(Rule::from_justification(&j), Ok(Rule::Equality));
        assert_eq!(
            Rule::from_justification(&Justification::equality()),
            Ok(Rule::Equality)
        );
    }

    #[test]
    fn opposites() {
        let lib = Library::new();
        let ctx = RuleContext {
            matcher: Matcher::new(&StructuralTypes),
            types: &StructuralTypes,
            resolver: &lib,
        };
        let p = Expr::var("P");
        assert!(ctx.are_logical_opposites(&p, &Expr::not(p.clone())));
        assert!(ctx.are_logical_opposites(&Expr::not(p.clone()), &p));
        assert!(ctx.are_logical_opposites(&Expr::boolean(false), &Expr::var("true")));
        assert!(!ctx.are_logical_opposites(&p, &p));
    }
}
