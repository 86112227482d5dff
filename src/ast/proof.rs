use crate::*;

use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TheoremKind {
    Theorem,
    Lemma,
    Corollary,
    Property,
}

impl Display for TheoremKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TheoremKind::Theorem => "Theorem",
            TheoremKind::Lemma => "Lemma",
            TheoremKind::Corollary => "Corollary",
            TheoremKind::Property => "Property",
        })
    }
}

/// A reference naming which prior fact licenses a step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HypDesig {
    /// A labeled proof line checked earlier.
    Line(Symbol),
    /// The most recent open supposition.
    Supposition,
    /// The most recently closed deduction.
    Deduction,
    /// The line being justified.
    SelfRef,
    Theorem {
        kind: TheoremKind,
        name: Symbol,
    },
    /// `index` is `Some("i")` to select the base case of an inductive definition.
    Definition {
        qualifier: Option<Symbol>,
        name: Symbol,
        index: Option<Symbol>,
    },
}

impl HypDesig {
    pub fn line(label: impl Into<Symbol>) -> Self {
        HypDesig::Line(label.into())
    }

    pub fn theorem(name: impl Into<Symbol>) -> Self {
        HypDesig::Theorem {
            kind: TheoremKind::Theorem,
            name: name.into(),
        }
    }

    pub fn definition(name: impl Into<Symbol>) -> Self {
        HypDesig::Definition {
            qualifier: None,
            name: name.into(),
            index: None,
        }
    }
}

impl Display for HypDesig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HypDesig::Line(label) => write!(f, "{label}"),
            HypDesig::Supposition => f.write_str("Supposition"),
            HypDesig::Deduction => f.write_str("Deduction"),
            HypDesig::SelfRef => f.write_str("Self"),
            HypDesig::Theorem { kind, name } => write!(f, "{kind} {name}"),
            HypDesig::Definition {
                qualifier,
                name,
                index,
            } => {
                f.write_str("Def. ")?;
                if let Some(index) = index {
                    write!(f, "({index}) ")?;
                }
                if let Some(q) = qualifier {
                    write!(f, "{q}.")?;
                }
                write!(f, "{name}")
            }
        }
    }
}

/// The rule and hypotheses that license a proof line.
///
/// A missing rule means Equality. Definitional justifications are checked
/// by Equality unless the rule is `ThereExistsUnique`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Justification {
    pub rule: Option<Symbol>,
    pub hyp1: Option<HypDesig>,
    pub hyp2: Option<HypDesig>,
    pub is_def: bool,
    pub span: Span,
}

impl Justification {
    pub fn by(rule: impl Into<Symbol>) -> Self {
        Self {
            rule: Some(rule.into()),
            ..Self::equality()
        }
    }

    pub fn equality() -> Self {
        Self {
            rule: None,
            hyp1: None,
            hyp2: None,
            is_def: false,
            span: DUMMY_SPAN.clone(),
        }
    }

    /// Fills the first free designator slot.
    pub fn with(mut self, designator: HypDesig) -> Self {
        if self.hyp1.is_none() {
            self.hyp1 = Some(designator);
        } else {
            self.hyp2 = Some(designator);
        }
        self
    }

    pub fn definitional(mut self) -> Self {
        self.is_def = true;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The designators in order. A second designator is only read when a
    /// first one is present.
    pub fn designators(&self) -> impl Iterator<Item = &HypDesig> {
        let second = self.hyp1.as_ref().and(self.hyp2.as_ref());
        self.hyp1.iter().chain(second)
    }

    pub fn has_self_reference(&self) -> bool {
        self.designators().any(|d| *d == HypDesig::SelfRef)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JustifiedExpr {
    pub label: Option<Symbol>,
    pub expr: Expr,
    pub justification: Justification,
}

/// Opens a hypothetical block: `Suppose x: N, x > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Supposition {
    pub label: Option<Symbol>,
    pub vars: Vec<MathVarDecl>,
    pub assumption: Option<Expr>,
    pub span: Span,
}

/// Closes the innermost open block with `if P then Q`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Deduction {
    pub label: Option<Symbol>,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Goal {
    pub label: Option<Symbol>,
    pub expr: Expr,
}

/// A definition made inside a proof. Inductive definitions carry a base case
/// and may have no single body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalDefinition {
    pub label: Option<Symbol>,
    pub name: Symbol,
    pub body: Option<Expr>,
    pub base_case: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuppositionBlock {
    pub supposition: Supposition,
    pub body: Vec<ProofStep>,
    pub deduction: Deduction,
}

/// One statement of a proof unit, as handed to the checker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProofStep {
    Justified(JustifiedExpr),
    Goal(Goal),
    Definition(LocalDefinition),
    Supposition(Supposition),
    Deduction(Deduction),
    Block(SuppositionBlock),
}

impl ProofStep {
    pub fn justified(label: impl Into<Symbol>, expr: Expr, justification: Justification) -> Self {
        ProofStep::Justified(JustifiedExpr {
            label: Some(label.into()),
            expr,
            justification,
        })
    }

    pub fn suppose(assumption: Expr) -> Self {
        ProofStep::Supposition(Supposition {
            label: None,
            vars: vec![],
            assumption: Some(assumption),
            span: DUMMY_SPAN.clone(),
        })
    }

    pub fn deduce(expr: Expr) -> Self {
        ProofStep::Deduction(Deduction { label: None, expr })
    }

    pub fn block(assumption: Expr, body: Vec<ProofStep>, conclusion: Expr) -> Self {
        ProofStep::Block(SuppositionBlock {
            supposition: Supposition {
                label: None,
                vars: vec![],
                assumption: Some(assumption),
                span: DUMMY_SPAN.clone(),
            },
            body,
            deduction: Deduction {
                label: None,
                expr: conclusion,
            },
        })
    }
}
