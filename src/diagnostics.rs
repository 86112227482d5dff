use crate::*;

use std::fmt::{self, Display};

/// Coarse classification of a [`CheckError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A designator could not be resolved in the history or the library.
    Reference,
    /// The number of hypotheses does not fit the rule.
    Arity,
    /// The rule's structural or scope conditions were not met.
    RuleApplication,
    /// The line has the wrong shape for what it claims to be.
    MalformedShape,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("A reference could not be located.")]
    ReferenceNotFound,
    #[error("Could not find a line by the identifier {0} above the current line.")]
    LineNotFound(Symbol),
    #[error("Could not find the theorem {0}.")]
    TheoremNotFound(Symbol),
    #[error("Not an inductive definition.")]
    NotInductive,
    #[error("Cannot reference a goal as a justification.")]
    GoalReference,
    #[error("Must reference a single case of an inductive proof.")]
    SingleInductiveCase,
    #[error("Improper number of hypothesis designators.")]
    HypothesisCount { expected: usize, found: usize },
    #[error("Could not apply the rule {0} to the proof expression.")]
    RuleNotApplied(String),
    #[error("Proof line must include False when using the contradiction rule.")]
    ContradictionNotFalse,
    #[error("Could not verify deduction from supposition and intervening statements.")]
    DeductionUnverified,
    #[error("Deduction does not match any open supposition.")]
    UnmatchedDeduction,
    #[error("The specified element could not be verified as a member of the set.")]
    NotAMember,
    #[error("Cannot resolve the element as a member of the set.")]
    UnresolvableSet,
    #[error("Could not apply substitution to the justified expression.")]
    SubstitutionFailed,
    #[error("This type of justified statement is not yet supported.")]
    Unsupported,
    #[error("Unable to verify the transformation from the information provided.")]
    TransformationUnverified,
    #[error("Can only have one variable quantified {0} in the expression if calling this rule.")]
    MultipleQuantified(Quantifier),
}

impl CheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::ReferenceNotFound
            | CheckError::LineNotFound(_)
            | CheckError::TheoremNotFound(_)
            | CheckError::NotInductive
            | CheckError::GoalReference
            | CheckError::SingleInductiveCase => ErrorKind::Reference,
            CheckError::HypothesisCount { .. } => ErrorKind::Arity,
            CheckError::RuleNotApplied(_)
            | CheckError::DeductionUnverified
            | CheckError::NotAMember
            | CheckError::SubstitutionFailed
            | CheckError::TransformationUnverified
            | CheckError::MultipleQuantified(_) => ErrorKind::RuleApplication,
            CheckError::ContradictionNotFalse
            | CheckError::UnmatchedDeduction
            | CheckError::UnresolvableSet
            | CheckError::Unsupported => ErrorKind::MalformedShape,
        }
    }
}

/// A [`CheckError`] located in the proof source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub span: Span,
    pub error: CheckError,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.span, self.error)
    }
}

/// Where the checker sends its diagnostics. Reporting is append-only.
pub trait DiagnosticSink {
    fn report(&mut self, span: &Span, error: CheckError);

    fn error_count(&self) -> usize;

    fn error_count_exceeds(&self, n: usize) -> bool {
        self.error_count() > n
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, span: &Span, error: CheckError) {
        (**self).report(span, error)
    }

    fn error_count(&self) -> usize {
        (**self).error_count()
    }
}

/// The default sink: collects diagnostics in order and logs each one.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, span: &Span, error: CheckError) {
        log::warn!("{span}: {error}");
        self.diagnostics.push(Diagnostic {
            span: span.clone(),
            error,
        });
    }

    fn error_count(&self) -> usize {
        self.diagnostics.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_their_subject() {
        assert_eq!(
            CheckError::LineNotFound("L3".into()).to_string(),
            "Could not find a line by the identifier L3 above the current line."
        );
        assert_eq!(
            CheckError::MultipleQuantified(Quantifier::Unique).to_string(),
            "Can only have one variable quantified UNIQUE in the expression if calling this rule."
        );
        assert_eq!(
            CheckError::RuleNotApplied("Modus Ponens".into()).kind(),
            ErrorKind::RuleApplication
        );
    }

    #[test]
    fn sink_counts_and_guards() {
        let mut sink = Diagnostics::new();
        assert!(!sink.error_count_exceeds(0));
        sink.report(&DUMMY_SPAN, CheckError::ContradictionNotFalse);
        assert!(sink.error_count_exceeds(0));
        assert!(!sink.error_count_exceeds(1));
        assert_eq!(
            sink.diagnostics()[0].to_string(),
            "In <unknown location>\nProof line must include False when using the contradiction rule."
        );
    }
}
