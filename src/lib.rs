//! # proofcheck
//! proofcheck mechanically verifies natural-deduction proofs. A proof is a
//! sequence of justified lines, each naming an inference rule and the
//! hypotheses it uses, optionally nested in supposition/deduction blocks.
//!
//! Expressions arrive already parsed and annotated with math types. The
//! checker normalizes quantifiers, resolves hypotheses against the proof
//! history and a [`SymbolResolver`], dispatches the named [`Rule`], and
//! reports every failure to a [`DiagnosticSink`].
//!
//! ```
//! use proofcheck::*;
//!
//! let (p, q) = (Expr::var("P"), Expr::var("Q"));
//! let mut library = Library::new();
//! library.add_theorem(
//!     "P_Implies_Q",
//!     TheoremKind::Theorem,
//!     Expr::if_then(p.clone(), q.clone()),
//! );
//!
//! let mut checker = ProofChecker::new(&library, &StructuralTypes, Diagnostics::new());
//! let report = checker.check_proof(&[ProofStep::block(
//!     p.clone(),
//!     vec![ProofStep::justified(
//!         "L1",
//!         q.clone(),
//!         Justification::by("ModusPonens")
//!             .with(HypDesig::theorem("P_Implies_Q"))
//!             .with(HypDesig::Supposition),
//!     )],
//!     Expr::if_then(p, q),
//! )]);
//! assert!(report.is_success());
//! assert_eq!(report.lines_verified, 2);
//! ```
mod deduction;
mod diagnostics;
mod history;
mod hypotheses;
mod library;
mod matching;
mod normalize;
mod rules;
mod scope;
mod subst;
mod typing;
pub mod ast;
mod util;

use hypotheses::*;
use normalize::tag_occurrences;
use rules::{check_is_in, find_in_contents, RuleContext};
use subst::*;
use thiserror::Error;
use util::*;

use std::fmt::{self, Display};

pub use ast::*;
pub use diagnostics::*;
pub use history::*;
pub use library::*;
pub use matching::*;
pub use normalize::normalize;
pub use rules::Rule;
pub use scope::*;
pub use typing::*;
pub use util::IndexMap;

pub type Symbol = symbol_table::GlobalSymbol;

/// Knobs for a [`ProofChecker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Try to reach an equational conclusion of a deduction by chaining
    /// the equalities stated in its block.
    pub trace_deductions: bool,
    pub max_trace_depth: usize,
    /// Commutative AND/OR must pair both operands. When false, any single
    /// matching operand pair is accepted.
    pub strict_commutative: bool,
    /// Failed lines stay in the history, so later lines may still cite
    /// them.
    pub keep_failed_lines: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            trace_deductions: true,
            max_trace_depth: 64,
            strict_commutative: true,
            keep_failed_lines: true,
        }
    }
}

/// Running statistics for one proof unit.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// Justified lines and deductions looked at.
    pub lines_checked: usize,
    pub lines_verified: usize,
    pub lines_failed: usize,
    /// Diagnostics reported while checking.
    pub diagnostics: usize,
    pub failures_per_rule: HashMap<Rule, usize>,
}

impl CheckReport {
    fn add_rule_failure(&mut self, rule: Rule) {
        *self.failures_per_rule.entry(rule).or_default() += 1;
    }

    fn record(&mut self, verified: bool) {
        self.lines_checked += 1;
        if verified {
            self.lines_verified += 1;
        } else {
            self.lines_failed += 1;
        }
    }

    pub fn is_success(&self) -> bool {
        self.lines_failed == 0 && self.diagnostics == 0
    }
}

impl Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Checked {} lines: {} verified, {} failed, {} diagnostics",
            self.lines_checked, self.lines_verified, self.lines_failed, self.diagnostics
        )?;
        let mut failures = self.failures_per_rule.iter().collect::<Vec<_>>();
        // most failures first, ties by rule
        failures.sort_by(|(r1, n1), (r2, n2)| n2.cmp(n1).then(r1.cmp(r2)));
        for (rule, n) in failures {
            writeln!(f, "  {rule}: {n} failed")?;
        }
        Ok(())
    }
}

/// Checks proof steps one at a time against everything checked before.
pub struct ProofChecker<'a, S: DiagnosticSink = Diagnostics> {
    resolver: &'a dyn SymbolResolver,
    types: &'a dyn TypeOracle,
    sink: S,
    history: ProofLineHistory,
    config: CheckerConfig,
    report: CheckReport,
}

impl<'a, S: DiagnosticSink> ProofChecker<'a, S> {
    pub fn new(resolver: &'a dyn SymbolResolver, types: &'a dyn TypeOracle, sink: S) -> Self {
        Self {
            resolver,
            types,
            sink,
            history: ProofLineHistory::new(),
            config: CheckerConfig::default(),
            report: CheckReport::default(),
        }
    }

    pub fn with_config(mut self, config: CheckerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn history(&self) -> &ProofLineHistory {
        &self.history
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Checks a whole proof unit from an empty history.
    pub fn check_proof(&mut self, steps: &[ProofStep]) -> CheckReport {
        self.history.clear();
        self.report = CheckReport::default();
        let errors_before = self.sink.error_count();
        for step in steps {
            self.check_step(step);
        }
        self.report.diagnostics = self.sink.error_count().saturating_sub(errors_before);
        log::debug!("{}", self.report);
        std::mem::take(&mut self.report)
    }

    /// Checks one step and records it in the history. Returns whether
    /// every line in it verified.
    pub fn check_step(&mut self, step: &ProofStep) -> bool {
        match step {
            ProofStep::Justified(line) => self.check_justified(line),
            ProofStep::Goal(goal) => {
                let expr = normalize(goal.expr.clone(), self.types);
                self.history.push(HistoryEntry::Goal(Goal {
                    label: goal.label,
                    expr,
                }));
                true
            }
            ProofStep::Definition(def) => {
                let def = LocalDefinition {
                    body: def.body.clone().map(|e| normalize(e, self.types)),
                    base_case: def.base_case.clone().map(|e| normalize(e, self.types)),
                    ..def.clone()
                };
                self.history.push(HistoryEntry::Definition(def));
                true
            }
            ProofStep::Supposition(supposition) => {
                self.suppose(supposition);
                true
            }
            ProofStep::Deduction(deduction) => self.check_deduction(deduction),
            ProofStep::Block(block) => {
                self.suppose(&block.supposition);
                let mut all_verified = true;
                for step in &block.body {
                    all_verified &= self.check_step(step);
                }
                self.check_deduction(&block.deduction) && all_verified
            }
        }
    }

    fn context(&self) -> RuleContext<'a> {
        RuleContext {
            matcher: Matcher {
                types: self.types,
                lenient_commutative: !self.config.strict_commutative,
            },
            types: self.types,
            resolver: self.resolver,
        }
    }

    fn suppose(&mut self, supposition: &Supposition) {
        log::debug!("entering block at {}", supposition.span);
        let supposition = Supposition {
            assumption: supposition
                .assumption
                .clone()
                .map(|e| normalize(e, self.types)),
            ..supposition.clone()
        };
        self.history.push(HistoryEntry::Supposition(supposition));
    }

    fn check_deduction(&mut self, deduction: &Deduction) -> bool {
        let expr = normalize(deduction.expr.clone(), self.types);
        let res = deduction::verify(&self.context(), &self.history, &expr, &self.config);
        let verified = match res {
            Ok(()) => true,
            Err(err) => {
                self.sink.report(&expr.span, err);
                false
            }
        };
        self.report.record(verified);
        log::debug!("leaving block with {expr}: {verified}");
        // A deduction always closes its block, verified or not.
        self.history.push(HistoryEntry::Deduction(Deduction {
            label: deduction.label,
            expr,
        }));
        verified
    }

    fn check_justified(&mut self, line: &JustifiedExpr) -> bool {
        let baseline = self.sink.error_count();
        let justification = &line.justification;
        let expr = normalize(line.expr.clone(), self.types);

        let verified = match Rule::from_justification(justification) {
            Err(err) => {
                self.sink.report(&justification.span, err);
                false
            }
            Ok(rule) => {
                let hyps = self.resolve_hypotheses(line, rule);
                // Resolution already reported what is wrong with this line.
                if self.sink.error_count_exceeds(baseline) {
                    false
                } else {
                    let (res, span) = if hyps.len() == rule.arity() {
                        (rules::verify(&self.context(), rule, &expr, &hyps), &expr.span)
                    } else {
                        let err = CheckError::HypothesisCount {
                            expected: rule.arity(),
                            found: hyps.len(),
                        };
                        (Err(err), &justification.span)
                    };
                    match res {
                        Ok(()) => true,
                        Err(err) => {
                            self.report.add_rule_failure(rule);
                            self.sink.report(span, err);
                            false
                        }
                    }
                }
            }
        };
        self.report.record(verified);

        let mut history = self.history.scope();
        history.push(HistoryEntry::Justified(JustifiedExpr {
            label: line.label,
            expr,
            justification: justification.clone(),
        }));
        if verified || self.config.keep_failed_lines {
            history.commit();
        }
        verified
    }

    /// Resolves the designators of `line`, reporting each one that cannot
    /// be found. A line that names fewer hypotheses than its rule needs
    /// implicitly cites the previous line.
    fn resolve_hypotheses(&mut self, line: &JustifiedExpr, rule: Rule) -> Vec<Hypothesis> {
        let justification = &line.justification;
        let mut hyps = vec![];
        for designator in justification.designators() {
            if *designator == HypDesig::SelfRef {
                continue;
            }
            match resolve_designator(designator, &self.history, self.resolver, self.types) {
                Ok(h) => hyps.push(h),
                Err(err) => self.sink.report(&justification.span, err),
            }
        }

        if justification.designators().count() < rule.arity() {
            if let Some(previous) = self.history.last() {
                match previous.unwrap_expr() {
                    Ok(Some(expr)) => hyps.push(Hypothesis {
                        expr: expr.clone(),
                        name: previous.label(),
                    }),
                    Ok(None) => {}
                    Err(err) => self.sink.report(&justification.span, err),
                }
            }
        }

        if justification.has_self_reference() {
            match hypotheses::self_reference(&line.expr) {
                Some(memberships) => hyps.push(Hypothesis {
                    expr: memberships,
                    name: None,
                }),
                None => self
                    .sink
                    .report(&justification.span, CheckError::ReferenceNotFound),
            }
        }
        hyps
    }
}
