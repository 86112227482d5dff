//! The stack of proof lines checked so far.

use crate::*;

use std::ops::{Deref, DerefMut};

/// A checked proof line. Expressions are stored normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    Justified(JustifiedExpr),
    Supposition(Supposition),
    Deduction(Deduction),
    Goal(Goal),
    Definition(LocalDefinition),
}

impl HistoryEntry {
    pub fn label(&self) -> Option<Symbol> {
        match self {
            HistoryEntry::Justified(j) => j.label,
            HistoryEntry::Supposition(s) => s.label,
            HistoryEntry::Deduction(d) => d.label,
            HistoryEntry::Goal(g) => g.label,
            HistoryEntry::Definition(d) => d.label.or(Some(d.name)),
        }
    }

    /// The fact this line contributes when used as a hypothesis.
    ///
    /// `Ok(None)` means the line exists but states nothing, as with a
    /// supposition that only declares variables.
    pub fn unwrap_expr(&self) -> Result<Option<&Expr>, CheckError> {
        match self {
            HistoryEntry::Justified(j) => Ok(Some(&j.expr)),
            HistoryEntry::Supposition(s) => Ok(s.assumption.as_ref()),
            HistoryEntry::Deduction(d) => Ok(Some(&d.expr)),
            HistoryEntry::Goal(_) => Err(CheckError::GoalReference),
            HistoryEntry::Definition(d) => d
                .body
                .as_ref()
                .map(Some)
                .ok_or(CheckError::SingleInductiveCase),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProofLineHistory {
    lines: Vec<HistoryEntry>,
}

impl ProofLineHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.lines.push(entry);
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.lines.last()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.lines.iter()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn checkpoint(&self) -> usize {
        self.lines.len()
    }

    pub fn rollback(&mut self, checkpoint: usize) {
        self.lines.truncate(checkpoint);
    }

    /// Opens a scope whose pushes are undone when it is dropped, unless it
    /// is committed first.
    pub fn scope(&mut self) -> HistoryScope<'_> {
        let checkpoint = self.checkpoint();
        HistoryScope {
            history: self,
            checkpoint,
            committed: false,
        }
    }

    /// The most recent line carrying `label`.
    pub fn find_labeled(&self, label: Symbol) -> Option<&HistoryEntry> {
        self.lines.iter().rev().find(|e| e.label() == Some(label))
    }

    /// The innermost supposition not yet closed by a deduction.
    pub fn open_supposition(&self) -> Option<(usize, &Supposition)> {
        let mut depth = 0usize;
        for (i, entry) in self.lines.iter().enumerate().rev() {
            match entry {
                HistoryEntry::Deduction(_) => depth += 1,
                HistoryEntry::Supposition(s) if depth == 0 => return Some((i, s)),
                HistoryEntry::Supposition(_) => depth -= 1,
                _ => {}
            }
        }
        None
    }

    pub fn most_recent_deduction(&self) -> Option<&Deduction> {
        self.lines.iter().rev().find_map(|e| match e {
            HistoryEntry::Deduction(d) => Some(d),
            _ => None,
        })
    }

    /// The facts stated directly inside the block opened at `supposition`.
    ///
    /// Lines of nested blocks are skipped but their closing deductions are
    /// kept. Goals state nothing and are skipped too.
    pub fn block_facts(&self, supposition: usize) -> Vec<&Expr> {
        let mut depth = 0usize;
        let mut facts = vec![];
        for entry in self.lines.iter().skip(supposition + 1) {
            match entry {
                HistoryEntry::Supposition(_) => depth += 1,
                HistoryEntry::Deduction(d) => {
                    if depth == 0 {
                        // Closes the block itself.
                        break;
                    }
                    depth -= 1;
                    if depth == 0 {
                        facts.push(&d.expr);
                    }
                }
                HistoryEntry::Justified(j) if depth == 0 => facts.push(&j.expr),
                HistoryEntry::Definition(d) if depth == 0 => facts.extend(d.body.as_ref()),
                _ => {}
            }
        }
        facts
    }
}

/// A checkpoint on a [`ProofLineHistory`] that rolls back on drop.
pub struct HistoryScope<'a> {
    history: &'a mut ProofLineHistory,
    checkpoint: usize,
    committed: bool,
}

impl HistoryScope<'_> {
    /// Keeps everything pushed through this scope.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Deref for HistoryScope<'_> {
    type Target = ProofLineHistory;

    fn deref(&self) -> &Self::Target {
        self.history
    }
}

impl DerefMut for HistoryScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.history
    }
}

impl Drop for HistoryScope<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.history.rollback(self.checkpoint);
        }
    }
}
