//! Structural matching of a candidate expression against a pattern.
//!
//! Locally bound variables in the pattern collect a [`Bindings`] set as they
//! are matched. The first binding for a name is authoritative: every later
//! occurrence of that name must match the bound expression strictly.
//!
//! Only same-name rebinding is checked. Two different pattern variables may
//! still bind overlapping sub-expressions.

use crate::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableBinding {
    /// The pattern occurrence, with its quantifier tag.
    pub var: VarExpr,
    pub var_ty: MathType,
    /// What it was matched against in the candidate.
    pub expr: Expr,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(Vec<VariableBinding>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// A binding set that starts with `var` already bound to `expr`.
    pub fn seeded(var: VarExpr, var_ty: MathType, expr: Expr) -> Self {
        Bindings(vec![VariableBinding { var, var_ty, expr }])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableBinding> {
        self.0.iter()
    }

    pub fn lookup(&self, name: Symbol) -> Option<&Expr> {
        self.0
            .iter()
            .find(|b| b.var.name == name)
            .map(|b| &b.expr)
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    fn push(&mut self, binding: VariableBinding) {
        self.0.push(binding);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchMode {
    /// Variables must agree by name, not only by type.
    pub var_strict: bool,
    /// A local pattern variable may stand for any candidate expression of
    /// the same math type, even when no bindings are being collected.
    pub types_only: bool,
}

impl MatchMode {
    pub const STRUCTURAL: MatchMode = MatchMode {
        var_strict: false,
        types_only: false,
    };
    pub const TYPES: MatchMode = MatchMode {
        var_strict: false,
        types_only: true,
    };
    pub const STRICT: MatchMode = MatchMode {
        var_strict: true,
        types_only: false,
    };
}

/// Context for matching the right-hand side of an equality once the
/// left-hand sides are known to correspond.
#[derive(Debug, Clone, Copy)]
pub struct RhsFrame<'e> {
    pub lhs: &'e Expr,
    pub pattern_lhs: &'e Expr,
}

#[derive(Clone, Copy)]
pub struct Matcher<'a> {
    pub types: &'a dyn TypeOracle,
    /// Accept a commutative AND/OR when any single operand pair matches.
    pub lenient_commutative: bool,
}

impl<'a> Matcher<'a> {
    pub fn new(types: &'a dyn TypeOracle) -> Self {
        Self {
            types,
            lenient_commutative: false,
        }
    }

    pub fn matches(
        &self,
        candidate: &Expr,
        pattern: &Expr,
        mode: MatchMode,
        bindings: Option<&mut Bindings>,
    ) -> bool {
        let res = self.go(candidate, pattern, None, mode, bindings);
        log::trace!("match {candidate} against {pattern}: {res}");
        res
    }

    /// Like [`Matcher::matches`], but a local pattern variable is first
    /// compared against whatever it lined up with in `frame.lhs`.
    pub fn matches_rhs(
        &self,
        candidate: &Expr,
        pattern: &Expr,
        frame: RhsFrame<'_>,
        mode: MatchMode,
        bindings: Option<&mut Bindings>,
    ) -> bool {
        let res = self.go(candidate, pattern, Some(frame), mode, bindings);
        log::trace!("match rhs {candidate} against {pattern}: {res}");
        res
    }

    fn go(
        &self,
        c: &Expr,
        p: &Expr,
        frame: Option<RhsFrame<'_>>,
        mode: MatchMode,
        mut bindings: Option<&mut Bindings>,
    ) -> bool {
        if let Some(res) = self.commutative(c, p, frame, mode, bindings.as_deref_mut()) {
            return res;
        }

        if let Some(pv) = p.as_var() {
            if pv.is_local {
                if let Some(located) =
                    frame.and_then(|f| find_variable_in(f.lhs, f.pattern_lhs, pv.name))
                {
                    if self.go(c, located, None, MatchMode::STRICT, None) {
                        return true;
                    }
                }
                if let Some(bindings) = bindings {
                    return self.bind(bindings, pv, &p.ty, c);
                }
            }
            return self.compare_var_exprs(c, pv, &p.ty, mode);
        }

        let (cs, ps) = (c.children(), p.children());
        c.shallow_eq(p)
            && cs.len() == ps.len()
            && cs
                .iter()
                .zip(ps.iter())
                .all(|(c, p)| self.go(c, p, frame, mode, bindings.as_deref_mut()))
    }

    /// Matches two AND or two OR nodes in either operand order. Returns
    /// `None` when the nodes are not the same commutative connective.
    fn commutative(
        &self,
        c: &Expr,
        p: &Expr,
        frame: Option<RhsFrame<'_>>,
        mode: MatchMode,
        mut bindings: Option<&mut Bindings>,
    ) -> Option<bool> {
        let ((cl, cr), (pl, pr)) = match (c.as_and(self.types), p.as_and(self.types)) {
            (Some(c), Some(p)) => (c, p),
            _ => match (c.as_or(self.types), p.as_or(self.types)) {
                (Some(c), Some(p)) => (c, p),
                _ => return None,
            },
        };

        let mark = bindings.as_ref().map(|b| b.len());
        let mut try_pairs = |pairs: &[(&Expr, &Expr)]| {
            let ok = pairs
                .iter()
                .all(|(c, p)| self.go(c, p, frame, mode, bindings.as_deref_mut()));
            if !ok {
                if let (Some(b), Some(mark)) = (bindings.as_deref_mut(), mark) {
                    b.truncate(mark);
                }
            }
            ok
        };

        if try_pairs(&[(cl, pl), (cr, pr)]) || try_pairs(&[(cl, pr), (cr, pl)]) {
            return Some(true);
        }
        if self.lenient_commutative {
            let any = [(cl, pl), (cl, pr), (cr, pl), (cr, pr)]
                .iter()
                .any(|pair| try_pairs(std::slice::from_ref(pair)));
            return Some(any);
        }
        Some(false)
    }

    /// Records `c` as the value of the local pattern variable `pv`, or checks
    /// it against the value already recorded under the same name.
    fn bind(&self, bindings: &mut Bindings, pv: &VarExpr, pty: &MathType, c: &Expr) -> bool {
        if !self.types.math_matches(&c.ty, pty) {
            return false;
        }
        match bindings.lookup(pv.name) {
            Some(saved) => self.go(c, saved, None, MatchMode::STRICT, None),
            None => {
                log::trace!("bind {pv} := {c}");
                bindings.push(VariableBinding {
                    var: pv.clone(),
                    var_ty: pty.clone(),
                    expr: c.clone(),
                });
                true
            }
        }
    }

    fn compare_var_exprs(&self, c: &Expr, pv: &VarExpr, pty: &MathType, mode: MatchMode) -> bool {
        let Some(cv) = c.as_var() else {
            return mode.types_only && pv.is_local && self.types.math_matches(&c.ty, pty);
        };
        if cv.qualifier != pv.qualifier {
            return false;
        }
        if pv.is_local {
            self.types.math_matches(&c.ty, pty) && (!mode.var_strict || cv.name == pv.name)
        } else {
            cv.name == pv.name && self.types.math_matches(&c.ty, pty)
        }
    }
}

/// Walks `lhs` and `pattern` in parallel and returns the part of `lhs` that
/// lines up with the first occurrence of the pattern variable `name`.
pub(crate) fn find_variable_in<'e>(lhs: &'e Expr, pattern: &Expr, name: Symbol) -> Option<&'e Expr> {
    if let Some(v) = pattern.as_var() {
        return (v.name == name).then_some(lhs);
    }
    let (ls, ps) = (lhs.children(), pattern.children());
    if ls.len() != ps.len() {
        return None;
    }
    ls.into_iter()
        .zip(ps)
        .find_map(|(l, p)| find_variable_in(l, p, name))
}
