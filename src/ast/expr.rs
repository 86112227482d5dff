use crate::*;

use smallvec::{smallvec, SmallVec};
use std::fmt::{self, Display};

lazy_static::lazy_static! {
    pub(crate) static ref AND: Symbol = "and".into();
    pub(crate) static ref OR: Symbol = "or".into();
    pub(crate) static ref NOT: Symbol = "not".into();
    pub(crate) static ref IS_IN: Symbol = "is_in".into();
    pub(crate) static ref BOOLEAN: Symbol = "B".into();
    pub(crate) static ref BOOLEAN_LONG: Symbol = "Boolean".into();
    static ref NOT_SPELLINGS: [Symbol; 3] = ["not".into(), "Not".into(), "NOT".into()];
}

/// Which quantifier, if any, binds a variable occurrence.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    #[default]
    None,
    Forall,
    Exists,
    Unique,
}

impl Quantifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Quantifier::None => "",
            Quantifier::Forall => "forall",
            Quantifier::Exists => "exists",
            Quantifier::Unique => "unique",
        }
    }
}

impl Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Quantifier::None => "NONE",
            Quantifier::Forall => "FORALL",
            Quantifier::Exists => "EXISTS",
            Quantifier::Unique => "UNIQUE",
        })
    }
}

/// A semantic type attached by the type annotator.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum MathType {
    /// Not annotated. Matches every type.
    #[default]
    Unknown,
    Named {
        qualifier: Option<Symbol>,
        name: Symbol,
    },
    Set(Box<MathType>),
    Function(Box<MathType>, Box<MathType>),
}

impl MathType {
    pub fn named(name: impl Into<Symbol>) -> Self {
        MathType::Named {
            qualifier: None,
            name: name.into(),
        }
    }

    pub fn boolean() -> Self {
        MathType::Named {
            qualifier: None,
            name: *BOOLEAN,
        }
    }

    pub fn set_of(element: MathType) -> Self {
        MathType::Set(Box::new(element))
    }
}

impl Display for MathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathType::Unknown => f.write_str("?"),
            MathType::Named {
                qualifier: Some(q),
                name,
            } => write!(f, "{q}.{name}"),
            MathType::Named {
                qualifier: None,
                name,
            } => write!(f, "{name}"),
            MathType::Set(t) => write!(f, "Set({t})"),
            MathType::Function(a, b) => write!(f, "({a} -> {b})"),
        }
    }
}

/// A variable declaration `name: ty`, as found after a quantifier,
/// in a set-builder, or in a supposition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MathVarDecl {
    pub name: Symbol,
    pub ty: MathType,
}

impl MathVarDecl {
    pub fn new(name: impl Into<Symbol>, ty: MathType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl Display for MathVarDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarExpr {
    pub qualifier: Option<Symbol>,
    pub name: Symbol,
    pub quantifier: Quantifier,
    /// Set on variables bound inside the proof (by a quantifier or a
    /// supposition) as opposed to free references to global names.
    pub is_local: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqOp {
    Equal,
    NotEqual,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub enum Literal {
    Int(i64),
    Bool(bool),
}

macro_rules! impl_from {
    ($ctor:ident($t:ty)) => {
        impl From<$t> for Literal {
            fn from(t: $t) -> Self {
                Literal::$ctor(t)
            }
        }
    };
}

impl_from!(Int(i64));
impl_from!(Bool(bool));

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(i) => Display::fmt(i, f),
            Literal::Bool(b) => Display::fmt(b, f),
        }
    }
}

/// The closed set of expression kinds.
///
/// `Quantified` only exists before normalization; see [`normalize`](crate::normalize).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Var(VarExpr),
    Lit(Literal),
    Infix {
        op: Symbol,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Prefix {
        op: Symbol,
        arg: Box<Expr>,
    },
    Outfix {
        left: Symbol,
        right: Symbol,
        arg: Box<Expr>,
    },
    Equals {
        op: EqOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    If {
        test: Box<Expr>,
        then: Box<Expr>,
        otherwise: Option<Box<Expr>>,
    },
    Quantified {
        quantifier: Quantifier,
        vars: Vec<MathVarDecl>,
        where_clause: Option<Box<Expr>>,
        body: Box<Expr>,
    },
    SetBuilder {
        var: MathVarDecl,
        where_clause: Option<Box<Expr>>,
        body: Box<Expr>,
    },
    Tuple(Vec<Expr>),
    Field {
        structure: Box<Expr>,
        field: Box<Expr>,
    },
    Dot(Vec<Expr>),
    Call {
        qualifier: Option<Symbol>,
        name: Symbol,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: MathType,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            ty: MathType::Unknown,
            span: DUMMY_SPAN.clone(),
        }
    }

    pub fn with_type(mut self, ty: MathType) -> Self {
        self.ty = ty;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn var(name: impl Into<Symbol>) -> Self {
        Self::new(ExprKind::Var(VarExpr {
            qualifier: None,
            name: name.into(),
            quantifier: Quantifier::None,
            is_local: false,
        }))
    }

    pub fn qualified_var(qualifier: impl Into<Symbol>, name: impl Into<Symbol>) -> Self {
        Self::new(ExprKind::Var(VarExpr {
            qualifier: Some(qualifier.into()),
            name: name.into(),
            quantifier: Quantifier::None,
            is_local: false,
        }))
    }

    /// A variable declared inside the proof, e.g. by a supposition.
    pub fn local_var(name: impl Into<Symbol>) -> Self {
        Self::new(ExprKind::Var(VarExpr {
            qualifier: None,
            name: name.into(),
            quantifier: Quantifier::None,
            is_local: true,
        }))
    }

    pub fn int(i: i64) -> Self {
        Self::new(ExprKind::Lit(Literal::Int(i)))
    }

    pub fn boolean(b: bool) -> Self {
        Self::new(ExprKind::Lit(Literal::Bool(b))).with_type(MathType::boolean())
    }

    pub fn infix(op: impl Into<Symbol>, left: Expr, right: Expr) -> Self {
        Self::new(ExprKind::Infix {
            op: op.into(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Self::infix(*AND, left, right).with_type(MathType::boolean())
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Self::infix(*OR, left, right).with_type(MathType::boolean())
    }

    pub fn is_in(element: Expr, set: Expr) -> Self {
        Self::infix(*IS_IN, element, set).with_type(MathType::boolean())
    }

    pub fn prefix(op: impl Into<Symbol>, arg: Expr) -> Self {
        Self::new(ExprKind::Prefix {
            op: op.into(),
            arg: Box::new(arg),
        })
    }

    pub fn not(arg: Expr) -> Self {
        Self::prefix(*NOT, arg).with_type(MathType::boolean())
    }

    pub fn outfix(left: impl Into<Symbol>, arg: Expr, right: impl Into<Symbol>) -> Self {
        Self::new(ExprKind::Outfix {
            left: left.into(),
            right: right.into(),
            arg: Box::new(arg),
        })
    }

    pub fn equals(left: Expr, right: Expr) -> Self {
        Self::new(ExprKind::Equals {
            op: EqOp::Equal,
            left: Box::new(left),
            right: Box::new(right),
        })
        .with_type(MathType::boolean())
    }

    pub fn not_equals(left: Expr, right: Expr) -> Self {
        Self::new(ExprKind::Equals {
            op: EqOp::NotEqual,
            left: Box::new(left),
            right: Box::new(right),
        })
        .with_type(MathType::boolean())
    }

    pub fn if_then(test: Expr, then: Expr) -> Self {
        Self::new(ExprKind::If {
            test: Box::new(test),
            then: Box::new(then),
            otherwise: None,
        })
        .with_type(MathType::boolean())
    }

    pub fn if_then_else(test: Expr, then: Expr, otherwise: Expr) -> Self {
        Self::new(ExprKind::If {
            test: Box::new(test),
            then: Box::new(then),
            otherwise: Some(Box::new(otherwise)),
        })
    }

    pub fn quantified(
        quantifier: Quantifier,
        vars: impl IntoIterator<Item = MathVarDecl>,
        where_clause: Option<Expr>,
        body: Expr,
    ) -> Self {
        Self::new(ExprKind::Quantified {
            quantifier,
            vars: vars.into_iter().collect(),
            where_clause: where_clause.map(Box::new),
            body: Box::new(body),
        })
        .with_type(MathType::boolean())
    }

    pub fn forall(vars: impl IntoIterator<Item = MathVarDecl>, body: Expr) -> Self {
        Self::quantified(Quantifier::Forall, vars, None, body)
    }

    pub fn exists(vars: impl IntoIterator<Item = MathVarDecl>, body: Expr) -> Self {
        Self::quantified(Quantifier::Exists, vars, None, body)
    }

    pub fn unique(vars: impl IntoIterator<Item = MathVarDecl>, body: Expr) -> Self {
        Self::quantified(Quantifier::Unique, vars, None, body)
    }

    pub fn set_builder(var: MathVarDecl, where_clause: Option<Expr>, body: Expr) -> Self {
        let ty = MathType::set_of(var.ty.clone());
        Self::new(ExprKind::SetBuilder {
            var,
            where_clause: where_clause.map(Box::new),
            body: Box::new(body),
        })
        .with_type(ty)
    }

    pub fn tuple(fields: impl IntoIterator<Item = Expr>) -> Self {
        Self::new(ExprKind::Tuple(fields.into_iter().collect()))
    }

    pub fn field(structure: Expr, field: Expr) -> Self {
        Self::new(ExprKind::Field {
            structure: Box::new(structure),
            field: Box::new(field),
        })
    }

    pub fn dot(segments: impl IntoIterator<Item = Expr>) -> Self {
        Self::new(ExprKind::Dot(segments.into_iter().collect()))
    }

    pub fn call(name: impl Into<Symbol>, args: impl IntoIterator<Item = Expr>) -> Self {
        Self::new(ExprKind::Call {
            qualifier: None,
            name: name.into(),
            args: args.into_iter().collect(),
        })
    }

    pub fn as_var(&self) -> Option<&VarExpr> {
        match &self.kind {
            ExprKind::Var(v) => Some(v),
            _ => None,
        }
    }

    /// The immediate sub-expressions, in source order.
    pub fn children(&self) -> SmallVec<[&Expr; 3]> {
        match &self.kind {
            ExprKind::Var(_) | ExprKind::Lit(_) => SmallVec::new(),
            ExprKind::Infix { left, right, .. } | ExprKind::Equals { left, right, .. } => {
                smallvec![&**left, &**right]
            }
            ExprKind::Prefix { arg, .. } | ExprKind::Outfix { arg, .. } => smallvec![&**arg],
            ExprKind::If {
                test,
                then,
                otherwise,
            } => {
                let mut children: SmallVec<[&Expr; 3]> = smallvec![&**test, &**then];
                children.extend(otherwise.as_deref());
                children
            }
            ExprKind::Quantified {
                where_clause, body, ..
            }
            | ExprKind::SetBuilder {
                where_clause, body, ..
            } => where_clause
                .as_deref()
                .into_iter()
                .chain(std::iter::once(&**body))
                .collect(),
            ExprKind::Tuple(fields) | ExprKind::Dot(fields) => fields.iter().collect(),
            ExprKind::Field { structure, field } => smallvec![&**structure, &**field],
            ExprKind::Call { args, .. } => args.iter().collect(),
        }
    }

    /// Rebuilds this node with `f` applied to each immediate child.
    pub fn map_children(self, f: &mut impl FnMut(Expr) -> Expr) -> Expr {
        let Expr { kind, ty, span } = self;
        let mut boxed = |e: Box<Expr>| Box::new(f(*e));
        let kind = match kind {
            kind @ (ExprKind::Var(_) | ExprKind::Lit(_)) => kind,
            ExprKind::Infix { op, left, right } => ExprKind::Infix {
                op,
                left: boxed(left),
                right: boxed(right),
            },
            ExprKind::Prefix { op, arg } => ExprKind::Prefix {
                op,
                arg: boxed(arg),
            },
            ExprKind::Outfix { left, right, arg } => ExprKind::Outfix {
                left,
                right,
                arg: boxed(arg),
            },
            ExprKind::Equals { op, left, right } => ExprKind::Equals {
                op,
                left: boxed(left),
                right: boxed(right),
            },
            ExprKind::If {
                test,
                then,
                otherwise,
            } => ExprKind::If {
                test: boxed(test),
                then: boxed(then),
                otherwise: otherwise.map(&mut boxed),
            },
            ExprKind::Quantified {
                quantifier,
                vars,
                where_clause,
                body,
            } => ExprKind::Quantified {
                quantifier,
                vars,
                where_clause: where_clause.map(&mut boxed),
                body: boxed(body),
            },
            ExprKind::SetBuilder {
                var,
                where_clause,
                body,
            } => ExprKind::SetBuilder {
                var,
                where_clause: where_clause.map(&mut boxed),
                body: boxed(body),
            },
            ExprKind::Tuple(fields) => {
                ExprKind::Tuple(fields.into_iter().map(|e| f(e)).collect())
            }
            ExprKind::Field { structure, field } => ExprKind::Field {
                structure: boxed(structure),
                field: boxed(field),
            },
            ExprKind::Dot(segments) => {
                ExprKind::Dot(segments.into_iter().map(|e| f(e)).collect())
            }
            ExprKind::Call {
                qualifier,
                name,
                args,
            } => ExprKind::Call {
                qualifier,
                name,
                args: args.into_iter().map(|e| f(e)).collect(),
            },
        };
        Expr { kind, ty, span }
    }

    /// Compares only this node's own tag, operator or name, never its children.
    pub fn shallow_eq(&self, other: &Expr) -> bool {
        match (&self.kind, &other.kind) {
            (ExprKind::Var(a), ExprKind::Var(b)) => a.name == b.name && a.qualifier == b.qualifier,
            (ExprKind::Lit(a), ExprKind::Lit(b)) => a == b,
            (ExprKind::Infix { op: a, .. }, ExprKind::Infix { op: b, .. })
            | (ExprKind::Prefix { op: a, .. }, ExprKind::Prefix { op: b, .. }) => a == b,
            (
                ExprKind::Outfix {
                    left: l1,
                    right: r1,
                    ..
                },
                ExprKind::Outfix {
                    left: l2,
                    right: r2,
                    ..
                },
            ) => l1 == l2 && r1 == r2,
            (ExprKind::Equals { op: a, .. }, ExprKind::Equals { op: b, .. }) => a == b,
            (
                ExprKind::If { otherwise: a, .. },
                ExprKind::If { otherwise: b, .. },
            ) => a.is_some() == b.is_some(),
            (
                ExprKind::Quantified {
                    quantifier: q1,
                    vars: v1,
                    ..
                },
                ExprKind::Quantified {
                    quantifier: q2,
                    vars: v2,
                    ..
                },
            ) => q1 == q2 && v1.len() == v2.len(),
            (ExprKind::SetBuilder { var: a, .. }, ExprKind::SetBuilder { var: b, .. }) => {
                a.name == b.name
            }
            (ExprKind::Tuple(a), ExprKind::Tuple(b)) | (ExprKind::Dot(a), ExprKind::Dot(b)) => {
                a.len() == b.len()
            }
            (ExprKind::Field { .. }, ExprKind::Field { .. }) => true,
            (
                ExprKind::Call {
                    qualifier: q1,
                    name: n1,
                    ..
                },
                ExprKind::Call {
                    qualifier: q2,
                    name: n2,
                    ..
                },
            ) => n1 == n2 && q1 == q2,
            _ => false,
        }
    }

    pub fn walk(&self, pre: &mut impl FnMut(&Self), post: &mut impl FnMut(&Self)) {
        pre(self);
        self.children()
            .iter()
            .for_each(|child| child.walk(pre, post));
        post(self);
    }

    fn infix_named(&self, name: Symbol) -> Option<(&Expr, &Expr)> {
        match &self.kind {
            ExprKind::Infix { op, left, right } if *op == name => Some((&**left, &**right)),
            _ => None,
        }
    }

    /// `left and right`, when this is the boolean conjunction.
    pub fn as_and(&self, types: &dyn TypeOracle) -> Option<(&Expr, &Expr)> {
        self.infix_named(*AND).filter(|_| types.is_boolean(&self.ty))
    }

    pub fn as_or(&self, types: &dyn TypeOracle) -> Option<(&Expr, &Expr)> {
        self.infix_named(*OR).filter(|_| types.is_boolean(&self.ty))
    }

    pub fn as_is_in(&self, types: &dyn TypeOracle) -> Option<(&Expr, &Expr)> {
        self.infix_named(*IS_IN).filter(|_| types.is_boolean(&self.ty))
    }

    /// The negated operand, when this is a boolean negation.
    pub fn as_not(&self, types: &dyn TypeOracle) -> Option<&Expr> {
        match &self.kind {
            ExprKind::Prefix { op, arg }
                if NOT_SPELLINGS.contains(op) && types.is_boolean(&self.ty) =>
            {
                Some(&**arg)
            }
            _ => None,
        }
    }

    pub fn as_if(&self) -> Option<(&Expr, &Expr)> {
        match &self.kind {
            ExprKind::If { test, then, .. } => Some((&**test, &**then)),
            _ => None,
        }
    }

    pub fn as_equals(&self) -> Option<(EqOp, &Expr, &Expr)> {
        match &self.kind {
            ExprKind::Equals { op, left, right } => Some((*op, &**left, &**right)),
            _ => None,
        }
    }

    pub fn is_true(&self) -> bool {
        self.is_truth_value(true)
    }

    pub fn is_false(&self) -> bool {
        self.is_truth_value(false)
    }

    // Front ends that do not produce boolean literals spell them as variables.
    fn is_truth_value(&self, value: bool) -> bool {
        match &self.kind {
            ExprKind::Lit(Literal::Bool(b)) => *b == value,
            ExprKind::Var(v) => {
                v.qualifier.is_none() && v.name.as_str().eq_ignore_ascii_case(&value.to_string())
            }
            _ => false,
        }
    }
}

impl Display for VarExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.qualifier {
            Some(q) => write!(f, "{q}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Var(v) => Display::fmt(v, f),
            ExprKind::Lit(lit) => Display::fmt(lit, f),
            ExprKind::Infix { op, left, right } => write!(f, "({left} {op} {right})"),
            ExprKind::Prefix { op, arg } => write!(f, "{op}({arg})"),
            ExprKind::Outfix { left, right, arg } => write!(f, "{left}{arg}{right}"),
            ExprKind::Equals { op, left, right } => {
                let op = match op {
                    EqOp::Equal => "=",
                    EqOp::NotEqual => "/=",
                };
                write!(f, "({left} {op} {right})")
            }
            ExprKind::If {
                test,
                then,
                otherwise,
            } => {
                write!(f, "(if {test} then {then}")?;
                if let Some(otherwise) = otherwise {
                    write!(f, " else {otherwise}")?;
                }
                write!(f, ")")
            }
            ExprKind::Quantified {
                quantifier,
                vars,
                where_clause,
                body,
            } => {
                write!(f, "({} {}", quantifier.keyword(), ListDisplay(vars, ", "))?;
                if let Some(w) = where_clause {
                    write!(f, " where {w}")?;
                }
                write!(f, ", {body})")
            }
            ExprKind::SetBuilder {
                var,
                where_clause,
                body,
            } => {
                write!(f, "{{{var}")?;
                if let Some(w) = where_clause {
                    write!(f, " where {w}")?;
                }
                write!(f, " | {body}}}")
            }
            ExprKind::Tuple(fields) => write!(f, "({})", ListDisplay(fields, ", ")),
            ExprKind::Field { structure, field } => write!(f, "{structure}.{field}"),
            ExprKind::Dot(segments) => write!(f, "{}", ListDisplay(segments, ".")),
            ExprKind::Call {
                qualifier,
                name,
                args,
            } => {
                if let Some(q) = qualifier {
                    write!(f, "{q}.")?;
                }
                write!(f, "{name}({})", ListDisplay(args, ", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nat() -> MathType {
        MathType::named("N")
    }

    #[test]
    fn children_follow_source_order() {
        let e = Expr::if_then_else(Expr::var("a"), Expr::var("b"), Expr::var("c"));
        let names: Vec<String> = e.children().iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let q = Expr::quantified(
            Quantifier::Forall,
            [MathVarDecl::new("x", nat())],
            Some(Expr::var("w")),
            Expr::var("x"),
        );
        assert_eq!(q.children().len(), 2);
        assert_eq!(q.children()[0].to_string(), "w");
    }

    #[test]
    fn shallow_eq_ignores_children() {
        let a = Expr::and(Expr::var("p"), Expr::var("q"));
        let b = Expr::and(Expr::var("r"), Expr::var("s"));
        let c = Expr::or(Expr::var("p"), Expr::var("q"));
        assert!(a.shallow_eq(&b));
        assert!(!a.shallow_eq(&c));
        assert!(!Expr::var("x").shallow_eq(&Expr::qualified_var("M", "x")));
        assert!(!Expr::equals(Expr::var("x"), Expr::var("y"))
            .shallow_eq(&Expr::not_equals(Expr::var("x"), Expr::var("y"))));
    }

    #[test]
    fn map_children_preserves_shape() {
        let e = Expr::call("f", [Expr::var("x"), Expr::int(1)]);
        let mapped = e.clone().map_children(&mut |c| c);
        assert_eq!(e, mapped);
    }

    #[test]
    fn truth_values() {
        assert!(Expr::boolean(true).is_true());
        assert!(Expr::var("false").is_false());
        assert!(!Expr::qualified_var("M", "true").is_true());
    }

    #[test]
    fn display() {
        let e = Expr::forall(
            [MathVarDecl::new("x", nat())],
            Expr::equals(Expr::infix("+", Expr::var("x"), Expr::int(0)), Expr::var("x")),
        );
        assert_eq!(e.to_string(), "(forall x: N, ((x + 0) = x))");
    }
}
