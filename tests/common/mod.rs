#![allow(dead_code, unused_macros)]

use proofcheck::*;

/// `var!(x)` is the free variable `x`; `var!(x: N)` also annotates its type.
macro_rules! var {
    ($name:ident) => {
        Expr::var(stringify!($name))
    };
    ($name:ident : $ty:ident) => {
        Expr::var(stringify!($name)).with_type(MathType::named(stringify!($ty)))
    };
}

pub fn checker(library: &Library) -> ProofChecker<'_> {
    let _ = env_logger::builder().is_test(true).try_init();
    ProofChecker::new(library, &StructuralTypes, Diagnostics::new())
}

pub fn by(rule: &str, designators: &[HypDesig]) -> Justification {
    designators
        .iter()
        .cloned()
        .fold(Justification::by(rule), Justification::with)
}

pub fn line(label: &str) -> HypDesig {
    HypDesig::line(label)
}

pub fn theorem(name: &str) -> HypDesig {
    HypDesig::theorem(name)
}

pub fn nat() -> MathType {
    MathType::named("N")
}

/// A predicate application with a boolean type.
pub fn pred(name: &str, args: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::call(name, args).with_type(MathType::boolean())
}

pub fn library_with(theorems: &[(&str, Expr)]) -> Library {
    let mut library = Library::new();
    for (name, statement) in theorems {
        library.add_theorem(*name, TheoremKind::Theorem, statement.clone());
    }
    library
}

pub fn errors(checker: &ProofChecker<'_>) -> Vec<String> {
    checker
        .sink()
        .diagnostics()
        .iter()
        .map(|d| d.error.to_string())
        .collect()
}
