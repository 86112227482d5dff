//! Theorems, definitions and math types visible to a proof, consumed
//! through [`SymbolResolver`].

use crate::*;

#[derive(Debug, Clone, Error)]
#[error("Not found: {0}")]
pub struct NotFoundError(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TheoremFact {
    pub kind: TheoremKind,
    pub statement: Expr,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionFact {
    pub body: Option<Expr>,
    /// Only inductive definitions have a base case.
    pub base_case: Option<Expr>,
}

/// A math type together with its defining obligation, if it has one.
///
/// `exemplar` names the variable the obligation is stated over, e.g.
/// `e` in `type Even is modeled by Z exemplar e; constraint exists k: Z, e = 2 * k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFact {
    pub ty: MathType,
    pub exemplar: Option<MathVarDecl>,
    pub obligation: Option<Expr>,
}

pub trait SymbolResolver {
    fn locate_theorem(&self, name: Symbol) -> Result<&TheoremFact, NotFoundError>;

    fn locate_definition(
        &self,
        qualifier: Option<Symbol>,
        name: Symbol,
    ) -> Result<&DefinitionFact, NotFoundError>;

    fn locate_math_type(
        &self,
        qualifier: Option<Symbol>,
        name: Symbol,
    ) -> Result<&TypeFact, NotFoundError>;
}

/// An in-memory [`SymbolResolver`].
///
/// Unqualified lookups fall back to the first entry with a matching name,
/// in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Library {
    theorems: IndexMap<Symbol, TheoremFact>,
    definitions: IndexMap<(Option<Symbol>, Symbol), DefinitionFact>,
    types: IndexMap<(Option<Symbol>, Symbol), TypeFact>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_theorem(&mut self, name: impl Into<Symbol>, kind: TheoremKind, statement: Expr) {
        self.theorems
            .insert(name.into(), TheoremFact { kind, statement });
    }

    pub fn add_definition(
        &mut self,
        qualifier: Option<Symbol>,
        name: impl Into<Symbol>,
        fact: DefinitionFact,
    ) {
        self.definitions.insert((qualifier, name.into()), fact);
    }

    pub fn add_type(&mut self, qualifier: Option<Symbol>, name: impl Into<Symbol>, fact: TypeFact) {
        self.types.insert((qualifier, name.into()), fact);
    }

    fn lookup<'a, T>(
        table: &'a IndexMap<(Option<Symbol>, Symbol), T>,
        qualifier: Option<Symbol>,
        name: Symbol,
    ) -> Option<&'a T> {
        table.get(&(qualifier, name)).or_else(|| {
            qualifier
                .is_none()
                .then(|| {
                    table
                        .iter()
                        .find(|((_, n), _)| *n == name)
                        .map(|(_, fact)| fact)
                })
                .flatten()
        })
    }
}

fn describe(qualifier: Option<Symbol>, name: Symbol) -> String {
    match qualifier {
        Some(q) => format!("{q}.{name}"),
        None => name.to_string(),
    }
}

impl SymbolResolver for Library {
    fn locate_theorem(&self, name: Symbol) -> Result<&TheoremFact, NotFoundError> {
        self.theorems
            .get(&name)
            .ok_or_else(|| NotFoundError(format!("theorem {name}")))
    }

    fn locate_definition(
        &self,
        qualifier: Option<Symbol>,
        name: Symbol,
    ) -> Result<&DefinitionFact, NotFoundError> {
        Self::lookup(&self.definitions, qualifier, name)
            .ok_or_else(|| NotFoundError(format!("definition {}", describe(qualifier, name))))
    }

    fn locate_math_type(
        &self,
        qualifier: Option<Symbol>,
        name: Symbol,
    ) -> Result<&TypeFact, NotFoundError> {
        Self::lookup(&self.types, qualifier, name)
            .ok_or_else(|| NotFoundError(format!("type {}", describe(qualifier, name))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unqualified_lookup_falls_back_to_any_module() {
        let mut lib = Library::new();
        lib.add_definition(
            Some("Set_Theory".into()),
            "union",
            DefinitionFact {
                body: Some(Expr::var("u")),
                base_case: None,
            },
        );
        assert!(lib.locate_definition(None, "union".into()).is_ok());
        assert!(lib
            .locate_definition(Some("Other".into()), "union".into())
            .is_err());
        let err = lib.locate_math_type(None, "N".into()).unwrap_err();
        assert_eq!(err.to_string(), "Not found: type N");
    }
}
