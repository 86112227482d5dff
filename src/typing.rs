//! The type annotator's side of the contract: every expression arrives
//! annotated, and the checker only asks two questions about types.

use crate::*;

pub trait TypeOracle {
    fn math_matches(&self, a: &MathType, b: &MathType) -> bool;

    fn is_boolean(&self, ty: &MathType) -> bool;
}

/// Compares types structurally. [`MathType::Unknown`] matches everything,
/// and an unqualified name matches the same name under any qualifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralTypes;

impl TypeOracle for StructuralTypes {
    fn math_matches(&self, a: &MathType, b: &MathType) -> bool {
        match (a, b) {
            (MathType::Unknown, _) | (_, MathType::Unknown) => true,
            (
                MathType::Named {
                    qualifier: q1,
                    name: n1,
                },
                MathType::Named {
                    qualifier: q2,
                    name: n2,
                },
            ) => n1 == n2 && (q1.is_none() || q2.is_none() || q1 == q2),
            (MathType::Set(a), MathType::Set(b)) => self.math_matches(a, b),
            (MathType::Function(a1, b1), MathType::Function(a2, b2)) => {
                self.math_matches(a1, a2) && self.math_matches(b1, b2)
            }
            _ => false,
        }
    }

    fn is_boolean(&self, ty: &MathType) -> bool {
        match ty {
            MathType::Unknown => true,
            MathType::Named { name, .. } => *name == *BOOLEAN || *name == *BOOLEAN_LONG,
            _ => false,
        }
    }
}
