mod expr;
mod proof;
mod span;

pub use expr::*;
pub use proof::*;
pub use span::*;
