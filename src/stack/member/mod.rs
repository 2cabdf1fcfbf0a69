//! Reading and writing fields and local variables, invoking methods, and returning

mod field;
mod invocation;
mod variable;

pub use field::*;
pub use invocation::*;
pub use variable::*;
