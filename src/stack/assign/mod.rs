//! Converting a value on top of the stack from one type to another
//!
//! The building blocks are primitive widening, reference casts, and boxing. [`Assigner`]s combine
//! them to decide how (and whether) a value of a source type can be stored where a target type is
//! expected.

mod assigner;
mod boxing;
mod casting;
mod stack_ops;
mod widening;

pub use assigner::*;
pub use boxing::*;
pub use casting::*;
pub use stack_ops::*;
pub use widening::*;
