//! Generate JVM class files from composable units of bytecode
//!
//! The heart of the crate is [`stack::StackManipulation`]: a value describing a short sequence of
//! instructions along with its exact effect on the operand stack. Manipulations compose, and
//! applying a composed manipulation emits every instruction into an
//! [`jvm::code::InstructionSink`] while folding together the stack sizes so that the maximum
//! operand stack depth of a method comes out for free.
//!
//! Constants that are expensive to materialize can be cached in synthetic static fields. That
//! bookkeeping lives in a per-class [`context::Context`], which [`dynamic::TypeWriter`] turns into
//! fields and a type initializer when the class is made.

pub mod context;
pub mod dynamic;
mod errors;
pub mod jvm;
pub mod stack;
mod util;

pub use errors::*;
