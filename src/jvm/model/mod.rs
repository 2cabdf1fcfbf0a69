//! Semantic representations of classes
//!
//! This is the representation to use while generating code: members still point into the class
//! graph and method bodies are still symbolic. Serializing a [`Class`] builds its constant pool
//! and lowers everything into a [`crate::jvm::class_file::ClassFile`].
//!
//!   - __Class__ is represented using [`Class`]
//!   - __Method__ is represented using [`Method`]
//!   - __Field__ is represented using [`Field`]
//!
//! In all of these cases, the types have an `id` field to query the class graph representation.

mod class;
mod field;
mod method;

pub use class::*;
pub use field::*;
pub use method::*;
