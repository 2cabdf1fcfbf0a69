//! Front end turning method bodies into a complete class file
//!
//! A [`TypeWriter`] owns the class being generated and the [`crate::context::Context`] that the
//! method bodies are applied against. Once every method is implemented, [`TypeWriter::make`]
//! declares the cache fields, writes the type initializer that fills them, and serializes the
//! class into a [`DynamicType`].

mod settings;
mod type_writer;

pub use settings::*;
pub use type_writer::*;
