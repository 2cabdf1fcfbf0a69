//! Binary `class` file format
//!
//! Everything in here has already been resolved to constant pool indices. See
//! [`crate::jvm::model`] for the symbolic representation that gets lowered into this.

mod attribute;
mod class;
mod constants;
mod member;
mod serialize;
mod version;

pub use attribute::*;
pub use class::*;
pub use constants::*;
pub use member::*;
pub use serialize::*;
pub use version::*;
