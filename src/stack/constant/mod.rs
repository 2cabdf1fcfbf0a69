//! Pushing constants onto the operand stack
//!
//! Primitive literals pick the shortest instruction that can encode them. Everything else comes
//! out of the constant pool, except for reflective method lookups which run actual code and are
//! good candidates for [`CachedConstant`].

mod cached;
mod floating;
mod integer;
mod method;
mod reference;

pub use cached::*;
pub use floating::*;
pub use integer::*;
pub use method::*;
pub use reference::*;
