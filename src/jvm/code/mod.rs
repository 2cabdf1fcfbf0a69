//! Bytecode representation and generation
//!
//! Generated method bodies are straight-line sequences of [`Instruction`]s: there are no
//! branches, so no basic blocks, labels, or stack map frames. Instructions are first collected
//! with operands pointing into the class graph ([`CodeInstruction`]) and only resolved into
//! constant pool indices when the enclosing class is serialized.
//!
//! Anything that can accept instructions implements [`InstructionSink`]. The main one is
//! [`CodeBuilder`], which also tracks how many local variable slots the method body reads.
//!
//! [0]: https://docs.oracle.com/javase/specs/jvms/se17/html/jvms-6.html#jvms-6.5

mod code;
mod code_builder;
mod instructions;
mod sink;

pub use code::*;
pub use code_builder::*;
pub use instructions::*;
pub use sink::*;
