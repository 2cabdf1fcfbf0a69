use super::class_file::{Constant, ConstantPoolOverflow};

/// Errors arising while building up classes and serializing them
#[derive(Debug)]
pub enum Error {
    /// The constant pool has no space for another constant
    ConstantPoolOverflow { constant: Constant, offset: u16 },

    /// String constant whose modified UTF-8 encoding exceeds 65535 bytes
    Utf8ConstantTooLong(usize),

    IoError(std::io::Error),

    /// Operand stack depth does not fit in a `u16`
    MethodCodeMaxStackOverflow(usize),

    /// Local variable slots do not fit in a `u16`
    MethodCodeMaxLocalsOverflow(usize),

    /// Method bytecode is longer than the 65535 bytes allowed
    MethodCodeOverflow(usize),
}

impl From<ConstantPoolOverflow> for Error {
    fn from(overflow: ConstantPoolOverflow) -> Error {
        match overflow {
            ConstantPoolOverflow::Full { constant, offset } => {
                Error::ConstantPoolOverflow { constant, offset }
            }
            ConstantPoolOverflow::Utf8TooLong { length } => Error::Utf8ConstantTooLong(length),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}
