use crate::jvm;
use crate::jvm::BaseType;

#[derive(Debug)]
pub enum Error {
    BytecodeGen(jvm::Error),

    /// An invalid stack manipulation was applied
    IllegalStackManipulation,

    /// Type initializers cannot be looked up reflectively
    TypeInitializerConstant(String),

    /// Literal does not fit in the primitive type
    ConstantOutOfRange { value: i64, primitive: BaseType },

    /// Expected a primitive type, got the (rendered) type
    NotPrimitive(String),

    BridgeArityMismatch { bridge: String, target: String },

    /// Method body contains an invalid stack manipulation
    InvalidMethodBody(String),

    /// Method body leaves values on the operand stack (or pops more than it pushed)
    UnbalancedMethodBody { method: String, size_impact: i32 },

    InvalidSettings(String),
}

impl From<jvm::Error> for Error {
    fn from(err: jvm::Error) -> Error {
        Error::BytecodeGen(err)
    }
}
