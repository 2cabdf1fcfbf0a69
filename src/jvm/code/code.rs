use crate::jvm::class_file;
use crate::jvm::class_file::{BytecodeArray, ConstantsPool, Serialize};
use crate::jvm::code::CodeInstruction;
use crate::jvm::Error;

/// Semantic representation of a method body
#[derive(Debug)]
pub struct Code<'g> {
    /// Maximum size of locals through the method
    pub max_locals: u16,

    /// Maximum size of stack through the method
    pub max_stack: u16,

    /// Instructions, in order
    pub instructions: Vec<CodeInstruction<'g>>,
}

impl<'g> Code<'g> {
    /// Resolve all instructions against the constant pool and encode them
    pub fn serialize_code(
        self,
        constants_pool: &mut ConstantsPool<'g>,
    ) -> Result<class_file::Code, Error> {
        let mut bytes: Vec<u8> = vec![];
        for instruction in &self.instructions {
            instruction.resolve(constants_pool)?.serialize(&mut bytes)?;
        }

        // The length itself is a `u32`, but the JVM caps it further
        if bytes.len() > u16::MAX as usize {
            return Err(Error::MethodCodeOverflow(bytes.len()));
        }

        Ok(class_file::Code {
            max_stack: self.max_stack,
            max_locals: self.max_locals,
            code_array: BytecodeArray(bytes),
            attributes: vec![],
        })
    }
}
