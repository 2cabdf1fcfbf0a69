use crate::jvm::code::CodeInstruction;
use crate::jvm::Error;

/// Destination for emitted instructions
pub trait InstructionSink<'g> {
    /// Append an instruction to the end of the sequence
    fn push_instruction(&mut self, instruction: CodeInstruction<'g>) -> Result<(), Error>;
}

impl<'g> InstructionSink<'g> for Vec<CodeInstruction<'g>> {
    fn push_instruction(&mut self, instruction: CodeInstruction<'g>) -> Result<(), Error> {
        self.push(instruction);
        Ok(())
    }
}
