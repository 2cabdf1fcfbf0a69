use crate::context::Context;
use crate::jvm::class_graph::ClassId;
use crate::jvm::code::{Instruction, InstructionSink};
use crate::jvm::{FieldType, RefType};
use crate::stack::{Size, StackManipulation};
use crate::Error;

/// Checked cast of the reference on top of the stack (`checkcast`)
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeCasting<'g> {
    pub target: RefType<ClassId<'g>>,
}

impl<'g> TypeCasting<'g> {
    /// Cast to a reference type, which is illegal for primitive targets
    pub fn to(target: &FieldType<ClassId<'g>>) -> StackManipulation<'g> {
        match target {
            FieldType::Ref(target) => StackManipulation::TypeCasting(TypeCasting { target: *target }),
            FieldType::Base(_) => StackManipulation::Illegal,
        }
    }

    pub fn apply<S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        sink.push_instruction(Instruction::CheckCast(self.target))?;
        Ok(Size::ZERO)
    }
}
