use crate::context::Context;
use crate::jvm::class_graph::ClassId;
use crate::jvm::code::{Instruction, InstructionSink};
use crate::jvm::FieldType;
use crate::stack::{Size, StackManipulation, StackSize};
use crate::Error;

/// Reads a constant out of a synthetic static field instead of computing it inline
///
/// The first time an equal constant is applied in a [`Context`], the context allocates the field
/// and remembers to initialize it in the type initializer.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CachedConstant<'g> {
    pub manipulation: Box<StackManipulation<'g>>,
    pub field_type: FieldType<ClassId<'g>>,
}

impl<'g> CachedConstant<'g> {
    pub fn new(
        manipulation: StackManipulation<'g>,
        field_type: FieldType<ClassId<'g>>,
    ) -> CachedConstant<'g> {
        CachedConstant {
            manipulation: Box::new(manipulation),
            field_type,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.manipulation.is_valid()
    }

    pub fn apply<S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        let field = context.cache(&self.manipulation, &self.field_type)?;
        sink.push_instruction(Instruction::GetStatic(field))?;
        Ok(StackSize::of(&self.field_type).to_increasing_size())
    }
}
