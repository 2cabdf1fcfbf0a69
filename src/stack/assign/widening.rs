use crate::context::Context;
use crate::jvm::class_graph::ClassId;
use crate::jvm::code::{CodeInstruction, Instruction, InstructionSink};
use crate::jvm::{BaseType, FieldType, RenderDescriptor};
use crate::stack::{Size, StackManipulation};
use crate::Error;

/// Widening primitive conversions which need an instruction
///
/// The remaining widenings (eg. `byte` to `int`) do not change the representation on the stack.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PrimitiveWidening {
    IntToLong,
    IntToFloat,
    IntToDouble,
    LongToFloat,
    LongToDouble,
    FloatToDouble,
}

impl PrimitiveWidening {
    /// Convert from one primitive type to another
    ///
    /// Conversions that would be narrowing are illegal.
    pub fn widen<'g>(
        source: &FieldType<ClassId<'g>>,
        target: &FieldType<ClassId<'g>>,
    ) -> Result<StackManipulation<'g>, Error> {
        let (source, target) = match (source, target) {
            (FieldType::Base(source), FieldType::Base(target)) => (*source, *target),
            (FieldType::Base(_), other) | (other, _) => {
                return Err(Error::NotPrimitive(other.render()))
            }
        };
        Ok(PrimitiveWidening::between(source, target))
    }

    pub fn between<'g>(source: BaseType, target: BaseType) -> StackManipulation<'g> {
        use BaseType::*;

        let widening = match (source, target) {
            _ if source == target => return StackManipulation::Trivial,
            (Byte, Short) | (Byte | Short | Char, Int) => return StackManipulation::Trivial,
            (Byte | Short | Char | Int, Long) => PrimitiveWidening::IntToLong,
            (Byte | Short | Char | Int, Float) => PrimitiveWidening::IntToFloat,
            (Byte | Short | Char | Int, Double) => PrimitiveWidening::IntToDouble,
            (Long, Float) => PrimitiveWidening::LongToFloat,
            (Long, Double) => PrimitiveWidening::LongToDouble,
            (Float, Double) => PrimitiveWidening::FloatToDouble,
            _ => return StackManipulation::Illegal,
        };
        StackManipulation::PrimitiveWidening(widening)
    }

    pub fn instruction<'g>(&self) -> CodeInstruction<'g> {
        match self {
            PrimitiveWidening::IntToLong => Instruction::I2L,
            PrimitiveWidening::IntToFloat => Instruction::I2F,
            PrimitiveWidening::IntToDouble => Instruction::I2D,
            PrimitiveWidening::LongToFloat => Instruction::L2F,
            PrimitiveWidening::LongToDouble => Instruction::L2D,
            PrimitiveWidening::FloatToDouble => Instruction::F2D,
        }
    }

    pub fn size(&self) -> Size {
        match self {
            PrimitiveWidening::IntToLong
            | PrimitiveWidening::IntToDouble
            | PrimitiveWidening::FloatToDouble => Size::new(1, 1),
            PrimitiveWidening::IntToFloat | PrimitiveWidening::LongToDouble => Size::ZERO,
            PrimitiveWidening::LongToFloat => Size::new(-1, 0),
        }
    }

    pub fn apply<'g, S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        sink.push_instruction(self.instruction())?;
        Ok(self.size())
    }
}
