use crate::context::Context;
use crate::jvm::class_graph::ClassId;
use crate::jvm::code::{Instruction, InstructionSink};
use crate::jvm::{BaseType, FieldType};
use crate::stack::constant::{DoubleConstant, FloatConstant, IntegerConstant, LongConstant, NullConstant};
use crate::stack::{Size, StackManipulation, StackSize};
use crate::Error;

/// Pushes the zero value of a type, as used to initialize fields and arrays
pub struct DefaultValue;

impl DefaultValue {
    /// Nothing is pushed for `void`
    pub fn load<'g>(field_type: Option<&FieldType<ClassId<'g>>>) -> StackManipulation<'g> {
        match field_type {
            None => StackManipulation::Trivial,
            Some(FieldType::Base(BaseType::Long)) => LongConstant::for_value(0).into(),
            Some(FieldType::Base(BaseType::Float)) => FloatConstant::for_value(0.0).into(),
            Some(FieldType::Base(BaseType::Double)) => DoubleConstant::for_value(0.0).into(),
            Some(FieldType::Base(_)) => IntegerConstant::for_value(0).into(),
            Some(FieldType::Ref(_)) => NullConstant.into(),
        }
    }
}

/// Discards the value on top of the stack (`pop` or `pop2`)
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Removal {
    Single,
    Double,
}

impl Removal {
    /// Nothing is popped for `void`
    pub fn pop<'g>(field_type: Option<&FieldType<ClassId<'g>>>) -> StackManipulation<'g> {
        match StackSize::of_return(field_type) {
            StackSize::Zero => StackManipulation::Trivial,
            StackSize::Single => StackManipulation::Removal(Removal::Single),
            StackSize::Double => StackManipulation::Removal(Removal::Double),
        }
    }

    pub fn apply<'g, S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        let (instruction, size) = match self {
            Removal::Single => (Instruction::Pop, StackSize::Single),
            Removal::Double => (Instruction::Pop2, StackSize::Double),
        };
        sink.push_instruction(instruction)?;
        Ok(size.to_decreasing_size())
    }
}

/// Duplicates the value on top of the stack (`dup` or `dup2`)
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Duplication {
    Single,
    Double,
}

impl Duplication {
    pub fn of<'g>(field_type: &FieldType<ClassId<'g>>) -> StackManipulation<'g> {
        match StackSize::of(field_type) {
            StackSize::Double => StackManipulation::Duplication(Duplication::Double),
            _ => StackManipulation::Duplication(Duplication::Single),
        }
    }

    pub fn apply<'g, S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        let (instruction, size) = match self {
            Duplication::Single => (Instruction::Dup, StackSize::Single),
            Duplication::Double => (Instruction::Dup2, StackSize::Double),
        };
        sink.push_instruction(instruction)?;
        Ok(size.to_increasing_size())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_values() {
        assert_eq!(DefaultValue::load(None), StackManipulation::Trivial);
        assert_eq!(
            DefaultValue::load(Some(&FieldType::boolean())),
            StackManipulation::IntegerConstant(IntegerConstant::for_value(0))
        );
        assert_eq!(
            DefaultValue::load(Some(&FieldType::double())),
            StackManipulation::DoubleConstant(DoubleConstant::for_value(0.0))
        );
        assert_eq!(
            DefaultValue::load(Some(&FieldType::array(FieldType::int()))),
            StackManipulation::NullConstant(NullConstant)
        );
    }

    #[test]
    fn removal_and_duplication() {
        assert_eq!(Removal::pop(None), StackManipulation::Trivial);
        assert_eq!(
            Removal::pop(Some(&FieldType::long())),
            StackManipulation::Removal(Removal::Double)
        );
        assert_eq!(
            Duplication::of(&FieldType::float()),
            StackManipulation::Duplication(Duplication::Single)
        );
    }
}
