use crate::context::Context;
use crate::jvm::class_graph::ClassId;
use crate::jvm::code::{CodeInstruction, Instruction, InstructionSink};
use crate::jvm::{BaseType, FieldType, RefType};
use crate::stack::constant::IntegerConstant;
use crate::stack::{Size, StackManipulation, StackSize};
use crate::Error;
use std::convert::TryFrom;

/// Creates an array and fills it with the values of the element manipulations
///
/// Each element manipulation must push exactly one value of the component type.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ArrayFactory<'g> {
    pub component_type: FieldType<ClassId<'g>>,
    pub elements: Vec<StackManipulation<'g>>,
}

impl<'g> ArrayFactory<'g> {
    pub fn new(
        component_type: FieldType<ClassId<'g>>,
        elements: Vec<StackManipulation<'g>>,
    ) -> ArrayFactory<'g> {
        ArrayFactory {
            component_type,
            elements,
        }
    }

    /// Type of the array pushed
    pub fn array_type(&self) -> RefType<ClassId<'g>> {
        RefType::array(self.component_type)
    }

    pub fn is_valid(&self) -> bool {
        i32::try_from(self.elements.len()).is_ok()
            && self.elements.iter().all(StackManipulation::is_valid)
    }

    fn create_instruction(&self) -> CodeInstruction<'g> {
        match self.component_type {
            FieldType::Base(base_type) => Instruction::NewArray(base_type),
            FieldType::Ref(ref_type) => Instruction::ANewArray(ref_type),
        }
    }

    fn store_instruction(&self) -> CodeInstruction<'g> {
        match self.component_type {
            FieldType::Base(BaseType::Int) => Instruction::IAStore,
            FieldType::Base(BaseType::Long) => Instruction::LAStore,
            FieldType::Base(BaseType::Float) => Instruction::FAStore,
            FieldType::Base(BaseType::Double) => Instruction::DAStore,
            FieldType::Base(BaseType::Boolean | BaseType::Byte) => Instruction::BAStore,
            FieldType::Base(BaseType::Char) => Instruction::CAStore,
            FieldType::Base(BaseType::Short) => Instruction::SAStore,
            FieldType::Ref(_) => Instruction::AAStore,
        }
    }

    pub fn apply<S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        let length = i32::try_from(self.elements.len())
            .map_err(|_| Error::IllegalStackManipulation)?;
        let mut size = IntegerConstant::for_value(length).apply(sink, context)?;
        sink.push_instruction(self.create_instruction())?;

        // Array ref, index, and value are all consumed by the store
        let store_size = Size::new(-(2 + StackSize::of(&self.component_type).slots()), 0);
        for (index, element) in self.elements.iter().enumerate() {
            sink.push_instruction(Instruction::Dup)?;
            size = size.aggregate(Size::new(1, 1));
            size = size.aggregate(IntegerConstant::for_value(index as i32).apply(sink, context)?);
            size = size.aggregate(element.apply(sink, context)?);
            sink.push_instruction(self.store_instruction())?;
            size = size.aggregate(store_size);
        }

        Ok(size)
    }
}
