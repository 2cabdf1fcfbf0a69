use crate::context::Context;
use crate::jvm::class_graph::{ClassId, MethodId};
use crate::jvm::code::{CodeInstruction, Instruction, InstructionSink};
use crate::jvm::{BaseType, FieldType};
use crate::stack::assign::TypeCasting;
use crate::stack::{Size, StackManipulation, StackSize};
use crate::Error;
use std::convert::TryFrom;

/// Category of a local variable, which determines the load instruction
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum MethodVariableAccess {
    /// `int`, `short`, `byte`, `char`, and `boolean`
    Integer,
    Long,
    Float,
    Double,
    Reference,
}

impl MethodVariableAccess {
    pub fn for_type<C>(field_type: &FieldType<C>) -> MethodVariableAccess {
        match field_type {
            FieldType::Base(BaseType::Long) => MethodVariableAccess::Long,
            FieldType::Base(BaseType::Float) => MethodVariableAccess::Float,
            FieldType::Base(BaseType::Double) => MethodVariableAccess::Double,
            FieldType::Base(_) => MethodVariableAccess::Integer,
            FieldType::Ref(_) => MethodVariableAccess::Reference,
        }
    }

    pub fn stack_size(self) -> StackSize {
        match self {
            MethodVariableAccess::Long | MethodVariableAccess::Double => StackSize::Double,
            _ => StackSize::Single,
        }
    }

    /// Push the local variable at the given slot
    pub fn load_from_index<'g>(self, offset: u16) -> StackManipulation<'g> {
        StackManipulation::VariableLoad(VariableLoad {
            access: self,
            offset,
        })
    }

    /// Push every parameter of the method, in order
    ///
    /// Parameters of instance methods start after the receiver in slot 0.
    pub fn load_arguments<'g>(method: MethodId<'g>) -> StackManipulation<'g> {
        let first_offset = if method.is_static() { 0 } else { 1 };
        let mut offset: usize = first_offset;
        let mut loads = Vec::with_capacity(method.descriptor.parameters.len());
        for parameter in &method.descriptor.parameters {
            loads.push(load_parameter(parameter, offset));
            offset += StackSize::of(parameter).slots() as usize;
        }
        StackManipulation::Compound(loads)
    }

    /// Push the receiver (unless the method is static) followed by every parameter
    pub fn load_this_reference_and_arguments<'g>(method: MethodId<'g>) -> StackManipulation<'g> {
        if method.is_static() {
            MethodVariableAccess::load_arguments(method)
        } else {
            StackManipulation::Compound(vec![
                MethodVariableAccess::Reference.load_from_index(0),
                MethodVariableAccess::load_arguments(method),
            ])
        }
    }

    /// Push the parameters of a bridge method, casting each one whose type differs from the type
    /// of the corresponding parameter in the target method
    ///
    /// Both methods must have the same number of parameters.
    pub fn for_bridge_method_invocation<'g>(
        bridge: MethodId<'g>,
        target: MethodId<'g>,
    ) -> Result<StackManipulation<'g>, Error> {
        let bridge_parameters = &bridge.descriptor.parameters;
        let target_parameters = &target.descriptor.parameters;
        if bridge_parameters.len() != target_parameters.len() {
            return Err(Error::BridgeArityMismatch {
                bridge: format!("{:?}", bridge),
                target: format!("{:?}", target),
            });
        }

        let mut offset: usize = if bridge.is_static() { 0 } else { 1 };
        let mut loads = vec![];
        for (bridge_parameter, target_parameter) in bridge_parameters.iter().zip(target_parameters) {
            loads.push(load_parameter(bridge_parameter, offset));
            if bridge_parameter != target_parameter {
                loads.push(TypeCasting::to(target_parameter));
            }
            offset += StackSize::of(bridge_parameter).slots() as usize;
        }
        Ok(StackManipulation::Compound(loads))
    }
}

/// Slots past `u16::MAX` are not addressable
fn load_parameter<'g>(parameter: &FieldType<ClassId<'g>>, offset: usize) -> StackManipulation<'g> {
    match u16::try_from(offset) {
        Ok(offset) => MethodVariableAccess::for_type(parameter).load_from_index(offset),
        Err(_) => StackManipulation::Illegal,
    }
}

/// Push a local variable
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct VariableLoad {
    pub access: MethodVariableAccess,
    pub offset: u16,
}

impl VariableLoad {
    pub fn instruction<'g>(&self) -> CodeInstruction<'g> {
        match self.access {
            MethodVariableAccess::Integer => Instruction::ILoad(self.offset),
            MethodVariableAccess::Long => Instruction::LLoad(self.offset),
            MethodVariableAccess::Float => Instruction::FLoad(self.offset),
            MethodVariableAccess::Double => Instruction::DLoad(self.offset),
            MethodVariableAccess::Reference => Instruction::ALoad(self.offset),
        }
    }

    pub fn apply<'g, S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        sink.push_instruction(self.instruction())?;
        Ok(self.access.stack_size().to_increasing_size())
    }
}
