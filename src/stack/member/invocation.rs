use crate::context::Context;
use crate::jvm::class_graph::{ClassId, MethodId};
use crate::jvm::code::{CodeInstruction, Instruction, InstructionSink, InvokeType};
use crate::jvm::{BaseType, FieldType};
use crate::stack::{Size, StackSize};
use crate::Error;

/// Invokes a method whose receiver (if any) and arguments are already on the stack
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct MethodInvocation<'g> {
    pub method: MethodId<'g>,
    pub invoke_type: InvokeType,
}

impl<'g> MethodInvocation<'g> {
    /// Invoke the method the only way it can be invoked (or virtually, when there is a choice)
    pub fn invoke(method: MethodId<'g>) -> MethodInvocation<'g> {
        MethodInvocation {
            method,
            invoke_type: method.infer_invoke_type(),
        }
    }

    /// Invoke an instance method without dynamic dispatch (eg. a `super` call)
    pub fn special(method: MethodId<'g>) -> MethodInvocation<'g> {
        MethodInvocation {
            method,
            invoke_type: InvokeType::Special,
        }
    }

    pub fn size(&self) -> Size {
        let arguments = self.method.descriptor.parameter_length(!self.method.is_static()) as i32;
        let returned = StackSize::of_return(self.method.descriptor.return_type.as_ref()).slots();
        let impact = returned - arguments;
        Size::new(impact, impact.max(0))
    }

    pub fn apply<S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        sink.push_instruction(Instruction::Invoke(self.invoke_type, self.method))?;
        Ok(self.size())
    }
}

/// Returns from the method, with the value on top of the stack if there is one
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum MethodReturn {
    Integer,
    Long,
    Float,
    Double,
    Reference,
    Void,
}

impl MethodReturn {
    pub fn returning(return_type: Option<&FieldType<ClassId>>) -> MethodReturn {
        match return_type {
            None => MethodReturn::Void,
            Some(FieldType::Base(BaseType::Long)) => MethodReturn::Long,
            Some(FieldType::Base(BaseType::Float)) => MethodReturn::Float,
            Some(FieldType::Base(BaseType::Double)) => MethodReturn::Double,
            Some(FieldType::Base(_)) => MethodReturn::Integer,
            Some(FieldType::Ref(_)) => MethodReturn::Reference,
        }
    }

    pub fn instruction<'g>(&self) -> CodeInstruction<'g> {
        match self {
            MethodReturn::Integer => Instruction::IReturn,
            MethodReturn::Long => Instruction::LReturn,
            MethodReturn::Float => Instruction::FReturn,
            MethodReturn::Double => Instruction::DReturn,
            MethodReturn::Reference => Instruction::AReturn,
            MethodReturn::Void => Instruction::Return,
        }
    }

    fn stack_size(&self) -> StackSize {
        match self {
            MethodReturn::Void => StackSize::Zero,
            MethodReturn::Long | MethodReturn::Double => StackSize::Double,
            _ => StackSize::Single,
        }
    }

    pub fn apply<'g, S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        sink.push_instruction(self.instruction())?;
        Ok(self.stack_size().to_decreasing_size())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_graph::{ClassGraph, ClassGraphArenas};

    #[test]
    fn invocation_sizes() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();
        let members = &java.members.lang;

        // `Long.valueOf(long)`: two slots in, one out
        let value_of = MethodInvocation::invoke(members.long.value_of);
        assert_eq!(value_of.invoke_type, InvokeType::Static);
        assert_eq!(value_of.size(), Size::new(-1, 0));

        // `Long.longValue()`: receiver in, two slots out
        let unbox = MethodInvocation::invoke(members.long.unbox);
        assert_eq!(unbox.invoke_type, InvokeType::Virtual);
        assert_eq!(unbox.size(), Size::new(1, 1));

        // `Object.<init>()`: receiver in, nothing out
        let init = MethodInvocation::special(members.object.init);
        assert_eq!(init.size(), Size::new(-1, 0));
    }

    #[test]
    fn returns() {
        assert_eq!(MethodReturn::returning(None), MethodReturn::Void);
        assert_eq!(
            MethodReturn::returning(Some(&FieldType::boolean())),
            MethodReturn::Integer
        );
        assert_eq!(
            MethodReturn::returning(Some(&FieldType::double())).stack_size(),
            StackSize::Double
        );
        assert_eq!(MethodReturn::Reference.instruction(), Instruction::AReturn);
    }
}
