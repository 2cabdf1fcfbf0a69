use crate::context::Context;
use crate::jvm::class_graph::{ClassId, ConstantData, FieldId, JavaLibrary, MethodId};
use crate::jvm::code::{Instruction, InstructionSink};
use crate::jvm::{FieldType, RefType};
use crate::stack::Size;
use crate::Error;

/// Pushes a `java.lang.String` literal from the constant pool
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TextConstant {
    pub text: String,
}

impl TextConstant {
    pub fn new(text: impl Into<String>) -> TextConstant {
        TextConstant { text: text.into() }
    }

    pub fn apply<'g, S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        sink.push_instruction(Instruction::Ldc(ConstantData::String(self.text.clone())))?;
        Ok(Size::new(1, 1))
    }
}

/// Pushes `null`
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct NullConstant;

impl NullConstant {
    pub fn apply<'g, S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        sink.push_instruction(Instruction::AConstNull)?;
        Ok(Size::new(1, 1))
    }
}

/// Pushes the `java.lang.Class` object of a type
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ClassConstant<'g> {
    /// Class literal of a reference type, loaded from the constant pool
    Literal(RefType<ClassId<'g>>),

    /// Primitive types (and `void`) have no class literal: their class objects are stored in
    /// the `TYPE` field of the wrapper class
    WrapperType(FieldId<'g>),
}

impl<'g> ClassConstant<'g> {
    pub fn of(java: &JavaLibrary<'g>, field_type: &FieldType<ClassId<'g>>) -> ClassConstant<'g> {
        match field_type {
            FieldType::Base(primitive) => {
                ClassConstant::WrapperType(java.wrapper_members(*primitive).r#type)
            }
            FieldType::Ref(ref_type) => ClassConstant::Literal(*ref_type),
        }
    }

    /// `void.class`
    pub fn of_void(java: &JavaLibrary<'g>) -> ClassConstant<'g> {
        ClassConstant::WrapperType(java.members.lang.void.r#type)
    }

    pub fn of_return(
        java: &JavaLibrary<'g>,
        return_type: Option<&FieldType<ClassId<'g>>>,
    ) -> ClassConstant<'g> {
        match return_type {
            None => ClassConstant::of_void(java),
            Some(field_type) => ClassConstant::of(java, field_type),
        }
    }

    pub fn apply<S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        let instruction = match self {
            ClassConstant::Literal(ref_type) => Instruction::Ldc(ConstantData::Class(*ref_type)),
            ClassConstant::WrapperType(field) => Instruction::GetStatic(*field),
        };
        sink.push_instruction(instruction)?;
        Ok(Size::new(1, 1))
    }
}

/// Pushes a `java.lang.invoke.MethodHandle` for a method from the constant pool
///
/// Requires class file version 51 or later.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct MethodHandleConstant<'g> {
    pub method: MethodId<'g>,
}

impl<'g> MethodHandleConstant<'g> {
    pub fn of(method: MethodId<'g>) -> MethodHandleConstant<'g> {
        MethodHandleConstant { method }
    }

    pub fn apply<S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        sink.push_instruction(Instruction::Ldc(ConstantData::MethodHandle(self.method)))?;
        Ok(Size::new(1, 1))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_graph::{ClassGraph, ClassGraphArenas};

    #[test]
    fn primitive_class_constants_read_wrapper_type() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();
        let mut context = Context::new(&class_graph, java.classes.lang.object);

        let mut sink = vec![];
        ClassConstant::of(&java, &FieldType::int())
            .apply(&mut sink, &mut context)
            .unwrap();
        ClassConstant::of_void(&java)
            .apply(&mut sink, &mut context)
            .unwrap();
        let size = ClassConstant::of(&java, &FieldType::object(java.classes.lang.string))
            .apply(&mut sink, &mut context)
            .unwrap();

        assert_eq!(size, Size::new(1, 1));
        assert_eq!(
            sink,
            vec![
                Instruction::GetStatic(java.members.lang.integer.r#type),
                Instruction::GetStatic(java.members.lang.void.r#type),
                Instruction::Ldc(ConstantData::Class(RefType::Object(java.classes.lang.string))),
            ]
        );
    }
}
