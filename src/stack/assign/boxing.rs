use crate::context::Context;
use crate::jvm::class_graph::{ClassId, JavaLibrary, MethodId};
use crate::jvm::code::{Instruction, InstructionSink, InvokeType};
use crate::jvm::{BaseType, FieldType};
use crate::stack::{Size, StackSize};
use crate::Error;

/// Boxes the primitive on top of the stack with the static `valueOf` factory of its wrapper
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct PrimitiveBoxing<'g> {
    pub primitive: BaseType,
    pub value_of: MethodId<'g>,
}

impl<'g> PrimitiveBoxing<'g> {
    pub fn for_primitive(java: &JavaLibrary<'g>, primitive: BaseType) -> PrimitiveBoxing<'g> {
        PrimitiveBoxing {
            primitive,
            value_of: java.wrapper_members(primitive).value_of,
        }
    }

    /// Wrapper class, which is the type of the boxed value
    pub fn wrapper_type(&self) -> FieldType<ClassId<'g>> {
        FieldType::object(self.value_of.class)
    }

    pub fn size(&self) -> Size {
        let primitive = StackSize::of::<ClassId>(&FieldType::Base(self.primitive));
        StackSize::Single
            .to_increasing_size()
            .aggregate(primitive.to_decreasing_size())
    }

    pub fn apply<S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        sink.push_instruction(Instruction::Invoke(InvokeType::Static, self.value_of))?;
        Ok(self.size())
    }
}

/// Unboxes the wrapper on top of the stack with its `<primitive>Value` accessor
///
/// The value must already have the wrapper type: a cast is not inserted.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct PrimitiveUnboxing<'g> {
    pub primitive: BaseType,
    pub unbox: MethodId<'g>,
}

impl<'g> PrimitiveUnboxing<'g> {
    pub fn for_primitive(java: &JavaLibrary<'g>, primitive: BaseType) -> PrimitiveUnboxing<'g> {
        PrimitiveUnboxing {
            primitive,
            unbox: java.wrapper_members(primitive).unbox,
        }
    }

    pub fn wrapper_type(&self) -> FieldType<ClassId<'g>> {
        FieldType::object(self.unbox.class)
    }

    pub fn size(&self) -> Size {
        let primitive = StackSize::of::<ClassId>(&FieldType::Base(self.primitive));
        primitive
            .to_increasing_size()
            .aggregate(StackSize::Single.to_decreasing_size())
    }

    pub fn apply<S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        sink.push_instruction(Instruction::Invoke(InvokeType::Virtual, self.unbox))?;
        Ok(self.size())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_graph::{ClassGraph, ClassGraphArenas};

    #[test]
    fn boxing_sizes() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        let box_int = PrimitiveBoxing::for_primitive(&java, BaseType::Int);
        assert_eq!(box_int.size(), Size::new(0, 1));
        assert_eq!(box_int.wrapper_type(), FieldType::object(java.classes.lang.integer));

        let box_long = PrimitiveBoxing::for_primitive(&java, BaseType::Long);
        assert_eq!(box_long.size(), Size::new(-1, 1));

        let unbox_double = PrimitiveUnboxing::for_primitive(&java, BaseType::Double);
        assert_eq!(unbox_double.size(), Size::new(1, 2));
        assert_eq!(unbox_double.wrapper_type(), FieldType::object(java.classes.lang.double));

        let unbox_char = PrimitiveUnboxing::for_primitive(&java, BaseType::Char);
        assert_eq!(unbox_char.size(), Size::new(0, 1));
    }
}
