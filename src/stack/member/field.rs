use crate::context::Context;
use crate::jvm::class_graph::FieldId;
use crate::jvm::code::{CodeInstruction, Instruction, InstructionSink};
use crate::stack::{Size, StackManipulation, StackSize};
use crate::Error;

/// Entry point for accessing a field
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FieldAccess<'g> {
    pub field: FieldId<'g>,
}

impl<'g> FieldAccess<'g> {
    pub fn for_field(field: FieldId<'g>) -> FieldAccess<'g> {
        FieldAccess { field }
    }

    /// Read the field, consuming the receiver first if the field is not static
    pub fn getter(&self) -> StackManipulation<'g> {
        StackManipulation::FieldAccess(FieldAccessor {
            field: self.field,
            direction: AccessDirection::Get,
        })
    }

    /// Write the field, consuming the value (and the receiver if the field is not static)
    pub fn putter(&self) -> StackManipulation<'g> {
        StackManipulation::FieldAccess(FieldAccessor {
            field: self.field,
            direction: AccessDirection::Put,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum AccessDirection {
    Get,
    Put,
}

/// Single `getstatic`, `putstatic`, `getfield`, or `putfield` instruction
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FieldAccessor<'g> {
    pub field: FieldId<'g>,
    pub direction: AccessDirection,
}

impl<'g> FieldAccessor<'g> {
    pub fn instruction(&self) -> CodeInstruction<'g> {
        match (self.direction, self.field.is_static()) {
            (AccessDirection::Get, true) => Instruction::GetStatic(self.field),
            (AccessDirection::Get, false) => Instruction::GetField(self.field),
            (AccessDirection::Put, true) => Instruction::PutStatic(self.field),
            (AccessDirection::Put, false) => Instruction::PutField(self.field),
        }
    }

    /// Derived from the field type alone
    pub fn size(&self) -> Size {
        let slots = StackSize::of(&self.field.descriptor).slots();
        let receiver = if self.field.is_static() { 0 } else { 1 };
        match self.direction {
            AccessDirection::Get => Size::new(slots - receiver, slots - receiver),
            AccessDirection::Put => Size::new(-(slots + receiver), 0),
        }
    }

    pub fn apply<S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        sink.push_instruction(self.instruction())?;
        Ok(self.size())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_graph::{ClassGraph, ClassGraphArenas, FieldData};
    use crate::jvm::{FieldAccessFlags, FieldType, Name, UnqualifiedName};

    #[test]
    fn field_access_sizes() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();
        let mut context = Context::new(&class_graph, java.classes.lang.object);

        let field = |name: &str, descriptor, access_flags| {
            class_graph.add_field(FieldData {
                class: java.classes.lang.object,
                name: UnqualifiedName::from_string(String::from(name)).unwrap(),
                descriptor,
                access_flags,
            })
        };
        let cases = [
            (field("a", FieldType::int(), FieldAccessFlags::STATIC), (1, 1), (-1, 0)),
            (field("b", FieldType::double(), FieldAccessFlags::STATIC), (2, 2), (-2, 0)),
            (field("c", FieldType::int(), FieldAccessFlags::empty()), (0, 0), (-2, 0)),
            (field("d", FieldType::long(), FieldAccessFlags::empty()), (1, 1), (-3, 0)),
        ];

        for (field, (get_impact, get_max), (put_impact, put_max)) in cases {
            let access = FieldAccess::for_field(field);
            let mut sink = vec![];
            let get = access.getter().apply(&mut sink, &mut context).unwrap();
            let put = access.putter().apply(&mut sink, &mut context).unwrap();
            assert_eq!(get, Size::new(get_impact, get_max));
            assert_eq!(put, Size::new(put_impact, put_max));
            assert_eq!(sink.len(), 2);
        }
    }

    #[test]
    fn static_instructions() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();
        let field = java.members.lang.integer.r#type;

        let getter = FieldAccessor {
            field,
            direction: AccessDirection::Get,
        };
        assert_eq!(getter.instruction(), Instruction::GetStatic(field));
    }
}
