use crate::jvm::class_graph::MethodId;
use crate::jvm::code::{Code, CodeInstruction, InstructionSink};
use crate::jvm::Error;
use std::convert::TryFrom;

/// Accumulates the instructions of a method body
///
/// Since the generated code is straight-line, there is no frame inference to do. The builder only
/// keeps track of the local variable slots in use: the parameters (plus `this` for instance
/// methods) and anything read beyond them.
pub struct CodeBuilder<'g> {
    /// Reference to method data in the class graph
    pub method: MethodId<'g>,

    instructions: Vec<CodeInstruction<'g>>,

    max_locals: usize,
}

impl<'g> CodeBuilder<'g> {
    /// Create a builder for a new method
    pub fn new(method: MethodId<'g>) -> Self {
        let max_locals = method.descriptor.parameter_length(!method.is_static());
        CodeBuilder {
            method,
            instructions: vec![],
            max_locals,
        }
    }

    /// Instructions emitted so far
    pub fn instructions(&self) -> &[CodeInstruction<'g>] {
        &self.instructions
    }

    /// Turn the builder into the method code
    ///
    /// The maximum stack depth is computed by the caller, who knows the stack effect of what it
    /// emitted.
    pub fn result(self, max_stack: usize) -> Result<Code<'g>, Error> {
        let max_stack = u16::try_from(max_stack)
            .map_err(|_| Error::MethodCodeMaxStackOverflow(max_stack))?;
        let max_locals = u16::try_from(self.max_locals)
            .map_err(|_| Error::MethodCodeMaxLocalsOverflow(self.max_locals))?;

        Ok(Code {
            max_locals,
            max_stack,
            instructions: self.instructions,
        })
    }
}

impl<'g> InstructionSink<'g> for CodeBuilder<'g> {
    fn push_instruction(&mut self, instruction: CodeInstruction<'g>) -> Result<(), Error> {
        if let Some((slot, width)) = instruction.local_variable() {
            self.max_locals = self.max_locals.max(slot as usize + width as usize);
        }
        self.instructions.push(instruction);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_graph::{ClassGraph, ClassGraphArenas, MethodData};
    use crate::jvm::code::Instruction::*;
    use crate::jvm::{FieldType, MethodAccessFlags, MethodDescriptor, Name, UnqualifiedName};

    #[test]
    fn locals_start_at_parameters() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        let method = class_graph.add_method(MethodData {
            class: java.classes.lang.object,
            name: UnqualifiedName::from_string(String::from("sample")).unwrap(),
            descriptor: MethodDescriptor {
                parameters: vec![FieldType::long(), FieldType::int()],
                return_type: None,
            },
            access_flags: MethodAccessFlags::PUBLIC,
        });

        let builder = CodeBuilder::new(method);
        assert_eq!(builder.result(0).unwrap().max_locals, 4);

        let mut builder = CodeBuilder::new(method);
        builder.push_instruction(DLoad(5)).unwrap();
        builder.push_instruction(Pop2).unwrap();
        let code = builder.result(2).unwrap();
        assert_eq!(code.max_locals, 7);
        assert_eq!(code.max_stack, 2);
        assert_eq!(code.instructions, vec![DLoad(5), Pop2]);
    }

    #[test]
    fn stack_overflow() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        let builder = CodeBuilder::new(java.members.lang.integer.value_of);
        match builder.result(70_000) {
            Err(Error::MethodCodeMaxStackOverflow(70_000)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}
