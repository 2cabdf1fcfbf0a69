use super::Settings;
use crate::context::Context;
use crate::jvm;
use crate::jvm::class_file::Serialize;
use crate::jvm::class_graph::{
    ClassData, ClassGraph, ClassId, ConstantData, JavaLibrary, MethodData, MethodId,
};
use crate::jvm::code::{CodeBuilder, CodeInstruction, Instruction, InstructionSink};
use crate::jvm::model::{Class, Field, Method};
use crate::jvm::{
    BinaryName, ClassAccessFlags, MethodAccessFlags, MethodDescriptor, Name, UnqualifiedName,
};
use crate::stack::member::MethodReturn;
use crate::stack::{Size, StackManipulation};
use crate::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds one class out of method bodies expressed as stack manipulations
pub struct TypeWriter<'a, 'g> {
    settings: Settings,
    class_graph: &'g ClassGraph<'g>,
    java: &'a JavaLibrary<'g>,
    class: Class<'g>,
    context: Context<'g>,

    /// User-supplied `<clinit>` body, emitted after the cached constants are initialized
    type_initializer: Option<(MethodId<'g>, StackManipulation<'g>)>,
}

impl<'a, 'g> TypeWriter<'a, 'g> {
    /// Declare a new public class extending `java.lang.Object`
    pub fn new(
        settings: Settings,
        class_graph: &'g ClassGraph<'g>,
        java: &'a JavaLibrary<'g>,
    ) -> Result<TypeWriter<'a, 'g>, Error> {
        if class_graph
            .lookup_class(&settings.output_class_name)
            .is_some()
        {
            return Err(Error::InvalidSettings(format!(
                "class '{}' already exists",
                settings.output_class_name.as_str()
            )));
        }

        let class = class_graph.add_class(ClassData::new(
            settings.output_class_name.clone(),
            java.classes.lang.object,
            ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
        ));
        let context =
            Context::new(class_graph, class).with_prefix(settings.cached_field_prefix.clone());

        Ok(TypeWriter {
            settings,
            class_graph,
            java,
            class: Class::new(class),
            context,
            type_initializer: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn java(&self) -> &'a JavaLibrary<'g> {
        self.java
    }

    pub fn context(&self) -> &Context<'g> {
        &self.context
    }

    /// Add a method to the class being generated
    pub fn define_method(
        &mut self,
        name: UnqualifiedName,
        descriptor: MethodDescriptor<ClassId<'g>>,
        access_flags: MethodAccessFlags,
    ) -> MethodId<'g> {
        self.class_graph.add_method(MethodData {
            class: self.class.id,
            name,
            descriptor,
            access_flags,
        })
    }

    /// Compile a method body
    ///
    /// The body must be valid and, return included, leave the operand stack as it found it. The
    /// body of `<clinit>` is only emitted by [`Self::make`], after the cached constants.
    pub fn implement_method(
        &mut self,
        method: MethodId<'g>,
        body: &StackManipulation<'g>,
    ) -> Result<(), Error> {
        if method.class != self.class.id {
            return Err(Error::InvalidMethodBody(format!(
                "{:?} is not declared on {}",
                method,
                self.class.id.name.as_str()
            )));
        }
        let already_implemented = self.class.methods.iter().any(|m| m.id == method)
            || matches!(self.type_initializer, Some((clinit, _)) if clinit == method);
        if already_implemented {
            return Err(Error::InvalidMethodBody(format!(
                "{:?} is already implemented",
                method
            )));
        }
        if !body.is_valid() {
            return Err(Error::InvalidMethodBody(format!(
                "{:?} has an invalid body",
                method
            )));
        }

        if method.is_type_initializer() {
            self.type_initializer = Some((method, body.clone()));
            return Ok(());
        }

        let mut code = CodeBuilder::new(method);
        let size = body.apply(&mut code, &mut self.context)?;
        self.finish_method(code, size)
    }

    fn finish_method(&mut self, code: CodeBuilder<'g>, size: Size) -> Result<(), Error> {
        let method = code.method;
        if size.size_impact != 0 {
            return Err(Error::UnbalancedMethodBody {
                method: format!("{:?}", method),
                size_impact: size.size_impact,
            });
        }

        let loads_method_handle = code
            .instructions()
            .iter()
            .any(|insn| matches!(insn, Instruction::Ldc(ConstantData::MethodHandle(_))));
        if loads_method_handle && !self.settings.version.supports_method_handles() {
            return Err(Error::InvalidMethodBody(format!(
                "{:?} loads a method handle, which {:?} does not support",
                method, self.settings.version
            )));
        }

        log::trace!("Implemented {:?} (max stack {})", method, size.maximal_size);
        let mut method = Method::new(method);
        method.code_impl = Some(code.result(size.maximal_size.max(0) as usize)?);
        self.class.add_method(method);
        Ok(())
    }

    /// Emit the type initializer: cached constants first, then the user's `<clinit>` body
    ///
    /// The user body is applied first (into a scratch buffer) so that any constants it caches are
    /// registered before the initializers are written out.
    fn write_type_initializer(&mut self) -> Result<(), Error> {
        let (clinit, body) = match self.type_initializer.take() {
            Some(user_supplied) => user_supplied,
            None if self.context.is_empty() => return Ok(()),
            None => {
                let clinit = self.define_method(
                    UnqualifiedName::CLINIT,
                    MethodDescriptor {
                        parameters: vec![],
                        return_type: None,
                    },
                    MethodAccessFlags::STATIC,
                );
                (clinit, StackManipulation::from(MethodReturn::Void))
            }
        };

        let mut body_instructions: Vec<CodeInstruction<'g>> = vec![];
        let body_size = body.apply(&mut body_instructions, &mut self.context)?;

        let mut code = CodeBuilder::new(clinit);
        let mut size = Size::ZERO;
        let mut index = 0;
        while let Some(initializer) = self.context.initializer(index) {
            size = size.aggregate(initializer.apply(&mut code, &mut self.context)?);
            index += 1;
        }
        for instruction in body_instructions {
            code.push_instruction(instruction)?;
        }

        self.finish_method(code, size.aggregate(body_size))
    }

    /// Finish the class and encode it
    pub fn make(mut self) -> Result<DynamicType, Error> {
        self.write_type_initializer()?;

        for field in self.context.cached_fields() {
            self.class.add_field(Field::new(field));
        }

        let name = self.class.id.name.clone();
        let cached_constants = self.context.len();
        let class_file = self.class.serialize(self.settings.version)?;
        let mut bytes = vec![];
        class_file
            .serialize(&mut bytes)
            .map_err(jvm::Error::IoError)?;

        log::debug!(
            "Generated {} ({} bytes, {} cached constants)",
            name.as_str(),
            bytes.len(),
            cached_constants
        );
        Ok(DynamicType { name, bytes })
    }
}

/// Encoded class file of a generated type
pub struct DynamicType {
    pub name: BinaryName,
    pub bytes: Vec<u8>,
}

impl DynamicType {
    /// Write the class under `directory`, following the package structure of its name
    ///
    /// Returns the path of the written `.class` file.
    pub fn save_to_path<P: AsRef<Path>>(&self, directory: P) -> Result<PathBuf, Error> {
        let path = directory
            .as_ref()
            .join(format!("{}.class", self.name.as_str()));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(jvm::Error::IoError)?;
        }
        fs::write(&path, &self.bytes).map_err(jvm::Error::IoError)?;
        Ok(path)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_graph::ClassGraphArenas;
    use crate::jvm::FieldType;
    use crate::stack::constant::{IntegerConstant, MethodHandleConstant, TextConstant};

    fn getter<'g>(
        writer: &mut TypeWriter<'_, 'g>,
        name: &str,
        return_type: FieldType<ClassId<'g>>,
    ) -> MethodId<'g> {
        writer.define_method(
            UnqualifiedName::from_string(String::from(name)).unwrap(),
            MethodDescriptor {
                parameters: vec![],
                return_type: Some(return_type),
            },
            MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        )
    }

    #[test]
    fn rejects_bad_bodies() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();
        let settings = Settings::new("me/example/Bad").unwrap();
        let mut writer = TypeWriter::new(settings, &class_graph, &java).unwrap();

        let method = getter(&mut writer, "answer", FieldType::int());

        let invalid = StackManipulation::Compound(vec![
            StackManipulation::Illegal,
            MethodReturn::Integer.into(),
        ]);
        assert!(matches!(
            writer.implement_method(method, &invalid),
            Err(Error::InvalidMethodBody(_))
        ));

        // Leaves the constant on the stack after returning another one
        let unbalanced = StackManipulation::Compound(vec![
            IntegerConstant::for_value(1).into(),
            IntegerConstant::for_value(2).into(),
            MethodReturn::Integer.into(),
        ]);
        assert!(matches!(
            writer.implement_method(method, &unbalanced),
            Err(Error::UnbalancedMethodBody { size_impact: 1, .. })
        ));

        let balanced = StackManipulation::Compound(vec![
            IntegerConstant::for_value(42).into(),
            MethodReturn::Integer.into(),
        ]);
        writer.implement_method(method, &balanced).unwrap();
        assert!(matches!(
            writer.implement_method(method, &balanced),
            Err(Error::InvalidMethodBody(_))
        ));

        let foreign = java.members.lang.integer.value_of;
        assert!(matches!(
            writer.implement_method(foreign, &balanced),
            Err(Error::InvalidMethodBody(_))
        ));
    }

    #[test]
    fn method_handles_need_java7() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();
        let settings = Settings::new("me/example/Handles")
            .unwrap()
            .with_java_release(6)
            .unwrap();
        let mut writer = TypeWriter::new(settings, &class_graph, &java).unwrap();

        let method = getter(
            &mut writer,
            "handle",
            FieldType::object(java.classes.lang.object),
        );
        let body = StackManipulation::Compound(vec![
            MethodHandleConstant::of(java.members.lang.integer.value_of).into(),
            MethodReturn::Reference.into(),
        ]);
        assert!(matches!(
            writer.implement_method(method, &body),
            Err(Error::InvalidMethodBody(_))
        ));
    }

    #[test]
    fn duplicate_class_names() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        assert!(matches!(
            TypeWriter::new(Settings::new("java/lang/String").unwrap(), &class_graph, &java),
            Err(Error::InvalidSettings(_))
        ));
    }

    #[test]
    fn user_type_initializer_runs_after_cached_constants() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();
        let settings = Settings::new("me/example/Init").unwrap();
        let mut writer = TypeWriter::new(settings, &class_graph, &java).unwrap();

        let string = FieldType::object(java.classes.lang.string);
        let cached = StackManipulation::from(TextConstant::new("hi")).cached(string);

        let clinit = writer.define_method(
            UnqualifiedName::CLINIT,
            MethodDescriptor {
                parameters: vec![],
                return_type: None,
            },
            MethodAccessFlags::STATIC,
        );
        let clinit_body = StackManipulation::Compound(vec![
            cached.clone(),
            crate::stack::assign::Removal::Single.into(),
            MethodReturn::Void.into(),
        ]);
        writer.implement_method(clinit, &clinit_body).unwrap();

        let method = getter(&mut writer, "greeting", string);
        let body = StackManipulation::Compound(vec![cached, MethodReturn::Reference.into()]);
        writer.implement_method(method, &body).unwrap();

        let class_id = writer.class.id;
        writer.write_type_initializer().unwrap();
        assert_eq!(writer.context.len(), 1);
        let field = writer.context.cached_fields()[0];

        let clinit = writer
            .class
            .methods
            .iter()
            .find(|m| m.id.is_type_initializer())
            .unwrap();
        let code = clinit.code_impl.as_ref().unwrap();
        assert_eq!(
            code.instructions,
            vec![
                Instruction::Ldc(ConstantData::String(String::from("hi"))),
                Instruction::PutStatic(field),
                Instruction::GetStatic(field),
                Instruction::Pop,
                Instruction::Return,
            ]
        );
        assert_eq!(code.max_stack, 1);
        assert_eq!(field.class, class_id);
    }
}
