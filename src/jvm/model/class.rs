use crate::jvm::class_file;
use crate::jvm::class_file::{ClassConstantIndex, ClassFile, ConstantsPool, ConstantsWriter, Version};
use crate::jvm::class_graph::ClassId;
use crate::jvm::model::{Field, Method};
use crate::jvm::Error;
use crate::util::RefId;

/// Semantic representation of a class
pub struct Class<'g> {
    /// The current class
    pub id: ClassId<'g>,

    /// Fields
    ///
    /// Use [`Self::add_field`] to get a sanity check that the field belongs on this class
    pub fields: Vec<Field<'g>>,

    /// Methods
    ///
    /// Use [`Self::add_method`] to get a sanity check that the method belongs on this class
    pub methods: Vec<Method<'g>>,
}

impl<'g> Class<'g> {
    /// Create a new class
    pub fn new(id: ClassId<'g>) -> Class<'g> {
        Class {
            id,
            fields: vec![],
            methods: vec![],
        }
    }

    /// Serialize the class into a class file
    ///
    /// The constant pool is built from scratch, in the order that members are serialized.
    pub fn serialize(self, version: Version) -> Result<ClassFile, Error> {
        let mut constants_pool: ConstantsPool<'g> = ConstantsPool::new();

        let this_class = self.id.constant_index(&mut constants_pool)?;
        let super_class = match self.id.superclass {
            Some(superclass) => Some(superclass.constant_index(&mut constants_pool)?),
            None => None,
        };
        let interfaces: Vec<ClassConstantIndex> = self
            .id
            .0
            .interfaces
            .iter()
            .map(|interface| RefId(interface).constant_index(&mut constants_pool))
            .collect::<Result<_, _>>()?;

        let fields: Vec<class_file::Field> = self
            .fields
            .into_iter()
            .map(|field| field.serialize_field(&mut constants_pool))
            .collect::<Result<_, Error>>()?;
        let methods: Vec<class_file::Method> = self
            .methods
            .into_iter()
            .map(|method| method.serialize_method(&mut constants_pool))
            .collect::<Result<_, Error>>()?;

        Ok(ClassFile {
            version,
            constants: constants_pool.into_offset_vec(),
            access_flags: self.id.access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes: vec![],
        })
    }

    /// Add a method to the class
    pub fn add_method(&mut self, method: Method<'g>) {
        debug_assert_eq!(
            method.id.class, self.id,
            "Method doesn't belong to this class"
        );
        self.methods.push(method);
    }

    /// Add a field to the class
    pub fn add_field(&mut self, field: Field<'g>) {
        debug_assert_eq!(
            field.id.class, self.id,
            "Field doesn't belong to this class"
        );
        self.fields.push(field);
    }
}

#[test]
fn sample_class() -> Result<(), Error> {
    use crate::jvm::class_file::Serialize;
    use crate::jvm::class_graph::{ClassData, ClassGraph, ClassGraphArenas, FieldData, MethodData};
    use crate::jvm::code::{CodeBuilder, Instruction::*, InstructionSink, InvokeType};
    use crate::jvm::{
        BinaryName, ClassAccessFlags, FieldAccessFlags, FieldType, MethodAccessFlags,
        MethodDescriptor, Name, UnqualifiedName,
    };

    let class_graph_arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&class_graph_arenas);
    let java = class_graph.insert_java_library_types();

    // Declare the class and all the members first
    let class_id = class_graph.add_class(ClassData::new(
        BinaryName::from_string(String::from("me/example/Point")).unwrap(),
        java.classes.lang.object,
        ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
    ));
    let field_x = class_graph.add_field(FieldData {
        class: class_id,
        name: UnqualifiedName::from_string(String::from("x")).unwrap(),
        descriptor: FieldType::int(),
        access_flags: FieldAccessFlags::PUBLIC,
    });
    let init = class_graph.add_method(MethodData {
        class: class_id,
        name: UnqualifiedName::INIT,
        descriptor: MethodDescriptor {
            parameters: vec![FieldType::int()],
            return_type: None,
        },
        access_flags: MethodAccessFlags::PUBLIC,
    });

    let mut class = Class::new(class_id);
    class.add_field(Field::new(field_x));

    let mut code = CodeBuilder::new(init);
    code.push_instruction(ALoad(0))?;
    code.push_instruction(Invoke(InvokeType::Special, java.members.lang.object.init))?;
    code.push_instruction(ALoad(0))?;
    code.push_instruction(ILoad(1))?;
    code.push_instruction(PutField(field_x))?;
    code.push_instruction(Return)?;

    let mut method = Method::new(init);
    method.code_impl = Some(code.result(2)?);
    class.add_method(method);

    let class_file = class.serialize(Version::JAVA8)?;
    assert_eq!(class_file.fields.len(), 1);
    assert_eq!(class_file.methods.len(), 1);
    assert!(class_file.super_class.is_some());

    let mut bytes = vec![];
    class_file.serialize(&mut bytes)?;
    assert_eq!(&bytes[..4], &ClassFile::MAGIC);
    assert_eq!(&bytes[6..8], &[0, 52]);

    Ok(())
}
