//! Read-only descriptions of classes and their members
//!
//! Classes, methods, and fields are allocated once into [`ClassGraphArenas`] and then handed
//! around as cheap [`RefId`] handles whose equality is pointer identity.

use super::code::InvokeType;
use super::{
    BaseType, BinaryName, ClassAccessFlags, FieldAccessFlags, FieldType, MethodAccessFlags,
    MethodDescriptor, Name, RefType, RenderDescriptor, UnqualifiedName,
};
use crate::util::RefId;
use elsa::map::FrozenMap;
use elsa::FrozenVec;
use std::fmt;
use std::fmt::Debug;
use typed_arena::Arena;

mod assignable;
mod java_classes;
mod java_lib_types;
mod java_members;

pub use assignable::*;
pub use java_classes::*;
pub use java_lib_types::*;
pub use java_members::*;

pub type ClassId<'g> = RefId<'g, ClassData<'g>>;
pub type MethodId<'g> = RefId<'g, MethodData<'g>>;
pub type FieldId<'g> = RefId<'g, FieldData<'g>>;

pub struct ClassGraphArenas<'g> {
    class_arena: Arena<ClassData<'g>>,
    method_arena: Arena<MethodData<'g>>,
    field_arena: Arena<FieldData<'g>>,
}

impl<'g> ClassGraphArenas<'g> {
    pub fn new() -> Self {
        ClassGraphArenas {
            class_arena: Arena::new(),
            method_arena: Arena::new(),
            field_arena: Arena::new(),
        }
    }
}

impl<'g> Default for ClassGraphArenas<'g> {
    fn default() -> Self {
        ClassGraphArenas::new()
    }
}

/// Tracks the relationships between classes/interfaces and the members on those classes
///
/// The graph only ever grows: members can be added to a class after it has been handed out,
/// which is why the per-class member lists are `elsa` frozen vectors.
pub struct ClassGraph<'g> {
    arenas: &'g ClassGraphArenas<'g>,
    classes: FrozenMap<&'g BinaryName, &'g ClassData<'g>>,
}

impl<'g> ClassGraph<'g> {
    /// New empty graph
    pub fn new(arenas: &'g ClassGraphArenas<'g>) -> Self {
        ClassGraph {
            arenas,
            classes: FrozenMap::new(),
        }
    }

    /// Find a class that has already been added to the graph
    pub fn lookup_class(&'g self, name: &BinaryName) -> Option<ClassId<'g>> {
        self.classes.get(name).map(RefId)
    }

    /// Add a new class to the class graph
    pub fn add_class(&self, data: ClassData<'g>) -> ClassId<'g> {
        let data: &'g ClassData<'g> = self.arenas.class_arena.alloc(data);
        self.classes.insert(&data.name, data);
        RefId(data)
    }

    /// Look up a class by name, adding it as a plain subclass of `superclass` if it is missing
    pub fn lookup_or_add_class(
        &'g self,
        name: BinaryName,
        superclass: ClassId<'g>,
    ) -> ClassId<'g> {
        match self.lookup_class(&name) {
            Some(class) => class,
            None => self.add_class(ClassData::new(
                name,
                superclass,
                ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
            )),
        }
    }

    /// Add a field to the class graph and to its class
    pub fn add_field(&self, field: FieldData<'g>) -> FieldId<'g> {
        let data = RefId(&*self.arenas.field_arena.alloc(field));
        data.class.fields.push(data);
        data
    }

    /// Add a method to the class graph and to its class
    ///
    /// If the class already declares a method with the same name, descriptor, and staticness,
    /// that method is returned instead.
    pub fn add_method(&self, method: MethodData<'g>) -> MethodId<'g> {
        let class: &'g ClassData<'g> = method.class.0;
        let existing = class.methods.iter().find(|m| {
            m.name == method.name
                && m.descriptor == method.descriptor
                && m.is_static() == method.is_static()
        });
        match existing {
            Some(m) => RefId(m),
            None => {
                let data = RefId(&*self.arenas.method_arena.alloc(method));
                data.class.methods.push(data);
                data
            }
        }
    }

    /// Add standard types to the class graph
    pub fn insert_java_library_types(&self) -> JavaLibrary<'g> {
        JavaLibrary::add_to_graph(self)
    }
}

pub struct ClassData<'g> {
    /// Name of the class
    pub name: BinaryName,

    /// Superclass is only ever missing for `java/lang/Object` itself
    pub superclass: Option<ClassId<'g>>,

    /// Interfaces implemented (or super-interfaces)
    pub interfaces: FrozenVec<ClassId<'g>>,

    pub access_flags: ClassAccessFlags,

    pub methods: FrozenVec<MethodId<'g>>,

    pub fields: FrozenVec<FieldId<'g>>,
}

impl<'g> ClassData<'g> {
    pub fn new(
        name: BinaryName,
        superclass: ClassId<'g>,
        access_flags: ClassAccessFlags,
    ) -> ClassData<'g> {
        ClassData {
            name,
            superclass: Some(superclass),
            interfaces: FrozenVec::new(),
            access_flags,
            methods: FrozenVec::new(),
            fields: FrozenVec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::INTERFACE)
    }
}

impl<'g> RenderDescriptor for ClassData<'g> {
    fn render_to(&self, write_to: &mut String) {
        self.name.render_to(write_to)
    }
}

impl<'g> Debug for ClassData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}

pub struct MethodData<'g> {
    /// Declaring class
    pub class: ClassId<'g>,

    pub name: UnqualifiedName,

    pub descriptor: MethodDescriptor<ClassId<'g>>,

    pub access_flags: MethodAccessFlags,
}

impl<'g> MethodData<'g> {
    pub fn is_static(&self) -> bool {
        self.access_flags.contains(MethodAccessFlags::STATIC)
    }

    pub fn is_constructor(&self) -> bool {
        self.name == UnqualifiedName::INIT
    }

    pub fn is_type_initializer(&self) -> bool {
        self.name == UnqualifiedName::CLINIT
    }

    /// With the exception of `invokespecial` vs. `invokevirtual`, there is usually only one valid
    /// way to invoke a method. This function finds it.
    pub fn infer_invoke_type(&self) -> InvokeType {
        if self.is_static() {
            InvokeType::Static
        } else if self.is_constructor()
            || self.access_flags.contains(MethodAccessFlags::PRIVATE)
        {
            InvokeType::Special
        } else if self.class.is_interface() {
            let n = self.descriptor.parameter_length(true) as u8;
            InvokeType::Interface(n)
        } else {
            InvokeType::Virtual
        }
    }
}

impl<'g> Debug for MethodData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}:{}",
            self.class.name.as_str(),
            self.name.as_str(),
            self.descriptor.render(),
        )
    }
}

pub struct FieldData<'g> {
    /// Declaring class
    pub class: ClassId<'g>,

    pub name: UnqualifiedName,

    pub descriptor: FieldType<ClassId<'g>>,

    pub access_flags: FieldAccessFlags,
}

impl<'g> FieldData<'g> {
    pub fn is_static(&self) -> bool {
        self.access_flags.contains(FieldAccessFlags::STATIC)
    }
}

impl<'g> Debug for FieldData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}:{}",
            self.class.name.as_str(),
            self.name.as_str(),
            self.descriptor.render(),
        )
    }
}

/// Constants which can be loaded with `ldc` and friends
///
/// Floating point values are stored as their bits, so that `0.0` and `-0.0` (or two NaNs with
/// different payloads) are distinct constants.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ConstantData<'g> {
    String(String),
    Class(RefType<ClassId<'g>>),
    Integer(i32),
    Long(i64),
    Float(u32),
    Double(u64),
    MethodHandle(MethodId<'g>),
}

impl<'g> ConstantData<'g> {
    /// `long` and `double` need `ldc2_w`
    pub fn is_wide(&self) -> bool {
        matches!(self, ConstantData::Long(_) | ConstantData::Double(_))
    }
}

impl<'g> Debug for ConstantData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantData::String(string) => string.fmt(f),
            ConstantData::Class(ref_type) => ref_type.fmt(f),
            ConstantData::Integer(integer) => integer.fmt(f),
            ConstantData::Long(long) => write!(f, "{}L", long),
            ConstantData::Float(bits) => write!(f, "{:?}f", f32::from_bits(*bits)),
            ConstantData::Double(bits) => write!(f, "{:?}d", f64::from_bits(*bits)),
            ConstantData::MethodHandle(method) => method.fmt(f),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn methods_are_deduplicated() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        let declare = || MethodData {
            class: java.classes.lang.string,
            name: UnqualifiedName::VALUEOF,
            descriptor: MethodDescriptor {
                parameters: vec![FieldType::int()],
                return_type: Some(FieldType::object(java.classes.lang.string)),
            },
            access_flags: MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        };

        let first = class_graph.add_method(declare());
        let second = class_graph.add_method(declare());
        assert_eq!(first, second);
        assert_eq!(first.infer_invoke_type(), InvokeType::Static);
    }

    #[test]
    fn lookup_by_name() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        assert_eq!(
            class_graph.lookup_class(&BinaryName::STRING),
            Some(java.classes.lang.string)
        );

        let name = BinaryName::from_string(String::from("me/example/Foo")).unwrap();
        assert_eq!(class_graph.lookup_class(&name), None);
        let foo = class_graph.lookup_or_add_class(name.clone(), java.classes.lang.object);
        assert_eq!(class_graph.lookup_or_add_class(name, java.classes.lang.object), foo);
    }

    #[test]
    fn invoke_types() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();
        let members = &java.members.lang;

        assert_eq!(members.object.init.infer_invoke_type(), InvokeType::Special);
        assert_eq!(
            members.class.get_declared_method.infer_invoke_type(),
            InvokeType::Virtual
        );
        assert_eq!(
            members.integer.value_of.infer_invoke_type(),
            InvokeType::Static
        );
    }
}
