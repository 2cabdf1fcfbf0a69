use super::{
    BaseType, ClassGraph, ClassId, FieldAccessFlags, FieldData, FieldId, FieldType,
    MethodAccessFlags, MethodData, MethodDescriptor, MethodId, UnqualifiedName,
};

use super::java_classes::JavaClasses;

/// Members of classes inside `java.*`
pub struct JavaMembers<'g> {
    pub lang: LangMembers<'g>,
}

/// Members of classes inside `java.lang.*`
pub struct LangMembers<'g> {
    pub object: ObjectMembers<'g>,
    pub class: ClassMembers<'g>,
    pub boolean: BoxMembers<'g>,
    pub byte: BoxMembers<'g>,
    pub short: BoxMembers<'g>,
    pub character: BoxMembers<'g>,
    pub integer: BoxMembers<'g>,
    pub long: BoxMembers<'g>,
    pub float: BoxMembers<'g>,
    pub double: BoxMembers<'g>,
    pub void: VoidMembers<'g>,
}

/// Members of `java.lang.Object`
pub struct ObjectMembers<'g> {
    pub init: MethodId<'g>,
}

/// Members of `java.lang.Class`
pub struct ClassMembers<'g> {
    pub get_declared_method: MethodId<'g>,
    pub get_declared_constructor: MethodId<'g>,
}

/// Members shared by every primitive wrapper class (eg. `java.lang.Integer`)
pub struct BoxMembers<'g> {
    /// Static factory from the primitive, eg. `Integer.valueOf(int)`
    pub value_of: MethodId<'g>,

    /// Accessor for the primitive, eg. `Integer.intValue()`
    pub unbox: MethodId<'g>,

    /// Class object of the primitive type, eg. `Integer.TYPE` is `int.class`
    pub r#type: FieldId<'g>,
}

/// Members of `java.lang.Void`
pub struct VoidMembers<'g> {
    pub r#type: FieldId<'g>,
}

impl<'g> JavaMembers<'g> {
    pub fn add_to_graph(
        class_graph: &ClassGraph<'g>,
        classes: &JavaClasses<'g>,
    ) -> JavaMembers<'g> {
        JavaMembers {
            lang: LangMembers::add_to_graph(class_graph, classes),
        }
    }
}

impl<'g> LangMembers<'g> {
    fn add_to_graph(class_graph: &ClassGraph<'g>, classes: &JavaClasses<'g>) -> LangMembers<'g> {
        let lang = &classes.lang;
        let wrapper = |class, primitive, unbox| {
            BoxMembers::add_to_graph(class_graph, classes, class, primitive, unbox)
        };

        LangMembers {
            object: ObjectMembers::add_to_graph(class_graph, classes),
            class: ClassMembers::add_to_graph(class_graph, classes),
            boolean: wrapper(lang.boolean, BaseType::Boolean, UnqualifiedName::BOOLEANVALUE),
            byte: wrapper(lang.byte, BaseType::Byte, UnqualifiedName::BYTEVALUE),
            short: wrapper(lang.short, BaseType::Short, UnqualifiedName::SHORTVALUE),
            character: wrapper(lang.character, BaseType::Char, UnqualifiedName::CHARVALUE),
            integer: wrapper(lang.integer, BaseType::Int, UnqualifiedName::INTVALUE),
            long: wrapper(lang.long, BaseType::Long, UnqualifiedName::LONGVALUE),
            float: wrapper(lang.float, BaseType::Float, UnqualifiedName::FLOATVALUE),
            double: wrapper(lang.double, BaseType::Double, UnqualifiedName::DOUBLEVALUE),
            void: VoidMembers {
                r#type: class_type_field(class_graph, classes, lang.void),
            },
        }
    }
}

impl<'g> ObjectMembers<'g> {
    fn add_to_graph(class_graph: &ClassGraph<'g>, classes: &JavaClasses<'g>) -> ObjectMembers<'g> {
        let init = class_graph.add_method(MethodData {
            class: classes.lang.object,
            name: UnqualifiedName::INIT,
            descriptor: MethodDescriptor {
                parameters: vec![],
                return_type: None,
            },
            access_flags: MethodAccessFlags::PUBLIC,
        });
        ObjectMembers { init }
    }
}

impl<'g> ClassMembers<'g> {
    fn add_to_graph(class_graph: &ClassGraph<'g>, classes: &JavaClasses<'g>) -> ClassMembers<'g> {
        let lang = &classes.lang;
        let class_array = FieldType::array(FieldType::object(lang.class));

        let get_declared_method = class_graph.add_method(MethodData {
            class: lang.class,
            name: UnqualifiedName::GETDECLAREDMETHOD,
            descriptor: MethodDescriptor {
                parameters: vec![FieldType::object(lang.string), class_array],
                return_type: Some(FieldType::object(lang.reflect.method)),
            },
            access_flags: MethodAccessFlags::PUBLIC | MethodAccessFlags::VARARGS,
        });
        let get_declared_constructor = class_graph.add_method(MethodData {
            class: lang.class,
            name: UnqualifiedName::GETDECLAREDCONSTRUCTOR,
            descriptor: MethodDescriptor {
                parameters: vec![class_array],
                return_type: Some(FieldType::object(lang.reflect.constructor)),
            },
            access_flags: MethodAccessFlags::PUBLIC | MethodAccessFlags::VARARGS,
        });

        ClassMembers {
            get_declared_method,
            get_declared_constructor,
        }
    }
}

impl<'g> BoxMembers<'g> {
    fn add_to_graph(
        class_graph: &ClassGraph<'g>,
        classes: &JavaClasses<'g>,
        class: ClassId<'g>,
        primitive: BaseType,
        unbox_name: UnqualifiedName,
    ) -> BoxMembers<'g> {
        let value_of = class_graph.add_method(MethodData {
            class,
            name: UnqualifiedName::VALUEOF,
            descriptor: MethodDescriptor {
                parameters: vec![FieldType::Base(primitive)],
                return_type: Some(FieldType::object(class)),
            },
            access_flags: MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        });
        let unbox = class_graph.add_method(MethodData {
            class,
            name: unbox_name,
            descriptor: MethodDescriptor {
                parameters: vec![],
                return_type: Some(FieldType::Base(primitive)),
            },
            access_flags: MethodAccessFlags::PUBLIC,
        });

        BoxMembers {
            value_of,
            unbox,
            r#type: class_type_field(class_graph, classes, class),
        }
    }
}

/// The `public static final Class TYPE` field of a wrapper class
fn class_type_field<'g>(
    class_graph: &ClassGraph<'g>,
    classes: &JavaClasses<'g>,
    class: ClassId<'g>,
) -> FieldId<'g> {
    class_graph.add_field(FieldData {
        class,
        name: UnqualifiedName::UPPERCASE_TYPE,
        descriptor: FieldType::object(classes.lang.class),
        access_flags: FieldAccessFlags::PUBLIC | FieldAccessFlags::STATIC | FieldAccessFlags::FINAL,
    })
}
