use super::{BinaryName, ClassAccessFlags, ClassData, ClassGraph, ClassId};
use elsa::FrozenVec;

/// Classes inside `java.*`
pub struct JavaClasses<'g> {
    pub lang: LangClasses<'g>,
    pub io: IoClasses<'g>,
}

/// Classes inside `java.lang.*`
pub struct LangClasses<'g> {
    pub object: ClassId<'g>,
    pub cloneable: ClassId<'g>,
    pub comparable: ClassId<'g>,
    pub char_sequence: ClassId<'g>,
    pub string: ClassId<'g>,
    pub class: ClassId<'g>,
    pub number: ClassId<'g>,
    pub boolean: ClassId<'g>,
    pub byte: ClassId<'g>,
    pub short: ClassId<'g>,
    pub character: ClassId<'g>,
    pub integer: ClassId<'g>,
    pub long: ClassId<'g>,
    pub float: ClassId<'g>,
    pub double: ClassId<'g>,
    pub void: ClassId<'g>,
    pub reflect: ReflectClasses<'g>,
}

/// Classes inside `java.lang.reflect.*`
pub struct ReflectClasses<'g> {
    pub accessible_object: ClassId<'g>,
    pub executable: ClassId<'g>,
    pub method: ClassId<'g>,
    pub constructor: ClassId<'g>,
}

/// Classes inside `java.io.*`
pub struct IoClasses<'g> {
    pub serializable: ClassId<'g>,
}

const PUBLIC_CLASS: ClassAccessFlags = ClassAccessFlags::from_bits_truncate(
    ClassAccessFlags::PUBLIC.bits() | ClassAccessFlags::SUPER.bits(),
);
const FINAL_CLASS: ClassAccessFlags = ClassAccessFlags::from_bits_truncate(
    PUBLIC_CLASS.bits() | ClassAccessFlags::FINAL.bits(),
);
const INTERFACE: ClassAccessFlags = ClassAccessFlags::from_bits_truncate(
    ClassAccessFlags::PUBLIC.bits()
        | ClassAccessFlags::INTERFACE.bits()
        | ClassAccessFlags::ABSTRACT.bits(),
);

impl<'g> JavaClasses<'g> {
    pub fn add_to_graph(class_graph: &ClassGraph<'g>) -> JavaClasses<'g> {
        let object = class_graph.add_class(ClassData {
            name: BinaryName::OBJECT,
            superclass: None,
            interfaces: FrozenVec::new(),
            access_flags: PUBLIC_CLASS,
            methods: FrozenVec::new(),
            fields: FrozenVec::new(),
        });
        let io = IoClasses {
            serializable: class_graph.add_class(ClassData::new(
                BinaryName::SERIALIZABLE,
                object,
                INTERFACE,
            )),
        };
        let lang = LangClasses::add_to_graph(class_graph, object, &io);

        JavaClasses { lang, io }
    }
}

impl<'g> LangClasses<'g> {
    fn add_to_graph(
        class_graph: &ClassGraph<'g>,
        object: ClassId<'g>,
        io: &IoClasses<'g>,
    ) -> LangClasses<'g> {
        let interface = |name| class_graph.add_class(ClassData::new(name, object, INTERFACE));
        let cloneable = interface(BinaryName::CLONEABLE);
        let comparable = interface(BinaryName::COMPARABLE);
        let char_sequence = interface(BinaryName::CHARSEQUENCE);

        let declare = |name, superclass: ClassId<'g>, flags, interfaces: &[ClassId<'g>]| {
            let declared = class_graph.add_class(ClassData::new(name, superclass, flags));
            for interface in interfaces {
                declared.interfaces.push(*interface);
            }
            declared
        };
        let serializable = io.serializable;
        let comparable_value = [serializable, comparable];

        let string = declare(
            BinaryName::STRING,
            object,
            FINAL_CLASS,
            &[serializable, comparable, char_sequence],
        );
        let number = declare(BinaryName::NUMBER, object, PUBLIC_CLASS, &[serializable]);

        LangClasses {
            object,
            cloneable,
            comparable,
            char_sequence,
            string,
            class: declare(BinaryName::CLASS, object, FINAL_CLASS, &[serializable]),
            number,
            boolean: declare(BinaryName::BOOLEAN, object, FINAL_CLASS, &comparable_value),
            byte: declare(BinaryName::BYTE, number, FINAL_CLASS, &[comparable]),
            short: declare(BinaryName::SHORT, number, FINAL_CLASS, &[comparable]),
            character: declare(BinaryName::CHARACTER, object, FINAL_CLASS, &comparable_value),
            integer: declare(BinaryName::INTEGER, number, FINAL_CLASS, &[comparable]),
            long: declare(BinaryName::LONG, number, FINAL_CLASS, &[comparable]),
            float: declare(BinaryName::FLOAT, number, FINAL_CLASS, &[comparable]),
            double: declare(BinaryName::DOUBLE, number, FINAL_CLASS, &[comparable]),
            void: declare(BinaryName::VOID, object, FINAL_CLASS, &[]),
            reflect: ReflectClasses::add_to_graph(class_graph, object),
        }
    }
}

impl<'g> ReflectClasses<'g> {
    fn add_to_graph(class_graph: &ClassGraph<'g>, object: ClassId<'g>) -> ReflectClasses<'g> {
        let accessible_object = class_graph.add_class(ClassData::new(
            BinaryName::ACCESSIBLEOBJECT,
            object,
            PUBLIC_CLASS,
        ));
        let executable = class_graph.add_class(ClassData::new(
            BinaryName::EXECUTABLE,
            accessible_object,
            PUBLIC_CLASS | ClassAccessFlags::ABSTRACT,
        ));
        let method = class_graph.add_class(ClassData::new(
            BinaryName::METHOD,
            executable,
            FINAL_CLASS,
        ));
        let constructor = class_graph.add_class(ClassData::new(
            BinaryName::CONSTRUCTOR,
            executable,
            FINAL_CLASS,
        ));

        ReflectClasses {
            accessible_object,
            executable,
            method,
            constructor,
        }
    }
}
