use super::java_classes::JavaClasses;
use super::java_members::{BoxMembers, JavaMembers};
use super::{BaseType, ClassGraph, ClassId};

/// The `java.*` classes and members the code generator refers to
pub struct JavaLibrary<'g> {
    pub classes: JavaClasses<'g>,
    pub members: JavaMembers<'g>,
}

impl<'g> JavaLibrary<'g> {
    pub fn add_to_graph(class_graph: &ClassGraph<'g>) -> JavaLibrary<'g> {
        let classes = JavaClasses::add_to_graph(class_graph);
        let members = JavaMembers::add_to_graph(class_graph, &classes);
        JavaLibrary { classes, members }
    }

    /// Wrapper class of a primitive type (eg. `java.lang.Integer` for `int`)
    pub fn wrapper_class(&self, primitive: BaseType) -> ClassId<'g> {
        let lang = &self.classes.lang;
        match primitive {
            BaseType::Boolean => lang.boolean,
            BaseType::Byte => lang.byte,
            BaseType::Short => lang.short,
            BaseType::Char => lang.character,
            BaseType::Int => lang.integer,
            BaseType::Long => lang.long,
            BaseType::Float => lang.float,
            BaseType::Double => lang.double,
        }
    }

    /// Primitive type wrapped by a class, if the class is one of the eight wrappers
    pub fn unwrapped_primitive(&self, class: ClassId<'g>) -> Option<BaseType> {
        BaseType::ALL
            .into_iter()
            .find(|primitive| self.wrapper_class(*primitive) == class)
    }

    /// Boxing members of the wrapper class of a primitive type
    pub fn wrapper_members(&self, primitive: BaseType) -> &BoxMembers<'g> {
        let lang = &self.members.lang;
        match primitive {
            BaseType::Boolean => &lang.boolean,
            BaseType::Byte => &lang.byte,
            BaseType::Short => &lang.short,
            BaseType::Char => &lang.character,
            BaseType::Int => &lang.integer,
            BaseType::Long => &lang.long,
            BaseType::Float => &lang.float,
            BaseType::Double => &lang.double,
        }
    }
}
