use crate::jvm::class_graph::ClassId;
use crate::jvm::{BinaryName, RefType};
use crate::util::RefId;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Subtyping relationship between types
pub trait Assignable {
    /// Is the first type assignable to the second?
    fn is_assignable(&self, super_type: &Self) -> bool;
}

/// Walks superclasses (and super-interfaces, when the target is an interface) looking for the
/// target class
impl<'g> Assignable for ClassId<'g> {
    fn is_assignable(&self, super_type: &ClassId<'g>) -> bool {
        if super_type.superclass.is_none() && !super_type.is_interface() {
            return true; // everything is an `Object`
        }

        let search_interfaces = super_type.is_interface();
        let mut to_visit: Vec<ClassId<'g>> = vec![*self];
        let mut visited: HashSet<ClassId<'g>> = HashSet::new();

        while let Some(class) = to_visit.pop() {
            if class == *super_type {
                return true;
            }
            if !visited.insert(class) {
                continue;
            }
            let class_data = class.0;
            to_visit.extend(class_data.superclass);
            if search_interfaces {
                to_visit.extend(class_data.interfaces.iter().map(RefId));
            }
        }

        false
    }
}

/// Matches the `isJavaAssignable` predicate of the JVM verifier, including the covariance of
/// object arrays
impl<'g> Assignable for RefType<ClassId<'g>> {
    fn is_assignable(&self, super_type: &RefType<ClassId<'g>>) -> bool {
        match (self, super_type) {
            (RefType::Object(sub), RefType::Object(sup)) => sub.is_assignable(sup),
            (RefType::Object(_), _) => false,

            (_, RefType::Object(sup)) => is_array_supertype(&sup.name),

            (RefType::PrimitiveArray(sub), RefType::PrimitiveArray(sup)) => sub == sup,

            (RefType::ObjectArray(sub), RefType::ObjectArray(sup)) => {
                match sub.additional_dimensions.cmp(&sup.additional_dimensions) {
                    Ordering::Less => false,
                    Ordering::Equal => sub.element_type.is_assignable(&sup.element_type),
                    Ordering::Greater => is_array_supertype(&sup.element_type.name),
                }
            }

            // `int[][]` is an `Object[]`, since `int[]` is an `Object`
            (RefType::PrimitiveArray(sub), RefType::ObjectArray(sup)) => {
                sub.additional_dimensions > sup.additional_dimensions
                    && is_array_supertype(&sup.element_type.name)
            }

            (RefType::ObjectArray(_), RefType::PrimitiveArray(_)) => false,
        }
    }
}

/// Arrays have exactly three supertypes that are not themselves arrays
fn is_array_supertype(name: &BinaryName) -> bool {
    name == &BinaryName::OBJECT
        || name == &BinaryName::CLONEABLE
        || name == &BinaryName::SERIALIZABLE
}

#[cfg(test)]
mod test {
    use crate::jvm::class_graph::{Assignable, ClassGraph, ClassGraphArenas};
    use crate::jvm::{FieldType, RefType};

    #[test]
    fn wrappers_and_interfaces() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();
        let lang = &java.classes.lang;

        assert!(lang.integer.is_assignable(&lang.number));
        assert!(lang.integer.is_assignable(&lang.object));
        assert!(lang.integer.is_assignable(&lang.comparable));
        assert!(lang.integer.is_assignable(&java.classes.io.serializable));
        assert!(lang.string.is_assignable(&lang.char_sequence));
        assert!(lang.char_sequence.is_assignable(&lang.object));

        assert!(!lang.number.is_assignable(&lang.integer));
        assert!(!lang.object.is_assignable(&lang.string));
        assert!(!lang.boolean.is_assignable(&lang.number));
        assert!(!lang.reflect.method.is_assignable(&lang.reflect.constructor));
        assert!(lang.reflect.constructor.is_assignable(&lang.reflect.executable));
    }

    #[test]
    fn arrays() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();
        let lang = &java.classes.lang;

        let object = RefType::Object(lang.object);
        let cloneable = RefType::Object(lang.cloneable);
        let int_array = RefType::array(FieldType::int());
        let nested_int_array = RefType::array(FieldType::array(FieldType::int()));
        let object_array = RefType::array(FieldType::object(lang.object));
        let integer_array = RefType::array(FieldType::object(lang.integer));
        let number_array = RefType::array(FieldType::object(lang.number));
        let class_array = RefType::array(FieldType::object(lang.class));

        assert!(int_array.is_assignable(&object));
        assert!(int_array.is_assignable(&cloneable));
        assert!(!object.is_assignable(&int_array));
        assert!(!int_array.is_assignable(&RefType::array(FieldType::long())));

        assert!(integer_array.is_assignable(&number_array));
        assert!(!number_array.is_assignable(&integer_array));
        assert!(class_array.is_assignable(&object_array));
        assert!(nested_int_array.is_assignable(&object_array));
        assert!(!int_array.is_assignable(&object_array));
        assert!(!object_array.is_assignable(&nested_int_array));
    }
}
