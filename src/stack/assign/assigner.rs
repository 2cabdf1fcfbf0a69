use crate::jvm::class_graph::{Assignable, ClassId, JavaLibrary};
use crate::jvm::{FieldType, RefType};
use crate::stack::assign::{
    DefaultValue, PrimitiveBoxing, PrimitiveUnboxing, PrimitiveWidening, Removal, TypeCasting,
};
use crate::stack::StackManipulation;

/// Whether an assignment may rely on runtime checks
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Typing {
    /// Only assignments that are statically known to succeed
    Static,

    /// Also allow down-casts, which may fail at runtime
    Dynamic,
}

/// Strategy for converting a value of one type into a value of another type
///
/// When the conversion is impossible, the returned manipulation is not valid.
pub trait Assigner<'g> {
    fn assign(
        &self,
        source: &FieldType<ClassId<'g>>,
        target: &FieldType<ClassId<'g>>,
        typing: Typing,
    ) -> StackManipulation<'g>;
}

/// Assigns references along the subtyping relation (casting if typing is dynamic)
///
/// Primitives are only assignable to the same primitive type.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReferenceTypeAwareAssigner;

impl<'g> Assigner<'g> for ReferenceTypeAwareAssigner {
    fn assign(
        &self,
        source: &FieldType<ClassId<'g>>,
        target: &FieldType<ClassId<'g>>,
        typing: Typing,
    ) -> StackManipulation<'g> {
        match (source, target) {
            (FieldType::Ref(source_ref), FieldType::Ref(target_ref)) => {
                if source_ref.is_assignable(target_ref) {
                    StackManipulation::Trivial
                } else if typing == Typing::Dynamic {
                    TypeCasting::to(target)
                } else {
                    StackManipulation::Illegal
                }
            }
            _ if source == target => StackManipulation::Trivial,
            _ => StackManipulation::Illegal,
        }
    }
}

/// Handles widening, boxing, and unboxing, and delegates reference to reference assignments
pub struct PrimitiveTypeAwareAssigner<'a, 'g, A> {
    java: &'a JavaLibrary<'g>,
    reference: A,
}

impl<'a, 'g, A: Assigner<'g>> PrimitiveTypeAwareAssigner<'a, 'g, A> {
    pub fn new(java: &'a JavaLibrary<'g>, reference: A) -> Self {
        PrimitiveTypeAwareAssigner { java, reference }
    }
}

impl<'a, 'g, A: Assigner<'g>> Assigner<'g> for PrimitiveTypeAwareAssigner<'a, 'g, A> {
    fn assign(
        &self,
        source: &FieldType<ClassId<'g>>,
        target: &FieldType<ClassId<'g>>,
        typing: Typing,
    ) -> StackManipulation<'g> {
        match (source, target) {
            (FieldType::Base(source), FieldType::Base(target)) => {
                PrimitiveWidening::between(*source, *target)
            }

            // Box, then treat the wrapper like any other reference
            (FieldType::Base(source), FieldType::Ref(_)) => {
                let boxing = PrimitiveBoxing::for_primitive(self.java, *source);
                let wrapper_type = boxing.wrapper_type();
                StackManipulation::Compound(vec![
                    boxing.into(),
                    self.reference.assign(&wrapper_type, target, typing),
                ])
            }

            // Unbox a known wrapper and widen, or cast to the target's wrapper first
            (FieldType::Ref(source_ref), FieldType::Base(target)) => {
                let unwrapped = match source_ref {
                    RefType::Object(class) => self.java.unwrapped_primitive(*class),
                    _ => None,
                };
                match unwrapped {
                    Some(primitive) => StackManipulation::Compound(vec![
                        PrimitiveUnboxing::for_primitive(self.java, primitive).into(),
                        PrimitiveWidening::between(primitive, *target),
                    ]),
                    None if typing == Typing::Dynamic => {
                        let unboxing = PrimitiveUnboxing::for_primitive(self.java, *target);
                        StackManipulation::Compound(vec![
                            TypeCasting::to(&unboxing.wrapper_type()),
                            unboxing.into(),
                        ])
                    }
                    None => StackManipulation::Illegal,
                }
            }

            (FieldType::Ref(_), FieldType::Ref(_)) => self.reference.assign(source, target, typing),
        }
    }
}

/// Handles `void` on either side, and delegates everything else
///
/// Types are `Option`s, where `None` is `void`.
pub struct VoidAwareAssigner<A> {
    inner: A,
}

impl<'a, 'g> VoidAwareAssigner<PrimitiveTypeAwareAssigner<'a, 'g, ReferenceTypeAwareAssigner>> {
    /// The usual chain: void aware, then primitive aware, then reference aware
    pub fn default_chain(java: &'a JavaLibrary<'g>) -> Self {
        VoidAwareAssigner::new(PrimitiveTypeAwareAssigner::new(
            java,
            ReferenceTypeAwareAssigner,
        ))
    }
}

impl<A> VoidAwareAssigner<A> {
    pub fn new(inner: A) -> Self {
        VoidAwareAssigner { inner }
    }

    /// Assigning a value to `void` discards it. Producing a value out of `void` pushes the
    /// default value, but only if typing is dynamic.
    pub fn assign<'g>(
        &self,
        source: Option<&FieldType<ClassId<'g>>>,
        target: Option<&FieldType<ClassId<'g>>>,
        typing: Typing,
    ) -> StackManipulation<'g>
    where
        A: Assigner<'g>,
    {
        match (source, target) {
            (None, None) => StackManipulation::Trivial,
            (Some(_), None) => Removal::pop(source),
            (None, Some(_)) if typing == Typing::Dynamic => DefaultValue::load(target),
            (None, Some(_)) => StackManipulation::Illegal,
            (Some(source), Some(target)) => self.inner.assign(source, target, typing),
        }
    }
}
