//! Composable units of bytecode with a known effect on the operand stack
//!
//! ### Structure
//!
//! A [`StackManipulation`] is a plain value: it can be compared, hashed (which is what makes
//! constant caching work), and built up ahead of time. Nothing is emitted until it is applied, at
//! which point it pushes its instructions into an [`InstructionSink`] and reports its [`Size`].
//!
//! Manipulations compose with [`StackManipulation::Compound`]. The size of a compound is the
//! aggregate of the sizes of its parts, so the maximum stack depth of a whole method body falls
//! out of applying its manipulation.
//!
//! ### Validity
//!
//! Some manipulations describe impossible operations (eg. narrowing a `double` into an `int` with
//! a widening conversion). These are constructed without failing, but are not valid. Check
//! [`StackManipulation::is_valid`] before applying: applying an invalid manipulation fails.

use crate::context::Context;
use crate::jvm::class_graph::ClassId;
use crate::jvm::code::InstructionSink;
use crate::jvm::FieldType;
use crate::Error;

pub mod assign;
pub mod collection;
pub mod constant;
pub mod member;
mod size;

pub use size::*;

use assign::{
    Duplication, PrimitiveBoxing, PrimitiveUnboxing, PrimitiveWidening, Removal, TypeCasting,
};
use collection::ArrayFactory;
use constant::{
    CachedConstant, ClassConstant, DoubleConstant, FloatConstant, IntegerConstant, LongConstant,
    MethodConstant, MethodHandleConstant, NullConstant, TextConstant,
};
use member::{FieldAccessor, MethodInvocation, MethodReturn, VariableLoad};

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum StackManipulation<'g> {
    /// Impossible operation: never valid
    Illegal,

    /// Valid, emits nothing
    Trivial,

    /// Children applied in order
    Compound(Vec<StackManipulation<'g>>),

    IntegerConstant(IntegerConstant),
    LongConstant(LongConstant),
    FloatConstant(FloatConstant),
    DoubleConstant(DoubleConstant),
    TextConstant(TextConstant),
    NullConstant(NullConstant),
    ClassConstant(ClassConstant<'g>),
    MethodConstant(MethodConstant<'g>),
    MethodHandleConstant(MethodHandleConstant<'g>),
    Cached(CachedConstant<'g>),

    ArrayFactory(ArrayFactory<'g>),

    FieldAccess(FieldAccessor<'g>),
    VariableLoad(VariableLoad),
    MethodInvocation(MethodInvocation<'g>),
    MethodReturn(MethodReturn),

    PrimitiveWidening(PrimitiveWidening),
    TypeCasting(TypeCasting<'g>),
    PrimitiveBoxing(PrimitiveBoxing<'g>),
    PrimitiveUnboxing(PrimitiveUnboxing<'g>),
    Removal(Removal),
    Duplication(Duplication),
}

impl<'g> StackManipulation<'g> {
    /// Can this manipulation be applied?
    pub fn is_valid(&self) -> bool {
        match self {
            StackManipulation::Illegal => false,
            StackManipulation::Compound(children) => children.iter().all(Self::is_valid),
            StackManipulation::Cached(cached) => cached.is_valid(),
            StackManipulation::ArrayFactory(factory) => factory.is_valid(),
            _ => true,
        }
    }

    /// Emit the instructions and compute their effect on the stack
    ///
    /// Compounds apply every child, even after a child that reports a surprising size. Validity
    /// is meant to be checked once, up front.
    pub fn apply<S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        match self {
            StackManipulation::Illegal => Err(Error::IllegalStackManipulation),
            StackManipulation::Trivial => Ok(Size::ZERO),
            StackManipulation::Compound(children) => {
                let mut size = Size::ZERO;
                for child in children {
                    size = size.aggregate(child.apply(sink, context)?);
                }
                Ok(size)
            }

            StackManipulation::IntegerConstant(constant) => constant.apply(sink, context),
            StackManipulation::LongConstant(constant) => constant.apply(sink, context),
            StackManipulation::FloatConstant(constant) => constant.apply(sink, context),
            StackManipulation::DoubleConstant(constant) => constant.apply(sink, context),
            StackManipulation::TextConstant(constant) => constant.apply(sink, context),
            StackManipulation::NullConstant(constant) => constant.apply(sink, context),
            StackManipulation::ClassConstant(constant) => constant.apply(sink, context),
            StackManipulation::MethodConstant(constant) => constant.apply(sink, context),
            StackManipulation::MethodHandleConstant(constant) => constant.apply(sink, context),
            StackManipulation::Cached(cached) => cached.apply(sink, context),

            StackManipulation::ArrayFactory(factory) => factory.apply(sink, context),

            StackManipulation::FieldAccess(access) => access.apply(sink, context),
            StackManipulation::VariableLoad(load) => load.apply(sink, context),
            StackManipulation::MethodInvocation(invocation) => invocation.apply(sink, context),
            StackManipulation::MethodReturn(ret) => ret.apply(sink, context),

            StackManipulation::PrimitiveWidening(widening) => widening.apply(sink, context),
            StackManipulation::TypeCasting(casting) => casting.apply(sink, context),
            StackManipulation::PrimitiveBoxing(boxing) => boxing.apply(sink, context),
            StackManipulation::PrimitiveUnboxing(unboxing) => unboxing.apply(sink, context),
            StackManipulation::Removal(removal) => removal.apply(sink, context),
            StackManipulation::Duplication(duplication) => duplication.apply(sink, context),
        }
    }

    /// Compute the value once, in the type initializer, and read it from a static field of the
    /// given type afterwards
    pub fn cached(self, field_type: FieldType<ClassId<'g>>) -> StackManipulation<'g> {
        StackManipulation::Cached(CachedConstant::new(self, field_type))
    }
}

macro_rules! from_leaf {
    ($($variant:ident($leaf:ty),)*) => {
        $(
            impl<'g> From<$leaf> for StackManipulation<'g> {
                fn from(leaf: $leaf) -> StackManipulation<'g> {
                    StackManipulation::$variant(leaf)
                }
            }
        )*
    };
}

from_leaf! {
    IntegerConstant(IntegerConstant),
    LongConstant(LongConstant),
    FloatConstant(FloatConstant),
    DoubleConstant(DoubleConstant),
    TextConstant(TextConstant),
    NullConstant(NullConstant),
    ClassConstant(ClassConstant<'g>),
    MethodConstant(MethodConstant<'g>),
    MethodHandleConstant(MethodHandleConstant<'g>),
    Cached(CachedConstant<'g>),
    ArrayFactory(ArrayFactory<'g>),
    FieldAccess(FieldAccessor<'g>),
    VariableLoad(VariableLoad),
    MethodInvocation(MethodInvocation<'g>),
    MethodReturn(MethodReturn),
    PrimitiveWidening(PrimitiveWidening),
    TypeCasting(TypeCasting<'g>),
    PrimitiveBoxing(PrimitiveBoxing<'g>),
    PrimitiveUnboxing(PrimitiveUnboxing<'g>),
    Removal(Removal),
    Duplication(Duplication),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_graph::{ClassGraph, ClassGraphArenas};
    use crate::jvm::code::{CodeInstruction, Instruction};

    #[test]
    fn illegal_and_trivial() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();
        let mut context = Context::new(&class_graph, java.classes.lang.object);
        let mut sink: Vec<CodeInstruction> = vec![];

        assert!(!StackManipulation::Illegal.is_valid());
        assert!(matches!(
            StackManipulation::Illegal.apply(&mut sink, &mut context),
            Err(Error::IllegalStackManipulation)
        ));

        assert!(StackManipulation::Trivial.is_valid());
        assert_eq!(
            StackManipulation::Trivial.apply(&mut sink, &mut context).unwrap(),
            Size::ZERO
        );
        assert!(sink.is_empty());

        let compound = StackManipulation::Compound(vec![
            StackManipulation::Trivial,
            StackManipulation::Illegal,
        ]);
        assert!(!compound.is_valid());
        assert!(StackManipulation::Compound(vec![]).is_valid());
    }

    #[test]
    fn compound_sizes_aggregate() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();
        let mut context = Context::new(&class_graph, java.classes.lang.object);

        // (2,2) then (-1,0) then (1,1)
        let a: StackManipulation = LongConstant::for_value(7).into();
        let b: StackManipulation = PrimitiveWidening::LongToFloat.into();
        let c: StackManipulation = IntegerConstant::for_value(1).into();

        let flat = StackManipulation::Compound(vec![a.clone(), b.clone(), c.clone()]);
        let left = StackManipulation::Compound(vec![
            StackManipulation::Compound(vec![a.clone(), b.clone()]),
            c.clone(),
        ]);
        let right = StackManipulation::Compound(vec![a, StackManipulation::Compound(vec![b, c])]);

        let mut sizes = vec![];
        for manipulation in [flat, left, right] {
            let mut sink: Vec<CodeInstruction> = vec![];
            sizes.push(manipulation.apply(&mut sink, &mut context).unwrap());
            assert_eq!(
                sink,
                vec![
                    Instruction::Ldc2(crate::jvm::class_graph::ConstantData::Long(7)),
                    Instruction::L2F,
                    Instruction::IConst1,
                ]
            );
        }
        assert_eq!(sizes, vec![Size::new(2, 2); 3]);
    }

    #[test]
    fn equality_is_structural() {
        let a = StackManipulation::Compound(vec![
            TextConstant::new("hello").into(),
            IntegerConstant::for_value(3).into(),
        ]);
        let b = StackManipulation::Compound(vec![
            TextConstant::new(String::from("hello")).into(),
            IntegerConstant::for_value(3).into(),
        ]);
        assert_eq!(a, b);
        assert_ne!(a, StackManipulation::Compound(vec![]));
    }
}
