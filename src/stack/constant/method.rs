use crate::context::Context;
use crate::jvm::class_graph::{ClassId, JavaLibrary, MethodId};
use crate::jvm::code::{Instruction, InstructionSink, InvokeType};
use crate::jvm::{FieldType, Name, RefType};
use crate::stack::collection::ArrayFactory;
use crate::stack::constant::{ClassConstant, TextConstant};
use crate::stack::{Size, StackManipulation};
use crate::Error;

/// Pushes the `java.lang.reflect.Method` (or `Constructor`) object of a method
///
/// The object is looked up reflectively with `Class.getDeclaredMethod` or
/// `Class.getDeclaredConstructor`, so it is worth caching.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MethodConstant<'g> {
    pub method: MethodId<'g>,

    /// `Class[]` of the parameter types
    parameter_types: ArrayFactory<'g>,

    /// `getDeclaredMethod` or `getDeclaredConstructor`
    lookup: MethodId<'g>,

    /// `Method` or `Constructor`
    reflected_type: ClassId<'g>,
}

impl<'g> MethodConstant<'g> {
    /// Fails for the type initializer, which is not visible through reflection
    pub fn for_method(
        java: &JavaLibrary<'g>,
        method: MethodId<'g>,
    ) -> Result<MethodConstant<'g>, Error> {
        if method.is_type_initializer() {
            return Err(Error::TypeInitializerConstant(format!("{:?}", method)));
        }

        let parameter_types = ArrayFactory::new(
            FieldType::object(java.classes.lang.class),
            method
                .descriptor
                .parameters
                .iter()
                .map(|parameter| ClassConstant::of(java, parameter).into())
                .collect(),
        );
        let (lookup, reflected_type) = if method.is_constructor() {
            (
                java.members.lang.class.get_declared_constructor,
                java.classes.lang.reflect.constructor,
            )
        } else {
            (
                java.members.lang.class.get_declared_method,
                java.classes.lang.reflect.method,
            )
        };

        Ok(MethodConstant {
            method,
            parameter_types,
            lookup,
            reflected_type,
        })
    }

    /// Type of the value pushed
    pub fn reflected_type(&self) -> FieldType<ClassId<'g>> {
        FieldType::object(self.reflected_type)
    }

    /// Load the constant once into a static field, then read the field every time
    pub fn cached(self) -> StackManipulation<'g> {
        let field_type = self.reflected_type();
        StackManipulation::from(self).cached(field_type)
    }

    pub fn apply<S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        let mut prepare = ClassConstant::Literal(RefType::Object(self.method.class))
            .apply(sink, context)?;
        if !self.method.is_constructor() {
            let name = TextConstant::new(self.method.name.as_str());
            prepare = prepare.aggregate(name.apply(sink, context)?);
        }
        let array = self.parameter_types.apply(sink, context)?;
        sink.push_instruction(Instruction::Invoke(InvokeType::Virtual, self.lookup))?;

        Ok(Size::new(1, prepare.aggregate(array).maximal_size))
    }
}
