use crate::context::Context;
use crate::jvm::class_graph::ConstantData;
use crate::jvm::code::{CodeInstruction, Instruction, InstructionSink};
use crate::jvm::BaseType;
use crate::stack::Size;
use crate::Error;
use std::convert::TryFrom;

/// Pushes an `int` (or `boolean`, `byte`, `short`, `char`) literal
///
/// The cheapest encoding is picked: `iconst_<n>`, then `bipush`, then `sipush`, and finally a
/// constant pool entry.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct IntegerConstant {
    pub value: i32,
}

impl IntegerConstant {
    pub const fn for_value(value: i32) -> IntegerConstant {
        IntegerConstant { value }
    }

    pub const fn for_boolean(value: bool) -> IntegerConstant {
        IntegerConstant {
            value: value as i32,
        }
    }

    /// Literal of a primitive type that lives on the stack as an `int`
    ///
    /// Fails if the value is not in the range of the type. `long`, `float`, and `double` have
    /// dedicated constants and always fail here.
    pub fn for_primitive(value: i64, primitive: BaseType) -> Result<IntegerConstant, Error> {
        let (min, max) = match primitive {
            BaseType::Boolean => (0, 1),
            BaseType::Byte => (i8::MIN as i64, i8::MAX as i64),
            BaseType::Short => (i16::MIN as i64, i16::MAX as i64),
            BaseType::Char => (u16::MIN as i64, u16::MAX as i64),
            BaseType::Int => (i32::MIN as i64, i32::MAX as i64),
            BaseType::Long | BaseType::Float | BaseType::Double => (1, 0),
        };
        if value < min || value > max {
            return Err(Error::ConstantOutOfRange { value, primitive });
        }
        Ok(IntegerConstant {
            value: value as i32,
        })
    }

    pub fn instruction<'g>(&self) -> CodeInstruction<'g> {
        match self.value {
            -1 => Instruction::IConstM1,
            0 => Instruction::IConst0,
            1 => Instruction::IConst1,
            2 => Instruction::IConst2,
            3 => Instruction::IConst3,
            4 => Instruction::IConst4,
            5 => Instruction::IConst5,
            value => match (i8::try_from(value), i16::try_from(value)) {
                (Ok(byte), _) => Instruction::BiPush(byte),
                (_, Ok(short)) => Instruction::SiPush(short),
                _ => Instruction::Ldc(ConstantData::Integer(value)),
            },
        }
    }

    pub fn apply<'g, S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        sink.push_instruction(self.instruction())?;
        Ok(Size::new(1, 1))
    }
}

/// Pushes a `long` literal
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct LongConstant {
    pub value: i64,
}

impl LongConstant {
    pub const fn for_value(value: i64) -> LongConstant {
        LongConstant { value }
    }

    pub fn instruction<'g>(&self) -> CodeInstruction<'g> {
        match self.value {
            0 => Instruction::LConst0,
            1 => Instruction::LConst1,
            value => Instruction::Ldc2(ConstantData::Long(value)),
        }
    }

    pub fn apply<'g, S: InstructionSink<'g> + ?Sized>(
        &self,
        sink: &mut S,
        _context: &mut Context<'g>,
    ) -> Result<Size, Error> {
        sink.push_instruction(self.instruction())?;
        Ok(Size::new(2, 2))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_graph::{ClassGraph, ClassGraphArenas};

    #[test]
    fn integer_encodings() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();
        let mut context = Context::new(&class_graph, java.classes.lang.object);

        let expected = [
            (-129, Instruction::SiPush(-129)),
            (-128, Instruction::BiPush(-128)),
            (-2, Instruction::BiPush(-2)),
            (-1, Instruction::IConstM1),
            (0, Instruction::IConst0),
            (1, Instruction::IConst1),
            (5, Instruction::IConst5),
            (6, Instruction::BiPush(6)),
            (127, Instruction::BiPush(127)),
            (128, Instruction::SiPush(128)),
            (32767, Instruction::SiPush(32767)),
            (-32768, Instruction::SiPush(-32768)),
            (32768, Instruction::Ldc(ConstantData::Integer(32768))),
            (-32769, Instruction::Ldc(ConstantData::Integer(-32769))),
            (i32::MAX, Instruction::Ldc(ConstantData::Integer(i32::MAX))),
        ];
        for (value, instruction) in expected {
            let mut sink = vec![];
            let size = IntegerConstant::for_value(value)
                .apply(&mut sink, &mut context)
                .unwrap();
            assert_eq!(size, Size::new(1, 1));
            assert_eq!(sink, vec![instruction]);
        }
    }

    #[test]
    fn primitive_ranges() {
        assert!(IntegerConstant::for_primitive(1, BaseType::Boolean).is_ok());
        assert!(IntegerConstant::for_primitive(2, BaseType::Boolean).is_err());
        assert!(IntegerConstant::for_primitive(-128, BaseType::Byte).is_ok());
        assert!(IntegerConstant::for_primitive(128, BaseType::Byte).is_err());
        assert!(IntegerConstant::for_primitive(65535, BaseType::Char).is_ok());
        assert!(IntegerConstant::for_primitive(-1, BaseType::Char).is_err());
        assert!(IntegerConstant::for_primitive(-32769, BaseType::Short).is_err());
        assert!(IntegerConstant::for_primitive(1 << 31, BaseType::Int).is_err());
        assert!(IntegerConstant::for_primitive(0, BaseType::Long).is_err());

        match IntegerConstant::for_primitive(300, BaseType::Byte) {
            Err(Error::ConstantOutOfRange { value, primitive }) => {
                assert_eq!(value, 300);
                assert_eq!(primitive, BaseType::Byte);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            IntegerConstant::for_boolean(true),
            IntegerConstant::for_value(1)
        );
    }

    #[test]
    fn long_encodings() {
        assert_eq!(LongConstant::for_value(0).instruction(), Instruction::LConst0);
        assert_eq!(LongConstant::for_value(1).instruction(), Instruction::LConst1);
        assert_eq!(
            LongConstant::for_value(-1).instruction(),
            Instruction::Ldc2(ConstantData::Long(-1))
        );
    }
}
