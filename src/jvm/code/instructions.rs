use crate::jvm::class_file::{
    ClassConstantIndex, ConstantIndex, ConstantPoolOverflow, ConstantsPool, ConstantsWriter,
    FieldRefConstantIndex, MethodRefConstantIndex, Serialize,
};
use crate::jvm::class_graph::{ClassId, ConstantData, FieldId, MethodId};
use crate::jvm::{BaseType, RefType};
use byteorder::WriteBytesExt;
use std::convert::TryFrom;
use std::io::Result;

/// Straight-line JVM bytecode instruction
///
/// Only the instructions the stack manipulations emit are represented. Variants which have
/// several encodings are merged: `Ldc` covers `ldc` and `ldc_w`, and each load covers the
/// `xload_<n>` shortcuts, the indexed form, and the `wide` form. The encoding is picked when
/// serializing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instruction<Class, Constant, Field, Method> {
    AConstNull,
    IConstM1,
    IConst0,
    IConst1,
    IConst2,
    IConst3,
    IConst4,
    IConst5,
    LConst0,
    LConst1,
    FConst0,
    FConst1,
    FConst2,
    DConst0,
    DConst1,
    BiPush(i8),
    SiPush(i16),
    Ldc(Constant),
    Ldc2(Constant),
    ILoad(u16),
    LLoad(u16),
    FLoad(u16),
    DLoad(u16),
    ALoad(u16),
    IAStore,
    LAStore,
    FAStore,
    DAStore,
    AAStore,
    BAStore,
    CAStore,
    SAStore,
    Pop,
    Pop2,
    Dup,
    Dup2,
    I2L,
    I2F,
    I2D,
    L2F,
    L2D,
    F2D,
    GetStatic(Field),
    PutStatic(Field),
    GetField(Field),
    PutField(Field),
    Invoke(InvokeType, Method),
    NewArray(BaseType),
    ANewArray(Class),
    CheckCast(Class),
    IReturn,
    LReturn,
    FReturn,
    DReturn,
    AReturn,
    Return,
}

/// Ways of invoking a method
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InvokeType {
    Static,
    Special,
    Virtual,

    /// Carries the `count` operand: the number of argument slots, including the receiver
    Interface(u8),
}

/// Instruction whose operands refer directly into the class graph
pub type CodeInstruction<'g> =
    Instruction<RefType<ClassId<'g>>, ConstantData<'g>, FieldId<'g>, MethodId<'g>>;

/// Instruction whose operands have been resolved into a constant pool
pub type SerializableInstruction =
    Instruction<ClassConstantIndex, ConstantIndex, FieldRefConstantIndex, MethodRefConstantIndex>;

impl<C, K, F, M> Instruction<C, K, F, M> {
    /// Transform the operands of the instruction, leaving everything else unchanged
    pub fn map<C2, K2, F2, M2, E>(
        &self,
        map_class: impl FnOnce(&C) -> std::result::Result<C2, E>,
        map_constant: impl FnOnce(&K) -> std::result::Result<K2, E>,
        map_field: impl FnOnce(&F) -> std::result::Result<F2, E>,
        map_method: impl FnOnce(&M) -> std::result::Result<M2, E>,
    ) -> std::result::Result<Instruction<C2, K2, F2, M2>, E> {
        use Instruction::*;

        Ok(match self {
            AConstNull => AConstNull,
            IConstM1 => IConstM1,
            IConst0 => IConst0,
            IConst1 => IConst1,
            IConst2 => IConst2,
            IConst3 => IConst3,
            IConst4 => IConst4,
            IConst5 => IConst5,
            LConst0 => LConst0,
            LConst1 => LConst1,
            FConst0 => FConst0,
            FConst1 => FConst1,
            FConst2 => FConst2,
            DConst0 => DConst0,
            DConst1 => DConst1,
            BiPush(b) => BiPush(*b),
            SiPush(s) => SiPush(*s),
            Ldc(constant) => Ldc(map_constant(constant)?),
            Ldc2(constant) => Ldc2(map_constant(constant)?),
            ILoad(idx) => ILoad(*idx),
            LLoad(idx) => LLoad(*idx),
            FLoad(idx) => FLoad(*idx),
            DLoad(idx) => DLoad(*idx),
            ALoad(idx) => ALoad(*idx),
            IAStore => IAStore,
            LAStore => LAStore,
            FAStore => FAStore,
            DAStore => DAStore,
            AAStore => AAStore,
            BAStore => BAStore,
            CAStore => CAStore,
            SAStore => SAStore,
            Pop => Pop,
            Pop2 => Pop2,
            Dup => Dup,
            Dup2 => Dup2,
            I2L => I2L,
            I2F => I2F,
            I2D => I2D,
            L2F => L2F,
            L2D => L2D,
            F2D => F2D,
            GetStatic(field) => GetStatic(map_field(field)?),
            PutStatic(field) => PutStatic(map_field(field)?),
            GetField(field) => GetField(map_field(field)?),
            PutField(field) => PutField(map_field(field)?),
            Invoke(typ, method) => Invoke(*typ, map_method(method)?),
            NewArray(base_type) => NewArray(*base_type),
            ANewArray(class) => ANewArray(map_class(class)?),
            CheckCast(class) => CheckCast(map_class(class)?),
            IReturn => IReturn,
            LReturn => LReturn,
            FReturn => FReturn,
            DReturn => DReturn,
            AReturn => AReturn,
            Return => Return,
        })
    }

    /// Local variable slot read by this instruction, along with the width of the value
    pub fn local_variable(&self) -> Option<(u16, u16)> {
        match self {
            Instruction::ILoad(idx) | Instruction::FLoad(idx) | Instruction::ALoad(idx) => {
                Some((*idx, 1))
            }
            Instruction::LLoad(idx) | Instruction::DLoad(idx) => Some((*idx, 2)),
            _ => None,
        }
    }
}

impl<'g> CodeInstruction<'g> {
    /// Intern the operands of the instruction into a constant pool
    pub fn resolve(
        &self,
        constants: &mut ConstantsPool<'g>,
    ) -> std::result::Result<SerializableInstruction, ConstantPoolOverflow> {
        // Only one of the closures is ever called, but each needs the pool
        let constants = std::cell::RefCell::new(constants);
        self.map(
            |class| class.constant_index(&mut **constants.borrow_mut()),
            |constant| constant.constant_index(&mut **constants.borrow_mut()),
            |field| field.constant_index(&mut **constants.borrow_mut()),
            |method| method.constant_index(&mut **constants.borrow_mut()),
        )
    }
}

/// Loads follow the same pattern:
///
///   - short form (0-3) have dedicated opcodes
///   - normal form (4-255) use the opcode plus a byte operand
///   - wide form (256-65535) use `wide` plus the opcode plus two byte operands
fn serialize_load<W: WriteBytesExt>(
    idx: u16,
    short_form_start: u8,
    normal_form: u8,
    writer: &mut W,
) -> Result<()> {
    match u8::try_from(idx) {
        Ok(n @ 0..=3) => (short_form_start + n).serialize(writer),
        Ok(n) => {
            normal_form.serialize(writer)?;
            n.serialize(writer)
        }
        Err(_) => {
            0xC4u8.serialize(writer)?;
            normal_form.serialize(writer)?;
            idx.serialize(writer)
        }
    }
}

fn serialize_with_index<W: WriteBytesExt>(
    opcode: u8,
    index: impl Into<ConstantIndex>,
    writer: &mut W,
) -> Result<()> {
    opcode.serialize(writer)?;
    index.into().serialize(writer)
}

impl Serialize for SerializableInstruction {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        use Instruction::*;

        let opcode: u8 = match self {
            BiPush(b) => {
                0x10u8.serialize(writer)?;
                return b.serialize(writer);
            }
            SiPush(s) => {
                0x11u8.serialize(writer)?;
                return s.serialize(writer);
            }
            Ldc(idx) => {
                return match u8::try_from(idx.0) {
                    Ok(b) => {
                        0x12u8.serialize(writer)?;
                        b.serialize(writer)
                    }
                    Err(_) => serialize_with_index(0x13, *idx, writer),
                };
            }
            Ldc2(idx) => return serialize_with_index(0x14, *idx, writer),
            ILoad(idx) => return serialize_load(*idx, 0x1A, 0x15, writer),
            LLoad(idx) => return serialize_load(*idx, 0x1E, 0x16, writer),
            FLoad(idx) => return serialize_load(*idx, 0x22, 0x17, writer),
            DLoad(idx) => return serialize_load(*idx, 0x26, 0x18, writer),
            ALoad(idx) => return serialize_load(*idx, 0x2A, 0x19, writer),
            GetStatic(idx) => return serialize_with_index(0xB2, *idx, writer),
            PutStatic(idx) => return serialize_with_index(0xB3, *idx, writer),
            GetField(idx) => return serialize_with_index(0xB4, *idx, writer),
            PutField(idx) => return serialize_with_index(0xB5, *idx, writer),
            Invoke(InvokeType::Virtual, idx) => return serialize_with_index(0xB6, *idx, writer),
            Invoke(InvokeType::Special, idx) => return serialize_with_index(0xB7, *idx, writer),
            Invoke(InvokeType::Static, idx) => return serialize_with_index(0xB8, *idx, writer),
            Invoke(InvokeType::Interface(count), idx) => {
                serialize_with_index(0xB9, *idx, writer)?;
                count.serialize(writer)?;
                return 0u8.serialize(writer);
            }
            NewArray(base_type) => {
                let atype: u8 = match base_type {
                    BaseType::Boolean => 4,
                    BaseType::Char => 5,
                    BaseType::Float => 6,
                    BaseType::Double => 7,
                    BaseType::Byte => 8,
                    BaseType::Short => 9,
                    BaseType::Int => 10,
                    BaseType::Long => 11,
                };
                0xBCu8.serialize(writer)?;
                return atype.serialize(writer);
            }
            ANewArray(idx) => return serialize_with_index(0xBD, *idx, writer),
            CheckCast(idx) => return serialize_with_index(0xC0, *idx, writer),

            AConstNull => 0x01,
            IConstM1 => 0x02,
            IConst0 => 0x03,
            IConst1 => 0x04,
            IConst2 => 0x05,
            IConst3 => 0x06,
            IConst4 => 0x07,
            IConst5 => 0x08,
            LConst0 => 0x09,
            LConst1 => 0x0A,
            FConst0 => 0x0B,
            FConst1 => 0x0C,
            FConst2 => 0x0D,
            DConst0 => 0x0E,
            DConst1 => 0x0F,
            IAStore => 0x4F,
            LAStore => 0x50,
            FAStore => 0x51,
            DAStore => 0x52,
            AAStore => 0x53,
            BAStore => 0x54,
            CAStore => 0x55,
            SAStore => 0x56,
            Pop => 0x57,
            Pop2 => 0x58,
            Dup => 0x59,
            Dup2 => 0x5C,
            I2L => 0x85,
            I2F => 0x86,
            I2D => 0x87,
            L2F => 0x89,
            L2D => 0x8A,
            F2D => 0x8D,
            IReturn => 0xAC,
            LReturn => 0xAD,
            FReturn => 0xAE,
            DReturn => 0xAF,
            AReturn => 0xB0,
            Return => 0xB1,
        };
        opcode.serialize(writer)
    }
}
