use crate::context::Context;
use crate::jvm::class_graph::ConstantData;
use crate::jvm::code::{CodeInstruction, Instruction, InstructionSink};
use crate::stack::Size;
use crate::Error;
use std::hash::{Hash, Hasher};

/// Pushes a `float` literal
///
/// Picking the instruction compares numerically, so `-0.0` is pushed with `fconst_0`. Equality
/// and hashing compare bit patterns (with every NaN treated as the same NaN), so `0.0` and `-0.0`
/// are still different constants when cached.
#[derive(Copy, Clone, Debug)]
pub struct FloatConstant {
    pub value: f32,
}

impl FloatConstant {
    pub const fn for_value(value: f32) -> FloatConstant {
        FloatConstant { value }
    }

    fn bits(&self) -> u32 {
        if self.value.is_nan() {
            f32::NAN.to_bits()
        } else {
            self.value.to_bits()
        }
    }

    pub fn instruction<'g>(&self) -> CodeInstruction<'g> {
        if self.value == 0.0 {
            Instruction::FConst0
        } else if self.value == 1.0 {
            Instruction::FConst1
        } else if self.value == 2.0 {
            Instruction::FConst2
        } else {
            Instruction::Ldc(ConstantData::Float(self.bits()))
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

impl PartialEq for FloatConstant {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for FloatConstant {}

impl Hash for FloatConstant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state)
    }
}

/// Pushes a `double` literal
///
/// Same comparison rules as [`FloatConstant`].
#[derive(Copy, Clone, Debug)]
pub struct DoubleConstant {
    pub value: f64,
}

impl DoubleConstant {
    pub const fn for_value(value: f64) -> DoubleConstant {
        DoubleConstant { value }
    }

    fn bits(&self) -> u64 {
        if self.value.is_nan() {
            f64::NAN.to_bits()
        } else {
            self.value.to_bits()
        }
    }

    pub fn instruction<'g>(&self) -> CodeInstruction<'g> {
        if self.value == 0.0 {
            Instruction::DConst0
        } else if self.value == 1.0 {
            Instruction::DConst1
        } else {
            Instruction::Ldc2(ConstantData::Double(self.bits()))
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

impl PartialEq for DoubleConstant {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for DoubleConstant {}

impl Hash for DoubleConstant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn float_dispatch_is_numeric() {
        assert_eq!(FloatConstant::for_value(0.0).instruction(), Instruction::FConst0);
        assert_eq!(FloatConstant::for_value(-0.0).instruction(), Instruction::FConst0);
        assert_eq!(FloatConstant::for_value(1.0).instruction(), Instruction::FConst1);
        assert_eq!(FloatConstant::for_value(2.0).instruction(), Instruction::FConst2);
        assert_eq!(
            FloatConstant::for_value(0.5).instruction(),
            Instruction::Ldc(ConstantData::Float(0.5f32.to_bits()))
        );
    }

    #[test]
    fn float_equality_is_bitwise() {
        assert_ne!(FloatConstant::for_value(0.0), FloatConstant::for_value(-0.0));
        assert_eq!(
            FloatConstant::for_value(f32::NAN),
            FloatConstant::for_value(-f32::NAN)
        );
        assert_eq!(FloatConstant::for_value(3.5), FloatConstant::for_value(3.5));
    }

    #[test]
    fn double_dispatch() {
        assert_eq!(DoubleConstant::for_value(-0.0).instruction(), Instruction::DConst0);
        assert_eq!(DoubleConstant::for_value(1.0).instruction(), Instruction::DConst1);
        assert_eq!(
            DoubleConstant::for_value(2.0).instruction(),
            Instruction::Ldc2(ConstantData::Double(2.0f64.to_bits()))
        );
        assert_ne!(DoubleConstant::for_value(0.0), DoubleConstant::for_value(-0.0));
    }
}
