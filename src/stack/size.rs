use crate::jvm::FieldType;
use crate::util::Width;

/// Number of operand stack (or local variable) slots taken up by a value
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum StackSize {
    /// `void`
    Zero,

    /// Category 1 values: `int` and smaller, `float`, references
    Single,

    /// Category 2 values: `long` and `double`
    Double,
}

impl StackSize {
    pub fn of<C>(field_type: &FieldType<C>) -> StackSize {
        match field_type.width() {
            2 => StackSize::Double,
            _ => StackSize::Single,
        }
    }

    /// Size of a return type, where `None` is `void`
    pub fn of_return<C>(return_type: Option<&FieldType<C>>) -> StackSize {
        return_type.map_or(StackSize::Zero, StackSize::of)
    }

    pub const fn slots(self) -> i32 {
        match self {
            StackSize::Zero => 0,
            StackSize::Single => 1,
            StackSize::Double => 2,
        }
    }

    /// Effect of pushing a value of this size
    pub const fn to_increasing_size(self) -> Size {
        Size::new(self.slots(), self.slots())
    }

    /// Effect of popping a value of this size
    pub const fn to_decreasing_size(self) -> Size {
        Size::new(-self.slots(), 0)
    }

    pub fn maximum(self, other: StackSize) -> StackSize {
        self.max(other)
    }
}

/// Effect of a sequence of instructions on the operand stack
///
/// Both quantities are relative to the stack height just before the first instruction.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Size {
    /// Net change to the stack height
    pub size_impact: i32,

    /// Peak additional height reached at any point
    pub maximal_size: i32,
}

impl Size {
    pub const ZERO: Size = Size::new(0, 0);

    pub const fn new(size_impact: i32, maximal_size: i32) -> Size {
        Size {
            size_impact,
            maximal_size,
        }
    }

    /// Effect of running `self` and then `other`
    ///
    /// The peak of `other` is measured from wherever `self` left the stack.
    pub fn aggregate(self, other: Size) -> Size {
        Size {
            size_impact: self.size_impact + other.size_impact,
            maximal_size: self
                .maximal_size
                .max(self.size_impact + other.maximal_size),
        }
    }
}
