use super::{BinaryName, Name};
use crate::util::{RefId, Width};
use std::iter::Peekable;
use std::str::Chars;

/// Utility trait for converting descriptors to string representations
pub trait RenderDescriptor {
    /// Turn the descriptor into a string
    fn render(&self) -> String {
        let mut string = String::new();
        self.render_to(&mut string);
        string
    }

    /// Write the descriptor to a string
    fn render_to(&self, write_to: &mut String);
}

impl<'g, T: RenderDescriptor> RenderDescriptor for RefId<'g, T> {
    fn render_to(&self, write_to: &mut String) {
        self.0.render_to(write_to)
    }
}

/// Reads a descriptor back out of its rendered form
///
/// Errors are plain messages, like the ones from [`Name::from_string`].
pub trait ParseDescriptor: Sized {
    /// Parse a whole string as one descriptor
    fn parse(source: &str) -> Result<Self, String> {
        let mut chars = source.chars().peekable();
        let parsed = Self::parse_from(&mut chars)?;
        match chars.next() {
            None => Ok(parsed),
            Some(c) => Err(format!("Unexpected '{}' after descriptor in '{}'", c, source)),
        }
    }

    /// Consume one descriptor from the front of `source`
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, String>;
}

/// Primitive value types
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    /// Every primitive type, in the order they appear in the JVM specification's table of
    /// descriptors
    pub const ALL: [BaseType; 8] = [
        BaseType::Byte,
        BaseType::Char,
        BaseType::Double,
        BaseType::Float,
        BaseType::Int,
        BaseType::Long,
        BaseType::Short,
        BaseType::Boolean,
    ];

    /// Inverse of the rendered descriptor character
    pub const fn from_descriptor_char(c: char) -> Option<BaseType> {
        match c {
            'B' => Some(BaseType::Byte),
            'C' => Some(BaseType::Char),
            'D' => Some(BaseType::Double),
            'F' => Some(BaseType::Float),
            'I' => Some(BaseType::Int),
            'J' => Some(BaseType::Long),
            'S' => Some(BaseType::Short),
            'Z' => Some(BaseType::Boolean),
            _ => None,
        }
    }
}

impl Width for BaseType {
    fn width(&self) -> usize {
        match self {
            BaseType::Byte
            | BaseType::Char
            | BaseType::Float
            | BaseType::Int
            | BaseType::Short
            | BaseType::Boolean => 1,
            BaseType::Double | BaseType::Long => 2,
        }
    }
}

impl RenderDescriptor for BaseType {
    fn render_to(&self, write_to: &mut String) {
        let c = match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        };
        write_to.push(c);
    }
}

/// Reference type
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum RefType<Class> {
    Object(Class),
    ObjectArray(ArrayType<Class>),
    PrimitiveArray(ArrayType<BaseType>),
}

/// Generic array type
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ArrayType<T> {
    /// Additional dimensions (`A[]` has 0 additional dimensions, `A[][][][]` has 3)
    pub additional_dimensions: usize,

    /// Underlying element type (`A` is the underlying element type of `A[][]`)
    pub element_type: T,
}

impl<T> ArrayType<T> {
    pub fn map<T2>(&self, map_element: impl FnOnce(&T) -> T2) -> ArrayType<T2> {
        ArrayType {
            additional_dimensions: self.additional_dimensions,
            element_type: map_element(&self.element_type),
        }
    }
}

impl<T: RenderDescriptor> RenderDescriptor for ArrayType<T> {
    fn render_to(&self, write_to: &mut String) {
        for _ in 0..=self.additional_dimensions {
            write_to.push('[');
        }
        self.element_type.render_to(write_to);
    }
}

impl RenderDescriptor for BinaryName {
    fn render_to(&self, write_to: &mut String) {
        write_to.push('L');
        write_to.push_str(self.as_str());
        write_to.push(';');
    }
}

/// `L<binary name>;`
impl ParseDescriptor for BinaryName {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, String> {
        if source.next_if_eq(&'L').is_none() {
            return Err(String::from("Object types start with 'L'"));
        }
        let mut name = String::new();
        loop {
            match source.next() {
                Some(';') => return BinaryName::from_string(name),
                Some(c) => name.push(c),
                None => return Err(format!("Missing ';' after 'L{}'", name)),
            }
        }
    }
}

impl<C: RenderDescriptor> RenderDescriptor for RefType<C> {
    fn render_to(&self, write_to: &mut String) {
        match self {
            RefType::Object(cls) => cls.render_to(write_to),
            RefType::PrimitiveArray(arr) => arr.render_to(write_to),
            RefType::ObjectArray(arr) => arr.render_to(write_to),
        }
    }
}

impl<C> RefType<C> {
    pub fn map<C2>(&self, map_class: impl FnOnce(&C) -> C2) -> RefType<C2> {
        match self {
            RefType::Object(cls) => RefType::Object(map_class(cls)),
            RefType::PrimitiveArray(arr) => RefType::PrimitiveArray(*arr),
            RefType::ObjectArray(arr) => RefType::ObjectArray(arr.map(map_class)),
        }
    }

    /// Array type whose elements have the given type
    pub fn array(field_type: FieldType<C>) -> RefType<C> {
        match field_type {
            FieldType::Base(element_type) => RefType::PrimitiveArray(ArrayType {
                additional_dimensions: 0,
                element_type,
            }),
            FieldType::Ref(RefType::Object(element_type)) => RefType::ObjectArray(ArrayType {
                additional_dimensions: 0,
                element_type,
            }),
            FieldType::Ref(RefType::PrimitiveArray(arr)) => RefType::PrimitiveArray(ArrayType {
                additional_dimensions: arr.additional_dimensions + 1,
                element_type: arr.element_type,
            }),
            FieldType::Ref(RefType::ObjectArray(arr)) => RefType::ObjectArray(ArrayType {
                additional_dimensions: arr.additional_dimensions + 1,
                element_type: arr.element_type,
            }),
        }
    }
}

/// Type of a class, instance, or local variable
///
/// There is no `void` here: a method with no return value has `None` as its return type.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum FieldType<Class> {
    Base(BaseType),
    Ref(RefType<Class>),
}

impl<C> Width for FieldType<C> {
    fn width(&self) -> usize {
        match self {
            FieldType::Base(base_type) => base_type.width(),
            FieldType::Ref(_) => 1,
        }
    }
}

impl<C> FieldType<C> {
    pub fn array(field_type: FieldType<C>) -> FieldType<C> {
        FieldType::Ref(RefType::array(field_type))
    }

    pub const fn object(class_name: C) -> FieldType<C> {
        FieldType::Ref(RefType::Object(class_name))
    }

    pub const fn int() -> FieldType<C> {
        FieldType::Base(BaseType::Int)
    }

    pub const fn long() -> FieldType<C> {
        FieldType::Base(BaseType::Long)
    }

    pub const fn float() -> FieldType<C> {
        FieldType::Base(BaseType::Float)
    }

    pub const fn double() -> FieldType<C> {
        FieldType::Base(BaseType::Double)
    }

    pub const fn char() -> FieldType<C> {
        FieldType::Base(BaseType::Char)
    }

    pub const fn short() -> FieldType<C> {
        FieldType::Base(BaseType::Short)
    }

    pub const fn byte() -> FieldType<C> {
        FieldType::Base(BaseType::Byte)
    }

    pub const fn boolean() -> FieldType<C> {
        FieldType::Base(BaseType::Boolean)
    }

    pub fn map<C2>(&self, map_class: impl FnOnce(&C) -> C2) -> FieldType<C2> {
        match self {
            FieldType::Base(base_type) => FieldType::Base(*base_type),
            FieldType::Ref(ref_type) => FieldType::Ref(ref_type.map(map_class)),
        }
    }
}

impl<C: RenderDescriptor> RenderDescriptor for FieldType<C> {
    fn render_to(&self, write_to: &mut String) {
        match self {
            FieldType::Base(base_type) => base_type.render_to(write_to),
            FieldType::Ref(reference_type) => reference_type.render_to(write_to),
        }
    }
}

/// The JVM caps arrays at 255 dimensions
impl<C: ParseDescriptor> ParseDescriptor for FieldType<C> {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, String> {
        let mut dimensions = 0;
        while source.next_if_eq(&'[').is_some() {
            dimensions += 1;
        }
        if dimensions > 255 {
            return Err(format!("Array type has {} dimensions", dimensions));
        }

        let mut field_type = match source.peek().copied() {
            Some('L') => FieldType::object(C::parse_from(source)?),
            Some(c) => match BaseType::from_descriptor_char(c) {
                Some(base_type) => {
                    source.next();
                    FieldType::Base(base_type)
                }
                None => return Err(format!("'{}' does not start a field type", c)),
            },
            None => return Err(String::from("Missing field type")),
        };
        for _ in 0..dimensions {
            field_type = FieldType::array(field_type);
        }
        Ok(field_type)
    }
}

/// Signature of a method
#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub struct MethodDescriptor<Class> {
    pub parameters: Vec<FieldType<Class>>,
    pub return_type: Option<FieldType<Class>>, // `None` is for `void` (ie. no return)
}

impl<C> MethodDescriptor<C> {
    /// Total length of parameters (not the same as the length of the vector),
    /// which must be 255 or less for it to be valid
    pub fn parameter_length(&self, has_this_param: bool) -> usize {
        let this_len = if has_this_param { 1 } else { 0 };
        this_len + self.parameters.iter().map(Width::width).sum::<usize>()
    }
}

impl<C: RenderDescriptor> RenderDescriptor for MethodDescriptor<C> {
    fn render_to(&self, write_to: &mut String) {
        write_to.push('(');
        for parameter in &self.parameters {
            parameter.render_to(write_to);
        }
        write_to.push(')');
        match &self.return_type {
            None => write_to.push('V'),
            Some(typ) => typ.render_to(write_to),
        };
    }
}

#[cfg(test)]
mod test {
    use super::*;

    type FT = FieldType<BinaryName>;

    const INT: FT = FieldType::Base(BaseType::Int);
    const LONG: FT = FieldType::Base(BaseType::Long);
    const DOUBLE: FT = FieldType::Base(BaseType::Double);
    const OBJECT: FT = FieldType::object(BinaryName::OBJECT);
    const CLASS: FT = FieldType::object(BinaryName::CLASS);

    #[test]
    fn rendered_field_types() {
        assert_eq!(LONG.render(), "J");
        assert_eq!(OBJECT.render(), "Ljava/lang/Object;");
        assert_eq!(FieldType::array(FieldType::array(DOUBLE)).render(), "[[D");
        assert_eq!(FieldType::array(CLASS).render(), "[Ljava/lang/Class;");
    }

    #[test]
    fn rendered_method_descriptors() {
        let get_declared_method: MethodDescriptor<BinaryName> = MethodDescriptor {
            parameters: vec![
                FieldType::object(BinaryName::STRING),
                FieldType::array(CLASS),
            ],
            return_type: Some(FieldType::object(BinaryName::METHOD)),
        };
        assert_eq!(
            get_declared_method.render(),
            "(Ljava/lang/String;[Ljava/lang/Class;)Ljava/lang/reflect/Method;"
        );
    }

    #[test]
    fn parsed_field_types() {
        for descriptor in ["Z", "J", "Ljava/lang/Object;", "[[D", "[Ljava/lang/Class;"] {
            assert_eq!(FT::parse(descriptor).unwrap().render(), descriptor);
        }
        assert_eq!(FT::parse("I").unwrap(), INT);
        assert_eq!(
            FT::parse("[[Ljava/lang/Object;").unwrap(),
            FieldType::array(FieldType::array(OBJECT))
        );
    }

    #[test]
    fn malformed_field_types() {
        assert!(FT::parse("").is_err());
        assert!(FT::parse("V").is_err());
        assert!(FT::parse("[").is_err());
        assert!(FT::parse("Ljava/lang/Object").is_err());
        assert!(FT::parse("L;").is_err());
        assert!(FT::parse("II").is_err());
        assert!(FT::parse(&format!("{}I", "[".repeat(255))).is_ok());
        assert!(FT::parse(&format!("{}I", "[".repeat(256))).is_err());
    }

    #[test]
    fn mapped_classes() {
        let lengths = FieldType::array(OBJECT).map(|name| name.as_str().len());
        assert_eq!(lengths, FieldType::array(FieldType::object(16)));
        assert_eq!(LONG.map(|name| name.as_str().len()), FieldType::long());
    }

    #[test]
    fn parameter_length_counts_slots() {
        let descriptor: MethodDescriptor<BinaryName> = MethodDescriptor {
            parameters: vec![LONG, INT, DOUBLE],
            return_type: None,
        };
        assert_eq!(descriptor.parameter_length(false), 5);
        assert_eq!(descriptor.parameter_length(true), 6);
    }
}
