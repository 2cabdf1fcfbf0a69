use crate::jvm::class_file::{Attribute, AttributeLike, Serialize};
use crate::jvm::class_graph::{ClassId, ConstantData, FieldId, MethodId};
use crate::jvm::code::InvokeType;
use crate::jvm::{Error, Name, RefType, RenderDescriptor};
use crate::util::{Offset, OffsetVec, Width};
use byteorder::WriteBytesExt;
use std::borrow::{Borrow, Cow};
use std::collections::HashMap;

/// Class file constants pool builder
///
/// Every lookup is get-or-insert, so asking twice for the same constant yields the same index.
/// Once the class is fully lowered, the pool is consumed into a plain [`OffsetVec`].
pub struct ConstantsPool<'g> {
    constants: OffsetVec<Constant>,

    classes: HashMap<RefType<ClassId<'g>>, ClassConstantIndex>,
    fieldrefs: HashMap<FieldId<'g>, FieldRefConstantIndex>,
    methodrefs: HashMap<MethodId<'g>, MethodRefConstantIndex>,
    strings: HashMap<Utf8ConstantIndex, StringConstantIndex>,
    integers: HashMap<i32, ConstantIndex>,
    floats: HashMap<u32, ConstantIndex>,
    longs: HashMap<i64, ConstantIndex>,
    doubles: HashMap<u64, ConstantIndex>,
    name_and_types: HashMap<(Utf8ConstantIndex, Utf8ConstantIndex), NameAndTypeConstantIndex>,
    utf8s: HashMap<String, Utf8ConstantIndex>,
    method_handles: HashMap<(HandleKind, MethodRefConstantIndex), ConstantIndex>,
}

/// A constant does not fit in the pool
#[derive(Debug)]
pub enum ConstantPoolOverflow {
    /// There is no index left for `constant`
    Full { constant: Constant, offset: u16 },

    /// Modified UTF-8 encoding is longer than the 65535 bytes a `CONSTANT_Utf8` can hold
    Utf8TooLong { length: usize },
}

impl<'g> ConstantsPool<'g> {
    pub fn new() -> ConstantsPool<'g> {
        ConstantsPool {
            constants: OffsetVec::new_starting_at(Offset(1)),
            classes: HashMap::new(),
            fieldrefs: HashMap::new(),
            methodrefs: HashMap::new(),
            strings: HashMap::new(),
            integers: HashMap::new(),
            floats: HashMap::new(),
            longs: HashMap::new(),
            doubles: HashMap::new(),
            name_and_types: HashMap::new(),
            utf8s: HashMap::new(),
            method_handles: HashMap::new(),
        }
    }

    /// Push a constant into the pool, provided there is space for it
    ///
    /// Indexing starts at 1, the constant count is a `u16`, and `long`/`double` take two slots.
    fn push_constant(&mut self, constant: Constant) -> Result<ConstantIndex, ConstantPoolOverflow> {
        let offset = self.constants.offset_len().0;
        if offset + constant.width() > u16::MAX as usize {
            return Err(ConstantPoolOverflow::Full {
                constant,
                offset: offset as u16,
            });
        }

        self.constants.push(constant);
        Ok(ConstantIndex(offset as u16))
    }

    /// Consume the pool and return the final vector of constants
    pub fn into_offset_vec(self) -> OffsetVec<Constant> {
        self.constants
    }

    /// Get or insert a utf8 constant
    ///
    /// The length is checked here, since the serialized length prefix is only a `u16`.
    pub fn get_utf8<'a, S: Into<Cow<'a, str>>>(
        &mut self,
        utf8: S,
    ) -> Result<Utf8ConstantIndex, ConstantPoolOverflow> {
        let cow = utf8.into();

        if let Some(idx) = self.utf8s.get::<str>(cow.borrow()) {
            Ok(*idx)
        } else {
            let length = modified_utf8_len(&cow);
            if length > u16::MAX as usize {
                return Err(ConstantPoolOverflow::Utf8TooLong { length });
            }
            let owned = cow.into_owned();
            let idx = Utf8ConstantIndex(self.push_constant(Constant::Utf8(owned.clone()))?);
            self.utf8s.insert(owned, idx);
            Ok(idx)
        }
    }

    fn get_string(
        &mut self,
        utf8: Utf8ConstantIndex,
    ) -> Result<StringConstantIndex, ConstantPoolOverflow> {
        if let Some(idx) = self.strings.get(&utf8) {
            Ok(*idx)
        } else {
            let idx = StringConstantIndex(self.push_constant(Constant::String(utf8))?);
            self.strings.insert(utf8, idx);
            Ok(idx)
        }
    }

    fn get_name_and_type(
        &mut self,
        name: Utf8ConstantIndex,
        descriptor: Utf8ConstantIndex,
    ) -> Result<NameAndTypeConstantIndex, ConstantPoolOverflow> {
        let key = (name, descriptor);
        if let Some(idx) = self.name_and_types.get(&key) {
            Ok(*idx)
        } else {
            let constant = Constant::NameAndType { name, descriptor };
            let idx = NameAndTypeConstantIndex(self.push_constant(constant)?);
            self.name_and_types.insert(key, idx);
            Ok(idx)
        }
    }

    fn get_method_handle(
        &mut self,
        handle_kind: HandleKind,
        method: MethodRefConstantIndex,
    ) -> Result<ConstantIndex, ConstantPoolOverflow> {
        let key = (handle_kind, method);
        if let Some(idx) = self.method_handles.get(&key) {
            Ok(*idx)
        } else {
            let constant = Constant::MethodHandle {
                handle_kind,
                method,
            };
            let idx = self.push_constant(constant)?;
            self.method_handles.insert(key, idx);
            Ok(idx)
        }
    }

    /// Serialize an attribute, interning its name
    pub fn get_attribute<A: AttributeLike>(&mut self, attribute: A) -> Result<Attribute, Error> {
        let name_index = self.get_utf8(A::NAME)?;
        let mut info = vec![];
        attribute.serialize(&mut info)?;
        Ok(Attribute { name_index, info })
    }
}

impl<'g> Default for ConstantsPool<'g> {
    fn default() -> Self {
        ConstantsPool::new()
    }
}

/// Constants as they appear in the constant pool
///
/// Only the kinds the generator can emit are represented.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.4
#[derive(Debug, Clone)]
pub enum Constant {
    Class(Utf8ConstantIndex),
    FieldRef(ClassConstantIndex, NameAndTypeConstantIndex),

    /// Combines `Methodref` and `InterfaceMethodref`
    MethodRef {
        class: ClassConstantIndex,
        name_and_type: NameAndTypeConstantIndex,
        is_interface: bool,
    },

    /// Object of type `java.lang.String`
    String(Utf8ConstantIndex),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    NameAndType {
        name: Utf8ConstantIndex,
        descriptor: Utf8ConstantIndex,
    },

    /// Raw string data, written out as modified UTF-8
    Utf8(String),

    /// Object of type `java.lang.invoke.MethodHandle`
    MethodHandle {
        handle_kind: HandleKind,
        method: MethodRefConstantIndex,
    },
}

impl Serialize for Constant {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Constant::Utf8(string) => {
                1u8.serialize(writer)?;
                let buffer: Vec<u8> = encode_modified_utf8(string);
                let length = u16::try_from(buffer.len()).map_err(|_| {
                    let msg = format!("utf8 constant of {} bytes", buffer.len());
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, msg)
                })?;
                length.serialize(writer)?;
                writer.write_all(&buffer)?;
            }
            Constant::Integer(integer) => {
                3u8.serialize(writer)?;
                integer.serialize(writer)?;
            }
            Constant::Float(float) => {
                4u8.serialize(writer)?;
                float.to_bits().serialize(writer)?;
            }
            Constant::Long(long) => {
                5u8.serialize(writer)?;
                long.serialize(writer)?;
            }
            Constant::Double(double) => {
                6u8.serialize(writer)?;
                let bits = double.to_bits();
                ((bits >> 32) as u32).serialize(writer)?;
                (bits as u32).serialize(writer)?;
            }
            Constant::Class(name) => {
                7u8.serialize(writer)?;
                name.serialize(writer)?;
            }
            Constant::String(utf8) => {
                8u8.serialize(writer)?;
                utf8.serialize(writer)?;
            }
            Constant::FieldRef(class, name_and_type) => {
                9u8.serialize(writer)?;
                class.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::MethodRef {
                class,
                name_and_type,
                is_interface,
            } => {
                (if *is_interface { 11u8 } else { 10u8 }).serialize(writer)?;
                class.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::NameAndType { name, descriptor } => {
                12u8.serialize(writer)?;
                name.serialize(writer)?;
                descriptor.serialize(writer)?;
            }
            Constant::MethodHandle {
                handle_kind,
                method,
            } => {
                15u8.serialize(writer)?;
                handle_kind.serialize(writer)?;
                method.serialize(writer)?;
            }
        };
        Ok(())
    }
}

/// 8-byte constants take up two entries in the pool: the index after a `long` or `double` is
/// valid but unusable.
impl Width for Constant {
    fn width(&self) -> usize {
        match self {
            Constant::Long(_) | Constant::Double(_) => 2,
            _ => 1,
        }
    }
}

/// Modified UTF-8 format used in class files
///
/// Differs from UTF-8 in that `\u{0000}` takes two bytes and supplementary characters are
/// written as a surrogate pair of 3-byte sequences. See [`DataInput`][0].
///
/// [0]: https://docs.oracle.com/en/java/javase/17/docs/api/java.base/java/io/DataInput.html#modified-utf-8
pub fn encode_modified_utf8(string: &str) -> Vec<u8> {
    let mut buffer: Vec<u8> = Vec::with_capacity(string.len());
    for c in string.chars() {
        let code = c as u32;
        match code {
            0x0001..=0x007F => buffer.push(code as u8),
            0x0000 | 0x0080..=0x07FF => {
                buffer.push(0b1100_0000 | (code >> 6 & 0x1F) as u8);
                buffer.push(0b1000_0000 | (code & 0x3F) as u8);
            }
            0x0800..=0xFFFF => push_three_bytes(&mut buffer, code),
            _ => {
                let offset = code - 0x10000;
                push_three_bytes(&mut buffer, 0xD800 | (offset >> 10));
                push_three_bytes(&mut buffer, 0xDC00 | (offset & 0x3FF));
            }
        }
    }
    buffer
}

/// Length of [`encode_modified_utf8`]'s output, without building it
pub fn modified_utf8_len(string: &str) -> usize {
    string
        .chars()
        .map(|c| match c as u32 {
            0x0001..=0x007F => 1,
            0x0000 | 0x0080..=0x07FF => 2,
            0x0800..=0xFFFF => 3,
            _ => 6,
        })
        .sum()
}

fn push_three_bytes(buffer: &mut Vec<u8>, code: u32) {
    buffer.push(0b1110_0000 | (code >> 12 & 0x0F) as u8);
    buffer.push(0b1000_0000 | (code >> 6 & 0x3F) as u8);
    buffer.push(0b1000_0000 | (code & 0x3F) as u8);
}

macro_rules! constant_index {
    ($($(#[$attr:meta])* $name:ident,)*) => {
        $(
            $(#[$attr])*
            #[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
            pub struct $name(pub ConstantIndex);

            impl From<$name> for ConstantIndex {
                fn from(index: $name) -> ConstantIndex {
                    index.0
                }
            }

            impl Serialize for $name {
                fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
                    self.0.serialize(writer)
                }
            }
        )*
    };
}

/// Index into the constant pool (starting at 1)
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct ConstantIndex(pub u16);

impl Serialize for ConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

constant_index! {
    Utf8ConstantIndex,
    StringConstantIndex,
    NameAndTypeConstantIndex,
    ClassConstantIndex,
    FieldRefConstantIndex,
    MethodRefConstantIndex,
}

/// How a method handle constant invokes its method
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-5.html#jvms-5.4.3.5-220
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum HandleKind {
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

impl Serialize for HandleKind {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        let byte: u8 = match self {
            HandleKind::InvokeVirtual => 5,
            HandleKind::InvokeStatic => 6,
            HandleKind::InvokeSpecial => 7,
            HandleKind::NewInvokeSpecial => 8,
            HandleKind::InvokeInterface => 9,
        };
        byte.serialize(writer)
    }
}

pub trait ConstantsWriter<'g, Index = ConstantIndex> {
    /// Get or insert a constant into the constant pool and return the associated index
    fn constant_index(
        &self,
        constants_pool: &mut ConstantsPool<'g>,
    ) -> Result<Index, ConstantPoolOverflow>;
}

/// `CONSTANT_Class_info` can name array types too (eg. for `checkcast` or `anewarray`)
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se17/html/jvms-4.html#jvms-4.4.1
impl<'g> ConstantsWriter<'g, ClassConstantIndex> for RefType<ClassId<'g>> {
    fn constant_index(
        &self,
        constants: &mut ConstantsPool<'g>,
    ) -> Result<ClassConstantIndex, ConstantPoolOverflow> {
        if let Some(idx) = constants.classes.get(self) {
            Ok(*idx)
        } else {
            let name = match self {
                RefType::Object(class) => constants.get_utf8(class.name.as_str())?,
                other => constants.get_utf8(other.render())?,
            };
            let idx = ClassConstantIndex(constants.push_constant(Constant::Class(name))?);
            constants.classes.insert(*self, idx);
            Ok(idx)
        }
    }
}

impl<'g> ConstantsWriter<'g, ClassConstantIndex> for ClassId<'g> {
    fn constant_index(
        &self,
        constants: &mut ConstantsPool<'g>,
    ) -> Result<ClassConstantIndex, ConstantPoolOverflow> {
        RefType::Object(*self).constant_index(constants)
    }
}

impl<'g> ConstantsWriter<'g, MethodRefConstantIndex> for MethodId<'g> {
    fn constant_index(
        &self,
        constants: &mut ConstantsPool<'g>,
    ) -> Result<MethodRefConstantIndex, ConstantPoolOverflow> {
        if let Some(idx) = constants.methodrefs.get(self) {
            Ok(*idx)
        } else {
            let class = self.class.constant_index(constants)?;
            let name = constants.get_utf8(self.name.as_str())?;
            let descriptor = constants.get_utf8(self.descriptor.render())?;
            let name_and_type = constants.get_name_and_type(name, descriptor)?;
            let constant = Constant::MethodRef {
                class,
                name_and_type,
                is_interface: self.class.is_interface(),
            };
            let idx = MethodRefConstantIndex(constants.push_constant(constant)?);
            constants.methodrefs.insert(*self, idx);
            Ok(idx)
        }
    }
}

impl<'g> ConstantsWriter<'g, FieldRefConstantIndex> for FieldId<'g> {
    fn constant_index(
        &self,
        constants: &mut ConstantsPool<'g>,
    ) -> Result<FieldRefConstantIndex, ConstantPoolOverflow> {
        if let Some(idx) = constants.fieldrefs.get(self) {
            Ok(*idx)
        } else {
            let class = self.class.constant_index(constants)?;
            let name = constants.get_utf8(self.name.as_str())?;
            let descriptor = constants.get_utf8(self.descriptor.render())?;
            let name_and_type = constants.get_name_and_type(name, descriptor)?;
            let constant = Constant::FieldRef(class, name_and_type);
            let idx = FieldRefConstantIndex(constants.push_constant(constant)?);
            constants.fieldrefs.insert(*self, idx);
            Ok(idx)
        }
    }
}

/// Constants which can be pushed with `ldc`, `ldc_w`, or `ldc2_w`
impl<'g> ConstantsWriter<'g, ConstantIndex> for ConstantData<'g> {
    fn constant_index(
        &self,
        constants: &mut ConstantsPool<'g>,
    ) -> Result<ConstantIndex, ConstantPoolOverflow> {
        match self {
            ConstantData::String(string) => {
                let utf8 = constants.get_utf8(string.as_str())?;
                Ok(constants.get_string(utf8)?.into())
            }
            ConstantData::Class(class) => Ok(class.constant_index(constants)?.into()),
            ConstantData::Integer(integer) => {
                if let Some(idx) = constants.integers.get(integer) {
                    Ok(*idx)
                } else {
                    let idx = constants.push_constant(Constant::Integer(*integer))?;
                    constants.integers.insert(*integer, idx);
                    Ok(idx)
                }
            }
            ConstantData::Long(long) => {
                if let Some(idx) = constants.longs.get(long) {
                    Ok(*idx)
                } else {
                    let idx = constants.push_constant(Constant::Long(*long))?;
                    constants.longs.insert(*long, idx);
                    Ok(idx)
                }
            }
            ConstantData::Float(bits) => {
                if let Some(idx) = constants.floats.get(bits) {
                    Ok(*idx)
                } else {
                    let idx = constants.push_constant(Constant::Float(f32::from_bits(*bits)))?;
                    constants.floats.insert(*bits, idx);
                    Ok(idx)
                }
            }
            ConstantData::Double(bits) => {
                if let Some(idx) = constants.doubles.get(bits) {
                    Ok(*idx)
                } else {
                    let idx = constants.push_constant(Constant::Double(f64::from_bits(*bits)))?;
                    constants.doubles.insert(*bits, idx);
                    Ok(idx)
                }
            }
            ConstantData::MethodHandle(method) => {
                let method_idx = method.constant_index(constants)?;
                let handle = match method.infer_invoke_type() {
                    InvokeType::Static => HandleKind::InvokeStatic,
                    InvokeType::Special if method.is_constructor() => HandleKind::NewInvokeSpecial,
                    InvokeType::Special => HandleKind::InvokeSpecial,
                    InvokeType::Interface(_) => HandleKind::InvokeInterface,
                    InvokeType::Virtual => HandleKind::InvokeVirtual,
                };
                constants.get_method_handle(handle, method_idx)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn modified_utf8_null_byte() {
        assert_eq!(encode_modified_utf8("a\x00a"), vec![97, 192, 128, 97]);
    }

    #[test]
    fn modified_utf8_multibyte() {
        assert_eq!(encode_modified_utf8("foo"), vec![102, 111, 111]);
        assert_eq!(encode_modified_utf8("Ą"), vec![196, 132]);
        assert_eq!(encode_modified_utf8("ऄ"), vec![224, 164, 132]);
        assert_eq!(
            encode_modified_utf8("\u{10000}\u{10FFFF}"),
            vec![237, 160, 128, 237, 176, 128, 237, 175, 191, 237, 191, 191]
        );
    }

    #[test]
    fn utf8_constants_are_shared() {
        let mut pool = ConstantsPool::new();
        let first = pool.get_utf8("cachedValue$0").unwrap();
        let second = pool.get_utf8(String::from("cachedValue$0")).unwrap();
        let other = pool.get_utf8("cachedValue$1").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.0, ConstantIndex(1));
        assert_eq!(other.0, ConstantIndex(2));
    }

    #[test]
    fn wide_constants_take_two_slots() {
        let mut pool = ConstantsPool::new();
        let long = ConstantData::Long(1 << 40).constant_index(&mut pool).unwrap();
        let int = ConstantData::Integer(1 << 20).constant_index(&mut pool).unwrap();
        assert_eq!(long, ConstantIndex(1));
        assert_eq!(int, ConstantIndex(3));
    }

    #[test]
    fn floats_are_keyed_by_bits() {
        let mut pool = ConstantsPool::new();
        let positive = ConstantData::Float(0.0f32.to_bits());
        let negative = ConstantData::Float((-0.0f32).to_bits());
        let positive_idx = positive.constant_index(&mut pool).unwrap();
        let negative_idx = negative.constant_index(&mut pool).unwrap();
        assert_ne!(positive_idx, negative_idx);
        assert_eq!(positive.constant_index(&mut pool).unwrap(), positive_idx);
    }

    #[test]
    fn pool_overflow() {
        let mut pool = ConstantsPool::new();
        for i in 0..32767 {
            ConstantData::Long(i).constant_index(&mut pool).unwrap();
        }
        match ConstantData::Long(-1).constant_index(&mut pool) {
            Err(ConstantPoolOverflow::Full { offset, .. }) => assert_eq!(offset, 65535),
            Ok(idx) => panic!("expected overflow, got {:?}", idx),
            Err(other) => panic!("expected a full pool, got {:?}", other),
        }

        // Index 65535 would need a constant count that does not fit in a `u16`
        assert!(ConstantData::Integer(7).constant_index(&mut pool).is_err());
    }

    #[test]
    fn utf8_length_limit() {
        assert_eq!(modified_utf8_len("a\x00\u{0104}\u{0904}\u{10000}"), 1 + 2 + 2 + 3 + 6);

        let mut pool = ConstantsPool::new();
        assert!(pool.get_utf8("a".repeat(65535)).is_ok());
        match pool.get_utf8("a".repeat(70_000)) {
            Err(ConstantPoolOverflow::Utf8TooLong { length }) => assert_eq!(length, 70_000),
            other => panic!("expected an oversized utf8 constant, got {:?}", other),
        }

        // Null characters take two bytes, so 40000 of them do not fit either
        assert!(pool.get_utf8("\x00".repeat(40_000)).is_err());
    }
}
