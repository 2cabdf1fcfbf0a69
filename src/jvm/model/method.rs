use crate::jvm::class_file;
use crate::jvm::class_file::{ConstantsPool, Synthetic};
use crate::jvm::class_graph::MethodId;
use crate::jvm::code::Code;
use crate::jvm::{Error, MethodAccessFlags, Name, RenderDescriptor};

/// Semantic representation of a method
pub struct Method<'g> {
    /// The current method
    pub id: MethodId<'g>,

    /// Method code implementation
    ///
    /// Only `abstract` and `native` methods go without one.
    pub code_impl: Option<Code<'g>>,
}

impl<'g> Method<'g> {
    /// Create a new method
    pub fn new(id: MethodId<'g>) -> Method<'g> {
        Method {
            id,
            code_impl: None,
        }
    }

    /// Serialize the method
    pub fn serialize_method(
        self,
        constants_pool: &mut ConstantsPool<'g>,
    ) -> Result<class_file::Method, Error> {
        let access_flags = self.id.access_flags;
        let name_index = constants_pool.get_utf8(self.id.name.as_str())?;
        let descriptor_index = constants_pool.get_utf8(self.id.descriptor.render())?;

        let mut attributes = vec![];

        // `Code` attribute
        if let Some(code) = self.code_impl {
            let code = code.serialize_code(constants_pool)?;
            attributes.push(constants_pool.get_attribute(code)?);
        }

        if access_flags.contains(MethodAccessFlags::SYNTHETIC) {
            attributes.push(constants_pool.get_attribute(Synthetic)?);
        }

        Ok(class_file::Method {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }
}
