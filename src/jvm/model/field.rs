use crate::jvm::class_file;
use crate::jvm::class_file::{ConstantsPool, Synthetic};
use crate::jvm::class_graph::FieldId;
use crate::jvm::{Error, FieldAccessFlags, Name, RenderDescriptor};

/// Semantic representation of a field
pub struct Field<'g> {
    /// The current field
    pub id: FieldId<'g>,
}

impl<'g> Field<'g> {
    pub fn new(id: FieldId<'g>) -> Field<'g> {
        Field { id }
    }

    /// Serialize the field
    pub fn serialize_field(
        self,
        constants_pool: &mut ConstantsPool<'g>,
    ) -> Result<class_file::Field, Error> {
        let access_flags = self.id.access_flags;
        let name_index = constants_pool.get_utf8(self.id.name.as_str())?;
        let descriptor_index = constants_pool.get_utf8(self.id.descriptor.render())?;

        let mut attributes = vec![];
        if access_flags.contains(FieldAccessFlags::SYNTHETIC) {
            attributes.push(constants_pool.get_attribute(Synthetic)?);
        }

        Ok(class_file::Field {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }
}
