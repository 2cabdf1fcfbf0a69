//! Per-class state shared by every manipulation applied while generating one type

use crate::jvm::class_graph::{ClassGraph, ClassId, FieldData, FieldId};
use crate::jvm::{FieldAccessFlags, FieldType, UnqualifiedName};
use crate::stack::constant::CachedConstant;
use crate::stack::member::FieldAccess;
use crate::stack::StackManipulation;
use crate::Error;
use log::debug;
use std::collections::HashMap;

/// Cache of constants hoisted into synthetic static fields of the type being generated
///
/// Equal `(manipulation, field type)` pairs share one field. Registrations are kept in order, and
/// that order is the order in which the type initializer computes them. A manipulation which
/// itself reads cached constants has those registered ahead of it.
///
/// Cache field names are numbered per context, so a generated type must have exactly one
/// context. Two contexts over the same type would both declare `<prefix>$0`.
pub struct Context<'g> {
    class_graph: &'g ClassGraph<'g>,

    /// Type on which cache fields are declared
    instrumented_type: ClassId<'g>,

    /// Cache fields are named `<prefix>$<n>`
    prefix: UnqualifiedName,

    registrations: HashMap<(StackManipulation<'g>, FieldType<ClassId<'g>>), FieldId<'g>>,

    order: Vec<(StackManipulation<'g>, FieldId<'g>)>,
}

impl<'g> Context<'g> {
    pub fn new(class_graph: &'g ClassGraph<'g>, instrumented_type: ClassId<'g>) -> Context<'g> {
        Context {
            class_graph,
            instrumented_type,
            prefix: UnqualifiedName::CACHEDVALUE,
            registrations: HashMap::new(),
            order: vec![],
        }
    }

    /// Use a different prefix for the names of cache fields
    pub fn with_prefix(mut self, prefix: UnqualifiedName) -> Context<'g> {
        self.prefix = prefix;
        self
    }

    pub fn instrumented_type(&self) -> ClassId<'g> {
        self.instrumented_type
    }

    pub fn class_graph(&self) -> &'g ClassGraph<'g> {
        self.class_graph
    }

    /// Get the static field holding the value of a manipulation, registering it if this is the
    /// first time the pair is seen
    pub fn cache(
        &mut self,
        manipulation: &StackManipulation<'g>,
        field_type: &FieldType<ClassId<'g>>,
    ) -> Result<FieldId<'g>, Error> {
        if !manipulation.is_valid() {
            return Err(Error::IllegalStackManipulation);
        }

        let key = (manipulation.clone(), *field_type);
        if let Some(field) = self.registrations.get(&key) {
            return Ok(*field);
        }

        // Anything the initializer reads must be initialized before it
        for cached in nested_cached(manipulation) {
            self.cache(&cached.manipulation, &cached.field_type)?;
        }

        let name = self
            .prefix
            .concat(&UnqualifiedName::DOLLAR)
            .concat(&UnqualifiedName::number(self.order.len()));
        let field = self.class_graph.add_field(FieldData {
            class: self.instrumented_type,
            name,
            descriptor: *field_type,
            access_flags: FieldAccessFlags::PRIVATE
                | FieldAccessFlags::STATIC
                | FieldAccessFlags::FINAL
                | FieldAccessFlags::SYNTHETIC,
        });
        debug!("Caching {:?} in {:?}", manipulation, field);

        self.registrations.insert(key, field);
        self.order.push((manipulation.clone(), field));
        Ok(field)
    }

    /// Number of registered cache fields
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Fields registered so far, in registration order
    pub fn cached_fields(&self) -> Vec<FieldId<'g>> {
        self.order.iter().map(|(_, field)| *field).collect()
    }

    /// Compute and store the `index`-th registered constant
    pub fn initializer(&self, index: usize) -> Option<StackManipulation<'g>> {
        self.order.get(index).map(|(manipulation, field)| {
            StackManipulation::Compound(vec![
                manipulation.clone(),
                FieldAccess::for_field(*field).putter(),
            ])
        })
    }

    /// Initialize every field registered so far
    pub fn type_initializer(&self) -> StackManipulation<'g> {
        StackManipulation::Compound((0..self.len()).filter_map(|i| self.initializer(i)).collect())
    }
}

/// Cached constants reachable from a manipulation without going through another cached constant
fn nested_cached<'a, 'g>(manipulation: &'a StackManipulation<'g>) -> Vec<&'a CachedConstant<'g>> {
    let mut found = vec![];
    let mut pending = vec![manipulation];
    while let Some(manipulation) = pending.pop() {
        match manipulation {
            StackManipulation::Compound(children) => pending.extend(children.iter().rev()),
            StackManipulation::ArrayFactory(factory) => {
                pending.extend(factory.elements.iter().rev())
            }
            StackManipulation::Cached(cached) => found.push(cached),
            _ => (),
        }
    }
    found
}
