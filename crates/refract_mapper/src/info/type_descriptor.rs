use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::any::Any;

use refract_utils::hash::HashMap;

use crate::error::UpdateError;
use crate::info::{ConstructorDescriptor, PropertyDescriptor, Type};
use crate::{ChangeSet, Value};

/// The mapping of one type: its properties and candidate constructors.
///
/// Built once per type by [`describe`](crate::describe), immutable after that
/// and usually shared through the [`TypeRegistry`](crate::registry::TypeRegistry).
///
/// Properties and constructors keep **declaration order**.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    ty: Type,
    properties: Box<[PropertyDescriptor]>,
    indices: HashMap<&'static str, usize>,
    constructors: Box<[ConstructorDescriptor]>,
}

impl TypeDescriptor {
    pub(crate) fn new(
        ty: Type,
        properties: Box<[PropertyDescriptor]>,
        constructors: Box<[ConstructorDescriptor]>,
    ) -> Self {
        let indices = properties
            .iter()
            .enumerate()
            .map(|(index, property)| (property.name(), index))
            .collect();

        Self {
            ty,
            properties,
            indices,
            constructors,
        }
    }

    /// Returns the described [`Type`].
    #[inline]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    /// Returns the properties in declaration order.
    #[inline]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Returns the property with the given logical `name`, if present.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(*self.indices.get(name)?)
    }

    /// Returns the declaration index of the property `name`, if present.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    #[inline]
    pub fn property_len(&self) -> usize {
        self.properties.len()
    }

    /// Returns the constructors in declaration order.
    #[inline]
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// Iterates the properties that have a write path.
    pub fn mutable_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|p| p.is_mutable())
    }

    /// Iterates the properties that can only be set through a constructor.
    pub fn immutable_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|p| p.is_immutable())
    }

    /// Returns `true` if `instance` is of the described type.
    #[inline]
    pub fn accepts(&self, instance: &dyn Any) -> bool {
        instance.type_id() == self.ty.id()
    }

    pub(crate) fn check_instance(&self, instance: &dyn Any) -> Result<(), UpdateError> {
        if self.accepts(instance) {
            Ok(())
        } else {
            Err(UpdateError::MismatchedInstanceType {
                expected: self.type_path(),
            })
        }
    }

    /// Reads the current value of the property `name` from `instance`.
    pub fn read(&self, instance: &dyn Any, name: &str) -> Result<Value, UpdateError> {
        self.check_instance(instance)?;
        let property = self
            .property(name)
            .ok_or_else(|| UpdateError::PropertyNotFound {
                type_path: self.type_path(),
                property: Cow::Owned(name.into()),
            })?;
        property
            .read(instance)
            .ok_or(UpdateError::MismatchedInstanceType {
                expected: self.type_path(),
            })
    }

    /// Reads every property of `instance` into a [`ChangeSet`].
    ///
    /// Applying the snapshot to another instance copies all mutable state.
    pub fn snapshot(&self, instance: &dyn Any) -> Result<ChangeSet, UpdateError> {
        self.check_instance(instance)?;
        let mut changes = ChangeSet::with_capacity(self.properties.len());
        for property in self.properties.iter() {
            let value = property
                .read(instance)
                .ok_or(UpdateError::MismatchedInstanceType {
                    expected: self.type_path(),
                })?;
            changes.insert(property.name(), value);
        }
        Ok(changes)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
            && self.properties == other.properties
            && self.constructors == other.constructors
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::error::UpdateError;
    use crate::fixtures::{AutoSerializedType, Point};
    use crate::{Updated, describe};

    #[test]
    fn read_prefers_getter() {
        let descriptor = describe::<AutoSerializedType>().unwrap();
        let mut instance = AutoSerializedType::new(5);
        instance.set_accessor_value(3);

        let value = descriptor.read(&instance, "accessorValue").unwrap();
        assert_eq!(value.take::<i32>().unwrap(), 3);
        let value = descriptor.read(&instance, "finalField").unwrap();
        assert_eq!(value.take::<i32>().unwrap(), 5);

        assert!(matches!(
            descriptor.read(&instance, "accessorString"),
            Err(UpdateError::PropertyNotFound { .. })
        ));
        assert!(matches!(
            descriptor.read(&0_u8, "finalField"),
            Err(UpdateError::MismatchedInstanceType { .. })
        ));
    }

    #[test]
    fn snapshot_copies_mutable_state() {
        let descriptor = describe::<AutoSerializedType>().unwrap();
        let mut source = AutoSerializedType::new(1);
        source.plain_field = vec![String::from("x")];
        source.set_accessor_value(9);

        let snapshot = descriptor.snapshot(&source).unwrap();
        assert_eq!(snapshot.len(), 3);

        // `finalField` is part of the snapshot, so a new instance is built.
        let mut target = AutoSerializedType::new(1);
        let Updated::Constructed(built) = descriptor.update(Some(&mut target), snapshot).unwrap()
        else {
            panic!("expected a new instance");
        };
        assert_eq!(*built.downcast::<AutoSerializedType>().unwrap(), source);
        assert_eq!(target, AutoSerializedType::new(1));
    }

    #[test]
    fn mutability_partition() {
        let descriptor = describe::<Point>().unwrap();
        let immutable: Vec<_> = descriptor.immutable_properties().map(|p| p.name()).collect();
        let mutable: Vec<_> = descriptor.mutable_properties().map(|p| p.name()).collect();
        assert_eq!(immutable, ["x", "y", "z"]);
        assert_eq!(mutable, ["label"]);

        assert!(descriptor.accepts(&Point {
            x: 0,
            y: 0,
            z: 0,
            label: String::new(),
        }));
        assert!(!descriptor.accepts(&AutoSerializedType::new(0)));
    }
}
