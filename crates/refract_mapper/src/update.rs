//! Applying a [`ChangeSet`] to an instance.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::{fmt, iter};

use crate::error::UpdateError;
use crate::info::{ConstructorDescriptor, TypeDescriptor, UpdateTest};
use crate::{ChangeSet, Value, debug_trace};

// -----------------------------------------------------------------------------
// Updated

/// The outcome of a successful [`TypeDescriptor::update`].
pub enum Updated {
    /// The given instance was modified in place.
    InPlace,
    /// A new instance was built. The given instance, if any, was not modified
    /// and the caller is expected to replace it.
    Constructed(Box<dyn Any>),
}

impl Updated {
    /// Returns `true` if a new instance was built.
    #[inline]
    pub fn is_constructed(&self) -> bool {
        matches!(self, Self::Constructed(_))
    }
}

impl fmt::Debug for Updated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InPlace => f.write_str("InPlace"),
            Self::Constructed(_) => f.write_str("Constructed(..)"),
        }
    }
}

// -----------------------------------------------------------------------------
// Applied

/// The outcome of a successful [`TypeRegistry::update`](crate::registry::TypeRegistry::update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The value in the slot was modified in place.
    Mutated,
    /// The slot now holds a newly constructed value.
    Constructed,
}

// -----------------------------------------------------------------------------
// update

impl TypeDescriptor {
    /// Applies `changes` to `instance`.
    ///
    /// - If an instance is given and only mutable properties change, they are
    ///   written in place, in declaration order, and [`Updated::InPlace`] is
    ///   returned.
    /// - Otherwise a constructor is selected: one binding every immutable
    ///   property of the type, changed or not, when an instance is given, or
    ///   every changed property when there is none. Its remaining parameters
    ///   are read from the instance. The remaining mutable changes are then
    ///   written into the new instance, and mutable properties left out of
    ///   `changes` are carried over from the old one.
    ///
    /// With an instance, values of [`UpdateTest::ValueChanged`] properties
    /// that equal the current value are dropped first: they call no setter
    /// and do not force a new instance.
    ///
    /// Every change is validated before the first write, so on error the
    /// instance is left as it was.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::MismatchedInstanceType`] if `instance` is not of the described type.
    /// - [`UpdateError::PropertyNotFound`] if `changes` names an undeclared property.
    /// - [`UpdateError::MismatchedValueType`] if a value has the wrong type.
    /// - [`UpdateError::NoMatchingConstructor`] if construction is needed but no constructor fits.
    /// - [`UpdateError::MissingValue`] if a constructor argument cannot be resolved.
    /// - [`UpdateError::Construction`] if the constructor rejects its arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use refract_mapper::{ChangeSet, Mapped, MemberDeclarations, Updated, describe};
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Account {
    ///     id: u64,
    ///     owner: String,
    /// }
    ///
    /// impl Mapped for Account {
    ///     fn declare(members: &mut MemberDeclarations<Self>) {
    ///         members
    ///             .readonly_field("id", |a| &a.id)
    ///             .field("owner", |a| &a.owner, |a| &mut a.owner)
    ///             .constructor("new", &["id"], |id: u64| Account { id, owner: String::new() });
    ///     }
    /// }
    ///
    /// let descriptor = describe::<Account>().unwrap();
    /// let mut account = Account { id: 1, owner: "ann".into() };
    ///
    /// let changes = ChangeSet::new().with("owner", String::from("bob"));
    /// let updated = descriptor.update(Some(&mut account), changes).unwrap();
    /// assert!(matches!(updated, Updated::InPlace));
    /// assert_eq!(account.owner, "bob");
    ///
    /// let changes = ChangeSet::new().with("id", 2_u64);
    /// let Updated::Constructed(built) = descriptor.update(Some(&mut account), changes).unwrap() else {
    ///     panic!("changing `id` needs a new instance");
    /// };
    /// assert_eq!(*built.downcast::<Account>().unwrap(), Account { id: 2, owner: "bob".into() });
    /// ```
    pub fn update(
        &self,
        instance: Option<&mut dyn Any>,
        changes: ChangeSet,
    ) -> Result<Updated, UpdateError> {
        if let Some(existing) = instance.as_deref() {
            self.check_instance(existing)?;
        }
        let mut values = self.resolve(changes)?;
        if let Some(existing) = instance.as_deref() {
            self.drop_unchanged(existing, &mut values);
        }

        let touches_immutable = self
            .properties()
            .iter()
            .zip(&values)
            .any(|(property, value)| value.is_some() && property.is_immutable());

        match instance {
            Some(target) if !touches_immutable => {
                self.write_in_place(target, values)?;
                Ok(Updated::InPlace)
            }
            existing => {
                let built = self.reconstruct(existing.as_deref(), values)?;
                Ok(Updated::Constructed(built))
            }
        }
    }

    /// Validates `changes` and orders the values by property declaration index.
    fn resolve(&self, changes: ChangeSet) -> Result<Vec<Option<Value>>, UpdateError> {
        let properties = self.properties();
        let mut values: Vec<Option<Value>> =
            iter::repeat_with(|| None).take(properties.len()).collect();

        for (name, value) in changes {
            let Some(index) = self.index_of(&name) else {
                return Err(UpdateError::PropertyNotFound {
                    type_path: self.type_path(),
                    property: name,
                });
            };
            let property = &properties[index];
            if value.value_type() != property.value_type() {
                return Err(UpdateError::MismatchedValueType {
                    type_path: self.type_path(),
                    property: property.name(),
                    expected: property.value_type(),
                    found: value.value_type(),
                });
            }
            values[index] = Some(value);
        }

        Ok(values)
    }

    /// Drops values that the property's [`UpdateTest`] does not count as a change.
    fn drop_unchanged(&self, existing: &dyn Any, values: &mut [Option<Value>]) {
        for (property, slot) in self.properties().iter().zip(values) {
            if property.update_test() == UpdateTest::Always {
                continue;
            }
            let Some(value) = slot.as_ref() else {
                continue;
            };
            let unchanged = property
                .read(existing)
                .is_some_and(|current| property.is_unchanged(&current, value));
            if unchanged {
                debug_trace!("`{}`: `{}` unchanged, skipped", self.type_path(), property.name());
                *slot = None;
            }
        }
    }

    fn write_in_place(
        &self,
        target: &mut dyn Any,
        values: Vec<Option<Value>>,
    ) -> Result<(), UpdateError> {
        for (property, value) in self.properties().iter().zip(values) {
            let Some(value) = value else {
                continue;
            };
            debug_trace!("`{}`: writing `{}` in place", self.type_path(), property.name());
            self.write(target, property.name(), value)?;
        }
        Ok(())
    }

    fn reconstruct(
        &self,
        existing: Option<&dyn Any>,
        mut values: Vec<Option<Value>>,
    ) -> Result<Box<dyn Any>, UpdateError> {
        let properties = self.properties();

        let required: Vec<&str> = properties
            .iter()
            .zip(&values)
            .filter(|(property, value)| match existing {
                // Every desired value has to come from the constructor.
                None => value.is_some(),
                // Immutable values, changed or not, only survive through the constructor.
                Some(_) => property.is_immutable(),
            })
            .map(|(property, _)| property.name())
            .collect();
        let constructor = self.select_constructor(&required)?;

        let arguments = self.constructor_arguments(constructor, existing, &mut values)?;
        debug_trace!(
            "`{}`: constructing through `{}`",
            self.type_path(),
            constructor.name()
        );
        let mut built =
            constructor
                .construct(arguments)
                .map_err(|source| UpdateError::Construction {
                    type_path: self.type_path(),
                    constructor: constructor.name(),
                    source,
                })?;

        for (property, value) in properties.iter().zip(values) {
            if property.is_immutable() || constructor.binds(property.name()) {
                continue;
            }
            let value = match (value, existing) {
                (Some(value), _) => value,
                (None, Some(old)) => property.read(old).ok_or_else(|| self.instance_mismatch())?,
                (None, None) => continue,
            };
            debug_trace!(
                "`{}`: writing `{}` into the new instance",
                self.type_path(),
                property.name()
            );
            self.write(&mut *built, property.name(), value)?;
        }

        Ok(built)
    }

    /// Collects the arguments of `constructor`, taking supplied values out of
    /// `values` and reading the others from `existing`.
    fn constructor_arguments(
        &self,
        constructor: &ConstructorDescriptor,
        existing: Option<&dyn Any>,
        values: &mut [Option<Value>],
    ) -> Result<Vec<Value>, UpdateError> {
        let missing = |property| UpdateError::MissingValue {
            type_path: self.type_path(),
            property,
        };

        let mut arguments = Vec::with_capacity(constructor.parameter_len());
        for &name in constructor.parameters() {
            let index = self.index_of(name).ok_or_else(|| missing(name))?;
            let value = match values[index].take() {
                Some(value) => value,
                None => existing
                    .and_then(|old| self.properties()[index].read(old))
                    .ok_or_else(|| missing(name))?,
            };
            arguments.push(value);
        }
        Ok(arguments)
    }

    fn write(&self, target: &mut dyn Any, name: &'static str, value: Value) -> Result<(), UpdateError> {
        let Some(property) = self.property(name) else {
            return Err(UpdateError::PropertyNotFound {
                type_path: self.type_path(),
                property: name.into(),
            });
        };
        property
            .write(target, value)
            .map_err(|_| self.instance_mismatch())
    }

    #[inline]
    fn instance_mismatch(&self) -> UpdateError {
        UpdateError::MismatchedInstanceType {
            expected: self.type_path(),
        }
    }
}
