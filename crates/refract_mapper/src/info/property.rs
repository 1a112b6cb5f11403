use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::Value;
use crate::info::Type;

// -----------------------------------------------------------------------------
// Erased accessors

/// Reads a value out of an instance, `None` if the instance has the wrong type.
pub(crate) type ReadFn = Arc<dyn Fn(&dyn Any) -> Option<Value> + Send + Sync>;

/// Writes a value into an instance, giving the value back on a type mismatch.
pub(crate) type WriteFn = Arc<dyn Fn(&mut dyn Any, Value) -> Result<(), Value> + Send + Sync>;

/// Compares two values of the property's type, `false` on any type mismatch.
pub(crate) type EqFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

pub(crate) fn erase_eq<V: Any + PartialEq>() -> EqFn {
    Arc::new(|a: &Value, b: &Value| match (a.downcast_ref::<V>(), b.downcast_ref::<V>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    })
}

pub(crate) fn erase_field_read<T: Any, V: Any + Clone>(get: fn(&T) -> &V) -> ReadFn {
    Arc::new(move |instance: &dyn Any| {
        let target = instance.downcast_ref::<T>()?;
        Some(Value::new(get(target).clone()))
    })
}

pub(crate) fn erase_field_write<T: Any, V: Any>(get_mut: fn(&mut T) -> &mut V) -> WriteFn {
    Arc::new(move |instance: &mut dyn Any, value: Value| {
        let Some(target) = instance.downcast_mut::<T>() else {
            return Err(value);
        };
        *get_mut(target) = value.take::<V>()?;
        Ok(())
    })
}

pub(crate) fn erase_getter<T: Any, V: Any>(getter: fn(&T) -> V) -> ReadFn {
    Arc::new(move |instance: &dyn Any| {
        let target = instance.downcast_ref::<T>()?;
        Some(Value::new(getter(target)))
    })
}

pub(crate) fn erase_setter<T: Any, V: Any>(setter: fn(&mut T, V)) -> WriteFn {
    Arc::new(move |instance: &mut dyn Any, value: Value| {
        let Some(target) = instance.downcast_mut::<T>() else {
            return Err(value);
        };
        setter(target, value.take::<V>()?);
        Ok(())
    })
}

// -----------------------------------------------------------------------------
// FieldAccess

/// Direct access to the field backing a property.
///
/// A field without `write` is an immutable ("final") field.
#[derive(Clone)]
pub(crate) struct FieldAccess {
    pub(crate) read: ReadFn,
    pub(crate) write: Option<WriteFn>,
}

// -----------------------------------------------------------------------------
// UpdateTest

/// Decides whether a supplied value counts as a change of its property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateTest {
    /// Every supplied value is applied.
    #[default]
    Always,
    /// A value equal to the current one is dropped before the update runs.
    ///
    /// It neither calls the setter nor, for an immutable property, causes a
    /// new instance to be built.
    ValueChanged,
}

// -----------------------------------------------------------------------------
// PropertyDescriptor

/// One logical, named property of a mapped type.
///
/// A property merges every declaration sharing its logical name: an
/// optional field, an optional getter and an optional setter. It always has
/// at least one read path; a property without any write path is immutable
/// and can only be set through a constructor.
///
/// Reads prefer the getter, writes prefer the setter, so accessor side
/// effects (such as derived state) are kept.
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: &'static str,
    value_type: Type,
    field: Option<FieldAccess>,
    getter: Option<ReadFn>,
    setter: Option<WriteFn>,
    update_test: UpdateTest,
    equals: Option<EqFn>,
}

impl PropertyDescriptor {
    pub(crate) fn new(
        name: &'static str,
        value_type: Type,
        field: Option<FieldAccess>,
        getter: Option<ReadFn>,
        setter: Option<WriteFn>,
    ) -> Self {
        debug_assert!(field.is_some() || getter.is_some());
        Self {
            name,
            value_type,
            field,
            getter,
            setter,
            update_test: UpdateTest::Always,
            equals: None,
        }
    }

    pub(crate) fn set_update_test(&mut self, test: UpdateTest, equals: EqFn) {
        self.update_test = test;
        self.equals = Some(equals);
    }

    /// Returns the logical property name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the in-memory type of the property's values.
    #[inline]
    pub const fn value_type(&self) -> Type {
        self.value_type
    }

    #[inline]
    pub const fn has_field(&self) -> bool {
        self.field.is_some()
    }

    #[inline]
    pub const fn has_getter(&self) -> bool {
        self.getter.is_some()
    }

    #[inline]
    pub const fn has_setter(&self) -> bool {
        self.setter.is_some()
    }

    /// Returns `true` if the property has a setter or a writable field.
    pub fn is_mutable(&self) -> bool {
        self.setter.is_some() || self.field.as_ref().is_some_and(|f| f.write.is_some())
    }

    #[inline]
    pub fn is_immutable(&self) -> bool {
        !self.is_mutable()
    }

    /// Returns how updates decide whether a supplied value is a change.
    #[inline]
    pub const fn update_test(&self) -> UpdateTest {
        self.update_test
    }

    /// Returns `true` if the update test drops `value` as equal to `current`.
    pub(crate) fn is_unchanged(&self, current: &Value, value: &Value) -> bool {
        match (self.update_test, &self.equals) {
            (UpdateTest::ValueChanged, Some(equals)) => equals(current, value),
            _ => false,
        }
    }

    /// Reads the property from `instance` through its getter, or its field.
    ///
    /// Returns `None` if `instance` is not of the owning type.
    pub fn read(&self, instance: &dyn Any) -> Option<Value> {
        match (&self.getter, &self.field) {
            (Some(getter), _) => getter(instance),
            (None, Some(field)) => (field.read)(instance),
            (None, None) => None,
        }
    }

    /// Writes `value` into `instance` through the setter, or the field.
    ///
    /// Gives `value` back if the property is immutable, `instance` is not of
    /// the owning type, or `value` is not of [`value_type`](Self::value_type).
    pub fn write(&self, instance: &mut dyn Any, value: Value) -> Result<(), Value> {
        let write = match (&self.setter, &self.field) {
            (Some(setter), _) => setter,
            (None, Some(FieldAccess { write: Some(write), .. })) => write,
            _ => return Err(value),
        };
        write(instance, value)
    }
}

impl PartialEq for PropertyDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.value_type == other.value_type
            && self.field.as_ref().map(|f| f.write.is_some())
                == other.field.as_ref().map(|f| f.write.is_some())
            && self.getter.is_some() == other.getter.is_some()
            && self.setter.is_some() == other.setter.is_some()
            && self.update_test == other.update_test
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("field", &self.field.as_ref().map(|f| f.write.is_some()))
            .field("getter", &self.getter.is_some())
            .field("setter", &self.setter.is_some())
            .field("update_test", &self.update_test)
            .finish()
    }
}
