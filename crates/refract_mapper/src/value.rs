use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::info::Type;

/// A type-erased property value.
///
/// Values are produced by the encoding layer (already converted to the
/// property's value type) and by read paths; they are consumed by write
/// paths and constructors.
///
/// # Examples
///
/// ```
/// use refract_mapper::Value;
///
/// let value = Value::new(5_i32);
/// assert!(value.is::<i32>());
/// assert_eq!(value.downcast_ref::<i32>(), Some(&5));
///
/// let value = value.take::<String>().unwrap_err();
/// assert_eq!(value.take::<i32>().unwrap(), 5);
/// ```
pub struct Value {
    ty: Type,
    inner: Box<dyn Any>,
}

impl Value {
    #[inline]
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            ty: Type::of::<T>(),
            inner: Box::new(value),
        }
    }

    /// Returns the [`Type`] of the contained value.
    #[inline]
    pub const fn value_type(&self) -> Type {
        self.ty
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty.is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    /// Moves the contained value out, or gives `self` back if it is not a `T`.
    pub fn take<T: Any>(self) -> Result<T, Self> {
        if !self.is::<T>() {
            return Err(self);
        }
        let ty = self.ty;
        match self.inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Self { ty, inner }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value(`{}`)", self.ty)
    }
}
